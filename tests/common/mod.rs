use std::fs::File;
use std::io::Error;
use std::path::Path;

const HEADER: [&str; 5] = ["command", "account", "ticket", "code", "value"];

/// Registers one account and issues `rows` tickets to it.
pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;
    wtr.write_record(["register", "bakery", "", "", ""])?;

    for _ in 0..rows {
        wtr.write_record(["issue", "bakery", "", "", ""])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Spreads issue/admit/status traffic over 50 accounts until the file reaches `size_mb`.
///
/// Every account is reset periodically so no queue comes close to exhausting its codes.
pub fn generate_large_csv(path: &Path, size_mb: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(HEADER)?;

    let accounts: Vec<String> = (1..=50).map(|i| format!("shop{:02}", i)).collect();
    for account in &accounts {
        wtr.write_record(["register", account, "", "", ""])?;
        wtr.write_record(["set_capacity", account, "", "", "5"])?;
    }

    let target_size = (size_mb * 1024 * 1024) as u64;
    let mut row: usize = 0;

    // Check size every 5000 rows to avoid syscall overhead
    loop {
        for _ in 0..5000 {
            let account = &accounts[row % accounts.len()];
            let command = match (row / accounts.len()) % 40 {
                39 => "reset",
                n if n % 4 == 3 => "admit",
                n if n % 8 == 5 => "status",
                _ => "issue",
            };
            wtr.write_record([command, account, "", "", ""])?;
            row += 1;
        }
        wtr.flush()?; // Flush to ensure file size is updated
        if std::fs::metadata(path)?.len() >= target_size {
            break;
        }
    }
    Ok(())
}
