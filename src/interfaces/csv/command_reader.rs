use crate::domain::command::{Command, CommandRecord};
use crate::error::{QueueError, Result};
use std::io::Read;

/// Reads queue commands from a CSV source.
///
/// Expects the header `command, account, ticket, code, value`. Whitespace is
/// trimmed and trailing columns a command does not need may be omitted.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and validates commands.
    ///
    /// A bad row yields an `Err` for that row only; reading continues with the next one.
    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader
            .into_deserialize::<CommandRecord>()
            .map(|result| result.map_err(QueueError::from).and_then(Command::try_from))
    }
}
