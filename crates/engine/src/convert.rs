//! Convert — running a whole line source through the extractor.

use tracing::{debug, info};

use crate::parser::{extract, Classification, LogRecord, ParseTable};
use crate::report::condense;

/// Destination for parsed records, e.g. a database table.
pub trait RecordSink {
    type Error;

    /// Persist `records` in order, returning how many were written.
    fn store(&mut self, records: &[LogRecord]) -> Result<usize, Self::Error>;
}

/// Everything gathered from one file, held in memory until it is stored.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Conversion {
    /// Parsed records in encounter order
    pub records: Vec<LogRecord>,
    /// Type tokens of soft-skipped lines, in encounter order
    pub skipped: Vec<Option<String>>,
    pub hard_skipped: usize,
    pub lines: usize,
}

impl Conversion {
    /// Soft-skipped type tokens by frequency.
    pub fn skip_summary(&self) -> Vec<(Option<&str>, usize)> {
        condense(self.skipped.iter().map(Option::as_deref))
    }

    fn push(&mut self, classification: Classification) {
        self.lines += 1;
        match classification {
            Classification::HardSkip => self.hard_skipped += 1,
            Classification::SoftSkip(token) => self.skipped.push(token),
            Classification::Parsed(record) => self.records.push(record),
        }
    }
}

/// Classify every line of `lines` against `table`.
///
/// Only a failure of the line source itself stops the conversion.
pub fn convert<I, E>(lines: I, table: &ParseTable) -> Result<Conversion, E>
where
    I: IntoIterator<Item = Result<String, E>>,
{
    let mut conversion = Conversion::default();

    for line in lines {
        let line = line?;
        conversion.push(extract(&line, table));
    }

    debug!(
        hard_skipped = conversion.hard_skipped,
        soft_skipped = conversion.skipped.len(),
        "Line classification finished"
    );
    info!(
        lines = conversion.lines,
        records = conversion.records.len(),
        "Converted log lines"
    );
    Ok(conversion)
}
