//! Source — ordered raw lines from a plain or gzip-compressed logfile.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Line iterator over a logfile.
///
/// Invalid UTF-8 is replaced rather than rejected, so one corrupt line
/// cannot abort a conversion.
pub struct Lines {
    reader: Box<dyn BufRead>,
    path: PathBuf,
    buf: Vec<u8>,
}

impl Iterator for Lines {
    type Item = Result<String, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => Some(Ok(String::from_utf8_lossy(&self.buf).into_owned())),
            Err(source) => Some(Err(SourceError::Read {
                path: self.path.clone(),
                source,
            })),
        }
    }
}

pub fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Open `path` for line reading, decompressing `.gz` files on the fly.
pub fn open_lines(path: &Path) -> Result<Lines, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let reader: Box<dyn BufRead> = if is_gzip(path) {
        debug!("Reading gzip logfile {}", path.display());
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        debug!("Reading plain logfile {}", path.display());
        Box::new(BufReader::new(file))
    };

    Ok(Lines {
        reader,
        path: path.to_path_buf(),
        buf: Vec::new(),
    })
}
