use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read table from {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no header row", path.display())]
    NoHeader { path: PathBuf },

    #[error("{} is not a record table: {reason}", path.display())]
    NotATable { path: PathBuf, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, IngestError>;
