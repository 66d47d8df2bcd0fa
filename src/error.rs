use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LcError {
    #[error("{0} is not a FITS file")]
    NotFitsFile(PathBuf),

    #[error(transparent)]
    Fitsio(#[from] fitsio::errors::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("light curve columns differ in length (time {time}, value {value}, error {error})")]
    LengthMismatch {
        time: usize,
        value: usize,
        error: usize,
    },

    #[error("table columns differ in length ({expected} rows expected, found {found})")]
    RaggedTable { expected: usize, found: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("{program} exited with {status} while cotrending {input}")]
    Cotrend {
        program: String,
        input: PathBuf,
        status: std::process::ExitStatus,
    },

    #[error("light curve splits into {found} chunks, more than the limit of {limit}")]
    TooManyChunks { found: usize, limit: usize },

    #[error("polynomial fit of order {order} is singular")]
    SingularFit { order: usize },

    #[error("no Kepler light curve files found in {0}")]
    NoQuarters(PathBuf),

    #[error("plot rendering failed: {0}")]
    Plot(String),
}

impl From<DrawingAreaErrorKind<std::io::Error>> for LcError {
    fn from(err: DrawingAreaErrorKind<std::io::Error>) -> Self {
        LcError::Plot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LcError>;
