use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppCountError>;

/// Everything that can go wrong while loading, aggregating or plotting the application counts
#[derive(Error, Debug)]
pub enum AppCountError {
    #[error("could not open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column-name row: expected it after {skip_rows} skipped rows, found {records} records")]
    MissingHeader { skip_rows: usize, records: usize },

    #[error("column {name:?} not found, available columns: {found:?}")]
    MissingColumn { name: String, found: Vec<String> },

    #[error("no application type columns besides {label:?} and {total:?}")]
    NoCategories { label: String, total: String },

    #[error("no data rows left after removing header and footer rows")]
    NoData,

    #[error("line {line}, column {column:?}: invalid count {value:?}")]
    InvalidCount {
        line: u64,
        column: String,
        value: String,
    },

    #[error("line {line}, column {column:?}: counts add up to more than {}", u64::MAX)]
    CountOverflow { line: u64, column: String },

    #[error("nothing to plot: {0}")]
    EmptyChart(String),

    #[error("invalid chart format {0:?}, expected svg or png")]
    InvalidFormat(String),

    #[error("plotting failed: {message}")]
    Plot {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppCountError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for AppCountError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::Plot {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_count_names_line_and_column() {
        let e = AppCountError::InvalidCount {
            line: 7,
            column: "Search".to_string(),
            value: "n/a".to_string(),
        };
        let msg = e.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("\"Search\""));
        assert!(msg.contains("\"n/a\""));
    }

    #[test]
    fn io_error_keeps_source() {
        use std::error::Error;
        let e = AppCountError::io(
            "missing.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(e.to_string().contains("missing.csv"));
        assert!(e.source().is_some());
    }
}
