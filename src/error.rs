#[derive(Debug)]
pub enum LoaderError {
    Database(rusqlite::Error),
    Csv(csv::Error),
    Io(std::io::Error),
    #[cfg(feature = "dataframe")]
    Frame(polars::error::PolarsError),
    InvalidField(String),
    InvalidDate(String),
    Catalog(String),
    Config(String),
    Verification(String),
}

impl From<rusqlite::Error> for LoaderError {
    fn from(err: rusqlite::Error) -> LoaderError {
        LoaderError::Database(err)
    }
}

impl From<csv::Error> for LoaderError {
    fn from(err: csv::Error) -> LoaderError {
        LoaderError::Csv(err)
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> LoaderError {
        LoaderError::Io(err)
    }
}

#[cfg(feature = "dataframe")]
impl From<polars::error::PolarsError> for LoaderError {
    fn from(err: polars::error::PolarsError) -> LoaderError {
        LoaderError::Frame(err)
    }
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::Database(e) => write!(f, "Database error: {}", e),
            LoaderError::Csv(e) => write!(f, "CSV error: {}", e),
            LoaderError::Io(e) => write!(f, "IO error: {}", e),
            #[cfg(feature = "dataframe")]
            LoaderError::Frame(e) => write!(f, "Dataframe error: {}", e),
            LoaderError::InvalidField(msg) => write!(f, "Invalid field: {}", msg),
            LoaderError::InvalidDate(msg) => write!(f, "Invalid date: {}", msg),
            LoaderError::Catalog(msg) => write!(f, "Catalog error: {}", msg),
            LoaderError::Config(msg) => write!(f, "Configuration error: {}", msg),
            LoaderError::Verification(msg) => write!(f, "Verification failed: {}", msg),
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::Database(e) => Some(e),
            LoaderError::Csv(e) => Some(e),
            LoaderError::Io(e) => Some(e),
            #[cfg(feature = "dataframe")]
            LoaderError::Frame(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "iris.csv");
        let err: LoaderError = io_err.into();
        assert!(matches!(err, LoaderError::Io(_)));
        assert_eq!(err.to_string(), "IO error: iris.csv");
    }

    #[test]
    fn test_message_variants() {
        let err = LoaderError::InvalidDate("31-Foo-2007".to_string());
        assert_eq!(err.to_string(), "Invalid date: 31-Foo-2007");
        assert!(std::error::Error::source(&err).is_none());
    }
}
