//! Error types for the pipeline library.

use std::path::PathBuf;

/// Broad classification of an [`EtlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed configuration file or keys
    Config,
    /// The warehouse could not be reached
    Connection,
    /// The warehouse rejected a statement
    Warehouse,
}

#[derive(Debug, thiserror::Error)]
pub enum EtlError {
    #[error("failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("cannot connect to warehouse at {host}:{port}: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: postgres::Error,
    },

    #[error("failed to set up TLS: {0}")]
    Tls(#[from] rustls::Error),

    /// A statement failed. `code` is the engine's SQLSTATE when one was reported.
    #[error("statement {statement} failed{}: {message}", sqlstate_suffix(.code))]
    Warehouse {
        statement: String,
        code: Option<String>,
        message: String,
    },
}

impl EtlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EtlError::ConfigRead { .. } | EtlError::ConfigParse { .. } | EtlError::Config(_) => {
                ErrorKind::Config
            }
            EtlError::Connection { .. } | EtlError::Tls(_) => ErrorKind::Connection,
            EtlError::Warehouse { .. } => ErrorKind::Warehouse,
        }
    }

    /// Wrap a driver error raised while running the named statement.
    pub fn warehouse(statement: &str, err: postgres::Error) -> Self {
        let (code, message) = match err.as_db_error() {
            Some(db) => (Some(db.code().code().to_string()), db.message().to_string()),
            None => (None, err.to_string()),
        };
        EtlError::Warehouse {
            statement: statement.to_string(),
            code,
            message,
        }
    }
}

fn sqlstate_suffix(code: &Option<String>) -> String {
    match code {
        Some(code) => format!(" [{code}]"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warehouse_error_display_with_code() {
        let err = EtlError::Warehouse {
            statement: "staging_songs_copy".into(),
            code: Some("XX000".into()),
            message: "S3ServiceException: Access Denied".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Warehouse);
        assert_eq!(
            err.to_string(),
            "statement staging_songs_copy failed [XX000]: S3ServiceException: Access Denied"
        );
    }

    #[test]
    fn test_warehouse_error_display_without_code() {
        let err = EtlError::Warehouse {
            statement: "users_insert".into(),
            code: None,
            message: "connection closed".into(),
        };
        assert_eq!(err.to_string(), "statement users_insert failed: connection closed");
    }

    #[test]
    fn test_config_kinds() {
        let err = EtlError::Config("missing [s3] log_data".into());
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = EtlError::ConfigRead {
            path: PathBuf::from("dwh.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("dwh.toml"));
    }
}
