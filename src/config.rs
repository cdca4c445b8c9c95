//! Pipeline configuration, read once at startup from a TOML file.

use directories::ProjectDirs;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EtlError, Result};

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "dwh.toml";

/// Redshift's default listener port
pub const DEFAULT_PORT: u16 = 5439;

/// Region of the public source buckets
pub const DEFAULT_REGION: &str = "us-west-2";

#[derive(Debug, Clone, Deserialize)]
pub struct DwhConfig {
    pub cluster: ClusterConfig,
    pub iam_role: IamRoleConfig,
    pub s3: S3Config,
}

/// Warehouse connection parameters
#[derive(Clone, Deserialize)]
pub struct ClusterConfig {
    pub host: String,
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    #[serde(default = "default_port")]
    pub db_port: u16,
    #[serde(default)]
    pub sslmode: SslMode,
}

/// Whether the warehouse connection negotiates TLS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    /// Use TLS when the server offers it
    #[default]
    Prefer,
    Require,
}

/// Role the warehouse assumes to read from the source buckets
#[derive(Debug, Clone, Deserialize)]
pub struct IamRoleConfig {
    pub arn: String,
}

/// Object-storage locations of the two source datasets
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub log_data: String,
    /// JSONPaths file describing the shape of the event log records
    pub log_jsonpath: String,
    pub song_data: String,
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("host", &self.host)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .field("db_port", &self.db_port)
            .field("sslmode", &self.sslmode)
            .finish()
    }
}

impl DwhConfig {
    /// Read and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| EtlError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: DwhConfig =
            toml::from_str(&contents).map_err(|source| EtlError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or the first `dwh.toml` found in the
    /// working directory or the user config directory.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = default_config_path()?;
                Self::load(&path)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("cluster", "host", &self.cluster.host),
            ("cluster", "db_name", &self.cluster.db_name),
            ("cluster", "db_user", &self.cluster.db_user),
            ("iam_role", "arn", &self.iam_role.arn),
            ("s3", "log_data", &self.s3.log_data),
            ("s3", "log_jsonpath", &self.s3.log_jsonpath),
            ("s3", "song_data", &self.s3.song_data),
            ("s3", "region", &self.s3.region),
        ];

        for (section, key, value) in required {
            if value.trim().is_empty() {
                return Err(EtlError::Config(format!("[{section}] {key} must not be empty")));
            }
        }

        if self.cluster.db_port == 0 {
            return Err(EtlError::Config("[cluster] db_port must not be 0".into()));
        }

        Ok(())
    }
}

fn default_config_path() -> Result<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }

    if let Some(dirs) = ProjectDirs::from("", "", "songplays-dwh") {
        let user = dirs.config_dir().join(CONFIG_FILE_NAME);
        if user.exists() {
            return Ok(user);
        }
    }

    Err(EtlError::Config(format!(
        "no {CONFIG_FILE_NAME} in the working directory or user config directory; pass --config"
    )))
}
