//! [`Session`] over the PostgreSQL wire protocol, which Redshift speaks.
//!
//! Uses the sync `postgres` crate; it drives its own internal runtime, so no
//! async context is needed by callers. TLS goes through rustls with the
//! webpki root store, negotiated per the configured `sslmode`.

use std::sync::Arc;

use postgres::{Client, Config};
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::{debug, info};

use super::Session;
use crate::catalog::Statement;
use crate::config::{ClusterConfig, SslMode};
use crate::error::{EtlError, Result};

pub struct RedshiftSession {
    client: Client,
    /// Name of the statement in the open transaction, `None` when idle
    pending: Option<String>,
}

impl From<SslMode> for postgres::config::SslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => postgres::config::SslMode::Disable,
            SslMode::Prefer => postgres::config::SslMode::Prefer,
            SslMode::Require => postgres::config::SslMode::Require,
        }
    }
}

fn tls_connector() -> Result<MakeRustlsConnect> {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()?
    .with_root_certificates(roots)
    .with_no_client_auth();

    Ok(MakeRustlsConnect::new(config))
}

/// Label used when the COMMIT of a statement fails
fn commit_label(statement: &str) -> String {
    format!("{} (commit)", statement)
}

impl RedshiftSession {
    /// Open a connection to the cluster
    pub fn connect(cluster: &ClusterConfig) -> Result<Self> {
        info!(
            host = %cluster.host,
            port = cluster.db_port,
            db = %cluster.db_name,
            sslmode = ?cluster.sslmode,
            "connecting to warehouse"
        );

        let client = Config::new()
            .host(&cluster.host)
            .port(cluster.db_port)
            .dbname(&cluster.db_name)
            .user(&cluster.db_user)
            .password(&cluster.db_password)
            .ssl_mode(cluster.sslmode.into())
            .connect(tls_connector()?)
            .map_err(|source| EtlError::Connection {
                host: cluster.host.clone(),
                port: cluster.db_port,
                source,
            })?;

        Ok(Self {
            client,
            pending: None,
        })
    }

    /// Close the connection, discarding any uncommitted statement
    pub fn close(self) -> Result<()> {
        debug!("closing warehouse connection");
        self.client
            .close()
            .map_err(|e| EtlError::warehouse("close", e))
    }
}

impl Session for RedshiftSession {
    fn execute(&mut self, statement: &Statement) -> Result<()> {
        if self.pending.is_none() {
            self.client
                .batch_execute("BEGIN")
                .map_err(|e| EtlError::warehouse(&statement.name, e))?;
        }
        self.pending = Some(statement.name.clone());

        self.client
            .batch_execute(&statement.sql)
            .map_err(|e| EtlError::warehouse(&statement.name, e))
    }

    fn commit(&mut self) -> Result<()> {
        let Some(name) = self.pending.as_deref() else {
            return Ok(());
        };

        let label = commit_label(name);
        self.client
            .batch_execute("COMMIT")
            .map_err(|e| EtlError::warehouse(&label, e))?;
        self.pending = None;
        Ok(())
    }

    fn last_copy_count(&mut self) -> Result<Option<i64>> {
        let row = self
            .client
            .query_one("SELECT pg_last_copy_count()", &[])
            .map_err(|e| EtlError::warehouse("pg_last_copy_count", e))?;
        Ok(Some(row.get(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_label_names_statement() {
        assert_eq!(
            commit_label("staging_songs_copy"),
            "staging_songs_copy (commit)"
        );
        let err = EtlError::Warehouse {
            statement: commit_label("users_insert"),
            code: None,
            message: "serializable isolation violation".into(),
        };
        assert!(err.to_string().starts_with("statement users_insert (commit) failed"));
    }

    #[test]
    fn test_sslmode_maps_to_driver() {
        assert!(matches!(
            postgres::config::SslMode::from(SslMode::Prefer),
            postgres::config::SslMode::Prefer
        ));
        assert!(matches!(
            postgres::config::SslMode::from(SslMode::Require),
            postgres::config::SslMode::Require
        ));
        assert!(matches!(
            postgres::config::SslMode::from(SslMode::Disable),
            postgres::config::SslMode::Disable
        ));
    }

    #[test]
    fn test_tls_connector_builds() {
        assert!(tls_connector().is_ok());
    }
}
