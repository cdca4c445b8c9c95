//! Bulk-load statements for the staging tables

use crate::config::DwhConfig;
use crate::schema::{TableSchema, STAGING_EVENTS, STAGING_SONGS};

/// How COPY maps JSON fields onto table columns
#[derive(Debug, Clone, PartialEq)]
pub enum JsonFormat<'a> {
    /// Explicit JSONPaths file at the given URI
    Paths(&'a str),
    /// Match JSON keys to column names
    Auto,
}

/// Quote a value as a SQL string literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Build a Redshift COPY statement loading JSON files from S3
pub fn generate_copy(
    schema: &TableSchema,
    source_uri: &str,
    role_arn: &str,
    region: &str,
    format: JsonFormat<'_>,
) -> String {
    let format = match format {
        JsonFormat::Paths(uri) => quote_literal(uri),
        JsonFormat::Auto => quote_literal("auto"),
    };

    format!(
        "COPY {} FROM {} CREDENTIALS {} REGION {} JSON {};",
        schema.name,
        quote_literal(source_uri),
        quote_literal(&format!("aws_iam_role={}", role_arn)),
        quote_literal(region),
        format
    )
}

pub fn staging_events_copy(config: &DwhConfig) -> String {
    generate_copy(
        &STAGING_EVENTS,
        &config.s3.log_data,
        &config.iam_role.arn,
        &config.s3.region,
        JsonFormat::Paths(&config.s3.log_jsonpath),
    )
}

pub fn staging_songs_copy(config: &DwhConfig) -> String {
    generate_copy(
        &STAGING_SONGS,
        &config.s3.song_data,
        &config.iam_role.arn,
        &config.s3.region,
        JsonFormat::Auto,
    )
}
