//! Every SQL statement the pipeline runs, grouped and ordered.

pub mod copy;
pub mod schema_gen;
pub mod transform;

use std::fmt;

use crate::config::DwhConfig;
use crate::schema::{
    TableSchema, ALL_TABLES, ARTISTS, SONGPLAYS, SONGS, STAGING_EVENTS, STAGING_SONGS, TIME, USERS,
};
use schema_gen::{generate_create_table, generate_drop_table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Drop,
    Create,
    Copy,
    Insert,
}

impl StatementKind {
    fn suffix(&self) -> &'static str {
        match self {
            StatementKind::Drop => "drop",
            StatementKind::Create => "create",
            StatementKind::Copy => "copy",
            StatementKind::Insert => "insert",
        }
    }
}

/// A named SQL statement targeting one table
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// `<table>_<kind>`, e.g. `staging_events_copy`
    pub name: String,
    pub table: &'static str,
    pub kind: StatementKind,
    pub sql: String,
}

impl Statement {
    pub fn new(table: &TableSchema, kind: StatementKind, sql: String) -> Self {
        Self {
            name: format!("{}_{}", table.name, kind.suffix()),
            table: table.name,
            kind,
            sql,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The four statement groups, built once from configuration
#[derive(Debug, Clone)]
pub struct Catalog {
    drop: Vec<Statement>,
    create: Vec<Statement>,
    copy: Vec<Statement>,
    insert: Vec<Statement>,
}

impl Catalog {
    pub fn new(config: &DwhConfig) -> Self {
        let drop = ALL_TABLES
            .iter()
            .map(|t| Statement::new(t, StatementKind::Drop, generate_drop_table(t)))
            .collect();

        let create = ALL_TABLES
            .iter()
            .map(|t| Statement::new(t, StatementKind::Create, generate_create_table(t)))
            .collect();

        let copy = vec![
            Statement::new(&STAGING_EVENTS, StatementKind::Copy, copy::staging_events_copy(config)),
            Statement::new(&STAGING_SONGS, StatementKind::Copy, copy::staging_songs_copy(config)),
        ];

        let insert = vec![
            Statement::new(&SONGPLAYS, StatementKind::Insert, transform::songplays_insert()),
            Statement::new(&USERS, StatementKind::Insert, transform::users_insert()),
            Statement::new(&SONGS, StatementKind::Insert, transform::songs_insert()),
            Statement::new(&ARTISTS, StatementKind::Insert, transform::artists_insert()),
            Statement::new(&TIME, StatementKind::Insert, transform::time_insert()),
        ];

        Self {
            drop,
            create,
            copy,
            insert,
        }
    }

    pub fn drop_table_statements(&self) -> &[Statement] {
        &self.drop
    }

    pub fn create_table_statements(&self) -> &[Statement] {
        &self.create
    }

    pub fn copy_table_statements(&self) -> &[Statement] {
        &self.copy
    }

    pub fn insert_table_statements(&self) -> &[Statement] {
        &self.insert
    }

    /// Groups in execution order, labelled
    pub fn groups(&self) -> [(&'static str, &[Statement]); 4] {
        [
            ("drop", self.drop.as_slice()),
            ("create", self.create.as_slice()),
            ("copy", self.copy.as_slice()),
            ("insert", self.insert.as_slice()),
        ]
    }

    /// Look up a statement by name across all groups
    pub fn find(&self, name: &str) -> Option<&Statement> {
        self.groups()
            .into_iter()
            .flat_map(|(_, statements)| statements.iter())
            .find(|s| s.name == name)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{ClusterConfig, IamRoleConfig, S3Config, SslMode};

    pub(crate) fn test_config() -> DwhConfig {
        DwhConfig {
            cluster: ClusterConfig {
                host: "localhost".into(),
                db_name: "dwh".into(),
                db_user: "dwhuser".into(),
                db_password: "secret".into(),
                db_port: 5439,
                sslmode: SslMode::Prefer,
            },
            iam_role: IamRoleConfig {
                arn: "arn:aws:iam::123456789012:role/dwhRole".into(),
            },
            s3: S3Config {
                log_data: "s3://udacity-dend/log_data".into(),
                log_jsonpath: "s3://udacity-dend/log_json_path.json".into(),
                song_data: "s3://udacity-dend/song_data".into(),
                region: "us-west-2".into(),
            },
        }
    }

    fn names(statements: &[Statement]) -> Vec<&str> {
        statements.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_group_sizes_and_order() {
        let catalog = Catalog::new(&test_config());

        assert_eq!(catalog.drop_table_statements().len(), 7);
        assert_eq!(catalog.create_table_statements().len(), 7);
        assert_eq!(
            names(catalog.copy_table_statements()),
            vec!["staging_events_copy", "staging_songs_copy"]
        );
        assert_eq!(
            names(catalog.insert_table_statements()),
            vec![
                "songplays_insert",
                "users_insert",
                "songs_insert",
                "artists_insert",
                "time_insert"
            ]
        );
    }

    #[test]
    fn test_drops_are_idempotent() {
        let catalog = Catalog::new(&test_config());
        for statement in catalog.drop_table_statements() {
            assert_eq!(statement.kind, StatementKind::Drop);
            assert!(statement.sql.starts_with("DROP TABLE IF EXISTS "));
        }
    }

    #[test]
    fn test_copy_uses_config() {
        let catalog = Catalog::new(&test_config());
        let events = catalog.find("staging_events_copy").unwrap();
        assert_eq!(
            events.sql,
            "COPY staging_events FROM 's3://udacity-dend/log_data' \
             CREDENTIALS 'aws_iam_role=arn:aws:iam::123456789012:role/dwhRole' \
             REGION 'us-west-2' JSON 's3://udacity-dend/log_json_path.json';"
        );

        let songs = catalog.find("staging_songs_copy").unwrap();
        assert!(songs.sql.ends_with("JSON 'auto';"));
    }

    #[test]
    fn test_copy_region_defaults_to_us_west_2() {
        let config: DwhConfig = toml::from_str(
            r#"
[cluster]
host = "localhost"
db_name = "dwh"
db_user = "dwhuser"
db_password = "secret"

[iam_role]
arn = "arn:aws:iam::123456789012:role/dwhRole"

[s3]
log_data = "s3://udacity-dend/log_data"
log_jsonpath = "s3://udacity-dend/log_json_path.json"
song_data = "s3://udacity-dend/song_data"
"#,
        )
        .unwrap();

        let catalog = Catalog::new(&config);
        for statement in catalog.copy_table_statements() {
            assert!(
                statement.sql.contains(" REGION 'us-west-2' JSON "),
                "{}",
                statement.sql
            );
        }
    }

    #[test]
    fn test_find_unknown() {
        let catalog = Catalog::new(&test_config());
        assert!(catalog.find("nonexistent").is_none());
        assert_eq!(catalog.find("time_create").unwrap().table, "time");
    }
}
