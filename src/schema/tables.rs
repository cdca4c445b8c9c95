//! Table schema definitions for the staging tables and the star schema

use super::types::*;

// =============================================================================
// Staging Tables (filled by COPY, column names follow the source JSON)
// =============================================================================

pub static STAGING_EVENTS: TableSchema = TableSchema {
    name: "staging_events",
    role: TableRole::Staging,
    columns: &[
        Column::new("artist", ColumnType::VarcharMax),
        Column::new("auth", ColumnType::Varchar(25)),
        Column::new("firstName", ColumnType::Varchar(100)),
        Column::new("gender", ColumnType::Char(2)),
        Column::new("itemInSession", ColumnType::Integer),
        Column::new("lastName", ColumnType::Varchar(100)),
        Column::new("length", ColumnType::Float),
        Column::new("level", ColumnType::Varchar(25)),
        Column::new("location", ColumnType::VarcharMax),
        Column::new("method", ColumnType::Varchar(10)),
        Column::new("page", ColumnType::Varchar(30)),
        Column::new("registration", ColumnType::BigInt),
        Column::new("sessionId", ColumnType::BigInt),
        Column::new("song", ColumnType::VarcharMax),
        Column::new("status", ColumnType::Integer),
        Column::new("ts", ColumnType::BigInt),
        Column::new("userAgent", ColumnType::VarcharMax),
        Column::new("userId", ColumnType::BigInt),
    ],
};

pub static STAGING_SONGS: TableSchema = TableSchema {
    name: "staging_songs",
    role: TableRole::Staging,
    columns: &[
        Column::new("artist_id", ColumnType::Varchar(18)),
        Column::new("artist_latitude", ColumnType::Float),
        Column::new("artist_location", ColumnType::VarcharMax),
        Column::new("artist_longitude", ColumnType::Float),
        Column::new("artist_name", ColumnType::VarcharMax),
        Column::new("duration", ColumnType::Float),
        Column::new("num_songs", ColumnType::Integer),
        Column::new("song_id", ColumnType::Varchar(18)),
        Column::new("title", ColumnType::VarcharMax),
        Column::new("year", ColumnType::Integer),
    ],
};

// =============================================================================
// Fact Table
// =============================================================================

pub static SONGPLAYS: TableSchema = TableSchema {
    name: "songplays",
    role: TableRole::Fact,
    columns: &[
        Column::surrogate_key("songplay_id"),
        Column::required("start_time", ColumnType::Timestamp),
        Column::required("user_id", ColumnType::BigInt),
        Column::new("level", ColumnType::Varchar(25)),
        // Null when the event matched no staged song
        Column::new("song_id", ColumnType::Varchar(18)),
        Column::new("artist_id", ColumnType::Varchar(18)),
        Column::new("session_id", ColumnType::BigInt),
        Column::new("location", ColumnType::VarcharMax),
        Column::new("user_agent", ColumnType::VarcharMax),
    ],
};

// =============================================================================
// Dimension Tables
// =============================================================================

pub static USERS: TableSchema = TableSchema {
    name: "users",
    role: TableRole::Dimension,
    columns: &[
        Column::key("user_id", ColumnType::BigInt),
        Column::new("first_name", ColumnType::Varchar(100)),
        Column::new("last_name", ColumnType::Varchar(100)),
        Column::new("gender", ColumnType::Char(2)),
        Column::new("level", ColumnType::Varchar(25)),
    ],
};

pub static SONGS: TableSchema = TableSchema {
    name: "songs",
    role: TableRole::Dimension,
    columns: &[
        Column::key("song_id", ColumnType::Varchar(18)),
        Column::required("title", ColumnType::VarcharMax),
        Column::new("artist_id", ColumnType::Varchar(18)),
        Column::new("year", ColumnType::Integer),
        Column::required("duration", ColumnType::Float),
    ],
};

pub static ARTISTS: TableSchema = TableSchema {
    name: "artists",
    role: TableRole::Dimension,
    columns: &[
        Column::key("artist_id", ColumnType::Varchar(18)),
        Column::required("name", ColumnType::VarcharMax),
        Column::new("location", ColumnType::VarcharMax),
        Column::new("latitude", ColumnType::Float),
        Column::new("longitude", ColumnType::Float),
    ],
};

pub static TIME: TableSchema = TableSchema {
    name: "time",
    role: TableRole::Dimension,
    columns: &[
        Column::key("start_time", ColumnType::Timestamp),
        Column::new("hour", ColumnType::Integer),
        Column::new("day", ColumnType::Integer),
        Column::new("week", ColumnType::Integer),
        Column::new("month", ColumnType::Integer),
        Column::new("year", ColumnType::Integer),
        Column::new("weekday", ColumnType::Integer),
    ],
};

// =============================================================================
// Table Registry
// =============================================================================

/// All tables in drop/create order
pub static ALL_TABLES: &[&TableSchema] = &[
    &STAGING_EVENTS,
    &STAGING_SONGS,
    &SONGPLAYS,
    &USERS,
    &SONGS,
    &ARTISTS,
    &TIME,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn primary_key(table: &TableSchema) -> Option<&Column> {
        table.columns.iter().find(|c| c.primary_key)
    }

    #[test]
    fn test_table_order() {
        let names: Vec<_> = ALL_TABLES.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "staging_events",
                "staging_songs",
                "songplays",
                "users",
                "songs",
                "artists",
                "time"
            ]
        );
    }

    #[test]
    fn test_dimensions_keyed_by_natural_key() {
        let keys: Vec<_> = ALL_TABLES
            .iter()
            .filter(|t| t.role == TableRole::Dimension)
            .map(|t| (t.name, primary_key(t).map(|c| c.name)))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("users", Some("user_id")),
                ("songs", Some("song_id")),
                ("artists", Some("artist_id")),
                ("time", Some("start_time")),
            ]
        );
    }

    #[test]
    fn test_staging_tables_have_no_key() {
        assert!(primary_key(&STAGING_EVENTS).is_none());
        assert!(primary_key(&STAGING_SONGS).is_none());
    }

    #[test]
    fn test_fact_table_foreign_keys_nullable() {
        let nullable = |name: &str| {
            SONGPLAYS
                .columns
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.nullable)
                .unwrap()
        };

        assert!(primary_key(&SONGPLAYS).unwrap().identity);
        assert!(!nullable("start_time"));
        assert!(!nullable("user_id"));
        assert!(nullable("song_id"));
        assert!(nullable("artist_id"));
    }
}
