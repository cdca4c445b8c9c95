//! Statements that fill the star schema from the staging tables.
//!
//! Every timestamp is derived from the event's epoch-millisecond `ts` with the
//! same expression, so each `songplays.start_time` has a matching `time` row.
//! `ts/1000` is integer division: sub-second precision is dropped.

/// Event timestamp as a warehouse TIMESTAMP
pub const START_TIME: &str = "TIMESTAMP 'epoch' + ts/1000 * interval '1 second'";

/// Only these events are song plays
pub const NEXT_SONG_FILTER: &str = "page = 'NextSong'";

/// Calendar parts stored in the time dimension, in column order
pub const TIME_PARTS: &[&str] = &["hour", "day", "week", "month", "year", "weekday"];

pub fn songplays_insert() -> String {
    format!(
        "INSERT INTO songplays (start_time, user_id, level, song_id, artist_id, session_id, location, user_agent)
SELECT {START_TIME} AS start_time,
    e.userId,
    e.level,
    s.song_id,
    s.artist_id,
    e.sessionId,
    e.location,
    e.userAgent
FROM staging_events e
LEFT JOIN staging_songs s
    ON e.song = s.title AND e.artist = s.artist_name AND e.length = s.duration
WHERE e.{NEXT_SONG_FILTER}"
    )
}

/// One row per user, taken from their most recent song play
pub fn users_insert() -> String {
    format!(
        "INSERT INTO users (user_id, first_name, last_name, gender, level)
SELECT userId, firstName, lastName, gender, level
FROM (
    SELECT ROW_NUMBER() OVER (PARTITION BY userId ORDER BY ts DESC) AS last_user_event,
        userId, firstName, lastName, gender, level
    FROM staging_events
    WHERE {NEXT_SONG_FILTER}
) AS latest
WHERE last_user_event = 1"
    )
}

pub fn songs_insert() -> String {
    "INSERT INTO songs (song_id, title, artist_id, year, duration)
SELECT DISTINCT song_id, title, artist_id, year, duration
FROM staging_songs"
        .to_string()
}

pub fn artists_insert() -> String {
    "INSERT INTO artists (artist_id, name, location, latitude, longitude)
SELECT DISTINCT artist_id, artist_name, artist_location, artist_latitude, artist_longitude
FROM staging_songs"
        .to_string()
}

pub fn time_insert() -> String {
    let parts: Vec<String> = TIME_PARTS
        .iter()
        .map(|part| format!("    DATE_PART({part}, {START_TIME}) AS {part}"))
        .collect();

    format!(
        "INSERT INTO time (start_time, {})
SELECT DISTINCT {START_TIME} AS start_time,
{}
FROM staging_events
WHERE {NEXT_SONG_FILTER}",
        TIME_PARTS.join(", "),
        parts.join(",\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_songplays_left_join_on_title_artist_duration() {
        let sql = songplays_insert();
        assert!(sql.contains("LEFT JOIN staging_songs s"));
        assert!(sql.contains("e.song = s.title AND e.artist = s.artist_name AND e.length = s.duration"));
        assert!(sql.contains("WHERE e.page = 'NextSong'"));
        assert!(sql.contains("TIMESTAMP 'epoch' + ts/1000 * interval '1 second' AS start_time"));
    }

    #[test]
    fn test_users_keeps_latest_event() {
        let sql = users_insert();
        assert!(sql.contains("ROW_NUMBER() OVER (PARTITION BY userId ORDER BY ts DESC)"));
        assert!(sql.contains("WHERE last_user_event = 1"));
        assert!(sql.contains("WHERE page = 'NextSong'"));
    }

    #[test]
    fn test_song_and_artist_dimensions_are_distinct_and_unfiltered() {
        for sql in [songs_insert(), artists_insert()] {
            assert!(sql.contains("SELECT DISTINCT"));
            assert!(!sql.contains("WHERE"));
        }
    }

    #[test]
    fn test_time_uses_same_timestamp_expression() {
        let sql = time_insert();
        assert!(sql.starts_with(
            "INSERT INTO time (start_time, hour, day, week, month, year, weekday)"
        ));
        assert!(sql.contains(&format!("SELECT DISTINCT {START_TIME} AS start_time")));
        assert!(sql.contains(&format!("DATE_PART(weekday, {START_TIME}) AS weekday")));
        assert_eq!(sql.matches(START_TIME).count(), 1 + TIME_PARTS.len());
        assert!(sql.ends_with("WHERE page = 'NextSong'"));
    }
}
