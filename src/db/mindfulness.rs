use crate::db::now;
use crate::models::{DailyHealthMetrics, MindfulnessEntry};
use crate::store::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// `logged_at` holds nanoseconds since the epoch, so entries read back
/// exactly as they were written.
pub fn add_entry(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
    entry: &MindfulnessEntry,
) -> Result<u64, StoreError> {
    let logged_at = entry
        .timestamp
        .timestamp_nanos_opt()
        .ok_or(StoreError::TimestampOutOfRange(entry.timestamp))?;
    conn.execute(
        "INSERT INTO mindfulness_entries (user_id, day, minutes, activity, logged_at, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
        rusqlite::params![
            user_id,
            date.format(DAY_FORMAT).to_string(),
            entry.minutes,
            entry.activity,
            logged_at,
            now()
        ],
    )?;

    Ok(conn.last_insert_rowid() as u64)
}

/// Entries for one day in the order they were logged.
pub fn load_entries(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
) -> Result<Vec<MindfulnessEntry>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT minutes, activity, logged_at FROM mindfulness_entries
         WHERE user_id = ? AND day = ? ORDER BY logged_at ASC, id ASC",
    )?;

    let entries = stmt
        .query_map(
            rusqlite::params![user_id, date.format(DAY_FORMAT).to_string()],
            |row| {
                let logged_at: i64 = row.get(2)?;
                Ok(MindfulnessEntry {
                    minutes: row.get(0)?,
                    activity: row.get(1)?,
                    timestamp: DateTime::<Utc>::from_timestamp_nanos(logged_at),
                })
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

pub fn load_daily_metrics(
    conn: &Connection,
    user_id: &str,
    date: NaiveDate,
) -> Result<Option<DailyHealthMetrics>, StoreError> {
    let entries = load_entries(conn, user_id, date)?;
    if entries.is_empty() {
        return Ok(None);
    }

    Ok(Some(DailyHealthMetrics {
        user_id: user_id.to_string(),
        date,
        mindfulness: entries,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;
    use chrono::TimeZone;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn entry(minutes: u32, activity: &str, hour: u32) -> MindfulnessEntry {
        MindfulnessEntry {
            minutes,
            activity: activity.to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_add_and_load_entries() {
        let conn = setup_db();
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        add_entry(&conn, "user-1", day, &entry(10, "breathing", 9)).unwrap();
        add_entry(&conn, "user-1", day, &entry(5, "body-scan", 18)).unwrap();

        let entries = load_entries(&conn, "user-1", day).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], entry(10, "breathing", 9));
        assert_eq!(entries[1].activity, "body-scan");
    }

    #[test]
    fn test_sub_millisecond_timestamp_round_trips() {
        let conn = setup_db();
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let mut precise = entry(10, "breathing", 9);
        precise.timestamp += chrono::Duration::nanoseconds(124_573_708);

        add_entry(&conn, "user-1", day, &precise).unwrap();
        assert_eq!(load_entries(&conn, "user-1", day).unwrap(), vec![precise]);
    }

    #[test]
    fn test_unrepresentable_timestamp_is_rejected() {
        let conn = setup_db();
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let mut far = entry(10, "breathing", 9);
        far.timestamp = Utc.with_ymd_and_hms(2300, 1, 1, 0, 0, 0).unwrap();

        assert!(matches!(
            add_entry(&conn, "user-1", day, &far),
            Err(StoreError::TimestampOutOfRange(_))
        ));
        assert!(load_entries(&conn, "user-1", day).unwrap().is_empty());
    }

    #[test]
    fn test_entries_are_ordered_by_timestamp() {
        let conn = setup_db();
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        add_entry(&conn, "user-1", day, &entry(20, "walking", 20)).unwrap();
        add_entry(&conn, "user-1", day, &entry(5, "breathing", 7)).unwrap();

        let entries = load_entries(&conn, "user-1", day).unwrap();
        assert_eq!(entries[0].minutes, 5);
        assert_eq!(entries[1].minutes, 20);
    }

    #[test]
    fn test_entries_are_scoped_by_user_and_day() {
        let conn = setup_db();
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let next_day = day.succ_opt().unwrap();

        add_entry(&conn, "user-1", day, &entry(10, "breathing", 9)).unwrap();
        add_entry(&conn, "user-2", day, &entry(30, "guided", 9)).unwrap();

        assert!(load_daily_metrics(&conn, "user-1", next_day).unwrap().is_none());
        let metrics = load_daily_metrics(&conn, "user-1", day).unwrap().unwrap();
        assert_eq!(metrics.mindfulness.len(), 1);
        assert_eq!(metrics.date, day);
        assert_eq!(load_entries(&conn, "user-2", day).unwrap()[0].minutes, 30);
        assert!(load_entries(&conn, "nobody", day).unwrap().is_empty());
    }
}
