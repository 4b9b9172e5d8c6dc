use rusqlite::Connection;

use crate::error::Result;

const SCHEMA: &str = include_str!("schema.sql");

/// Create any missing tables and indexes. Safe to run on every open.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    tracing::debug!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(conn: &Connection) -> i32 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('members', 'workout_plans', 'payments', 'attendance')",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_schema_created_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(table_count(&conn), 4);
    }

    #[test]
    fn test_schema_init_keeps_existing_rows() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO workout_plans (plan_id, position, name, focus_area, exercises)
             VALUES ('P1', 0, 'Push', 'Upper body', '[]')",
            [],
        )
        .unwrap();

        init_schema(&conn).unwrap();

        let plans: i32 = conn
            .query_row("SELECT COUNT(*) FROM workout_plans", [], |row| row.get(0))
            .unwrap();
        assert_eq!(table_count(&conn), 4);
        assert_eq!(plans, 1);
    }
}
