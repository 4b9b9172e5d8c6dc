mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction};

use super::Store;
use crate::codec::{self, GymSnapshot};
use crate::dates;
use crate::error::{GymError, Result};
use crate::manager::GymManager;
use crate::models::{Member, Payment, WorkoutPlan};

/// Keeps the snapshot in a SQLite database, one row per plan, member and
/// log entry.
///
/// `save` replaces everything in a single transaction, so readers never see
/// a half-written aggregate. Clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and bring its schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| GymError::persistence(parent, e))?;
        }
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn, Some(path))
    }

    pub fn open_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    fn read_snapshot(conn: &Connection) -> Result<GymSnapshot> {
        let mut stmt = conn.prepare(
            "SELECT plan_id, name, focus_area, exercises FROM workout_plans ORDER BY position",
        )?;
        let plan_rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut workout_plans = Vec::with_capacity(plan_rows.len());
        for (plan_id, name, focus_area, exercises_json) in plan_rows {
            workout_plans.push(WorkoutPlan {
                plan_id,
                name,
                focus_area,
                exercises: serde_json::from_str(&exercises_json)?,
            });
        }

        let mut stmt = conn.prepare(
            "SELECT member_id, name, age, join_date, workout_plan_id
             FROM members ORDER BY position",
        )?;
        let member_rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut payments = conn.prepare(
            "SELECT date, amount FROM payments WHERE member_id = ? ORDER BY seq",
        )?;
        let mut attendance =
            conn.prepare("SELECT date FROM attendance WHERE member_id = ? ORDER BY seq")?;

        let mut members = Vec::with_capacity(member_rows.len());
        for (member_id, name, age, join_date, workout_plan_id) in member_rows {
            let payment_history = payments
                .query_map([&member_id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?
                .into_iter()
                .map(|(date, amount)| {
                    Ok(Payment {
                        date: dates::parse_date(&date)?,
                        amount,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let attendance_log = attendance
                .query_map([&member_id], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?
                .iter()
                .map(|date| dates::parse_date(date))
                .collect::<Result<Vec<_>>>()?;

            members.push(Member {
                join_date: dates::parse_date(&join_date)?,
                member_id,
                name,
                age,
                workout_plan_id,
                payment_history,
                attendance_log,
            });
        }

        Ok(GymSnapshot {
            workout_plans,
            members,
        })
    }

    fn write_snapshot(tx: &Transaction<'_>, snapshot: &GymSnapshot) -> Result<()> {
        tx.execute_batch(
            "DELETE FROM attendance; DELETE FROM payments; DELETE FROM members; DELETE FROM workout_plans;",
        )?;

        for (position, plan) in snapshot.workout_plans.iter().enumerate() {
            tx.execute(
                "INSERT INTO workout_plans (plan_id, position, name, focus_area, exercises)
                 VALUES (?, ?, ?, ?, ?)",
                (
                    &plan.plan_id,
                    position as i64,
                    &plan.name,
                    &plan.focus_area,
                    serde_json::to_string(&plan.exercises)?,
                ),
            )?;
        }

        for (position, member) in snapshot.members.iter().enumerate() {
            tx.execute(
                "INSERT INTO members (member_id, position, name, age, join_date, workout_plan_id)
                 VALUES (?, ?, ?, ?, ?, ?)",
                (
                    &member.member_id,
                    position as i64,
                    &member.name,
                    member.age,
                    dates::format_date(member.join_date),
                    &member.workout_plan_id,
                ),
            )?;

            for (seq, payment) in member.payment_history.iter().enumerate() {
                tx.execute(
                    "INSERT INTO payments (member_id, seq, date, amount) VALUES (?, ?, ?, ?)",
                    (
                        &member.member_id,
                        seq as i64,
                        dates::format_date(payment.date),
                        payment.amount,
                    ),
                )?;
            }

            for (seq, date) in member.attendance_log.iter().enumerate() {
                tx.execute(
                    "INSERT INTO attendance (member_id, seq, date) VALUES (?, ?, ?)",
                    (&member.member_id, seq as i64, dates::format_date(*date)),
                )?;
            }
        }

        Ok(())
    }
}

impl Store for SqliteStore {
    fn load(&self) -> Result<GymManager> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let snapshot = Self::read_snapshot(&conn)?;
        tracing::info!(
            "Loaded {} workout plan(s) and {} member(s) from {}",
            snapshot.workout_plans.len(),
            snapshot.members.len(),
            self.location()
        );
        codec::decode(snapshot)
    }

    fn save(&self, manager: &GymManager) -> Result<()> {
        let snapshot = codec::encode(manager);
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let tx = conn.transaction()?;
        Self::write_snapshot(&tx, &snapshot)?;
        tx.commit()?;
        tracing::info!("Saved gym data to {}", self.location());
        Ok(())
    }

    fn location(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }
}
