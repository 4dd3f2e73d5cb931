//! SQLite-backed metrics store.
//!
//! One [`Store`] wraps one `rusqlite::Connection` and exposes typed
//! read/write operations for the five entities. The store owns no business
//! rules beyond referential checks; the aggregation engine, task lifecycle
//! manager, and insight pipeline compose these operations.
//!
//! Multi-query reads run under [`Store::with_snapshot`] so one aggregation
//! call observes a single consistent view of the database.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{ForgeError, Result};
use crate::types::{DoraMetric, Insight, Persona, Priority, Role, Task, TaskStatus, User};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    role        TEXT NOT NULL,
    department  TEXT NOT NULL DEFAULT '',
    manager_id  INTEGER REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS tasks (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id   INTEGER NOT NULL REFERENCES users(id),
    title     TEXT NOT NULL,
    deadline  TEXT NOT NULL,
    priority  TEXT NOT NULL DEFAULT 'Medium',
    status    TEXT NOT NULL DEFAULT 'Pending'
);

CREATE TABLE IF NOT EXISTS activities (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id  INTEGER NOT NULL REFERENCES users(id),
    type     TEXT NOT NULL,
    points   INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS dora_metrics (
    user_id              INTEGER PRIMARY KEY REFERENCES users(id),
    deployment_freq      REAL NOT NULL,
    lead_time            REAL NOT NULL,
    change_failure_rate  REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS ai_insights (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id),
    persona     TEXT NOT NULL,
    feedback    TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
";

// ---------------------------------------------------------------------------
// NewUser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub role: Role,
    pub department: String,
    pub manager_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the database at `path` and bootstrap the schema.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory store for tests and ephemeral runs.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Run `f` inside one read transaction so every query it issues sees
    /// the same committed state.
    pub fn with_snapshot<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let out = f(self);
        tx.commit()?;
        out
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Insert a user. A supplied `manager_id` must reference an existing
    /// user with role `Manager`; because users are insert-only the new row
    /// is always a leaf, so the hierarchy cannot form a cycle.
    pub fn insert_user(&self, new: NewUser) -> Result<User> {
        if new.name.trim().is_empty() {
            return Err(ForgeError::Validation("user name must not be empty".into()));
        }
        if let Some(mid) = new.manager_id {
            let manager = self.user(mid)?.ok_or(ForgeError::UserNotFound(mid))?;
            if manager.role != Role::Manager {
                return Err(ForgeError::Validation(format!(
                    "manager_id {mid} does not reference a Manager"
                )));
            }
        }
        self.conn.execute(
            "INSERT INTO users (name, role, department, manager_id) VALUES (?1, ?2, ?3, ?4)",
            params![new.name, new.role.as_str(), new.department, new.manager_id],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(User {
            id,
            name: new.name,
            role: new.role,
            department: new.department,
            manager_id: new.manager_id,
        })
    }

    pub fn user(&self, id: i64) -> Result<Option<User>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, role, department, manager_id FROM users WHERE id = ?1",
                params![id],
                user_columns,
            )
            .optional()?;
        row.map(user_from_columns).transpose()
    }

    /// Every user, ordered by display name (login/selection list).
    pub fn users_by_name(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, role, department, manager_id FROM users ORDER BY name, id",
        )?;
        let rows = stmt.query_map([], user_columns)?;
        collect_users(rows)
    }

    /// Direct reports of `manager_id`, ordered by user id ascending.
    pub fn direct_reports(&self, manager_id: i64) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, role, department, manager_id FROM users
             WHERE manager_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![manager_id], user_columns)?;
        collect_users(rows)
    }

    /// Every user with role `Employee`, ordered by user id ascending.
    pub fn employees(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, role, department, manager_id FROM users
             WHERE role = 'Employee' ORDER BY id",
        )?;
        let rows = stmt.query_map([], user_columns)?;
        collect_users(rows)
    }

    // -----------------------------------------------------------------------
    // Activities
    // -----------------------------------------------------------------------

    /// Append one point-earning event. Activities are immutable; there is
    /// deliberately no update or delete path.
    pub fn insert_activity(&self, user_id: i64, kind: &str, points: i64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO activities (user_id, type, points) VALUES (?1, ?2, ?3)",
            params![user_id, kind, points],
        )?;
        Ok(())
    }

    /// Aggregate score: exact sum of the user's activity points, zero when
    /// no activities exist. Never materialized as stored state.
    pub fn score_of(&self, user_id: i64) -> Result<i64> {
        let score = self.conn.query_row(
            "SELECT COALESCE(SUM(points), 0) FROM activities WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(score)
    }

    /// Count of activities of one type tag for a user.
    pub fn activity_count(&self, user_id: i64, kind: &str) -> Result<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM activities WHERE user_id = ?1 AND type = ?2",
            params![user_id, kind],
            |row| row.get(0),
        )?;
        Ok(n)
    }

    // -----------------------------------------------------------------------
    // DORA metrics
    // -----------------------------------------------------------------------

    /// Write the current snapshot for a user, replacing any prior one.
    pub fn upsert_dora(&self, user_id: i64, dora: &DoraMetric) -> Result<()> {
        self.conn.execute(
            "INSERT INTO dora_metrics (user_id, deployment_freq, lead_time, change_failure_rate)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                 deployment_freq = excluded.deployment_freq,
                 lead_time = excluded.lead_time,
                 change_failure_rate = excluded.change_failure_rate",
            params![
                user_id,
                dora.deployment_freq,
                dora.lead_time,
                dora.change_failure_rate
            ],
        )?;
        Ok(())
    }

    pub fn dora_of(&self, user_id: i64) -> Result<Option<DoraMetric>> {
        let row = self
            .conn
            .query_row(
                "SELECT deployment_freq, lead_time, change_failure_rate
                 FROM dora_metrics WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(DoraMetric {
                        deployment_freq: row.get(0)?,
                        lead_time: row.get(1)?,
                        change_failure_rate: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    pub fn insert_task(
        &self,
        user_id: i64,
        title: &str,
        deadline: &str,
        priority: Priority,
        status: TaskStatus,
    ) -> Result<Task> {
        self.conn.execute(
            "INSERT INTO tasks (user_id, title, deadline, priority, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![user_id, title, deadline, priority.as_str(), status.as_str()],
        )?;
        Ok(Task {
            id: self.conn.last_insert_rowid(),
            user_id,
            title: title.to_string(),
            deadline: deadline.to_string(),
            priority,
            status,
        })
    }

    pub fn task(&self, id: i64) -> Result<Option<Task>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, title, deadline, priority, status FROM tasks WHERE id = ?1",
                params![id],
                task_columns,
            )
            .optional()?;
        row.map(task_from_columns).transpose()
    }

    pub fn tasks_of(&self, user_id: i64) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, title, deadline, priority, status FROM tasks
             WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id], task_columns)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(task_from_columns(row?)?);
        }
        Ok(tasks)
    }

    pub fn update_task_status(&self, id: i64, status: TaskStatus) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(ForgeError::TaskNotFound(id));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Insights
    // -----------------------------------------------------------------------

    /// Append one classification result. Insights are never updated.
    pub fn insert_insight(
        &self,
        user_id: i64,
        persona: Persona,
        feedback: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Insight> {
        self.conn.execute(
            "INSERT INTO ai_insights (user_id, persona, feedback, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, persona.as_str(), feedback, created_at.to_rfc3339()],
        )?;
        Ok(Insight {
            id: self.conn.last_insert_rowid(),
            user_id,
            persona,
            feedback: feedback.to_string(),
            created_at,
        })
    }

    /// Most recent insight for a user, by `created_at` then row id.
    pub fn latest_insight_of(&self, user_id: i64) -> Result<Option<Insight>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, persona, feedback, created_at FROM ai_insights
                 WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
                params![user_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;
        let Some((id, user_id, persona, feedback, created_at)) = row else {
            return Ok(None);
        };
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| corrupt_column("ai_insights.created_at", &e.to_string()))?
            .with_timezone(&Utc);
        Ok(Some(Insight {
            id,
            user_id,
            // Personas are written via `Persona::as_str`, so any stored
            // label parses back into the closed set.
            persona: Persona::parse_label(&persona),
            feedback,
            created_at,
        }))
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

type UserColumns = (i64, String, String, String, Option<i64>);
type TaskColumns = (i64, i64, String, String, String, String);

fn user_columns(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn user_from_columns((id, name, role, department, manager_id): UserColumns) -> Result<User> {
    Ok(User {
        id,
        name,
        role: Role::from_str(&role).map_err(|_| corrupt_column("users.role", &role))?,
        department,
        manager_id,
    })
}

fn task_columns(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn task_from_columns(
    (id, user_id, title, deadline, priority, status): TaskColumns,
) -> Result<Task> {
    Ok(Task {
        id,
        user_id,
        title,
        deadline,
        priority: Priority::from_str(&priority)
            .map_err(|_| corrupt_column("tasks.priority", &priority))?,
        status: TaskStatus::from_str(&status)
            .map_err(|_| corrupt_column("tasks.status", &status))?,
    })
}

fn collect_users(
    rows: impl Iterator<Item = rusqlite::Result<UserColumns>>,
) -> Result<Vec<User>> {
    let mut users = Vec::new();
    for row in rows {
        users.push(user_from_columns(row?)?);
    }
    Ok(users)
}

fn corrupt_column(column: &str, value: &str) -> ForgeError {
    ForgeError::Store(format!("unexpected value in {column}: {value}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
