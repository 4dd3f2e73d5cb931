use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Manager,
    Employee,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "Manager",
            Role::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Manager" => Ok(Role::Manager),
            "Employee" => Ok(Role::Employee),
            _ => Err(crate::error::ForgeError::Validation(format!(
                "unknown role: {s}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::error::ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            "Critical" => Ok(Priority::Critical),
            _ => Err(crate::error::ForgeError::Validation(format!(
                "unknown priority: {s}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Position along the forward chain `Pending → InProgress → Completed`.
    pub fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::error::ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "InProgress" => Ok(TaskStatus::InProgress),
            "Completed" => Ok(TaskStatus::Completed),
            _ => Err(crate::error::ForgeError::Validation(format!(
                "unknown task status: {s}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Persona
// ---------------------------------------------------------------------------

/// Closed-set narrative classification assigned by the insight pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    Architect,
    Speedster,
    Guardian,
    Rookie,
    Unknown,
}

impl Persona {
    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Architect => "Architect",
            Persona::Speedster => "Speedster",
            Persona::Guardian => "Guardian",
            Persona::Rookie => "Rookie",
            Persona::Unknown => "Unknown",
        }
    }

    /// Lenient match for labels coming back from the classifier.
    ///
    /// The prompt offers personas like "The Architect"; models echo them
    /// with or without the article and in varying case. Anything outside
    /// the closed set maps to `Unknown`.
    pub fn parse_label(label: &str) -> Persona {
        let trimmed = label.trim();
        let bare = trimmed
            .strip_prefix("The ")
            .or_else(|| trimmed.strip_prefix("the "))
            .unwrap_or(trimmed);
        match bare.to_ascii_lowercase().as_str() {
            "architect" => Persona::Architect,
            "speedster" => Persona::Speedster,
            "guardian" => Persona::Guardian,
            "rookie" => Persona::Rookie,
            _ => Persona::Unknown,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Badge
// ---------------------------------------------------------------------------

/// Achievement tier unlocked once an aggregate score crosses its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    Novice,
    CodeNinja,
    Architect,
    Grandmaster,
}

impl Badge {
    pub fn all() -> &'static [Badge] {
        &[
            Badge::Novice,
            Badge::CodeNinja,
            Badge::Architect,
            Badge::Grandmaster,
        ]
    }

    /// Minimum aggregate score required to unlock this badge.
    pub fn threshold(self) -> i64 {
        match self {
            Badge::Novice => 0,
            Badge::CodeNinja => 500,
            Badge::Architect => 1000,
            Badge::Grandmaster => 2000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Badge::Novice => "Novice",
            Badge::CodeNinja => "Code Ninja",
            Badge::Architect => "Architect",
            Badge::Grandmaster => "Grandmaster",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub department: String,
    pub manager_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub deadline: String,
    pub priority: Priority,
    pub status: TaskStatus,
}

/// Per-user delivery-performance snapshot. One current row per user;
/// a new write overwrites the previous snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoraMetric {
    pub deployment_freq: f64,
    pub lead_time: f64,
    pub change_failure_rate: f64,
}

/// One persisted output of the insight classification pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: i64,
    pub user_id: i64,
    pub persona: Persona,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
