//! Task lifecycle manager.
//!
//! Tasks move along a small forward-only state machine:
//!
//! ```text
//! Pending → InProgress → Completed
//! ```
//!
//! `Completed` is terminal. Re-applying `Completed` is an idempotent no-op;
//! every backward or sideways move is rejected before any write.

use crate::error::{ForgeError, Result};
use crate::store::Store;
use crate::types::{Priority, Task, TaskStatus};

#[derive(Debug, Clone)]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    pub deadline: String,
    pub priority: Option<Priority>,
}

/// Outcome of checking a requested transition against the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Advance,
    /// `Completed → Completed`: accepted without touching the store.
    Noop,
}

fn check_transition(from: TaskStatus, to: TaskStatus) -> Result<Transition> {
    if from == TaskStatus::Completed && to == TaskStatus::Completed {
        return Ok(Transition::Noop);
    }
    // Skipping forward (Pending → Completed) is a valid forward move.
    if to.rank() > from.rank() {
        return Ok(Transition::Advance);
    }
    Err(ForgeError::InvalidTransition { from, to })
}

/// Create a task for an existing user. Validation happens before any store
/// mutation; the new task always starts `Pending`.
pub fn create_task(store: &Store, new: NewTask) -> Result<Task> {
    if new.title.trim().is_empty() {
        return Err(ForgeError::Validation("task title must not be empty".into()));
    }
    if new.deadline.trim().is_empty() {
        return Err(ForgeError::Validation(
            "task deadline must not be empty".into(),
        ));
    }
    if store.user(new.user_id)?.is_none() {
        return Err(ForgeError::Validation(format!(
            "user {} does not exist",
            new.user_id
        )));
    }
    store.insert_task(
        new.user_id,
        &new.title,
        &new.deadline,
        new.priority.unwrap_or_default(),
        TaskStatus::Pending,
    )
}

/// Apply a status transition and return the resulting task.
pub fn set_status(store: &Store, task_id: i64, new_status: TaskStatus) -> Result<Task> {
    store.with_snapshot(|store| {
        let task = store
            .task(task_id)?
            .ok_or(ForgeError::TaskNotFound(task_id))?;

        match check_transition(task.status, new_status)? {
            Transition::Noop => Ok(task),
            Transition::Advance => {
                store.update_task_status(task_id, new_status)?;
                Ok(Task {
                    status: new_status,
                    ..task
                })
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewUser;
    use crate::types::Role;

    fn store_with_user() -> (Store, i64) {
        let store = Store::in_memory().unwrap();
        let user = store
            .insert_user(NewUser {
                name: "Ada".into(),
                role: Role::Employee,
                department: "Backend".into(),
                manager_id: None,
            })
            .unwrap();
        (store, user.id)
    }

    #[test]
    fn new_task_defaults_to_pending_medium() {
        let (store, user_id) = store_with_user();
        let task = create_task(
            &store,
            NewTask {
                user_id,
                title: "Fix bug".into(),
                deadline: "2025-01-10".into(),
                priority: None,
            },
        )
        .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn create_rejects_empty_fields_and_unknown_user() {
        let (store, user_id) = store_with_user();

        let err = create_task(
            &store,
            NewTask {
                user_id,
                title: "  ".into(),
                deadline: "2025-01-10".into(),
                priority: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ForgeError::Validation(_)));

        let err = create_task(
            &store,
            NewTask {
                user_id,
                title: "Fix bug".into(),
                deadline: "".into(),
                priority: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ForgeError::Validation(_)));

        let err = create_task(
            &store,
            NewTask {
                user_id: 404,
                title: "Fix bug".into(),
                deadline: "2025-01-10".into(),
                priority: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ForgeError::Validation(_)));
        assert!(store.tasks_of(user_id).unwrap().is_empty());
    }

    #[test]
    fn forward_transitions_are_accepted() {
        let (store, user_id) = store_with_user();
        let task = create_task(
            &store,
            NewTask {
                user_id,
                title: "Ship feature".into(),
                deadline: "2025-02-01".into(),
                priority: Some(Priority::High),
            },
        )
        .unwrap();

        let task = set_status(&store, task.id, TaskStatus::InProgress).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);

        let task = set_status(&store, task.id, TaskStatus::Completed).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn skipping_forward_is_allowed() {
        let (store, user_id) = store_with_user();
        let task = create_task(
            &store,
            NewTask {
                user_id,
                title: "Hotfix".into(),
                deadline: "2025-02-01".into(),
                priority: None,
            },
        )
        .unwrap();
        let task = set_status(&store, task.id, TaskStatus::Completed).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
    }

    #[test]
    fn completed_is_idempotent_and_terminal() {
        let (store, user_id) = store_with_user();
        let task = create_task(
            &store,
            NewTask {
                user_id,
                title: "Ship".into(),
                deadline: "2025-02-01".into(),
                priority: None,
            },
        )
        .unwrap();
        set_status(&store, task.id, TaskStatus::Completed).unwrap();

        // Idempotent re-apply.
        let again = set_status(&store, task.id, TaskStatus::Completed).unwrap();
        assert_eq!(again.status, TaskStatus::Completed);

        // Backward moves are rejected and leave the store untouched.
        let err = set_status(&store, task.id, TaskStatus::Pending).unwrap_err();
        assert!(matches!(
            err,
            ForgeError::InvalidTransition {
                from: TaskStatus::Completed,
                to: TaskStatus::Pending,
            }
        ));
        assert_eq!(
            store.task(task.id).unwrap().unwrap().status,
            TaskStatus::Completed
        );
    }

    #[test]
    fn backward_from_in_progress_is_rejected() {
        let (store, user_id) = store_with_user();
        let task = create_task(
            &store,
            NewTask {
                user_id,
                title: "Ship".into(),
                deadline: "2025-02-01".into(),
                priority: None,
            },
        )
        .unwrap();
        set_status(&store, task.id, TaskStatus::InProgress).unwrap();

        let err = set_status(&store, task.id, TaskStatus::Pending).unwrap_err();
        assert!(matches!(err, ForgeError::InvalidTransition { .. }));
    }

    #[test]
    fn unknown_task_is_not_found() {
        let (store, _) = store_with_user();
        let err = set_status(&store, 9000, TaskStatus::InProgress).unwrap_err();
        assert!(matches!(err, ForgeError::TaskNotFound(9000)));
    }
}
