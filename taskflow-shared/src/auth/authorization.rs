/// Resource ownership checks
///
/// This module provides the ownership gate for task access. Tasks belong to
/// exactly one user; any read, update, or delete of a task by id must pass
/// through [`load_owned_task`], which loads the current record and compares
/// its owner against the authenticated identity before releasing it to the
/// caller.
///
/// # Disclosure model
///
/// The two failure modes are deliberately distinguishable:
///
/// - a task id with no record fails with [`TaskAccessError::NotFound`] (404)
/// - a task that exists but belongs to someone else fails with
///   [`TaskAccessError::NotOwner`] (403)
///
/// Existence of a task id may leak; its content and owner never do. Do not
/// collapse the two variants into one.
///
/// Listing endpoints never use this gate: they scope the SQL predicate to the
/// caller's `owner_id` at query construction (see
/// [`Task::list_by_owner`](crate::models::task::Task::list_by_owner)), so
/// non-owned rows are never materialized in the first place.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::auth::authorization::load_owned_task;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, task_id: Uuid, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// // Fails with NotFound or NotOwner before any task content is returned.
/// let task = load_owned_task(&pool, task_id, user_id).await?;
/// println!("Task title: {}", task.title);
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::Task;

/// Error type for ownership-gated task access
#[derive(Debug, thiserror::Error)]
pub enum TaskAccessError {
    /// No task exists with the requested id
    #[error("Task not found")]
    NotFound,

    /// The task exists but belongs to a different user
    #[error("Not authorized to access this task")]
    NotOwner,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Compares a task's recorded owner against the authenticated identity
///
/// Exact match on the unique user id; never by name or email.
///
/// # Errors
///
/// Returns `TaskAccessError::NotOwner` on mismatch
///
/// # Example
///
/// ```
/// use taskflow_shared::auth::authorization::require_owner;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// assert!(require_owner(owner, owner).is_ok());
/// assert!(require_owner(owner, Uuid::new_v4()).is_err());
/// ```
pub fn require_owner(owner_id: Uuid, user_id: Uuid) -> Result<(), TaskAccessError> {
    if owner_id != user_id {
        return Err(TaskAccessError::NotOwner);
    }

    Ok(())
}

/// Loads a task by id and enforces the ownership gate
///
/// The record is loaded by id alone (not pre-filtered by owner) so that a
/// missing record and a non-owned record produce distinct errors. The check
/// always runs against the current database row, never a cached copy, so a
/// task whose ownership context changed between requests is re-evaluated on
/// every call.
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `task_id` - Target task id
/// * `user_id` - Authenticated user id
///
/// # Errors
///
/// - `TaskAccessError::NotFound` if no task has this id
/// - `TaskAccessError::NotOwner` if the task belongs to another user
/// - `TaskAccessError::Database` on persistence failure
pub async fn load_owned_task(
    pool: &PgPool,
    task_id: Uuid,
    user_id: Uuid,
) -> Result<Task, TaskAccessError> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or(TaskAccessError::NotFound)?;

    require_owner(task.owner_id, user_id)?;

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_owner_match() {
        let id = Uuid::new_v4();
        assert!(require_owner(id, id).is_ok());
    }

    #[test]
    fn test_require_owner_mismatch() {
        let result = require_owner(Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(result, Err(TaskAccessError::NotOwner)));
    }

    #[test]
    fn test_not_found_and_not_owner_are_distinct() {
        // The two failure modes must stay distinguishable for the API layer.
        let not_found = TaskAccessError::NotFound;
        let not_owner = TaskAccessError::NotOwner;

        assert_ne!(not_found.to_string(), not_owner.to_string());
        assert!(matches!(not_found, TaskAccessError::NotFound));
        assert!(matches!(not_owner, TaskAccessError::NotOwner));
    }

    #[test]
    fn test_not_owner_message_reveals_no_content() {
        let msg = TaskAccessError::NotOwner.to_string();
        assert_eq!(msg, "Not authorized to access this task");
    }
}
