/// Task model and database operations
///
/// This module provides the Task model, the core entity of TaskFlow. Every
/// task belongs to exactly one user; `owner_id` is set once at creation from
/// the authenticated identity and is never accepted as client input.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in-progress', 'completed');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(100) NOT NULL,
///     description VARCHAR(500),
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date TIMESTAMPTZ,
///     tags TEXT[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::models::task::{Task, CreateTask, TaskStatus, TaskPriority};
/// use taskflow_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     owner_id: Uuid::new_v4(),
///     title: "Ship release".to_string(),
///     description: None,
///     status: TaskStatus::Pending,
///     priority: TaskPriority::Medium,
///     due_date: None,
///     tags: vec!["work".to_string()],
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task has not been started
    #[default]
    Pending,

    /// Task is being worked on
    InProgress,

    /// Task is done
    Completed,
}

impl TaskStatus {
    /// Gets status as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority
    Low,

    /// Default priority
    #[default]
    Medium,

    /// High priority
    High,
}

impl TaskPriority {
    /// Gets priority as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Sort direction for task listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending
    Asc,

    /// Descending (default)
    #[default]
    Desc,
}

impl SortOrder {
    /// Gets the SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Task model representing a single user-owned task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning user ID
    ///
    /// Set exactly once at creation; immutable thereafter
    pub owner_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Ordered free-text tags
    pub tags: Vec<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// `owner_id` comes from the authenticated request context, never from the
/// request body.
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owning user ID (from the authenticated identity)
    pub owner_id: Uuid,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    pub status: TaskStatus,

    /// Priority (defaults to medium)
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Normalized tags
    pub tags: Vec<String>,
}

/// Input for updating an existing task
///
/// All fields are optional; only non-None fields are written. The owner is
/// not updatable: there is deliberately no `owner_id` field here.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// Replacement tag list (already normalized)
    pub tags: Option<Vec<String>>,
}

impl UpdateTask {
    /// Returns true if no field would be written
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
    }
}

/// Filters and ordering for task listing
///
/// The owner predicate is not part of the filter: it is a mandatory query
/// parameter of [`Task::list_by_owner`], so a listing query cannot be
/// constructed without owner scoping.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring matched against title OR description
    pub search: Option<String>,

    /// Exact status match
    pub status: Option<TaskStatus>,

    /// Exact priority match
    pub priority: Option<TaskPriority>,

    /// Requested sort field (wire name); resolved through [`sort_column`]
    pub sort_by: Option<String>,

    /// Sort direction (defaults to descending)
    pub order: SortOrder,
}

/// Resolves a client-supplied sort field to a column name
///
/// Only known columns are sortable; anything else falls back to
/// `created_at`. Client input is never interpolated into SQL directly.
///
/// # Example
///
/// ```
/// use taskflow_shared::models::task::sort_column;
///
/// assert_eq!(sort_column("dueDate"), "due_date");
/// assert_eq!(sort_column("title"), "title");
/// assert_eq!(sort_column("'; DROP TABLE tasks; --"), "created_at");
/// ```
pub fn sort_column(requested: &str) -> &'static str {
    match requested {
        "createdAt" | "created_at" => "created_at",
        "updatedAt" | "updated_at" => "updated_at",
        "dueDate" | "due_date" => "due_date",
        "title" => "title",
        "status" => "status",
        "priority" => "priority",
        _ => "created_at",
    }
}

/// Normalizes free-text tag input
///
/// Each entry is comma-split, trimmed, and empty pieces are dropped; order is
/// preserved. This accepts both `["work", "urgent"]` and the single-string
/// form `["work, urgent"]` and produces the same result.
///
/// # Example
///
/// ```
/// use taskflow_shared::models::task::normalize_tags;
///
/// let tags = normalize_tags(vec!["work, urgent".to_string(), " ".to_string()]);
/// assert_eq!(tags, vec!["work".to_string(), "urgent".to_string()]);
/// ```
pub fn normalize_tags(entries: Vec<String>) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

const TASK_COLUMNS: &str =
    "id, owner_id, title, description, status, priority, due_date, tags, created_at, updated_at";

/// Builds the owner-scoped listing query for a filter
///
/// `$1` is always the owner id; optional predicates take the following
/// placeholders in a fixed order (search, then status, then priority), and
/// [`Task::list_by_owner`] binds values in that same order. The ORDER BY
/// column goes through [`sort_column`], never raw client input.
fn build_list_query(filter: &TaskFilter) -> String {
    let mut query = format!("SELECT {} FROM tasks WHERE owner_id = $1", TASK_COLUMNS);
    let mut bind_count = 1;

    if filter.search.is_some() {
        bind_count += 1;
        query.push_str(&format!(
            " AND (title ILIKE ${n} OR description ILIKE ${n})",
            n = bind_count
        ));
    }
    if filter.status.is_some() {
        bind_count += 1;
        query.push_str(&format!(" AND status = ${}", bind_count));
    }
    if filter.priority.is_some() {
        bind_count += 1;
        query.push_str(&format!(" AND priority = ${}", bind_count));
    }

    let column = sort_column(filter.sort_by.as_deref().unwrap_or("createdAt"));
    query.push_str(&format!(" ORDER BY {} {}", column, filter.order.as_sql()));

    query
}

impl Task {
    /// Creates a new task in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key) or the
    /// database connection fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, title, description, status, priority, due_date, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, title, description, status, priority, due_date, tags,
                      created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.tags)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    ///
    /// Loads by id alone, without owner filtering: the ownership gate in
    /// [`crate::auth::authorization`] needs the record itself to distinguish
    /// "absent" from "exists but not yours".
    ///
    /// # Returns
    ///
    /// The task if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks for one owner with optional filters and ordering
    ///
    /// The query predicate is scoped to `owner_id` at construction time:
    /// rows belonging to other users are never fetched, so there is no
    /// post-filter step anywhere in the listing path.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `owner_id` - Authenticated user whose tasks to list
    /// * `filter` - Search/status/priority filters and sort settings
    ///
    /// # Returns
    ///
    /// Matching tasks, ordered by the resolved sort column (default:
    /// creation time, descending)
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = build_list_query(filter);

        // Bind order mirrors the clause order in build_list_query.
        let mut q = sqlx::query_as::<_, Task>(&query).bind(owner_id);

        if let Some(ref search) = filter.search {
            q = q.bind(format!("%{}%", search));
        }
        if let Some(status) = filter.status {
            q = q.bind(status);
        }
        if let Some(priority) = filter.priority {
            q = q.bind(priority);
        }

        let tasks = q.fetch_all(pool).await?;

        Ok(tasks)
    }

    /// Updates an existing task
    ///
    /// Only non-None fields in `data` are written; `updated_at` is set
    /// automatically. Callers must have passed the ownership gate first;
    /// this method itself cannot change the owner.
    ///
    /// # Returns
    ///
    /// The updated task if found, None if the task no longer exists
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.tags.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tags = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 RETURNING {}",
            TASK_COLUMNS
        ));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(tags) = data.tags {
            q = q.bind(tags);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Callers must have passed the ownership gate first.
    ///
    /// # Returns
    ///
    /// True if a task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert_eq!(TaskStatus::Completed.as_str(), "completed");

        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let parsed: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }

    #[test]
    fn test_priority_wire_format() {
        let json = serde_json::to_string(&TaskPriority::High).unwrap();
        assert_eq!(json, "\"high\"");

        let parsed: TaskPriority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(parsed, TaskPriority::Low);
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        let parsed: Result<TaskStatus, _> = serde_json::from_str("\"archived\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_sort_order_default_and_sql() {
        assert_eq!(SortOrder::default(), SortOrder::Desc);
        assert_eq!(SortOrder::Asc.as_sql(), "ASC");
        assert_eq!(SortOrder::Desc.as_sql(), "DESC");
    }

    #[test]
    fn test_sort_column_allow_list() {
        assert_eq!(sort_column("createdAt"), "created_at");
        assert_eq!(sort_column("updatedAt"), "updated_at");
        assert_eq!(sort_column("dueDate"), "due_date");
        assert_eq!(sort_column("due_date"), "due_date");
        assert_eq!(sort_column("title"), "title");
        assert_eq!(sort_column("status"), "status");
        assert_eq!(sort_column("priority"), "priority");
    }

    #[test]
    fn test_sort_column_rejects_unknown_fields() {
        assert_eq!(sort_column("owner_id"), "created_at");
        assert_eq!(sort_column("password_hash"), "created_at");
        assert_eq!(sort_column("created_at; DROP TABLE tasks"), "created_at");
        assert_eq!(sort_column(""), "created_at");
    }

    fn filter() -> TaskFilter {
        TaskFilter {
            search: None,
            status: None,
            priority: None,
            sort_by: None,
            order: SortOrder::default(),
        }
    }

    #[test]
    fn test_list_query_unfiltered_scopes_to_owner() {
        let query = build_list_query(&filter());

        assert!(query.contains("WHERE owner_id = $1"));
        assert!(!query.contains("$2"));
        assert!(query.ends_with("ORDER BY created_at DESC"));
    }

    #[test]
    fn test_list_query_search_matches_title_or_description() {
        let query = build_list_query(&TaskFilter {
            search: Some("report".to_string()),
            ..filter()
        });

        assert!(query.contains("WHERE owner_id = $1"));
        assert!(query.contains("(title ILIKE $2 OR description ILIKE $2)"));
        assert!(!query.contains("$3"));
    }

    #[test]
    fn test_list_query_status_only() {
        let query = build_list_query(&TaskFilter {
            status: Some(TaskStatus::Completed),
            ..filter()
        });

        assert!(query.contains("status = $2"));
        assert!(!query.contains("$3"));
    }

    #[test]
    fn test_list_query_priority_only() {
        let query = build_list_query(&TaskFilter {
            priority: Some(TaskPriority::High),
            ..filter()
        });

        assert!(query.contains("priority = $2"));
        assert!(!query.contains("$3"));
    }

    #[test]
    fn test_list_query_all_filters_number_placeholders_in_bind_order() {
        let query = build_list_query(&TaskFilter {
            search: Some("report".to_string()),
            status: Some(TaskStatus::Pending),
            priority: Some(TaskPriority::Low),
            ..filter()
        });

        assert!(query.contains("(title ILIKE $2 OR description ILIKE $2)"));
        assert!(query.contains("status = $3"));
        assert!(query.contains("priority = $4"));
        assert!(!query.contains("$5"));
    }

    #[test]
    fn test_list_query_owner_predicate_precedes_filters() {
        let query = build_list_query(&TaskFilter {
            search: Some("report".to_string()),
            status: Some(TaskStatus::Pending),
            ..filter()
        });

        let owner = query.find("owner_id = $1").unwrap();
        let search = query.find("title ILIKE").unwrap();
        let status = query.find("status = $3").unwrap();
        assert!(owner < search);
        assert!(search < status);
    }

    #[test]
    fn test_list_query_sort_goes_through_allow_list() {
        let query = build_list_query(&TaskFilter {
            sort_by: Some("dueDate".to_string()),
            order: SortOrder::Asc,
            ..filter()
        });
        assert!(query.ends_with("ORDER BY due_date ASC"));

        // Unknown fields fall back to creation time, never raw input.
        let query = build_list_query(&TaskFilter {
            sort_by: Some("owner_id; DROP TABLE tasks".to_string()),
            ..filter()
        });
        assert!(query.ends_with("ORDER BY created_at DESC"));
        assert!(!query.contains("DROP TABLE"));
    }

    #[test]
    fn test_normalize_tags_comma_string() {
        let tags = normalize_tags(vec!["work, urgent".to_string()]);
        assert_eq!(tags, vec!["work".to_string(), "urgent".to_string()]);
    }

    #[test]
    fn test_normalize_tags_list_passthrough() {
        let tags = normalize_tags(vec!["work".to_string(), "urgent".to_string()]);
        assert_eq!(tags, vec!["work".to_string(), "urgent".to_string()]);
    }

    #[test]
    fn test_normalize_tags_drops_empty_and_preserves_order() {
        let tags = normalize_tags(vec![
            "  b , a".to_string(),
            "".to_string(),
            " , ,c ".to_string(),
        ]);
        assert_eq!(
            tags,
            vec!["b".to_string(), "a".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_update_task_default_is_empty() {
        let update = UpdateTask::default();
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_task_has_no_owner_field() {
        // Owner immutability is structural: UpdateTask carries no owner_id.
        let update = UpdateTask {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Ship release".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            tags: vec!["work".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json: serde_json::Value = serde_json::to_value(&task).unwrap();
        assert!(json.get("ownerId").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "pending");
        assert_eq!(json["priority"], "medium");
    }

    // Integration tests for database operations require a running database
}
