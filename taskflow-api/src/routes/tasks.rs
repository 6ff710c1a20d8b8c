/// Task endpoints
///
/// Owner-scoped task CRUD. The listing endpoint filters by the authenticated
/// owner inside the SQL predicate; the by-id endpoints go through the
/// ownership gate in `taskflow_shared::auth::authorization`, which yields
/// 404 for a missing task and 403 for a task owned by someone else.
///
/// # Endpoints
///
/// - `GET    /tasks`     - List the caller's tasks (search/filter/sort)
/// - `POST   /tasks`     - Create a task owned by the caller
/// - `GET    /tasks/:id` - Fetch one task (ownership gated)
/// - `PUT    /tasks/:id` - Update one task (ownership gated)
/// - `DELETE /tasks/:id` - Delete one task (ownership gated)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskflow_shared::{
    auth::{authorization::load_owned_task, middleware::AuthContext},
    models::task::{
        normalize_tags, CreateTask, SortOrder, Task, TaskFilter, TaskPriority, TaskStatus,
        UpdateTask,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Task list query parameters
#[derive(Debug, Deserialize, Default)]
pub struct ListTasksQuery {
    /// Case-insensitive substring matched against title or description
    pub search: Option<String>,

    /// Exact status filter
    pub status: Option<TaskStatus>,

    /// Exact priority filter
    pub priority: Option<TaskPriority>,

    /// Sort field (createdAt, updatedAt, dueDate, title, status, priority)
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,

    /// Sort direction (asc or desc, default desc)
    pub order: Option<SortOrder>,
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    /// Number of tasks returned
    pub count: usize,

    /// The caller's matching tasks
    pub tasks: Vec<Task>,
}

/// Single task response wrapper
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// The task
    pub task: Task,
}

/// Deletion confirmation
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Confirmation message
    pub message: String,
}

/// Tag input shape
///
/// Accepts either a list of tags or a single comma-separated string;
/// both are run through [`normalize_tags`], so `"work, urgent"` and
/// `["work", "urgent"]` produce the same stored value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    /// Single comma-separated string
    One(String),

    /// List of tags
    Many(Vec<String>),
}

impl TagsInput {
    fn into_entries(self) -> Vec<String> {
        match self {
            TagsInput::One(s) => vec![s],
            TagsInput::Many(v) => v,
        }
    }
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title
    #[validate(length(min = 3, max = 100, message = "Title must be 3-100 characters"))]
    pub title: String,

    /// Optional description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// Initial status (defaults to pending)
    pub status: Option<TaskStatus>,

    /// Priority (defaults to medium)
    pub priority: Option<TaskPriority>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Free-text tags; comma-separated entries are split
    pub tags: Option<TagsInput>,
}

/// Update task request
///
/// All fields optional; absent fields are left unchanged. There is no owner
/// field: ownership never changes after creation.
#[derive(Debug, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 3, max = 100, message = "Title must be 3-100 characters"))]
    pub title: Option<String>,

    /// New description
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date
    pub due_date: Option<DateTime<Utc>>,

    /// Replacement tag list
    pub tags: Option<TagsInput>,
}

/// Lists the authenticated user's tasks
///
/// Filters and sorting apply within the caller's own tasks only; the owner
/// predicate is part of the query itself, so no other user's rows are ever
/// fetched. An empty result is a normal 200 with an empty list.
///
/// # Errors
///
/// - `400 Bad Request`: Unparseable query parameter (e.g. unknown status)
/// - `401 Unauthorized`: Missing or invalid token (rejected by middleware)
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let filter = TaskFilter {
        search: query.search,
        status: query.status,
        priority: query.priority,
        sort_by: query.sort_by,
        order: query.order.unwrap_or_default(),
    };

    let tasks = Task::list_by_owner(&state.db, auth.user_id, &filter).await?;

    Ok(Json(TaskListResponse {
        count: tasks.len(),
        tasks,
    }))
}

/// Creates a task owned by the authenticated user
///
/// The owner is taken from the auth context; a caller cannot create a task
/// on behalf of someone else.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token (rejected by middleware)
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            owner_id: auth.user_id,
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_default(),
            priority: req.priority.unwrap_or_default(),
            due_date: req.due_date,
            tags: normalize_tags(req.tags.map(TagsInput::into_entries).unwrap_or_default()),
        },
    )
    .await?;

    tracing::debug!(task_id = %task.id, owner_id = %task.owner_id, "task created");

    Ok((StatusCode::CREATED, Json(TaskResponse { task })))
}

/// Fetches a single task by id
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token (rejected by middleware)
/// - `404 Not Found`: No task has this id
/// - `403 Forbidden`: The task belongs to another user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = load_owned_task(&state.db, task_id, auth.user_id).await?;

    Ok(Json(TaskResponse { task }))
}

/// Updates a single task by id
///
/// The ownership gate runs against the current database record before any
/// write. Concurrent updates are last-writer-wins at the field level.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token (rejected by middleware)
/// - `404 Not Found`: No task has this id
/// - `403 Forbidden`: The task belongs to another user
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    req.validate()?;

    // Gate first: 404/403 take precedence over any write.
    load_owned_task(&state.db, task_id, auth.user_id).await?;

    let update = UpdateTask {
        title: req.title,
        description: req.description,
        status: req.status,
        priority: req.priority,
        due_date: req.due_date,
        tags: req.tags.map(|t| normalize_tags(t.into_entries())),
    };

    let task = Task::update(&state.db, task_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::debug!(task_id = %task.id, "task updated");

    Ok(Json(TaskResponse { task }))
}

/// Deletes a single task by id
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token (rejected by middleware)
/// - `404 Not Found`: No task has this id
/// - `403 Forbidden`: The task belongs to another user
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    load_owned_task(&state.db, task_id, auth.user_id).await?;

    let deleted = Task::delete(&state.db, task_id).await?;
    if !deleted {
        // Removed between the gate and the delete
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::debug!(task_id = %task_id, "task deleted");

    Ok(Json(DeleteResponse {
        message: "Task deleted".to_string(),
    }))
}
