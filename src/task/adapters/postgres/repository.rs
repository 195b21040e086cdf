//! `PostgreSQL` repository implementation for task persistence.

use super::{
    models::{CommentRow, NewCommentRow, NewTaskLogRow, NewTaskRow, TaskLogRow, TaskRow,
        TaskRowChanges},
    schema::{comments, task_logs, tasks},
};
use crate::directory::domain::{Actor, TeamId, UserId};
use crate::task::{
    domain::{
        CategoryId, Comment, CommentId, PersistedCommentData, PersistedTaskData,
        PersistedTaskLogData, PriorityValue, StatusValue, Task, TaskChanges, TaskId, TaskLogEntry,
        TaskLogId, TaskScope, TrackedField, UpdatePlan,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// `apply_update` plans the change set against the row read inside a
/// transaction, so the audit snapshot, the audit-entry writes, and the
/// task update commit or roll back together.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn apply_update(
        &self,
        id: TaskId,
        changes: TaskChanges,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<UpdatePlan> {
        self.run_blocking(move |connection| {
            connection.transaction::<UpdatePlan, TaskRepositoryError, _>(|txn| {
                let row = tasks::table
                    .find(id.into_inner())
                    .select(TaskRow::as_select())
                    .first::<TaskRow>(txn)
                    .optional()?
                    .ok_or(TaskRepositoryError::NotFound(id))?;
                let current = row_to_task(row)?;

                let plan = current.plan_update(&changes, &actor, now)?;

                diesel::update(tasks::table.find(id.into_inner()))
                    .set(to_changeset(plan.task()))
                    .execute(txn)?;

                let log_rows: Vec<NewTaskLogRow> =
                    plan.log_entries().iter().map(log_to_new_row).collect();
                if !log_rows.is_empty() {
                    diesel::insert_into(task_logs::table)
                        .values(&log_rows)
                        .execute(txn)?;
                }

                Ok(plan)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, scope: TaskScope) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let query = tasks::table
                .select(TaskRow::as_select())
                .order(tasks::created_at.desc())
                .into_boxed();
            let rows = match scope {
                TaskScope::All => query.load::<TaskRow>(connection)?,
                TaskScope::Team(team) => query
                    .filter(tasks::team_id.eq(team.into_inner()))
                    .load::<TaskRow>(connection)?,
                TaskScope::Assignee(user) => query
                    .filter(tasks::assigned_to.eq(user.into_inner()))
                    .load::<TaskRow>(connection)?,
                TaskScope::Nothing => Vec::new(),
            };
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            connection.transaction::<(), TaskRepositoryError, _>(|txn| {
                // Cascade: the task owns its comments and audit entries.
                diesel::delete(comments::table.filter(comments::task_id.eq(id.into_inner())))
                    .execute(txn)?;
                diesel::delete(task_logs::table.filter(task_logs::task_id.eq(id.into_inner())))
                    .execute(txn)?;
                let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(txn)?;
                if deleted == 0 {
                    return Err(TaskRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn insert_comment(&self, comment: &Comment) -> TaskRepositoryResult<()> {
        let new_row = comment_to_new_row(comment);
        let task_id = comment.task_id();

        self.run_blocking(move |connection| {
            connection.transaction::<(), TaskRepositoryError, _>(|txn| {
                let exists = tasks::table
                    .find(task_id.into_inner())
                    .select(tasks::id)
                    .first::<uuid::Uuid>(txn)
                    .optional()?;
                if exists.is_none() {
                    return Err(TaskRepositoryError::NotFound(task_id));
                }
                diesel::insert_into(comments::table)
                    .values(&new_row)
                    .execute(txn)?;
                Ok(())
            })
        })
        .await
    }

    async fn comments_for(&self, task: TaskId) -> TaskRepositoryResult<Vec<Comment>> {
        self.run_blocking(move |connection| {
            let rows = comments::table
                .filter(comments::task_id.eq(task.into_inner()))
                .select(CommentRow::as_select())
                .order(comments::created_at.asc())
                .load::<CommentRow>(connection)?;
            Ok(rows.into_iter().map(row_to_comment).collect())
        })
        .await
    }

    async fn logs_for(&self, task: TaskId) -> TaskRepositoryResult<Vec<TaskLogEntry>> {
        self.run_blocking(move |connection| {
            let rows = task_logs::table
                .filter(task_logs::task_id.eq(task.into_inner()))
                .select(TaskLogRow::as_select())
                .order(task_logs::created_at.asc())
                .load::<TaskLogRow>(connection)?;
            rows.into_iter().map(row_to_log).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        assigned_to: task.assigned_to().into_inner(),
        team_id: task.team().into_inner(),
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        completed: task.completed(),
        category_id: task.category().map(CategoryId::into_inner),
        created_at: task.created_at(),
    }
}

fn to_changeset(task: &Task) -> TaskRowChanges {
    TaskRowChanges {
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        assigned_to: task.assigned_to().into_inner(),
        team_id: task.team().into_inner(),
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        completed: task.completed(),
        category_id: task.category().map(CategoryId::into_inner),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let status = StatusValue::new(row.status)?;
    let priority = PriorityValue::new(row.priority)?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        assigned_to: UserId::from_uuid(row.assigned_to),
        team: TeamId::from_uuid(row.team_id),
        due_date: row.due_date,
        status,
        priority,
        completed: row.completed,
        category: row.category_id.map(CategoryId::from_uuid),
        created_at: row.created_at,
    }))
}

fn log_to_new_row(entry: &TaskLogEntry) -> NewTaskLogRow {
    NewTaskLogRow {
        id: entry.id().into_inner(),
        task_id: entry.task_id().into_inner(),
        change_type: entry.change_type().as_str().to_owned(),
        old_value: entry.old_value().to_owned(),
        new_value: entry.new_value().to_owned(),
        acting_user: entry.acting_user().map(UserId::into_inner),
        created_at: entry.created_at(),
    }
}

fn row_to_log(row: TaskLogRow) -> TaskRepositoryResult<TaskLogEntry> {
    let change_type = TrackedField::try_from(row.change_type.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    Ok(TaskLogEntry::from_persisted(PersistedTaskLogData {
        id: TaskLogId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        change_type,
        old_value: row.old_value,
        new_value: row.new_value,
        acting_user: row.acting_user.map(UserId::from_uuid),
        created_at: row.created_at,
    }))
}

fn comment_to_new_row(comment: &Comment) -> NewCommentRow {
    NewCommentRow {
        id: comment.id().into_inner(),
        task_id: comment.task_id().into_inner(),
        author_id: comment.author().into_inner(),
        content: comment.content().to_owned(),
        created_at: comment.created_at(),
    }
}

fn row_to_comment(row: CommentRow) -> Comment {
    Comment::from_persisted(PersistedCommentData {
        id: CommentId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        author: UserId::from_uuid(row.author_id),
        content: row.content,
        created_at: row.created_at,
    })
}
