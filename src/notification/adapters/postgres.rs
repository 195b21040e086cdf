//! `PostgreSQL` notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::directory::domain::UserId;
use crate::notification::domain::{Notification, NotificationId, PersistedNotificationData};
use crate::notification::ports::{
    NotificationStore, NotificationStoreError, NotificationStoreResult,
};
use crate::task::domain::TaskId;

diesel::table! {
    /// Per-user notification rows, indexed `(user_id, is_read,
    /// created_at desc)` for the unread queries.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Recipient.
        user_id -> Uuid,
        /// Message text.
        message -> Text,
        /// Task that triggered the notification, if any.
        task_id -> Nullable<Uuid>,
        /// Read flag.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

/// Query result row for notifications.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct NotificationRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    message: String,
    task_id: Option<uuid::Uuid>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

/// Insert model for notifications.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
struct NewNotificationRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    message: String,
    task_id: Option<uuid::Uuid>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

/// `PostgreSQL` connection pool type used by the notification store.
pub type NotificationPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed notification store.
#[derive(Debug, Clone)]
pub struct PostgresNotificationStore {
    pool: NotificationPgPool,
}

impl PostgresNotificationStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: NotificationPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> NotificationStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> NotificationStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(NotificationStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(NotificationStoreError::persistence)?
    }
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn insert(&self, notification: &Notification) -> NotificationStoreResult<()> {
        let new_row = to_new_row(notification);
        let id = notification.id();

        self.run_blocking(move |connection| {
            diesel::insert_into(notifications::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        NotificationStoreError::Duplicate(id)
                    }
                    _ => NotificationStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_for(&self, user: UserId) -> NotificationStoreResult<Vec<Notification>> {
        self.run_blocking(move |connection| {
            let rows = notifications::table
                .filter(notifications::user_id.eq(user.into_inner()))
                .select(NotificationRow::as_select())
                .order(notifications::created_at.desc())
                .load::<NotificationRow>(connection)
                .map_err(NotificationStoreError::persistence)?;
            Ok(rows.into_iter().map(row_to_notification).collect())
        })
        .await
    }

    async fn mark_read(&self, user: UserId, id: NotificationId) -> NotificationStoreResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::update(
                notifications::table
                    .find(id.into_inner())
                    .filter(notifications::user_id.eq(user.into_inner())),
            )
            .set(notifications::is_read.eq(true))
            .execute(connection)
            .map_err(NotificationStoreError::persistence)?;
            if affected == 0 {
                return Err(NotificationStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn mark_all_read(&self, user: UserId) -> NotificationStoreResult<usize> {
        self.run_blocking(move |connection| {
            diesel::update(
                notifications::table
                    .filter(notifications::user_id.eq(user.into_inner()))
                    .filter(notifications::is_read.eq(false)),
            )
            .set(notifications::is_read.eq(true))
            .execute(connection)
            .map_err(NotificationStoreError::persistence)
        })
        .await
    }

    async fn unread_count(&self, user: UserId) -> NotificationStoreResult<usize> {
        self.run_blocking(move |connection| {
            let count: i64 = notifications::table
                .filter(notifications::user_id.eq(user.into_inner()))
                .filter(notifications::is_read.eq(false))
                .count()
                .get_result(connection)
                .map_err(NotificationStoreError::persistence)?;
            usize::try_from(count).map_err(NotificationStoreError::persistence)
        })
        .await
    }
}

fn to_new_row(notification: &Notification) -> NewNotificationRow {
    NewNotificationRow {
        id: notification.id().into_inner(),
        user_id: notification.user().into_inner(),
        message: notification.message().to_owned(),
        task_id: notification.task().map(TaskId::into_inner),
        is_read: notification.is_read(),
        created_at: notification.created_at(),
    }
}

fn row_to_notification(row: NotificationRow) -> Notification {
    Notification::from_persisted(PersistedNotificationData {
        id: NotificationId::from_uuid(row.id),
        user: UserId::from_uuid(row.user_id),
        message: row.message,
        task: row.task_id.map(TaskId::from_uuid),
        is_read: row.is_read,
        created_at: row.created_at,
    })
}
