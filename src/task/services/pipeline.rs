//! Task mutation pipeline.
//!
//! Validates and applies task mutations through the access policy,
//! persists them atomically with their audit entries, derives domain
//! events from the pre/post delta, and fires the best-effort side
//! channels (notifications, mail, calendar) after the core commit.

use crate::directory::domain::{Actor, UserId};
use crate::directory::ports::DirectoryReader;
use crate::task::adapters::inert::{DiscardingEventConsumer, InertCalendarSync, InertEmailNotifier};
use crate::task::adapters::vocabulary::StaticVocabulary;
use crate::task::domain::{
    Comment, Task, TaskChanges, TaskDomainError, TaskDraft, TaskEvent, TaskId, TaskLogEntry,
    TaskScope, VocabularyOption, event_for_comment, events_for_create, events_for_update,
    permits_object, visible_scope,
};
use crate::task::ports::{
    CalendarSync, EmailNotifier, EventConsumer, TaskRepository, TaskRepositoryError,
    VocabularyProvider,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Service-level errors for task pipeline operations.
#[derive(Debug, Error)]
pub enum TaskPipelineError {
    /// Domain validation rejected the mutation before any write.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// The task does not exist, or the actor's visible set excludes it.
    /// The two are deliberately indistinguishable so callers cannot
    /// probe for existence.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The actor may see the task but not mutate it.
    ///
    /// Under the current policy every visible task is also mutable by
    /// its viewer, so this variant only surfaces once a policy
    /// separates read from write scope.
    #[error("actor {actor} is forbidden from mutating task {task}")]
    Forbidden {
        /// The denied actor.
        actor: UserId,
        /// The protected task.
        task: TaskId,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskPipelineError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::Domain(domain) => Self::Validation(domain),
            other => Self::Repository(other),
        }
    }
}

/// Result type for task pipeline operations.
pub type TaskPipelineResult<T> = Result<T, TaskPipelineError>;

/// Outcome of a task create or update: the resulting task plus the
/// domain events the mutation emitted, exposed for testability even
/// though event transport is fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    task: Task,
    events: Vec<TaskEvent>,
}

impl MutationOutcome {
    /// Returns the task after the mutation.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the emitted events.
    #[must_use]
    pub fn events(&self) -> &[TaskEvent] {
        &self.events
    }

    /// Consumes the outcome, returning its parts.
    #[must_use]
    pub fn into_parts(self) -> (Task, Vec<TaskEvent>) {
        (self.task, self.events)
    }
}

/// Outcome of adding a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentOutcome {
    comment: Comment,
    events: Vec<TaskEvent>,
}

impl CommentOutcome {
    /// Returns the stored comment.
    #[must_use]
    pub const fn comment(&self) -> &Comment {
        &self.comment
    }

    /// Returns the emitted events (empty for self-authored comments).
    #[must_use]
    pub fn events(&self) -> &[TaskEvent] {
        &self.events
    }
}

/// Task mutation pipeline service.
#[derive(Clone)]
pub struct TaskPipelineService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    directory: Arc<dyn DirectoryReader>,
    clock: Arc<C>,
    vocabulary: Arc<dyn VocabularyProvider>,
    events: Arc<dyn EventConsumer>,
    email: Arc<dyn EmailNotifier>,
    calendar: Arc<dyn CalendarSync>,
}

impl<R, C> TaskPipelineService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a pipeline with inert side channels and the static
    /// vocabulary. Wire real collaborators with the `with_*` builders.
    #[must_use]
    pub fn new(repository: Arc<R>, directory: Arc<dyn DirectoryReader>, clock: Arc<C>) -> Self {
        Self {
            repository,
            directory,
            clock,
            vocabulary: Arc::new(StaticVocabulary::new()),
            events: Arc::new(DiscardingEventConsumer),
            email: Arc::new(InertEmailNotifier),
            calendar: Arc::new(InertCalendarSync),
        }
    }

    /// Replaces the vocabulary provider.
    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Arc<dyn VocabularyProvider>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Wires the consumer receiving emitted domain events.
    #[must_use]
    pub fn with_event_consumer(mut self, events: Arc<dyn EventConsumer>) -> Self {
        self.events = events;
        self
    }

    /// Wires the outbound mail side channel.
    #[must_use]
    pub fn with_email(mut self, email: Arc<dyn EmailNotifier>) -> Self {
        self.email = email;
        self
    }

    /// Wires the calendar sync side channel.
    #[must_use]
    pub fn with_calendar(mut self, calendar: Arc<dyn CalendarSync>) -> Self {
        self.calendar = calendar;
        self
    }

    /// Lists the tasks visible to the actor.
    ///
    /// Superusers see everything, managers their team, employees their
    /// assignments; actors without a profile (and managers without a
    /// team) get the empty list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPipelineError::Repository`] when the query fails.
    pub async fn list_tasks(&self, actor: &Actor) -> TaskPipelineResult<Vec<Task>> {
        match visible_scope(actor) {
            TaskScope::Nothing => Ok(Vec::new()),
            scope => Ok(self.repository.list(scope).await?),
        }
    }

    /// Retrieves a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPipelineError::NotFound`] when the task does not
    /// exist or the actor's visible set excludes it.
    pub async fn get_task(&self, actor: &Actor, id: TaskId) -> TaskPipelineResult<Task> {
        let task = self.fetch(id).await?;
        if !visible_scope(actor).includes(&task) {
            return Err(TaskPipelineError::NotFound(id));
        }
        Ok(task)
    }

    /// Creates a task from a draft.
    ///
    /// Persists the task, emits [`TaskEvent::Created`], then fires the
    /// best-effort side channels: an assignment mail to the assignee's
    /// address (when the directory knows one) and a calendar sync.
    /// Side-channel failures are logged and never fail the creation.
    /// No audit entries are written — the audit log records changes,
    /// not genesis.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPipelineError::Validation`] when the draft is
    /// invalid or a non-privileged actor drafts the task directly into
    /// the completion status.
    pub async fn create_task(
        &self,
        actor: &Actor,
        draft: TaskDraft,
    ) -> TaskPipelineResult<MutationOutcome> {
        let task = Task::create(draft, actor, &*self.clock)?;
        self.repository.insert(&task).await?;

        let events = events_for_create(&task);
        self.events.consume(&events).await;

        self.send_assignment_mail(&task).await;
        self.sync_calendar(&task).await;

        Ok(MutationOutcome { task, events })
    }

    /// Applies a change set to a task.
    ///
    /// The repository plans the update against the row read inside its
    /// transaction: audit entries for changed tracked fields and the
    /// task write commit together or not at all. Events are derived
    /// from the pre/post delta and handed to the consumer after the
    /// commit, followed by a best-effort calendar sync.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPipelineError::NotFound`] for missing or invisible
    /// tasks, [`TaskPipelineError::Forbidden`] when the actor may not
    /// mutate the task, and [`TaskPipelineError::Validation`] when the
    /// change set is rejected — in which case no field of the task
    /// changes and no audit entry is written.
    pub async fn update_task(
        &self,
        actor: &Actor,
        id: TaskId,
        changes: TaskChanges,
    ) -> TaskPipelineResult<MutationOutcome> {
        self.authorize_mutation(actor, id).await?;

        let plan = self
            .repository
            .apply_update(id, changes, *actor, self.clock.utc())
            .await?;

        let events = events_for_update(plan.previous(), plan.task());
        self.events.consume(&events).await;

        self.sync_calendar(plan.task()).await;

        Ok(MutationOutcome {
            task: plan.into_task(),
            events,
        })
    }

    /// Deletes a task together with its comments and audit entries.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPipelineError::NotFound`] for missing or invisible
    /// tasks and [`TaskPipelineError::Forbidden`] when the actor may
    /// not mutate the task.
    pub async fn delete_task(&self, actor: &Actor, id: TaskId) -> TaskPipelineResult<()> {
        self.authorize_mutation(actor, id).await?;
        Ok(self.repository.delete(id).await?)
    }

    /// Adds an immutable comment to a task.
    ///
    /// Emits [`TaskEvent::CommentAdded`] unless the author is the
    /// task's current assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPipelineError::NotFound`] for missing or invisible
    /// tasks and [`TaskPipelineError::Forbidden`] when the actor may
    /// not act on the task.
    pub async fn add_comment(
        &self,
        actor: &Actor,
        task_id: TaskId,
        content: impl Into<String> + Send,
    ) -> TaskPipelineResult<CommentOutcome> {
        let task = self.authorize_mutation(actor, task_id).await?;

        let comment = Comment::new(task_id, actor.id(), content, self.clock.utc());
        self.repository.insert_comment(&comment).await?;

        let author_name = self.author_name(actor.id()).await;
        let events: Vec<TaskEvent> = event_for_comment(&task, &comment, &author_name)
            .into_iter()
            .collect();
        self.events.consume(&events).await;

        Ok(CommentOutcome { comment, events })
    }

    /// Returns a task's comments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPipelineError::NotFound`] for missing or invisible
    /// tasks.
    pub async fn comments(&self, actor: &Actor, task_id: TaskId) -> TaskPipelineResult<Vec<Comment>> {
        let task = self.fetch(task_id).await?;
        if !visible_scope(actor).includes(&task) {
            return Err(TaskPipelineError::NotFound(task_id));
        }
        Ok(self.repository.comments_for(task_id).await?)
    }

    /// Returns a task's audit trail, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskPipelineError::NotFound`] for missing or invisible
    /// tasks.
    pub async fn audit_log(
        &self,
        actor: &Actor,
        task_id: TaskId,
    ) -> TaskPipelineResult<Vec<TaskLogEntry>> {
        let task = self.fetch(task_id).await?;
        if !visible_scope(actor).includes(&task) {
            return Err(TaskPipelineError::NotFound(task_id));
        }
        Ok(self.repository.logs_for(task_id).await?)
    }

    /// Returns the status options in display order.
    #[must_use]
    pub fn status_options(&self) -> Vec<VocabularyOption> {
        self.vocabulary.status_options()
    }

    /// Returns the priority options in display order.
    #[must_use]
    pub fn priority_options(&self) -> Vec<VocabularyOption> {
        self.vocabulary.priority_options()
    }

    async fn fetch(&self, id: TaskId) -> TaskPipelineResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskPipelineError::NotFound(id))
    }

    /// Fetches a task and checks object-level mutation permission.
    ///
    /// Invisible tasks collapse to `NotFound`; visible tasks the actor
    /// may not mutate surface as `Forbidden`. The current policy never
    /// produces the latter (every visible task is mutable by its
    /// viewer), but the distinction is kept at the seam so a policy
    /// with read-only visibility slots in without an error-contract
    /// change.
    async fn authorize_mutation(&self, actor: &Actor, id: TaskId) -> TaskPipelineResult<Task> {
        let task = self.fetch(id).await?;
        if permits_object(actor, &task) {
            return Ok(task);
        }
        if visible_scope(actor).includes(&task) {
            return Err(TaskPipelineError::Forbidden {
                actor: actor.id(),
                task: id,
            });
        }
        Err(TaskPipelineError::NotFound(id))
    }

    /// Resolves a user's display name for notification messages,
    /// falling back to the identifier when the directory cannot
    /// resolve it.
    async fn author_name(&self, author: UserId) -> String {
        match self.directory.find_user(author).await {
            Ok(Some(user)) => user.username().to_owned(),
            Ok(None) => author.to_string(),
            Err(err) => {
                warn!(user = %author, error = %err, "author lookup failed");
                author.to_string()
            }
        }
    }

    async fn send_assignment_mail(&self, task: &Task) {
        let recipient = match self.directory.find_user(task.assigned_to()).await {
            Ok(user) => user,
            Err(err) => {
                warn!(task = %task.id(), error = %err, "assignee lookup failed, skipping mail");
                return;
            }
        };
        let Some(email) = recipient.as_ref().and_then(|user| user.email()) else {
            return;
        };
        if let Err(err) = self.email.notify_assignment(task, email).await {
            warn!(task = %task.id(), error = %err, "assignment mail failed");
        }
    }

    async fn sync_calendar(&self, task: &Task) {
        if let Err(err) = self.calendar.sync_task(task, task.assigned_to()).await {
            warn!(task = %task.id(), error = %err, "calendar sync failed");
        }
    }
}
