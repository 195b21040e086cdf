//! Orchestration tests for the task mutation pipeline.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use eyre::bail;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::directory::adapters::InMemoryDirectory;
use crate::directory::domain::{Actor, Profile, Role, TeamId, User, UserId};
use crate::directory::ports::DirectoryReader;
use crate::notification::domain::{Notification, NotificationId};
use crate::notification::ports::{NotificationStore, NotificationStoreError, NotificationStoreResult};
use crate::notification::services::NotificationDispatcher;
use crate::task::adapters::memory::InMemoryTaskRepository;
use crate::task::domain::{
    StatusValue, Task, TaskChanges, TaskDomainError, TaskDraft, TaskEvent, TrackedField,
};
use crate::task::ports::{CalendarSync, EmailNotifier, EventConsumer, IntegrationError};
use crate::task::services::{TaskPipelineError, TaskPipelineService};

mockall::mock! {
    Email {}

    #[async_trait]
    impl EmailNotifier for Email {
        async fn notify_assignment(
            &self,
            task: &Task,
            recipient_email: &str,
        ) -> Result<(), IntegrationError>;
    }
}

mockall::mock! {
    Calendar {}

    #[async_trait]
    impl CalendarSync for Calendar {
        async fn sync_task(&self, task: &Task, user: UserId) -> Result<(), IntegrationError>;
    }
}

mockall::mock! {
    Store {}

    #[async_trait]
    impl NotificationStore for Store {
        async fn insert(&self, notification: &Notification) -> NotificationStoreResult<()>;
        async fn list_for(&self, user: UserId) -> NotificationStoreResult<Vec<Notification>>;
        async fn mark_read(&self, user: UserId, id: NotificationId) -> NotificationStoreResult<()>;
        async fn mark_all_read(&self, user: UserId) -> NotificationStoreResult<usize>;
        async fn unread_count(&self, user: UserId) -> NotificationStoreResult<usize>;
    }
}

/// Records every event batch handed to the consumer.
#[derive(Debug, Default)]
struct RecordingConsumer {
    batches: Mutex<Vec<Vec<TaskEvent>>>,
}

impl RecordingConsumer {
    fn batches(&self) -> Vec<Vec<TaskEvent>> {
        self.batches.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EventConsumer for RecordingConsumer {
    async fn consume(&self, events: &[TaskEvent]) {
        if let Ok(mut batches) = self.batches.lock() {
            batches.push(events.to_vec());
        }
    }
}

struct Harness {
    service: TaskPipelineService<InMemoryTaskRepository, DefaultClock>,
    repository: Arc<InMemoryTaskRepository>,
    directory: Arc<InMemoryDirectory>,
    consumer: Arc<RecordingConsumer>,
    team: TeamId,
}

impl Harness {
    /// Builds another service over the same repository and directory,
    /// for tests that wire their own side-channel mocks.
    fn rebuild(&self) -> TaskPipelineService<InMemoryTaskRepository, DefaultClock> {
        TaskPipelineService::new(
            Arc::clone(&self.repository),
            Arc::clone(&self.directory) as Arc<dyn DirectoryReader>,
            Arc::new(DefaultClock),
        )
        .with_event_consumer(Arc::clone(&self.consumer) as Arc<dyn EventConsumer>)
    }
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let directory = Arc::new(InMemoryDirectory::new());
    let consumer = Arc::new(RecordingConsumer::default());
    let service = TaskPipelineService::new(
        Arc::clone(&repository),
        Arc::clone(&directory) as Arc<dyn DirectoryReader>,
        Arc::new(DefaultClock),
    )
    .with_event_consumer(Arc::clone(&consumer) as Arc<dyn EventConsumer>);
    Harness {
        service,
        repository,
        directory,
        consumer,
        team: TeamId::new(),
    }
}

fn staff_actor() -> Actor {
    Actor::new(UserId::new()).staff()
}

fn employee_on(team: TeamId) -> Actor {
    Actor::new(UserId::new()).with_profile(Profile::new(Role::Employee).with_team(team))
}

fn draft(harness: &Harness, assignee: UserId) -> TaskDraft {
    TaskDraft::new(
        "Review the launch checklist",
        assignee,
        harness.team,
        Utc::now() + Duration::days(2),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_persists_and_emits_created_event(harness: Harness) -> eyre::Result<()> {
    let actor = staff_actor();
    let assignee = UserId::new();

    let outcome = harness
        .service
        .create_task(&actor, draft(&harness, assignee))
        .await?;

    let superuser = Actor::new(UserId::new()).superuser();
    let fetched = harness
        .service
        .get_task(&superuser, outcome.task().id())
        .await?;
    eyre::ensure!(&fetched == outcome.task());

    let batches = harness.consumer.batches();
    eyre::ensure!(
        batches
            == vec![vec![TaskEvent::Created {
                task_id: fetched.id(),
                title: fetched.title().to_owned(),
                assignee,
            }]]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_mails_assignee_when_directory_has_address(harness: Harness) -> eyre::Result<()> {
    let alice = User::new("alice").with_email("alice@example.com");
    let assignee = alice.id();
    harness.directory.register_user(alice)?;

    let mut email = MockEmail::new();
    email
        .expect_notify_assignment()
        .withf(|_, recipient| recipient == "alice@example.com")
        .times(1)
        .returning(|_, _| Ok(()));
    let service = harness.rebuild().with_email(Arc::new(email));

    service
        .create_task(&staff_actor(), draft(&harness, assignee))
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_skips_mail_when_assignee_has_no_address(harness: Harness) -> eyre::Result<()> {
    let bob = User::new("bob");
    let assignee = bob.id();
    harness.directory.register_user(bob)?;

    let mut email = MockEmail::new();
    email.expect_notify_assignment().times(0);
    let service = harness.rebuild().with_email(Arc::new(email));

    service
        .create_task(&staff_actor(), draft(&harness, assignee))
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn side_channel_failures_never_fail_the_mutation(harness: Harness) -> eyre::Result<()> {
    let alice = User::new("alice").with_email("alice@example.com");
    let assignee = alice.id();
    harness.directory.register_user(alice)?;

    let mut email = MockEmail::new();
    email
        .expect_notify_assignment()
        .returning(|_, _| Err(IntegrationError::message("smtp unreachable")));
    let mut calendar = MockCalendar::new();
    calendar
        .expect_sync_task()
        .returning(|_, _| Err(IntegrationError::message("calendar api down")));
    let service = harness
        .rebuild()
        .with_email(Arc::new(email))
        .with_calendar(Arc::new(calendar));

    let actor = staff_actor();
    let outcome = service.create_task(&actor, draft(&harness, assignee)).await?;
    let updated = service
        .update_task(
            &actor,
            outcome.task().id(),
            TaskChanges::new().with_status(StatusValue::new("in_progress")?),
        )
        .await?;

    eyre::ensure!(updated.task().status().as_str() == "in_progress");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notification_persistence_failure_never_fails_the_mutation(
    harness: Harness,
) -> eyre::Result<()> {
    let mut store = MockStore::new();
    store.expect_insert().returning(|_| {
        Err(NotificationStoreError::persistence(std::io::Error::other(
            "notification store offline",
        )))
    });
    let dispatcher = NotificationDispatcher::new(Arc::new(store), Arc::new(DefaultClock));
    let service = harness
        .rebuild()
        .with_event_consumer(Arc::new(dispatcher) as Arc<dyn EventConsumer>);

    let actor = staff_actor();
    let created = service
        .create_task(&actor, draft(&harness, UserId::new()))
        .await?;
    let updated = service
        .update_task(
            &actor,
            created.task().id(),
            TaskChanges::new().with_status(StatusValue::new("in_progress")?),
        )
        .await?;

    // The task write and its events survive the dead store.
    eyre::ensure!(updated.task().status().as_str() == "in_progress");
    eyre::ensure!(updated.events().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_writes_audit_entries_and_emits_delta_events(harness: Harness) -> eyre::Result<()> {
    let actor = staff_actor();
    let assignee = UserId::new();
    let created = harness
        .service
        .create_task(&actor, draft(&harness, assignee))
        .await?;
    let id = created.task().id();

    let replacement = UserId::new();
    let outcome = harness
        .service
        .update_task(
            &actor,
            id,
            TaskChanges::new()
                .with_assigned_to(replacement)
                .with_status(StatusValue::new("in_progress")?),
        )
        .await?;

    eyre::ensure!(outcome.events().len() == 2);
    eyre::ensure!(matches!(
        outcome.events().first(),
        Some(TaskEvent::Reassigned { previous, current, .. })
            if *previous == assignee && *current == replacement
    ));
    eyre::ensure!(matches!(
        outcome.events().get(1),
        Some(TaskEvent::StatusChanged { previous, current, .. })
            if previous.as_str() == "todo" && current.as_str() == "in_progress"
    ));

    // Reassignment is untracked; only the status change reaches the log.
    let log = harness.service.audit_log(&actor, id).await?;
    eyre::ensure!(log.len() == 1);
    let Some(entry) = log.first() else {
        bail!("expected one audit entry");
    };
    eyre::ensure!(entry.change_type() == TrackedField::Status);
    eyre::ensure!(entry.old_value() == "todo");
    eyre::ensure!(entry.new_value() == "in_progress");
    eyre::ensure!(entry.acting_user() == Some(actor.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_update_leaves_task_and_log_untouched(harness: Harness) -> eyre::Result<()> {
    let team = harness.team;
    let actor = employee_on(team);
    let created = harness
        .service
        .create_task(&staff_actor(), draft(&harness, actor.id()))
        .await?;
    let id = created.task().id();

    let result = harness
        .service
        .update_task(
            &actor,
            id,
            TaskChanges::new()
                .with_title("Renamed in passing")
                .with_status(StatusValue::done()),
        )
        .await;

    eyre::ensure!(matches!(
        result,
        Err(TaskPipelineError::Validation(
            TaskDomainError::CompletionNotPermitted { .. }
        ))
    ));

    let task = harness.service.get_task(&actor, id).await?;
    eyre::ensure!(task.title() == "Review the launch checklist");
    eyre::ensure!(!task.completed());
    eyre::ensure!(harness.service.audit_log(&actor, id).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invisible_tasks_collapse_to_not_found(harness: Harness) -> eyre::Result<()> {
    let created = harness
        .service
        .create_task(&staff_actor(), draft(&harness, UserId::new()))
        .await?;
    let id = created.task().id();

    let outsider = employee_on(harness.team);
    let fetched = harness.service.get_task(&outsider, id).await;
    eyre::ensure!(matches!(fetched, Err(TaskPipelineError::NotFound(_))));

    let mutated = harness
        .service
        .update_task(&outsider, id, TaskChanges::new().with_title("Mine now"))
        .await;
    eyre::ensure!(matches!(mutated, Err(TaskPipelineError::NotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_respects_visibility_scopes(harness: Harness) -> eyre::Result<()> {
    let team = harness.team;
    let member = employee_on(team);
    let staff = staff_actor();

    harness
        .service
        .create_task(&staff, draft(&harness, member.id()))
        .await?;
    harness
        .service
        .create_task(&staff, draft(&harness, UserId::new()))
        .await?;

    let manager = Actor::new(UserId::new())
        .with_profile(Profile::new(Role::Manager).with_team(team));
    eyre::ensure!(harness.service.list_tasks(&manager).await?.len() == 2);
    eyre::ensure!(harness.service.list_tasks(&member).await?.len() == 1);

    let profileless = Actor::new(UserId::new());
    eyre::ensure!(harness.service.list_tasks(&profileless).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_task_comments_and_log(harness: Harness) -> eyre::Result<()> {
    let actor = staff_actor();
    let created = harness
        .service
        .create_task(&actor, draft(&harness, UserId::new()))
        .await?;
    let id = created.task().id();

    harness.service.add_comment(&actor, id, "First pass done").await?;
    harness
        .service
        .update_task(&actor, id, TaskChanges::new().with_title("Relaunch checklist"))
        .await?;

    harness.service.delete_task(&actor, id).await?;

    let fetched = harness.service.get_task(&actor, id).await;
    eyre::ensure!(matches!(fetched, Err(TaskPipelineError::NotFound(_))));
    let comments = harness.service.comments(&actor, id).await;
    eyre::ensure!(matches!(comments, Err(TaskPipelineError::NotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_by_non_assignee_notifies_with_excerpt(harness: Harness) -> eyre::Result<()> {
    let team = harness.team;
    let assignee = employee_on(team);
    let created = harness
        .service
        .create_task(&staff_actor(), draft(&harness, assignee.id()))
        .await?;
    let id = created.task().id();

    let reviewer = User::new("priya");
    let manager = Actor::new(reviewer.id())
        .with_profile(Profile::new(Role::Manager).with_team(team));
    harness.directory.register_user(reviewer)?;
    let long_comment = "x".repeat(200);
    let outcome = harness
        .service
        .add_comment(&manager, id, long_comment.clone())
        .await?;

    let Some(TaskEvent::CommentAdded {
        excerpt,
        author,
        author_name,
        ..
    }) = outcome.events().first()
    else {
        bail!("expected a CommentAdded event");
    };
    eyre::ensure!(excerpt.chars().count() == 80);
    eyre::ensure!(*author == manager.id());
    eyre::ensure!(author_name == "priya");

    let comments = harness.service.comments(&assignee, id).await?;
    eyre::ensure!(comments.len() == 1);
    eyre::ensure!(comments.iter().all(|c| c.content() == long_comment));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_by_assignee_emits_no_event(harness: Harness) -> eyre::Result<()> {
    let assignee = employee_on(harness.team);
    let created = harness
        .service
        .create_task(&staff_actor(), draft(&harness, assignee.id()))
        .await?;

    let outcome = harness
        .service
        .add_comment(&assignee, created.task().id(), "Working on it")
        .await?;

    eyre::ensure!(outcome.events().is_empty());
    Ok(())
}

#[rstest]
fn vocabulary_options_come_back_in_display_order(harness: Harness) -> eyre::Result<()> {
    let statuses = harness.service.status_options();
    let values: Vec<&str> = statuses.iter().map(|o| o.value()).collect();
    eyre::ensure!(values == vec!["todo", "in_progress", "done"]);
    eyre::ensure!(statuses.iter().map(|o| o.sort_order()).is_sorted());

    let priorities = harness.service.priority_options();
    let priority_values: Vec<&str> = priorities.iter().map(|o| o.value()).collect();
    eyre::ensure!(priority_values == vec!["low", "medium", "high"]);
    Ok(())
}
