//! End-to-end flows over the in-memory adapters: mutation pipeline,
//! audit trail, and notification dispatch wired together.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use eyre::bail;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use taskhive::directory::adapters::InMemoryDirectory;
use taskhive::directory::domain::{Actor, Profile, Role, TeamId, User, UserId};
use taskhive::directory::ports::DirectoryReader;
use taskhive::notification::adapters::InMemoryNotificationStore;
use taskhive::notification::services::NotificationDispatcher;
use taskhive::task::adapters::memory::InMemoryTaskRepository;
use taskhive::task::domain::{StatusValue, TaskChanges, TaskDomainError, TaskDraft};
use taskhive::task::ports::EventConsumer;
use taskhive::task::services::{TaskPipelineError, TaskPipelineService};

struct World {
    service: TaskPipelineService<InMemoryTaskRepository, DefaultClock>,
    notifications: NotificationDispatcher<InMemoryNotificationStore, DefaultClock>,
    team: TeamId,
    manager: Actor,
    employee: Actor,
}

#[fixture]
fn world() -> World {
    let directory = Arc::new(InMemoryDirectory::new());
    let store = Arc::new(InMemoryNotificationStore::new());
    let notifications = NotificationDispatcher::new(Arc::clone(&store), Arc::new(DefaultClock));
    let consumer = NotificationDispatcher::new(store, Arc::new(DefaultClock));

    let service = TaskPipelineService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&directory) as Arc<dyn DirectoryReader>,
        Arc::new(DefaultClock),
    )
    .with_event_consumer(Arc::new(consumer) as Arc<dyn EventConsumer>);

    let team = TeamId::new();
    let manager_user = User::new("meredith").with_email("meredith@example.com");
    let employee_user = User::new("eli").with_email("eli@example.com");
    let manager = Actor::new(manager_user.id())
        .staff()
        .with_profile(Profile::new(Role::Manager).with_team(team));
    let employee =
        Actor::new(employee_user.id()).with_profile(Profile::new(Role::Employee).with_team(team));
    directory
        .register_user(manager_user)
        .expect("manager registers");
    directory
        .register_user(employee_user)
        .expect("employee registers");

    World {
        service,
        notifications,
        team,
        manager,
        employee,
    }
}

fn draft_for(world: &World, title: &str) -> TaskDraft {
    TaskDraft::new(
        title,
        world.employee.id(),
        world.team,
        Utc::now() + Duration::days(5),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignment_flows_through_to_a_notification(world: World) -> eyre::Result<()> {
    world
        .service
        .create_task(&world.manager, draft_for(&world, "Prepare onboarding deck"))
        .await?;

    let inbox = world.notifications.list_for(world.employee.id()).await?;
    eyre::ensure!(inbox.len() == 1);
    eyre::ensure!(
        inbox
            .iter()
            .all(|n| n.message().contains("Prepare onboarding deck") && !n.is_read())
    );
    eyre::ensure!(world.notifications.unread_count(world.employee.id()).await? == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_update_notifies_and_leaves_an_audit_trail(world: World) -> eyre::Result<()> {
    let created = world
        .service
        .create_task(&world.manager, draft_for(&world, "Index the archive"))
        .await?;
    let id = created.task().id();

    world
        .service
        .update_task(
            &world.employee,
            id,
            TaskChanges::new().with_status(StatusValue::new("in_progress")?),
        )
        .await?;

    let log = world.service.audit_log(&world.manager, id).await?;
    eyre::ensure!(log.len() == 1);
    eyre::ensure!(log.iter().all(|e| e.old_value() == "todo"));
    eyre::ensure!(log.iter().all(|e| e.new_value() == "in_progress"));
    eyre::ensure!(log.iter().all(|e| e.acting_user() == Some(world.employee.id())));

    // Assignment notice plus the status change notice.
    let inbox = world.notifications.list_for(world.employee.id()).await?;
    eyre::ensure!(inbox.len() == 2);
    eyre::ensure!(
        inbox
            .iter()
            .any(|n| n.message().contains("todo") && n.message().contains("in_progress"))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_notifies_both_assignees(world: World) -> eyre::Result<()> {
    let created = world
        .service
        .create_task(&world.manager, draft_for(&world, "Rotate pager duty"))
        .await?;
    let id = created.task().id();

    let successor = UserId::new();
    world
        .service
        .update_task(
            &world.manager,
            id,
            TaskChanges::new().with_assigned_to(successor),
        )
        .await?;

    let successor_inbox = world.notifications.list_for(successor).await?;
    eyre::ensure!(successor_inbox.len() == 1);
    eyre::ensure!(
        successor_inbox
            .iter()
            .all(|n| n.message().contains("You have been given"))
    );

    let former_inbox = world.notifications.list_for(world.employee.id()).await?;
    eyre::ensure!(
        former_inbox
            .iter()
            .any(|n| n.message().contains("no longer assigned to you"))
    );

    // Reassignment alone never reaches the audit log.
    eyre::ensure!(world.service.audit_log(&world.manager, id).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_is_gated_and_derived(world: World) -> eyre::Result<()> {
    let created = world
        .service
        .create_task(&world.manager, draft_for(&world, "Close out the sprint"))
        .await?;
    let id = created.task().id();

    let denied = world
        .service
        .update_task(
            &world.employee,
            id,
            TaskChanges::new().with_status(StatusValue::done()),
        )
        .await;
    eyre::ensure!(matches!(
        denied,
        Err(TaskPipelineError::Validation(
            TaskDomainError::CompletionNotPermitted { .. }
        ))
    ));
    let untouched = world.service.get_task(&world.employee, id).await?;
    eyre::ensure!(!untouched.completed());

    let outcome = world
        .service
        .update_task(
            &world.manager,
            id,
            TaskChanges::new().with_status(StatusValue::done()),
        )
        .await?;
    eyre::ensure!(outcome.task().completed());
    eyre::ensure!(outcome.task().status().is_done());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_notify_unless_self_authored(world: World) -> eyre::Result<()> {
    let created = world
        .service
        .create_task(&world.manager, draft_for(&world, "Verify the backups"))
        .await?;
    let id = created.task().id();
    let before = world.notifications.list_for(world.employee.id()).await?.len();

    world
        .service
        .add_comment(&world.manager, id, "Spot-check the oldest snapshot too")
        .await?;
    world
        .service
        .add_comment(&world.employee, id, "On it")
        .await?;

    let inbox = world.notifications.list_for(world.employee.id()).await?;
    eyre::ensure!(inbox.len() == before + 1);
    eyre::ensure!(
        inbox
            .iter()
            .any(|n| n.message().contains("meredith: Spot-check the oldest snapshot"))
    );

    let comments = world.service.comments(&world.employee, id).await?;
    eyre::ensure!(comments.len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn read_state_round_trip(world: World) -> eyre::Result<()> {
    world
        .service
        .create_task(&world.manager, draft_for(&world, "Tidy the wiki"))
        .await?;
    world
        .service
        .create_task(&world.manager, draft_for(&world, "File the expense report"))
        .await?;

    let employee_id = world.employee.id();
    let inbox = world.notifications.list_for(employee_id).await?;
    let Some(first) = inbox.first() else {
        bail!("expected notifications");
    };

    world.notifications.mark_read(employee_id, first.id()).await?;
    eyre::ensure!(world.notifications.unread_count(employee_id).await? == 1);

    eyre::ensure!(world.notifications.mark_all_read(employee_id).await? == 1);
    eyre::ensure!(world.notifications.unread_count(employee_id).await? == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn visibility_is_enforced_end_to_end(world: World) -> eyre::Result<()> {
    let created = world
        .service
        .create_task(&world.manager, draft_for(&world, "Renew the certificates"))
        .await?;
    let id = created.task().id();

    let other_manager = Actor::new(UserId::new())
        .with_profile(Profile::new(Role::Manager).with_team(TeamId::new()));
    let fetched = world.service.get_task(&other_manager, id).await;
    eyre::ensure!(matches!(fetched, Err(TaskPipelineError::NotFound(_))));
    eyre::ensure!(world.service.list_tasks(&other_manager).await?.is_empty());

    eyre::ensure!(world.service.list_tasks(&world.manager).await?.len() == 1);
    eyre::ensure!(world.service.list_tasks(&world.employee).await?.len() == 1);
    Ok(())
}
