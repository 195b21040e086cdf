//! Tests for notification dispatch and read-state handling.

use std::sync::Arc;

use eyre::bail;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use crate::directory::domain::UserId;
use crate::notification::adapters::memory::InMemoryNotificationStore;
use crate::notification::ports::NotificationStoreError;
use crate::notification::services::NotificationDispatcher;
use crate::task::domain::{StatusValue, TaskEvent, TaskId};

type TestDispatcher = NotificationDispatcher<InMemoryNotificationStore, DefaultClock>;

#[fixture]
fn dispatcher() -> TestDispatcher {
    NotificationDispatcher::new(
        Arc::new(InMemoryNotificationStore::new()),
        Arc::new(DefaultClock),
    )
}

fn created(assignee: UserId) -> TaskEvent {
    TaskEvent::Created {
        task_id: TaskId::new(),
        title: "Draft the release notes".to_owned(),
        assignee,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_notifies_the_assignee_once(dispatcher: TestDispatcher) -> eyre::Result<()> {
    let assignee = UserId::new();
    dispatcher.dispatch(&[created(assignee)]).await?;

    let rows = dispatcher.list_for(assignee).await?;
    eyre::ensure!(rows.len() == 1);
    let Some(row) = rows.first() else {
        bail!("expected one notification");
    };
    eyre::ensure!(!row.is_read());
    eyre::ensure!(row.message().contains("Draft the release notes"));
    eyre::ensure!(row.task().is_some());
    eyre::ensure!(dispatcher.unread_count(assignee).await? == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_notifies_both_sides(dispatcher: TestDispatcher) -> eyre::Result<()> {
    let alice = UserId::new();
    let bob = UserId::new();
    let event = TaskEvent::Reassigned {
        task_id: TaskId::new(),
        title: "Migrate the billing job".to_owned(),
        previous: alice,
        current: bob,
    };

    let rows = dispatcher.dispatch(&[event]).await?;
    eyre::ensure!(rows.len() == 2);

    let to_bob = dispatcher.list_for(bob).await?;
    eyre::ensure!(to_bob.len() == 1);
    eyre::ensure!(
        to_bob
            .iter()
            .all(|n| n.message().contains("You have been given"))
    );

    let to_alice = dispatcher.list_for(alice).await?;
    eyre::ensure!(to_alice.len() == 1);
    eyre::ensure!(
        to_alice
            .iter()
            .all(|n| n.message().contains("no longer assigned to you"))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_change_message_carries_both_values(
    dispatcher: TestDispatcher,
) -> eyre::Result<()> {
    let assignee = UserId::new();
    let event = TaskEvent::StatusChanged {
        task_id: TaskId::new(),
        title: "Rotate the signing keys".to_owned(),
        assignee,
        previous: StatusValue::todo(),
        current: StatusValue::new("in_progress")?,
    };

    dispatcher.dispatch(&[event]).await?;

    let rows = dispatcher.list_for(assignee).await?;
    eyre::ensure!(rows.len() == 1);
    eyre::ensure!(rows.iter().all(|n| n.message().contains("todo")));
    eyre::ensure!(rows.iter().all(|n| n.message().contains("in_progress")));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comment_event_notifies_the_assignee(dispatcher: TestDispatcher) -> eyre::Result<()> {
    let assignee = UserId::new();
    let event = TaskEvent::CommentAdded {
        task_id: TaskId::new(),
        title: "Audit the invite flow".to_owned(),
        assignee,
        author: UserId::new(),
        author_name: "priya".to_owned(),
        excerpt: "Looks good, one question about the expiry".to_owned(),
    };

    dispatcher.dispatch(&[event]).await?;

    let rows = dispatcher.list_for(assignee).await?;
    eyre::ensure!(rows.len() == 1);
    eyre::ensure!(
        rows.iter()
            .all(|n| n.message().contains("priya: Looks good, one question about the expiry"))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notifications_are_scoped_per_user(dispatcher: TestDispatcher) -> eyre::Result<()> {
    let alice = UserId::new();
    let bob = UserId::new();
    dispatcher
        .dispatch(&[created(alice), created(bob), created(alice)])
        .await?;

    eyre::ensure!(dispatcher.list_for(alice).await?.len() == 2);
    eyre::ensure!(dispatcher.list_for(bob).await?.len() == 1);
    eyre::ensure!(dispatcher.unread_count(bob).await? == 1);

    // Reading bob's rows leaves alice's untouched.
    eyre::ensure!(dispatcher.mark_all_read(bob).await? == 1);
    eyre::ensure!(dispatcher.unread_count(alice).await? == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_read_is_idempotent_and_owner_checked(
    dispatcher: TestDispatcher,
) -> eyre::Result<()> {
    let alice = UserId::new();
    let rows = dispatcher.dispatch(&[created(alice)]).await?;
    let Some(row) = rows.first() else {
        bail!("expected one notification");
    };

    dispatcher.mark_read(alice, row.id()).await?;
    dispatcher.mark_read(alice, row.id()).await?;
    eyre::ensure!(dispatcher.unread_count(alice).await? == 0);

    let stranger = UserId::new();
    let denied = dispatcher.mark_read(stranger, row.id()).await;
    eyre::ensure!(matches!(denied, Err(NotificationStoreError::NotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mark_all_read_reports_affected_rows(dispatcher: TestDispatcher) -> eyre::Result<()> {
    let alice = UserId::new();
    let events: Vec<TaskEvent> = (0..5).map(|_| created(alice)).collect();
    dispatcher.dispatch(&events).await?;

    eyre::ensure!(dispatcher.mark_all_read(alice).await? == 5);
    eyre::ensure!(dispatcher.mark_all_read(alice).await? == 0);
    eyre::ensure!(dispatcher.unread_count(alice).await? == 0);
    eyre::ensure!(dispatcher.list_for(alice).await?.len() == 5);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_returns_newest_first(dispatcher: TestDispatcher) -> eyre::Result<()> {
    let alice = UserId::new();
    dispatcher.dispatch(&[created(alice)]).await?;
    dispatcher.dispatch(&[created(alice)]).await?;
    dispatcher.dispatch(&[created(alice)]).await?;

    let rows = dispatcher.list_for(alice).await?;
    let stamps: Vec<_> = rows.iter().map(|n| n.created_at()).collect();
    let mut sorted = stamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    eyre::ensure!(stamps == sorted);
    Ok(())
}
