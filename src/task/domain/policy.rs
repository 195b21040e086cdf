//! Role- and team-scoped task access policy.
//!
//! Pure decision logic: given an actor, which tasks may they see, and
//! may they mutate a specific one. Superusers are unrestricted; actors
//! without a profile see and may mutate nothing; managers are scoped
//! to their profile team; employees to tasks assigned to them.

use super::Task;
use crate::directory::domain::{Actor, Role, TeamId, UserId};

/// Visible-task predicate for an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Every task (superusers).
    All,
    /// Tasks belonging to a team (managers with a team).
    Team(TeamId),
    /// Tasks assigned to a user (employees).
    Assignee(UserId),
    /// No tasks (no profile, or a manager without a team).
    Nothing,
}

impl TaskScope {
    /// Returns whether a task falls inside the scope.
    #[must_use]
    pub fn includes(&self, task: &Task) -> bool {
        match *self {
            Self::All => true,
            Self::Team(team) => task.team() == team,
            Self::Assignee(user) => task.assigned_to() == user,
            Self::Nothing => false,
        }
    }
}

/// Computes the visible-task scope for an actor.
///
/// A manager whose profile has no team sees the empty set; the policy
/// never widens a missing team into an "all teams" view.
#[must_use]
pub fn visible_scope(actor: &Actor) -> TaskScope {
    if actor.is_superuser() {
        return TaskScope::All;
    }
    let Some(profile) = actor.profile() else {
        return TaskScope::Nothing;
    };
    match profile.role() {
        Role::Manager => profile.team().map_or(TaskScope::Nothing, TaskScope::Team),
        Role::Employee => TaskScope::Assignee(actor.id()),
    }
}

/// Decides object-level permission for a specific task.
///
/// Managers match only when their profile team equals the task team;
/// an unset profile team matches no task. Employees match only tasks
/// assigned to them.
#[must_use]
pub fn permits_object(actor: &Actor, task: &Task) -> bool {
    if actor.is_superuser() {
        return true;
    }
    let Some(profile) = actor.profile() else {
        return false;
    };
    if profile.role() == Role::Manager && profile.team() == Some(task.team()) {
        return true;
    }
    task.assigned_to() == actor.id()
}
