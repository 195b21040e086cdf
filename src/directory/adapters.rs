//! In-memory directory adapter.
//!
//! Serves tests and embedders that do not need a database-backed
//! directory. Registration provisions the default profile so the
//! "every user has exactly one profile" invariant holds from the
//! moment a user exists.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::domain::{Profile, Role, Team, TeamId, User, UserId};
use crate::directory::ports::{DirectoryError, DirectoryReader, DirectoryResult};

/// Thread-safe in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, User>,
    profiles: HashMap<UserId, Profile>,
    teams: HashMap<TeamId, Team>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user, provisioning the default employee profile.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DuplicateUser`] when the identifier is
    /// already registered.
    pub fn register_user(&self, user: User) -> DirectoryResult<()> {
        let mut state = self.write()?;
        if state.users.contains_key(&user.id()) {
            return Err(DirectoryError::DuplicateUser(user.id()));
        }
        state.profiles.insert(user.id(), Profile::new(Role::Employee));
        state.users.insert(user.id(), user);
        Ok(())
    }

    /// Replaces a user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::UserNotFound`] when the user is not
    /// registered.
    pub fn set_profile(&self, user: UserId, profile: Profile) -> DirectoryResult<()> {
        let mut state = self.write()?;
        if !state.users.contains_key(&user) {
            return Err(DirectoryError::UserNotFound(user));
        }
        state.profiles.insert(user, profile);
        Ok(())
    }

    /// Returns a user's profile, if the user is registered.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the underlying lock
    /// is poisoned.
    pub fn profile_of(&self, user: UserId) -> DirectoryResult<Option<Profile>> {
        let state = self.read()?;
        Ok(state.profiles.get(&user).copied())
    }

    /// Adds a team.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::DuplicateTeam`] when the identifier is
    /// already registered.
    pub fn add_team(&self, team: Team) -> DirectoryResult<()> {
        let mut state = self.write()?;
        if state.teams.contains_key(&team.id()) {
            return Err(DirectoryError::DuplicateTeam(team.id()));
        }
        state.teams.insert(team.id(), team);
        Ok(())
    }

    fn read(&self) -> DirectoryResult<std::sync::RwLockReadGuard<'_, DirectoryState>> {
        self.state
            .read()
            .map_err(|err| DirectoryError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> DirectoryResult<std::sync::RwLockWriteGuard<'_, DirectoryState>> {
        self.state
            .write()
            .map_err(|err| DirectoryError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl DirectoryReader for InMemoryDirectory {
    async fn find_user(&self, id: UserId) -> DirectoryResult<Option<User>> {
        let state = self.read()?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_team(&self, id: TeamId) -> DirectoryResult<Option<Team>> {
        let state = self.read()?;
        Ok(state.teams.get(&id).cloned())
    }
}
