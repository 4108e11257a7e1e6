//! In-memory identity repository for tests and local tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identity::{
    domain::{
        ExternalChatId, NewUser, NewUserProfile, PasswordDigest, PersistedProfileData,
        PersistedUserData, ProfileId, User, UserHandle, UserId, UserProfile,
    },
    ports::{IdentityRepositoryError, IdentityRepositoryResult, ProfileRepository, UserRepository},
};

/// Thread-safe in-memory store of users and profiles.
///
/// Uniqueness rules mirror the `PostgreSQL` schema: one handle per user, one
/// profile per user, one profile per participant id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityRepository {
    state: Arc<RwLock<InMemoryIdentityState>>,
}

#[derive(Debug, Default)]
struct InMemoryIdentityState {
    last_user_id: i64,
    last_profile_id: i64,
    users: HashMap<UserId, User>,
    handle_index: HashMap<UserHandle, UserId>,
    profiles: HashMap<ProfileId, UserProfile>,
    user_index: HashMap<UserId, ProfileId>,
    external_index: HashMap<ExternalChatId, ProfileId>,
}

impl InMemoryIdentityRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> IdentityRepositoryResult<RwLockReadGuard<'_, InMemoryIdentityState>> {
        self.state.read().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> IdentityRepositoryResult<RwLockWriteGuard<'_, InMemoryIdentityState>> {
        self.state.write().map_err(|err| {
            IdentityRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryIdentityRepository {
    async fn create_user(&self, user: &NewUser) -> IdentityRepositoryResult<User> {
        let mut state = self.write()?;
        if state.handle_index.contains_key(user.handle()) {
            return Err(IdentityRepositoryError::DuplicateHandle(user.handle().clone()));
        }

        state.last_user_id += 1;
        let id = UserId::new(state.last_user_id);
        let stored = User::from_persisted(PersistedUserData {
            id,
            handle: user.handle().clone(),
            password: user.password().cloned(),
        });
        state.handle_index.insert(user.handle().clone(), id);
        state.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_user(&self, id: UserId) -> IdentityRepositoryResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_handle(
        &self,
        handle: &UserHandle,
    ) -> IdentityRepositoryResult<Option<User>> {
        let state = self.read()?;
        Ok(state
            .handle_index
            .get(handle)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn set_password(
        &self,
        id: UserId,
        digest: &PasswordDigest,
    ) -> IdentityRepositoryResult<()> {
        let mut state = self.write()?;
        let current = state
            .users
            .get(&id)
            .ok_or(IdentityRepositoryError::UserNotFound(id))?;
        let updated = User::from_persisted(PersistedUserData {
            id,
            handle: current.handle().clone(),
            password: Some(digest.clone()),
        });
        state.users.insert(id, updated);
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryIdentityRepository {
    async fn create_profile(
        &self,
        profile: &NewUserProfile,
    ) -> IdentityRepositoryResult<UserProfile> {
        let mut state = self.write()?;
        let user_id = profile.user_id();
        if !state.users.contains_key(&user_id) {
            return Err(IdentityRepositoryError::UserNotFound(user_id));
        }
        if state.user_index.contains_key(&user_id) {
            return Err(IdentityRepositoryError::DuplicateProfile(user_id));
        }
        if let Some(external_id) = profile.external_id()
            && state.external_index.contains_key(&external_id)
        {
            return Err(IdentityRepositoryError::DuplicateExternalId(external_id));
        }

        state.last_profile_id += 1;
        let id = ProfileId::new(state.last_profile_id);
        let stored = UserProfile::from_persisted(PersistedProfileData {
            id,
            user_id,
            external_id: profile.external_id(),
            conversation: profile.conversation().cloned(),
        });
        state.user_index.insert(user_id, id);
        if let Some(external_id) = profile.external_id() {
            state.external_index.insert(external_id, id);
        }
        state.profiles.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_profile(&self, profile: &UserProfile) -> IdentityRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .profiles
            .get_mut(&profile.id())
            .ok_or(IdentityRepositoryError::ProfileNotFound(profile.id()))?;
        if let Some(conversation) = profile.conversation() {
            stored.set_conversation(conversation.clone());
        }
        Ok(())
    }

    async fn find_profile_by_external_id(
        &self,
        external_id: ExternalChatId,
    ) -> IdentityRepositoryResult<Option<UserProfile>> {
        let state = self.read()?;
        Ok(state
            .external_index
            .get(&external_id)
            .and_then(|id| state.profiles.get(id))
            .cloned())
    }

    async fn find_profile_for_user(
        &self,
        user_id: UserId,
    ) -> IdentityRepositoryResult<Option<UserProfile>> {
        let state = self.read()?;
        Ok(state
            .user_index
            .get(&user_id)
            .and_then(|id| state.profiles.get(id))
            .cloned())
    }
}
