//! `PostgreSQL` repository implementation for users and profiles.

use super::{
    models::{NewProfileRow, NewUserRow, ProfileRow, UserRow},
    schema::{user_profiles, users},
};
use crate::identity::{
    domain::{
        ConversationHandle, ExternalChatId, NewUser, NewUserProfile, PasswordDigest,
        PersistedProfileData, PersistedUserData, ProfileId, User, UserHandle, UserId, UserProfile,
    },
    ports::{IdentityRepositoryError, IdentityRepositoryResult, ProfileRepository, UserRepository},
};
use crate::persistence::{PersistenceError, PgPool, run_blocking};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

const HANDLE_UNIQUE: &str = "idx_users_handle_unique";
const PROFILE_USER_UNIQUE: &str = "idx_user_profiles_user_unique";
const PROFILE_EXTERNAL_UNIQUE: &str = "idx_user_profiles_external_chat_unique";

/// `PostgreSQL`-backed store of users and profiles.
#[derive(Debug, Clone)]
pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl From<PersistenceError> for IdentityRepositoryError {
    fn from(err: PersistenceError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl UserRepository for PostgresIdentityRepository {
    async fn create_user(&self, user: &NewUser) -> IdentityRepositoryResult<User> {
        let handle = user.handle().clone();
        let row = NewUserRow {
            handle: handle.as_str().to_owned(),
            password_hash: user.password().map(|digest| digest.as_str().to_owned()),
        };

        run_blocking(&self.pool, move |connection| {
            let stored = diesel::insert_into(users::table)
                .values(&row)
                .returning(UserRow::as_returning())
                .get_result(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if violates(info.as_ref(), HANDLE_UNIQUE) =>
                    {
                        IdentityRepositoryError::DuplicateHandle(handle.clone())
                    }
                    _ => IdentityRepositoryError::persistence(err),
                })?;
            row_to_user(stored)
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> IdentityRepositoryResult<Option<User>> {
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_user_by_handle(
        &self,
        handle: &UserHandle,
    ) -> IdentityRepositoryResult<Option<User>> {
        let lookup = handle.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = users::table
                .filter(users::handle.eq(lookup))
                .select(UserRow::as_select())
                .first(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn set_password(
        &self,
        id: UserId,
        digest: &PasswordDigest,
    ) -> IdentityRepositoryResult<()> {
        let encoded = digest.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(users::table.find(id.into_inner()))
                .set(users::password_hash.eq(Some(encoded)))
                .execute(connection)
                .map_err(IdentityRepositoryError::persistence)?;
            if updated == 0 {
                return Err(IdentityRepositoryError::UserNotFound(id));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ProfileRepository for PostgresIdentityRepository {
    async fn create_profile(
        &self,
        profile: &NewUserProfile,
    ) -> IdentityRepositoryResult<UserProfile> {
        let user_id = profile.user_id();
        let external_id = profile.external_id();
        let row = NewProfileRow {
            user_id: user_id.into_inner(),
            external_chat_id: external_id.map(ExternalChatId::into_inner),
            conversation_handle: profile.conversation().map(|c| c.as_str().to_owned()),
        };

        run_blocking(&self.pool, move |connection| {
            let stored = diesel::insert_into(user_profiles::table)
                .values(&row)
                .returning(ProfileRow::as_returning())
                .get_result(connection)
                .map_err(|err| map_profile_insert_error(err, user_id, external_id))?;
            Ok(row_to_profile(stored))
        })
        .await
    }

    async fn update_profile(&self, profile: &UserProfile) -> IdentityRepositoryResult<()> {
        let id = profile.id();
        let conversation = profile.conversation().map(|c| c.as_str().to_owned());
        run_blocking(&self.pool, move |connection| {
            let updated = diesel::update(user_profiles::table.find(id.into_inner()))
                .set(user_profiles::conversation_handle.eq(conversation))
                .execute(connection)
                .map_err(IdentityRepositoryError::persistence)?;
            if updated == 0 {
                return Err(IdentityRepositoryError::ProfileNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_profile_by_external_id(
        &self,
        external_id: ExternalChatId,
    ) -> IdentityRepositoryResult<Option<UserProfile>> {
        run_blocking(&self.pool, move |connection| {
            let row = user_profiles::table
                .filter(user_profiles::external_chat_id.eq(external_id.into_inner()))
                .select(ProfileRow::as_select())
                .first(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            Ok(row.map(row_to_profile))
        })
        .await
    }

    async fn find_profile_for_user(
        &self,
        user_id: UserId,
    ) -> IdentityRepositoryResult<Option<UserProfile>> {
        run_blocking(&self.pool, move |connection| {
            let row = user_profiles::table
                .filter(user_profiles::user_id.eq(user_id.into_inner()))
                .select(ProfileRow::as_select())
                .first(connection)
                .optional()
                .map_err(IdentityRepositoryError::persistence)?;
            Ok(row.map(row_to_profile))
        })
        .await
    }
}

fn map_profile_insert_error(
    err: DieselError,
    user_id: UserId,
    external_id: Option<ExternalChatId>,
) -> IdentityRepositoryError {
    if let DieselError::DatabaseError(kind, info) = &err {
        match (kind, info.constraint_name()) {
            (DatabaseErrorKind::UniqueViolation, Some(PROFILE_USER_UNIQUE)) => {
                return IdentityRepositoryError::DuplicateProfile(user_id);
            }
            (DatabaseErrorKind::UniqueViolation, Some(PROFILE_EXTERNAL_UNIQUE)) => {
                if let Some(external) = external_id {
                    return IdentityRepositoryError::DuplicateExternalId(external);
                }
            }
            (DatabaseErrorKind::ForeignKeyViolation, _) => {
                return IdentityRepositoryError::UserNotFound(user_id);
            }
            _ => {}
        }
    }
    IdentityRepositoryError::persistence(err)
}

fn violates(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}

fn row_to_user(row: UserRow) -> IdentityRepositoryResult<User> {
    let handle = UserHandle::new(row.handle).map_err(IdentityRepositoryError::persistence)?;
    Ok(User::from_persisted(PersistedUserData {
        id: UserId::new(row.id),
        handle,
        password: row.password_hash.map(PasswordDigest::from_encoded),
    }))
}

fn row_to_profile(row: ProfileRow) -> UserProfile {
    // Legacy rows may hold an empty string; treat it as "no handle".
    let conversation = row
        .conversation_handle
        .and_then(|raw| ConversationHandle::new(raw).ok());
    UserProfile::from_persisted(PersistedProfileData {
        id: ProfileId::new(row.id),
        user_id: UserId::new(row.user_id),
        external_id: row.external_chat_id.map(ExternalChatId::new),
        conversation,
    })
}
