//! Participant reconciliation and account uniqueness on `PostgreSQL`.

use std::sync::Arc;

use rstest::rstest;
use tasktrack::identity::{
    adapters::postgres::PostgresIdentityRepository,
    domain::{ConversationHandle, ExternalChatId, NewUser, NewUserProfile, UserHandle},
    ports::{IdentityRepositoryError, ProfileRepository, UserRepository},
    services::Registration,
};

use crate::postgres::helpers::{BoxError, TestDatabase, test_database};

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_contact_creates_one_user(
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = test_database.await?;
    let services = db.services();
    let external = ExternalChatId::new(31_337);

    let attempts: Vec<_> = (0..4)
        .map(|_| {
            let shared = Arc::clone(&services);
            tokio::spawn(async move {
                shared
                    .identity
                    .reconcile(external, ConversationHandle::from_chat_id(31_337))
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for attempt in attempts {
        ids.push(attempt.await??.id());
    }
    ids.dedup();
    assert_eq!(ids.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn handle_is_refreshed_on_later_contact(
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = test_database.await?;
    let services = db.services();
    let external = ExternalChatId::new(42);

    let first = services
        .identity
        .reconcile(external, ConversationHandle::from_chat_id(42))
        .await?;
    let again = services
        .identity
        .reconcile(external, ConversationHandle::new("group-42")?)
        .await?;

    assert_eq!(first.id(), again.id());
    assert_eq!(first.handle().as_str(), "telegram_42");
    let registration = services.identity.lookup_registered(external).await?;
    assert!(matches!(registration, Registration::Registered(user) if user.id() == first.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unique_violations_map_to_typed_duplicates(
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<(), BoxError> {
    let db = test_database.await?;
    let repository = PostgresIdentityRepository::new(db.pool.clone());
    let handle = UserHandle::new("dana")?;

    let user = repository.create_user(&NewUser::new(handle.clone())).await?;
    let again = repository.create_user(&NewUser::new(handle.clone())).await;
    assert!(matches!(again, Err(IdentityRepositoryError::DuplicateHandle(h)) if h == handle));

    let other = repository
        .create_user(&NewUser::new(UserHandle::new("erin")?))
        .await?;
    let external = ExternalChatId::new(7);
    let profile_for = |owner, participant| {
        NewUserProfile::new(owner)
            .with_external_id(participant)
            .with_conversation(ConversationHandle::from_chat_id(7))
    };
    repository
        .create_profile(&profile_for(user.id(), external))
        .await?;

    let second_profile = repository
        .create_profile(&profile_for(user.id(), ExternalChatId::new(8)))
        .await;
    assert!(matches!(
        second_profile,
        Err(IdentityRepositoryError::DuplicateProfile(id)) if id == user.id()
    ));

    let shared_external = repository
        .create_profile(&profile_for(other.id(), external))
        .await;
    assert!(matches!(
        shared_external,
        Err(IdentityRepositoryError::DuplicateExternalId(id)) if id == external
    ));
    Ok(())
}
