//! Account repository for the `users` and `sessions` collections
//!
//! The two collections are only loosely synchronized: no operation spans them
//! atomically. Session replacement is delete-then-insert, and user deletion
//! removes the user and its session in two independent steps, reporting
//! partial failure through its boolean result.

use common::{
    Document, DocumentCollection, FieldAssignment, Filter, InMemoryCollection, StoreError,
    WriteConcern, database::PgCollection,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::{AccountError, AccountResult};
use crate::models::{Preferences, Session, User};

/// Name of the collection holding users
pub const USERS_COLLECTION: &str = "users";
/// Name of the collection holding sessions
pub const SESSIONS_COLLECTION: &str = "sessions";

const EMAIL: &str = "email";
const USER_ID: &str = "user_id";
const PREFERENCES: &str = "preferences";

/// Account repository
#[derive(Clone)]
pub struct AccountStore {
    users: Arc<dyn DocumentCollection>,
    sessions: Arc<dyn DocumentCollection>,
}

impl AccountStore {
    /// Create an account store over the given collections
    ///
    /// The users collection is expected to enforce uniqueness of `email`.
    pub fn new(
        users: Arc<dyn DocumentCollection>,
        sessions: Arc<dyn DocumentCollection>,
    ) -> Self {
        Self { users, sessions }
    }

    /// Create an account store backed by fresh in-memory collections
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryCollection::with_unique(USERS_COLLECTION, &[EMAIL])),
            Arc::new(InMemoryCollection::new(SESSIONS_COLLECTION)),
        )
    }

    /// Create an account store backed by PostgreSQL, creating the collections if needed
    pub async fn postgres(pool: PgPool) -> AccountResult<Self> {
        let users = PgCollection::open(pool.clone(), USERS_COLLECTION, &[EMAIL]).await?;
        let sessions = PgCollection::open(pool, SESSIONS_COLLECTION, &[]).await?;

        Ok(Self::new(Arc::new(users), Arc::new(sessions)))
    }

    /// Register a new user
    ///
    /// The insert waits for majority acknowledgment so a registration cannot
    /// be lost on failover.
    pub async fn add_user(&self, user: &User) -> AccountResult<bool> {
        info!("Adding user: {}", user.email);

        let document = to_document(user)?;
        self.users
            .insert_one(document, WriteConcern::Majority)
            .await
            .map_err(|e| match e {
                StoreError::DuplicateKey { .. } => AccountError::DuplicateUser {
                    email: user.email.clone(),
                },
                other => AccountError::WriteFailure(format!("Adding a user failed: {}", other)),
            })?;

        Ok(true)
    }

    /// Create a session for a user, replacing any existing one
    pub async fn create_user_session(&self, user_id: &str, jwt: &str) -> AccountResult<bool> {
        info!("Creating session for user: {}", user_id);

        let session_failed = |e: StoreError| {
            AccountError::WriteFailure(format!("Creating a user session failed: {}", e))
        };

        // A missing previous session is not an error
        self.sessions
            .delete_one(&Filter::eq(USER_ID, user_id))
            .await
            .map_err(session_failed)?;

        let document = to_document(&Session::new(user_id, jwt))?;
        self.sessions
            .insert_one(document, WriteConcern::default())
            .await
            .map_err(session_failed)?;

        Ok(true)
    }

    /// Find a user by email
    pub async fn get_user(&self, email: &str) -> AccountResult<Option<User>> {
        info!("Finding user by email: {}", email);

        let document = self.users.find_one(&Filter::eq(EMAIL, email)).await?;
        document.map(from_document).transpose()
    }

    /// Find the session of a user
    pub async fn get_user_session(&self, user_id: &str) -> AccountResult<Option<Session>> {
        info!("Getting session for user: {}", user_id);

        let document = self.sessions.find_one(&Filter::eq(USER_ID, user_id)).await?;
        document.map(from_document).transpose()
    }

    /// Delete the session of a user
    ///
    /// Returns whether the store acknowledged the request, which is also the
    /// case when the user had no session.
    pub async fn delete_user_sessions(&self, user_id: &str) -> AccountResult<bool> {
        info!("Deleting sessions for user: {}", user_id);

        let result = self.sessions.delete_one(&Filter::eq(USER_ID, user_id)).await?;
        Ok(result.acknowledged)
    }

    /// Delete a user and its session
    ///
    /// Never fails: store errors are logged and reported as `false`. A user
    /// deleted before a failing session delete stays deleted.
    pub async fn delete_user(&self, email: &str) -> bool {
        info!("Deleting user: {}", email);

        let user_deleted = match self.users.delete_one(&Filter::eq(EMAIL, email)).await {
            Ok(result) => result.acknowledged,
            Err(e) => {
                error!("Deleting user {} failed! Message: {}", email, e);
                false
            }
        };

        let session_deleted = match self
            .sessions
            .delete_one(&Filter::eq(USER_ID, email))
            .await
        {
            Ok(result) => result.acknowledged,
            Err(e) => {
                error!("Deleting session of user {} failed! Message: {}", email, e);
                false
            }
        };

        user_deleted && session_deleted
    }

    /// Replace the preferences of a user
    ///
    /// `None` is rejected rather than treated as a reset; pass an empty map
    /// to clear the preferences. Returns `false` when no user matched.
    pub async fn update_user_preferences(
        &self,
        email: &str,
        preferences: Option<Preferences>,
    ) -> AccountResult<bool> {
        let Some(preferences) = preferences else {
            return Err(AccountError::InvalidArgument(
                "preferences must not be null".to_string(),
            ));
        };

        info!("Updating preferences for user: {}", email);

        let updated = self
            .users
            .find_one_and_update(
                &Filter::eq(EMAIL, email),
                &FieldAssignment::set(PREFERENCES, Value::Object(preferences)),
            )
            .await?;

        Ok(updated.is_some())
    }
}

fn to_document<T: Serialize>(model: &T) -> AccountResult<Document> {
    match serde_json::to_value(model)? {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::InvalidDocument(format!(
            "expected an object, got {}",
            other
        ))
        .into()),
    }
}

fn from_document<T: DeserializeOwned>(document: Document) -> AccountResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn preferences(value: Value) -> Preferences {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn store_with_collections() -> (AccountStore, InMemoryCollection, InMemoryCollection) {
        let users = InMemoryCollection::with_unique(USERS_COLLECTION, &[EMAIL]);
        let sessions = InMemoryCollection::new(SESSIONS_COLLECTION);
        let store = AccountStore::new(Arc::new(users.clone()), Arc::new(sessions.clone()));
        (store, users, sessions)
    }

    #[tokio::test]
    async fn test_add_user_rejects_duplicate_email() -> AccountResult<()> {
        let (store, users, _) = store_with_collections();
        let user = User::new("ada@example.com", "Ada", "hash");

        assert!(store.add_user(&user).await?);

        let err = store
            .add_user(&User::new("ada@example.com", "Other", "other"))
            .await
            .unwrap_err();
        assert!(
            matches!(err, AccountError::DuplicateUser { ref email } if email == "ada@example.com")
        );

        assert_eq!(users.count(&Filter::eq(EMAIL, "ada@example.com")).await, 1);
        assert_eq!(store.get_user("ada@example.com").await?, Some(user));
        Ok(())
    }

    #[tokio::test]
    async fn test_session_replacement_is_last_write_wins() -> AccountResult<()> {
        let (store, _, sessions) = store_with_collections();

        assert!(store.create_user_session("ada@example.com", "jwt-1").await?);
        assert!(store.create_user_session("ada@example.com", "jwt-2").await?);

        assert_eq!(sessions.count(&Filter::eq(USER_ID, "ada@example.com")).await, 1);
        assert_eq!(
            store.get_user_session("ada@example.com").await?,
            Some(Session::new("ada@example.com", "jwt-2"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_absence_is_not_failure() -> AccountResult<()> {
        let store = AccountStore::in_memory();

        assert_eq!(store.get_user("nonexistent@x.com").await?, None);
        assert_eq!(store.get_user_session("nonexistent").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_preferences_are_replaced_not_merged() -> AccountResult<()> {
        let store = AccountStore::in_memory();
        let user = User::new("ada@example.com", "Ada", "hash")
            .with_preferences(preferences(json!({ "a": 1, "b": 2 })));
        store.add_user(&user).await?;

        let updated = store
            .update_user_preferences("ada@example.com", Some(preferences(json!({ "c": 3 }))))
            .await?;
        assert!(updated);

        let stored = store.get_user("ada@example.com").await?.unwrap();
        assert_eq!(stored.preferences, Some(preferences(json!({ "c": 3 }))));
        assert_eq!(stored.name, "Ada");
        Ok(())
    }

    #[tokio::test]
    async fn test_null_preferences_are_rejected() -> AccountResult<()> {
        let store = AccountStore::in_memory();
        let user = User::new("ada@example.com", "Ada", "hash")
            .with_preferences(preferences(json!({ "theme": "dark" })));
        store.add_user(&user).await?;

        let err = store
            .update_user_preferences("ada@example.com", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidArgument(_)));

        assert_eq!(store.get_user("ada@example.com").await?, Some(user));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_preferences_clear_the_map() -> AccountResult<()> {
        let store = AccountStore::in_memory();
        let user = User::new("ada@example.com", "Ada", "hash")
            .with_preferences(preferences(json!({ "theme": "dark" })));
        store.add_user(&user).await?;

        assert!(
            store
                .update_user_preferences("ada@example.com", Some(Preferences::new()))
                .await?
        );

        let stored = store.get_user("ada@example.com").await?.unwrap();
        assert_eq!(stored.preferences, Some(Preferences::new()));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_preferences_of_unknown_user() -> AccountResult<()> {
        let store = AccountStore::in_memory();

        let updated = store
            .update_user_preferences("nobody@example.com", Some(Preferences::new()))
            .await?;
        assert!(!updated);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_cascades_to_session() -> AccountResult<()> {
        let (store, users, sessions) = store_with_collections();
        store
            .add_user(&User::new("ada@example.com", "Ada", "hash"))
            .await?;
        store.create_user_session("ada@example.com", "jwt").await?;

        assert!(store.delete_user("ada@example.com").await);

        assert!(users.is_empty().await);
        assert!(sessions.is_empty().await);
        assert_eq!(store.get_user("ada@example.com").await?, None);
        assert_eq!(store.get_user_session("ada@example.com").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_user_still_removes_session() -> AccountResult<()> {
        let (store, _, sessions) = store_with_collections();
        store.create_user_session("ghost@example.com", "jwt").await?;

        assert!(store.delete_user("ghost@example.com").await);
        assert!(sessions.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_sessions_is_idempotent() -> AccountResult<()> {
        let (store, _, sessions) = store_with_collections();
        store.create_user_session("ada@example.com", "jwt").await?;

        assert!(store.delete_user_sessions("ada@example.com").await?);
        assert!(store.delete_user_sessions("ada@example.com").await?);
        assert!(sessions.is_empty().await);
        Ok(())
    }

    #[test]
    fn test_to_document_rejects_non_objects() {
        let err = to_document(&"just a string").unwrap_err();
        assert!(matches!(err, AccountError::Store(StoreError::InvalidDocument(_))));
    }
}
