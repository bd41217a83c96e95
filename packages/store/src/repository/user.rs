use crate::codec::{Record, decode, encode};
use crate::collections::Collections;
use crate::document::{DocumentId, DocumentStore, Fields};
use crate::error::StoreError;
use campus_entity::{Onboarding, UserProfile};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

/// Profile documents, keyed by the authentication account ID
pub struct UserRepository<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    collections: Arc<Collections>,
}

impl<S: DocumentStore + ?Sized> Clone for UserRepository<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), collections: Arc::clone(&self.collections) }
    }
}

impl<S: DocumentStore + ?Sized> UserRepository<S> {
    pub fn new(store: Arc<S>, collections: Arc<Collections>) -> Self {
        Self { store, collections }
    }

    fn name(&self) -> &str {
        self.collections.name(UserProfile::COLLECTION)
    }

    /// Write the initial profile for a freshly registered account.
    pub async fn create_profile(
        &self,
        user_id: &str,
        name: &str,
        email: &str,
    ) -> Result<UserProfile, StoreError> {
        let profile = UserProfile {
            id: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            ..UserProfile::default()
        };
        let document =
            self.store.create(self.name(), DocumentId::given(user_id), encode(&profile)?).await?;
        info!("created profile for {}", user_id);
        decode(self.name(), document)
    }

    pub async fn get(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        let document = self.store.get(self.name(), user_id).await?;
        decode(self.name(), document)
    }

    pub async fn complete_onboarding(
        &self,
        onboarding: &Onboarding,
    ) -> Result<UserProfile, StoreError> {
        let mut fields = Fields::new();
        fields.insert("avatar".to_string(), json!(onboarding.avatar().unwrap_or("")));
        fields.insert("department".to_string(), json!(onboarding.department()));
        fields.insert("bio".to_string(), json!(onboarding.bio()));
        fields.insert("onBoarding".to_string(), Value::Bool(true));

        let document = self.store.update(self.name(), onboarding.user_id(), fields).await?;
        info!("onboarding complete for {}", onboarding.user_id());
        decode(self.name(), document)
    }
}
