//! Creation store backed by the hosted database's REST interface
//!
//! Speaks the PostgREST dialect: filters go in the query string as
//! `column=eq.value`, and the project key travels both as `apikey` and as a
//! bearer token.

use std::future::Future;

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;

use crate::core::error::{DyeError, Result};
use crate::core::types::{CreationId, OwnerId};
use crate::retention::store::{Creation, CreationStore, RetentionSlot};

const DEFAULT_TABLE: &str = "creations";

#[derive(Serialize)]
struct SlotPatch {
    slot: RetentionSlot,
}

/// `CreationStore` over HTTP
pub struct RestCreationStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestCreationStore {
    pub fn new(base_url: String, api_key: String, table: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table,
        }
    }

    /// Create a store from environment variables
    ///
    /// Required: DYECRAFT_DB_URL, DYECRAFT_DB_KEY
    /// Optional: DYECRAFT_DB_TABLE (defaults to `creations`)
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("DYECRAFT_DB_URL")
            .map_err(|_| DyeError::Remote("DYECRAFT_DB_URL not set".into()))?;
        let api_key = std::env::var("DYECRAFT_DB_KEY")
            .map_err(|_| DyeError::Remote("DYECRAFT_DB_KEY not set".into()))?;
        let table = std::env::var("DYECRAFT_DB_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.into());

        Ok(Self::new(base_url, api_key, table))
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn insert_request(&self, creation: &Creation) -> RequestBuilder {
        self.authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(creation)
    }

    fn get_request(&self, id: CreationId) -> RequestBuilder {
        self.authorized(self.client.get(self.table_url()))
            .query(&[("id", format!("eq.{}", id)), ("select", "*".to_string())])
    }

    fn list_request(&self, owner: OwnerId, slot: RetentionSlot) -> RequestBuilder {
        self.authorized(self.client.get(self.table_url())).query(&[
            ("owner_id", format!("eq.{}", owner)),
            ("slot", format!("eq.{}", slot)),
            ("order", "created_at.desc,id.asc".to_string()),
            ("select", "*".to_string()),
        ])
    }

    fn set_slot_request(&self, id: CreationId, slot: RetentionSlot) -> RequestBuilder {
        self.authorized(self.client.patch(self.table_url()))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&SlotPatch { slot })
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| DyeError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DyeError::Remote(format!("HTTP {}: {}", status, error_text)));
        }

        Ok(response)
    }

    async fn fetch_rows(builder: RequestBuilder) -> Result<Vec<Creation>> {
        Self::send(builder)
            .await?
            .json()
            .await
            .map_err(|e| DyeError::Remote(e.to_string()))
    }
}

impl CreationStore for RestCreationStore {
    fn insert(&self, creation: Creation) -> impl Future<Output = Result<()>> + Send {
        let request = self.insert_request(&creation);
        async move {
            Self::send(request).await?;
            tracing::debug!("Stored creation {}", creation.id);
            Ok(())
        }
    }

    fn get(&self, id: CreationId) -> impl Future<Output = Result<Creation>> + Send {
        let request = self.get_request(id);
        async move {
            Self::fetch_rows(request)
                .await?
                .into_iter()
                .next()
                .ok_or(DyeError::CreationNotFound(id))
        }
    }

    fn list(
        &self,
        owner: OwnerId,
        slot: RetentionSlot,
    ) -> impl Future<Output = Result<Vec<Creation>>> + Send {
        Self::fetch_rows(self.list_request(owner, slot))
    }

    fn set_slot(&self, id: CreationId, slot: RetentionSlot) -> impl Future<Output = Result<()>> + Send {
        let request = self.set_slot_request(id, slot);
        async move {
            // PATCH on a missing row succeeds with no rows; surface it as not found
            let rows = Self::fetch_rows(request).await?;
            if rows.is_empty() {
                return Err(DyeError::CreationNotFound(id));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RestCreationStore {
        RestCreationStore::new(
            "https://db.example.test/".into(),
            "secret".into(),
            DEFAULT_TABLE.into(),
        )
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(store().table_url(), "https://db.example.test/rest/v1/creations");
    }

    #[test]
    fn test_list_request_filters_owner_and_slot() {
        let owner = OwnerId::new();
        let request = store()
            .list_request(owner, RetentionSlot::Recent)
            .build()
            .unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        let query = request.url().query().unwrap_or_default().to_string();
        assert!(query.contains(&format!("owner_id=eq.{}", owner)));
        assert!(query.contains("slot=eq.recent"));
        assert_eq!(request.headers()["apikey"], "secret");
        assert_eq!(request.headers()["authorization"], "Bearer secret");
    }

    #[test]
    fn test_set_slot_request_patches_by_id() {
        let id = CreationId::from_u128(42);
        let request = store()
            .set_slot_request(id, RetentionSlot::Expired)
            .build()
            .unwrap();

        assert_eq!(request.method(), &reqwest::Method::PATCH);
        assert!(request.url().query().unwrap_or_default().contains(&format!("id=eq.{}", id)));

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"slot":"expired"}"#);
    }
}
