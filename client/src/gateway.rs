//! Remote sync gateway.
//!
//! The backing store is a spreadsheet-backed web endpoint with a small
//! action-based API: one `GET ?action=load` returning every collection, and
//! `POST` calls for add/update/delete. Mutations are full-record replaces and
//! the caller is expected to reload afterwards; the gateway itself holds no
//! state.
//!
//! The endpoint only accepts `text/plain` request bodies (posting
//! `application/json` triggers a CORS preflight it cannot answer), so every
//! POST sends serialized JSON under a `text/plain` content type.

use crate::error::GatewayError;
use acres_engine::{normalize, Snapshot};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Which remote dataset calls target. Test and live are fully separate
/// datasets behind the same endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Test,
    Live,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::Live => "live",
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "live" => Ok(Environment::Live),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collections addressable through the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Lead,
    Property,
    Task,
    Buyer,
    Seller,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Lead => "lead",
            EntityType::Property => "property",
            EntityType::Task => "task",
            EntityType::Buyer => "buyer",
            EntityType::Seller => "seller",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw payload of one load call. Collections the remote omits default to
/// empty rather than failing the whole load.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSnapshot {
    leads: Vec<Value>,
    properties: Vec<Value>,
    tasks: Vec<Value>,
    buyers: Vec<Value>,
    sellers: Vec<Value>,
    config: Vec<Value>,
}

/// Stateless wire client for the remote store.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the full dataset for one environment and normalize every row.
    pub async fn load(&self, env: Environment) -> Result<Snapshot, GatewayError> {
        tracing::info!(%env, "loading remote snapshot");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("action", "load"), ("env", env.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%env, status = status.as_u16(), "load failed");
            return Err(GatewayError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        let raw: RawSnapshot = serde_json::from_str(&body)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        let snapshot = Snapshot {
            leads: raw.leads.iter().map(normalize::lead_from_row).collect(),
            properties: raw
                .properties
                .iter()
                .map(normalize::property_from_row)
                .collect(),
            tasks: raw.tasks.iter().map(normalize::task_from_row).collect(),
            buyers: raw.buyers.iter().map(normalize::buyer_from_row).collect(),
            sellers: raw.sellers.iter().map(normalize::seller_from_row).collect(),
            config: raw.config.iter().map(normalize::config_from_row).collect(),
        };

        tracing::info!(
            %env,
            leads = snapshot.leads.len(),
            properties = snapshot.properties.len(),
            tasks = snapshot.tasks.len(),
            "remote snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Create a record. The remote assigns the identifier and returns it.
    pub async fn add(
        &self,
        env: Environment,
        entity: EntityType,
        record: &Value,
    ) -> Result<String, GatewayError> {
        tracing::info!(%env, %entity, "adding record");
        let response = self
            .post(&json!({
                "action": "add",
                "type": entity.as_str(),
                "data": record,
                "env": env.as_str(),
            }))
            .await?;

        response
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                GatewayError::MalformedResponse("add response carries no id".to_string())
            })
    }

    /// Replace a record wholesale. Partial updates are not supported by the
    /// remote; callers send the complete row.
    pub async fn update(
        &self,
        env: Environment,
        entity: EntityType,
        id: &str,
        record: &Value,
    ) -> Result<(), GatewayError> {
        tracing::info!(%env, %entity, id, "updating record");
        self.post(&json!({
            "action": "update",
            "type": entity.as_str(),
            "id": id,
            "data": record,
            "env": env.as_str(),
        }))
        .await?;
        Ok(())
    }

    /// Delete a record by identifier.
    pub async fn delete(
        &self,
        env: Environment,
        entity: EntityType,
        id: &str,
    ) -> Result<(), GatewayError> {
        tracing::info!(%env, %entity, id, "deleting record");
        self.post(&json!({
            "action": "delete",
            "type": entity.as_str(),
            "id": id,
            "env": env.as_str(),
        }))
        .await?;
        Ok(())
    }

    /// One mutation POST. A single attempt; retries are the caller's call.
    async fn post(&self, payload: &Value) -> Result<Value, GatewayError> {
        let body = serde_json::to_string(payload)?;
        let response = self
            .http
            .post(&self.base_url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "mutation failed");
            return Err(GatewayError::Remote {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        // The endpoint reports application-level failures in-band with a 200.
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unspecified remote failure");
            tracing::warn!(error = message, "remote rejected mutation");
            return Err(GatewayError::Remote {
                status: status.as_u16(),
                body: message.to_string(),
            });
        }

        Ok(value)
    }
}
