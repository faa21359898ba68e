//! Application state: one remote gateway plus the in-memory entity store.
//!
//! `AppClient` is an explicit state struct handed to callers; there is no
//! global instance. Reads go straight to the store. Mutations validate
//! locally, write through the gateway, then reload the full snapshot, and a
//! write lock keeps each mutation+reload pair atomic relative to other
//! mutations so a reload can never observe a half-applied neighbor.

use crate::config::Config;
use crate::error::Result;
use crate::gateway::{EntityType, Environment, RemoteGateway};
use acres_engine::{
    normalize, validate_lead, validate_property, validate_task, EntityStore, Error as EngineError,
    FollowUp, Lead, LeadId, Property, PropertyId, Snapshot, StoreCounts, Task, TaskId, TaskStatus,
};
use std::sync::RwLock;
use tokio::sync::Mutex;

/// Follow-up outcome that schedules a reminder call.
const PLANNED_OUTCOME: &str = "Planned";

pub struct AppClient {
    gateway: RemoteGateway,
    environment: RwLock<Environment>,
    store: RwLock<EntityStore>,
    write_lock: Mutex<()>,
    high_value_threshold: f64,
}

impl AppClient {
    /// Build from loaded configuration. The store starts empty; call
    /// [`AppClient::reload`] to populate it.
    pub fn new(config: &Config) -> Self {
        Self::with_gateway(
            RemoteGateway::new(config.api_url.clone()),
            config.environment,
            config.high_value_threshold,
        )
    }

    pub fn with_gateway(
        gateway: RemoteGateway,
        environment: Environment,
        high_value_threshold: f64,
    ) -> Self {
        Self {
            gateway,
            environment: RwLock::new(environment),
            store: RwLock::new(EntityStore::new()),
            write_lock: Mutex::new(()),
            high_value_threshold,
        }
    }

    pub fn environment(&self) -> Environment {
        *read_lock(&self.environment)
    }

    pub fn high_value_threshold(&self) -> f64 {
        self.high_value_threshold
    }

    /// Run a closure against the current store contents.
    ///
    /// The store lock is held only for the duration of the closure; derived
    /// results wanted across awaits should be cloned out.
    pub fn with_store<R>(&self, f: impl FnOnce(&EntityStore) -> R) -> R {
        f(&read_lock(&self.store))
    }

    pub fn counts(&self) -> StoreCounts {
        self.with_store(EntityStore::counts)
    }

    /// Leads worth an outreach nudge under the configured budget threshold.
    pub fn high_value_alerts(&self) -> Vec<Lead> {
        self.with_store(|store| {
            acres_engine::high_value_uncontacted(store.leads(), self.high_value_threshold)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Fetch a fresh snapshot and swap it in. A failed load leaves the
    /// current store untouched.
    pub async fn reload(&self) -> Result<StoreCounts> {
        let snapshot = self.gateway.load(self.environment()).await?;
        Ok(self.install(snapshot))
    }

    /// Switch datasets. Local state belongs to the old environment and is
    /// discarded before loading the new one; if that load fails the store
    /// stays empty rather than showing stale rows from the wrong dataset.
    pub async fn switch_environment(&self, env: Environment) -> Result<StoreCounts> {
        let _guard = self.write_lock.lock().await;
        *write_lock(&self.environment) = env;
        write_lock(&self.store).replace(Snapshot::default());

        let snapshot = self.gateway.load(env).await?;
        Ok(self.install(snapshot))
    }

    pub async fn add_lead(&self, lead: &Lead) -> Result<LeadId> {
        validate_lead(lead)?;
        let _guard = self.write_lock.lock().await;
        let id = self
            .gateway
            .add(self.environment(), EntityType::Lead, &normalize::lead_to_row(lead))
            .await?;
        self.reload_held().await?;
        Ok(LeadId::new(id))
    }

    pub async fn update_lead(&self, lead: &Lead) -> Result<()> {
        validate_lead(lead)?;
        self.ensure(|store| store.lead(&lead.id).is_some(), || {
            EngineError::LeadNotFound(lead.id.clone())
        })?;

        let _guard = self.write_lock.lock().await;
        self.gateway
            .update(
                self.environment(),
                EntityType::Lead,
                lead.id.as_str(),
                &normalize::lead_to_row(lead),
            )
            .await?;
        self.reload_held().await
    }

    pub async fn delete_lead(&self, id: &LeadId) -> Result<()> {
        self.ensure(|store| store.lead(id).is_some(), || {
            EngineError::LeadNotFound(id.clone())
        })?;

        let _guard = self.write_lock.lock().await;
        self.gateway
            .delete(self.environment(), EntityType::Lead, id.as_str())
            .await?;
        self.reload_held().await
    }

    pub async fn add_property(&self, property: &Property) -> Result<PropertyId> {
        validate_property(property)?;
        let _guard = self.write_lock.lock().await;
        let id = self
            .gateway
            .add(
                self.environment(),
                EntityType::Property,
                &normalize::property_to_row(property),
            )
            .await?;
        self.reload_held().await?;
        Ok(PropertyId::new(id))
    }

    pub async fn update_property(&self, property: &Property) -> Result<()> {
        validate_property(property)?;
        self.ensure(|store| store.property(&property.id).is_some(), || {
            EngineError::PropertyNotFound(property.id.clone())
        })?;

        let _guard = self.write_lock.lock().await;
        self.gateway
            .update(
                self.environment(),
                EntityType::Property,
                property.id.as_str(),
                &normalize::property_to_row(property),
            )
            .await?;
        self.reload_held().await
    }

    pub async fn delete_property(&self, id: &PropertyId) -> Result<()> {
        self.ensure(|store| store.property(id).is_some(), || {
            EngineError::PropertyNotFound(id.clone())
        })?;

        let _guard = self.write_lock.lock().await;
        self.gateway
            .delete(self.environment(), EntityType::Property, id.as_str())
            .await?;
        self.reload_held().await
    }

    pub async fn add_task(&self, task: &Task) -> Result<TaskId> {
        validate_task(task)?;
        let _guard = self.write_lock.lock().await;
        let id = self
            .gateway
            .add(self.environment(), EntityType::Task, &normalize::task_to_row(task))
            .await?;
        self.reload_held().await?;
        Ok(TaskId::new(id))
    }

    pub async fn update_task(&self, task: &Task) -> Result<()> {
        validate_task(task)?;
        self.ensure(|store| store.task(&task.id).is_some(), || {
            EngineError::TaskNotFound(task.id.clone())
        })?;

        let _guard = self.write_lock.lock().await;
        self.gateway
            .update(
                self.environment(),
                EntityType::Task,
                task.id.as_str(),
                &normalize::task_to_row(task),
            )
            .await?;
        self.reload_held().await
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<()> {
        self.ensure(|store| store.task(id).is_some(), || {
            EngineError::TaskNotFound(id.clone())
        })?;

        let _guard = self.write_lock.lock().await;
        self.gateway
            .delete(self.environment(), EntityType::Task, id.as_str())
            .await?;
        self.reload_held().await
    }

    /// Record an interaction against a lead.
    ///
    /// The entry is prepended to the lead's log and the whole record is
    /// persisted. A "Planned" outcome additionally schedules an open call
    /// task due on the follow-up date.
    pub async fn add_followup(&self, id: &LeadId, follow_up: FollowUp) -> Result<()> {
        let mut lead = self
            .with_store(|store| store.lead(id).cloned())
            .ok_or_else(|| EngineError::LeadNotFound(id.clone()))?;

        let planned = follow_up.outcome == PLANNED_OUTCOME;
        let due = normalize::parse_date(&follow_up.date);
        lead.follow_ups.insert(0, follow_up);
        if planned {
            lead.next_followup_date = due;
        }

        let _guard = self.write_lock.lock().await;
        let env = self.environment();
        self.gateway
            .update(env, EntityType::Lead, id.as_str(), &normalize::lead_to_row(&lead))
            .await?;

        if planned {
            let task = Task {
                due_date: due,
                kind: "Call".to_string(),
                status: TaskStatus::Open,
                lead_id: id.clone(),
                notes: format!("Follow up with {}", lead.name),
                ..Task::default()
            };
            self.gateway
                .add(env, EntityType::Task, &normalize::task_to_row(&task))
                .await?;
        }

        self.reload_held().await
    }

    /// Reload while the write lock is already held.
    async fn reload_held(&self) -> Result<()> {
        let snapshot = self.gateway.load(self.environment()).await?;
        self.install(snapshot);
        Ok(())
    }

    fn install(&self, snapshot: Snapshot) -> StoreCounts {
        let mut store = write_lock(&self.store);
        store.replace(snapshot);
        store.counts()
    }

    fn ensure(
        &self,
        check: impl FnOnce(&EntityStore) -> bool,
        err: impl FnOnce() -> EngineError,
    ) -> Result<()> {
        if self.with_store(check) {
            Ok(())
        } else {
            Err(err().into())
        }
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
