//! Application state management
//!
//! Shared resources handed to every handler through Axum's state extraction.
//! All fields are cheap to clone.

use crate::config::AppConfig;
use crate::repositories::RecordStore;
use crate::services::text_generation::{self, TextGenerator};
use anyhow::Result;
use fitness_analytics_shared::{AdjustmentPolicy, ClassificationTable};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Per-plan async locks serializing read-adjust-write cycles
///
/// Entries live only while some caller holds a [`PlanLock`] for the plan.
#[derive(Clone, Default)]
pub struct PlanLocks {
    inner: Arc<Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>>,
}

impl PlanLocks {
    /// Lock handle for `plan_id`, created on first use
    pub fn for_plan(&self, plan_id: Uuid) -> PlanLock {
        let mutex = self.entries().entry(plan_id).or_default().clone();
        PlanLock {
            plan_id,
            mutex,
            locks: self.clone(),
        }
    }

    /// Number of plans with a live lock handle
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Handle on one plan's lock; dropping the last handle removes the entry
pub struct PlanLock {
    plan_id: Uuid,
    mutex: Arc<tokio::sync::Mutex<()>>,
    locks: PlanLocks,
}

impl PlanLock {
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.mutex.lock().await
    }

    pub fn try_lock(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        self.mutex.try_lock().ok()
    }
}

impl Drop for PlanLock {
    fn drop(&mut self) {
        let mut entries = self.locks.entries();
        // the map holds one reference, this handle the other
        if Arc::strong_count(&self.mutex) <= 2 {
            entries.remove(&self.plan_id);
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Record store collaborator
    pub store: Arc<dyn RecordStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Advice text generator
    pub text: Arc<dyn TextGenerator>,
    /// Body-part classification table, loaded once at startup
    pub classification: Arc<ClassificationTable>,
    /// Adjustment rules built from the configured fatigue vocabulary
    pub policy: Arc<AdjustmentPolicy>,
    pub plan_locks: PlanLocks,
    /// Prometheus render handle, absent when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the state from configuration
    ///
    /// Loads the classification table and picks the text generator based on
    /// `ai.enabled`.
    pub fn new(store: Arc<dyn RecordStore>, config: AppConfig) -> Result<Self> {
        let text = text_generation::from_config(&config.ai)?;
        Self::with_text_generator(store, config, text)
    }

    /// Build the state with an explicit text generator
    pub fn with_text_generator(
        store: Arc<dyn RecordStore>,
        config: AppConfig,
        text: Arc<dyn TextGenerator>,
    ) -> Result<Self> {
        let classification = config.analytics.classification_table()?;
        let policy = AdjustmentPolicy::new(config.analytics.fatigue_keywords.iter().cloned());

        Ok(Self {
            store,
            config: Arc::new(config),
            text,
            classification: Arc::new(classification),
            policy: Arc::new(policy),
            plan_locks: PlanLocks::default(),
            metrics: None,
        })
    }

    /// Attach the Prometheus handle served on `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the record store
    #[inline]
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
