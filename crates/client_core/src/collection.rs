use std::sync::Arc;

use shared::{
    domain::{Identity, Report, ReportFields, ReportId},
    error::StoreError,
};
use tracing::error;

use crate::store::ReportStore;

/// The owner's reports, cached in memory for one page lifetime. The store is
/// the sole source of truth: every mutation is followed by a mandatory full
/// reload before the view is considered consistent again.
pub struct ReportCollection {
    store: Arc<dyn ReportStore>,
    owner: Identity,
    reports: Vec<Report>,
}

impl ReportCollection {
    pub fn new(store: Arc<dyn ReportStore>, owner: Identity) -> Self {
        Self {
            store,
            owner,
            reports: Vec::new(),
        }
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn contains(&self, id: &ReportId) -> bool {
        self.reports.iter().any(|report| &report.id == id)
    }

    /// Replaces the cached view wholesale with the store's current state.
    /// An empty result is an empty view, not an error.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        match self.store.query(&self.owner.id).await {
            Ok(reports) => {
                self.reports = reports;
                Ok(())
            }
            Err(e) => {
                error!(%e, owner = %self.owner.id.as_str(), "failed to load reports");
                Err(e)
            }
        }
    }

    /// Rewrites all content fields of one report in a single store call,
    /// then reloads. The id must reference a report currently in the cached
    /// view; operating on stale or deleted state is rejected before any
    /// store call. A store failure leaves the cached view unchanged.
    pub async fn edit(&mut self, id: &ReportId, fields: &ReportFields) -> Result<(), StoreError> {
        if !self.contains(id) {
            return Err(StoreError::NotFound);
        }
        self.store.update(id, &self.owner.id, fields).await?;
        self.load().await
    }

    /// Deletes one report, then reloads. Unconditional once invoked; the UI
    /// obtains the user's confirmation first. A store failure leaves the
    /// view unchanged and is surfaced.
    pub async fn delete(&mut self, id: &ReportId) -> Result<(), StoreError> {
        self.store.delete(id, &self.owner.id).await?;
        self.load().await
    }
}
