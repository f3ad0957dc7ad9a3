use async_trait::async_trait;
use shared::{
    domain::{OwnerId, Report, ReportFields, ReportId},
    error::StoreError,
};
use storage::Storage;

/// Persistence operations for report records, always scoped to the owning
/// identity. The workflows only ever see this trait.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn create(&self, owner: &OwnerId, fields: &ReportFields) -> Result<ReportId, StoreError>;
    async fn query(&self, owner: &OwnerId) -> Result<Vec<Report>, StoreError>;
    async fn update(
        &self,
        id: &ReportId,
        owner: &OwnerId,
        fields: &ReportFields,
    ) -> Result<(), StoreError>;
    async fn delete(&self, id: &ReportId, owner: &OwnerId) -> Result<(), StoreError>;
}

/// Stand-in used when no store has been wired; every call fails.
pub struct MissingReportStore;

#[async_trait]
impl ReportStore for MissingReportStore {
    async fn create(
        &self,
        _owner: &OwnerId,
        _fields: &ReportFields,
    ) -> Result<ReportId, StoreError> {
        Err(StoreError::Unavailable("report store unavailable".into()))
    }

    async fn query(&self, _owner: &OwnerId) -> Result<Vec<Report>, StoreError> {
        Err(StoreError::Unavailable("report store unavailable".into()))
    }

    async fn update(
        &self,
        _id: &ReportId,
        _owner: &OwnerId,
        _fields: &ReportFields,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("report store unavailable".into()))
    }

    async fn delete(&self, _id: &ReportId, _owner: &OwnerId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("report store unavailable".into()))
    }
}

#[async_trait]
impl ReportStore for Storage {
    async fn create(&self, owner: &OwnerId, fields: &ReportFields) -> Result<ReportId, StoreError> {
        self.create_report(owner, fields)
            .await
            .map_err(unavailable)
    }

    async fn query(&self, owner: &OwnerId) -> Result<Vec<Report>, StoreError> {
        self.reports_for_owner(owner).await.map_err(unavailable)
    }

    async fn update(
        &self,
        id: &ReportId,
        owner: &OwnerId,
        fields: &ReportFields,
    ) -> Result<(), StoreError> {
        let matched = self
            .update_report(id, owner, fields)
            .await
            .map_err(unavailable)?;
        if matched {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    async fn delete(&self, id: &ReportId, owner: &OwnerId) -> Result<(), StoreError> {
        let matched = self.delete_report(id, owner).await.map_err(unavailable)?;
        if matched {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

fn unavailable(e: anyhow::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}
