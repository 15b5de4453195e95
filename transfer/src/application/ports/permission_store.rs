// Driven port - permission endpoints of the storage provider

use async_trait::async_trait;
use crate::domain::{FileId, PermissionId, PermissionRecord, PermissionRole, PrincipalEmail, TransferError};

/// Grant created for a principal that has no permission yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPermission {
    pub role: PermissionRole,
    pub principal: PrincipalEmail,
    pub notify: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChange {
    pub role: PermissionRole,
    pub transfer_ownership: bool,
}

/// One request per call, except `list` which follows result pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn list(&self, file_id: &FileId) -> Result<Vec<PermissionRecord>, TransferError>;
    async fn create(&self, file_id: &FileId, permission: &NewPermission) -> Result<PermissionRecord, TransferError>;
    async fn update(
        &self,
        file_id: &FileId,
        permission_id: &PermissionId,
        change: &RoleChange,
    ) -> Result<PermissionRecord, TransferError>;
}
