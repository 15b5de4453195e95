use std::sync::Arc;
use tracing::{debug, info};
use crate::application::ports::{NewPermission, PermissionStore, RoleChange};
use crate::domain::{
    FileId, PermissionId, PermissionRecord, PermissionRole, PrincipalEmail, TransferError,
};

/// Request to make `target_email` the owner of `file_id`
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub file_id: FileId,
    pub target_email: PrincipalEmail,
}

/// How the permission that gets promoted was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Existing {
        id: PermissionId,
        previous_role: PermissionRole,
    },
    Created {
        id: PermissionId,
    },
}

impl Resolution {
    pub fn permission_id(&self) -> &PermissionId {
        match self {
            Self::Existing { id, .. } | Self::Created { id } => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub permission: PermissionRecord,
    pub resolution: Resolution,
}

/// Resolves which permission to promote and promotes it to owner.
///
/// The provider only transfers ownership to a principal that already holds a
/// permission on the file, so a principal without one first gets a `writer`
/// grant. An existing grant is reused, which keeps a re-run after a failed
/// promotion from creating a second grant.
///
/// Overlapping calls for the same file and target may both create a grant.
pub struct OwnershipTransferResolver {
    store: Arc<dyn PermissionStore>,
}

impl OwnershipTransferResolver {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, request: TransferRequest) -> Result<TransferOutcome, TransferError> {
        info!(
            "Starting ownership transfer of file {} to {}",
            request.file_id, request.target_email
        );

        let resolution = self.resolve_target(&request).await?;
        let permission_id = resolution.permission_id();

        info!("Promoting permission {} to owner", permission_id);
        let change = RoleChange {
            role: PermissionRole::Owner,
            transfer_ownership: true,
        };
        let permission = self
            .store
            .update(&request.file_id, permission_id, &change)
            .await?;

        info!(
            "Ownership of file {} transferred to {}",
            request.file_id, request.target_email
        );
        Ok(TransferOutcome {
            permission,
            resolution,
        })
    }

    async fn resolve_target(&self, request: &TransferRequest) -> Result<Resolution, TransferError> {
        info!("Checking existing permissions on file {}", request.file_id);
        let permissions = self.store.list(&request.file_id).await?;
        debug!("Current permissions: {:?}", permissions);

        // First match wins if the provider ever returns duplicates
        if let Some(existing) = permissions
            .iter()
            .find(|p| p.belongs_to(&request.target_email))
        {
            info!(
                "{} already has access with role {}, reusing permission {}",
                request.target_email, existing.role, existing.id
            );
            return Ok(Resolution::Existing {
                id: existing.id.clone(),
                previous_role: existing.role.clone(),
            });
        }

        info!("Adding {} as writer first", request.target_email);
        let grant = NewPermission {
            role: PermissionRole::Writer,
            principal: request.target_email.clone(),
            notify: true,
        };
        let created = self.store.create(&request.file_id, &grant).await?;
        info!("Created permission {}", created.id);

        Ok(Resolution::Created { id: created.id })
    }
}
