use crate::application::ports::PermissionStore;
use crate::domain::{FileId, PermissionRecord, TransferError};

pub async fn execute<S: PermissionStore + ?Sized>(
    store: &S,
    file_id: &FileId,
) -> Result<Vec<PermissionRecord>, TransferError> {
    store.list(file_id).await
}
