// Driven port - source of an authorized API session

use async_trait::async_trait;
use crate::domain::{AccessToken, TransferError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Load the persisted credential and exchange it for a bearer token
    async fn access_token(&self) -> Result<AccessToken, TransferError>;
}
