// Application ports - Driven ports (output ports implemented by infrastructure)

pub mod credential_provider;
pub mod permission_store;

pub use credential_provider::CredentialProvider;
pub use permission_store::{NewPermission, PermissionStore, RoleChange};
