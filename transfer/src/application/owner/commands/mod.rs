pub mod list_permissions;
pub mod transfer_ownership;
