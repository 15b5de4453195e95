mod client;
mod permission_store;

pub use client::AuthorizedClient;
pub use permission_store::DrivePermissionStore;
