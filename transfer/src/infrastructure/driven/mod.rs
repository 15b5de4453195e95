pub mod credentials;
pub mod drive;

pub use credentials::TokenFileCredentialProvider;
pub use drive::{AuthorizedClient, DrivePermissionStore};
