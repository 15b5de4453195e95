pub mod access_token;
pub mod file_id;
pub mod permission_id;
pub mod permission_role;
pub mod principal_email;

pub use access_token::AccessToken;
pub use file_id::FileId;
pub use permission_id::PermissionId;
pub use permission_role::PermissionRole;
pub use principal_email::PrincipalEmail;
