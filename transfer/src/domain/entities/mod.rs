pub mod permission_record;

pub use permission_record::PermissionRecord;
