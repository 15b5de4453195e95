use crate::domain::value_objects::*;

/// One principal's role on one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRecord {
    pub id: PermissionId,
    /// Absent for `anyone` and `domain` grants
    pub principal_email: Option<String>,
    pub role: PermissionRole,
    pub kind: Option<String>,
    pub display_name: Option<String>,
}

impl PermissionRecord {
    pub fn new(id: impl Into<String>, principal_email: Option<&str>, role: PermissionRole) -> Self {
        Self {
            id: PermissionId::new(id),
            principal_email: principal_email.map(str::to_string),
            role,
            kind: None,
            display_name: None,
        }
    }

    pub fn belongs_to(&self, email: &PrincipalEmail) -> bool {
        self.principal_email
            .as_deref()
            .map(|candidate| email.matches(candidate))
            .unwrap_or(false)
    }
}
