use serde::{Deserialize, Serialize};

/// Field mask requested for every permission the API returns
pub const PERMISSION_FIELDS: &str = "id,type,emailAddress,role,displayName";

/// A permission resource as returned by the Drive v3 API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default)]
    pub id: Option<String>,
    /// `user`, `group`, `domain` or `anyone`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One page of `permissions.list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionList {
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Request body for `permissions.create`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCreateBody {
    pub role: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub email_address: String,
}

/// Request body for `permissions.update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionUpdateBody {
    pub role: String,
}

/// Error envelope used by Google APIs:
/// `{"error": {"code": 404, "message": "...", "errors": [{"reason": "notFound", ...}]}}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleErrorBody {
    #[serde(default)]
    pub error: GoogleError,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errors: Vec<GoogleErrorItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleErrorItem {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GoogleErrorBody {
    /// First machine-readable reason in the envelope, if any
    pub fn reason(&self) -> Option<&str> {
        self.error
            .errors
            .iter()
            .find_map(|item| item.reason.as_deref())
    }

    pub fn message(&self) -> Option<&str> {
        self.error.message.as_deref()
    }
}
