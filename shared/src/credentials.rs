use serde::{Deserialize, Serialize};

/// Client secrets file downloaded from the Google Cloud console.
/// Desktop clients use the `installed` section, web clients the `web` one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSecretsFile {
    #[serde(default)]
    pub installed: Option<ClientSecrets>,
    #[serde(default)]
    pub web: Option<ClientSecrets>,
}

impl ClientSecretsFile {
    pub fn client(&self) -> Option<&ClientSecrets> {
        self.installed.as_ref().or(self.web.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
}

pub const AUTHORIZED_USER: &str = "authorized_user";

/// Persisted user credential (`token.json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedUserFile {
    #[serde(rename = "type")]
    pub kind: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl AuthorizedUserFile {
    pub fn new(client: &ClientSecrets, refresh_token: String) -> Self {
        Self {
            kind: AUTHORIZED_USER.to_string(),
            client_id: client.client_id.clone(),
            client_secret: client.client_secret.clone(),
            refresh_token,
        }
    }
}

/// Successful response of the OAuth token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Error response of the OAuth token endpoint, e.g. `invalid_grant`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}
