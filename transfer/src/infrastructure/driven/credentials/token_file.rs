use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context};
use async_trait::async_trait;
use shared::credentials::{AuthorizedUserFile, ClientSecretsFile, TokenErrorResponse, TokenResponse, AUTHORIZED_USER};
use tracing::{debug, info};
use url::Url;
use crate::application::ports::CredentialProvider;
use crate::domain::{AccessToken, ApiFailure, TransferError};

/// Credential provider backed by an `authorized_user` token file.
///
/// The refresh token stored in `token_path` is exchanged at `token_url` for a
/// fresh access token on every call.
pub struct TokenFileCredentialProvider {
    http: reqwest::Client,
    token_path: PathBuf,
    credentials_path: PathBuf,
    token_url: Url,
}

impl TokenFileCredentialProvider {
    pub fn new(http: reqwest::Client, token_path: PathBuf, credentials_path: PathBuf, token_url: Url) -> Self {
        Self {
            http,
            token_path,
            credentials_path,
            token_url,
        }
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    async fn load_saved(&self) -> Result<AuthorizedUserFile, TransferError> {
        let content = match tokio::fs::read_to_string(&self.token_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TransferError::Auth(ApiFailure::local(format!(
                    "No saved credential at {}; run `drive-owner-transfer login --refresh-token <TOKEN>` first",
                    self.token_path.display()
                ))));
            }
            Err(e) => {
                return Err(TransferError::Auth(ApiFailure::local(format!(
                    "Failed to read {}: {e}",
                    self.token_path.display()
                ))));
            }
        };

        let saved: AuthorizedUserFile = serde_json::from_str(&content).map_err(|e| {
            TransferError::Auth(ApiFailure::local(format!(
                "Malformed credential in {}: {e}",
                self.token_path.display()
            )))
        })?;
        if saved.kind != AUTHORIZED_USER {
            return Err(TransferError::Auth(ApiFailure::local(format!(
                "Unsupported credential type '{}' in {}",
                saved.kind,
                self.token_path.display()
            ))));
        }
        Ok(saved)
    }

    /// Exchange the refresh token of `saved` for an access token
    async fn refresh(&self, saved: &AuthorizedUserFile) -> Result<AccessToken, TransferError> {
        debug!("Refreshing access token at {}", self.token_url);
        let response = self
            .http
            .post(self.token_url.clone())
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", saved.client_id.as_str()),
                ("client_secret", saved.client_secret.as_str()),
                ("refresh_token", saved.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TransferError::Transport(ApiFailure::local(format!("Token refresh failed: {e}"))))?;

        let status = response.status();
        if status.is_success() {
            let token: TokenResponse = response.json().await.map_err(|e| {
                TransferError::Transport(ApiFailure::remote(
                    status.as_u16(),
                    None,
                    format!("Failed to decode token response: {e}"),
                ))
            })?;
            return Ok(AccessToken::new(token.access_token));
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: TokenErrorResponse = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed
            .error_description
            .clone()
            .or_else(|| parsed.error.clone())
            .unwrap_or(body);
        let failure = ApiFailure::remote(status.as_u16(), parsed.error, message);

        // invalid_grant and invalid_client come back as 400/401
        if matches!(status.as_u16(), 400 | 401) {
            Err(TransferError::Auth(failure))
        } else {
            Err(TransferError::Transport(failure))
        }
    }

    /// Persist a refresh token together with the client secrets from
    /// `credentials_path`. The token is refreshed once first, so a rejected
    /// token is never written.
    pub async fn save_authorized_user(&self, refresh_token: &str) -> anyhow::Result<()> {
        if refresh_token.trim().is_empty() {
            bail!("Refresh token must not be empty");
        }

        let content = tokio::fs::read_to_string(&self.credentials_path)
            .await
            .with_context(|| format!("Failed to read {}", self.credentials_path.display()))?;
        let secrets: ClientSecretsFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.credentials_path.display()))?;
        let Some(client) = secrets.client() else {
            bail!(
                "{} has neither an 'installed' nor a 'web' client section",
                self.credentials_path.display()
            );
        };

        let payload = AuthorizedUserFile::new(client, refresh_token.trim().to_string());
        self.refresh(&payload).await?;

        let json = serde_json::to_string_pretty(&payload)?;
        tokio::fs::write(&self.token_path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.token_path.display()))?;
        restrict_permissions(&self.token_path).await?;

        info!("Saved credential to {}", self.token_path.display());
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .with_context(|| format!("Failed to restrict permissions of {}", path.display()))
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}

#[async_trait]
impl CredentialProvider for TokenFileCredentialProvider {
    async fn access_token(&self) -> Result<AccessToken, TransferError> {
        let saved = self.load_saved().await?;

        self.refresh(&saved).await
    }
}
