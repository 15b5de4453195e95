use crate::application::ports::CredentialProvider;
use crate::domain::{AccessToken, TransferError};

/// HTTP client paired with a bearer token for the Drive API
#[derive(Debug, Clone)]
pub struct AuthorizedClient {
    http: reqwest::Client,
    token: AccessToken,
}

impl AuthorizedClient {
    pub fn new(http: reqwest::Client, token: AccessToken) -> Self {
        Self { http, token }
    }

    pub async fn authorize<C: CredentialProvider + ?Sized>(
        http: reqwest::Client,
        credentials: &C,
    ) -> Result<Self, TransferError> {
        let token = credentials.access_token().await?;
        Ok(Self::new(http, token))
    }

    pub fn request(&self, method: reqwest::Method, url: url::Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(self.token.secret())
    }
}
