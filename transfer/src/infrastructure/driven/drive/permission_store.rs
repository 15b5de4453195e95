use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::protocol::{
    GoogleErrorBody, Permission, PermissionCreateBody, PermissionList, PermissionUpdateBody, PERMISSION_FIELDS,
};
use tracing::debug;
use url::Url;
use super::client::AuthorizedClient;
use crate::application::ports::{NewPermission, PermissionStore, RoleChange};
use crate::domain::{ApiFailure, FileId, PermissionId, PermissionRecord, PermissionRole, TransferError};

const PAGE_SIZE: &str = "100";

/// `PermissionStore` over the Drive v3 REST API
pub struct DrivePermissionStore {
    client: AuthorizedClient,
    base_url: Url,
}

impl DrivePermissionStore {
    /// `base_url` is the API root, e.g. `https://www.googleapis.com/drive/v3`
    pub fn new(client: AuthorizedClient, base_url: Url) -> Self {
        Self { client, base_url }
    }

    fn permissions_url(&self, file_id: &FileId, permission_id: Option<&PermissionId>) -> Result<Url, TransferError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TransferError::Transport(ApiFailure::local(format!("Invalid API base URL: {}", self.base_url))))?;
            segments
                .pop_if_empty()
                .extend(["files", file_id.as_str(), "permissions"]);
            if let Some(id) = permission_id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TransferError> {
        let response = request.send().await.map_err(|e| {
            TransferError::Transport(ApiFailure::local(format!("Request failed: {e}")))
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(|e| {
                TransferError::Transport(ApiFailure::remote(
                    status.as_u16(),
                    None,
                    format!("Failed to decode response: {e}"),
                ))
            });
        }

        let body = response.text().await.unwrap_or_default();
        debug!("Drive API returned {}: {}", status, body);
        Err(error_from_body(status.as_u16(), &body))
    }
}

fn error_from_body(status: u16, body: &str) -> TransferError {
    match serde_json::from_str::<GoogleErrorBody>(body) {
        Ok(parsed) => {
            let message = parsed
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string());
            TransferError::from_status(status, parsed.reason().map(str::to_string), message)
        }
        Err(_) => TransferError::from_status(status, None, body.to_string()),
    }
}

fn to_record(permission: Permission) -> Result<PermissionRecord, TransferError> {
    let id = permission.id.ok_or_else(|| {
        TransferError::Transport(ApiFailure::local("Drive API returned a permission without an id"))
    })?;

    Ok(PermissionRecord {
        id: PermissionId::new(id),
        principal_email: permission.email_address,
        role: permission
            .role
            .as_deref()
            .map(PermissionRole::parse)
            .unwrap_or_else(|| PermissionRole::Other(String::new())),
        kind: permission.kind,
        display_name: permission.display_name,
    })
}

#[async_trait]
impl PermissionStore for DrivePermissionStore {
    async fn list(&self, file_id: &FileId) -> Result<Vec<PermissionRecord>, TransferError> {
        let url = self.permissions_url(file_id, None)?;
        let fields = format!("nextPageToken,permissions({PERMISSION_FIELDS})");
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .request(Method::GET, url.clone())
                .query(&[("fields", fields.as_str()), ("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            debug!("Listing permissions of file {}", file_id);
            let page: PermissionList = self.send(request).await?;
            for permission in page.permissions {
                records.push(to_record(permission)?);
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(records)
    }

    async fn create(&self, file_id: &FileId, permission: &NewPermission) -> Result<PermissionRecord, TransferError> {
        let url = self.permissions_url(file_id, None)?;
        let body = PermissionCreateBody {
            role: permission.role.as_str().to_string(),
            kind: "user".to_string(),
            email_address: permission.principal.as_str().to_string(),
        };
        let notify = if permission.notify { "true" } else { "false" };

        debug!("Creating {} permission on file {}", permission.role, file_id);
        let request = self
            .client
            .request(Method::POST, url)
            .query(&[("sendNotificationEmail", notify), ("fields", PERMISSION_FIELDS)])
            .json(&body);
        let created: Permission = self.send(request).await?;
        to_record(created)
    }

    async fn update(
        &self,
        file_id: &FileId,
        permission_id: &PermissionId,
        change: &RoleChange,
    ) -> Result<PermissionRecord, TransferError> {
        let url = self.permissions_url(file_id, Some(permission_id))?;
        let body = PermissionUpdateBody {
            role: change.role.as_str().to_string(),
        };
        let transfer = if change.transfer_ownership { "true" } else { "false" };

        debug!("Updating permission {} on file {} to {}", permission_id, file_id, change.role);
        let request = self
            .client
            .request(Method::PATCH, url)
            .query(&[("transferOwnership", transfer), ("fields", PERMISSION_FIELDS)])
            .json(&body);
        let updated: Permission = self.send(request).await?;
        to_record(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccessToken, PrincipalEmail};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> DrivePermissionStore {
        let client = AuthorizedClient::new(reqwest::Client::new(), AccessToken::new("test-token"));
        let base_url = Url::parse(&format!("{}/drive/v3", server.uri())).unwrap();
        DrivePermissionStore::new(client, base_url)
    }

    fn file() -> FileId {
        FileId::new("F1").unwrap()
    }

    #[tokio::test]
    async fn test_list_follows_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/F1/permissions"))
            .and(header("authorization", "Bearer test-token"))
            .and(query_param("pageSize", "100"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "permissions": [
                    {"id": "P0", "type": "user", "emailAddress": "me@b.com", "role": "owner"}
                ],
                "nextPageToken": "page-2"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/F1/permissions"))
            .and(query_param("pageToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "permissions": [
                    {"id": "anyoneWithLink", "type": "anyone", "role": "reader"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = store_for(&server).list(&file()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role, PermissionRole::Owner);
        assert_eq!(records[0].principal_email.as_deref(), Some("me@b.com"));
        assert_eq!(records[1].id.as_str(), "anyoneWithLink");
        assert_eq!(records[1].kind.as_deref(), Some("anyone"));
    }

    #[tokio::test]
    async fn test_create_sends_writer_grant_with_notification() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/drive/v3/files/F1/permissions"))
            .and(query_param("sendNotificationEmail", "true"))
            .and(body_json(json!({"role": "writer", "type": "user", "emailAddress": "New@Owner.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "P1", "type": "user", "emailAddress": "new@owner.com", "role": "writer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let grant = NewPermission {
            role: PermissionRole::Writer,
            principal: PrincipalEmail::new("New@Owner.com").unwrap(),
            notify: true,
        };
        let record = store_for(&server).create(&file(), &grant).await.unwrap();

        assert_eq!(record.id.as_str(), "P1");
        assert_eq!(record.role, PermissionRole::Writer);
    }

    #[tokio::test]
    async fn test_update_transfers_ownership() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/drive/v3/files/F1/permissions/P1"))
            .and(query_param("transferOwnership", "true"))
            .and(body_json(json!({"role": "owner"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "P1", "type": "user", "emailAddress": "new@owner.com", "role": "owner"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let change = RoleChange {
            role: PermissionRole::Owner,
            transfer_ownership: true,
        };
        let record = store_for(&server)
            .update(&file(), &PermissionId::new("P1"), &change)
            .await
            .unwrap();

        assert_eq!(record.role, PermissionRole::Owner);
    }

    #[tokio::test]
    async fn test_error_body_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files/missing/permissions"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": 404,
                    "message": "File not found: missing.",
                    "errors": [{"domain": "global", "reason": "notFound", "message": "File not found: missing."}]
                }
            })))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .list(&FileId::new("missing").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::NotFound(_)));
        let failure = err.failure();
        assert_eq!(failure.status, Some(404));
        assert_eq!(failure.reason.as_deref(), Some("notFound"));
        assert_eq!(failure.message, "File not found: missing.");
    }

    #[tokio::test]
    async fn test_consent_required_is_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {
                    "code": 403,
                    "message": "Consent is required to transfer ownership of a file to another user.",
                    "errors": [{"domain": "global", "reason": "consentRequiredForOwnershipTransfer"}]
                }
            })))
            .mount(&server)
            .await;

        let change = RoleChange {
            role: PermissionRole::Owner,
            transfer_ownership: true,
        };
        let err = store_for(&server)
            .update(&file(), &PermissionId::new("P1"), &change)
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::PermissionConflict(_)));
    }

    #[tokio::test]
    async fn test_non_json_error_keeps_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = store_for(&server).list(&file()).await.unwrap_err();

        assert!(matches!(err, TransferError::Transport(_)));
        assert_eq!(err.failure().message, "Bad Gateway");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = AuthorizedClient::new(reqwest::Client::new(), AccessToken::new("t"));
        let store = DrivePermissionStore::new(client, Url::parse("http://127.0.0.1:1/drive/v3").unwrap());

        let err = store.list(&file()).await.unwrap_err();

        assert!(matches!(err, TransferError::Transport(_)));
        assert_eq!(err.failure().status, None);
    }
}
