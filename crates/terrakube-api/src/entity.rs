//! Generic remote entity client
//!
//! Every Terrakube entity handled here lives under
//! `/api/v1/organization/{org}/{kind}` and is exchanged as a single JSON:API
//! resource object. `EntityClient` performs one lifecycle call per method,
//! parameterized by an [`EntityKind`] descriptor.

use crate::client::{ApiClient, error_for_status};
use crate::error::{ApiError, Result};
use crate::jsonapi::Document;
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Descriptor of one entity kind
pub trait EntityKind: Send + Sync + 'static {
    /// JSON:API resource type, also used as the path segment
    const KIND: &'static str;

    /// Wire attributes of the entity
    type Attributes: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync;
}

/// An entity as the server returned it
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<A> {
    pub id: String,
    pub attributes: A,
}

/// CRUD client for entities of kind `K`
pub struct EntityClient<K: EntityKind> {
    api: Arc<ApiClient>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: EntityKind> Clone for EntityClient<K> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            _kind: PhantomData,
        }
    }
}

impl<K: EntityKind> EntityClient<K> {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            _kind: PhantomData,
        }
    }

    /// POST a new entity; the server assigns its id
    pub async fn create(
        &self,
        organization_id: &str,
        attributes: &K::Attributes,
    ) -> Result<Entity<K::Attributes>> {
        let body = Document::new(K::KIND, None, attributes).to_vec()?;
        let url = self.api.collection_url(organization_id, K::KIND)?;

        let response = self.api.send(Method::POST, url, Some(body)).await?;
        let response = error_for_status(response).await?;
        self.decode(response).await
    }

    /// GET one entity. A 404 becomes `ApiError::NotFound`.
    pub async fn read(&self, organization_id: &str, id: &str) -> Result<Entity<K::Attributes>> {
        let url = self.api.entity_url(organization_id, K::KIND, id)?;

        let response = self.api.send(Method::GET, url, None).await?;
        let response = self.check(response, organization_id, id).await?;
        self.decode(response).await
    }

    /// PATCH the entity, then read it back.
    ///
    /// The PATCH response may be partial, so its body is only logged and the
    /// returned entity always comes from a fresh GET.
    pub async fn update(
        &self,
        organization_id: &str,
        id: &str,
        attributes: &K::Attributes,
    ) -> Result<Entity<K::Attributes>> {
        let body = Document::new(K::KIND, Some(id.to_string()), attributes).to_vec()?;
        let url = self.api.entity_url(organization_id, K::KIND, id)?;

        let response = self.api.send(Method::PATCH, url, Some(body)).await?;
        let response = self.check(response, organization_id, id).await?;

        match response.text().await {
            Ok(body) => {
                tracing::info!(kind = K::KIND, body_response = %body, "Body Response");
            }
            Err(e) => {
                tracing::error!(kind = K::KIND, error = %e, "Error reading resource response");
            }
        }

        self.read(organization_id, id).await
    }

    /// DELETE the entity. An entity that is already gone counts as deleted.
    pub async fn delete(&self, organization_id: &str, id: &str) -> Result<()> {
        let url = self.api.entity_url(organization_id, K::KIND, id)?;

        let response = self.api.send(Method::DELETE, url, None).await?;
        match self.check(response, organization_id, id).await {
            Ok(_) => Ok(()),
            Err(ApiError::NotFound { .. }) => {
                tracing::debug!(kind = K::KIND, id = %id, "Entity already absent, nothing to delete");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn check(&self, response: Response, organization_id: &str, id: &str) -> Result<Response> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                kind: K::KIND,
                organization_id: organization_id.to_string(),
                id: id.to_string(),
            });
        }
        error_for_status(response).await
    }

    async fn decode(&self, response: Response) -> Result<Entity<K::Attributes>> {
        let body = response.bytes().await?;
        tracing::info!(
            kind = K::KIND,
            body_response = %String::from_utf8_lossy(&body),
            "Body Response"
        );

        let (id, attributes) = Document::<K::Attributes>::decode(&body, K::KIND)?;
        Ok(Entity { id, attributes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectionConfig;
    use crate::team::{Team, TeamAttributes};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn team_client(mock_server: &MockServer) -> EntityClient<Team> {
        let config = ConnectionConfig::new(mock_server.uri(), "test_token_12345");
        EntityClient::new(Arc::new(ApiClient::new(&config).unwrap()))
    }

    fn team_body(id: &str, name: &str, manage_job: bool) -> serde_json::Value {
        json!({
            "data": {
                "type": "team",
                "id": id,
                "attributes": {
                    "name": name,
                    "manageState": false,
                    "manageWorkspace": false,
                    "manageModule": false,
                    "manageProvider": false,
                    "manageVcs": false,
                    "manageTemplate": false,
                    "manageJob": manage_job,
                    "manageCollection": false
                }
            }
        })
    }

    #[tokio::test]
    async fn test_create_posts_document_without_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/organization/org1/team"))
            .and(header("Authorization", "Bearer test_token_12345"))
            .and(header("Content-Type", "application/vnd.api+json"))
            .and(body_json(json!({
                "data": {
                    "type": "team",
                    "attributes": {
                        "name": "infra-admins",
                        "manageState": false,
                        "manageWorkspace": false,
                        "manageModule": false,
                        "manageProvider": false,
                        "manageVcs": false,
                        "manageTemplate": false,
                        "manageJob": true,
                        "manageCollection": false
                    }
                }
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(team_body("t-1", "infra-admins", true)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let attributes = TeamAttributes {
            name: "infra-admins".to_string(),
            manage_job: true,
            ..Default::default()
        };
        let entity = team_client(&mock_server)
            .create("org1", &attributes)
            .await
            .unwrap();

        assert_eq!(entity.id, "t-1");
        assert_eq!(entity.attributes, attributes);
    }

    #[tokio::test]
    async fn test_create_rejects_undecodable_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/organization/org1/team"))
            .respond_with(ResponseTemplate::new(201).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let err = team_client(&mock_server)
            .create("org1", &TeamAttributes::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decoding(_)));
    }

    #[tokio::test]
    async fn test_create_surfaces_api_error_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/organization/org1/team"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "errors": [{ "detail": "Insufficient permissions" }]
            })))
            .mount(&mock_server)
            .await;

        let err = team_client(&mock_server)
            .create("org1", &TeamAttributes::default())
            .await
            .unwrap_err();

        assert!(err.is_transport());
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(message, "Insufficient permissions");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organization/org1/team/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = team_client(&mock_server)
            .read("org1", "gone")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_read_escapes_identifier() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/organization/org1/team/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(team_body("a/b", "odd", false)))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/organization/org2/team/t9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(team_body("t9", "other", true)))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = team_client(&mock_server);

        let team = client.read("org1", "a/b").await.unwrap();
        assert_eq!(team.id, "a/b");

        let err = client
            .read("org1", "../../organization/org2/team/t9")
            .await
            .unwrap_err();
        // unmatched requests get wiremock's default 404
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_dot_identifier_sends_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&mock_server)
            .await;

        let err = team_client(&mock_server).delete("org1", "..").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn test_update_refetches_after_patch() {
        let mock_server = MockServer::start().await;

        // Partial PATCH response that would not decode on its own
        Mock::given(method("PATCH"))
            .and(path("/api/v1/organization/org1/team/t-1"))
            .and(header("Authorization", "Bearer test_token_12345"))
            .and(body_json(json!({
                "data": {
                    "type": "team",
                    "id": "t-1",
                    "attributes": {
                        "name": "infra-admins",
                        "manageState": true,
                        "manageWorkspace": false,
                        "manageModule": false,
                        "manageProvider": false,
                        "manageVcs": false,
                        "manageTemplate": false,
                        "manageJob": true,
                        "manageCollection": false
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut refreshed = team_body("t-1", "infra-admins", true);
        refreshed["data"]["attributes"]["manageState"] = json!(true);
        Mock::given(method("GET"))
            .and(path("/api/v1/organization/org1/team/t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(refreshed))
            .expect(1)
            .mount(&mock_server)
            .await;

        let attributes = TeamAttributes {
            name: "infra-admins".to_string(),
            manage_state: true,
            manage_job: true,
            ..Default::default()
        };
        let entity = team_client(&mock_server)
            .update("org1", "t-1", &attributes)
            .await
            .unwrap();

        assert_eq!(entity.id, "t-1");
        assert!(entity.attributes.manage_state);
        assert!(entity.attributes.manage_job);
    }

    #[tokio::test]
    async fn test_update_missing_entity() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/api/v1/organization/org1/team/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = team_client(&mock_server)
            .update("org1", "gone", &TeamAttributes::default())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/organization/org1/team/t-1"))
            .and(header("Authorization", "Bearer test_token_12345"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        team_client(&mock_server).delete("org1", "t-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_already_absent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/organization/org1/team/t-1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        assert!(team_client(&mock_server).delete("org1", "t-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/v1/organization/org1/team/t-1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = team_client(&mock_server)
            .delete("org1", "t-1")
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Status { message, .. } if message == "boom"));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let config = ConnectionConfig::new("http://127.0.0.1:1", "test_token_12345");
        let client: EntityClient<Team> =
            EntityClient::new(Arc::new(ApiClient::new(&config).unwrap()));

        let err = client.read("org1", "t-1").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
