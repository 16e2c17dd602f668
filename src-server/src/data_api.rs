//! Managed Data API Client
//!
//! GraphQL over HTTP against the platform's data endpoint. A client is built
//! once at startup; each page request borrows it through [`DataApiClient::scoped`]
//! with that request's session so calls carry the caller's credentials.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use todo_core::config::DataConfig;
use todo_core::{
    BackendError, BackendResult, ListResult, NewTodo, RequestSession, Todo, TodoBackend, TodoId,
};

const TODO_FIELDS: &str = "id content priority createdAt updatedAt";

/// Upper bound on followed `nextToken`s for one list call
const MAX_PAGES: usize = 100;

#[derive(Clone)]
pub struct DataApiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

/// The client bound to one request's credentials
pub struct ScopedDataApi<'a> {
    client: &'a DataApiClient,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(default, rename = "errorType")]
    error_type: Option<String>,
}

impl GraphQlError {
    fn into_backend_error(self) -> BackendError {
        match self.error_type.as_deref() {
            Some("Unauthorized") => BackendError::Unauthorized(self.message),
            Some(t) if t.ends_with("ConditionalCheckFailedException") => {
                BackendError::NotFound(self.message)
            }
            _ => BackendError::rejected(self.message),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListTodosData {
    list_todos: Option<TodoConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoConnection {
    #[serde(default)]
    items: Vec<Option<Todo>>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodoData {
    create_todo: Option<Todo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteTodoData {
    delete_todo: Option<Value>,
}

impl DataApiClient {
    pub fn new(config: &DataConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            endpoint: config.url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn scoped(&self, session: &RequestSession) -> ScopedDataApi<'_> {
        ScopedDataApi {
            client: self,
            token: session
                .access_token
                .clone()
                .or_else(|| session.id_token.clone()),
        }
    }
}

impl ScopedDataApi<'_> {
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> BackendResult<GraphQlResponse<T>> {
        let mut request = self
            .client
            .http
            .post(&self.client.endpoint)
            .json(&json!({ "query": query, "variables": variables }));
        if let Some(token) = &self.token {
            request = request.header("Authorization", token);
        }
        if let Some(key) = &self.client.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(BackendError::Unauthorized(format!(
                    "data API returned {}",
                    response.status()
                )))
            }
            status if !status.is_success() => {
                return Err(BackendError::Network(format!("data API returned {status}")))
            }
            _ => {}
        }
        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Run a mutation whose answer is a single payload
    async fn mutate<T: DeserializeOwned>(&self, query: &str, variables: Value) -> BackendResult<T> {
        let response: GraphQlResponse<T> = self.execute(query, variables).await?;
        if let Some(error) = response.errors.into_iter().next() {
            return Err(error.into_backend_error());
        }
        response
            .data
            .ok_or_else(|| BackendError::Decode("response carried no data".to_string()))
    }
}

#[async_trait]
impl<'a> TodoBackend for ScopedDataApi<'a> {
    async fn create(&self, todo: NewTodo) -> BackendResult<Todo> {
        let query = format!(
            "mutation CreateTodo($input: CreateTodoInput!) {{ createTodo(input: $input) {{ {TODO_FIELDS} }} }}"
        );
        let data: CreateTodoData = self
            .mutate(&query, json!({ "input": todo }))
            .await?;
        data.create_todo
            .ok_or_else(|| BackendError::rejected("createTodo returned null"))
    }

    async fn delete(&self, id: &TodoId) -> BackendResult<()> {
        let query = "mutation DeleteTodo($input: DeleteTodoInput!) { deleteTodo(input: $input) { id } }";
        let data: DeleteTodoData = self
            .mutate(query, json!({ "input": { "id": id } }))
            .await?;
        match data.delete_todo {
            Some(_) => Ok(()),
            None => Err(BackendError::NotFound(id.to_string())),
        }
    }

    async fn list(&self) -> BackendResult<ListResult> {
        let query = format!(
            "query ListTodos($nextToken: String) {{ listTodos(nextToken: $nextToken) {{ items {{ {TODO_FIELDS} }} nextToken }} }}"
        );
        let mut result = ListResult::default();
        let mut next_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page: GraphQlResponse<ListTodosData> = self
                .execute(&query, json!({ "nextToken": next_token }))
                .await?;
            let errors: Vec<BackendError> = page
                .errors
                .into_iter()
                .map(GraphQlError::into_backend_error)
                .collect();

            let Some(connection) = page.data.and_then(|d| d.list_todos) else {
                if result.items.is_empty() && errors.is_empty() {
                    return Err(BackendError::Decode("listTodos returned no data".to_string()));
                }
                result.errors.extend(errors);
                next_token = None;
                break;
            };
            result.errors.extend(errors);
            result.items.extend(connection.items.into_iter().flatten());

            next_token = connection.next_token;
            if next_token.is_none() {
                break;
            }
        }

        if next_token.is_some() {
            tracing::warn!("listTodos still paginating after {MAX_PAGES} pages, truncating");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard, api_key: Option<&str>) -> DataApiClient {
        let config = DataConfig {
            url: format!("{}/graphql", server.url()),
            aws_region: "eu-west-1".into(),
            default_authorization_type: None,
            api_key: api_key.map(str::to_string),
        };
        DataApiClient::new(&config, reqwest::Client::new())
    }

    fn session() -> RequestSession {
        RequestSession {
            username: Some("alice".into()),
            id_token: Some("id-token".into()),
            access_token: Some("access-token".into()),
        }
    }

    #[tokio::test]
    async fn test_list_follows_pages_and_skips_null_items() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/graphql")
            .match_header("authorization", "access-token")
            .match_body(Matcher::PartialJson(json!({ "variables": { "nextToken": null } })))
            .with_status(200)
            .with_body(
                r#"{"data":{"listTodos":{"items":[{"id":"1","content":"Buy milk","priority":0},null],"nextToken":"p2"}}}"#,
            )
            .create_async()
            .await;
        let second = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({ "variables": { "nextToken": "p2" } })))
            .with_status(200)
            .with_body(r#"{"data":{"listTodos":{"items":[{"id":"2","content":"Walk dog"}],"nextToken":null}}}"#)
            .create_async()
            .await;

        let api = client(&server, None);
        let result = api.scoped(&session()).list().await.unwrap();
        let contents: Vec<_> = result.items.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, ["Buy milk", "Walk dog"]);
        assert!(!result.is_partial());
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_keeps_data_alongside_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(
                r#"{"data":{"listTodos":{"items":[{"id":"1","content":"Buy milk"}],"nextToken":null}},"errors":[{"message":"field resolver failed"}]}"#,
            )
            .create_async()
            .await;

        let result = client(&server, None).scoped(&session()).list().await.unwrap();
        assert_eq!(result.items.len(), 1);
        assert!(result.is_partial());
    }

    #[tokio::test]
    async fn test_list_with_only_errors_is_partial_and_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(r#"{"data":null,"errors":[{"message":"Not Authorized","errorType":"Unauthorized"}]}"#)
            .create_async()
            .await;

        let result = client(&server, None).scoped(&session()).list().await.unwrap();
        assert!(result.items.is_empty());
        assert!(matches!(result.errors[0], BackendError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_http_401_is_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(401)
            .create_async()
            .await;

        let err = client(&server, None)
            .scoped(&RequestSession::anonymous())
            .list()
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_create_returns_assigned_todo() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/graphql")
            .match_header("x-api-key", "key-1")
            .match_body(Matcher::PartialJson(
                json!({ "variables": { "input": { "content": "Buy milk", "priority": 0 } } }),
            ))
            .with_status(200)
            .with_body(r#"{"data":{"createTodo":{"id":"abc","content":"Buy milk","priority":0}}}"#)
            .create_async()
            .await;

        let todo = client(&server, Some("key-1"))
            .scoped(&session())
            .create(NewTodo::new("Buy milk"))
            .await
            .unwrap();
        assert_eq!(todo.id.as_str(), "abc");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_rejection_surfaces_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(r#"{"data":{"createTodo":null},"errors":[{"message":"validation failed"}]}"#)
            .create_async()
            .await;

        let err = client(&server, None)
            .scoped(&session())
            .create(NewTodo::new("x"))
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::rejected("validation failed"));
    }

    #[tokio::test]
    async fn test_delete_of_missing_todo_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({ "variables": { "input": { "id": "gone" } } })))
            .with_status(200)
            .with_body(
                r#"{"data":{"deleteTodo":null},"errors":[{"message":"The conditional request failed","errorType":"DynamoDB:ConditionalCheckFailedException"}]}"#,
            )
            .create_async()
            .await;

        let err = client(&server, None)
            .scoped(&session())
            .delete(&TodoId::assigned("gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let config = DataConfig {
            url: "http://127.0.0.1:1/graphql".into(),
            aws_region: "local".into(),
            default_authorization_type: None,
            api_key: None,
        };
        let api = DataApiClient::new(&config, reqwest::Client::new());
        let err = api.scoped(&session()).list().await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_)));
    }
}
