//! HTTP client for the gym backend.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::models::{ReportSummary, UiSettings};
use super::query::{decode_list, ListPage, ListQuery, Resource};
use crate::error::ApiError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Typed access to the REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct GymClient {
    inner: Arc<GymClientInner>,
}

struct GymClientInner {
    base_url: String,
    token: Option<String>,
    http: Client,
    timeout: Duration,
}

/// Error body sent by the backend on failures.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    message: String,
}

#[derive(Serialize)]
struct ActivePatch {
    active: bool,
}

impl GymClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            inner: Arc::new(GymClientInner {
                base_url: base_url.trim_end_matches('/').to_string(),
                token,
                http: Client::new(),
                timeout: DEFAULT_TIMEOUT,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        let mut request = self.inner.http.request(method, url).timeout(self.inner.timeout);
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// List a collection. Accepts both the paginated envelope and a bare array.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &ListQuery,
    ) -> Result<ListPage<T>, ApiError> {
        let response = self
            .request(Method::GET, resource.path())
            .query(&query.to_pairs())
            .send()
            .await?;
        let body = success_body(response).await?;
        decode_list(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }

    pub async fn delete(&self, resource: Resource, id: u64) -> Result<(), ApiError> {
        let path = format!("{}/{}", resource.path(), id);
        let response = self.request(Method::DELETE, &path).send().await?;
        success_body(response).await?;
        Ok(())
    }

    pub async fn set_student_active(&self, id: u64, active: bool) -> Result<(), ApiError> {
        let path = format!("{}/{}", Resource::Students.path(), id);
        let response = self
            .request(Method::PATCH, &path)
            .json(&ActivePatch { active })
            .send()
            .await?;
        success_body(response).await?;
        Ok(())
    }

    pub async fn report_summary(&self) -> Result<ReportSummary, ApiError> {
        self.get_json("reports/summary").await
    }

    pub async fn settings(&self) -> Result<UiSettings, ApiError> {
        self.get_json("settings").await
    }

    pub async fn update_settings(&self, settings: &UiSettings) -> Result<(), ApiError> {
        let response = self.request(Method::PUT, "settings").json(settings).send().await?;
        success_body(response).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        let body = success_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
    }
}

/// Body of a successful response, or the backend's error message.
async fn success_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ApiError::http(status.as_u16(), error_message(&body)))
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_urls() {
        assert!(matches!(GymClient::new("ftp://gym", None), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(GymClient::new("not a url", None), Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let client = GymClient::new("http://localhost:3000/api/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url("/students/4"), "http://localhost:3000/api/students/4");
        assert_eq!(client.url(Resource::NutritionPlans.path()), "http://localhost:3000/api/nutrition-plans");
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(error_message(r#"{"message":"Alumno no encontrado"}"#), "Alumno no encontrado");
        assert_eq!(error_message(r#"{"error":"Token inválido"}"#), "Token inválido");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[tokio::test]
    async fn list_decodes_envelope_from_a_live_socket() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let body = r#"{"data":[{"id":3,"name":"Ana"}],"total":31,"page":2,"limit":10}"#;
            let reply = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            request
        });

        let client = GymClient::new(&format!("http://{}", addr), Some("secret".into())).unwrap();
        let query = ListQuery { page: Some(2), limit: Some(10), ..ListQuery::default() };
        let page: ListPage<crate::api::models::Student> = client.list(Resource::Students, &query).await.unwrap();

        assert_eq!(page.total, 31);
        assert_eq!(page.rows[0].name, "Ana");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /students?page=2&limit=10 HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    async fn http_errors_carry_status_and_message() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            let body = r#"{"message":"No se puede eliminar un alumno con pagos"}"#;
            let reply = format!(
                "HTTP/1.1 409 Conflict\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
        });

        let client = GymClient::new(&format!("http://{}", addr), None).unwrap();
        let err = client.delete(Resource::Students, 9).await.unwrap_err();
        match err {
            ApiError::Http { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "No se puede eliminar un alumno con pagos");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
