//! HTTP Implementation
//!
//! `TodoApi` over reqwest (browser fetch on wasm32).

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use url::Url;

use super::{ApiError, ApiResult, TodoApi};
use crate::config::ApiConfig;
use crate::models::{NewTodo, Todo, TodoId, TodoPatch};

#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    config: ApiConfig,
}

impl HttpTodoApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    // ========================
    // Request Builders
    // ========================

    fn list_request(&self) -> RequestBuilder {
        self.client.get(self.config.collection_url())
    }

    fn create_request(&self, title: &str) -> RequestBuilder {
        self.client
            .post(self.config.collection_url())
            .json(&NewTodo { title })
    }

    fn toggle_request(&self, id: &TodoId) -> ApiResult<RequestBuilder> {
        let url = self.item_url(id, Some("toggle"))?;
        Ok(self.client.request(Method::PATCH, url))
    }

    fn delete_request(&self, id: &TodoId) -> ApiResult<RequestBuilder> {
        let url = self.item_url(id, None)?;
        Ok(self.client.delete(url))
    }

    fn update_request(&self, id: &TodoId, patch: &TodoPatch) -> ApiResult<RequestBuilder> {
        let url = self.item_url(id, None)?;
        Ok(self.client.put(url).json(patch))
    }

    fn health_request(&self) -> RequestBuilder {
        self.client.get(self.config.health_url())
    }

    /// `/api/todos/{id}[/{action}]`, id percent-encoded as one segment
    fn item_url(&self, id: &TodoId, action: Option<&str>) -> ApiResult<Url> {
        let mut url = self.config.collection_url();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::Endpoint(self.config.origin.to_string()))?;
            segments.push(&id.to_string());
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }
}

/// Send and reject anything outside 2xx without reading the body
async fn send(request: RequestBuilder) -> ApiResult<Response> {
    let response = request.send().await?;
    check_status(response.status())?;
    Ok(response)
}

fn check_status(status: StatusCode) -> ApiResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ApiError::Status(status))
    }
}

#[async_trait(?Send)]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> ApiResult<Vec<Todo>> {
        Ok(send(self.list_request()).await?.json().await?)
    }

    async fn create(&self, title: &str) -> ApiResult<Todo> {
        Ok(send(self.create_request(title)).await?.json().await?)
    }

    async fn toggle(&self, id: &TodoId) -> ApiResult<Todo> {
        Ok(send(self.toggle_request(id)?).await?.json().await?)
    }

    async fn delete(&self, id: &TodoId) -> ApiResult<()> {
        send(self.delete_request(id)?).await?;
        Ok(())
    }

    async fn update(&self, id: &TodoId, patch: &TodoPatch) -> ApiResult<Todo> {
        Ok(send(self.update_request(id, patch)?).await?.json().await?)
    }

    async fn health(&self) -> ApiResult<()> {
        send(self.health_request()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn api() -> HttpTodoApi {
        HttpTodoApi::new(ApiConfig::new("http://localhost:8000").unwrap())
    }

    fn body_json(request: &reqwest::Request) -> Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).expect("request has a body");
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_list_request() {
        let request = api().list_request().build().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/todos");
        assert!(request.body().is_none());
    }

    #[test]
    fn test_create_request_sends_title_as_json() {
        let request = api().create_request("buy milk").build().unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().path(), "/api/todos");
        assert_eq!(
            request.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(body_json(&request), json!({"title": "buy milk"}));
    }

    #[test]
    fn test_toggle_request() {
        let request = api().toggle_request(&TodoId::from(5)).unwrap().build().unwrap();
        assert_eq!(request.method(), Method::PATCH);
        assert_eq!(request.url().path(), "/api/todos/5/toggle");
        assert!(request.body().is_none());
    }

    #[test]
    fn test_delete_request() {
        let request = api().delete_request(&TodoId::from("abc")).unwrap().build().unwrap();
        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(request.url().path(), "/api/todos/abc");
    }

    #[test]
    fn test_update_and_mark_completed_bodies() {
        let id = TodoId::from(9);

        let rename = api().update_request(&id, &TodoPatch::title("new")).unwrap().build().unwrap();
        assert_eq!(rename.method(), Method::PUT);
        assert_eq!(rename.url().path(), "/api/todos/9");
        assert_eq!(body_json(&rename), json!({"title": "new"}));

        let complete = api()
            .update_request(&id, &TodoPatch::completed(true))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(body_json(&complete), json!({"completed": true}));
    }

    #[test]
    fn test_item_id_is_one_encoded_segment() {
        let url = api().item_url(&TodoId::from("a/b c"), None).unwrap();
        assert_eq!(url.path(), "/api/todos/a%2Fb%20c");
    }

    #[test]
    fn test_health_request() {
        let request = api().health_request().build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/health");
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::CREATED).is_ok());
        assert!(check_status(StatusCode::NO_CONTENT).is_ok());
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND),
            Err(ApiError::Status(StatusCode::NOT_FOUND))
        ));
        assert!(check_status(StatusCode::UNPROCESSABLE_ENTITY).is_err());
    }

    // ========================
    // Round trips against a local server
    // ========================

    /// Answer one request with a canned response; the handle yields the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (HttpTodoApi, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let mut response = format!("HTTP/1.1 {}\r\nConnection: close\r\n", status);
            if !body.is_empty() {
                response.push_str(&format!(
                    "Content-Type: application/json\r\nContent-Length: {}\r\n",
                    body.len()
                ));
            }
            response.push_str("\r\n");
            response.push_str(body);
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        let api = HttpTodoApi::new(ApiConfig::new(&format!("http://{}", addr)).unwrap());
        (api, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_list_decodes_records() {
        let (api, server) = serve_once(
            "200 OK",
            r#"[{"id":1,"title":"a","completed":false},{"id":"x-2","title":"b","completed":true}]"#,
        )
        .await;

        let todos = api.list().await.unwrap();

        assert_eq!(todos, vec![Todo::new(1, "a", false), Todo::new("x-2", "b", true)]);
        assert!(server.await.unwrap().starts_with("GET /api/todos HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_create_posts_title_and_decodes_created() {
        let (api, server) = serve_once("201 Created", r#"{"id":2,"title":"buy milk","completed":false}"#).await;

        let todo = api.create("buy milk").await.unwrap();

        assert_eq!(todo, Todo::new(2, "buy milk", false));
        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/todos HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
        assert!(request.ends_with(r#"{"title":"buy milk"}"#));
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_no_content() {
        let (api, server) = serve_once("204 No Content", "").await;

        api.delete(&TodoId::from("abc")).await.unwrap();

        assert!(server.await.unwrap().starts_with("DELETE /api/todos/abc HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_status_error() {
        let (api, server) = serve_once("404 Not Found", r#"{"detail":"Todo not found"}"#).await;

        let err = api.toggle(&TodoId::from(7)).await.unwrap_err();

        assert!(matches!(err, ApiError::Status(StatusCode::NOT_FOUND)));
        assert!(server.await.unwrap().starts_with("PATCH /api/todos/7/toggle HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_transport_error() {
        let (api, server) = serve_once("200 OK", "not json").await;

        let err = api.update(&TodoId::from(1), &TodoPatch::title("x")).await.unwrap_err();

        assert!(matches!(&err, ApiError::Transport(e) if e.is_decode()));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_completed_puts_completed_flag() {
        let (api, server) = serve_once("200 OK", r#"{"id":3,"title":"c","completed":true}"#).await;

        let todo = api.mark_completed(&TodoId::from(3)).await.unwrap();

        assert!(todo.completed);
        let request = server.await.unwrap();
        assert!(request.starts_with("PUT /api/todos/3 HTTP/1.1"));
        assert!(request.ends_with(r#"{"completed":true}"#));
    }

    #[tokio::test]
    async fn test_health_ok() {
        let (api, server) = serve_once("200 OK", r#"{"status":"ok"}"#).await;

        api.health().await.unwrap();

        assert!(server.await.unwrap().starts_with("GET /api/health HTTP/1.1"));
    }
}
