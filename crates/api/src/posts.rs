//! Client for the `/posts` resource

use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

use probekit_common::{ApiConfig, NewPost, Post, PostUpdate};

use crate::error::{ApiError, ApiResult};
use crate::schema::SchemaValidator;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method};

pub const POSTS_PATH: &str = "/posts";

pub fn post_path(id: i64) -> String {
    format!("{}/{}", POSTS_PATH, id)
}

/// Issues calls against `/posts` through an injected transport.
///
/// The raw operations return whatever the server answered, including 4xx
/// and 5xx. [`PostsClient::fetch_post`] is the typed variant that insists
/// on a 2xx and a schema-valid body.
pub struct PostsClient<T> {
    transport: T,
    headers: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

impl<T: HttpTransport> PostsClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, &ApiConfig::default())
    }

    pub fn with_config(transport: T, config: &ApiConfig) -> Self {
        Self {
            transport,
            headers: config.headers.clone(),
            timeout: config.timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest::new(method, path)
            .headers(&self.headers)
            .timeout(self.timeout)
    }

    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        debug!("{} {} -> {}", method, path, response.status);
        Ok(response)
    }

    pub async fn get(&self, path: &str) -> ApiResult<ApiResponse> {
        self.send(self.request(Method::Get, path)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> ApiResult<ApiResponse> {
        self.send(self.request(Method::Post, path).json(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> ApiResult<ApiResponse> {
        self.send(self.request(Method::Put, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<ApiResponse> {
        self.send(self.request(Method::Delete, path)).await
    }

    pub async fn list_posts(&self) -> ApiResult<ApiResponse> {
        self.get(POSTS_PATH).await
    }

    pub async fn get_post(&self, id: i64) -> ApiResult<ApiResponse> {
        self.get(&post_path(id)).await
    }

    pub async fn create_post(&self, post: &NewPost) -> ApiResult<ApiResponse> {
        self.post(POSTS_PATH, serde_json::to_value(post)?).await
    }

    pub async fn update_post(&self, id: i64, update: &PostUpdate) -> ApiResult<ApiResponse> {
        self.put(&post_path(id), serde_json::to_value(update)?).await
    }

    pub async fn delete_post(&self, id: i64) -> ApiResult<ApiResponse> {
        self.delete(&post_path(id)).await
    }

    /// Fetch a post, requiring a 2xx status and a body matching the post schema
    pub async fn fetch_post(&self, id: i64) -> ApiResult<Post> {
        let response = self.get_post(id).await?;
        if !response.is_ok() {
            return Err(ApiError::UnexpectedStatus {
                status: response.status,
                body: response.body.to_string(),
            });
        }
        SchemaValidator::post()?.validate(&response.body)?;
        let post: Post = serde_json::from_value(response.body)?;
        info!("Fetched post {} ({})", post.id, post.title);
        Ok(post)
    }
}
