//! Probekit API contract harness
//!
//! Client code for the `/posts` REST resource, written against an injected
//! [`HttpTransport`] so the same calls run over the network or against a
//! scripted double:
//!
//! ```text
//! PostsClient<T: HttpTransport>
//!   ├── ReqwestTransport   real HTTP via reqwest
//!   └── ScriptedTransport  one canned response or a simulated timeout
//!
//! SchemaValidator          JSON Schema check of response bodies
//! ```
//!
//! Non-2xx responses are returned as ordinary [`ApiResponse`] values; only
//! timeouts, transport failures and schema violations are errors.

pub mod error;
pub mod mock;
pub mod posts;
pub mod schema;
pub mod transport;

pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use mock::{MockResponse, Scripted, ScriptedTransport};
pub use posts::PostsClient;
pub use schema::{post_schema, SchemaValidator};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, ReqwestTransport};
