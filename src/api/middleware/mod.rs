pub mod auth;

pub use auth::{AuthScope, JwtAuth, request_claims};
