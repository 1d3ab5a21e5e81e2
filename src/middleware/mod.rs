pub mod auth;

pub use auth::{Access, AuthMiddleware};
