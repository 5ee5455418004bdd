//! Waflow API - REST API server
//!
//! This crate provides the REST API surface for Waflow: campaign and
//! conversation management, the template send path, and the provider
//! webhook endpoint.

pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::create_openapi_routes;
pub use routes::create_router;
pub use state::AppState;
