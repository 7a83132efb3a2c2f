//! API Module
//!
//! HTTP handler and routing for the prediction endpoint.
//!
//! # Endpoints
//! - `POST /predict` - Predict from 14 integer features

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
