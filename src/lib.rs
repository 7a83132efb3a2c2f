//! Predict Cache - A prediction-serving endpoint
//!
//! Serves a pre-trained model behind a TTL cache, with a cap on concurrent
//! model calls and best-effort recording of fresh predictions.

pub mod api;
pub mod cache;
pub mod compute;
pub mod config;
pub mod error;
pub mod models;
pub mod persistence;
pub mod predictor;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use service::PredictionService;
pub use tasks::spawn_cleanup_task;
