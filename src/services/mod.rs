pub mod auth_service;
pub mod context;
pub mod event_log_service;
pub mod prediction_service;

pub use context::ServiceContext;
