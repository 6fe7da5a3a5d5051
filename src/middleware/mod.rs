mod access_log;
mod auth;
mod json_error;
mod panic;

pub use access_log::access_log;
pub use auth::bearer_token;
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
