pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod event_log_dao;
pub mod token_blacklist_dao;
pub mod user_dao;

pub use base::DaoBase;
pub use base_traits::{HasIdActiveModel, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use event_log_dao::{EventLogDao, NewEventLog};
pub use token_blacklist_dao::TokenBlacklistDao;
pub use user_dao::UserDao;
