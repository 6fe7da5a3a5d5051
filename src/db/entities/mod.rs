#[allow(unused_imports)]
pub mod prelude {
    pub use super::event_log::Entity as EventLog;
    pub use super::token_blacklist::Entity as TokenBlacklist;
    pub use super::user::Entity as User;
}

pub mod event_log;
pub mod token_blacklist;
pub mod user;
