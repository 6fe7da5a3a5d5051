use sea_orm::DatabaseConnection;

use super::{DaoBase, EventLogDao, TokenBlacklistDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn token_blacklist(&self) -> TokenBlacklistDao {
        DaoBase::new(&self.db)
    }

    pub fn event_log(&self) -> EventLogDao {
        DaoBase::new(&self.db)
    }
}
