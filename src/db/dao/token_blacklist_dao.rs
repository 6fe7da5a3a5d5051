use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::OnConflict,
};
use uuid::Uuid;

use super::{DaoBase, DaoLayerError, DaoResult};
use crate::db::entities::{prelude::TokenBlacklist, token_blacklist};

/// Append-only revocation list. Rows are never deleted.
#[derive(Clone)]
pub struct TokenBlacklistDao {
    db: DatabaseConnection,
}

impl DaoBase for TokenBlacklistDao {
    type Entity = TokenBlacklist;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl TokenBlacklistDao {
    pub async fn find_by_token(&self, token: &str) -> DaoResult<Option<token_blacklist::Model>> {
        let token = token.to_string();
        self.find_one(move |query| query.filter(token_blacklist::Column::Token.eq(token)))
            .await
    }

    pub async fn is_blacklisted(&self, token: &str) -> DaoResult<bool> {
        Ok(self.find_by_token(token).await?.is_some())
    }

    /// Inserts the token unless it is already listed. Returns `false` when
    /// another request revoked it first.
    pub async fn blacklist(&self, token: &str, user_id: &Uuid) -> DaoResult<bool> {
        let model = token_blacklist::ActiveModel {
            id: Set(Uuid::new_v4()),
            token: Set(token.to_string()),
            user_id: Set(*user_id),
            blacklisted_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        let inserted = TokenBlacklist::insert(model)
            .on_conflict(
                OnConflict::column(token_blacklist::Column::Token)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db())
            .await
            .map_err(DaoLayerError::Db)?;
        Ok(inserted > 0)
    }
}
