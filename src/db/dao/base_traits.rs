pub trait HasIdActiveModel {
    fn set_id(&mut self, id: uuid::Uuid);
}

/// Entities stamp their creation time under different column names
/// (`created_at`, `blacklisted_at`, `created`).
pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone);
}

macro_rules! impl_active_model_stamps {
    ($entity:ident, $stamp:ident) => {
        impl HasIdActiveModel for crate::db::entities::$entity::ActiveModel {
            fn set_id(&mut self, id: uuid::Uuid) {
                self.id = sea_orm::Set(id);
            }
        }

        impl TimestampedActiveModel for crate::db::entities::$entity::ActiveModel {
            fn set_created_at(&mut self, ts: sea_orm::entity::prelude::DateTimeWithTimeZone) {
                self.$stamp = sea_orm::Set(ts);
            }
        }
    };
}

impl_active_model_stamps!(user, created_at);
impl_active_model_stamps!(token_blacklist, blacklisted_at);
impl_active_model_stamps!(event_log, created);
