use sea_orm::{ColumnTrait, DatabaseConnection, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{event_log, prelude::EventLog};

#[derive(Debug, Clone, Default)]
pub struct NewEventLog {
    pub user_id: Uuid,
    pub corpus: String,
    pub event: String,
    pub title: String,
    pub summary: String,
    pub people: Option<String>,
    pub orgs: Option<String>,
    pub locations: Option<String>,
}

#[derive(Clone)]
pub struct EventLogDao {
    db: DatabaseConnection,
}

impl DaoBase for EventLogDao {
    type Entity = EventLog;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl EventLogDao {
    pub async fn list_for_user(&self, user_id: &Uuid) -> DaoResult<Vec<event_log::Model>> {
        let user_id = *user_id;
        self.find_all(move |query| {
            query
                .filter(event_log::Column::UserId.eq(user_id))
                .order_by_asc(event_log::Column::Created)
        })
        .await
    }

    pub async fn record(&self, entry: NewEventLog) -> DaoResult<event_log::Model> {
        let model = event_log::ActiveModel {
            user_id: Set(entry.user_id),
            corpus: Set(entry.corpus),
            event: Set(entry.event),
            title: Set(entry.title),
            summary: Set(entry.summary),
            people: Set(entry.people),
            orgs: Set(entry.orgs),
            locations: Set(entry.locations),
            ..Default::default()
        };
        self.create(model).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use uuid::Uuid;

    use crate::db::entities::event_log;

    use super::{EventLogDao, NewEventLog};
    use crate::db::dao::DaoBase;

    fn log_row(user_id: Uuid, event: &str) -> event_log::Model {
        event_log::Model {
            id: Uuid::new_v4(),
            user_id,
            corpus: "ঢাকায় সড়ক দুর্ঘটনা".to_string(),
            event: event.to_string(),
            title: "সড়ক দুর্ঘটনায়".to_string(),
            summary: "সড়ক দুর্ঘটনায় দুইজন নিহত".to_string(),
            people: None,
            orgs: None,
            locations: Some("ঢাকা".to_string()),
            created: FixedOffset::east_opt(0)
                .expect("offset should be valid")
                .with_ymd_and_hms(2026, 3, 14, 9, 30, 0)
                .single()
                .expect("timestamp should be valid"),
        }
    }

    #[tokio::test]
    async fn lists_rows_for_user() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                log_row(user_id, "দুর্ঘটনা"),
                log_row(user_id, "খেলাধুলা"),
            ]])
            .into_connection();
        let dao = EventLogDao::new(&db);

        let rows = dao.list_for_user(&user_id).await.expect("query should succeed");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].event, "খেলাধুলা");
    }

    #[tokio::test]
    async fn records_entry() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[log_row(user_id, "দুর্ঘটনা")]])
            .into_connection();
        let dao = EventLogDao::new(&db);

        let stored = dao
            .record(NewEventLog {
                user_id,
                corpus: "ঢাকায় সড়ক দুর্ঘটনা".to_string(),
                event: "দুর্ঘটনা".to_string(),
                title: "সড়ক দুর্ঘটনায়".to_string(),
                summary: "সড়ক দুর্ঘটনায় দুইজন নিহত".to_string(),
                locations: Some("ঢাকা".to_string()),
                ..Default::default()
            })
            .await
            .expect("insert should succeed");
        assert_eq!(stored.user_id, user_id);
        assert_eq!(stored.locations.as_deref(), Some("ঢাকা"));
    }
}
