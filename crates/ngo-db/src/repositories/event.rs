//! PostgreSQL implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use ngo_core::{
    Event, EventFilter, EventRepository, EventStats, EventStatus, EventStatusCounts, Page,
    PageRequest, RepoResult, Snowflake,
};

use crate::mappers::{decode_enum, ids_to_i64};
use crate::models::{EventModel, EventStatsModel, StatusCountModel};

use super::error::{decode_all, event_not_found, map_db_error};

const EVENT_COLUMNS: &str = "id, title, description, event_type, date, location, target_audience, \
     number_of_students, status, requested_by, approved_by, assigned_volunteers, notes, \
     created_at, updated_at";

/// PostgreSQL implementation of EventRepository
#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_page(
        &self,
        mut count: QueryBuilder<'_, Postgres>,
        mut select: QueryBuilder<'_, Postgres>,
        order_by: &str,
        page: PageRequest,
    ) -> RepoResult<Page<Event>> {
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        select
            .push(" ORDER BY ")
            .push(order_by)
            .push(" LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<EventModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(decode_all(rows)?, total))
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    qb.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(requester) = filter.requested_by {
        qb.push(" AND requested_by = ").push_bind(requester.into_inner());
    }
}

fn push_upcoming(qb: &mut QueryBuilder<'_, Postgres>, now: DateTime<Utc>) {
    qb.push(" WHERE status = ")
        .push_bind(EventStatus::Approved.as_str())
        .push(" AND date >= ")
        .push_bind(now);
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>> {
        let result = sqlx::query_as::<_, EventModel>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Event::try_from).transpose()
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[Snowflake]) -> RepoResult<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, EventModel>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1)"
        ))
        .bind(ids_to_i64(ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        decode_all(rows)
    }

    #[instrument(skip(self, event), fields(event_id = %event.id, status = %event.status))]
    async fn create(&self, event: &Event) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO events (id, title, description, event_type, date, location, target_audience,
                                number_of_students, status, requested_by, approved_by,
                                assigned_volunteers, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ",
        )
        .bind(event.id.into_inner())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_type.as_str())
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.target_audience)
        .bind(event.number_of_students)
        .bind(event.status.as_str())
        .bind(event.requested_by.into_inner())
        .bind(event.approved_by.map(Snowflake::into_inner))
        .bind(ids_to_i64(&event.assigned_volunteers))
        .bind(&event.notes)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id, status = %event.status))]
    async fn update_status(&self, event: &Event) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE events
            SET status = $2, approved_by = $3, notes = $4, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(event.id.into_inner())
        .bind(event.status.as_str())
        .bind(event.approved_by.map(Snowflake::into_inner))
        .bind(&event.notes)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(event_not_found(event.id));
        }
        Ok(())
    }

    #[instrument(skip(self, volunteer_ids), fields(count = volunteer_ids.len()))]
    async fn replace_volunteers(
        &self,
        id: Snowflake,
        volunteer_ids: &[Snowflake],
    ) -> RepoResult<()> {
        let result = sqlx::query(
            "UPDATE events SET assigned_volunteers = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.into_inner())
        .bind(ids_to_i64(volunteer_ids))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(event_not_found(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &EventFilter, page: PageRequest) -> RepoResult<Page<Event>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM events");
        push_filter(&mut count, filter);
        let mut select = QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events"));
        push_filter(&mut select, filter);

        self.fetch_page(count, select, "created_at DESC, id DESC", page)
            .await
    }

    #[instrument(skip(self))]
    async fn list_upcoming(
        &self,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> RepoResult<Page<Event>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM events");
        push_upcoming(&mut count, now);
        let mut select = QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events"));
        push_upcoming(&mut select, now);

        self.fetch_page(count, select, "date ASC, id ASC", page).await
    }

    #[instrument(skip(self))]
    async fn status_counts(&self, requested_by: Snowflake) -> RepoResult<EventStatusCounts> {
        let rows = sqlx::query_as::<_, StatusCountModel>(
            r"
            SELECT status, COUNT(*) AS count
            FROM events
            WHERE requested_by = $1
            GROUP BY status
            ",
        )
        .bind(requested_by.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut counts = EventStatusCounts::default();
        for row in rows {
            counts.add(decode_enum(&row.status)?, row.count);
        }
        Ok(counts)
    }

    #[instrument(skip(self))]
    async fn stats(&self, now: DateTime<Utc>) -> RepoResult<EventStats> {
        let row = sqlx::query_as::<_, EventStatsModel>(
            r"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved' AND date >= $1) AS upcoming,
                COUNT(*) AS total
            FROM events
            ",
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(EventStats {
            pending: row.pending,
            upcoming: row.upcoming,
            total: row.total,
        })
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: u32) -> RepoResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventModel>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        decode_all(rows)
    }
}
