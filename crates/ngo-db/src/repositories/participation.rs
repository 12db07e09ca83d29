//! PostgreSQL implementation of ParticipationRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use ngo_core::{
    DomainError, Page, PageRequest, Participation, ParticipationFilter, ParticipationRepository,
    ParticipationStatusCounts, RepoResult, Snowflake,
};

use crate::mappers::{decode_enum, ids_to_i64};
use crate::models::{ParticipationModel, StatusCountModel};

use super::error::{decode_all, map_db_error, map_unique_violation};

const PARTICIPATION_COLUMNS: &str = "id, volunteer_id, event_id, status, registered_at, \
     confirmed_at, attended_at, notes, created_at, updated_at";

/// PostgreSQL implementation of ParticipationRepository
#[derive(Clone)]
pub struct PgParticipationRepository {
    pool: PgPool,
}

impl PgParticipationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ParticipationFilter) {
    qb.push(" WHERE volunteer_id = ")
        .push_bind(filter.volunteer_id.into_inner());
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
}

#[async_trait]
impl ParticipationRepository for PgParticipationRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        volunteer_id: Snowflake,
        event_id: Snowflake,
    ) -> RepoResult<Option<Participation>> {
        let result = sqlx::query_as::<_, ParticipationModel>(&format!(
            "SELECT {PARTICIPATION_COLUMNS} FROM participations WHERE volunteer_id = $1 AND event_id = $2"
        ))
        .bind(volunteer_id.into_inner())
        .bind(event_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Participation::try_from).transpose()
    }

    /// The `(volunteer_id, event_id)` unique constraint decides concurrent races
    #[instrument(skip(self, participation), fields(
        volunteer_id = %participation.volunteer_id,
        event_id = %participation.event_id,
    ))]
    async fn create(&self, participation: &Participation) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO participations (id, volunteer_id, event_id, status, registered_at,
                                        confirmed_at, attended_at, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(participation.id.into_inner())
        .bind(participation.volunteer_id.into_inner())
        .bind(participation.event_id.into_inner())
        .bind(participation.status.as_str())
        .bind(participation.registered_at)
        .bind(participation.confirmed_at)
        .bind(participation.attended_at)
        .bind(&participation.notes)
        .bind(participation.created_at)
        .bind(participation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyRegistered))?;

        Ok(())
    }

    #[instrument(skip(self, event_ids), fields(count = event_ids.len()))]
    async fn find_for_events(
        &self,
        volunteer_id: Snowflake,
        event_ids: &[Snowflake],
    ) -> RepoResult<Vec<Participation>> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, ParticipationModel>(&format!(
            "SELECT {PARTICIPATION_COLUMNS} FROM participations WHERE volunteer_id = $1 AND event_id = ANY($2)"
        ))
        .bind(volunteer_id.into_inner())
        .bind(ids_to_i64(event_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        decode_all(rows)
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: &ParticipationFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Participation>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM participations");
        push_filter(&mut count, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PARTICIPATION_COLUMNS} FROM participations"
        ));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY registered_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<ParticipationModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(decode_all(rows)?, total))
    }

    #[instrument(skip(self))]
    async fn status_counts(
        &self,
        volunteer_id: Snowflake,
    ) -> RepoResult<ParticipationStatusCounts> {
        let rows = sqlx::query_as::<_, StatusCountModel>(
            r"
            SELECT status, COUNT(*) AS count
            FROM participations
            WHERE volunteer_id = $1
            GROUP BY status
            ",
        )
        .bind(volunteer_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut counts = ParticipationStatusCounts::default();
        for row in rows {
            counts.add(decode_enum(&row.status)?, row.count);
        }
        Ok(counts)
    }
}
