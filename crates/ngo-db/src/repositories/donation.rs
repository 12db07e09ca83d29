//! PostgreSQL implementation of DonationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use ngo_core::{
    Donation, DonationFilter, DonationRepository, DonationStats, DonationStatus, Page,
    PageRequest, RepoResult, Snowflake,
};

use crate::mappers::DonationColumns;
use crate::models::{DonationModel, DonationStatsModel};

use super::error::{decode_all, donation_not_found, map_db_error};

const DONATION_COLUMNS: &str = "id, donor_id, donation_type, amount, currency, category, \
     quantity, unit, description, purpose, transaction_ref, dropoff_details, status, \
     verified_by, verified_at, created_at, updated_at";

/// PostgreSQL implementation of DonationRepository
#[derive(Clone)]
pub struct PgDonationRepository {
    pool: PgPool,
}

impl PgDonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &DonationFilter) {
    qb.push(" WHERE TRUE");
    if let Some(kind) = filter.donation_type {
        qb.push(" AND donation_type = ").push_bind(kind.as_str());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(donor) = filter.donor_id {
        qb.push(" AND donor_id = ").push_bind(donor.into_inner());
    }
}

#[async_trait]
impl DonationRepository for PgDonationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Donation>> {
        let result = sqlx::query_as::<_, DonationModel>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Donation::try_from).transpose()
    }

    #[instrument(skip(self, donation), fields(donation_id = %donation.id, donor_id = %donation.donor_id))]
    async fn create(&self, donation: &Donation) -> RepoResult<()> {
        let cols = DonationColumns::new(donation);
        sqlx::query(
            r"
            INSERT INTO donations (id, donor_id, donation_type, amount, currency, category, quantity,
                                   unit, description, purpose, transaction_ref, dropoff_details,
                                   status, verified_by, verified_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ",
        )
        .bind(donation.id.into_inner())
        .bind(donation.donor_id.into_inner())
        .bind(cols.donation_type)
        .bind(cols.amount)
        .bind(&donation.currency)
        .bind(cols.category)
        .bind(cols.quantity)
        .bind(cols.unit)
        .bind(&donation.description)
        .bind(&donation.purpose)
        .bind(&donation.transaction_ref)
        .bind(&donation.dropoff_details)
        .bind(donation.status.as_str())
        .bind(donation.verified_by.map(Snowflake::into_inner))
        .bind(donation.verified_at)
        .bind(donation.created_at)
        .bind(donation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_donor(&self, donor_id: Snowflake) -> RepoResult<Vec<Donation>> {
        let rows = sqlx::query_as::<_, DonationModel>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE donor_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(donor_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        decode_all(rows)
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: &DonationFilter,
        page: PageRequest,
    ) -> RepoResult<Page<Donation>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM donations");
        push_filter(&mut count, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {DONATION_COLUMNS} FROM donations"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(page.limit()))
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<DonationModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(decode_all(rows)?, total))
    }

    #[instrument(skip(self))]
    async fn verify(
        &self,
        id: Snowflake,
        status: DonationStatus,
        verified_by: Snowflake,
        verified_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE donations
            SET status = $2, verified_by = $3, verified_at = $4, updated_at = $4
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(status.as_str())
        .bind(verified_by.into_inner())
        .bind(verified_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(donation_not_found(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stats(&self) -> RepoResult<DonationStats> {
        let row = sqlx::query_as::<_, DonationStatsModel>(
            r"
            SELECT
                COALESCE(SUM(amount) FILTER (WHERE donation_type = 'monetary'), 0)::DOUBLE PRECISION AS monetary_total,
                COUNT(*) FILTER (WHERE donation_type = 'monetary') AS monetary_count,
                COUNT(*) FILTER (WHERE donation_type = 'physical') AS physical_count
            FROM donations
            ",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(DonationStats {
            monetary_total: row.monetary_total,
            monetary_count: row.monetary_count,
            physical_count: row.physical_count,
        })
    }

    #[instrument(skip(self))]
    async fn recent(&self, limit: u32) -> RepoResult<Vec<Donation>> {
        let rows = sqlx::query_as::<_, DonationModel>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations ORDER BY created_at DESC, id DESC LIMIT $1"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        decode_all(rows)
    }
}
