use crate::models::{DonationRow, ProjectRow};
use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

/// Read side of the sync: the platform's Postgres database.
pub struct SourceRepository {
    pool: PgPool,
}

impl SourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch listed projects ordered by GIVpower, nested JSON columns intact.
    pub async fn fetch_projects(&self, limit: i64) -> Result<Vec<ProjectRow>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT
                project.id                                      AS id,
                project.title                                   AS title,
                project.description                             AS description,
                COALESCE(project."totalDonations", 0)::float8   AS raised_amount,
                project."givbacksEligible"                      AS givbacks_eligible,
                project.listed                                  AS listed,
                project."uniqueDonors"                          AS unique_donors,
                project."updatedAt"                             AS updated_at,
                project."ownerWallet"                           AS owner_wallet,
                project."inActiveQfRound"                       AS in_active_qf_round,
                project.addresses                               AS addresses,
                project.socials                                 AS socials,
                pv."totalPower"::float8                         AS giv_power,
                pv."powerRank"::int4                            AS giv_power_rank
            FROM project
            INNER JOIN project_instant_power_view pv
                ON project.id = pv."projectId"
            WHERE project.listed = TRUE
            ORDER BY pv."totalPower" DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch projects from source database")?;

        info!("📖 Fetched {} projects from Postgres", rows.len());
        Ok(rows)
    }

    /// Fetch donations belonging to the given projects.
    pub async fn fetch_donations(&self, project_ids: &[i32]) -> Result<Vec<DonationRow>> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, DonationRow>(
            r#"
            SELECT
                d.id                              AS id,
                d."projectId"                     AS project_id,
                d."transactionId"                 AS tx_hash,
                d."toWalletAddress"               AS to_address,
                d."fromWalletAddress"             AS from_address,
                d.currency                        AS currency,
                COALESCE(d.anonymous, FALSE)      AS anonymous,
                COALESCE(d.amount, 0)::float8     AS amount,
                d."valueUsd"::float8              AS value_usd,
                d."createdAt"                     AS created_at,
                d."transactionNetworkId"          AS chain_id,
                d."tokenAddress"                  AS token_address,
                d."chainType"                     AS chain_type
            FROM donation d
            WHERE d."projectId" = ANY($1)
            "#,
        )
        .bind(project_ids)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch donations from source database")?;

        info!("📖 Fetched {} donations from Postgres", rows.len());
        Ok(rows)
    }
}
