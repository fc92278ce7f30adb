use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Raw project row as selected from the source Postgres database, with the
/// nested address/social JSON columns still intact.
#[derive(Debug, FromRow)]
pub struct ProjectRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub raised_amount: f64,
    pub givbacks_eligible: Option<bool>,
    pub listed: Option<bool>,
    pub unique_donors: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
    pub owner_wallet: Option<String>,
    pub in_active_qf_round: Option<bool>,
    pub addresses: Option<serde_json::Value>,
    pub socials: Option<serde_json::Value>,
    pub giv_power: Option<f64>,
    pub giv_power_rank: Option<i32>,
}

/// Raw donation row as selected from the source Postgres database.
#[derive(Debug, FromRow)]
pub struct DonationRow {
    pub id: i64,
    pub project_id: i32,
    pub tx_hash: Option<String>,
    pub to_address: Option<String>,
    pub from_address: Option<String>,
    pub currency: Option<String>,
    pub anonymous: bool,
    pub amount: f64,
    pub value_usd: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub chain_id: Option<i32>,
    pub token_address: Option<String>,
    pub chain_type: Option<String>,
}
