use crate::models::ProjectRow;
use crate::services::html_clean::clean_html;
use serde_json::Value;

/// EVM networks a project can publish a receiving address on, with the chain
/// ID used as the key inside the source's nested `addresses` JSON column.
pub const EVM_NETWORKS: &[(&str, u32)] = &[
    ("ethereum", 1),
    ("optimism", 10),
    ("polygon", 137),
    ("celo", 42220),
    ("base", 8453),
    ("arbitrum", 42161),
    ("gnosis", 100),
    ("zkevm", 1101),
    ("ethereum_classic", 61),
];

/// Non-EVM networks, keyed under their own group in the `addresses` column.
pub const NON_EVM_NETWORKS: &[(&str, u32)] = &[("solana", 101), ("stellar", 1500)];

/// Social link types, mapped from the source's upper-cased keys to the flat
/// property names used in the graph.
pub const SOCIALS: &[(&str, &str)] = &[
    ("FACEBOOK", "facebook"),
    ("X", "x"),
    ("INSTAGRAM", "instagram"),
    ("YOUTUBE", "youtube"),
    ("LINKEDIN", "linkedin"),
    ("REDDIT", "reddit"),
    ("DISCORD", "discord"),
    ("FARCASTER", "farcaster"),
    ("LENS", "lens"),
    ("WEBSITE", "website"),
    ("TELEGRAM", "telegram"),
    ("GITHUB", "github"),
];

/// A project with the nested address/social JSON flattened into scalar
/// properties, ready for graph import.
#[derive(Debug, Clone)]
pub struct FlatProject {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub raised_amount: f64,
    pub giv_power: f64,
    pub giv_power_rank: Option<i64>,
    pub listed: bool,
    pub givbacks_eligible: bool,
    pub in_active_qf_round: bool,
    pub unique_donors: i64,
    pub owner_wallet: Option<String>,
    pub updated_at: Option<String>,
    /// `<network>_address` keys in declaration order.
    pub addresses: Vec<(String, Option<String>)>,
    /// Flat social property names in declaration order.
    pub socials: Vec<(String, Option<String>)>,
}

/// Flatten a raw source row: clean the HTML description and pull per-network
/// addresses and social links out of their nested JSON columns.
pub fn flatten_project(row: &ProjectRow) -> FlatProject {
    let addresses_json = row.addresses.as_ref();
    let socials_json = row.socials.as_ref();

    let mut addresses = Vec::with_capacity(EVM_NETWORKS.len() + NON_EVM_NETWORKS.len());
    for (network, chain_id) in EVM_NETWORKS {
        addresses.push((
            format!("{}_address", network),
            lookup_address(addresses_json, "EVM", *chain_id),
        ));
    }
    for (network, chain_id) in NON_EVM_NETWORKS {
        addresses.push((
            format!("{}_address", network),
            lookup_address(addresses_json, &network.to_uppercase(), *chain_id),
        ));
    }

    let socials = SOCIALS
        .iter()
        .map(|(source_key, flat_key)| {
            let value = socials_json
                .and_then(|s| s.get(source_key))
                .and_then(Value::as_str)
                .map(String::from);
            (flat_key.to_string(), value)
        })
        .collect();

    FlatProject {
        id: row.id as i64,
        title: row.title.clone(),
        description: row
            .description
            .as_deref()
            .map(clean_html)
            .filter(|d| !d.is_empty()),
        raised_amount: row.raised_amount,
        giv_power: row.giv_power.unwrap_or(0.0),
        giv_power_rank: row.giv_power_rank.map(|r| r as i64),
        listed: row.listed.unwrap_or(false),
        givbacks_eligible: row.givbacks_eligible.unwrap_or(false),
        in_active_qf_round: row.in_active_qf_round.unwrap_or(false),
        unique_donors: row.unique_donors.unwrap_or(0) as i64,
        owner_wallet: row.owner_wallet.clone(),
        updated_at: row.updated_at.map(|t| t.to_rfc3339()),
        addresses,
        socials,
    }
}

fn lookup_address(addresses: Option<&Value>, group: &str, chain_id: u32) -> Option<String> {
    addresses?
        .get(group)?
        .get(chain_id.to_string())?
        .as_str()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_with(addresses: Option<Value>, socials: Option<Value>) -> ProjectRow {
        ProjectRow {
            id: 42,
            title: "Ocean Cleanup".to_string(),
            description: Some("<p>Removing plastic from the <b>ocean</b>.</p>".to_string()),
            raised_amount: 1234.5,
            givbacks_eligible: Some(true),
            listed: Some(true),
            unique_donors: Some(17),
            updated_at: None,
            owner_wallet: Some("0xabc".to_string()),
            in_active_qf_round: None,
            addresses,
            socials,
            giv_power: Some(99.0),
            giv_power_rank: Some(3),
        }
    }

    #[test]
    fn test_flattens_evm_and_non_evm_addresses() {
        let row = row_with(
            Some(json!({
                "EVM": {"1": "0xeth", "137": "0xpoly"},
                "SOLANA": {"101": "sol-addr"}
            })),
            None,
        );
        let flat = flatten_project(&row);

        let get = |key: &str| {
            flat.addresses
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.clone())
        };

        assert_eq!(get("ethereum_address").as_deref(), Some("0xeth"));
        assert_eq!(get("polygon_address").as_deref(), Some("0xpoly"));
        assert_eq!(get("solana_address").as_deref(), Some("sol-addr"));
        assert_eq!(get("stellar_address"), None);
        assert_eq!(get("optimism_address"), None);
    }

    #[test]
    fn test_flattens_social_links() {
        let row = row_with(
            None,
            Some(json!({"X": "https://x.com/ocean", "GITHUB": "https://github.com/ocean"})),
        );
        let flat = flatten_project(&row);

        let get = |key: &str| {
            flat.socials
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.clone())
        };

        assert_eq!(get("x").as_deref(), Some("https://x.com/ocean"));
        assert_eq!(get("github").as_deref(), Some("https://github.com/ocean"));
        assert_eq!(get("facebook"), None);
        assert_eq!(flat.socials.len(), SOCIALS.len());
    }

    #[test]
    fn test_description_is_html_cleaned() {
        let flat = flatten_project(&row_with(None, None));
        assert_eq!(
            flat.description.as_deref(),
            Some("Removing plastic from the ocean .")
        );
    }

    #[test]
    fn test_missing_json_columns_yield_all_empty() {
        let flat = flatten_project(&row_with(None, None));
        assert!(flat.addresses.iter().all(|(_, v)| v.is_none()));
        assert!(flat.socials.iter().all(|(_, v)| v.is_none()));
        assert_eq!(
            flat.addresses.len(),
            EVM_NETWORKS.len() + NON_EVM_NETWORKS.len()
        );
    }

    #[test]
    fn test_scalar_defaults() {
        let mut row = row_with(None, None);
        row.listed = None;
        row.unique_donors = None;
        row.giv_power = None;

        let flat = flatten_project(&row);
        assert!(!flat.listed);
        assert_eq!(flat.unique_donors, 0);
        assert_eq!(flat.giv_power, 0.0);
    }
}
