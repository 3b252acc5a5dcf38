use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::master::{Facility, Rule};

/// Kost represents a boarding house listing owned by one pengelola
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kost {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub total_rooms: i64,
    pub monthly_price: i64,
    pub discount: i64,
    pub deposit: i64,
    pub is_approved: bool,
    pub facility_ids: Vec<String>,
    pub rule_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qris_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qris_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Kost {
    /// Effective monthly price after discount, floored at zero
    pub fn final_monthly_price(&self) -> i64 {
        (self.monthly_price - self.discount).max(0)
    }
}

/// Detail view: listing plus resolved reference data and room availability
#[derive(Debug, Clone, Serialize)]
pub struct KostDetail {
    #[serde(flatten)]
    pub kost: Kost,
    pub facilities: Vec<Facility>,
    pub rules: Vec<Rule>,
    pub occupied_rooms: i64,
    pub available_rooms: i64,
}

/// Request to create or update a kost listing
#[derive(Debug, Clone, Deserialize)]
pub struct CreateKostRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    pub total_rooms: i64,
    pub monthly_price: i64,
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub deposit: i64,
    #[serde(default)]
    pub facility_ids: Vec<String>,
    #[serde(default)]
    pub rule_ids: Vec<String>,
}

/// Request body for the admin approval toggle
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveKostRequest {
    pub approve: bool,
}

/// Query parameters for the public kost listing
#[derive(Debug, Deserialize)]
pub struct KostListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub max_price: Option<i64>,
    #[serde(default)]
    pub q: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl KostListQuery {
    /// Clamp page/limit and return (page, limit, offset)
    pub fn sanitize(&self) -> (i64, i64, i64) {
        let page = self.page.max(1);
        let limit = self.limit.clamp(1, 100);
        (page, limit, (page - 1) * limit)
    }
}
