use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RekeningInfo;

/// Canonical laundry order status values.
/// Unlike catering, cancellation is still permitted after the provider has
/// received the order (DITERIMA) but before processing begins.
pub mod laundry_order_status {
    pub const PENDING: &str = "PENDING";
    pub const DITERIMA: &str = "DITERIMA";
    pub const DIPROSES: &str = "DIPROSES";
    pub const SELESAI: &str = "SELESAI";
    pub const DIAMBIL: &str = "DIAMBIL";
    pub const DIBATALKAN: &str = "DIBATALKAN";

    /// Forward-moving sequence; DIBATALKAN is reachable only via cancel
    pub const SEQUENCE: &[&str] = &[PENDING, DITERIMA, DIPROSES, SELESAI, DIAMBIL];

    pub fn cancellable_from(status: &str) -> bool {
        status == PENDING || status == DITERIMA
    }
}

/// Laundry provider attached to exactly one kost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaundryProvider {
    pub id: String,
    pub kost_id: String,
    pub name: String,
    pub is_active: bool,
    pub rekening_info: RekeningInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qris_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qris_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Service on a laundry provider's price list, priced per service unit
/// (e.g. per kg, per piece)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaundryService {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub unit_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    pub price: i64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create or update a laundry service entry
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLaundryServiceRequest {
    pub name: String,
    pub unit_id: String,
    pub price: i64,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Laundry order placed by one tenant at one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaundryOrder {
    pub id: String,
    pub user_id: String,
    pub provider_id: String,
    pub status: String,
    pub total_price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Line item joined back to its service entry for display
#[derive(Debug, Clone, Serialize)]
pub struct LaundryOrderItemDetail {
    pub id: String,
    pub service_id: String,
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    pub quantity: i64,
    pub unit_price: i64,
    pub line_total: i64,
}

/// Payment record owned 1:1 by an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaundryPayment {
    pub id: String,
    pub order_id: String,
    pub amount: i64,
    pub method: String,
    pub proof: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_url: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full order view: order, its line items and its payment
#[derive(Debug, Clone, Serialize)]
pub struct LaundryOrderDetail {
    #[serde(flatten)]
    pub order: LaundryOrder,
    pub items: Vec<LaundryOrderItemDetail>,
    pub payment: LaundryPayment,
}

/// One requested line item, parsed from the JSON-encoded `items` form field
#[derive(Debug, Clone, Deserialize)]
pub struct LaundryOrderItemInput {
    pub service_id: String,
    pub quantity: i64,
}
