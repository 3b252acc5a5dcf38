use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RekeningInfo;

/// Canonical catering order status values.
/// Cancellation is only permitted while the order is still PENDING.
pub mod catering_order_status {
    pub const PENDING: &str = "PENDING";
    pub const DITERIMA: &str = "DITERIMA";
    pub const DIPROSES: &str = "DIPROSES";
    pub const SELESAI: &str = "SELESAI";
    pub const DIBATALKAN: &str = "DIBATALKAN";

    /// Forward-moving sequence; DIBATALKAN is reachable only via cancel
    pub const SEQUENCE: &[&str] = &[PENDING, DITERIMA, DIPROSES, SELESAI];

    pub fn cancellable_from(status: &str) -> bool {
        status == PENDING
    }
}

/// Catering provider attached to exactly one kost
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CateringProvider {
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

/// Request to update an existing provider
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProviderRequest {
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub rekening_info: Option<RekeningInfo>,
}

/// Menu entry on a catering provider's price list, priced per portion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CateringMenu {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to update a menu entry
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCateringMenuRequest {
    pub name: String,
    pub price: i64,
    pub is_available: bool,
}

/// Catering order placed by one tenant at one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CateringOrder {
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

/// Line item joined back to its menu entry for display
#[derive(Debug, Clone, Serialize)]
pub struct CateringOrderItemDetail {
    pub id: String,
    pub menu_id: String,
    pub menu_name: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub line_total: i64,
}

/// Payment record owned 1:1 by an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CateringPayment {
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
pub struct CateringOrderDetail {
    #[serde(flatten)]
    pub order: CateringOrder,
    pub items: Vec<CateringOrderItemDetail>,
    pub payment: CateringPayment,
}

/// One requested line item, parsed from the JSON-encoded `items` form field
#[derive(Debug, Clone, Deserialize)]
pub struct CateringOrderItemInput {
    pub menu_id: String,
    pub quantity: i64,
}
