use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Canonical reservation decision status values (terminal once decided)
pub mod reservation_status {
    pub const PENDING: &str = "PENDING";
    pub const APPROVED: &str = "APPROVED";
    pub const REJECTED: &str = "REJECTED";
}

/// Canonical occupancy status values, driven by the date sweep
pub mod occupancy_status {
    pub const AKTIF: &str = "AKTIF";
    pub const KELUAR: &str = "KELUAR";
}

/// Reservation of a room at a kost by one tenant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub kost_id: String,
    pub check_in_date: NaiveDate,
    pub duration_months: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<NaiveDate>,
    pub total_price: i64,
    pub deposit: i64,
    pub payment_method: String,
    pub payment_proof: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupancy_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reservation joined with the kost it belongs to, for list views
#[derive(Debug, Clone, Serialize)]
pub struct ReservationSummary {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub kost_name: String,
    pub kost_city: String,
}

/// New reservation input, assembled by the handler from multipart form data
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub user_id: String,
    pub kost_id: String,
    pub check_in_date: NaiveDate,
    pub duration_months: i64,
    pub payment_method: String,
    pub payment_proof: String,
    pub note: Option<String>,
}

/// Extension input, assembled by the handler from multipart form data
#[derive(Debug, Clone)]
pub struct NewExtension {
    pub additional_months: i64,
    pub payment_method: String,
    pub payment_proof: String,
    pub note: Option<String>,
}

/// Request body for the manager/admin approve-reject decision
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateReservationStatusRequest {
    pub status: String,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Tenant dashboard: reservations partitioned by lifecycle stage
#[derive(Debug, Clone, Serialize)]
pub struct ReservationDashboard {
    pub pending: Vec<ReservationSummary>,
    pub active: Vec<ReservationSummary>,
    pub history: Vec<ReservationSummary>,
}
