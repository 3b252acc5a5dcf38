pub mod auth;
pub mod catering;
pub mod kost;
pub mod laundry;
pub mod master;
pub mod reservation;

pub use auth::*;
pub use catering::*;
pub use kost::*;
pub use laundry::*;
pub use master::*;
pub use reservation::*;

use serde::{Deserialize, Serialize};

/// Canonical payment verification status values (independent of order status)
pub mod payment_status {
    pub const PENDING: &str = "PENDING";
    pub const TERVERIFIKASI: &str = "TERVERIFIKASI";
    pub const DITOLAK: &str = "DITOLAK";
}

/// Request body for moving an order along its status sequence
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// Request body for verifying or rejecting a payment proof
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    pub status: String,
}

/// Bank account details submitted as a JSON-encoded string inside form data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RekeningInfo {
    pub bank: String,
    pub account_number: String,
    pub account_holder: String,
}
