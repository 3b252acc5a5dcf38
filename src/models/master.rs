use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Facility reference data (wifi, AC, private bathroom, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create or update a facility
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFacilityRequest {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// House rule reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create or update a rule
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
}

/// Laundry service-unit catalog entry (kg, pcs, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaundryUnit {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create or update a laundry unit
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLaundryUnitRequest {
    pub name: String,
}
