//! Owner profile, property and staff member models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::StaffRole;

/// An owner/client account holding zero or more properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// A rental property registered under an owner profile.
///
/// Property names are compared case-insensitively during matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    /// Free-form attributes supplied by the registry (amenities, notes...).
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

/// A staff member eligible for auto-generated tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
}
