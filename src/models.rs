use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A stored patient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    pub medical_history: String,
    pub created_by: i64, // staff user id
    pub updated_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Client-supplied patient fields for create and update
#[derive(Debug, Clone, Deserialize)]
pub struct PatientInput {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub medical_history: String,
}
