// src/profile/models.rs

use serde::Deserialize;

use crate::common::helpers::{deserialize_lenient_f64, deserialize_string_or_number};

#[derive(Debug, Default, Deserialize)]
pub struct GetProfileRequest {
    #[serde(
        rename = "userID",
        alias = "userId",
        default,
        deserialize_with = "deserialize_string_or_number"
    )]
    pub user_id: Option<String>,
}

/// Profile form submission. Numbers may arrive as strings; an absent
/// field clears the stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(
        rename = "userId",
        alias = "userID",
        default,
        deserialize_with = "deserialize_string_or_number"
    )]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub height: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub age: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub weight: Option<f64>,
}

impl UpdateProfileRequest {
    /// Age in whole years; only meaningful after validation
    pub fn age_years(&self) -> Option<i64> {
        self.age.map(|a| a as i64)
    }
}
