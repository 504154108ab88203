// src/profile/validators.rs

use super::models::UpdateProfileRequest;
use crate::common::{ValidationResult, Validator};

/// Oldest age the profile form accepts
pub const MAX_AGE_YEARS: f64 = 150.0;

pub struct UpdateProfileValidator;

impl Validator<UpdateProfileRequest> for UpdateProfileValidator {
    fn validate(&self, data: &UpdateProfileRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.require("userId", data.user_id.as_deref());
        result.non_negative("height", data.height);
        result.non_negative("weight", data.weight);
        result.non_negative("age", data.age);

        if let Some(age) = data.age {
            if age.fract() != 0.0 {
                result.add_error("age", "must be a whole number");
            } else if age > MAX_AGE_YEARS {
                result.add_error("age", "is out of range");
            }
        }

        result
    }
}
