// src/medicine/validators.rs

use super::models::{DeleteMedicineRequest, SaveMedicineRequest, SearchMedicineRequest};
use crate::common::{ValidationResult, Validator};

pub struct SearchMedicineValidator;

impl Validator<SearchMedicineRequest> for SearchMedicineValidator {
    fn validate(&self, data: &SearchMedicineRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.require("it_name", data.it_name.as_deref());
        result
    }
}

pub struct SaveMedicineValidator;

impl Validator<SaveMedicineRequest> for SaveMedicineValidator {
    fn validate(&self, data: &SaveMedicineRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.require("item_sn", data.item_sn.as_deref());
        result.require("drug_name", data.drug_name.as_deref());
        result.require("userID", data.user_id.as_deref());
        result
    }
}

pub struct DeleteMedicineValidator;

impl Validator<DeleteMedicineRequest> for DeleteMedicineValidator {
    fn validate(&self, data: &DeleteMedicineRequest) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.require("userId", data.user_id.as_deref());
        // a blank name would match every saved medicine
        result.require("it_name", data.it_name.as_deref());
        result
    }
}
