// src/medicine/models.rs

use serde::Deserialize;

use crate::common::helpers::{deserialize_flag, deserialize_string_or_number};
use crate::database::DrugRecord;

#[derive(Debug, Default, Deserialize)]
pub struct SearchMedicineRequest {
    pub it_name: Option<String>,
    pub cp_name: Option<String>,
}

/// A catalog item the user chose to keep, plus their alert settings
#[derive(Debug, Default, Deserialize)]
pub struct SaveMedicineRequest {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    pub item_sn: Option<String>,
    pub drug_name: Option<String>,
    pub comp_name: Option<String>,
    #[serde(rename = "type")]
    pub drug_type: Option<String>,
    pub item_image: Option<String>,
    pub class_name: Option<String>,
    #[serde(
        rename = "userID",
        alias = "userId",
        default,
        deserialize_with = "deserialize_string_or_number"
    )]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub al_b: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub al_l: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub al_d: bool,
}

impl SaveMedicineRequest {
    /// Converts a validated request into the stored record
    pub fn into_record(self) -> DrugRecord {
        DrugRecord {
            item_sn: self.item_sn.unwrap_or_default().trim().to_string(),
            drug_name: self.drug_name.unwrap_or_default().trim().to_string(),
            comp_name: self.comp_name,
            drug_type: self.drug_type,
            item_image: self.item_image,
            class_name: self.class_name,
            google_id: self.user_id.unwrap_or_default().trim().to_string(),
            al_b: self.al_b,
            al_l: self.al_l,
            al_d: self.al_d,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteMedicineRequest {
    #[serde(
        rename = "userId",
        alias = "userID",
        default,
        deserialize_with = "deserialize_string_or_number"
    )]
    pub user_id: Option<String>,
    pub it_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MedicineStatusRequest {
    #[serde(
        rename = "userID",
        alias = "userId",
        default,
        deserialize_with = "deserialize_string_or_number"
    )]
    pub user_id: Option<String>,
}
