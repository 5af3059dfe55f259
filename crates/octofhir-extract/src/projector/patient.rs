use serde::Serialize;

use super::Projector;
use super::extension::{
    ExtensionMatch, US_CORE_BIRTHSEX, US_CORE_ETHNICITY, US_CORE_RACE, direct_code, nested_text,
};
use crate::bundle::Resource;
use crate::column::{ColumnInfo, ColumnType};
use crate::diagnostics::FieldIssue;

/// Demographics row of the `patients` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientRecord {
    pub id: Option<String>,
    pub race_display: String,
    pub ethnicity_display: String,
    pub birth_sex: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_postal_code: Option<String>,
    pub address_country: Option<String>,
    pub marital_status: Option<String>,
}

/// Produces the `patients` table.
///
/// Race and ethnicity come from the `text` sub-extension of the US Core race
/// and ethnicity extensions (empty string when absent); birth sex from the
/// `valueCode` of the US Core birth sex extension. Only the first address and
/// its first line are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatientProjector {
    extension_match: ExtensionMatch,
}

impl PatientProjector {
    pub fn new(extension_match: ExtensionMatch) -> Self {
        Self { extension_match }
    }
}

impl Projector for PatientProjector {
    type Record = PatientRecord;

    fn name(&self) -> &'static str {
        "patients"
    }

    fn resource_type(&self) -> &'static str {
        "Patient"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::string("id").with_description("Patient.id"),
            ColumnInfo::string("race_display"),
            ColumnInfo::string("ethnicity_display"),
            ColumnInfo::string("birth_sex"),
            ColumnInfo::string("gender"),
            ColumnInfo::new("birth_date", ColumnType::Date),
            ColumnInfo::string("address_street"),
            ColumnInfo::string("address_city"),
            ColumnInfo::string("address_state"),
            ColumnInfo::string("address_postal_code"),
            ColumnInfo::string("address_country"),
            ColumnInfo::string("marital_status").with_description("Patient.maritalStatus.text"),
        ]
    }

    fn project(
        &self,
        resource: &Resource<'_>,
        _issues: &mut Vec<FieldIssue>,
    ) -> Option<PatientRecord> {
        let extensions = resource.array("extension");
        let policy = self.extension_match;

        Some(PatientRecord {
            id: resource.string("id"),
            race_display: nested_text(extensions, US_CORE_RACE, policy)
                .unwrap_or_default()
                .to_owned(),
            ethnicity_display: nested_text(extensions, US_CORE_ETHNICITY, policy)
                .unwrap_or_default()
                .to_owned(),
            birth_sex: direct_code(extensions, US_CORE_BIRTHSEX, policy).map(str::to_owned),
            gender: resource.string("gender"),
            birth_date: resource.string("birthDate"),
            address_street: resource.string("address.0.line.0"),
            address_city: resource.string("address.0.city"),
            address_state: resource.string("address.0.state"),
            address_postal_code: resource.string("address.0.postalCode"),
            address_country: resource.string("address.0.country"),
            marital_status: resource.string("maritalStatus.text"),
        })
    }
}

/// Row of the `patient_summary` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientSummaryRecord {
    pub patient_id: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub race_display: String,
    pub ethnicity_display: String,
}

/// Produces the `patient_summary` table of the summary profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatientSummaryProjector {
    extension_match: ExtensionMatch,
}

impl PatientSummaryProjector {
    pub fn new(extension_match: ExtensionMatch) -> Self {
        Self { extension_match }
    }
}

impl Projector for PatientSummaryProjector {
    type Record = PatientSummaryRecord;

    fn name(&self) -> &'static str {
        "patient_summary"
    }

    fn resource_type(&self) -> &'static str {
        "Patient"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::string("patient_id"),
            ColumnInfo::string("gender"),
            ColumnInfo::new("birth_date", ColumnType::Date),
            ColumnInfo::string("race_display"),
            ColumnInfo::string("ethnicity_display"),
        ]
    }

    fn project(
        &self,
        resource: &Resource<'_>,
        _issues: &mut Vec<FieldIssue>,
    ) -> Option<PatientSummaryRecord> {
        let extensions = resource.array("extension");
        let policy = self.extension_match;

        Some(PatientSummaryRecord {
            patient_id: resource.string("id"),
            gender: resource.string("gender"),
            birth_date: resource.string("birthDate"),
            race_display: nested_text(extensions, US_CORE_RACE, policy)
                .unwrap_or_default()
                .to_owned(),
            ethnicity_display: nested_text(extensions, US_CORE_ETHNICITY, policy)
                .unwrap_or_default()
                .to_owned(),
        })
    }
}
