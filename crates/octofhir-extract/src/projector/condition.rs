use serde::Serialize;

use super::{Projector, timestamp_at};
use crate::bundle::Resource;
use crate::column::{ColumnInfo, ColumnType};
use crate::datetime::ClinicalDateTime;
use crate::diagnostics::FieldIssue;
use crate::reference;

/// Row of the `conditions` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionRecord {
    pub condition_id: Option<String>,
    pub patient_id: Option<String>,
    pub encounter_id: Option<String>,
    pub code_value: Option<String>,
    pub code_text: Option<String>,
    pub onset_datetime: Option<ClinicalDateTime>,
    pub abatement_datetime: Option<ClinicalDateTime>,
    pub recorded_datetime: Option<ClinicalDateTime>,
}

/// Produces the `conditions` table.
///
/// The three date-time fields are parsed; a malformed value is reported as a
/// field issue and written as null, the rest of the row is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionProjector;

impl Projector for ConditionProjector {
    type Record = ConditionRecord;

    fn name(&self) -> &'static str {
        "conditions"
    }

    fn resource_type(&self) -> &'static str {
        "Condition"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::string("condition_id"),
            ColumnInfo::string("patient_id").with_description("Condition.subject"),
            ColumnInfo::string("encounter_id").with_description("Condition.encounter"),
            ColumnInfo::string("code_value").with_description("Condition.code.coding[0].code"),
            ColumnInfo::string("code_text"),
            ColumnInfo::new("onset_datetime", ColumnType::Timestamp),
            ColumnInfo::new("abatement_datetime", ColumnType::Timestamp),
            ColumnInfo::new("recorded_datetime", ColumnType::Timestamp),
        ]
    }

    fn project(
        &self,
        resource: &Resource<'_>,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<ConditionRecord> {
        Some(ConditionRecord {
            condition_id: resource.string("id"),
            patient_id: reference::resolve_at(resource.value(), "subject"),
            encounter_id: reference::resolve_at(resource.value(), "encounter"),
            code_value: resource.string("code.coding.0.code"),
            code_text: resource.string("code.text"),
            onset_datetime: timestamp_at(resource, "onsetDateTime", issues),
            abatement_datetime: timestamp_at(resource, "abatementDateTime", issues),
            recorded_datetime: timestamp_at(resource, "recordedDate", issues),
        })
    }
}

/// Row of the `condition_summary` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionSummaryRecord {
    pub condition_id: Option<String>,
    pub patient_id: Option<String>,
    pub code_value: Option<String>,
    pub code_display: Option<String>,
    pub onset_datetime: Option<ClinicalDateTime>,
}

/// Produces the `condition_summary` table of the summary profile.
///
/// `code_display` prefers the first coding's display and falls back to
/// `code.text`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionSummaryProjector;

impl Projector for ConditionSummaryProjector {
    type Record = ConditionSummaryRecord;

    fn name(&self) -> &'static str {
        "condition_summary"
    }

    fn resource_type(&self) -> &'static str {
        "Condition"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::string("condition_id"),
            ColumnInfo::string("patient_id"),
            ColumnInfo::string("code_value"),
            ColumnInfo::string("code_display"),
            ColumnInfo::new("onset_datetime", ColumnType::Timestamp),
        ]
    }

    fn project(
        &self,
        resource: &Resource<'_>,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<ConditionSummaryRecord> {
        Some(ConditionSummaryRecord {
            condition_id: resource.string("id"),
            patient_id: reference::resolve_at(resource.value(), "subject"),
            code_value: resource.string("code.coding.0.code"),
            code_display: resource
                .string("code.coding.0.display")
                .or_else(|| resource.string("code.text")),
            onset_datetime: timestamp_at(resource, "onsetDateTime", issues),
        })
    }
}
