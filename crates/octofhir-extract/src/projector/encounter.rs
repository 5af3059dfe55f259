use serde::Serialize;
use serde_json::Value;

use super::Projector;
use crate::bundle::Resource;
use crate::column::{ColumnInfo, ColumnType};
use crate::diagnostics::FieldIssue;
use crate::reference;
use crate::tree;

/// `Encounter.class.code` of emergency department visits (v3 ActCode).
pub const DEFAULT_EMERGENCY_CLASS_CODE: &str = "EMER";

/// Row of the `encounters` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncounterRecord {
    pub encounter_id: Option<String>,
    pub patient_id: Option<String>,
    pub type_code: Option<String>,
    pub type_display: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub class_code: Option<String>,
}

/// First coding found across all `type` entries; the search stops there.
fn first_type_coding<'a>(resource: &Resource<'a>) -> Option<&'a Value> {
    resource
        .array("type")
        .iter()
        .flat_map(|concept| tree::get_array(concept, "coding"))
        .next()
}

/// Produces the `encounters` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterProjector;

impl Projector for EncounterProjector {
    type Record = EncounterRecord;

    fn name(&self) -> &'static str {
        "encounters"
    }

    fn resource_type(&self) -> &'static str {
        "Encounter"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::string("encounter_id"),
            ColumnInfo::string("patient_id").with_description("Encounter.subject"),
            ColumnInfo::string("type_code"),
            ColumnInfo::string("type_display"),
            ColumnInfo::new("start_time", ColumnType::DateTime),
            ColumnInfo::new("end_time", ColumnType::DateTime),
            ColumnInfo::string("class_code"),
        ]
    }

    fn project(
        &self,
        resource: &Resource<'_>,
        _issues: &mut Vec<FieldIssue>,
    ) -> Option<EncounterRecord> {
        let coding = first_type_coding(resource);

        Some(EncounterRecord {
            encounter_id: resource.string("id"),
            patient_id: reference::resolve_at(resource.value(), "subject"),
            type_code: coding.and_then(|c| tree::get_string(c, "code")),
            type_display: coding.and_then(|c| tree::get_string(c, "display")),
            start_time: resource.string("period.start"),
            end_time: resource.string("period.end"),
            class_code: resource.string("class.code"),
        })
    }
}

/// Row of the `er_encounters` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyEncounterRecord {
    pub encounter_id: Option<String>,
    pub patient_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Produces the `er_encounters` table.
///
/// Every `finished` encounter of the emergency class is treated as a discharge
/// alive. The source data has nothing to infer death from, so this table must
/// not be used for outcome analysis.
#[derive(Debug, Clone)]
pub struct EmergencyEncounterProjector {
    class_code: String,
}

impl EmergencyEncounterProjector {
    pub fn new(class_code: impl Into<String>) -> Self {
        Self {
            class_code: class_code.into(),
        }
    }
}

impl Default for EmergencyEncounterProjector {
    fn default() -> Self {
        Self::new(DEFAULT_EMERGENCY_CLASS_CODE)
    }
}

impl Projector for EmergencyEncounterProjector {
    type Record = EmergencyEncounterRecord;

    fn name(&self) -> &'static str {
        "er_encounters"
    }

    fn resource_type(&self) -> &'static str {
        "Encounter"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::string("encounter_id"),
            ColumnInfo::string("patient_id"),
            ColumnInfo::new("start_time", ColumnType::DateTime),
            ColumnInfo::new("end_time", ColumnType::DateTime),
        ]
    }

    fn matches(&self, resource: &Resource<'_>) -> bool {
        resource.is(self.resource_type())
            && resource.str("class.code") == Some(self.class_code.as_str())
            && resource.str("status") == Some("finished")
    }

    fn project(
        &self,
        resource: &Resource<'_>,
        _issues: &mut Vec<FieldIssue>,
    ) -> Option<EmergencyEncounterRecord> {
        Some(EmergencyEncounterRecord {
            encounter_id: resource.string("id"),
            patient_id: reference::resolve_at(resource.value(), "subject"),
            start_time: resource.string("period.start"),
            end_time: resource.string("period.end"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn er_visit() -> Value {
        json!({
            "resourceType": "Encounter",
            "id": "e1",
            "status": "finished",
            "class": {"system": "http://terminology.hl7.org/CodeSystem/v3-ActCode", "code": "EMER"},
            "type": [
                {
                    "coding": [
                        {"system": "http://snomed.info/sct", "code": "50849002", "display": "Emergency room admission"},
                        {"system": "http://snomed.info/sct", "code": "183452005", "display": "Emergency hospital admission"}
                    ],
                    "text": "Emergency room admission"
                },
                {
                    "coding": [{"system": "http://snomed.info/sct", "code": "185347001", "display": "Encounter for problem"}]
                }
            ],
            "subject": {"reference": "urn:uuid:p1", "display": "Mrs. Anna Smith"},
            "period": {"start": "2019-02-03T10:00:00-05:00", "end": "2019-02-03T11:30:00-05:00"}
        })
    }

    #[test]
    fn test_first_coding_wins() {
        let value = er_visit();
        let resource = Resource::new(&value).unwrap();
        let record = EncounterProjector.project(&resource, &mut Vec::new()).unwrap();
        assert_eq!(
            record,
            EncounterRecord {
                encounter_id: Some("e1".to_string()),
                patient_id: Some("p1".to_string()),
                type_code: Some("50849002".to_string()),
                type_display: Some("Emergency room admission".to_string()),
                start_time: Some("2019-02-03T10:00:00-05:00".to_string()),
                end_time: Some("2019-02-03T11:30:00-05:00".to_string()),
                class_code: Some("EMER".to_string()),
            }
        );
    }

    #[test]
    fn test_type_entries_without_coding_are_skipped() {
        let value = json!({
            "resourceType": "Encounter",
            "id": "e2",
            "type": [
                {"text": "Check up"},
                {"coding": []},
                {"coding": [{"code": "162673000", "display": "General examination of patient"}]}
            ]
        });
        let resource = Resource::new(&value).unwrap();
        let record = EncounterProjector.project(&resource, &mut Vec::new()).unwrap();
        assert_eq!(record.type_code.as_deref(), Some("162673000"));
        assert_eq!(
            record.type_display.as_deref(),
            Some("General examination of patient")
        );
    }

    #[test]
    fn test_missing_optional_parts() {
        let value = json!({"resourceType": "Encounter", "id": "e3", "subject": {"display": "?"}});
        let resource = Resource::new(&value).unwrap();
        let record = EncounterProjector.project(&resource, &mut Vec::new()).unwrap();
        assert_eq!(record.patient_id, None);
        assert_eq!(record.type_code, None);
        assert_eq!(record.type_display, None);
        assert_eq!(record.start_time, None);
        assert_eq!(record.class_code, None);
    }

    #[test]
    fn test_reference_without_prefix_kept() {
        let value = json!({"resourceType": "Encounter", "subject": {"reference": "Patient/123"}});
        let resource = Resource::new(&value).unwrap();
        let record = EncounterProjector.project(&resource, &mut Vec::new()).unwrap();
        assert_eq!(record.patient_id.as_deref(), Some("Patient/123"));
    }

    #[test]
    fn test_emergency_predicate() {
        let projector = EmergencyEncounterProjector::default();
        let finished = er_visit();
        assert!(projector.matches(&Resource::new(&finished).unwrap()));

        let mut in_progress = er_visit();
        in_progress["status"] = json!("in-progress");
        assert!(!projector.matches(&Resource::new(&in_progress).unwrap()));

        let mut ambulatory = er_visit();
        ambulatory["class"]["code"] = json!("AMB");
        assert!(!projector.matches(&Resource::new(&ambulatory).unwrap()));

        let condition = json!({"resourceType": "Condition", "status": "finished", "class": {"code": "EMER"}});
        assert!(!projector.matches(&Resource::new(&condition).unwrap()));

        let ambulatory_projector = EmergencyEncounterProjector::new("AMB");
        assert!(ambulatory_projector.matches(&Resource::new(&ambulatory).unwrap()));
    }

    #[test]
    fn test_emergency_record() {
        let value = er_visit();
        let resource = Resource::new(&value).unwrap();
        let record = EmergencyEncounterProjector::default()
            .project(&resource, &mut Vec::new())
            .unwrap();
        assert_eq!(record.encounter_id.as_deref(), Some("e1"));
        assert_eq!(record.patient_id.as_deref(), Some("p1"));
        assert_eq!(record.end_time.as_deref(), Some("2019-02-03T11:30:00-05:00"));
    }
}
