use serde::Serialize;

use super::{Projector, timestamp_at};
use crate::bundle::Resource;
use crate::column::{ColumnInfo, ColumnType};
use crate::datetime::ClinicalDateTime;
use crate::diagnostics::FieldIssue;
use crate::reference;

/// Row of the `medication_requests` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicationRequestRecord {
    pub medication_request_id: Option<String>,
    pub patient_id: Option<String>,
    pub encounter_id: Option<String>,
    pub status: Option<String>,
    pub intent: Option<String>,
    pub medication_code: Option<String>,
    pub medication_display: Option<String>,
    pub authored_on: Option<ClinicalDateTime>,
}

/// Produces the `medication_requests` table of the summary profile.
///
/// Only `medicationCodeableConcept` is read; requests pointing at a
/// Medication resource keep empty medication columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedicationRequestProjector;

impl Projector for MedicationRequestProjector {
    type Record = MedicationRequestRecord;

    fn name(&self) -> &'static str {
        "medication_requests"
    }

    fn resource_type(&self) -> &'static str {
        "MedicationRequest"
    }

    fn columns(&self) -> Vec<ColumnInfo> {
        vec![
            ColumnInfo::string("medication_request_id"),
            ColumnInfo::string("patient_id").with_description("MedicationRequest.subject"),
            ColumnInfo::string("encounter_id").with_description("MedicationRequest.encounter"),
            ColumnInfo::string("status"),
            ColumnInfo::string("intent"),
            ColumnInfo::string("medication_code").with_description("RxNorm code"),
            ColumnInfo::string("medication_display"),
            ColumnInfo::new("authored_on", ColumnType::Timestamp),
        ]
    }

    fn project(
        &self,
        resource: &Resource<'_>,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<MedicationRequestRecord> {
        Some(MedicationRequestRecord {
            medication_request_id: resource.string("id"),
            patient_id: reference::resolve_at(resource.value(), "subject"),
            encounter_id: reference::resolve_at(resource.value(), "encounter"),
            status: resource.string("status"),
            intent: resource.string("intent"),
            medication_code: resource.string("medicationCodeableConcept.coding.0.code"),
            medication_display: resource
                .string("medicationCodeableConcept.coding.0.display")
                .or_else(|| resource.string("medicationCodeableConcept.text")),
            authored_on: timestamp_at(resource, "authoredOn", issues),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_synthea_medication_request() {
        let value = json!({
            "resourceType": "MedicationRequest",
            "id": "m1",
            "status": "stopped",
            "intent": "order",
            "medicationCodeableConcept": {
                "coding": [{"system": "http://www.nlm.nih.gov/research/umls/rxnorm", "code": "314076", "display": "lisinopril 10 MG Oral Tablet"}],
                "text": "lisinopril 10 MG Oral Tablet"
            },
            "subject": {"reference": "urn:uuid:p1"},
            "encounter": {"reference": "urn:uuid:e1"},
            "authoredOn": "2011-06-27T01:12:54-04:00"
        });
        let resource = Resource::new(&value).unwrap();
        let mut issues = Vec::new();
        let record = MedicationRequestProjector
            .project(&resource, &mut issues)
            .unwrap();

        assert!(issues.is_empty());
        assert_eq!(record.medication_request_id.as_deref(), Some("m1"));
        assert_eq!(record.patient_id.as_deref(), Some("p1"));
        assert_eq!(record.encounter_id.as_deref(), Some("e1"));
        assert_eq!(record.status.as_deref(), Some("stopped"));
        assert_eq!(record.intent.as_deref(), Some("order"));
        assert_eq!(record.medication_code.as_deref(), Some("314076"));
        assert_eq!(
            record.medication_display.as_deref(),
            Some("lisinopril 10 MG Oral Tablet")
        );
        assert_eq!(
            record.authored_on.unwrap().to_string(),
            "2011-06-27T01:12:54-04:00"
        );
    }

    #[test]
    fn test_medication_reference_leaves_columns_empty() {
        let value = json!({
            "resourceType": "MedicationRequest",
            "id": "m2",
            "medicationReference": {"reference": "urn:uuid:med-1"},
            "authoredOn": "not a date"
        });
        let resource = Resource::new(&value).unwrap();
        let mut issues = Vec::new();
        let record = MedicationRequestProjector
            .project(&resource, &mut issues)
            .unwrap();

        assert_eq!(record.medication_code, None);
        assert_eq!(record.medication_display, None);
        assert_eq!(record.authored_on, None);
        assert_eq!(issues.len(), 1);
    }
}
