//! Projectors: one matching resource in, one flat record out.
//!
//! Each table is produced by a [`Projector`]: it decides which resources it
//! consumes ([`Projector::matches`]) and how a resource becomes a typed record
//! ([`Projector::project`]). Record structs serialize with field names equal
//! to the column names, which is how they turn into table rows.
//!
//! Projectors are grouped into [`Profile`]s. The detailed profile produces the
//! `patients`, `encounters` and `conditions` tables; the summary profile the
//! combined patient, condition and medication tables; the emergency profile
//! the `er_encounters` table.

mod condition;
mod encounter;
mod extension;
mod medication;
mod patient;

pub use condition::{
    ConditionProjector, ConditionRecord, ConditionSummaryProjector, ConditionSummaryRecord,
};
pub use encounter::{
    DEFAULT_EMERGENCY_CLASS_CODE, EmergencyEncounterProjector, EmergencyEncounterRecord,
    EncounterProjector, EncounterRecord,
};
pub use extension::{ExtensionMatch, US_CORE_BIRTHSEX, US_CORE_ETHNICITY, US_CORE_RACE};
pub use medication::{MedicationRequestProjector, MedicationRequestRecord};
pub use patient::{
    PatientProjector, PatientRecord, PatientSummaryProjector, PatientSummaryRecord,
};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bundle::{Bundle, Resource};
use crate::column::ColumnInfo;
use crate::datetime::ClinicalDateTime;
use crate::diagnostics::FieldIssue;
use crate::table::{Row, Table};
use crate::{Error, Result};

/// Maps resources of one type onto flat records.
pub trait Projector {
    /// Record type; its serialized field names must equal the column names.
    type Record: Serialize;

    /// Name of the produced table.
    fn name(&self) -> &'static str;

    /// `resourceType` this projector consumes.
    fn resource_type(&self) -> &'static str;

    /// Output columns, in order.
    fn columns(&self) -> Vec<ColumnInfo>;

    /// Whether `resource` belongs in this projector's table.
    fn matches(&self, resource: &Resource<'_>) -> bool {
        resource.is(self.resource_type())
    }

    /// Build the record for a matching resource.
    ///
    /// Unusable field values are pushed onto `issues` and left empty in the
    /// record.
    fn project(
        &self,
        resource: &Resource<'_>,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<Self::Record>;
}

/// Object-safe view of a [`Projector`], producing untyped rows.
pub trait TableProjector {
    fn table_name(&self) -> &'static str;

    fn table_columns(&self) -> Vec<ColumnInfo>;

    /// Project every matching resource of `bundle`, in entry order.
    fn project_bundle(&self, bundle: &Bundle, issues: &mut Vec<FieldIssue>) -> Vec<Row>;

    /// Empty table with this projector's name and columns.
    fn empty_table(&self) -> Table {
        Table::new(self.table_name(), self.table_columns())
    }
}

impl<P: Projector> TableProjector for P {
    fn table_name(&self) -> &'static str {
        Projector::name(self)
    }

    fn table_columns(&self) -> Vec<ColumnInfo> {
        Projector::columns(self)
    }

    fn project_bundle(&self, bundle: &Bundle, issues: &mut Vec<FieldIssue>) -> Vec<Row> {
        let columns = Projector::columns(self);
        bundle
            .resources()
            .filter(|resource| self.matches(resource))
            .filter_map(|resource| self.project(&resource, issues))
            .filter_map(|record| match record_to_row(&record, &columns) {
                Ok(row) => Some(row),
                Err(e) => {
                    tracing::warn!(
                        table = Projector::name(self),
                        error = %e,
                        "Dropping unserializable record"
                    );
                    None
                }
            })
            .collect()
    }
}

/// Lay a record out along `columns`; fields without a column are ignored.
pub fn record_to_row<R: Serialize>(record: &R, columns: &[ColumnInfo]) -> Result<Row> {
    let Value::Object(mut fields) = serde_json::to_value(record)? else {
        return Err(Error::output("record did not serialize to an object"));
    };
    Ok(columns
        .iter()
        .map(|col| fields.remove(&col.name).unwrap_or(Value::Null))
        .collect())
}

/// Parse the date-time string at `path`.
///
/// An absent value yields `None` silently; a malformed one yields `None` and
/// a [`FieldIssue::InvalidDateTime`].
pub(crate) fn timestamp_at(
    resource: &Resource<'_>,
    path: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<ClinicalDateTime> {
    let raw = resource.str(path).filter(|s| !s.is_empty())?;
    match raw.parse() {
        Ok(dt) => Some(dt),
        Err(source) => {
            issues.push(FieldIssue::InvalidDateTime {
                resource: resource.label(),
                field: path,
                source,
            });
            None
        }
    }
}

/// Settings shared by the built-in projectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorOptions {
    /// Which entry wins when an extension URL occurs more than once.
    pub extension_match: ExtensionMatch,

    /// `Encounter.class.code` selecting emergency encounters.
    pub emergency_class_code: String,
}

impl Default for ProjectorOptions {
    fn default() -> Self {
        Self {
            extension_match: ExtensionMatch::First,
            emergency_class_code: DEFAULT_EMERGENCY_CLASS_CODE.to_string(),
        }
    }
}

/// A named set of projectors producing related tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// `patients`, `encounters`, `conditions`.
    Detailed,
    /// `patient_summary`, `condition_summary`, `medication_requests`.
    Summary,
    /// `er_encounters`: finished encounters of the emergency class.
    Emergency,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Detailed, Profile::Summary, Profile::Emergency];

    /// Instantiate the projectors of this profile.
    pub fn projectors(&self, options: &ProjectorOptions) -> Vec<Box<dyn TableProjector>> {
        match self {
            Self::Detailed => vec![
                Box::new(PatientProjector::new(options.extension_match)),
                Box::new(EncounterProjector),
                Box::new(ConditionProjector),
            ],
            Self::Summary => vec![
                Box::new(PatientSummaryProjector::new(options.extension_match)),
                Box::new(ConditionSummaryProjector),
                Box::new(MedicationRequestProjector),
            ],
            Self::Emergency => vec![Box::new(EmergencyEncounterProjector::new(
                options.emergency_class_code.clone(),
            ))],
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detailed => write!(f, "detailed"),
            Self::Summary => write!(f, "summary"),
            Self::Emergency => write!(f, "emergency"),
        }
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "summary" => Ok(Self::Summary),
            "emergency" | "er" => Ok(Self::Emergency),
            _ => Err(Error::config(format!("Unknown profile: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bundle(resources: Vec<Value>) -> Bundle {
        let entries: Vec<Value> = resources.into_iter().map(|r| json!({"resource": r})).collect();
        Bundle::from_value("test.json", json!({"resourceType": "Bundle", "entry": entries}))
            .unwrap()
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("detailed".parse::<Profile>().unwrap(), Profile::Detailed);
        assert_eq!("SUMMARY".parse::<Profile>().unwrap(), Profile::Summary);
        assert_eq!("er".parse::<Profile>().unwrap(), Profile::Emergency);
        assert!("everything".parse::<Profile>().is_err());
        for profile in Profile::ALL {
            assert_eq!(profile.to_string().parse::<Profile>().unwrap(), profile);
        }
    }

    #[test]
    fn test_profile_tables() {
        let options = ProjectorOptions::default();
        let names = |p: Profile| -> Vec<&'static str> {
            p.projectors(&options).iter().map(|p| p.table_name()).collect()
        };
        assert_eq!(names(Profile::Detailed), vec!["patients", "encounters", "conditions"]);
        assert_eq!(
            names(Profile::Summary),
            vec!["patient_summary", "condition_summary", "medication_requests"]
        );
        assert_eq!(names(Profile::Emergency), vec!["er_encounters"]);
    }

    #[test]
    fn test_record_fields_cover_columns() {
        // Every column must be filled from a record field of the same name.
        let options = ProjectorOptions::default();
        let full = bundle(vec![
            json!({"resourceType": "Patient", "id": "p1"}),
            json!({"resourceType": "Encounter", "id": "e1", "class": {"code": "EMER"}, "status": "finished"}),
            json!({"resourceType": "Condition", "id": "c1"}),
            json!({"resourceType": "MedicationRequest", "id": "m1"}),
        ]);
        for profile in Profile::ALL {
            for projector in profile.projectors(&options) {
                let mut issues = Vec::new();
                let rows = projector.project_bundle(&full, &mut issues);
                assert_eq!(rows.len(), 1, "table {}", projector.table_name());
                let id = &rows[0][0];
                assert!(id.is_string(), "table {} lost its id column", projector.table_name());
                assert_eq!(rows[0].len(), projector.table_columns().len());
            }
        }
    }

    #[test]
    fn test_record_to_row_orders_by_columns() {
        #[derive(Serialize)]
        struct Pair {
            b: &'static str,
            a: Option<&'static str>,
        }
        let columns = vec![
            ColumnInfo::string("a"),
            ColumnInfo::string("b"),
            ColumnInfo::string("c"),
        ];
        let row = record_to_row(&Pair { b: "x", a: None }, &columns).unwrap();
        assert_eq!(row, vec![Value::Null, json!("x"), Value::Null]);
    }

    #[test]
    fn test_timestamp_at_reports_malformed_values() {
        let value = json!({
            "resourceType": "Condition",
            "id": "c1",
            "onsetDateTime": "2020-01-01T00:00:00Z",
            "abatementDateTime": "soon"
        });
        let resource = Resource::new(&value).unwrap();
        let mut issues = Vec::new();

        assert!(timestamp_at(&resource, "onsetDateTime", &mut issues).is_some());
        assert!(timestamp_at(&resource, "recordedDate", &mut issues).is_none());
        assert!(issues.is_empty());

        assert!(timestamp_at(&resource, "abatementDateTime", &mut issues).is_none());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().starts_with("Condition/c1 abatementDateTime"));
    }
}
