use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Previously known field values of the subject being matched.
///
/// Required only when a criterion resolves to `unchanged`: the compiler then
/// compares the column against the captured value, or emits a null test when
/// the captured value is absent. Read-only within a compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectSnapshot {
    pub screening_status_id: Option<i32>,
    pub ss_reason_id: Option<i32>,
    pub sdd_reason_id: Option<i32>,
    pub surveillance_reason_id: Option<i32>,
    pub cease_reason_id: Option<i32>,
    pub screening_due_date: Option<NaiveDate>,
    pub calculated_sdd: Option<NaiveDate>,
    pub surveillance_due_date: Option<NaiveDate>,
}
