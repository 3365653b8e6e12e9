use serde::{Deserialize, Serialize};

/// Personnel record. Append-only: any change is a whole new snapshot on the
/// hr chain, never a partial update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_num:  String,
    pub salary:        f64,
    pub department:    String,
    pub supervisor_id: String,
}

impl Employee {
    pub fn new(salary: f64, department: String, supervisor_id: String) -> Self {
        Self {
            employee_num: uuid::Uuid::new_v4().simple().to_string(),
            salary,
            department,
            supervisor_id,
        }
    }
}
