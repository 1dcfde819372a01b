use serde::{Deserialize, Serialize};

/// Row of the hosted `time_records` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRecord {
    pub employee_name: Option<String>,
    pub function_name: Option<String>,
    pub start_time: Option<String>,
    pub duration_ms: Option<i64>,
}

impl TimeRecord {
    /// Records without a duration, or with a zero/negative one, never take
    /// part in any calculation.
    pub fn is_valid(&self) -> bool {
        matches!(self.duration_ms, Some(ms) if ms > 0)
    }

    /// Duration in hours. Zero for invalid records.
    pub fn horas(&self) -> f64 {
        match self.duration_ms {
            Some(ms) if ms > 0 => ms as f64 / 3_600_000.0,
            _ => 0.0,
        }
    }
}

/// Row of the `employees` lookup table (sidebar filter options).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
}

/// Row of the `functions` lookup table (sidebar filter options).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRole {
    pub name: String,
}
