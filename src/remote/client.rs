//! HTTP client for the hosted time-record store (PostgREST-style API).

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::RemoteConfig;
use crate::error::AppError;
use crate::remote::types::{Employee, FunctionRole, TimeRecord};

const HTTP_TIMEOUT_SECS: u64 = 15;

// Table names of the hosted store.
const TIME_RECORDS_TABLE: &str = "time_records";
const EMPLOYEES_TABLE: &str = "employees";
const FUNCTIONS_TABLE: &str = "functions";

/// Source of time records. The dashboard and the tests depend on this trait,
/// never on the concrete HTTP client.
pub trait TimeRecordSource {
    /// Records filtered by employees, functions and date range. Empty lists
    /// and absent dates impose no restriction; `end` is inclusive through the
    /// end of the day.
    fn query_time_records(
        &self,
        employees: &[String],
        functions: &[String],
        start: Option<&str>,
        end: Option<&str>,
    ) -> Vec<TimeRecord>;

    fn list_employees(&self) -> Vec<Employee>;

    fn list_functions(&self) -> Vec<FunctionRole>;
}

/// Client for the hosted store (Supabase/PostgREST).
pub struct SupabaseStore {
    client: Client,
    config: RemoteConfig,
}

impl SupabaseStore {
    pub fn new(config: RemoteConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(SupabaseStore { client, config })
    }

    /// GET on one REST table, decoding the JSON response. Any network or
    /// decoding failure becomes an empty list, with a warning in the log.
    fn fetch<T: DeserializeOwned>(&self, table: &str, params: &[(String, String)]) -> Vec<T> {
        let url = rest_url(&self.config.base_url, table);
        let result = self
            .client
            .get(&url)
            .header("apikey", &self.config.api_key)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key),
            )
            .query(params)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<T>>());

        match result {
            Ok(rows) => rows,
            Err(err) => {
                warn!(table, %err, "falha ao consultar o banco remoto; usando lista vazia");
                Vec::new()
            }
        }
    }
}

impl TimeRecordSource for SupabaseStore {
    fn query_time_records(
        &self,
        employees: &[String],
        functions: &[String],
        start: Option<&str>,
        end: Option<&str>,
    ) -> Vec<TimeRecord> {
        let params = time_record_params(employees, functions, start, end);
        self.fetch(TIME_RECORDS_TABLE, &params)
    }

    fn list_employees(&self) -> Vec<Employee> {
        self.fetch(EMPLOYEES_TABLE, &[("select".to_string(), "name".to_string())])
    }

    fn list_functions(&self) -> Vec<FunctionRole> {
        self.fetch(FUNCTIONS_TABLE, &[("select".to_string(), "name".to_string())])
    }
}

/// PostgREST parameters of the time-record query. Empty or absent filters
/// stay out of the query string; `end` is extended to the end of the day.
fn time_record_params(
    employees: &[String],
    functions: &[String],
    start: Option<&str>,
    end: Option<&str>,
) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    if !employees.is_empty() {
        params.push(("employee_name".to_string(), in_list(employees)));
    }
    if !functions.is_empty() {
        params.push(("function_name".to_string(), in_list(functions)));
    }
    if let Some(start) = start {
        params.push(("start_time".to_string(), format!("gte.{start}")));
    }
    if let Some(end) = end {
        params.push(("start_time".to_string(), format!("lte.{end}T23:59:59")));
    }
    params
}

fn rest_url(base_url: &str, table: &str) -> String {
    format!("{base_url}/rest/v1/{table}")
}

/// PostgREST `in.(...)` operator for multi-select filters.
fn in_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("\"{v}\"")).collect();
    format!("in.({})", quoted.join(","))
}
