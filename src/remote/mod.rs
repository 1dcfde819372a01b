//! Remote time-record store: PostgREST client, row types and KPIs.

pub mod client;
pub mod kpis;
pub mod types;

pub use client::{SupabaseStore, TimeRecordSource};
pub use kpis::{
    calculate_kpis, get_distribuicao_por_funcao, get_distribuicao_por_funcionario, ActivityKpis,
    HoursByGroup,
};
pub use types::{Employee, FunctionRole, TimeRecord};
