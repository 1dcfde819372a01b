//! Constants and configuration of the repairs dashboard.

/// CSV export of the repair system (primary source).
pub const NOME_ARQUIVO: &str = "CONSERTOS 20242025.xlsx - rci3040.xls 1.csv";

/// Original Excel workbook (secondary source, used when the CSV fails).
pub const NOME_ARQUIVO_EXCEL: &str = "CONSERTOS 20242025.xlsx";

/// Fixed month labels, indexed by `mes - 1`.
pub const MESES: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Label of a month (1–12). Out-of-range months yield `None`.
pub fn mes_nome(mes: u32) -> Option<&'static str> {
    if (1..=12).contains(&mes) {
        Some(MESES[(mes - 1) as usize])
    } else {
        None
    }
}

/// Credentials of the hosted time-record store.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
}

impl RemoteConfig {
    /// Loads the remote store configuration from `SUPABASE_URL` and
    /// `SUPABASE_KEY`. Returns `None` when either is unset so the activities
    /// page can degrade to an empty dataset instead of panicking.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("SUPABASE_URL").ok()?;
        let api_key = std::env::var("SUPABASE_KEY").ok()?;
        Some(RemoteConfig { base_url, api_key })
    }
}
