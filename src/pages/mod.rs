//! Dashboard pages: each interaction declares its inputs and produces a
//! serializable payload, with no coupling to the rendering layer.

pub mod atividades;
pub mod consertos;
pub mod internos;

use serde::Deserialize;

use crate::analyzer::filter::FilterSpec;
use crate::error::AppError;
use crate::remote::TimeRecordSource;
use crate::AppContext;

pub use atividades::{AtividadesDashboard, AtividadesFilter};
pub use consertos::ConsertosDashboard;
pub use internos::InternosDashboard;

/// One user interaction with the dashboard: the target page plus the filters
/// it requires.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "pagina", rename_all = "camelCase")]
pub enum Interaction {
    Consertos { filtros: FilterSpec },
    Internos { filtros: FilterSpec },
    Atividades { filtros: AtividadesFilter },
}

/// Interaction registry: routes each interaction to the page builder and
/// returns the payload ready for rendering.
pub fn dispatch<S: TimeRecordSource>(
    ctx: &AppContext,
    source: &S,
    interaction: &Interaction,
) -> Result<serde_json::Value, AppError> {
    let payload = match interaction {
        Interaction::Consertos { filtros } => serde_json::to_value(consertos::build(ctx, filtros))?,
        Interaction::Internos { filtros } => serde_json::to_value(internos::build(ctx, filtros))?,
        Interaction::Atividades { filtros } => {
            serde_json::to_value(atividades::build(source, filtros))?
        }
    };
    Ok(payload)
}
