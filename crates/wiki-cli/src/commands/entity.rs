use wiki_core::adapters::{EntityGet, EntityId, EntityStatements};

use crate::app::AppContext;
use crate::output::schemas;

use super::network::{prepare, Labels};

pub fn handle_get(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let session = prepare(ctx)?;
    let id: EntityId = id.parse()?;
    let endpoint = EntityGet {
        base_url: session.settings.api_url.clone(),
        id: id.clone(),
    };
    session.run(
        ctx,
        &endpoint,
        Labels {
            schema: schemas::ENTITY_GET,
            summary: format!("Fetched {}", id),
            preview_summary: format!("Preview {} request", id),
        },
    )
}

pub fn handle_statements(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let session = prepare(ctx)?;
    let id: EntityId = id.parse()?;
    let endpoint = EntityStatements {
        base_url: session.settings.api_url.clone(),
        id: id.clone(),
    };
    session.run(
        ctx,
        &endpoint,
        Labels {
            schema: schemas::ENTITY_STATEMENTS,
            summary: format!("Fetched {} statements", id),
            preview_summary: format!("Preview {} statements request", id),
        },
    )
}
