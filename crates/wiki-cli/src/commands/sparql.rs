use wiki_core::adapters::SparqlQuery;

use crate::app::AppContext;
use crate::cli::SparqlQueryArgs;
use crate::helpers::resolve_query;
use crate::output::schemas;

use super::network::{prepare, Labels};

pub fn handle_query(ctx: &AppContext, args: &SparqlQueryArgs) -> anyhow::Result<()> {
    let session = prepare(ctx)?;
    let query = resolve_query(
        ctx.console(),
        args.query.as_deref(),
        args.file.as_deref(),
        ctx.global().no_input,
    )?;
    let endpoint = SparqlQuery {
        endpoint: session.settings.sparql_url.clone(),
        query,
        format: args.format.into(),
    };
    session.run(
        ctx,
        &endpoint,
        Labels {
            schema: schemas::SPARQL_QUERY,
            summary: "SPARQL query executed".to_string(),
            preview_summary: "Preview SPARQL request".to_string(),
        },
    )
}
