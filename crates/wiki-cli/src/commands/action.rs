use wiki_core::adapters::EntitySearch;
use wiki_core::WikiError;

use crate::app::AppContext;
use crate::cli::SearchArgs;
use crate::output::schemas;

use super::network::{prepare, Labels};

pub fn handle_search(ctx: &AppContext, args: &SearchArgs) -> anyhow::Result<()> {
    let limit = u32::try_from(args.limit)
        .ok()
        .filter(|limit| *limit >= 1)
        .ok_or_else(|| {
            WikiError::validation(format!(
                "limit must be a positive integer (got {})",
                args.limit
            ))
        })?;

    let session = prepare(ctx)?;
    let endpoint = EntitySearch {
        action_url: session.settings.action_url.clone(),
        search: args.query.clone(),
        language: args.language.clone(),
        limit,
    };
    endpoint.validate()?;
    session.run(
        ctx,
        &endpoint,
        Labels {
            schema: schemas::ACTION_SEARCH,
            summary: "Action search executed".to_string(),
            preview_summary: "Preview Action API search".to_string(),
        },
    )
}
