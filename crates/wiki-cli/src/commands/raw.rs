use wiki_core::adapters::RawCall;
use wiki_core::Method;

use crate::app::AppContext;
use crate::cli::RawRequestArgs;
use crate::helpers::read_file;
use crate::output::schemas;

use super::network::{prepare, Labels};

pub fn handle_request(ctx: &AppContext, args: &RawRequestArgs) -> anyhow::Result<()> {
    let session = prepare(ctx)?;
    let method = Method::parse(&args.method)?;
    let body = args.body_file.as_deref().map(read_file).transpose()?;
    let endpoint = RawCall {
        base_url: session.settings.api_url.clone(),
        method,
        path: args.path.clone(),
        body,
    };
    session.run(
        ctx,
        &endpoint,
        Labels {
            schema: schemas::RAW_REQUEST,
            summary: "Raw request executed".to_string(),
            preview_summary: "Preview raw request".to_string(),
        },
    )
}
