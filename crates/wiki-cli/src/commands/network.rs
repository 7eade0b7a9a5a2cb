//! Shared path for every command that talks to a Wikimedia API.
//!
//! ```text
//! gate (--network)      skipped for --print-request
//! settings
//! user agent required   skipped for --print-request
//! authorization         placeholder for --print-request
//! build descriptor
//! preview | execute on a current-thread runtime
//! ```

use std::sync::Arc;

use wiki_core::{
    CallerHeaders, Endpoint, ReqwestTransport, RequestEngine, TracingLogger, WikiError,
};

use crate::app::{authorization, AppContext};
use crate::config::Settings;
use crate::output::{schemas, Status};

const NETWORK_DISABLED: &str = "Network access is disabled. Re-run with --network.";
const USER_AGENT_REQUIRED: &str = "User-Agent is required. Provide --user-agent or WIKI_USER_AGENT.";

/// Names used when rendering one command's result.
pub struct Labels {
    pub schema: &'static str,
    pub summary: String,
    pub preview_summary: String,
}

/// Checked settings and caller headers for one network command.
pub struct Session<'c> {
    pub settings: &'c Settings,
    caller: CallerHeaders,
    preview: bool,
}

/// Run the policy checks and resolve caller headers.
pub fn prepare<'c>(ctx: &'c AppContext) -> anyhow::Result<Session<'c>> {
    let global = ctx.global();
    let preview = global.print_request;

    if !preview && !global.network {
        return Err(WikiError::policy(NETWORK_DISABLED).into());
    }

    let settings = ctx.settings()?;
    if !preview && settings.user_agent.is_none() {
        return Err(WikiError::policy(USER_AGENT_REQUIRED).into());
    }

    let mut caller = CallerHeaders::new(settings.user_agent.clone());
    if let Some(value) = authorization(ctx, preview)? {
        caller = caller.with_authorization(value);
    }

    Ok(Session {
        settings,
        caller,
        preview,
    })
}

impl Session<'_> {
    /// Preview or execute `endpoint` and render the result.
    pub fn run<E: Endpoint>(
        &self,
        ctx: &AppContext,
        endpoint: &E,
        labels: Labels,
    ) -> anyhow::Result<()> {
        if self.preview {
            let descriptor = endpoint.build(&self.caller)?;
            let data = serde_json::to_value(descriptor.preview())?;
            ctx.renderer().result(
                schemas::REQUEST_PREVIEW,
                &labels.preview_summary,
                Status::Success,
                data,
            )?;
            return Ok(());
        }

        let engine = RequestEngine::new(
            ReqwestTransport::new()?,
            self.settings.retry_policy()?,
            Arc::new(TracingLogger),
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let payload = runtime.block_on(engine.call(endpoint, &self.caller))?;

        ctx.renderer()
            .result(labels.schema, &labels.summary, Status::Success, payload.to_json())?;
        Ok(())
    }
}
