use serde_json::json;

use crate::app::AppContext;
use crate::output::{schemas, Status};

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

pub fn handle_doctor(ctx: &AppContext) -> anyhow::Result<()> {
    let settings = ctx.settings()?;
    let store = ctx.credential_store()?;
    let user_agent = settings.user_agent.is_some();
    let token = store.exists();

    let renderer = ctx.renderer();
    if !renderer.mode.is_json() {
        tracing::info!("User-Agent configured: {}", yes_no(user_agent));
        tracing::info!("Encrypted token present: {}", yes_no(token));
        tracing::info!("API URL: {}", settings.api_url);
        tracing::info!("Action API URL: {}", settings.action_url);
        tracing::info!("SPARQL URL: {}", settings.sparql_url);
        return Ok(());
    }

    let (summary, status) = if user_agent {
        ("Doctor checks passed", Status::Success)
    } else {
        ("User-Agent is not configured", Status::Warn)
    };
    renderer.result(
        schemas::DOCTOR,
        summary,
        status,
        json!({
            "user_agent_configured": user_agent,
            "token_present": token,
            "api_url": settings.api_url,
            "action_url": settings.action_url,
            "sparql_url": settings.sparql_url,
            "config_path": ctx.config_path()?.display().to_string(),
        }),
    )?;
    Ok(())
}
