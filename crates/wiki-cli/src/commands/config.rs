use serde_json::{json, Value};

use crate::app::AppContext;
use crate::config::{resolve_key, ConfigDocument};
use crate::output::{schemas, Status};

pub fn handle_get(ctx: &AppContext, key: &str) -> anyhow::Result<()> {
    let key = resolve_key(key)?;
    let document = ConfigDocument::load(&ctx.config_path()?)?;
    let value = document.get(key).cloned();

    let renderer = ctx.renderer();
    if !renderer.mode.is_json() {
        let text = match &value {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        renderer.plain(&text)?;
        return Ok(());
    }

    let (summary, status) = match value {
        Some(_) => (format!("Config {}", key.name), Status::Success),
        None => (format!("Config {} is not set", key.name), Status::Warn),
    };
    renderer.result(
        schemas::CONFIG_GET,
        &summary,
        status,
        json!({ "key": key.name, "value": value }),
    )?;
    Ok(())
}

pub fn handle_set(ctx: &AppContext, key: &str, raw: &str) -> anyhow::Result<()> {
    let key = resolve_key(key)?;
    let value = key.parse_value(raw)?;
    let mut document = ConfigDocument::load(&ctx.config_path()?)?;
    let summary = match value {
        Some(_) => format!("Config {} updated", key.name),
        None => format!("Config {} removed", key.name),
    };
    document.set(key, value.clone());
    document.save()?;

    ctx.renderer().notice(
        schemas::CONFIG_SET,
        &summary,
        Status::Success,
        json!({ "key": key.name, "value": value }),
        &format!("{}.", summary),
    )?;
    Ok(())
}

pub fn handle_path(ctx: &AppContext) -> anyhow::Result<()> {
    let path = ctx.config_path()?;
    let path = path.display().to_string();

    let renderer = ctx.renderer();
    if renderer.mode.is_json() {
        renderer.result(
            schemas::CONFIG_PATH,
            "Config path",
            Status::Success,
            json!({ "path": path }),
        )?;
    } else {
        renderer.plain(&path)?;
    }
    Ok(())
}
