//! Application context for the wiki CLI.
//!
//! Bundles CLI arguments with lazily-loaded settings so that `config`
//! subcommands keep working when the config file holds bad values.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use wiki_core::{FileCredentialStore, LogLevel};

use crate::cli::{Cli, GlobalArgs};
use crate::config::{self, ConfigDocument, EnvOverrides, Settings};
use crate::helpers::{Console, StdConsole};
use crate::output::Renderer;
use crate::ui::{OutputMode, UiContext};

pub struct AppContext<'a> {
    cli: &'a Cli,
    renderer: Renderer,
    console: StdConsole,
    settings: OnceCell<Settings>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        let global = &cli.global;
        let renderer = Renderer {
            mode: if global.json {
                OutputMode::Json
            } else {
                OutputMode::Plain
            },
            output: global.output.clone(),
            request_id: global.request_id.clone(),
            ui: UiContext::from_env(global.no_color),
        };
        Self {
            cli,
            renderer,
            console: StdConsole,
            settings: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn global(&self) -> &GlobalArgs {
        &self.cli.global
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn console(&self) -> &dyn Console {
        &self.console
    }

    /// Validated output mode. Fails if both `--json` and `--plain` are set.
    pub fn output_mode(&self) -> wiki_core::Result<OutputMode> {
        OutputMode::resolve(self.cli.global.json, self.cli.global.plain)
    }

    pub fn log_level(&self) -> LogLevel {
        let global = &self.cli.global;
        LogLevel::from_flags(global.quiet, global.verbose, global.debug)
    }

    pub fn config_path(&self) -> wiki_core::Result<PathBuf> {
        config::config_path()
    }

    pub fn credential_store(&self) -> wiki_core::Result<FileCredentialStore> {
        Ok(FileCredentialStore::new(config::credentials_path()?))
    }

    /// Effective settings, loaded on first use.
    pub fn settings(&self) -> wiki_core::Result<&Settings> {
        self.settings.get_or_try_init(|| {
            let document = ConfigDocument::load(&config::config_path()?)?;
            let file = document.typed()?;
            let env = EnvOverrides::from_env()?;
            Settings::resolve(&self.cli.global, &env, &file)
        })
    }
}
