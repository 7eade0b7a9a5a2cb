//! wiki CLI - query Wikidata entities, SPARQL and search from the command line
//!
//! This is the command-line interface over `wiki_core`. It resolves
//! configuration and input, runs one command, and renders the result as a
//! JSON envelope or plain text.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod ui;

use clap::Parser;

use crate::app::AppContext;
use crate::cli::{
    ActionCommand, AuthCommand, Cli, Commands, ConfigCommand, EntityCommand, RawCommand,
    SparqlCommand,
};
use crate::commands::{action, auth, doctor, entity, misc, raw, sparql};
use crate::constants::exit_codes;
use crate::errors::ErrorReport;
use crate::output::Renderer;
use crate::ui::{OutputMode, UiContext};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => std::process::exit(report_parse_error(&err)),
    };

    let ctx = AppContext::new(&cli);
    logging::init(ctx.log_level());

    if let Err(e) = run(&ctx) {
        let report = ErrorReport::from_error(&e);
        ctx.renderer().error(&report);
        std::process::exit(report.exit_code);
    }
}

fn run(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.output_mode()?;

    match &ctx.cli().command {
        Commands::Config(command) => match command {
            ConfigCommand::Get { key } => commands::config::handle_get(ctx, key),
            ConfigCommand::Set { key, value } => commands::config::handle_set(ctx, key, value),
            ConfigCommand::Path => commands::config::handle_path(ctx),
        },
        Commands::Auth(command) => match command {
            AuthCommand::Login(args) => auth::handle_login(ctx, args),
            AuthCommand::Status => auth::handle_status(ctx),
            AuthCommand::Logout => auth::handle_logout(ctx),
        },
        Commands::Entity(command) => match command {
            EntityCommand::Get { id } => entity::handle_get(ctx, id),
            EntityCommand::Statements { id } => entity::handle_statements(ctx, id),
        },
        Commands::Sparql(SparqlCommand::Query(args)) => sparql::handle_query(ctx, args),
        Commands::Action(ActionCommand::Search(args)) => action::handle_search(ctx, args),
        Commands::Raw(RawCommand::Request(args)) => raw::handle_request(ctx, args),
        Commands::Doctor => doctor::handle_doctor(ctx),
        Commands::Completion(args) => misc::handle_completions(args.shell),
    }
}

/// Report a clap failure and return the exit code.
///
/// `--help` and `--version` succeed. Anything else is `E_USAGE`, rendered
/// as an error envelope when `--json` appears on the command line.
fn report_parse_error(err: &clap::Error) -> i32 {
    if !err.use_stderr() {
        let _ = err.print();
        return exit_codes::SUCCESS;
    }

    let context = scan_argv(std::env::args_os().map(|a| a.to_string_lossy().into_owned()));
    if !context.json {
        let _ = err.print();
        return exit_codes::USAGE;
    }

    let renderer = Renderer {
        mode: OutputMode::Json,
        output: context.output,
        request_id: context.request_id,
        ui: UiContext::from_env(false),
    };
    let report = ErrorReport::from_clap(err);
    renderer.error(&report);
    report.exit_code
}

/// Output flags recovered from raw arguments.
#[derive(Debug, Default, PartialEq, Eq)]
struct ArgvContext {
    json: bool,
    output: Option<String>,
    request_id: Option<String>,
}

fn scan_argv(args: impl IntoIterator<Item = String>) -> ArgvContext {
    let mut context = ArgvContext::default();
    let mut args = args.into_iter().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--" => break,
            "--json" => context.json = true,
            "--output" | "-o" => context.output = args.next(),
            "--request-id" => context.request_id = args.next(),
            other => {
                if let Some(value) = other.strip_prefix("--output=") {
                    context.output = Some(value.to_string());
                } else if let Some(value) = other.strip_prefix("--request-id=") {
                    context.request_id = Some(value.to_string());
                }
            }
        }
    }

    context
}
