use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use wiki_core::adapters::SparqlFormat;
use wiki_core::VERSION;

/// wiki - query Wikidata entities, SPARQL and search from the command line
#[derive(Parser, Debug)]
#[command(name = "wiki")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted before or after any subcommand
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output stable plain text
    #[arg(long, global = true)]
    pub plain: bool,

    /// Write output to file (use - for stdout)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<String>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log each request attempt
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log everything, including retry delays
    #[arg(long, global = true)]
    pub debug: bool,

    /// Disable prompts
    #[arg(long, global = true)]
    pub no_input: bool,

    /// Allow network access
    #[arg(long, global = true)]
    pub network: bool,

    /// Use stored token for Authorization
    #[arg(long, global = true)]
    pub auth: bool,

    /// Disable color output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Attach a request id to JSON output
    #[arg(long, global = true, value_name = "ID")]
    pub request_id: Option<String>,

    /// Print request preview and exit
    #[arg(long, global = true)]
    pub print_request: bool,

    /// Read passphrase from file
    #[arg(long, global = true, value_name = "FILE")]
    pub passphrase_file: Option<PathBuf>,

    /// Read passphrase from stdin
    #[arg(long, global = true)]
    pub passphrase_stdin: bool,

    /// Read passphrase from env var (name)
    #[arg(long, global = true, value_name = "NAME")]
    pub passphrase_env: Option<String>,

    /// User-Agent string for Wikimedia APIs
    #[arg(long, global = true, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Wikidata REST API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Wikidata Action API URL
    #[arg(long, global = true, value_name = "URL")]
    pub action_url: Option<String>,

    /// Wikidata SPARQL endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    pub sparql_url: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long, global = true, value_name = "MS", allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Retries after the first attempt
    #[arg(long, global = true, value_name = "N", allow_negative_numbers = true)]
    pub retries: Option<i64>,

    /// Base backoff delay in milliseconds
    #[arg(long, global = true, value_name = "MS", allow_negative_numbers = true)]
    pub retry_backoff: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Manage the locally stored token
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Read Wikidata entities
    #[command(subcommand)]
    Entity(EntityCommand),

    /// Run SPARQL queries
    #[command(subcommand)]
    Sparql(SparqlCommand),

    /// Call the Action API
    #[command(subcommand)]
    Action(ActionCommand),

    /// Make raw REST API requests
    #[command(subcommand)]
    Raw(RawCommand),

    /// Check configuration
    Doctor,

    /// Generate shell completion script
    Completion(CompletionArgs),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Get a config value
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Set a config value (use "none" to unset)
    Set {
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },

    /// Show config file path
    Path,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Store an OAuth token in encrypted config
    Login(LoginArgs),

    /// Check whether an encrypted token exists
    Status,

    /// Remove stored token
    Logout,
}

#[derive(Args, Debug, Default, Clone)]
pub struct LoginArgs {
    /// Read token from file
    #[arg(long, value_name = "FILE")]
    pub token_file: Option<PathBuf>,

    /// Read token from stdin
    #[arg(long)]
    pub token_stdin: bool,

    /// Read token from env var (name)
    #[arg(long, value_name = "NAME")]
    pub token_env: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum EntityCommand {
    /// Fetch an entity by id (Q/P/L)
    Get {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Fetch entity statements
    Statements {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SparqlCommand {
    /// Run a SPARQL query
    Query(SparqlQueryArgs),
}

#[derive(Args, Debug)]
pub struct SparqlQueryArgs {
    /// SPARQL query string
    #[arg(long)]
    pub query: Option<String>,

    /// SPARQL query file
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Result format
    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Csv,
    Tsv,
}

impl From<FormatArg> for SparqlFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => SparqlFormat::Json,
            FormatArg::Csv => SparqlFormat::Csv,
            FormatArg::Tsv => SparqlFormat::Tsv,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ActionCommand {
    /// Search entities via Action API
    Search(SearchArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search text
    #[arg(long)]
    pub query: String,

    /// Language code
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Maximum number of results
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub limit: i64,
}

#[derive(Subcommand, Debug)]
pub enum RawCommand {
    /// Make a raw REST API request
    Request(RawRequestArgs),
}

#[derive(Args, Debug)]
pub struct RawRequestArgs {
    /// HTTP method
    #[arg(value_name = "METHOD")]
    pub method: String,

    /// Path relative to the REST API base, starting with /
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Read JSON request body from file
    #[arg(long, value_name = "FILE")]
    pub body_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "wiki", "entity", "get", "Q42", "--json", "--network", "--timeout", "500",
        ])
        .unwrap();
        assert!(cli.global.json);
        assert!(cli.global.network);
        assert_eq!(cli.global.timeout, Some(500));
        assert!(matches!(
            cli.command,
            Commands::Entity(EntityCommand::Get { ref id }) if id == "Q42"
        ));
    }

    #[test]
    fn test_sparql_format_values() {
        let cli =
            Cli::try_parse_from(["wiki", "sparql", "query", "--query", "ASK {}", "--format", "csv"])
                .unwrap();
        match cli.command {
            Commands::Sparql(SparqlCommand::Query(args)) => {
                assert_eq!(SparqlFormat::from(args.format), SparqlFormat::Csv)
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["wiki", "sparql", "query", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_search_defaults() {
        let cli = Cli::try_parse_from(["wiki", "action", "search", "--query", "Douglas"]).unwrap();
        match cli.command {
            Commands::Action(ActionCommand::Search(args)) => {
                assert_eq!(args.language, "en");
                assert_eq!(args.limit, 5);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
