use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::Cli;
use crate::constants::TOOL_NAME;

pub fn handle_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, TOOL_NAME, &mut std::io::stdout());
    Ok(())
}
