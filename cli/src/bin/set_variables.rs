//! Upload variables from a JSON file into a GitLab environment scope

use std::process::ExitCode;

use clap::Parser;

use ci_sync_cli::SetVariablesArgs;

/// Upload variables from a JSON file into a GitLab environment scope
#[derive(Parser)]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: SetVariablesArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    ci_sync_cli::init();
    let cli = Cli::parse();

    ci_sync_cli::exit_code(ci_sync_commands::set_variables::execute(cli.args.into()).await)
}
