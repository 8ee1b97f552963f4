//! Delete every GitLab CI/CD variable scoped to one environment

use std::process::ExitCode;

use clap::Parser;

use ci_sync_cli::RemoveEnvVariablesArgs;

/// Delete every GitLab CI/CD variable scoped to one environment
#[derive(Parser)]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: RemoveEnvVariablesArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    ci_sync_cli::init();
    let cli = Cli::parse();

    ci_sync_cli::exit_code(ci_sync_commands::remove_env_variables::execute(cli.args.into()).await)
}
