//! Delete every pipeline of a GitLab project, one at a time

use std::process::ExitCode;

use clap::Parser;

use ci_sync_cli::RemovePipelinesArgs;

/// Delete every pipeline of a GitLab project
#[derive(Parser)]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: RemovePipelinesArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    ci_sync_cli::init();
    let cli = Cli::parse();

    ci_sync_cli::exit_code(ci_sync_commands::remove_pipelines::execute(cli.args.into()).await)
}
