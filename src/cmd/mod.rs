//! Subcommand dispatch and execution.
//!
//! [`dispatch`] routes the parsed CLI to its handler. Each handler lives
//! in its own submodule.

pub mod health;
pub mod init;
pub mod migrate;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::HawwaError;

pub async fn dispatch(cli: Cli) -> Result<(), HawwaError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        Some(Commands::Migrate(ref args)) => migrate::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  hawwa v{version}: booking, financial and HR platform backend\n\n  \
         No command provided. To get started:\n\n    \
         hawwa init                  Generate a starter settings file\n    \
         hawwa migrate               Apply pending schema migrations\n    \
         hawwa run                   Start the server (auto-detects ./hawwa.yaml)\n    \
         hawwa --help                See all commands and options\n"
    );
}
