//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`resolve`], [`serve`], or [`health`]. Each handler
//! lives in its own submodule.

pub mod health;
pub mod resolve;
pub mod serve;

use crate::cli::{Cli, Commands};
use crate::error::ActualUrlError;

pub async fn dispatch(cli: Cli) -> Result<(), ActualUrlError> {
    match cli.command {
        Some(Commands::Resolve(ref args)) => resolve::execute(args),
        Some(Commands::Serve(args)) => serve::execute(args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  actual-url v{version} \u{2014} reconstruct the URL a client requested\n\n  \
         No command provided. To get started:\n\n    \
         actual-url resolve request.json     Resolve a saved request description\n    \
         actual-url serve                    Echo resolved URLs on port 3000\n    \
         actual-url --help                   See all commands and options\n"
    );
}
