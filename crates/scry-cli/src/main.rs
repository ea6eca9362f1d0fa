//! Scry console binary.
//!
//! Hosts the demo telemetry graph and wires it to the scry-core
//! evaluate / complete / render boundary, either interactively or for a
//! single chain.

use std::sync::Arc;

use clap::{Parser, Subcommand};

mod demo;
mod output;
mod repl;

#[derive(Parser)]
#[command(name = "scry")]
#[command(about = "Walk a live object graph from your terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console over the demo telemetry hub (the default)
    Repl,
    /// Evaluate one chain of tokens and exit
    Eval {
        /// Identifier and argument tokens, e.g. `sensor thermal readings`
        tokens: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (inspector, root, root_key, ctx) = demo::build()?;
    let inspector = Arc::new(inspector);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => repl::execute(inspector, root, root_key, ctx),
        Commands::Eval { tokens } => {
            if tokens.is_empty() {
                output::print_value(&inspector.render(&root));
                return Ok(());
            }
            let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
            output::report(&inspector, inspector.evaluate(&root, &tokens, &ctx));
            Ok(())
        }
    }
}
