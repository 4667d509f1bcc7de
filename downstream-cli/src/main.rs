//! trigger-downstream-sync: notify repositories generated from a template.
//!
//! Runs as a CI step on the template repository. Every option falls back to
//! the environment the CI runner provides.
//!
//! # Usage
//!
//! ```text
//! GITHUB_REPOSITORY=owner/template GITHUB_TOKEN=... trigger-downstream-sync
//! trigger-downstream-sync --repository owner/template [--dry-run]
//! trigger-downstream-sync --topic crs-sandbox [--fail-on-dispatch-error]
//! ```

mod commands;

use anyhow::Result;
use clap::Parser;

use commands::trigger::TriggerArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "trigger-downstream-sync",
    version,
    about = "Send a template-sync dispatch event to every repository derived from a template",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    trigger: TriggerArgs,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    cli.trigger.run()
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
