use std::path::PathBuf;

use clap::Parser;
use learning_dashboard::cli::commands::{AggregateSource, cmd_aggregate, cmd_render};
use learning_dashboard::cli::config::{
    Cli, Commands, DEFAULT_CONFIG_FILE, PathOverrides, load_config, resolve_paths,
};
use learning_dashboard::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let root = match cli.root.as_deref() {
        Some(root) => PathBuf::from(root),
        None => std::env::current_dir()?,
    };
    let config_path = root.join(cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE));
    let config = load_config(&config_path);

    match cli.command {
        None => {
            let paths = resolve_paths(&root, &config, &PathOverrides::default());
            cmd_render(&paths, cli.verbose)?;
        }
        Some(Commands::Render {
            results,
            summary,
            output,
        }) => {
            let overrides = PathOverrides {
                results: results.as_deref(),
                summary: summary.as_deref(),
                dashboard: output.as_deref(),
            };
            let paths = resolve_paths(&root, &config, &overrides);
            cmd_render(&paths, cli.verbose)?;
        }
        Some(Commands::Aggregate {
            events,
            from_results,
            output,
        }) => {
            let overrides = PathOverrides {
                summary: output.as_deref(),
                ..PathOverrides::default()
            };
            let paths = resolve_paths(&root, &config, &overrides);

            let events = events.map(|p| root.join(p));
            let from_results = from_results.map(|p| root.join(p));
            let source = match (&events, &from_results) {
                (Some(path), _) => AggregateSource::Events(path),
                (None, Some(path)) => AggregateSource::Results(path),
                (None, None) => return Err("aggregate needs --events or --from-results".into()),
            };
            cmd_aggregate(source, &paths.summary, cli.verbose)?;
        }
    }

    Ok(())
}
