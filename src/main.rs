// src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::CookOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Validate { config } => commands::cmd_validate(&config),
        Commands::Cook {
            config,
            source_dir,
            output_dir,
            build_dir,
            jobs,
            keep_builddir,
            cmake,
            tools_root,
            install_tools,
        } => {
            let opts = CookOptions {
                source_dir,
                output_dir,
                build_dir,
                jobs,
                keep_builddir,
                cmake,
                tools_root,
                install_tools,
            };
            commands::cmd_cook(&config, &opts)
        }
        Commands::Info { package_dir } => commands::cmd_info(&package_dir),
        Commands::Matrix {
            recipe,
            strategy,
            dry_run,
        } => commands::cmd_matrix(recipe.as_deref(), strategy, dry_run),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cook_overrides() {
        let cli = Cli::try_parse_from([
            "librw-recipe",
            "-v",
            "cook",
            "-o",
            "platform=gl3",
            "-s",
            "build_type=Debug",
            "--source-dir",
            "librw",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Cook { config, source_dir, .. } => {
                assert_eq!(config.options, vec!["platform=gl3"]);
                assert_eq!(config.settings, vec!["build_type=Debug"]);
                assert_eq!(source_dir, "librw");
            }
            _ => panic!("expected cook"),
        }
    }

    #[test]
    fn test_parse_matrix_strategy() {
        let cli = Cli::try_parse_from(["librw-recipe", "matrix", "--strategy", "common", "--dry-run"])
            .unwrap();
        match cli.command {
            Commands::Matrix { strategy, dry_run, .. } => {
                assert_eq!(strategy, librw_recipe::MatrixStrategy::CommonBuilds);
                assert!(dry_run);
            }
            _ => panic!("expected matrix"),
        }
    }
}
