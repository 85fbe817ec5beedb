// src/cli/mod.rs
//! CLI definitions for librw-recipe
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `validate` - Check a configuration and show its requirements
//! - `cook` - Build and package one configuration locally
//! - `info` - Show the metadata of a built package
//! - `matrix` - Expand and submit the build matrix

use clap::{Args, Parser, Subcommand};
use librw_recipe::MatrixStrategy;

#[derive(Parser)]
#[command(name = "librw-recipe")]
#[command(author = "librw Contributors")]
#[command(version)]
#[command(about = "Package recipe and build-matrix driver for librw", long_about = None)]
pub struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Recipe and configuration selection shared by several commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Recipe file (default: the built-in librw recipe)
    #[arg(short, long)]
    pub recipe: Option<String>,

    /// Setting override, e.g. `os=Windows` or `compiler.version=16` (repeatable)
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Option override, e.g. `platform=gl3` or `shared=True` (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a configuration and show its requirement set
    Validate {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Build and package a configuration from a librw source tree
    Cook {
        #[command(flatten)]
        config: ConfigArgs,

        /// librw source directory
        #[arg(long, default_value = ".")]
        source_dir: String,

        /// Output directory for packages
        #[arg(long, default_value = "packages")]
        output_dir: String,

        /// Build directory (default: a temporary directory)
        #[arg(long)]
        build_dir: Option<String>,

        /// Number of parallel build jobs (default: auto)
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Keep the temporary build directory after completion
        #[arg(long)]
        keep_builddir: bool,

        /// Path to the cmake executable (default: found on PATH)
        #[arg(long)]
        cmake: Option<String>,

        /// Directory holding build tool requirements
        #[arg(long)]
        tools_root: Option<String>,

        /// Try to install missing build tool requirements
        #[arg(long)]
        install_tools: bool,
    },

    /// Show the metadata a built package exports
    Info {
        /// Package directory (`<output>/<name>/<version>/<package_id>`)
        package_dir: String,
    },

    /// Expand the build matrix and submit it to the build service
    ///
    /// Reads LIBRW_PLATFORM, RECIPE_BUILD_SERVICE, RECIPE_UPLOAD,
    /// RECIPE_LOGIN_USERNAME, RECIPE_PASSWORD, RECIPE_REMOTES,
    /// RECIPE_USERNAME and RECIPE_CHANNEL from the environment.
    Matrix {
        /// Recipe file (default: the built-in librw recipe)
        #[arg(short, long)]
        recipe: Option<String>,

        /// Expansion strategy: single or common
        #[arg(long, default_value = "single")]
        strategy: MatrixStrategy,

        /// Print the matrix without submitting anything
        #[arg(long)]
        dry_run: bool,
    },
}
