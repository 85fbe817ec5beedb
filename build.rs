// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe file
fn recipe_arg() -> Arg {
    Arg::new("recipe")
        .short('r')
        .long("recipe")
        .value_name("PATH")
        .help("Recipe file (default: the built-in librw recipe)")
}

/// Common argument: setting overrides
fn setting_arg() -> Arg {
    Arg::new("setting")
        .short('s')
        .long("setting")
        .value_name("KEY=VALUE")
        .action(ArgAction::Append)
        .help("Setting override, e.g. os=Windows (repeatable)")
}

/// Common argument: option overrides
fn option_arg() -> Arg {
    Arg::new("option")
        .short('o')
        .long("option")
        .value_name("KEY=VALUE")
        .action(ArgAction::Append)
        .help("Option override, e.g. platform=gl3 (repeatable)")
}

fn build_cli() -> Command {
    Command::new("librw-recipe")
        .version(env!("CARGO_PKG_VERSION"))
        .author("librw Contributors")
        .about("Package recipe and build-matrix driver for librw")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output (RUST_LOG takes precedence)"),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a configuration and show its requirement set")
                .arg(recipe_arg())
                .arg(setting_arg())
                .arg(option_arg()),
        )
        .subcommand(
            Command::new("cook")
                .about("Build and package a configuration from a librw source tree")
                .arg(recipe_arg())
                .arg(setting_arg())
                .arg(option_arg())
                .arg(
                    Arg::new("source_dir")
                        .long("source-dir")
                        .default_value(".")
                        .help("librw source directory"),
                )
                .arg(
                    Arg::new("output_dir")
                        .long("output-dir")
                        .default_value("packages")
                        .help("Output directory for packages"),
                )
                .arg(Arg::new("build_dir").long("build-dir").help("Build directory"))
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help("Number of parallel build jobs"),
                )
                .arg(
                    Arg::new("keep_builddir")
                        .long("keep-builddir")
                        .action(ArgAction::SetTrue)
                        .help("Keep the temporary build directory after completion"),
                )
                .arg(Arg::new("cmake").long("cmake").help("Path to the cmake executable"))
                .arg(
                    Arg::new("tools_root")
                        .long("tools-root")
                        .help("Directory holding build tool requirements"),
                )
                .arg(
                    Arg::new("install_tools")
                        .long("install-tools")
                        .action(ArgAction::SetTrue)
                        .help("Try to install missing build tool requirements"),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Show the metadata a built package exports")
                .arg(Arg::new("package_dir").required(true).help("Package directory")),
        )
        .subcommand(
            Command::new("matrix")
                .about("Expand the build matrix and submit it to the build service")
                .arg(recipe_arg())
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .value_parser(["single", "common"])
                        .default_value("single")
                        .help("Expansion strategy"),
                )
                .arg(
                    Arg::new("dry_run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Print the matrix without submitting anything"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("librw-recipe.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
