// src/commands/matrix.rs

//! Matrix command - expand and submit the build matrix

use super::load_recipe;
use anyhow::{Context, Result, bail};
use librw_recipe::matrix::{all_succeeded, build_matrix};
use librw_recipe::{JobOutcome, MatrixEnv, MatrixStrategy, Orchestrator};

/// Expand the matrix for the environment's platform family and submit it
pub fn cmd_matrix(recipe_path: Option<&str>, strategy: MatrixStrategy, dry_run: bool) -> Result<()> {
    let env = MatrixEnv::from_env().context("Failed to read build matrix configuration")?;
    let recipe = load_recipe(recipe_path)?;

    println!(
        "Platform: {} (strategy: {})",
        env.platform, strategy
    );

    if dry_run {
        let configs = build_matrix(strategy, env.platform, recipe.options);
        println!("Would submit {} configuration(s):", configs.len());
        for config in &configs {
            println!("  {}  {}", &config.package_id()[..12], config);
        }
        println!("[DRY RUN] Nothing submitted");
        return Ok(());
    }

    let orchestrator =
        Orchestrator::connect(env, recipe).context("Failed to connect to the build service")?;
    let results = orchestrator
        .run(strategy)
        .context("Failed to submit build matrix")?;

    for result in &results {
        match &result.outcome {
            JobOutcome::Submitted { job_id, status } => {
                println!("[OK] {} -> job {} ({:?})", result.configuration, job_id, status);
            }
            JobOutcome::Rejected { reason } => {
                println!("[REJECTED] {}: {}", result.configuration, reason);
            }
            JobOutcome::Failed { reason } => {
                println!("[FAILED] {}: {}", result.configuration, reason);
            }
        }
    }

    if !all_succeeded(&results) {
        let failed = results.iter().filter(|r| !r.outcome.is_success()).count();
        bail!("{} of {} job(s) did not succeed", failed, results.len());
    }

    println!("[COMPLETE] {} job(s) submitted", results.len());
    Ok(())
}
