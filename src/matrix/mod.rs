// src/matrix/mod.rs

//! Build-matrix orchestrator
//!
//! Expands build configurations for one platform family and submits each
//! as an independent job to the remote build service. Configuration comes
//! from an injected [`MatrixEnv`], never from the ambient environment.
//!
//! Checks run cheapest first: the platform family is required before any
//! configuration is built, and every configuration is validated locally
//! before anything is sent over the network.

mod defaults;
pub mod env;
mod remote;

pub use defaults::{COMMON_TARGETS, CompilerTarget, common_builds};
pub use env::{Credentials, MatrixEnv, Remote};
pub use remote::{BuildJob, HttpBuildService, JobReceipt, JobStatus, RemoteBuildService};

use crate::error::{Error, Result};
use crate::recipe::{BuildConfiguration, Platform, Recipe, RecipeOptions, RequirementSet, validate};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How the matrix is expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixStrategy {
    /// One configuration from host settings
    #[default]
    Single,
    /// The default compatibility matrix, with the platform overwritten
    CommonBuilds,
}

impl MatrixStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatrixStrategy::Single => "single",
            MatrixStrategy::CommonBuilds => "common",
        }
    }
}

impl FromStr for MatrixStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(MatrixStrategy::Single),
            "common" | "common-builds" => Ok(MatrixStrategy::CommonBuilds),
            _ => Err(Error::ConfigurationError(format!(
                "Unknown matrix strategy '{}' (expected single or common)",
                s
            ))),
        }
    }
}

impl fmt::Display for MatrixStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expand the configurations of a strategy for a platform family
///
/// `base` supplies the non-platform options. With
/// [`MatrixStrategy::CommonBuilds`] cells the platform cannot be built on
/// are dropped; a single configuration is returned as is and rejected at
/// submission if invalid.
pub fn build_matrix(
    strategy: MatrixStrategy,
    platform: Platform,
    base: RecipeOptions,
) -> Vec<BuildConfiguration> {
    let base = RecipeOptions { platform, ..base };

    match strategy {
        MatrixStrategy::Single => {
            let mut config = BuildConfiguration::host(platform);
            config.options = base;
            vec![config]
        }
        MatrixStrategy::CommonBuilds => {
            let (valid, dropped): (Vec<_>, Vec<_>) = common_builds(base)
                .into_iter()
                .partition(|config| validate(config).is_ok());
            if !dropped.is_empty() {
                info!(
                    "Dropped {} configuration(s) that cannot build platform {}",
                    dropped.len(),
                    platform
                );
            }
            valid
        }
    }
}

/// Outcome of one configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Accepted by the service
    Submitted { job_id: String, status: JobStatus },
    /// Failed local validation; nothing was sent
    Rejected { reason: String },
    /// The service reported failure or could not be reached
    Failed { reason: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Submitted { .. })
    }
}

/// Result of submitting one configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    pub configuration: BuildConfiguration,
    pub package_id: String,
    pub outcome: JobOutcome,
}

/// Aggregate success: every job succeeded
pub fn all_succeeded(results: &[JobResult]) -> bool {
    results.iter().all(|r| r.outcome.is_success())
}

/// Submits build matrices to a remote build service
pub struct Orchestrator {
    env: MatrixEnv,
    recipe: Recipe,
    service: Arc<dyn RemoteBuildService>,
}

impl Orchestrator {
    /// Create an orchestrator for a recipe
    pub fn new(env: MatrixEnv, recipe: Recipe, service: Arc<dyn RemoteBuildService>) -> Self {
        Self {
            env,
            recipe,
            service,
        }
    }

    /// Create an orchestrator that talks HTTP to the configured service
    pub fn connect(env: MatrixEnv, recipe: Recipe) -> Result<Self> {
        let (service_url, _) = env.submission_target()?;
        let service = HttpBuildService::new(service_url, env.credentials.clone())?;
        Ok(Self::new(env, recipe, Arc::new(service)))
    }

    /// Expand the matrix for the configured platform family
    pub fn build_matrix(&self, strategy: MatrixStrategy) -> Vec<BuildConfiguration> {
        let configs = build_matrix(strategy, self.env.platform, self.recipe.options);
        debug!(
            "Strategy {} produced {} configuration(s) for platform {}",
            strategy,
            configs.len(),
            self.env.platform
        );
        configs
    }

    /// Job for one configuration
    pub fn job_for(&self, config: &BuildConfiguration, upload: &str) -> BuildJob {
        let requirements = RequirementSet::for_platform(config.platform());
        BuildJob {
            reference: self.recipe.reference(&self.env.user, &self.env.channel),
            package_id: config.package_id(),
            configuration: config.clone(),
            build_requires: requirements.tools,
            requires: requirements.libraries,
            upload: upload.to_string(),
            remotes: self.env.remotes.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Submit every configuration as an independent job
    ///
    /// Only missing service configuration fails the call as a whole; a
    /// failing configuration is recorded in its result and the remaining
    /// ones are still submitted.
    pub fn submit(&self, configs: &[BuildConfiguration]) -> Result<Vec<JobResult>> {
        let (_, upload) = self.env.submission_target()?;
        let upload = upload.as_str();

        let mut results = Vec::with_capacity(configs.len());
        for config in configs {
            let outcome = match validate(config) {
                Err(e) => {
                    warn!("Rejected {}: {}", config, e);
                    JobOutcome::Rejected {
                        reason: e.to_string(),
                    }
                }
                Ok(()) => match self.service.submit(&self.job_for(config, upload)) {
                    Ok(receipt) => JobOutcome::Submitted {
                        job_id: receipt.id,
                        status: receipt.status,
                    },
                    Err(e) => {
                        warn!("Job for {} failed: {}", config, e);
                        JobOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                },
            };

            results.push(JobResult {
                configuration: config.clone(),
                package_id: config.package_id(),
                outcome,
            });
        }

        let succeeded = results.iter().filter(|r| r.outcome.is_success()).count();
        info!("{} of {} job(s) submitted", succeeded, results.len());
        Ok(results)
    }

    /// Expand and submit in one step
    pub fn run(&self, strategy: MatrixStrategy) -> Result<Vec<JobResult>> {
        let configs = self.build_matrix(strategy);
        self.submit(&configs)
    }
}
