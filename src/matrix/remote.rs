// src/matrix/remote.rs

//! Client for the remote build/publish service
//!
//! Each configuration becomes one job posted as JSON to `{service}/jobs`.
//! The service builds the package, runs the recipe's own validation on its
//! side and publishes the result to the upload repository.

use crate::error::{Error, Result};
use crate::recipe::BuildConfiguration;
use crate::reference::PackageReference;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::env::Credentials;

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum attempts for a job submission
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds
const RETRY_DELAY_MS: u64 = 1000;

/// A build/publish job for one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildJob {
    /// Reference the package is published under
    pub reference: PackageReference,
    pub package_id: String,
    pub configuration: BuildConfiguration,
    /// Build-time tools the service must provide
    pub build_requires: Vec<PackageReference>,
    /// Libraries the package links against
    pub requires: Vec<PackageReference>,
    /// Repository the package is uploaded to
    pub upload: String,
    /// Remotes requirements are fetched from, `url@verify_ssl@name`
    pub remotes: Vec<String>,
}

/// Job state as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

/// The service's answer to a job submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReceipt {
    pub id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A service that accepts build jobs
pub trait RemoteBuildService: Send + Sync {
    /// Submit one job
    ///
    /// A job the service reports as failed is a [`Error::RemoteJobFailure`].
    fn submit(&self, job: &BuildJob) -> Result<JobReceipt>;
}

/// HTTP build service client with retry support
pub struct HttpBuildService {
    client: Client,
    jobs_url: String,
    credentials: Option<Credentials>,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpBuildService {
    /// Create a client for the service at `service_url`
    pub fn new(service_url: &Url, credentials: Option<Credentials>) -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        let base = service_url.as_str();
        let jobs_url = if base.ends_with('/') {
            format!("{base}jobs")
        } else {
            format!("{base}/jobs")
        };

        Ok(Self {
            client,
            jobs_url,
            credentials,
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        })
    }

    /// Change the base delay between attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// URL jobs are posted to
    pub fn jobs_url(&self) -> &str {
        &self.jobs_url
    }
}

impl RemoteBuildService for HttpBuildService {
    fn submit(&self, job: &BuildJob) -> Result<JobReceipt> {
        info!("Submitting {} ({}) to {}", job.reference, job.configuration, self.jobs_url);

        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut request = self.client.post(&self.jobs_url).json(job);
            if let Some(creds) = &self.credentials {
                request = request.basic_auth(&creds.username, Some(&creds.password));
            }

            match request.send() {
                Ok(response) => {
                    if !response.status().is_success() {
                        return Err(Error::RemoteJobFailure(format!(
                            "HTTP {} from {}",
                            response.status(),
                            self.jobs_url
                        )));
                    }

                    let receipt: JobReceipt = response.json().map_err(|e| {
                        Error::RemoteJobFailure(format!("Failed to parse job receipt: {e}"))
                    })?;

                    if receipt.status == JobStatus::Failed {
                        return Err(Error::RemoteJobFailure(format!(
                            "Job {} failed: {}",
                            receipt.id,
                            receipt.message.as_deref().unwrap_or("no reason given")
                        )));
                    }

                    debug!("Job {} accepted with status {:?}", receipt.id, receipt.status);
                    return Ok(receipt);
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::RemoteJobFailure(format!(
                            "Failed to submit job after {attempt} attempts: {e}"
                        )));
                    }
                    warn!("Job submission attempt {} failed: {}, retrying...", attempt, e);
                    std::thread::sleep(self.retry_delay * attempt);
                }
            }
        }
    }
}
