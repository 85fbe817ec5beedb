// src/matrix/env.rs

//! Process-wide configuration for the build matrix
//!
//! Read once at startup and handed to the orchestrator. Tests build it from
//! a map instead of the process environment.

use crate::error::{Error, Result};
use crate::recipe::Platform;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Required platform family
pub const PLATFORM_VAR: &str = "LIBRW_PLATFORM";

/// Lowercase spelling of [`PLATFORM_VAR`], accepted as a fallback
pub const PLATFORM_VAR_LOWER: &str = "librw_platform";

/// Remote build service endpoint
pub const SERVICE_VAR: &str = "RECIPE_BUILD_SERVICE";

/// Package repository jobs publish to
pub const UPLOAD_VAR: &str = "RECIPE_UPLOAD";

pub const LOGIN_USERNAME_VAR: &str = "RECIPE_LOGIN_USERNAME";
pub const PASSWORD_VAR: &str = "RECIPE_PASSWORD";

/// Comma-separated `url@verify_ssl@name` remotes
pub const REMOTES_VAR: &str = "RECIPE_REMOTES";

pub const USERNAME_VAR: &str = "RECIPE_USERNAME";
pub const CHANNEL_VAR: &str = "RECIPE_CHANNEL";

/// Remotes used when none are configured
pub const DEFAULT_REMOTES: &str =
    "https://api.bintray.com/conan/bincrafters/public-conan@True@bincrafters";

pub const DEFAULT_USER: &str = "rwengine";
pub const DEFAULT_CHANNEL: &str = "testing";

/// A package remote that library requirements are fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub url: Url,
    pub verify_ssl: bool,
    pub name: String,
}

impl FromStr for Remote {
    type Err = Error;

    /// Parse `url@verify_ssl@name`; `verify_ssl` and `name` may be omitted
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('@');
        let raw_url = parts.next().unwrap_or_default();
        let url = parse_url(REMOTES_VAR, raw_url)?;

        let verify_ssl = match parts.next() {
            None => true,
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(Error::ConfigurationError(format!(
                        "Invalid verify_ssl value '{}' in remote '{}'",
                        other, s
                    )));
                }
            },
        };

        let name = match parts.next() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => url.host_str().unwrap_or("remote").to_string(),
        };

        if parts.next().is_some() {
            return Err(Error::ConfigurationError(format!(
                "Too many '@' separated fields in remote '{}'",
                s
            )));
        }

        Ok(Self {
            url,
            verify_ssl,
            name,
        })
    }
}

impl fmt::Display for Remote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verify = if self.verify_ssl { "True" } else { "False" };
        write!(f, "{}@{}@{}", self.url, verify, self.name)
    }
}

/// Login for the remote build service and package repository
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Configuration the orchestrator is constructed with
#[derive(Debug, Clone)]
pub struct MatrixEnv {
    /// Platform family every configuration is built for
    pub platform: Platform,
    pub service_url: Option<Url>,
    pub upload_url: Option<Url>,
    pub credentials: Option<Credentials>,
    pub remotes: Vec<Remote>,
    pub user: String,
    pub channel: String,
}

impl MatrixEnv {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through a lookup function
    ///
    /// A missing platform family is an error; nothing else is required
    /// until jobs are submitted.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let platform = get(PLATFORM_VAR)
            .or_else(|| get(PLATFORM_VAR_LOWER))
            .ok_or_else(|| {
                Error::ConfigurationError(format!("Need {} environment variable", PLATFORM_VAR))
            })?
            .parse::<Platform>()?;

        let service_url = get(SERVICE_VAR)
            .map(|v| parse_url(SERVICE_VAR, &v))
            .transpose()?;
        let upload_url = get(UPLOAD_VAR)
            .map(|v| parse_url(UPLOAD_VAR, &v))
            .transpose()?;

        let credentials = match (get(LOGIN_USERNAME_VAR), get(PASSWORD_VAR)) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (None, None) => None,
            _ => {
                return Err(Error::ConfigurationError(format!(
                    "{} and {} must be set together",
                    LOGIN_USERNAME_VAR, PASSWORD_VAR
                )));
            }
        };

        let remotes = get(REMOTES_VAR)
            .unwrap_or_else(|| DEFAULT_REMOTES.to_string())
            .split(',')
            .filter(|r| !r.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Remote>>>()?;

        Ok(Self {
            platform,
            service_url,
            upload_url,
            credentials,
            remotes,
            user: get(USERNAME_VAR).unwrap_or_else(|| DEFAULT_USER.to_string()),
            channel: get(CHANNEL_VAR).unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
        })
    }

    /// Service and repository locations, required before submitting
    pub fn submission_target(&self) -> Result<(&Url, &Url)> {
        let service = self.service_url.as_ref().ok_or_else(|| {
            Error::ConfigurationError(format!("Need {} environment variable", SERVICE_VAR))
        })?;
        let upload = self.upload_url.as_ref().ok_or_else(|| {
            Error::ConfigurationError(format!("Need {} environment variable", UPLOAD_VAR))
        })?;
        Ok((service, upload))
    }
}

fn parse_url(var: &str, value: &str) -> Result<Url> {
    Url::parse(value)
        .map_err(|e| Error::ConfigurationError(format!("Invalid URL '{}' in {}: {}", value, var, e)))
}
