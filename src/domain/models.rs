use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::constants::DEFAULT_API_TIMEOUT_MS;

/// Ordered severity scale; the discriminant is the numeric level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    NotSet = 0,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl Severity {
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
            Severity::NotSet => "NOTSET",
        }
    }

    /// Anything above INFO counts as a problem in command summaries.
    pub fn is_problem(self) -> bool {
        self > Severity::Info
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A reported problem. Collected as data and logged once the operation is done.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Drop repeated issues, keeping the first occurrence of each.
pub fn unique_issues(issues: Vec<Issue>) -> Vec<Issue> {
    let mut seen = std::collections::HashSet::new();
    issues
        .into_iter()
        .filter(|i| seen.insert(i.clone()))
        .collect()
}

/// Global flags resolved once in `main` and handed to every command.
#[derive(Clone, Copy, Debug)]
pub struct RunConfig {
    pub quiet: bool,
    pub verbosity: u8,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            verbosity: Severity::Warning.level(),
        }
    }
}

/// License details fetched for one license key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LicenseInfo {
    pub key: String,
    pub name: String,
    pub text: String,
    pub url: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    /// ABOUT field name -> inventory column name.
    #[serde(default)]
    pub mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub license_api: LicenseApiSettings,
}

#[derive(Debug, Deserialize)]
pub struct LicenseApiSettings {
    #[serde(default = "default_api_timeout")]
    pub timeout_ms: u64,
}

impl Default for LicenseApiSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_API_TIMEOUT_MS,
        }
    }
}

fn default_api_timeout() -> u64 {
    DEFAULT_API_TIMEOUT_MS
}
