use crate::about::About;
use crate::domain::constants::{AUTH_DENIED_MSG, UNSUPPORTED_EXPRESSION_CHARS};
use crate::domain::models::{Issue, LicenseInfo};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum LicenseApiError {
    #[error("{}", AUTH_DENIED_MSG)]
    Unauthorized,
    #[error("License key '{0}' is not found in the license library.")]
    NotFound(String),
    #[error("URL not reachable. Invalid '--api_url': {0}. License generation is skipped.")]
    BadUrl(String),
    #[error("License request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Anything that can resolve a license key to its details.
pub trait LicenseSource {
    fn fetch(&self, key: &str) -> Result<LicenseInfo, LicenseApiError>;
}

/// Blocking client for a DejaCode-style license library API.
pub struct LicenseApi {
    client: reqwest::blocking::Client,
    api_url: String,
    api_key: String,
    urn_base: String,
}

impl LicenseApi {
    pub fn new(api_url: &str, api_key: &str, timeout_ms: u64) -> Result<Self, LicenseApiError> {
        let parsed =
            reqwest::Url::parse(api_url).map_err(|_| LicenseApiError::BadUrl(api_url.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| LicenseApiError::BadUrl(api_url.to_string()))?;
        let domain = match parsed.port() {
            Some(port) => format!("{}://{}:{}/", parsed.scheme(), host, port),
            None => format!("{}://{}/", parsed.scheme(), host),
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(format!("about-code/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            urn_base: format!("{}urn/?urn=urn:dje:license:", domain),
        })
    }

    pub fn license_url(&self, key: &str) -> String {
        format!("{}{}", self.urn_base, key)
    }
}

impl LicenseSource for LicenseApi {
    fn fetch(&self, key: &str) -> Result<LicenseInfo, LicenseApiError> {
        let resp = self
            .client
            .get(format!("{}/", self.api_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("key", key),
                ("format", "json"),
            ])
            .header("Authorization", format!("Token {}", self.api_key))
            .send()?;
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(LicenseApiError::Unauthorized);
        }
        let body: serde_json::Value = resp.error_for_status()?.json()?;
        let Some(result) = body
            .get("results")
            .and_then(|r| r.as_array())
            .and_then(|r| r.first())
        else {
            return Err(LicenseApiError::NotFound(key.to_string()));
        };
        let text_of = |field: &str| {
            result
                .get(field)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        let found_key = text_of("key");
        if found_key.is_empty() {
            return Err(LicenseApiError::NotFound(key.to_string()));
        }
        Ok(LicenseInfo {
            url: self.license_url(&found_key),
            key: found_key,
            name: text_of("name"),
            text: text_of("full_text"),
        })
    }
}

/// Characters a license expression may not contain, in table order.
pub fn special_chars_in_expression(expression: &str) -> Vec<char> {
    UNSUPPORTED_EXPRESSION_CHARS
        .iter()
        .copied()
        .filter(|c| expression.contains(*c))
        .collect()
}

/// Split a license expression into its unique license keys. Returns the
/// offending characters instead when the expression cannot be parsed.
pub fn parse_license_expression(expression: &str) -> (Vec<char>, Vec<String>) {
    let special = special_chars_in_expression(expression);
    if !special.is_empty() {
        return (special, vec![]);
    }
    let mut keys: Vec<String> = Vec::new();
    for token in expression
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|t| !t.is_empty())
    {
        let lower = token.to_ascii_lowercase();
        if matches!(lower.as_str(), "and" | "or" | "with") {
            continue;
        }
        if !keys.contains(&lower) {
            keys.push(lower);
        }
    }
    (vec![], keys)
}

/// Fetch every license key referenced by the abouts' `license_expression`
/// once. Stops asking after an authorization failure.
pub fn fetch_license_texts(
    abouts: &[About],
    source: &dyn LicenseSource,
) -> (BTreeMap<String, LicenseInfo>, Vec<Issue>) {
    let mut found = BTreeMap::new();
    let mut attempted: Vec<String> = Vec::new();
    let mut issues = Vec::new();

    'abouts: for about in abouts {
        let Some(expression) = about.get("license_expression") else {
            continue;
        };
        let (special, keys) = parse_license_expression(expression);
        if !special.is_empty() {
            let shown: Vec<String> = special.iter().map(char::to_string).collect();
            issues.push(Issue::error(format!(
                "The following character(s) cannot be in the license_expression: {}",
                shown.join(", ")
            )));
            continue;
        }
        for key in keys {
            if attempted.contains(&key) {
                continue;
            }
            attempted.push(key.clone());
            match source.fetch(&key) {
                Ok(info) => {
                    tracing::debug!(key = %info.key, "license fetched");
                    found.insert(key, info);
                }
                Err(LicenseApiError::Unauthorized) => {
                    issues.push(Issue::error(AUTH_DENIED_MSG));
                    break 'abouts;
                }
                Err(e) => {
                    let issue = Issue::error(e.to_string());
                    if !issues.contains(&issue) {
                        issues.push(issue);
                    }
                }
            }
        }
    }
    (found, issues)
}
