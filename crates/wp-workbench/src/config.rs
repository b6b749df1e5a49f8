//! Workbench configuration from the environment.
//!
//! - `WP_EDITOR_ENDPOINT`: engine base URL (default `http://127.0.0.1:8080`)
//! - `WP_EDITOR_DOC_BASE`: document server base URL (defaults to the endpoint)
//! - `WP_EDITOR_TIMEOUT_SECS`: request timeout in seconds (default 30)

use std::time::Duration;

use crate::error::WorkbenchError;

pub const ENDPOINT_VAR: &str = "WP_EDITOR_ENDPOINT";
pub const DOC_BASE_VAR: &str = "WP_EDITOR_DOC_BASE";
pub const TIMEOUT_VAR: &str = "WP_EDITOR_TIMEOUT_SECS";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkbenchConfig {
    pub endpoint: String,
    pub doc_base: String,
    pub timeout: Duration,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            doc_base: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl WorkbenchConfig {
    pub fn from_env() -> Result<Self, WorkbenchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, WorkbenchError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = get(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = normalize_base(&endpoint, ENDPOINT_VAR)?;
        let doc_base = match get(DOC_BASE_VAR) {
            Some(base) => normalize_base(&base, DOC_BASE_VAR)?,
            None => endpoint.clone(),
        };
        let timeout = match get(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    WorkbenchError::Config(format!("{TIMEOUT_VAR} must be whole seconds, got {raw:?}"))
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            endpoint,
            doc_base,
            timeout,
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, WorkbenchError> {
        let follow = self.doc_base == self.endpoint;
        self.endpoint = normalize_base(endpoint, ENDPOINT_VAR)?;
        if follow {
            self.doc_base = self.endpoint.clone();
        }
        Ok(self)
    }
}

fn normalize_base(raw: &str, var: &str) -> Result<String, WorkbenchError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(WorkbenchError::Config(format!(
            "{var} must be an http(s) URL, got {raw:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = WorkbenchConfig::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config, WorkbenchConfig::default());
    }

    #[test]
    fn doc_base_follows_endpoint() {
        let config =
            WorkbenchConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "https://engine.local/ ")]))
                .expect("config");
        assert_eq!(config.endpoint, "https://engine.local");
        assert_eq!(config.doc_base, "https://engine.local");
    }

    #[test]
    fn explicit_values() {
        let config = WorkbenchConfig::from_lookup(lookup(&[
            (DOC_BASE_VAR, "http://docs:9000/"),
            (TIMEOUT_VAR, "5"),
        ]))
        .expect("config");
        assert_eq!(config.doc_base, "http://docs:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));

        let config = config.with_endpoint("http://other:1").expect("endpoint");
        assert_eq!(config.doc_base, "http://docs:9000");
    }

    #[test]
    fn bad_values() {
        assert!(matches!(
            WorkbenchConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])),
            Err(WorkbenchError::Config(_))
        ));
        assert!(matches!(
            WorkbenchConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "engine:8080")])),
            Err(WorkbenchError::Config(_))
        ));
    }
}
