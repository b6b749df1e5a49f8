//! Where documents come from.

use std::future::Future;

use crate::error::DocError;

/// Path of the help-center index, relative to the document root.
pub const INDEX_PATH: &str = "SUMMARY.md";

/// Fetches raw markdown by path relative to the document root.
pub trait DocSource {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, DocError>>;

    /// Fetch the index document.
    fn fetch_index(&self) -> impl Future<Output = Result<String, DocError>> {
        self.fetch(INDEX_PATH)
    }
}

/// Static document endpoint served at `{base}/doc/{path}`.
#[derive(Clone, Debug)]
pub struct HttpDocSource {
    base: String,
    client: reqwest::Client,
}

impl HttpDocSource {
    pub fn new(base: impl Into<String>) -> Result<Self, DocError> {
        Self::with_client(base, reqwest::Client::new())
    }

    pub fn with_client(base: impl Into<String>, client: reqwest::Client) -> Result<Self, DocError> {
        let base = base.into();
        let trimmed = base.trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(DocError::InvalidBase(base));
        }
        Ok(Self {
            base: trimmed.to_string(),
            client,
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/doc/{}", self.base, path.trim_start_matches('/'))
    }
}

impl DocSource for HttpDocSource {
    async fn fetch(&self, path: &str) -> Result<String, DocError> {
        let url = self.url_for(path);
        tracing::debug!(target: "wp_docs::source", %url, "fetching document");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DocError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls() {
        let source = HttpDocSource::new("http://localhost:8080/").expect("source");
        assert_eq!(
            source.url_for("/guide/rules.md"),
            "http://localhost:8080/doc/guide/rules.md"
        );
        assert_eq!(source.url_for(INDEX_PATH), "http://localhost:8080/doc/SUMMARY.md");
    }

    #[test]
    fn rejects_relative_base() {
        assert!(matches!(
            HttpDocSource::new("localhost"),
            Err(DocError::InvalidBase(_))
        ));
    }
}
