//! Fetching document bytes for a [`Locator`].
//!
//! Der Resolver kennt nur den [`Transport`]-Trait; [`DefaultTransport`] liest
//! lokale Dateien und holt entfernte Dokumente per blockierendem HTTP GET
//! (Feature `http`). Timeouts sind Sache des Transports.

use core::fmt;

use crate::locator::Locator;

/// Source of document bytes.
pub trait Transport {
    fn fetch(&mut self, locator: &Locator) -> Result<Vec<u8>, TransportError>;
}

/// Fehler beim Holen eines Dokuments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Lokales Dateisystem plus HTTP(S).
#[derive(Debug, Default)]
pub struct DefaultTransport {
    #[cfg(feature = "http")]
    client: Option<reqwest::blocking::Client>,
}

impl DefaultTransport {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "http")]
    fn fetch_remote(&mut self, url: &url::Url) -> Result<Vec<u8>, TransportError> {
        let client = match self.client.take() {
            Some(client) => client,
            None => reqwest::blocking::Client::builder()
                .build()
                .map_err(|e| TransportError::new(format!("HTTP client: {e}")))?,
        };
        let client = self.client.insert(client);

        let response = client
            .get(url.as_str())
            .send()
            .map_err(|e| TransportError::new(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::new(format!("HTTP status {status}")));
        }
        let body = response
            .bytes()
            .map_err(|e| TransportError::new(e.to_string()))?;
        Ok(body.to_vec())
    }

    #[cfg(not(feature = "http"))]
    fn fetch_remote(&mut self, url: &url::Url) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::new(format!(
            "cannot fetch {url}: built without the `http` feature"
        )))
    }
}

impl Transport for DefaultTransport {
    fn fetch(&mut self, locator: &Locator) -> Result<Vec<u8>, TransportError> {
        match locator {
            Locator::Local(path) => Ok(std::fs::read(path)?),
            Locator::Remote(url) => self.fetch_remote(url),
        }
    }
}
