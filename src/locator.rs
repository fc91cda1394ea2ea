//! Document locators and relative reference resolution.
//!
//! Ein [`Locator`] identifiziert ein Schema-Dokument: lokaler Pfad oder
//! HTTP(S)-URL. Lokale Pfade werden beim Erzeugen normalisiert (`.`/`..`
//! lexikalisch entfernt, `canonicalize` falls die Datei existiert), damit die
//! Besucht-Menge des Resolvers dasselbe Dokument unter verschiedenen
//! Schreibweisen erkennt.

use core::fmt;
use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::error::{Error, Result};

/// Where a schema document lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Local(PathBuf),
    Remote(Url),
}

impl Locator {
    /// Interpretiert einen Quell-String: `http`/`https` → [`Locator::Remote`],
    /// `file:` → lokaler Pfad, alles andere → lokaler Pfad.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(invalid(text, "empty locator"));
        }
        match absolute_url(text) {
            Some(url) => Self::from_url(url, text),
            None => Ok(Self::local(Path::new(text))),
        }
    }

    /// Lokaler Locator mit normalisiertem Pfad.
    pub fn local(path: &Path) -> Self {
        let normalized = normalize(path);
        match std::fs::canonicalize(&normalized) {
            Ok(canonical) => Locator::Local(canonical),
            Err(_) => Locator::Local(normalized),
        }
    }

    fn from_url(url: Url, text: &str) -> Result<Self> {
        match url.scheme() {
            "http" | "https" => Ok(Locator::Remote(url)),
            "file" => url
                .to_file_path()
                .map(|path| Self::local(&path))
                .map_err(|()| invalid(text, "file URL has no local path")),
            _ => Ok(Self::local(Path::new(text))),
        }
    }

    /// Resolves `reference` (a `schemaLocation` value) against `self`.
    ///
    /// Absolute URLs ersetzen die Basis, werden dabei aber wie jeder Locator
    /// normalisiert (`HTTP://Example.ORG/x/./y.xsd` wird zu
    /// `http://example.org/x/y.xsd`, lokale Pfade werden kanonisiert). Nur so
    /// erkennt die visited-Menge dasselbe Dokument unter verschiedenen
    /// Schreibweisen. Bei lokaler Basis ist `reference` relativ zum
    /// Verzeichnis des Basisdokuments (`/a/b/schema.xsd` + `c.xsd` ergibt
    /// `/a/b/c.xsd`), bei entfernter Basis gilt RFC 3986 ([`Url::join`]).
    pub fn combine(&self, reference: &str) -> Result<Locator> {
        let reference = reference.trim();
        if let Some(url) = absolute_url(reference) {
            return Self::from_url(url, reference);
        }
        match self {
            Locator::Local(base) => {
                let dir = base.parent().unwrap_or(Path::new(""));
                Ok(Self::local(&dir.join(reference)))
            }
            Locator::Remote(base) => base
                .join(reference)
                .map(Locator::Remote)
                .map_err(|e| invalid(reference, &e.to_string())),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Locator::Remote(_))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Local(path) => write!(f, "{}", path.display()),
            Locator::Remote(url) => write!(f, "{url}"),
        }
    }
}

fn invalid(locator: &str, reason: &str) -> Error {
    Error::InvalidLocator {
        locator: locator.to_string(),
        reason: reason.to_string(),
    }
}

/// Absolute URL mit echtem Scheme. Einbuchstabige Schemes sind
/// Windows-Laufwerke (`C:\schema.xsd`), keine URLs.
fn absolute_url(text: &str) -> Option<Url> {
    Url::parse(text).ok().filter(|url| url.scheme().len() > 1)
}

/// Lexikalische Normalisierung: `.` entfällt, `..` hebt das vorige
/// Segment auf. Führende `..` relativer Pfade bleiben stehen.
fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}
