//! Qualified names and namespaces.
//!
//! Ein [`QName`] ist ein Paar aus optionalem Namespace und lokalem Namen.
//! Gleichheit und Ordnung (Map-Keys) richten sich nur nach diesem Paar;
//! Prefixe werden beim Parsen aufgelöst und nicht mitgeführt.

use std::fmt;

/// XML Schema Namespace.
pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";

/// XML Namespace (Prefix `xml` ist implizit immer gebunden).
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Opaque namespace URI. Two namespaces are equal iff their strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(uri: &str) -> Self {
        Self(uri.to_string())
    }
}

impl From<String> for Namespace {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A name qualified by an optional namespace.
///
/// `namespace = None` kommt nur für Namen ohne Namespace vor (Schemas ohne
/// targetNamespace, unpräfixierte Referenzen ohne Default-Namespace).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName {
    pub namespace: Option<Namespace>,
    pub local: String,
}

impl QName {
    pub fn new(namespace: Option<Namespace>, local: impl Into<String>) -> Self {
        Self {
            namespace,
            local: local.into(),
        }
    }

    /// Name im angegebenen Namespace.
    pub fn qualified(namespace: impl Into<Namespace>, local: impl Into<String>) -> Self {
        Self::new(Some(namespace.into()), local)
    }

    /// Name ohne Namespace.
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self::new(None, local)
    }

    /// Built-in type name in the XML Schema namespace, e.g. `xs:string`.
    pub fn xs(local: impl Into<String>) -> Self {
        Self::qualified(XS_NS, local)
    }

    pub fn namespace_str(&self) -> Option<&str> {
        self.namespace.as_ref().map(Namespace::as_str)
    }

    pub fn is_xs(&self) -> bool {
        self.namespace_str() == Some(XS_NS)
    }
}

/// Clark notation: `{uri}local`, or just `local` without namespace.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}
