//! Central error types for XSD parsing and schema resolution.
//!
//! Jeder Parse-Fehler trägt einen Ortspfad aus der Kette der Vorfahren-Elemente
//! (z.B. `schema.element[Person].attribute[firstName]`), damit das fehlerhafte
//! Element ohne erneutes Parsen gefunden werden kann.

use core::fmt;

/// All errors raised while parsing a schema document or resolving a schema graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A required attribute is absent.
    MissingAttribute {
        location: String,
        attribute: &'static str,
    },
    /// `minOccurs`/`maxOccurs` is neither a non-negative integer nor `unbounded`,
    /// or `minOccurs` exceeds a bounded `maxOccurs`.
    MalformedOccurs { location: String, value: String },
    /// A boolean attribute is not literally `true` or `false`.
    MalformedBoolean {
        location: String,
        attribute: &'static str,
        value: String,
    },
    /// `use` is not one of `optional`, `required`, `prohibited`.
    MalformedUse { location: String, value: String },
    /// A QName prefix is not bound in the active namespace scope.
    UnboundPrefix {
        location: String,
        prefix: String,
        qname: String,
    },
    /// A QName has more than one colon or an empty part.
    MalformedQName { location: String, value: String },
    /// A node violates an "exactly one of" shape rule.
    AmbiguousOrMissingConstruct {
        location: String,
        /// Die erlaubten Alternativen, z.B. `restriction|list|union`.
        expected: &'static str,
        /// Wie viele passende Kinder gefunden wurden.
        found: usize,
    },
    /// A node carries both or neither of a reference and an inline definition
    /// (`name`/`ref`, `type`/inline type, `base`/inline simpleType).
    AmbiguousReferenceOrDefinition {
        location: String,
        alternatives: &'static str,
    },
    /// A construct is valid XSD but cannot be expressed in the schema model.
    UnsupportedConstruct { location: String, construct: String },
    /// The document contains no `schema` element.
    SchemaNotFound,
    /// The document contains more than one top-level `schema` element.
    MultipleSchemata { count: usize },
    /// An `import` declares the target namespace of the importing document.
    NamespaceConflict { location: String, namespace: String },
    /// XML tokenization failed.
    XmlParseError(String),
    /// The document exceeds the size limit.
    DocumentTooLarge { size: usize, max: usize },
    /// A locator string could not be interpreted as a path or URL.
    InvalidLocator { locator: String, reason: String },
    /// A referenced document could not be retrieved.
    FetchFailed { locator: String, cause: String },
    /// A referenced document could not be parsed.
    ParseFailed { locator: String, cause: Box<Error> },
}

/// Maschinenlesbare Fehlerart ohne Nutzdaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    MissingAttribute,
    MalformedOccurs,
    MalformedBoolean,
    MalformedUse,
    UnboundPrefix,
    MalformedQName,
    AmbiguousOrMissingConstruct,
    AmbiguousReferenceOrDefinition,
    UnsupportedConstruct,
    SchemaNotFound,
    MultipleSchemata,
    NamespaceConflict,
    XmlParseError,
    DocumentTooLarge,
    InvalidLocator,
    FetchFailed,
    ParseFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAttribute { location, attribute } => {
                write!(f, "missing required attribute '{attribute}' at {location}")
            }
            Self::MalformedOccurs { location, value } => {
                write!(f, "malformed occurrence bound '{value}' at {location}")
            }
            Self::MalformedBoolean { location, attribute, value } => write!(
                f,
                "malformed boolean '{value}' for attribute '{attribute}' at {location} (expected true or false)"
            ),
            Self::MalformedUse { location, value } => write!(
                f,
                "malformed use '{value}' at {location} (expected optional, required or prohibited)"
            ),
            Self::UnboundPrefix { location, prefix, qname } => {
                write!(f, "unbound namespace prefix '{prefix}' in '{qname}' at {location}")
            }
            Self::MalformedQName { location, value } => {
                write!(f, "malformed QName '{value}' at {location}")
            }
            Self::AmbiguousOrMissingConstruct { location, expected, found } => write!(
                f,
                "expected exactly one of {expected} at {location}, found {found}"
            ),
            Self::AmbiguousReferenceOrDefinition { location, alternatives } => write!(
                f,
                "expected exactly one of {alternatives} at {location} (reference or inline definition)"
            ),
            Self::UnsupportedConstruct { location, construct } => {
                write!(f, "unsupported construct {construct} at {location}")
            }
            Self::SchemaNotFound => write!(f, "no schema element found in document"),
            Self::MultipleSchemata { count } => {
                write!(f, "document contains {count} schema elements, expected one")
            }
            Self::NamespaceConflict { location, namespace } => write!(
                f,
                "import of namespace '{namespace}' at {location} equals the target namespace"
            ),
            Self::XmlParseError(msg) => write!(f, "XML parse error: {msg}"),
            Self::DocumentTooLarge { size, max } => {
                write!(f, "schema document too large: {size} bytes (max {max} bytes)")
            }
            Self::InvalidLocator { locator, reason } => {
                write!(f, "invalid schema locator '{locator}': {reason}")
            }
            Self::FetchFailed { locator, cause } => {
                write!(f, "cannot fetch schema '{locator}': {cause}")
            }
            Self::ParseFailed { locator, cause } => {
                write!(f, "cannot parse schema '{locator}': {cause}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ParseFailed { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    /// Die Fehlerart (für Tests und Aufrufer, die nach Art verzweigen).
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingAttribute { .. } => ErrorKind::MissingAttribute,
            Self::MalformedOccurs { .. } => ErrorKind::MalformedOccurs,
            Self::MalformedBoolean { .. } => ErrorKind::MalformedBoolean,
            Self::MalformedUse { .. } => ErrorKind::MalformedUse,
            Self::UnboundPrefix { .. } => ErrorKind::UnboundPrefix,
            Self::MalformedQName { .. } => ErrorKind::MalformedQName,
            Self::AmbiguousOrMissingConstruct { .. } => ErrorKind::AmbiguousOrMissingConstruct,
            Self::AmbiguousReferenceOrDefinition { .. } => {
                ErrorKind::AmbiguousReferenceOrDefinition
            }
            Self::UnsupportedConstruct { .. } => ErrorKind::UnsupportedConstruct,
            Self::SchemaNotFound => ErrorKind::SchemaNotFound,
            Self::MultipleSchemata { .. } => ErrorKind::MultipleSchemata,
            Self::NamespaceConflict { .. } => ErrorKind::NamespaceConflict,
            Self::XmlParseError(_) => ErrorKind::XmlParseError,
            Self::DocumentTooLarge { .. } => ErrorKind::DocumentTooLarge,
            Self::InvalidLocator { .. } => ErrorKind::InvalidLocator,
            Self::FetchFailed { .. } => ErrorKind::FetchFailed,
            Self::ParseFailed { .. } => ErrorKind::ParseFailed,
        }
    }

    /// Der Ortspfad des fehlerhaften Elements, falls der Fehler einen hat.
    ///
    /// Bei `ParseFailed` wird der Ort des inneren Fehlers geliefert.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::MissingAttribute { location, .. }
            | Self::MalformedOccurs { location, .. }
            | Self::MalformedBoolean { location, .. }
            | Self::MalformedUse { location, .. }
            | Self::UnboundPrefix { location, .. }
            | Self::MalformedQName { location, .. }
            | Self::AmbiguousOrMissingConstruct { location, .. }
            | Self::AmbiguousReferenceOrDefinition { location, .. }
            | Self::UnsupportedConstruct { location, .. }
            | Self::NamespaceConflict { location, .. } => Some(location),
            Self::ParseFailed { cause, .. } => cause.location(),
            _ => None,
        }
    }
}

/// A convenience `Result` type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
