//! Parser options.
//!
//! # Beispiel
//!
//! ```
//! use xsdres::options::ParserConfig;
//!
//! let config = ParserConfig::default().with_ignore_schema_namespace(true);
//! assert!(config.ignore_schema_namespace);
//! ```

/// Options controlling how schema documents are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    /// Match XSD constructs by local name only.
    ///
    /// Toleriert Schemas, die den XML-Schema-Namespace nicht konsistent
    /// verwenden (z.B. `<schema>` ohne Namespace-Deklaration). Default: false.
    pub ignore_schema_namespace: bool,
}

impl ParserConfig {
    pub fn with_ignore_schema_namespace(mut self, ignore: bool) -> Self {
        self.ignore_schema_namespace = ignore;
        self
    }
}
