//! xsdres – XSD Parser und Multi-Dokument Schema Resolver
//!
//! Parsed XML Schema Dokumente in einen typisierten AST ([`Xsd`]) und löst
//! include/import über Dokumentgrenzen auf. Ergebnis ist eine flache
//! Symboltabelle ([`Schema`]), die nach qualifiziertem Namen abgefragt wird.
//!
//! # Beispiel
//!
//! ```
//! use xsdres::{ParserConfig, QName, Schema};
//!
//! let xsd = xsdres::parse_str(
//!     &ParserConfig::default(),
//!     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
//!                   targetNamespace="urn:books">
//!            <xs:element name="book" type="xs:string"/>
//!        </xs:schema>"#,
//! )
//! .unwrap();
//!
//! let schema = Schema::from(&xsd);
//! let book = schema.element(&QName::qualified("urn:books", "book")).unwrap();
//! assert_eq!(book.name.to_string(), "{urn:books}book");
//! ```

pub mod ast;
pub mod error;
pub mod locator;
pub mod options;
pub mod qname;
pub mod schema;
pub mod transport;
pub mod xsd;

pub use error::{Error, ErrorKind, Result};

/// HashSet mit ahash (schneller, nicht DoS-resistent; nur für interne Datenstrukturen).
pub(crate) type FastHashSet<K> = hashbrown::HashSet<K, ahash::RandomState>;

// Public API: AST
pub use ast::{
    Annotation, Attribute, AttributeDeclaration, AttributeGroup, Child, ChoiceChild,
    ComplexContent, ComplexDerivation, ComplexType, Constraint, Content, Element, Facet, Import,
    Include, MaxOccurs, ModelGroup, Occurs, PlainContent, RefOr, SequenceChild, SimpleContent,
    SimpleExtension, SimpleRestriction, SimpleType, Type, Use, Xsd,
};

// Public API: Types
pub use qname::{Namespace, QName};
pub use schema::Schema;

// Public API: Parser/Resolver
pub use locator::Locator;
pub use options::ParserConfig;
pub use transport::{DefaultTransport, Transport, TransportError};
pub use xsd::{
    Document, MAX_XSD_SIZE, Resolution, Resolver, get_schema, parse, parse_bytes, parse_file,
    parse_str,
};
