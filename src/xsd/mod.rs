//! XSD Parser: XML-Dokument → [`Xsd`] AST.
//!
//! Rekursiver Abstieg über den roxmltree-Baum; pro XSD-Konstrukt eine
//! Parse-Funktion. Jede Funktion bekommt den Knoten zusammen mit einem
//! unveränderlichen [`Scope`](scope::Scope) (targetNamespace,
//! Prefix-Bindungen, Optionen), der vor dem Abstieg in Kinder lokal erweitert
//! wird.
//!
//! # Scope
//!
//! - element, simpleType, complexType, simpleContent, complexContent,
//!   restriction, extension, list, union, Facets
//! - sequence, choice, all, group (benannt und Referenz)
//! - attribute, attributeGroup
//! - include, import, annotation
//!
//! # Out of Scope
//!
//! - XSD 1.1 (`assert`, `override`, `openContent`) und `redefine`: werden mit
//!   einer Warnung übersprungen
//! - Wildcards (`any`, `anyAttribute`): werden übersprungen
//!
//! Fehler sind sofort fatal, es gibt keine Teil-ASTs.

mod attributes;
mod context;
mod imports;
mod location;
mod particles;
mod scope;
mod types;

pub use imports::{Document, Resolution, Resolver, get_schema};

use std::path::Path;

use log::warn;
use roxmltree::{Node, ParsingOptions};

use crate::ast::{Attribute, Child, Import, Include, Xsd};
use crate::error::{Error, Result};
use crate::options::ParserConfig;
use crate::qname::Namespace;

use attributes::{parse_attribute, parse_attribute_group};
use context::ParseContext;
use particles::{parse_element, parse_named_group};
use scope::Scope;
use types::parse_type;

/// Maximale Größe eines XSD-Dokuments (16 MiB).
///
/// DoS-Schutz; ausreichend für praktisch alle realen XSD-Dateien.
pub const MAX_XSD_SIZE: usize = 16 * 1024 * 1024;

/// UTF-8 Byte Order Mark.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parsed ein bereits tokenisiertes XML-Dokument zu einem [`Xsd`].
///
/// Das Wurzelelement wird akzeptiert, wenn es selbst `schema` ist; sonst wird
/// unter seinen Kindern gesucht (Wrapper-Dokumente, z.B. WSDL `types`).
///
/// # Beispiel
///
/// ```
/// use xsdres::options::ParserConfig;
///
/// let text = r#"
///     <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
///                targetNamespace="http://example.org">
///         <xs:element name="book" type="xs:string"/>
///     </xs:schema>
/// "#;
/// let doc = roxmltree::Document::parse(text).unwrap();
/// let xsd = xsdres::parse(&ParserConfig::default(), &doc).unwrap();
/// assert_eq!(xsd.children.len(), 1);
/// assert_eq!(xsd.target_namespace.unwrap().as_str(), "http://example.org");
/// ```
pub fn parse(config: &ParserConfig, doc: &roxmltree::Document) -> Result<Xsd> {
    let root = ParseContext::enter(doc.root_element(), &Scope::root(*config));
    let schema = find_schema(&root)?;
    if schema == root.node {
        parse_schema(&root)
    } else {
        parse_schema(&root.child(schema))
    }
}

/// Tokenisiert `text` und parsed es. DTDs sind erlaubt.
pub fn parse_str(config: &ParserConfig, text: &str) -> Result<Xsd> {
    if text.len() > MAX_XSD_SIZE {
        return Err(Error::DocumentTooLarge {
            size: text.len(),
            max: MAX_XSD_SIZE,
        });
    }

    let xml_opts = ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, xml_opts)
        .map_err(|e| Error::XmlParseError(e.to_string()))?;
    parse(config, &doc)
}

/// Wie [`parse_str`], für rohe Bytes. Ein führendes BOM wird entfernt; das
/// Dokument muss UTF-8 sein.
pub fn parse_bytes(config: &ParserConfig, bytes: &[u8]) -> Result<Xsd> {
    if bytes.len() > MAX_XSD_SIZE {
        return Err(Error::DocumentTooLarge {
            size: bytes.len(),
            max: MAX_XSD_SIZE,
        });
    }
    let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::XmlParseError(format!("invalid UTF-8: {e}")))?;
    parse_str(config, text)
}

/// Liest und parsed eine lokale Datei. Lesefehler ergeben `FetchFailed`.
pub fn parse_file(config: &ParserConfig, path: &Path) -> Result<Xsd> {
    let bytes = std::fs::read(path).map_err(|e| Error::FetchFailed {
        locator: path.display().to_string(),
        cause: e.to_string(),
    })?;
    parse_bytes(config, &bytes)
}

fn find_schema<'a, 'input>(root: &ParseContext<'a, 'input>) -> Result<Node<'a, 'input>> {
    if root.is_construct(root.node, "schema") {
        return Ok(root.node);
    }
    let found = root.children_named("schema");
    match found.as_slice() {
        [] => Err(Error::SchemaNotFound),
        [schema] => Ok(*schema),
        _ => Err(Error::MultipleSchemata { count: found.len() }),
    }
}

/// Parsed das `schema`-Element selbst: targetNamespace setzen, dann die
/// Top-Level-Kinder in Dokumentreihenfolge.
fn parse_schema(ctx: &ParseContext) -> Result<Xsd> {
    let target_namespace = ctx
        .optional("targetNamespace")
        .map(str::trim)
        .filter(|ns| !ns.is_empty())
        .map(Namespace::from);
    let ctx = ParseContext {
        node: ctx.node,
        scope: ctx.scope.with_target_namespace(target_namespace.clone()),
    };

    let mut children = Vec::new();
    for node in ctx.xs_children() {
        if let Some(child) = parse_top_level(&ctx.child(node))? {
            children.push(child);
        }
    }

    Ok(Xsd {
        target_namespace,
        children,
    })
}

fn parse_top_level(ctx: &ParseContext) -> Result<Option<Child>> {
    let child = match ctx.local_name() {
        "element" => Child::Element(parse_element(ctx)?),
        "simpleType" | "complexType" => Child::Type(ctx.target_name()?, parse_type(ctx)?),
        "attributeGroup" => Child::Attribute(Attribute::Group(parse_attribute_group(ctx)?)),
        "attribute" => Child::Attribute(parse_attribute(ctx)?),
        "group" => {
            let (name, model) = parse_named_group(ctx)?;
            Child::Group(name, model)
        }
        "include" => Child::Include(Include {
            location: ctx.required("schemaLocation")?.to_string(),
        }),
        "import" => Child::Import(parse_import(ctx)?),
        "annotation" | "notation" => return Ok(None),
        "redefine" | "override" | "defaultOpenContent" => {
            warn!("ignoring {} at {}", ctx.local_name(), ctx.location());
            return Ok(None);
        }
        _ => {
            ctx.skip(ctx.node);
            return Ok(None);
        }
    };
    Ok(Some(child))
}

/// `import`: beide Attribute optional. Ein Import des eigenen targetNamespace
/// ist ein `NamespaceConflict`.
fn parse_import(ctx: &ParseContext) -> Result<Import> {
    let namespace = ctx
        .optional("namespace")
        .map(str::trim)
        .filter(|ns| !ns.is_empty())
        .map(Namespace::from);

    if let Some(ns) = &namespace
        && ctx.scope.target_namespace() == Some(ns)
    {
        return Err(Error::NamespaceConflict {
            location: ctx.location(),
            namespace: ns.to_string(),
        });
    }

    Ok(Import {
        location: ctx.optional("schemaLocation").map(str::to_string),
        namespace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Constraint, MaxOccurs, Occurs, RefOr, SimpleType, Type};
    use crate::error::ErrorKind;
    use crate::qname::QName;

    fn parse_default(text: &str) -> Result<Xsd> {
        parse_str(&ParserConfig::default(), text)
    }

    #[test]
    fn empty_schema_has_no_children() {
        let xsd =
            parse_default(r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#).unwrap();
        assert_eq!(xsd, Xsd::default());
    }

    #[test]
    fn empty_target_namespace_is_absent() {
        let xsd = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace=""/>"#,
        )
        .unwrap();
        assert_eq!(xsd.target_namespace, None);
    }

    #[test]
    fn wrapper_with_two_schemata_is_rejected() {
        let err = parse_default(
            r#"<definitions xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:schema targetNamespace="urn:a"/>
                 <xs:schema targetNamespace="urn:b"/>
               </definitions>"#,
        )
        .unwrap_err();
        assert_eq!(err, Error::MultipleSchemata { count: 2 });
    }

    #[test]
    fn wrapper_with_one_schema_inherits_bindings() {
        let xsd = parse_default(
            r#"<types xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:tns="urn:a">
                 <xs:schema targetNamespace="urn:a">
                   <xs:element name="e" type="tns:T"/>
                 </xs:schema>
               </types>"#,
        )
        .unwrap();
        let Child::Element(RefOr::Inline(element)) = &xsd.children[0] else {
            panic!("expected inline element");
        };
        assert_eq!(element.name, QName::qualified("urn:a", "e"));
        assert_eq!(element.type_, RefOr::Ref(QName::qualified("urn:a", "T")));
    }

    #[test]
    fn document_without_schema() {
        let err = parse_default(r#"<root><child/></root>"#).unwrap_err();
        assert_eq!(err, Error::SchemaNotFound);
    }

    #[test]
    fn schema_outside_xs_namespace_needs_ignore_flag() {
        let text = r#"<schema targetNamespace="urn:t"><element name="e"/></schema>"#;
        assert_eq!(parse_default(text).unwrap_err(), Error::SchemaNotFound);

        let config = ParserConfig::default().with_ignore_schema_namespace(true);
        let xsd = parse_str(&config, text).unwrap();
        assert_eq!(xsd.children.len(), 1);
    }

    #[test]
    fn enumeration_round_trip() {
        let xsd = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:simpleType name="Code">
                   <xs:restriction base="xs:string">
                     <xs:enumeration value="X">
                       <xs:annotation><xs:documentation>one</xs:documentation></xs:annotation>
                     </xs:enumeration>
                     <xs:enumeration value="X">
                       <xs:annotation><xs:documentation>two</xs:documentation></xs:annotation>
                     </xs:enumeration>
                   </xs:restriction>
                 </xs:simpleType>
               </xs:schema>"#,
        )
        .unwrap();
        let Child::Type(name, Type::Simple(SimpleType::Atomic(restriction, _))) = &xsd.children[0]
        else {
            panic!("expected atomic simple type");
        };
        assert_eq!(*name, QName::unqualified("Code"));
        assert_eq!(restriction.constraints.len(), 2);
        assert!(matches!(
            &restriction.constraints[0],
            Constraint::Enumeration { annotations, .. }
                if annotations == &[crate::ast::Annotation::Documentation("one".to_string())]
        ));
    }

    #[test]
    fn occurs_defaults_through_entry_point() {
        let xsd = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:complexType name="T">
                   <xs:sequence>
                     <xs:element name="once"/>
                     <xs:element name="many" maxOccurs="unbounded"/>
                   </xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        )
        .unwrap();
        let Child::Type(_, Type::Complex(complex)) = &xsd.children[0] else {
            panic!("expected complex type");
        };
        let crate::ast::Content::Plain(plain) = &complex.content else {
            panic!("expected plain content");
        };
        let Some(crate::ast::ModelGroup::Sequence(items)) = &plain.model else {
            panic!("expected sequence");
        };
        let RefOr::Inline(crate::ast::SequenceChild::ElementGroup(elements)) = &items[0] else {
            panic!("expected element group");
        };
        let occurs: Vec<Occurs> = elements
            .iter()
            .filter_map(RefOr::as_inline)
            .map(|e| e.occurs)
            .collect();
        assert_eq!(
            occurs,
            vec![
                Occurs::new(1, MaxOccurs::Bounded(1)),
                Occurs::new(1, MaxOccurs::Unbounded)
            ]
        );
    }

    #[test]
    fn prefix_scoping() {
        let xsd = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="inside" xmlns:tns="urn:x">
                   <xs:complexType>
                     <xs:sequence><xs:element ref="tns:Foo"/></xs:sequence>
                   </xs:complexType>
                 </xs:element>
               </xs:schema>"#,
        )
        .unwrap();
        assert_eq!(xsd.children.len(), 1);

        let err = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="inside" xmlns:tns="urn:x"/>
                 <xs:element name="outside">
                   <xs:complexType>
                     <xs:sequence><xs:element ref="tns:Foo"/></xs:sequence>
                   </xs:complexType>
                 </xs:element>
               </xs:schema>"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnboundPrefix);
        assert_eq!(
            err.location(),
            Some("schema.element[outside].complexType.sequence.element")
        );
    }

    #[test]
    fn malformed_type_reference() {
        let err = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:element name="e" type="a:b:c"/>
               </xs:schema>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::MalformedQName {
                location: "schema.element[e]".to_string(),
                value: "a:b:c".to_string(),
            }
        );
    }

    #[test]
    fn restriction_and_list_is_ambiguous() {
        let err = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:simpleType name="Bad">
                   <xs:restriction base="xs:string"/>
                   <xs:list itemType="xs:string"/>
                 </xs:simpleType>
               </xs:schema>"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousOrMissingConstruct);
    }

    #[test]
    fn import_of_own_namespace_conflicts() {
        let err = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                 <xs:import namespace="urn:t" schemaLocation="other.xsd"/>
               </xs:schema>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::NamespaceConflict {
                location: "schema.import".to_string(),
                namespace: "urn:t".to_string(),
            }
        );
    }

    #[test]
    fn includes_and_imports_in_order() {
        let xsd = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                 <xs:include schemaLocation="a.xsd"/>
                 <xs:import namespace="urn:other"/>
                 <xs:include schemaLocation="b.xsd"/>
                 <xs:import namespace="urn:third" schemaLocation="third.xsd"/>
               </xs:schema>"#,
        )
        .unwrap();
        let includes: Vec<&str> = xsd.includes().map(|i| i.location.as_str()).collect();
        assert_eq!(includes, ["a.xsd", "b.xsd"]);
        let imports: Vec<Option<&str>> = xsd.imports().map(|i| i.location.as_deref()).collect();
        assert_eq!(imports, [None, Some("third.xsd")]);
    }

    #[test]
    fn include_without_location() {
        let err = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"><xs:include/></xs:schema>"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::MissingAttribute {
                location: "schema.include".to_string(),
                attribute: "schemaLocation",
            }
        );
    }

    #[test]
    fn top_level_definitions_carry_target_namespace() {
        let xsd = parse_default(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                 <xs:annotation><xs:documentation>ignored</xs:documentation></xs:annotation>
                 <xs:complexType name="T"/>
                 <xs:attributeGroup name="AG"/>
                 <xs:attribute name="a"/>
                 <xs:group name="G"><xs:sequence/></xs:group>
                 <xs:redefine schemaLocation="r.xsd"/>
               </xs:schema>"#,
        )
        .unwrap();
        assert_eq!(xsd.children.len(), 4);
        let Child::Type(name, _) = &xsd.children[0] else {
            panic!("expected type");
        };
        assert_eq!(*name, QName::qualified("urn:t", "T"));
        assert!(matches!(
            &xsd.children[1],
            Child::Attribute(Attribute::Group(group)) if group.name == QName::qualified("urn:t", "AG")
        ));
        assert!(matches!(&xsd.children[3], Child::Group(name, _) if name.local == "G"));
    }

    #[test]
    fn bytes_with_bom_and_invalid_utf8() {
        let mut bytes = BOM.to_vec();
        bytes.extend_from_slice(br#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#);
        assert!(parse_bytes(&ParserConfig::default(), &bytes).is_ok());

        let err = parse_bytes(&ParserConfig::default(), b"<a>\xff</a>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::XmlParseError);
    }

    #[test]
    fn malformed_xml() {
        let err = parse_default("<xs:schema").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::XmlParseError);
    }

    #[test]
    fn oversized_document_is_rejected() {
        let text = " ".repeat(MAX_XSD_SIZE + 1);
        let err = parse_default(&text).unwrap_err();
        assert_eq!(
            err,
            Error::DocumentTooLarge {
                size: MAX_XSD_SIZE + 1,
                max: MAX_XSD_SIZE
            }
        );
    }

    #[test]
    fn missing_file_is_fetch_failure() {
        let err = parse_file(
            &ParserConfig::default(),
            Path::new("/nonexistent/definitely/missing.xsd"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
    }
}
