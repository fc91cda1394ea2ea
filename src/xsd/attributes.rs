//! Attribute declarations and attribute groups.

use super::context::{NameOrRef, ParseContext};
use super::types::parse_simple_type;
use crate::ast::{Attribute, AttributeDeclaration, AttributeGroup, RefOr};
use crate::error::Result;
use crate::qname::QName;

/// Alle attribute|attributeGroup-Kinder von `ctx` in Dokumentreihenfolge.
/// `anyAttribute` wird übersprungen.
pub(super) fn parse_attributes(ctx: &ParseContext) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::new();
    for node in ctx.children_named("attribute|attributeGroup|anyAttribute") {
        let child = ctx.child(node);
        match child.local_name() {
            "attribute" => attributes.push(parse_attribute(&child)?),
            "attributeGroup" => attributes.push(match child.name_or_ref()? {
                NameOrRef::Ref(reference) => Attribute::GroupRef(child.resolve_ref(reference)?),
                NameOrRef::Name(_) => Attribute::Group(parse_attribute_group(&child)?),
            }),
            _ => ctx.skip(node),
        }
    }
    Ok(attributes)
}

/// Parsed eine Attribut-Deklaration oder -Referenz.
pub(super) fn parse_attribute(ctx: &ParseContext) -> Result<Attribute> {
    let use_ = ctx.use_()?;
    let name = match ctx.name_or_ref()? {
        NameOrRef::Ref(reference) => {
            return Ok(Attribute::Ref {
                name: ctx.resolve_ref(reference)?,
                use_,
            });
        }
        NameOrRef::Name(name) => ctx.scope.resolve_target_qualified(name),
    };

    let inline = ctx.at_most_one_of("simpleType")?;
    let type_ = match (ctx.optional("type"), inline) {
        (Some(reference), None) => RefOr::Ref(ctx.resolve_ref(reference)?),
        (None, Some(node)) => RefOr::Inline(parse_simple_type(&ctx.child(node))?),
        (None, None) => RefOr::Ref(QName::xs("anySimpleType")),
        (Some(_), Some(_)) => return Err(ctx.ambiguous_definition("type|simpleType")),
    };

    Ok(Attribute::Inline(AttributeDeclaration {
        name,
        use_,
        fixed: ctx.optional("fixed").map(str::to_string),
        default: ctx.optional("default").map(str::to_string),
        type_,
    }))
}

/// Named attribute group; nested groups and references are kept as-is.
pub(super) fn parse_attribute_group(ctx: &ParseContext) -> Result<AttributeGroup> {
    Ok(AttributeGroup {
        name: ctx.target_name()?,
        attributes: parse_attributes(ctx)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{SimpleType, Use};
    use crate::error::{Error, ErrorKind};
    use crate::options::ParserConfig;
    use crate::xsd::scope::Scope;
    use roxmltree::Document;

    fn first_child<R>(body: &str, f: impl FnOnce(&ParseContext) -> Result<R>) -> Result<R> {
        let xml = format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:tns="urn:t">{body}</xs:schema>"#
        );
        let doc = Document::parse(&xml).unwrap();
        let root = ParseContext::enter(doc.root_element(), &Scope::root(ParserConfig::default()));
        let schema = ParseContext {
            scope: root.scope.with_target_namespace(Some("urn:t".into())),
            node: root.node,
        };
        let node = schema.xs_children()[0];
        f(&schema.child(node))
    }

    #[test]
    fn inline_attribute_with_defaults() {
        let attribute = first_child(r#"<xs:attribute name="a"/>"#, parse_attribute).unwrap();
        assert_eq!(
            attribute,
            Attribute::Inline(AttributeDeclaration {
                name: QName::qualified("urn:t", "a"),
                use_: Use::Optional,
                fixed: None,
                default: None,
                type_: RefOr::Ref(QName::xs("anySimpleType")),
            })
        );
    }

    #[test]
    fn inline_attribute_with_fixed_default_and_use() {
        let attribute = first_child(
            r#"<xs:attribute name="version" type="xs:string" use="required" fixed="1.0" default="x"/>"#,
            parse_attribute,
        )
        .unwrap();
        let Attribute::Inline(declaration) = attribute else {
            panic!("expected inline attribute");
        };
        assert_eq!(declaration.use_, Use::Required);
        assert_eq!(declaration.fixed.as_deref(), Some("1.0"));
        assert_eq!(declaration.default.as_deref(), Some("x"));
        assert_eq!(declaration.type_, RefOr::Ref(QName::xs("string")));
    }

    #[test]
    fn attribute_with_inline_simple_type() {
        let attribute = first_child(
            r#"<xs:attribute name="size">
                 <xs:simpleType>
                   <xs:restriction base="xs:int"><xs:maxInclusive value="9"/></xs:restriction>
                 </xs:simpleType>
               </xs:attribute>"#,
            parse_attribute,
        )
        .unwrap();
        let Attribute::Inline(declaration) = attribute else {
            panic!("expected inline attribute");
        };
        assert!(matches!(declaration.type_, RefOr::Inline(SimpleType::Atomic(..))));
    }

    #[test]
    fn attribute_ref_keeps_use() {
        let attribute = first_child(
            r#"<xs:attribute ref="xml:lang" use="prohibited"/>"#,
            parse_attribute,
        )
        .unwrap();
        assert_eq!(
            attribute,
            Attribute::Ref {
                name: QName::qualified(crate::qname::XML_NS, "lang"),
                use_: Use::Prohibited,
            }
        );
    }

    #[test]
    fn attribute_type_and_inline_is_ambiguous() {
        let err = first_child(
            r#"<xs:attribute name="a" type="xs:int">
                 <xs:simpleType><xs:restriction base="xs:int"/></xs:simpleType>
               </xs:attribute>"#,
            parse_attribute,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Error::AmbiguousReferenceOrDefinition {
                location: "schema.attribute[a]".to_string(),
                alternatives: "type|simpleType",
            }
        );
    }

    #[test]
    fn malformed_use() {
        let err = first_child(r#"<xs:attribute name="a" use="always"/>"#, parse_attribute)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedUse);
    }

    #[test]
    fn attribute_group_with_nested_reference() {
        let group = first_child(
            r###"<xs:attributeGroup name="common">
                 <xs:attribute name="id" type="xs:ID"/>
                 <xs:attributeGroup ref="tns:more"/>
                 <xs:anyAttribute namespace="##other"/>
               </xs:attributeGroup>"###,
            parse_attribute_group,
        )
        .unwrap();
        assert_eq!(group.name, QName::qualified("urn:t", "common"));
        assert_eq!(group.attributes.len(), 2);
        assert_eq!(
            group.attributes[1],
            Attribute::GroupRef(QName::qualified("urn:t", "more"))
        );
    }

    #[test]
    fn attribute_group_without_name() {
        let err = first_child(r#"<xs:attributeGroup/>"#, parse_attribute_group).unwrap_err();
        assert_eq!(
            err,
            Error::MissingAttribute {
                location: "schema.attributeGroup".to_string(),
                attribute: "name",
            }
        );
    }
}
