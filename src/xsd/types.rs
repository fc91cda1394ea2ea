//! Simple and complex type definitions.

use log::warn;

use super::attributes::parse_attributes;
use super::context::ParseContext;
use super::particles::parse_model_group;
use crate::ast::{
    ComplexContent, ComplexDerivation, ComplexType, Constraint, Content, Facet, ModelGroup,
    PlainContent, RefOr, SimpleContent, SimpleExtension, SimpleRestriction, SimpleType, Type,
};
use crate::error::Result;
use crate::qname::QName;

const MODEL_GROUPS: &str = "sequence|choice|all|group";

/// Kinder, die neben simpleContent/complexContent nicht stehen dürfen.
const PLAIN_BODY: &str = "sequence|choice|all|group|attribute|attributeGroup|anyAttribute";

/// `simpleType` oder `complexType`, je nach lokalem Namen.
pub(super) fn parse_type(ctx: &ParseContext) -> Result<Type> {
    if ctx.local_name() == "simpleType" {
        Ok(Type::Simple(parse_simple_type(ctx)?))
    } else {
        Ok(Type::Complex(parse_complex_type(ctx)?))
    }
}

// ============================================================================
// Simple Types
// ============================================================================

/// Parsed einen Simple Type: genau eines von restriction|list|union.
pub(super) fn parse_simple_type(ctx: &ParseContext) -> Result<SimpleType> {
    let annotations = ctx.annotations();
    let body = ctx.child(ctx.exactly_one_of("restriction|list|union")?);

    Ok(match body.local_name() {
        "restriction" => SimpleType::Atomic(parse_simple_restriction(&body)?, annotations),
        "list" => SimpleType::List(Box::new(parse_list(&body)?), annotations),
        _ => SimpleType::Union(parse_union(&body)?, annotations),
    })
}

/// `base=` oder ein eingebetteter `simpleType`, genau eines von beiden.
fn parse_simple_type_ref(
    ctx: &ParseContext,
    attribute: &'static str,
    alternatives: &'static str,
) -> Result<RefOr<SimpleType>> {
    let inline = ctx.at_most_one_of("simpleType")?;
    match (ctx.optional(attribute), inline) {
        (Some(name), None) => Ok(RefOr::Ref(ctx.resolve_ref(name)?)),
        (None, Some(node)) => Ok(RefOr::Inline(parse_simple_type(&ctx.child(node))?)),
        _ => Err(ctx.ambiguous_definition(alternatives)),
    }
}

/// Restriction of a simple type: base plus facets in document order.
pub(super) fn parse_simple_restriction(ctx: &ParseContext) -> Result<SimpleRestriction> {
    let base = parse_simple_type_ref(ctx, "base", "base|simpleType")?;
    Ok(SimpleRestriction {
        base: Box::new(base),
        constraints: parse_constraints(ctx)?,
    })
}

fn parse_constraints(ctx: &ParseContext) -> Result<Vec<Constraint>> {
    let mut constraints = Vec::new();
    for node in ctx.xs_children() {
        let facet_ctx = ctx.child(node);
        let name = facet_ctx.local_name();
        if name == "enumeration" {
            constraints.push(Constraint::Enumeration {
                value: facet_ctx.required("value")?.to_string(),
                annotations: facet_ctx.annotations(),
            });
        } else if let Some(facet) = Facet::from_local_name(name) {
            constraints.push(Constraint::Facet {
                facet,
                value: facet_ctx.required("value")?.to_string(),
            });
        } else if matches!(name, "assertion" | "explicitTimezone") {
            warn!("ignoring XSD 1.1 facet {name} at {}", facet_ctx.location());
        } else if !matches!(name, "annotation" | "simpleType") {
            ctx.skip(node);
        }
    }
    Ok(constraints)
}

fn parse_list(ctx: &ParseContext) -> Result<RefOr<SimpleType>> {
    parse_simple_type_ref(ctx, "itemType", "itemType|simpleType")
}

/// Members aus `memberTypes` (in Reihenfolge) gefolgt von eingebetteten
/// `simpleType`-Kindern.
fn parse_union(ctx: &ParseContext) -> Result<Vec<RefOr<SimpleType>>> {
    let mut members = Vec::new();
    if let Some(member_types) = ctx.optional("memberTypes") {
        for name in member_types.split_whitespace() {
            members.push(RefOr::Ref(ctx.resolve_ref(name)?));
        }
    }
    for node in ctx.children_named("simpleType") {
        members.push(RefOr::Inline(parse_simple_type(&ctx.child(node))?));
    }
    if members.is_empty() {
        return Err(ctx.ambiguous_construct("memberTypes|simpleType", 0));
    }
    Ok(members)
}

// ============================================================================
// Complex Types
// ============================================================================

/// Parsed einen Complex Type.
///
/// Inhalt ist entweder genau eines von simpleContent|complexContent oder ein
/// "plain" Body aus höchstens einer Model Group und Attributen.
pub(super) fn parse_complex_type(ctx: &ParseContext) -> Result<ComplexType> {
    let annotations = ctx.annotations();
    let mixed = ctx.boolean("mixed")?;

    let derived = ctx.children_named("simpleContent|complexContent");
    let content = match derived.as_slice() {
        [] => Content::Plain(PlainContent {
            model: parse_optional_model(ctx)?,
            attributes: parse_attributes(ctx)?,
        }),
        [node] => {
            let competing = ctx.children_named(PLAIN_BODY).len();
            if competing > 0 {
                return Err(ctx.ambiguous_construct(
                    "simpleContent|complexContent|sequence|choice|all|group",
                    competing + 1,
                ));
            }
            let body = ctx.child(*node);
            if body.local_name() == "simpleContent" {
                Content::Simple(parse_simple_content(&body)?)
            } else {
                Content::Complex(parse_complex_content(&body)?)
            }
        }
        _ => return Err(ctx.ambiguous_construct("simpleContent|complexContent", derived.len())),
    };

    Ok(ComplexType {
        annotations,
        mixed,
        content,
    })
}

/// Höchstens eine Model Group (sequence|choice|all|group).
fn parse_optional_model(ctx: &ParseContext) -> Result<Option<ModelGroup>> {
    match ctx.at_most_one_of(MODEL_GROUPS)? {
        Some(node) => Ok(Some(parse_model_group(&ctx.child(node))?)),
        None => Ok(None),
    }
}

fn required_base(ctx: &ParseContext) -> Result<QName> {
    ctx.resolve_ref(ctx.required("base")?)
}

fn parse_simple_content(ctx: &ParseContext) -> Result<SimpleContent> {
    let body = ctx.child(ctx.exactly_one_of("restriction|extension")?);
    if body.local_name() == "restriction" {
        // base ist hier der Complex Type mit Simple Content; ein zusätzlicher
        // eingebetteter simpleType verfeinert nur dessen Wertebereich
        let base = required_base(&body)?;
        Ok(SimpleContent::Restriction(SimpleRestriction {
            base: Box::new(RefOr::Ref(base)),
            constraints: parse_constraints(&body)?,
        }))
    } else {
        Ok(SimpleContent::Extension(SimpleExtension {
            base: required_base(&body)?,
            attributes: parse_attributes(&body)?,
        }))
    }
}

fn parse_complex_content(ctx: &ParseContext) -> Result<ComplexContent> {
    let body = ctx.child(ctx.exactly_one_of("restriction|extension")?);
    let derivation = ComplexDerivation {
        base: required_base(&body)?,
        model: parse_optional_model(&body)?,
        attributes: parse_attributes(&body)?,
    };
    if body.local_name() == "restriction" {
        Ok(ComplexContent::Restriction(derivation))
    } else {
        Ok(ComplexContent::Extension(derivation))
    }
}
