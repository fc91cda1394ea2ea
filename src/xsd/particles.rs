//! Element declarations and model groups (sequence, choice, all, group).
//!
//! Das Modell kennt nur zwei Verschachtelungsebenen: eine Sequence aus
//! Element-Gruppen und Choice-Gruppen, eine Choice aus Element-Gruppen.
//! Tiefere Strukturen werden beim Parsen flachgeklopft, soweit das ohne
//! Bedeutungsverlust geht, sonst `UnsupportedConstruct`.

use super::context::{NameOrRef, ParseContext};
use super::types::parse_type;
use crate::ast::{ChoiceChild, Element, ModelGroup, RefOr, SequenceChild};
use crate::error::Result;
use crate::qname::QName;

// ============================================================================
// Element
// ============================================================================

/// Parsed eine Element-Deklaration (global oder lokal).
///
/// `ref=` ergibt [`RefOr::Ref`]; minOccurs/maxOccurs werden dabei geprüft,
/// aber nicht übernommen.
pub(super) fn parse_element(ctx: &ParseContext) -> Result<RefOr<Element>> {
    let occurs = ctx.occurs()?;
    let name = match ctx.name_or_ref()? {
        NameOrRef::Ref(reference) => return Ok(RefOr::Ref(ctx.resolve_ref(reference)?)),
        NameOrRef::Name(name) => ctx.scope.resolve_target_qualified(name),
    };

    let inline = ctx.at_most_one_of("simpleType|complexType")?;
    let type_ = match (ctx.optional("type"), inline) {
        (Some(reference), None) => RefOr::Ref(ctx.resolve_ref(reference)?),
        (None, Some(node)) => RefOr::Inline(parse_type(&ctx.child(node))?),
        (None, None) => RefOr::Ref(QName::xs("anyType")),
        (Some(_), Some(_)) => return Err(ctx.ambiguous_definition("type|simpleType|complexType")),
    };

    Ok(RefOr::Inline(Element {
        name,
        type_,
        annotations: ctx.annotations(),
        occurs,
        nillable: ctx.boolean("nillable")?,
    }))
}

// ============================================================================
// Model Groups
// ============================================================================

/// Dispatch auf sequence|choice|all|group.
///
/// Ein `group ref=` an Stelle der Model Group wird zu einer Sequence mit der
/// Referenz als einzigem Eintrag.
pub(super) fn parse_model_group(ctx: &ParseContext) -> Result<ModelGroup> {
    ctx.occurs()?;
    match ctx.local_name() {
        "sequence" => Ok(ModelGroup::Sequence(parse_sequence(ctx)?)),
        "choice" => Ok(ModelGroup::Choice(parse_choice(ctx)?)),
        "all" => Ok(ModelGroup::All(parse_all(ctx)?)),
        "group" => Ok(ModelGroup::Sequence(vec![RefOr::Ref(group_ref(ctx)?)])),
        other => Err(ctx.unsupported(other)),
    }
}

/// Benannte Model Group auf oberster Ebene: `name=` plus genau eine Gruppe.
pub(super) fn parse_named_group(ctx: &ParseContext) -> Result<(QName, ModelGroup)> {
    let name = ctx.target_name()?;
    let body = ctx.child(ctx.exactly_one_of("sequence|choice|all")?);
    Ok((name, parse_model_group(&body)?))
}

fn group_ref(ctx: &ParseContext) -> Result<QName> {
    ctx.occurs()?;
    ctx.resolve_ref(ctx.required("ref")?)
}

pub(super) fn parse_sequence(ctx: &ParseContext) -> Result<Vec<RefOr<SequenceChild>>> {
    let mut items = Vec::new();
    push_sequence_items(ctx, &mut items)?;
    Ok(items)
}

/// Hängt die Partikel von `ctx` an `items` an. Verschachtelte Sequences
/// landen im selben Vektor, aufeinanderfolgende Elemente in derselben
/// Element-Gruppe.
fn push_sequence_items(ctx: &ParseContext, items: &mut Vec<RefOr<SequenceChild>>) -> Result<()> {
    for node in ctx.xs_children() {
        let child = ctx.child(node);
        match child.local_name() {
            "element" => {
                let element = parse_element(&child)?;
                match items.last_mut() {
                    Some(RefOr::Inline(SequenceChild::ElementGroup(group))) => group.push(element),
                    _ => items.push(RefOr::Inline(SequenceChild::ElementGroup(vec![element]))),
                }
            }
            "sequence" => {
                child.occurs()?;
                push_sequence_items(&child, items)?;
            }
            "choice" => {
                child.occurs()?;
                items.push(RefOr::Inline(SequenceChild::ChoiceGroup(parse_choice(&child)?)));
            }
            "group" => items.push(RefOr::Ref(group_ref(&child)?)),
            "any" => ctx.skip(node),
            "annotation" => {}
            other => return Err(child.unsupported(other)),
        }
    }
    Ok(())
}

pub(super) fn parse_choice(ctx: &ParseContext) -> Result<Vec<RefOr<ChoiceChild>>> {
    let mut alternatives = Vec::new();
    for node in ctx.xs_children() {
        let child = ctx.child(node);
        match child.local_name() {
            "element" => alternatives.push(RefOr::Inline(ChoiceChild::ElementGroup(vec![
                parse_element(&child)?,
            ]))),
            "sequence" => {
                child.occurs()?;
                let mut elements = Vec::new();
                collect_sequence_elements(&child, &mut elements)?;
                alternatives.push(RefOr::Inline(ChoiceChild::ElementGroup(elements)));
            }
            "choice" => {
                child.occurs()?;
                alternatives.extend(parse_choice(&child)?);
            }
            "group" => alternatives.push(RefOr::Ref(group_ref(&child)?)),
            "any" => ctx.skip(node),
            "annotation" => {}
            other => return Err(child.unsupported(other)),
        }
    }
    Ok(alternatives)
}

/// Elemente einer Sequence innerhalb einer Choice. Alles außer Elementen und
/// weiteren Sequences ist in [`ChoiceChild`] nicht darstellbar.
fn collect_sequence_elements(ctx: &ParseContext, elements: &mut Vec<RefOr<Element>>) -> Result<()> {
    for node in ctx.xs_children() {
        let child = ctx.child(node);
        match child.local_name() {
            "element" => elements.push(parse_element(&child)?),
            "sequence" => {
                child.occurs()?;
                collect_sequence_elements(&child, elements)?;
            }
            "any" => ctx.skip(node),
            "annotation" => {}
            other => return Err(child.unsupported(format!("{other} in sequence inside choice"))),
        }
    }
    Ok(())
}

pub(super) fn parse_all(ctx: &ParseContext) -> Result<Vec<RefOr<Element>>> {
    let mut elements = Vec::new();
    for node in ctx.xs_children() {
        let child = ctx.child(node);
        match child.local_name() {
            "element" => elements.push(parse_element(&child)?),
            "annotation" => {}
            other => return Err(child.unsupported(other)),
        }
    }
    Ok(elements)
}
