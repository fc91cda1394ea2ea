//! Flat, multi-document symbol table.
//!
//! [`Schema`] ist die Vereinigung aller Top-Level-Definitionen der Dokumente,
//! die von einem Wurzeldokument per include/import erreichbar sind.
//!
//! # Duplikate
//!
//! Die Vereinigung ist **first-wins**: ein Eintrag, dessen Key bereits
//! existiert, wird still verworfen. Überlappende Includes realer Schemas sind
//! damit kein Fehler. Welches Dokument gewinnt, bestimmt allein die
//! Traversierungsreihenfolge des Resolvers (Includes vor Imports, jeweils in
//! Dokumentreihenfolge). Aufrufer dürfen sich darauf verlassen; eine Änderung
//! zu last-wins oder Fehler-bei-Konflikt wäre ein Kompatibilitätsbruch.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::ast::{
    Attribute, AttributeDeclaration, AttributeGroup, Child, Element, ModelGroup, RefOr, Type, Xsd,
};
use crate::qname::QName;

/// Resolved schema: top-level definitions keyed by qualified name.
///
/// Lookups liefern `Option`: Referenzen über Dokumentgrenzen werden nicht
/// validiert, ein fehlender Eintrag ist Sache des Konsumenten.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub types: BTreeMap<QName, Type>,
    pub elements: BTreeMap<QName, Element>,
    pub attributes: BTreeMap<QName, AttributeGroup>,
    pub attribute_declarations: BTreeMap<QName, AttributeDeclaration>,
    pub groups: BTreeMap<QName, ModelGroup>,
}

fn insert_first<V>(map: &mut BTreeMap<QName, V>, key: QName, value: V) {
    if let Entry::Vacant(slot) = map.entry(key) {
        slot.insert(value);
    }
}

fn merge_first<V>(into: &mut BTreeMap<QName, V>, from: BTreeMap<QName, V>) {
    for (key, value) in from {
        insert_first(into, key, value);
    }
}

impl Schema {
    /// Leeres Schema (neutrales Element der Vereinigung).
    pub fn new() -> Self {
        Self::default()
    }

    /// First-wins union: entries of `self` take precedence over `other`.
    pub fn merge(mut self, other: Schema) -> Schema {
        self.merge_from(other);
        self
    }

    fn merge_from(&mut self, other: Schema) {
        merge_first(&mut self.types, other.types);
        merge_first(&mut self.elements, other.elements);
        merge_first(&mut self.attributes, other.attributes);
        merge_first(&mut self.attribute_declarations, other.attribute_declarations);
        merge_first(&mut self.groups, other.groups);
    }

    pub fn type_(&self, name: &QName) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn element(&self, name: &QName) -> Option<&Element> {
        self.elements.get(name)
    }

    pub fn attribute_group(&self, name: &QName) -> Option<&AttributeGroup> {
        self.attributes.get(name)
    }

    pub fn attribute_declaration(&self, name: &QName) -> Option<&AttributeDeclaration> {
        self.attribute_declarations.get(name)
    }

    pub fn group(&self, name: &QName) -> Option<&ModelGroup> {
        self.groups.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
            && self.elements.is_empty()
            && self.attributes.is_empty()
            && self.attribute_declarations.is_empty()
            && self.groups.is_empty()
    }

    /// Anzahl aller Einträge über alle Tabellen.
    pub fn len(&self) -> usize {
        self.types.len()
            + self.elements.len()
            + self.attributes.len()
            + self.attribute_declarations.len()
            + self.groups.len()
    }
}

/// Projiziert die Top-Level-Definitionen eines Dokuments.
///
/// Die Keys tragen bereits den targetNamespace des definierenden Dokuments.
/// Top-Level-Elemente mit `ref=` tragen nichts bei. Innerhalb eines Dokuments
/// gilt ebenfalls first-wins.
impl From<&Xsd> for Schema {
    fn from(xsd: &Xsd) -> Self {
        let mut schema = Schema::new();
        for child in &xsd.children {
            match child {
                Child::Element(RefOr::Inline(element)) => {
                    insert_first(&mut schema.elements, element.name.clone(), element.clone());
                }
                Child::Type(name, type_) => {
                    insert_first(&mut schema.types, name.clone(), type_.clone());
                }
                Child::Attribute(Attribute::Group(group)) => {
                    insert_first(&mut schema.attributes, group.name.clone(), group.clone());
                }
                Child::Attribute(Attribute::Inline(declaration)) => {
                    insert_first(
                        &mut schema.attribute_declarations,
                        declaration.name.clone(),
                        declaration.clone(),
                    );
                }
                Child::Group(name, group) => {
                    insert_first(&mut schema.groups, name.clone(), group.clone());
                }
                Child::Element(RefOr::Ref(_))
                | Child::Attribute(Attribute::Ref { .. } | Attribute::GroupRef(_))
                | Child::Include(_)
                | Child::Import(_) => {}
            }
        }
        schema
    }
}

impl Extend<Schema> for Schema {
    fn extend<I: IntoIterator<Item = Schema>>(&mut self, iter: I) {
        for fragment in iter {
            self.merge_from(fragment);
        }
    }
}

/// Faltet Fragmente in Iterationsreihenfolge (first-wins).
impl FromIterator<Schema> for Schema {
    fn from_iter<I: IntoIterator<Item = Schema>>(iter: I) -> Self {
        let mut schema = Schema::new();
        schema.extend(iter);
        schema
    }
}
