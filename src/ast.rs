//! Typed AST of one XML Schema document.
//!
//! Alle Knoten sind unveränderliche Wertebäume: ein Elternknoten besitzt
//! seine Kinder. Referenzen ([`RefOr::Ref`]) sind reine QName-Werte, die
//! später gegen die flache [`Schema`](crate::schema::Schema)-Tabelle
//! aufgelöst werden, nie Rückzeiger.

use crate::qname::{Namespace, QName};

// ============================================================================
// Referenz oder Inline-Definition
// ============================================================================

/// Either a reference to a named definition or a definition given in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefOr<T> {
    Ref(QName),
    Inline(T),
}

impl<T> RefOr<T> {
    pub fn as_ref_name(&self) -> Option<&QName> {
        match self {
            Self::Ref(name) => Some(name),
            Self::Inline(_) => None,
        }
    }

    pub fn as_inline(&self) -> Option<&T> {
        match self {
            Self::Ref(_) => None,
            Self::Inline(value) => Some(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RefOr<U> {
        match self {
            Self::Ref(name) => RefOr::Ref(name),
            Self::Inline(value) => RefOr::Inline(f(value)),
        }
    }
}

// ============================================================================
// Dokument
// ============================================================================

/// Per-document AST: target namespace plus top-level children in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Xsd {
    pub target_namespace: Option<Namespace>,
    pub children: Vec<Child>,
}

impl Xsd {
    pub fn includes(&self) -> impl Iterator<Item = &Include> {
        self.children.iter().filter_map(|child| match child {
            Child::Include(include) => Some(include),
            _ => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.children.iter().filter_map(|child| match child {
            Child::Import(import) => Some(import),
            _ => None,
        })
    }
}

/// Top-level child of a `schema` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Element(RefOr<Element>),
    /// Named `simpleType` or `complexType`.
    Type(QName, Type),
    Include(Include),
    Import(Import),
    /// Named attribute group ([`Attribute::Group`]) or global attribute
    /// declaration ([`Attribute::Inline`]).
    Attribute(Attribute),
    /// Named model group (`xs:group name=`).
    Group(QName, ModelGroup),
}

/// `xs:include`: same target namespace, `schemaLocation` required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub location: String,
}

/// `xs:import`: a different (or absent) target namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub location: Option<String>,
    pub namespace: Option<Namespace>,
}

/// Dokumentationstext aus `annotation/documentation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Documentation(String),
}

// ============================================================================
// Elemente
// ============================================================================

/// Obergrenze für Wiederholungen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

/// `(minOccurs, maxOccurs)`; default `(1, Bounded(1))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    pub min: u32,
    pub max: MaxOccurs,
}

impl Default for Occurs {
    fn default() -> Self {
        Self {
            min: 1,
            max: MaxOccurs::Bounded(1),
        }
    }
}

impl Occurs {
    pub fn new(min: u32, max: MaxOccurs) -> Self {
        Self { min, max }
    }

    pub fn is_optional(&self) -> bool {
        self.min == 0
    }

    pub fn is_repeated(&self) -> bool {
        !matches!(self.max, MaxOccurs::Bounded(0 | 1))
    }
}

/// Element declaration (top-level or local).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QName,
    pub type_: RefOr<Type>,
    pub annotations: Vec<Annotation>,
    pub occurs: Occurs,
    pub nillable: bool,
}

// ============================================================================
// Typen
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Simple(SimpleType),
    Complex(ComplexType),
}

impl Type {
    pub fn annotations(&self) -> &[Annotation] {
        match self {
            Self::Simple(simple) => simple.annotations(),
            Self::Complex(complex) => &complex.annotations,
        }
    }
}

/// Variety of a simple type with its annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleType {
    Atomic(SimpleRestriction, Vec<Annotation>),
    List(Box<RefOr<SimpleType>>, Vec<Annotation>),
    Union(Vec<RefOr<SimpleType>>, Vec<Annotation>),
}

impl SimpleType {
    pub fn annotations(&self) -> &[Annotation] {
        match self {
            Self::Atomic(_, annotations)
            | Self::List(_, annotations)
            | Self::Union(_, annotations) => annotations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRestriction {
    pub base: Box<RefOr<SimpleType>>,
    pub constraints: Vec<Constraint>,
}

impl SimpleRestriction {
    /// Nur die Enumerationswerte, in Dokumentreihenfolge.
    pub fn enumeration_values(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().filter_map(|c| match c {
            Constraint::Enumeration { value, .. } => Some(value.as_str()),
            Constraint::Facet { .. } => None,
        })
    }
}

/// Restriction facet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Enumeration {
        value: String,
        annotations: Vec<Annotation>,
    },
    Facet {
        facet: Facet,
        value: String,
    },
}

/// Constraining facets other than `enumeration` (XSD 1.0 Part 2 §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Length,
    MinLength,
    MaxLength,
    Pattern,
    WhiteSpace,
    MinInclusive,
    MaxInclusive,
    MinExclusive,
    MaxExclusive,
    TotalDigits,
    FractionDigits,
}

impl Facet {
    pub fn from_local_name(name: &str) -> Option<Self> {
        Some(match name {
            "length" => Self::Length,
            "minLength" => Self::MinLength,
            "maxLength" => Self::MaxLength,
            "pattern" => Self::Pattern,
            "whiteSpace" => Self::WhiteSpace,
            "minInclusive" => Self::MinInclusive,
            "maxInclusive" => Self::MaxInclusive,
            "minExclusive" => Self::MinExclusive,
            "maxExclusive" => Self::MaxExclusive,
            "totalDigits" => Self::TotalDigits,
            "fractionDigits" => Self::FractionDigits,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexType {
    pub annotations: Vec<Annotation>,
    pub mixed: bool,
    pub content: Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Plain(PlainContent),
    Simple(SimpleContent),
    Complex(ComplexContent),
}

/// Complex type body without `simpleContent`/`complexContent`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlainContent {
    pub model: Option<ModelGroup>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleContent {
    Restriction(SimpleRestriction),
    Extension(SimpleExtension),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleExtension {
    pub base: QName,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplexContent {
    Restriction(ComplexDerivation),
    Extension(ComplexDerivation),
}

impl ComplexContent {
    pub fn derivation(&self) -> &ComplexDerivation {
        match self {
            Self::Restriction(d) | Self::Extension(d) => d,
        }
    }
}

/// Body of a `complexContent` restriction or extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexDerivation {
    pub base: QName,
    pub model: Option<ModelGroup>,
    pub attributes: Vec<Attribute>,
}

// ============================================================================
// Model Groups
// ============================================================================

/// `sequence`, `choice` or `all`. `Ref` children are `xs:group ref=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelGroup {
    Sequence(Vec<RefOr<SequenceChild>>),
    Choice(Vec<RefOr<ChoiceChild>>),
    All(Vec<RefOr<Element>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceChild {
    ChoiceGroup(Vec<RefOr<ChoiceChild>>),
    ElementGroup(Vec<RefOr<Element>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceChild {
    ElementGroup(Vec<RefOr<Element>>),
}

// ============================================================================
// Attribute
// ============================================================================

/// `use` eines Attributs; Default `Optional`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Use {
    #[default]
    Optional,
    Required,
    Prohibited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Inline(AttributeDeclaration),
    Ref { name: QName, use_: Use },
    GroupRef(QName),
    Group(AttributeGroup),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDeclaration {
    pub name: QName,
    pub use_: Use,
    pub fixed: Option<String>,
    pub default: Option<String>,
    pub type_: RefOr<SimpleType>,
}

/// Named attribute group with its (possibly nested) attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeGroup {
    pub name: QName,
    pub attributes: Vec<Attribute>,
}
