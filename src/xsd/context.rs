//! Per-node parse context and the attribute/child helpers shared by all
//! construct parsers.

use log::debug;
use roxmltree::Node;

use super::location::location;
use super::scope::{QNameError, Scope};
use crate::ast::{Annotation, MaxOccurs, Occurs, Use};
use crate::error::{Error, Result};
use crate::qname::{QName, XS_NS};

/// `name=` oder `ref=`, genau eines von beiden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameOrRef<'a> {
    Name(&'a str),
    Ref(&'a str),
}

/// Ein XML-Elementknoten zusammen mit der für ihn gültigen Umgebung.
#[derive(Debug, Clone)]
pub(crate) struct ParseContext<'a, 'input> {
    pub(crate) node: Node<'a, 'input>,
    pub(crate) scope: Scope,
}

impl<'a, 'input> ParseContext<'a, 'input> {
    /// Betritt `node`: dessen eigene Namespace-Deklarationen werden dem Scope
    /// des Elternknotens vorangestellt.
    pub(crate) fn enter(node: Node<'a, 'input>, parent: &Scope) -> Self {
        Self {
            node,
            scope: parent.with_namespace_scope(node),
        }
    }

    pub(crate) fn child(&self, node: Node<'a, 'input>) -> Self {
        Self::enter(node, &self.scope)
    }

    pub(crate) fn location(&self) -> String {
        location(self.node)
    }

    pub(crate) fn local_name(&self) -> &'a str {
        self.node.tag_name().name()
    }

    /// Does `node` match one of the `|`-separated local names under the
    /// active namespace discipline?
    pub(crate) fn is_construct(&self, node: Node, names: &str) -> bool {
        is_construct(&self.scope, node, names)
    }

    /// Element children that live in the XML Schema namespace (or all element
    /// children with `ignore_schema_namespace`).
    pub(crate) fn xs_children(&self) -> Vec<Node<'a, 'input>> {
        self.node
            .children()
            .filter(|n| {
                n.is_element()
                    && (self.scope.config().ignore_schema_namespace
                        || n.tag_name().namespace() == Some(XS_NS))
            })
            .collect()
    }

    pub(crate) fn children_named(&self, names: &str) -> Vec<Node<'a, 'input>> {
        self.node
            .children()
            .filter(|n| self.is_construct(*n, names))
            .collect()
    }

    /// Exactly one child out of `names`, otherwise `AmbiguousOrMissingConstruct`.
    pub(crate) fn exactly_one_of(&self, names: &'static str) -> Result<Node<'a, 'input>> {
        let found = self.children_named(names);
        match found.as_slice() {
            [single] => Ok(*single),
            _ => Err(self.ambiguous_construct(names, found.len())),
        }
    }

    /// At most one child out of `names`.
    pub(crate) fn at_most_one_of(&self, names: &'static str) -> Result<Option<Node<'a, 'input>>> {
        let found = self.children_named(names);
        match found.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(*single)),
            _ => Err(self.ambiguous_construct(names, found.len())),
        }
    }

    pub(crate) fn ambiguous_construct(&self, expected: &'static str, found: usize) -> Error {
        Error::AmbiguousOrMissingConstruct {
            location: self.location(),
            expected,
            found,
        }
    }

    pub(crate) fn ambiguous_definition(&self, alternatives: &'static str) -> Error {
        Error::AmbiguousReferenceOrDefinition {
            location: self.location(),
            alternatives,
        }
    }

    pub(crate) fn unsupported(&self, construct: impl Into<String>) -> Error {
        Error::UnsupportedConstruct {
            location: self.location(),
            construct: construct.into(),
        }
    }

    // ========================================================================
    // Attribute
    // ========================================================================

    pub(crate) fn optional(&self, attribute: &str) -> Option<&'a str> {
        self.node.attribute(attribute)
    }

    pub(crate) fn required(&self, attribute: &'static str) -> Result<&'a str> {
        self.node
            .attribute(attribute)
            .ok_or_else(|| Error::MissingAttribute {
                location: self.location(),
                attribute,
            })
    }

    pub(crate) fn name_or_ref(&self) -> Result<NameOrRef<'a>> {
        match (self.optional("name"), self.optional("ref")) {
            (Some(name), None) => Ok(NameOrRef::Name(name)),
            (None, Some(reference)) => Ok(NameOrRef::Ref(reference)),
            _ => Err(self.ambiguous_definition("name|ref")),
        }
    }

    /// Löst einen QName aus einem Attributwert (`type`, `ref`, `base`, ...) auf.
    pub(crate) fn resolve_ref(&self, text: &str) -> Result<QName> {
        self.scope.resolve_prefixed(text).map_err(|e| match e {
            QNameError::UnboundPrefix(prefix) => Error::UnboundPrefix {
                location: self.location(),
                prefix,
                qname: text.to_string(),
            },
            QNameError::Malformed => Error::MalformedQName {
                location: self.location(),
                value: text.to_string(),
            },
        })
    }

    /// `name=` (required), qualified with the current target namespace.
    pub(crate) fn target_name(&self) -> Result<QName> {
        let name = self.required("name")?;
        Ok(self.scope.resolve_target_qualified(name))
    }

    /// Parsed minOccurs/maxOccurs Attribute.
    pub(crate) fn occurs(&self) -> Result<Occurs> {
        let malformed = |value: &str| Error::MalformedOccurs {
            location: self.location(),
            value: value.to_string(),
        };

        let min: u32 = match self.optional("minOccurs") {
            Some(s) => s.trim().parse().map_err(|_| malformed(s))?,
            None => 1,
        };

        let max = match self.optional("maxOccurs").map(str::trim) {
            Some("unbounded") => MaxOccurs::Unbounded,
            Some(s) => s.parse().map(MaxOccurs::Bounded).map_err(|_| malformed(s))?,
            None => MaxOccurs::Bounded(1),
        };

        if let MaxOccurs::Bounded(max_val) = max
            && min > max_val
        {
            return Err(malformed(&format!("minOccurs={min} > maxOccurs={max_val}")));
        }

        Ok(Occurs::new(min, max))
    }

    /// Exactly `true` or `false`; absent means `false`.
    pub(crate) fn boolean(&self, attribute: &'static str) -> Result<bool> {
        match self.optional(attribute) {
            None | Some("false") => Ok(false),
            Some("true") => Ok(true),
            Some(value) => Err(Error::MalformedBoolean {
                location: self.location(),
                attribute,
                value: value.to_string(),
            }),
        }
    }

    pub(crate) fn use_(&self) -> Result<Use> {
        match self.optional("use") {
            None | Some("optional") => Ok(Use::Optional),
            Some("required") => Ok(Use::Required),
            Some("prohibited") => Ok(Use::Prohibited),
            Some(value) => Err(Error::MalformedUse {
                location: self.location(),
                value: value.to_string(),
            }),
        }
    }

    // ========================================================================
    // Annotationen
    // ========================================================================

    /// Sammelt alle `documentation`-Texte unter direkten `annotation`-Kindern,
    /// in Dokumentreihenfolge, unabhängig von der Anzahl der `annotation`-Elemente.
    pub(crate) fn annotations(&self) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        for annotation in self.children_named("annotation") {
            for documentation in annotation
                .children()
                .filter(|n| self.is_construct(*n, "documentation"))
            {
                let text: String = documentation
                    .descendants()
                    .filter(|n| n.is_text())
                    .filter_map(|n| n.text())
                    .collect();
                annotations.push(Annotation::Documentation(text.trim().to_string()));
            }
        }
        annotations
    }

    /// Für Kinder, die das Modell nicht abbildet (Wildcards, appinfo, ...).
    pub(crate) fn skip(&self, node: Node) {
        debug!(
            "skipping {} at {}",
            node.tag_name().name(),
            location(node)
        );
    }
}

pub(crate) fn is_construct(scope: &Scope, node: Node, names: &str) -> bool {
    node.is_element()
        && names.split('|').any(|name| name == node.tag_name().name())
        && (scope.config().ignore_schema_namespace || node.tag_name().namespace() == Some(XS_NS))
}
