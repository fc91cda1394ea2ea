//! Lexical namespace scope for QName resolution.
//!
//! Ein [`Scope`] ist ein unveränderlicher Wert, der in jeden Parser-Aufruf
//! hineingereicht wird. Vor dem Abstieg in Kinder wird er lokal erweitert
//! ([`Scope::with_namespace_scope`]) und beim Verlassen implizit verworfen.
//! Die Prefix-Bindungen sind eine persistente Liste: innere Deklarationen
//! werden vorne angehängt und überdecken äußere.

use std::rc::Rc;

use roxmltree::Node;

use crate::options::ParserConfig;
use crate::qname::{Namespace, QName, XML_NS};

/// Ein Glied der Prefix-Bindungsliste. `prefix = None` ist der Default-Namespace,
/// `namespace = None` eine Aufhebung (`xmlns=""`).
#[derive(Debug)]
struct Binding {
    prefix: Option<String>,
    namespace: Option<Namespace>,
    next: Option<Rc<Binding>>,
}

/// Why a lexical QName could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum QNameError {
    UnboundPrefix(String),
    Malformed,
}

/// Resolution environment: target namespace, prefix bindings, parser options.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    target_namespace: Option<Namespace>,
    bindings: Option<Rc<Binding>>,
    config: ParserConfig,
}

impl Scope {
    /// Wurzel-Umgebung: kein targetNamespace, keine Bindungen.
    pub(crate) fn root(config: ParserConfig) -> Self {
        Self {
            target_namespace: None,
            bindings: None,
            config,
        }
    }

    pub(crate) fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub(crate) fn target_namespace(&self) -> Option<&Namespace> {
        self.target_namespace.as_ref()
    }

    /// Overrides the target namespace; used when entering a `schema` element.
    pub(crate) fn with_target_namespace(&self, namespace: Option<Namespace>) -> Self {
        Self {
            target_namespace: namespace,
            bindings: self.bindings.clone(),
            config: self.config,
        }
    }

    /// Prepends the `xmlns`/`xmlns:p` declarations made on `node` itself.
    ///
    /// roxmltree liefert pro Element alle sichtbaren Namespaces; eigene
    /// Deklarationen sind die, die beim Elternelement nicht identisch sichtbar
    /// sind.
    pub(crate) fn with_namespace_scope(&self, node: Node) -> Self {
        let parent = node.parent_element();
        let mut bindings = self.bindings.clone();

        for ns in node.namespaces() {
            let inherited = parent.is_some_and(|p| {
                p.namespaces()
                    .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
            });
            if inherited {
                continue;
            }
            bindings = Some(Rc::new(Binding {
                prefix: ns.name().map(str::to_string),
                namespace: (!ns.uri().is_empty()).then(|| Namespace::from(ns.uri())),
                next: bindings,
            }));
        }

        // xmlns="" hebt den Default-Namespace des Elternelements auf
        if let Some(parent) = parent
            && parent.namespaces().any(|ns| ns.name().is_none())
            && !node.namespaces().any(|ns| ns.name().is_none())
        {
            bindings = Some(Rc::new(Binding {
                prefix: None,
                namespace: None,
                next: bindings,
            }));
        }

        Self {
            target_namespace: self.target_namespace.clone(),
            bindings,
            config: self.config,
        }
    }

    /// Erste passende Bindung von innen nach außen.
    fn lookup(&self, prefix: Option<&str>) -> Option<Option<&Namespace>> {
        let mut current = self.bindings.as_deref();
        while let Some(binding) = current {
            if binding.prefix.as_deref() == prefix {
                return Some(binding.namespace.as_ref());
            }
            current = binding.next.as_deref();
        }
        None
    }

    /// Resolves a lexical (possibly prefixed) name from an attribute value.
    ///
    /// Ohne Prefix gilt der Default-Namespace, falls gebunden, sonst kein
    /// Namespace. Der Prefix `xml` ist implizit gebunden.
    pub(crate) fn resolve_prefixed(&self, text: &str) -> Result<QName, QNameError> {
        let text = text.trim();
        let mut parts = text.split(':');
        let first = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (None, _) => {
                if first.is_empty() {
                    return Err(QNameError::Malformed);
                }
                let namespace = self.lookup(None).flatten().cloned();
                Ok(QName::new(namespace, first))
            }
            (Some(local), None) => {
                if first.is_empty() || local.is_empty() {
                    return Err(QNameError::Malformed);
                }
                if first == "xml" {
                    return Ok(QName::qualified(XML_NS, local));
                }
                match self.lookup(Some(first)) {
                    Some(Some(namespace)) => Ok(QName::new(Some(namespace.clone()), local)),
                    _ => Err(QNameError::UnboundPrefix(first.to_string())),
                }
            }
            (Some(_), Some(_)) => Err(QNameError::Malformed),
        }
    }

    /// Attaches the current target namespace to a `name=` value.
    pub(crate) fn resolve_target_qualified(&self, local: &str) -> QName {
        QName::new(self.target_namespace.clone(), local.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    fn find<'a, 'input>(doc: &'a Document<'input>, name: &str) -> Node<'a, 'input> {
        doc.descendants()
            .find(|n| n.is_element() && n.attribute("name") == Some(name))
            .unwrap()
    }

    /// Scope entlang der Vorfahrenkette aufbauen, wie es die Parser tun.
    fn scope_at(node: Node) -> Scope {
        let chain: Vec<Node> = node.ancestors().filter(|n| n.is_element()).collect();
        chain
            .into_iter()
            .rev()
            .fold(Scope::root(ParserConfig::default()), |scope, n| {
                scope.with_namespace_scope(n)
            })
    }

    const DOC: &str = r#"
        <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns="urn:default">
            <xs:element name="outer">
                <xs:complexType xmlns:tns="urn:x">
                    <xs:attribute name="inner" xmlns:tns="urn:shadow"/>
                    <xs:attribute name="plain"/>
                </xs:complexType>
            </xs:element>
            <xs:element name="sibling"/>
            <xs:element name="undeclared" xmlns=""/>
        </xs:schema>
    "#;

    #[test]
    fn prefixed_name_in_declaring_ancestor_scope() {
        let doc = Document::parse(DOC).unwrap();
        let scope = scope_at(find(&doc, "plain"));
        assert_eq!(
            scope.resolve_prefixed("tns:Foo"),
            Ok(QName::qualified("urn:x", "Foo"))
        );
    }

    #[test]
    fn prefixed_name_outside_scope_is_unbound() {
        let doc = Document::parse(DOC).unwrap();
        let scope = scope_at(find(&doc, "sibling"));
        assert_eq!(
            scope.resolve_prefixed("tns:Foo"),
            Err(QNameError::UnboundPrefix("tns".to_string()))
        );
    }

    #[test]
    fn inner_declaration_shadows_outer() {
        let doc = Document::parse(DOC).unwrap();
        let scope = scope_at(find(&doc, "inner"));
        assert_eq!(
            scope.resolve_prefixed("tns:Foo"),
            Ok(QName::qualified("urn:shadow", "Foo"))
        );
    }

    #[test]
    fn unprefixed_uses_default_namespace() {
        let doc = Document::parse(DOC).unwrap();
        let scope = scope_at(find(&doc, "sibling"));
        assert_eq!(
            scope.resolve_prefixed("Foo"),
            Ok(QName::qualified("urn:default", "Foo"))
        );
    }

    #[test]
    fn unprefixed_without_default_has_no_namespace() {
        let scope = Scope::root(ParserConfig::default());
        assert_eq!(scope.resolve_prefixed("Foo"), Ok(QName::unqualified("Foo")));
    }

    #[test]
    fn empty_default_declaration_removes_default() {
        let doc = Document::parse(DOC).unwrap();
        let scope = scope_at(find(&doc, "undeclared"));
        assert_eq!(scope.resolve_prefixed("Foo"), Ok(QName::unqualified("Foo")));
    }

    #[test]
    fn xml_prefix_is_implicit() {
        let scope = Scope::root(ParserConfig::default());
        assert_eq!(
            scope.resolve_prefixed("xml:lang"),
            Ok(QName::qualified(XML_NS, "lang"))
        );
    }

    #[test]
    fn malformed_qnames() {
        let scope = Scope::root(ParserConfig::default());
        for text in ["a:b:c", ":b", "a:", "", "  "] {
            assert_eq!(scope.resolve_prefixed(text), Err(QNameError::Malformed), "{text:?}");
        }
    }

    #[test]
    fn target_qualified_uses_target_namespace_not_prefixes() {
        let doc = Document::parse(DOC).unwrap();
        let scope = scope_at(find(&doc, "plain")).with_target_namespace(Some("urn:t".into()));
        assert_eq!(
            scope.resolve_target_qualified("Foo"),
            QName::qualified("urn:t", "Foo")
        );
        let none = scope.with_target_namespace(None);
        assert_eq!(none.resolve_target_qualified("Foo"), QName::unqualified("Foo"));
        assert_eq!(scope.target_namespace().map(Namespace::as_str), Some("urn:t"));
    }
}
