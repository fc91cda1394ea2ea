//! Ortspfade für Fehlermeldungen.
//!
//! Format: lokale Namen der Vorfahren-Elemente, durch Punkte getrennt, jeweils
//! mit dem `name`-Attribut in eckigen Klammern, falls vorhanden:
//! `schema.element[Person].complexType.attribute[firstName]`.

use roxmltree::Node;

/// Dotted location path of `node` from the document root.
pub(crate) fn location(node: Node) -> String {
    let mut segments: Vec<String> = node
        .ancestors()
        .filter(|n| n.is_element())
        .map(|n| match n.attribute("name") {
            Some(name) => format!("{}[{name}]", n.tag_name().name()),
            None => n.tag_name().name().to_string(),
        })
        .collect();
    segments.reverse();
    segments.join(".")
}
