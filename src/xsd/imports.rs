//! Document graph resolver für include/import.
//!
//! Tiefensuche ab einem Wurzeldokument. Jedes Dokument wird genau einmal
//! geholt und geparsed: die Besucht-Menge wird vor jedem Fetch geprüft und
//! gefüllt, damit zyklische und rautenförmige Includes terminieren.
//! Reihenfolge pro Dokument: erst alle Includes, dann alle Imports mit
//! `schemaLocation`, jeweils in Dokumentreihenfolge. Die Fragmente werden in
//! Besuchsreihenfolge first-wins zusammengeführt (siehe [`Schema`]).
//!
//! Fehler beim Holen oder Parsen irgendeines Dokuments brechen die gesamte
//! Auflösung ab; es gibt kein Teilergebnis.

use log::debug;

use crate::FastHashSet;
use crate::ast::Xsd;
use crate::error::{Error, Result};
use crate::locator::Locator;
use crate::options::ParserConfig;
use crate::schema::Schema;
use crate::transport::{DefaultTransport, Transport};

use super::parse_bytes;

/// Ein besuchtes Dokument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub locator: Locator,
    pub xsd: Xsd,
}

/// Result of resolving a document graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// First-wins union of all visited documents.
    pub schema: Schema,
    /// Visited documents in visit order (the root first).
    pub documents: Vec<Document>,
}

/// Zustand einer einzelnen Auflösung. Wird pro [`Resolver::resolve`]-Aufruf
/// neu angelegt und nie geteilt.
#[derive(Default)]
struct Traversal {
    visited: FastHashSet<Locator>,
    documents: Vec<Document>,
}

/// Resolves a root document and everything it includes or imports.
///
/// # Beispiel
///
/// ```no_run
/// use xsdres::{Locator, ParserConfig, Resolver};
///
/// let mut resolver = Resolver::new(ParserConfig::default());
/// let resolution = resolver.resolve(&Locator::parse("schema.xsd")?)?;
/// for document in &resolution.documents {
///     println!("{}", document.locator);
/// }
/// # Ok::<(), xsdres::Error>(())
/// ```
#[derive(Debug)]
pub struct Resolver<T = DefaultTransport> {
    transport: T,
    config: ParserConfig,
}

impl Resolver<DefaultTransport> {
    pub fn new(config: ParserConfig) -> Self {
        Self::with_transport(DefaultTransport::new(), config)
    }
}

impl<T: Transport> Resolver<T> {
    pub fn with_transport(transport: T, config: ParserConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Löst den Dokumentgraphen ab `root` auf.
    pub fn resolve(&mut self, root: &Locator) -> Result<Resolution> {
        let mut traversal = Traversal::default();
        self.visit(root, &mut traversal)?;

        let schema = traversal
            .documents
            .iter()
            .map(|document| Schema::from(&document.xsd))
            .collect();
        debug!(
            "resolved {} document(s) from {root}",
            traversal.documents.len()
        );
        Ok(Resolution {
            schema,
            documents: traversal.documents,
        })
    }

    fn visit(&mut self, locator: &Locator, traversal: &mut Traversal) -> Result<()> {
        if !traversal.visited.insert(locator.clone()) {
            debug!("skipping already visited {locator}");
            return Ok(());
        }

        debug!("fetching {locator}");
        let bytes = self
            .transport
            .fetch(locator)
            .map_err(|e| Error::FetchFailed {
                locator: locator.to_string(),
                cause: e.to_string(),
            })?;
        let xsd = parse_bytes(&self.config, &bytes).map_err(|e| Error::ParseFailed {
            locator: locator.to_string(),
            cause: Box::new(e),
        })?;

        let mut references: Vec<String> =
            xsd.includes().map(|include| include.location.clone()).collect();
        for import in xsd.imports() {
            match &import.location {
                Some(location) => references.push(location.clone()),
                None => debug!(
                    "import of {} in {locator} has no schemaLocation, skipping",
                    import
                        .namespace
                        .as_ref()
                        .map_or("(no namespace)", |ns| ns.as_str())
                ),
            }
        }

        traversal.documents.push(Document {
            locator: locator.clone(),
            xsd,
        });

        for reference in references {
            let next = locator.combine(&reference)?;
            self.visit(&next, traversal)?;
        }
        Ok(())
    }
}

/// Resolves `source` (path or URL) with the default transport and options.
pub fn get_schema(source: &str) -> Result<Schema> {
    let root = Locator::parse(source)?;
    Ok(Resolver::new(ParserConfig::default()).resolve(&root)?.schema)
}
