//! xsdres CLI: resolve an XSD document graph and list its definitions.

use clap::Parser;
use std::io::{BufWriter, Write};
use std::process;
use xsdres::{Locator, ParserConfig, Resolution, Resolver};

#[derive(Parser)]
#[command(name = "xsdres", about = "Resolve XSD include/import graphs")]
struct Cli {
    /// Schema-Datei oder HTTP(S)-URL
    source: String,

    /// Match XSD constructs by local name only (ignore the XML Schema namespace)
    #[arg(long)]
    ignore_schema_namespace: bool,

    /// Also list the visited documents in visit order
    #[arg(long)]
    documents: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Fehler: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = ParserConfig::default().with_ignore_schema_namespace(cli.ignore_schema_namespace);
    let root = Locator::parse(&cli.source).map_err(|e| e.to_string())?;
    let resolution = Resolver::new(config)
        .resolve(&root)
        .map_err(|e| e.to_string())?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_summary(&mut out, &resolution, cli.documents)
        .and_then(|()| out.flush())
        .map_err(|e| format!("Schreibfehler: {e}"))
}

/// Eine Zeile pro Definition, `kind {ns}local`, nach Art und Name sortiert.
fn write_summary(out: &mut impl Write, resolution: &Resolution, documents: bool) -> std::io::Result<()> {
    let schema = &resolution.schema;
    for name in schema.types.keys() {
        writeln!(out, "type {name}")?;
    }
    for name in schema.elements.keys() {
        writeln!(out, "element {name}")?;
    }
    for name in schema.attributes.keys() {
        writeln!(out, "attributeGroup {name}")?;
    }
    for name in schema.attribute_declarations.keys() {
        writeln!(out, "attribute {name}")?;
    }
    for name in schema.groups.keys() {
        writeln!(out, "group {name}")?;
    }
    if documents {
        for document in &resolution.documents {
            writeln!(out, "document {}", document.locator)?;
        }
    }
    Ok(())
}
