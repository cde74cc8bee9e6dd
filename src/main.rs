//! Command-line interface for xsdgen

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use xsdgen::locations::Location;
#[cfg(feature = "cli")]
use xsdgen::writers::CacheWriter;
#[cfg(feature = "cli")]
use xsdgen::xsd::SchemaReader;

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsdgen")]
#[command(author, version, about = "XSD to TypeScript/JavaScript conversion tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an XSD schema into TypeScript and JavaScript modules
    Convert {
        /// Path to the root XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: String,

        /// Output definitions and modules under <path>
        #[arg(short, long, default_value = "xmlns")]
        out: String,

        /// Output TypeScript definitions under <path> (overrides --out)
        #[arg(short = 't', long)]
        out_ts: Option<String>,

        /// Output JavaScript modules under <path> (overrides --out)
        #[arg(short = 'j', long)]
        out_js: Option<String>,

        /// Namespace to use when the schema defines none
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Inspect an XSD schema and display the exported type model
    Inspect {
        /// Path to the XSD schema file
        #[arg(value_name = "SCHEMA")]
        schema: String,

        /// Namespace to use when the schema defines none
        #[arg(short, long)]
        namespace: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            schema,
            out,
            out_ts,
            out_js,
            namespace,
        } => cmd_convert(schema, out, out_ts, out_js, namespace),
        Commands::Inspect {
            schema,
            namespace,
            json,
        } => cmd_inspect(schema, namespace, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn read_schema(
    schema: &str,
    namespace: Option<String>,
) -> Result<xsdgen::Spec, Box<dyn std::error::Error>> {
    let location = Location::from_str(schema)?;
    let mut reader = SchemaReader::new();
    if let Some(namespace) = namespace {
        reader = reader.with_fallback_namespace(namespace);
    }
    Ok(reader.read(&location)?)
}

#[cfg(feature = "cli")]
fn cmd_convert(
    schema: String,
    out: String,
    out_ts: Option<String>,
    out_js: Option<String>,
    namespace: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec = read_schema(&schema, namespace)?;

    let ts_root = PathBuf::from(out_ts.unwrap_or_else(|| out.clone()));
    let js_root = PathBuf::from(out_js.unwrap_or_else(|| out.clone()));

    let mut declarations = CacheWriter::new(&ts_root);
    let mut implementations = CacheWriter::new(&js_root);

    let emitted = xsdgen::generate(spec, &mut declarations, &mut implementations)?;

    println!("Generated {} output units", emitted.unit_count());
    for unit in declarations.written() {
        println!("  {}", ts_root.join(unit).display());
    }
    for unit in implementations.written() {
        println!("  {}", js_root.join(unit).display());
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_inspect(
    schema: String,
    namespace: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec = read_schema(&schema, namespace)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&spec.summary())?);
        return Ok(());
    }

    println!("xsdgen v{}", xsdgen::VERSION);
    println!();
    println!("Namespaces: {}", spec.namespace_count());
    println!("Exported types: {}", spec.type_count());

    for ns in spec.namespaces() {
        println!();
        println!("Namespace: {}", ns.uri);
        if let Some(ref short) = ns.short {
            println!("  Short name: {}", short);
        }
        println!("  Module: {}", ns.module_stem().display());
        for type_spec in &ns.types {
            println!(
                "  {} ({}, {} members)",
                type_spec.name,
                type_spec.kind.label(),
                type_spec.members.len()
            );
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
