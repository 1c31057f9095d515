//! `mm2owl`: metamodel to OWL command-line interface.
//!
//! - **`convert`**: validate a metamodel document and write it as Turtle,
//!   RDF/XML or JSON-LD.
//! - **`validate`**: check a document against the schema contract only.
//!
//! Both subcommands read YAML from a file path or from stdin (`-`). Every
//! conversion option can also be set through an `MM2OWL_*` environment
//! variable; flags take precedence.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use metamodel2owl::document::read_source;
use metamodel2owl::{
    convert_with, parse_prefixes, validate_source, ConversionError, ConversionOptions, Format,
    MetamodelSchema, Result, DEFAULT_BASE_IRI,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// mm2owl: convert metamodel YAML into OWL/SKOS ontologies
#[derive(Parser, Debug)]
#[command(name = "mm2owl", version, about, long_about = None)]
struct Cli {
    /// Log pipeline progress to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a metamodel document into an ontology.
    ///
    /// Writes to stdout unless --output is given. Nothing is written when the
    /// document is rejected.
    Convert(ConvertArgs),

    /// Check a metamodel document against the schema contract.
    ///
    /// Prints `valid` and exits 0, or lists every violation and exits 1.
    Validate {
        /// Path to a YAML file, or `-` for stdin.
        input: PathBuf,

        /// Meta keys the document must declare. Comma-separated or repeated.
        #[arg(long = "require-meta", value_name = "KEY", value_delimiter = ',')]
        require_meta: Vec<String>,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Path to a YAML file, or `-` for stdin.
    input: PathBuf,

    /// Destination file. Parent directories are created as needed.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Namespace every resource is minted under.
    #[arg(long, env = "MM2OWL_BASE_IRI", default_value = DEFAULT_BASE_IRI)]
    base_iri: String,

    /// Identifier of the ontology resource [default: <BASE_IRI>ontology]
    #[arg(long, env = "MM2OWL_ONTOLOGY_IRI")]
    ontology_iri: Option<String>,

    /// Output encoding: turtle | rdfxml | jsonld
    #[arg(short, long, env = "MM2OWL_FORMAT", default_value = "turtle")]
    format: Format,

    /// Extra prefix binding. Comma-separated or repeated.
    #[arg(
        long = "prefix",
        env = "MM2OWL_PREFIXES",
        value_name = "PREFIX=IRI",
        value_delimiter = ','
    )]
    prefixes: Vec<String>,

    /// Emit OWL cardinality restrictions for attributes.
    #[arg(long, env = "MM2OWL_USE_CARDINALITIES")]
    use_cardinalities: bool,

    /// Emit SKOS labels, definitions and scope notes.
    #[arg(long, env = "MM2OWL_SKOS_TAGS")]
    skos_tags: bool,

    /// Meta keys the document must declare. Comma-separated or repeated.
    #[arg(long = "require-meta", value_name = "KEY", value_delimiter = ',')]
    require_meta: Vec<String>,
}

impl ConvertArgs {
    fn options(&self) -> Result<ConversionOptions> {
        let mut options = ConversionOptions::new(&self.base_iri)?
            .with_prefixes(parse_prefixes(&self.prefixes)?)
            .with_cardinalities(self.use_cardinalities)
            .with_skos_tags(self.skos_tags)
            .with_format(self.format);
        if let Some(iri) = &self.ontology_iri {
            options = options.with_ontology_iri(iri)?;
        }
        Ok(options)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = run(cli.command) {
        fatal(&e);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "metamodel2owl=debug,mm2owl=debug"
    } else {
        "metamodel2owl=warn,mm2owl=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Convert(args) => {
            let options = args.options()?;
            let schema = MetamodelSchema::new().with_required_meta(&args.require_meta);
            let source = read_input(&args.input)?;
            let out = convert_with(&source, &options, &schema)?;
            match &args.output {
                Some(path) => write_output(path, &out)?,
                None if out.ends_with('\n') => print!("{}", out),
                None => println!("{}", out),
            }
            Ok(())
        }

        Command::Validate {
            input,
            require_meta,
        } => {
            let schema = MetamodelSchema::new().with_required_meta(require_meta);
            let source = read_input(&input)?;
            let violations = validate_source(&source, &schema)?;
            if !violations.is_empty() {
                return Err(ConversionError::SchemaValidation(violations));
            }
            println!("valid");
            Ok(())
        }
    }
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &Path) -> Result<String> {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|_| ConversionError::InputNotFound(path.to_path_buf()))?;
        Ok(buf)
    } else {
        read_source(path)
    }
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    let output_error = |source| ConversionError::Output {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_error)?;
    }
    fs::write(path, contents).map_err(output_error)?;
    info!(path = %path.display(), bytes = contents.len(), "ontology written");
    Ok(())
}

/// Print an error to stderr and exit with code 1.
fn fatal(err: &ConversionError) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1);
}
