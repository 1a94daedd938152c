use std::path::PathBuf;

use clap::Parser;
use plist2swift::{
    DEFAULT_IDENTIFIER_KEY, GenerateOptions, Generator, OddKeysMode, read_documents,
};
use plist2swift_cli::{validate_paths, write_output};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

/// Generate a Swift configuration enum from one or more property lists.
///
/// Every document must name itself under the identifier key; that name becomes an enum
/// case and a struct. Keys shared by all documents become required protocol properties,
/// the rest become optional ones.
#[derive(Parser, Debug)]
#[command(name = "plist2swift", author, version, about, long_about = None)]
struct Args {
    /// The documents to read, one per configuration (.plist or .json)
    #[arg(required = true, num_args = 1.., value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Name of the generated enum
    #[arg(short, long)]
    enum_name: String,

    /// The output file to write the Swift source to (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat every key but the identifier as optional when only one document is given
    #[arg(long)]
    force_optional: bool,

    /// Key holding each document's configuration name
    #[arg(long, default_value = DEFAULT_IDENTIFIER_KEY)]
    identifier_key: String,

    /// Print the inferred schemas as JSON instead of Swift source
    #[arg(long)]
    dump_schema: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> GenerateOptions {
        let odd_keys = if self.force_optional {
            OddKeysMode::Forced
        } else {
            OddKeysMode::Inferred
        };

        GenerateOptions::new(&self.enum_name)
            .with_identifier_key(&self.identifier_key)
            .with_odd_keys(odd_keys)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

fn run(args: &Args) -> Result<(), String> {
    validate_paths(&args.files, args.output.as_deref())?;

    let options = args.options();
    options.validate().map_err(|e| e.to_string())?;

    let documents = read_documents(&args.files, &options.identifier_key).map_err(|e| e.to_string())?;
    let generator = Generator::new(&documents, &options).map_err(|e| e.to_string())?;

    // Everything is rendered before the first byte is written.
    let text = if args.dump_schema {
        let mut json = serde_json::to_string_pretty(&generator.report())
            .map_err(|e| format!("Cannot serialize schema: {}", e))?;
        json.push('\n');
        json
    } else {
        generator.generate().map_err(|e| e.to_string())?
    };

    write_output(&text, args.output.as_deref())?;

    match &args.output {
        Some(path) => info!(path = %path.display(), documents = documents.len(), "wrote output"),
        None => debug!(documents = documents.len(), "wrote output to stdout"),
    }
    Ok(())
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version go to stdout and succeed; argument errors exit 1.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
