//! CLI entry point for `sqlrisk`.

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use sqlrisk::catalog::table_catalog::TableCatalog;
use sqlrisk::classifier::model::RuleBasedClassifier;
use sqlrisk::classifier::pipeline;
use sqlrisk::classifier::risk::RiskLabel;
use sqlrisk::corpus::{export, generator};
use sqlrisk::output::formatter;
use sqlrisk::output::report::{self, AnalyzedQuery};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Parser)]
#[command(
    name = "sqlrisk",
    about = "Estimate the cost risk of SQL queries from their text"
)]
struct Cli {
    /// SQL queries to analyze
    #[arg(required_unless_present_any = ["file", "corpus"])]
    queries: Vec<String>,

    /// Read a query from a file (repeatable)
    #[arg(long)]
    file: Vec<PathBuf>,

    /// Table catalog JSON; the built-in reference tables are used otherwise
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output format on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write `<name>_report.md` and `<name>.json` here
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Base name for files written to --output-dir
    #[arg(long, default_value = "sqlrisk")]
    name: String,

    /// Generate a synthetic training corpus with this many queries
    #[arg(long)]
    corpus: Option<usize>,

    /// Seed for corpus generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Where to write the generated corpus
    #[arg(long, default_value = "synthetic.csv")]
    corpus_out: PathBuf,

    /// Print verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let catalog = match &cli.catalog {
        Some(path) => match TableCatalog::load_file(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("Error loading catalog: {e}");
                process::exit(2);
            }
        },
        None => TableCatalog::builtin(),
    };

    if let Some(count) = cli.corpus {
        let records = generator::generate_corpus(count, cli.seed, &catalog);
        if let Err(e) = export::write_corpus_file(&cli.corpus_out, &records) {
            eprintln!("Error writing corpus: {e}");
            process::exit(2);
        }
        eprintln!(
            "Synthetic dataset written to {}",
            cli.corpus_out.display()
        );
    }

    let mut sql_inputs = cli.queries.clone();
    for path in &cli.file {
        match std::fs::read_to_string(path) {
            Ok(content) => sql_inputs.push(content),
            Err(e) => {
                eprintln!("Error reading {}: {e}", path.display());
                process::exit(2);
            }
        }
    }
    if sql_inputs.is_empty() {
        return;
    }

    let classifier = RuleBasedClassifier::new();
    let mut analyzed = Vec::with_capacity(sql_inputs.len());
    for sql in sql_inputs {
        match pipeline::predict(&sql, &catalog, &classifier) {
            Ok(prediction) => analyzed.push(AnalyzedQuery { sql, prediction }),
            Err(e) => {
                eprintln!("Error analyzing query: {e}");
                process::exit(2);
            }
        }
    }

    match cli.format {
        OutputFormat::Text => print!("{}", format_text(&analyzed)),
        OutputFormat::Json => match serde_json::to_string_pretty(&analyzed) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing predictions: {e}");
                process::exit(2);
            }
        },
        OutputFormat::Markdown => print!("{}", report::build_report(&analyzed)),
    }

    if let Some(dir) = &cli.output_dir {
        if let Err(e) = formatter::write_output(dir, &cli.name, &analyzed) {
            eprintln!("Error writing output: {e}");
            process::exit(2);
        }
    }

    if analyzed
        .iter()
        .any(|q| q.prediction.class == RiskLabel::High)
    {
        process::exit(1);
    }
}

fn format_text(analyzed: &[AnalyzedQuery]) -> String {
    let mut out = String::new();
    for query in analyzed {
        let prediction = &query.prediction;
        out.push_str(&format!(
            "[{}] {}\n",
            prediction.class,
            sqlrisk::parser::normalize::normalize(&query.sql)
        ));
        if let Some([low, medium, high]) = prediction.probabilities {
            out.push_str(&format!(
                "  probabilities: low={low:.3} medium={medium:.3} high={high:.3}\n"
            ));
        }
        if let Some(rule) = prediction.overridden_by {
            out.push_str(&format!("  override: {rule}\n"));
        }
        for (name, value) in prediction.metadata.fields() {
            out.push_str(&format!("  {name}: {value}\n"));
        }
    }
    out
}
