//! Campus CLI - college list reconciliation tool

use anyhow::{Context, Result};
use campus_reconcile::{
    build_oracle, candidate_payload_from_names, extract_line_candidates, filter_candidates,
    ground_truth_names, run, AliasOracle, ColumnRef, NameOracle, OracleOptions, OracleProvider,
    ReconcileOptions, WorkbookSource,
};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "campus")]
#[command(
    author,
    version,
    about = "Reconcile college names against a spreadsheet and merge them in"
)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Less log output (-q warnings only, -qq errors only)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge candidate colleges into the sheet and write a highlighted copy
    Merge(MergeArgs),

    /// Print the ground-truth names read from a sheet
    Names {
        /// Source spreadsheet (xlsx)
        #[arg(short, long)]
        sheet: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Print the candidate payload found in a text file
    Candidates {
        /// Text file with one college per line
        #[arg(short, long)]
        text: PathBuf,

        /// Oracle that filters the matched lines: gemini, alias or none
        #[arg(long)]
        oracle: Option<String>,
    },
}

#[derive(Args)]
struct MergeArgs {
    /// Source spreadsheet (xlsx)
    #[arg(short, long)]
    sheet: PathBuf,

    /// Candidate payload, `{"colleges": [...]}`
    #[arg(short, long, conflicts_with = "text", required_unless_present = "text")]
    candidates: Option<PathBuf>,

    /// Text file to pull candidate names from instead of a payload
    #[arg(short, long)]
    text: Option<PathBuf>,

    /// Output file name (".xlsx" is appended when missing)
    #[arg(short, long)]
    output: Option<String>,

    /// Options file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Name oracle: gemini, alias or none
    #[arg(long)]
    oracle: Option<String>,

    /// TOML table of `alias = "canonical"` pairs for the alias oracle
    #[arg(long)]
    alias_file: Option<PathBuf>,
}

#[derive(Args)]
struct LayoutArgs {
    /// Rows above the data copied as headers
    #[arg(long)]
    header_rows: Option<u32>,

    /// Column holding college names, as a letter or 1-based number
    #[arg(long)]
    name_column: Option<ColumnRef>,

    /// First data row (1-based)
    #[arg(long)]
    data_start_row: Option<u32>,
}

impl LayoutArgs {
    fn apply(&self, options: &mut ReconcileOptions) {
        if let Some(rows) = self.header_rows {
            options.header_rows = rows;
        }
        if let Some(column) = &self.name_column {
            options.name_column = column.clone();
        }
        if self.data_start_row.is_some() {
            options.data_start_row = self.data_start_row;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Merge(args) => merge(args),
        Commands::Names { sheet, layout } => list_names(&sheet, &layout),
        Commands::Candidates { text, oracle } => print_candidates(&text, oracle.as_deref()),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if verbose > 0 || quiet > 0 {
        let level = match 3 + i16::from(verbose) - i16::from(quiet) {
            i16::MIN..=0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Error,
            2 => log::LevelFilter::Warn,
            3 => log::LevelFilter::Info,
            4 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        builder.filter_level(level);
    }
    builder.init();
}

fn merge(args: MergeArgs) -> Result<()> {
    let mut options = match &args.config {
        Some(path) => ReconcileOptions::load(path)
            .with_context(|| format!("Failed to load options from '{}'", path.display()))?,
        None => ReconcileOptions::default(),
    };
    args.layout.apply(&mut options);
    if let Some(output) = args.output {
        options.output = output;
    }

    if let Some(path) = &args.alias_file {
        let table = AliasOracle::load_table(path)
            .with_context(|| format!("Failed to load aliases from '{}'", path.display()))?;
        options.oracle.aliases.extend(table);
        options.oracle.provider = OracleProvider::Alias;
    }
    if let Some(provider) = &args.oracle {
        options.oracle.provider = provider.parse()?;
    }

    let oracle = build_oracle(&options.oracle);
    log::debug!("using oracle '{}'", oracle.name());

    let payload = match (&args.candidates, &args.text) {
        (Some(path), _) => read_text(path)?,
        (None, Some(path)) => text_payload(oracle.as_ref(), path)?,
        (None, None) => anyhow::bail!("Either --candidates or --text is required"),
    };

    let report = run(
        &options,
        &WorkbookSource::Path(args.sheet.clone()),
        &payload,
        oracle.as_ref(),
    )
    .with_context(|| format!("Failed to merge into '{}'", args.sheet.display()))?;

    if let Some(err) = &report.payload_error {
        eprintln!("Warning: candidate payload ignored: {}", err);
    }
    if report.outcome.is_fallback() {
        eprintln!("Warning: names were not normalized: {}", report.outcome);
    }

    println!("Output: {}", report.output.display());
    println!("Candidates: {} ({})", report.candidate_count, report.outcome);
    println!("Rows: {}", report.summary.total);
    println!("  Matched: {}", report.summary.matched);
    println!("  Added: {}", report.summary.added);
    println!("  Unmatched: {}", report.summary.unmatched);

    Ok(())
}

fn list_names(sheet: &Path, layout: &LayoutArgs) -> Result<()> {
    let mut options = ReconcileOptions::default();
    layout.apply(&mut options);
    let layout = options.validate()?;

    let names = ground_truth_names(&WorkbookSource::Path(sheet.to_path_buf()), &layout)
        .with_context(|| format!("Failed to read '{}'", sheet.display()))?;
    for name in &names {
        println!("{}", name);
    }
    Ok(())
}

fn print_candidates(text: &Path, provider: Option<&str>) -> Result<()> {
    let payload = match provider {
        Some(provider) => {
            let options = OracleOptions {
                provider: provider.parse()?,
                ..Default::default()
            };
            text_payload(build_oracle(&options).as_ref(), text)?
        }
        None => {
            let lines = extract_line_candidates(&read_text(text)?);
            candidate_payload_from_names(lines.iter().map(String::as_str))
        }
    };
    println!("{}", payload);
    Ok(())
}

/// Candidate payload for a text file: heuristic lines, then the oracle's filter
fn text_payload(oracle: &dyn NameOracle, path: &Path) -> Result<String> {
    let lines = extract_line_candidates(&read_text(path)?);
    let filtered = filter_candidates(oracle, lines.iter().map(String::as_str));
    if filtered.outcome.is_fallback() {
        eprintln!("Warning: candidate lines were not filtered: {}", filtered.outcome);
    }
    Ok(candidate_payload_from_names(
        filtered.names.iter().map(String::as_str),
    ))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_layout_flags_override_options() {
        let cli = Cli::try_parse_from([
            "campus",
            "merge",
            "--sheet",
            "colleges.xlsx",
            "--text",
            "notes.txt",
            "--header-rows",
            "1",
            "--name-column",
            "C",
        ])
        .unwrap();

        let Commands::Merge(args) = cli.command else {
            panic!("expected merge");
        };
        let mut options = ReconcileOptions::default();
        args.layout.apply(&mut options);
        assert_eq!(options.header_rows, 1);
        assert_eq!(options.name_column, ColumnRef::Letters("C".into()));
        assert_eq!(options.data_start_row, None);
        assert_eq!(options.validate().unwrap().name_column, 3);
    }

    #[test]
    fn test_merge_needs_one_candidate_source() {
        assert!(Cli::try_parse_from(["campus", "merge", "--sheet", "a.xlsx"]).is_err());
        assert!(Cli::try_parse_from([
            "campus",
            "merge",
            "--sheet",
            "a.xlsx",
            "--candidates",
            "c.json",
            "--text",
            "t.txt",
        ])
        .is_err());
    }

    #[test]
    fn test_text_payload_is_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Colleges to discuss\nBrown\n● Visited Yale\nMIT - reach\n").unwrap();

        let oracle = campus_reconcile::FnOracle::new("filter", |request: &campus_reconcile::OracleRequest| {
            let kept: Vec<&str> = request
                .candidates
                .iter()
                .map(String::as_str)
                .filter(|line| !line.starts_with("Colleges"))
                .collect();
            Ok(candidate_payload_from_names(kept))
        });
        let payload = text_payload(&oracle, &path).unwrap();
        let names = campus_reconcile::parse_candidate_payload(&payload).unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["Brown", "MIT"]);

        // Without an oracle the heuristic lines pass through
        let payload = text_payload(&campus_reconcile::NoOracle, &path).unwrap();
        assert!(payload.contains("Colleges to discuss"));
    }

    #[test]
    fn test_candidates_oracle_flag() {
        let cli = Cli::try_parse_from(["campus", "candidates", "-t", "notes.txt"]).unwrap();
        let Commands::Candidates { oracle, .. } = cli.command else {
            panic!("expected candidates");
        };
        assert_eq!(oracle, None);

        let cli = Cli::try_parse_from(["campus", "candidates", "-t", "n.txt", "--oracle", "gemini"])
            .unwrap();
        let Commands::Candidates { oracle, .. } = cli.command else {
            panic!("expected candidates");
        };
        assert_eq!(oracle.as_deref(), Some("gemini"));
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = Cli::try_parse_from(["campus", "names", "-s", "a.xlsx", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.quiet, 0);
    }
}
