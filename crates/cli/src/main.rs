use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use filedater_core::{
    apply_suggestions, confirm_batch, discover_files, generate_plan, load_config,
    load_config_from, present_suggestions, MetadataProviderRegistry, RenamePlan, RenameReport,
    ResolutionConfig,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "filedater")]
#[command(about = "Renames images, videos and documents after the date they were created")]
struct Cli {
    /// Directory with image, video or document files
    directory: PathBuf,
    /// Fixed name appended after the date (dated files only)
    #[arg(short = 'n', long)]
    new_name: Option<String>,
    /// strftime-style pattern for the date part
    #[arg(short = 'f', long)]
    date_format: Option<String>,
    #[arg(short = 'k', long, default_value_t = false)]
    keep_name: bool,
    #[arg(short = 'e', long, default_value_t = false)]
    rename_existing: bool,
    #[arg(short = 's', long, default_value_t = false)]
    include_subfolders: bool,
    #[arg(short = 't', long, default_value_t = false)]
    include_text: bool,
    /// Rename without asking
    #[arg(short = 'y', long, default_value_t = false)]
    yes: bool,
    /// Only list the suggestions
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = resolution_config(&cli)?;
    let files = discover_files(&cli.directory, &config)?;
    if files.is_empty() {
        notice(cli.output, "No files found in this directory.");
        return Ok(());
    }

    let registry = MetadataProviderRegistry::with_defaults();
    let plan = generate_plan(&files, &config, &registry);
    if let Some(warning) = &plan.format_warning {
        eprintln!("{warning}");
    }
    if plan.is_empty() {
        notice(cli.output, "No renaming suggestions found.");
        return Ok(());
    }

    match cli.output {
        OutputFormat::Table => run_batch(
            &plan,
            &cli,
            &mut io::stdin().lock(),
            &mut io::stdout(),
            &mut io::stdout(),
        ),
        OutputFormat::Json => run_batch(
            &plan,
            &cli,
            &mut io::stdin().lock(),
            &mut io::stdout(),
            &mut io::stderr(),
        ),
    }
}

/// Writes the plan to `out`; prompt, dry-run notice and report go to `status`
/// so JSON output stays parseable.
fn run_batch<R: BufRead, W: Write, S: Write>(
    plan: &RenamePlan,
    cli: &Cli,
    input: &mut R,
    out: &mut W,
    status: &mut S,
) -> Result<()> {
    print_plan(plan, cli.output, out)?;
    out.flush()?;

    if cli.dry_run {
        writeln!(status, "Dry run: no files renamed.")?;
        return Ok(());
    }

    let accepted = cli.yes || confirm_batch(input, status)?;
    let report = if accepted {
        apply_suggestions(&plan.suggestions)
    } else {
        RenameReport::default()
    };
    print_report(&report, status)
}

fn notice(format: OutputFormat, message: &str) {
    match format {
        OutputFormat::Table => println!("{message}"),
        OutputFormat::Json => eprintln!("{message}"),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn resolution_config(cli: &Cli) -> Result<ResolutionConfig> {
    let app = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    log::debug!("loaded config: {app:?}");

    let mut config = ResolutionConfig::from_app_config(&app).with_new_name(cli.new_name.clone());
    if let Some(date_format) = &cli.date_format {
        config.date_format = date_format.clone();
    }
    config.keep_name = cli.keep_name;
    config.rename_existing = cli.rename_existing;
    config.include_subfolders = cli.include_subfolders;
    config.include_text = cli.include_text;
    Ok(config)
}

fn print_plan<W: Write>(plan: &RenamePlan, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Table => {
            present_suggestions(plan, out).context("failed to print suggestions")?;
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(plan)?)?;
        }
    }
    Ok(())
}

fn print_report<W: Write>(report: &RenameReport, out: &mut W) -> Result<()> {
    for failure in &report.failures {
        writeln!(out, "{} could not be renamed.", failure.path.display())?;
    }
    writeln!(out, "{} files renamed.", report.renamed_count())?;
    Ok(())
}
