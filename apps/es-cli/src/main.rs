use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use es_app::{
    AppResult, NodeStateReport, RunConfig, RunStart, RunSummary, StepObserver,
    load_config, plan_exports, run_single, run_stepwise,
};
use es_core::Seconds;
use es_engine::{HydraulicEngine, ProjectFiles, StatusReport};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "epanet-stepwise")]
#[command(about = "Run EPANET hydraulics and export node/link values per time step", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve the whole hydraulic simulation in one call
    Single(FileArgs),
    /// Step through the hydraulic simulation and export values to CSV
    Stepwise(StepwiseArgs),
}

#[derive(Args, Debug)]
struct FileArgs {
    /// EPANET input file (.inp)
    input_filename: PathBuf,
    /// Report file
    report_filename: Option<PathBuf>,
    /// Binary results file
    binary_filename: Option<PathBuf>,
}

impl FileArgs {
    fn project_files(&self) -> ProjectFiles {
        ProjectFiles::from_args(
            self.input_filename.clone(),
            self.report_filename.clone(),
            self.binary_filename.clone(),
        )
    }
}

#[derive(Args, Debug)]
struct StepwiseArgs {
    #[command(flatten)]
    files: FileArgs,

    /// Hydraulic time step in seconds [default: 3600]
    #[arg(long)]
    hstep: Option<Seconds>,

    /// Export node attribute NAME to <name>.csv (repeatable)
    #[arg(short = 'n', long = "node-value-csv", value_name = "NAME")]
    node_values: Vec<String>,

    /// Export link attribute NAME to <name>.csv (repeatable)
    #[arg(short = 'l', long = "link-value-csv", value_name = "NAME")]
    link_values: Vec<String>,

    /// Print head, pressure and demand of every node after each step
    #[arg(long)]
    print_nodes: bool,

    /// Directory for the exported CSV files [default: .]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// YAML run profile; command line options take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Status report level written by the engine
    #[arg(long, value_enum)]
    status_report: Option<ReportLevel>,

    /// Do not keep hydraulic results for the binary results file
    #[arg(long)]
    no_save: bool,
}

impl StepwiseArgs {
    fn overrides(&self) -> RunConfig {
        RunConfig {
            hstep: self.hstep,
            node_values: self.node_values.clone(),
            link_values: self.link_values.clone(),
            output_dir: self.output_dir.clone(),
            print_nodes: self.print_nodes,
            save_hydraulics: self.no_save.then_some(false),
            status_report: self.status_report.map(StatusReport::from),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ReportLevel {
    None,
    Normal,
    Full,
}

impl From<ReportLevel> for StatusReport {
    fn from(level: ReportLevel) -> Self {
        match level {
            ReportLevel::None => StatusReport::None,
            ReportLevel::Normal => StatusReport::Normal,
            ReportLevel::Full => StatusReport::Full,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Commands) -> AppResult<()> {
    match command {
        Commands::Single(files) => cmd_single(files),
        Commands::Stepwise(args) => cmd_stepwise(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(feature = "epanet")]
fn open_engine(files: &ProjectFiles) -> AppResult<Box<dyn HydraulicEngine>> {
    let project = es_engine::epanet::EpanetProject::open(files)?;
    Ok(Box::new(project))
}

#[cfg(not(feature = "epanet"))]
fn open_engine(files: &ProjectFiles) -> AppResult<Box<dyn HydraulicEngine>> {
    Err(es_app::AppError::EngineUnavailable(format!(
        "cannot open {}: built without the `epanet` feature",
        files.input.display()
    )))
}

fn cmd_single(files: &FileArgs) -> AppResult<()> {
    let mut engine = open_engine(&files.project_files())?;
    let summary = run_single(&mut engine)?;
    println!(
        "Node count: {}, link count: {}",
        summary.node_count, summary.link_count
    );
    println!("✓ Hydraulics solved over {} s", summary.duration);
    Ok(())
}

fn cmd_stepwise(args: &StepwiseArgs) -> AppResult<()> {
    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => RunConfig::default(),
    };
    let config = base.merge(args.overrides());
    let options = config.to_options()?;
    // Resolve names before the engine is touched so a typo creates no files.
    let plan = plan_exports(&options)?;

    let mut engine = open_engine(&args.files.project_files())?;

    let mut console = ConsoleProgress::new(io::stdout());
    let mut node_report = NodeStateReport::new(io::stdout());
    let mut observers: Vec<&mut dyn StepObserver> = vec![&mut console];
    if config.print_nodes {
        observers.push(&mut node_report);
    }

    run_stepwise(&mut engine, &options, plan, &mut observers)?;
    Ok(())
}

/// Prints the run header and the final summary.
struct ConsoleProgress<W: Write> {
    out: W,
}

impl<W: Write> ConsoleProgress<W> {
    fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{text}") {
            warn!(%err, "failed to write progress");
        }
    }
}

impl<W: Write> StepObserver for ConsoleProgress<W> {
    fn on_start(&mut self, start: &RunStart) {
        self.emit(format_args!(
            "Hydraulic time step was: {}, setting to: {}",
            start.previous_hydraulic_step, start.hydraulic_step
        ));
        self.emit(format_args!(
            "Node count: {}, link count: {}",
            start.node_count, start.link_count
        ));
    }

    fn on_end(&mut self, summary: &RunSummary) {
        self.emit(format_args!(
            "✓ {} hydraulic steps, last at t={} s",
            summary.steps, summary.final_time
        ));
        for path in &summary.files {
            self.emit(format_args!("  wrote {}", path.display()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepwise(argv: &[&str]) -> StepwiseArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Stepwise(args) => args,
            other => panic!("expected stepwise, got {other:?}"),
        }
    }

    #[test]
    fn stepwise_surface() {
        let args = stepwise(&[
            "epanet-stepwise",
            "stepwise",
            "net.inp",
            "net.rpt",
            "net.bin",
            "--hstep",
            "900",
            "-n",
            "pressure",
            "--node-value-csv",
            "head",
            "-l",
            "flow",
        ]);
        assert_eq!(args.hstep, Some(900));
        assert_eq!(args.node_values, ["pressure", "head"]);
        assert_eq!(args.link_values, ["flow"]);

        let files = args.files.project_files();
        assert_eq!(files.input, PathBuf::from("net.inp"));
        assert_eq!(files.report, Some(PathBuf::from("net.rpt")));
        assert_eq!(files.binary, Some(PathBuf::from("net.bin")));
    }

    #[test]
    fn report_and_binary_are_optional() {
        let args = stepwise(&["epanet-stepwise", "stepwise", "net.inp"]);
        let files = args.files.project_files();
        assert_eq!(files.report, None);
        assert_eq!(files.binary, None);
        assert_eq!(args.overrides(), RunConfig::default());
    }

    #[test]
    fn overrides_carry_flags() {
        let args = stepwise(&[
            "epanet-stepwise",
            "stepwise",
            "net.inp",
            "--no-save",
            "--status-report",
            "full",
            "--print-nodes",
            "--output-dir",
            "out",
        ]);
        let cfg = args.overrides();
        assert_eq!(cfg.save_hydraulics, Some(false));
        assert_eq!(cfg.status_report, Some(StatusReport::Full));
        assert!(cfg.print_nodes);
        assert_eq!(cfg.output_dir, Some(PathBuf::from("out")));

        let opts = cfg.to_options().unwrap();
        assert_eq!(opts.hydraulic_step, 3600);
        assert!(!opts.save_hydraulics);
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["epanet-stepwise", "stepwise"]).is_err());
        assert!(
            Cli::try_parse_from(["epanet-stepwise", "stepwise", "a.inp", "--hstep", "x"]).is_err()
        );
        assert!(
            Cli::try_parse_from(["epanet-stepwise", "stepwise", "a.inp", "--status-report", "loud"])
                .is_err()
        );
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::try_parse_from(["epanet-stepwise", "single", "a.inp", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Single(_)));
    }

    #[test]
    fn console_progress_lines() {
        let mut console = ConsoleProgress::new(Vec::new());
        console.on_start(&RunStart {
            previous_hydraulic_step: 900,
            hydraulic_step: 3600,
            node_count: 3,
            link_count: 2,
        });
        let text = String::from_utf8(console.out).unwrap();
        assert_eq!(
            text,
            "Hydraulic time step was: 900, setting to: 3600\nNode count: 3, link count: 2\n"
        );
    }

    #[test]
    fn unknown_attribute_is_reported_before_opening_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "epanet-stepwise",
            "stepwise",
            "missing.inp",
            "--output-dir",
            out,
            "-n",
            "bogus",
        ])
        .unwrap();

        let err = run(&cli.command).unwrap_err();
        assert!(matches!(err, es_app::AppError::Core(_)));
        assert_eq!(err.to_string(), "'bogus' is not a node attribute");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(not(feature = "epanet"))]
    #[test]
    fn engine_requires_the_feature() {
        let err = open_engine(&ProjectFiles::new("net.inp")).err().unwrap();
        assert!(matches!(err, es_app::AppError::EngineUnavailable(_)));
    }
}
