//! Run execution service.

use std::path::PathBuf;

use es_core::{AttributeRequest, EntityClass, Seconds, resolve_requests};
use es_engine::{HydraulicEngine, InitFlag, StatusReport, TimeParam};
use es_export::ExportSet;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::observer::{RunStart, StepObserver};
use crate::session::HydraulicSession;

/// Default hydraulic step override (1 h).
pub const DEFAULT_HYDRAULIC_STEP: Seconds = 3600;

/// Options for a stepwise run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepwiseOptions {
    /// Hydraulic step set before the session is initialised (seconds).
    pub hydraulic_step: Seconds,
    /// Node attribute names to export, one CSV each.
    pub node_values: Vec<String>,
    /// Link attribute names to export, one CSV each.
    pub link_values: Vec<String>,
    /// Directory the CSV files are created in.
    pub output_dir: PathBuf,
    pub status_report: StatusReport,
    /// Keep hydraulic results for the binary results file.
    pub save_hydraulics: bool,
}

impl Default for StepwiseOptions {
    fn default() -> Self {
        Self {
            hydraulic_step: DEFAULT_HYDRAULIC_STEP,
            node_values: Vec::new(),
            link_values: Vec::new(),
            output_dir: PathBuf::from("."),
            status_report: StatusReport::Normal,
            save_hydraulics: true,
        }
    }
}

/// Resolved export requests, ready to be opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportPlan {
    pub nodes: Vec<AttributeRequest>,
    pub links: Vec<AttributeRequest>,
}

impl ExportPlan {
    pub fn len(&self) -> usize {
        self.nodes.len() + self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a completed stepwise run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub start: RunStart,
    /// Completed hydraulic steps (rows written to every CSV file).
    pub steps: usize,
    /// Simulation time of the last step.
    pub final_time: Seconds,
    /// Exported files, in open order.
    pub files: Vec<PathBuf>,
}

/// Outcome of a single-shot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveSummary {
    pub node_count: usize,
    pub link_count: usize,
    pub duration: Seconds,
}

/// Resolve every requested attribute name.
///
/// Names that map to the same file (same name ignoring case) are requested
/// once, first occurrence wins. Call this before the engine is opened: a bad name fails here, before any
/// file exists.
pub fn plan_exports(options: &StepwiseOptions) -> AppResult<ExportPlan> {
    let node_values = dedup_names(&options.node_values);
    let link_values = dedup_names(&options.link_values);
    let nodes = resolve_requests(EntityClass::Node, &node_values, &options.output_dir)?;
    let links = resolve_requests(EntityClass::Link, &link_values, &options.output_dir)?;
    debug!(nodes = nodes.len(), links = links.len(), "export plan resolved");
    Ok(ExportPlan { nodes, links })
}

pub(crate) fn dedup_names(names: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    let mut kept = Vec::with_capacity(names.len());
    for name in names {
        let key = name.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            kept.push(name.clone());
        }
    }
    kept
}

/// Drive the hydraulic session one step at a time.
///
/// Every completed step writes one row to each CSV file of `plan`, then calls
/// every observer in order. The loop ends when the engine reports a next step
/// of 0. On any error the files opened so far and the hydraulic session are
/// closed before the error is returned.
pub fn run_stepwise<E: HydraulicEngine>(
    engine: &mut E,
    options: &StepwiseOptions,
    plan: ExportPlan,
    observers: &mut [&mut dyn StepObserver],
) -> AppResult<RunSummary> {
    if options.hydraulic_step <= 0 {
        return Err(AppError::InvalidInput(format!(
            "hydraulic step must be positive, got {}",
            options.hydraulic_step
        )));
    }

    let mut hydraulics = HydraulicSession::open(engine)?;

    let previous_hydraulic_step = hydraulics.time_param(TimeParam::HydStep)?;
    hydraulics.set_time_param(TimeParam::HydStep, options.hydraulic_step)?;
    info!(
        previous = previous_hydraulic_step,
        current = options.hydraulic_step,
        "hydraulic time step set"
    );

    hydraulics.set_status_report(options.status_report)?;
    hydraulics.init_hydraulics(InitFlag::from_save(options.save_hydraulics))?;

    let start = RunStart {
        previous_hydraulic_step,
        hydraulic_step: options.hydraulic_step,
        node_count: hydraulics.count(EntityClass::Node)?,
        link_count: hydraulics.count(EntityClass::Link)?,
    };
    info!(
        nodes = start.node_count,
        links = start.link_count,
        "hydraulic session initialised"
    );
    for observer in observers.iter_mut() {
        observer.on_start(&start);
    }

    let mut exports = ExportSet::open(plan.nodes, plan.links, &*hydraulics)?;

    let mut steps = 0;
    let final_time = loop {
        let time = hydraulics.run_hydraulics()?;
        exports.write_step(&*hydraulics, time)?;
        for observer in observers.iter_mut() {
            observer.on_step(&*hydraulics, time)?;
        }
        steps += 1;

        let step = hydraulics.next_hydraulics()?;
        debug!(time, next_step = step, "hydraulic step completed");
        if step == 0 {
            break time;
        }
    };

    let files = exports.close()?;
    hydraulics.close()?;
    info!(steps, final_time, files = files.len(), "stepwise run completed");

    let summary = RunSummary {
        start,
        steps,
        final_time,
        files,
    };
    for observer in observers.iter_mut() {
        observer.on_end(&summary);
    }
    Ok(summary)
}

/// Solve the whole hydraulic simulation in one engine call.
pub fn run_single<E: HydraulicEngine>(engine: &mut E) -> AppResult<SolveSummary> {
    let summary = SolveSummary {
        node_count: engine.count(EntityClass::Node)?,
        link_count: engine.count(EntityClass::Link)?,
        duration: engine.time_param(TimeParam::Duration)?,
    };
    engine.solve_hydraulics()?;
    info!(duration = summary.duration, "hydraulics solved");
    Ok(summary)
}
