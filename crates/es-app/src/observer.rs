//! Step observers: callbacks invoked by [`run_stepwise`](crate::run_stepwise).

use std::io::Write;

use es_core::{EntityClass, EntityIndex, NodeAttribute, Seconds, type_label};
use es_engine::NetworkQuery;

use crate::error::AppResult;
use crate::run_service::RunSummary;

/// What the driver knows once the hydraulic session is initialised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStart {
    /// Hydraulic step read from the input file.
    pub previous_hydraulic_step: Seconds,
    /// Hydraulic step in effect for this run.
    pub hydraulic_step: Seconds,
    pub node_count: usize,
    pub link_count: usize,
}

/// Callbacks invoked by the stepwise driver.
///
/// `on_step` is called exactly once per completed hydraulic step, after the
/// CSV exports for that step, never concurrently. The network is valid for
/// queries for the duration of the call. An error aborts the run.
pub trait StepObserver {
    fn on_start(&mut self, _start: &RunStart) {}

    fn on_step(&mut self, _network: &dyn NetworkQuery, _time: Seconds) -> AppResult<()> {
        Ok(())
    }

    fn on_end(&mut self, _summary: &RunSummary) {}
}

/// Prints the head, pressure and demand of every node after each step.
///
/// ```text
/// Time: 3600
/// Node:  1, type: reservoir, head:  100.000, pressure:    0.000, demand: -152.347
/// ```
pub struct NodeStateReport<W: Write> {
    out: W,
}

impl<W: Write> NodeStateReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StepObserver for NodeStateReport<W> {
    fn on_step(&mut self, network: &dyn NetworkQuery, time: Seconds) -> AppResult<()> {
        writeln!(self.out, "Time: {time}")?;
        let count = network.count(EntityClass::Node)?;
        for index in EntityIndex::range(count) {
            let label = type_label(EntityClass::Node, network.node_type(index)?)?;
            let head = network.node_value(index, NodeAttribute::Head)?;
            let pressure = network.node_value(index, NodeAttribute::Pressure)?;
            let demand = network.node_value(index, NodeAttribute::Demand)?;
            let i = index.get();
            writeln!(
                self.out,
                "Node: {i:>2}, type: {label}, head: {head:8.3}, pressure: {pressure:8.3}, demand: {demand:8.3}"
            )?;
        }
        Ok(())
    }
}
