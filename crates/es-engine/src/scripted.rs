//! Deterministic in-memory engine.
//!
//! `ScriptedNetwork` follows the toolkit's hydraulic session protocol with a
//! fixed topology and a fixed clock: each `next_hydraulics` advances by the
//! hydraulic step until the duration is reached. Every value is a known
//! function of (index, attribute code, time), see [`ScriptedNetwork::value_at`].
//! Faults can be injected at a given simulation time.

use es_core::{EntityClass, EntityIndex, LinkAttribute, LinkType, NodeAttribute, NodeType, Seconds};

use crate::error::{EngineError, EngineResult};
use crate::params::{InitFlag, StatusReport, TimeParam};
use crate::{HydraulicEngine, NetworkQuery};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Closed,
    Open,
    Initialised,
}

#[derive(Clone, Debug)]
pub struct ScriptedNetwork {
    node_types: Vec<i32>,
    link_types: Vec<i32>,
    duration: Seconds,
    hydraulic_step: Seconds,
    report_step: Seconds,
    status_report: StatusReport,
    init_flag: Option<InitFlag>,
    phase: Phase,
    clock: Seconds,
    solved: bool,
    steps_run: usize,
    hydraulics_closed: usize,
    fail_queries_at: Option<Seconds>,
    fail_run_at: Option<Seconds>,
}

impl ScriptedNetwork {
    /// Network with the given node and link types, a 24 h duration and a 1 h
    /// hydraulic step.
    pub fn new(nodes: &[NodeType], links: &[LinkType]) -> Self {
        Self::with_type_codes(
            nodes.iter().map(|t| t.code()).collect(),
            links.iter().map(|t| t.code()).collect(),
        )
    }

    /// Like [`new`](Self::new) but with raw type codes, which may be outside
    /// the known tables.
    pub fn with_type_codes(node_types: Vec<i32>, link_types: Vec<i32>) -> Self {
        Self {
            node_types,
            link_types,
            duration: 24 * 3600,
            hydraulic_step: 3600,
            report_step: 3600,
            status_report: StatusReport::None,
            init_flag: None,
            phase: Phase::Closed,
            clock: 0,
            solved: false,
            steps_run: 0,
            hydraulics_closed: 0,
            fail_queries_at: None,
            fail_run_at: None,
        }
    }

    pub fn duration(mut self, duration: Seconds) -> Self {
        self.duration = duration;
        self
    }

    pub fn hydraulic_step(mut self, step: Seconds) -> Self {
        self.hydraulic_step = step;
        self
    }

    /// Make every value query fail once the clock reaches `time`.
    pub fn fail_queries_at(mut self, time: Seconds) -> Self {
        self.fail_queries_at = Some(time);
        self
    }

    /// Make `run_hydraulics` fail at `time`.
    pub fn fail_run_at(mut self, time: Seconds) -> Self {
        self.fail_run_at = Some(time);
        self
    }

    /// The value every query returns for the given entity, attribute and time.
    pub fn value_at(index: EntityIndex, code: i32, time: Seconds) -> f64 {
        f64::from(index.get()) * 100.0 + f64::from(code) + time as f64 / 3600.0 * 0.25
    }

    pub fn is_hydraulics_open(&self) -> bool {
        self.phase != Phase::Closed
    }

    /// How many times the hydraulic session was closed.
    pub fn hydraulics_closed(&self) -> usize {
        self.hydraulics_closed
    }

    pub fn steps_run(&self) -> usize {
        self.steps_run
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn status_report(&self) -> StatusReport {
        self.status_report
    }

    pub fn init_flag(&self) -> Option<InitFlag> {
        self.init_flag
    }

    fn types(&self, class: EntityClass) -> &[i32] {
        match class {
            EntityClass::Node => &self.node_types,
            EntityClass::Link => &self.link_types,
        }
    }

    fn type_of(&self, class: EntityClass, index: EntityIndex) -> EngineResult<i32> {
        self.types(class)
            .get(index.position())
            .copied()
            .ok_or(EngineError::NoSuchEntity { class, index })
    }

    fn value_of(&self, class: EntityClass, index: EntityIndex, code: i32) -> EngineResult<f64> {
        self.type_of(class, index)?;
        if self.phase == Phase::Initialised && self.fail_queries_at == Some(self.clock) {
            return Err(EngineError::Toolkit {
                code: 203,
                message: format!("injected query failure at t={}", self.clock),
            });
        }
        Ok(Self::value_at(index, code, self.clock))
    }
}

impl NetworkQuery for ScriptedNetwork {
    fn count(&self, class: EntityClass) -> EngineResult<usize> {
        Ok(self.types(class).len())
    }

    fn node_type(&self, index: EntityIndex) -> EngineResult<i32> {
        self.type_of(EntityClass::Node, index)
    }

    fn link_type(&self, index: EntityIndex) -> EngineResult<i32> {
        self.type_of(EntityClass::Link, index)
    }

    fn node_value(&self, index: EntityIndex, attribute: NodeAttribute) -> EngineResult<f64> {
        self.value_of(EntityClass::Node, index, attribute.code())
    }

    fn link_value(&self, index: EntityIndex, attribute: LinkAttribute) -> EngineResult<f64> {
        self.value_of(EntityClass::Link, index, attribute.code())
    }
}

impl HydraulicEngine for ScriptedNetwork {
    fn time_param(&self, param: TimeParam) -> EngineResult<Seconds> {
        match param {
            TimeParam::Duration => Ok(self.duration),
            TimeParam::HydStep => Ok(self.hydraulic_step),
            TimeParam::ReportStep => Ok(self.report_step),
            _ => Ok(0),
        }
    }

    fn set_time_param(&mut self, param: TimeParam, value: Seconds) -> EngineResult<()> {
        if value < 0 {
            return Err(EngineError::OutOfRange {
                what: "time parameter",
                value,
            });
        }
        match param {
            TimeParam::Duration => self.duration = value,
            TimeParam::HydStep => {
                if value == 0 {
                    return Err(EngineError::Toolkit {
                        code: 213,
                        message: "invalid option value".to_string(),
                    });
                }
                self.hydraulic_step = value;
            }
            TimeParam::ReportStep => self.report_step = value,
            _ => {}
        }
        Ok(())
    }

    fn set_status_report(&mut self, level: StatusReport) -> EngineResult<()> {
        self.status_report = level;
        Ok(())
    }

    fn solve_hydraulics(&mut self) -> EngineResult<()> {
        if self.phase != Phase::Closed {
            return Err(EngineError::Protocol {
                what: "solve while a hydraulic session is open",
            });
        }
        let mut t = 0;
        loop {
            if self.fail_run_at == Some(t) {
                return Err(EngineError::Toolkit {
                    code: 110,
                    message: "cannot solve network hydraulic equations".to_string(),
                });
            }
            self.steps_run += 1;
            let step = self.hydraulic_step.min(self.duration - t).max(0);
            if step == 0 {
                break;
            }
            t += step;
        }
        self.clock = t;
        self.solved = true;
        Ok(())
    }

    fn open_hydraulics(&mut self) -> EngineResult<()> {
        if self.phase != Phase::Closed {
            return Err(EngineError::Protocol {
                what: "hydraulics already open",
            });
        }
        self.phase = Phase::Open;
        Ok(())
    }

    fn init_hydraulics(&mut self, flag: InitFlag) -> EngineResult<()> {
        if self.phase == Phase::Closed {
            return Err(EngineError::Protocol {
                what: "init before open",
            });
        }
        self.phase = Phase::Initialised;
        self.init_flag = Some(flag);
        self.clock = 0;
        Ok(())
    }

    fn run_hydraulics(&mut self) -> EngineResult<Seconds> {
        if self.phase != Phase::Initialised {
            return Err(EngineError::Protocol {
                what: "run before init",
            });
        }
        if self.fail_run_at == Some(self.clock) {
            return Err(EngineError::Toolkit {
                code: 110,
                message: "cannot solve network hydraulic equations".to_string(),
            });
        }
        self.steps_run += 1;
        Ok(self.clock)
    }

    fn next_hydraulics(&mut self) -> EngineResult<Seconds> {
        if self.phase != Phase::Initialised {
            return Err(EngineError::Protocol {
                what: "next before init",
            });
        }
        let step = self.hydraulic_step.min(self.duration - self.clock).max(0);
        self.clock += step;
        Ok(step)
    }

    fn close_hydraulics(&mut self) -> EngineResult<()> {
        if self.phase == Phase::Closed {
            return Err(EngineError::Protocol {
                what: "hydraulics not open",
            });
        }
        self.phase = Phase::Closed;
        self.hydraulics_closed += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(net: &mut ScriptedNetwork) -> Vec<Seconds> {
        let mut times = Vec::new();
        net.open_hydraulics().unwrap();
        net.init_hydraulics(InitFlag::NoSave).unwrap();
        loop {
            times.push(net.run_hydraulics().unwrap());
            if net.next_hydraulics().unwrap() == 0 {
                break;
            }
        }
        net.close_hydraulics().unwrap();
        times
    }

    #[test]
    fn clock_advances_by_hydraulic_step() {
        let mut net = ScriptedNetwork::new(&[NodeType::Junction], &[]).duration(3 * 3600);
        assert_eq!(drive(&mut net), vec![0, 3600, 7200, 10800]);
        assert_eq!(net.steps_run(), 4);
        assert_eq!(net.hydraulics_closed(), 1);
    }

    #[test]
    fn last_step_is_truncated_to_duration() {
        let mut net = ScriptedNetwork::new(&[], &[])
            .duration(5000)
            .hydraulic_step(3600);
        assert_eq!(drive(&mut net), vec![0, 3600, 5000]);
    }

    #[test]
    fn zero_duration_runs_once() {
        let mut net = ScriptedNetwork::new(&[], &[]).duration(0);
        assert_eq!(drive(&mut net), vec![0]);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let net = ScriptedNetwork::new(&[NodeType::Tank], &[LinkType::Pipe]);
        let two = EntityIndex::new(2).unwrap();
        assert!(net.node_type(two).is_err());
        assert_eq!(net.link_type(EntityIndex::new(1).unwrap()), Ok(1));
    }

    #[test]
    fn run_requires_init() {
        let mut net = ScriptedNetwork::new(&[], &[]);
        net.open_hydraulics().unwrap();
        assert!(matches!(
            net.run_hydraulics(),
            Err(EngineError::Protocol { .. })
        ));
    }

    #[test]
    fn query_fault_fires_at_the_given_time() {
        let mut net = ScriptedNetwork::new(&[NodeType::Junction], &[])
            .duration(3600)
            .fail_queries_at(3600);
        let one = EntityIndex::new(1).unwrap();
        net.open_hydraulics().unwrap();
        net.init_hydraulics(InitFlag::Save).unwrap();
        net.run_hydraulics().unwrap();
        assert!(net.node_value(one, NodeAttribute::Head).is_ok());
        net.next_hydraulics().unwrap();
        net.run_hydraulics().unwrap();
        assert!(net.node_value(one, NodeAttribute::Head).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn step_times_increase_up_to_duration(duration in 0_i64..200_000, step in 1_i64..20_000) {
            let mut net = ScriptedNetwork::new(&[NodeType::Junction], &[LinkType::Pipe])
                .duration(duration)
                .hydraulic_step(step);
            net.open_hydraulics().unwrap();
            net.init_hydraulics(InitFlag::NoSave).unwrap();
            let mut times = Vec::new();
            loop {
                times.push(net.run_hydraulics().unwrap());
                if net.next_hydraulics().unwrap() == 0 {
                    break;
                }
            }
            net.close_hydraulics().unwrap();

            prop_assert_eq!(times[0], 0);
            prop_assert_eq!(*times.last().unwrap(), duration);
            prop_assert!(times.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(times.windows(2).all(|w| w[1] - w[0] <= step));
        }
    }
}
