//! es-engine: boundary to the external hydraulic simulation engine.
//!
//! The engine is consumed, never re-implemented. Two traits describe what the
//! rest of the workspace needs from it:
//! - [`NetworkQuery`]: read-only per-entity queries (counts, types, values)
//! - [`HydraulicEngine`]: time parameters and the stepwise hydraulic session
//!
//! Implementations:
//! - [`epanet::EpanetProject`] (feature `epanet`): the EPANET 2.2 toolkit
//! - [`scripted::ScriptedNetwork`] (feature `test-support`): deterministic
//!   in-memory stand-in for tests

pub mod error;
pub mod files;
pub mod params;

#[cfg(feature = "epanet")]
pub mod epanet;

#[cfg(any(test, feature = "test-support"))]
pub mod scripted;

pub use error::{EngineError, EngineResult};
pub use files::ProjectFiles;
pub use params::{InitFlag, StatusReport, TimeParam};

use es_core::{Attribute, EntityClass, EntityIndex, LinkAttribute, NodeAttribute, Seconds};

/// Read-only queries against an open project.
///
/// Type queries return the engine's raw type code; labelling (and rejecting
/// unknown codes) is left to `es_core::type_label`.
pub trait NetworkQuery {
    fn count(&self, class: EntityClass) -> EngineResult<usize>;

    fn node_type(&self, index: EntityIndex) -> EngineResult<i32>;

    fn link_type(&self, index: EntityIndex) -> EngineResult<i32>;

    fn node_value(&self, index: EntityIndex, attribute: NodeAttribute) -> EngineResult<f64>;

    fn link_value(&self, index: EntityIndex, attribute: LinkAttribute) -> EngineResult<f64>;

    fn entity_type(&self, class: EntityClass, index: EntityIndex) -> EngineResult<i32> {
        match class {
            EntityClass::Node => self.node_type(index),
            EntityClass::Link => self.link_type(index),
        }
    }

    fn value(&self, index: EntityIndex, attribute: Attribute) -> EngineResult<f64> {
        match attribute {
            Attribute::Node(a) => self.node_value(index, a),
            Attribute::Link(a) => self.link_value(index, a),
        }
    }
}

/// Session control of an open project.
///
/// The hydraulic calls follow the toolkit protocol: `open_hydraulics`,
/// `init_hydraulics`, then alternate `run_hydraulics` / `next_hydraulics`
/// until the next step is 0, then `close_hydraulics`.
pub trait HydraulicEngine: NetworkQuery {
    fn time_param(&self, param: TimeParam) -> EngineResult<Seconds>;

    fn set_time_param(&mut self, param: TimeParam, value: Seconds) -> EngineResult<()>;

    fn set_status_report(&mut self, level: StatusReport) -> EngineResult<()>;

    /// Run the complete hydraulic simulation in one call.
    fn solve_hydraulics(&mut self) -> EngineResult<()>;

    fn open_hydraulics(&mut self) -> EngineResult<()>;

    fn init_hydraulics(&mut self, flag: InitFlag) -> EngineResult<()>;

    /// Solve at the current time; returns that time.
    fn run_hydraulics(&mut self) -> EngineResult<Seconds>;

    /// Advance the clock; returns the length of the step taken (0 at the end).
    fn next_hydraulics(&mut self) -> EngineResult<Seconds>;

    fn close_hydraulics(&mut self) -> EngineResult<()>;
}

impl<T: NetworkQuery + ?Sized> NetworkQuery for Box<T> {
    fn count(&self, class: EntityClass) -> EngineResult<usize> {
        (**self).count(class)
    }

    fn node_type(&self, index: EntityIndex) -> EngineResult<i32> {
        (**self).node_type(index)
    }

    fn link_type(&self, index: EntityIndex) -> EngineResult<i32> {
        (**self).link_type(index)
    }

    fn node_value(&self, index: EntityIndex, attribute: NodeAttribute) -> EngineResult<f64> {
        (**self).node_value(index, attribute)
    }

    fn link_value(&self, index: EntityIndex, attribute: LinkAttribute) -> EngineResult<f64> {
        (**self).link_value(index, attribute)
    }
}

impl<T: HydraulicEngine + ?Sized> HydraulicEngine for Box<T> {
    fn time_param(&self, param: TimeParam) -> EngineResult<Seconds> {
        (**self).time_param(param)
    }

    fn set_time_param(&mut self, param: TimeParam, value: Seconds) -> EngineResult<()> {
        (**self).set_time_param(param, value)
    }

    fn set_status_report(&mut self, level: StatusReport) -> EngineResult<()> {
        (**self).set_status_report(level)
    }

    fn solve_hydraulics(&mut self) -> EngineResult<()> {
        (**self).solve_hydraulics()
    }

    fn open_hydraulics(&mut self) -> EngineResult<()> {
        (**self).open_hydraulics()
    }

    fn init_hydraulics(&mut self, flag: InitFlag) -> EngineResult<()> {
        (**self).init_hydraulics(flag)
    }

    fn run_hydraulics(&mut self) -> EngineResult<Seconds> {
        (**self).run_hydraulics()
    }

    fn next_hydraulics(&mut self) -> EngineResult<Seconds> {
        (**self).next_hydraulics()
    }

    fn close_hydraulics(&mut self) -> EngineResult<()> {
        (**self).close_hydraulics()
    }
}
