//! Scoped hydraulic session.

use std::ops::{Deref, DerefMut};

use es_engine::{EngineResult, HydraulicEngine};
use tracing::{debug, warn};

/// An open hydraulic session on `E`.
///
/// Created by `open_hydraulics`; `close_hydraulics` runs exactly once, either
/// through [`close`](Self::close) or when the guard is dropped on an early
/// return.
pub struct HydraulicSession<'e, E: HydraulicEngine> {
    engine: &'e mut E,
    open: bool,
}

impl<'e, E: HydraulicEngine> HydraulicSession<'e, E> {
    pub fn open(engine: &'e mut E) -> EngineResult<Self> {
        engine.open_hydraulics()?;
        debug!("hydraulic session opened");
        Ok(Self { engine, open: true })
    }

    /// Close the session and report the engine's answer.
    pub fn close(mut self) -> EngineResult<()> {
        self.open = false;
        self.engine.close_hydraulics()?;
        debug!("hydraulic session closed");
        Ok(())
    }
}

impl<E: HydraulicEngine> Deref for HydraulicSession<'_, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.engine
    }
}

impl<E: HydraulicEngine> DerefMut for HydraulicSession<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.engine
    }
}

impl<E: HydraulicEngine> Drop for HydraulicSession<'_, E> {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            if let Err(e) = self.engine.close_hydraulics() {
                warn!(error = %e, "failed to close hydraulic session");
            }
        }
    }
}
