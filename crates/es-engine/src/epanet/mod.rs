//! EPANET 2.2 toolkit binding.
//!
//! [`EpanetProject`] owns one toolkit project handle for its whole lifetime and
//! deletes it on drop. Toolkit return codes 1..=100 are warnings: they are
//! logged and the call is treated as successful. Larger codes are errors.

mod sys;

use std::ffi::{CStr, CString, c_char, c_int, c_long};
use std::path::Path;
use std::ptr;

use es_core::{EntityClass, EntityIndex, LinkAttribute, NodeAttribute, Seconds};
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::files::ProjectFiles;
use crate::params::{InitFlag, StatusReport, TimeParam};
use crate::{HydraulicEngine, NetworkQuery};

/// An open EPANET project.
pub struct EpanetProject {
    handle: sys::EnProject,
}

impl EpanetProject {
    /// Create a project and read the network from `files.input`.
    pub fn open(files: &ProjectFiles) -> EngineResult<Self> {
        let inp = c_path(&files.input)?;
        let rpt = c_path(files.report_path())?;
        let bin = c_path(files.binary_path())?;

        let mut handle: sys::EnProject = ptr::null_mut();
        check(unsafe { sys::EN_createproject(&mut handle) })?;
        // From here on Drop releases the handle, including when EN_open fails.
        let project = Self { handle };

        check(unsafe { sys::EN_open(project.handle, inp.as_ptr(), rpt.as_ptr(), bin.as_ptr()) })?;
        info!(input = %files.input.display(), "opened EPANET project");
        Ok(project)
    }

    fn index(&self, class: EntityClass, index: EntityIndex) -> EngineResult<c_int> {
        c_int::try_from(index.get()).map_err(|_| EngineError::NoSuchEntity { class, index })
    }
}

impl Drop for EpanetProject {
    fn drop(&mut self) {
        let code = unsafe { sys::EN_deleteproject(self.handle) };
        if code > 100 {
            warn!(code, message = %error_text(code), "failed to delete EPANET project");
        } else {
            debug!("deleted EPANET project");
        }
    }
}

impl NetworkQuery for EpanetProject {
    fn count(&self, class: EntityClass) -> EngineResult<usize> {
        let object = match class {
            EntityClass::Node => sys::EN_NODECOUNT,
            EntityClass::Link => sys::EN_LINKCOUNT,
        };
        let mut count: c_int = 0;
        check(unsafe { sys::EN_getcount(self.handle, object, &mut count) })?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn node_type(&self, index: EntityIndex) -> EngineResult<i32> {
        let i = self.index(EntityClass::Node, index)?;
        let mut code: c_int = 0;
        check(unsafe { sys::EN_getnodetype(self.handle, i, &mut code) })?;
        Ok(code)
    }

    fn link_type(&self, index: EntityIndex) -> EngineResult<i32> {
        let i = self.index(EntityClass::Link, index)?;
        let mut code: c_int = 0;
        check(unsafe { sys::EN_getlinktype(self.handle, i, &mut code) })?;
        Ok(code)
    }

    fn node_value(&self, index: EntityIndex, attribute: NodeAttribute) -> EngineResult<f64> {
        let i = self.index(EntityClass::Node, index)?;
        let mut value = 0.0;
        check(unsafe { sys::EN_getnodevalue(self.handle, i, attribute.code(), &mut value) })?;
        Ok(value)
    }

    fn link_value(&self, index: EntityIndex, attribute: LinkAttribute) -> EngineResult<f64> {
        let i = self.index(EntityClass::Link, index)?;
        let mut value = 0.0;
        check(unsafe { sys::EN_getlinkvalue(self.handle, i, attribute.code(), &mut value) })?;
        Ok(value)
    }
}

impl HydraulicEngine for EpanetProject {
    fn time_param(&self, param: TimeParam) -> EngineResult<Seconds> {
        let mut value: c_long = 0;
        check(unsafe { sys::EN_gettimeparam(self.handle, param.code(), &mut value) })?;
        Ok(Seconds::from(value))
    }

    fn set_time_param(&mut self, param: TimeParam, value: Seconds) -> EngineResult<()> {
        let v = c_long::try_from(value).map_err(|_| EngineError::OutOfRange {
            what: "time parameter",
            value,
        })?;
        check(unsafe { sys::EN_settimeparam(self.handle, param.code(), v) })
    }

    fn set_status_report(&mut self, level: StatusReport) -> EngineResult<()> {
        check(unsafe { sys::EN_setstatusreport(self.handle, level.code()) })
    }

    fn solve_hydraulics(&mut self) -> EngineResult<()> {
        check(unsafe { sys::EN_solveH(self.handle) })
    }

    fn open_hydraulics(&mut self) -> EngineResult<()> {
        check(unsafe { sys::EN_openH(self.handle) })
    }

    fn init_hydraulics(&mut self, flag: InitFlag) -> EngineResult<()> {
        check(unsafe { sys::EN_initH(self.handle, flag.code()) })
    }

    fn run_hydraulics(&mut self) -> EngineResult<Seconds> {
        let mut t: c_long = 0;
        check(unsafe { sys::EN_runH(self.handle, &mut t) })?;
        Ok(Seconds::from(t))
    }

    fn next_hydraulics(&mut self) -> EngineResult<Seconds> {
        let mut step: c_long = 0;
        check(unsafe { sys::EN_nextH(self.handle, &mut step) })?;
        Ok(Seconds::from(step))
    }

    fn close_hydraulics(&mut self) -> EngineResult<()> {
        check(unsafe { sys::EN_closeH(self.handle) })
    }
}

fn check(code: c_int) -> EngineResult<()> {
    match code {
        0 => Ok(()),
        1..=100 => {
            warn!(code, message = %error_text(code), "EPANET warning");
            Ok(())
        }
        _ => Err(EngineError::Toolkit {
            code,
            message: error_text(code),
        }),
    }
}

fn error_text(code: c_int) -> String {
    let mut buf = [0 as c_char; sys::EN_MAXMSG as usize + 1];
    let rc = unsafe { sys::EN_geterror(code, buf.as_mut_ptr(), sys::EN_MAXMSG) };
    if rc != 0 {
        return format!("unrecognised error code {code}");
    }
    unsafe { CStr::from_ptr(buf.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

fn c_path(path: &Path) -> EngineResult<CString> {
    let invalid = || EngineError::InvalidPath {
        path: path.to_path_buf(),
    };
    let text = path.to_str().ok_or_else(invalid)?;
    CString::new(text).map_err(|_| invalid())
}
