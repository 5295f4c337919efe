//! Raw declarations for the subset of the EPANET 2.2 toolkit API in use.

use std::ffi::{c_char, c_double, c_int, c_long};

/// Opaque toolkit project.
#[repr(C)]
pub struct Project {
    _private: [u8; 0],
}

pub type EnProject = *mut Project;

// EN_CountType
pub const EN_NODECOUNT: c_int = 0;
pub const EN_LINKCOUNT: c_int = 2;

/// Longest message `EN_geterror` writes (EN_MAXMSG).
pub const EN_MAXMSG: c_int = 255;

#[link(name = "epanet2")]
unsafe extern "system" {
    pub fn EN_createproject(ph: *mut EnProject) -> c_int;
    pub fn EN_deleteproject(ph: EnProject) -> c_int;
    pub fn EN_open(
        ph: EnProject,
        inp_file: *const c_char,
        rpt_file: *const c_char,
        out_file: *const c_char,
    ) -> c_int;

    pub fn EN_geterror(errcode: c_int, errmsg: *mut c_char, max_len: c_int) -> c_int;
    pub fn EN_setstatusreport(ph: EnProject, level: c_int) -> c_int;

    pub fn EN_gettimeparam(ph: EnProject, param: c_int, value: *mut c_long) -> c_int;
    pub fn EN_settimeparam(ph: EnProject, param: c_int, value: c_long) -> c_int;

    pub fn EN_solveH(ph: EnProject) -> c_int;
    pub fn EN_openH(ph: EnProject) -> c_int;
    pub fn EN_initH(ph: EnProject, init_flag: c_int) -> c_int;
    pub fn EN_runH(ph: EnProject, current_time: *mut c_long) -> c_int;
    pub fn EN_nextH(ph: EnProject, t_step: *mut c_long) -> c_int;
    pub fn EN_closeH(ph: EnProject) -> c_int;

    pub fn EN_getcount(ph: EnProject, object: c_int, count: *mut c_int) -> c_int;
    pub fn EN_getnodetype(ph: EnProject, index: c_int, node_type: *mut c_int) -> c_int;
    pub fn EN_getnodevalue(
        ph: EnProject,
        index: c_int,
        property: c_int,
        value: *mut c_double,
    ) -> c_int;
    pub fn EN_getlinktype(ph: EnProject, index: c_int, link_type: *mut c_int) -> c_int;
    pub fn EN_getlinkvalue(
        ph: EnProject,
        index: c_int,
        property: c_int,
        value: *mut c_double,
    ) -> c_int;
}
