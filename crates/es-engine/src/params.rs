//! Toolkit parameter enums used by the session API.

/// Time parameters (`EN_TimeParameter`) that the tools read or override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum TimeParam {
    Duration = 0,
    HydStep = 1,
    QualStep = 2,
    PatternStep = 3,
    PatternStart = 4,
    ReportStep = 5,
    ReportStart = 6,
}

impl TimeParam {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Level of the engine's hydraulic status report (`EN_StatusReport`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(i32)]
pub enum StatusReport {
    None = 0,
    #[default]
    Normal = 1,
    Full = 2,
}

impl StatusReport {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Hydraulic initialisation flag (`EN_InitHydOption`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum InitFlag {
    /// Don't keep hydraulic results for later use.
    NoSave = 0,
    /// Keep hydraulic results (needed for a binary results file).
    Save = 1,
}

impl InitFlag {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_save(save: bool) -> Self {
        if save { InitFlag::Save } else { InitFlag::NoSave }
    }
}
