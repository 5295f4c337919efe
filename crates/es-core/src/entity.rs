//! Entity classes and the per-class type tables.
//!
//! The toolkit reports entity types as small integer codes. Each class has its
//! own closed table; a code outside the table is an error rather than a guess.

use core::fmt;

use crate::error::{CoreError, CoreResult};

/// The two families of network entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntityClass {
    Node,
    Link,
}

impl EntityClass {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityClass::Node => "node",
            EntityClass::Link => "link",
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node types (`EN_NodeType`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum NodeType {
    Junction = 0,
    Reservoir = 1,
    Tank = 2,
}

impl NodeType {
    pub const ALL: [NodeType; 3] = [NodeType::Junction, NodeType::Reservoir, NodeType::Tank];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(CoreError::UnknownType {
                class: EntityClass::Node,
                code,
            })
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeType::Junction => "junction",
            NodeType::Reservoir => "reservoir",
            NodeType::Tank => "tank",
        }
    }
}

/// Link types (`EN_LinkType`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum LinkType {
    /// Pipe with check valve
    CvPipe = 0,
    Pipe = 1,
    Pump = 2,
    /// Pressure reducing valve
    Prv = 3,
    /// Pressure sustaining valve
    Psv = 4,
    /// Pressure breaker valve
    Pbv = 5,
    /// Flow control valve
    Fcv = 6,
    /// Throttle control valve
    Tcv = 7,
    /// General purpose valve
    Gpv = 8,
}

impl LinkType {
    pub const ALL: [LinkType; 9] = [
        LinkType::CvPipe,
        LinkType::Pipe,
        LinkType::Pump,
        LinkType::Prv,
        LinkType::Psv,
        LinkType::Pbv,
        LinkType::Fcv,
        LinkType::Tcv,
        LinkType::Gpv,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(CoreError::UnknownType {
                class: EntityClass::Link,
                code,
            })
    }

    pub fn label(self) -> &'static str {
        match self {
            LinkType::CvPipe => "cvpipe",
            LinkType::Pipe => "pipe",
            LinkType::Pump => "pump",
            LinkType::Prv => "prv",
            LinkType::Psv => "psv",
            LinkType::Pbv => "pbv",
            LinkType::Fcv => "fcv",
            LinkType::Tcv => "tcv",
            LinkType::Gpv => "gpv",
        }
    }
}

/// Label for a raw type code reported by the engine for an entity of `class`.
pub fn type_label(class: EntityClass, code: i32) -> CoreResult<&'static str> {
    match class {
        EntityClass::Node => NodeType::from_code(code).map(NodeType::label),
        EntityClass::Link => LinkType::from_code(code).map(LinkType::label),
    }
}
