//! Node and link attribute codes and their names.
//!
//! Each class has a closed enum mirroring the toolkit's property constants.
//! Names are the constant names without the `EN_` prefix (`HEAD`, `FLOW`,
//! `PUMP_STATE`, ...) and are matched case-insensitively through a lookup
//! table built once on first use.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::entity::EntityClass;
use crate::error::{CoreError, CoreResult};

macro_rules! attribute_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $table:ident {
            $( $variant:ident = $code:literal => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum $name {
            $( $variant = $code, )+
        }

        static $table: LazyLock<HashMap<&'static str, $name>> = LazyLock::new(|| {
            $name::ALL.iter().map(|a| (a.name(), *a)).collect()
        });

        impl $name {
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Toolkit property code.
            pub fn code(self) -> i32 {
                self as i32
            }

            /// Upper-case constant name, without the `EN_` prefix.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }

            /// Case-insensitive lookup by constant name.
            pub fn from_name(name: &str) -> Option<Self> {
                $table.get(name.to_ascii_uppercase().as_str()).copied()
            }
        }
    };
}

attribute_enum! {
    /// Node properties (`EN_NodeProperty`).
    NodeAttribute, NODE_ATTRIBUTES {
        Elevation = 0 => "ELEVATION",
        BaseDemand = 1 => "BASEDEMAND",
        Pattern = 2 => "PATTERN",
        Emitter = 3 => "EMITTER",
        InitQual = 4 => "INITQUAL",
        SourceQual = 5 => "SOURCEQUAL",
        SourcePat = 6 => "SOURCEPAT",
        SourceType = 7 => "SOURCETYPE",
        TankLevel = 8 => "TANKLEVEL",
        Demand = 9 => "DEMAND",
        Head = 10 => "HEAD",
        Pressure = 11 => "PRESSURE",
        Quality = 12 => "QUALITY",
        SourceMass = 13 => "SOURCEMASS",
        InitVolume = 14 => "INITVOLUME",
        MixModel = 15 => "MIXMODEL",
        MixZoneVol = 16 => "MIXZONEVOL",
        TankDiam = 17 => "TANKDIAM",
        MinVolume = 18 => "MINVOLUME",
        VolCurve = 19 => "VOLCURVE",
        MinLevel = 20 => "MINLEVEL",
        MaxLevel = 21 => "MAXLEVEL",
        MixFraction = 22 => "MIXFRACTION",
        TankKbulk = 23 => "TANK_KBULK",
        TankVolume = 24 => "TANKVOLUME",
        MaxVolume = 25 => "MAXVOLUME",
        CanOverflow = 26 => "CANOVERFLOW",
        DemandDeficit = 27 => "DEMANDDEFICIT",
    }
}

attribute_enum! {
    /// Link properties (`EN_LinkProperty`).
    LinkAttribute, LINK_ATTRIBUTES {
        Diameter = 0 => "DIAMETER",
        Length = 1 => "LENGTH",
        Roughness = 2 => "ROUGHNESS",
        MinorLoss = 3 => "MINORLOSS",
        InitStatus = 4 => "INITSTATUS",
        InitSetting = 5 => "INITSETTING",
        Kbulk = 6 => "KBULK",
        Kwall = 7 => "KWALL",
        Flow = 8 => "FLOW",
        Velocity = 9 => "VELOCITY",
        HeadLoss = 10 => "HEADLOSS",
        Status = 11 => "STATUS",
        Setting = 12 => "SETTING",
        Energy = 13 => "ENERGY",
        LinkQual = 14 => "LINKQUAL",
        LinkPattern = 15 => "LINKPATTERN",
        PumpState = 16 => "PUMP_STATE",
        PumpEffic = 17 => "PUMP_EFFIC",
        PumpPower = 18 => "PUMP_POWER",
        PumpHcurve = 19 => "PUMP_HCURVE",
        PumpEcurve = 20 => "PUMP_ECURVE",
        PumpEcost = 21 => "PUMP_ECOST",
        PumpEpat = 22 => "PUMP_EPAT",
    }
}

/// An attribute of either class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Node(NodeAttribute),
    Link(LinkAttribute),
}

impl Attribute {
    /// Resolve `name` against the attribute table of `class`.
    pub fn resolve(class: EntityClass, name: &str) -> CoreResult<Self> {
        let found = match class {
            EntityClass::Node => NodeAttribute::from_name(name).map(Attribute::Node),
            EntityClass::Link => LinkAttribute::from_name(name).map(Attribute::Link),
        };
        found.ok_or_else(|| CoreError::UnknownAttribute {
            class,
            name: name.to_string(),
        })
    }

    pub fn class(self) -> EntityClass {
        match self {
            Attribute::Node(_) => EntityClass::Node,
            Attribute::Link(_) => EntityClass::Link,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Attribute::Node(a) => a.code(),
            Attribute::Link(a) => a.code(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Node(a) => a.name(),
            Attribute::Link(a) => a.name(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn any_casing_resolves(idx in 0usize..28, mask in any::<u64>()) {
            let attr = NodeAttribute::ALL[idx];
            let mixed: String = attr
                .name()
                .chars()
                .enumerate()
                .map(|(i, c)| if mask >> (i % 64) & 1 == 1 { c.to_ascii_lowercase() } else { c })
                .collect();
            prop_assert_eq!(NodeAttribute::from_name(&mixed), Some(attr));
        }
    }
}
