//! Attribute export requests.

use std::path::{Path, PathBuf};

use crate::attribute::Attribute;
use crate::entity::EntityClass;
use crate::error::CoreResult;

/// One requested export: which attribute, and where its CSV goes.
///
/// Built once at startup and never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeRequest {
    pub attribute: Attribute,
    pub path: PathBuf,
}

impl AttributeRequest {
    pub fn class(&self) -> EntityClass {
        self.attribute.class()
    }
}

/// Resolve user-supplied attribute names for `class` into export requests.
///
/// Each file is named after the lower-cased request name with a `.csv`
/// extension and placed in `output_dir`. All names are resolved before
/// anything is returned, so one bad name fails the whole list.
pub fn resolve_requests<S: AsRef<str>>(
    class: EntityClass,
    names: &[S],
    output_dir: &Path,
) -> CoreResult<Vec<AttributeRequest>> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let attribute = Attribute::resolve(class, name)?;
            let path = output_dir.join(format!("{}.csv", name.to_lowercase()));
            Ok(AttributeRequest { attribute, path })
        })
        .collect()
}
