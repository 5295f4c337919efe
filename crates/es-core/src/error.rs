use thiserror::Error;

use crate::entity::EntityClass;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("'{name}' is not a {class} attribute")]
    UnknownAttribute { class: EntityClass, name: String },

    #[error("Unknown {class} type code: {code}")]
    UnknownType { class: EntityClass, code: i32 },
}
