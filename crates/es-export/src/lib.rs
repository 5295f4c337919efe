//! es-export: per-step CSV export of node and link attributes.
//!
//! One [`ValueCsvWriter`] per requested attribute writes one semicolon
//! delimited file:
//!
//! ```text
//! time;junction1;junction2;tank3
//! 0;104.2;101.7;98.5
//! 3600;103.9;101.1;98.9
//! ```
//!
//! [`ExportSet`] opens a whole list of writers, rolls back on a failed open,
//! and guarantees every opened file is closed exactly once.

pub mod error;
pub mod set;
pub mod writer;

pub use error::{ExportError, ExportResult};
pub use set::ExportSet;
pub use writer::ValueCsvWriter;

/// Field delimiter of every exported file.
pub const DELIMITER: u8 = b';';
