//! `ValueCsvWriter`: one attribute of one entity class, one CSV file.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{StringRecord, Writer, WriterBuilder};
use es_core::{Attribute, AttributeRequest, EntityIndex, Seconds, type_label};
use es_engine::NetworkQuery;
use tracing::{debug, warn};

use crate::error::{ExportError, ExportResult};
use crate::DELIMITER;

enum State {
    Unopened,
    Open(Writer<File>),
    Closed,
}

/// Appends one row per simulation step for a single attribute.
///
/// Lifecycle: [`new`](Self::new) → [`open`](Self::open) (creates the file and
/// writes the header) → [`write_step`](Self::write_step)* →
/// [`close`](Self::close). Closing is idempotent and also happens on drop.
///
/// Values are written with `f64`'s `Display`, the shortest text that parses
/// back to the same number.
pub struct ValueCsvWriter {
    request: AttributeRequest,
    count: usize,
    rows: usize,
    record: StringRecord,
    state: State,
}

impl ValueCsvWriter {
    /// Bind a writer to `request` and record the current entity count.
    ///
    /// Precondition: the number of entities in the request's class stays
    /// fixed for the rest of the run. The toolkit cannot add or remove
    /// entities during a hydraulic session; [`write_step`](Self::write_step)
    /// checks the count anyway and fails with
    /// [`ExportError::TopologyChanged`] if it moved.
    pub fn new<Q: NetworkQuery + ?Sized>(
        request: AttributeRequest,
        network: &Q,
    ) -> ExportResult<Self> {
        let count = network.count(request.class())?;
        Ok(Self {
            request,
            count,
            rows: 0,
            record: StringRecord::with_capacity(16 * (count + 1), count + 1),
            state: State::Unopened,
        })
    }

    /// Create (truncating) the output file and write the header row.
    ///
    /// Entity types are looked up once here and assumed fixed for the run.
    pub fn open<Q: NetworkQuery + ?Sized>(&mut self, network: &Q) -> ExportResult<()> {
        if !matches!(self.state, State::Unopened) {
            return Err(self.invalid_state("be opened twice"));
        }
        let header = self.header(network)?;

        let path = &self.request.path;
        let mut out = WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_path(path)
            .map_err(|e| csv_error(path, e))?;
        out.write_record(&header).map_err(|e| csv_error(path, e))?;

        debug!(
            path = %path.display(),
            attribute = self.request.attribute.name(),
            entities = self.count,
            "opened export file"
        );
        self.state = State::Open(out);
        Ok(())
    }

    /// Header row: `time` then `<type label><index>` for every entity.
    pub fn header<Q: NetworkQuery + ?Sized>(&self, network: &Q) -> ExportResult<Vec<String>> {
        let class = self.request.class();
        let mut header = Vec::with_capacity(self.count + 1);
        header.push("time".to_string());
        for index in EntityIndex::range(self.count) {
            let code = network.entity_type(class, index)?;
            header.push(format!("{}{}", type_label(class, code)?, index));
        }
        Ok(header)
    }

    /// Query the bound attribute for every entity and append one row.
    ///
    /// A failing query leaves the file untouched; rows are never partial.
    pub fn write_step<Q: NetworkQuery + ?Sized>(
        &mut self,
        network: &Q,
        time: Seconds,
    ) -> ExportResult<()> {
        if !matches!(self.state, State::Open(_)) {
            return Err(self.invalid_state("write before open or after close"));
        }

        let class = self.request.class();
        let actual = network.count(class)?;
        if actual != self.count {
            return Err(ExportError::TopologyChanged {
                class,
                expected: self.count,
                actual,
            });
        }

        self.record.clear();
        self.record.push_field(&time.to_string());
        for index in EntityIndex::range(self.count) {
            let value = network.value(index, self.request.attribute)?;
            self.record.push_field(&value.to_string());
        }

        if let State::Open(out) = &mut self.state {
            out.write_record(&self.record)
                .map_err(|e| csv_error(&self.request.path, e))?;
        }
        self.rows += 1;
        Ok(())
    }

    /// Flush and release the file. Safe to call in any state and more than once.
    ///
    /// The file handle is released even when the flush fails.
    pub fn close(&mut self) -> ExportResult<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(mut out) => {
                let flushed = out.flush();
                drop(out);
                flushed.map_err(|source| ExportError::Io {
                    path: self.request.path.clone(),
                    source,
                })?;
                debug!(path = %self.request.path.display(), rows = self.rows, "closed export file");
                Ok(())
            }
            State::Unopened | State::Closed => Ok(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.request.path
    }

    pub fn attribute(&self) -> Attribute {
        self.request.attribute
    }

    pub fn entity_count(&self) -> usize {
        self.count
    }

    /// Data rows written so far (the header is not counted).
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    fn invalid_state(&self, what: &'static str) -> ExportError {
        ExportError::InvalidState {
            path: self.request.path.clone(),
            what,
        }
    }
}

impl Drop for ValueCsvWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close export file");
        }
    }
}

fn csv_error(path: &Path, source: csv::Error) -> ExportError {
    ExportError::Csv {
        path: PathBuf::from(path),
        source,
    }
}
