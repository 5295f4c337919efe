//! `ExportSet`: the writers of one run, opened and closed as a unit.

use std::path::PathBuf;

use es_core::{AttributeRequest, Seconds};
use es_engine::NetworkQuery;
use tracing::{debug, warn};

use crate::error::ExportResult;
use crate::writer::ValueCsvWriter;

/// All active writers of a run, in open order.
///
/// Writers are pushed only after they opened successfully, and released in
/// reverse order on [`close`](Self::close), on a failed [`open`](Self::open)
/// and on drop. Every opened file is therefore closed exactly once, whatever
/// path the run takes out of the export phase.
#[derive(Default)]
pub struct ExportSet {
    writers: Vec<ValueCsvWriter>,
}

impl ExportSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Open one writer per request: node requests first, then link requests,
    /// each in list order.
    ///
    /// If any writer fails to open, the ones already opened are closed before
    /// the error is returned.
    pub fn open<Q: NetworkQuery + ?Sized>(
        nodes: Vec<AttributeRequest>,
        links: Vec<AttributeRequest>,
        network: &Q,
    ) -> ExportResult<Self> {
        let mut set = Self::empty();
        for request in nodes.into_iter().chain(links) {
            if let Err(e) = set.push(request, network) {
                set.release();
                return Err(e);
            }
        }
        debug!(writers = set.len(), "export set open");
        Ok(set)
    }

    fn push<Q: NetworkQuery + ?Sized>(
        &mut self,
        request: AttributeRequest,
        network: &Q,
    ) -> ExportResult<()> {
        let mut writer = ValueCsvWriter::new(request, network)?;
        writer.open(network)?;
        self.writers.push(writer);
        Ok(())
    }

    /// Append one row to every file, in open order.
    pub fn write_step<Q: NetworkQuery + ?Sized>(
        &mut self,
        network: &Q,
        time: Seconds,
    ) -> ExportResult<()> {
        for writer in &mut self.writers {
            writer.write_step(network, time)?;
        }
        Ok(())
    }

    /// Close every writer (last opened first) and return the file paths in
    /// open order. All writers are closed even if one fails; the first error
    /// is returned.
    pub fn close(mut self) -> ExportResult<Vec<PathBuf>> {
        let paths = self.paths();
        let mut first_err = None;
        while let Some(mut writer) = self.writers.pop() {
            if let Err(e) = writer.close() {
                warn!(error = %e, "failed to close export file");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(paths),
        }
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.writers.iter().map(|w| w.path().to_path_buf()).collect()
    }

    pub fn writers(&self) -> &[ValueCsvWriter] {
        &self.writers
    }

    fn release(&mut self) {
        while let Some(mut writer) = self.writers.pop() {
            if let Err(e) = writer.close() {
                warn!(error = %e, path = %writer.path().display(), "failed to close export file");
            }
        }
    }
}

impl Drop for ExportSet {
    fn drop(&mut self) {
        if !self.writers.is_empty() {
            debug!(writers = self.writers.len(), "releasing export set");
            self.release();
        }
    }
}
