//! CSV position snapshots.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use cm_core::{AgentId, Coord, Tick};

use crate::{SimError, SimObserver, SimResult};

/// A [`SimObserver`] that writes one `tick,agent,x,y` row per agent at every
/// snapshot, and a `stuck` row whenever an agent cannot be routed.
///
/// Errors from the writer are stored because observer methods have no
/// return value.  Check [`take_error`](Self::take_error) after the run.
pub struct CsvSnapshotObserver<W: Write> {
    writer:     Writer<W>,
    last_error: Option<SimError>,
}

impl CsvSnapshotObserver<File> {
    pub fn create(path: &Path) -> SimResult<Self> {
        Self::new(Writer::from_path(path)?)
    }
}

impl<W: Write> CsvSnapshotObserver<W> {
    /// Wrap `writer` and write the header row.
    pub fn new(mut writer: Writer<W>) -> SimResult<Self> {
        writer.write_record(["tick", "agent", "x", "y", "event"])?;
        Ok(Self { writer, last_error: None })
    }

    /// The first write error, if any.
    pub fn take_error(&mut self) -> Option<SimError> {
        self.last_error.take()
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> SimResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| SimError::Csv(csv::Error::from(e.into_error())))
    }

    fn row(&mut self, tick: Tick, agent: AgentId, at: Coord, event: &str) {
        let result = self.writer.write_record(&[
            tick.0.to_string(),
            agent.0.to_string(),
            format!("{:.2}", at.x),
            format!("{:.2}", at.y),
            event.to_string(),
        ]);
        self.store_err(result);
    }

    fn store_err(&mut self, result: csv::Result<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e.into());
            }
        }
    }
}

impl<W: Write> SimObserver for CsvSnapshotObserver<W> {
    fn on_stuck(&mut self, tick: Tick, agent: AgentId, at: Coord) {
        self.row(tick, agent, at, "stuck");
    }

    fn on_snapshot(&mut self, tick: Tick, positions: &[Coord]) {
        for (i, &at) in positions.iter().enumerate() {
            self.row(tick, AgentId::from_index(i), at, "position");
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.flush().map_err(csv::Error::from);
        self.store_err(result);
    }
}
