//! Shared "load pipeline" logic used by every front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> decode -> normalize -> flatten -> aggregate -> publish
//!
//! Front-ends only read the published `ChartState` and the formatters.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::data::Transport;
use crate::domain::{ChartState, Palette};
use crate::error::PipelineError;
use crate::io::{decode_table, normalize_all};
use crate::report::{format_currency, format_month_label};
use crate::series::{aggregate, flatten, max_value};

/// Formatters handed to a renderer together with the state.
#[derive(Debug, Clone, Copy)]
pub struct AxisFormatters {
    pub value: fn(f64) -> String,
    pub date: fn(NaiveDate) -> String,
}

impl Default for AxisFormatters {
    fn default() -> Self {
        Self {
            value: format_currency,
            date: format_month_label,
        }
    }
}

/// Run every synchronous stage on already-fetched text.
///
/// Every cell error of every record is collected before failing, so one run
/// reports all bad cells at once.
pub fn run_pipeline(raw: &str, palette: &Palette) -> Result<ChartState, PipelineError> {
    let table = decode_table(raw)?;
    let categories = table.categories();
    tracing::debug!(
        records = table.records.len(),
        categories = categories.len(),
        "decoded CSV"
    );

    let observations = normalize_all(&table.records).map_err(PipelineError::Values)?;
    let long_series = flatten(&observations);
    tracing::debug!(points = long_series.len(), "flattened to long format");

    // Cell errors are reported before palette errors.
    let stats = aggregate(&long_series, &categories, palette)?;
    let max_value = max_value(&long_series);

    Ok(ChartState {
        long_series,
        stats,
        max_value,
    })
}

/// Owns a transport and the published state.
///
/// Each `load` is one fetch plus one synchronous pipeline pass. A successful
/// run replaces the published snapshot as a whole; a failed run leaves it
/// untouched. Overlapping loads are not cancelled: whichever finishes last wins.
pub struct ChartPipeline {
    transport: Box<dyn Transport>,
    palette: Palette,
    state: watch::Sender<Option<Arc<ChartState>>>,
}

impl ChartPipeline {
    pub fn new(transport: impl Transport + 'static, palette: Palette) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            transport: Box::new(transport),
            palette,
            state,
        }
    }

    pub async fn load(&self) -> Result<Arc<ChartState>, PipelineError> {
        let source = self.transport.describe();
        tracing::debug!(%source, "fetching");

        let result = match self.transport.fetch().await {
            Ok(raw) => run_pipeline(&raw, &self.palette),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(state) => {
                let state = Arc::new(state);
                self.state.send_replace(Some(Arc::clone(&state)));
                tracing::info!(
                    %source,
                    points = state.long_series.len(),
                    categories = state.stats.len(),
                    "published chart state"
                );
                Ok(state)
            }
            Err(e) => {
                tracing::warn!(%source, error = %e, "load failed; keeping previous state");
                Err(e)
            }
        }
    }

    /// Latest published state, if any run has succeeded.
    pub fn state(&self) -> Option<Arc<ChartState>> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every successful publish.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<ChartState>>> {
        self.state.subscribe()
    }

    pub fn formatters(&self) -> AxisFormatters {
        AxisFormatters::default()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn source(&self) -> String {
        self.transport.describe()
    }
}
