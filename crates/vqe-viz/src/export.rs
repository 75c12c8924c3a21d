//! Plot bundles and their JSON export.
//!
//! A [`PlotBundle`] holds everything an external plotter needs to draw the
//! comparison figures: the optional energy landscape and one [`Trace`] per
//! optimizer run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use vqe_core::RunOutcome;

use crate::bloch::BlochPath;
use crate::error::{VizError, VizResult};
use crate::landscape::Landscape;
use crate::path::ParameterPath;

/// Export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Whether to pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Figure settings passed through to the plotter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    /// Figure size in inches.
    #[serde(default = "default_figsize")]
    pub figsize: [f64; 2],
    /// Path line width.
    #[serde(default = "default_linewidth")]
    pub linewidth: f64,
    /// Marker size for thinned points.
    #[serde(default = "default_pointsize")]
    pub pointsize: f64,
}

fn default_figsize() -> [f64; 2] {
    [6.0, 6.0]
}

fn default_linewidth() -> f64 {
    1.0
}

fn default_pointsize() -> f64 {
    20.0
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            figsize: default_figsize(),
            linewidth: default_linewidth(),
            pointsize: default_pointsize(),
        }
    }
}

/// One optimizer run, ready to draw.
///
/// Lines use the full paths; markers use every `stride`-th point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Legend label.
    pub label: String,
    /// Matplotlib-style color.
    pub color: String,
    /// Marker thinning interval.
    pub stride: usize,
    /// Recorded energies.
    pub energies: Vec<f64>,
    /// Path through (θ₀, θ₁), when the run had two parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<ParameterPath>,
    /// Bloch-sphere path, when single-qubit states were recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloch: Option<BlochPath>,
}

impl Trace {
    /// Build a trace from a finished run.
    ///
    /// The parameter path is attached only for two-parameter runs and the
    /// Bloch path only when states were recorded; a recorded state that is
    /// not single-qubit is an error.
    pub fn from_outcome(
        label: impl Into<String>,
        color: impl Into<String>,
        outcome: &RunOutcome,
        stride: usize,
    ) -> VizResult<Self> {
        if stride == 0 {
            return Err(VizError::InvalidStride);
        }
        let history = &outcome.history;
        let params = match history.params().first() {
            Some(first) if first.len() == 2 => Some(ParameterPath::from_history(history.params())?),
            _ => None,
        };
        let bloch = if history.states().is_empty() {
            None
        } else {
            Some(BlochPath::from_states(history.states())?)
        };
        Ok(Self {
            label: label.into(),
            color: color.into(),
            stride,
            energies: history.energies().to_vec(),
            params,
            bloch,
        })
    }
}

/// Landscape plus traces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotBundle {
    /// Figure settings.
    #[serde(default)]
    pub style: PlotStyle,
    /// Background energy landscape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landscape: Option<Landscape>,
    /// Runs to overlay.
    #[serde(default)]
    pub traces: Vec<Trace>,
}

impl PlotBundle {
    /// An empty bundle with default styling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a landscape.
    pub fn with_landscape(mut self, landscape: Landscape) -> Self {
        self.landscape = Some(landscape);
        self
    }

    /// Add a trace.
    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    /// Override figure settings.
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }
}

/// Serialize any export payload to a JSON string.
pub fn to_json<T: Serialize + ?Sized>(value: &T, config: &ExportConfig) -> VizResult<String> {
    if config.pretty {
        serde_json::to_string_pretty(value).map_err(VizError::from)
    } else {
        serde_json::to_string(value).map_err(VizError::from)
    }
}

/// Write any export payload to a JSON file.
pub fn to_file<T: Serialize + ?Sized>(value: &T, path: &Path, config: &ExportConfig) -> VizResult<()> {
    let json = to_json(value, config)?;
    std::fs::write(path, json)
        .map_err(|e| VizError::Io(format!("failed to write {}: {}", path.display(), e)))
}
