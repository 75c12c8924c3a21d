//! `vqe-viz`: plot-ready projections of VQE optimization histories.
//!
//! Nothing here draws. The crate turns recorded parameters and states into
//! coordinate columns (2-D parameter paths, Bloch-sphere paths, landscape
//! grids) and exports them as JSON for an external plotter.
//!
//! ```rust
//! use num_complex::Complex64;
//! use vqe_viz::bloch;
//!
//! let p = bloch::project(&[Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)]).unwrap();
//! assert!((p.x - 1.0).abs() < 1e-12);
//! ```

pub mod bloch;
pub mod error;
pub mod export;
pub mod landscape;
pub mod path;

pub use bloch::{BlochPath, BlochPoint};
pub use error::{VizError, VizResult};
pub use export::{ExportConfig, PlotBundle, PlotStyle, Trace};
pub use landscape::Landscape;
pub use path::ParameterPath;

/// Every `stride`-th element of `items`, starting at index 0.
pub fn thin<T: Clone>(items: &[T], stride: usize) -> VizResult<Vec<T>> {
    if stride == 0 {
        return Err(VizError::InvalidStride);
    }
    Ok(items.iter().step_by(stride).cloned().collect())
}
