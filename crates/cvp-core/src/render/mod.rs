//! Raster chart and PDF document renderers for a [`StructuredReport`].
//!
//! [`StructuredReport`]: crate::report::StructuredReport

pub mod chart;
pub mod pdf;

pub use chart::{encode_png, render_bar_chart, ChartArtifact};
pub use pdf::{export_pdf, write_document, ExportedDocument};
