//! Batch pipelines behind the three command-line tools

pub mod batch;
pub mod exporter;
pub mod importer;
pub mod labeler;


pub use batch::{default_threads, list_inputs, run_batch, RunSummary};
pub use exporter::{export_file, run_export, ExportOptions, ImageFormat};
pub use importer::{import_file, run_import, ImportOptions};
pub use labeler::{rasterize_image, run_rasterize, RasterizeOptions};
