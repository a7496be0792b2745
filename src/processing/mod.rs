//! Media file processing

pub mod image;
pub mod pipeline;
pub mod reconcile;

pub use self::image::ImageLoader;
pub use pipeline::{Loader, PipelineOptions, PipelineReport};
pub use reconcile::{ReconcileReport, Reconciler};
