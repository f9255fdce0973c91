//! UI Components for the Dropload application.
//!
//! # Layout Components
//! - [`Hero`] - Main title and description
//!
//! # Feature Components
//! - [`UploadSection`] - Upload form with drag & drop and service choice
//! - [`FilePreview`] - Local image/video preview
//! - [`ProgressBar`] - Upload progress indicator
//! - [`ResultPanel`] / [`ErrorPanel`] - Outcome of the last submission

mod hero;
mod upload;
mod preview;
mod progress;
mod result;

pub use hero::*;
pub use upload::*;
pub use preview::*;
pub use progress::*;
pub use result::*;
