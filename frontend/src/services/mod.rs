//! Browser services used by the upload controller.
//!
//! # Services
//!
//! - [`upload`] - multipart upload to the relay with progress events
//! - [`preview`] - local data-URL preview of the selected file

pub mod upload;
pub mod preview;

pub use upload::*;
pub use preview::*;
