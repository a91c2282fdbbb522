//! yardkit bundles small garden-design production tools behind one library and one CLI:
//!
//! - [`plan`]: render a garden plan scene (YAML/JSON) to PNG
//! - [`download`] and [`sheet`]: fetch images listed in a spreadsheet, insert images into one
//! - [`batch`]: convert and resize folders of images
//! - [`annotate`]: mark plants on a photo and export the listing
//! - [`video`]: extract first frames from `.mp4` files and file them into folders
#![forbid(unsafe_code)]

/// Plant annotator.
pub mod annotate;
/// Folder-level image conversion and resizing.
pub mod batch;
/// Spreadsheet-driven image downloads.
pub mod download;
/// Shared building blocks: errors, colors, filesystem and raster helpers.
pub mod foundation;
/// Garden plan renderer.
pub mod plan;
/// Spreadsheet reading and image insertion.
pub mod sheet;
/// First-frame extraction for videos.
pub mod video;

pub use crate::foundation::color::Color;
pub use crate::foundation::error::{YardError, YardResult};
