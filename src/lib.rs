// SPDX-License-Identifier: MPL-2.0
//! Embeddable playback and contrast core for multi-frame image stack
//! viewers.
//!
//! The crate turns an in-memory movie tensor into presentable display
//! state: a percentile-based contrast auto-ranging engine built on the
//! movie's pixel-value histogram, a playback clock with repeat and
//! auto-stop semantics, and a registry that synchronizes the frame cursor
//! across grouped viewers. Rendering, decoding, and file I/O stay with the
//! host application.
//!
//! # Example
//!
//! ```
//! use ndarray::Array3;
//! use stack_lens::tensor::MovieTensor;
//! use stack_lens::viewer::{LoadOptions, ViewerRegistry};
//!
//! let mut registry = ViewerRegistry::new();
//! let id = registry.create_viewer();
//!
//! let movie = MovieTensor::Gray(Array3::from_shape_fn((64, 64, 30), |(r, c, f)| {
//!     (r + c + f) as f64
//! }));
//! registry.load(id, movie, LoadOptions::default());
//!
//! registry.set_frame(id, 12);
//! assert_eq!(registry.current_frame(id), Some(12));
//!
//! let range = registry.viewer(id).unwrap().pixel_range();
//! assert!(range.hi > range.lo);
//! ```

pub mod config;
pub mod contrast;
pub mod error;
pub mod histogram;
pub mod playback;
pub mod tensor;
pub mod viewer;

#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result};
