#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! Every pixel of the image is mapped to a point `c` on the complex
//! plane, and `z ← z² + c` is iterated from there until `z` runs off
//! past radius 2 or an iteration cap is reached.  The iteration count
//! becomes the pixel's colour.  Points that never escape are in the
//! Mandelbrot set.
//!
//! The per-pixel work is embarrassingly parallel, and this crate has
//! two ways of spreading it out:
//!
//! * `pool::render_threaded` renders one image on a fixed number of
//!   threads.  The raster's rows are cut into bands up front
//!   (`workqueue::partition`), either one band per thread or one row per
//!   band for work stealing, and threads pull bands from a shared
//!   `workqueue::WorkQueue` until it runs dry.  A claimed band carries
//!   exclusive access to its rows, so pixels are written without locks.
//!
//! * `sequence::run_sequence` renders a zoom, one whole frame per
//!   isolated worker process, never letting more than a fixed number of
//!   workers run at once.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate nix;
extern crate num;

pub mod cli;
pub mod colors;
pub mod errors;
pub mod escape;
pub mod planes;
pub mod pool;
pub mod raster;
pub mod sequence;
pub mod workqueue;

pub use colors::{ColorMapper, ColorMode, ColorScheme, Ramp};
pub use errors::RenderError;
pub use planes::{ImageParams, Pixel};
pub use pool::render_threaded;
pub use raster::Raster;
pub use sequence::{run_sequence, FrameDescriptor, Launcher, ProcessLauncher, ZoomPlan};
pub use workqueue::{partition, RowRange, Schedule, WorkQueue};
