// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong in a render.  The numeric path
//! (mapping, iterating, colouring) cannot fail; only the edges do:
//! starting workers, waiting for them, and writing files.

use failure::Fail;
use std::io;

/// Failures at the concurrency and I/O boundary of a render.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A worker thread or frame process could not be started.  Fatal to
    /// the whole render.
    #[fail(display = "could not start {}: {}", worker, source)]
    Spawn {
        /// Which worker, e.g. `thread 3` or `frame 17`.
        worker: String,
        /// What the operating system said.
        #[fail(cause)]
        source: io::Error,
    },

    /// A render thread panicked before finishing its rows.
    #[fail(display = "render worker {} panicked", worker)]
    WorkerPanicked {
        /// Index of the thread.
        worker: usize,
    },

    /// The raster could not be written.
    #[fail(display = "couldn't write to {}: {}", path, source)]
    Save {
        /// Destination that was attempted.
        path: String,
        /// Encoder or file system error.
        #[fail(cause)]
        source: image::ImageError,
    },

    /// Waiting on frame workers failed for a reason other than there
    /// being none left.
    #[fail(display = "could not reap frame workers: {}", _0)]
    Reap(#[fail(cause)] nix::Error),
}
