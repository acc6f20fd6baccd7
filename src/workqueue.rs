// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row partitioning and the shared work queue the render threads pull
//! from.
//!
//! The raster is cut into `RowRange`s before any thread starts.  The
//! ranges are consecutive and cover `[0, height)` exactly once, so the
//! queue can pair each range with its own `&mut` slice of the raster.
//! Claiming a range moves that slice out of the queue and into the
//! claiming thread: ownership of the rows changes hands, and the only
//! thing the lock ever guards is the hand-off itself.

use crate::planes::ImageParams;
use crate::raster::Raster;
use std::sync::{Mutex, PoisonError};

/// A half-open interval `[start, end)` of raster rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowRange {
    /// First row in the range.
    pub start: usize,
    /// One past the last row.
    pub end: usize,
}

impl RowRange {
    /// Number of rows covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for a range with no rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// How the raster is divided between threads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// One band per thread, each roughly `height / threads` rows.
    Static,
    /// One range per row; idle threads keep taking rows until none are
    /// left.
    WorkStealing,
}

/// Cuts `[0, height)` into ordered, consecutive ranges.
///
/// `Static` makes exactly `threads` ranges of `height / threads` rows,
/// with the last one stretched to `height` to absorb the remainder.
/// When there are more threads than rows that leaves leading ranges
/// empty, which is harmless.  `WorkStealing` makes `height` ranges of
/// one row each.
pub fn partition(height: usize, threads: usize, schedule: Schedule) -> Vec<RowRange> {
    let count = match schedule {
        Schedule::Static => threads.max(1),
        Schedule::WorkStealing => height,
    };
    if count == 0 {
        return Vec::new();
    }
    let step = height / count;
    let mut ranges: Vec<RowRange> = (0..count)
        .map(|i| RowRange {
            start: i * step,
            end: (i + 1) * step,
        })
        .collect();
    if let Some(last) = ranges.last_mut() {
        last.end = height;
    }
    ranges
}

/// One claimable unit of work: a range of rows, the parameters of the
/// image they belong to, and exclusive access to their pixels.
pub struct Band<'a> {
    /// Which rows of the raster these are.
    pub rows: RowRange,
    /// The render these rows belong to.
    pub params: &'a ImageParams,
    /// RGBA bytes for exactly `rows`, row-major.
    pub pixels: &'a mut [u8],
}

/// A fixed set of bands and a cursor over them, shared by reference
/// between render threads.
///
/// The cursor is the length of the pending list: a claim pops the
/// last band, so work is handed out from the back of the partition to
/// the front.  Every band is claimed exactly once.
pub struct WorkQueue<'a> {
    pending: Mutex<Vec<Band<'a>>>,
}

impl<'a> WorkQueue<'a> {
    /// Lends `raster` to the queue, one slice per range.  `ranges` must
    /// come from `partition` for this raster's height.
    pub fn new(params: &'a ImageParams, ranges: &[RowRange], raster: &'a mut Raster) -> WorkQueue<'a> {
        debug_assert!(ranges.windows(2).all(|w| w[0].end == w[1].start));
        let slices = raster.rows_mut(ranges.iter().map(RowRange::len));
        let pending = ranges
            .iter()
            .zip(slices)
            .map(|(rows, pixels)| Band {
                rows: *rows,
                params,
                pixels,
            })
            .collect();
        WorkQueue {
            pending: Mutex::new(pending),
        }
    }

    /// Takes the next unclaimed band, or `None` once the queue is
    /// drained.  The lock is held only for the pop.
    pub fn claim(&self) -> Option<Band<'a>> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
    }

    /// Bands not yet claimed.
    pub fn remaining(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
