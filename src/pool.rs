// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The threaded renderer.
//!
//! A fixed number of scoped threads share one `WorkQueue`.  Each
//! thread loops: claim a band, compute every pixel in it, repeat until
//! the queue is empty.  Because a claimed band carries its own `&mut`
//! slice of the raster, threads write pixels without any locking; the
//! queue's mutex is touched once per band and never while computing.

use crate::colors::ColorMapper;
use crate::errors::RenderError;
use crate::escape::iterations_at_point;
use crate::planes::{ImageParams, Pixel};
use crate::raster::{Raster, CHANNELS};
use crate::workqueue::{partition, Schedule, WorkQueue};
use itertools::iproduct;
use log::{debug, info};
use std::time::Instant;

/// Computes every pixel of `rows` of the image described by `params`,
/// writing RGBA bytes into `pixels`, which holds exactly those rows.
/// This is the whole per-pixel pipeline: plane mapping, escape time,
/// colour.
pub fn render_rows(
    params: &ImageParams,
    colors: &ColorMapper,
    rows: std::ops::Range<usize>,
    pixels: &mut [u8],
) {
    let first = rows.start;
    let stride = params.width * CHANNELS;
    for (row, column) in iproduct!(rows, 0..params.width) {
        let point = params.pixel_to_point(Pixel(column, row));
        let color = colors.color(iterations_at_point(point, params.max), params.max);
        let offset = (row - first) * stride + column * CHANNELS;
        pixels[offset..offset + CHANNELS].copy_from_slice(&color.0);
    }
}

/// One thread's share of the render: keep claiming bands until there
/// are none left.  Returns how many bands this thread rendered.
fn drain(queue: &WorkQueue, colors: &ColorMapper) -> usize {
    let mut bands = 0;
    while let Some(band) = queue.claim() {
        render_rows(band.params, colors, band.rows.start..band.rows.end, band.pixels);
        bands += 1;
    }
    bands
}

/// Renders the image described by `params` on `threads` threads and
/// returns the finished raster.
///
/// `Schedule::Static` gives each thread one band; `WorkStealing` lets
/// threads pull single rows until the image is done.  The output is
/// identical either way.  Failing to start any thread is fatal; threads
/// that did start are still joined before the error is returned.
pub fn render_threaded(
    params: &ImageParams,
    colors: &ColorMapper,
    threads: usize,
    schedule: Schedule,
) -> Result<Raster, RenderError> {
    let started = Instant::now();
    let threads = threads.max(1);
    let mut raster = Raster::new(params.width, params.height);
    let ranges = partition(params.height, threads, schedule);
    debug!(
        "{} rows in {} bands across {} threads ({:?})",
        params.height,
        ranges.len(),
        threads,
        schedule
    );

    {
        let queue = WorkQueue::new(params, &ranges, &mut raster);
        let queue = &queue;
        let outcome = crossbeam::scope(|scope| -> Result<(), RenderError> {
            let mut handles = Vec::with_capacity(threads);
            for id in 0..threads {
                let handle = scope
                    .builder()
                    .name(format!("mandel-{}", id))
                    .spawn(move |_| drain(queue, colors))
                    .map_err(|source| RenderError::Spawn {
                        worker: format!("thread {}", id),
                        source,
                    })?;
                handles.push(handle);
            }
            for (id, handle) in handles.into_iter().enumerate() {
                let bands = handle
                    .join()
                    .map_err(|_| RenderError::WorkerPanicked { worker: id })?;
                debug!("thread {} rendered {} bands", id, bands);
            }
            Ok(())
        });
        match outcome {
            Ok(result) => result?,
            Err(_) => return Err(RenderError::WorkerPanicked { worker: threads }),
        }
    }

    info!(
        "rendered {}x{} with {} threads ({:?}) in {:.3?}",
        params.width,
        params.height,
        threads,
        schedule,
        started.elapsed()
    );
    Ok(raster)
}

/// Renders the whole image on the calling thread.
pub fn render_single(params: &ImageParams, colors: &ColorMapper, raster: &mut Raster) {
    let height = raster.height();
    let mut bands = raster.rows_mut(Some(height));
    if let Some(pixels) = bands.pop() {
        render_rows(params, colors, 0..height, pixels);
    }
}
