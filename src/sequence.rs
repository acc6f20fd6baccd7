// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The zoom-sequence pipeline.
//!
//! A sequence is a run of frames whose scale shrinks linearly from a
//! starting scale towards a target.  Every frame is rendered start to
//! finish by its own isolated worker with a private raster, so nothing
//! is shared between frames while they run.  The dispatching side does
//! only lifecycle accounting: it counts active workers, and once the
//! count reaches the limit it reaps one finished worker before starting
//! the next.  After the last frame is dispatched it drains every
//! remaining worker.
//!
//! How a worker is started and reaped is behind the `Launcher` trait.
//! `ProcessLauncher` re-runs the current executable as a child process
//! per frame and reaps children with `wait(2)`.

use crate::colors::ColorMapper;
use crate::errors::RenderError;
use crate::planes::ImageParams;
use crate::pool::render_single;
use crate::raster::Raster;
use image::Rgba;
use log::{debug, info, warn};
use nix::errno::Errno;
use nix::sys::wait::{wait, WaitStatus};
use nix::unistd::Pid;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Every frame starts out this colour before it is computed.
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// Where a zoom starts and ends, and in how many frames.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomPlan {
    /// Number of frames, `F`.
    pub frames: usize,
    /// Scale of the first frame.
    pub start_scale: f64,
    /// Scale the zoom heads towards.
    pub target_scale: f64,
}

impl ZoomPlan {
    /// Scale of frame `index` (0-based): the start scale, less
    /// `index / frames` of the distance to the target.
    pub fn scale_at(&self, index: usize) -> f64 {
        let step = (self.start_scale - self.target_scale) / self.frames as f64;
        self.start_scale - step * index as f64
    }
}

/// Everything one frame worker needs, owned outright.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameDescriptor {
    /// Identity of the frame; also the number in its file name.
    pub tag: usize,
    /// The scale this frame was built from.
    pub scale: f64,
    /// Where the frame is saved.
    pub path: PathBuf,
    /// This frame's own view of the plane.
    pub params: ImageParams,
}

/// Derives a frame's file name from the sequence's base name: the
/// extension of the last path component is stripped, the tag appended,
/// and the extension put back (`bmp` if there was none).
///
/// `frame_file_name("mandel.bmp", 7)` is `mandel7.bmp`.
pub fn frame_file_name<P: AsRef<Path>>(base: P, tag: usize) -> PathBuf {
    let base = base.as_ref();
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = base
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bmp".to_string());
    base.with_file_name(format!("{}{}.{}", stem, tag, extension))
}

/// Builds the descriptors for a whole zoom around `center`, in
/// dispatch order.  Tags count down from `frames` to 1, so the widest
/// frame carries the highest number.
pub fn plan_frames<P: AsRef<Path>>(
    plan: &ZoomPlan,
    center: (f64, f64),
    size: (usize, usize),
    max: u32,
    base: P,
) -> Vec<FrameDescriptor> {
    (0..plan.frames)
        .map(|index| {
            let tag = plan.frames - index;
            let scale = plan.scale_at(index);
            FrameDescriptor {
                tag,
                scale,
                path: frame_file_name(base.as_ref(), tag),
                params: ImageParams::centered(center.0, center.1, scale, size.0, size.1, max),
            }
        })
        .collect()
}

/// The worker side of a frame: fill the background, compute every
/// pixel on this thread, save.
pub fn render_frame(frame: &FrameDescriptor, colors: &ColorMapper) -> Result<(), RenderError> {
    let mut raster = Raster::new(frame.params.width, frame.params.height);
    raster.fill(BACKGROUND);
    render_single(&frame.params, colors, &mut raster);
    raster.save(&frame.path)
}

/// A worker that has terminated and been reaped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Reaped {
    /// Tag of the frame it was rendering.
    pub tag: usize,
    /// Whether it reported success.
    pub success: bool,
}

/// Starts frame workers and waits for them to finish.
pub trait Launcher {
    /// Starts a worker for `frame`.  Must not wait for it.
    fn launch(&mut self, frame: &FrameDescriptor) -> Result<(), RenderError>;

    /// Blocks until any one running worker terminates and returns it,
    /// or `None` when no workers are running.
    fn reap(&mut self) -> Result<Option<Reaped>, RenderError>;
}

/// What happened to a sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceReport {
    /// Frames dispatched.
    pub dispatched: usize,
    /// Frames whose worker was reaped.
    pub reaped: usize,
    /// Highest number of workers running at once.
    pub peak_active: usize,
    /// Tags of frames whose worker failed, in reap order.
    pub failed: Vec<usize>,
}

impl SequenceReport {
    /// True when every dispatched frame was reaped successfully.
    pub fn succeeded(&self) -> bool {
        self.failed.is_empty() && self.reaped == self.dispatched
    }

    fn record(&mut self, reaped: Reaped) {
        self.reaped += 1;
        if reaped.success {
            debug!("frame {} finished", reaped.tag);
        } else {
            warn!("frame {} failed", reaped.tag);
            self.failed.push(reaped.tag);
        }
    }
}

/// Runs `frames` through `launcher` with at most `limit` workers alive
/// at once.
///
/// A failed launch aborts the sequence immediately.  A worker that
/// fails is only recorded; it does not stop its siblings.
pub fn run_sequence<L, I>(frames: I, limit: usize, launcher: &mut L) -> Result<SequenceReport, RenderError>
where
    L: Launcher,
    I: IntoIterator<Item = FrameDescriptor>,
{
    let limit = limit.max(1);
    let mut report = SequenceReport::default();
    let mut active = 0;

    for frame in frames {
        launcher.launch(&frame)?;
        debug!("dispatched frame {} (scale {}) to {}", frame.tag, frame.scale, frame.path.display());
        report.dispatched += 1;
        active += 1;
        report.peak_active = report.peak_active.max(active);

        while active >= limit {
            match launcher.reap()? {
                Some(reaped) => report.record(reaped),
                None => warn!("{} workers unaccounted for", active),
            }
            active -= 1;
        }
    }

    while active > 0 {
        match launcher.reap()? {
            Some(reaped) => report.record(reaped),
            None => {
                warn!("{} workers unaccounted for", active);
                break;
            }
        }
        active -= 1;
    }

    info!(
        "sequence done: {} frames, {} failed, at most {} at once",
        report.dispatched,
        report.failed.len(),
        report.peak_active
    );
    Ok(report)
}

/// Launches each frame as a child process running `program` with
/// `args`, followed by the frame's own `--worker`, `--scale` and
/// `--output` options.  Children are reaped with `wait(2)`, so whatever
/// finishes first is reaped first.
pub struct ProcessLauncher {
    program: PathBuf,
    args: Vec<OsString>,
    running: HashMap<Pid, usize>,
}

impl ProcessLauncher {
    /// Children will run `program args... --worker TAG --scale S --output PATH`.
    pub fn new(program: PathBuf, args: Vec<OsString>) -> ProcessLauncher {
        ProcessLauncher {
            program,
            args,
            running: HashMap::new(),
        }
    }

    /// Re-runs the executable that is currently running.
    pub fn current_exe(args: Vec<OsString>) -> Result<ProcessLauncher, RenderError> {
        let program = std::env::current_exe().map_err(|source| RenderError::Spawn {
            worker: "frame workers".to_string(),
            source,
        })?;
        Ok(ProcessLauncher::new(program, args))
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&mut self, frame: &FrameDescriptor) -> Result<(), RenderError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg("--worker")
            .arg(frame.tag.to_string())
            .arg("--scale")
            .arg(frame.scale.to_string())
            .arg("--output")
            .arg(&frame.path)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                worker: format!("frame {}", frame.tag),
                source,
            })?;
        // Reaping goes through wait(2), not the Child handle.
        self.running.insert(Pid::from_raw(child.id() as i32), frame.tag);
        Ok(())
    }

    fn reap(&mut self) -> Result<Option<Reaped>, RenderError> {
        loop {
            let (pid, success) = match wait() {
                Ok(WaitStatus::Exited(pid, code)) => (pid, code == 0),
                Ok(WaitStatus::Signaled(pid, signal, _)) => {
                    warn!("frame worker {} killed by {:?}", pid, signal);
                    (pid, false)
                }
                Ok(_) => continue,
                Err(Errno::EINTR) => continue,
                Err(Errno::ECHILD) => return Ok(None),
                Err(err) => return Err(RenderError::Reap(err)),
            };
            match self.running.remove(&pid) {
                Some(tag) => return Ok(Some(Reaped { tag, success })),
                None => warn!("reaped unknown child {}", pid),
            }
        }
    }
}
