// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `mandelseries`: renders a zoom into the Mandelbrot set, one frame per
//! worker process, with a cap on how many run at once.
//!
//! The same executable is the frame worker: when started with the
//! hidden `--worker TAG` option it renders just the one frame described
//! by its other options and exits.

extern crate clap;
extern crate env_logger;
extern crate log;
extern crate mandel;

use clap::{App, Arg, ArgMatches};
use log::{debug, warn};
use mandel::cli::{self, validate_range};
use mandel::sequence::{plan_frames, render_frame, FrameDescriptor};
use mandel::{run_sequence, ImageParams, ProcessLauncher, ZoomPlan};
use std::path::PathBuf;

const PROCESSES: &str = "processes";
const FRAMES: &str = "frames";
const START_SCALE: &str = "start-scale";
const WORKER: &str = "worker";

fn args<'a>() -> ArgMatches<'a> {
    cli::view_args(
        App::new("mandelseries")
            .version("0.1.0")
            .about("Renders a zoom into the Mandelbrot set, one process per frame")
            .after_help(
                "Frames are written next to the output file with the frame number\n\
                 before the extension: -o mandel.bmp gives mandel50.bmp ... mandel1.bmp\n\n\
                 Some examples are:\n\
                 mandelseries -x -0.5 -y -0.5 -s 0.2 4\n\
                 mandelseries -x 0.286932 -y 0.014287 -s .0005 -m 1000 -f 120 8",
            ),
    )
    .arg(
        Arg::with_name(PROCESSES)
            .index(1)
            .default_value("1")
            .validator(|s| {
                validate_range(
                    &s,
                    1,
                    1024,
                    "Could not parse process count",
                    "Process count must be between 1 and 1024",
                )
            })
            .help("The number of processes to run at one time"),
    )
    .arg(
        Arg::with_name(FRAMES)
            .short("f")
            .long(FRAMES)
            .takes_value(true)
            .default_value("50")
            .validator(|s| {
                validate_range(
                    &s,
                    1,
                    100_000,
                    "Could not parse frame count",
                    "Frame count must be between 1 and 100000",
                )
            })
            .help("Number of frames in the zoom"),
    )
    .arg(
        Arg::with_name(START_SCALE)
            .long(START_SCALE)
            .takes_value(true)
            .default_value("2")
            .validator(|s| {
                validate_range(
                    &s,
                    std::f64::MIN_POSITIVE,
                    std::f64::MAX,
                    "Could not parse start scale",
                    "Start scale must be positive",
                )
            })
            .help("Scale of the first frame; the zoom heads from here towards -s"),
    )
    .arg(
        Arg::with_name(WORKER)
            .long(WORKER)
            .takes_value(true)
            .hidden(true)
            .validator(|s| cli::validate_number::<usize>(&s, "Could not parse frame tag")),
    )
    .get_matches()
}

/// Runs inside a child process: render one frame, save it, exit.
fn worker(matches: &ArgMatches) -> i32 {
    let tag: usize = cli::value(matches, WORKER);
    let scale: f64 = cli::value(matches, cli::SCALE);
    let frame = FrameDescriptor {
        tag,
        scale,
        path: PathBuf::from(matches.value_of_os(cli::OUTPUT).unwrap_or_default()),
        params: ImageParams::centered(
            cli::value(matches, cli::X_CENTER),
            cli::value(matches, cli::Y_CENTER),
            scale,
            cli::value(matches, cli::WIDTH),
            cli::value(matches, cli::HEIGHT),
            cli::value(matches, cli::MAX),
        ),
    };
    debug!("frame {} rendering to {}", tag, frame.path.display());
    match render_frame(&frame, &cli::color_mapper(matches)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} [{}] mandelseries: {}", tag, std::process::id(), e);
            1
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = args();
    if matches.is_present(WORKER) {
        std::process::exit(worker(&matches));
    }

    let x_center: f64 = cli::value(&matches, cli::X_CENTER);
    let y_center: f64 = cli::value(&matches, cli::Y_CENTER);
    let processes: usize = cli::value(&matches, PROCESSES);
    let output = matches.value_of(cli::OUTPUT).unwrap_or("mandel.bmp");
    let plan = ZoomPlan {
        frames: cli::value(&matches, FRAMES),
        start_scale: cli::value(&matches, START_SCALE),
        target_scale: cli::value(&matches, cli::SCALE),
    };
    let max: u32 = cli::value(&matches, cli::MAX);

    println!(
        "mandel: x={} y={} scale={} max={} outfile={} processes={}",
        x_center, y_center, plan.target_scale, max, output, processes
    );

    let frames = plan_frames(
        &plan,
        (x_center, y_center),
        (cli::value(&matches, cli::WIDTH), cli::value(&matches, cli::HEIGHT)),
        max,
        output,
    );

    let outcome = ProcessLauncher::current_exe(cli::forwarded_args(&matches))
        .and_then(|mut launcher| run_sequence(frames, processes, &mut launcher));
    match outcome {
        Ok(ref report) if report.succeeded() => {}
        Ok(report) => {
            let failed: Vec<String> = report.failed.iter().map(|t| t.to_string()).collect();
            warn!("{} of {} frames failed", report.failed.len(), report.dispatched);
            eprintln!("mandelseries: frames failed: {}", failed.join(", "));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("mandelseries: {}", e);
            std::process::exit(1);
        }
    }
}
