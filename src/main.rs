// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! `mandel`: renders one image on a pool of threads.

extern crate clap;
extern crate env_logger;
extern crate log;
extern crate mandel;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use log::warn;
use mandel::cli::{self, validate_range};
use mandel::{render_threaded, ImageParams, Schedule};

const THREADS: &str = "threads";
const WORK_STEALING: &str = "work-stealing";

fn args<'a>() -> ArgMatches<'a> {
    cli::view_args(
        App::new("mandel")
            .version("0.1.0")
            .about("Renders the Mandelbrot set on several threads")
            .after_help(
                "Some examples are:\n\
                 mandel -x -0.5 -y -0.5 -s 0.2\n\
                 mandel -x -.38 -y -.665 -s .05 -m 100\n\
                 mandel -x 0.286932 -y 0.014287 -s .0005 -m 1000 -n 8 -w",
            ),
    )
    .arg(
        Arg::with_name(THREADS)
            .short("n")
            .long(THREADS)
            .takes_value(true)
            .default_value("1")
            .validator(|s| {
                validate_range(
                    &s,
                    1,
                    4096,
                    "Could not parse thread count",
                    "Thread count must be between 1 and 4096",
                )
            })
            .help("Number of threads to run at one time"),
    )
    .arg(
        Arg::with_name(WORK_STEALING)
            .short("w")
            .long(WORK_STEALING)
            .help("Threads grab unprocessed rows from a common pool until the image is finished"),
    )
    .get_matches()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = args();
    let x_center: f64 = cli::value(&matches, cli::X_CENTER);
    let y_center: f64 = cli::value(&matches, cli::Y_CENTER);
    let scale: f64 = cli::value(&matches, cli::SCALE);
    let width: usize = cli::value(&matches, cli::WIDTH);
    let height: usize = cli::value(&matches, cli::HEIGHT);
    let max: u32 = cli::value(&matches, cli::MAX);
    let threads: usize = cli::value(&matches, THREADS);
    let output = matches.value_of(cli::OUTPUT).unwrap_or("mandel.bmp");
    let schedule = if matches.is_present(WORK_STEALING) {
        Schedule::WorkStealing
    } else {
        Schedule::Static
    };

    println!(
        "mandel: x={} y={} scale={} max={} outfile={} threads={} {}",
        x_center,
        y_center,
        scale,
        max,
        output,
        threads,
        if schedule == Schedule::WorkStealing { "(work stealing)" } else { "" }
    );

    let cpus = num_cpus::get();
    if threads > cpus {
        warn!("{} threads on {} logical CPUs", threads, cpus);
    }

    let params = ImageParams::centered(x_center, y_center, scale, width, height, max);
    let colors = cli::color_mapper(&matches);

    let raster = match render_threaded(&params, &colors, threads, schedule) {
        Ok(raster) => raster,
        Err(e) => {
            eprintln!("mandel: render failure: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = raster.save(output) {
        eprintln!("mandel: {}", e);
        std::process::exit(1);
    }
}
