// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line plumbing shared by `mandel` and `mandelseries`: option
//! names, validators, and the conversions from parsed matches into
//! render configuration.

use crate::colors::{ColorMapper, ColorMode, ColorScheme, Ramp};
use clap::{App, Arg, ArgMatches};
use std::ffi::OsString;
use std::str::FromStr;

/// Centre, real part.
pub const X_CENTER: &str = "x";
/// Centre, imaginary part.
pub const Y_CENTER: &str = "y";
/// Half-width of the view.
pub const SCALE: &str = "scale";
/// Raster width.
pub const WIDTH: &str = "width";
/// Raster height.
pub const HEIGHT: &str = "height";
/// Iteration cap.
pub const MAX: &str = "max";
/// Output file, or the base name of a sequence.
pub const OUTPUT: &str = "output";
/// Palette name or anchor list.
pub const PALETTE: &str = "palette";
/// Use discrete colouring.
pub const DISCRETE: &str = "discrete";
/// Smooth-colouring ramp.
pub const RAMP: &str = "ramp";

/// Checks that `s` parses as a `T`.
pub fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

/// Checks that `s` parses as a `T` within `low..=high`.
pub fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

/// Reads a value that clap has already validated.  Falls back to the
/// type's default only if the option is missing altogether, which the
/// declared defaults rule out.
pub fn value<T: FromStr + Default>(matches: &ArgMatches, name: &str) -> T {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .unwrap_or_default()
}

/// Adds the options every renderer understands: the view, the raster,
/// the output, and colouring.
pub fn view_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(
        Arg::with_name(X_CENTER)
            .short("x")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("0")
            .validator(|s| validate_number::<f64>(&s, "Could not parse x coordinate"))
            .help("X coordinate of image center point"),
    )
    .arg(
        Arg::with_name(Y_CENTER)
            .short("y")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value("0")
            .validator(|s| validate_number::<f64>(&s, "Could not parse y coordinate"))
            .help("Y coordinate of image center point"),
    )
    .arg(
        Arg::with_name(SCALE)
            .short("s")
            .long(SCALE)
            .takes_value(true)
            .default_value("4")
            .validator(|s| {
                validate_range(
                    &s,
                    std::f64::MIN_POSITIVE,
                    std::f64::MAX,
                    "Could not parse scale",
                    "Scale must be positive",
                )
            })
            .help("Scale of the image in Mandelbrot coordinates"),
    )
    .arg(
        Arg::with_name(WIDTH)
            .short("W")
            .takes_value(true)
            .default_value("500")
            .validator(|s| {
                validate_range(&s, 1, 65_535, "Could not parse width", "Width must be between 1 and 65535")
            })
            .help("Width of the image in pixels"),
    )
    .arg(
        Arg::with_name(HEIGHT)
            .short("H")
            .takes_value(true)
            .default_value("500")
            .validator(|s| {
                validate_range(&s, 1, 65_535, "Could not parse height", "Height must be between 1 and 65535")
            })
            .help("Height of the image in pixels"),
    )
    .arg(
        Arg::with_name(MAX)
            .short("m")
            .takes_value(true)
            .default_value("1000")
            .validator(|s| {
                validate_range(
                    &s,
                    1,
                    u32::max_value(),
                    "Could not parse iteration count",
                    "Iteration count must be at least 1",
                )
            })
            .help("The maximum number of iterations per point"),
    )
    .arg(
        Arg::with_name(OUTPUT)
            .short("o")
            .long(OUTPUT)
            .takes_value(true)
            .default_value("mandel.bmp")
            .help("Output file"),
    )
    .arg(
        Arg::with_name(PALETTE)
            .short("p")
            .long(PALETTE)
            .takes_value(true)
            .default_value("gray")
            .validator(|s| ColorScheme::from_str(&s).map(|_| ()))
            .help("gray, fire, ocean, or a list of r,g,b anchors, e.g. \"0,0,0 255,128,0 255,255,255\""),
    )
    .arg(
        Arg::with_name(DISCRETE)
            .long(DISCRETE)
            .help("Pick one palette anchor per band of iterations instead of blending"),
    )
    .arg(
        Arg::with_name(RAMP)
            .long(RAMP)
            .takes_value(true)
            .possible_values(&["linear", "sqrt", "inverse"])
            .default_value("linear")
            .help("How iteration counts are spread over the palette when blending"),
    )
}

/// The colour mapper described by the palette options.
pub fn color_mapper(matches: &ArgMatches) -> ColorMapper {
    let scheme = matches
        .value_of(PALETTE)
        .and_then(|s| ColorScheme::from_str(s).ok())
        .unwrap_or_else(ColorScheme::gray);
    let mode = if matches.is_present(DISCRETE) {
        ColorMode::Discrete
    } else {
        ColorMode::Smooth(
            matches
                .value_of(RAMP)
                .and_then(|s| Ramp::from_str(s).ok())
                .unwrap_or(Ramp::Linear),
        )
    };
    ColorMapper::new(scheme, mode)
}

/// Re-creates the colouring and raster options as arguments, so a child
/// process renders with exactly the same settings.
pub fn forwarded_args(matches: &ArgMatches) -> Vec<OsString> {
    let flags = [
        (X_CENTER, "-x"),
        (Y_CENTER, "-y"),
        (WIDTH, "-W"),
        (HEIGHT, "-H"),
        (MAX, "-m"),
        (PALETTE, "--palette"),
        (RAMP, "--ramp"),
    ];
    let mut args = Vec::new();
    for (name, flag) in flags.iter() {
        if let Some(v) = matches.value_of_os(name) {
            args.push(OsString::from(flag));
            args.push(v.to_os_string());
        }
    }
    if matches.is_present(DISCRETE) {
        args.push(OsString::from("--discrete"));
    }
    args
}
