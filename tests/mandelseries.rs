// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn renders_every_frame_of_a_zoom() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("mandelseries")
        .unwrap()
        .args(&["-W", "12", "-H", "9", "-m", "25", "-s", "0.5", "-f", "5", "-o"])
        .arg(dir.path().join("mandel.bmp"))
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("processes=2"));

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["mandel1.bmp", "mandel2.bmp", "mandel3.bmp", "mandel4.bmp", "mandel5.bmp"]
    );
    for name in names.iter() {
        let frame = image::open(dir.path().join(name)).unwrap();
        assert_eq!((frame.width(), frame.height()), (12, 9));
    }
}

#[test]
fn frames_zoom_in_towards_the_target() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("mandelseries")
        .unwrap()
        .args(&["-W", "16", "-H", "16", "-m", "40", "-x", "-0.75", "-s", "0.05", "-f", "3", "-o"])
        .arg(dir.path().join("z.png"))
        .arg("3")
        .assert()
        .success();

    // Tag 3 is the widest frame, tag 1 the closest.
    let wide = image::open(dir.path().join("z3.png")).unwrap().to_rgba8();
    let narrow = image::open(dir.path().join("z1.png")).unwrap().to_rgba8();
    assert_ne!(wide.into_raw(), narrow.into_raw());
}

#[test]
fn failed_frames_are_reported_and_the_rest_still_run() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("missing").join("mandel.bmp");
    Command::cargo_bin("mandelseries")
        .unwrap()
        .args(&["-W", "4", "-H", "4", "-m", "5", "-f", "3", "-o"])
        .arg(&base)
        .arg("2")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("mandel1.bmp"))
        .stderr(predicate::str::contains("mandel2.bmp"))
        .stderr(predicate::str::contains("mandel3.bmp"))
        .stderr(predicate::str::contains("frames failed"));
}
