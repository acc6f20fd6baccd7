// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn renders_a_small_image() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("small.bmp");
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-W", "10", "-H", "10", "-x", "0", "-y", "0", "-s", "2", "-m", "50", "-n", "4"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("threads=4"));

    let image = image::open(&out).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (10, 10));
}

#[test]
fn work_stealing_writes_the_same_image() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("static.png");
    let b = dir.path().join("stealing.png");
    let common = ["-W", "31", "-H", "17", "-x", "-0.5", "-s", "1.5", "-m", "80", "-p", "fire"];
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&common)
        .args(&["-n", "3", "-o"])
        .arg(&a)
        .assert()
        .success();
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&common)
        .args(&["-n", "5", "-w", "-o"])
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::contains("(work stealing)"));

    let a = image::open(&a).unwrap().to_rgba8();
    let b = image::open(&b).unwrap().to_rgba8();
    assert_eq!(a.into_raw(), b.into_raw());
}

#[test]
fn unwritable_output_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing").join("mandel.bmp");
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-W", "8", "-H", "8", "-m", "10", "-o"])
        .arg(&out)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("couldn't write to"))
        .stderr(predicate::str::contains(out.display().to_string()));
}

#[test]
fn rejects_nonsense_options() {
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-n", "0"])
        .assert()
        .failure();
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-W", "wide"])
        .assert()
        .failure();
}
