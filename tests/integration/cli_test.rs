//! Integration tests for the imgrot binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::write_png;

/// imgrot command with HOME pointed at `home`, so config and logs stay in
/// the temp dir.
fn imgrot(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("imgrot").expect("binary should build");
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn image_dir(temp: &TempDir) -> std::path::PathBuf {
    let dir = temp.path().join("images");
    for name in ["b.png", "a.png", "c.png"] {
        write_png(&dir.join(name), 2, 2);
    }
    fs::write(dir.join("readme.txt"), "ignored").unwrap();
    dir
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();

    imgrot(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn scan_prints_sorted_catalog() {
    let home = TempDir::new().unwrap();
    let dir = image_dir(&home);

    let output = imgrot(home.path()).arg("scan").arg(&dir).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("a.png"));
    assert!(lines[1].ends_with("b.png"));
    assert!(lines[2].ends_with("c.png"));
    assert_eq!(lines[3], "3 images");
}

#[test]
fn export_writes_every_row_by_default() {
    let home = TempDir::new().unwrap();
    let dir = image_dir(&home);
    let out = home.path().join("out.csv");

    imgrot(home.path())
        .arg("export")
        .arg(&dir)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 rows"));

    let csv = fs::read_to_string(&out).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows[0], "Image,Rotation Angle");
    assert_eq!(rows.len(), 4);
    assert!(rows[1].ends_with("a.png,0"));
    assert!(rows[3].ends_with("c.png,0"));
}

#[test]
fn export_lists_files_that_cannot_be_decoded() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("mixed");
    write_png(&dir.join("a.png"), 2, 2);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("broken.png"), b"not an image").unwrap();
    fs::write(dir.join("truncated.jpg"), [0xFF, 0xD8, 0xFF]).unwrap();
    let out = home.path().join("mixed.csv");

    imgrot(home.path())
        .arg("export")
        .arg(&dir)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 rows"));

    let csv = fs::read_to_string(&out).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 4);
    assert!(rows[2].ends_with("broken.png,0"));
    assert!(rows[3].ends_with("truncated.jpg,0"));
}

#[test]
fn export_upto_limits_rows() {
    let home = TempDir::new().unwrap();
    let dir = image_dir(&home);
    let out = home.path().join("first.csv");

    imgrot(home.path())
        .args(["export", "--upto", "0", "-o"])
        .arg(&out)
        .arg(&dir)
        .assert()
        .success();

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.lines().nth(1).unwrap().ends_with("a.png,0"));
}

#[test]
fn export_of_empty_directory_writes_header_only() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("empty");
    fs::create_dir_all(&dir).unwrap();
    let out = home.path().join("empty.csv");

    imgrot(home.path())
        .arg("export")
        .arg(&dir)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("No images found"));

    assert_eq!(fs::read_to_string(&out).unwrap(), "Image,Rotation Angle\n");
}

#[test]
fn missing_directory_fails() {
    let home = TempDir::new().unwrap();

    imgrot(home.path())
        .arg("scan")
        .arg(home.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}

#[test]
fn config_path_uses_home() {
    let home = TempDir::new().unwrap();
    let expected = home.path().join(".config").join("imgrot").join("config.toml");

    imgrot(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().as_ref()));
}

#[test]
fn config_show_reflects_file_and_defaults() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("imgrot");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[cache]\ngroup_size = 12\n").unwrap();

    imgrot(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("group_size = 12"))
        .stdout(predicate::str::contains("sensitivity = 0.2"));
}

#[test]
fn invalid_config_is_reported() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("imgrot");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[cache]\ngroup_size = 0\n").unwrap();

    imgrot(home.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn logging_goes_to_the_configured_file() {
    let home = TempDir::new().unwrap();
    let dir = image_dir(&home);

    imgrot(home.path()).arg("scan").arg(&dir).assert().success();

    assert!(home
        .path()
        .join(".config")
        .join("imgrot")
        .join("imgrot.log")
        .exists());
}
