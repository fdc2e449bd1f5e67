// End-to-end runs of both binaries against the mock panel.

use std::path::Path;
use std::process::{Command, Output};

use image::GenericImageView;

// Pins the config to an empty file so a system-wide
// /etc/inkypi/display.toml cannot leak into the run.
fn run(bin: &str, args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("display.toml");
    std::fs::write(&config, "").unwrap();

    Command::new(bin)
        .args(args)
        .env("INKYPI_CONFIG", &config)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn hotspot(args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_display-hotspot"), args)
}

fn status(args: &[&str]) -> Output {
    run(env!("CARGO_BIN_EXE_inkypi-status"), args)
}

fn png_size(path: &Path) -> (u32, u32) {
    let img = image::open(path).unwrap();
    (img.width(), img.height())
}

#[test]
fn too_few_arguments_prints_usage() {
    for args in [&[][..], &["ssid"][..], &["ssid", "password"][..]] {
        let out = hotspot(args);
        assert_eq!(out.status.code(), Some(1), "args {args:?}");
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.contains("Usage: display-hotspot <ssid> <password> <ip>"));
    }
}

#[test]
fn too_many_arguments_prints_usage() {
    let out = hotspot(&["a", "b", "c", "d"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage:"));
}

#[test]
fn help_exits_zero() {
    let out = hotspot(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--mock"));
}

#[test]
fn hotspot_renders_to_mock() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("hotspot.png");
    let png_arg = png.to_str().unwrap();

    let out = hotspot(&["InkyPi-Setup", "secret123", "192.168.4.1", "--mock", png_arg]);
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stdout));
    assert_eq!(png_size(&png), (400, 300));
}

#[test]
fn hotspot_accepts_hyphen_leading_values() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("hotspot.png");

    let out = hotspot(&["-MyNet", "-s3cret", "192.168.4.1", "--mock", png.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stdout));
    assert!(png.exists());
}

#[test]
fn hotspot_reads_config_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("phat.toml");
    std::fs::write(&cfg, "[display]\ntype = \"phat-ssd1608\"\n").unwrap();
    let png = dir.path().join("phat.png");

    let out = Command::new(env!("CARGO_BIN_EXE_display-hotspot"))
        .args(["s", "p", "10.0.0.1", "--mock", png.to_str().unwrap()])
        .env("INKYPI_CONFIG", &cfg)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(png_size(&png), (250, 122));
}

#[test]
fn hotspot_mock_follows_selected_type() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("phat.png");

    let out = hotspot(&[
        "InkyPi-Setup",
        "secret123",
        "192.168.4.1",
        "--type",
        "phat-ssd1608",
        "--colour",
        "red",
        "--align",
        "center",
        "--mock",
        png.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(png_size(&png), (250, 122));
}

#[test]
fn hotspot_bad_config_fails_initialisation() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("display.toml");
    std::fs::write(&cfg, "[display]\ntype = \"impression\"\n").unwrap();
    let png = dir.path().join("out.png");

    let out = hotspot(&[
        "s",
        "p",
        "10.0.0.1",
        "--config",
        cfg.to_str().unwrap(),
        "--mock",
        png.to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Failed to initialize display"));
    assert!(!png.exists());
}

#[test]
fn hotspot_unwritable_mock_fails_update() {
    let out = hotspot(&["s", "p", "10.0.0.1", "--mock", "/nonexistent/dir/out.png"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Failed to update display"));
}

#[test]
fn status_logs_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("status.png");
    let log = dir.path().join("eink-app.log");

    let out = status(&[
        "--mock",
        png.to_str().unwrap(),
        "--log-file",
        log.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    assert_eq!(png_size(&png), (400, 300));

    let logged = std::fs::read_to_string(&log).unwrap();
    assert!(logged.contains("Display updated successfully"));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Display updated successfully"));
}

#[test]
fn status_failure_is_logged_and_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("eink-app.log");

    let out = status(&[
        "--mock",
        "/nonexistent/dir/status.png",
        "--log-file",
        log.to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(std::fs::read_to_string(&log)
        .unwrap()
        .contains("Error in main application"));
}
