//! End-to-end CLI tests: run the binary against content trees and inspect
//! the generated site.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture_content() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

fn run(args: &[&str], source: &Path, work: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_simple-invite"))
        .args(args)
        .arg("--source")
        .arg(source)
        .arg("--output")
        .arg(work.join("dist"))
        .arg("--temp-dir")
        .arg(work.join("tmp"))
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run simple-invite")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn build_fixture_site() {
    let work = TempDir::new().unwrap();
    let out = run(&["build"], &fixture_content(), work.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let html = fs::read_to_string(work.path().join("dist/index.html")).unwrap();
    assert!(html.contains("<title>Ravuri's Wedding Invitation</title>"));
    assert!(html.contains(r#"Durga Sai <span class="amp">&amp;</span> Ashiervachita"#));
    assert_eq!(html.matches(r#"<article class="event">"#).count(), 3);
    assert!(html.contains("Lake View Apartment"));
    assert!(html.contains(r#"<span class="label">Address</span>"#));
    assert!(html.contains("&quot;zoomMax&quot;:3.0"));
    assert!(html.contains("&quot;count&quot;:3"));
    assert!(html.contains("#e0b86f"));
    assert_eq!(html.matches(r#"class="thumb""#).count(), 3);
    assert!(!html.contains(r#"class="notice""#));

    let dist = work.path().join("dist");
    assert!(dist.join("gallery/first-look.png").exists());
    assert!(dist.join("gallery/previews/first-look-480.png").exists());
    assert!(dist.join("gallery/previews/mandapam-480.png").exists());
    assert!(dist.join("gallery/previews/sangeet-480.png").exists());
    assert!(work.path().join("tmp/manifest.json").exists());

    let text = stdout(&out);
    assert!(text.contains("==> Stage 1"));
    assert!(text.contains("001 Haldi"));
    assert!(text.contains("Gallery (local, 3 photos)"));
    assert!(text.contains("==> Build complete"));
}

#[test]
fn scan_then_generate() {
    let work = TempDir::new().unwrap();
    let scan = run(&["scan"], &fixture_content(), work.path());
    assert!(scan.status.success());
    assert!(!work.path().join("dist").exists());

    let generate = run(&["generate"], &fixture_content(), work.path());
    assert!(generate.status.success());
    assert!(work.path().join("dist/index.html").exists());
    assert!(stdout(&generate).contains("Gallery previews"));
}

#[test]
fn missing_invitation_still_builds_with_notice() {
    let content = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let out = run(&["build"], content.path(), work.path());
    assert!(out.status.success());

    let html = fs::read_to_string(work.path().join("dist/index.html")).unwrap();
    assert!(html.contains(r#"class="notice""#));
    assert!(html.contains(r#"Groom <span class="amp">&amp;</span> Bride"#));
    assert!(!html.contains("<article"));
    assert!(!html.contains(r#"id="lightbox""#));
}

#[test]
fn check_fails_without_invitation() {
    let content = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let out = run(&["check"], content.path(), work.path());
    assert!(!out.status.success());
    assert!(!work.path().join("dist").exists());
}

#[test]
fn check_accepts_fixture() {
    let work = TempDir::new().unwrap();
    let out = run(&["check"], &fixture_content(), work.path());
    assert!(out.status.success());
    assert!(stdout(&out).contains("==> Content is valid"));
}

#[test]
fn gen_config_prints_stock_config() {
    let work = TempDir::new().unwrap();
    let out = run(&["gen-config"], &fixture_content(), work.path());
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("[viewer]"));
    assert!(text.contains("swipe_threshold = 44.0"));
}

#[test]
fn invalid_config_fails_build() {
    let content = TempDir::new().unwrap();
    fs::write(content.path().join("config.toml"), "[strip]\nstep_fraction = 2.0\n").unwrap();
    let work = TempDir::new().unwrap();
    let out = run(&["build"], content.path(), work.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("step_fraction"));
}
