use super::*;
use jt_runner::Framework;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("jstest-cli-{}-{}", name, nanos))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn parse_run(args: &[&str]) -> RunArgs {
    let cli = Cli::try_parse_from(["jstest", "run"].iter().chain(args.iter()))
        .expect("args should parse");
    match cli.command {
        Mode::Run(args) => args,
        Mode::List(_) => panic!("expected run"),
    }
}

#[test]
fn run_flags_override_defaults() {
    let args = parse_run(&[
        "--basedir",
        "/project",
        "--framework",
        "qunit",
        "--include",
        "specs/**/*.html",
        "--exclude",
        "**/slow/**",
        "--reimport-scripts",
        "--resources-dir",
        "/opt/jstest",
        "--results-dir",
        "out",
        "--dom-shim",
        "env.browser.js",
        "--max-loader-rounds",
        "50",
        "--escape-xml",
    ]);
    assert_eq!(args.framework, Some(FrameworkArg::Qunit));

    let config = build_run_config(&args).expect("config should build");
    assert_eq!(config.basedir, PathBuf::from("/project"));
    assert_eq!(config.framework, Framework::QUnit);
    assert_eq!(config.includes, vec!["specs/**/*.html".to_string()]);
    assert_eq!(config.excludes, vec!["**/slow/**".to_string()]);
    assert!(config.reimport_scripts);
    assert_eq!(config.resource_dirs, vec![PathBuf::from("/opt/jstest")]);
    assert_eq!(config.resolved_results_dir(), PathBuf::from("/project/out"));
    assert_eq!(config.dom_shim, "env.browser.js");
    assert_eq!(config.max_loader_rounds, 50);
    assert!(config.escape_xml);
}

#[test]
fn config_file_is_loaded_before_flags() {
    let root = temp_path("config-file");
    let config_path = root.join("jstest.json");
    write_file(
        &config_path,
        r#"{"basedir": "/from-file", "framework": "qunit", "excludes": ["a/**"], "domShim": "shim.js"}"#,
    );

    let args = parse_run(&[
        "--config",
        config_path.to_str().expect("path should be utf-8"),
        "--exclude",
        "b/**",
        "--framework",
        "screw-unit",
    ]);
    let config = build_run_config(&args).expect("config should build");
    assert_eq!(config.basedir, PathBuf::from("/from-file"));
    assert_eq!(config.framework, Framework::ScrewUnit);
    assert_eq!(config.excludes, vec!["a/**".to_string(), "b/**".to_string()]);
    assert_eq!(config.dom_shim, "shim.js");
    let _ = fs::remove_dir_all(root);
}

#[test]
fn invalid_config_file_is_reported() {
    let root = temp_path("bad-config");
    let config_path = root.join("jstest.json");
    write_file(&config_path, "{\"framework\": \"mocha\"}");

    let args = parse_run(&["--config", config_path.to_str().expect("path should be utf-8")]);
    let error = build_run_config(&args).expect_err("unknown framework should fail");
    assert_eq!(error.code(), "CONFIG_INVALID");

    let missing = parse_run(&["--config", "/definitely/not/here.json"]);
    let error = build_run_config(&missing).expect_err("missing file should fail");
    assert_eq!(error.code(), "READ_FILE");
    let _ = fs::remove_dir_all(root);
}

#[test]
fn zero_loader_rounds_is_rejected() {
    let args = parse_run(&["--max-loader-rounds", "0"]);
    let error = build_run_config(&args).expect_err("zero rounds should fail");
    assert_eq!(error.code(), "CONFIG_INVALID");
}

#[test]
fn unknown_framework_flag_fails_parsing() {
    let code = run_cli_from_args(["jstest", "run", "--framework", "mocha"]);
    assert_eq!(code, 2);
}

#[test]
fn list_and_run_succeed_on_empty_basedir() {
    let root = temp_path("empty-basedir");
    fs::create_dir_all(&root).expect("root");
    let basedir = root.to_str().expect("path should be utf-8");

    assert_eq!(run_cli_from_args(["jstest", "list", "--basedir", basedir]), 0);
    assert_eq!(run_cli_from_args(["jstest", "run", "--basedir", basedir]), 0);
    assert!(!root.join("target").exists());
    let _ = fs::remove_dir_all(root);
}
