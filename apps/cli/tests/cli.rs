//! CLI 端到端测试

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("flashlight-cli").unwrap();
    // 隔离用户配置目录
    let home = tempdir().unwrap().keep();
    cmd.env("HOME", &home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

#[test]
fn test_run_sim_reports_all_steps() {
    cli()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("完成步骤: 8"));
}

#[test]
fn test_run_urscript_to_stdout() {
    cli()
        .args(["run", "--backend", "urscript"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("def flashlight_assembly():"))
        .stdout(predicate::str::contains("rq_open()"))
        .stdout(predicate::str::ends_with("end\n"));
}

#[test]
fn test_plan_json_is_command_list() {
    let output = cli().args(["plan", "--json"]).output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let commands = value.as_array().unwrap();
    assert_eq!(commands[0]["command"], "run_tool");
    assert_eq!(commands[1]["command"], "move_j");
}

#[test]
fn test_config_init_then_show() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cell.toml");

    cli()
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    cli()
        .args(["config", "show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[clamp]"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cell.toml");
    std::fs::write(&path, "[motion]\ntransfer_speed = -5.0\n").unwrap();

    cli()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("transfer_speed"));
}
