use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const BOT_YAML: &str = r#"
prefix: "!"
bot_id: "555555555555555555"
commands:
  - name: mute
    description: Temporarily silence a member
    aliases: [shh]
    arguments:
      - { name: user, type: user, required: true }
      - { name: duration, type: duration, required: true, default: 1h }
      - { name: reason, kind: content }
      - { name: silent, kind: flag, type: bool, flag: true }
  - name: purge
    arguments:
      - { name: count, type: int, required: true, default: "10" }
"#;

fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("failed to write config");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_args-parse"))
        .args(args)
        .output()
        .expect("failed to run args-parse")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ---------------------------------------------------------------------------
// validate / list
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_definitions() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);

    let output = run(&["validate", config.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 command(s)"), "stdout: {stdout}");
}

#[test]
fn validate_rejects_content_before_option() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "bad.yml",
        r#"
prefix: "!"
commands:
  - name: say
    arguments:
      - { name: text, kind: content }
      - { name: target, type: channel }
"#,
    );

    let output = run(&["validate", config.to_str().unwrap()]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
    assert!(stderr.contains("say"), "stderr: {stderr}");
}

#[test]
fn list_prints_usage_lines() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);

    let output = run(&["list", "--config", config.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("mute <user> <duration> [reason...] [--silent]"),
        "stdout: {stdout}"
    );
    assert!(stdout.contains("aliases: shh"), "stdout: {stdout}");
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_argument_string() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);

    let output = run(&[
        "parse",
        "--config",
        config.to_str().unwrap(),
        "--command",
        "SHH",
        "being loud 2h <@111111111111111111> --silent",
    ]);
    let json = stdout_json(&output);

    assert_eq!(json["user"]["value"], "<@111111111111111111>");
    assert_eq!(json["user"]["type"], "user");
    assert_eq!(json["duration"]["value"], "2h");
    assert_eq!(json["reason"]["value"], "being loud");
    assert_eq!(json["silent"]["value"], "true");
}

#[test]
fn parse_reads_stdin() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);

    let mut child = Command::new(env!("CARGO_BIN_EXE_args-parse"))
        .args(["parse", "--config", config.to_str().unwrap(), "--command", "purge"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run args-parse");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"42\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    let json = stdout_json(&output);

    assert_eq!(json["count"]["value"], "42");
    assert_eq!(json["count"]["source"], "explicit");
}

#[test]
fn parse_interaction_options() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);
    let options = write_config(&dir, "options.json", r#"[{"name": "count", "value": 7}]"#);

    let output = run(&[
        "parse",
        "--config",
        config.to_str().unwrap(),
        "--command",
        "purge",
        "--interaction",
        options.to_str().unwrap(),
    ]);
    let json = stdout_json(&output);

    assert_eq!(json["count"]["value"], 7);
}

#[test]
fn parse_yaml_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);

    let output = run(&[
        "parse",
        "--config",
        config.to_str().unwrap(),
        "--command",
        "purge",
        "--format",
        "yaml",
        "",
    ]);

    assert!(output.status.success());
    let yaml: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(yaml["count"]["value"].as_str(), Some("10"));
    assert_eq!(yaml["count"]["source"].as_str(), Some("default"));
}

#[test]
fn parse_unknown_command_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);

    let output = run(&[
        "parse",
        "--config",
        config.to_str().unwrap(),
        "--command",
        "kick",
        "x",
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command: kick"));
}

// ---------------------------------------------------------------------------
// dispatch / batch
// ---------------------------------------------------------------------------

#[test]
fn dispatch_bot_mention() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);

    let output = run(&[
        "dispatch",
        "--config",
        config.to_str().unwrap(),
        "<@!555555555555555555> purge 3",
    ]);
    let json = stdout_json(&output);

    assert_eq!(json["command"], "purge");
    assert_eq!(json["args"]["count"]["value"], "3");
}

#[test]
fn dispatch_prefix_override() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.json", &json_config());

    let output = run(&[
        "dispatch",
        "--config",
        config.to_str().unwrap(),
        "--prefix",
        "?",
        "?purge",
    ]);
    let json = stdout_json(&output);

    assert_eq!(json["trigger"], "purge");
}

#[test]
fn dispatch_plain_message_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);

    let output = run(&["dispatch", "--config", config.to_str().unwrap(), "hello"]);

    assert!(!output.status.success());
}

#[test]
fn batch_dispatches_every_line() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "bot.yml", BOT_YAML);
    let input = write_config(
        &dir,
        "messages.txt",
        "!purge 5\n\n!mute <@111111111111111111> 1d\n!kick x\nhello\n",
    );

    let output = run(&[
        "batch",
        "--config",
        config.to_str().unwrap(),
        "--input",
        input.to_str().unwrap(),
        "--jobs",
        "2",
    ]);
    let json = stdout_json(&output);
    let entries = json.as_array().unwrap();

    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0]["line"], 1);
    assert_eq!(entries[0]["result"]["args"]["count"]["value"], "5");
    assert_eq!(entries[1]["line"], 3);
    assert_eq!(entries[1]["result"]["args"]["duration"]["value"], "1d");
    assert_eq!(entries[2]["error"], "unknown command: kick");
    assert!(entries[3]["error"].is_string());
    assert!(String::from_utf8_lossy(&output.stderr).contains("2 of 4"));
}

// ---------------------------------------------------------------------------
// duration
// ---------------------------------------------------------------------------

#[test]
fn duration_prints_breakdown() {
    let output = run(&["duration", "1d2h30m"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "1 Day, 2 Hours & 30 Minutes (95400s)"
    );
}

#[test]
fn duration_rejects_text() {
    let output = run(&["duration", "later"]);
    assert!(!output.status.success());
}

fn json_config() -> String {
    let config: serde_json::Value = serde_yaml::from_str(BOT_YAML).unwrap();
    serde_json::to_string(&config).unwrap()
}
