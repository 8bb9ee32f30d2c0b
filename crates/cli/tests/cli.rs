//! End-to-end tests of the `propedit` binary.
//!
//! Run with: cargo test -p propedit-cli --test cli

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

const MANIFEST: &str = r#"{
  "propertyEditors": [
    {
      "alias": "Acme.Count",
      "name": "Count",
      "group": "Numbers",
      "editor": {"view": "number", "valueType": "INT"}
    },
    {
      "alias": "Acme.Color",
      "name": "Color",
      "isParameterEditor": true,
      "prevalues": {
        "fields": [{"key": "colors", "label": "Colors", "view": "multivalues"}],
        "defaultConfig": {"colors": ["red", "green"]}
      }
    }
  ]
}"#;

/// A sandbox with its own config directory, so the user's config is never read.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn config_file(&self) -> PathBuf {
        self.dir.path().join("config").join("propedit").join("config.toml")
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("failed to run propedit")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_propedit"));
        cmd.args(args)
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("HOME", self.dir.path())
            .env_remove("PROPEDIT_MANIFESTS")
            .env_remove("PROPEDIT_NO_COLOR")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn json_stdout(output: &Output) -> Value {
    assert!(output.status.success(), "stderr: {}", stderr(output));
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_list_builtins() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["list"]);
    assert!(output.status.success());

    let out = stdout(&output);
    for alias in ["Umbraco.TextBox", "Umbraco.TextArea", "Umbraco.TinyMCE"] {
        assert!(out.contains(alias), "missing {alias} in:\n{out}");
    }
    assert!(!out.contains("\x1b["), "piped output should not be colored");
}

#[test]
fn test_list_json_with_manifest() {
    let sandbox = Sandbox::new();
    let manifest = sandbox.write("acme.json", MANIFEST);

    let listed = json_stdout(&sandbox.run(&["list", "--json", "-m", path_arg(&manifest)]));
    let aliases: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["alias"].as_str().unwrap())
        .collect();
    assert_eq!(
        aliases,
        vec!["Umbraco.TextBox", "Umbraco.TextArea", "Umbraco.TinyMCE", "Acme.Count", "Acme.Color"]
    );

    let count = &listed[3];
    assert_eq!(count["valueType"], json!("INT"));
    assert_eq!(count["group"], json!("Numbers"));
}

#[test]
fn test_list_parameter_editors() {
    let sandbox = Sandbox::new();
    let manifest = sandbox.write("acme.json", MANIFEST);

    let listed = json_stdout(&sandbox.run(&[
        "list",
        "--parameter",
        "--json",
        "--manifest",
        path_arg(&manifest),
    ]));
    let aliases: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["alias"].as_str().unwrap())
        .collect();
    assert!(aliases.contains(&"Acme.Color"));
    assert!(!aliases.contains(&"Acme.Count"));
}

#[test]
fn test_defaults() {
    let sandbox = Sandbox::new();
    let rte = json_stdout(&sandbox.run(&["defaults", "Umbraco.TinyMCE"]));
    assert_eq!(rte["defaultConfig"]["hideLabel"], json!(false));
    assert_eq!(rte["defaultConfig"]["editor"]["mode"], json!("classic"));

    let textbox = json_stdout(&sandbox.run(&["defaults", "Umbraco.TextBox"]));
    assert_eq!(textbox["defaultConfig"], json!({}));
    assert_eq!(textbox["fields"][0]["key"], json!("maxChars"));

    let manifest = sandbox.write("acme.json", MANIFEST);
    let color = json_stdout(&sandbox.run(&["defaults", "Acme.Color", "-m", path_arg(&manifest)]));
    assert_eq!(color["defaultConfig"]["colors"], json!(["red", "green"]));
}

#[test]
fn test_to_editor_plain_text() {
    let sandbox = Sandbox::new();
    assert_eq!(json_stdout(&sandbox.run(&["to-editor", "Umbraco.TextBox", "null"])), json!(""));
    assert_eq!(
        json_stdout(&sandbox.run(&["to-editor", "Umbraco.TextArea", "two words"])),
        json!("two words")
    );
}

#[test]
fn test_to_editor_plain_text_on_integer_field_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["to-editor", "Umbraco.TextBox", "12", "--value-type", "INT"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("PlainTextValueConverter"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_to_storage_with_manifest_editor() {
    let sandbox = Sandbox::new();
    let manifest = sandbox.write("acme.json", MANIFEST);

    let stored = json_stdout(&sandbox.run(&["to-storage", "Acme.Count", "\"42\"", "-m", path_arg(&manifest)]));
    assert_eq!(stored, json!(42));

    let output = sandbox.run(&["to-storage", "Acme.Count", "many", "-m", path_arg(&manifest)]);
    assert!(!output.status.success());
}

#[test]
fn test_to_storage_rich_text_roundtrip() {
    let sandbox = Sandbox::new();
    let shown = json_stdout(&sandbox.run(&["to-editor", "Umbraco.TinyMCE", "<p>hi</p>"]));
    assert_eq!(shown, json!("<p>hi</p>"));

    let stored = json_stdout(&sandbox.run(&[
        "to-storage",
        "Umbraco.TinyMCE",
        "<p>hi</p>",
        "--current",
        "<p>old</p>",
        "--config",
        r#"{"hideLabel": true}"#,
    ]));
    assert_eq!(stored, json!("<p>hi</p>"));
}

#[test]
fn test_invalid_configuration() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["to-editor", "Umbraco.TinyMCE", "<p/>", "--config", "[1]"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--config must be a JSON object"));

    let output = sandbox.run(&[
        "to-editor",
        "Umbraco.TinyMCE",
        "<p/>",
        "--config",
        r#"{"hideLabel": "maybe"}"#,
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_unknown_alias() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["defaults", "Acme.Missing"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no property editor with alias 'Acme.Missing'"));
}

#[test]
fn test_manifest_errors() {
    let sandbox = Sandbox::new();

    let clash = sandbox.write(
        "clash.json",
        r#"{"propertyEditors": [{"alias": "Umbraco.TextBox", "name": "Mine"}]}"#,
    );
    let output = sandbox.run(&["list", "-m", path_arg(&clash)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Umbraco.TextBox"));

    let broken = sandbox.write("broken.json", "{ not json");
    let output = sandbox.run(&["list", "-m", path_arg(&broken)]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("broken.json"));

    let output = sandbox.run(&["list", "-m", "does-not-exist.json"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read manifest"));
}

#[test]
fn test_manifests_from_env_and_config_file() {
    let sandbox = Sandbox::new();
    let manifest = sandbox.write("acme.json", MANIFEST);

    let output = sandbox
        .command(&["defaults", "Acme.Color"])
        .env("PROPEDIT_MANIFESTS", &manifest)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let init = sandbox.run(&["--config-init"]);
    assert!(init.status.success(), "stderr: {}", stderr(&init));
    assert!(sandbox.config_file().exists());

    let again = sandbox.run(&["--config-init"]);
    assert!(!again.status.success());

    fs::write(
        sandbox.config_file(),
        format!("manifests = [{:?}]\n", path_arg(&manifest)),
    )
    .unwrap();
    let color = json_stdout(&sandbox.run(&["defaults", "Acme.Color"]));
    assert_eq!(color["defaultConfig"]["colors"], json!(["red", "green"]));

    // The same manifest given twice is loaded once
    let output = sandbox.run(&["list", "-m", path_arg(&manifest)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn test_config_path() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--config-path"]);
    assert!(output.status.success());
    assert_eq!(PathBuf::from(stdout(&output).trim()), sandbox.config_file());
}

#[test]
fn test_verbose_logs_to_stderr() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["-v", "to-editor", "Umbraco.TextBox", "hello"]);
    assert!(output.status.success());
    assert_eq!(json_stdout(&output), json!("hello"));
    assert!(stderr(&output).contains("DEBUG"));
}

#[test]
fn test_no_command() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&[]);
    assert!(!output.status.success());
}
