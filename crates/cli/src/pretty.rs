//! Terminal rendering: jq-style colored JSON and the editor listing.
//!
//! Colors follow jq conventions:
//! - Strings: green
//! - Numbers: cyan
//! - Booleans: yellow
//! - Null: bright black (dimmed)
//! - Keys: blue

use colored::{Color, Colorize};
use propedit_core::PropertyEditor;
use serde_json::Value;

/// Configuration for pretty printing.
#[derive(Debug, Clone, Copy)]
pub struct PrettyConfig {
    /// Enable colored output.
    pub color: bool,
    /// Indent string (usually 2 spaces).
    pub indent: &'static str,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            color: true,
            indent: "  ",
        }
    }
}

/// Pretty-print a JSON value with colors.
pub fn pretty_json(value: &Value, config: &PrettyConfig) -> String {
    let mut output = String::new();
    format_value(value, config, 0, &mut output);
    output
}

fn format_value(value: &Value, config: &PrettyConfig, depth: usize, output: &mut String) {
    match value {
        Value::Null => output.push_str(&colorize("null", Color::BrightBlack, config.color)),
        Value::Bool(b) => output.push_str(&colorize(&b.to_string(), Color::Yellow, config.color)),
        Value::Number(n) => output.push_str(&colorize(&n.to_string(), Color::Cyan, config.color)),
        // serde_json's Display gives a correctly escaped, quoted string
        Value::String(_) => output.push_str(&colorize(&value.to_string(), Color::Green, config.color)),
        Value::Array(items) if items.is_empty() => output.push_str("[]"),
        Value::Object(map) if map.is_empty() => output.push_str("{}"),
        Value::Array(items) => {
            output.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                output.push_str(&config.indent.repeat(depth + 1));
                format_value(item, config, depth + 1, output);
                if i + 1 < items.len() {
                    output.push(',');
                }
                output.push('\n');
            }
            output.push_str(&config.indent.repeat(depth));
            output.push(']');
        }
        Value::Object(map) => {
            output.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                output.push_str(&config.indent.repeat(depth + 1));
                let key = Value::String(key.clone()).to_string();
                output.push_str(&colorize(&key, Color::Blue, config.color));
                output.push_str(": ");
                format_value(item, config, depth + 1, output);
                if i + 1 < map.len() {
                    output.push(',');
                }
                output.push('\n');
            }
            output.push_str(&config.indent.repeat(depth));
            output.push('}');
        }
    }
}

/// One line of `propedit list`.
pub fn editor_line(editor: &dyn PropertyEditor, alias_width: usize, color: bool) -> String {
    let def = editor.definition();
    let alias = format!("{:width$}", def.alias(), width = alias_width);
    let mut line = format!(
        "{}  {}  {}",
        if color { alias.bold().to_string() } else { alias },
        def.name(),
        colorize(&format!("[{}]", def.group()), Color::BrightBlack, color),
    );
    if def.is_parameter_editor() {
        line.push_str(&format!("  {}", colorize("parameter", Color::Cyan, color)));
    }
    if def.is_deprecated() {
        line.push_str(&format!("  {}", colorize("deprecated", Color::Yellow, color)));
    }
    line
}

/// JSON form of an editor for `propedit list --json`.
pub fn editor_json(editor: &dyn PropertyEditor) -> Value {
    let def = editor.definition();
    let converter = editor.create_value_converter();
    serde_json::json!({
        "alias": def.alias(),
        "name": def.name(),
        "icon": def.icon(),
        "group": def.group(),
        "isParameterEditor": def.is_parameter_editor(),
        "isDeprecated": def.is_deprecated(),
        "view": converter.view(),
        "valueType": converter.value_type(),
    })
}

fn colorize(s: &str, color: Color, enabled: bool) -> String {
    if enabled {
        s.color(color).to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use propedit_core::editors::PlainTextPropertyEditor;
    use propedit_core::EditorDefinition;
    use serde_json::json;

    fn plain() -> PrettyConfig {
        PrettyConfig {
            color: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_pretty_json_plain() {
        let value = json!({"hideLabel": false, "editor": {"toolbar": ["bold"], "stylesheets": []}});
        let expected = r#"{
  "editor": {
    "stylesheets": [],
    "toolbar": [
      "bold"
    ]
  },
  "hideLabel": false
}"#;
        assert_eq!(pretty_json(&value, &plain()), expected);
    }

    #[test]
    fn test_pretty_json_escapes_strings() {
        assert_eq!(pretty_json(&json!("a \"b\"\n"), &plain()), r#""a \"b\"\n""#);
        assert_eq!(pretty_json(&Value::Null, &plain()), "null");
    }

    #[test]
    fn test_pretty_json_color() {
        colored::control::set_override(true);
        let colored = pretty_json(&json!(1), &PrettyConfig::default());
        assert!(colored.contains("\x1b["));
        colored::control::unset_override();
    }

    #[test]
    fn test_editor_line() {
        let editor = PlainTextPropertyEditor::textbox();
        let line = editor_line(&editor, 18, false);
        assert_eq!(line, "Umbraco.TextBox     Textbox  [common]  parameter");
    }

    #[test]
    fn test_editor_json() {
        let editor = EditorDefinition::builder("Acme.Old", "Old")
            .deprecated(true)
            .build()
            .unwrap();
        let value = editor_json(&editor);
        assert_eq!(value["alias"], json!("Acme.Old"));
        assert_eq!(value["isDeprecated"], json!(true));
        assert_eq!(value["valueType"], json!("STRING"));
    }
}
