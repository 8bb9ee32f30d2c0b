mod config;
mod error;
mod pretty;

use config::Config;
use error::CliError;

use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use colored::{control::set_override, Colorize};
use propedit_core::descriptor::ConfigurationDescriptor;
use propedit_core::lookup::{DataTypeInfo, InMemoryDataTypes};
use propedit_core::markup::PassthroughRewriter;
use propedit_core::{
    ConfigurationMap, EditorCollection, EditorSubmission, PropertyEditor, PropertyType, ValueType,
};
use serde_json::Value;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use crate::pretty::PrettyConfig;

const LONG_ABOUT: &str = r##"
Propedit inspects the property editors of a content store and runs their
value conversions.

Every editor is identified by its alias. Built-in editors are always
available; more are loaded from JSON manifests.

EXAMPLES:
  propedit list                                   List all editors
  propedit list --parameter --json                Parameter editors as JSON
  propedit defaults Umbraco.TinyMCE               Options and defaults
  propedit to-editor Umbraco.TextBox null         Stored -> editor form
  propedit to-storage Acme.Count 7 -m acme.json   Editor -> stored form

ARGUMENTS:
  Values and --config/--current options are read as JSON when they parse,
  otherwise as plain strings: 7 is a number, "7" (quoted for the shell as
  '"7"') is a string, hello is the string "hello".

MANIFESTS:
  {"propertyEditors": [
    {"alias": "Acme.Count", "name": "Count",
     "editor": {"view": "number", "valueType": "INT"}}
  ]}

CONFIGURATION:
  Settings can be configured via CLI flags, environment variables, or config file.
  Precedence: CLI args > Environment vars > Config file > Defaults

  Setting    | CLI flag          | Env var             | Default
  -----------|-------------------|---------------------|---------
  manifests  | -m, --manifest    | PROPEDIT_MANIFESTS  | []
  no_color   | -C, --no-color    | PROPEDIT_NO_COLOR   | false

  Manifests from all sources are combined.

  Config file location: propedit --config-path
  Generate default config: propedit --config-init

  Note: NO_COLOR env var is also respected (https://no-color.org/)"##;

#[derive(Parser)]
#[command(name = "propedit")]
#[command(version)]
#[command(about = "Inspect property editors and convert field values")]
#[command(long_about = LONG_ABOUT)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Load editors from a JSON manifest (repeatable)
    #[arg(long = "manifest", short = 'm', value_name = "PATH", global = true)]
    manifests: Vec<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, short = 'C', global = true)]
    no_color: bool,

    /// Print the config file location
    #[arg(long)]
    config_path: bool,

    /// Create a default config file
    #[arg(long)]
    config_init: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List registered property editors
    List {
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,

        /// Only editors usable as macro parameter editors
        #[arg(long)]
        parameter: bool,
    },

    /// Show an editor's configuration options and defaults
    Defaults {
        /// Editor alias, e.g. Umbraco.TinyMCE
        alias: String,
    },

    /// Convert a stored value to the form the editor shows
    ToEditor {
        /// Editor alias
        alias: String,

        /// Stored value
        stored: String,

        /// Value type of the field's data type (defaults to the editor's)
        #[arg(long, value_name = "TYPE")]
        value_type: Option<ValueType>,

        /// Data type configuration as a JSON object
        #[arg(long, value_name = "JSON")]
        config: Option<String>,
    },

    /// Convert an edited value to the form that is stored
    ToStorage {
        /// Editor alias
        alias: String,

        /// Value submitted by the editor
        value: String,

        /// Currently stored value
        #[arg(long, value_name = "JSON")]
        current: Option<String>,

        /// Data type configuration as a JSON object
        #[arg(long, value_name = "JSON")]
        config: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Handle --config-path
    if cli.config_path {
        match Config::path() {
            Some(path) => println!("{}", path.display()),
            None => {
                eprintln!(
                    "{}: Cannot determine config directory",
                    "error".red().bold()
                );
                std::process::exit(1);
            }
        }
        return;
    }

    // Handle --config-init
    if cli.config_init {
        match config::init_config() {
            Ok(path) => println!("Created config file: {}", path.display()),
            Err(e) => {
                eprintln!("{}: {}", "error".red().bold(), e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Initialize tracing based on verbosity level (before config loading for logging)
    let level = match cli.verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    if level != LevelFilter::OFF {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    // Precedence: CLI args > Environment vars > Config file > Defaults
    let file_config = Config::load();

    if let Some(path) = Config::path() {
        if path.exists() {
            tracing::debug!("Loaded config from: {}", path.display());
        } else {
            tracing::trace!("No config file at: {}", path.display());
        }
    }

    let no_color = if cli.no_color {
        tracing::debug!("no_color = true (from CLI)");
        true
    } else {
        let nc = file_config.no_color();
        if nc {
            let source = if std::env::var("NO_COLOR").is_ok() {
                "env NO_COLOR"
            } else if std::env::var("PROPEDIT_NO_COLOR").is_ok() {
                "env PROPEDIT_NO_COLOR"
            } else {
                "config file"
            };
            tracing::debug!("no_color = true (from {})", source);
        }
        nc
    };
    let color = !no_color && std::io::stdout().is_terminal();
    if !color {
        set_override(false);
    }

    let manifests = file_config.manifests(&cli.manifests);
    tracing::debug!("manifests = {:?}", manifests);

    let Some(command) = cli.command else {
        eprintln!(
            "{}: no command given, see {}",
            "error".red().bold(),
            "propedit --help".bold()
        );
        std::process::exit(2);
    };

    if let Err(e) = run(command, &manifests, color) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(command: Command, manifests: &[PathBuf], color: bool) -> Result<(), CliError> {
    let editors = load_editors(manifests)?;
    let pretty = PrettyConfig {
        color,
        ..Default::default()
    };

    match command {
        Command::List { json, parameter } => {
            let listed: Vec<&dyn PropertyEditor> = editors
                .iter()
                .filter(|e| !parameter || e.definition().is_parameter_editor())
                .collect();
            if json {
                let values: Vec<Value> = listed.iter().map(|e| pretty::editor_json(*e)).collect();
                println!("{}", pretty::pretty_json(&Value::Array(values), &pretty));
            } else {
                let width = listed.iter().map(|e| e.alias().len()).max().unwrap_or(0);
                for editor in listed {
                    println!("{}", pretty::editor_line(editor, width, color));
                }
            }
        }

        Command::Defaults { alias } => {
            let editor = find(&editors, &alias)?;
            let provider = editor.create_configuration_provider();
            let descriptor = ConfigurationDescriptor {
                fields: provider.fields().to_vec(),
                default_config: provider.default_configuration(),
            };
            let value = serde_json::to_value(&descriptor).map_err(propedit_core::EditorError::from)?;
            println!("{}", pretty::pretty_json(&value, &pretty));
        }

        Command::ToEditor {
            alias,
            stored,
            value_type,
            config,
        } => {
            let editor = find(&editors, &alias)?;
            let configuration = parse_configuration(config.as_deref())?;
            let converter = editor.configured_value_converter(&configuration)?;

            // The field's data type, as the host would resolve it
            let value_type = value_type.unwrap_or_else(|| converter.value_type());
            let data_types =
                InMemoryDataTypes::new().with(DataTypeInfo::new("cli", alias.as_str(), value_type));
            let field = PropertyType::new("value", "cli");

            let shown = converter.convert_stored_to_editor(&parse_arg(&stored), &field, &data_types)?;
            println!("{}", pretty::pretty_json(&shown, &pretty));
        }

        Command::ToStorage {
            alias,
            value,
            current,
            config,
        } => {
            let editor = find(&editors, &alias)?;
            let configuration = parse_configuration(config.as_deref())?;
            let converter = editor.configured_value_converter(&configuration)?;

            let current = current.as_deref().map(parse_arg).unwrap_or(Value::Null);
            let stored =
                converter.convert_editor_to_storage(&EditorSubmission::new(parse_arg(&value)), &current)?;
            println!("{}", pretty::pretty_json(&stored, &pretty));
        }
    }

    Ok(())
}

/// Built-in editors plus every editor from `manifests`.
fn load_editors(manifests: &[PathBuf]) -> Result<EditorCollection, CliError> {
    let mut editors = EditorCollection::with_builtins(Arc::new(PassthroughRewriter));
    for path in manifests {
        let json = fs::read_to_string(path).map_err(|source| CliError::ReadManifest {
            path: path.clone(),
            source,
        })?;
        let added = editors
            .register_manifest(&json)
            .map_err(|source| CliError::InvalidManifest {
                path: path.clone(),
                source,
            })?;
        tracing::debug!("Loaded {} editor(s) from {}", added, path.display());
    }
    Ok(editors)
}

fn find<'a>(editors: &'a EditorCollection, alias: &str) -> Result<&'a dyn PropertyEditor, CliError> {
    editors
        .get(alias)
        .ok_or_else(|| CliError::UnknownEditor(alias.to_string()))
}

/// Parse an argument as JSON, falling back to a plain string.
fn parse_arg(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_string()))
}

fn parse_configuration(arg: Option<&str>) -> Result<ConfigurationMap, CliError> {
    match arg.map(parse_arg) {
        None => Ok(ConfigurationMap::new()),
        Some(Value::Object(map)) => Ok(map.into_iter().collect()),
        Some(_) => Err(CliError::NotAnObject { option: "config" }),
    }
}
