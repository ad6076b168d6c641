//! CDEvents CLI
//!
//! The `cdevents` command builds, validates and inspects CDEvents wrapped in
//! CloudEvents envelopes.
//!
//! ## Commands
//!
//! - `types`: List the registered event types
//! - `new`: Build an event and print its cloud event JSON
//! - `validate`: Check a cloud event against its JSON Schema
//! - `inspect`: Decode a cloud event and summarize it

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cdevents_core::{
    default_registry, AnyCDEvent, CloudEvent, CustomData, EventFields, SchemaRegistry,
    ValidationReport, APPLICATION_JSON, SPEC_VERSION, TYPE_PREFIX,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "cdevents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build, validate and inspect CDEvents", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Directory of `<domain><action>.json` schemas replacing the bundled set
    #[arg(long, global = true, env = "CDEVENTS_SCHEMA_DIR")]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered event types
    Types,

    /// Build an event and print it as a cloud event
    New {
        /// Event type, in full or short form (`build.finished`)
        event_type: String,

        /// Source of the event (context source)
        #[arg(long)]
        source: String,

        /// Id of the subject the event is about
        #[arg(long)]
        subject_id: String,

        /// Event id (default: random UUID)
        #[arg(long)]
        id: Option<String>,

        /// Subject source (default: the event source)
        #[arg(long)]
        subject_source: Option<String>,

        /// Subject content as a JSON object
        #[arg(long)]
        content: Option<String>,

        /// Custom data: a JSON object, otherwise taken as text
        #[arg(long)]
        custom_data: Option<String>,

        /// Media type of the custom data (default for JSON objects: application/json)
        #[arg(long)]
        custom_data_content_type: Option<String>,

        /// Id of the event that caused this one
        #[arg(long)]
        chain_id: Option<String>,
    },

    /// Validate a cloud event against its schema
    Validate {
        /// Cloud event JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Decode a cloud event and print a summary
    Inspect {
        /// Cloud event JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

/// Inputs of the `new` command.
struct NewEvent {
    event_type: String,
    source: String,
    subject_id: String,
    id: Option<String>,
    subject_source: Option<String>,
    content: Option<String>,
    custom_data: Option<String>,
    custom_data_content_type: Option<String>,
    chain_id: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    cdevents_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Types => cmd_types(),
        Commands::New {
            event_type,
            source,
            subject_id,
            id,
            subject_source,
            content,
            custom_data,
            custom_data_content_type,
            chain_id,
        } => cmd_new(NewEvent {
            event_type,
            source,
            subject_id,
            id,
            subject_source,
            content,
            custom_data,
            custom_data_content_type,
            chain_id,
        }),
        Commands::Validate { input } => cmd_validate(&input, cli.schema_dir.as_deref()),
        Commands::Inspect { input } => cmd_inspect(&input),
    }
}

fn cmd_types() -> Result<()> {
    for registration in default_registry().registrations() {
        println!(
            "{:<48} subject={}",
            registration.event_type(),
            registration.subject_type()
        );
    }
    Ok(())
}

fn cmd_new(args: NewEvent) -> Result<()> {
    let event = build_event(args)?;
    let envelope = event.to_cloud_event()?;
    println!("{}", envelope.to_json_pretty()?);
    Ok(())
}

fn cmd_validate(input: &Path, schema_dir: Option<&Path>) -> Result<()> {
    let schemas = load_schemas(schema_dir)?;
    let envelope = read_envelope(input)?;
    let report = schemas
        .validate_cloud_event(&envelope)
        .context("Failed to validate cloud event")?;

    if report.is_valid() {
        println!("{}: valid", report.event_type);
        return Ok(());
    }

    print_violations(&report);
    bail!(
        "{} failed schema validation with {} violation(s)",
        report.event_type,
        report.violations.len()
    );
}

fn cmd_inspect(input: &Path) -> Result<()> {
    let envelope = read_envelope(input)?;
    let event = default_registry()
        .from_cloud_event(&envelope)
        .context("Failed to decode cloud event")?;
    for (label, value) in summarize(&event) {
        println!("{label:<24} {value}");
    }
    Ok(())
}

/// Expand `build.finished` to `dev.cdevents.build.finished.<spec version>`.
fn expand_event_type(event_type: &str) -> String {
    if event_type.starts_with(TYPE_PREFIX) {
        event_type.to_string()
    } else {
        format!("{TYPE_PREFIX}{event_type}.{SPEC_VERSION}")
    }
}

fn build_event(args: NewEvent) -> Result<AnyCDEvent> {
    let event_type = expand_event_type(&args.event_type);
    let id = args.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut fields = EventFields::new(id, args.source, Utc::now(), args.subject_id);
    fields.subject_source = args.subject_source;
    fields.chain_id = args.chain_id;

    if let Some(raw) = args.custom_data {
        let data = parse_custom_data(raw);
        let default_type = data.as_map().map(|_| APPLICATION_JSON.to_string());
        fields.custom_data_content_type = args.custom_data_content_type.or(default_type);
        fields.custom_data = Some(data);
    } else {
        fields.custom_data_content_type = args.custom_data_content_type;
    }

    let content = match args.content {
        Some(text) => serde_json::from_str(&text).context("--content is not valid JSON")?,
        None => Value::Null,
    };

    debug!(event_type = %event_type, "building event");
    let event = default_registry()
        .construct(&event_type, fields, content)
        .with_context(|| format!("Failed to build {event_type}"))?;
    info!(event_type = %event.event_type(), id = %event.context().id(), "event built");
    Ok(event)
}

fn parse_custom_data(raw: String) -> CustomData {
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => CustomData::Structured(map),
        _ => CustomData::Text(raw),
    }
}

fn load_schemas(schema_dir: Option<&Path>) -> Result<SchemaRegistry> {
    match schema_dir {
        Some(dir) => SchemaRegistry::from_dir(dir)
            .with_context(|| format!("Failed to load schemas from {}", dir.display())),
        None => SchemaRegistry::bundled().context("Failed to load bundled schemas"),
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn read_envelope(input: &Path) -> Result<CloudEvent> {
    let text = read_input(input)?;
    CloudEvent::from_json(&text).context("Input is not a supported cloud event")
}

fn print_violations(report: &ValidationReport) {
    println!("{}: invalid", report.event_type);
    for violation in &report.violations {
        println!("  {violation}");
    }
}

fn summarize(event: &AnyCDEvent) -> Vec<(&'static str, String)> {
    let context = event.context();
    let mut lines = vec![
        ("type", event.event_type().to_string()),
        ("id", context.id().to_string()),
        ("source", context.source().to_string()),
        ("timestamp", context.timestamp().to_rfc3339()),
        ("subject.type", event.subject_type().to_string()),
        ("subject.id", event.subject_id().to_string()),
        ("subject.source", event.subject_source().to_string()),
    ];
    if let Some(chain_id) = context.chain_id() {
        lines.push(("chainId", chain_id.to_string()));
    }
    if let Some(content_type) = event.custom_data_content_type() {
        lines.push(("customDataContentType", content_type.to_string()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdevents_core::events::BuildFinished;

    fn new_event(event_type: &str) -> NewEvent {
        NewEvent {
            event_type: event_type.to_string(),
            source: "/ci/jenkins".to_string(),
            subject_id: "build-42".to_string(),
            id: None,
            subject_source: None,
            content: None,
            custom_data: None,
            custom_data_content_type: None,
            chain_id: None,
        }
    }

    #[test]
    fn test_expand_event_type() {
        assert_eq!(
            expand_event_type("build.finished"),
            "dev.cdevents.build.finished.0.3.0"
        );
        assert_eq!(
            expand_event_type("dev.cdevents.build.finished.0.3.0"),
            "dev.cdevents.build.finished.0.3.0"
        );
    }

    #[test]
    fn test_build_event_with_content() {
        let mut args = new_event("build.finished");
        args.content = Some(r#"{"artifactId": "pkg:generic/foo@1.0"}"#.to_string());
        let event = build_event(args).unwrap();

        assert!(event.is::<BuildFinished>());
        assert_eq!(event.subject_source(), "/ci/jenkins");
        assert!(uuid::Uuid::parse_str(event.context().id()).is_ok());
    }

    #[test]
    fn test_build_event_structured_custom_data_defaults_content_type() {
        let mut args = new_event("build.queued");
        args.custom_data = Some(r#"{"pr": 17}"#.to_string());
        let event = build_event(args).unwrap();
        assert_eq!(event.custom_data_content_type(), Some(APPLICATION_JSON));
        assert!(event.custom_data().unwrap().as_map().is_some());
    }

    #[test]
    fn test_build_event_text_custom_data_needs_content_type() {
        let mut args = new_event("build.queued");
        args.custom_data = Some("hello".to_string());
        assert!(build_event(args).is_err());

        let mut args = new_event("build.queued");
        args.custom_data = Some("hello".to_string());
        args.custom_data_content_type = Some("text/plain".to_string());
        let event = build_event(args).unwrap();
        assert_eq!(event.custom_data().unwrap().as_text(), Some("hello"));
    }

    #[test]
    fn test_build_event_unknown_type() {
        assert!(build_event(new_event("widget.exploded")).is_err());
    }

    #[test]
    fn test_read_envelope_and_validate_from_file() {
        let mut args = new_event("build.finished");
        args.content = Some(r#"{"artifactId": "pkg:generic/foo@1.0"}"#.to_string());
        let envelope = build_event(args).unwrap().to_cloud_event().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, envelope.to_json().unwrap()).unwrap();

        let read = read_envelope(&path).unwrap();
        assert_eq!(read, envelope);
        assert!(cmd_validate(&path, None).is_ok());
        assert!(cmd_inspect(&path).is_ok());
    }

    #[test]
    fn test_validate_rejects_invalid_event() {
        let mut args = new_event("build.finished");
        args.content = Some(r#"{"artifactId": "pkg:generic/foo@1.0"}"#.to_string());
        let mut envelope = build_event(args).unwrap().to_cloud_event().unwrap();
        envelope.data["subject"]["content"]["artifactId"] = serde_json::json!(7);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, envelope.to_json().unwrap()).unwrap();
        assert!(cmd_validate(&path, None).is_err());
    }

    #[test]
    fn test_summarize_lists_subject() {
        let mut args = new_event("build.started");
        args.chain_id = Some("build-41".to_string());
        let event = build_event(args).unwrap();
        let summary = summarize(&event);
        assert!(summary.contains(&("subject.type", "build".to_string())));
        assert!(summary.contains(&("chainId", "build-41".to_string())));
    }
}
