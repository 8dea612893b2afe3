//! CLI command implementations
//!
//! `produce` runs the outer session loop: probe the transport, then
//! repeatedly build one record and hand it off. A fatal build error ends
//! that one session; the outer loop survives it. `compare`, `register`,
//! and `status` are one-shot wrappers over the comparator, the registry,
//! and the HTTP surface.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::builder::{BuildSession, Prompter};
use crate::compare::compare;
use crate::http_server::{HttpServer, HttpServerConfig, StatusState};
use crate::observability::Logger;
use crate::registry::{FileRegistry, SchemaSource};
use crate::schema::{parse_document, SchemaNode};
use crate::transport::{JsonlPublisher, PublishEnvelope, Publisher};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_report, ConsolePrompter};

/// Reserved token that ends the outer session loop.
pub const SESSION_SENTINEL: &str = "exit";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Registry root directory (required)
    pub schema_dir: String,

    /// Subject whose schema drives record construction
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Optional local schema document; when unset the registry's latest
    /// version for the subject is used
    #[serde(default)]
    pub local_schema: Option<String>,

    /// Field whose value keys published records
    #[serde(default = "default_key_field")]
    pub key_field: String,

    /// JSON-lines output file for the publisher
    #[serde(default = "default_output")]
    pub output: String,

    /// HTTP status surface settings
    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_subject() -> String {
    "store-orders".to_string()
}
fn default_key_field() -> String {
    "orderId".to_string()
}
fn default_output() -> String {
    "./records.jsonl".to_string()
}

impl Config {
    /// Loads and validates the configuration file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config(format!("failed to read config: {}", e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.schema_dir.is_empty() {
            return Err(CliError::config("schema_dir must not be empty"));
        }
        if self.subject.is_empty() {
            return Err(CliError::config("subject must not be empty"));
        }
        if self.key_field.is_empty() {
            return Err(CliError::config("key_field must not be empty"));
        }
        Ok(())
    }

    /// Resolves the schema record construction runs against.
    fn load_schema(&self, registry: &FileRegistry) -> CliResult<SchemaNode> {
        match &self.local_schema {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| CliError::config(format!("failed to read schema: {}", e)))?;
                Ok(parse_document(&text)?)
            }
            None => Ok(registry.latest(&self.subject)?),
        }
    }
}

/// Parses arguments and dispatches; the entry point for `main`.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Produce { config } => produce(&config),
        Command::Compare { left, right } => compare_files(&left, &right),
        Command::Register { config, schema } => register(&config, &schema),
        Command::Status { config } => status(&config),
    }
}

/// Outer session loop: one interactive build per iteration.
pub fn produce(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let registry = FileRegistry::new(&config.schema_dir);
    let schema = config.load_schema(&registry)?;

    let mut publisher = JsonlPublisher::new(&config.output);
    publisher.probe()?;
    Logger::info(
        "transport_ready",
        &[("output", &config.output), ("subject", &config.subject)],
    );

    let mut prompter = ConsolePrompter::new();
    session_loop(
        &mut prompter,
        &mut publisher,
        &schema,
        &config.subject,
        &config.key_field,
    )
}

/// The interactive outer loop. One failed session, whether the build
/// aborted or the transport rejected the record, never ends the loop;
/// only the sentinel or a dead input channel does.
fn session_loop<P: Prompter, T: Publisher>(
    prompter: &mut P,
    publisher: &mut T,
    schema: &SchemaNode,
    subject: &str,
    key_field: &str,
) -> CliResult<()> {
    loop {
        let answer = prompter.prompt(&format!(
            "\nBuild a new record? (Enter to build, '{}' to quit): ",
            SESSION_SENTINEL
        ))?;
        if answer.trim().eq_ignore_ascii_case(SESSION_SENTINEL) {
            break;
        }

        let session_id = Uuid::new_v4().to_string();
        Logger::info(
            "session_started",
            &[("session", &session_id), ("subject", subject)],
        );

        let mut session = BuildSession::new(prompter);
        match session.build(schema) {
            Ok(graph) => {
                let envelope = PublishEnvelope::new(subject, key_field, &graph);
                match publisher.publish(&envelope) {
                    Ok(()) => {
                        Logger::info(
                            "record_published",
                            &[
                                ("session", &session_id),
                                ("key", &envelope.key),
                                ("record_id", &envelope.record_id.to_string()),
                            ],
                        );
                        write_report(&format!("record published (key: {})", envelope.key))?;
                    }
                    Err(err) => {
                        Logger::error(
                            "publish_failed",
                            &[("session", &session_id), ("error", &err.to_string())],
                        );
                        write_report(&format!("publish failed: {}", err))?;
                    }
                }
            }
            Err(err) => {
                Logger::error(
                    "session_aborted",
                    &[
                        ("session", &session_id),
                        ("code", err.code()),
                        ("error", &err.to_string()),
                    ],
                );
                write_report(&format!("build aborted: {}", err))?;
            }
        }
    }

    Logger::info("producer_closed", &[]);
    Ok(())
}

/// One-shot comparison of two schema documents.
pub fn compare_files(left: &Path, right: &Path) -> CliResult<()> {
    let left_schema = parse_document(&read_schema(left)?)?;
    let right_schema = parse_document(&read_schema(right)?)?;

    let diff = compare(&left_schema, &right_schema);
    write_report(&diff.to_string())?;
    Ok(())
}

/// Registers a schema document as the subject's next version.
pub fn register(config_path: &Path, schema_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let registry = FileRegistry::new(&config.schema_dir);
    let document = read_schema(schema_path)?;

    let version = registry.register(&config.subject, &document)?;
    Logger::info(
        "schema_registered",
        &[
            ("subject", &config.subject),
            ("version", &version.to_string()),
        ],
    );
    write_report(&format!(
        "registered '{}' version {}",
        config.subject, version
    ))?;
    Ok(())
}

/// Serves the HTTP schema-status surface until interrupted.
pub fn status(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let registry = FileRegistry::new(&config.schema_dir);
    let local = config.load_schema(&registry)?;

    let state = Arc::new(StatusState::new(
        FileRegistry::new(&config.schema_dir),
        &config.subject,
        local,
    ));
    let server = HttpServer::new(config.http.clone(), state);
    Logger::info("http_listening", &[("addr", &server.socket_addr())]);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.start())?;
    Ok(())
}

fn read_schema(path: &Path) -> CliResult<String> {
    fs::read_to_string(path)
        .map_err(|e| CliError::config(format!("failed to read '{}': {}", path.display(), e)))
}
