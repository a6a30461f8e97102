//! CLI command implementations
//!
//! Both commands are one-shot: load config and model, read one request from
//! stdin, write one JSON object to stdout, exit.

use std::path::Path;

use serde_json::Value;

use crate::config::ServiceConfig;
use crate::executor::MemorySearchClient;
use crate::model::{EntityModel, ModelLoader};
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::request::ODataRequest;
use crate::service::{QueryService, ServiceError};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query {
            config,
            model,
            documents,
        } => query(config.as_deref(), &model, &documents),
        Command::Explain { config, model } => explain(config.as_deref(), &model),
    }
}

/// Execute one request against the in-memory engine
pub fn query(config_path: Option<&Path>, model_path: &Path, documents_path: &Path) -> CliResult<()> {
    let (config, model) = load(config_path, model_path)?;
    let client = load_documents(documents_path, &config)?;
    let request = read_request()?;

    let metrics = MetricsRegistry::new();
    let service = QueryService::new(&model, &client, &config, &metrics);
    respond(service.compile_and_execute(&request))
}

/// Print the compiled search call for one request
pub fn explain(config_path: Option<&Path>, model_path: &Path) -> CliResult<()> {
    let (config, model) = load(config_path, model_path)?;
    let request = read_request()?;
    respond(explain_request(&config, &model, &request))
}

fn explain_request(
    config: &ServiceConfig,
    model: &EntityModel,
    request: &ODataRequest,
) -> Result<Value, ServiceError> {
    let metrics = MetricsRegistry::new();
    let client = MemorySearchClient::default();
    QueryService::new(model, &client, config, &metrics).explain(request)
}

fn respond(result: Result<Value, ServiceError>) -> CliResult<()> {
    match result {
        Ok(body) => write_response(&body),
        Err(err) => {
            write_error(err.code(), &err.message(), err.status_code())?;
            Err(CliError::request_failed(err.to_string()))
        }
    }
}

/// Loads configuration (defaults when no path) and the entity model
fn load(config_path: Option<&Path>, model_path: &Path) -> CliResult<(ServiceConfig, EntityModel)> {
    let config = match config_path {
        Some(path) => {
            let config = ServiceConfig::load(path)?;
            log_event(Event::ConfigLoaded, &[("path", &path.display().to_string())]);
            config
        }
        None => ServiceConfig::default(),
    };

    let model = ModelLoader::load_file(model_path)?;
    let sets = model.entity_sets().count().to_string();
    log_event(
        Event::ModelLoaded,
        &[("entity_sets", &sets), ("path", &model_path.display().to_string())],
    );
    Ok((config, model))
}

fn load_documents(path: &Path, config: &ServiceConfig) -> CliResult<MemorySearchClient> {
    let client = MemorySearchClient::load_file(path)?.with_keyword_suffix(&config.keyword_suffix);
    Ok(client)
}
