//! Service document loading (JSON or YAML, chosen by file extension).

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::warn;

use super::definition::ServiceDefinition;
use crate::template::referenced_names;
use crate::{Error, ErrorContext, Result};

/// Document syntax, picked from the file extension. Anything that is not
/// `.yaml`/`.yml` is read as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Read and parse a service document from disk.
pub async fn load_document(path: &Path) -> Result<HashMap<String, ServiceDefinition>> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::configuration_with_context(
            format!("cannot read service document: {}", e),
            ErrorContext::new()
                .with_field_path(path.display().to_string())
                .with_source("service_loader"),
        )
    })?;
    parse_document(&content, DocumentFormat::from_path(path)).map_err(|e| match e {
        Error::Configuration { message, context } => Error::Configuration {
            message,
            context: context.with_field_path(path.display().to_string()),
        },
        other => other,
    })
}

/// Parse a service document: a mapping from service name to definition.
///
/// Each definition's `name` is set to its key. Placeholders naming undeclared
/// parameters are reported with `warn!`; they stay literal at dispatch time.
pub fn parse_document(
    content: &str,
    format: DocumentFormat,
) -> Result<HashMap<String, ServiceDefinition>> {
    let parsed: std::result::Result<HashMap<String, ServiceDefinition>, String> = match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    };
    let mut services = parsed.map_err(|reason| {
        Error::configuration_with_context(
            "unparsable service document",
            ErrorContext::new()
                .with_details(reason)
                .with_source("service_loader"),
        )
    })?;

    for (name, service) in services.iter_mut() {
        service.name = name.clone();
        for placeholder in undeclared_placeholders(service) {
            warn!(
                service = name.as_str(),
                placeholder = placeholder.as_str(),
                "template references an undeclared parameter; it will stay literal"
            );
        }
    }
    Ok(services)
}

/// Placeholder names used by a service's templates that its `params` do not declare.
pub fn undeclared_placeholders(service: &ServiceDefinition) -> BTreeSet<String> {
    let Some(completion) = &service.completion else {
        return BTreeSet::new();
    };

    let mut texts: Vec<String> = completion.messages.iter().map(|m| m.joined()).collect();
    if let Some(schema) = completion
        .response_format
        .as_ref()
        .and_then(|f| f.json_schema.as_ref())
    {
        collect_schema_strings(schema, &mut texts);
    }

    texts
        .iter()
        .flat_map(|t| referenced_names(t))
        .filter(|name| !service.params.contains_key(*name))
        .map(str::to_string)
        .collect()
}

fn collect_schema_strings(value: &serde_json::Value, out: &mut Vec<String>) {
    match value {
        serde_json::Value::String(s) => out.push(s.clone()),
        serde_json::Value::Array(items) => {
            for item in items {
                collect_schema_strings(item, out);
            }
        }
        serde_json::Value::Object(map) => {
            for (key, nested) in map {
                out.push(key.clone());
                collect_schema_strings(nested, out);
            }
        }
        _ => {}
    }
}
