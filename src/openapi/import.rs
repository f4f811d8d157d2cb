//! Route definitions imported from an OpenAPI document.
//!
//! Every operation under `paths` becomes a route answering with the lowest
//! declared 2xx status, or 200 when the operation declares none. Path
//! templates are registered literally.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;

use crate::routing::route::{Route, RouteError};

const OPERATION_METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];
const DEFAULT_STATUS: u16 = 200;

#[derive(Debug, Error)]
pub enum OpenApiError {
    #[error("failed to fetch OpenAPI document: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to read OpenAPI document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed OpenAPI JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed OpenAPI YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("OpenAPI document has no 'paths' mapping")]
    MissingPaths,

    #[error("OpenAPI operation cannot be registered: {0}")]
    Invalid(#[from] RouteError),
}

/// Where an OpenAPI document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenApiSource {
    Url(String),
    File(PathBuf),
    Inline(String),
}

impl OpenApiSource {
    /// URL if it has an http(s) scheme, file if the path exists, else inline text.
    pub fn detect(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            OpenApiSource::Url(input.to_string())
        } else if Path::new(input).exists() {
            OpenApiSource::File(PathBuf::from(input))
        } else {
            OpenApiSource::Inline(input.to_string())
        }
    }

    /// Fetch the raw document text.
    pub async fn read(&self, client: &reqwest::Client) -> Result<String, OpenApiError> {
        match self {
            OpenApiSource::Url(url) => {
                let response = client.get(url).send().await?.error_for_status()?;
                Ok(response.text().await?)
            }
            OpenApiSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| OpenApiError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            OpenApiSource::Inline(text) => Ok(text.clone()),
        }
    }
}

/// Map the operations of a JSON or YAML document to routes.
pub fn parse_openapi_routes(text: &str) -> Result<Vec<Route>, OpenApiError> {
    let document: Value = if text.trim_start().starts_with('{') {
        serde_json::from_str(text)?
    } else {
        serde_yaml::from_str(text)?
    };

    let paths = document
        .get("paths")
        .and_then(Value::as_mapping)
        .ok_or(OpenApiError::MissingPaths)?;

    let mut routes = Vec::new();
    for (path, item) in paths {
        let (Some(path), Some(item)) = (path.as_str(), item.as_mapping()) else {
            continue;
        };

        for (method, operation) in item {
            let Some(method) = method.as_str() else {
                continue;
            };
            let method = method.to_ascii_lowercase();
            if !OPERATION_METHODS.contains(&method.as_str()) {
                continue;
            }

            let route = Route::new(path, method.to_ascii_uppercase(), success_status(operation));
            route.validate()?;
            routes.push(route);
        }
    }

    Ok(routes)
}

/// Resolve, read, and map an OpenAPI document.
pub async fn load_openapi_routes(input: &str) -> Result<Vec<Route>, OpenApiError> {
    let source = OpenApiSource::detect(input);
    let text = source.read(&reqwest::Client::new()).await?;
    let routes = parse_openapi_routes(&text)?;
    tracing::info!(source = %source_kind(&source), routes = routes.len(), "OpenAPI document imported");
    Ok(routes)
}

fn source_kind(source: &OpenApiSource) -> &str {
    match source {
        OpenApiSource::Url(url) => url,
        OpenApiSource::File(_) => "file",
        OpenApiSource::Inline(_) => "inline",
    }
}

fn success_status(operation: &Value) -> u16 {
    operation
        .get("responses")
        .and_then(Value::as_mapping)
        .into_iter()
        .flat_map(|responses| responses.iter().map(|(code, _)| code))
        .filter_map(|code| match code {
            Value::String(code) => code.parse::<u16>().ok(),
            Value::Number(code) => code.as_u64().and_then(|code| u16::try_from(code).ok()),
            _ => None,
        })
        .filter(|code| (200..300).contains(code))
        .min()
        .unwrap_or(DEFAULT_STATUS)
}
