//! OpenAPI 3.0 document describing the registered routes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;

use crate::routing::dispatcher::RouteKind;
use crate::routing::magic::MAGIC_ROUTE_PREFIX;
use crate::routing::route::Route;
use crate::routing::table::RouteTable;

/// Fixed path serving the generated document.
pub const OPENAPI_PATH: &str = "/openapi";

const OPENAPI_VERSION: &str = "3.0.0";
const TITLE: &str = "Magic Mock API";
const API_VERSION: &str = "1.0";

/// Operations of one path, keyed by lower-cased method.
pub type PathItem = BTreeMap<String, Operation>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub paths: BTreeMap<String, PathItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub summary: String,
    pub description: String,
    pub responses: BTreeMap<String, ResponseObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseObject {
    pub description: String,
}

impl Operation {
    fn for_route(route: &Route) -> Self {
        let description = StatusCode::from_u16(route.status_code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Mock response");

        Self {
            summary: "Auto-generated mock route".to_string(),
            description: format!("Handles {} requests for {}", route.method, route.path),
            responses: BTreeMap::from([(
                route.status_code.to_string(),
                ResponseObject {
                    description: description.to_string(),
                },
            )]),
        }
    }

    fn magic_route() -> Self {
        Self {
            summary: "MagicRoute for dynamic responses".to_string(),
            description: "Generates a response dynamically based on request content. \
                          The status code can be any value between 100 and 599."
                .to_string(),
            responses: BTreeMap::from([(
                "default".to_string(),
                ResponseObject {
                    description: "Dynamic response based on provided request content.".to_string(),
                },
            )]),
        }
    }
}

/// Build the document from a consistent snapshot of the table.
pub fn generate_document(routes: &RouteTable) -> OpenApiDocument {
    let snapshot = routes.snapshot();

    let mut paths: BTreeMap<String, PathItem> = snapshot
        .values()
        .map(|entry| {
            let route = entry.route();
            let item = PathItem::from([(route.method.to_ascii_lowercase(), Operation::for_route(route))]);
            (route.path.clone(), item)
        })
        .collect();

    paths.insert(
        format!("{MAGIC_ROUTE_PREFIX}{{statusCode}}"),
        PathItem::from([("get".to_string(), Operation::magic_route())]),
    );

    OpenApiDocument {
        openapi: OPENAPI_VERSION.to_string(),
        info: Info {
            title: TITLE.to_string(),
            version: API_VERSION.to_string(),
        },
        paths,
    }
}

/// `GET /openapi`
pub async fn openapi_handler(
    State(routes): State<Arc<RouteTable>>,
) -> (Extension<RouteKind>, Json<OpenApiDocument>) {
    (Extension(RouteKind::OpenApi), Json(generate_document(&routes)))
}
