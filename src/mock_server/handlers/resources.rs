//! Resource endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::{Links, Relationship, Relationships};

/// Page size when the request has no `page[limit]`.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Incoming JSON:API document for create and update.
#[derive(Debug, Deserialize)]
pub struct IncomingDocument {
    pub data: IncomingResource,
}

#[derive(Debug, Deserialize)]
pub struct IncomingResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: Relationships,
}

/// A JSON:API error document.
pub fn error_response(status: StatusCode, code: &str) -> Response {
    (
        status,
        Json(json!({
            "errors": [{"status": status.as_u16().to_string(), "code": code}]
        })),
    )
        .into_response()
}

pub(crate) fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// Reject unauthenticated or unknown-type requests.
fn check_access(state: &MockState, headers: &HeaderMap, resource_type: &str) -> Option<Response> {
    if !state.is_authorized(authorization(headers)) {
        return Some(error_response(StatusCode::UNAUTHORIZED, "not_authenticated"));
    }
    if !state.has_type(resource_type) {
        return Some(error_response(StatusCode::NOT_FOUND, "route_not_found"));
    }
    None
}

/// GET /api/{type}
pub async fn list_resources(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(resource_type): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if let Some(rejection) = check_access(&state, &headers, &resource_type) {
        return rejection;
    }

    let filters: Vec<(String, String)> = query
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix("filter[")
                .and_then(|k| k.strip_suffix(']'))
                .map(|k| (k.to_string(), value.clone()))
        })
        .collect();

    let page_param = |name: &str| {
        query
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.parse::<usize>().ok())
    };
    let limit = page_param("page[limit]").unwrap_or(DEFAULT_PAGE_LIMIT).max(1);
    let offset = match page_param("page[number]") {
        Some(number) => number.saturating_sub(1).saturating_mul(limit),
        None => page_param("page[offset]").unwrap_or(0),
    };

    let matching = state.list(&resource_type, &filters);
    let total = matching.len();
    let data: Vec<_> = matching.into_iter().skip(offset).take(limit).collect();

    let mut links = Links {
        first: Some(format!("/api/{resource_type}")),
        ..Default::default()
    };
    let next_offset = offset.saturating_add(limit);
    if next_offset < total {
        links.next = Some(format!(
            "/api/{resource_type}?page%5Boffset%5D={next_offset}"
        ));
    }

    Json(json!({
        "data": data,
        "links": links,
        "meta": {"total": total}
    }))
    .into_response()
}

/// GET /api/{type}/{id}
pub async fn get_resource(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((resource_type, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let state = state.read().await;
    if let Some(rejection) = check_access(&state, &headers, &resource_type) {
        return rejection;
    }

    match state.get(&resource_type, &id) {
        Some(resource) => Json(json!({ "data": resource })).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "not_found"),
    }
}

/// PATCH /api/{type}/{id}
pub async fn update_resource(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((resource_type, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(document): Json<IncomingDocument>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers, &resource_type) {
        return rejection;
    }

    let incoming = document.data;
    if incoming.resource_type != resource_type || incoming.id.as_deref() != Some(id.as_str()) {
        return error_response(StatusCode::CONFLICT, "conflict");
    }

    match state.update(&resource_type, &id, incoming.attributes, incoming.relationships) {
        Some(resource) => Json(json!({ "data": resource })).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "not_found"),
    }
}

/// DELETE /api/{type}/{id}
pub async fn delete_resource(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((resource_type, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers, &resource_type) {
        return rejection;
    }

    if state.delete(&resource_type, &id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, "not_found")
    }
}

/// POST /api/{type}
///
/// Discussions take their first post from a `content` attribute; posts
/// need a `discussion` relationship.
pub async fn create_resource(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(resource_type): Path<String>,
    headers: HeaderMap,
    Json(document): Json<IncomingDocument>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejection) = check_access(&state, &headers, &resource_type) {
        return rejection;
    }

    let incoming = document.data;
    if incoming.resource_type != resource_type {
        return error_response(StatusCode::CONFLICT, "conflict");
    }

    let actor = state.actor_id(authorization(&headers));
    let mut attributes = incoming.attributes;
    let mut relationships = incoming.relationships;

    let created = match resource_type.as_str() {
        "discussions" => {
            let content = take_content(&mut attributes);
            attributes.insert("commentCount".to_string(), Value::from(1));
            if let Some(actor) = &actor {
                relationships.insert("user".to_string(), Relationship::to_one("users", actor));
            }

            let discussion = state.create("discussions", attributes, relationships);
            state.create_post(&discussion.id, &content, actor.as_deref());
            discussion
        }
        "posts" => {
            let discussion_id = relationships
                .get("discussion")
                .and_then(|r| r.identifiers().first())
                .map(|i| i.id.clone());

            match discussion_id {
                Some(id) if state.get("discussions", &id).is_some() => {
                    let content = take_content(&mut attributes);
                    state.create_post(&id, &content, actor.as_deref())
                }
                _ => return error_response(StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            }
        }
        _ => state.create(&resource_type, attributes, relationships),
    };

    (StatusCode::CREATED, Json(json!({ "data": created }))).into_response()
}

fn take_content(attributes: &mut Map<String, Value>) -> String {
    match attributes.remove("content") {
        Some(Value::String(content)) => content,
        _ => String::new(),
    }
}
