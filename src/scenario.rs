//! The fixed request sequence exercised against the API.
//!
//! The scenario is defined once per run: a bootstrap call that yields a
//! conversation id, one streamed chat exchange, a static battery of
//! prompt/summary/tag/title/persona/settings/registry/session/trending
//! calls, and cleanup descriptors for any resources the battery created.

use serde_json::{Value, json};

use crate::args::HttpMethod;

pub const BOOTSTRAP_PATH: &str = "/ai-conversation";
pub const STREAM_PATH: &str = "/ai-conversation-stream";
pub const SESSION_PATH: &str = "/session";
pub const TRENDING_PATH: &str = "/trending";

/// One request in the scenario. Descriptors are immutable once built.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    /// The response body is consumed chunk by chunk and concatenated
    /// instead of decoded in one piece.
    pub streaming: bool,
}

impl RequestSpec {
    fn get(path: &str) -> Self {
        RequestSpec {
            method: HttpMethod::Get,
            path: path.to_owned(),
            body: None,
            streaming: false,
        }
    }

    fn post(path: &str, body: Value) -> Self {
        RequestSpec {
            method: HttpMethod::Post,
            path: path.to_owned(),
            body: Some(body),
            streaming: false,
        }
    }
}

/// The call whose response supplies the conversation id required by the
/// streamed chat exchange. If it yields no id the run is aborted.
#[must_use]
pub fn bootstrap() -> RequestSpec {
    RequestSpec::get(BOOTSTRAP_PATH)
}

#[must_use]
pub fn stream_chat(conversation_id: &str) -> RequestSpec {
    RequestSpec {
        method: HttpMethod::Post,
        path: STREAM_PATH.to_owned(),
        body: Some(json!({
            "conversation_id": conversation_id,
            "user_message": "Analyze potential vulnerabilities in a microservices architecture using containerization.",
            "image_url": null,
        })),
        streaming: true,
    }
}

/// The static battery, in execution order.
#[must_use]
pub fn battery(owner_id: &str, tenant_id: &str) -> Vec<RequestSpec> {
    vec![
        RequestSpec::post(
            "/ai-prompt",
            json!({
                "items": [{
                    "question": "Generate a comprehensive checklist for securing cloud-native applications against common attack vectors.",
                    "response": "",
                }],
            }),
        ),
        RequestSpec::post(
            "/ai-summary",
            json!({
                "items": [{
                    "question": "Summarize the impact of a sophisticated supply chain attack targeting multiple Fortune 500 companies.",
                    "response": "",
                }],
            }),
        ),
        RequestSpec::post(
            "/ai-tags",
            json!({
                "items": [{
                    "question": "Extract relevant tags from a report on a major ransomware attack targeting healthcare institutions.",
                    "response": "",
                }],
            }),
        ),
        RequestSpec::post(
            "/ai-title",
            json!({
                "items": [{
                    "question": "Generate a title for an event describing a large-scale DDoS attack on critical infrastructure.",
                    "response": "",
                }],
            }),
        ),
        RequestSpec::get("/personas"),
        RequestSpec::get("/settings"),
        RequestSpec::get("/registry"),
        RequestSpec::post(
            "/registry",
            json!({
                "name": "Advanced Persistent Threat (APT) Detection Framework",
                "description": "A comprehensive framework for identifying and mitigating APT activities within enterprise networks.",
                "tags": ["APT", "Threat Detection", "Network Security"],
                "items": [
                    {"name": "Network Traffic Analysis Module", "description": "AI-powered anomaly detection in network traffic patterns."},
                    {"name": "Endpoint Behavior Monitoring", "description": "Continuous analysis of endpoint activities for suspicious behavior."},
                    {"name": "Threat Intelligence Integration", "description": "Real-time integration with global threat intelligence feeds."},
                ],
                "tenantId": tenant_id,
            }),
        ),
        RequestSpec::get(SESSION_PATH),
        RequestSpec::post(
            SESSION_PATH,
            json!({
                "sessionName": "Zero-Trust Architecture Implementation",
                "owner": owner_id,
                "dataItems": [{
                    "prompt": "What are the key components of a zero-trust architecture?",
                    "response": "",
                    "isDone": true,
                }],
                "tenantIds": [tenant_id],
            }),
        ),
        RequestSpec::get(TRENDING_PATH),
        RequestSpec::post(
            TRENDING_PATH,
            json!({
                "prompt": "Analyze the potential cybersecurity implications of quantum computing on current encryption standards.",
                "order": 1,
                "favorited": true,
            }),
        ),
    ]
}

/// DELETE descriptor for a resource the battery created.
#[must_use]
pub fn cleanup(path: &str, id: &str) -> RequestSpec {
    RequestSpec {
        method: HttpMethod::Delete,
        path: format!("{}?id={}", path, id),
        body: None,
        streaming: false,
    }
}
