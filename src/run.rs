//! Sequential execution of the smoke scenario.
//!
//! Every call is awaited before the next begins, so ordering between
//! requests follows source order exactly. The only control-flow branch is
//! the bootstrap check: no conversation id means the rest of the scenario
//! is skipped, cleanup included.

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::args::HttpMethod;
use crate::http::{self, Payload};
use crate::report::{CaseOutcome, CaseReport, Reporter};
use crate::scenario::{self, RequestSpec};

/// Everything the scenario needs besides the client.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Validated base URL without a trailing slash.
    pub base_url: String,
    pub owner_id: String,
    pub tenant_id: String,
    pub reporter: Reporter,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// The full scenario ran, cleanup included.
    Completed { reports: Vec<CaseReport> },
    /// The bootstrap call yielded no conversation id; nothing else ran.
    Aborted { reports: Vec<CaseReport> },
}

impl RunOutcome {
    #[must_use]
    pub fn reports(&self) -> &[CaseReport] {
        match self {
            RunOutcome::Completed { reports } | RunOutcome::Aborted { reports } => reports,
        }
    }
}

/// Runs bootstrap, the streamed chat exchange, the static battery, and
/// cleanup, in that order. Failed cases are reported and skipped over;
/// cleanup is attempted for every captured id regardless of earlier errors.
pub async fn execute(client: &Client, plan: &RunPlan) -> RunOutcome {
    let mut reports = Vec::new();

    let bootstrap = scenario::bootstrap();
    let (bootstrap_report, bootstrap_payload) =
        run_case(client, plan, &bootstrap, &mut reports).await;
    let bootstrap_ok = matches!(bootstrap_report.outcome, CaseOutcome::Status(200 | 201));
    let conversation_id = bootstrap_payload
        .filter(|_| bootstrap_ok)
        .as_ref()
        .and_then(extract_conversation_id);
    let Some(conversation_id) = conversation_id else {
        plan.reporter
            .abort("Failed to get conversation id from response. Aborting remaining checks.");
        return RunOutcome::Aborted { reports };
    };
    debug!(conversation_id = %conversation_id, "bootstrap succeeded");

    let stream = scenario::stream_chat(&conversation_id);
    drop(run_case(client, plan, &stream, &mut reports).await);

    let mut session_id: Option<String> = None;
    let mut trending_id: Option<String> = None;
    for spec in scenario::battery(&plan.owner_id, &plan.tenant_id) {
        let (_report, payload) = run_case(client, plan, &spec, &mut reports).await;
        if matches!(spec.method, HttpMethod::Post) {
            if spec.path == scenario::SESSION_PATH {
                session_id = payload.as_ref().and_then(extract_id);
            } else if spec.path == scenario::TRENDING_PATH {
                trending_id = payload.as_ref().and_then(extract_id);
            }
        }
    }

    if let Some(id) = session_id.as_deref() {
        plan.reporter.note("\nCleaning up created session...");
        let spec = scenario::cleanup(scenario::SESSION_PATH, id);
        drop(run_case(client, plan, &spec, &mut reports).await);
    }
    if let Some(id) = trending_id.as_deref() {
        plan.reporter.note("\nCleaning up created trending prompt...");
        let spec = scenario::cleanup(scenario::TRENDING_PATH, id);
        drop(run_case(client, plan, &spec, &mut reports).await);
    }

    RunOutcome::Completed { reports }
}

async fn run_case(
    client: &Client,
    plan: &RunPlan,
    spec: &RequestSpec,
    reports: &mut Vec<CaseReport>,
) -> (CaseReport, Option<Payload>) {
    let (report, payload) = http::execute_case(client, &plan.base_url, spec, &plan.reporter).await;
    debug!(
        at = %report.timestamp,
        endpoint = %report.endpoint,
        outcome = ?report.outcome,
        "case recorded"
    );
    reports.push(report.clone());
    (report, payload)
}

/// Pulls `new.conversation_id` out of the bootstrap payload. Empty ids are
/// treated as missing.
fn extract_conversation_id(payload: &Payload) -> Option<String> {
    let Payload::Json(value) = payload else {
        return None;
    };
    value
        .get("new")?
        .get("conversation_id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .filter(|id| !id.is_empty())
}

/// Pulls a created-resource id out of a creation response. The API returns
/// string ids; numeric ids are tolerated anyway.
fn extract_id(payload: &Payload) -> Option<String> {
    let Payload::Json(value) = payload else {
        return None;
    };
    let id = value.get("id")?;
    id.as_str()
        .map(str::to_owned)
        .or_else(|| id.as_u64().map(|numeric| numeric.to_string()))
}
