//! Client construction and single-request execution.

use std::time::Instant;

use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::debug;

use crate::args::HttpMethod;
use crate::error::{AppError, AppResult, HttpError};
use crate::report::{CaseOutcome, CaseReport, Reporter};
use crate::scenario::RequestSpec;

/// Client id/secret pair carried in the `x-api-key` header.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub secret: String,
}

/// Decoded response body. JSON when the response declares it, text otherwise.
/// Streamed responses always decode to text.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

/// Renders the JSON-encoded credential pair for the `x-api-key` header.
///
/// # Errors
///
/// Returns an error when the pair cannot be serialized.
pub fn credential_header(credentials: &Credentials) -> AppResult<String> {
    let pair = serde_json::json!({
        "clientId": credentials.client_id,
        "secret": credentials.secret,
    });
    serde_json::to_string(&pair)
        .map_err(|err| AppError::http(HttpError::EncodeCredentials { source: err }))
}

/// Builds the shared client with the credential and content-type headers
/// applied to every request. No request timeout is configured; a hung remote
/// call hangs the run.
///
/// # Errors
///
/// Returns an error when the credential header is invalid or the client
/// cannot be constructed.
pub fn build_client(credentials: &Credentials) -> AppResult<Client> {
    let mut api_key = HeaderValue::from_str(&credential_header(credentials)?)
        .map_err(|err| AppError::http(HttpError::InvalidCredentialHeader { source: err }))?;
    api_key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", api_key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(headers)
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}

/// Issues one request, prints its report line (and a preview for successful
/// bodies), and returns the report together with the decoded payload.
///
/// Transport and decoding faults never propagate; they become a failed
/// report and the run moves on.
pub async fn execute_case(
    client: &Client,
    base_url: &str,
    spec: &RequestSpec,
    reporter: &Reporter,
) -> (CaseReport, Option<Payload>) {
    let started = Instant::now();
    let sent = send(client, base_url, spec).await;
    let elapsed = started.elapsed();

    match sent {
        Ok((status, payload)) => {
            let report = CaseReport::new(spec, CaseOutcome::Status(status), elapsed);
            reporter.case_line(&report);
            if matches!(status, 200 | 201) {
                reporter.preview(&payload);
            }
            (report, Some(payload))
        }
        Err(message) => {
            debug!(endpoint = %spec.path, "request failed: {}", message);
            let report = CaseReport::new(spec, CaseOutcome::Failed(message), elapsed);
            reporter.case_line(&report);
            (report, None)
        }
    }
}

async fn send(
    client: &Client,
    base_url: &str,
    spec: &RequestSpec,
) -> Result<(u16, Payload), String> {
    let url = format!("{}{}", base_url, spec.path);
    let method = match spec.method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    };

    let mut request = client.request(method, url);
    if let Some(body) = spec.body.as_ref() {
        request = request.json(body);
    }

    let response = request.send().await.map_err(|err| err.to_string())?;
    let status = response.status().as_u16();
    let payload = if spec.streaming {
        Payload::Text(collect_stream(response).await.map_err(|err| err.to_string())?)
    } else {
        decode_payload(response).await?
    };
    Ok((status, payload))
}

/// Reads the body as a sequence of chunks and concatenates them into one
/// string. Bytes are accumulated first so multi-byte characters split across
/// chunk boundaries survive.
async fn collect_stream(response: Response) -> Result<String, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut collected: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        collected.extend_from_slice(&chunk?);
    }
    Ok(String::from_utf8_lossy(&collected).into_owned())
}

async fn decode_payload(response: Response) -> Result<Payload, String> {
    let declares_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));

    let text = response.text().await.map_err(|err| err.to_string())?;
    if declares_json {
        serde_json::from_str(&text)
            .map(Payload::Json)
            .map_err(|err| err.to_string())
    } else {
        Ok(Payload::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_header_is_the_json_encoded_pair() -> Result<(), String> {
        let credentials = Credentials {
            client_id: "cid".to_owned(),
            secret: "shh".to_owned(),
        };
        let header = credential_header(&credentials).map_err(|err| err.to_string())?;
        assert_eq!(header, r#"{"clientId":"cid","secret":"shh"}"#);
        Ok(())
    }

    #[test]
    fn client_builds_with_default_headers() -> Result<(), String> {
        let credentials = Credentials {
            client_id: "cid".to_owned(),
            secret: "shh".to_owned(),
        };
        build_client(&credentials).map_err(|err| err.to_string())?;
        Ok(())
    }
}
