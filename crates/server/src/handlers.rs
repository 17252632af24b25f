use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use blockscope::report::ScanRequest;
use blockscope::{scan_or_default, ScanAnalyzer, ScanResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::ApiError;
use crate::store::{ScanStore, StoredFinding, StoredScan};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn ScanAnalyzer>,
    pub store: Arc<dyn ScanStore>,
    pub scan_timeout: Duration,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn ScanAnalyzer>, store: Arc<dyn ScanStore>) -> Self {
        Self {
            analyzer,
            store,
            scan_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct InlineScanRequest {
    pub source_code: Option<String>,
    pub contract_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthData> {
    Json(HealthData {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/v1/scan`: JSON `{source_code, contract_name?}` or a multipart
/// upload with a `file` field and optional `contract_name` field.
pub async fn scan(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<StoredScan>, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    let scan_request = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        read_upload(multipart).await?
    } else if content_type.starts_with("application/json") {
        let body = Bytes::from_request(request, &state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        read_inline(&body)?
    } else {
        return Err(ApiError::MissingInput);
    };

    let result = run_scan(&state, scan_request).await;
    let stored = state.store.insert(result);
    info!(
        scan_id = stored.scan_id,
        contract = %stored.result.contract_name(),
        score = stored.result.overall_score(),
        findings = stored.result.vulnerabilities_count(),
        "scan stored"
    );
    Ok(Json(stored))
}

async fn read_upload(mut multipart: Multipart) -> Result<ScanRequest, ApiError> {
    let mut source = None;
    let mut file_name = None;
    let mut contract_name = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await?;
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|_| ApiError::BadRequest("file must be UTF-8 text".to_string()))?;
                source = Some(text);
            }
            Some("contract_name") => contract_name = Some(field.text().await?),
            _ => {}
        }
    }

    let source = source
        .filter(|s| !s.trim().is_empty())
        .ok_or(ApiError::MissingInput)?;
    Ok(ScanRequest::resolve(source, contract_name, file_name.as_deref()))
}

fn read_inline(body: &[u8]) -> Result<ScanRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::MissingInput);
    }
    let inline: InlineScanRequest = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?;
    let source = inline
        .source_code
        .filter(|s| !s.trim().is_empty())
        .ok_or(ApiError::MissingInput)?;
    Ok(ScanRequest::resolve(source, inline.contract_name, None))
}

/// Run the analyzer off the async runtime under the configured deadline.
/// A join failure or an exceeded deadline yields the safe default result.
async fn run_scan(state: &AppState, request: ScanRequest) -> ScanResult {
    let analyzer = Arc::clone(&state.analyzer);
    let task_request = request.clone();
    let task =
        tokio::task::spawn_blocking(move || scan_or_default(analyzer.as_ref(), &task_request));

    match tokio::time::timeout(state.scan_timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!(
                contract = %request.contract_name,
                error = %e,
                "scan task failed, returning default result"
            );
            ScanResult::safe_default(&request)
        }
        Err(_) => {
            error!(
                contract = %request.contract_name,
                timeout_secs = state.scan_timeout.as_secs(),
                "scan timed out, returning default result"
            );
            ScanResult::safe_default(&request)
        }
    }
}

pub async fn list_scans(State(state): State<AppState>) -> Json<Vec<StoredScan>> {
    Json(state.store.list())
}

pub async fn get_scan(
    State(state): State<AppState>,
    Path(scan_id): Path<u64>,
) -> Result<Json<StoredScan>, ApiError> {
    state.store.get(scan_id).map(Json).ok_or(ApiError::NotFound)
}

pub async fn get_scan_findings(
    State(state): State<AppState>,
    Path(scan_id): Path<u64>,
) -> Result<Json<Vec<StoredFinding>>, ApiError> {
    if state.store.get(scan_id).is_none() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(state.store.findings_for(scan_id)))
}
