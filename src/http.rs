//! Shared HTTP client and response plumbing for the prediction backend.

use std::sync::OnceLock;
use std::time::Duration;

use crate::error::DermaScanError;

const ERROR_BODY_MAX_BYTES: usize = 2048;
pub(crate) const MAX_BODY_BYTES: usize = 1024 * 1024;

static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

pub(crate) const ENDPOINT_ENV: &str = "DERMASCAN_API_URL";

/// Resolves the endpoint base address: explicit flag first, then environment.
/// `None` is the recognized misconfiguration state handled by the caller.
pub(crate) fn resolve_endpoint(flag: Option<&str>) -> Option<String> {
    flag.map(str::to_string)
        .or_else(|| std::env::var(ENDPOINT_ENV).ok())
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
}

/// Returns the shared HTTP client.
///
/// No retry or cache middleware: the one request this tool issues is a
/// streaming multipart POST, which cannot pass through a cloning middleware
/// stack, and the intake flow does not retry.
pub(crate) fn shared_client() -> Result<reqwest::Client, DermaScanError> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("dermascan-cli/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(DermaScanError::HttpClientInit)?;

    match HTTP_CLIENT.set(client.clone()) {
        Ok(()) => Ok(client),
        Err(_) => HTTP_CLIENT.get().cloned().ok_or_else(|| DermaScanError::Api {
            api: "http-client".into(),
            message: "Shared HTTP client initialization race".into(),
        }),
    }
}

pub(crate) async fn read_limited_body(
    mut resp: reqwest::Response,
    api: &str,
) -> Result<Vec<u8>, DermaScanError> {
    let mut body: Vec<u8> = Vec::new();

    while let Some(chunk) = resp.chunk().await? {
        let next_len = body.len().saturating_add(chunk.len());
        if next_len > MAX_BODY_BYTES {
            return Err(DermaScanError::Api {
                api: api.to_string(),
                message: format!("Response body exceeded {MAX_BODY_BYTES} bytes"),
            });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

pub(crate) fn body_excerpt(bytes: &[u8]) -> String {
    let full = String::from_utf8_lossy(bytes);

    let truncated: &str = if full.len() > ERROR_BODY_MAX_BYTES {
        let mut end = ERROR_BODY_MAX_BYTES;
        while end > 0 && !full.is_char_boundary(end) {
            end -= 1;
        }
        &full[..end]
    } else {
        full.as_ref()
    };

    let mut s = truncated.trim().replace(['\n', '\r', '\t'], " ");
    if full.len() > ERROR_BODY_MAX_BYTES {
        s.push_str(" …");
    }
    s
}
