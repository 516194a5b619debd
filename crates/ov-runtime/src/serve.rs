//! JSON-line request loop.
//!
//! Each input line is `{"id": <any>, "method": "...", "params": {...}}`.
//! Each output line is `{"id": ..., "result": ...}` or `{"id": ..., "error": ...}`.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use ov_01_node_discovery::{ApiError, ApiHandler, NodeDiscoveryApi};

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

/// Handle one request line and build the response line.
pub async fn process_line<A: NodeDiscoveryApi>(handler: &ApiHandler<A>, line: &str) -> Value {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "unparseable request line");
            let err = ApiError {
                code: -32700,
                message: format!("Parse error: {}", e),
                status: None,
            };
            return json!({ "id": Value::Null, "error": err });
        }
    };

    match handler.handle(&request.method, &request.params).await {
        Ok(result) => json!({ "id": request.id, "result": result }),
        Err(err) => {
            debug!(method = %request.method, code = err.code, "request failed");
            json!({ "id": request.id, "error": err })
        }
    }
}

/// Serve requests from `input` until EOF, writing responses to `output`.
pub async fn serve<A, R, W>(handler: &ApiHandler<A>, input: R, mut output: W) -> Result<u64>
where
    A: NodeDiscoveryApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut served = 0u64;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = process_line(handler, &line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        output.write_all(&encoded).await?;
        output.flush().await?;
        served += 1;
    }

    Ok(served)
}
