// [libs/infra/backend-client/src/client.rs]
/*!
 * =================================================================
 * APARATO: BACKEND LOOPBACK UPLINK
 * CLASIFICACIÓN: INFRASTRUCTURE ADAPTER (ESTRATO L3)
 * RESPONSABILIDAD: NEGOCIACIÓN DE INFERENCIA CONTRA EL BACKEND SUPERVISADO
 *
 * Habla el dialecto nativo de `llama-server` (`/completion`), nunca la
 * superficie OpenAI-compatible: esa adaptación vive en los handlers HTTP
 * del orquestador, fuera de esta capa.
 * =================================================================
 */

use crate::errors::ClientError;
use crate::request::{CompletionRequest, CompletionResult, WireRequest, WireResponse};
use aegis_domain_models::error::AppError;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, instrument};

pub struct BackendClient {
    http: Client,
}

impl Default for BackendClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .build()
                .expect("FATAL: backend loopback client initialization failed"),
        }
    }

    fn endpoint(port: u16) -> String {
        format!("http://127.0.0.1:{port}/completion")
    }

    #[instrument(skip(self, req))]
    pub async fn complete(
        &self,
        port: u16,
        req: &CompletionRequest,
        timeout: Duration,
    ) -> Result<CompletionResult, ClientError> {
        let wire = WireRequest {
            prompt: &req.prompt,
            n_predict: req.max_tokens,
            temperature: req.temperature(),
            top_p: req.top_p(),
            stream: false,
        };

        let response = self
            .http
            .post(Self::endpoint(port))
            .json(&wire)
            .timeout(timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::ServerRejection(format!("HTTP_{}", response.status())));
        }

        let body: WireResponse = response.json().await?;
        Ok(CompletionResult { text: body.content.clone(), usage: body.usage() })
    }

    /// Streams completion text deltas, forwarding each `data:` chunk's
    /// `content` field as it arrives. The receiver side is collapsed into
    /// an async stream so callers don't touch SSE framing.
    #[instrument(skip(self, req))]
    pub async fn stream_complete(
        &self,
        port: u16,
        req: &CompletionRequest,
        timeout: Duration,
    ) -> Result<ReceiverStream<Result<String, ClientError>>, ClientError> {
        let wire = WireRequest {
            prompt: &req.prompt,
            n_predict: req.max_tokens,
            temperature: req.temperature(),
            top_p: req.top_p(),
            stream: true,
        };

        let response = self
            .http
            .post(Self::endpoint(port))
            .json(&wire)
            .timeout(timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::ServerRejection(format!("HTTP_{}", response.status())));
        }

        let (tx, rx) = mpsc::channel(32);
        let mut byte_stream = response.bytes_stream();

        tokio::spawn(async move {
            let mut carry = String::new();
            while let Some(chunk) = byte_stream.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        let _ = tx.send(Err(ClientError::NetworkFault(e))).await;
                        return;
                    }
                };
                carry.push_str(&String::from_utf8_lossy(&chunk));
                while let Some(pos) = carry.find('\n') {
                    let line = carry[..pos].trim().to_string();
                    carry.drain(..=pos);
                    let Some(payload) = line.strip_prefix("data: ") else { continue };
                    if payload == "[DONE]" {
                        return;
                    }
                    match serde_json::from_str::<WireResponse>(payload) {
                        Ok(parsed) => {
                            if tx.send(Ok(parsed.content)).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            error!("stream decode fault: {e}");
                            let _ = tx.send(Err(ClientError::DecodingFault(e))).await;
                            return;
                        }
                    }
                }
            }
        });

        Ok(ReceiverStream::new(rx))
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NetworkFault(e) => AppError::unhealthy(format!("backend unreachable: {e}")),
            ClientError::DecodingFault(e) => AppError::internal(format!("malformed backend response: {e}")),
            ClientError::ServerRejection(status) => AppError::unhealthy(format!("backend rejected request: {status}")),
            ClientError::IncompleteStream => AppError::internal("backend stream ended without completion"),
        }
    }
}
