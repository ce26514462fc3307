use std::sync::mpsc;
use std::time::Duration;

use compressor_logging::{compressor_debug, compressor_info, compressor_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;
use url::Url;

use crate::page::parse_form_page;
use crate::{CompressedFile, EngineEvent, FailureKind, FormPage, UploadError, UploadRequest};

/// Header carrying the token scraped from the form page.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Shown when a failed response does not say what went wrong.
pub const GENERIC_SERVER_ERROR: &str = "Error en el servidor";

const ZIP_MIME: &str = "application/zip";

#[derive(Debug, Clone)]
pub struct UploadSettings {
    /// Base address of the compression service, e.g. `http://127.0.0.1:5000`.
    pub server_url: String,
    pub form_path: String,
    pub compress_path: String,
    pub connect_timeout: Duration,
    /// Whole-request limit; compression of large archives is slow.
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
    /// Period of the cosmetic progress ticker.
    pub tick_interval: Duration,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            form_path: "/".to_string(),
            compress_path: "/compress".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(600),
            max_response_bytes: 1024 * 1024 * 1024,
            tick_interval: Duration::from_millis(200),
        }
    }
}

impl UploadSettings {
    pub fn endpoint(&self, path: &str) -> Result<Url, UploadError> {
        Url::parse(&self.server_url)
            .and_then(|base| base.join(path))
            .map_err(|err| {
                UploadError::new(
                    FailureKind::InvalidUrl,
                    format!("{}: {err}", self.server_url),
                )
            })
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Uploader: Send + Sync {
    /// Fetches the form page for its CSRF token and compression choices.
    async fn load_form(&self) -> Result<FormPage, UploadError>;

    /// Posts the file and returns the compressed body.
    async fn upload(
        &self,
        request: &UploadRequest,
        sink: &dyn EventSink,
    ) -> Result<CompressedFile, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestUploader {
    settings: UploadSettings,
    client: reqwest::Client,
}

impl ReqwestUploader {
    /// The client keeps cookies: the CSRF token is only valid with the session
    /// cookie issued alongside the form page.
    pub fn new(settings: UploadSettings) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .cookie_store(true)
            .build()
            .map_err(|err| UploadError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    async fn build_form(&self, request: &UploadRequest) -> Result<Form, UploadError> {
        let file = tokio::fs::File::open(&request.path)
            .await
            .map_err(|err| io_error(request, err))?;
        let len = file
            .metadata()
            .await
            .map_err(|err| io_error(request, err))?
            .len();
        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let file_part = Part::stream_with_length(body, len)
            .file_name(request.file_name.clone())
            .mime_str(ZIP_MIME)
            .map_err(map_reqwest_error)?;

        Ok(Form::new()
            .part("file", file_part)
            .text("compression", request.level.clone()))
    }
}

#[async_trait::async_trait]
impl Uploader for ReqwestUploader {
    async fn load_form(&self) -> Result<FormPage, UploadError> {
        let url = self.settings.endpoint(&self.settings.form_path)?;
        compressor_debug!("Loading form page {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let html = response.text().await.map_err(map_reqwest_error)?;
        let page = parse_form_page(&html);
        if page.csrf_token.is_none() {
            compressor_warn!("Form page has no csrf-token meta tag");
        }
        Ok(page)
    }

    async fn upload(
        &self,
        request: &UploadRequest,
        sink: &dyn EventSink,
    ) -> Result<CompressedFile, UploadError> {
        let url = self.settings.endpoint(&self.settings.compress_path)?;
        let form = self.build_form(request).await?;

        let mut builder = self.client.post(url).multipart(form);
        if let Some(token) = request.csrf_token.as_deref() {
            builder = builder.header(CSRF_HEADER, token);
        }

        compressor_info!(
            "Uploading session={} file={} level={}",
            request.session_id,
            request.file_name,
            request.level
        );
        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        sink.emit(EngineEvent::ResponseReceived {
            session_id: request.session_id,
            status: status.as_u16(),
        });

        if !status.is_success() {
            let message = match response.bytes().await {
                Ok(body) => server_error_message(&body),
                Err(_) => GENERIC_SERVER_ERROR.to_string(),
            };
            compressor_warn!(
                "Session {} rejected with {}: {}",
                request.session_id,
                status,
                message
            );
            return Err(UploadError::new(
                FailureKind::HttpStatus(status.as_u16()),
                message,
            ));
        }

        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(UploadError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(UploadError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        compressor_info!(
            "Session {} received {} bytes",
            request.session_id,
            bytes.len()
        );
        Ok(CompressedFile {
            bytes,
            content_type,
        })
    }
}

/// Message of a failed response: the JSON `error` field when present and
/// non-empty, a generic text otherwise.
pub fn server_error_message(body: &[u8]) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(body).ok();
    parsed
        .as_ref()
        .and_then(|value| value.get("error"))
        .and_then(|error| match error {
            serde_json::Value::String(text) => Some(text.clone()),
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            other => Some(other.to_string()),
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string())
}

fn io_error(request: &UploadRequest, err: std::io::Error) -> UploadError {
    UploadError::new(
        FailureKind::Io,
        format!("{}: {err}", request.path.display()),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> UploadError {
    if err.is_timeout() {
        return UploadError::new(FailureKind::Timeout, err.to_string());
    }
    UploadError::new(FailureKind::Network, err.to_string())
}
