use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use compressor_core::{
    CompressedArtifact, CompressionOption, Effect, FailureKind, Msg, UploadFailure,
};
use compressor_engine::{
    sanitize_filename, AtomicFileWriter, CompressedFile, CompressionChoice, EngineEvent,
    EngineHandle, UploadError, UploadRequest,
};
use compressor_logging::{compressor_debug, compressor_error, compressor_info, compressor_warn};

pub(crate) struct EffectRunner {
    engine: EngineHandle,
    writer: AtomicFileWriter,
    csrf_token: Option<String>,
    saved: Vec<PathBuf>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, writer: AtomicFileWriter) -> Self {
        Self {
            engine,
            writer,
            csrf_token: None,
            saved: Vec::new(),
        }
    }

    /// Loads the form page and keeps its CSRF token for later uploads.
    pub fn load_form(&mut self, timeout: Duration) -> anyhow::Result<Vec<CompressionOption>> {
        self.engine.load_form();
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                bail!("timed out waiting for the form page");
            }
            match self.engine.recv_timeout(remaining) {
                Some(EngineEvent::FormLoaded(result)) => {
                    let page = result.context("failed to load the form page")?;
                    self.csrf_token = page.csrf_token;
                    return Ok(page.choices.into_iter().map(map_choice).collect());
                }
                Some(_) => compressor_debug!("Ignoring engine event received before the form"),
                None => {}
            }
        }
    }

    /// Executes effects; returns follow-up messages for the state machine.
    pub fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::StartProgressTimer { session_id } => {
                    self.engine.start_ticker(session_id);
                }
                Effect::StopProgressTimer { session_id } => {
                    self.engine.stop_ticker(session_id);
                }
                Effect::Upload {
                    session_id,
                    file,
                    level,
                } => {
                    compressor_info!(
                        "Upload session_id={} file={} size={} level={}",
                        session_id,
                        file.name,
                        file.size,
                        level
                    );
                    if self.csrf_token.is_none() {
                        compressor_warn!("Uploading without a CSRF token");
                    }
                    self.engine.upload(UploadRequest {
                        session_id,
                        path: file.path,
                        file_name: file.name,
                        level,
                        csrf_token: self.csrf_token.clone(),
                    });
                }
                Effect::SaveDownload { file_name, bytes } => {
                    let file_name = sanitize_filename(&file_name);
                    match self.writer.write(&file_name, &bytes) {
                        Ok(path) => {
                            compressor_info!("Saved {} bytes to {:?}", bytes.len(), path);
                            self.saved.push(path);
                        }
                        Err(err) => {
                            compressor_error!(
                                "Failed to save {} in {:?}: {}",
                                file_name,
                                self.writer.dir(),
                                err
                            );
                            follow_up.push(Msg::DownloadFailed(err.to_string()));
                        }
                    }
                }
            }
        }
        follow_up
    }

    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).and_then(map_event)
    }

    pub fn saved_downloads(&self) -> &[PathBuf] {
        &self.saved
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::FormLoaded(_) => None,
        EngineEvent::ProgressTick { session_id } => Some(Msg::ProgressTick { session_id }),
        EngineEvent::ResponseReceived { session_id, status } => {
            compressor_debug!("Session {} answered with status {}", session_id, status);
            Some(Msg::ResponseReceived { session_id })
        }
        EngineEvent::UploadCompleted { session_id, result } => Some(Msg::UploadSettled {
            session_id,
            result: result.map(map_artifact).map_err(map_failure),
        }),
    }
}

fn map_choice(choice: CompressionChoice) -> CompressionOption {
    CompressionOption {
        value: choice.value,
        label: choice.label,
        default_checked: choice.checked,
    }
}

fn map_artifact(file: CompressedFile) -> CompressedArtifact {
    CompressedArtifact {
        bytes: file.bytes,
        content_type: file.content_type,
    }
}

fn map_failure(err: UploadError) -> UploadFailure {
    let kind = match err.kind {
        compressor_engine::FailureKind::HttpStatus(status) => FailureKind::Server { status },
        compressor_engine::FailureKind::Timeout => FailureKind::Timeout,
        compressor_engine::FailureKind::Io => FailureKind::Io,
        compressor_engine::FailureKind::InvalidUrl
        | compressor_engine::FailureKind::TooLarge { .. }
        | compressor_engine::FailureKind::Network => FailureKind::Network,
    };
    compressor_warn!("Upload failed ({}): {}", err.kind, err.message);
    UploadFailure::new(kind, err.message)
}
