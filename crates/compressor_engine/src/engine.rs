use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use compressor_logging::{compressor_debug, compressor_warn};
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::ticker::spawn_progress_ticker;
use crate::upload::{ChannelEventSink, EventSink, ReqwestUploader, UploadSettings, Uploader};
use crate::{EngineEvent, SessionId, UploadError, UploadRequest};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[from] UploadError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(#[source] std::io::Error),
}

enum EngineCommand {
    LoadForm,
    Upload(UploadRequest),
    StartTicker { session_id: SessionId },
    StopTicker { session_id: SessionId },
}

/// Front door to the IO side: commands go in, [`EngineEvent`]s come out.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: UploadSettings) -> Result<Self, EngineError> {
        let tick_interval = settings.tick_interval;
        let uploader = Arc::new(ReqwestUploader::new(settings)?);
        Self::with_uploader(uploader, tick_interval)
    }

    pub fn with_uploader(
        uploader: Arc<dyn Uploader>,
        tick_interval: Duration,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("compressor-engine".to_string())
            .spawn(move || run_engine(runtime, uploader, tick_interval, cmd_rx, event_tx))
            .map_err(EngineError::Thread)?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn load_form(&self) {
        self.send(EngineCommand::LoadForm);
    }

    pub fn upload(&self, request: UploadRequest) {
        self.send(EngineCommand::Upload(request));
    }

    pub fn start_ticker(&self, session_id: SessionId) {
        self.send(EngineCommand::StartTicker { session_id });
    }

    pub fn stop_ticker(&self, session_id: SessionId) {
        self.send(EngineCommand::StopTicker { session_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            compressor_warn!("Engine thread is gone; command dropped");
        }
    }
}

fn run_engine(
    runtime: Runtime,
    uploader: Arc<dyn Uploader>,
    tick_interval: Duration,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
    let mut tickers: HashMap<SessionId, CancellationToken> = HashMap::new();

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::LoadForm => {
                let uploader = uploader.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let result = uploader.load_form().await;
                    sink.emit(EngineEvent::FormLoaded(result));
                });
            }
            EngineCommand::Upload(request) => {
                let uploader = uploader.clone();
                let sink = sink.clone();
                runtime.spawn(async move {
                    let result = uploader.upload(&request, sink.as_ref()).await;
                    sink.emit(EngineEvent::UploadCompleted {
                        session_id: request.session_id,
                        result,
                    });
                });
            }
            EngineCommand::StartTicker { session_id } => {
                compressor_debug!("Starting progress ticker for session {}", session_id);
                let token =
                    spawn_progress_ticker(runtime.handle(), session_id, tick_interval, sink.clone());
                if let Some(previous) = tickers.insert(session_id, token) {
                    previous.cancel();
                }
            }
            EngineCommand::StopTicker { session_id } => {
                if let Some(token) = tickers.remove(&session_id) {
                    token.cancel();
                }
            }
        }
    }

    for (_, token) in tickers.drain() {
        token.cancel();
    }
}
