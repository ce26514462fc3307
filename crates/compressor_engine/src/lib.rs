//! Compressor engine: form loading, upload, progress ticker and download persistence.
mod engine;
mod filename;
mod page;
mod persist;
mod ticker;
mod types;
mod upload;

pub use engine::{EngineError, EngineHandle};
pub use filename::sanitize_filename;
pub use page::parse_form_page;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use ticker::spawn_progress_ticker;
pub use types::{
    CompressedFile, CompressionChoice, EngineEvent, FailureKind, FormPage, SessionId,
    UploadError, UploadRequest,
};
pub use upload::{
    server_error_message, ChannelEventSink, EventSink, ReqwestUploader, UploadSettings, Uploader,
    CSRF_HEADER, GENERIC_SERVER_ERROR,
};
