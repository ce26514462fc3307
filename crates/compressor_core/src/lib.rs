//! Compressor core: pure upload state machine and view-model helpers.
mod effect;
mod failure;
mod msg;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use failure::{FailureKind, UploadFailure};
pub use msg::Msg;
pub use state::{
    AppState, CompressedArtifact, CompressionOption, SelectedFile, SessionId, SessionPhase,
};
pub use update::update;
pub use validate::{
    download_name, has_zip_extension, validate_selection, ValidationError, DOWNLOAD_PREFIX,
    MAX_UPLOAD_BYTES,
};
pub use view_model::{
    Banner, BannerKind, FormViewModel, PROGRESS_CAP, SUCCESS_MESSAGE,
};
