use crate::{CompressedArtifact, CompressionOption, SelectedFile, SessionId, UploadFailure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Compression choices found in the form markup.
    OptionsLoaded(Vec<CompressionOption>),
    /// User picked a file (or cleared the picker).
    FileChosen(Option<SelectedFile>),
    /// Something is being dragged over the drop target.
    DragEntered,
    /// The drag left the drop target without dropping.
    DragLeft,
    /// Files were dropped on the drop target.
    FilesDropped(Vec<SelectedFile>),
    /// User picked a compression level.
    CompressionChosen(String),
    /// User submitted the form.
    SubmitClicked,
    /// Cosmetic progress timer fired.
    ProgressTick { session_id: SessionId },
    /// The server answered; the body is still being read.
    ResponseReceived { session_id: SessionId },
    /// The upload finished, one way or another.
    UploadSettled {
        session_id: SessionId,
        result: Result<CompressedArtifact, UploadFailure>,
    },
    /// The download could not be written.
    DownloadFailed(String),
    /// Fallback for placeholder wiring.
    NoOp,
}
