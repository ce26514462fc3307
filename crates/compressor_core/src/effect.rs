use crate::{SelectedFile, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start the cosmetic progress ticker for a session.
    StartProgressTimer { session_id: SessionId },
    StopProgressTimer { session_id: SessionId },
    /// Send the file and the chosen level to the compression endpoint.
    Upload {
        session_id: SessionId,
        file: SelectedFile,
        level: String,
    },
    /// Hand the compressed body to the user as a download.
    SaveDownload { file_name: String, bytes: Vec<u8> },
}
