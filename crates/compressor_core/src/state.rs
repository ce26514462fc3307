use std::path::PathBuf;

use crate::view_model::{Banner, FormViewModel};

pub type SessionId = u64;

/// A file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Display name, also used to name the download.
    pub name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(path: PathBuf, name: impl Into<String>, size: u64) -> Self {
        Self {
            path,
            name: name.into(),
            size,
        }
    }
}

/// One radio choice of the `compression` field, as found in the form markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionOption {
    pub value: String,
    pub label: String,
    /// Marked `checked` in the markup; restored on form reset.
    pub default_checked: bool,
}

/// Successful response body of the compression endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedArtifact {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Request sent, waiting for the status line.
    Submitting,
    /// Status line arrived, reading the body.
    Receiving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UploadSession {
    pub(crate) id: SessionId,
    pub(crate) file: SelectedFile,
    pub(crate) phase: SessionPhase,
    pub(crate) simulated_percent: u8,
    pub(crate) ticker_running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    file: Option<SelectedFile>,
    options: Vec<CompressionOption>,
    selected_level: Option<String>,
    drop_highlight: bool,
    banner: Option<Banner>,
    session: Option<UploadSession>,
    last_session_id: SessionId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> FormViewModel {
        FormViewModel {
            file_name: self.file.as_ref().map(|file| file.name.clone()),
            options: self.options.clone(),
            selected_level: self.selected_level.clone(),
            phase: self
                .session
                .as_ref()
                .map_or(SessionPhase::Idle, |session| session.phase),
            submit_enabled: self.session.is_none(),
            progress_visible: self.session.is_some(),
            progress_percent: self
                .session
                .as_ref()
                .map_or(0, |session| session.simulated_percent),
            drop_highlight: self.drop_highlight,
            banner: self.banner.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn selected_level(&self) -> Option<&str> {
        self.selected_level.as_deref()
    }

    pub fn options(&self) -> &[CompressionOption] {
        &self.options
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_some()
    }

    pub fn active_session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|session| session.id)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_options(&mut self, options: Vec<CompressionOption>) {
        self.selected_level = default_level(&options);
        self.options = options;
        self.mark_dirty();
    }

    /// Returns `false` when the value is not one of the loaded options.
    pub(crate) fn select_level(&mut self, value: &str) -> bool {
        if !self.options.iter().any(|option| option.value == value) {
            return false;
        }
        self.selected_level = Some(value.to_string());
        self.mark_dirty();
        true
    }

    pub(crate) fn set_file(&mut self, file: Option<SelectedFile>) {
        self.file = file;
        self.mark_dirty();
    }

    pub(crate) fn set_drop_highlight(&mut self, active: bool) {
        if self.drop_highlight != active {
            self.drop_highlight = active;
            self.mark_dirty();
        }
    }

    pub(crate) fn show_banner(&mut self, banner: Banner) {
        self.banner = Some(banner);
        self.mark_dirty();
    }

    pub(crate) fn hide_banner(&mut self) {
        if self.banner.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Clears the file and restores the markup's default level.
    pub(crate) fn reset_form(&mut self) {
        self.file = None;
        self.selected_level = default_level(&self.options);
        self.mark_dirty();
    }

    pub(crate) fn start_session(&mut self, file: SelectedFile) -> SessionId {
        self.last_session_id += 1;
        let id = self.last_session_id;
        self.session = Some(UploadSession {
            id,
            file,
            phase: SessionPhase::Submitting,
            simulated_percent: 0,
            ticker_running: true,
        });
        self.mark_dirty();
        id
    }

    pub(crate) fn session_mut(&mut self, session_id: SessionId) -> Option<&mut UploadSession> {
        self.session
            .as_mut()
            .filter(|session| session.id == session_id)
    }

    /// Ends the active session; every exit path goes through here.
    pub(crate) fn finish_session(&mut self) -> Option<UploadSession> {
        let session = self.session.take();
        if session.is_some() {
            self.mark_dirty();
        }
        session
    }
}

fn default_level(options: &[CompressionOption]) -> Option<String> {
    options
        .iter()
        .find(|option| option.default_checked)
        .map(|option| option.value.clone())
}
