use crate::{CompressionOption, SessionPhase};

/// The simulated percentage never passes this value before the server answers.
pub const PROGRESS_CAP: u8 = 90;

pub const SUCCESS_MESSAGE: &str = "¡PDFs comprimidos correctamente! Descarga iniciada.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub text: String,
    pub kind: BannerKind,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BannerKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: BannerKind::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormViewModel {
    pub file_name: Option<String>,
    pub options: Vec<CompressionOption>,
    pub selected_level: Option<String>,
    pub phase: SessionPhase,
    pub submit_enabled: bool,
    pub progress_visible: bool,
    pub progress_percent: u8,
    pub drop_highlight: bool,
    pub banner: Option<Banner>,
    pub dirty: bool,
}
