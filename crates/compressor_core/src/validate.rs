use thiserror::Error;

use crate::SelectedFile;

/// Largest file the form accepts: 500 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Prefix of the name given to the downloaded result.
pub const DOWNLOAD_PREFIX: &str = "compressed_";

const ZIP_EXTENSION: &str = ".zip";

/// Client-side rejections. The `Display` text is what the banner shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("El archivo es demasiado grande. Máximo 500MB.")]
    FileTooLarge { size: u64 },
    #[error("Solo se permiten archivos ZIP.")]
    NotZip { name: String },
    #[error("Por favor selecciona un archivo ZIP.")]
    NoFile,
    #[error("Error: No hay nivel de compresión seleccionado")]
    NoCompressionLevel,
}

/// Checks a picked file against the size limit, then the extension.
pub fn validate_selection(file: &SelectedFile) -> Result<(), ValidationError> {
    if file.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::FileTooLarge { size: file.size });
    }
    if !has_zip_extension(&file.name) {
        return Err(ValidationError::NotZip {
            name: file.name.clone(),
        });
    }
    Ok(())
}

/// Case-insensitive `.zip` suffix check.
pub fn has_zip_extension(name: &str) -> bool {
    name.len()
        .checked_sub(ZIP_EXTENSION.len())
        .and_then(|start| name.get(start..))
        .is_some_and(|suffix| suffix.eq_ignore_ascii_case(ZIP_EXTENSION))
}

pub fn download_name(original: &str) -> String {
    format!("{DOWNLOAD_PREFIX}{original}")
}
