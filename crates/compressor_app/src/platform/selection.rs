use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use compressor_core::SelectedFile;

/// Stats a path into the handle the form works with.
pub(crate) fn select_file(path: &Path) -> anyhow::Result<SelectedFile> {
    let meta = fs::metadata(path).with_context(|| format!("cannot read {}", path.display()))?;
    if !meta.is_file() {
        bail!("{} is not a file", path.display());
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(SelectedFile::new(path.to_path_buf(), name, meta.len()))
}
