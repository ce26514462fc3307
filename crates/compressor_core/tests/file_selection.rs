use std::path::PathBuf;
use std::sync::Once;

use compressor_core::{update, AppState, Banner, Effect, Msg, SelectedFile, MAX_UPLOAD_BYTES};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(compressor_logging::initialize_for_tests);
}

fn zip(name: &str, size: u64) -> SelectedFile {
    SelectedFile::new(PathBuf::from("/tmp").join(name), name, size)
}

fn choose(state: AppState, file: SelectedFile) -> (AppState, Vec<Effect>) {
    update(state, Msg::FileChosen(Some(file)))
}

#[test]
fn valid_zip_is_recorded_and_hides_banner() {
    init_logging();
    let (state, _) = choose(AppState::new(), zip("bad.pdf", 10));
    assert!(state.view().banner.is_some());

    let (mut state, effects) = choose(state, zip("docs.ZIP", 1024));
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.file_name.as_deref(), Some("docs.ZIP"));
    assert_eq!(view.banner, None);
    assert!(state.consume_dirty());
}

#[test]
fn oversized_file_is_rejected_and_cleared() {
    init_logging();
    let (state, _) = choose(AppState::new(), zip("ok.zip", 1));
    let (state, effects) = choose(state, zip("huge.zip", MAX_UPLOAD_BYTES + 1));
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.file_name, None);
    assert!(state.selected_file().is_none());
    assert_eq!(
        view.banner,
        Some(Banner::error("El archivo es demasiado grande. Máximo 500MB."))
    );
}

#[test]
fn non_zip_file_is_rejected_and_cleared() {
    init_logging();
    for name in ["report.pdf", "archive.zip.bak", "zip", "archive.7z"] {
        let (state, _) = choose(AppState::new(), zip("ok.zip", 1));
        let (state, effects) = choose(state, zip(name, 1));

        assert!(effects.is_empty(), "{name}");
        assert_eq!(state.view().file_name, None, "{name}");
        assert_eq!(
            state.view().banner,
            Some(Banner::error("Solo se permiten archivos ZIP.")),
            "{name}"
        );
    }
}

#[test]
fn empty_picker_change_is_ignored() {
    init_logging();
    let (state, _) = choose(AppState::new(), zip("ok.zip", 1));
    let (next, effects) = update(state.clone(), Msg::FileChosen(None));

    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn drag_toggles_highlight_without_effects() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::DragEntered);
    assert!(effects.is_empty());
    assert!(state.view().drop_highlight);
    assert!(state.consume_dirty());

    let (mut state, effects) = update(state, Msg::DragEntered);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());

    let (state, effects) = update(state, Msg::DragLeft);
    assert!(effects.is_empty());
    assert!(!state.view().drop_highlight);
}

#[test]
fn drop_adopts_first_file_with_same_validation() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DragEntered);
    let (state, effects) = update(
        state,
        Msg::FilesDropped(vec![zip("first.zip", 5), zip("second.zip", 5)]),
    );

    assert!(effects.is_empty());
    assert!(!state.view().drop_highlight);
    assert_eq!(state.view().file_name.as_deref(), Some("first.zip"));

    let (state, _) = update(state, Msg::FilesDropped(vec![zip("notes.txt", 5)]));
    assert_eq!(state.view().file_name, None);
    assert_eq!(
        state.view().banner,
        Some(Banner::error("Solo se permiten archivos ZIP."))
    );
}

#[test]
fn empty_drop_only_clears_highlight() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileChosen(Some(zip("keep.zip", 1))));
    let (state, _) = update(state, Msg::DragEntered);
    let (state, effects) = update(state, Msg::FilesDropped(Vec::new()));

    assert!(effects.is_empty());
    assert!(!state.view().drop_highlight);
    assert_eq!(state.view().file_name.as_deref(), Some("keep.zip"));
}
