use std::path::PathBuf;
use std::sync::Once;

use compressor_core::{
    update, AppState, Banner, BannerKind, CompressedArtifact, CompressionOption, Effect,
    FailureKind, Msg, SelectedFile, SessionId, SessionPhase, UploadFailure, PROGRESS_CAP,
    SUCCESS_MESSAGE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(compressor_logging::initialize_for_tests);
}

fn option(value: &str, checked: bool) -> CompressionOption {
    CompressionOption {
        value: value.to_string(),
        label: value.to_string(),
        default_checked: checked,
    }
}

fn docs_zip() -> SelectedFile {
    SelectedFile::new(PathBuf::from("/data/docs.zip"), "docs.zip", 2048)
}

fn ready_form() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::OptionsLoaded(vec![
            option("low", false),
            option("medium", true),
            option("high", false),
        ]),
    );
    let (state, _) = update(state, Msg::FileChosen(Some(docs_zip())));
    state
}

fn submitted() -> (AppState, SessionId) {
    let (state, effects) = update(ready_form(), Msg::SubmitClicked);
    let session_id = match effects.first() {
        Some(Effect::StartProgressTimer { session_id }) => *session_id,
        other => panic!("unexpected first effect: {other:?}"),
    };
    (state, session_id)
}

fn tick(state: AppState, session_id: SessionId, times: usize) -> AppState {
    (0..times).fold(state, |state, _| {
        update(state, Msg::ProgressTick { session_id }).0
    })
}

fn artifact() -> CompressedArtifact {
    CompressedArtifact {
        bytes: b"PK\x03\x04compressed".to_vec(),
        content_type: Some("application/zip".to_string()),
    }
}

#[test]
fn options_loaded_selects_markup_default() {
    init_logging();
    let state = ready_form();
    assert_eq!(state.view().selected_level.as_deref(), Some("medium"));
    assert_eq!(state.view().options.len(), 3);

    let (state, _) = update(state, Msg::CompressionChosen("high".to_string()));
    assert_eq!(state.selected_level(), Some("high"));

    let (state, _) = update(state, Msg::CompressionChosen("extreme".to_string()));
    assert_eq!(state.selected_level(), Some("high"));
}

#[test]
fn submit_without_file_shows_message_and_emits_nothing() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::OptionsLoaded(vec![option("medium", true)]),
    );
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(
        state.view().banner,
        Some(Banner::error("Por favor selecciona un archivo ZIP."))
    );
    assert!(state.view().submit_enabled);
    assert!(!state.view().progress_visible);
}

#[test]
fn submit_without_level_shows_error_and_emits_nothing() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::OptionsLoaded(vec![option("low", false), option("high", false)]),
    );
    let (state, _) = update(state, Msg::FileChosen(Some(docs_zip())));
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    let banner = state.view().banner.expect("banner");
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(banner.text, "Error: No hay nivel de compresión seleccionado");
    assert_eq!(state.view().phase, SessionPhase::Idle);
}

#[test]
fn submit_starts_session_and_requests_upload() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SubmitClicked);
    assert!(state.view().banner.is_some());

    let state = {
        let (state, _) = update(
            state,
            Msg::OptionsLoaded(vec![option("medium", true)]),
        );
        update(state, Msg::FileChosen(Some(docs_zip()))).0
    };
    let (state, effects) = update(state, Msg::SubmitClicked);
    let view = state.view();

    assert_eq!(
        effects,
        vec![
            Effect::StartProgressTimer { session_id: 1 },
            Effect::Upload {
                session_id: 1,
                file: docs_zip(),
                level: "medium".to_string(),
            },
        ]
    );
    assert_eq!(view.phase, SessionPhase::Submitting);
    assert!(!view.submit_enabled);
    assert!(view.progress_visible);
    assert_eq!(view.progress_percent, 0);
    assert_eq!(view.banner, None);
}

#[test]
fn second_submit_is_ignored_while_in_flight() {
    init_logging();
    let (state, _) = submitted();
    let (next, effects) = update(state.clone(), Msg::SubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn simulated_progress_is_capped_until_response() {
    init_logging();
    let (state, session_id) = submitted();

    let state = tick(state, session_id, 10);
    assert_eq!(state.view().progress_percent, 10);

    let state = tick(state, session_id, 500);
    assert_eq!(state.view().progress_percent, PROGRESS_CAP);

    let (state, effects) = update(state, Msg::ResponseReceived { session_id });
    assert_eq!(effects, vec![Effect::StopProgressTimer { session_id }]);
    assert_eq!(state.view().progress_percent, 100);
    assert_eq!(state.view().phase, SessionPhase::Receiving);

    // Late ticks cannot move the bar once the server answered.
    let state = tick(state, session_id, 3);
    assert_eq!(state.view().progress_percent, 100);
}

#[test]
fn success_saves_one_download_and_resets_form() {
    init_logging();
    let (state, session_id) = submitted();
    let (state, _) = update(state, Msg::CompressionChosen("high".to_string()));
    let state = tick(state, session_id, 4);
    let (state, _) = update(state, Msg::ResponseReceived { session_id });
    let (state, effects) = update(
        state,
        Msg::UploadSettled {
            session_id,
            result: Ok(artifact()),
        },
    );
    let view = state.view();

    assert_eq!(
        effects,
        vec![Effect::SaveDownload {
            file_name: "compressed_docs.zip".to_string(),
            bytes: artifact().bytes,
        }]
    );
    assert_eq!(view.banner, Some(Banner::success(SUCCESS_MESSAGE)));
    assert_eq!(view.file_name, None);
    assert_eq!(view.selected_level.as_deref(), Some("medium"));
    assert!(view.submit_enabled);
    assert!(!view.progress_visible);
    assert_eq!(view.progress_percent, 0);
    assert_eq!(view.phase, SessionPhase::Idle);
}

#[test]
fn server_error_is_shown_and_submit_re_enabled() {
    init_logging();
    let (state, session_id) = submitted();
    let state = tick(state, session_id, 7);
    let (state, _) = update(state, Msg::ResponseReceived { session_id });
    let (state, effects) = update(
        state,
        Msg::UploadSettled {
            session_id,
            result: Err(UploadFailure::new(
                FailureKind::Server { status: 413 },
                "too big",
            )),
        },
    );
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.banner, Some(Banner::error("Error: too big")));
    assert!(view.submit_enabled);
    assert!(!view.progress_visible);
    assert_eq!(view.progress_percent, 0);
    // A failed upload keeps the picked file for another attempt.
    assert_eq!(view.file_name.as_deref(), Some("docs.zip"));
}

#[test]
fn network_failure_stops_ticker_and_cleans_up() {
    init_logging();
    let (state, session_id) = submitted();
    let state = tick(state, session_id, 30);
    let (state, effects) = update(
        state,
        Msg::UploadSettled {
            session_id,
            result: Err(UploadFailure::new(
                FailureKind::Network,
                "connection refused",
            )),
        },
    );

    assert_eq!(effects, vec![Effect::StopProgressTimer { session_id }]);
    assert_eq!(
        state.view().banner,
        Some(Banner::error("Error: connection refused"))
    );
    assert_eq!(state.view().progress_percent, 0);
    assert!(state.view().submit_enabled);
}

#[test]
fn stale_session_events_are_ignored() {
    init_logging();
    let (state, first) = submitted();
    let (state, _) = update(
        state,
        Msg::UploadSettled {
            session_id: first,
            result: Err(UploadFailure::new(FailureKind::Timeout, "timed out")),
        },
    );
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(
        effects.first(),
        Some(&Effect::StartProgressTimer { session_id: first + 1 })
    );

    let before = state.clone();
    let state = tick(state, first, 5);
    let (state, effects) = update(
        state,
        Msg::UploadSettled {
            session_id: first,
            result: Ok(artifact()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert_eq!(state.active_session_id(), Some(first + 1));
}

#[test]
fn download_failure_replaces_success_banner() {
    init_logging();
    let (state, session_id) = submitted();
    let (state, _) = update(
        state,
        Msg::UploadSettled {
            session_id,
            result: Ok(artifact()),
        },
    );
    let (state, effects) = update(state, Msg::DownloadFailed("disk full".to_string()));

    assert!(effects.is_empty());
    assert_eq!(state.view().banner, Some(Banner::error("Error: disk full")));
}
