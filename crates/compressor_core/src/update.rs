use crate::{
    download_name, validate_selection, AppState, Banner, CompressedArtifact, Effect, Msg,
    SelectedFile, SessionId, SessionPhase, UploadFailure, ValidationError, PROGRESS_CAP,
    SUCCESS_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::OptionsLoaded(options) => {
            state.set_options(options);
            Vec::new()
        }
        Msg::FileChosen(file) => {
            choose_file(&mut state, file);
            Vec::new()
        }
        Msg::DragEntered => {
            state.set_drop_highlight(true);
            Vec::new()
        }
        Msg::DragLeft => {
            state.set_drop_highlight(false);
            Vec::new()
        }
        Msg::FilesDropped(files) => {
            state.set_drop_highlight(false);
            // Only the first file is adopted, exactly as if it had been picked.
            if let Some(first) = files.into_iter().next() {
                choose_file(&mut state, Some(first));
            }
            Vec::new()
        }
        Msg::CompressionChosen(value) => {
            state.select_level(&value);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::ProgressTick { session_id } => {
            if let Some(session) = state.session_mut(session_id) {
                if session.phase == SessionPhase::Submitting
                    && session.simulated_percent < PROGRESS_CAP
                {
                    session.simulated_percent += 1;
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::ResponseReceived { session_id } => match state.session_mut(session_id) {
            Some(session) if session.phase == SessionPhase::Submitting => {
                session.phase = SessionPhase::Receiving;
                session.simulated_percent = 100;
                let ticker_was_running = std::mem::replace(&mut session.ticker_running, false);
                state.mark_dirty();
                if ticker_was_running {
                    vec![Effect::StopProgressTimer { session_id }]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        },
        Msg::UploadSettled { session_id, result } => settle(&mut state, session_id, result),
        Msg::DownloadFailed(reason) => {
            state.show_banner(Banner::error(format!("Error: {reason}")));
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn choose_file(state: &mut AppState, file: Option<SelectedFile>) {
    let Some(file) = file else {
        return;
    };
    match validate_selection(&file) {
        Ok(()) => {
            state.set_file(Some(file));
            state.hide_banner();
        }
        Err(err) => {
            state.set_file(None);
            state.show_banner(Banner::error(err.to_string()));
        }
    }
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    // The submit control is disabled while a session runs.
    if state.is_busy() {
        return Vec::new();
    }
    match prepare_submission(state) {
        Ok((file, level)) => {
            state.hide_banner();
            let session_id = state.start_session(file.clone());
            vec![
                Effect::StartProgressTimer { session_id },
                Effect::Upload {
                    session_id,
                    file,
                    level,
                },
            ]
        }
        Err(err) => {
            state.show_banner(Banner::error(err.to_string()));
            Vec::new()
        }
    }
}

fn prepare_submission(state: &AppState) -> Result<(SelectedFile, String), ValidationError> {
    let file = state.selected_file().cloned().ok_or(ValidationError::NoFile)?;
    let level = state
        .selected_level()
        .map(ToOwned::to_owned)
        .ok_or(ValidationError::NoCompressionLevel)?;
    Ok((file, level))
}

fn settle(
    state: &mut AppState,
    session_id: SessionId,
    result: Result<CompressedArtifact, UploadFailure>,
) -> Vec<Effect> {
    if state.active_session_id() != Some(session_id) {
        return Vec::new();
    }
    let Some(session) = state.finish_session() else {
        return Vec::new();
    };

    let mut effects = Vec::with_capacity(2);
    if session.ticker_running {
        effects.push(Effect::StopProgressTimer { session_id });
    }
    match result {
        Ok(artifact) => {
            effects.push(Effect::SaveDownload {
                file_name: download_name(&session.file.name),
                bytes: artifact.bytes,
            });
            state.show_banner(Banner::success(SUCCESS_MESSAGE));
            state.reset_form();
        }
        Err(failure) => {
            state.show_banner(Banner::error(format!("Error: {failure}")));
        }
    }
    effects
}
