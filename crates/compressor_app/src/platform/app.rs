use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use compressor_core::{
    update, AppState, Banner, BannerKind, FailureKind, Msg, UploadFailure,
};
use compressor_engine::{AtomicFileWriter, EngineHandle};
use compressor_logging::{compressor_error, compressor_info, compressor_warn};

use super::config::{load_config, save_config};
use super::effects::EffectRunner;
use super::selection::select_file;
use super::ui::constants::SUBMIT_LABEL_IDLE;
use super::ui::render::{render_options, Console};
use crate::cli::Args;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Slack on top of the HTTP timeout before the engine is considered stuck.
const ENGINE_GRACE: Duration = Duration::from_secs(30);
const NO_RESPONSE_MESSAGE: &str = "Sin respuesta del servidor";

pub fn run_app(args: Args) -> anyhow::Result<ExitCode> {
    let mut config = load_config(&args.config);
    config.apply_args(&args);
    if args.write_config {
        let path = save_config(&args.config, &config)?;
        compressor_info!("Wrote config to {:?}", path);
    }

    let settings = config.upload_settings();
    let plan = RunPlan {
        files: args.files.clone(),
        level: config.default_level.clone(),
        list_levels: args.list_levels,
        deadline: settings.connect_timeout + settings.request_timeout + ENGINE_GRACE,
    };
    let server_url = settings.server_url.clone();
    let engine = EngineHandle::new(settings).context("failed to start the upload engine")?;
    let runner = EffectRunner::new(engine, AtomicFileWriter::new(config.output_dir.clone()));

    let mut app = App::new(runner, Console::new(io::stdout()));
    let banner = app
        .run(&plan)
        .with_context(|| format!("compression via {server_url} failed"))?;

    Ok(match banner {
        None if plan.list_levels => ExitCode::SUCCESS,
        Some(Banner {
            kind: BannerKind::Success,
            ..
        }) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

pub(crate) struct RunPlan {
    pub files: Vec<PathBuf>,
    pub level: Option<String>,
    pub list_levels: bool,
    /// Longest wait for the form page or for one upload to settle.
    pub deadline: Duration,
}

pub(crate) struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    console: Console<W>,
}

impl<W: Write> App<W> {
    pub fn new(runner: EffectRunner, console: Console<W>) -> Self {
        Self {
            state: AppState::new(),
            runner,
            console,
        }
    }

    /// Drives one form interaction; returns the banner left on screen.
    pub fn run(&mut self, plan: &RunPlan) -> anyhow::Result<Option<Banner>> {
        let options = self.runner.load_form(plan.deadline)?;
        if options.is_empty() {
            compressor_warn!("The form offers no compression levels");
        }
        self.dispatch(Msg::OptionsLoaded(options))?;

        if plan.list_levels {
            for line in render_options(self.state.options()) {
                self.console.print(&line)?;
            }
            return Ok(None);
        }

        if let Some(level) = &plan.level {
            if !self.state.options().iter().any(|option| &option.value == level) {
                let available: Vec<_> = self
                    .state
                    .options()
                    .iter()
                    .map(|option| option.value.as_str())
                    .collect();
                bail!(
                    "unknown compression level {level:?}; available: {}",
                    available.join(", ")
                );
            }
            self.dispatch(Msg::CompressionChosen(level.clone()))?;
        }

        self.choose_files(&plan.files)?;
        if !plan.files.is_empty() && self.state.selected_file().is_none() {
            // The rejection banner is already on screen; submitting would hide it.
            let banner = self.state.view().banner;
            if banner.is_none() {
                bail!("none of the given paths could be read");
            }
            return Ok(banner);
        }

        self.console.print(&format!("> {SUBMIT_LABEL_IDLE}"))?;
        self.dispatch(Msg::SubmitClicked)?;
        self.wait_for_session(plan.deadline)?;

        if let Some(path) = self.runner.saved_downloads().last() {
            self.console.print(&path.display().to_string())?;
        }
        Ok(self.state.view().banner)
    }

    fn choose_files(&mut self, paths: &[PathBuf]) -> anyhow::Result<()> {
        match paths {
            [] => Ok(()),
            [path] => {
                let file = select_file(path)?;
                self.dispatch(Msg::FileChosen(Some(file)))
            }
            paths => {
                // Several paths arrive the way a multi-file drop does.
                let files = paths
                    .iter()
                    .filter_map(|path| match select_file(path) {
                        Ok(file) => Some(file),
                        Err(err) => {
                            compressor_warn!("Skipping dropped path: {:#}", err);
                            None
                        }
                    })
                    .collect();
                self.dispatch(Msg::DragEntered)?;
                self.dispatch(Msg::FilesDropped(files))
            }
        }
    }

    fn wait_for_session(&mut self, deadline: Duration) -> anyhow::Result<()> {
        let started = Instant::now();
        while let Some(session_id) = self.state.active_session_id() {
            if started.elapsed() > deadline {
                compressor_error!("Session {} got no result within {:?}", session_id, deadline);
                self.dispatch(Msg::UploadSettled {
                    session_id,
                    result: Err(UploadFailure::new(
                        FailureKind::Timeout,
                        NO_RESPONSE_MESSAGE,
                    )),
                })?;
                break;
            }
            if let Some(msg) = self.runner.next_msg(POLL_INTERVAL) {
                self.dispatch(msg)?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            let was_dirty = state.consume_dirty();
            let view = state.view();
            self.state = state;

            if was_dirty {
                self.console.show(&view).context("failed to write to the terminal")?;
            }
            inbox.extend(self.runner.run(effects));
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_console(self) -> Console<W> {
        self.console
    }
}
