use std::io::{self, Write};

use compressor_core::{BannerKind, CompressionOption, FormViewModel, SessionPhase};

use super::constants::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleLine {
    /// Redrawn in place; used for the progress bar.
    Overwrite(String),
    Line(String),
}

/// Lines describing what changed between two views.
pub fn render(previous: &FormViewModel, view: &FormViewModel) -> Vec<ConsoleLine> {
    let mut lines = Vec::new();

    if view.drop_highlight && !previous.drop_highlight {
        lines.push(ConsoleLine::Line(DROP_HINT.to_string()));
    }

    if view.file_name != previous.file_name {
        if let Some(name) = &view.file_name {
            lines.push(ConsoleLine::Line(format!("{FILE_LABEL}: {name}")));
        }
    }

    if view.selected_level != previous.selected_level {
        if let Some(value) = &view.selected_level {
            let label = option_label(&view.options, value);
            lines.push(ConsoleLine::Line(format!("{LEVEL_LABEL}: {label}")));
        }
    }

    if view.phase != SessionPhase::Idle && previous.phase == SessionPhase::Idle {
        lines.push(ConsoleLine::Line(SUBMIT_LABEL_BUSY.to_string()));
    }

    if view.progress_visible
        && (!previous.progress_visible || view.progress_percent != previous.progress_percent)
    {
        lines.push(ConsoleLine::Overwrite(progress_bar(view.progress_percent)));
    }

    if view.banner != previous.banner {
        if let Some(banner) = &view.banner {
            let prefix = match banner.kind {
                BannerKind::Success => SUCCESS_PREFIX,
                BannerKind::Error => ERROR_PREFIX,
            };
            lines.push(ConsoleLine::Line(format!("{prefix} {}", banner.text)));
        }
    }

    lines
}

/// One line per option, the form's default marked with `*`.
pub fn render_options(options: &[CompressionOption]) -> Vec<String> {
    options
        .iter()
        .map(|option| {
            let marker = if option.default_checked { "*" } else { " " };
            if option.label == option.value {
                format!("{marker} {}", option.value)
            } else {
                format!("{marker} {} ({})", option.value, option.label)
            }
        })
        .collect()
}

pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        " ".repeat(PROGRESS_WIDTH - filled),
        percent
    )
}

fn option_label<'a>(options: &'a [CompressionOption], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|option| option.value == value)
        .map_or(value, |option| option.label.as_str())
}

/// Terminal sink for rendered views.
pub struct Console<W: Write> {
    out: W,
    last: FormViewModel,
    overwrite_pending: bool,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: FormViewModel::default(),
            overwrite_pending: false,
        }
    }

    pub fn show(&mut self, view: &FormViewModel) -> io::Result<()> {
        for line in render(&self.last, view) {
            self.write(line)?;
        }
        // A finished session leaves the bar on screen; close its line.
        if !view.progress_visible && self.overwrite_pending {
            writeln!(self.out)?;
            self.overwrite_pending = false;
        }
        self.last = view.clone();
        self.out.flush()
    }

    pub fn print(&mut self, text: &str) -> io::Result<()> {
        self.write(ConsoleLine::Line(text.to_string()))?;
        self.out.flush()
    }

    fn write(&mut self, line: ConsoleLine) -> io::Result<()> {
        match line {
            ConsoleLine::Overwrite(text) => {
                write!(self.out, "\r{text}")?;
                self.overwrite_pending = true;
            }
            ConsoleLine::Line(text) => {
                if self.overwrite_pending {
                    writeln!(self.out)?;
                    self.overwrite_pending = false;
                }
                writeln!(self.out, "{text}")?;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
