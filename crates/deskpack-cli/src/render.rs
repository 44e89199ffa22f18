use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style(force_plain: bool) -> OutputStyle {
    if force_plain
        || std::env::var_os("NO_COLOR").is_some()
        || !std::io::stdout().is_terminal()
    {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

/// Plain style emits the bare message; rich style prefixes an ASCII badge.
/// Badges stay uncolored so scripted output is stable to compare.
pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => {
            let badge = match status {
                "ok" => "[OK]",
                "err" => "[ERR]",
                "warn" => "[WARN]",
                _ => "[..]",
            };
            format!("{badge} {message}")
        }
    }
}

pub(crate) fn render_section_header(style: OutputStyle, title: &str) -> String {
    let line = format!("== {title} ==");
    match style {
        OutputStyle::Plain => line,
        OutputStyle::Rich => colorize(section_style(), &line),
    }
}

/// Spinner shown while a backend call blocks the session. Rich mode only;
/// the caller finishes it (or drops it) once the call returns.
pub(crate) fn backend_spinner(style: OutputStyle, message: &str) -> Option<ProgressBar> {
    if style != OutputStyle::Rich {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg}") {
        spinner.set_style(template.tick_chars("|/-\\ "));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    Some(spinner)
}

pub(crate) fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
