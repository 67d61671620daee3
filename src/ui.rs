use anstyle::{AnsiColor, Style};
use is_terminal::IsTerminal;
use std::fmt::Display;
use std::io::{self, Write};
use std::time::{Duration, Instant};

const LABEL_WIDTH: usize = 12;

/// How a status line is coloured and which stream it goes to
#[derive(Debug, Clone, Copy)]
enum Tone {
    Neutral,
    Done,
    Note,
    Caution,
    Failure,
}

impl Tone {
    fn on_stderr(self) -> bool {
        matches!(self, Tone::Caution | Tone::Failure)
    }

    fn style(self) -> Style {
        let color = match self {
            Tone::Neutral => AnsiColor::Cyan,
            Tone::Done => AnsiColor::Green,
            Tone::Note => AnsiColor::Blue,
            Tone::Caution => AnsiColor::Yellow,
            Tone::Failure => AnsiColor::Red,
        };
        Style::new().bold().fg_color(Some(color.into()))
    }
}

fn colored(stream_is_terminal: bool) -> bool {
    stream_is_terminal && std::env::var_os("NO_COLOR").is_none()
}

/// Right-align `label` in a fixed column and print `message` beside it;
/// continuation lines are indented under the first
fn print_line(tone: Tone, label: &str, message: &str) {
    let (mut out, color): (Box<dyn Write>, bool) = if tone.on_stderr() {
        let stderr = io::stderr();
        let color = colored(stderr.is_terminal());
        (Box::new(stderr.lock()), color)
    } else {
        let stdout = io::stdout();
        let color = colored(stdout.is_terminal());
        (Box::new(stdout.lock()), color)
    };

    let style = if color { tone.style() } else { Style::new() };
    let mut lines = message.lines();
    let first = lines.next().unwrap_or_default();
    let _ = writeln!(
        out,
        "{}{label:>LABEL_WIDTH$}{} {first}",
        style.render(),
        style.render_reset()
    );
    for line in lines {
        let _ = writeln!(out, "{:LABEL_WIDTH$} {line}", "");
    }
    let _ = out.flush();
}

fn elapsed(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

pub fn status(label: &str, message: impl Display) {
    print_line(Tone::Neutral, label, &message.to_string());
}

pub fn success(label: &str, message: impl Display) {
    print_line(Tone::Done, label, &message.to_string());
}

pub fn info(message: impl Display) {
    print_line(Tone::Note, "Info", &message.to_string());
}

pub fn warn(message: impl Display) {
    print_line(Tone::Caution, "Warning", &message.to_string());
}

/// Ask a yes/no question on the terminal; anything but `y`/`yes` is no
pub fn confirm(question: impl Display) -> io::Result<bool> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{question} [y/N] ")?;
    stdout.flush()?;
    drop(stdout);

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

pub fn stdin_is_terminal() -> bool {
    io::stdin().is_terminal()
}

/// A slow step: announced when started, closed with its elapsed time
///
/// `fail` only closes the line; the caller reports the error itself.
pub struct Progress {
    message: String,
    started: Instant,
}

impl Progress {
    pub fn start(label: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        status(label, &message);
        Self {
            message,
            started: Instant::now(),
        }
    }

    pub fn finish(self, label: &str) {
        let took = elapsed(self.started.elapsed());
        success(label, format!("{} in {took}", self.message));
    }

    pub fn fail(self) {
        let took = elapsed(self.started.elapsed());
        print_line(
            Tone::Failure,
            "Failed",
            &format!("{} after {took}", self.message),
        );
    }
}
