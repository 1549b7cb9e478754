use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("no referral link to share yet")]
    NoLink,
    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
    #[error("failed to run share command: {0}")]
    Command(#[from] io::Error),
    #[error("share command exited with {0}")]
    CommandFailed(String),
    #[error("a share is already in progress")]
    InProgress,
}

/// What gets handed to a share target.
#[derive(Debug, Clone, PartialEq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    pub fn referral(url: &str) -> Self {
        Self {
            title: "Join me on the Health Tracker App!".to_string(),
            text: "I'm using this amazing health tracking app. Join me with my referral link!"
                .to_string(),
            url: url.to_string(),
        }
    }

    pub fn message(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.text, self.url)
    }
}

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ShareError>;
}

pub trait ShareTarget {
    /// Starts sharing. Targets that finish later report through
    /// [`ShareTarget::take_outcome`].
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError>;

    /// The result of a share that finished since the last call, if any.
    fn take_outcome(&mut self) -> Option<Result<(), ShareError>> {
        None
    }
}

/// Desktop clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ShareError> {
        let clipboard = match self.inner.as_mut() {
            Some(clipboard) => clipboard,
            None => self.inner.insert(arboard::Clipboard::new()?),
        };
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

/// Pipes the share message into a configured program, e.g. a mail client
/// or a desktop notification helper. The program runs on its own thread so
/// the UI keeps drawing while it works.
pub struct CommandShareTarget {
    program: String,
    args: Vec<String>,
    pending: Option<JoinHandle<io::Result<ExitStatus>>>,
}

impl CommandShareTarget {
    /// Returns `None` for an empty command line.
    pub fn from_command_line(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            pending: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

fn run_share_command(program: &str, args: &[String], message: &str) -> io::Result<ExitStatus> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // stdin is dropped before the wait so the program sees EOF.
    let written = match child.stdin.take() {
        Some(mut stdin) => match stdin.write_all(message.as_bytes()) {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(e),
            _ => Ok(()),
        },
        None => Ok(()),
    };

    // Reap the child even when the write failed.
    let status = child.wait();
    written?;
    status
}

impl ShareTarget for CommandShareTarget {
    fn share(&mut self, payload: &SharePayload) -> Result<(), ShareError> {
        if self.is_running() {
            return Err(ShareError::InProgress);
        }
        if let Some(Err(e)) = self.take_outcome() {
            tracing::warn!(error = %e, "previous share failed");
        }

        let program = self.program.clone();
        let args = self.args.clone();
        let message = payload.message();
        let handle = thread::Builder::new()
            .name("health-tracker::share".to_string())
            .spawn(move || run_share_command(&program, &args, &message))?;
        self.pending = Some(handle);
        Ok(())
    }

    fn take_outcome(&mut self) -> Option<Result<(), ShareError>> {
        if self.is_running() {
            return None;
        }
        let handle = self.pending.take()?;
        Some(match handle.join() {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(ShareError::CommandFailed(status.to_string())),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(ShareError::CommandFailed("share thread panicked".to_string())),
        })
    }
}
