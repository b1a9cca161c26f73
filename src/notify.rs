//! Operator notices (the terminal counterpart of toasts). Every notice is also
//! logged through `tracing` so it shows up in structured logs.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tracing::{info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

impl NoticeLevel {
    /// How long a notice stays on screen.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::Success => Duration::from_secs(3),
            Self::Error => Duration::from_secs(5),
            Self::Info => Duration::from_secs(4),
        }
    }

    const fn marker(self) -> &'static str {
        match self {
            Self::Success => "✔",
            Self::Error => "✖",
            Self::Info => "ℹ",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl fmt::Display for Notice {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.level.marker(), self.message)
    }
}

/// Shared notice queue. Cloning yields another handle to the same queue.
#[derive(Clone, Debug, Default)]
pub struct Notifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    fn push(&self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Error => warn!(notice = %message),
            NoticeLevel::Success | NoticeLevel::Info => info!(notice = %message),
        }

        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Notice {
                level,
                message,
                duration: level.duration(),
            });
    }

    /// Removes and returns every queued notice in arrival order.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
