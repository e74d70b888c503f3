use crate::RecorderStatus;

/// Severity of a user notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// The action was refused or degraded.
    Warning,
    /// The action failed.
    Error,
}

/// Message shown in the notice window until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity, used for the window title.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub text: String,
}

impl Notice {
    /// Confirmation notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    /// Refusal or downgrade notice.
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    /// Failure notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    /// Window title for this notice.
    pub fn title(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "Info",
            NoticeLevel::Warning => "Warning",
            NoticeLevel::Error => "Error",
        }
    }
}

/// Updates sent from the controller to the control panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// New status label.
    Status(RecorderStatus),
    /// Message to show.
    Notice(Notice),
}

/// Wakes the UI thread after an event was queued.
pub trait Repaint: Send + 'static {
    /// Schedule a redraw of the control panel.
    fn request_repaint(&self);
}

impl Repaint for eframe::egui::Context {
    fn request_repaint(&self) {
        eframe::egui::Context::request_repaint(self);
    }
}
