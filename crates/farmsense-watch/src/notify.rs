use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub animal_id: String,
    pub text: String,
    pub shown_at: Instant,
}

/// Holds at most one on-screen notification.
///
/// Showing a new notification replaces the current one; a notification is
/// dismissed once `dismiss_after` has elapsed since it was shown.
#[derive(Debug)]
pub struct NotificationBoard {
    dismiss_after: Duration,
    current: Option<Notification>,
}

impl NotificationBoard {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            dismiss_after,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Shows a notification and returns the one it replaced, if any.
    pub fn show(
        &mut self,
        animal_id: impl Into<String>,
        text: impl Into<String>,
        now: Instant,
    ) -> Option<Notification> {
        self.current.replace(Notification {
            animal_id: animal_id.into(),
            text: text.into(),
            shown_at: now,
        })
    }

    /// Dismisses the current notification if it has been shown long enough.
    pub fn expire(&mut self, now: Instant) -> Option<Notification> {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|n| now.saturating_duration_since(n.shown_at) >= self.dismiss_after);
        if expired {
            self.current.take()
        } else {
            None
        }
    }

    pub fn dismiss(&mut self) -> Option<Notification> {
        self.current.take()
    }
}
