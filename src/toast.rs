use std::time::{Duration, Instant};

pub const TOAST_TTL: Duration = Duration::from_secs(5);
pub const ANALYTICS_TOAST_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    Info,
    Success,
    #[default]
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// Holds at most one toast; a new one replaces the old.
#[derive(Debug, Clone)]
pub struct ToastSlot {
    ttl: Duration,
    current: Option<Toast>,
}

impl Default for ToastSlot {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl ToastSlot {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        self.current = Some(Toast {
            message: message.into(),
            kind,
            expires_at: now + self.ttl,
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drops the toast once it has expired. Returns true if it was dropped.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(toast) if now >= toast.expires_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&Toast> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_ttl() {
        let start = Instant::now();
        let mut slot = ToastSlot::default();
        slot.show("Saved", ToastKind::Success, start);

        assert!(!slot.tick(start + Duration::from_secs(4)));
        assert!(slot.is_visible());
        assert!(slot.tick(start + TOAST_TTL));
        assert!(!slot.is_visible());
    }

    #[test]
    fn close_clears_early_and_new_toast_overwrites() {
        let start = Instant::now();
        let mut slot = ToastSlot::new(ANALYTICS_TOAST_TTL);
        slot.show("first", ToastKind::Info, start);
        slot.show("second", ToastKind::Error, start + Duration::from_secs(3));

        let toast = slot.current().unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.expires_at, start + Duration::from_secs(9));

        slot.dismiss();
        assert!(slot.current().is_none());
    }
}
