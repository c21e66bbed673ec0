//! Rotating announcement banner.
//!
//! [`BannerState`] holds the pure state machine. [`Banner`] wraps it with a
//! background task that advances the carousel every [`ROTATION_PERIOD`] while
//! more than one announcement is showing.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use uuid::Uuid;

use crate::domain::Announcement;

pub const ROTATION_PERIOD: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub struct BannerState {
    announcements: Vec<Announcement>,
    dismissed: HashSet<Uuid>,
    index: usize,
    visible: bool,
}

impl BannerState {
    pub fn new(announcements: Vec<Announcement>) -> Self {
        let mut state = Self::default();
        state.set_announcements(announcements);
        state
    }

    /// Restores dismissals carried over from an earlier view.
    pub fn with_dismissed(mut self, ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.dismissed.extend(ids);
        self
    }

    pub fn dismissed(&self) -> impl Iterator<Item = &Uuid> {
        self.dismissed.iter()
    }

    /// Replaces the fetched list. Dismissals are kept for the session.
    pub fn set_announcements(&mut self, announcements: Vec<Announcement>) {
        self.announcements = announcements;
        if !self.visible && self.active_len() > 0 {
            self.visible = true;
        }
    }

    /// Fetched announcements minus the dismissed ones, in fetched order.
    pub fn active(&self) -> Vec<&Announcement> {
        self.announcements
            .iter()
            .filter(|a| !self.dismissed.contains(&a.id))
            .collect()
    }

    pub fn active_len(&self) -> usize {
        self.active().len()
    }

    pub fn is_visible(&self) -> bool {
        self.visible && self.active_len() > 0
    }

    /// Position of the shown announcement within the active set.
    pub fn position(&self) -> usize {
        match self.active_len() {
            0 => 0,
            len => self.index % len,
        }
    }

    pub fn current(&self) -> Option<&Announcement> {
        let active = self.active();
        if active.is_empty() {
            return None;
        }
        Some(active[self.index % active.len()])
    }

    pub fn should_rotate(&self) -> bool {
        self.active_len() > 1
    }

    pub fn next(&mut self) {
        let len = self.active_len();
        if len > 0 {
            self.index = (self.index + 1) % len;
        }
    }

    pub fn prev(&mut self) {
        let len = self.active_len();
        if len > 0 {
            self.index = (self.index + len - 1) % len;
        }
    }

    /// Jumps to a position in the active set; out-of-range positions are ignored.
    pub fn select(&mut self, position: usize) -> bool {
        if position < self.active_len() {
            self.index = position;
            true
        } else {
            false
        }
    }

    /// Hides the current announcement for the rest of the session.
    pub fn dismiss(&mut self) -> Option<Uuid> {
        let len = self.active_len();
        let id = self.current()?.id;
        self.dismissed.insert(id);
        if self.index >= len - 1 {
            self.index = 0;
        }
        Some(id)
    }
}

/// A [`BannerState`] driven by a rotation timer.
///
/// Must be created inside a Tokio runtime. Every change, user driven or
/// timed, bumps the value published on [`Banner::subscribe`].
pub struct Banner {
    state: Arc<Mutex<BannerState>>,
    changes: watch::Sender<u64>,
    ticker: Option<JoinHandle<()>>,
    ticking_for: usize,
}

impl Banner {
    pub fn new(announcements: Vec<Announcement>) -> Self {
        let (changes, _) = watch::channel(0);
        let mut banner = Self {
            state: Arc::new(Mutex::new(BannerState::new(announcements))),
            changes,
            ticker: None,
            ticking_for: 0,
        };
        banner.reschedule();
        banner
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub fn snapshot(&self) -> BannerState {
        self.lock().clone()
    }

    pub fn current(&self) -> Option<Announcement> {
        self.lock().current().cloned()
    }

    pub fn position(&self) -> usize {
        self.lock().position()
    }

    pub fn is_rotating(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn set_announcements(&mut self, announcements: Vec<Announcement>) {
        self.update(|state| state.set_announcements(announcements));
    }

    pub fn next(&mut self) {
        self.update(BannerState::next);
    }

    pub fn prev(&mut self) {
        self.update(BannerState::prev);
    }

    pub fn select(&mut self, position: usize) -> bool {
        self.update(|state| state.select(position))
    }

    pub fn dismiss(&mut self) -> Option<Uuid> {
        self.update(BannerState::dismiss)
    }

    fn lock(&self) -> MutexGuard<'_, BannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<T>(&mut self, f: impl FnOnce(&mut BannerState) -> T) -> T {
        let out = f(&mut self.lock());
        self.changes.send_modify(|version| *version += 1);
        self.reschedule();
        out
    }

    /// Restarts the timer whenever the size of the active set changes.
    fn reschedule(&mut self) {
        let len = self.lock().active_len();
        if len == self.ticking_for {
            return;
        }
        self.ticking_for = len;

        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if len <= 1 {
            return;
        }

        let state = Arc::clone(&self.state);
        let changes = self.changes.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + ROTATION_PERIOD, ROTATION_PERIOD);
            loop {
                ticker.tick().await;
                state.lock().unwrap_or_else(PoisonError::into_inner).next();
                changes.send_modify(|version| *version += 1);
            }
        }));
        tracing::debug!("Banner rotating across {} announcements", len);
    }
}

impl Drop for Banner {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnnouncementKind;
    use chrono::Utc;

    fn announcement(title: &str) -> Announcement {
        let now = Utc::now();
        Announcement {
            id: Uuid::new_v4(),
            title: title.to_string(),
            message: format!("{title} message"),
            kind: AnnouncementKind::Info,
            link_url: None,
            link_text: None,
            is_active: true,
            starts_at: now,
            ends_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn titles(n: usize) -> Vec<Announcement> {
        (0..n).map(|i| announcement(&format!("A{i}"))).collect()
    }

    fn current_title(state: &BannerState) -> Option<&str> {
        state.current().map(|a| a.title.as_str())
    }

    #[test]
    fn test_next_prev_wrap() {
        let mut state = BannerState::new(titles(3));
        assert_eq!(current_title(&state), Some("A0"));
        state.prev();
        assert_eq!(current_title(&state), Some("A2"));
        state.next();
        state.next();
        assert_eq!(current_title(&state), Some("A1"));
    }

    #[test]
    fn test_dismiss_current_shows_next() {
        let mut state = BannerState::new(titles(3));
        state.next();
        state.dismiss();
        assert_eq!(state.active_len(), 2);
        assert_eq!(current_title(&state), Some("A2"));

        // Dismissing at the end wraps to the first
        state.dismiss();
        assert_eq!(current_title(&state), Some("A0"));
        state.dismiss();
        assert!(!state.is_visible());
        assert!(state.current().is_none());
    }

    #[test]
    fn test_dismissals_survive_refetch() {
        let list = titles(2);
        let mut state = BannerState::new(list.clone());
        let gone = state.dismiss();
        state.set_announcements(list);
        assert_eq!(state.active_len(), 1);
        assert_ne!(state.current().map(|a| a.id), gone);
    }

    #[test]
    fn test_visible_once_something_arrives() {
        let mut state = BannerState::new(vec![]);
        assert!(!state.is_visible());
        state.set_announcements(titles(1));
        assert!(state.is_visible());
        assert!(!state.should_rotate());
    }

    #[test]
    fn test_select_ignores_out_of_range() {
        let mut state = BannerState::new(titles(2));
        assert!(state.select(1));
        assert!(!state.select(2));
        assert_eq!(state.position(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_advances_with_time() {
        let banner = Banner::new(titles(3));
        assert!(banner.is_rotating());

        tokio::time::sleep(ROTATION_PERIOD * 2 + Duration::from_millis(100)).await;
        assert_eq!(banner.position(), 2);

        tokio::time::sleep(ROTATION_PERIOD).await;
        assert_eq!(banner.position(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_announcement_never_rotates() {
        let mut banner = Banner::new(titles(2));
        banner.dismiss();
        assert!(!banner.is_rotating());

        tokio::time::sleep(ROTATION_PERIOD * 3).await;
        assert_eq!(banner.position(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_navigation_does_not_reset_timer() {
        let mut banner = Banner::new(titles(3));
        tokio::time::sleep(Duration::from_secs(3)).await;
        banner.next();
        assert_eq!(banner.position(), 1);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(banner.position(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismissed_item_never_returns_while_rotating() {
        let mut banner = Banner::new(titles(3));
        let gone = banner.dismiss();
        assert!(gone.is_some());
        assert!(banner.is_rotating());

        let mut seen = std::collections::HashSet::new();
        tokio::time::sleep(Duration::from_millis(100)).await;
        for _ in 0..6 {
            let current = banner.current().map(|a| a.id);
            assert!(current.is_some());
            assert_ne!(current, gone);
            seen.extend(current);
            tokio::time::sleep(ROTATION_PERIOD).await;
        }
        assert_eq!(seen.len(), 2);
        assert!(banner.snapshot().dismissed().any(|id| Some(*id) == gone));
    }
}
