//! The "like what you see?" modal: opens once after a delay unless it was
//! dismissed recently.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::MS_PER_DAY;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("write rejected for key {0}")]
    Rejected(String),
}

/// Persistent string storage that outlives the page, i.e. `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutreachConfig {
    pub delay_ms: u64,
    pub email: String,
    pub storage_key: String,
    pub suppress_days: u32,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            delay_ms: 12_000,
            email: String::new(),
            storage_key: "reachout_dismissed_at".to_string(),
            suppress_days: 30,
        }
    }
}

impl OutreachConfig {
    pub fn suppression_window_ms(&self) -> i64 {
        i64::from(self.suppress_days) * MS_PER_DAY
    }

    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutreachDecision {
    /// Dismissed recently; do not schedule at all.
    Suppressed { until_ms: i64 },
    Schedule { delay_ms: u64 },
}

/// Reads the dismissal marker once and decides whether to schedule the modal.
/// A marker that does not parse counts as absent.
pub fn decide(config: &OutreachConfig, store: &impl KeyValueStore, now_ms: i64) -> OutreachDecision {
    let last = store
        .get(&config.storage_key)
        .and_then(|raw| raw.trim().parse::<i64>().ok());
    let window = config.suppression_window_ms();
    // markers come from storage and may hold any i64
    match last {
        Some(last) if now_ms.saturating_sub(last) < window => OutreachDecision::Suppressed {
            until_ms: last.saturating_add(window),
        },
        _ => OutreachDecision::Schedule {
            delay_ms: config.delay_ms,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Backdrop,
    CloseButton,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModalState {
    Unmounted,
    Waiting,
    Suppressed,
    Open,
    Dismissed,
}

#[derive(Debug, Clone)]
pub struct OutreachModal {
    config: OutreachConfig,
    state: ModalState,
}

impl OutreachModal {
    pub fn new(config: OutreachConfig) -> Self {
        Self {
            config,
            state: ModalState::Unmounted,
        }
    }

    pub fn config(&self) -> &OutreachConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.state == ModalState::Open
    }

    pub fn is_waiting(&self) -> bool {
        self.state == ModalState::Waiting
    }

    pub fn mount(&mut self, store: &impl KeyValueStore, now_ms: i64) -> OutreachDecision {
        let decision = decide(&self.config, store, now_ms);
        self.state = match decision {
            OutreachDecision::Suppressed { .. } => ModalState::Suppressed,
            OutreachDecision::Schedule { .. } => ModalState::Waiting,
        };
        decision
    }

    /// The delay elapsed. Opens only if the modal was waiting.
    pub fn fire(&mut self) -> bool {
        if self.state != ModalState::Waiting {
            return false;
        }
        self.state = ModalState::Open;
        true
    }

    /// Closes the modal and stamps the dismissal time. The marker is written
    /// no matter how the modal was closed.
    pub fn dismiss(
        &mut self,
        reason: DismissReason,
        store: &mut impl KeyValueStore,
        now_ms: i64,
    ) -> Result<(), StoreError> {
        if self.state != ModalState::Open {
            return Ok(());
        }
        self.state = ModalState::Dismissed;
        log::debug!("outreach modal dismissed via {reason:?}");
        store.set(&self.config.storage_key, &now_ms.to_string())
    }

    /// Cancels a pending open, e.g. when the page is torn down.
    pub fn teardown(&mut self) {
        if self.state == ModalState::Waiting {
            self.state = ModalState::Unmounted;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000_000;

    fn config(days: u32) -> OutreachConfig {
        OutreachConfig {
            email: "hello@example.com".to_string(),
            suppress_days: days,
            ..OutreachConfig::default()
        }
    }

    fn store_with(value: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.set("reachout_dismissed_at", value).unwrap();
        store
    }

    #[test]
    fn test_schedules_without_marker() {
        assert_eq!(
            decide(&config(30), &MemoryStore::new(), NOW),
            OutreachDecision::Schedule { delay_ms: 12_000 }
        );
    }

    #[test]
    fn test_window_boundary() {
        for days in [1_u32, 7, 30, 365] {
            let cfg = config(days);
            let window = cfg.suppression_window_ms();

            let recent = store_with(&(NOW - window + 1).to_string());
            assert!(matches!(
                decide(&cfg, &recent, NOW),
                OutreachDecision::Suppressed { .. }
            ));

            let expired = store_with(&(NOW - window).to_string());
            assert!(matches!(
                decide(&cfg, &expired, NOW),
                OutreachDecision::Schedule { .. }
            ));
        }
    }

    #[test]
    fn test_zero_day_window_always_schedules() {
        let store = store_with(&NOW.to_string());
        assert_eq!(
            decide(&config(0), &store, NOW),
            OutreachDecision::Schedule { delay_ms: 12_000 }
        );
    }

    #[test]
    fn test_unparseable_marker_is_ignored() {
        let store = store_with("not-a-number");
        assert!(matches!(
            decide(&config(30), &store, NOW),
            OutreachDecision::Schedule { .. }
        ));
    }

    #[test]
    fn test_extreme_markers_do_not_overflow() {
        let ancient = store_with(&i64::MIN.to_string());
        assert!(matches!(
            decide(&config(30), &ancient, NOW),
            OutreachDecision::Schedule { .. }
        ));

        let far_future = store_with(&i64::MAX.to_string());
        assert_eq!(
            decide(&config(30), &far_future, NOW),
            OutreachDecision::Suppressed { until_ms: i64::MAX }
        );
    }

    #[test]
    fn test_suppressed_until() {
        let store = store_with(&(NOW - MS_PER_DAY).to_string());
        assert_eq!(
            decide(&config(2), &store, NOW),
            OutreachDecision::Suppressed {
                until_ms: NOW + MS_PER_DAY
            }
        );
    }

    #[test]
    fn test_lifecycle_persists_on_every_dismissal_path() {
        for reason in [
            DismissReason::Backdrop,
            DismissReason::CloseButton,
            DismissReason::Escape,
        ] {
            let mut store = MemoryStore::new();
            let mut modal = OutreachModal::new(config(30));
            assert!(matches!(
                modal.mount(&store, NOW),
                OutreachDecision::Schedule { .. }
            ));
            assert!(!modal.is_open());
            assert!(modal.fire());
            assert!(modal.is_open());

            modal.dismiss(reason, &mut store, NOW + 5).unwrap();
            assert!(!modal.is_open());
            assert_eq!(store.get("reachout_dismissed_at"), Some((NOW + 5).to_string()));

            // the next page load is suppressed
            let mut again = OutreachModal::new(config(30));
            assert!(matches!(
                again.mount(&store, NOW + 10),
                OutreachDecision::Suppressed { .. }
            ));
            assert!(!again.fire());
        }
    }

    #[test]
    fn test_fire_after_teardown_is_ignored() {
        let mut modal = OutreachModal::new(config(30));
        modal.mount(&MemoryStore::new(), NOW);
        assert!(modal.is_waiting());
        modal.teardown();
        assert!(!modal.fire());
    }

    #[test]
    fn test_dismiss_when_closed_writes_nothing() {
        let mut store = MemoryStore::new();
        let mut modal = OutreachModal::new(config(30));
        modal.mount(&store, NOW);
        modal.dismiss(DismissReason::Backdrop, &mut store, NOW).unwrap();
        assert_eq!(store.get("reachout_dismissed_at"), None);
    }

    struct UnavailableStore;

    impl KeyValueStore for UnavailableStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_dismiss_closes_even_when_storage_fails() {
        let mut store = UnavailableStore;
        let mut modal = OutreachModal::new(config(30));
        assert!(matches!(
            modal.mount(&store, NOW),
            OutreachDecision::Schedule { .. }
        ));
        assert!(modal.fire());
        assert_eq!(
            modal.dismiss(DismissReason::Escape, &mut store, NOW),
            Err(StoreError::Unavailable)
        );
        assert!(!modal.is_open());
        assert!(!modal.fire());
    }

    #[test]
    fn test_mailto() {
        assert_eq!(config(1).mailto(), "mailto:hello@example.com");
    }
}
