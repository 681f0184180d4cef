//! Keeps slow responses from overwriting newer ones.
//!
//! Every fetch is issued for a selection key (a date, or a user and a
//! date). A result is only kept when its key is still the one the operator
//! last selected.

use tokio::sync::Mutex;

/// What became of a fetched value once it was handed back.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<K, V> {
    /// Still the operator's choice; the value was kept.
    Fresh(V),
    /// Superseded, and the newer selection already has a value.
    Newer(K, V),
    /// Superseded, and the newer selection is still loading.
    Pending(K),
}

struct Slot<K, V> {
    selected: Option<K>,
    committed: Option<(K, V)>,
}

pub struct KeyedView<K, V> {
    slot: Mutex<Slot<K, V>>,
}

impl<K, V> Default for KeyedView<K, V> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(Slot {
                selected: None,
                committed: None,
            }),
        }
    }
}

impl<K, V> KeyedView<K, V>
where
    K: Clone + PartialEq,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key` as the operator's latest choice.
    pub async fn select(&self, key: K) {
        self.slot.lock().await.selected = Some(key);
    }

    pub async fn selected(&self) -> Option<K> {
        self.slot.lock().await.selected.clone()
    }

    /// Stores `value` if `key` is still selected. Returns `false` when the
    /// result is stale and was dropped.
    pub async fn commit(&self, key: &K, value: V) -> bool {
        let mut slot = self.slot.lock().await;
        if slot.selected.as_ref() != Some(key) {
            return false;
        }
        slot.committed = Some((key.clone(), value));
        true
    }

    /// The committed value, provided it belongs to the current selection.
    pub async fn current(&self) -> Option<(K, V)> {
        let slot = self.slot.lock().await;
        match (&slot.selected, &slot.committed) {
            (Some(selected), Some((key, value))) if selected == key => {
                Some((key.clone(), value.clone()))
            }
            _ => None,
        }
    }

    /// Commits `value` for `key`, or falls back to whatever the newest
    /// selection has.
    pub async fn settle(&self, key: K, value: V) -> Settled<K, V> {
        if self.commit(&key, value.clone()).await {
            return Settled::Fresh(value);
        }
        match self.current().await {
            Some((newer, value)) => Settled::Newer(newer, value),
            None => Settled::Pending(self.selected().await.unwrap_or(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn commit_for_selected_key_is_kept() {
        let view = KeyedView::new();
        view.select("2026-01-05").await;
        assert!(view.commit(&"2026-01-05", 3).await);
        assert_eq!(view.current().await, Some(("2026-01-05", 3)));
    }

    #[tokio::test]
    async fn late_response_for_old_key_is_dropped() {
        let view = KeyedView::new();
        view.select((1, "2026-01-05")).await;
        view.select((1, "2026-01-06")).await;

        assert!(!view.commit(&(1, "2026-01-05"), "old").await);
        assert_eq!(view.current().await, None);

        assert!(view.commit(&(1, "2026-01-06"), "new").await);
        assert!(!view.commit(&(1, "2026-01-05"), "old").await);
        assert_eq!(view.current().await, Some(((1, "2026-01-06"), "new")));
    }

    #[tokio::test]
    async fn reselecting_hides_previous_value() {
        let view = KeyedView::new();
        view.select(7).await;
        assert!(view.commit(&7, "seven").await);
        view.select(8).await;
        assert_eq!(view.current().await, None);
        assert_eq!(view.selected().await, Some(8));
    }

    #[tokio::test]
    async fn settle_serves_newest_selection() {
        let view = KeyedView::new();
        view.select(1).await;
        assert_eq!(view.settle(1, "one").await, Settled::Fresh("one"));

        view.select(2).await;
        assert_eq!(view.settle(1, "stale").await, Settled::Pending(2));

        assert_eq!(view.settle(2, "two").await, Settled::Fresh("two"));
        assert_eq!(view.settle(1, "stale").await, Settled::Newer(2, "two"));
        assert_eq!(view.current().await, Some((2, "two")));
    }

    #[tokio::test]
    async fn nothing_selected_rejects_commits() {
        let view: KeyedView<u32, u32> = KeyedView::new();
        assert!(!view.commit(&1, 1).await);
    }
}
