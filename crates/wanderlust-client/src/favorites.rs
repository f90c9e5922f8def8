use wanderlust_core::ListingId;

use crate::notify::Notification;

const ADDED: &str = "Added to favorites!";
const REMOVED: &str = "Removed from favorites!";

/// The user's favorited listings, in the order they were added.
///
/// Persisted as a JSON array of ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: Vec<ListingId>,
}

impl Favorites {
    /// Loads a persisted list. Malformed input yields an empty set.
    #[must_use]
    pub fn load_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<ListingId>>(raw) {
            Ok(mut ids) => {
                let mut seen = std::collections::HashSet::new();
                ids.retain(|id| seen.insert(*id));
                Self { ids }
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed favorites");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_string())
    }

    #[must_use]
    pub fn contains(&self, id: ListingId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn ids(&self) -> &[ListingId] {
        &self.ids
    }

    /// Adds `id`. Already-present ids are left alone and produce no
    /// notification.
    pub fn add(&mut self, id: ListingId) -> Option<Notification> {
        if self.contains(id) {
            return None;
        }
        self.ids.push(id);
        Some(Notification::success(ADDED))
    }

    /// Removes `id` if present. Always reports the removal.
    pub fn remove(&mut self, id: ListingId) -> Notification {
        self.ids.retain(|existing| *existing != id);
        Notification::info(REMOVED)
    }

    /// Flips membership of `id`. Returns the new state and the notification
    /// to show.
    pub fn toggle(&mut self, id: ListingId) -> (bool, Notification) {
        if self.contains(id) {
            (false, self.remove(id))
        } else {
            self.ids.push(id);
            (true, Notification::success(ADDED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLevel;

    #[test]
    fn toggle_adds_then_removes() {
        let mut favorites = Favorites::default();
        let id = ListingId::new_v4();

        let (on, added) = favorites.toggle(id);
        assert!(on);
        assert_eq!(added.level, NotificationLevel::Success);
        assert_eq!(added.message, "Added to favorites!");
        assert!(favorites.contains(id));

        let (on, removed) = favorites.toggle(id);
        assert!(!on);
        assert_eq!(removed.level, NotificationLevel::Info);
        assert_eq!(removed.message, "Removed from favorites!");
        assert!(!favorites.contains(id));
    }

    #[test]
    fn add_is_silent_when_present() {
        let mut favorites = Favorites::default();
        let id = ListingId::new_v4();
        assert!(favorites.add(id).is_some());
        assert!(favorites.add(id).is_none());
        assert_eq!(favorites.ids(), &[id]);
    }

    #[test]
    fn json_keeps_insertion_order() {
        let mut favorites = Favorites::default();
        let first = ListingId::new_v4();
        let second = ListingId::new_v4();
        favorites.add(first);
        favorites.add(second);

        let restored = Favorites::load_json(&favorites.to_json());
        assert_eq!(restored.ids(), &[first, second]);
    }

    #[test]
    fn malformed_json_loads_empty() {
        assert_eq!(Favorites::load_json("{not json"), Favorites::default());
        assert_eq!(Favorites::load_json("[\"not-a-uuid\"]"), Favorites::default());
    }

    #[test]
    fn duplicate_persisted_ids_collapse() {
        let id = ListingId::new_v4();
        let raw = format!("[\"{id}\",\"{id}\"]");
        assert_eq!(Favorites::load_json(&raw).ids(), &[id]);
    }
}
