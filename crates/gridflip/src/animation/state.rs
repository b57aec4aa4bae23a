//! Position cache: item identity, last observed geometry and motion state.
//!
//! The cache is the single source of truth for where an item was last seen.
//! Entries are created on first sight and live as long as the engine, even
//! after the element leaves the container.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::element::Element;
use crate::geometry::{Rect, container_relative};
use crate::sync::CancelHandle;

// ============================================================================
// Identity
// ============================================================================

/// Opaque identity token assigned to an element on first observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generates a fresh identity.
    #[must_use]
    pub fn new() -> Self { Self(Uuid::now_v7()) }
}

impl Default for ItemId {
    fn default() -> Self { Self::new() }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ============================================================================
// Motion
// ============================================================================

/// Animation state of one item.
///
/// At most one motion can be active per item: starting a new one requires
/// replacing the previous value, and [`PositionCache::cancel_and_clear`]
/// cancels whatever handle it held.
#[derive(Debug, Clone, Default)]
pub enum Motion {
    /// Not animating.
    #[default]
    Idle,
    /// A tween is in flight.
    Animating(CancelHandle),
    /// A staggered start is waiting for its timer.
    PendingStart(CancelHandle),
}

impl Motion {
    /// Returns whether the item is animating or about to.
    #[must_use]
    pub const fn is_active(&self) -> bool { !matches!(self, Self::Idle) }

    /// The cancellation handle, if any.
    #[must_use]
    pub const fn handle(&self) -> Option<&CancelHandle> {
        match self {
            Self::Idle => None,
            Self::Animating(handle) | Self::PendingStart(handle) => Some(handle),
        }
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Cached state for one tracked item.
#[derive(Debug, Clone, Default)]
pub struct PositionEntry {
    /// Last observed geometry, relative to the container.
    pub rect: Rect,
    /// Container geometry at the time of that observation.
    pub container_rect: Rect,
    /// Current animation state.
    pub motion: Motion,
}

/// Identity map and position data for one container's items.
#[derive(Debug)]
pub struct PositionCache<E: Element> {
    ids: HashMap<E, ItemId>,
    entries: HashMap<ItemId, PositionEntry>,
}

impl<E: Element> Default for PositionCache<E> {
    fn default() -> Self { Self { ids: HashMap::new(), entries: HashMap::new() } }
}

impl<E: Element> PositionCache<E> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the identity of `element`, assigning one (with an empty
    /// entry) on first sight.
    pub fn identify(&mut self, element: &E) -> ItemId {
        if let Some(id) = self.ids.get(element) {
            return *id;
        }

        let id = ItemId::new();
        self.ids.insert(element.clone(), id);
        self.entries.insert(id, PositionEntry::default());
        id
    }

    /// Identity of `element` if it was seen before.
    #[must_use]
    pub fn id_of(&self, element: &E) -> Option<ItemId> { self.ids.get(element).copied() }

    /// Returns the entry for `id`.
    #[must_use]
    pub fn lookup(&self, id: ItemId) -> Option<&PositionEntry> { self.entries.get(&id) }

    /// Returns the entry for `element` if it was seen before.
    #[must_use]
    pub fn entry_for(&self, element: &E) -> Option<&PositionEntry> {
        self.id_of(element).and_then(|id| self.lookup(id))
    }

    /// Number of items ever observed.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Returns whether no item was observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Measures `elements` against `container_rect` and overwrites their
    /// cached geometry. Elements without a layout box are skipped.
    pub fn record<'a, I>(&mut self, elements: I, container_rect: Rect)
    where
        I: IntoIterator<Item = &'a E>,
        E: 'a,
    {
        for element in elements {
            let Some(rect) = element.bounding_rect() else {
                continue;
            };
            let id = self.identify(element);
            self.store(id, container_relative(container_rect, rect), container_rect);
        }
    }

    /// Overwrites the cached geometry of an identified item.
    pub fn store(&mut self, id: ItemId, rect: Rect, container_rect: Rect) {
        let entry = self.entries.entry(id).or_default();
        entry.rect = rect;
        entry.container_rect = container_rect;
    }

    /// Replaces the motion of `id`, returning the previous one.
    ///
    /// The previous motion is not cancelled.
    pub fn set_motion(&mut self, id: ItemId, motion: Motion) -> Motion {
        self.entries.get_mut(&id).map_or(Motion::Idle, |entry| std::mem::replace(&mut entry.motion, motion))
    }

    /// Sets `id` back to [`Motion::Idle`] if its current motion is the one
    /// controlled by `handle`.
    ///
    /// Used on natural completion, so a late completion never clears a
    /// newer motion.
    pub fn finish_motion(&mut self, id: ItemId, handle: &CancelHandle) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        if entry.motion.handle().is_some_and(|current| current.same_as(handle)) {
            entry.motion = Motion::Idle;
            true
        } else {
            false
        }
    }

    /// Cancels any motion of `id` and resets it to idle.
    ///
    /// Returns whether the item was animating (or waiting to).
    pub fn cancel_and_clear(&mut self, id: ItemId) -> bool {
        let previous = self.set_motion(id, Motion::Idle);
        match previous.handle() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessElement;

    fn container() -> Rect { Rect::new(100.0, 100.0, 500.0, 500.0) }

    #[test]
    fn test_identify_is_stable() {
        let mut cache = PositionCache::new();
        let el = HeadlessElement::new("a", Rect::zero());

        let first = cache.identify(&el);
        let second = cache.identify(&el.clone());
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_elements_get_distinct_ids() {
        let mut cache = PositionCache::new();
        let a = cache.identify(&HeadlessElement::new("a", Rect::zero()));
        let b = cache.identify(&HeadlessElement::new("b", Rect::zero()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_stores_container_relative_rect() {
        let mut cache = PositionCache::new();
        let el = HeadlessElement::new("a", Rect::new(150.0, 120.0, 40.0, 40.0));
        cache.record([&el], container());

        let entry = cache.entry_for(&el).unwrap();
        assert_eq!(entry.rect, Rect::new(50.0, 20.0, 40.0, 40.0));
        assert_eq!(entry.container_rect, container());
        assert!(!entry.motion.is_active());
    }

    #[test]
    fn test_record_skips_unmeasurable_nodes() {
        let mut cache = PositionCache::new();
        let text = HeadlessElement::unmeasurable("text");
        cache.record([&text], container());
        assert!(cache.is_empty());
        assert_eq!(cache.id_of(&text), None);
    }

    #[test]
    fn test_record_overwrites() {
        let mut cache = PositionCache::new();
        let el = HeadlessElement::new("a", Rect::new(100.0, 100.0, 10.0, 10.0));
        cache.record([&el], container());
        el.set_layout(Rect::new(300.0, 100.0, 10.0, 10.0));
        cache.record([&el], container());
        assert_eq!(cache.entry_for(&el).unwrap().rect.x, 200.0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cancel_and_clear() {
        let mut cache = PositionCache::new();
        let id = cache.identify(&HeadlessElement::new("a", Rect::zero()));
        assert!(!cache.cancel_and_clear(id));

        let handle = CancelHandle::new();
        cache.set_motion(id, Motion::Animating(handle.clone()));
        assert!(cache.cancel_and_clear(id));
        assert!(handle.is_cancelled());
        assert_eq!(handle.cancel_count(), 1);
        assert!(!cache.lookup(id).unwrap().motion.is_active());

        // second call finds nothing to cancel
        assert!(!cache.cancel_and_clear(id));
        assert_eq!(handle.cancel_count(), 1);
    }

    #[test]
    fn test_cancel_pending_start() {
        let mut cache = PositionCache::new();
        let id = cache.identify(&HeadlessElement::new("a", Rect::zero()));
        let timer = CancelHandle::new();
        cache.set_motion(id, Motion::PendingStart(timer.clone()));
        assert!(cache.cancel_and_clear(id));
        assert!(timer.is_cancelled());
    }

    #[test]
    fn test_finish_motion_ignores_newer_motion() {
        let mut cache = PositionCache::new();
        let id = cache.identify(&HeadlessElement::new("a", Rect::zero()));
        let old = CancelHandle::new();
        let new = CancelHandle::new();
        cache.set_motion(id, Motion::Animating(new.clone()));

        assert!(!cache.finish_motion(id, &old));
        assert!(cache.lookup(id).unwrap().motion.is_active());
        assert!(cache.finish_motion(id, &new));
        assert!(!cache.lookup(id).unwrap().motion.is_active());
    }
}
