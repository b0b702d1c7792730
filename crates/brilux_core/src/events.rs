//! Scoped event listeners
//!
//! An [`EventSource`] is the single-threaded counterpart of a browser event
//! target: hosts emit values into it and components subscribe to it. Every
//! subscription returns a [`ListenerGuard`]; the listener stays registered
//! exactly as long as the guard is alive. Components keep their guards as
//! fields, so unmounting a component (dropping it) releases its listeners.
//!
//! Dispatch snapshots the listener list before calling out, so a listener may
//! subscribe, unsubscribe, or emit on other sources while it runs. Listeners
//! released during a dispatch are not called by it; listeners added during
//! a dispatch first hear the next event.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

new_key_type! {
    /// Unique identifier for a registered listener
    pub struct ListenerId;
}

type Listener<T> = Rc<dyn Fn(&T)>;
type ListenerMap<T> = RefCell<SlotMap<ListenerId, Listener<T>>>;

/// A source of events of type `T`
///
/// Cloning an `EventSource` yields another handle to the same listener list.
pub struct EventSource<T> {
    listeners: Rc<ListenerMap<T>>,
}

impl<T> Clone for EventSource<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: 'static> EventSource<T> {
    /// Create a source with no listeners
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(SlotMap::with_key())),
        }
    }

    /// Register a listener
    ///
    /// The listener is removed when the returned guard is dropped.
    #[must_use = "dropping the guard immediately deregisters the listener"]
    pub fn subscribe<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&T) + 'static,
    {
        let id = self.listeners.borrow_mut().insert(Rc::new(listener));
        let weak: Weak<ListenerMap<T>> = Rc::downgrade(&self.listeners);

        ListenerGuard {
            id,
            release: Some(Box::new(move |id| {
                if let Some(listeners) = weak.upgrade() {
                    listeners.borrow_mut().remove(id);
                }
            })),
        }
    }

    /// Deliver an event to every registered listener
    pub fn emit(&self, event: &T) {
        let snapshot: SmallVec<[(ListenerId, Listener<T>); 4]> = self
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (id, Rc::clone(listener)))
            .collect();

        for (id, listener) in snapshot {
            // Released by an earlier listener of this dispatch
            if !self.is_registered(id) {
                continue;
            }
            listener(event);
        }
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Check whether a specific listener is still registered
    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.borrow().contains_key(id)
    }
}

impl<T: 'static> Default for EventSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a listener registered for as long as it lives
pub struct ListenerGuard {
    id: ListenerId,
    release: Option<Box<dyn FnOnce(ListenerId)>>,
}

impl ListenerGuard {
    /// The id of the guarded listener
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Deregister now instead of waiting for drop
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(release) = self.release.take() {
            release(self.id);
        }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl std::fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("id", &self.id)
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let source = EventSource::<i32>::new();
        let total = Rc::new(Cell::new(0));

        let a = total.clone();
        let _g1 = source.subscribe(move |v| a.set(a.get() + v));
        let b = total.clone();
        let _g2 = source.subscribe(move |v| b.set(b.get() + v * 10));

        source.emit(&2);
        assert_eq!(total.get(), 22);
    }

    #[test]
    fn test_guard_drop_deregisters() {
        let source = EventSource::<()>::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let guard = source.subscribe(move |_| h.set(h.get() + 1));
        let id = guard.id();
        assert!(source.is_registered(id));

        source.emit(&());
        drop(guard);
        source.emit(&());

        assert_eq!(hits.get(), 1);
        assert!(!source.is_registered(id));
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_explicit_release() {
        let source = EventSource::<u8>::new();
        let guard = source.subscribe(|_| {});
        assert_eq!(source.listener_count(), 1);
        guard.release();
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_guard_outliving_source_is_harmless() {
        let source = EventSource::<u8>::new();
        let guard = source.subscribe(|_| {});
        drop(source);
        drop(guard);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_dispatch() {
        let source = EventSource::<u8>::new();
        let slot: Rc<RefCell<Option<ListenerGuard>>> = Rc::new(RefCell::new(None));

        let inner = slot.clone();
        let guard = source.subscribe(move |_| {
            inner.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(guard);

        source.emit(&1);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn test_listener_released_mid_dispatch_is_skipped() {
        let source = EventSource::<u8>::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let victim: Rc<RefCell<Option<ListenerGuard>>> = Rc::new(RefCell::new(None));

        let (log, slot) = (calls.clone(), victim.clone());
        let _first = source.subscribe(move |_| {
            log.borrow_mut().push("first");
            slot.borrow_mut().take();
        });
        let log = calls.clone();
        *victim.borrow_mut() = Some(source.subscribe(move |_| log.borrow_mut().push("second")));

        source.emit(&1);
        assert_eq!(*calls.borrow(), vec!["first"]);
        assert_eq!(source.listener_count(), 1);
    }
}
