//! Push-updated values from the host environment.
//!
//! Media queries, intersection state, tab visibility and scroll offset all
//! arrive as events. The state machines in this crate subscribe to an
//! [`Observable`] instead of talking to the browser, so tests can publish
//! synthetic sequences into a [`PushSource`].

use std::sync::{Arc, Mutex};

pub type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub trait Observable<T> {
    /// Last published value, if any.
    fn current(&self) -> Option<T>;

    /// Registers a listener. If a value has already been published the
    /// listener is called with it immediately.
    fn subscribe(&self, listener: Listener<T>) -> Subscription;
}

/// Unsubscribes when dropped or when [`Subscription::unsubscribe`] is called.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct Inner<T> {
    value: Option<T>,
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// An observable value that is set from the outside.
///
/// Publishing a value equal to the current one is ignored, so listeners only
/// ever see transitions.
pub struct PushSource<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for PushSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for PushSource<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: None,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }
}

impl<T> PushSource<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: T) -> Self {
        let source = Self::default();
        source.publish(value);
        source
    }

    /// Stores `value` and notifies listeners if it differs from the last one.
    /// Returns whether listeners were notified.
    pub fn publish(&self, value: T) -> bool {
        let listeners = {
            let mut inner = self.inner.lock().expect("push source lock poisoned");
            if inner.value.as_ref() == Some(&value) {
                return false;
            }
            inner.value = Some(value.clone());
            inner
                .listeners
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect::<Vec<_>>()
        };
        // listeners run without the lock so they may publish or subscribe
        for listener in listeners {
            listener(&value);
        }
        true
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .lock()
            .expect("push source lock poisoned")
            .listeners
            .len()
    }
}

impl<T> Observable<T> for PushSource<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    fn current(&self) -> Option<T> {
        self.inner
            .lock()
            .expect("push source lock poisoned")
            .value
            .clone()
    }

    fn subscribe(&self, listener: Listener<T>) -> Subscription {
        let (id, current) = {
            let mut inner = self.inner.lock().expect("push source lock poisoned");
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Arc::clone(&listener)));
            (id, inner.value.clone())
        };
        if let Some(value) = current {
            listener(&value);
        }
        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                if let Ok(mut inner) = inner.lock() {
                    inner.listeners.retain(|(lid, _)| *lid != id);
                }
            }
        })
    }
}
