//! Reactive cells
//!
//! A [`Cell`] is a shared value backed by a `tokio::sync::watch` channel.
//! Reads never block; `subscribe()` hands out a receiver whose `changed()`
//! resolves on the next write that actually changes the value.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::watch;

use crate::object::{WaveObj, WaveObject};
use crate::oref::ORef;

pub struct Cell<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cell").field(&*self.tx.borrow()).finish()
    }
}

impl<T: Clone + PartialEq> Cell<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// The closure runs while the channel's read lock is held; it must not
    /// write to this cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Replace the value. Subscribers are notified only if it changed.
    pub fn set(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }

    /// Mutate the value in place. Subscribers are notified only if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        self.tx.send_if_modified(|current| {
            let before = current.clone();
            f(current);
            *current != before
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// True when a receiver or another handle besides this one is alive.
    pub fn is_observed(&self) -> bool {
        Arc::strong_count(&self.tx) > 1 || self.tx.receiver_count() > 0
    }

    /// True when both handles point at the same underlying cell.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.tx, &other.tx)
    }
}

/// Typed view over the store's cell for one object.
pub struct ObjectCell<T> {
    oref: ORef,
    raw: Cell<Option<WaveObj>>,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Clone for ObjectCell<T> {
    fn clone(&self) -> Self {
        Self {
            oref: self.oref.clone(),
            raw: self.raw.clone(),
            _kind: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ObjectCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCell").field("oref", &self.oref).finish()
    }
}

impl<T: WaveObject> ObjectCell<T> {
    pub(crate) fn new(oref: ORef, raw: Cell<Option<WaveObj>>) -> Self {
        Self {
            oref,
            raw,
            _kind: PhantomData,
        }
    }

    pub fn oref(&self) -> &ORef {
        &self.oref
    }

    /// Current value, or `None` while unresolved or after deletion.
    pub fn get(&self) -> Option<T> {
        self.raw.with(|obj| obj.as_ref().and_then(T::from_obj))
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<WaveObj>> {
        self.raw.subscribe()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.raw.ptr_eq(&other.raw)
    }
}
