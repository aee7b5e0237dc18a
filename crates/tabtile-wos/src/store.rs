//! Object store
//!
//! Holds one (value, loading) cell pair per oref. An oref that has been asked
//! for but not yet resolved reads as loading; resolving it either stores a
//! value or marks it missing.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cell::{Cell, ObjectCell};
use crate::error::WosError;
use crate::object::{WaveObj, WaveObject};
use crate::oref::ORef;
use crate::Result;

#[derive(Clone)]
struct Entry {
    value: Cell<Option<WaveObj>>,
    loading: Cell<bool>,
}

impl Entry {
    fn pending() -> Self {
        Self {
            value: Cell::new(None),
            loading: Cell::new(true),
        }
    }

    fn is_observed(&self) -> bool {
        self.value.is_observed() || self.loading.is_observed()
    }
}

#[derive(Clone, Default)]
pub struct ObjectStore {
    entries: Arc<RwLock<HashMap<ORef, Entry>>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, oref: &ORef) -> Entry {
        if let Some(entry) = self.entries.read().get(oref) {
            return entry.clone();
        }

        self.entries
            .write()
            .entry(oref.clone())
            .or_insert_with(|| {
                tracing::trace!(oref = %oref, "Registered pending object");
                Entry::pending()
            })
            .clone()
    }

    /// Loading flag for `oref`. Unresolved orefs start out loading.
    pub fn loading_cell(&self, oref: &ORef) -> Cell<bool> {
        self.entry(oref).loading
    }

    /// Typed value cell for `oref`.
    pub fn object_cell<T: WaveObject>(&self, oref: &ORef) -> Result<ObjectCell<T>> {
        if oref.otype != T::OTYPE {
            return Err(WosError::TypeMismatch {
                oref: oref.to_string(),
                expected: T::OTYPE,
            });
        }

        Ok(ObjectCell::new(oref.clone(), self.entry(oref).value))
    }

    pub fn is_loading(&self, oref: &ORef) -> bool {
        self.entries
            .read()
            .get(oref)
            .map(|entry| entry.loading.get())
            .unwrap_or(true)
    }

    pub fn get<T: WaveObject>(&self, oref: &ORef) -> Option<T> {
        let entry = self.entries.read().get(oref).cloned()?;
        entry.value.with(|obj| obj.as_ref().and_then(T::from_obj))
    }

    /// Store `obj` and mark its oref resolved.
    pub fn put<T: WaveObject>(&self, obj: T) {
        let oref = obj.oref();
        let entry = self.entry(&oref);

        // Value first, so anyone woken by the loading flag sees it.
        entry.value.set(Some(obj.into_obj()));
        entry.loading.set(false);

        tracing::trace!(oref = %oref, "Stored object");
    }

    /// Flag `oref` as being fetched again.
    pub fn mark_loading(&self, oref: &ORef) {
        self.entry(oref).loading.set(true);
    }

    /// Resolve `oref` as absent.
    pub fn mark_missing(&self, oref: &ORef) {
        let entry = self.entry(oref);
        entry.value.set(None);
        entry.loading.set(false);
    }

    /// Apply `f` to the stored object. Returns false if nothing of type `T`
    /// is stored under `oref`.
    ///
    /// The read-modify-write runs under the cell's write lock, so concurrent
    /// updates to the same object never lose each other's changes.
    pub fn update<T: WaveObject>(&self, oref: &ORef, f: impl FnOnce(&mut T)) -> bool {
        let Some(entry) = self.entries.read().get(oref).cloned() else {
            return false;
        };

        let mut found = false;
        entry.value.update(|slot| {
            if let Some(mut typed) = slot.as_ref().and_then(T::from_obj) {
                found = true;
                f(&mut typed);
                *slot = Some(typed.into_obj());
            }
        });
        found
    }

    /// Remove the object behind `oref`. Returns whether a value was present.
    ///
    /// An entry nobody holds a cell or receiver for is dropped from the map
    /// and reads as unresolved afterwards. A watched entry stays, resolved
    /// as absent, so its watchers see the deletion.
    pub fn delete(&self, oref: &ORef) -> bool {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get(oref) else {
            return false;
        };

        let existed = entry.value.with(Option::is_some);
        if entry.is_observed() {
            entry.value.set(None);
            entry.loading.set(false);
        } else {
            entries.remove(oref);
            tracing::trace!(oref = %oref, "Evicted object");
        }
        existed
    }

    /// Number of orefs with a live entry.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
