//! Read-through overlay documents
//!
//! A [`MergeLayer`] is consulted on every lookup and never copied into the
//! primary store. Layers are shared handles: the overlay keeps its own
//! lifecycle and can be reloaded independently.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::document::IniDocument;
use crate::store::Entry;

/// A document handle that can be merged into several others.
pub type SharedDocument = Arc<RwLock<IniDocument>>;

/// How a layer's values combine with what earlier sources resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeStrategy {
    /// Fill in only where nothing has resolved a value yet.
    AddIfMissing,
    /// Replace whatever earlier layers resolved.
    Override,
}

/// A secondary document and the strategy used to fold it in.
#[derive(Debug, Clone)]
pub struct MergeLayer {
    document: SharedDocument,
    strategy: MergeStrategy,
}

impl MergeLayer {
    pub fn new(document: SharedDocument, strategy: MergeStrategy) -> Self {
        Self { document, strategy }
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, IniDocument> {
        self.document.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, IniDocument> {
        self.document.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Fold `layers`, in order, starting from the local entry.
///
/// An `Override` layer with a value replaces the accumulator, local values
/// included. Any other layer with a value fills an accumulator that has no
/// value yet, unless the key exists locally: a local key, even value-less,
/// is never filled in by `AddIfMissing`. A layer that only knows the key
/// (value-less) is kept when nothing else has been seen, so the key still
/// surfaces in enumeration.
pub(crate) fn resolve(
    layers: &[MergeLayer],
    local: Option<&Entry>,
    section: &str,
    key: &str,
) -> Option<Entry> {
    let local_present = local.is_some();
    layers.iter().fold(local.cloned(), |acc: Option<Entry>, layer| {
        let Some(candidate) = layer.read().resolve_entry(section, key) else {
            return acc;
        };
        let acc_is_null = acc.as_ref().is_none_or(|entry| entry.value().is_none());

        if candidate.value().is_some()
            && (layer.strategy() == MergeStrategy::Override || (acc_is_null && !local_present))
        {
            Some(candidate)
        } else if acc.is_none() {
            Some(candidate)
        } else {
            acc
        }
    })
}
