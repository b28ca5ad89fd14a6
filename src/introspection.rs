//! Concurrent, monotonic cache resolving a dotted property path against a
//! record shape to an ordered sequence of [`FieldDescriptor`]s.
//!
//! Backed by [`dashmap::DashMap`] rather than a single `Mutex<HashMap<_,_>>`
//! so that concurrent resolution of *different* paths never serializes on
//! one lock; concurrent resolution of the *same* path may redundantly
//! recompute, but `DashMap::entry` guarantees every caller observes the same
//! published value, and a double-compute under a race is the only cost.
//! Entries are never evicted; the cache grows with the set of distinct
//! `(shape, path)` pairs seen over the process lifetime.

use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::error::FilterError;
use crate::shape::{FieldDescriptor, FieldKind, Record};
use crate::value::ValueType;

/// A resolved, cached property path: the chain of descriptors from the root
/// shape down to the leaf field, plus the leaf's type and effective
/// nullability (nullable if the leaf itself is nullable, or if any
/// intermediate nested field along the way was nullable, since an absent
/// intermediate makes everything downstream read as null).
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    pub descriptors: Vec<&'static FieldDescriptor>,
    pub value_type: ValueType,
    pub nullable: bool,
}

impl ResolvedPath {
    /// The descriptor names in resolution order, suitable for driving
    /// [`crate::shape::RecordDyn::field_dyn`] traversal at evaluation time.
    pub fn segment_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|d| d.name)
    }
}

type CacheKey = (TypeId, String);
type PathCache = DashMap<CacheKey, Arc<ResolvedPath>>;

static PATH_CACHE: OnceLock<PathCache> = OnceLock::new();

fn cache() -> &'static PathCache {
    PATH_CACHE.get_or_init(DashMap::new)
}

/// Resolves a dotted path (e.g. `"Address.City"`) against `T`'s shape,
/// case-insensitively segment by segment. Compile-time only: never called
/// while evaluating a compiled predicate against a record.
pub fn resolve_path<T: Record>(path: &str) -> Result<Arc<ResolvedPath>, FilterError> {
    let key = (TypeId::of::<T>(), path.to_string());
    if let Some(existing) = cache().get(&key) {
        tracing::trace!(path, "introspection cache hit");
        return Ok(existing.clone());
    }

    tracing::debug!(path, shape = T::shape_name(), "resolving property path");
    let resolved = Arc::new(resolve_uncached(T::shape_name(), T::descriptors(), path)?);

    let published = cache().entry(key).or_insert_with(|| resolved.clone());
    Ok(published.clone())
}

fn resolve_uncached(
    root_shape_name: &'static str,
    root_descriptors: &'static [FieldDescriptor],
    path: &str,
) -> Result<ResolvedPath, FilterError> {
    let mut descriptors: Vec<&'static FieldDescriptor> = Vec::new();
    let mut current_table = root_descriptors;
    let mut current_shape_name = root_shape_name;
    let mut nullable_so_far = false;

    let segments: Vec<&str> = path.split('.').collect();
    let last = segments.len().saturating_sub(1);

    for (i, segment) in segments.iter().enumerate() {
        let descriptor = current_table
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(segment))
            .ok_or_else(|| FilterError::property_not_found(*segment, current_shape_name))?;

        nullable_so_far = nullable_so_far || descriptor.nullable;
        descriptors.push(descriptor);

        match descriptor.kind {
            FieldKind::Scalar(_) if i != last => {
                return Err(FilterError::property_not_found(
                    segments[i + 1],
                    descriptor.name,
                ));
            }
            FieldKind::Nested(..) if i == last => {
                return Err(FilterError::property_not_found("", descriptor.name));
            }
            FieldKind::Nested(next_descriptors, next_shape_name) => {
                current_table = next_descriptors();
                current_shape_name = next_shape_name();
            }
            FieldKind::Scalar(_) => {}
        }
    }

    let value_type = match descriptors
        .last()
        .expect("path always has at least one segment")
        .kind
    {
        FieldKind::Scalar(vt) => vt,
        FieldKind::Nested(..) => unreachable!("nested leaf rejected above"),
    };

    Ok(ResolvedPath {
        descriptors,
        value_type,
        nullable: nullable_so_far,
    })
}
