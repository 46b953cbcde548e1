use rustc_hash::{FxHashMap, FxHashSet, FxHasher};
use slotmap::SlotMap;
use smallvec::SmallVec;

/// Compact index type for vertex/facet positions within a cell.
///
/// A tetrahedron has four vertices and four facets, and facet `i` is the one
/// opposite vertex `i`, so the same index type addresses both.
///
/// # Examples
///
/// ```rust
/// use delaunay_alpha::core::collections::FacetIndex;
///
/// let facet: FacetIndex = 2;
/// assert_eq!(usize::from(facet), 2);
/// ```
pub type FacetIndex = u8;

/// Storage backend for triangulation elements.
///
/// Keys stay valid while other elements are inserted or removed, which is what
/// cavity retriangulation needs: many cells are destroyed and recreated per
/// insertion while the rest of the mesh keeps its keys.
///
/// This type should not be exposed in public API signatures; public methods
/// return iterators instead.
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Optimized `HashMap` for internal bookkeeping.
///
/// Uses `FastHasher` (`rustc_hash::FxHasher`), which is not DoS-resistant; keys
/// here are always internal slot-map keys or vertex indices.
///
/// # Examples
///
/// ```rust
/// use delaunay_alpha::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<u64, usize> = FastHashMap::default();
/// map.insert(123, 456);
/// assert_eq!(map.get(&123), Some(&456));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Optimized `HashSet` for internal membership tests.
pub type FastHashSet<T> = FxHashSet<T>;

/// Fast non-cryptographic hasher used by [`FastHashMap`] and [`FastHashSet`].
pub type FastHasher = FxHasher;

/// Re-export of the `Entry` API for [`FastHashMap`].
pub use std::collections::hash_map::Entry;

/// Small-buffer-optimized vector: the first `N` elements live inline.
///
/// # Examples
///
/// ```rust
/// use delaunay_alpha::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<i32, 4> = SmallBuffer::new();
/// buffer.extend([1, 2, 3]);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Creates a [`FastHashMap`] with at least the given capacity.
#[must_use]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    FastHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

/// Creates a [`FastHashSet`] with at least the given capacity.
#[must_use]
pub fn fast_hash_set_with_capacity<T>(capacity: usize) -> FastHashSet<T> {
    FastHashSet::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}
