//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! Every container here uses [`FixedHashState`], so iteration order only
//! depends on the inserted keys, never on a per-process random seed.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{FixedHashState, FixedHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
///
/// # Examples
///
/// ```
/// use qj_utils::hash::HashMap;
///
/// let mut names: HashMap<&str, &str> = HashMap::default();
/// names.insert("objId", "id");
///
/// assert_eq!(names.get("objId"), Some(&"id"));
/// ```
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;
