//! Translation between internal field names and external dictionary keys.
//!
//! Each mappable type carries a [`NamingPolicy`] in its
//! [`ObjectInfo`](crate::info::ObjectInfo). Names without an explicit rename
//! map to themselves in both directions.

use alloc::vec::Vec;

use qj_utils::hash::{HashMap, HashSet};

use crate::MappingError;
use crate::info::{FieldInfo, ObjectInfo};

// -----------------------------------------------------------------------------
// Baseline

/// Field names that are transient for every type unless explicitly renamed.
///
/// Fields whose name starts with `_` are transient as well.
pub const BASELINE_TRANSIENT: [&str; 4] = ["superclass", "hash", "description", "debug_description"];

/// Returns `true` if `name` is transient for every type by default.
///
/// # Examples
///
/// ```
/// use qj_map::naming::is_baseline_transient;
///
/// assert!(is_baseline_transient("hash"));
/// assert!(is_baseline_transient("_cache"));
/// assert!(!is_baseline_transient("name"));
/// ```
#[inline]
pub fn is_baseline_transient(name: &str) -> bool {
    name.starts_with('_') || BASELINE_TRANSIENT.contains(&name)
}

// -----------------------------------------------------------------------------
// NamingPolicy

/// Per-type bijection between internal and external names, plus the set of
/// transient fields.
///
/// # Examples
///
/// ```
/// use qj_map::{derive::Mappable, info::Typed};
///
/// #[derive(Mappable, Default)]
/// struct Restaurant {
///     #[mappable(rename = "id")]
///     obj_id: String,
///     name: String,
///     #[mappable(transient)]
///     cached_rating: f32,
/// }
///
/// let naming = Restaurant::object_info().naming();
///
/// assert_eq!(naming.external_name("obj_id"), "id");
/// assert_eq!(naming.internal_name("id"), "obj_id");
/// assert_eq!(naming.external_name("name"), "name");
/// assert!(naming.is_transient("cached_rating"));
/// assert!(naming.is_transient("description"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct NamingPolicy {
    to_external: HashMap<&'static str, &'static str>,
    to_internal: HashMap<&'static str, &'static str>,
    transient: HashSet<&'static str>,
}

impl NamingPolicy {
    /// Builds the policy for the fields of `type_path`.
    ///
    /// Fails with [`MappingError::AmbiguousNaming`] when two non-transient
    /// fields end up with the same external name, including a rename that
    /// collides with another field's own name. The keys of a flattened base
    /// are claimed by the base field, so they collide with the owner's keys
    /// too.
    pub fn try_new(type_path: &'static str, fields: &[FieldInfo]) -> Result<Self, MappingError> {
        let mut policy = Self::default();
        let mut claimed: HashMap<&'static str, &'static str> = HashMap::default();

        for field in fields {
            let name = field.name();
            if field.is_renamed() {
                policy.to_external.insert(name, field.external_name());
            }
            if field.is_transient() || (!field.is_renamed() && is_baseline_transient(name)) {
                policy.transient.insert(name);
                continue;
            }
            if let Some(base) = field.base_info() {
                let mut keys = Vec::new();
                base_keys(base, &mut keys);
                for external in keys {
                    claim(&mut claimed, type_path, external, name)?;
                }
                continue;
            }
            if field.is_renamed() {
                policy.to_internal.insert(field.external_name(), name);
            }
            claim(&mut claimed, type_path, field.external_name(), name)?;
        }

        Ok(policy)
    }

    /// Returns the external name of `internal`, or `internal` itself.
    #[inline]
    pub fn external_name<'a>(&self, internal: &'a str) -> &'a str {
        self.to_external.get(internal).copied().unwrap_or(internal)
    }

    /// Returns the internal name of `external`, or `external` itself.
    #[inline]
    pub fn internal_name<'a>(&self, external: &'a str) -> &'a str {
        self.to_internal.get(external).copied().unwrap_or(external)
    }

    /// Returns `true` if `internal` is excluded from the mapping.
    ///
    /// Declared transient fields and baseline names are transient; a baseline
    /// name with an explicit rename is not.
    pub fn is_transient(&self, internal: &str) -> bool {
        self.transient.contains(internal)
            || (is_baseline_transient(internal) && !self.to_external.contains_key(internal))
    }

    /// Returns `true` if `internal` carries an explicit rename.
    #[inline]
    pub fn is_renamed(&self, internal: &str) -> bool {
        self.to_external.contains_key(internal)
    }
}

fn claim(
    claimed: &mut HashMap<&'static str, &'static str>,
    type_path: &'static str,
    external: &'static str,
    name: &'static str,
) -> Result<(), MappingError> {
    match claimed.insert(external, name) {
        Some(first) => Err(MappingError::AmbiguousNaming {
            type_path,
            external,
            first,
            second: name,
        }),
        None => Ok(()),
    }
}

// Keys a flattened base writes into the dictionary of its owner.
fn base_keys(info: &'static ObjectInfo, keys: &mut Vec<&'static str>) {
    let naming = info.naming();
    for field in info.iter() {
        if naming.is_transient(field.name()) {
            continue;
        }
        match field.base_info() {
            Some(base) => base_keys(base, keys),
            None => keys.push(field.external_name()),
        }
    }
}
