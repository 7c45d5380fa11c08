use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// Locate an accessible [`syn::Path`] for a `qj_*` crate as seen from the
/// caller's Cargo.toml.
///
/// Derive macros emit absolute paths such as `::qj_map::Fields`, but the
/// invoking crate may only depend on the facade crate, or may have renamed
/// the dependency. This type reads the caller's manifest and picks a path
/// that resolves from there.
///
/// # Example
///
/// ```rust
/// # use qj_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("qj_map"));
/// ```
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies` under its own name,
///    return `::crate_name`.
/// 2. If it is listed under another key (`alias = { package = "crate_name" }`),
///    return `::alias`.
/// 3. If the name begins with `qj_` and the caller depends on the facade
///    crate `qj_core` (or its alias `qj`), return `::qj_core::short_name`
///    (e.g. `qj_map` -> `::qj_core::map`).
/// 4. Repeat step 1-3 in `dev-dependencies`.
/// 5. Otherwise, fall back to the absolute path `::crate_name`.
///
/// A crate that derives its own types should add
/// `extern crate self as crate_name;` in its root so rule 5 resolves.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAMES: [&str; 2] = ["qj_core", "qj"];
const CRATE_PREFIX: &str = "qj_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn read(path: &Path, modified_time: SystemTime) -> Self {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        let manifest = Document::parse(text)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()));
        Self {
            manifest,
            modified_time,
        }
    }

    #[inline]
    fn absolute(segments: &[&str]) -> syn::Path {
        syn::parse_str(&format!("::{}", segments.join("::")))
            .expect("crate names are valid path segments")
    }

    // Returns the key under which `name` is declared, honouring `package = "..."` renames.
    fn dependency_key<'a>(deps: &'a Table, name: &str) -> Option<&'a str> {
        if let Some((key, _)) = deps.get_key_value(name) {
            return Some(key.get());
        }
        deps.iter().find_map(|(key, item)| {
            let package = item.get("package").and_then(Item::as_str)?;
            (package == name).then_some(key)
        })
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if let Some(key) = Self::dependency_key(deps, name) {
            return Some(Self::absolute(&[&key.replace('-', "_")]));
        }

        let module = name.strip_prefix(CRATE_PREFIX)?;
        FACADE_NAMES.iter().find_map(|facade| {
            let key = Self::dependency_key(deps, facade)?;
            Some(Self::absolute(&[&key.replace('-', "_"), module]))
        })
    }

    /// Return a [`syn::Path`] for the package named `name` as resolved from this
    /// crate's Cargo.toml. See the top-level documentation for the resolution
    /// order.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|table| match self.manifest.get(table) {
                Some(Item::Table(deps)) => Self::find_in_deps(deps, name),
                _ => None,
            })
            .next()
            .unwrap_or_else(|| Self::absolute(&[name]))
    }

    /// Obtain the [`Manifest`] of the caller's Cargo.toml.
    ///
    /// Manifests are cached per path and re-read when the file's modification
    /// time changes. Callers should still invoke this once per macro expansion
    /// and pass the resulting [`syn::Path`] around.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = std::fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .expect("The Cargo.toml should have a modified time.");

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Self::read(&path, modified_time);
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}
