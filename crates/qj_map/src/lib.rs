//! Reflection-driven mapping between Rust objects and JSON dictionaries.
//!
//! A type becomes *mappable* by deriving [`Mappable`](derive::Mappable). The
//! derive builds a static field descriptor table ([`info::ObjectInfo`]) and
//! the accessors the [`engine`] needs to walk an object graph generically:
//!
//! ```
//! use qj_map::derive::Mappable;
//! use qj_map::temporal::DbDate;
//! use qj_map::{MappableExt, engine};
//!
//! #[derive(Mappable, Default, Debug, PartialEq)]
//! struct Restaurant {
//!     #[mappable(rename = "id")]
//!     obj_id: String,
//!     name: Option<String>,
//!     opened: Option<DbDate>,
//! }
//!
//! let text = r#"{ "id": "abc", "name": "Qwik", "opened": "2024-03-15", "extra": 1 }"#;
//! let dictionary = qj_map::json::decode_dictionary(text).unwrap();
//!
//! let restaurant: Restaurant = engine::from_dictionary(&dictionary).unwrap();
//! assert_eq!(restaurant.obj_id, "abc");
//! assert_eq!(restaurant.opened.unwrap().to_db_string(), "2024-03-15");
//!
//! let back = restaurant.to_dictionary().unwrap();
//! assert_eq!(back["id"], "abc");
//! assert!(!back.contains_key("extra"));
//! ```
//!
//! ## Menu
//!
//! - [`info`]: per-type field descriptors, built once per type.
//! - [`naming`]: external/internal name translation and transient fields.
//! - [`value`]: the dictionary model and the [`FieldValue`](value::FieldValue)
//!   conversions of field types.
//! - [`temporal`]: date, time, date-time and timestamp values with
//!   process-wide formats.
//! - [`engine`]: object to dictionary, dictionary to object, arrays.
//! - [`registry`]: nested type handles and lookup by type path.
//! - [`json`], [`prefs`], [`managed`], [`serde`]: collaborators built on the
//!   engine (JSON text, preference storage, externally managed objects and
//!   `serde` serializers).
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code refers to `::qj_map`, which must also resolve inside this
// crate (unit tests and doc tests derive `Mappable` too).
extern crate self as qj_map;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod mappable;

pub mod engine;
pub mod info;
pub mod json;
pub mod managed;
pub mod naming;
pub mod prefs;
pub mod registry;
pub mod serde;
pub mod temporal;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use error::MappingError;
pub use mappable::{Fields, Mappable, MappableExt};
pub use qj_map_derive as derive;
pub use value::{Dictionary, Value};
