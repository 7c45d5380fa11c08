#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use qj_map as map;
pub use qj_utils as utils;
