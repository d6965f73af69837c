//! atlasprep-cli
//! =============
//!
//! Command-line front end for `atlasprep-core`.
//!
//! This crate primarily provides a binary (`atlasprep`). The small library
//! target only exists so the crate has a rendered documentation page.
//!
//! Quick start
//! -----------
//!
//! ```text
//! atlasprep --help
//! atlasprep                      # filter + merge with the default file names
//! atlasprep filter --keep name_en,iso_a3
//! atlasprep merge --bundled-aliases
//! atlasprep inspect merged_dementia.geo.json
//! ```
//!
//! For programmatic access to the pipelines, use `atlasprep-core` directly.
//!
//! Links
//! -----
//! - Repository: <https://github.com/holg/atlasprep-rs>
//! - Core library docs: <https://docs.rs/atlasprep-core>
#![cfg_attr(docsrs, feature(doc_cfg))]
