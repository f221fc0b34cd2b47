//! geosync-cli
//! ===========
//!
//! Command-line interface for the `geosync-core` import pipeline.
//!
//! The binary is called `geosync`. This library target exposes no API; it
//! exists so docs.rs renders an overview page.
//!
//! ```text
//! geosync --help
//! geosync sync --countries DE,CH
//! geosync -v sync --force-import cities15000.txt
//! geosync --data-dir /var/lib/geosync stats
//! geosync cities zurich
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG`; `-v`/`-q` pick the level
//! otherwise.
//!
//! For programmatic use, depend on `geosync-core` directly.
#![cfg_attr(docsrs, feature(doc_cfg))]
