// src/output/mod.rs
// =============================================================================
// This module persists extracted pages.
//
// Layout under the output directory:
//   scraped_pages/<domain key>/<sanitized path>.md   one file per page
//   url_list/<domain key>_urls.csv                   one row per saved page
//
// Submodules:
// - writer: File naming and the markdown/manifest writes
// =============================================================================

mod writer;

pub use writer::{OutputError, OutputWriter};
