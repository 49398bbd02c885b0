// ABOUTME: Library entry point for finding and hiding already-watched YouTube videos in a page DOM.
// ABOUTME: Re-exports the public API: Extractor, Video, HideSession, Settings, Element, HtmlElement.

//! ythide - find watched videos on a rendered YouTube page and hide them.
//!
//! The crate scans a page DOM for video renderers across YouTube's page
//! layouts, reads each video's watched-progress bar, and hides the ones
//! watched past a threshold while keeping them restorable.
//!
//! # Example
//!
//! ```no_run
//! use dom_query::Document;
//! use ythide_core::{Extractor, HtmlElement};
//!
//! let html = std::fs::read_to_string("page.html").unwrap();
//! let doc = Document::from(html.as_str());
//! let root = HtmlElement::root(&doc);
//!
//! let extractor = Extractor::with_builtins();
//! for mut video in extractor.extract(&root, 90) {
//!     println!("{:?}", video.get_title());
//!     video.hide();
//! }
//! ```

pub mod dom;
pub mod error;
pub mod extractor;
pub mod extractors;
pub mod options;
pub mod session;
pub mod video;

pub use crate::dom::{Element, HtmlElement};
pub use crate::error::ConfigError;
pub use crate::extractor::Extractor;
pub use crate::extractors::layouts::{LayoutSubextractor, Subextractor, BUILTIN_LAYOUTS};
pub use crate::options::{ExtractorBuilder, Settings, DEFAULT_THRESHOLD};
pub use crate::session::{HideSession, ScanReport};
pub use crate::video::Video;
