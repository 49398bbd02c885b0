// ABOUTME: Layout-specific video element extraction for YouTube pages.
// ABOUTME: Holds the subextractor strategies and the compiled selector cache they query through.

//! Video element extraction.
//!
//! Submodules:
//! - `layouts`: the [`Subextractor`](layouts::Subextractor) trait and the built-in per-layout selectors.
//! - `compiled`: cache of compiled CSS selectors shared by all DOM queries.

pub mod compiled;
pub mod layouts;
