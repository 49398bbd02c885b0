// ABOUTME: Extractor registry that runs layout subextractors and keeps the watched videos.
// ABOUTME: Subextractors are unique by handle identity and run in insertion order.

//! Watched-video extraction.
//!
//! An [`Extractor`] holds the subextractors to run. Each call to
//! [`Extractor::extract`] queries the current DOM from scratch; nothing is
//! carried over between scans.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, Dispatch};

use crate::dom::Element;
use crate::error::ConfigError;
use crate::extractors::compiled;
use crate::extractors::layouts::{builtin_selectors, Subextractor};
use crate::options::{ExtractorBuilder, Settings};
use crate::video::Video;

/// Runs registered subextractors against a root element.
pub struct Extractor<E: Element> {
    subextractors: Vec<Arc<dyn Subextractor<E>>>,
    dispatch: Option<Dispatch>,
}

/// Runs `f` with `dispatch` as the default subscriber, or under the global one when `None`.
pub(crate) fn in_dispatch<T>(dispatch: Option<&Dispatch>, f: impl FnOnce() -> T) -> T {
    match dispatch {
        Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
        None => f(),
    }
}

fn same_handle<E: Element>(a: &Arc<dyn Subextractor<E>>, b: &Arc<dyn Subextractor<E>>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl<E: Element> Extractor<E> {
    /// Creates an extractor with no subextractors.
    pub fn new() -> Self {
        Self {
            subextractors: Vec::new(),
            dispatch: None,
        }
    }

    /// Returns a builder.
    pub fn builder() -> ExtractorBuilder<E> {
        ExtractorBuilder::new()
    }

    /// Creates an extractor with every built-in layout registered.
    pub fn with_builtins() -> Self {
        compiled::global().warm(builtin_selectors());
        ExtractorBuilder::new().builtin_layouts().build()
    }

    /// Creates an extractor with the layouts enabled in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        Ok(ExtractorBuilder::new()
            .layouts_named(&settings.layouts)?
            .build())
    }

    /// Registers a subextractor. Returns false if this handle is already registered.
    pub fn insert(&mut self, subextractor: Arc<dyn Subextractor<E>>) -> bool {
        if self.contains(&subextractor) {
            return false;
        }
        self.subextractors.push(subextractor);
        true
    }

    /// Unregisters a subextractor. Returns false if it was not registered.
    pub fn remove(&mut self, subextractor: &Arc<dyn Subextractor<E>>) -> bool {
        let before = self.subextractors.len();
        self.subextractors.retain(|s| !same_handle(s, subextractor));
        self.subextractors.len() != before
    }

    /// Returns true if this handle is registered.
    pub fn contains(&self, subextractor: &Arc<dyn Subextractor<E>>) -> bool {
        self.subextractors.iter().any(|s| same_handle(s, subextractor))
    }

    pub fn len(&self) -> usize {
        self.subextractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subextractors.is_empty()
    }

    /// Names of the registered subextractors, in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.subextractors.iter().map(|s| s.name()).collect()
    }

    /// Routes every log event raised during extraction to `dispatch`.
    ///
    /// The videos returned by [`Extractor::extract`] and [`Extractor::videos`]
    /// carry it too, so their own lookups log to the same place.
    pub fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.dispatch = Some(dispatch);
    }

    /// The injected dispatch, if any.
    pub fn dispatch(&self) -> Option<&Dispatch> {
        self.dispatch.as_ref()
    }

    /// Returns every video found under `root`, watched or not.
    ///
    /// Elements matched by more than one subextractor are wrapped once per match.
    pub fn videos(&self, root: &E) -> Vec<Video<E>> {
        self.with_dispatch(|| self.collect(root))
    }

    /// Returns the videos under `root` watched to at least `threshold` percent.
    pub fn extract(&self, root: &E, threshold: u8) -> Vec<Video<E>> {
        self.with_dispatch(|| {
            let videos = self.collect(root);
            let total = videos.len();
            let watched: Vec<Video<E>> = videos
                .into_iter()
                .filter_map(|mut video| (video.get_viewed(threshold) == Some(true)).then_some(video))
                .collect();
            info!(watched = watched.len(), total, threshold, "extracted watched videos");
            watched
        })
    }

    fn collect(&self, root: &E) -> Vec<Video<E>> {
        let mut videos = Vec::new();
        for subextractor in &self.subextractors {
            let matched = subextractor.extract(root);
            debug!(layout = subextractor.name(), matched = matched.len(), "ran subextractor");
            videos.extend(
                matched
                    .into_iter()
                    .map(|element| Video::new(element).with_dispatch(self.dispatch.clone())),
            );
        }
        videos
    }

    fn with_dispatch<T>(&self, f: impl FnOnce() -> T) -> T {
        in_dispatch(self.dispatch.as_ref(), f)
    }
}

impl<E: Element> Default for Extractor<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Element> fmt::Debug for Extractor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("subextractors", &self.names())
            .field("dispatch", &self.dispatch.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlElement;
    use crate::extractors::layouts::{GRID, HOME, SEARCH};
    use dom_query::Document;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
        <html><body>
        <ytd-rich-grid-renderer>
            <ytd-rich-item-renderer>
                <a id="video-title-link" href="/watch?v=home1" title="Home one"></a>
                <ytd-thumbnail-overlay-resume-playback-renderer>
                    <div id="progress" style="width: 100%;"></div>
                </ytd-thumbnail-overlay-resume-playback-renderer>
            </ytd-rich-item-renderer>
            <ytd-rich-item-renderer>
                <a id="video-title-link" href="/watch?v=home2" title="Home two"></a>
                <ytd-thumbnail-overlay-resume-playback-renderer>
                    <div id="progress" style="width: 20%;"></div>
                </ytd-thumbnail-overlay-resume-playback-renderer>
            </ytd-rich-item-renderer>
            <ytd-rich-item-renderer>
                <a id="video-title-link" href="/watch?v=home3" title="Home three"></a>
            </ytd-rich-item-renderer>
        </ytd-rich-grid-renderer>
        <ytd-grid-renderer>
            <ytd-grid-video-renderer>
                <a id="thumbnail" href="/watch?v=grid1">
                    <ytd-thumbnail-overlay-resume-playback-renderer>
                        <div id="progress" style="width: 95%;"></div>
                    </ytd-thumbnail-overlay-resume-playback-renderer>
                </a>
            </ytd-grid-video-renderer>
        </ytd-grid-renderer>
        </body></html>
    "#;

    fn ids(videos: &mut [Video<HtmlElement<'_>>]) -> Vec<String> {
        videos
            .iter_mut()
            .filter_map(|v| v.get_id().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_empty_extractor_finds_nothing() {
        let doc = Document::from(PAGE);
        let extractor: Extractor<HtmlElement<'_>> = Extractor::new();
        assert!(extractor.is_empty());
        assert!(extractor.extract(&HtmlElement::root(&doc), 0).is_empty());
    }

    #[test]
    fn test_extract_filters_by_threshold() {
        let doc = Document::from(PAGE);
        let root = HtmlElement::root(&doc);
        let extractor = Extractor::with_builtins();

        let mut watched = extractor.extract(&root, 90);
        assert_eq!(watched.len(), 2);
        let video_ids: Vec<String> = ids(&mut watched)
            .iter()
            .map(|id| id.rsplit('#').next().unwrap().to_string())
            .collect();
        assert_eq!(video_ids, vec!["home1", "grid1"]);

        assert_eq!(extractor.extract(&root, 20).len(), 3);
        assert_eq!(extractor.extract(&root, 0).len(), 3);
        assert_eq!(extractor.videos(&root).len(), 4);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let doc = Document::from(PAGE);
        let root = HtmlElement::root(&doc);
        let extractor = Extractor::with_builtins();
        let first = ids(&mut extractor.extract(&root, 50));
        let second = ids(&mut extractor.extract(&root, 50));
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_insert_same_handle_twice_is_noop() {
        let doc = Document::from(PAGE);
        let root = HtmlElement::root(&doc);
        let mut extractor = Extractor::new();
        let home: Arc<dyn Subextractor<HtmlElement<'_>>> = Arc::new(HOME);
        assert!(extractor.insert(home.clone()));
        assert!(!extractor.insert(home.clone()));
        assert_eq!(extractor.len(), 1);
        assert_eq!(extractor.extract(&root, 0).len(), 2);
    }

    #[test]
    fn test_equal_layouts_in_distinct_handles_both_run() {
        let doc = Document::from(PAGE);
        let root = HtmlElement::root(&doc);
        let mut extractor = Extractor::new();
        assert!(extractor.insert(Arc::new(GRID)));
        assert!(extractor.insert(Arc::new(GRID)));
        // No cross-subextractor dedup: the grid video is wrapped twice.
        let mut watched = extractor.extract(&root, 0);
        let found = ids(&mut watched);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], found[1]);
    }

    #[test]
    fn test_remove_drops_contribution() {
        let doc = Document::from(PAGE);
        let root = HtmlElement::root(&doc);
        let mut extractor = Extractor::new();
        let home: Arc<dyn Subextractor<HtmlElement<'_>>> = Arc::new(HOME);
        let grid: Arc<dyn Subextractor<HtmlElement<'_>>> = Arc::new(GRID);
        extractor.insert(home.clone());
        extractor.insert(grid.clone());
        assert_eq!(extractor.extract(&root, 0).len(), 3);

        assert!(extractor.remove(&grid));
        assert!(!extractor.remove(&grid));
        assert!(!extractor.contains(&grid));
        let mut remaining = extractor.extract(&root, 0);
        assert!(ids(&mut remaining).iter().all(|id| !id.ends_with("#grid1")));
        assert_eq!(remaining.len(), 2);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut extractor: Extractor<HtmlElement<'_>> = Extractor::with_builtins();
        let len = extractor.len();
        let search: Arc<dyn Subextractor<HtmlElement<'_>>> = Arc::new(SEARCH);
        assert!(!extractor.remove(&search));
        assert_eq!(extractor.len(), len);
    }

    fn every_progress_bar_parent<'a>(root: &HtmlElement<'a>) -> Vec<HtmlElement<'a>> {
        root.query_all("ytd-thumbnail-overlay-resume-playback-renderer")
            .into_iter()
            .filter_map(|e| e.parent())
            .collect()
    }

    #[test]
    fn test_function_subextractor_order() {
        let doc = Document::from(PAGE);
        let root = HtmlElement::root(&doc);
        let mut extractor = Extractor::new();
        extractor.insert(Arc::new(GRID));
        extractor.insert(Arc::new(every_progress_bar_parent));
        assert_eq!(extractor.names(), vec!["grid", "custom"]);

        let mut watched = extractor.extract(&root, 50);
        assert_eq!(watched.len(), 3);
        // grid first, then the function's matches in document order. The last
        // match is the grid thumbnail link itself, which has no watch link below it.
        let found = ids(&mut watched);
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("#grid1"));
        assert!(found[1].ends_with("#home1"));
    }

    #[test]
    fn test_scoped_root() {
        let doc = Document::from(PAGE);
        let root = HtmlElement::root(&doc);
        let grid_only = root.query("ytd-grid-renderer").unwrap();
        let extractor = Extractor::with_builtins();
        assert_eq!(extractor.extract(&grid_only, 0).len(), 1);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            layouts: vec!["grid".to_string()],
            ..Settings::default()
        };
        let extractor: Extractor<HtmlElement<'_>> = Extractor::from_settings(&settings).unwrap();
        assert_eq!(extractor.names(), vec!["grid"]);
        assert!(format!("{:?}", extractor).contains("grid"));
    }
}
