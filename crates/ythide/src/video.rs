// ABOUTME: Per-video model wrapping one renderer element: identity, title, watched state, visibility.
// ABOUTME: id and title memoize successful lookups only; viewed is recomputed on every call.

//! The video model.
//!
//! A [`Video`] wraps a single renderer element found by an extractor. Every
//! derived field is read from the wrapped subtree on demand:
//!
//! - `id`: the structural path of the element joined with the `v=` id of its
//!   watch link. Only a successful derivation is cached; a failed one is
//!   retried on the next [`Video::get_id`].
//! - `title`: same caching policy as `id`.
//! - `viewed`: never cached across calls, because the threshold is supplied
//!   per call. [`Video::get_viewed`] always overwrites it.
//!
//! Lookups that find nothing return `None`. A missing title or watch link is
//! logged as a warning since it points at an unsupported layout; a missing
//! progress bar is the normal state of an unwatched video and only logged at
//! debug level. These events go to the dispatch attached with
//! [`Video::with_dispatch`] when there is one.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn, Dispatch};

use crate::dom::{style, Element};
use crate::extractor::in_dispatch;

/// Watch links, in priority order. The first selector with a match wins.
pub const URL_SELECTORS: &[&str] = &[
    "a#video-title-link",
    "a#video-title",
    "a#thumbnail",
    "a#wc-endpoint",
];

/// Title element of the legacy layouts, which carries a `title` attribute.
pub const TITLE_SELECTOR: &str = "a#video-title";

/// Title element of the current layouts.
pub const TITLE_FALLBACK_SELECTOR: &str = "#video-title";

/// Watched-progress segment of the sidebar lockups.
pub const PROGRESS_SIDEBAR_SELECTOR: &str =
    ".ytThumbnailOverlayProgressBarHostWatchedProgressBarSegment";

/// Watched-progress bar of the thumbnail overlay used everywhere else.
pub const PROGRESS_SELECTOR: &str = "ytd-thumbnail-overlay-resume-playback-renderer #progress";

/// CSS display value applied by [`Video::hide`].
pub const HIDDEN_DISPLAY: &str = "none";

/// Separates the structural path from the video id inside an identity.
const ID_SEPARATOR: char = '#';

static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"v=([a-zA-Z0-9_-]+)").unwrap());

/// Extracts the `v=` video id from a watch link.
pub fn parse_video_id(href: &str) -> Option<&str> {
    VIDEO_ID_RE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A video entry on the page.
#[derive(Debug, Clone)]
pub struct Video<E: Element> {
    element: E,
    display: String,
    id: Option<String>,
    title: Option<String>,
    viewed: Option<bool>,
    dispatch: Option<Dispatch>,
}

impl<E: Element> Video<E> {
    /// Wraps `element`, capturing its current inline display value.
    pub fn new(element: E) -> Self {
        let display = element.style_property("display");
        Self {
            element,
            display,
            id: None,
            title: None,
            viewed: None,
            dispatch: None,
        }
    }

    /// Sends the log events of later lookups to `dispatch` instead of the global default.
    pub fn with_dispatch(mut self, dispatch: Option<Dispatch>) -> Self {
        self.dispatch = dispatch;
        self
    }

    fn logged<T>(&self, f: impl FnOnce() -> T) -> T {
        in_dispatch(self.dispatch.as_ref(), f)
    }

    /// The wrapped element.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// The inline display value captured at construction.
    pub fn original_display(&self) -> &str {
        &self.display
    }

    /// Finds the watch link and returns its `v=` video id.
    pub fn derive_url(&self) -> Option<String> {
        let anchor = URL_SELECTORS
            .iter()
            .find_map(|selector| self.element.query(selector));

        self.logged(|| {
            let Some(anchor) = anchor else {
                warn!("no watch link found for video element");
                return None;
            };
            let href = anchor.attr("href").unwrap_or_default();
            match parse_video_id(&href) {
                Some(video_id) => Some(video_id.to_string()),
                None => {
                    warn!(href = %href, "watch link has no video id");
                    None
                }
            }
        })
    }

    /// Computes the sibling-index path from the top of the tree down to the element.
    ///
    /// Renderer elements carry no unique attribute, so the position in the
    /// tree is what tells two renderers of the same video apart.
    pub fn derive_path(&self) -> String {
        let mut indices = Vec::new();
        let mut node = self.element.clone();
        while let Some(parent) = node.parent() {
            indices.push(node.preceding_siblings());
            node = parent;
        }

        indices
            .iter()
            .rev()
            .map(|i| format!("/{}", i))
            .collect()
    }

    /// Derives the identity and stores it, clearing it when derivation fails.
    ///
    /// Both the path and the video id must be present.
    pub fn fetch_id(&mut self) -> Option<&str> {
        let path = self.derive_path();
        let video_id = self.derive_url();

        self.id = match video_id {
            Some(video_id) if !path.is_empty() && !video_id.is_empty() => {
                Some(format!("{}{}{}", path, ID_SEPARATOR, video_id))
            }
            _ => None,
        };
        self.id.as_deref()
    }

    /// Returns the memoized identity, deriving it if not yet known.
    pub fn get_id(&mut self) -> Option<&str> {
        if self.id.is_some() {
            return self.id.as_deref();
        }
        self.fetch_id()
    }

    /// The video id part of a successfully derived identity.
    pub fn video_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .and_then(|id| id.rsplit_once(ID_SEPARATOR))
            .map(|(_, video_id)| video_id)
    }

    /// Looks up the title and stores the result.
    pub fn fetch_title(&mut self) -> Option<&str> {
        let element = self
            .element
            .query(TITLE_SELECTOR)
            .or_else(|| self.element.query(TITLE_FALLBACK_SELECTOR));

        let title = match element {
            Some(el) => {
                let title = el
                    .attr("title")
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| el.text().trim().to_string());
                Some(title)
            }
            None => {
                self.logged(|| warn!("no title element found for video element"));
                None
            }
        };
        self.title = title;
        self.title.as_deref()
    }

    /// Returns the memoized title, looking it up if not yet known.
    pub fn get_title(&mut self) -> Option<&str> {
        if self.title.as_deref().is_some_and(|t| !t.is_empty()) {
            return self.title.as_deref();
        }
        self.fetch_title()
    }

    fn progress_bar(&self) -> Option<E> {
        self.element
            .query(PROGRESS_SIDEBAR_SELECTOR)
            .or_else(|| self.element.query(PROGRESS_SELECTOR))
    }

    /// Returns the watched percentage shown by the progress bar.
    ///
    /// `None` when there is no bar or its width is not a number.
    pub fn progress(&self) -> Option<i64> {
        self.progress_bar()
            .and_then(|bar| style::parse_percent(&bar.style_property("width")))
    }

    /// Decides whether at least `threshold` percent of the video was watched.
    ///
    /// Returns `None` when the video has no progress bar. A bar whose width
    /// cannot be parsed counts as not watched.
    pub fn get_viewed(&mut self, threshold: u8) -> Option<bool> {
        let viewed = match self.progress_bar() {
            Some(bar) => {
                let width = bar.style_property("width");
                Some(style::parse_percent(&width).is_some_and(|p| p >= i64::from(threshold)))
            }
            None => {
                self.logged(|| debug!("no progress bar, video is unwatched"));
                None
            }
        };
        self.viewed = viewed;
        self.viewed
    }

    /// The verdict of the last [`Video::get_viewed`] call.
    pub fn viewed(&self) -> Option<bool> {
        self.viewed
    }

    /// Hides the element.
    pub fn hide(&self) {
        self.element.set_style_property("display", HIDDEN_DISPLAY);
    }

    /// Restores the display value captured at construction.
    pub fn show(&self) {
        self.element.set_style_property("display", &self.display);
    }

    /// Returns true if the element is currently hidden.
    pub fn is_hidden(&self) -> bool {
        self.element.style_property("display") == HIDDEN_DISPLAY
    }
}
