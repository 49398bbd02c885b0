// ABOUTME: Subextractor trait and the built-in per-layout selector lists for YouTube pages.
// ABOUTME: Each layout contributes every element matched by its selectors, in selector-list order.

//! Page-layout subextractors.
//!
//! YouTube renders video entries with a different custom element depending on
//! the page (home feed, search, history, ...) and has changed those elements
//! over time. Each [`LayoutSubextractor`] owns the selectors for one layout,
//! legacy variants included, and reports every match under a scan root.

use crate::dom::Element;

/// A strategy that finds raw video elements under a root element.
///
/// Closures of type `Fn(&E) -> Vec<E>` are subextractors too.
pub trait Subextractor<E: Element> {
    /// Human-readable name used in logs and settings.
    fn name(&self) -> &str {
        "custom"
    }

    /// Returns the matched elements under `root`, in document order.
    fn extract(&self, root: &E) -> Vec<E>;
}

impl<E, F> Subextractor<E> for F
where
    E: Element,
    F: Fn(&E) -> Vec<E>,
{
    fn extract(&self, root: &E) -> Vec<E> {
        self(root)
    }
}

/// A subextractor defined by a fixed list of CSS selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSubextractor {
    pub name: &'static str,
    pub selectors: &'static [&'static str],
}

impl<E: Element> Subextractor<E> for LayoutSubextractor {
    fn name(&self) -> &str {
        self.name
    }

    /// Concatenates matches per selector; an element matched by two
    /// selectors of the same layout appears twice.
    fn extract(&self, root: &E) -> Vec<E> {
        self.selectors
            .iter()
            .flat_map(|selector| root.query_all(selector))
            .collect()
    }
}

/// Home feed, rich grid and its legacy renderer.
pub const HOME: LayoutSubextractor = LayoutSubextractor {
    name: "home",
    selectors: &["ytd-rich-grid-video-renderer", "ytd-rich-item-renderer"],
};

pub const SEARCH: LayoutSubextractor = LayoutSubextractor {
    name: "search",
    selectors: &["ytd-search ytd-video-renderer"],
};

pub const HISTORY: LayoutSubextractor = LayoutSubextractor {
    name: "history",
    selectors: &[r#"ytd-browse[page-subtype="history"] ytd-video-renderer"#],
};

/// Playlist pages and the playlist panel next to the player.
pub const PLAYLIST: LayoutSubextractor = LayoutSubextractor {
    name: "playlist",
    selectors: &[
        "ytd-playlist-video-renderer",
        "ytd-playlist-panel-video-renderer",
    ],
};

/// Sidebar recommendations on the watch page.
pub const RECOMMENDATIONS: LayoutSubextractor = LayoutSubextractor {
    name: "recommendations",
    selectors: &[
        "ytd-compact-video-renderer",
        "ytd-watch-next-secondary-results-renderer yt-lockup-view-model",
    ],
};

/// Trending/explore, which was served under both page subtypes.
pub const EXPLORE: LayoutSubextractor = LayoutSubextractor {
    name: "explore",
    selectors: &[
        r#"ytd-browse[page-subtype="trending"] ytd-video-renderer"#,
        r#"ytd-browse[page-subtype="explore"] ytd-video-renderer"#,
    ],
};

/// Channel and subscription grids.
pub const GRID: LayoutSubextractor = LayoutSubextractor {
    name: "grid",
    selectors: &["ytd-grid-video-renderer"],
};

/// Every built-in layout, in registration order.
pub const BUILTIN_LAYOUTS: &[LayoutSubextractor] =
    &[HOME, SEARCH, HISTORY, PLAYLIST, RECOMMENDATIONS, EXPLORE, GRID];

/// Looks up a built-in layout by name.
pub fn builtin_layout(name: &str) -> Option<LayoutSubextractor> {
    BUILTIN_LAYOUTS.iter().copied().find(|l| l.name == name)
}

/// Every selector the built-in layouts and the video model query with.
pub fn builtin_selectors() -> impl Iterator<Item = &'static str> {
    use crate::video;

    BUILTIN_LAYOUTS
        .iter()
        .flat_map(|l| l.selectors.iter().copied())
        .chain(video::URL_SELECTORS.iter().copied())
        .chain([
            video::TITLE_SELECTOR,
            video::TITLE_FALLBACK_SELECTOR,
            video::PROGRESS_SIDEBAR_SELECTOR,
            video::PROGRESS_SELECTOR,
        ])
}

/// Returns the names of every built-in layout.
pub fn builtin_layout_names() -> Vec<&'static str> {
    BUILTIN_LAYOUTS.iter().map(|l| l.name).collect()
}
