// ABOUTME: SelectorCache maps selector text to its compiled Matcher, shared by every DOM query.
// ABOUTME: A selector that fails to parse is stored as a miss and warned about once.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dom_query::Matcher;
use once_cell::sync::Lazy;
use tracing::warn;

static GLOBAL: Lazy<SelectorCache> = Lazy::new(SelectorCache::default);

/// The cache used by [`HtmlElement`](crate::dom::HtmlElement) queries.
pub fn global() -> &'static SelectorCache {
    &GLOBAL
}

/// Compiled selectors keyed by source text. `None` marks a selector that does not parse.
#[derive(Default)]
pub struct SelectorCache {
    compiled: RwLock<HashMap<String, Option<Matcher>>>,
}

fn compile(css: &str) -> Option<Matcher> {
    Matcher::new(css)
        .map_err(|_| warn!(selector = css, "invalid CSS selector, it will match nothing"))
        .ok()
}

impl SelectorCache {
    /// Returns the matcher for `css`, compiling it on first use.
    pub fn matcher(&self, css: &str) -> Option<Matcher> {
        let hit = self.read().get(css).cloned();
        match hit {
            Some(matcher) => matcher,
            None => self
                .write()
                .entry(css.to_owned())
                .or_insert_with(|| compile(css))
                .clone(),
        }
    }

    /// Compiles `selectors` up front. Returns how many of them are invalid.
    pub fn warm<'s>(&self, selectors: impl IntoIterator<Item = &'s str>) -> usize {
        let mut compiled = self.write();
        selectors
            .into_iter()
            .filter(|css| {
                compiled
                    .entry((*css).to_owned())
                    .or_insert_with(|| compile(css))
                    .is_none()
            })
            .count()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Poisoning only means a panic elsewhere while holding the lock; entries are never half-written.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Option<Matcher>>> {
        self.compiled.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Option<Matcher>>> {
        self.compiled.write().unwrap_or_else(PoisonError::into_inner)
    }
}
