// ABOUTME: HideSession drives repeated scans, hiding watched videos and remembering every element it hid.
// ABOUTME: Restoring shows each of them again with the display value it had before the first hide.

//! The scan driver.
//!
//! A page keeps changing while the user scrolls, so the same page is scanned
//! again and again. [`HideSession`] keeps every video it hid: by
//! [`Video::get_id`] when the video has one, by element otherwise. A rescan
//! therefore never captures an already hidden element's `display: none` as its
//! original value, and everything can be shown again when hiding is switched
//! off.
//!
//! Elements the page has since removed are dropped on the next scan, so the
//! session holds no more videos than the page does.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::dom::Element;
use crate::error::ConfigError;
use crate::extractor::{in_dispatch, Extractor};
use crate::options::{check_threshold, Settings};
use crate::video::Video;

/// Counts from one [`HideSession::scan`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Watched videos found by the extractor.
    pub watched: usize,
    /// Videos with an id hidden for the first time by this scan.
    pub newly_hidden: usize,
    /// Videos already hidden by an earlier scan.
    pub already_hidden: usize,
    /// Videos without an id hidden for the first time by this scan.
    pub untracked: usize,
    /// Hidden videos whose element is no longer in the page.
    pub dropped: usize,
}

/// Hides watched videos across scans.
pub struct HideSession<E: Element> {
    extractor: Extractor<E>,
    settings: Settings,
    hidden: HashMap<String, Video<E>>,
    untracked: Vec<Video<E>>,
}

impl<E: Element> HideSession<E> {
    pub fn new(extractor: Extractor<E>, settings: Settings) -> Self {
        Self {
            extractor,
            settings,
            hidden: HashMap::new(),
            untracked: Vec::new(),
        }
    }

    /// Builds the extractor from `settings` too.
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let extractor = Extractor::from_settings(&settings)?;
        Ok(Self::new(extractor, settings))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn extractor(&self) -> &Extractor<E> {
        &self.extractor
    }

    /// Scans `root` and hides the watched videos.
    ///
    /// Does nothing while the session is disabled. Log events go to the
    /// extractor's dispatch when it has one.
    pub fn scan(&mut self, root: &E) -> ScanReport {
        let dispatch = self.extractor.dispatch().cloned();
        in_dispatch(dispatch.as_ref(), || self.scan_page(root))
    }

    fn scan_page(&mut self, root: &E) -> ScanReport {
        let mut report = ScanReport::default();
        if !self.settings.enabled {
            debug!("hiding disabled, skipping scan");
            return report;
        }

        let watched = self.extractor.extract(root, self.settings.threshold);
        report.watched = watched.len();

        for mut video in watched {
            match video.get_id().map(str::to_string) {
                Some(id) => self.hide_tracked(id, video, &mut report),
                None => self.hide_untracked(video, &mut report),
            }
        }
        report.dropped = self.drop_removed(root);

        info!(
            watched = report.watched,
            newly_hidden = report.newly_hidden,
            already_hidden = report.already_hidden,
            untracked = report.untracked,
            dropped = report.dropped,
            "scan finished"
        );
        report
    }

    fn hide_tracked(&mut self, id: String, video: Video<E>, report: &mut ScanReport) {
        let tracked = self
            .hidden
            .get(&id)
            .map(|t| t.element().same_node(video.element()));
        if tracked == Some(true) {
            report.already_hidden += 1;
            return;
        }

        // Keep the wrapper from the first hide so its original display survives.
        let video = match self.take_hidden(video.element()) {
            Some(earlier) => {
                report.already_hidden += 1;
                earlier
            }
            None => {
                // Some(false): a re-rendered element for a video hidden earlier.
                if tracked.is_some() {
                    report.already_hidden += 1;
                } else {
                    report.newly_hidden += 1;
                }
                video
            }
        };
        video.hide();
        self.hidden.insert(id, video);
    }

    fn hide_untracked(&mut self, video: Video<E>, report: &mut ScanReport) {
        let known = self
            .hidden
            .values()
            .chain(&self.untracked)
            .any(|v| v.element().same_node(video.element()));
        if known {
            report.already_hidden += 1;
            return;
        }

        video.hide();
        self.untracked.push(video);
        report.untracked += 1;
    }

    /// Removes and returns the video hidden earlier for `element`, under any id or none.
    fn take_hidden(&mut self, element: &E) -> Option<Video<E>> {
        if let Some(pos) = self
            .untracked
            .iter()
            .position(|v| v.element().same_node(element))
        {
            return Some(self.untracked.swap_remove(pos));
        }
        let id = self
            .hidden
            .iter()
            .find(|(_, v)| v.element().same_node(element))
            .map(|(id, _)| id.clone())?;
        self.hidden.remove(&id)
    }

    /// Forgets hidden videos whose element is no longer part of the page `root` is in.
    fn drop_removed(&mut self, root: &E) -> usize {
        let page = root.top();
        let before = self.hidden.len() + self.untracked.len();
        self.hidden
            .retain(|_, v| v.element().top().same_node(&page));
        self.untracked
            .retain(|v| v.element().top().same_node(&page));
        before - self.hidden.len() - self.untracked.len()
    }

    /// Shows every hidden video again and forgets them. Returns how many were restored.
    pub fn restore_all(&mut self) -> usize {
        let dispatch = self.extractor.dispatch().cloned();
        in_dispatch(dispatch.as_ref(), || {
            let count = self.hidden.len() + self.untracked.len();
            for video in self.hidden.values().chain(&self.untracked) {
                video.show();
            }
            self.hidden.clear();
            self.untracked.clear();
            info!(restored = count, "restored hidden videos");
            count
        })
    }

    /// Returns true if a video with this id is currently hidden by the session.
    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains_key(id)
    }

    /// Number of hidden videos that have an id.
    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    /// Number of hidden videos without an id, remembered by element.
    pub fn untracked_count(&self) -> usize {
        self.untracked.len()
    }

    /// Ids of the hidden videos, sorted.
    pub fn hidden_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.hidden.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Changes the threshold used by later scans.
    ///
    /// Videos hidden under the old threshold stay hidden until restored.
    pub fn set_threshold(&mut self, threshold: i64) -> Result<(), ConfigError> {
        self.settings.threshold = check_threshold(threshold)?;
        Ok(())
    }

    /// Enables or disables hiding. Disabling restores everything.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
        if !enabled {
            self.restore_all();
        }
    }
}
