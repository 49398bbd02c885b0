// ABOUTME: Hide settings (enabled flag, watched threshold, enabled layouts) and the ExtractorBuilder.
// ABOUTME: Settings load from the JSON document the extension stores; the builder wires an Extractor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::Dispatch;

use crate::dom::Element;
use crate::error::ConfigError;
use crate::extractor::Extractor;
use crate::extractors::layouts::{builtin_layout, builtin_layout_names, LayoutSubextractor, Subextractor};

/// Threshold used when the settings do not name one.
pub const DEFAULT_THRESHOLD: u8 = 90;

/// Validates a watched threshold, which is a percentage.
pub fn check_threshold(value: i64) -> Result<u8, ConfigError> {
    u8::try_from(value)
        .ok()
        .filter(|t| *t <= 100)
        .ok_or(ConfigError::Threshold(value))
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    enabled: Option<bool>,
    threshold: Option<i64>,
    layouts: Option<Vec<String>>,
}

/// User-facing hide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSettings")]
pub struct Settings {
    /// Whether watched videos get hidden at all.
    pub enabled: bool,
    /// Minimum watched percentage for a video to count as watched.
    pub threshold: u8,
    /// Names of the layouts to scan.
    pub layouts: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_THRESHOLD,
            layouts: builtin_layout_names()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let defaults = Settings::default();
        let settings = Settings {
            enabled: raw.enabled.unwrap_or(defaults.enabled),
            threshold: match raw.threshold {
                Some(t) => check_threshold(t)?,
                None => defaults.threshold,
            },
            layouts: raw.layouts.unwrap_or(defaults.layouts),
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Settings {
    /// Parses and validates a settings JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = serde_json::from_str(json)?;
        Settings::try_from(raw)
    }

    /// Checks the threshold range and that every layout name is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold(i64::from(self.threshold))?;
        if let Some(unknown) = self.layouts.iter().find(|n| builtin_layout(n).is_none()) {
            return Err(ConfigError::unknown_layout(unknown.as_str()));
        }
        Ok(())
    }
}

/// Builder for [`Extractor`] instances.
pub struct ExtractorBuilder<E: Element> {
    subextractors: Vec<Arc<dyn Subextractor<E>>>,
    dispatch: Option<Dispatch>,
}

impl<E: Element> ExtractorBuilder<E> {
    /// Creates a builder with no subextractors.
    pub fn new() -> Self {
        Self {
            subextractors: Vec::new(),
            dispatch: None,
        }
    }

    /// Adds one layout.
    pub fn layout(mut self, layout: LayoutSubextractor) -> Self {
        self.subextractors.push(Arc::new(layout));
        self
    }

    /// Adds every built-in layout.
    pub fn builtin_layouts(self) -> Self {
        crate::extractors::layouts::BUILTIN_LAYOUTS
            .iter()
            .fold(self, |builder, layout| builder.layout(*layout))
    }

    /// Adds the built-in layouts with the given names, in the given order.
    pub fn layouts_named<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, ConfigError> {
        for name in names {
            let name = name.as_ref();
            let layout = builtin_layout(name).ok_or_else(|| ConfigError::unknown_layout(name))?;
            self = self.layout(layout);
        }
        Ok(self)
    }

    /// Adds a custom subextractor. The same handle is only registered once.
    pub fn subextractor(mut self, subextractor: Arc<dyn Subextractor<E>>) -> Self {
        self.subextractors.push(subextractor);
        self
    }

    /// Routes every log event raised during extraction to `dispatch`.
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Builds the Extractor.
    pub fn build(self) -> Extractor<E> {
        let mut extractor = Extractor::new();
        for subextractor in self.subextractors {
            extractor.insert(subextractor);
        }
        if let Some(dispatch) = self.dispatch {
            extractor.set_dispatch(dispatch);
        }
        extractor
    }
}

impl<E: Element> Default for ExtractorBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
