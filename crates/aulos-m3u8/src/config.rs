#![forbid(unsafe_code)]

//! Parser and per-parse configuration.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use url::Url;

use crate::attrs::AttributeMap;
use crate::model::Define;
use crate::state::SharedState;
use crate::warning::WarnHandler;

/// Borrowed view of one custom tag occurrence.
#[derive(Debug, Clone, Copy)]
pub struct CustomTag<'a> {
    /// Tag name without the leading `#`.
    pub key: &'a str,
    /// Raw value when the body was a bare value.
    pub value: Option<&'a str>,
    /// Parsed attributes when the body was an attribute list.
    pub attributes: Option<&'a AttributeMap>,
}

/// Handler for a caller-registered tag. Receives the tag, the playlist's
/// opaque custom map, and a read-only view of the shared state.
pub type CustomTagHandler =
    Arc<dyn Fn(CustomTag<'_>, &mut serde_json::Map<String, serde_json::Value>, &SharedState) + Send + Sync>;

/// Pre-dispatch hook over a value tag's raw value. Returning `None` skips
/// the tag with a missing-value warning.
pub type ValueTransform = Arc<dyn Fn(&str, Option<String>) -> Option<String> + Send + Sync>;

/// Pre-dispatch hook over an attribute tag's attribute map.
pub type AttributeTransform = Arc<dyn Fn(&str, AttributeMap) -> AttributeMap + Send + Sync>;

/// Per-parser configuration: callbacks and dispatch hooks.
#[derive(Clone, Default)]
pub struct ParserOptions {
    /// Callback receiving every diagnostic.
    pub on_warning: Option<WarnHandler>,
    /// Handlers for tags outside the built-in registry, keyed by tag name.
    pub custom_tags: HashMap<String, CustomTagHandler>,
    /// Tags skipped (with a warning) before any other dispatch step.
    pub ignore_tags: HashSet<String>,
    /// Hook applied to every value tag before its processor runs.
    pub transform_value: Option<ValueTransform>,
    /// Hook applied to every attribute tag before its processor runs.
    pub transform_attributes: Option<AttributeTransform>,
}

impl std::fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserOptions")
            .field("on_warning", &self.on_warning.as_ref().map(|_| "WarnHandler"))
            .field(
                "custom_tags",
                &self.custom_tags.keys().collect::<Vec<_>>(),
            )
            .field("ignore_tags", &self.ignore_tags)
            .field(
                "transform_value",
                &self.transform_value.as_ref().map(|_| "ValueTransform"),
            )
            .field(
                "transform_attributes",
                &self
                    .transform_attributes
                    .as_ref()
                    .map(|_| "AttributeTransform"),
            )
            .finish()
    }
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the warning callback.
    pub fn with_warning_handler(mut self, handler: WarnHandler) -> Self {
        self.on_warning = Some(handler);
        self
    }

    /// Register a handler for a tag outside the built-in registry.
    pub fn with_custom_tag(mut self, tag: impl Into<String>, handler: CustomTagHandler) -> Self {
        self.custom_tags.insert(tag.into(), handler);
        self
    }

    /// Skip a tag (with a warning) whenever it appears.
    pub fn with_ignored_tag(mut self, tag: impl Into<String>) -> Self {
        self.ignore_tags.insert(tag.into());
        self
    }

    /// Set the value-tag pre-dispatch hook.
    pub fn with_value_transform(mut self, transform: ValueTransform) -> Self {
        self.transform_value = Some(transform);
        self
    }

    /// Set the attribute-tag pre-dispatch hook.
    pub fn with_attribute_transform(mut self, transform: AttributeTransform) -> Self {
        self.transform_attributes = Some(transform);
        self
    }
}

/// Per-parse inputs.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Base URL for URI resolution and QUERYPARAM variables.
    pub base_url: Option<Url>,
    /// Variable scope consulted by `EXT-X-DEFINE:IMPORT`.
    pub base_define: Option<Define>,
    /// Offset added to the first segment's start time, in seconds.
    pub base_time: f64,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_base_define(mut self, base_define: Define) -> Self {
        self.base_define = Some(base_define);
        self
    }

    pub fn with_base_time(mut self, base_time: f64) -> Self {
        self.base_time = base_time;
        self
    }
}
