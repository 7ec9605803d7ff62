//! PanierDriver - abstract browser automation trait
//!
//! The scenario only ever talks to a `Page`, and the page only ever talks to
//! a driver. Two implementations ship with the crate:
//!
//! - `ChromiumDriver` (feature `browser`): real Chromium over CDP via chromiumoxide
//! - `MockDriver`: in-memory element tree, for tests
//!
//! Drivers answer single questions about the current document ("how many
//! elements match?", "what is the text of match 0?"). Waiting, strictness and
//! actionability policy live in `Page`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::locator::{ClickOptions, Selector};
use crate::result::PanierResult;

/// Whether an element can take a real pointer click
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actionability {
    /// Rendered with a non-empty box
    pub visible: bool,
    /// Not `disabled` / `aria-disabled`
    pub enabled: bool,
    /// The element (or a descendant) is the hit target at its centre
    pub receives_events: bool,
    /// Has a non-empty layout box, so its centre is a real point
    #[serde(default)]
    pub has_box: bool,
    /// Centre x in CSS pixels
    #[serde(default)]
    pub x: f64,
    /// Centre y in CSS pixels
    #[serde(default)]
    pub y: f64,
}

impl Actionability {
    /// A fully actionable element at the given point
    #[must_use]
    pub const fn ready_at(x: f64, y: f64) -> Self {
        Self {
            visible: true,
            enabled: true,
            receives_events: true,
            has_box: true,
            x,
            y,
        }
    }

    /// First reason the element cannot be clicked, if any
    #[must_use]
    pub const fn blocker(&self) -> Option<&'static str> {
        if !self.visible {
            Some("element is not visible")
        } else if !self.enabled {
            Some("element is disabled")
        } else if !self.receives_events {
            Some("another element would receive the click")
        } else {
            None
        }
    }

    /// Whether a normal click may proceed
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        self.blocker().is_none()
    }

    /// How a forced click reaches the element.
    ///
    /// Blockers are ignored: the mouse goes to the centre as long as there is
    /// a box to aim at. An element without a box has no centre, so the click
    /// is dispatched on the element itself.
    #[must_use]
    pub const fn forced_click(&self) -> ForcedClick {
        if self.has_box {
            ForcedClick::Mouse {
                x: self.x,
                y: self.y,
            }
        } else {
            ForcedClick::Dom
        }
    }
}

/// Delivery of a forced click
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForcedClick {
    /// Pointer events at the element centre, in CSS pixels
    Mouse {
        /// Centre x
        x: f64,
        /// Centre y
        y: f64,
    },
    /// `click` event dispatched on the element
    Dom,
}

/// Abstract driver trait for browser automation
#[async_trait]
pub trait PanierDriver: Send + Sync {
    /// Navigate to URL and wait for the load event
    async fn navigate(&mut self, url: &str) -> PanierResult<()>;

    /// URL of the current document
    async fn current_url(&self) -> PanierResult<String>;

    /// Number of elements matching the selector right now
    async fn count(&self, selector: &Selector) -> PanierResult<usize>;

    /// Text content of match `index`, `None` if there is no such match
    async fn text_content(&self, selector: &Selector, index: usize)
        -> PanierResult<Option<String>>;

    /// Actionability of match `index`, `None` if there is no such match
    async fn actionability(
        &self,
        selector: &Selector,
        index: usize,
    ) -> PanierResult<Option<Actionability>>;

    /// Click match `index` at its centre, like a user would.
    ///
    /// `options.force` only skips the checks; see `Actionability::forced_click`.
    async fn click(
        &mut self,
        selector: &Selector,
        index: usize,
        options: &ClickOptions,
    ) -> PanierResult<()>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> PanierResult<Vec<u8>>;

    /// Close the page and release the browser
    async fn close(&mut self) -> PanierResult<()>;
}
