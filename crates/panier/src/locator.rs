//! Locator abstraction for element selection.
//!
//! A `Locator` is plain data: it says how to find an element, and the `Page`
//! resolves it against a driver with auto-waiting. Locators compose the way the
//! cart scenario needs them to:
//!
//! ```ignore
//! let add = Locator::new("article")
//!     .with_text("La Tomate grappe sélection HVE")
//!     .locator("button")
//!     .with_text("Ajouter le produit")
//!     .first();
//! ```
//!
//! Without `first()`/`nth()`, a locator is strict: acting on it fails when it
//! matches more than one element.

use std::fmt;
use std::time::Duration;

use crate::text::TextMatch;

/// Default timeout for auto-waiting actions (10 seconds)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 10_000;

/// Default timeout for `expect()` assertions (5 seconds)
pub const DEFAULT_EXPECT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval for auto-waiting (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// ARIA roles the locators can select on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    /// `role="button"`, `<button>`, button-like `<input>`
    Button,
    /// `role="dialog"`, `<dialog>`
    Dialog,
    /// `role="alertdialog"`
    AlertDialog,
    /// `<a href>`
    Link,
    /// `<article>`
    Article,
    /// `<h1>`..`<h6>`
    Heading,
    /// `<ul>`, `<ol>`
    List,
    /// `<li>`
    ListItem,
    /// `<nav>`
    Navigation,
    /// `<main>`
    Main,
    /// `<img>`
    Img,
    /// Text inputs and `<textarea>`
    Textbox,
    /// `<input type="checkbox">`
    Checkbox,
    /// `<input type="search">`
    Searchbox,
    /// `<form>`
    Form,
    /// `<section>` and `role="region"`
    Region,
}

/// Implicit roles by tag name. `<a>` and `<input>` need attributes and are
/// handled in [`implicit_role`].
pub const IMPLICIT_ROLES: &[(&str, AriaRole)] = &[
    ("button", AriaRole::Button),
    ("dialog", AriaRole::Dialog),
    ("article", AriaRole::Article),
    ("h1", AriaRole::Heading),
    ("h2", AriaRole::Heading),
    ("h3", AriaRole::Heading),
    ("h4", AriaRole::Heading),
    ("h5", AriaRole::Heading),
    ("h6", AriaRole::Heading),
    ("ul", AriaRole::List),
    ("ol", AriaRole::List),
    ("li", AriaRole::ListItem),
    ("nav", AriaRole::Navigation),
    ("main", AriaRole::Main),
    ("img", AriaRole::Img),
    ("textarea", AriaRole::Textbox),
    ("form", AriaRole::Form),
    ("section", AriaRole::Region),
];

impl AriaRole {
    /// Every role, in declaration order
    pub const ALL: [Self; 16] = [
        Self::Button,
        Self::Dialog,
        Self::AlertDialog,
        Self::Link,
        Self::Article,
        Self::Heading,
        Self::List,
        Self::ListItem,
        Self::Navigation,
        Self::Main,
        Self::Img,
        Self::Textbox,
        Self::Checkbox,
        Self::Searchbox,
        Self::Form,
        Self::Region,
    ];

    /// The role token as written in a `role` attribute
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Dialog => "dialog",
            Self::AlertDialog => "alertdialog",
            Self::Link => "link",
            Self::Article => "article",
            Self::Heading => "heading",
            Self::List => "list",
            Self::ListItem => "listitem",
            Self::Navigation => "navigation",
            Self::Main => "main",
            Self::Img => "img",
            Self::Textbox => "textbox",
            Self::Checkbox => "checkbox",
            Self::Searchbox => "searchbox",
            Self::Form => "form",
            Self::Region => "region",
        }
    }

    /// Parse a role token (case-insensitive)
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|role| role.as_str() == token)
    }
}

impl fmt::Display for AriaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the role of an element from its markup.
///
/// An explicit `role` attribute wins (its first token); otherwise the implicit
/// role of the tag applies.
#[must_use]
pub fn implicit_role(
    tag: &str,
    explicit: Option<&str>,
    input_type: Option<&str>,
    has_href: bool,
) -> Option<AriaRole> {
    if let Some(explicit) = explicit.and_then(|r| r.split_whitespace().next()) {
        return AriaRole::parse(explicit);
    }
    let tag = tag.to_ascii_lowercase();
    match tag.as_str() {
        "a" if has_href => Some(AriaRole::Link),
        "input" => {
            let kind = input_type.unwrap_or("text").to_ascii_lowercase();
            match kind.as_str() {
                "button" | "submit" | "reset" | "image" => Some(AriaRole::Button),
                "checkbox" => Some(AriaRole::Checkbox),
                "search" => Some(AriaRole::Searchbox),
                "hidden" => None,
                _ => Some(AriaRole::Textbox),
            }
        }
        _ => IMPLICIT_ROLES
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, role)| *role),
    }
}

/// Options for role-based selection (Playwright's `getByRole` options)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleOptions {
    /// Accessible name filter
    pub name: Option<String>,
    /// Match the name exactly (case-sensitive, whole string)
    pub exact: bool,
    /// Also match elements that are not rendered
    pub include_hidden: bool,
}

impl RoleOptions {
    /// Filter by accessible name
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Require an exact name match
    #[must_use]
    pub const fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    /// Include hidden elements
    #[must_use]
    pub const fn include_hidden(mut self) -> Self {
        self.include_hidden = true;
        self
    }

    /// Text rule for the name filter
    #[must_use]
    pub const fn name_match(&self) -> TextMatch {
        if self.exact {
            TextMatch::Exact
        } else {
            TextMatch::Substring
        }
    }
}

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g., "article")
    Css(String),
    /// Elements of `inner` whose text contains `text` (case-insensitive)
    HasText {
        /// Selector being filtered
        inner: Box<Selector>,
        /// Text to look for
        text: String,
    },
    /// Elements with an ARIA role and optional accessible name
    Role {
        /// Role to match
        role: AriaRole,
        /// Name and visibility options
        options: RoleOptions,
    },
    /// Elements matching `descendant` inside any match of `ancestor`
    Descendant {
        /// Scope
        ancestor: Box<Selector>,
        /// Selector evaluated inside each scope element
        descendant: Box<Selector>,
    },
    /// The `index`-th match of `inner`
    Nth {
        /// Selector being indexed
        inner: Box<Selector>,
        /// Zero-based index
        index: usize,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a role selector
    #[must_use]
    pub const fn role(role: AriaRole, options: RoleOptions) -> Self {
        Self::Role { role, options }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "css={css}"),
            Self::HasText { inner, text } => write!(f, "{inner} >> has-text={text:?}"),
            Self::Role { role, options } => {
                write!(f, "role={role}")?;
                if let Some(ref name) = options.name {
                    let flag = if options.exact { "s" } else { "i" };
                    write!(f, "[name={name:?}{flag}]")?;
                }
                if options.include_hidden {
                    write!(f, "[include-hidden]")?;
                }
                Ok(())
            }
            Self::Descendant {
                ancestor,
                descendant,
            } => write!(f, "{ancestor} >> {descendant}"),
            Self::Nth { inner, index } => write!(f, "{inner} >> nth={index}"),
        }
    }
}

/// A locator for finding elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: Selector::Css(selector.into()),
        }
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self { selector }
    }

    /// Locate by ARIA role
    #[must_use]
    pub const fn by_role(role: AriaRole, options: RoleOptions) -> Self {
        Self {
            selector: Selector::role(role, options),
        }
    }

    /// Keep only matches whose text contains `text`
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Self {
            selector: Selector::HasText {
                inner: Box::new(self.selector),
                text: text.into(),
            },
        }
    }

    /// Find `css` inside the elements matched so far
    #[must_use]
    pub fn locator(self, css: impl Into<String>) -> Self {
        self.descend(Selector::Css(css.into()))
    }

    /// Find a role inside the elements matched so far
    #[must_use]
    pub fn get_by_role(self, role: AriaRole, options: RoleOptions) -> Self {
        self.descend(Selector::role(role, options))
    }

    fn descend(self, descendant: Selector) -> Self {
        Self {
            selector: Selector::Descendant {
                ancestor: Box::new(self.selector),
                descendant: Box::new(descendant),
            },
        }
    }

    /// Select the first match
    #[must_use]
    pub fn first(self) -> Self {
        self.nth(0)
    }

    /// Select the `index`-th match (zero-based)
    #[must_use]
    pub fn nth(self, index: usize) -> Self {
        Self {
            selector: Selector::Nth {
                inner: Box::new(self.selector),
                index,
            },
        }
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Whether acting on this locator requires a single match
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        !matches!(self.selector, Selector::Nth { .. })
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "locator({})", self.selector)
    }
}

/// Options for click actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickOptions {
    /// Skip actionability checks (visible, enabled, receives events)
    pub force: bool,
    /// Override the page's action timeout
    pub timeout: Option<Duration>,
}

impl ClickOptions {
    /// Options for a forced click
    #[must_use]
    pub const fn forced() -> Self {
        Self {
            force: true,
            timeout: None,
        }
    }

    /// Set a custom timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
