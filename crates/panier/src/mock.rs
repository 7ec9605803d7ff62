//! In-memory driver for tests.
//!
//! `MockDriver` serves documents built from `MockNode` trees and resolves
//! selectors with the same text and role rules the page scripts use. CSS
//! support is limited to type selectors (`article`, `button`) and `*`.
//!
//! Clicks can mutate the document through reactions registered per node key,
//! which is enough to model "add to cart" and "open the cart dialog".

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::driver::{Actionability, ForcedClick, PanierDriver};
use crate::locator::{implicit_role, AriaRole, ClickOptions, Selector};
use crate::result::{PanierError, PanierResult};
use crate::text::{normalize_whitespace, TextMatch};

static NEXT_NODE_ID: AtomicUsize = AtomicUsize::new(1);

/// PNG signature, returned as the mock screenshot
const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// What Chromium reports when a query races a navigation
const CONTEXT_DESTROYED: &str =
    "Execution context was destroyed, most likely because of a navigation";

/// An element in a mock document
#[derive(Debug, Clone)]
pub struct MockNode {
    id: usize,
    /// Tag name
    pub tag: String,
    /// Own text (children's text is appended for `textContent`)
    pub text: String,
    /// `value` property (inputs)
    pub value: Option<String>,
    /// Explicit `role` attribute
    pub role: Option<String>,
    /// `aria-label` attribute
    pub aria_label: Option<String>,
    /// `aria-labelledby`, as keys of the labelling nodes
    pub labelled_by: Vec<String>,
    /// `alt` attribute
    pub alt: Option<String>,
    /// `title` attribute
    pub title: Option<String>,
    /// `type` attribute (inputs)
    pub input_type: Option<String>,
    /// Has an `href` attribute
    pub href: bool,
    /// Not rendered (hides the subtree)
    pub hidden: bool,
    /// `disabled`
    pub disabled: bool,
    /// Another element sits on top of this one
    pub covered: bool,
    /// Only present once the driver has been queried this many times
    pub appears_after: usize,
    /// Handle for click reactions and lookups
    pub key: Option<String>,
    /// Child elements
    pub children: Vec<MockNode>,
}

impl MockNode {
    /// Create an element
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed),
            tag: tag.into(),
            text: String::new(),
            value: None,
            role: None,
            aria_label: None,
            labelled_by: Vec::new(),
            alt: None,
            title: None,
            input_type: None,
            href: false,
            hidden: false,
            disabled: false,
            covered: false,
            appears_after: 0,
            key: None,
            children: Vec::new(),
        }
    }

    /// Set own text
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the `role` attribute
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set `aria-label`
    #[must_use]
    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    /// Point `aria-labelledby` at the nodes with these keys
    #[must_use]
    pub fn labelled_by<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labelled_by = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set `alt`
    #[must_use]
    pub fn alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Set the input `value`
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set `title`
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the input `type`
    #[must_use]
    pub fn input_type(mut self, kind: impl Into<String>) -> Self {
        self.input_type = Some(kind.into());
        self
    }

    /// Give the element an `href`
    #[must_use]
    pub const fn href(mut self) -> Self {
        self.href = true;
        self
    }

    /// Hide the element and its subtree
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Disable the element
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Put an overlay on top of the element
    #[must_use]
    pub const fn covered(mut self) -> Self {
        self.covered = true;
        self
    }

    /// Delay the element's appearance by `polls` driver queries
    #[must_use]
    pub const fn appears_after(mut self, polls: usize) -> Self {
        self.appears_after = polls;
        self
    }

    /// Set the lookup key
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Find a node in this subtree by key
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Self> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(key))
    }

    /// Find a node in this subtree by key, mutably
    pub fn find_mut(&mut self, key: &str) -> Option<&mut Self> {
        if self.key.as_deref() == Some(key) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(key))
    }

    /// Computed role
    #[must_use]
    pub fn aria_role(&self) -> Option<AriaRole> {
        implicit_role(
            &self.tag,
            self.role.as_deref(),
            self.input_type.as_deref(),
            self.href,
        )
    }

    fn is_present(&self, polls: usize) -> bool {
        polls >= self.appears_after
    }

    /// `textContent` of the subtree as of `polls` driver queries.
    ///
    /// Like the DOM property, text nodes are concatenated as-is: whitespace
    /// only appears where the markup has it.
    fn text_content(&self, polls: usize) -> String {
        let mut out = self.text.clone();
        for child in self.children.iter().filter(|c| c.is_present(polls)) {
            out.push_str(&child.text_content(polls));
        }
        out
    }

    /// Accessible name, first non-empty of: aria-label, aria-labelledby,
    /// alt, input value, text content, title. Labelling nodes are looked up
    /// in `document`.
    fn accessible_name(&self, document: &Self, polls: usize) -> String {
        let non_empty = |s: String| (!s.is_empty()).then_some(s);
        let labelled = || {
            (!self.labelled_by.is_empty()).then(|| {
                let texts: Vec<String> = self
                    .labelled_by
                    .iter()
                    .map(|key| {
                        document
                            .find(key)
                            .map(|n| n.text_content(polls))
                            .unwrap_or_default()
                    })
                    .collect();
                normalize_whitespace(&texts.join(" "))
            })
        };
        let attr = |a: &Option<String>| a.as_deref().map(normalize_whitespace);
        let value = || {
            if self.tag.eq_ignore_ascii_case("input") {
                attr(&self.value)
            } else {
                None
            }
        };

        attr(&self.aria_label)
            .and_then(non_empty)
            .or_else(|| labelled().and_then(non_empty))
            .or_else(|| attr(&self.alt).and_then(non_empty))
            .or_else(|| value().and_then(non_empty))
            .or_else(|| non_empty(normalize_whitespace(&self.text_content(polls))))
            .or_else(|| attr(&self.title))
            .unwrap_or_default()
    }
}

/// Node reached during a traversal, with inherited visibility
#[derive(Clone, Copy)]
struct Visit<'a> {
    node: &'a MockNode,
    hidden: bool,
}

fn descendants<'a>(scope: Visit<'a>, polls: usize, out: &mut Vec<Visit<'a>>) {
    for child in scope.node.children.iter().filter(|c| c.is_present(polls)) {
        let visit = Visit {
            node: child,
            hidden: scope.hidden || child.hidden,
        };
        out.push(visit);
        descendants(visit, polls, out);
    }
}

fn css_matches(css: &str, node: &MockNode) -> bool {
    let css = css.trim();
    css == "*" || css.eq_ignore_ascii_case(&node.tag)
}

/// Ambient state for one resolution
#[derive(Clone, Copy)]
struct Query<'a> {
    document: &'a MockNode,
    polls: usize,
}

fn resolve<'a>(selector: &Selector, scope: Visit<'a>, query: Query<'a>) -> Vec<Visit<'a>> {
    let Query { document, polls } = query;
    let mut all = Vec::new();
    descendants(scope, polls, &mut all);

    match selector {
        Selector::Css(css) => all
            .into_iter()
            .filter(|v| css_matches(css, v.node))
            .collect(),
        Selector::HasText { inner, text } => resolve(inner, scope, query)
            .into_iter()
            .filter(|v| TextMatch::Substring.matches(&v.node.text_content(polls), text))
            .collect(),
        Selector::Role { role, options } => all
            .into_iter()
            .filter(|v| v.node.aria_role() == Some(*role))
            .filter(|v| options.include_hidden || !v.hidden)
            .filter(|v| {
                options.name.as_deref().map_or(true, |name| {
                    options
                        .name_match()
                        .matches(&v.node.accessible_name(document, polls), name)
                })
            })
            .collect(),
        Selector::Descendant {
            ancestor,
            descendant,
        } => {
            let ids: HashSet<usize> = resolve(ancestor, scope, query)
                .into_iter()
                .flat_map(|s| resolve(descendant, s, query))
                .map(|v| v.node.id)
                .collect();
            all.into_iter().filter(|v| ids.contains(&v.node.id)).collect()
        }
        Selector::Nth { inner, index } => resolve(inner, scope, query)
            .into_iter()
            .nth(*index)
            .into_iter()
            .collect(),
    }
}

/// `covered` fails the hit test at check time, but a forced click at the
/// centre still reaches the element.
fn actionability_of(v: Visit<'_>) -> Actionability {
    Actionability {
        visible: !v.hidden,
        enabled: !v.node.disabled,
        receives_events: !v.hidden && !v.node.covered,
        has_box: !v.hidden,
        ..Actionability::ready_at(0.0, 0.0)
    }
}

type Reaction = Box<dyn Fn(&mut MockNode) + Send + Sync>;

/// Mock driver for unit testing
#[derive(Default)]
pub struct MockDriver {
    pages: HashMap<String, MockNode>,
    document: MockNode,
    url: String,
    reactions: HashMap<String, Reaction>,
    navigation_delay: Option<Duration>,
    polls: AtomicUsize,
    failing_evaluations: AtomicUsize,
    closed: bool,
    /// Call history for verification
    pub call_history: Vec<String>,
}

impl Default for MockNode {
    fn default() -> Self {
        Self::new("html")
    }
}

impl fmt::Debug for MockDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDriver")
            .field("url", &self.url)
            .field("pages", &self.pages.keys().collect::<Vec<_>>())
            .field("reactions", &self.reactions.len())
            .field("closed", &self.closed)
            .field("call_history", &self.call_history)
            .finish()
    }
}

impl MockDriver {
    /// Create new mock driver
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: String::from("about:blank"),
            ..Self::default()
        }
    }

    /// Serve `body` (the children of `<html>`) at `url`
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, body: impl IntoIterator<Item = MockNode>) -> Self {
        let _ = self
            .pages
            .insert(url.into(), MockNode::new("html").children(body));
        self
    }

    /// Run `reaction` on the document after a click lands on the node with `key`
    #[must_use]
    pub fn on_click(
        mut self,
        key: impl Into<String>,
        reaction: impl Fn(&mut MockNode) + Send + Sync + 'static,
    ) -> Self {
        let _ = self.reactions.insert(key.into(), Box::new(reaction));
        self
    }

    /// Make every navigation take this long
    #[must_use]
    pub const fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = Some(delay);
        self
    }

    /// Fail the next `n` queries with a destroyed-context `Script` error
    #[must_use]
    pub fn with_failing_evaluations(self, n: usize) -> Self {
        self.fail_evaluations(n);
        self
    }

    /// Fail the next `n` queries from now on, as a page reload would
    pub fn fail_evaluations(&self, n: usize) {
        self.failing_evaluations.store(n, Ordering::SeqCst);
    }

    /// Current document
    #[must_use]
    pub const fn document(&self) -> &MockNode {
        &self.document
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if method was called
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(method))
    }

    /// Whether `close` has run
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn poll(&self) -> usize {
        self.polls.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Start a page query: fails when closed or while evaluations are
    /// set to fail, otherwise counts a poll.
    fn query(&self) -> PanierResult<Query<'_>> {
        self.ensure_open()?;
        let failing = self
            .failing_evaluations
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(PanierError::Script {
                message: CONTEXT_DESTROYED.to_string(),
            });
        }
        Ok(Query {
            document: &self.document,
            polls: self.poll(),
        })
    }

    fn ensure_open(&self) -> PanierResult<()> {
        if self.closed {
            Err(PanierError::Page {
                message: "page has been closed".to_string(),
            })
        } else {
            Ok(())
        }
    }

    fn root(&self) -> Visit<'_> {
        Visit {
            node: &self.document,
            hidden: false,
        }
    }
}

#[async_trait]
impl PanierDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> PanierResult<()> {
        self.ensure_open()?;
        self.call_history.push(format!("navigate:{url}"));
        if let Some(delay) = self.navigation_delay {
            tokio::time::sleep(delay).await;
        }
        let document = self
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| PanierError::NavigationError {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            })?;
        self.document = document;
        self.url = url.to_string();
        self.polls.store(0, Ordering::SeqCst);
        Ok(())
    }

    async fn current_url(&self) -> PanierResult<String> {
        Ok(self.url.clone())
    }

    async fn count(&self, selector: &Selector) -> PanierResult<usize> {
        let query = self.query()?;
        Ok(resolve(selector, self.root(), query).len())
    }

    async fn text_content(
        &self,
        selector: &Selector,
        index: usize,
    ) -> PanierResult<Option<String>> {
        let query = self.query()?;
        Ok(resolve(selector, self.root(), query)
            .get(index)
            .map(|v| v.node.text_content(query.polls)))
    }

    async fn actionability(
        &self,
        selector: &Selector,
        index: usize,
    ) -> PanierResult<Option<Actionability>> {
        let query = self.query()?;
        Ok(resolve(selector, self.root(), query)
            .get(index)
            .map(|v| actionability_of(*v)))
    }

    async fn click(
        &mut self,
        selector: &Selector,
        index: usize,
        options: &ClickOptions,
    ) -> PanierResult<()> {
        self.ensure_open()?;
        let query = Query {
            document: &self.document,
            polls: self.poll(),
        };
        let target = resolve(selector, self.root(), query)
            .get(index)
            .map(|v| (actionability_of(*v), v.node.key.clone()));
        let Some((target, key)) = target else {
            return Err(PanierError::Input {
                message: format!("no element at index {index} for {selector}"),
            });
        };

        let forced = if options.force { " (forced)" } else { "" };
        self.call_history
            .push(format!("click:{selector}[{index}]{forced}"));

        // A pointer click on a covered element lands on the overlay.
        if !options.force && !target.receives_events {
            self.call_history.push("click:intercepted".to_string());
            return Ok(());
        }
        if options.force && target.forced_click() == ForcedClick::Dom {
            self.call_history.push("click:dom".to_string());
        }
        if let Some(reaction) = key.as_deref().and_then(|k| self.reactions.get(k)) {
            reaction(&mut self.document);
        }
        Ok(())
    }

    async fn screenshot(&self) -> PanierResult<Vec<u8>> {
        self.ensure_open()?;
        Ok(PNG_MAGIC.to_vec())
    }

    async fn close(&mut self) -> PanierResult<()> {
        self.call_history.push("close".to_string());
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{Locator, RoleOptions};

    const URL: &str = "https://shop.test";

    fn shop() -> MockDriver {
        MockDriver::new().with_page(
            URL,
            [
                MockNode::new("header").child(
                    MockNode::new("button")
                        .aria_label("Mon panier")
                        .text("0")
                        .key("cart"),
                ),
                MockNode::new("article")
                    .text("La Tomate grappe sélection HVE")
                    .child(MockNode::new("button").text("Ajouter le produit").key("add")),
                MockNode::new("article")
                    .text("Carotte des sables")
                    .child(MockNode::new("button").text("Ajouter le produit")),
                MockNode::new("div")
                    .role("dialog")
                    .hidden()
                    .key("dialog")
                    .child(MockNode::new("p").text("Panier vide")),
            ],
        )
    }

    mod resolution_tests {
        use super::*;

        #[tokio::test]
        async fn test_css_counts_tags() {
            let mut driver = shop();
            driver.navigate(URL).await.unwrap();
            assert_eq!(driver.count(&Selector::css("article")).await.unwrap(), 2);
            assert_eq!(driver.count(&Selector::css("BUTTON")).await.unwrap(), 3);
        }

        #[tokio::test]
        async fn test_has_text_scopes_descendants() {
            let mut driver = shop();
            driver.navigate(URL).await.unwrap();
            let loc = Locator::new("article")
                .with_text("la tomate grappe")
                .locator("button")
                .with_text("Ajouter le produit");
            assert_eq!(driver.count(loc.selector()).await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_role_uses_aria_label_and_skips_hidden() {
            let mut driver = shop();
            driver.navigate(URL).await.unwrap();
            let cart = Selector::role(AriaRole::Button, RoleOptions::name("Mon panier"));
            assert_eq!(driver.count(&cart).await.unwrap(), 1);

            let dialog = Selector::role(AriaRole::Dialog, RoleOptions::default());
            assert_eq!(driver.count(&dialog).await.unwrap(), 0);

            let hidden_too =
                Selector::role(AriaRole::Dialog, RoleOptions::default().include_hidden());
            assert_eq!(driver.count(&hidden_too).await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_nth_picks_in_document_order() {
            let mut driver = shop();
            driver.navigate(URL).await.unwrap();
            let second = Locator::new("article").nth(1);
            let text = driver.text_content(second.selector(), 0).await.unwrap();
            assert!(text.unwrap().contains("Carotte"));
        }

        #[tokio::test]
        async fn test_text_content_concatenates_like_the_dom() {
            let mut driver = MockDriver::new().with_page(
                URL,
                [MockNode::new("dialog")
                    .child(MockNode::new("span").text("La Tomate"))
                    .child(MockNode::new("span").text("grappe"))],
            );
            driver.navigate(URL).await.unwrap();
            let text = driver
                .text_content(&Selector::css("dialog"), 0)
                .await
                .unwrap();
            assert_eq!(text.as_deref(), Some("La Tomategrappe"));

            let spaced = Locator::new("dialog").with_text("La Tomate grappe");
            assert_eq!(driver.count(spaced.selector()).await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_accessible_name_order() {
            let button = |name: &str| Selector::role(AriaRole::Button, RoleOptions::name(name).exact());
            let mut driver = MockDriver::new().with_page(
                URL,
                [
                    MockNode::new("span").text("Mon panier").key("cart-label"),
                    MockNode::new("button")
                        .labelled_by(["cart-label"])
                        .text("3")
                        .title("Panier"),
                    MockNode::new("button")
                        .aria_label("Fermer")
                        .labelled_by(["cart-label"]),
                    MockNode::new("input")
                        .input_type("image")
                        .alt("Rechercher")
                        .value("Go"),
                    MockNode::new("input").input_type("submit").value("Valider"),
                    MockNode::new("button").title("Favoris"),
                ],
            );
            driver.navigate(URL).await.unwrap();

            assert_eq!(driver.count(&button("Mon panier")).await.unwrap(), 1);
            assert_eq!(driver.count(&button("3")).await.unwrap(), 0);
            assert_eq!(driver.count(&button("Fermer")).await.unwrap(), 1);
            assert_eq!(driver.count(&button("Rechercher")).await.unwrap(), 1);
            assert_eq!(driver.count(&button("Go")).await.unwrap(), 0);
            assert_eq!(driver.count(&button("Valider")).await.unwrap(), 1);
            assert_eq!(driver.count(&button("Favoris")).await.unwrap(), 1);
        }

        #[tokio::test]
        async fn test_appears_after_polls() {
            let mut driver = MockDriver::new()
                .with_page(URL, [MockNode::new("dialog").text("late").appears_after(3)]);
            driver.navigate(URL).await.unwrap();
            let sel = Selector::css("dialog");
            assert_eq!(driver.count(&sel).await.unwrap(), 0);
            assert_eq!(driver.count(&sel).await.unwrap(), 0);
            assert_eq!(driver.count(&sel).await.unwrap(), 1);
        }
    }

    mod interaction_tests {
        use super::*;

        #[tokio::test]
        async fn test_click_runs_reaction() {
            let mut driver = shop().on_click("cart", |doc| {
                if let Some(dialog) = doc.find_mut("dialog") {
                    dialog.hidden = false;
                }
            });
            driver.navigate(URL).await.unwrap();
            let cart = Selector::role(AriaRole::Button, RoleOptions::name("Mon panier"));
            driver.click(&cart, 0, &ClickOptions::default()).await.unwrap();

            let dialog = Selector::role(AriaRole::Dialog, RoleOptions::default());
            assert_eq!(driver.count(&dialog).await.unwrap(), 1);
            assert!(driver.was_called("click:role=button"));
        }

        #[tokio::test]
        async fn test_covered_click_is_intercepted_unless_forced() {
            let mut driver = MockDriver::new()
                .with_page(URL, [MockNode::new("button").text("Go").covered().key("go")])
                .on_click("go", |doc| doc.text = "clicked".to_string());
            driver.navigate(URL).await.unwrap();
            let sel = Selector::css("button");

            driver.click(&sel, 0, &ClickOptions::default()).await.unwrap();
            assert!(driver.was_called("click:intercepted"));
            assert_eq!(driver.document().text, "");

            driver.click(&sel, 0, &ClickOptions::forced()).await.unwrap();
            assert_eq!(driver.document().text, "clicked");
            assert!(driver.history().iter().any(|c| c.ends_with("(forced)")));
        }

        #[tokio::test]
        async fn test_click_missing_index_fails() {
            let mut driver = shop();
            driver.navigate(URL).await.unwrap();
            let err = driver
                .click(&Selector::css("article"), 5, &ClickOptions::forced())
                .await
                .unwrap_err();
            assert!(err.to_string().contains("index 5"));
        }

        #[tokio::test]
        async fn test_unknown_url_fails_navigation() {
            let mut driver = shop();
            let err = driver.navigate("https://nowhere.test").await.unwrap_err();
            assert!(matches!(err, PanierError::NavigationError { .. }));
        }

        #[tokio::test]
        async fn test_closed_driver_rejects_queries() {
            let mut driver = shop();
            driver.close().await.unwrap();
            assert!(driver.is_closed());
            assert!(driver.count(&Selector::css("a")).await.is_err());
        }

        #[tokio::test]
        async fn test_failing_evaluations_then_recover() {
            let mut driver = shop().with_failing_evaluations(2);
            driver.navigate(URL).await.unwrap();
            let sel = Selector::css("article");
            for _ in 0..2 {
                let err = driver.count(&sel).await.unwrap_err();
                assert!(err.is_transient());
            }
            assert_eq!(driver.count(&sel).await.unwrap(), 2);
        }

        #[tokio::test]
        async fn test_screenshot_is_png() {
            let driver = MockDriver::new();
            let png = driver.screenshot().await.unwrap();
            assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
        }
    }
}
