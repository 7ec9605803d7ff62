//! Page scripts for CDP `Runtime.evaluate`.
//!
//! Each `Selector` compiles to a JavaScript arrow `(root) => Element[]`. The
//! helpers in the prelude implement the same text, role and visibility rules
//! as `text.rs` and `locator.rs`, so a selector means the same thing in the
//! mock driver and in Chromium.

use crate::locator::{Selector, IMPLICIT_ROLES};

/// JSON-encode a string as a JavaScript literal.
fn js_str(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn implicit_role_table() -> String {
    let map: serde_json::Map<String, serde_json::Value> = IMPLICIT_ROLES
        .iter()
        .map(|(tag, role)| ((*tag).to_string(), role.as_str().into()))
        .collect();
    serde_json::Value::Object(map).to_string()
}

/// Helper functions shared by every generated script
#[must_use]
pub fn prelude() -> String {
    let roles = implicit_role_table();
    format!(
        r#"const __norm = (s) => String(s ?? '').replace(/\s+/g, ' ').trim();
const __roles = {roles};
const __role = (el) => {{
  const explicit = (el.getAttribute('role') || '').trim().split(/\s+/)[0];
  if (explicit) return explicit.toLowerCase();
  const tag = el.tagName.toLowerCase();
  if (tag === 'a') return el.hasAttribute('href') ? 'link' : null;
  if (tag === 'input') {{
    const t = (el.getAttribute('type') || 'text').toLowerCase();
    if (['button', 'submit', 'reset', 'image'].includes(t)) return 'button';
    if (t === 'checkbox') return 'checkbox';
    if (t === 'search') return 'searchbox';
    if (t === 'hidden') return null;
    return 'textbox';
  }}
  return __roles[tag] ?? null;
}};
const __name = (el) => {{
  const label = __norm(el.getAttribute('aria-label'));
  if (label) return label;
  const by = el.getAttribute('aria-labelledby');
  if (by) {{
    const joined = __norm(by.split(/\s+/).map((id) => document.getElementById(id)?.textContent ?? '').join(' '));
    if (joined) return joined;
  }}
  const alt = __norm(el.getAttribute('alt'));
  if (alt) return alt;
  if (el.tagName === 'INPUT') {{
    const value = __norm(el.value);
    if (value) return value;
  }}
  const text = __norm(el.textContent);
  if (text) return text;
  return __norm(el.getAttribute('title'));
}};
const __hidden = (el) => {{
  if (!el.isConnected) return true;
  const style = window.getComputedStyle(el);
  if (style.visibility === 'hidden' || style.display === 'none') return true;
  return el.getClientRects().length === 0;
}};
const __matches = (hay, needle, exact) => exact
  ? __norm(hay) === __norm(needle)
  : __norm(hay).toLowerCase().includes(__norm(needle).toLowerCase());
const __ordered = (els) => Array.from(new Set(els)).sort((a, b) =>
  a === b ? 0 : (a.compareDocumentPosition(b) & Node.DOCUMENT_POSITION_FOLLOWING ? -1 : 1));"#
    )
}

/// Compile a selector into a `(root) => Element[]` arrow function
#[must_use]
pub fn resolver(selector: &Selector) -> String {
    match selector {
        Selector::Css(css) => {
            format!("((root) => Array.from(root.querySelectorAll({})))", js_str(css))
        }
        Selector::HasText { inner, text } => format!(
            "((root) => {}(root).filter((el) => __matches(el.textContent, {}, false)))",
            resolver(inner),
            js_str(text)
        ),
        Selector::Role { role, options } => {
            let name = options
                .name
                .as_deref()
                .map_or_else(|| "null".to_string(), js_str);
            format!(
                "((root) => Array.from(root.querySelectorAll('*')).filter((el) => \
                 __role(el) === {role} && ({hidden} || !__hidden(el)) && \
                 ({name} === null || __matches(__name(el), {name}, {exact}))))",
                role = js_str(role.as_str()),
                hidden = options.include_hidden,
                exact = options.exact,
            )
        }
        Selector::Descendant {
            ancestor,
            descendant,
        } => format!(
            "((root) => __ordered({}(root).flatMap((scope) => {}(scope))))",
            resolver(ancestor),
            resolver(descendant)
        ),
        Selector::Nth { inner, index } => format!(
            "((root) => {{ const all = {}(root); return all.length > {index} ? [all[{index}]] : []; }})",
            resolver(inner)
        ),
    }
}

fn wrap(selector: &Selector, body: &str) -> String {
    format!(
        "(() => {{\n{}\nconst __els = {}(document);\n{body}\n}})()",
        prelude(),
        resolver(selector)
    )
}

/// Script returning the number of matches
#[must_use]
pub fn count_script(selector: &Selector) -> String {
    wrap(selector, "return __els.length;")
}

/// Script returning the `textContent` of match `index`, or `null`
#[must_use]
pub fn text_script(selector: &Selector, index: usize) -> String {
    wrap(
        selector,
        &format!("const el = __els[{index}];\nreturn el ? el.textContent : null;"),
    )
}

/// Script that scrolls match `index` into view and reports whether it can
/// receive a click at its centre, and whether it has a box at all.
/// Returns `null` when the element is gone.
#[must_use]
pub fn actionability_script(selector: &Selector, index: usize) -> String {
    wrap(
        selector,
        &format!(
            r"const el = __els[{index}];
if (!el) return null;
el.scrollIntoView({{ block: 'center', inline: 'center' }});
const rect = el.getBoundingClientRect();
const x = rect.left + rect.width / 2;
const y = rect.top + rect.height / 2;
const hasBox = rect.width > 0 && rect.height > 0;
const visible = !__hidden(el) && hasBox;
const enabled = el.disabled !== true && el.getAttribute('aria-disabled') !== 'true';
const hit = visible ? document.elementFromPoint(x, y) : null;
const receivesEvents = !!hit && (hit === el || el.contains(hit));
return {{ visible, enabled, receivesEvents, hasBox, x, y }};"
        ),
    )
}

/// Script dispatching a DOM click on match `index`, for forced clicks on
/// elements without a box. Returns `false` when the element is gone.
#[must_use]
pub fn force_click_script(selector: &Selector, index: usize) -> String {
    wrap(
        selector,
        &format!(
            r"const el = __els[{index}];
if (!el) return false;
if (typeof el.click === 'function') {{
  el.click();
}} else {{
  el.dispatchEvent(new MouseEvent('click', {{ bubbles: true, cancelable: true, view: window }}));
}}
return true;"
        ),
    )
}
