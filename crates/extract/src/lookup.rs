// ABOUTME: Find-or-empty lookup primitives over parsed HTML (first/all by tag, optionally by attribute).
// ABOUTME: A miss is an empty result, never an error; compiled selectors are cached process-wide.

//! Tolerant element lookup.
//!
//! Every function in this module treats "nothing matched" as a normal outcome:
//! - `find_first` returns `None`
//! - `find_all` returns an empty `Vec`
//! - the `_text` variants return an empty `String` / empty `Vec`
//!
//! Queries are built from a tag name and an optional attribute constraint.
//! The `class` attribute matches against the whitespace-separated class list
//! (so `class="trOne odd"` matches the marker `trOne`); any other attribute
//! must match exactly. A query that cannot be compiled is treated as a miss.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Compiled selectors by CSS text. Invalid queries are cached as `None`.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// A tag name with an optional attribute constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query<'q> {
    tag: &'q str,
    attr: Option<(&'q str, &'q str)>,
}

impl<'q> Query<'q> {
    /// Matches every element with the given tag name.
    pub fn tag(tag: &'q str) -> Self {
        Self { tag, attr: None }
    }

    /// Restricts the query to elements carrying `class` in their class list.
    pub fn with_class(self, class: &'q str) -> Self {
        self.with_attr("class", class)
    }

    /// Restricts the query to elements whose `name` attribute matches `value`.
    pub fn with_attr(mut self, name: &'q str, value: &'q str) -> Self {
        self.attr = Some((name, value));
        self
    }

    /// Renders the query as a CSS selector string.
    pub fn to_css(&self) -> String {
        match self.attr {
            None => self.tag.to_string(),
            Some((name, value)) => {
                let op = if name.eq_ignore_ascii_case("class") { "~=" } else { "=" };
                format!("{}[{}{}\"{}\"]", self.tag, name, op, escape_css_string(value))
            }
        }
    }
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Compiles a query, reusing the cached selector when it has been seen before.
fn compile(query: &Query<'_>) -> Option<Selector> {
    let css = query.to_css();
    {
        let cache = SELECTOR_CACHE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = cache.get(&css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(&css).ok();
    let mut cache = SELECTOR_CACHE.write().unwrap_or_else(PoisonError::into_inner);
    cache.entry(css).or_insert(compiled).clone()
}

/// Returns the first descendant of `scope` matching `query`.
pub fn find_first<'a>(scope: ElementRef<'a>, query: &Query<'_>) -> Option<ElementRef<'a>> {
    let selector = compile(query)?;
    let found = scope.select(&selector).next();
    found
}

/// Returns all descendants of `scope` matching `query`, in document order.
pub fn find_all<'a>(scope: ElementRef<'a>, query: &Query<'_>) -> Vec<ElementRef<'a>> {
    match compile(query) {
        Some(selector) => scope.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Text of the first match, or an empty string when nothing matches.
pub fn find_first_text(scope: ElementRef<'_>, query: &Query<'_>) -> String {
    find_first(scope, query).map(text_of).unwrap_or_default()
}

/// Text of every match, in document order.
pub fn find_all_text(scope: ElementRef<'_>, query: &Query<'_>) -> Vec<String> {
    find_all(scope, query).into_iter().map(text_of).collect()
}

/// Concatenated text content of an element, exactly as it appears in the markup.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Convenience: the document root as a lookup scope.
pub fn root(doc: &Html) -> ElementRef<'_> {
    doc.root_element()
}
