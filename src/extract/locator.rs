//! Locators: ordered, first-match-wins matchers over unstable catalog markup.

use scraper::{ElementRef, Selector};
use std::fmt;

use crate::error::LocatorError;
use crate::parsers::{clean_text, has_currency_marker};

/// Finds candidate nodes beneath a scope node.
pub trait Locator: Send + Sync + fmt::Debug {
    /// Human-readable form, used in logs.
    fn describe(&self) -> &str;

    /// Matching descendants of `scope`, in document order.
    fn locate<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>>;
}

/// An ordered locator list; earlier entries are trusted more.
pub type LocatorChain = Vec<Box<dyn Locator>>;

/// Plain CSS selector.
pub struct CssLocator {
    source: String,
    selector: Selector,
}

impl CssLocator {
    pub fn parse(selector: &str) -> Result<Self, LocatorError> {
        let parsed = Selector::parse(selector).map_err(|e| LocatorError {
            selector: selector.to_string(),
            reason: format!("{e:?}"),
        })?;

        Ok(Self {
            source: selector.to_string(),
            selector: parsed,
        })
    }
}

impl fmt::Debug for CssLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CssLocator").field(&self.source).finish()
    }
}

impl Locator for CssLocator {
    fn describe(&self) -> &str {
        &self.source
    }

    fn locate<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        scope.select(&self.selector).collect()
    }
}

/// CSS selector whose matches only count when their text shows a currency.
#[derive(Debug)]
pub struct CurrencyTextLocator {
    inner: CssLocator,
}

impl CurrencyTextLocator {
    pub fn parse(selector: &str) -> Result<Self, LocatorError> {
        Ok(Self {
            inner: CssLocator::parse(selector)?,
        })
    }
}

impl Locator for CurrencyTextLocator {
    fn describe(&self) -> &str {
        self.inner.describe()
    }

    fn locate<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.inner
            .locate(scope)
            .into_iter()
            .filter(|node| has_currency_marker(&node_text(*node)))
            .collect()
    }
}

/// Normalized text content of a node.
pub fn node_text(node: ElementRef<'_>) -> String {
    clean_text(&node.text().collect::<String>())
}

pub fn css_chain(selectors: &[&str]) -> Result<LocatorChain, LocatorError> {
    selectors
        .iter()
        .map(|s| CssLocator::parse(s).map(|l| Box::new(l) as Box<dyn Locator>))
        .collect()
}

/// Every selector first as a currency-text locator, then as plain CSS.
pub fn currency_first_chain(selectors: &[&str]) -> Result<LocatorChain, LocatorError> {
    let mut chain: LocatorChain = Vec::with_capacity(selectors.len() * 2);
    for selector in selectors {
        chain.push(Box::new(CurrencyTextLocator::parse(selector)?));
    }
    chain.extend(css_chain(selectors)?);
    Ok(chain)
}
