//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable (strategy, value) pair identifying zero or
//! more elements relative to some scope. Pagina never interprets the value
//! itself; evaluation is delegated entirely to the underlying driver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup strategy understood by the underlying driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// XPath expression
    XPath,
    /// CSS selector
    CssSelector,
    /// `id` attribute
    Id,
    /// Exact anchor text
    LinkText,
    /// Substring of anchor text
    PartialLinkText,
}

impl Strategy {
    /// Get the wire name for this strategy
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::XPath => "xpath",
            Self::CssSelector => "css selector",
            Self::Id => "id",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An immutable (strategy, value) pair used by the driver to find element(s)
/// in a document or subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Create a locator with an explicit strategy
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// XPath locator
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// XPath locator matching the union of several fragments.
    ///
    /// Each fragment is parenthesized and the fragments are joined with the
    /// XPath `|` operator, so an element matching any one of them matches
    /// the combined locator.
    #[must_use]
    pub fn any_xpath<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let union = fragments
            .into_iter()
            .map(|fragment| format!("({})", fragment.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(Strategy::XPath, union)
    }

    /// CSS selector locator
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::CssSelector, value)
    }

    /// `id` attribute locator
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// Exact link text locator
    #[must_use]
    pub fn link_text(value: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, value)
    }

    /// Partial link text locator
    #[must_use]
    pub fn partial_link_text(value: impl Into<String>) -> Self {
        Self::new(Strategy::PartialLinkText, value)
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the raw value handed to the driver
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.strategy, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod strategy_tests {
        use super::*;

        #[test]
        fn test_strategy_names() {
            assert_eq!(Strategy::XPath.name(), "xpath");
            assert_eq!(Strategy::CssSelector.name(), "css selector");
            assert_eq!(Strategy::Id.name(), "id");
            assert_eq!(Strategy::LinkText.name(), "link text");
            assert_eq!(Strategy::PartialLinkText.name(), "partial link text");
        }

        #[test]
        fn test_strategy_display() {
            assert_eq!(format!("{}", Strategy::XPath), "xpath");
        }
    }

    mod constructor_tests {
        use super::*;

        #[test]
        fn test_xpath_locator() {
            let locator = Locator::xpath("//button[@id='save']");
            assert_eq!(locator.strategy(), Strategy::XPath);
            assert_eq!(locator.value(), "//button[@id='save']");
        }

        #[test]
        fn test_css_locator() {
            let locator = Locator::css("button.primary");
            assert_eq!(locator.strategy(), Strategy::CssSelector);
            assert_eq!(locator.value(), "button.primary");
        }

        #[test]
        fn test_id_locator() {
            let locator = Locator::id("login");
            assert_eq!(locator.strategy(), Strategy::Id);
        }

        #[test]
        fn test_link_text_locators() {
            assert_eq!(Locator::link_text("Sign in").strategy(), Strategy::LinkText);
            assert_eq!(
                Locator::partial_link_text("Sign").strategy(),
                Strategy::PartialLinkText
            );
        }
    }

    mod union_tests {
        use super::*;

        #[test]
        fn test_any_xpath_parenthesizes_and_joins() {
            let locator = Locator::any_xpath(["//button", "//input[@type='submit']"]);
            assert_eq!(locator.strategy(), Strategy::XPath);
            assert_eq!(locator.value(), "(//button)|(//input[@type='submit'])");
        }

        #[test]
        fn test_any_xpath_single_fragment() {
            let locator = Locator::any_xpath(["//a"]);
            assert_eq!(locator.value(), "(//a)");
        }
    }

    mod display_tests {
        use super::*;

        #[test]
        fn test_locator_display() {
            let locator = Locator::css(".toolbar button");
            assert_eq!(format!("{locator}"), "css selector `.toolbar button`");
        }
    }
}
