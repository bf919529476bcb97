//! Page readiness conditions.
//!
//! Route pages fill their schedule in after the first response, so a page
//! is only parsed once a known marker (e.g. the update-time element) is
//! present.

use scraper::{Html, Selector};
use serde::Deserialize;

use super::error::FetchError;

/// Condition a page body must satisfy before it is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessCondition {
    /// Parse whatever the first response contains.
    #[default]
    Always,
    /// An element matching this CSS selector exists.
    ElementPresent(String),
    /// The raw body contains this text.
    TextPresent(String),
}

impl ReadinessCondition {
    /// Reject a selector that can never be checked.
    pub fn validate(&self) -> Result<(), FetchError> {
        if let ReadinessCondition::ElementPresent(css) = self {
            parse_selector(css)?;
        }
        Ok(())
    }

    /// Check the condition against a page body.
    pub fn is_satisfied(&self, body: &str) -> Result<bool, FetchError> {
        match self {
            ReadinessCondition::Always => Ok(true),
            ReadinessCondition::TextPresent(text) => Ok(body.contains(text.as_str())),
            ReadinessCondition::ElementPresent(css) => {
                let selector = parse_selector(css)?;
                let document = Html::parse_document(body);
                Ok(document.select(&selector).next().is_some())
            }
        }
    }
}

fn parse_selector(css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOADING: &str = r#"<html><body><div id="loading">載入中</div></body></html>"#;
    const READY: &str =
        r#"<html><body><span id="updateTime">10:31:02</span><table></table></body></html>"#;

    #[test]
    fn always() {
        assert!(ReadinessCondition::Always.is_satisfied("").unwrap());
    }

    #[test]
    fn element_present() {
        let cond = ReadinessCondition::ElementPresent("#updateTime".into());
        assert!(!cond.is_satisfied(LOADING).unwrap());
        assert!(cond.is_satisfied(READY).unwrap());
    }

    #[test]
    fn text_present() {
        let cond = ReadinessCondition::TextPresent("載入中".into());
        assert!(cond.is_satisfied(LOADING).unwrap());
        assert!(!cond.is_satisfied(READY).unwrap());
    }

    #[test]
    fn invalid_selector() {
        let cond = ReadinessCondition::ElementPresent("###".into());
        assert!(matches!(
            cond.is_satisfied(READY),
            Err(FetchError::InvalidSelector { .. })
        ));
        assert!(matches!(
            cond.validate(),
            Err(FetchError::InvalidSelector { selector, .. }) if selector == "###"
        ));
        assert!(ReadinessCondition::ElementPresent("#updateTime".into()).validate().is_ok());
        assert!(ReadinessCondition::TextPresent("###".into()).validate().is_ok());
    }
}
