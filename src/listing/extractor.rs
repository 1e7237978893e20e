use scraper::{Html, Selector};
use tracing::debug;

use crate::errors::{Result, WatchError};
use crate::utils::ListingSelectors;

/// Pulls the listed price out of product page markup.
///
/// The lookup is a single fixed path: container, then the `itemprop="price"`
/// element inside it, then one attribute. Any break along that path is
/// reported as its own error; there is no fallback.
#[derive(Debug)]
pub struct PriceExtractor {
    container: Selector,
    price: Selector,
    selectors: ListingSelectors,
}

impl PriceExtractor {
    pub fn new(selectors: &ListingSelectors) -> Result<Self> {
        Ok(Self {
            container: parse_selector(&selectors.container)?,
            price: parse_selector(&selectors.price)?,
            selectors: selectors.clone(),
        })
    }

    pub fn extract(&self, html: &str) -> Result<f64> {
        let document = Html::parse_document(html);

        let container = document
            .select(&self.container)
            .next()
            .ok_or_else(|| WatchError::ContainerNotFound {
                selector: self.selectors.container.clone(),
            })?;

        let element = container
            .select(&self.price)
            .next()
            .ok_or_else(|| WatchError::PriceElementNotFound {
                selector: self.selectors.price.clone(),
            })?;

        let raw = element
            .value()
            .attr(&self.selectors.attribute)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| WatchError::PriceAttributeMissing {
                attribute: self.selectors.attribute.clone(),
            })?;

        debug!("💲 Raw price attribute: '{}'", raw);

        let price: f64 = raw.parse().map_err(|_| WatchError::PriceUnparsable {
            value: raw.to_string(),
        })?;

        if !price.is_finite() || price < 0.0 {
            return Err(WatchError::InvalidPrice { value: price });
        }

        Ok(price)
    }
}

/// One-shot extraction with freshly compiled selectors.
pub fn extract_price(html: &str, selectors: &ListingSelectors) -> Result<f64> {
    PriceExtractor::new(selectors)?.extract(html)
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| WatchError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(inner: &str) -> String {
        format!(
            r#"<html><body><div class="_content_top_right_2ox1k_243 card">{}</div></body></html>"#,
            inner
        )
    }

    #[test]
    fn test_extracts_price_attribute() {
        let html = page(r#"<span itemprop="price" content="0.25">$0.25</span>"#);
        assert_eq!(extract_price(&html, &ListingSelectors::default()).unwrap(), 0.25);
    }

    #[test]
    fn test_trims_whitespace() {
        let html = page(r#"<span itemprop="price" content=" 1.10 "></span>"#);
        assert_eq!(extract_price(&html, &ListingSelectors::default()).unwrap(), 1.10);
    }

    #[test]
    fn test_price_outside_container_is_ignored() {
        let html = r#"<html><body>
            <span itemprop="price" content="0.01"></span>
            <div class="_content_top_right_2ox1k_243"><p>sold out</p></div>
        </body></html>"#;
        assert!(matches!(
            extract_price(html, &ListingSelectors::default()),
            Err(WatchError::PriceElementNotFound { .. })
        ));
    }

    #[test]
    fn test_first_price_in_container_wins() {
        let html = page(
            r#"<span itemprop="price" content="0.19"></span>
               <span itemprop="price" content="0.50"></span>"#,
        );
        assert_eq!(extract_price(&html, &ListingSelectors::default()).unwrap(), 0.19);
    }

    #[test]
    fn test_rejects_negative_and_non_finite() {
        let html = page(r#"<span itemprop="price" content="-1"></span>"#);
        assert!(matches!(
            extract_price(&html, &ListingSelectors::default()),
            Err(WatchError::InvalidPrice { .. })
        ));

        let html = page(r#"<span itemprop="price" content="inf"></span>"#);
        assert!(matches!(
            extract_price(&html, &ListingSelectors::default()),
            Err(WatchError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_invalid_selector() {
        let selectors = ListingSelectors {
            container: "div[[".to_string(),
            ..ListingSelectors::default()
        };
        assert!(matches!(
            PriceExtractor::new(&selectors),
            Err(WatchError::InvalidSelector { .. })
        ));
    }
}
