use scraper::{Html, Selector};
use tracing::debug;

use crate::models::{no_bank_discount, RawFields};
use crate::normalizer::{
    has_currency_marker, to_bare_numeral, to_currency_string, to_percent_string,
    to_rating_string,
};
use crate::selectors;

/// Read-only text access to a loaded page.
pub trait ContentQuery {
    /// Text of the first element matching `selector` that has any text.
    fn query_text(&self, selector: &str) -> Option<String>;

    /// Text of every element matching `selector`, in document order.
    fn query_all_text(&self, selector: &str) -> Vec<String>;
}

/// Parsed DOM of a page, captured after lazy content has been revealed.
pub struct PageSnapshot {
    document: Html,
}

impl PageSnapshot {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    fn selector(selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!(selector, error = ?e, "Skipping invalid selector");
                None
            }
        }
    }
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

impl ContentQuery for PageSnapshot {
    fn query_text(&self, selector: &str) -> Option<String> {
        let parsed = Self::selector(selector)?;
        self.document
            .select(&parsed)
            .map(element_text)
            .find(|text| !text.is_empty())
    }

    fn query_all_text(&self, selector: &str) -> Vec<String> {
        let Some(parsed) = Self::selector(selector) else {
            return Vec::new();
        };
        self.document.select(&parsed).map(element_text).collect()
    }
}

/// Walk `regions` in order and return the first text that `accept` turns into a value.
fn first_match<Q, F>(page: &Q, regions: &[&str], accept: F) -> Option<String>
where
    Q: ContentQuery + ?Sized,
    F: Fn(&str) -> Option<String>,
{
    regions.iter().find_map(|selector| {
        let value = page.query_text(selector).and_then(|text| accept(&text));
        if value.is_none() {
            debug!(selector, "No usable value in region, trying next");
        }
        value
    })
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

pub fn extract_title<Q: ContentQuery + ?Sized>(page: &Q) -> Option<String> {
    first_match(page, selectors::TITLE, |text| non_empty(text.trim().to_string()))
}

/// A region with text but no recognizable currency amount is skipped.
pub fn extract_price<Q: ContentQuery + ?Sized>(page: &Q) -> Option<String> {
    first_match(page, selectors::PRICE, |text| non_empty(to_currency_string(text)))
}

pub fn extract_rating<Q: ContentQuery + ?Sized>(page: &Q) -> Option<String> {
    first_match(page, selectors::RATING, |text| non_empty(to_rating_string(text)))
}

/// Review count stays in display form ("12,345 ratings").
pub fn extract_review_count<Q: ContentQuery + ?Sized>(page: &Q) -> Option<String> {
    first_match(page, selectors::REVIEW_COUNT, |text| {
        non_empty(text.trim().to_string())
    })
}

/// Coupon as a currency amount, or the raw percent token when the coupon is
/// a percentage.
pub fn extract_coupon<Q: ContentQuery + ?Sized>(page: &Q) -> Option<String> {
    first_match(page, selectors::COUPON, |text| {
        if has_currency_marker(text) {
            if let Some(amount) = non_empty(to_currency_string(text)) {
                return Some(amount);
            }
        }
        if text.contains('%') {
            return to_percent_string(text);
        }
        None
    })
}

/// First offer mentioning a bank, card or UPI that carries an amount.
pub fn extract_bank_discount<Q: ContentQuery + ?Sized>(page: &Q) -> Option<String> {
    selectors::BANK_OFFER_CANDIDATES
        .iter()
        .flat_map(|selector| page.query_all_text(selector))
        .filter(|text| {
            let lower = text.to_lowercase();
            selectors::BANK_OFFER_KEYWORDS
                .iter()
                .any(|keyword| lower.contains(keyword))
        })
        .find_map(|text| non_empty(to_currency_string(&text)).or_else(|| to_bare_numeral(&text)))
}

/// Pulls the raw field bag out of a loaded product page.
///
/// Each field is resolved independently; a missing field is left empty and
/// never fails the extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageExtractor;

impl PageExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract<Q: ContentQuery + ?Sized>(&self, page: &Q) -> RawFields {
        RawFields {
            title: extract_title(page).unwrap_or_default(),
            price: extract_price(page).unwrap_or_default(),
            rating: extract_rating(page).unwrap_or_default(),
            review_count: extract_review_count(page).unwrap_or_default(),
            coupon: extract_coupon(page).unwrap_or_default(),
            bank_discount: extract_bank_discount(page).unwrap_or_else(no_bank_discount),
        }
    }
}
