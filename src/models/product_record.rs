use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::identifier::extract_asin;
use crate::models::{Redirected, SCRAPING_FAILED};
use crate::normalizer::{format_rupees, net_effective_price, to_number, RUPEE};

/// Column order of the tabular report.
pub const REPORT_HEADER: [&str; 16] = [
    "originalUrl",
    "originalAsin",
    "finalUrl",
    "finalAsin",
    "redirected",
    "title",
    "buyBoxPrice",
    "buyBoxPriceNumeric",
    "rating",
    "reviewCount",
    "couponAmount",
    "couponAmountNumeric",
    "maxBankDiscount",
    "maxBankDiscountNumeric",
    "netEffectivePrice",
    "netEffectivePriceNumeric",
];

/// Bank discount display value when no offer was found.
pub fn no_bank_discount() -> String {
    format!("{}0", RUPEE)
}

/// Raw text fields pulled from a loaded product page. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFields {
    pub title: String,
    pub price: String,
    pub rating: String,
    pub review_count: String,
    pub coupon: String,
    pub bank_discount: String,
}

/// One row of the report; produced for every input URL, success or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub original_url: String,
    pub original_asin: String,
    pub final_url: String,
    pub final_asin: String,
    pub redirected: Redirected,
    pub title: String,
    pub buy_box_price: String,
    pub buy_box_price_numeric: Decimal,
    pub rating: String,
    pub review_count: String,
    pub coupon_amount: String,
    pub coupon_amount_numeric: Decimal,
    pub max_bank_discount: String,
    pub max_bank_discount_numeric: Decimal,
    pub net_effective_price: String,
    pub net_effective_price_numeric: Decimal,
}

impl ProductRecord {
    /// Assemble a record from a settled page, deriving numeric and net-price fields.
    pub fn from_page(original_url: &str, final_url: &str, fields: RawFields) -> Self {
        let original_asin = extract_asin(original_url);
        let final_asin = extract_asin(final_url);
        let redirected = Redirected::between(&original_asin, &final_asin);

        let max_bank_discount = if fields.bank_discount.is_empty() {
            no_bank_discount()
        } else {
            fields.bank_discount
        };

        let buy_box_price_numeric = to_number(&fields.price);
        let coupon_amount_numeric = to_number(&fields.coupon);
        let max_bank_discount_numeric = to_number(&max_bank_discount);
        let net = net_effective_price(
            buy_box_price_numeric,
            coupon_amount_numeric,
            max_bank_discount_numeric,
        );

        Self {
            original_url: original_url.to_string(),
            original_asin,
            final_url: final_url.to_string(),
            final_asin,
            redirected,
            title: fields.title,
            buy_box_price: fields.price,
            buy_box_price_numeric,
            rating: fields.rating,
            review_count: fields.review_count,
            coupon_amount: fields.coupon,
            coupon_amount_numeric,
            max_bank_discount,
            max_bank_discount_numeric,
            net_effective_price: format_rupees(net),
            net_effective_price_numeric: net,
        }
    }

    /// Sentinel record for a URL whose every attempt failed.
    pub fn terminal_failure(original_url: &str) -> Self {
        Self {
            original_url: original_url.to_string(),
            original_asin: extract_asin(original_url),
            final_url: SCRAPING_FAILED.to_string(),
            final_asin: SCRAPING_FAILED.to_string(),
            redirected: Redirected::Unknown,
            title: SCRAPING_FAILED.to_string(),
            buy_box_price: String::new(),
            buy_box_price_numeric: Decimal::ZERO,
            rating: String::new(),
            review_count: String::new(),
            coupon_amount: String::new(),
            coupon_amount_numeric: Decimal::ZERO,
            max_bank_discount: no_bank_discount(),
            max_bank_discount_numeric: Decimal::ZERO,
            net_effective_price: String::new(),
            net_effective_price_numeric: Decimal::ZERO,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.final_url == SCRAPING_FAILED
    }

    pub fn has_coupon(&self) -> bool {
        !self.coupon_amount.is_empty()
    }

    pub fn has_bank_discount(&self) -> bool {
        self.max_bank_discount != no_bank_discount()
    }

    /// Row values in [`REPORT_HEADER`] order.
    pub fn to_csv_record(&self) -> Vec<String> {
        vec![
            self.original_url.clone(),
            self.original_asin.clone(),
            self.final_url.clone(),
            self.final_asin.clone(),
            self.redirected.to_string(),
            self.title.clone(),
            self.buy_box_price.clone(),
            self.buy_box_price_numeric.normalize().to_string(),
            self.rating.clone(),
            self.review_count.clone(),
            self.coupon_amount.clone(),
            self.coupon_amount_numeric.normalize().to_string(),
            self.max_bank_discount.clone(),
            self.max_bank_discount_numeric.normalize().to_string(),
            self.net_effective_price.clone(),
            self.net_effective_price_numeric.normalize().to_string(),
        ]
    }
}
