use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Marker used when rendering derived amounts and the "no discount" default.
pub const RUPEE: &str = "₹";

// Any comma grouping is accepted so lakh-style "1,29,999" parses as well as "129,999".
static NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:,\d+)*(?:\.\d+)?").expect("numeral regex"));

static CURRENCY_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(₹|Rs\.?|\$|€|£)\s*(\d+(?:,\d+)*(?:\.\d+)?)").expect("currency regex")
});

static CURRENCY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"₹|Rs\.?\s*\d|\$|€|£").expect("currency marker regex"));

static RATING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d\.\d)").expect("rating regex"));

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("percent regex"));

/// First integer or decimal numeral in `text`, separators stripped.
///
/// Returns zero when nothing numeric is present. The pattern never captures a
/// sign, so the result is never negative.
pub fn to_number(text: &str) -> Decimal {
    NUMERAL
        .find(text)
        .and_then(|m| Decimal::from_str(&m.as_str().replace(',', "")).ok())
        .map(|value| value.normalize())
        .unwrap_or(Decimal::ZERO)
}

/// Canonical currency rendering of the first currency-marked amount:
/// marker followed by the digits with grouping separators removed.
/// `Rs`/`Rs.` is rendered as `₹`. Empty when there is no such amount.
pub fn to_currency_string(text: &str) -> String {
    let Some(captures) = CURRENCY_AMOUNT.captures(text) else {
        return String::new();
    };

    let marker = match &captures[1] {
        m if m.starts_with("Rs") => RUPEE,
        m => m,
    };
    format!("{}{}", marker, captures[2].replace(',', ""))
}

/// Single-decimal rating such as `"4.5"`, or empty.
pub fn to_rating_string(text: &str) -> String {
    RATING
        .captures(text)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

/// Raw percent token such as `"10%"`, if the text carries one.
pub fn to_percent_string(text: &str) -> Option<String> {
    PERCENT.captures(text).map(|c| format!("{}%", &c[1]))
}

/// First bare numeral in `text` with separators stripped.
pub fn to_bare_numeral(text: &str) -> Option<String> {
    NUMERAL.find(text).map(|m| m.as_str().replace(',', ""))
}

pub fn has_currency_marker(text: &str) -> bool {
    CURRENCY_MARKER.is_match(text)
}

/// Net price after coupon and bank discount, floored at zero.
///
/// Inputs are never negative, so a subtraction that leaves the `Decimal`
/// range can only have gone below zero.
pub fn net_effective_price(price: Decimal, coupon: Decimal, bank_discount: Decimal) -> Decimal {
    price
        .checked_sub(coupon)
        .and_then(|rest| rest.checked_sub(bank_discount))
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
        .normalize()
}

/// Render a derived amount in rupees, e.g. `1289` -> `"₹1289"`.
pub fn format_rupees(amount: Decimal) -> String {
    format!("{}{}", RUPEE, amount.normalize())
}
