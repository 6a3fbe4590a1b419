//! CSS selectors for product detail pages, in fallback order.
//!
//! Every list is tried front to back and the first usable match wins, so the
//! most specific region goes first. Markup differs between page templates and
//! locales; when a field starts coming back empty, add the new region here
//! rather than reordering existing entries.

/// Signals that the product page has rendered enough to extract from.
pub const READY_SIGNALS: &[&str] = &[
    "#productTitle",
    "#wayfinding-breadcrumbs_feature_div",
    "#nav-logo-sprites",
];

/// Primary title region, secondary title region, generic large heading.
pub const TITLE: &[&str] = &["#productTitle", "#title", "h1"];

/// Price display regions. A region only counts when it holds a currency amount.
pub const PRICE: &[&str] = &[
    // Whole-price block
    "#corePriceDisplay_desktop_feature_div .a-price",
    "#corePrice_feature_div .a-price",
    // Offscreen accessible price
    ".a-price .a-offscreen",
    // Legacy price blocks
    "#priceblock_ourprice",
    "#priceblock_saleprice",
    // Deal price
    "#priceblock_dealprice",
    "#dealprice_shippingmessage .a-price",
    // "Pay" price
    ".apexPriceToPay .a-offscreen",
    "#apex_desktop .a-price .a-offscreen",
];

pub const RATING: &[&str] = &[
    "#acrPopover span.a-icon-alt",
    "[data-hook='rating-out-of-text']",
];

pub const REVIEW_COUNT: &[&str] = &[
    "#acrCustomerReviewText",
    "[data-hook='total-review-count']",
];

pub const COUPON: &[&str] = &[
    "#couponBadgeRegularVpc",
    "#vpcButton",
    "label[id^='couponText']",
    "#promoPriceBlockMessage_feature_div",
    ".promoPriceBlockMessage",
];

/// Instant-discount badges, promotion icons and success-styled boxes.
pub const BANK_OFFER_CANDIDATES: &[&str] = &[
    "#itembox-InstantBankDiscount",
    ".vsx-offers-desktop-lv__item",
    "#sopp_feature_div .a-icon-offer",
    ".a-icon-offer",
    ".a-box.a-alert-success",
    ".a-color-success",
];

/// Lower-cased text of a bank offer must contain one of these.
pub const BANK_OFFER_KEYWORDS: &[&str] = &["bank", "card", "upi", "instant discount"];
