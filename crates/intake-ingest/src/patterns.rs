//! Header text patterns shared by header detection and column auto-mapping.
//!
//! All patterns are case-insensitive and anchored at the start of the
//! normalized (trimmed, uppercased) header text.

use std::sync::LazyLock;

use intake_model::{ColumnRole, WizardKind};
use regex::Regex;

static STYLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(style|product style|style\s*(#|no|number|id)|sku|item\s*(#|no|number))")
        .expect("Invalid style regex")
});

static BRAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(brand|manufacturer|make|label|designer|vendor)")
        .expect("Invalid brand regex")
});

static MSRP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(msrp|manufacturer\s*suggested\s*retail\s*price|list\s*price|suggested\s*retail)",
    )
    .expect("Invalid MSRP regex")
});

static CATEGORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(category|product\s*category|product\s*type|department|dept|class)")
        .expect("Invalid category regex")
});

static COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(colou?r|colou?r\s*name)").expect("Invalid color regex")
});

static GENDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(gender|sex)").expect("Invalid gender regex"));

static SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(size)").expect("Invalid size regex"));

static QTY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(qty|quantity)").expect("Invalid quantity regex"));

static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(price|cost)").expect("Invalid price regex"));

static IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(image|photo|picture|img|readImage|imageAdd)").expect("Invalid image regex")
});

/// Looser test used when guessing a fallback image column.
static IMAGE_MENTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(image|photo|picture|img)").expect("Invalid image mention regex")
});

/// Image-link wizard: any header mentioning a link or an image.
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(link|url|image|photo|picture|img)").expect("Invalid link regex")
});

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://").expect("Invalid URL regex"));

/// Roles whose patterns mark a row as the header row.
pub const HEADER_ROLES: [ColumnRole; 3] = [ColumnRole::Style, ColumnRole::Brand, ColumnRole::Msrp];

/// Order in which auto-mapping tries each role against a header.
///
/// `ReadImage` stands for the image pair.
pub const AUTO_MAP_PRIORITY: [ColumnRole; 10] = [
    ColumnRole::Style,
    ColumnRole::Brand,
    ColumnRole::Msrp,
    ColumnRole::Category,
    ColumnRole::Color,
    ColumnRole::Gender,
    ColumnRole::Size,
    ColumnRole::Qty,
    ColumnRole::Price,
    ColumnRole::ReadImage,
];

/// Trims and uppercases header text before matching.
pub fn normalize_header(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Pattern for `role`. Both image roles share one pattern.
pub fn pattern_for(role: ColumnRole) -> &'static Regex {
    match role {
        ColumnRole::Style => &STYLE_PATTERN,
        ColumnRole::Brand => &BRAND_PATTERN,
        ColumnRole::Msrp => &MSRP_PATTERN,
        ColumnRole::Category => &CATEGORY_PATTERN,
        ColumnRole::Color => &COLOR_PATTERN,
        ColumnRole::Gender => &GENDER_PATTERN,
        ColumnRole::Size => &SIZE_PATTERN,
        ColumnRole::Qty => &QTY_PATTERN,
        ColumnRole::Price => &PRICE_PATTERN,
        ColumnRole::ReadImage | ColumnRole::ImageAdd => &IMAGE_PATTERN,
    }
}

/// Pattern auto-mapping uses for the image pair under `wizard`.
pub fn image_pattern(wizard: WizardKind) -> &'static Regex {
    match wizard {
        WizardKind::ImageLink => &LINK_PATTERN,
        WizardKind::Crop => &IMAGE_MENTION_PATTERN,
        WizardKind::GoogleImages | WizardKind::Reformat | WizardKind::DataWarehouse(_) => {
            &IMAGE_PATTERN
        }
    }
}

/// Whether `header` matches the pattern for `role` after normalization.
pub fn matches_role(role: ColumnRole, header: &str) -> bool {
    pattern_for(role).is_match(&normalize_header(header))
}

/// Whether `value` looks like a header row token (style, brand or MSRP).
pub fn is_header_token(value: &str) -> bool {
    HEADER_ROLES.iter().any(|role| matches_role(*role, value))
}

pub fn mentions_image(header: &str) -> bool {
    IMAGE_MENTION_PATTERN.is_match(header)
}

pub fn is_http_url(value: &str) -> bool {
    URL_PATTERN.is_match(value.trim())
}
