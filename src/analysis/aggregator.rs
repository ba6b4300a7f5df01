use crate::config::{MAX_COMPETITORS, TOP_KEYWORDS};
use crate::error::{AppError, Result};
use crate::extract::round2;
use crate::types::{CompetitorRecord, MarketInsights, MarketSummary, PriceRange, ProductRecord};

/// Summarize the target's market. Pure: identical inputs give identical output.
/// Only the first five competitors are considered.
pub fn aggregate(target: ProductRecord, competitors: Vec<CompetitorRecord>) -> Result<MarketSummary> {
    if competitors.is_empty() {
        return Err(AppError::EmptyCompetitorSet { category: target.category_name });
    }

    let mut competitors = competitors;
    competitors.truncate(MAX_COMPETITORS);

    let market_insights = compute_insights(&competitors);
    Ok(MarketSummary {
        category: target.category_name.clone(),
        target_product: target,
        competitors,
        market_insights,
    })
}

/// Caller guarantees `competitors` is non-empty.
fn compute_insights(competitors: &[CompetitorRecord]) -> MarketInsights {
    let n = competitors.len() as f64;

    let total_market_size = competitors.iter().map(|c| c.estimated_sales).sum();
    let average_price = competitors.iter().map(|c| c.price).sum::<f64>() / n;
    let average_rating = competitors.iter().map(|c| c.rating).sum::<f64>() / n;

    let price_range = competitors.iter().fold(
        PriceRange { min: f64::INFINITY, max: f64::NEG_INFINITY },
        |range, c| PriceRange {
            min: range.min.min(c.price),
            max: range.max.max(c.price),
        },
    );

    MarketInsights {
        total_market_size,
        average_price: round2(average_price),
        average_rating: round2(average_rating),
        price_range,
        top_keywords: top_keywords(competitors, TOP_KEYWORDS),
    }
}

/// Rank keywords by frequency across competitors. Ties keep the order in
/// which keywords were first seen while scanning competitors in order.
pub fn top_keywords(competitors: &[CompetitorRecord], limit: usize) -> Vec<String> {
    // (keyword, count) in first-seen order
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for keyword in competitors.iter().flat_map(|c| c.keywords.iter()) {
        match counts.iter_mut().find(|(k, _)| *k == keyword.as_str()) {
            Some((_, n)) => *n += 1,
            None => counts.push((keyword.as_str(), 1)),
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(k, _)| k.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::tables;

    fn competitor(id: &str, price: f64, rating: f64, keywords: &[&str]) -> CompetitorRecord {
        CompetitorRecord {
            identifier: id.to_string(),
            price,
            rating,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..tables().product("B0TEMPLATE")
        }
    }

    #[test]
    fn electronics_fallback_market() {
        let target = tables().product("B01DFKC2SO");
        let competitors = tables().competitors("electronics").to_vec();

        let summary = aggregate(target, competitors).unwrap();
        let m = &summary.market_insights;
        assert_eq!(summary.category, "Electronics");
        assert_eq!(summary.competitors.len(), 3);
        assert_eq!(m.total_market_size, 12000 + 18000 + 9800);
        assert_eq!(m.average_price, 159.99);
        assert_eq!(m.average_rating, 4.53);
        assert_eq!(m.price_range, PriceRange { min: 79.99, max: 249.99 });
        // every electronics keyword appears once, so first-seen order wins
        assert_eq!(m.top_keywords.len(), 9);
        assert_eq!(m.top_keywords[..3], ["budget-friendly", "wireless", "waterproof"]);
    }

    #[test]
    fn empty_competitors_is_an_error() {
        let err = aggregate(tables().product("B01DFKC2SO"), Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::EmptyCompetitorSet { ref category } if category == "Electronics"));
    }

    #[test]
    fn aggregate_is_pure() {
        let target = tables().product("B083TF7YD9");
        let competitors = tables().competitors("sports_outdoors").to_vec();
        let a = aggregate(target.clone(), competitors.clone()).unwrap();
        let b = aggregate(target, competitors).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.market_insights.average_price.to_bits(),
            b.market_insights.average_price.to_bits()
        );
    }

    #[test]
    fn single_competitor_has_finite_fields() {
        let summary =
            aggregate(tables().product("X00000000"), vec![competitor("C1", 0.0, 0.0, &[])]).unwrap();
        let m = &summary.market_insights;
        assert!(m.average_price.is_finite());
        assert!(m.average_rating.is_finite());
        assert_eq!(m.price_range, PriceRange { min: 0.0, max: 0.0 });
        assert!(m.top_keywords.is_empty());
    }

    #[test]
    fn keyword_ties_keep_first_seen_order() {
        let competitors = vec![
            competitor("C1", 10.0, 4.0, &["premium", "wireless"]),
            competitor("C2", 20.0, 4.0, &["compact", "wireless"]),
            competitor("C3", 30.0, 4.0, &["wireless", "premium", "compact"]),
        ];
        assert_eq!(top_keywords(&competitors, 10), ["wireless", "premium", "compact"]);
    }

    #[test]
    fn keywords_are_capped_at_ten() {
        let competitors: Vec<_> = (0..4)
            .map(|i| {
                let words: Vec<String> = (0..4).map(|j| format!("kw{i}{j}")).collect();
                let refs: Vec<&str> = words.iter().map(String::as_str).collect();
                competitor(&format!("C{i}"), 10.0, 4.0, &refs)
            })
            .collect();
        let top = top_keywords(&competitors, TOP_KEYWORDS);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0], "kw00");
        assert_eq!(top[9], "kw21");
    }

    #[test]
    fn only_first_five_competitors_are_summarized() {
        let competitors: Vec<_> = (0..7)
            .map(|i| competitor(&format!("C{i}"), 10.0 * f64::from(i + 1), 4.0, &["x"]))
            .collect();
        let summary = aggregate(tables().product("B01DFKC2SO"), competitors).unwrap();
        assert_eq!(summary.competitors.len(), 5);
        assert_eq!(summary.market_insights.price_range.max, 50.0);
        assert_eq!(summary.market_insights.average_price, 30.0);
    }
}
