//! Static product and competitor tables served when live catalog calls are
//! unavailable. Built once on first access and shared read-only afterwards.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use crate::types::{CompetitorRecord, PriceRange, ProductRecord};

/// Key of the bucket used for unknown identifiers and categories.
pub const DEFAULT_KEY: &str = "default";

static TABLES: LazyLock<FallbackTables> = LazyLock::new(FallbackTables::builtin);

/// The process-wide fallback tables.
pub fn tables() -> &'static FallbackTables {
    &TABLES
}

#[derive(Debug)]
pub struct FallbackTables {
    products: HashMap<String, ProductRecord>,
    default_product: ProductRecord,
    competitors: HashMap<&'static str, Vec<CompetitorRecord>>,
    default_competitors: Vec<CompetitorRecord>,
}

impl FallbackTables {
    /// Exact-match lookup on a normalized identifier. Unknown identifiers get
    /// the default record carrying the requested identifier.
    pub fn product(&self, identifier: &str) -> ProductRecord {
        match self.products.get(identifier) {
            Some(record) => record.clone(),
            None => ProductRecord {
                identifier: identifier.to_string(),
                ..self.default_product.clone()
            },
        }
    }

    pub fn competitors(&self, category_id: &str) -> &[CompetitorRecord] {
        self.competitors
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&self.default_competitors)
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn category_count(&self) -> usize {
        self.competitors.len()
    }

    fn builtin() -> Self {
        let electronics = ("electronics", "Electronics");
        let home_kitchen = ("home_kitchen", "Home & Kitchen");
        let sports_outdoors = ("sports_outdoors", "Sports & Outdoors");
        let general = ("general", "General");

        let products = [
            Seed {
                asin: "B01DFKC2SO",
                title: "Premium Wireless Headphones",
                price: 199.99,
                rating: 4.7,
                reviews: 3250,
                sales: 15000,
                share: 22.0,
                keywords: &["noise-cancelling", "wireless", "premium", "long-battery"],
                history: (179.99, 219.99),
                ranks: &[("Electronics", 28), ("Headphones", 5)],
            }
            .build(electronics),
            Seed {
                asin: "B07X2LSDM3",
                title: "Smart Coffee Maker",
                price: 129.99,
                rating: 4.5,
                reviews: 1820,
                sales: 9500,
                share: 18.0,
                keywords: &["smart-home", "programmable", "sleek-design", "energy-efficient"],
                history: (119.99, 149.99),
                ranks: &[("Home & Kitchen", 45), ("Coffee Makers", 8)],
            }
            .build(home_kitchen),
            Seed {
                asin: "B083TF7YD9",
                title: "Ultralight Camping Tent",
                price: 249.99,
                rating: 4.8,
                reviews: 950,
                sales: 4500,
                share: 15.0,
                keywords: &["lightweight", "waterproof", "easy-setup", "durable"],
                history: (229.99, 269.99),
                ranks: &[("Sports & Outdoors", 72), ("Camping Tents", 3)],
            }
            .build(sports_outdoors),
        ];

        let default_product = Seed {
            asin: DEFAULT_KEY,
            title: "Sample Product",
            price: 99.99,
            rating: 4.5,
            reviews: 250,
            sales: 1200,
            share: 15.0,
            keywords: &["premium", "reliable", "fast", "innovative"],
            history: (89.99, 109.99),
            ranks: &[("Electronics", 150), ("Tech Gadgets", 45)],
        }
        .build(electronics);

        let electronics_competitors = vec![
            Seed {
                asin: "B08X7JL3QL",
                title: "Budget Wireless Earbuds",
                price: 79.99,
                rating: 4.2,
                reviews: 2100,
                sales: 12000,
                share: 8.0,
                keywords: &["budget-friendly", "wireless", "waterproof"],
                history: (69.99, 89.99),
                ranks: &[("Electronics", 45), ("Headphones", 12)],
            }
            .build(electronics),
            Seed {
                asin: "B07NDFT2NB",
                title: "Premium Over-Ear Headphones",
                price: 249.99,
                rating: 4.8,
                reviews: 3800,
                sales: 18000,
                share: 25.0,
                keywords: &["studio-quality", "premium", "noise-cancelling"],
                history: (229.99, 279.99),
                ranks: &[("Electronics", 22), ("Headphones", 2)],
            }
            .build(electronics),
            Seed {
                asin: "B09KL7SV1M",
                title: "Mid-Range Wireless Headset",
                price: 149.99,
                rating: 4.6,
                reviews: 1950,
                sales: 9800,
                share: 15.0,
                keywords: &["comfortable", "long-battery", "microphone"],
                history: (129.99, 159.99),
                ranks: &[("Electronics", 38), ("Headphones", 8)],
            }
            .build(electronics),
        ];

        let home_kitchen_competitors = vec![
            Seed {
                asin: "B082VRM1VL",
                title: "Basic Coffee Maker",
                price: 59.99,
                rating: 4.3,
                reviews: 1250,
                sales: 7500,
                share: 12.0,
                keywords: &["simple", "reliable", "compact"],
                history: (49.99, 69.99),
                ranks: &[("Home & Kitchen", 95), ("Coffee Makers", 15)],
            }
            .build(home_kitchen),
            Seed {
                asin: "B07PCMTW4Y",
                title: "Premium Espresso Machine",
                price: 299.99,
                rating: 4.7,
                reviews: 950,
                sales: 4200,
                share: 8.0,
                keywords: &["espresso", "premium", "italian-design"],
                history: (279.99, 349.99),
                ranks: &[("Home & Kitchen", 120), ("Coffee Makers", 5)],
            }
            .build(home_kitchen),
            Seed {
                asin: "B09STVN7JG",
                title: "Smart Coffee System",
                price: 199.99,
                rating: 4.6,
                reviews: 850,
                sales: 5100,
                share: 10.0,
                keywords: &["all-in-one", "app-controlled", "customizable"],
                history: (189.99, 229.99),
                ranks: &[("Home & Kitchen", 75), ("Coffee Makers", 3)],
            }
            .build(home_kitchen),
        ];

        let sports_outdoors_competitors = vec![
            Seed {
                asin: "B07XTLNLCL",
                title: "Budget Camping Tent",
                price: 89.99,
                rating: 4.1,
                reviews: 780,
                sales: 3800,
                share: 12.0,
                keywords: &["affordable", "basic", "starter"],
                history: (79.99, 99.99),
                ranks: &[("Sports & Outdoors", 150), ("Camping Tents", 18)],
            }
            .build(sports_outdoors),
            Seed {
                asin: "B08LTRD3VJ",
                title: "Family Size Camping Tent",
                price: 329.99,
                rating: 4.5,
                reviews: 620,
                sales: 2500,
                share: 8.0,
                keywords: &["family-size", "weatherproof", "spacious"],
                history: (299.99, 349.99),
                ranks: &[("Sports & Outdoors", 95), ("Camping Tents", 5)],
            }
            .build(sports_outdoors),
            Seed {
                asin: "B09HGYSVTS",
                title: "Premium Backpacking Tent",
                price: 279.99,
                rating: 4.9,
                reviews: 450,
                sales: 2200,
                share: 7.0,
                keywords: &["ultralight", "professional", "expedition"],
                history: (259.99, 299.99),
                ranks: &[("Sports & Outdoors", 110), ("Camping Tents", 4)],
            }
            .build(sports_outdoors),
        ];

        let default_competitors = vec![
            Seed {
                asin: "B0123COMP1",
                title: "Competitor Product 1",
                price: 89.99,
                rating: 4.3,
                reviews: 180,
                sales: 800,
                share: 12.0,
                keywords: &["budget-friendly", "reliable", "basic"],
                history: (79.99, 99.99),
                ranks: &[("Electronics", 180), ("Tech Gadgets", 55)],
            }
            .build(general),
            Seed {
                asin: "B0123COMP2",
                title: "Competitor Product 2",
                price: 109.99,
                rating: 4.7,
                reviews: 320,
                sales: 1500,
                share: 18.0,
                keywords: &["premium", "advanced", "professional"],
                history: (99.99, 119.99),
                ranks: &[("Electronics", 120), ("Tech Gadgets", 35)],
            }
            .build(general),
            Seed {
                asin: "B0123COMP3",
                title: "Competitor Product 3",
                price: 94.99,
                rating: 4.4,
                reviews: 210,
                sales: 950,
                share: 14.0,
                keywords: &["mid-range", "quality", "value"],
                history: (84.99, 104.99),
                ranks: &[("Electronics", 165), ("Tech Gadgets", 50)],
            }
            .build(general),
        ];

        Self {
            products: products
                .into_iter()
                .map(|p| (p.identifier.clone(), p))
                .collect(),
            default_product,
            competitors: HashMap::from([
                (electronics.0, electronics_competitors),
                (home_kitchen.0, home_kitchen_competitors),
                (sports_outdoors.0, sports_outdoors_competitors),
            ]),
            default_competitors,
        }
    }
}

/// Literal form of a table row.
struct Seed {
    asin: &'static str,
    title: &'static str,
    price: f64,
    rating: f64,
    reviews: u32,
    sales: u64,
    share: f64,
    keywords: &'static [&'static str],
    history: (f64, f64),
    ranks: &'static [(&'static str, u32)],
}

impl Seed {
    fn build(self, (category_id, category_name): (&str, &str)) -> ProductRecord {
        ProductRecord {
            identifier: self.asin.to_string(),
            title: self.title.to_string(),
            price: self.price,
            rating: self.rating,
            review_count: self.reviews,
            estimated_sales: self.sales,
            market_share: self.share,
            category_id: category_id.to_string(),
            category_name: category_name.to_string(),
            keywords: self.keywords.iter().map(|k| k.to_string()).collect(),
            price_history: PriceRange { min: self.history.0, max: self.history.1 },
            rankings: self
                .ranks
                .iter()
                .map(|(name, rank)| (name.to_string(), *rank))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}
