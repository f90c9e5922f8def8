//! Filter criteria shared by the listing routes and the browsing client.
//!
//! Every dimension is optional; an absent dimension places no constraint on
//! the result, and present dimensions combine with AND.

/// Inclusive price bounds. `max == None` means unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceRange {
    #[must_use]
    pub fn new(min: u64, max: Option<u64>) -> Self {
        Self { min, max }
    }

    /// Parses the `"<min>-<max>"` / `"<min>+"` encoding used by the price
    /// selector.
    ///
    /// Parsing is lenient: a bound that does not parse places no constraint
    /// on its side of the range. Returns `None` when neither bound parses,
    /// which callers treat as "no price filter".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let (min_raw, max_raw) = if let Some(min_raw) = raw.strip_suffix('+') {
            (min_raw, None)
        } else if let Some((min_raw, max_raw)) = raw.split_once('-') {
            (min_raw, Some(max_raw))
        } else {
            (raw, None)
        };

        let min = parse_bound(min_raw);
        let max = max_raw.and_then(parse_bound);

        if min.is_none() && max.is_none() {
            tracing::debug!(price_range = raw, "ignoring unparseable price range");
            return None;
        }
        if min.is_none() {
            tracing::debug!(price_range = raw, "ignoring unparseable lower price bound");
        }
        if max_raw.is_some() && max.is_none() {
            tracing::debug!(price_range = raw, "ignoring unparseable upper price bound");
        }

        Some(Self {
            min: min.unwrap_or(0),
            max,
        })
    }

    #[must_use]
    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{max}", self.min),
            None => write!(f, "{}+", self.min),
        }
    }
}

fn parse_bound(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

/// Conjunctive filter over listings.
///
/// `category` is honoured server-side only; the browsing client filters
/// already-loaded listings on the other three dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub free_text: Option<String>,
    pub price_range: Option<PriceRange>,
    pub country: Option<String>,
    pub category: Option<String>,
}

impl SearchCriteria {
    /// Criteria for the free-text search entry point.
    #[must_use]
    pub fn text(query: &str) -> Self {
        Self {
            free_text: non_empty(query),
            ..Self::default()
        }
    }

    /// Criteria for the category browse entry point.
    #[must_use]
    pub fn category(category: &str) -> Self {
        Self {
            category: non_empty(category),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_free_text(mut self, query: &str) -> Self {
        self.free_text = non_empty(query);
        self
    }

    #[must_use]
    pub fn with_price_range(mut self, raw: &str) -> Self {
        self.price_range = PriceRange::parse(raw);
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: &str) -> Self {
        self.country = non_empty(country);
        self
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.free_text.is_none()
            && self.price_range.is_none()
            && self.country.is_none()
            && self.category.is_none()
    }
}

/// Empty input means "no constraint" for every text dimension.
fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
