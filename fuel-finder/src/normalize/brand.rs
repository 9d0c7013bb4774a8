//! Known fuel brands.
//!
//! A brand is recognised by case-insensitive substring match against its
//! variants. Table order decides ties.

use serde::Serialize;

use crate::domain::UNKNOWN_BRAND;

/// Display metadata for a brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandStyle {
    pub emoji: String,
    pub color: String,
}

impl BrandStyle {
    fn new(emoji: &str, color: &str) -> Self {
        Self {
            emoji: emoji.to_string(),
            color: color.to_string(),
        }
    }

    fn unknown() -> Self {
        Self::new("⛽", "gray")
    }
}

/// A brand label with the lowercase substrings that identify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownBrand {
    pub label: String,
    variants: Vec<String>,
    pub style: BrandStyle,
}

impl KnownBrand {
    /// Create a brand. Variants are matched case-insensitively; blank ones
    /// are dropped.
    pub fn new<I, S>(label: impl Into<String>, variants: I, style: BrandStyle) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            label: label.into(),
            variants: variants
                .into_iter()
                .map(|v| v.as_ref().trim().to_lowercase())
                .filter(|v| !v.is_empty())
                .collect(),
            style,
        }
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    fn matches(&self, lowered: &str) -> bool {
        self.variants.iter().any(|v| lowered.contains(v.as_str()))
    }
}

/// Error parsing a brand table string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid brand entry '{entry}': {reason}")]
pub struct InvalidBrandTable {
    entry: String,
    reason: &'static str,
}

/// Ordered table of known brands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandTable {
    brands: Vec<KnownBrand>,
}

impl BrandTable {
    pub fn new(brands: Vec<KnownBrand>) -> Self {
        Self { brands }
    }

    /// Parse `Label=variant|variant;Label=variant`.
    ///
    /// Labels keep their case; an entry without variants matches on its
    /// label. Parsed brands get the style of the default brand with the same
    /// label, or the unknown style.
    ///
    /// ```
    /// use fuel_finder::normalize::BrandTable;
    ///
    /// let table = BrandTable::parse("PSO=pso|pakistan state oil;Shell").unwrap();
    /// assert_eq!(table.infer("Pakistan State Oil Blue Area"), Some("PSO"));
    /// assert_eq!(table.infer("shell f-8"), Some("Shell"));
    /// ```
    pub fn parse(table: &str) -> Result<Self, InvalidBrandTable> {
        let defaults = BrandTable::default();
        let mut brands = Vec::new();

        for entry in table.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (label, variants) = match entry.split_once('=') {
                Some((label, variants)) => (label.trim(), variants),
                None => (entry, entry),
            };
            if label.is_empty() {
                return Err(InvalidBrandTable {
                    entry: entry.to_string(),
                    reason: "missing label",
                });
            }

            let style = defaults
                .find(label)
                .map(|b| b.style.clone())
                .unwrap_or_else(BrandStyle::unknown);
            let brand = KnownBrand::new(label, variants.split('|'), style);
            if brand.variants.is_empty() {
                return Err(InvalidBrandTable {
                    entry: entry.to_string(),
                    reason: "no variants",
                });
            }
            brands.push(brand);
        }

        Ok(Self { brands })
    }

    pub fn brands(&self) -> &[KnownBrand] {
        &self.brands
    }

    /// Infer a brand label from free text such as a station name.
    pub fn infer(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.brands
            .iter()
            .find(|b| b.matches(&lowered))
            .map(|b| b.label.as_str())
    }

    /// Look up a brand by exact label, ignoring case.
    pub fn find(&self, label: &str) -> Option<&KnownBrand> {
        self.brands
            .iter()
            .find(|b| b.label.eq_ignore_ascii_case(label.trim()))
    }

    /// Display style for any brand string, falling back to the unknown style.
    pub fn style(&self, brand: &str) -> BrandStyle {
        if brand == UNKNOWN_BRAND {
            return BrandStyle::unknown();
        }
        let lowered = brand.to_lowercase();
        self.brands
            .iter()
            .find(|b| b.matches(&lowered) || lowered.contains(&b.label.to_lowercase()))
            .map(|b| b.style.clone())
            .unwrap_or_else(BrandStyle::unknown)
    }
}

impl Default for BrandTable {
    fn default() -> Self {
        Self::new(vec![
            KnownBrand::new(
                "PSO",
                ["pso", "pakistan state oil"],
                BrandStyle::new("🟢", "green"),
            ),
            KnownBrand::new("Shell", ["shell"], BrandStyle::new("🐚", "yellow")),
            KnownBrand::new(
                "Total",
                ["total", "totalenergies"],
                BrandStyle::new("🔴", "red"),
            ),
            KnownBrand::new(
                "Attock",
                ["attock", "attock petroleum"],
                BrandStyle::new("🟠", "orange"),
            ),
            KnownBrand::new("Hascol", ["hascol"], BrandStyle::new("🔵", "blue")),
            KnownBrand::new(
                "GO",
                ["go petroleum", "gas & oil", "gas and oil"],
                BrandStyle::new("🟣", "purple"),
            ),
            KnownBrand::new("Byco", ["byco"], BrandStyle::new("🟤", "brown")),
        ])
    }
}
