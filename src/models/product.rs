// src/models/product.rs

//! Listing items as returned by the storefront.

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Deserializer};

/// Body of the filtered listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    #[serde(default)]
    pub products: Vec<ProductListing>,
}

/// A single product from the listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub title: String,
    pub slug: String,

    #[serde(default)]
    pub price: Price,

    /// Release time in seconds since the epoch
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub global_release_date: Option<i64>,

    #[serde(default)]
    pub developer: Option<String>,

    #[serde(default)]
    pub publisher: Option<String>,

    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub genres: Vec<String>,

    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub supported_operating_systems: Vec<String>,

    /// Protocol-relative image reference without extension
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default, deserialize_with = "de::null_as_empty")]
    pub gallery: Vec<String>,
}

/// Listing price block; only the amount is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Price {
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub amount: Option<f64>,
}

impl ProductListing {
    /// Catalog slug: the listing slug with underscores turned into hyphens.
    pub fn game_slug(&self) -> String {
        self.slug.replace('_', "-")
    }

    /// Release date as an ISO-8601 UTC timestamp with milliseconds.
    ///
    /// `None` when the listing carries no date or the value is out of range.
    pub fn release_date_iso(&self) -> Option<String> {
        let millis = self.global_release_date?.checked_mul(1000)?;
        DateTime::from_timestamp_millis(millis)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    /// Developer name, if present and non-blank.
    pub fn developer_name(&self) -> Option<&str> {
        non_blank(self.developer.as_deref())
    }

    /// Publisher name, if present and non-blank.
    pub fn publisher_name(&self) -> Option<&str> {
        non_blank(self.publisher.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

mod de {
    use super::*;

    /// The listing sends some numbers as JSON strings.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(serde_json::Number),
        Text(String),
    }

    impl NumberOrText {
        fn as_f64(&self) -> Option<f64> {
            match self {
                Self::Number(n) => n.as_f64(),
                Self::Text(s) => s.trim().parse().ok(),
            }
        }

        fn as_i64(&self) -> Option<i64> {
            match self {
                Self::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
                Self::Text(s) => {
                    let s = s.trim();
                    s.parse::<i64>()
                        .ok()
                        .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                }
            }
        }
    }

    pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<NumberOrText>::deserialize(deserializer)?;
        Ok(value.and_then(|v| v.as_f64()))
    }

    pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<NumberOrText>::deserialize(deserializer)?;
        Ok(value.and_then(|v| v.as_i64()))
    }

    pub fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha() -> ProductListing {
        serde_json::from_value(serde_json::json!({
            "title": "Alpha",
            "slug": "alpha_x",
            "price": { "amount": 0 },
            "globalReleaseDate": "1000000000",
            "genres": ["Action"],
            "supportedOperatingSystems": ["Windows"],
            "developer": "Dev1",
            "publisher": "Pub1",
            "image": "//img/a",
            "gallery": ["//img/g1", "//img/g2"]
        }))
        .unwrap()
    }

    #[test]
    fn parses_listing_item() {
        let product = alpha();
        assert_eq!(product.title, "Alpha");
        assert_eq!(product.price.amount, Some(0.0));
        assert_eq!(product.global_release_date, Some(1_000_000_000));
        assert_eq!(product.supported_operating_systems, vec!["Windows"]);
        assert_eq!(product.gallery.len(), 2);
    }

    #[test]
    fn game_slug_replaces_every_underscore() {
        let mut product = alpha();
        product.slug = "the_witcher_3_wild_hunt".into();
        assert_eq!(product.game_slug(), "the-witcher-3-wild-hunt");
    }

    #[test]
    fn release_date_is_iso_with_millis() {
        assert_eq!(
            alpha().release_date_iso().as_deref(),
            Some("2001-09-09T01:46:40.000Z")
        );
    }

    #[test]
    fn numeric_fields_accept_numbers_and_strings() {
        let product: ProductListing = serde_json::from_value(serde_json::json!({
            "title": "Beta",
            "slug": "beta",
            "price": { "amount": "9.99" },
            "globalReleaseDate": 1_500_000_000
        }))
        .unwrap();
        assert_eq!(product.price.amount, Some(9.99));
        assert_eq!(product.global_release_date, Some(1_500_000_000));
    }

    #[test]
    fn missing_and_null_lists_are_empty() {
        let product: ProductListing = serde_json::from_value(serde_json::json!({
            "title": "Gamma",
            "slug": "gamma",
            "genres": null,
            "globalReleaseDate": null
        }))
        .unwrap();
        assert!(product.genres.is_empty());
        assert!(product.supported_operating_systems.is_empty());
        assert!(product.gallery.is_empty());
        assert_eq!(product.release_date_iso(), None);
        assert_eq!(product.developer_name(), None);
    }

    #[test]
    fn listing_response_wraps_products() {
        let body = r#"{"products":[{"title":"A","slug":"a"}],"totalPages":3}"#;
        let response: ListingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.products.len(), 1);
    }
}
