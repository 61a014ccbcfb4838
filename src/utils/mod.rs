//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Build an absolute image URL from a storefront image reference.
///
/// References are protocol-relative (`//images.example/abc`); `https:` is
/// prefixed and the crop-size `suffix` appended.
pub fn image_url(reference: &str, suffix: &str) -> String {
    let base = if reference.starts_with("https://") || reference.starts_with("http://") {
        reference.to_string()
    } else {
        format!("https:{reference}")
    };
    format!("{base}{suffix}")
}

/// Build the listing URL: fixed parameters first, then caller filters.
pub fn listing_url(base: &str, params: &[(String, String)]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("mediaType", "game")
            .append_pair("page", "1")
            .append_pair("sort", "popularity");
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}

/// Parse a `key=value` filter argument.
pub fn parse_param(raw: &str) -> Option<(String, String)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("//images.gog.com/abc", "_bg_crop_1680x655.jpg"),
            "https://images.gog.com/abc_bg_crop_1680x655.jpg"
        );
        assert_eq!(
            image_url("https://cdn.example/x", ".jpg"),
            "https://cdn.example/x.jpg"
        );
    }

    #[test]
    fn test_listing_url() {
        let params = vec![
            ("price".to_string(), "free".to_string()),
            ("genres".to_string(), "action rpg".to_string()),
        ];
        let url = listing_url("https://www.gog.com/games/ajax/filtered", &params).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.gog.com/games/ajax/filtered?mediaType=game&page=1&sort=popularity&price=free&genres=action+rpg"
        );
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("price=free"),
            Some(("price".to_string(), "free".to_string()))
        );
        assert_eq!(
            parse_param("search=a=b"),
            Some(("search".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_param("novalue"), None);
        assert_eq!(parse_param("=x"), None);
    }
}
