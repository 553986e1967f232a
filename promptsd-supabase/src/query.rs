//! PostgREST request builders for the `characters` table.

use promptsd_core::{ContentQuery, CoreError, SearchQuery};
use url::Url;

/// Nested selection: a character with its assets, music and tags
pub const CHARACTER_SELECT: &str = "*,assets(*),music(*),character_tags(tags(*))";

const CHARACTERS_PATH: [&str; 3] = ["rest", "v1", "characters"];

/// Build the `characters` endpoint from the project URL.
///
/// # Errors
///
/// Returns `ConfigInvalid` if `project_url` is not an absolute http(s) URL.
pub fn characters_endpoint(project_url: &str) -> Result<Url, CoreError> {
    let mut url = Url::parse(project_url.trim()).map_err(|e| CoreError::ConfigInvalid {
        message: format!("supabase.url is not a valid URL: {e}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::ConfigInvalid {
            message: format!("supabase.url must be http(s), got {}", url.scheme()),
        });
    }

    url.set_query(None);
    url.path_segments_mut()
        .map_err(|()| CoreError::ConfigInvalid {
            message: "supabase.url cannot be used as a base URL".into(),
        })?
        .pop_if_empty()
        .extend(CHARACTERS_PATH);

    Ok(url)
}

/// Gallery listing, paged. The status filter and sort order come from the query,
/// so the same builder serves the public gallery and the moderation queue.
#[must_use]
pub fn list_url(endpoint: &Url, query: &ContentQuery) -> Url {
    let mut url = endpoint.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("select", CHARACTER_SELECT);
        if let Some(status) = query.status_filter() {
            pairs.append_pair("status", &format!("eq.{}", status.as_str()));
        }
        if let Some(has_music) = query.has_music {
            pairs.append_pair("has_music", &format!("eq.{has_music}"));
        }
        pairs
            .append_pair("order", query.order.as_order_param())
            .append_pair("offset", &query.offset.to_string())
            .append_pair("limit", &query.limit.to_string());
    }
    url
}

/// Single character by id, any status
#[must_use]
pub fn get_url(endpoint: &Url, id: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("select", CHARACTER_SELECT)
        .append_pair("id", &format!("eq.{id}"))
        .append_pair("limit", "1");
    url
}

/// Case-insensitive name search over public characters
#[must_use]
pub fn search_url(endpoint: &Url, query: &SearchQuery) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("select", CHARACTER_SELECT)
        .append_pair("name", &format!("ilike.*{}*", escape_like(query.term())))
        .append_pair("status", "eq.public")
        .append_pair("limit", &query.limit.to_string());
    url
}

/// Escape `ilike` metacharacters so user input only ever matches literally.
/// PostgREST turns `*` into `%`, so it is escaped alongside `%` and `_`.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_' | '*') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptsd_core::{GalleryTab, ModerationStatus, SortOrder};

    fn endpoint() -> Url {
        characters_endpoint("https://project.supabase.co").unwrap()
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_endpoint_path() {
        assert_eq!(
            endpoint().as_str(),
            "https://project.supabase.co/rest/v1/characters"
        );
        assert_eq!(
            characters_endpoint("http://127.0.0.1:54321/").unwrap().as_str(),
            "http://127.0.0.1:54321/rest/v1/characters"
        );
    }

    #[test]
    fn test_endpoint_rejects_bad_urls() {
        for bad in ["", "not a url", "ftp://project.supabase.co", "mailto:admin@example.com"] {
            assert!(
                matches!(characters_endpoint(bad), Err(CoreError::ConfigInvalid { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_music_tab_listing() {
        let url = list_url(&endpoint(), &ContentQuery::for_tab(GalleryTab::Music));
        let pairs = pairs(&url);

        assert_eq!(value(&pairs, "select"), Some(CHARACTER_SELECT));
        assert_eq!(value(&pairs, "status"), Some("eq.public"));
        assert_eq!(value(&pairs, "has_music"), Some("eq.true"));
        assert_eq!(value(&pairs, "order"), Some("created_at.desc"));
        assert_eq!(value(&pairs, "offset"), Some("0"));
        assert_eq!(value(&pairs, "limit"), Some("50"));
    }

    #[test]
    fn test_include_all_listing_has_no_status_filter() {
        let query = ContentQuery::for_tab(GalleryTab::All)
            .with_include_all(true)
            .with_page(20, 10);
        let pairs = pairs(&list_url(&endpoint(), &query));

        assert_eq!(value(&pairs, "status"), None);
        assert_eq!(value(&pairs, "has_music"), None);
        assert_eq!(value(&pairs, "offset"), Some("20"));
        assert_eq!(value(&pairs, "limit"), Some("10"));
    }

    #[test]
    fn test_get_by_id() {
        let pairs = pairs(&get_url(&endpoint(), "char-1"));
        assert_eq!(value(&pairs, "id"), Some("eq.char-1"));
        assert_eq!(value(&pairs, "limit"), Some("1"));
        assert_eq!(value(&pairs, "status"), None);
    }

    #[test]
    fn test_search_is_public_ilike() {
        let query = SearchQuery::new("  star mage ").unwrap();
        let pairs = pairs(&search_url(&endpoint(), &query));

        assert_eq!(value(&pairs, "name"), Some("ilike.*star mage*"));
        assert_eq!(value(&pairs, "status"), Some("eq.public"));
        assert_eq!(value(&pairs, "limit"), Some("10"));
    }

    #[test]
    fn test_search_escapes_wildcards() {
        for (term, expected) in [
            ("a_b", r"ilike.*a\_b*"),
            ("100%", r"ilike.*100\%*"),
            ("star*", r"ilike.*star\**"),
            (r"back\slash", r"ilike.*back\\slash*"),
        ] {
            let query = SearchQuery::new(term).unwrap();
            let pairs = pairs(&search_url(&endpoint(), &query));
            assert_eq!(value(&pairs, "name"), Some(expected), "{term}");
        }
    }

    #[test]
    fn test_pending_queue_listing() {
        let pairs = pairs(&list_url(&endpoint(), &ContentQuery::pending_queue()));

        assert_eq!(value(&pairs, "status"), Some("eq.pending"));
        assert_eq!(value(&pairs, "order"), Some("created_at.asc"));
        assert_eq!(value(&pairs, "has_music"), None);
    }

    #[test]
    fn test_explicit_status_overrides_include_all() {
        let query = ContentQuery::default()
            .with_include_all(true)
            .with_status(ModerationStatus::Reject)
            .with_order(SortOrder::OldestFirst);
        let pairs = pairs(&list_url(&endpoint(), &query));

        assert_eq!(value(&pairs, "status"), Some("eq.reject"));
        assert_eq!(value(&pairs, "order"), Some("created_at.asc"));
    }
}
