use url::form_urlencoded;
use url::Url;

use super::RecordingError;

/// Rewrite the `param` query parameter of `raw_url` to `sdk_version`.
///
/// Only the query slice of the string changes: everything before `?` and
/// from `#` onward is kept byte for byte. The URL must still parse as an
/// absolute URL.
///
/// The query is decoded into ordered (key, value) pairs, blank values
/// included. Every occurrence of `param` collapses into a single pair holding
/// `sdk_version`, placed where the first occurrence was; all other pairs keep
/// their order. The query is then re-encoded once as form-urlencoded text.
///
/// When `param` is absent the URL is returned as given, or with its query
/// removed if `strip_query_without_param` is set.
pub fn replace_sdk_version_in_url(
    raw_url: &str,
    param: &str,
    sdk_version: &str,
    strip_query_without_param: bool,
) -> Result<String, RecordingError> {
    Url::parse(raw_url).map_err(|e| RecordingError::InvalidUrl {
        url: raw_url.to_string(),
        reason: e.to_string(),
    })?;

    let parts = UrlParts::split(raw_url);
    let Some(query) = parts.query else {
        return Ok(raw_url.to_string());
    };

    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if !pairs.iter().any(|(key, _)| key == param) {
        if strip_query_without_param {
            return Ok(format!("{}{}", parts.base, parts.fragment));
        }
        return Ok(raw_url.to_string());
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut replaced = false;
    for (key, value) in &pairs {
        if key != param {
            serializer.append_pair(key, value);
        } else if !replaced {
            serializer.append_pair(key, sdk_version);
            replaced = true;
        }
    }
    Ok(format!("{}?{}{}", parts.base, serializer.finish(), parts.fragment))
}

/// Raw slices of a URL string around its query.
struct UrlParts<'a> {
    /// Everything before `?` (or before `#` when there is no query)
    base: &'a str,
    /// Text between `?` and `#`, without either delimiter
    query: Option<&'a str>,
    /// `#` and everything after it, or empty
    fragment: &'a str,
}

impl<'a> UrlParts<'a> {
    fn split(raw: &'a str) -> Self {
        let (rest, fragment) = match raw.find('#') {
            Some(at) => raw.split_at(at),
            None => (raw, ""),
        };
        match rest.split_once('?') {
            Some((base, query)) => Self {
                base,
                query: Some(query),
                fragment,
            },
            None => Self {
                base: rest,
                query: None,
                fragment,
            },
        }
    }
}
