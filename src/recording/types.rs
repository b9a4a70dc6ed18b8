/// Key of the request bundle inside a recording entry.
pub const REQUEST_KEY: &str = "request";
/// Request slots rewritten inside a request bundle.
pub const CURRENT_REQUEST_KEY: &str = "currentRequest";
pub const ORIGINAL_REQUEST_KEY: &str = "originalRequest";
/// URL string field inside a single request.
pub const URL_KEY: &str = "URL";

/// Knobs controlling how a recording's requests are rewritten.
///
/// `Default` is the corrected behaviour; `legacy()` reproduces the original
/// script, which discards rewritten URLs, narrows request bundles down to
/// the two request slots and strips queries lacking the parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Query parameter holding the SDK version
    pub param: String,
    /// Store the rewritten URL back into the request
    pub apply_rewritten_url: bool,
    /// Drop request bundle keys other than the two request slots
    pub narrow_requests: bool,
    /// Remove the query string of URLs without the parameter
    pub strip_query_without_param: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            param: "pnsdk".to_string(),
            apply_rewritten_url: true,
            narrow_requests: false,
            strip_query_without_param: false,
        }
    }
}

impl RewriteOptions {
    pub fn legacy() -> Self {
        Self {
            apply_rewritten_url: false,
            narrow_requests: true,
            strip_query_without_param: true,
            ..Self::default()
        }
    }
}

/// What `replace_requests` did to one entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// The entry's `request` value was replaced
    pub entry_changed: bool,
    /// Number of request URLs whose stored value changed
    pub urls_rewritten: usize,
}
