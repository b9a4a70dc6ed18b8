pub mod query;
pub mod types;

pub use query::replace_sdk_version_in_url;
pub use types::{RewriteOptions, RewriteOutcome};

use plist::{Dictionary, Value};
use thiserror::Error;
use tracing::debug;

use types::{CURRENT_REQUEST_KEY, ORIGINAL_REQUEST_KEY, REQUEST_KEY, URL_KEY};

/// The request slots inside a request bundle, in the order they are written.
const REQUEST_SLOTS: [&str; 2] = [CURRENT_REQUEST_KEY, ORIGINAL_REQUEST_KEY];

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("Invalid request URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// One recorded interaction inside a fixture file.
///
/// Missing keys are never errors: an entry without `request`, a bundle
/// without either request slot, or a request without a string `URL` is
/// passed through untouched.
pub struct Recording<'a> {
    plist_item: &'a mut Dictionary,
}

impl<'a> Recording<'a> {
    pub fn new(plist_item: &'a mut Dictionary) -> Self {
        Self { plist_item }
    }

    /// The value stored under `request`, if any.
    pub fn get_requests(&self) -> Option<&Value> {
        self.plist_item.get(REQUEST_KEY)
    }

    /// Rewrite the SDK version in this entry's requests and store the
    /// resulting request bundle back under `request`.
    ///
    /// Without narrowing, an entry whose `request` is missing or not a
    /// dictionary is left as is. With narrowing, `request` is always
    /// overwritten, with an empty dictionary if there was nothing to keep.
    pub fn replace_requests(
        &mut self,
        sdk_version: &str,
        options: &RewriteOptions,
    ) -> Result<RewriteOutcome, RecordingError> {
        let requests = self.get_requests();
        let old_bundle = requests.and_then(Value::as_dictionary);
        if old_bundle.is_none() && !options.narrow_requests {
            debug!("entry has no request bundle, skipping");
            return Ok(RewriteOutcome::default());
        }

        let updated = updated_requests(requests, sdk_version, options)?;
        let outcome = RewriteOutcome {
            entry_changed: old_bundle != Some(&updated),
            urls_rewritten: count_rewritten_urls(old_bundle, &updated),
        };

        self.plist_item
            .insert(REQUEST_KEY.to_string(), Value::Dictionary(updated));
        Ok(outcome)
    }
}

/// Build the rewritten request bundle.
///
/// Each request slot present in `requests` goes through
/// [`update_specific_request`]. Other keys are kept in place unless
/// `narrow_requests` is set, in which case the result holds only the
/// request slots that were present.
pub fn updated_requests(
    requests: Option<&Value>,
    sdk_version: &str,
    options: &RewriteOptions,
) -> Result<Dictionary, RecordingError> {
    let Some(requests) = requests.and_then(Value::as_dictionary) else {
        return Ok(Dictionary::new());
    };

    let mut updated = if options.narrow_requests {
        Dictionary::new()
    } else {
        requests.clone()
    };

    for slot in REQUEST_SLOTS {
        let Some(request) = requests.get(slot) else {
            continue;
        };
        let rewritten = match request.as_dictionary() {
            Some(request) => {
                Value::Dictionary(update_specific_request(request, sdk_version, options)?)
            }
            None => request.clone(),
        };
        updated.insert(slot.to_string(), rewritten);
    }

    Ok(updated)
}

/// Rewrite the `URL` of a single request.
///
/// The rewritten URL is only stored when `apply_rewritten_url` is set;
/// otherwise it is computed and dropped, and the request comes back as it was.
pub fn update_specific_request(
    request: &Dictionary,
    sdk_version: &str,
    options: &RewriteOptions,
) -> Result<Dictionary, RecordingError> {
    let mut updated = request.clone();
    let Some(raw_url) = request.get(URL_KEY).and_then(Value::as_string) else {
        debug!("request has no URL string, skipping");
        return Ok(updated);
    };

    let rewritten = replace_sdk_version_in_url(
        raw_url,
        &options.param,
        sdk_version,
        options.strip_query_without_param,
    )?;

    if options.apply_rewritten_url {
        updated.insert(URL_KEY.to_string(), Value::String(rewritten));
    } else {
        debug!(url = %rewritten, "discarding rewritten URL");
    }
    Ok(updated)
}

fn count_rewritten_urls(old: Option<&Dictionary>, updated: &Dictionary) -> usize {
    REQUEST_SLOTS
        .into_iter()
        .filter(|&slot| {
            let after = request_url(Some(updated), slot);
            after.is_some() && after != request_url(old, slot)
        })
        .count()
}

fn request_url<'d>(bundle: Option<&'d Dictionary>, slot: &str) -> Option<&'d str> {
    bundle?
        .get(slot)?
        .as_dictionary()?
        .get(URL_KEY)?
        .as_string()
}
