use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    api::RemoteApi,
    error::{RemoteError, Result},
    http_client::Transport,
    link::next_link,
};

/// One JSON object returned by a listing endpoint.
pub type Record = Map<String, Value>;

/// Characters left alone when encoding query values.
pub(crate) const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Builds the first-page URL of a keyset paginated listing.
///
/// `pagination` and `page` are dropped from `params`: offset paging cannot be
/// combined with keyset paging, and keyset paging is always used.
pub fn query_url(endpoint: &str, params: &[(&str, &str)], per_page: usize) -> String {
    let mut attrs: BTreeMap<&str, String> = BTreeMap::new();
    attrs.insert("per_page", per_page.to_string());
    for &(key, value) in params {
        attrs.insert(key, value.to_string());
    }
    attrs.remove("pagination");
    attrs.remove("page");

    let mut url = format!("{endpoint}?pagination=keyset");
    for (key, value) in attrs {
        url.push('&');
        url.push_str(key);
        url.push('=');
        url.extend(utf8_percent_encode(&value, QUERY_VALUE));
    }
    url
}

/// Lazy sequence of records from a paginated listing.
///
/// Pages are requested on demand; the sequence ends when a page carries no
/// `rel="next"` link. After the first error nothing more is yielded.
pub struct PagedQuery<'a, T: Transport> {
    api: &'a RemoteApi<T>,
    next_url: Option<String>,
    page: std::vec::IntoIter<Record>,
}

impl<'a, T: Transport> PagedQuery<'a, T> {
    pub fn new(api: &'a RemoteApi<T>, url: String) -> Self {
        Self {
            api,
            next_url: Some(url),
            page: Vec::new().into_iter(),
        }
    }

    fn fetch_page(&self, url: &str) -> Result<(Vec<Record>, Option<String>)> {
        let resp = self.api.get(url)?;

        let values: Vec<Value> = serde_json::from_slice(&resp.body).map_err(|err| {
            debug!("Page from {url} is not a JSON array: {err}");
            RemoteError::InvalidResponse {
                url: url.to_string(),
                reason: err.to_string(),
            }
        })?;

        let records = values
            .into_iter()
            .map(|value| {
                match value {
                    Value::Object(record) => Ok(record),
                    other => {
                        Err(RemoteError::InvalidResponse {
                            url: url.to_string(),
                            reason: format!("expected an object, found {other}"),
                        })
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let next = resp.link.as_deref().and_then(next_link);
        trace!(
            "Fetched {} records from {url}, next page: {:?}",
            records.len(),
            next
        );

        Ok((records, next))
    }
}

impl<T: Transport> Iterator for PagedQuery<'_, T> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.page.next() {
                return Some(Ok(record));
            }

            let url = self.next_url.take()?;
            match self.fetch_page(&url) {
                Ok((records, next)) => {
                    self.page = records.into_iter();
                    self.next_url = next;
                }
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<T: Transport> std::iter::FusedIterator for PagedQuery<'_, T> {}
