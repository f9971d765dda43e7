//! Lazy cursor pagination over search results.

use futures_util::Stream;
use futures_util::stream::{self, TryStreamExt};
use url::Url;

use chartchat_core::Resource;

use crate::client::FhirClient;
use crate::error::FhirError;
use crate::params::SearchParams;

impl FhirClient {
    /// Searches across every page of results as a lazy, forward-only
    /// sequence.
    ///
    /// Pages are fetched one at a time as the stream is polled; entries
    /// are yielded strictly in upstream order, and the bundle's `next`
    /// link is followed verbatim until the upstream stops providing one.
    /// Only the current page and the next-page cursor are held, so the
    /// sequence never materializes eagerly. Dropping the stream
    /// mid-sequence fetches nothing further, and a failed page fetch ends
    /// the sequence with an error rather than silently truncating it.
    pub fn search_all<'a>(
        &'a self,
        resource_type: &str,
        params: &SearchParams,
    ) -> impl Stream<Item = Result<Resource, FhirError>> + 'a {
        let mut first = self.resource_url(resource_type, None);
        if !params.is_empty() {
            first.query_pairs_mut().extend_pairs(params.iter());
        }

        stream::try_unfold(Some(first), move |cursor| async move {
            let Some(url) = cursor else {
                return Ok::<_, FhirError>(None);
            };
            let bundle = self.fetch_bundle(url).await?;
            let next = bundle.next_link().map(Url::parse).transpose()?;
            let page = stream::iter(bundle.into_resources().into_iter().map(Ok::<_, FhirError>));
            Ok(Some((page, next)))
        })
        .try_flatten()
    }
}
