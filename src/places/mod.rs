//! Per-cell area search against a places backend.
//!
//! [`PlacesSource`] is one page of a nearby search; [`AreaSearcher`] walks the
//! continuation tokens for a single cell and concatenates every page.

pub mod google;

use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::error::Result;
use crate::model::{LatLng, Place};

/// Default wait before a continuation token may be used. Tokens issued by the
/// Places API are not valid until a short while after the page that carried them.
pub const DEFAULT_TOKEN_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    pub location: LatLng,
    pub radius_m: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearbyPage {
    pub places: Vec<Place>,
    pub next_page_token: Option<String>,
}

/// One request/response round trip of a nearby search.
pub trait PlacesSource {
    fn nearby_page(&self, query: &NearbyQuery, page_token: Option<&str>) -> Result<NearbyPage>;
}

impl<T: PlacesSource + ?Sized> PlacesSource for &T {
    fn nearby_page(&self, query: &NearbyQuery, page_token: Option<&str>) -> Result<NearbyPage> {
        (**self).nearby_page(query, page_token)
    }
}

pub struct AreaSearcher<S> {
    source: S,
    token_delay: Duration,
}

impl<S: PlacesSource> AreaSearcher<S> {
    pub fn new(source: S, token_delay: Duration) -> Self {
        Self {
            source,
            token_delay,
        }
    }

    /// Fetch every page for one cell, in page order.
    ///
    /// No retries: the first failing page aborts the search. The API stops
    /// handing out tokens after a fixed number of pages, so a cell denser than
    /// that ceiling comes back short.
    pub fn search(&self, location: LatLng, radius_m: u32) -> Result<Vec<Place>> {
        let query = NearbyQuery { location, radius_m };
        let mut places = Vec::new();
        let mut token: Option<String> = None;
        let mut page_no = 0usize;

        loop {
            let page = self.source.nearby_page(&query, token.as_deref())?;
            page_no += 1;
            debug!(page = page_no, count = page.places.len(), %location, "fetched page");
            places.extend(page.places);

            let Some(next) = page.next_page_token else {
                break;
            };
            if !self.token_delay.is_zero() {
                debug!(delay_ms = self.token_delay.as_millis() as u64, "waiting for page token");
                thread::sleep(self.token_delay);
            }
            token = Some(next);
        }

        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SweepError;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::time::Instant;

    struct Pages {
        pages: RefCell<VecDeque<Result<NearbyPage>>>,
        tokens_seen: RefCell<Vec<Option<String>>>,
    }

    impl Pages {
        fn new(pages: Vec<Result<NearbyPage>>) -> Self {
            Self {
                pages: RefCell::new(pages.into()),
                tokens_seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl PlacesSource for Pages {
        fn nearby_page(&self, _query: &NearbyQuery, token: Option<&str>) -> Result<NearbyPage> {
            self.tokens_seen.borrow_mut().push(token.map(String::from));
            self.pages
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(NearbyPage::default()))
        }
    }

    fn page(places: Vec<Place>, token: Option<&str>) -> Result<NearbyPage> {
        Ok(NearbyPage {
            places,
            next_page_token: token.map(String::from),
        })
    }

    #[test]
    fn follows_token_then_stops() {
        let source = Pages::new(vec![
            page(vec![Place::new("A", 1.0, 2.0)], Some("T")),
            page(vec![Place::new("B", 3.0, 4.0)], None),
        ]);
        let searcher = AreaSearcher::new(&source, Duration::ZERO);
        let found = searcher.search(LatLng::new(0.0, 0.0), 2500).unwrap();

        assert_eq!(found, vec![Place::new("A", 1.0, 2.0), Place::new("B", 3.0, 4.0)]);
        assert_eq!(
            *source.tokens_seen.borrow(),
            vec![None, Some("T".to_string())]
        );
    }

    #[test]
    fn waits_before_each_continuation() {
        let source = Pages::new(vec![
            page(vec![], Some("T1")),
            page(vec![], Some("T2")),
            page(vec![], None),
        ]);
        let searcher = AreaSearcher::new(&source, Duration::from_millis(20));
        let start = Instant::now();
        searcher.search(LatLng::new(0.0, 0.0), 100).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(source.tokens_seen.borrow().len(), 3);
    }

    #[test]
    fn error_on_later_page_discards_earlier_pages() {
        let source = Pages::new(vec![
            page(vec![Place::new("A", 1.0, 2.0)], Some("T")),
            Err(SweepError::MalformedResponse("missing geometry".into())),
        ]);
        let searcher = AreaSearcher::new(&source, Duration::ZERO);
        let err = searcher.search(LatLng::new(0.0, 0.0), 100).unwrap_err();
        assert_eq!(err.kind(), "malformed-response");
    }
}
