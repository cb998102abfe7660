//! Paginated activity download.
//!
//! The source endpoint has no response cursor: page number and page size are
//! request parameters, and the loop stops on the first page that comes back
//! empty. A record count that is an exact multiple of the page size therefore
//! costs one extra request, which returns nothing and terminates the loop.

use log::{debug, info};

use crate::client::{StravaClient, StravaClientError};
use crate::models::strava::RawActivity;
use crate::window::FetchWindow;

pub const PER_PAGE: u32 = 200;

/// Source of activity pages. `StravaClient` is the real implementation; tests
/// substitute scripted fakes.
pub trait ActivityPages {
    fn activities_page(
        &self,
        access_token: &str,
        window: &FetchWindow,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawActivity>, StravaClientError>;
}

impl ActivityPages for StravaClient {
    fn activities_page(
        &self,
        access_token: &str,
        window: &FetchWindow,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawActivity>, StravaClientError> {
        StravaClient::activities_page(self, access_token, window, page, per_page)
    }
}

/// Accumulate every page inside the window until one comes back empty.
///
/// The first failing request aborts the run: no partial-window retry, no
/// resumption state.
pub fn fetch_activities(
    source: &impl ActivityPages,
    access_token: &str,
    window: &FetchWindow,
) -> Result<Vec<RawActivity>, String> {
    let mut all_activities = Vec::new();
    let mut page: u32 = 1;

    loop {
        let activities = source
            .activities_page(access_token, window, page, PER_PAGE)
            .map_err(|e| format!("fetching activities page {} failed: {}", page, e))?;
        if activities.is_empty() {
            break;
        }
        debug!("Fetched page {} ({} activities)", page, activities.len());
        all_activities.extend(activities);
        page += 1;
    }

    info!("Fetched {} activities in {} request(s)", all_activities.len(), page);
    Ok(all_activities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};
    use std::cell::Cell;

    fn make_row(id: usize) -> RawActivity {
        let mut row = Map::new();
        row.insert("id".to_string(), Value::from(id as i64));
        row
    }

    /// Serves `total` rows split into `per_page` chunks, counting requests.
    struct FakePages {
        total: usize,
        requests: Cell<u32>,
    }

    impl FakePages {
        fn new(total: usize) -> Self {
            FakePages {
                total,
                requests: Cell::new(0),
            }
        }
    }

    impl ActivityPages for FakePages {
        fn activities_page(
            &self,
            _access_token: &str,
            _window: &FetchWindow,
            page: u32,
            per_page: u32,
        ) -> Result<Vec<RawActivity>, StravaClientError> {
            self.requests.set(self.requests.get() + 1);
            let start = (page as usize - 1) * per_page as usize;
            let count = self.total.saturating_sub(start).min(per_page as usize);
            Ok((start..start + count).map(make_row).collect())
        }
    }

    fn window() -> FetchWindow {
        FetchWindow { after: 0, before: 1 }
    }

    #[test]
    fn accumulates_all_pages_in_order() {
        let source = FakePages::new(450);
        let rows = fetch_activities(&source, "token", &window()).unwrap();
        assert_eq!(rows.len(), 450);
        assert_eq!(rows[0]["id"], Value::from(0));
        assert_eq!(rows[449]["id"], Value::from(449));
        // 200 + 200 + 50, plus the empty page that terminates the loop.
        assert_eq!(source.requests.get(), 4);
    }

    #[test]
    fn exact_page_multiple_costs_one_extra_request() {
        let source = FakePages::new(400);
        let rows = fetch_activities(&source, "token", &window()).unwrap();
        assert_eq!(rows.len(), 400);
        assert_eq!(source.requests.get(), 3);
    }

    #[test]
    fn empty_window_makes_a_single_request() {
        let source = FakePages::new(0);
        let rows = fetch_activities(&source, "token", &window()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(source.requests.get(), 1);
    }

    #[test]
    fn page_error_aborts_the_fetch() {
        struct FailingPages;
        impl ActivityPages for FailingPages {
            fn activities_page(
                &self,
                _access_token: &str,
                _window: &FetchWindow,
                _page: u32,
                _per_page: u32,
            ) -> Result<Vec<RawActivity>, StravaClientError> {
                Err(StravaClientError::Http {
                    status: 429,
                    message: "rate limited".to_string(),
                })
            }
        }

        let err = fetch_activities(&FailingPages, "token", &window()).unwrap_err();
        assert!(err.contains("page 1"));
        assert!(err.contains("429"));
    }
}
