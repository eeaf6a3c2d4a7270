use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;

use crate::filter::QueryParameters;
use crate::request::Transport;
use crate::{info_time, warn_time, Error, Result, PAGE_DELAY};

/// Shape of one tracker page. Items are passed through untouched.
#[derive(Debug, Deserialize)]
struct Page {
    total: u64,
    items: Vec<Value>,
}

/// Every item of one query, in page order, next to the total the API claimed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub total: u64,
    pub items: Vec<Value>,
}

/// Why the page loop stopped before the last page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error on page {page}: {} - {reason}", .status.map_or("no response".to_string(), |s| s.to_string()))]
pub struct PageFailure {
    pub page: u64,
    /// `None` when the request never got a response or the body wasn't a page.
    pub status: Option<u16>,
    pub reason: String,
}

/// Result of a run. `failure` is set when a later page broke off the loop,
/// in which case `result.items` holds fewer entries than `result.total`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub result: AggregatedResult,
    pub failure: Option<PageFailure>,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Walks the tracker pages one after another through a `Transport`.
pub struct Paginator<T> {
    transport: T,
    delay: Duration,
}

impl<T: Transport> Paginator<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            delay: PAGE_DELAY,
        }
    }

    /// Sets the pause taken before every page after the first.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches page 0 to learn the total, then the remaining pages in order.
    ///
    /// Any failure on page 0 is an error and nothing is returned.
    /// A failure on a later page stops the loop and the pages collected so far
    /// are returned with the failure attached.
    pub async fn fetch_all(&self, mut params: QueryParameters) -> Result<FetchOutcome> {
        if params.size == 0 {
            return Err(Error::InvalidPageSize(params.size));
        }
        let start_time = Local::now();

        params.page = 0;
        let res = self.transport.fetch(&params).await?;
        if !res.is_success() {
            return Err(Error::FetchFailed {
                page: 0,
                status: res.status,
                body: res.body,
            });
        }
        let first: Page =
            serde_json::from_str(&res.body).map_err(|source| Error::MalformedPage { page: 0, source })?;

        let total = first.total;
        let mut items = first.items;
        let total_pages = total.div_ceil(u64::from(params.size));
        info_time!(
            "Total items (filtered): {}, Items per page: {}, Total pages: {}",
            total,
            params.size,
            total_pages
        );

        let mut failure = None;
        for page in 1..total_pages {
            sleep(self.delay).await;
            info_time!("Fetching page {} of {}...", page, total_pages - 1);

            params.page = page;
            match self.fetch_page(&params).await {
                Ok(page_items) => items.extend(page_items),
                Err(page_failure) => {
                    warn_time!("{page_failure}");
                    failure = Some(page_failure);
                    break;
                }
            }
        }

        info_time!(start_time, "Collected {} of {} items", items.len(), total);
        Ok(FetchOutcome {
            result: AggregatedResult { total, items },
            failure,
        })
    }

    /// One page past the first. Every kind of failure is flattened into a `PageFailure`.
    async fn fetch_page(&self, params: &QueryParameters) -> core::result::Result<Vec<Value>, PageFailure> {
        let page = params.page;
        let res = self.transport.fetch(params).await.map_err(|e| PageFailure {
            page,
            status: None,
            reason: e.to_string(),
        })?;

        if !res.is_success() {
            return Err(PageFailure {
                page,
                status: Some(res.status),
                reason: res.body,
            });
        }

        serde_json::from_str::<Page>(&res.body)
            .map(|p| p.items)
            .map_err(|e| PageFailure {
                page,
                status: None,
                reason: format!("not a tracker page: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::request::FetchResponse;

    /// Answers from a fixed page table and remembers which pages were asked for.
    #[derive(Default)]
    struct Scripted {
        pages: HashMap<u64, Option<FetchResponse>>,
        seen: Mutex<Vec<u64>>,
    }

    impl Scripted {
        fn page(mut self, page: u64, res: FetchResponse) -> Self {
            self.pages.insert(page, Some(res));
            self
        }

        fn broken(mut self, page: u64) -> Self {
            self.pages.insert(page, None);
            self
        }

        fn seen(&self) -> Vec<u64> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for Scripted {
        async fn fetch(&self, params: &QueryParameters) -> Result<FetchResponse> {
            self.seen.lock().unwrap().push(params.page);
            match self.pages.get(&params.page) {
                Some(Some(res)) => Ok(res.clone()),
                Some(None) => Err(std::io::Error::other("connection reset").into()),
                None => Ok(FetchResponse::new(404, "no such page")),
            }
        }
    }

    fn items(page: u64, count: u64) -> Vec<Value> {
        (0..count).map(|i| json!({ "id": page * 25 + i })).collect()
    }

    fn ok_page(total: u64, page: u64, count: u64) -> FetchResponse {
        let body = json!({ "total": total, "items": items(page, count) });
        FetchResponse::new(200, body.to_string())
    }

    fn sixty() -> Scripted {
        Scripted::default()
            .page(0, ok_page(60, 0, 25))
            .page(1, ok_page(60, 1, 25))
            .page(2, ok_page(60, 2, 10))
    }

    fn paginator(transport: Scripted) -> Paginator<Scripted> {
        Paginator::new(transport).with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn collects_all_pages_in_order() {
        let paginator = paginator(sixty());
        let outcome = paginator.fetch_all(QueryParameters::default()).await.unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.result.total, 60);
        let expected: Vec<Value> = [items(0, 25), items(1, 25), items(2, 10)].concat();
        assert_eq!(outcome.result.items, expected);
        assert_eq!(paginator.transport().seen(), [0, 1, 2]);
    }

    #[tokio::test]
    async fn failed_later_page_keeps_earlier_items() {
        let paginator = paginator(
            sixty().page(1, FetchResponse::new(429, "slow down")),
        );
        let outcome = paginator.fetch_all(QueryParameters::default()).await.unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.result.total, 60);
        assert_eq!(outcome.result.items, items(0, 25));
        assert_eq!(
            outcome.failure,
            Some(PageFailure {
                page: 1,
                status: Some(429),
                reason: "slow down".into(),
            })
        );
        assert_eq!(paginator.transport().seen(), [0, 1]);
    }

    #[tokio::test]
    async fn transport_error_on_later_page_stops_loop() {
        let paginator = paginator(sixty().broken(2));
        let outcome = paginator.fetch_all(QueryParameters::default()).await.unwrap();

        let failure = outcome.failure.unwrap();
        assert_eq!((failure.page, failure.status), (2, None));
        assert!(failure.reason.contains("connection reset"));
        assert_eq!(outcome.result.items.len(), 50);
    }

    #[tokio::test]
    async fn garbage_on_later_page_stops_loop() {
        let paginator = paginator(sixty().page(1, FetchResponse::new(200, "<html>")));
        let outcome = paginator.fetch_all(QueryParameters::default()).await.unwrap();

        assert_eq!(outcome.failure.map(|f| f.page), Some(1));
        assert_eq!(paginator.transport().seen(), [0, 1]);
    }

    #[tokio::test]
    async fn failed_first_page_is_an_error() {
        let paginator = paginator(
            Scripted::default().page(0, FetchResponse::new(401, "unauthorized")),
        );
        let err = paginator.fetch_all(QueryParameters::default()).await.unwrap_err();

        assert!(matches!(
            err,
            Error::FetchFailed { page: 0, status: 401, ref body } if body == "unauthorized"
        ));
        assert_eq!(paginator.transport().seen(), [0]);
    }

    #[tokio::test]
    async fn garbage_first_page_is_malformed() {
        let paginator = paginator(
            Scripted::default().page(0, FetchResponse::new(200, r#"{"items": []}"#)),
        );
        let err = paginator.fetch_all(QueryParameters::default()).await.unwrap_err();
        assert!(matches!(err, Error::MalformedPage { page: 0, .. }));
    }

    #[tokio::test]
    async fn empty_tracker_is_one_request() {
        let paginator = paginator(Scripted::default().page(0, ok_page(0, 0, 0)));
        let outcome = paginator.fetch_all(QueryParameters::default()).await.unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.result, AggregatedResult { total: 0, items: vec![] });
        assert_eq!(paginator.transport().seen(), [0]);
    }

    #[tokio::test]
    async fn exact_multiple_has_no_extra_page() {
        let paginator = paginator(
            Scripted::default()
                .page(0, ok_page(50, 0, 25))
                .page(1, ok_page(50, 1, 25)),
        );
        let outcome = paginator.fetch_all(QueryParameters::default()).await.unwrap();

        assert!(outcome.is_complete());
        assert_eq!(paginator.transport().seen(), [0, 1]);
    }

    #[tokio::test]
    async fn page_index_is_reset_before_first_request() {
        let paginator = paginator(sixty());
        let params = QueryParameters {
            page: 7,
            ..QueryParameters::default()
        };
        paginator.fetch_all(params).await.unwrap();
        assert_eq!(paginator.transport().seen(), [0, 1, 2]);
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected_up_front() {
        let paginator = paginator(sixty());
        let params = QueryParameters {
            size: 0,
            ..QueryParameters::default()
        };
        let err = paginator.fetch_all(params).await.unwrap_err();

        assert!(matches!(err, Error::InvalidPageSize(0)));
        assert!(paginator.transport().seen().is_empty());
    }

    #[tokio::test]
    async fn same_responses_give_identical_output() {
        let first = paginator(sixty()).fetch_all(QueryParameters::default()).await.unwrap();
        let second = paginator(sixty()).fetch_all(QueryParameters::default()).await.unwrap();

        assert_eq!(
            serde_json::to_vec_pretty(&first.result).unwrap(),
            serde_json::to_vec_pretty(&second.result).unwrap()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_pages_only() {
        let paginator = Paginator::new(sixty());
        let start = tokio::time::Instant::now();
        paginator.fetch_all(QueryParameters::default()).await.unwrap();

        // Two pauses for three pages.
        let elapsed = start.elapsed();
        assert!(elapsed >= PAGE_DELAY * 2 && elapsed < PAGE_DELAY * 3, "{elapsed:?}");
    }
}
