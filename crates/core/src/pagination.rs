//! Fetch-all helpers for paginated Jira endpoints
//!
//! Jira exposes two pagination protocols:
//!
//! - **Offset-based** (`startAt` / `maxResults`), used by the Agile API for
//!   boards and sprints. There is no reliable "has more" flag, so a page that
//!   comes back shorter than requested is the end of the results.
//! - **Token-based** (`nextPageToken`), used by the JQL search endpoint. A
//!   missing or empty token is the end of the results.
//!
//! Both helpers are generic over the page-fetching capability and simply
//! concatenate pages in the order the service returned them. They never
//! reorder, deduplicate, or filter, and a failed page aborts the whole fetch.

use std::future::Future;

/// Default number of items requested per offset page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page the Jira Agile API serves; larger `maxResults` values are
/// silently reduced by the server
pub const MAX_PAGE_SIZE: u32 = 50;

/// A page from a token-paginated endpoint.
///
/// Iterating the page yields its items; [`ContinuationPage::next_page_token`]
/// tells whether another page follows.
pub trait ContinuationPage: IntoIterator {
    /// Token to pass back for the next page. `None` and `Some("")` both mean
    /// there are no more pages.
    fn next_page_token(&self) -> Option<&str>;
}

/// Fetch every item from an offset-paginated endpoint.
///
/// `fetch` is called with `(start_at, max_results)`, starting at offset 0 and
/// advancing by `page_size` until a page holds fewer than `page_size` items.
/// `page_size` is clamped to `1..=MAX_PAGE_SIZE`, so a server-side cap can
/// never make a full page look like the last one.
///
/// # Arguments
/// * `page_size` - Number of items requested per page
/// * `fetch` - Capability returning one page of raw items
///
/// # Returns
/// All items in service order, or the first error returned by `fetch`
pub async fn fetch_all_by_offset<T, E, F, Fut>(page_size: u32, mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(u64, u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, E>>,
{
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let mut results = Vec::new();
    let mut start_at: u64 = 0;

    loop {
        let page = fetch(start_at, page_size).await?;
        let received = page.len();
        log::debug!("offset page at {start_at}: {received} item(s)");

        results.extend(page);

        if received < page_size as usize {
            break;
        }
        start_at += u64::from(page_size);
    }

    Ok(results)
}

/// Fetch every item from a token-paginated endpoint.
///
/// `fetch` is first called with `None`, then with each continuation token the
/// previous page carried, until a page carries no token or an empty one.
///
/// There is no cap on the number of pages: an upstream that keeps returning
/// tokens keeps this loop going.
pub async fn fetch_all_by_token<P, E, F, Fut>(mut fetch: F) -> Result<Vec<P::Item>, E>
where
    P: ContinuationPage,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P, E>>,
{
    let mut results = Vec::new();
    let mut token: Option<String> = None;

    loop {
        let page = fetch(token.take()).await?;
        let next = page
            .next_page_token()
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        let before = results.len();
        results.extend(page);
        log::debug!(
            "token page: {} item(s), more pages: {}",
            results.len() - before,
            next.is_some()
        );

        match next {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct TestPage {
        items: Vec<u32>,
        token: Option<String>,
    }

    impl IntoIterator for TestPage {
        type Item = u32;
        type IntoIter = std::vec::IntoIter<u32>;

        fn into_iter(self) -> Self::IntoIter {
            self.items.into_iter()
        }
    }

    impl ContinuationPage for TestPage {
        fn next_page_token(&self) -> Option<&str> {
            self.token.as_deref()
        }
    }

    fn numbered(start: u32, len: u32) -> Vec<u32> {
        (start..start + len).collect()
    }

    #[tokio::test]
    async fn test_offset_stops_on_short_page() {
        // Arrange: pages of 50, 50 and 37 items
        let sizes = [50u32, 50, 37];
        let calls = RefCell::new(Vec::new());

        // Act
        let items: Vec<u32> = fetch_all_by_offset(50, |start_at, max_results| {
            calls.borrow_mut().push((start_at, max_results));
            let index = calls.borrow().len() - 1;
            let page = numbered(start_at as u32, sizes[index]);
            async move { Ok::<_, String>(page) }
        })
        .await
        .unwrap();

        // Assert
        assert_eq!(items.len(), 137);
        assert_eq!(*calls.borrow(), vec![(0, 50), (50, 50), (100, 50)]);
        assert_eq!(items, numbered(0, 137));
    }

    #[tokio::test]
    async fn test_offset_empty_first_page() {
        let calls = RefCell::new(0);

        let items: Vec<u32> = fetch_all_by_offset(DEFAULT_PAGE_SIZE, |_, _| {
            *calls.borrow_mut() += 1;
            async { Ok::<_, String>(Vec::new()) }
        })
        .await
        .unwrap();

        assert!(items.is_empty());
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_offset_exact_multiple_needs_one_extra_call() {
        // Arrange: 100 items in pages of 50, then an empty page
        let calls = RefCell::new(0);

        // Act
        let items: Vec<u32> = fetch_all_by_offset(50, |start_at, _| {
            *calls.borrow_mut() += 1;
            let page = if start_at < 100 {
                numbered(start_at as u32, 50)
            } else {
                Vec::new()
            };
            async move { Ok::<_, String>(page) }
        })
        .await
        .unwrap();

        // Assert: ceil(100 / 50) + 1 round trips
        assert_eq!(items.len(), 100);
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test]
    async fn test_offset_zero_page_size_is_clamped() {
        let calls = RefCell::new(Vec::new());

        let items: Vec<u32> = fetch_all_by_offset(0, |start_at, max_results| {
            calls.borrow_mut().push((start_at, max_results));
            let page = if start_at < 2 { vec![start_at as u32] } else { vec![] };
            async move { Ok::<_, String>(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![0, 1]);
        assert_eq!(*calls.borrow(), vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[tokio::test]
    async fn test_offset_oversized_page_size_is_capped() {
        // Arrange: 120 items, the endpoint never returns more than 50 per page
        let all = numbered(0, 120);
        let calls = RefCell::new(Vec::new());

        // Act
        let items: Vec<u32> = fetch_all_by_offset(100, |start_at, max_results| {
            calls.borrow_mut().push((start_at, max_results));
            let page: Vec<u32> = all
                .iter()
                .skip(start_at as usize)
                .take(max_results.min(50) as usize)
                .copied()
                .collect();
            async move { Ok::<_, String>(page) }
        })
        .await
        .unwrap();

        // Assert
        assert_eq!(items, all);
        assert_eq!(*calls.borrow(), vec![(0, 50), (50, 50), (100, 50)]);
    }

    #[tokio::test]
    async fn test_offset_error_discards_partial_results() {
        let result: Result<Vec<u32>, String> = fetch_all_by_offset(2, |start_at, _| async move {
            if start_at == 0 {
                Ok(vec![1, 2])
            } else {
                Err("connection reset".to_string())
            }
        })
        .await;

        assert_eq!(result, Err("connection reset".to_string()));
    }

    #[tokio::test]
    async fn test_token_follows_tokens_until_empty() {
        // Arrange: tokens "a" -> "b" -> "" over pages of 10, 10 and 5 items
        let pages = RefCell::new(vec![
            TestPage {
                items: numbered(0, 10),
                token: Some("a".to_string()),
            },
            TestPage {
                items: numbered(10, 10),
                token: Some("b".to_string()),
            },
            TestPage {
                items: numbered(20, 5),
                token: Some(String::new()),
            },
        ]);
        let seen = RefCell::new(Vec::new());

        // Act
        let items = fetch_all_by_token(|token| {
            seen.borrow_mut().push(token);
            let page = pages.borrow_mut().remove(0);
            async move { Ok::<_, String>(page) }
        })
        .await
        .unwrap();

        // Assert
        assert_eq!(items, numbered(0, 25));
        assert_eq!(
            *seen.borrow(),
            vec![None, Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[tokio::test]
    async fn test_token_absent_token_is_final() {
        let calls = RefCell::new(0);

        let items = fetch_all_by_token(|_| {
            *calls.borrow_mut() += 1;
            async {
                Ok::<_, String>(TestPage {
                    items: vec![7, 8],
                    token: None,
                })
            }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![7, 8]);
        assert_eq!(*calls.borrow(), 1);
    }

    #[tokio::test]
    async fn test_token_error_aborts() {
        let result = fetch_all_by_token(|token| async move {
            match token {
                None => Ok(TestPage {
                    items: vec![1],
                    token: Some("next".to_string()),
                }),
                Some(_) => Err("401 Unauthorized".to_string()),
            }
        })
        .await;

        assert_eq!(result.unwrap_err(), "401 Unauthorized");
    }
}
