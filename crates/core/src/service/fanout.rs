//! Parallel random-article fetches.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::Error;
use crate::upstream::{ArticleProvider, RandomArticle};

/// Fetch `n` random articles in parallel.
///
/// The result always has length `n`. A worker that fails leaves an error
/// placeholder in its own slot and does not affect the others.
pub async fn fetch_random(provider: Arc<dyn ArticleProvider>, n: usize) -> Vec<RandomArticle> {
    fan_out(n, move |_| {
        let provider = provider.clone();
        async move { provider.random().await }
    })
    .await
}

/// Run `worker(i)` for every `i` in `0..n` concurrently and join on all of them.
///
/// Slot `i` of the result holds worker `i`'s article, or a placeholder if it
/// returned an error or panicked.
pub(crate) async fn fan_out<F, Fut>(n: usize, worker: F) -> Vec<RandomArticle>
where
    F: Fn(usize) -> Fut,
    Fut: Future<Output = Result<RandomArticle, Error>> + Send + 'static,
{
    let mut slots = vec![RandomArticle::placeholder("worker did not complete"); n];
    let mut workers = JoinSet::new();

    for index in 0..n {
        let task = worker(index);
        workers.spawn(async move { (index, task.await) });
    }

    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok((index, Ok(article))) => slots[index] = article,
            Ok((index, Err(e))) => {
                tracing::warn!(slot = index, error = %e, "random article fetch failed");
                slots[index] = RandomArticle::placeholder(e.to_string());
            }
            Err(e) => tracing::error!(error = %e, "random article worker aborted"),
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeArticles;

    fn article(index: usize) -> RandomArticle {
        RandomArticle { title: format!("Article {index}"), snippet: String::new(), id: index as i64 }
    }

    #[tokio::test]
    async fn test_failed_worker_is_isolated() {
        let results = fan_out(10, |index| async move {
            if index == 3 { Err(Error::UpstreamTransport("status 503".into())) } else { Ok(article(index)) }
        })
        .await;

        assert_eq!(results.len(), 10);
        assert!(results[3].is_placeholder());
        assert_eq!(results[3].id, RandomArticle::ERROR_ID);
        for (index, result) in results.iter().enumerate().filter(|(i, _)| *i != 3) {
            assert_eq!(result, &article(index));
        }
    }

    #[tokio::test]
    async fn test_slot_order_matches_worker_index() {
        let results = fan_out(5, |index| async move {
            tokio::time::sleep(std::time::Duration::from_millis(((5 - index) * 10) as u64)).await;
            Ok(article(index))
        })
        .await;

        let ids: Vec<i64> = results.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_panicking_worker_leaves_placeholder() {
        let results = fan_out(3, |index| async move {
            if index == 1 {
                panic!("worker exploded");
            }
            Ok(article(index))
        })
        .await;

        assert_eq!(results.len(), 3);
        assert!(results[1].is_placeholder());
        assert!(!results[0].is_placeholder());
        assert!(!results[2].is_placeholder());
    }

    #[tokio::test]
    async fn test_zero_workers() {
        let provider = Arc::new(FakeArticles::new());
        assert!(fetch_random(provider, 0).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_random_calls_provider_n_times() {
        let provider = Arc::new(FakeArticles::new());
        let results = fetch_random(provider.clone(), 10).await;

        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|a| !a.is_placeholder()));
        assert_eq!(provider.random_calls(), 10);
    }

    #[tokio::test]
    async fn test_fetch_random_provider_failure() {
        let provider = Arc::new(FakeArticles::new());
        provider.fail_upstream(true);

        let results = fetch_random(provider, 4).await;
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(RandomArticle::is_placeholder));
    }
}
