//! Fresh-Story Cache
//!
//! In-memory look-ahead queue of fully-synthesized stories. A background
//! refill keeps it topped up under a single-flight lock so HTTP requests
//! rarely block on generation; the queue is rebuilt from scratch on
//! restart.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::GeneratedStory;

use super::pipeline::{PipelineError, StoryPipeline};

/// Fresh-story cache configuration
#[derive(Debug, Clone)]
pub struct FreshCacheConfig {
    /// Target queue size
    pub target_size: usize,
    /// Interval between background refill attempts
    pub refill_interval_secs: u64,
    /// Whether an empty queue falls back to a blocking on-demand run.
    /// When disabled, `serve` returns `None` instead (HTTP 503).
    pub on_demand_fallback: bool,
}

impl Default for FreshCacheConfig {
    fn default() -> Self {
        Self {
            target_size: 5,
            refill_interval_secs: 5,
            on_demand_fallback: true,
        }
    }
}

/// Queue and single-flight flag, shared by all clones of the cache
struct Shared {
    queue: Mutex<VecDeque<GeneratedStory>>,
    refilling: AtomicBool,
}

/// FIFO cache of ready stories with single-flight background refill
///
/// The queue and the refill flag are shared between the periodic timer and
/// all concurrent requests; the flag guarantees at most one pipeline run is
/// ever started by this cache at a time. The mutex is only held for queue
/// edits, never across an await point. Clones share the same state.
#[derive(Clone)]
pub struct FreshStoryCache {
    config: FreshCacheConfig,
    pipeline: Arc<StoryPipeline>,
    shared: Arc<Shared>,
}

impl FreshStoryCache {
    pub fn new(config: FreshCacheConfig, pipeline: Arc<StoryPipeline>) -> Self {
        Self {
            config,
            pipeline,
            shared: Arc::new(Shared {
                queue: Mutex::new(VecDeque::new()),
                refilling: AtomicBool::new(false),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.shared.queue.lock().expect("queue lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One blocking pipeline run before the server accepts requests
    ///
    /// Best-effort: a failure is logged, not fatal, and the periodic refill
    /// will retry.
    pub async fn warm_up(&self) {
        match self.pipeline.generate().await {
            Ok(story) => {
                let mut queue = self.shared.queue.lock().expect("queue lock");
                queue.push_back(story);
                tracing::info!(cache_size = queue.len(), "Initial story ready");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to generate initial story");
            }
        }
    }

    /// Top the queue up in the background if below target
    ///
    /// Non-blocking. At most one pipeline run is in flight at a time no
    /// matter how many callers race here: the compare-exchange on the
    /// refill flag admits exactly one. Failures are logged and swallowed;
    /// the next tick tries again.
    pub fn ensure_fresh(&self) {
        if self.len() >= self.config.target_size {
            return;
        }
        if self
            .shared
            .refilling
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        tracing::debug!("Refilling fresh-story queue");
        let pipeline = self.pipeline.clone();
        let shared = self.shared.clone();
        tokio::spawn(async move {
            match pipeline.generate().await {
                Ok(story) => {
                    let mut queue = shared.queue.lock().expect("queue lock");
                    queue.push_back(story);
                    tracing::info!(cache_size = queue.len(), "Fresh story cached");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Background story generation failed");
                }
            }
            shared.refilling.store(false, Ordering::SeqCst);
        });
    }

    /// Pop the oldest ready story, topping the queue back up as a side
    /// effect
    ///
    /// An empty queue falls back to one blocking pipeline run that bypasses
    /// the queue, or yields `None` when the fallback is disabled.
    pub async fn serve(&self) -> Result<Option<GeneratedStory>, PipelineError> {
        let popped = self.shared.queue.lock().expect("queue lock").pop_front();

        if let Some(story) = popped {
            self.ensure_fresh();
            return Ok(Some(story));
        }

        if !self.config.on_demand_fallback {
            self.ensure_fresh();
            return Ok(None);
        }

        tracing::info!("Fresh-story queue empty, generating on demand");
        let story = self.pipeline.generate().await?;
        self.ensure_fresh();
        Ok(Some(story))
    }

    /// Periodic refill task, stopped via the watch channel
    pub fn spawn_refill_loop(&self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(cache.config.refill_interval_secs));
            // the first tick fires immediately; skip straight into the loop
            ticker.tick().await;

            tracing::info!(
                interval_secs = cache.config.refill_interval_secs,
                target_size = cache.config.target_size,
                "Refill loop started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => cache.ensure_fresh(),
                    changed = shutdown.changed() => {
                        // a dropped sender also stops the loop
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::info!("Refill loop stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CompletionRequest;
    use crate::domain::SeedStory;
    use crate::infrastructure::llm::FakeLlmClient;
    use crate::infrastructure::storage::{SeedPool, StoryStore};
    use crate::infrastructure::tts::FakeTtsClient;

    const SCRIPT: &str = "Man: hi\nWoman: hey";

    struct Fixture {
        _dir: tempfile::TempDir,
        llm: Arc<FakeLlmClient>,
        cache: FreshStoryCache,
    }

    fn fixture(config: FreshCacheConfig, llm: FakeLlmClient) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let seeds: Vec<SeedStory> = (0..4)
            .map(|i| SeedStory {
                id: format!("s{i}"),
                title: "T".to_string(),
                description: "D".to_string(),
                author: "A".to_string(),
            })
            .collect();
        let llm = Arc::new(llm);
        let pipeline = Arc::new(StoryPipeline::new(
            Arc::new(SeedPool::from_seeds(seeds).unwrap()),
            Arc::new(StoryStore::new(dir.path())),
            llm.clone(),
            Arc::new(FakeTtsClient::new()),
            CompletionRequest::default(),
        ));
        Fixture {
            _dir: dir,
            llm,
            cache: FreshStoryCache::new(config, pipeline),
        }
    }

    async fn wait_until(cache: &FreshStoryCache, len: usize) {
        for _ in 0..100 {
            if cache.len() >= len && !cache.shared.refilling.load(Ordering::SeqCst) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("cache never reached length {len}");
    }

    #[tokio::test]
    async fn test_warm_up_pushes_one_story() {
        let f = fixture(FreshCacheConfig::default(), FakeLlmClient::new(SCRIPT));
        f.cache.warm_up().await;
        assert_eq!(f.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_warm_up_failure_is_swallowed() {
        let f = fixture(FreshCacheConfig::default(), FakeLlmClient::failing());
        f.cache.warm_up().await;
        assert_eq!(f.cache.len(), 0);
    }

    #[tokio::test]
    async fn test_single_flight_refill() {
        let f = fixture(
            FreshCacheConfig::default(),
            FakeLlmClient::new(SCRIPT).with_delay(Duration::from_millis(50)),
        );

        for _ in 0..10 {
            f.cache.ensure_fresh();
        }

        wait_until(&f.cache, 1).await;
        assert_eq!(f.llm.calls(), 1, "exactly one pipeline invocation");
        assert_eq!(f.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_fresh_noop_at_target_size() {
        let f = fixture(
            FreshCacheConfig {
                target_size: 1,
                ..Default::default()
            },
            FakeLlmClient::new(SCRIPT),
        );

        f.cache.warm_up().await;
        f.cache.ensure_fresh();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(f.llm.calls(), 1, "no refill beyond the target size");
    }

    #[tokio::test]
    async fn test_serve_pops_oldest_and_tops_up() {
        let f = fixture(FreshCacheConfig::default(), FakeLlmClient::new(SCRIPT));
        f.cache.warm_up().await;

        let story = f.cache.serve().await.unwrap().expect("a ready story");
        assert_eq!(story.original.id, "s0", "oldest-ready story first");

        // serve triggered a background top-up
        wait_until(&f.cache, 1).await;
        assert!(f.llm.calls() >= 2);
    }

    #[tokio::test]
    async fn test_serve_empty_queue_generates_on_demand() {
        let f = fixture(
            FreshCacheConfig::default(),
            FakeLlmClient::new(SCRIPT).with_delay(Duration::from_millis(50)),
        );

        let story = f.cache.serve().await.unwrap().expect("on-demand story");
        assert_eq!(story.dialogue.len(), 2);
        // the on-demand story bypasses the queue entirely; the background
        // top-up is still mid-generation at this point
        assert_eq!(f.cache.len(), 0);

        // only the top-up lands in the queue
        wait_until(&f.cache, 1).await;
        assert_eq!(f.llm.calls(), 2);
    }

    #[tokio::test]
    async fn test_serve_without_fallback_returns_none() {
        let f = fixture(
            FreshCacheConfig {
                on_demand_fallback: false,
                ..Default::default()
            },
            FakeLlmClient::new(SCRIPT).with_delay(Duration::from_millis(50)),
        );

        assert!(f.cache.serve().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refill_loop_fills_and_stops() {
        let f = fixture(
            FreshCacheConfig {
                target_size: 2,
                refill_interval_secs: 1,
                on_demand_fallback: true,
            },
            FakeLlmClient::new(SCRIPT),
        );

        let (tx, rx) = watch::channel(false);
        let handle = f.cache.spawn_refill_loop(rx);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(f.cache.len(), 2);

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("refill loop must stop on signal")
            .unwrap();
    }
}
