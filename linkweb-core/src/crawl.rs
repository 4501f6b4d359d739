//! Crawl orchestration: visiting pages, scoping links to the seed's domain
//! and accumulating the weighted link graph.
//!
//! Every strategy shares one per-page procedure (`visit`). Strategies only
//! differ in the order and concurrency of visits, so for a deterministic
//! scraper they all produce the same graph.

use crate::domain::{Domain, DomainClassifier};
use crate::error::{ConfigError, CrawlError, Result};
use crate::graph::{Edges, LinkGraph};
use crate::normalize::normalize;
use futures::future::BoxFuture;
use linkweb_scanner::Scraper;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Called with each URL right before its links are fetched.
pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

pub const DEFAULT_WORKERS: usize = 10;

/// How long an idle pool worker waits before checking the queue again.
const IDLE_BACKOFF: Duration = Duration::from_millis(10);

/// Order and concurrency of page visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Visit every in-scope target of a page concurrently, one task per
    /// target, and wait for all of them. Unbounded fan-out.
    #[default]
    Recursive,
    /// Single task, last-in-first-out worklist, one fetch at a time.
    /// Targets already visited at push time are not queued.
    Iterative,
    /// Fixed number of workers sharing a FIFO queue. At most `workers`
    /// fetches are in flight.
    Pool { workers: usize },
}

/// Count occurrences of each normalized target in a page's raw link list.
pub fn tally_links<S: AsRef<str>>(links: &[S]) -> Edges {
    let mut edges = Edges::new();
    for link in links {
        *edges.entry(normalize(link.as_ref())).or_insert(0) += 1;
    }
    edges
}

pub struct Crawler {
    strategy: Strategy,
    scraper: Arc<dyn Scraper>,
    graph: Box<dyn LinkGraph>,
    classifier: Arc<DomainClassifier>,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(strategy: Strategy, scraper: Arc<dyn Scraper>, graph: Box<dyn LinkGraph>) -> Self {
        Self {
            strategy,
            scraper,
            graph,
            classifier: Arc::new(DomainClassifier::new()),
            progress_callback: None,
        }
    }

    /// Share one classifier across crawls instead of loading the suffix
    /// list for every run.
    pub fn with_classifier(mut self, classifier: Arc<DomainClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl from `seed_url` until no unvisited in-scope URL remains and
    /// return the finished graph.
    ///
    /// Fetch failures never end a crawl; the page just gets no edges. Errors
    /// come from a pool without workers or from crawl tasks that panicked.
    pub async fn run(self, seed_url: &str) -> Result<Box<dyn LinkGraph>> {
        if let Strategy::Pool { workers: 0 } = self.strategy {
            return Err(ConfigError::InvalidWorkers.into());
        }

        let seed = normalize(seed_url);
        let scope = self.classifier.domain_of(&seed);

        info!(
            "Starting {} crawl of {} with {} scraper (scope: {})",
            self.strategy,
            seed,
            self.scraper.name(),
            scope
        );
        if !scope.is_known() {
            warn!("No domain for seed {}; no links will be followed", seed);
        }

        let state = Arc::new(CrawlState {
            scope,
            visited: Mutex::new(HashSet::new()),
            graph: Mutex::new(self.graph),
            scraper: self.scraper,
            classifier: self.classifier,
            progress_callback: self.progress_callback,
        });

        match self.strategy {
            Strategy::Recursive => Arc::clone(&state).visit_recursive(seed).await?,
            Strategy::Iterative => state.run_iterative(seed).await,
            Strategy::Pool { workers } => Arc::clone(&state).run_pool(seed, workers).await?,
        }

        let state = Arc::try_unwrap(state).map_err(|_| CrawlError::StateInUse)?;
        let visited = state.visited.into_inner().len();
        let graph = state.graph.into_inner();

        info!(
            "Crawl complete. Visited {} pages, {} nodes, {} edges",
            visited,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

/// Everything one crawl shares between its visits.
struct CrawlState {
    scope: Domain,
    visited: Mutex<HashSet<String>>,
    graph: Mutex<Box<dyn LinkGraph>>,
    scraper: Arc<dyn Scraper>,
    classifier: Arc<DomainClassifier>,
    progress_callback: Option<ProgressCallback>,
}

impl CrawlState {
    fn in_scope(&self, url: &str) -> bool {
        self.classifier.domain_of(url).matches(&self.scope)
    }

    /// Fetch and record one page.
    ///
    /// Returns the page's distinct in-scope targets, or `None` when the URL
    /// had already been visited and nothing was fetched.
    async fn visit(&self, raw: &str) -> Option<Vec<String>> {
        let url = normalize(raw);

        self.graph.lock().await.add_node(&url);

        // Check-and-mark in one locked insert so concurrent visits of the
        // same URL cannot both get past here.
        if !self.visited.lock().await.insert(url.clone()) {
            debug!("Already visited {}", url);
            return None;
        }

        if let Some(ref callback) = self.progress_callback {
            callback(url.as_str());
        }

        let links = match self.scraper.scrape(&url).await {
            Ok(links) => links,
            Err(e) => {
                warn!("Failed to scrape {}: {}", url, e);
                Vec::new()
            }
        };

        let edges = tally_links(&links);
        let recorded = self.graph.lock().await.set_edges(&url, &edges);
        if !recorded {
            error!("Edges recorded for {} before it was added as a node", url);
        }
        debug_assert!(recorded, "set_edges on missing node {}", url);

        let (mut in_scope, out_of_scope): (Vec<String>, Vec<String>) =
            edges.into_keys().partition(|target| self.in_scope(target));
        in_scope.sort();

        debug!(
            "Visited {}: {} links, {} in scope, {} out of scope",
            url,
            links.len(),
            in_scope.len(),
            out_of_scope.len()
        );
        Some(in_scope)
    }

    /// Drop targets that are already visited at the time of the check.
    async fn unvisited(&self, targets: Vec<String>) -> Vec<String> {
        let visited = self.visited.lock().await;
        targets
            .into_iter()
            .filter(|target| !visited.contains(target))
            .collect()
    }

    fn visit_recursive(self: Arc<Self>, url: String) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move {
            let Some(targets) = self.visit(&url).await else {
                return Ok(());
            };

            // The visited guard makes redundant scheduling harmless, so every
            // in-scope target gets a task.
            let mut children = JoinSet::new();
            for target in targets {
                children.spawn(Arc::clone(&self).visit_recursive(target));
            }

            while let Some(joined) = children.join_next().await {
                joined??;
            }
            Ok(())
        })
    }

    async fn run_iterative(&self, seed: String) {
        let mut worklist = vec![seed];

        while let Some(url) = worklist.pop() {
            let Some(targets) = self.visit(&url).await else {
                continue;
            };
            // A URL can still be pushed twice before it is first popped;
            // the visited guard in `visit` catches that.
            worklist.extend(self.unvisited(targets).await);
        }
    }

    async fn run_pool(self: Arc<Self>, seed: String, workers: usize) -> Result<()> {
        let queue = Arc::new(Mutex::new(VecDeque::from([seed])));
        // Queued plus in-progress URLs. Zero means the crawl is finished.
        let pending = Arc::new(AtomicUsize::new(1));

        let mut worker_handles = JoinSet::new();
        for worker_id in 0..workers {
            let state = Arc::clone(&self);
            let queue = Arc::clone(&queue);
            let pending = Arc::clone(&pending);

            worker_handles.spawn(async move {
                debug!("Worker {} started", worker_id);

                loop {
                    let next = queue.lock().await.pop_front();
                    let Some(url) = next else {
                        if pending.load(Ordering::Acquire) == 0 {
                            break;
                        }
                        tokio::time::sleep(IDLE_BACKOFF).await;
                        continue;
                    };

                    if let Some(targets) = state.visit(&url).await {
                        let fresh = state.unvisited(targets).await;
                        // Count new work before publishing it and before
                        // retiring the current URL.
                        pending.fetch_add(fresh.len(), Ordering::AcqRel);
                        queue.lock().await.extend(fresh);
                    }
                    pending.fetch_sub(1, Ordering::AcqRel);
                }

                debug!("Worker {} finished", worker_id);
            });
        }

        while let Some(joined) = worker_handles.join_next().await {
            joined?;
        }
        Ok(())
    }
}
