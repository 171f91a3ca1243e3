//! Crawl engine - the bounded run loop
//!
//! One call to [`CrawlEngine::run`] performs one run:
//! - Load the frontier, seeding it only when no pending work carried over
//! - Dequeue in FIFO order and gate each URL on visited, allow-list, robots
//! - Fetch, extract, and buffer newly discovered links
//! - Merge the buffer into the pending queue and persist the frontier once
//! - Build the run summary and hand it to the report sink
//!
//! The engine is the only writer of frontier state during a run.

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::extract::{ContentExtractor, HtmlExtractor};
use crate::frontier::{
    load_seeds, merge_pending, DiscoveryBuffer, Frontier, FrontierStore, PendingQueue,
};
use crate::report::{sinks_from_config, ReportSink, RunSummary};
use crate::robots::RobotsCache;
use crate::storage::HtmlStore;
use crate::url::{canonicalize, is_allowed_domain, CanonicalUrl};
use crate::Result;
use chrono::Utc;
use url::Url;

/// Outcome of gating one dequeued URL
#[derive(Debug, PartialEq, Eq)]
enum Gate {
    /// Eligible for fetching
    Fetch(CanonicalUrl),
    /// Skipped without touching the visited set
    Skip,
    /// Disallowed by robots rules; recorded as visited
    RobotsDenied(CanonicalUrl),
}

/// Mutable state of a single run
struct RunState {
    frontier: Frontier,
    discovered: DiscoveryBuffer,
    summary: RunSummary,
    attempts: u32,
}

/// Drives one bounded crawl run over a persisted frontier
pub struct CrawlEngine {
    config: Config,
    store: FrontierStore,
    robots: RobotsCache,
    fetcher: Fetcher,
    extractor: Box<dyn ContentExtractor>,
    sink: Box<dyn ReportSink>,
    html_store: Option<HtmlStore>,
    config_hash: String,
}

impl CrawlEngine {
    /// Creates an engine with the default extractor and the configured sinks
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Engine ready to run
    /// * `Err(SpiderError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Fetcher::from_config(&config.user_agent, &config.crawler)?;
        let robots = RobotsCache::from_config(fetcher.client().clone(), &config.crawler);
        let store = FrontierStore::from_config(&config.frontier);
        let extractor = HtmlExtractor::new(config.output.preview_max_length);
        let sink = sinks_from_config(&config.output, fetcher.client());
        let html_store = config.output.data_dir.clone().map(HtmlStore::new);

        Ok(Self {
            config,
            store,
            robots,
            fetcher,
            extractor: Box::new(extractor),
            sink: Box::new(sink),
            html_store,
            config_hash: String::new(),
        })
    }

    /// Replaces the content extractor
    pub fn with_extractor(mut self, extractor: Box<dyn ContentExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replaces the report sink
    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Sets the configuration hash recorded in the run summary
    pub fn with_config_hash(mut self, config_hash: impl Into<String>) -> Self {
        self.config_hash = config_hash.into();
        self
    }

    /// Performs one bounded crawl run
    ///
    /// Per-URL failures are recorded in the summary. Only failing to read or
    /// write the frontier aborts the run; in that case nothing is persisted
    /// and no report is delivered. Report delivery failures are logged.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let started_at = Utc::now();
        tracing::info!("Crawl run starting");

        let frontier = self.initialize()?;
        let mut state = RunState {
            frontier,
            discovered: DiscoveryBuffer::new(),
            summary: RunSummary::new(started_at, self.config_hash.clone()),
            attempts: 0,
        };

        if state.frontier.pending.is_empty() {
            tracing::warn!(
                "No pending URLs; check {} or {}",
                self.config.frontier.seeds_path.display(),
                self.store.pending_path().display()
            );
            state.summary.visited_total = state.frontier.visited.len();
            state.summary.finished_at = Utc::now();
            return Ok(state.summary);
        }

        self.crawl_loop(&mut state).await;

        let summary = self.finalize(state)?;
        self.report(&summary).await;

        Ok(summary)
    }

    /// Loads the frontier and seeds an empty pending queue
    fn initialize(&self) -> Result<Frontier> {
        let mut frontier = self.store.load()?;
        tracing::info!(
            "Loaded frontier: {} visited, {} pending",
            frontier.visited.len(),
            frontier.pending.len()
        );

        if frontier.pending.is_empty() {
            let allowed = &self.config.domains.allowed;
            let seeds: Vec<String> = load_seeds(&self.config.frontier.seeds_path)?
                .into_iter()
                .filter(|seed| is_allowed_domain(seed, allowed))
                .collect();
            tracing::info!("Loaded {} seed URLs", seeds.len());
            frontier.pending.extend(seeds);
        }

        Ok(frontier)
    }

    async fn crawl_loop(&mut self, state: &mut RunState) {
        let max_pages = self.config.crawler.max_pages;
        let delay = self.config.crawler.request_delay();

        while state.attempts < max_pages {
            let raw = match state.frontier.pending.pop_front() {
                Some(raw) => raw,
                None => break,
            };

            let key = match self.gate(&raw, state).await {
                Gate::Fetch(key) => key,
                Gate::Skip => continue,
                Gate::RobotsDenied(key) => {
                    tracing::info!("Disallowed by robots.txt: {}", raw);
                    state.frontier.visited.insert(key);
                    state.summary.robots_denied += 1;
                    continue;
                }
            };

            state.attempts += 1;
            tracing::info!("Fetching [{}/{}]: {}", state.attempts, max_pages, raw);

            match self.fetcher.fetch(&raw).await {
                Ok(html) => self.process_page(&raw, key, &html, state),
                Err(e) => {
                    tracing::error!("Fetch failed for {}: {}", raw, e);
                    state.summary.failed_urls.push(raw);
                }
            }

            if has_next_attempt(state.attempts, max_pages, &state.frontier.pending)
                && !delay.is_zero()
            {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Applies the visited, allow-list and robots gates in order
    async fn gate(&mut self, raw: &str, state: &RunState) -> Gate {
        let key = match canonicalize(raw) {
            Ok(key) => key,
            Err(e) => {
                tracing::debug!("Skipping unusable URL {}: {}", raw, e);
                return Gate::Skip;
            }
        };

        if state.frontier.visited.contains(&key) {
            tracing::debug!("Already visited: {}", key);
            return Gate::Skip;
        }

        if !is_allowed_domain(raw, &self.config.domains.allowed) {
            tracing::debug!("Domain not allowed: {}", raw);
            return Gate::Skip;
        }

        let token = self.config.user_agent.robots_token();
        if !self.robots.can_fetch(raw, token).await {
            return Gate::RobotsDenied(key);
        }

        Gate::Fetch(key)
    }

    /// Extracts a fetched page, buffers its links and marks it visited
    fn process_page(&self, raw: &str, key: CanonicalUrl, html: &str, state: &mut RunState) {
        if let Some(html_store) = &self.html_store {
            if let Err(e) = html_store.save(raw, html) {
                tracing::warn!("Failed to save HTML snapshot for {}: {}", raw, e);
            }
        }

        state.summary.pages.push(self.extractor.extract(html, raw));

        match Url::parse(raw.trim()) {
            Ok(base) => {
                let allowed = &self.config.domains.allowed;
                for link in extract_links(html, &base) {
                    if !is_allowed_domain(&link, allowed) {
                        continue;
                    }
                    let link_key = match canonicalize(&link) {
                        Ok(link_key) => link_key,
                        Err(_) => continue,
                    };
                    if state.discovered.offer(link_key, &state.frontier.visited) {
                        state.summary.links_found += 1;
                    }
                }
            }
            Err(e) => tracing::debug!("Cannot resolve links on {}: {}", raw, e),
        }

        state.frontier.visited.insert(key);
        state.summary.pages_fetched += 1;
    }

    /// Merges discovered links and persists the frontier once
    fn finalize(&self, state: RunState) -> Result<RunSummary> {
        let RunState {
            frontier,
            discovered,
            mut summary,
            ..
        } = state;

        let pending = merge_pending(frontier.pending, discovered, &frontier.visited);
        let frontier = Frontier::new(frontier.visited, pending);

        self.store.save(&frontier)?;

        summary.frontier_size = frontier.pending.len();
        summary.visited_total = frontier.visited.len();
        summary.finished_at = Utc::now();

        tracing::info!(
            "Crawl run finished: {} fetched, {} new links, {} failed, {} pending, {} visited",
            summary.pages_fetched,
            summary.links_found,
            summary.fetch_failures(),
            summary.frontier_size,
            summary.visited_total
        );

        Ok(summary)
    }

    async fn report(&self, summary: &RunSummary) {
        if !summary.has_content() && !self.config.output.report_empty_runs {
            tracing::info!("No new content this run, skipping report");
            return;
        }

        if let Err(e) = self.sink.deliver(summary).await {
            tracing::error!("Report delivery failed: {}", e);
        }
    }
}

/// Whether the loop may fetch again after the attempt just made
///
/// The politeness delay follows every attempt except one that ends the run.
fn has_next_attempt(attempts: u32, max_pages: u32, pending: &PendingQueue) -> bool {
    attempts < max_pages && !pending.is_empty()
}
