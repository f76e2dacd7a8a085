use serde::Serialize;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::CrawlConfig;
use crate::extract::{extract_links, normalize_url};
use crate::fetch::PageFetcher;
use crate::filter::ExclusionFilter;

/// One page queued for a future fetch.
///
/// Owned exclusively by the scheduler's frontier; created when a link
/// survives filtering and consumed when popped.
#[derive(Debug, Clone)]
struct FrontierEntry {
    url: String,
    depth: usize,
}

/// Result of a completed crawl.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlOutcome {
    /// Discovered URLs in lexicographic order.
    pub urls: Vec<String>,

    /// Number of discovered URLs.
    pub total_found: usize,
}

/// Breadth-first frontier scheduler.
///
/// Drives the link extractor and exclusion filter over a strict-FIFO queue
/// of `(url, depth)` entries until the frontier drains or the page budget
/// fills. One page is fetched and fully processed before the next is
/// popped; suspension happens only at the page fetch and the politeness
/// delay. All traversal state is scoped to a single `run` call.
pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    filter: ExclusionFilter,
    politeness_delay: Duration,
}

impl Crawler {
    /// Create a scheduler over the given fetch collaborator and filter.
    pub fn new(fetcher: Arc<dyn PageFetcher>, filter: ExclusionFilter) -> Self {
        Self {
            fetcher,
            filter,
            politeness_delay: Duration::from_millis(100),
        }
    }

    /// Override the pause between successive page fetches.
    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    /// Run one crawl to completion and return the sorted found set.
    ///
    /// The politeness delay follows each attempted fetch, successful or
    /// not. Entries skipped as already visited or over the depth budget
    /// issue no request and incur no delay.
    pub async fn run(&self, config: &CrawlConfig) -> CrawlOutcome {
        let site_origin = config.start_url.clone();
        let start = normalize_url(&config.start_url)
            .unwrap_or_else(|| config.start_url.as_str().to_string());

        ::log::info!(
            "starting crawl of {} (max_pages={}, max_depth={})",
            start,
            config.max_pages,
            config.max_depth
        );

        let mut frontier: VecDeque<FrontierEntry> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut found: BTreeSet<String> = BTreeSet::new();

        // The start URL is always part of the result.
        found.insert(start.clone());
        frontier.push_back(FrontierEntry {
            url: start,
            depth: 0,
        });

        while let Some(entry) = frontier.pop_front() {
            if found.len() >= config.max_pages {
                break;
            }

            // Entries already visited, or at the depth budget, are never
            // fetched; they stay in the found set if they made it there.
            if visited.contains(&entry.url) || entry.depth >= config.max_depth {
                continue;
            }
            visited.insert(entry.url.clone());

            ::log::debug!("crawling [depth {}]: {}", entry.depth, entry.url);

            let links = match self.fetcher.fetch_html(&entry.url).await {
                Ok(html) => match Url::parse(&entry.url) {
                    Ok(page_url) => extract_links(&html, &page_url, &site_origin),
                    Err(e) => {
                        ::log::warn!("unparseable frontier url {}: {}", entry.url, e);
                        BTreeSet::new()
                    }
                },
                Err(e) => {
                    // Per-page failures contribute zero links and never
                    // abort the crawl.
                    ::log::warn!("fetch failed for {}: {}", entry.url, e);
                    BTreeSet::new()
                }
            };

            for link in links {
                if found.len() >= config.max_pages {
                    break;
                }

                let parsed = match Url::parse(&link) {
                    Ok(url) => url,
                    Err(_) => continue,
                };

                if self.filter.is_excluded(&parsed) {
                    ::log::trace!("excluded: {}", link);
                    continue;
                }

                if !found.insert(link.clone()) {
                    continue;
                }

                if !visited.contains(&link) && entry.depth + 1 < config.max_depth {
                    frontier.push_back(FrontierEntry {
                        url: link,
                        depth: entry.depth + 1,
                    });
                }
            }

            tokio::time::sleep(self.politeness_delay).await;
        }

        let urls: Vec<String> = found.into_iter().collect();
        let total_found = urls.len();

        ::log::info!("crawl complete, found {} urls", total_found);

        CrawlOutcome { urls, total_found }
    }
}
