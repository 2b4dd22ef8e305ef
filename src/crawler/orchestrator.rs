//! Crawl orchestrator
//!
//! The orchestrator is a state machine that survives navigation. Every
//! execution re-derives its position purely from the run store, does the work
//! of the current phase, persists what it learned, and usually ends by
//! requesting a navigation that tears the execution down. Continuity between
//! executions exists only in the store.
//!
//! Phases:
//! - `Idle`: waiting for an operator start command
//! - `Discovering`: enumerating item ids on the search results view
//! - `Harvesting`: visiting items one by one and extracting comments
//!
//! Inconsistent persisted state is never fatal; it heals back to `Idle` and
//! the operator retries.

use crate::config::Config;
use crate::crawler::enumerator::enumerate_targets;
use crate::crawler::host::{wait_for_render, PageHost};
use crate::extract::{extract_comments, marker_present, render_records, ExtractOptions};
use crate::output::ARTIFACT_FILE_NAME;
use crate::state::{
    clear_run, persist_accumulated, persist_cursor, persist_item_ids, persist_phase,
    persist_query, reset_to_idle, CrawlQuery, Phase, RunState,
};
use crate::storage::RunStore;
use crate::url::{is_item_location, is_search_location, item_url, search_url};
use crate::SieveError;

use regex::Regex;
use url::Url;

/// How one execution ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing to do; the run is at rest in `Idle`
    Idle,

    /// Navigation was requested; execute again once the page has settled
    Navigated { target: Url },

    /// The run finished; the artifact was delivered and the state cleared
    Completed,

    /// Inconsistent or empty-handed state was reset back to `Idle`
    Reset,
}

/// Drives the crawl state machine over a run store and a page host
///
/// The store and the host are injected so the machine runs identically
/// against a live page or against fixtures.
pub struct Orchestrator<S, H> {
    store: S,
    host: H,
    config: Config,
    pattern: Regex,
    options: ExtractOptions,
}

impl<S: RunStore, H: PageHost> Orchestrator<S, H> {
    /// Creates a new orchestrator
    ///
    /// # Arguments
    ///
    /// * `store` - Run store carrying state across executions
    /// * `host` - Page host the machine reads from and navigates
    /// * `config` - Platform and timing configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to execute
    /// * `Err(SieveError)` - The configured item-link pattern does not compile
    pub fn new(store: S, host: H, config: Config) -> crate::Result<Self> {
        let pattern = config.item_pattern()?;
        let options = config.extract_options();

        Ok(Self {
            store,
            host,
            config,
            pattern,
            options,
        })
    }

    // ===== Operator commands =====

    /// Starts a run: persists the query and navigates to the search view
    ///
    /// # Arguments
    ///
    /// * `query` - The operator-supplied search term, keywords, and limit
    ///
    /// # Returns
    ///
    /// * `Ok(StepOutcome::Navigated)` - The run is underway
    /// * `Err(SieveError::BadQuery)` - The query cannot drive a run
    pub fn start(&mut self, query: CrawlQuery) -> crate::Result<StepOutcome> {
        query.validate()?;

        let target = search_url(&self.config.platform.domain, &query.search_term)?;

        tracing::info!(
            "Starting run: term '{}', keywords [{}], item limit {}",
            query.search_term,
            query.filter_keywords.join(", "),
            query.item_limit
        );

        persist_query(&mut self.store, &query)?;
        persist_phase(&mut self.store, Phase::Discovering)?;

        self.host.request_navigation(&target)?;
        Ok(StepOutcome::Navigated { target })
    }

    /// Removes every persisted key, forcing the next execution into `Idle`
    pub fn clear(&mut self) -> crate::Result<()> {
        clear_run(&mut self.store)?;
        tracing::info!("Cleared run state");
        Ok(())
    }

    // ===== Execution =====

    /// Runs one execution of the state machine
    ///
    /// Reads the persisted state, heals it if it cannot drive the current
    /// phase, and dispatches. An execution that requests navigation must not
    /// be followed by further reads of the current page.
    ///
    /// # Returns
    ///
    /// * `Ok(StepOutcome)` - How this execution ended
    /// * `Err(SieveError)` - Store or host access failed
    pub async fn execute(&mut self) -> crate::Result<StepOutcome> {
        let state = RunState::load(&self.store)?;

        if state.phase == Phase::Idle {
            tracing::debug!("Idle, waiting for a start command");
            return Ok(StepOutcome::Idle);
        }

        let query = match state.query.clone() {
            Some(query) => query,
            None => {
                tracing::warn!(
                    "Phase is {} but no usable query is persisted, resetting to idle",
                    state.phase
                );
                reset_to_idle(&mut self.store)?;
                return Ok(StepOutcome::Reset);
            }
        };

        match state.phase {
            Phase::Idle => Ok(StepOutcome::Idle),
            Phase::Discovering => self.discover(&query).await,
            Phase::Harvesting => self.harvest(&query, &state).await,
        }
    }

    /// Executes until the machine is at rest, bounded by `max_executions`
    ///
    /// Each navigation outcome is followed by another execution, modelling
    /// the next page load picking the run back up from the store.
    ///
    /// # Arguments
    ///
    /// * `max_executions` - Upper bound on executions before giving up
    ///
    /// # Returns
    ///
    /// * `Ok(StepOutcome)` - The resting outcome (`Idle`, `Completed`, or `Reset`)
    /// * `Err(SieveError::Stalled)` - The bound was hit while still navigating
    pub async fn run_to_rest(&mut self, max_executions: usize) -> crate::Result<StepOutcome> {
        for _ in 0..max_executions {
            let outcome = self.execute().await?;
            match outcome {
                StepOutcome::Navigated { target } => {
                    tracing::debug!("Continuing after navigation to {}", target);
                }
                resting => return Ok(resting),
            }
        }

        Err(SieveError::Stalled {
            executions: max_executions,
        })
    }

    // ===== Phase handlers =====

    /// Discovering: enumerate item ids on the search results view
    async fn discover(&mut self, query: &CrawlQuery) -> crate::Result<StepOutcome> {
        let expected = search_url(&self.config.platform.domain, &query.search_term)?;

        let location = self.host.location()?;
        if !location.as_ref().map_or(false, is_search_location) {
            let at = describe_location(&location);
            tracing::warn!("Expected the search view but host is at {}, correcting", at);
            self.host.request_navigation(&expected)?;
            return Ok(StepOutcome::Navigated { target: expected });
        }

        let pattern = self.pattern.clone();
        let rendered = wait_for_render(
            &self.host,
            |body| pattern.is_match(body),
            self.config.poll_interval(),
            self.config.render_timeout(),
        )
        .await?;
        if !rendered {
            tracing::warn!(
                "No item links appeared within {:?}, scanning anyway",
                self.config.render_timeout()
            );
        }

        let authenticated = marker_present(
            &self.host.body_html()?,
            &self.config.platform.logout_marker,
        )?;
        if !authenticated {
            tracing::info!("No authenticated session, enumerating the initial view only");
        }

        let ids = enumerate_targets(
            &mut self.host,
            &self.pattern,
            query.item_limit,
            authenticated,
            self.config.reveal_settle(),
        )
        .await?;

        if ids.is_empty() {
            tracing::warn!(
                "No items found for '{}', resetting to idle",
                query.search_term
            );
            reset_to_idle(&mut self.store)?;
            return Ok(StepOutcome::Reset);
        }

        tracing::info!("Discovered {} items for '{}'", ids.len(), query.search_term);

        // Phase is written last; an interruption mid-sequence resumes in
        // Discovering and redoes enumeration instead of harvesting with
        // missing progress keys.
        persist_item_ids(&mut self.store, &ids)?;
        persist_cursor(&mut self.store, 0)?;
        persist_phase(&mut self.store, Phase::Harvesting)?;

        let target = item_url(&self.config.platform.domain, &ids[0])?;
        self.host.request_navigation(&target)?;
        Ok(StepOutcome::Navigated { target })
    }

    /// Harvesting: extract comments from the item under the cursor
    async fn harvest(&mut self, query: &CrawlQuery, state: &RunState) -> crate::Result<StepOutcome> {
        let cursor = match state.cursor {
            Some(cursor) if cursor < state.item_ids.len() => cursor,
            _ => {
                tracing::warn!(
                    "Harvesting with unusable progress (cursor {:?}, {} ids), resetting to idle",
                    state.cursor,
                    state.item_ids.len()
                );
                reset_to_idle(&mut self.store)?;
                return Ok(StepOutcome::Reset);
            }
        };

        let id = &state.item_ids[cursor];
        let expected = item_url(&self.config.platform.domain, id)?;

        let location = self.host.location()?;
        if !location.as_ref().map_or(false, |l| is_item_location(l, id)) {
            let at = describe_location(&location);
            tracing::warn!("Expected item {} but host is at {}, correcting", id, at);
            self.host.request_navigation(&expected)?;
            return Ok(StepOutcome::Navigated { target: expected });
        }
        let page_url = location.unwrap_or(expected);

        let container = self.config.platform.comment_container.clone();
        let rendered = wait_for_render(
            &self.host,
            |body| marker_present(body, &container).unwrap_or(false),
            self.config.poll_interval(),
            self.config.render_timeout(),
        )
        .await?;
        if !rendered {
            tracing::warn!(
                "Comment container did not appear on item {} within {:?}",
                id,
                self.config.render_timeout()
            );
        }

        let body = self.host.body_html()?;
        let records = extract_comments(&body, &query.filter_keywords, &page_url, &self.options)?;
        tracing::info!(
            "Item {} ({}/{}) yielded {} matched comments",
            id,
            cursor + 1,
            state.item_ids.len(),
            records.len()
        );

        // The first item replaces whatever accumulator a previous run left
        // behind; later items append to the persisted text.
        let rendered_records = render_records(&records);
        let accumulated = if cursor == 0 {
            rendered_records
        } else {
            format!("{}{}", state.accumulated, rendered_records)
        };

        if cursor + 1 < state.item_ids.len() {
            // Accumulator before cursor; an interruption between the two
            // writes re-harvests the current item instead of skipping one.
            persist_accumulated(&mut self.store, &accumulated)?;
            persist_cursor(&mut self.store, cursor + 1)?;

            let target = item_url(&self.config.platform.domain, &state.item_ids[cursor + 1])?;
            self.host.request_navigation(&target)?;
            Ok(StepOutcome::Navigated { target })
        } else {
            tracing::info!(
                "Run for '{}' complete: {} matched comments across {} items",
                query.search_term,
                accumulated.lines().count(),
                state.item_ids.len()
            );
            self.host.deliver_artifact(ARTIFACT_FILE_NAME, &accumulated)?;
            clear_run(&mut self.store)?;
            Ok(StepOutcome::Completed)
        }
    }

    // ===== Accessors =====

    /// The run store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the run store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The page host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the page host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

/// Human-readable current location for log lines
fn describe_location(location: &Option<Url>) -> String {
    location
        .as_ref()
        .map_or_else(|| "no page".to_string(), |l| l.to_string())
}
