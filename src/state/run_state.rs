//! Persisted run state and its store encoding
//!
//! Every field of a crawl run lives in the persistent run store under its own
//! key, as a plain string. This module defines the key names, the text
//! encodings (keywords are space-joined, item ids comma-joined), and the
//! load/persist helpers the orchestrator uses. Loading is forgiving: unknown
//! or unparsable values decode to `None`/empty so the orchestrator can apply
//! its self-healing rules instead of failing.

use crate::state::Phase;
use crate::storage::{RunStore, StoreResult};
use crate::SieveError;

/// Store key names for the persisted run state
pub mod keys {
    /// Current state-machine phase
    pub const PHASE: &str = "phase";
    /// Search term the run was started with
    pub const SEARCH_TERM: &str = "search_term";
    /// Comment filter keywords, space-joined
    pub const FILTER_KEYWORDS: &str = "filter_keywords";
    /// Maximum number of items to harvest
    pub const ITEM_LIMIT: &str = "item_limit";
    /// Discovered item ids, comma-joined
    pub const ITEM_IDS: &str = "item_ids";
    /// Index of the next item to harvest
    pub const CURSOR: &str = "cursor";
    /// Append-only buffer of serialized matched records
    pub const ACCUMULATED_RESULT: &str = "accumulated_result";
}

/// All persisted keys, in the order they are cleared on reset
pub const ALL_KEYS: [&str; 7] = [
    keys::PHASE,
    keys::SEARCH_TERM,
    keys::FILTER_KEYWORDS,
    keys::ITEM_LIMIT,
    keys::ITEM_IDS,
    keys::CURSOR,
    keys::ACCUMULATED_RESULT,
];

/// The operator-supplied inputs of one crawl run
///
/// Set once at the Idle -> Discovering transition and immutable until the run
/// completes or is reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlQuery {
    /// Term used to search for candidate items
    pub search_term: String,

    /// Keywords that qualify a comment for extraction
    pub filter_keywords: Vec<String>,

    /// Cap on the number of items harvested in one run
    pub item_limit: usize,
}

impl CrawlQuery {
    /// Rejects queries that cannot drive a run or survive persistence
    ///
    /// Keywords are stored space-joined, so a keyword containing whitespace
    /// would decode back as several keywords.
    pub fn validate(&self) -> crate::Result<()> {
        if self.search_term.trim().is_empty() {
            return Err(SieveError::BadQuery(
                "search term cannot be empty".to_string(),
            ));
        }

        if self.filter_keywords.is_empty() {
            return Err(SieveError::BadQuery(
                "at least one filter keyword is required".to_string(),
            ));
        }

        for keyword in &self.filter_keywords {
            if keyword.is_empty() || keyword.chars().any(char::is_whitespace) {
                return Err(SieveError::BadQuery(format!(
                    "keyword '{}' must be non-empty and contain no whitespace",
                    keyword
                )));
            }
        }

        if self.item_limit == 0 {
            return Err(SieveError::BadQuery(
                "item limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Everything persisted for a crawl run, decoded from the store
///
/// A missing phase decodes to `Idle`; missing or unparsable query/progress
/// fields decode to `None`/empty. Enforcing phase-specific invariants
/// (for example that Harvesting has a cursor within bounds) is the
/// orchestrator's job, not the decoder's.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// Current state-machine phase
    pub phase: Phase,

    /// Operator query, present only when fully decodable
    pub query: Option<CrawlQuery>,

    /// Discovered item ids in harvest order
    pub item_ids: Vec<String>,

    /// Index of the next item to harvest, if parsable
    pub cursor: Option<usize>,

    /// Serialized matched records accumulated so far
    pub accumulated: String,
}

impl RunState {
    /// Loads the run state from the store
    ///
    /// Only store access itself can fail; malformed values degrade to their
    /// defaults so the caller can self-heal.
    pub fn load<S: RunStore + ?Sized>(store: &S) -> StoreResult<Self> {
        let phase = store
            .get(keys::PHASE)?
            .and_then(|s| Phase::from_store_string(&s))
            .unwrap_or_default();

        let query = load_query(store)?;

        let item_ids = store
            .get(keys::ITEM_IDS)?
            .map(|s| decode_item_ids(&s))
            .unwrap_or_default();

        let cursor = store.get(keys::CURSOR)?.and_then(|s| s.parse().ok());

        let accumulated = store.get(keys::ACCUMULATED_RESULT)?.unwrap_or_default();

        Ok(Self {
            phase,
            query,
            item_ids,
            cursor,
            accumulated,
        })
    }
}

/// Decodes the query keys, returning None unless all three are present and valid
fn load_query<S: RunStore + ?Sized>(store: &S) -> StoreResult<Option<CrawlQuery>> {
    let term = match store.get(keys::SEARCH_TERM)? {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Ok(None),
    };
    let keywords = match store.get(keys::FILTER_KEYWORDS)? {
        Some(k) => decode_keywords(&k),
        None => return Ok(None),
    };
    if keywords.is_empty() {
        return Ok(None);
    }
    let limit = match store.get(keys::ITEM_LIMIT)?.and_then(|s| s.parse().ok()) {
        Some(l) => l,
        None => return Ok(None),
    };
    Ok(Some(CrawlQuery {
        search_term: term,
        filter_keywords: keywords,
        item_limit: limit,
    }))
}

/// Persists the operator query (three keys)
pub fn persist_query<S: RunStore + ?Sized>(store: &mut S, query: &CrawlQuery) -> StoreResult<()> {
    store.set(keys::SEARCH_TERM, &query.search_term)?;
    store.set(keys::FILTER_KEYWORDS, &encode_keywords(&query.filter_keywords))?;
    store.set(keys::ITEM_LIMIT, &query.item_limit.to_string())?;
    Ok(())
}

/// Persists the current phase
pub fn persist_phase<S: RunStore + ?Sized>(store: &mut S, phase: Phase) -> StoreResult<()> {
    store.set(keys::PHASE, phase.to_store_string())
}

/// Persists the discovered item ids
pub fn persist_item_ids<S: RunStore + ?Sized>(store: &mut S, ids: &[String]) -> StoreResult<()> {
    store.set(keys::ITEM_IDS, &encode_item_ids(ids))
}

/// Persists the harvest cursor
pub fn persist_cursor<S: RunStore + ?Sized>(store: &mut S, cursor: usize) -> StoreResult<()> {
    store.set(keys::CURSOR, &cursor.to_string())
}

/// Persists the accumulated serialized records
pub fn persist_accumulated<S: RunStore + ?Sized>(store: &mut S, accumulated: &str) -> StoreResult<()> {
    store.set(keys::ACCUMULATED_RESULT, accumulated)
}

/// Removes every persisted key (the explicit operator reset)
pub fn clear_run<S: RunStore + ?Sized>(store: &mut S) -> StoreResult<()> {
    for key in ALL_KEYS {
        store.remove(key)?;
    }
    Ok(())
}

/// Drops run progress and returns the phase to Idle, keeping the query keys
///
/// Used both for the zero-targets outcome (so the operator can retry without
/// re-typing the query) and for self-healing after corrupt progress state.
pub fn reset_to_idle<S: RunStore + ?Sized>(store: &mut S) -> StoreResult<()> {
    store.remove(keys::ITEM_IDS)?;
    store.remove(keys::CURSOR)?;
    store.remove(keys::ACCUMULATED_RESULT)?;
    persist_phase(store, Phase::Idle)
}

fn encode_keywords(keywords: &[String]) -> String {
    keywords.join(" ")
}

fn decode_keywords(encoded: &str) -> Vec<String> {
    encoded.split_whitespace().map(str::to_string).collect()
}

fn encode_item_ids(ids: &[String]) -> String {
    ids.join(",")
}

fn decode_item_ids(encoded: &str) -> Vec<String> {
    encoded
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
