use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::{Paper, TopicCode};

/// A paper list request issued by [`FeedState::select_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub category: TopicCode,
}

/// A translation request issued by [`FeedState::begin_translate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateTicket {
    pub entry_id: String,
}

/// State of the paper feed panel: the selected category, the current list,
/// and which cards have a translation outstanding.
#[derive(Debug)]
pub struct FeedState {
    selected: TopicCode,
    papers: Vec<Paper>,
    loading: bool,
    generation: u64,
    translating: HashSet<String>,
    translation_errors: HashMap<String, String>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(TopicCode::default())
    }
}

impl FeedState {
    /// Starts in the loading state; pair with [`FeedState::initial_fetch`].
    pub fn new(selected: TopicCode) -> Self {
        Self {
            selected,
            papers: Vec::new(),
            loading: true,
            generation: 0,
            translating: HashSet::new(),
            translation_errors: HashMap::new(),
        }
    }

    pub fn initial_fetch(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            category: self.selected,
        }
    }

    pub fn select_category(&mut self, category: TopicCode) -> FetchTicket {
        self.selected = category;
        self.generation += 1;
        self.papers.clear();
        self.translation_errors.clear();
        self.loading = true;
        debug!(%category, generation = self.generation, "category selected");
        FetchTicket {
            generation: self.generation,
            category,
        }
    }

    /// Applies a paper list response. Responses for anything but the latest
    /// request are dropped. Returns whether the result was applied.
    pub fn finish_fetch(&mut self, generation: u64, result: Result<Vec<Paper>, ApiError>) -> bool {
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale paper list");
            return false;
        }
        self.loading = false;
        match result {
            Ok(papers) => {
                debug!(count = papers.len(), category = %self.selected, "paper list loaded");
                self.papers = papers;
            }
            Err(err) => {
                warn!(category = %self.selected, error = %err, "failed to load papers");
                self.papers.clear();
            }
        }
        true
    }

    /// Marks `entry_id` in flight. Returns `None` when a translation for it
    /// is already outstanding.
    pub fn begin_translate(&mut self, entry_id: &str) -> Option<TranslateTicket> {
        if !self.translating.insert(entry_id.to_owned()) {
            debug!(%entry_id, "translation already in flight");
            return None;
        }
        self.translation_errors.remove(entry_id);
        Some(TranslateTicket {
            entry_id: entry_id.to_owned(),
        })
    }

    /// Clears the in-flight mark and, on success, replaces the paper with the
    /// same identifier by the translated record.
    pub fn finish_translate(&mut self, entry_id: &str, result: Result<Paper, ApiError>) {
        self.translating.remove(entry_id);
        match result {
            Ok(translated) => {
                match self.papers.iter_mut().find(|p| p.entry_id == entry_id) {
                    Some(slot) => *slot = translated,
                    None => debug!(%entry_id, "translated paper no longer listed"),
                }
            }
            Err(err) => {
                warn!(%entry_id, error = %err, "translation failed");
                self.translation_errors
                    .insert(entry_id.to_owned(), err.to_string());
            }
        }
    }

    /// Bumped on every category change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected(&self) -> TopicCode {
        self.selected
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_translating(&self, entry_id: &str) -> bool {
        self.translating.contains(entry_id)
    }

    pub fn translations_in_flight(&self) -> usize {
        self.translating.len()
    }

    pub fn translation_error(&self, entry_id: &str) -> Option<&str> {
        self.translation_errors.get(entry_id).map(String::as_str)
    }
}
