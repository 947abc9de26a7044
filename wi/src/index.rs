//! Core WorkoutIndex implementation

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use eyre::{Context, Result};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::category::{Category, categorize};

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("token pattern is valid"));

/// A stored workout as written by the ingestion step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Source identifier
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score_type: String,
    #[serde(default)]
    pub workout_type: String,
    #[serde(default)]
    pub track: String,
    /// RFC 3339 timestamp, may be empty
    #[serde(default)]
    pub created_at: String,
}

impl WorkoutRecord {
    fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.title, self.description, self.workout_type, self.score_type, self.track
        )
    }
}

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// 1-based position in the ranking
    pub rank: usize,
    pub title: String,
    pub description: String,
    pub score_type: String,
    pub workout_type: String,
    pub track: String,
    pub created_at: String,
    /// Non-negative, lower is more similar
    pub distance: f32,
    pub category: Category,
}

impl SearchHit {
    /// Calendar date of `created_at`, when it is a valid RFC 3339 timestamp
    pub fn created_date(&self) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.date_naive())
    }
}

/// Options for grouped searches
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Split warmups into their own bucket instead of the main results
    pub include_warmups: bool,
    /// Split cooldowns into their own bucket instead of the main results
    pub include_cooldowns: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_warmups: true,
            include_cooldowns: true,
        }
    }
}

/// Search hits partitioned by category
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub warmups: Vec<SearchHit>,
    pub cooldowns: Vec<SearchHit>,
}

/// Statistics for an index
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub record_count: usize,
    pub track_count: usize,
    pub by_category: BTreeMap<String, usize>,
}

/// Read-only catalogue of reference workouts
pub struct WorkoutIndex {
    path: PathBuf,
    records: Vec<WorkoutRecord>,
    tokens: Vec<HashSet<String>>,
}

impl WorkoutIndex {
    /// Open an index from a metadata file, or a directory containing one
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut path = path.as_ref().to_path_buf();
        if path.is_dir() {
            path = path.join(crate::METADATA_FILE);
        }

        let content =
            fs::read_to_string(&path).context(format!("Failed to read workout metadata: {}", path.display()))?;
        let records: Vec<WorkoutRecord> =
            serde_json::from_str(&content).context(format!("Invalid workout metadata: {}", path.display()))?;

        info!("Loaded {} workouts from {}", records.len(), path.display());
        Ok(Self::from_records_at(path, records))
    }

    /// Build an in-memory index
    pub fn from_records(records: Vec<WorkoutRecord>) -> Self {
        Self::from_records_at(PathBuf::new(), records)
    }

    fn from_records_at(path: PathBuf, records: Vec<WorkoutRecord>) -> Self {
        let tokens = records.iter().map(|r| tokenize(&r.searchable_text())).collect();
        Self { path, records, tokens }
    }

    /// Path the index was loaded from (empty for in-memory indexes)
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rank stored workouts against `query`, returning at most `k` hits
    ///
    /// Only workouts sharing at least one token with the query are returned, so
    /// the result may be shorter than `k` or empty. Ties keep catalogue order.
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchHit> {
        debug!("search: query={:?} k={}", query, k);
        let query_tokens = tokenize(query);
        if k == 0 || query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .tokens
            .iter()
            .enumerate()
            .filter_map(|(idx, doc)| {
                let overlap = query_tokens.intersection(doc).count();
                if overlap == 0 {
                    return None;
                }
                let distance = 1.0 - overlap as f32 / query_tokens.len() as f32;
                Some((idx, distance))
            })
            .collect();

        // sort_by is stable, equal distances stay in catalogue order
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        scored
            .into_iter()
            .enumerate()
            .map(|(pos, (idx, distance))| {
                let record = &self.records[idx];
                SearchHit {
                    rank: pos + 1,
                    title: record.title.clone(),
                    description: record.description.clone(),
                    score_type: record.score_type.clone(),
                    workout_type: record.workout_type.clone(),
                    track: record.track.clone(),
                    created_at: record.created_at.clone(),
                    distance,
                    category: categorize(&record.title, &record.score_type),
                }
            })
            .collect()
    }

    /// Search and partition hits into main results, warmups and cooldowns
    pub fn search_grouped(&self, query: &str, k: usize, options: &SearchOptions) -> SearchResults {
        let mut grouped = SearchResults {
            query: query.to_string(),
            results: Vec::new(),
            warmups: Vec::new(),
            cooldowns: Vec::new(),
        };

        for hit in self.search(query, k) {
            match hit.category {
                Category::Warmup if options.include_warmups => grouped.warmups.push(hit),
                Category::Cooldown if options.include_cooldowns => grouped.cooldowns.push(hit),
                _ => grouped.results.push(hit),
            }
        }

        grouped
    }

    /// Get statistics for the index
    pub fn stats(&self) -> IndexStats {
        let tracks: HashSet<&str> = self.records.iter().map(|r| r.track.as_str()).collect();
        let mut by_category = BTreeMap::new();
        for record in &self.records {
            *by_category
                .entry(categorize(&record.title, &record.score_type).to_string())
                .or_insert(0) += 1;
        }

        IndexStats {
            record_count: self.records.len(),
            track_count: tracks.len(),
            by_category,
        }
    }
}

fn tokenize(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}
