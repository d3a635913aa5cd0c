//! In-memory song lookup index.
//!
//! Built once from the store after the catalog has been loaded, so that log
//! processing does not need a round-trip per listen event. Answers exactly
//! what `CatalogStore::find_song_candidates` would for the same catalog.

use super::models::{SongKey, SongMatch};
use super::trait_def::{single_candidate, CatalogStore, SongLookup};
use anyhow::Result;
use std::collections::HashMap;
use tracing::info;

struct IndexedSong {
    duration: f64,
    song: SongMatch,
}

/// (title, artist name) -> songs with their durations.
#[derive(Default)]
pub struct SongIndex {
    by_title_and_artist: HashMap<(String, String), Vec<IndexedSong>>,
    len: usize,
}

impl SongIndex {
    pub fn from_keys<I: IntoIterator<Item = SongKey>>(keys: I) -> Self {
        let mut index = SongIndex::default();
        for key in keys {
            index
                .by_title_and_artist
                .entry((key.title, key.artist_name))
                .or_default()
                .push(IndexedSong {
                    duration: key.duration,
                    song: SongMatch {
                        song_id: key.song_id,
                        artist_id: key.artist_id,
                    },
                });
            index.len += 1;
        }
        index
    }

    /// Snapshot the store's current catalog.
    pub fn build(store: &dyn CatalogStore) -> Result<Self> {
        let index = Self::from_keys(store.list_song_keys()?);
        info!("Built song index with {} songs", index.len);
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl SongLookup for SongIndex {
    fn lookup_song(
        &self,
        title: &str,
        artist_name: &str,
        duration: f64,
        tolerance: f64,
    ) -> Result<Option<SongMatch>> {
        let candidates = self
            .by_title_and_artist
            .get(&(title.to_string(), artist_name.to_string()))
            .map(|songs| {
                songs
                    .iter()
                    .filter(|s| (s.duration - duration).abs() <= tolerance)
                    .map(|s| s.song.clone())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(single_candidate(title, artist_name, duration, candidates))
    }
}
