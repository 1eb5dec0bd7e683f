//! Catalogue merge
//!
//! Reconciles the queue with a freshly loaded catalogue list. Existing entries are
//! never reordered or removed; unseen songs are appended in input order.

use lockstep_core::Song;
use std::collections::HashSet;

/// Songs from `incoming` that are not yet in `existing`, in input order
///
/// Identity is the song `url`. A url repeated within `incoming` is kept only once, so
/// merging the result keeps the queue url-unique. Merging an already merged list
/// yields nothing.
pub fn new_songs(existing: &[Song], incoming: Vec<Song>) -> Vec<Song> {
    let mut seen: HashSet<String> = existing.iter().map(|song| song.url.clone()).collect();

    incoming
        .into_iter()
        .filter(|song| seen.insert(song.url.clone()))
        .collect()
}
