//! Module owning the set of recorded tracks: completed static tracks keyed
//! by a stable identifier, plus the single in-progress dynamic track.

use super::{LatLon, Track};
use log::debug;
use std::collections::HashMap;

/// Stable identifier of a static track, unique among currently stored
/// tracks.
pub type TrackId = usize;

/// The set of tracks to render: static tracks by identifier, plus at most
/// one dynamic track.
#[derive(Debug, Default)]
pub struct TrackStore {
    static_tracks: HashMap<TrackId, Track>,
    dynamic_track: Option<Track>,
}

impl TrackStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        TrackStore {
            static_tracks: HashMap::new(),
            dynamic_track: None,
        }
    }

    /// Returns the smallest identifier not currently in use.
    fn new_static_track_id(&self) -> TrackId {
        let mut id: TrackId = 0;
        while self.static_tracks.contains_key(&id) {
            id += 1;
        }
        id
    }

    /// Stores a completed track and returns its assigned identifier.
    ///
    /// Identifiers of removed tracks are reused: the smallest free one is
    /// always picked.
    pub fn add_static(&mut self, coords: Vec<LatLon>) -> TrackId {
        let id = self.new_static_track_id();
        debug!("Storing static track #{id} with {} points", coords.len());
        self.static_tracks.insert(id, Track::new(coords));
        id
    }

    /// Removes the static track with the given identifier, if present.
    pub fn remove_static(&mut self, id: TrackId) {
        if self.static_tracks.remove(&id).is_none() {
            debug!("No static track #{id} to remove");
        }
    }

    /// Removes all static tracks. The dynamic track is unaffected.
    pub fn remove_all_static(&mut self) {
        self.static_tracks.clear();
    }

    /// Replaces the dynamic track wholesale. An empty sequence clears it.
    pub fn set_dynamic(&mut self, coords: Vec<LatLon>) {
        if coords.is_empty() {
            self.dynamic_track = None;
        } else {
            self.dynamic_track = Some(Track::new(coords));
        }
    }

    /// Returns the number of static tracks currently stored.
    pub fn static_count(&self) -> usize {
        self.static_tracks.len()
    }

    /// Returns an iterator over all tracks to render: static tracks first
    /// (in unspecified order), then the dynamic track if present.
    pub fn active_tracks(&self) -> impl Iterator<Item = &Track> {
        self.static_tracks
            .values()
            .chain(self.dynamic_track.iter())
    }

    /// Returns an iterator over the static tracks and their identifiers, in
    /// unspecified order.
    pub fn static_tracks(&self) -> impl Iterator<Item = (TrackId, &Track)> {
        self.static_tracks.iter().map(|(&id, track)| (id, track))
    }

    /// Returns the dynamic track, if present.
    pub fn dynamic_track(&self) -> Option<&Track> {
        self.dynamic_track.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn coords(n: usize) -> Vec<LatLon> {
        (0..n)
            .map(|i| LatLon {
                lat: i as f64,
                lon: i as f64,
            })
            .collect()
    }

    #[test]
    fn ids_are_assigned_from_zero() {
        let mut store = TrackStore::new();
        assert_eq!(store.add_static(coords(2)), 0);
        assert_eq!(store.add_static(coords(3)), 1);
        assert_eq!(store.add_static(coords(4)), 2);
    }

    #[test]
    fn removed_id_is_reused() {
        let mut store = TrackStore::new();
        store.add_static(coords(2));
        store.add_static(coords(2));
        store.add_static(coords(2));

        store.remove_static(1);
        assert_eq!(store.add_static(coords(5)), 1);
        assert_eq!(store.add_static(coords(5)), 3);
    }

    #[test]
    fn removing_unknown_id_is_a_noop() {
        let mut store = TrackStore::new();
        store.add_static(coords(2));
        store.remove_static(17);
        assert_eq!(store.static_count(), 1);
    }

    #[test]
    fn dynamic_track_is_replaced_wholesale() {
        let mut store = TrackStore::new();
        store.set_dynamic(coords(3));
        store.set_dynamic(coords(5));

        let tracks: Vec<&Track> = store.active_tracks().collect();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].len(), 5);
    }

    #[test]
    fn empty_dynamic_update_clears_it() {
        let mut store = TrackStore::new();
        store.set_dynamic(coords(3));
        store.set_dynamic(Vec::new());
        assert_eq!(store.active_tracks().count(), 0);
    }

    #[test]
    fn active_tracks_ends_with_the_dynamic_track() {
        let mut store = TrackStore::new();
        store.add_static(coords(2));
        store.add_static(coords(2));
        store.set_dynamic(coords(9));

        let tracks: Vec<&Track> = store.active_tracks().collect();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks.last().unwrap().len(), 9);
    }

    #[test]
    fn remove_all_static_keeps_the_dynamic_track() {
        let mut store = TrackStore::new();
        store.add_static(coords(2));
        store.add_static(coords(2));
        store.set_dynamic(coords(4));

        store.remove_all_static();
        assert_eq!(store.static_count(), 0);
        assert_eq!(store.active_tracks().count(), 1);

        // Freed identifiers are assignable again.
        assert_eq!(store.add_static(coords(2)), 0);
    }
}
