//! Track and racer catalog with display-name lookup
//!
//! The service returns generic names, so the client shows its own names
//! for the known ids. Lookup is keyed by id, never by list position, so a
//! reordered server response cannot mislabel anything.

use crate::models::{PositionEntry, Racer, Track};
use std::collections::HashMap;

const TRACK_NAMES: [&str; 6] = [
    "MOUNT PANORAMA",
    "CIRCUIT DE LA SARTHE",
    "SUZUKA",
    "SPA-FRANCORCHAMPS",
    "NűRBURGRING NORDSCHLEIFE",
    "SILVERSTONE",
];

const RACER_NAMES: [&str; 5] = [
    "SSC TUATARA",
    "BUGATTI CHIRON SUPER SPORT",
    "HENNESSEY VENOM F5",
    "KOENIGSEGG AGERA RS",
    "HENNESSEY VENOM GT",
];

/// Id-keyed display names for tracks and racers
#[derive(Debug, Clone, Default)]
pub struct DisplayNames {
    tracks: HashMap<u32, String>,
    racers: HashMap<u32, String>,
}

impl DisplayNames {
    /// Table without overrides: server-provided names are shown as-is
    pub fn server() -> Self {
        Self::default()
    }

    /// Built-in names for the service's default catalog (ids start at 1)
    pub fn builtin() -> Self {
        let tracks = (1..).zip(TRACK_NAMES).map(|(id, n)| (id, n.to_string())).collect();
        let racers = (1..).zip(RACER_NAMES).map(|(id, n)| (id, n.to_string())).collect();
        Self { tracks, racers }
    }

    pub fn with_track(mut self, id: u32, name: impl Into<String>) -> Self {
        self.tracks.insert(id, name.into());
        self
    }

    pub fn with_racer(mut self, id: u32, name: impl Into<String>) -> Self {
        self.racers.insert(id, name.into());
        self
    }

    pub fn track_name<'a>(&'a self, id: u32, fallback: &'a str) -> &'a str {
        self.tracks.get(&id).map(String::as_str).unwrap_or(fallback)
    }

    pub fn racer_name<'a>(&'a self, id: u32, fallback: &'a str) -> &'a str {
        self.racers.get(&id).map(String::as_str).unwrap_or(fallback)
    }

    /// Apply track names to a fetched list
    pub fn label_tracks(&self, tracks: &mut [Track]) {
        for track in tracks {
            if let Some(name) = self.tracks.get(&track.id) {
                track.name = name.clone();
            }
        }
    }

    /// Apply racer names to a fetched list
    pub fn label_racers(&self, racers: &mut [Racer]) {
        for racer in racers {
            if let Some(name) = self.racers.get(&racer.id) {
                racer.driver_name = name.clone();
            }
        }
    }

    /// Apply racer names to race positions
    pub fn label_positions(&self, positions: &mut [PositionEntry]) {
        for entry in positions {
            if let Some(name) = self.racers.get(&entry.id) {
                entry.driver_name = name.clone();
            }
        }
    }
}

/// Snapshot of the tracks and racers fetched at start-up
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub tracks: Vec<Track>,
    pub racers: Vec<Racer>,
}

impl Catalog {
    pub fn track(&self, id: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn racer(&self, id: u32) -> Option<&Racer> {
        self.racers.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: u32, name: &str) -> Track {
        Track {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_builtin_names_keyed_by_id() {
        let names = DisplayNames::builtin();
        assert_eq!(names.track_name(1, "?"), "MOUNT PANORAMA");
        assert_eq!(names.track_name(6, "?"), "SILVERSTONE");
        assert_eq!(names.racer_name(5, "?"), "HENNESSEY VENOM GT");
    }

    #[test]
    fn test_builtin_track_names_verbatim() {
        let names = DisplayNames::builtin();
        assert_eq!(names.track_name(5, "?"), "NűRBURGRING NORDSCHLEIFE");
    }

    #[test]
    fn test_unknown_id_falls_back() {
        let names = DisplayNames::builtin();
        assert_eq!(names.track_name(42, "Track 42"), "Track 42");
        assert_eq!(DisplayNames::server().racer_name(1, "Racer 1"), "Racer 1");
    }

    #[test]
    fn test_label_tracks_ignores_order() {
        let names = DisplayNames::builtin();
        let mut tracks = vec![track(3, "Track 3"), track(1, "Track 1"), track(99, "Track 99")];
        names.label_tracks(&mut tracks);

        assert_eq!(tracks[0].name, "SUZUKA");
        assert_eq!(tracks[1].name, "MOUNT PANORAMA");
        assert_eq!(tracks[2].name, "Track 99");
    }

    #[test]
    fn test_label_positions() {
        let names = DisplayNames::server().with_racer(7, "Speedy");
        let mut positions = vec![PositionEntry {
            id: 7,
            driver_name: "Racer 7".to_string(),
            final_position: None,
            segment: 0.0,
        }];
        names.label_positions(&mut positions);
        assert_eq!(positions[0].driver_name, "Speedy");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog {
            tracks: vec![track(2, "b")],
            racers: vec![],
        };
        assert!(catalog.track(2).is_some());
        assert!(catalog.track(1).is_none());
        assert!(catalog.racer(1).is_none());
    }
}
