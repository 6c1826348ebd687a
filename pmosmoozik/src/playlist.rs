//! Ordered, `localId`-unique track list
//!
//! A [`Playlist`] either owns its tracks (added by value or built from a
//! reply) or borrows tracks that live elsewhere (added with
//! [`Playlist::add_borrowed`]). Borrowed tracks stay under the caller's
//! control; the borrow checker keeps them alive as long as the playlist.

use crate::error::{Error, Result};
use crate::track::Track;
use crate::value::ResponseValue;
use rand::seq::IndexedRandom;
use std::borrow::Cow;
use tracing::{debug, warn};
use xmltree::{Element, EmitterConfig, XMLNode};

/// Size above which the service may reject or truncate `sendPlaylist`
pub const MAX_ADVISED_PLAYLIST_SIZE: usize = 200;

#[derive(Debug, Clone, Default)]
pub struct Playlist<'a> {
    tracks: Vec<Cow<'a, Track>>,
}

impl<'a> Playlist<'a> {
    pub fn new() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Builds an owned playlist from a parsed reply fragment.
    ///
    /// Accepts a list of `{track: ...}` / `{partytrack: ...}` entries, the
    /// map produced when a single entry was not recognised as a list, or a
    /// single bare track. Entries without a `localId` are skipped.
    pub fn from_value(value: &ResponseValue) -> Playlist<'static> {
        let mut playlist = Playlist::new();

        let entries: Vec<&ResponseValue> = match value {
            ResponseValue::Sequence(items) => items.iter().collect(),
            ResponseValue::Mapping(_) if value.get("localId").is_some() => vec![value],
            ResponseValue::Mapping(map) => map.values().collect(),
            ResponseValue::Scalar(_) => Vec::new(),
        };

        for entry in entries {
            match Track::from_value(unwrap_entry(entry)) {
                Ok(track) => {
                    playlist.add_track(track);
                }
                Err(e) => warn!("Skipping playlist entry: {}", e),
            }
        }

        debug!("Built playlist with {} tracks", playlist.len());
        playlist
    }

    /// Adds an owned track. Returns `false` (and leaves the playlist
    /// unchanged) when its `localId` is already present.
    pub fn add_track(&mut self, track: Track) -> bool {
        self.push(Cow::Owned(track))
    }

    /// Adds a track owned by the caller
    pub fn add_borrowed(&mut self, track: &'a Track) -> bool {
        self.push(Cow::Borrowed(track))
    }

    fn push(&mut self, track: Cow<'a, Track>) -> bool {
        if self.contains(track.local_id()) {
            debug!("Track {} already in playlist", track.local_id());
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn exceeds_advised_size(&self) -> bool {
        self.len() > MAX_ADVISED_PLAYLIST_SIZE
    }

    pub fn contains(&self, local_id: &str) -> bool {
        self.index_of(local_id).is_some()
    }

    pub fn index_of(&self, local_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.local_id() == local_id)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index).map(AsRef::as_ref)
    }

    pub fn get_by_id(&self, local_id: &str) -> Option<&Track> {
        self.iter().find(|t| t.local_id() == local_id)
    }

    pub fn get_by_file_name(&self, file_name: &str) -> Option<&Track> {
        self.iter().find(|t| t.file_name() == Some(file_name))
    }

    pub fn first(&self) -> Option<&Track> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&Track> {
        self.tracks.last().map(AsRef::as_ref)
    }

    pub fn random_track(&self) -> Option<&Track> {
        self.tracks.choose(&mut rand::rng()).map(AsRef::as_ref)
    }

    /// Removes and returns the track at `index`
    pub fn take_at(&mut self, index: usize) -> Option<Cow<'a, Track>> {
        (index < self.tracks.len()).then(|| self.tracks.remove(index))
    }

    pub fn take_first(&mut self) -> Option<Cow<'a, Track>> {
        self.take_at(0)
    }

    pub fn take_last(&mut self) -> Option<Cow<'a, Track>> {
        self.tracks.pop()
    }

    /// Removes the track with the given `localId`; returns whether one was found
    pub fn remove(&mut self, local_id: &str) -> bool {
        match self.index_of(local_id) {
            Some(index) => {
                self.tracks.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().map(AsRef::as_ref)
    }

    /// Copies borrowed tracks so the playlist no longer depends on them
    pub fn into_owned(self) -> Playlist<'static> {
        Playlist {
            tracks: self
                .tracks
                .into_iter()
                .map(|t| Cow::Owned(t.into_owned()))
                .collect(),
        }
    }

    /// `<partytracks>` document sent by `sendPlaylist`
    pub fn to_element(&self) -> Element {
        let mut root = Element::new("partytracks");
        for track in self.iter() {
            root.children
                .push(XMLNode::Element(track.to_party_track_element()));
        }
        root
    }

    /// Serializes [`Playlist::to_element`] without an XML declaration.
    ///
    /// Parsing the result back yields the same tracks, except that
    /// whitespace-only text (a name of `"   "`) comes back empty.
    pub fn to_xml(&self) -> Result<String> {
        let mut buf = Vec::new();
        let config = EmitterConfig::new()
            .write_document_declaration(false)
            .perform_indent(false);
        self.to_element().write_with_config(&mut buf, config)?;

        String::from_utf8(buf).map_err(|e| Error::parse(e.to_string()))
    }
}

/// `{track: {...}}` and `{partytrack: {...}}` wrap the actual track fields
fn unwrap_entry(entry: &ResponseValue) -> &ResponseValue {
    match entry.as_mapping() {
        Some(map) if map.len() == 1 && entry.get("localId").is_none() => {
            map.values().next().unwrap_or(entry)
        }
        _ => entry,
    }
}

impl<'a> Extend<Track> for Playlist<'a> {
    fn extend<I: IntoIterator<Item = Track>>(&mut self, iter: I) {
        for track in iter {
            self.add_track(track);
        }
    }
}

impl FromIterator<Track> for Playlist<'static> {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut playlist = Playlist::new();
        playlist.extend(iter);
        playlist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ArrayDetection, parse_xml_document};

    fn sample() -> Playlist<'static> {
        vec![
            Track::new("1", "So What").with_artist("Miles Davis").with_duration(540),
            Track::new("2", "Giant Steps").with_album("Giant Steps"),
            Track::new("3", "Naima").with_file_name("/music/naima.flac"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_duplicate_local_id_is_ignored() {
        let mut playlist = sample();
        assert!(!playlist.add_track(Track::new("2", "Other name")));
        assert_eq!(playlist.len(), 3);
        assert_eq!(playlist.get_by_id("2").unwrap().name(), "Giant Steps");
    }

    #[test]
    fn test_borrowed_tracks() {
        let external = Track::new("9", "External");
        let duplicate = Track::new("1", "Duplicate");
        let mut playlist = sample();

        assert!(playlist.add_borrowed(&external));
        assert!(!playlist.add_borrowed(&duplicate));
        assert_eq!(playlist.last().map(Track::name), Some("External"));
        assert!(matches!(playlist.take_last(), Some(Cow::Borrowed(_))));
        assert!(matches!(playlist.take_first(), Some(Cow::Owned(_))));
    }

    #[test]
    fn test_lookup() {
        let playlist = sample();
        assert!(playlist.contains("3"));
        assert!(!playlist.contains("4"));
        assert_eq!(playlist.index_of("2"), Some(1));
        assert_eq!(playlist.get_by_file_name("/music/naima.flac").map(Track::local_id), Some("3"));
        assert!(playlist.get_by_file_name("/nope").is_none());
        assert_eq!(playlist.first().map(Track::local_id), Some("1"));
        assert!(playlist.get(3).is_none());
    }

    #[test]
    fn test_random_track() {
        let playlist = sample();
        let picked = playlist.random_track().unwrap();
        assert!(playlist.contains(picked.local_id()));
        assert!(Playlist::new().random_track().is_none());
    }

    #[test]
    fn test_removal() {
        let mut playlist = sample();
        assert!(playlist.remove("2"));
        assert!(!playlist.remove("2"));
        assert_eq!(playlist.take_at(5), None);
        assert_eq!(playlist.take_at(1).map(|t| t.local_id().to_string()), Some("3".into()));
        playlist.clear();
        assert!(playlist.is_empty());
        assert!(playlist.take_first().is_none());
    }

    #[test]
    fn test_advised_size() {
        let mut playlist: Playlist = (0..MAX_ADVISED_PLAYLIST_SIZE)
            .map(|i| Track::new(i.to_string(), "t"))
            .collect();
        assert!(!playlist.exceeds_advised_size());
        playlist.add_track(Track::new("extra", "t"));
        assert!(playlist.exceeds_advised_size());
    }

    #[test]
    fn test_to_xml() {
        let playlist: Playlist = vec![
            Track::new("1", "A").with_artist("B").with_album("C").with_duration(60),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            playlist.to_xml().unwrap(),
            "<partytracks><partytrack><localId>1</localId><track><name>A</name>\
             <artistName>B</artistName><albumName>C</albumName></track>\
             <duration>60</duration></partytrack></partytracks>"
        );
    }

    #[test]
    fn test_xml_round_trip() {
        let playlist = sample();
        let xml = playlist.to_xml().unwrap();
        let parsed = parse_xml_document(xml.as_bytes(), ArrayDetection::default()).unwrap();
        let restored = Playlist::from_value(&parsed);

        assert_eq!(restored.len(), playlist.len());
        for (a, b) in playlist.iter().zip(restored.iter()) {
            assert_eq!(a.local_id(), b.local_id());
            assert_eq!(a.name(), b.name());
            assert_eq!(a.artist(), b.artist());
            assert_eq!(a.album(), b.album());
            assert_eq!(a.duration(), b.duration());
        }
    }

    #[test]
    fn test_blank_fields_come_back_empty() {
        let playlist: Playlist = std::iter::once(Track::new("1", "   ").with_artist(" ")).collect();
        let xml = playlist.to_xml().unwrap();

        let parsed = parse_xml_document(xml.as_bytes(), ArrayDetection::default()).unwrap();
        let restored = Playlist::from_value(&parsed);
        let track = restored.first().unwrap();
        assert_eq!(track.local_id(), "1");
        assert_eq!(track.name(), "");
        assert_eq!(track.artist(), None);
    }

    #[test]
    fn test_single_track_round_trip_in_both_modes() {
        let playlist: Playlist = std::iter::once(Track::new("1", "Alone")).collect();
        let xml = playlist.to_xml().unwrap();

        for detection in [ArrayDetection::SiblingRepetition, ArrayDetection::SiblingRepetitionOrPlural] {
            let parsed = parse_xml_document(xml.as_bytes(), detection).unwrap();
            let restored = Playlist::from_value(&parsed);
            assert_eq!(restored.len(), 1);
            assert_eq!(restored.first().map(Track::name), Some("Alone"));
        }
    }

    #[test]
    fn test_from_top_tracks_value() {
        let parsed = parse_xml_document(
            b"<tracks>\
               <track><id>10</id><localId>1</localId><name>a</name></track>\
               <track><id>11</id><name>no local id</name></track>\
               <track><id>12</id><localId>2</localId><name>b</name></track>\
             </tracks>",
            ArrayDetection::default(),
        )
        .unwrap();

        let playlist = Playlist::from_value(&parsed);
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.get(1).map(Track::name), Some("b"));
    }

    #[test]
    fn test_into_owned() {
        let external = Track::new("x", "External");
        let mut playlist = Playlist::new();
        playlist.add_borrowed(&external);
        let owned: Playlist<'static> = playlist.into_owned();
        assert_eq!(owned.first().map(Track::local_id), Some("x"));
    }
}
