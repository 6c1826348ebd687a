//! Track records exchanged with the Smoozik service

use crate::error::{Error, Result};
use crate::value::ResponseValue;
use serde::{Deserialize, Serialize};
use xmltree::{Element, XMLNode};

/// A track known to the client.
///
/// `local_id` is chosen by the client and identifies the track on both
/// sides; it is unique within a [`crate::Playlist`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    local_id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    album: Option<String>,
    /// Seconds, 0 when unknown
    #[serde(default)]
    duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn text_of(value: &ResponseValue, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .filter_map(ResponseValue::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn text_element(name: &str, text: &str) -> Element {
    let mut element = Element::new(name);
    if !text.is_empty() {
        element.children.push(XMLNode::Text(text.to_string()));
    }
    element
}

impl Track {
    pub fn new(local_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            local_id: local_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.set_artist(Some(artist.into()));
        self
    }

    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.set_album(Some(album.into()));
        self
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.set_file_name(Some(file_name.into()));
        self
    }

    /// Builds a track from a parsed reply entry.
    ///
    /// Two shapes are accepted: the flat one returned by `getTopTracks`
    /// (`localId`, `name`, `artist`, `album`, `duration`) and the nested
    /// `partytrack` one (`localId`, `track { name, artistName, albumName }`,
    /// `duration`). Missing optional fields default to empty or 0.
    pub fn from_value(value: &ResponseValue) -> Result<Self> {
        if !value.is_mapping() {
            return Err(Error::parse("track entry is not a mapping"));
        }

        let local_id =
            text_of(value, &["localId"]).ok_or_else(|| Error::parse("localId element missing"))?;

        let details = match value.get("track") {
            Some(inner) if inner.is_mapping() => inner,
            _ => value,
        };

        Ok(Self {
            local_id,
            name: text_of(details, &["name"]).unwrap_or_default(),
            artist: text_of(details, &["artist", "artistName"]),
            album: text_of(details, &["album", "albumName"]),
            duration: value
                .get("duration")
                .or_else(|| details.get("duration"))
                .and_then(|d| d.parse_as())
                .unwrap_or(0),
            file_name: text_of(value, &["fileName"]),
        })
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn set_local_id(&mut self, local_id: impl Into<String>) {
        self.local_id = local_id.into();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_artist(&mut self, artist: Option<String>) {
        self.artist = non_empty(artist);
    }

    pub fn set_album(&mut self, album: Option<String>) {
        self.album = non_empty(album);
    }

    pub fn set_duration(&mut self, duration: u32) {
        self.duration = duration;
    }

    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = non_empty(file_name);
    }

    /// `<partytrack>` element used by `sendPlaylist`
    pub fn to_party_track_element(&self) -> Element {
        let mut details = Element::new("track");
        details
            .children
            .push(XMLNode::Element(text_element("name", &self.name)));
        if let Some(artist) = self.artist() {
            details
                .children
                .push(XMLNode::Element(text_element("artistName", artist)));
        }
        if let Some(album) = self.album() {
            details
                .children
                .push(XMLNode::Element(text_element("albumName", album)));
        }

        let mut party_track = Element::new("partytrack");
        party_track
            .children
            .push(XMLNode::Element(text_element("localId", &self.local_id)));
        party_track.children.push(XMLNode::Element(details));
        if self.duration > 0 {
            party_track.children.push(XMLNode::Element(text_element(
                "duration",
                &self.duration.to_string(),
            )));
        }
        party_track
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ArrayDetection, parse_xml_document};

    fn parse(xml: &str) -> ResponseValue {
        parse_xml_document(xml.as_bytes(), ArrayDetection::default()).unwrap()
    }

    #[test]
    fn test_builder_and_getters() {
        let track = Track::new("1", "Song")
            .with_artist("Artist")
            .with_album("")
            .with_duration(240)
            .with_file_name("/music/song.mp3");

        assert_eq!(track.local_id(), "1");
        assert_eq!(track.name(), "Song");
        assert_eq!(track.artist(), Some("Artist"));
        assert_eq!(track.album(), None);
        assert_eq!(track.duration(), 240);
        assert_eq!(track.file_name(), Some("/music/song.mp3"));
    }

    #[test]
    fn test_from_flat_value() {
        let value = parse(
            "<track><id>10</id><localId>7</localId><name>So What</name>\
             <artist>Miles Davis</artist><album>Kind of Blue</album>\
             <duration>540</duration></track>",
        );
        let track = Track::from_value(&value).unwrap();

        assert_eq!(track.local_id(), "7");
        assert_eq!(track.name(), "So What");
        assert_eq!(track.artist(), Some("Miles Davis"));
        assert_eq!(track.album(), Some("Kind of Blue"));
        assert_eq!(track.duration(), 540);
    }

    #[test]
    fn test_from_party_track_value() {
        let value = parse(
            "<partytrack><localId>3</localId><track><name>Giant Steps</name>\
             <artistName>John Coltrane</artistName></track><duration>290</duration></partytrack>",
        );
        let track = Track::from_value(&value).unwrap();

        assert_eq!(track.local_id(), "3");
        assert_eq!(track.name(), "Giant Steps");
        assert_eq!(track.artist(), Some("John Coltrane"));
        assert_eq!(track.album(), None);
        assert_eq!(track.duration(), 290);
    }

    #[test]
    fn test_from_value_requires_local_id() {
        let value = parse("<track><name>x</name></track>");
        assert!(Track::from_value(&value).unwrap_err().is_parse_error());
        assert!(Track::from_value(&ResponseValue::scalar("x")).is_err());
    }

    #[test]
    fn test_bad_duration_defaults_to_zero() {
        let value = parse("<track><localId>1</localId><duration>n/a</duration></track>");
        assert_eq!(Track::from_value(&value).unwrap().duration(), 0);
    }

    #[test]
    fn test_party_track_element() {
        let track = Track::new("1", "A & B").with_album("Album").with_duration(0);
        let element = track.to_party_track_element();

        assert_eq!(element.name, "partytrack");
        assert_eq!(
            element.get_child("localId").and_then(|e| e.get_text()).as_deref(),
            Some("1")
        );
        let details = element.get_child("track").unwrap();
        assert_eq!(
            details.get_child("name").and_then(|e| e.get_text()).as_deref(),
            Some("A & B")
        );
        assert!(details.get_child("artistName").is_none());
        assert!(details.get_child("albumName").is_some());
        assert!(element.get_child("duration").is_none());
    }

    #[test]
    fn test_serde_field_names() {
        let track = Track::new("1", "x").with_duration(3);
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["localId"], "1");
        assert_eq!(json["duration"], 3);
        assert!(json.get("artist").is_none());
    }
}
