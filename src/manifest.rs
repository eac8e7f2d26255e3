// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::media::{Media, base_name};

/// File name of the manifest inside a package
pub const MANIFEST_FILENAME: &str = "manifest.xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Describes the contents of a podcast package
///
/// Field order drives the serialized form: `description` before `id` on the
/// root element, and the `mp3` entry before the `wav` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "podcast")]
pub struct Manifest {
    #[serde(rename = "@description")]
    pub description: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mp3: Option<ManifestEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wav: Option<ManifestEntry>,
}

/// Base names of the recordings for a single format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(rename = "@intro")]
    pub intro: String,
    #[serde(rename = "@interview")]
    pub interview: String,
}

impl ManifestEntry {
    pub fn from_media(media: &Media) -> Self {
        Self {
            intro: base_name(media.intro()),
            interview: base_name(media.interview()),
        }
    }
}

impl Manifest {
    /// Build a manifest from podcast metadata and the populated media slots
    pub fn build(
        description: impl Into<String>,
        id: impl Into<String>,
        mp3: Option<&Media>,
        wav: Option<&Media>,
    ) -> Self {
        Self {
            description: description.into(),
            id: id.into(),
            mp3: mp3.map(ManifestEntry::from_media),
            wav: wav.map(ManifestEntry::from_media),
        }
    }

    /// Serialize to an indented XML document
    pub fn to_xml(&self) -> Result<String, ManifestError> {
        let mut body = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut body);
        serializer.indent(' ', 2);
        self.serialize(serializer)?;

        Ok(format!("{XML_DECLARATION}\n{body}\n"))
    }

    /// Parse a manifest previously produced by [`Manifest::to_xml`]
    pub fn from_xml(xml: &str) -> Result<Self, ManifestError> {
        Ok(quick_xml::de::from_str(xml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaFormat;

    fn mp3_media() -> Media {
        Media::new(MediaFormat::Mp3, "/rec/intro.mp3", "/rec/interview.mp3")
    }

    fn wav_media() -> Media {
        Media::new(MediaFormat::Wav, "/rec/intro.wav", "/rec/interview.wav")
    }

    #[test]
    fn build_uses_base_names() {
        let media = mp3_media();
        let manifest = Manifest::build("Episode 1", "abc", Some(&media), None);

        let entry = manifest.mp3.as_ref().unwrap();
        assert_eq!(entry.intro, "intro.mp3");
        assert_eq!(entry.interview, "interview.mp3");
        assert!(manifest.wav.is_none());
    }

    #[test]
    fn xml_has_expected_layout() {
        let media = mp3_media();
        let xml = Manifest::build("Episode 1", "abc", Some(&media), None)
            .to_xml()
            .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<podcast description=\"Episode 1\" id=\"abc\">"));
        assert!(xml.contains("\n  <mp3 intro=\"intro.mp3\" interview=\"interview.mp3\"/>"));
        assert!(xml.trim_end().ends_with("</podcast>"));
    }

    #[test]
    fn xml_orders_mp3_before_wav() {
        let mp3 = mp3_media();
        let wav = wav_media();
        let xml = Manifest::build("Both", "id-1", Some(&mp3), Some(&wav))
            .to_xml()
            .unwrap();

        let mp3_pos = xml.find("<mp3 ").unwrap();
        let wav_pos = xml.find("<wav ").unwrap();
        assert!(mp3_pos < wav_pos);

        let description_pos = xml.find("description=").unwrap();
        let id_pos = xml.find(" id=").unwrap();
        assert!(description_pos < id_pos);
    }

    #[test]
    fn xml_is_deterministic() {
        let wav = wav_media();
        let manifest = Manifest::build("Same", "same-id", None, Some(&wav));
        assert_eq!(manifest.to_xml().unwrap(), manifest.to_xml().unwrap());
    }

    #[test]
    fn roundtrip_recovers_all_fields() {
        let mp3 = mp3_media();
        let wav = wav_media();
        let manifest = Manifest::build(
            "Episode <1> & \"friends\"",
            "uuid-42",
            Some(&mp3),
            Some(&wav),
        );

        let parsed = Manifest::from_xml(&manifest.to_xml().unwrap()).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn roundtrip_without_media() {
        let manifest = Manifest::build("Empty", "uuid-0", None, None);
        let xml = manifest.to_xml().unwrap();

        let parsed = Manifest::from_xml(&xml).unwrap();
        assert_eq!(parsed.description, "Empty");
        assert_eq!(parsed.id, "uuid-0");
        assert!(parsed.mp3.is_none());
        assert!(parsed.wav.is_none());
    }

    #[test]
    fn parse_rejects_missing_description() {
        // description is required
        assert!(Manifest::from_xml(r#"<podcast id="x"/>"#).is_err());
    }
}
