//! iTunes Search API response models.

use serde::Deserialize;

/// Top-level response for the search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<Track>,
}

/// One playable catalog entry. Fields come verbatim from the API and are
/// never mutated after the fetch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub track_id: Option<i64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    /// 60x60 thumbnail, used in the playlist sidebar context.
    pub artwork_url60: Option<String>,
    /// 100x100 artwork, used in the main panel.
    pub artwork_url100: Option<String>,
    /// Short preview clip (typically ~30s of AAC). Absent for some tracks;
    /// those simply do not play.
    pub preview_url: Option<String>,
    pub track_time_millis: Option<u64>,
    pub primary_genre_name: Option<String>,
    pub country: Option<String>,
    pub release_date: Option<String>,
}

impl Track {
    /// Display title, falling back to "Unknown Track".
    pub fn display_title(&self) -> &str {
        self.track_name.as_deref().unwrap_or("Unknown Track")
    }

    /// Display artist, falling back to "Unknown Artist".
    pub fn display_artist(&self) -> &str {
        self.artist_name.as_deref().unwrap_or("Unknown Artist")
    }

    /// Preview duration in whole seconds, if the API reported one.
    pub fn duration_secs(&self) -> Option<u32> {
        self.track_time_millis.map(|ms| (ms / 1000) as u32)
    }

    /// Display-friendly duration (e.g. "3:45").
    pub fn duration_string(&self) -> String {
        match self.duration_secs() {
            Some(secs) => {
                let mins = secs / 60;
                let secs = secs % 60;
                format!("{mins}:{secs:02}")
            }
            None => String::from("--:--"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_response() {
        let body = r#"{
            "resultCount": 2,
            "results": [
                {
                    "trackId": 1440857781,
                    "trackName": "Lose Yourself",
                    "artistName": "Eminem",
                    "collectionName": "Curtain Call",
                    "artworkUrl60": "https://example.com/60.jpg",
                    "artworkUrl100": "https://example.com/100.jpg",
                    "previewUrl": "https://example.com/preview.m4a",
                    "trackTimeMillis": 326466,
                    "primaryGenreName": "Hip-Hop/Rap"
                },
                {
                    "artistName": "Unknown",
                    "trackName": "No Preview Here"
                }
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result_count, 2);
        assert_eq!(parsed.results.len(), 2);

        let first = &parsed.results[0];
        assert_eq!(first.display_title(), "Lose Yourself");
        assert_eq!(first.display_artist(), "Eminem");
        assert_eq!(first.duration_secs(), Some(326));
        assert_eq!(first.duration_string(), "5:26");
        assert!(first.preview_url.is_some());

        let second = &parsed.results[1];
        assert!(second.preview_url.is_none());
        assert_eq!(second.duration_string(), "--:--");
    }

    #[test]
    fn parses_empty_result_set() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"resultCount": 0, "results": []}"#).unwrap();
        assert_eq!(parsed.result_count, 0);
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn display_fallbacks() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"resultCount": 1, "results": [{}]}"#).unwrap();
        let track = &parsed.results[0];
        assert_eq!(track.display_title(), "Unknown Track");
        assert_eq!(track.display_artist(), "Unknown Artist");
        assert_eq!(track.duration_secs(), None);
    }
}
