//! YouTube integration
//!
//! Resolves a video id into a playable audio URL via the public player
//! endpoint, and scrapes the search results page (the embedded
//! `ytInitialData` blob) for organic and playlist search. Both paths are
//! memoized: stream URLs expire with the `expire` parameter YouTube embeds
//! in them, search results stay until trimmed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::Utc;
use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

use super::cache::TtlCache;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";
const PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player";
const SEARCH_ENDPOINT: &str = "https://www.youtube.com/results";

/// One search hit: a playable video.
#[derive(Debug, Clone)]
pub struct SearchedSong {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// A named group of search hits (the queried artist or term).
#[derive(Debug, Clone)]
pub struct ArtistSearchResult {
    pub name: String,
    pub avatar: Option<String>,
    pub songs: Vec<SearchedSong>,
}

pub struct YoutubeClient {
    http: Client,
    stream_cache: Arc<TtlCache<String>>,
    search_cache: Arc<TtlCache<Vec<ArtistSearchResult>>>,
}

impl YoutubeClient {
    pub fn new(
        stream_cache: Arc<TtlCache<String>>,
        search_cache: Arc<TtlCache<Vec<ArtistSearchResult>>>,
    ) -> Self {
        Self {
            http: Client::new(),
            stream_cache,
            search_cache,
        }
    }

    /// Resolve a video id to an audio-only stream URL.
    pub async fn audio_url(&self, video_id: &str) -> Result<String> {
        if let Some(hit) = self.stream_cache.get(video_id) {
            return Ok(hit);
        }

        let payload = json!({
            "videoId": video_id,
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "19.09.37",
                    "androidSdkVersion": 30
                }
            }
        });

        let body: Value = self
            .http
            .post(PLAYER_ENDPOINT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let url = first_audio_url(&body)
            .ok_or_else(|| anyhow!("no audio format for video {video_id}"))?
            .to_string();

        if let Some(ttl) = stream_ttl(&url) {
            self.stream_cache.set(video_id, url.clone(), Some(ttl));
        }

        Ok(url)
    }

    /// Plain search: every video on the first results page.
    pub async fn video_search(&self, query: &str) -> Result<Vec<ArtistSearchResult>> {
        let key = format!("search:{query}");
        if let Some(hit) = self.search_cache.get(&key) {
            return Ok(hit);
        }

        let payload = self.search_page(query).await?;
        let songs = parse_video_results(&payload);
        let results = vec![ArtistSearchResult {
            name: query.to_string(),
            avatar: None,
            songs,
        }];

        self.search_cache.set(&key, results.clone(), None);
        Ok(results)
    }

    /// Artist watch-card search: the curated playlist YouTube shows beside
    /// results for a known artist. Empty when no card is present.
    pub async fn playlist_search(&self, query: &str) -> Result<Vec<ArtistSearchResult>> {
        let key = format!("playlist:{query}");
        if let Some(hit) = self.search_cache.get(&key) {
            return Ok(hit);
        }

        let payload = self.search_page(query).await?;
        let results = parse_watch_card(&payload).map_or_else(Vec::new, |artist| vec![artist]);

        self.search_cache.set(&key, results.clone(), None);
        Ok(results)
    }

    /// Fetch the results page and slice out the `ytInitialData` JSON.
    async fn search_page(&self, query: &str) -> Result<Value> {
        let body = self
            .http
            .get(SEARCH_ENDPOINT)
            .query(&[("search_query", query)])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_initial_data(&body)
    }
}

fn extract_initial_data(body: &str) -> Result<Value> {
    let (_, tail) = body
        .split_once("ytInitialData")
        .ok_or_else(|| anyhow!("search payload missing ytInitialData"))?;
    // tail begins with ` = {...};</script>`
    let (raw, _) = tail
        .get(2..)
        .and_then(|t| t.split_once("</script>"))
        .ok_or_else(|| anyhow!("search payload not terminated"))?;
    let raw = raw.trim_end().trim_end_matches(';');

    Ok(serde_json::from_str(raw)?)
}

fn parse_video_results(payload: &Value) -> Vec<SearchedSong> {
    let Some(items) = payload
        .pointer("/contents/twoColumnSearchResultsRenderer/primaryContents/sectionListRenderer/contents/0/itemSectionRenderer/contents")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let video = item.get("videoRenderer")?;
            Some(SearchedSong {
                id: video.pointer("/videoId")?.as_str()?.to_string(),
                name: video.pointer("/title/runs/0/text")?.as_str()?.to_string(),
                avatar: video
                    .pointer("/thumbnail/thumbnails/0/url")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            })
        })
        .collect()
}

fn parse_watch_card(payload: &Value) -> Option<ArtistSearchResult> {
    let card = payload.pointer(
        "/contents/twoColumnSearchResultsRenderer/secondaryContents/secondarySearchContainerRenderer/contents/0/universalWatchCardRenderer",
    )?;

    let name = card
        .pointer("/header/watchCardRichHeaderRenderer/title/simpleText")?
        .as_str()?
        .to_string();
    let avatar = card
        .pointer("/header/watchCardRichHeaderRenderer/avatar/thumbnails/0/url")
        .and_then(Value::as_str)
        .map(str::to_string);

    let items = card
        .pointer("/sections/0/watchCardSectionSequenceRenderer/lists/0/verticalWatchCardListRenderer/items")?
        .as_array()?;

    let songs = items
        .iter()
        .filter_map(|item| {
            let video = item.get("watchCardCompactVideoRenderer")?;
            Some(SearchedSong {
                id: video
                    .pointer("/navigationEndpoint/watchEndpoint/videoId")?
                    .as_str()?
                    .to_string(),
                name: video.pointer("/title/simpleText")?.as_str()?.to_string(),
                avatar: None,
            })
        })
        .collect();

    Some(ArtistSearchResult {
        name,
        avatar,
        songs,
    })
}

fn first_audio_url(body: &Value) -> Option<&str> {
    body.pointer("/streamingData/adaptiveFormats")
        .and_then(Value::as_array)?
        .iter()
        .filter(|format| {
            format
                .pointer("/mimeType")
                .and_then(Value::as_str)
                .is_some_and(|mime| mime.starts_with("audio/"))
        })
        .find_map(|format| format.pointer("/url").and_then(Value::as_str))
}

/// TTL derived from the `expire` parameter embedded in a stream URL.
fn stream_ttl(raw: &str) -> Option<Duration> {
    let url = Url::parse(raw).ok()?;
    let expire: i64 = url
        .query_pairs()
        .find(|(key, _)| key == "expire")?
        .1
        .parse()
        .ok()?;
    let secs = expire - Utc::now().timestamp();
    (secs > 0).then(|| Duration::from_secs(secs as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_initial_data_blob() {
        let body = r#"<html><script>var ytInitialData = {"contents":{"x":1}};</script></html>"#;
        let payload = extract_initial_data(body).unwrap();
        assert_eq!(payload.pointer("/contents/x"), Some(&json!(1)));
    }

    #[test]
    fn picks_first_audio_only_format() {
        let body = json!({
            "streamingData": {
                "adaptiveFormats": [
                    {"mimeType": "video/mp4", "url": "https://v.example/video"},
                    {"mimeType": "audio/webm; codecs=\"opus\"", "url": "https://v.example/audio"},
                    {"mimeType": "audio/mp4", "url": "https://v.example/audio2"}
                ]
            }
        });
        assert_eq!(first_audio_url(&body), Some("https://v.example/audio"));
    }

    #[test]
    fn stream_ttl_reads_expire_param() {
        let expire = Utc::now().timestamp() + 600;
        let url = format!("https://r4.example.com/audio?expire={expire}&mime=audio%2Fwebm");
        let ttl = stream_ttl(&url).unwrap();
        assert!(ttl >= Duration::from_secs(590) && ttl <= Duration::from_secs(600));
    }

    #[test]
    fn stream_ttl_absent_or_past() {
        assert_eq!(stream_ttl("https://r4.example.com/audio?mime=audio%2Fwebm"), None);
        let past = Utc::now().timestamp() - 10;
        assert_eq!(
            stream_ttl(&format!("https://r4.example.com/audio?expire={past}")),
            None
        );
    }

    #[test]
    fn parses_video_results() {
        let payload = json!({
            "contents": {"twoColumnSearchResultsRenderer": {"primaryContents": {"sectionListRenderer": {"contents": [
                {"itemSectionRenderer": {"contents": [
                    {"videoRenderer": {
                        "videoId": "abc123",
                        "title": {"runs": [{"text": "A Song"}]},
                        "thumbnail": {"thumbnails": [{"url": "https://i.example/t.jpg"}]}
                    }},
                    {"shelfRenderer": {}}
                ]}}
            ]}}}}
        });

        let songs = parse_video_results(&payload);
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, "abc123");
        assert_eq!(songs[0].name, "A Song");
        assert_eq!(songs[0].avatar.as_deref(), Some("https://i.example/t.jpg"));
    }

    #[test]
    fn watch_card_absent_yields_none() {
        assert!(parse_watch_card(&json!({"contents": {}})).is_none());
    }
}
