//! Featured-playlist chart scrapers
//!
//! Four independent regional charts scraped from public sites. Each scrape
//! is cached for a day under its fixed region key. Parsing is site-specific
//! and brittle on purpose; selectors live next to the fetch that uses them.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use reqwest::Client;
use scraper::{Html, Selector};
use serde_json::Value;

use super::cache::TtlCache;

const ONE_DAY: Duration = Duration::from_secs(86_400);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/78.0.3904.108 Safari/537.36";

pub const TOP_BRASIL: &str = "topbrasil";
pub const TOP_PORTUGUESE: &str = "topportuguese";
pub const TOP_SPANISH: &str = "topspanish";
pub const TOP_FRENCH: &str = "topfrench";

#[derive(Debug, Clone)]
pub struct FeaturedTrack {
    pub song_name: String,
    pub artist_name: String,
}

#[derive(Debug, Clone)]
pub struct FeaturedPlaylist {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub songs: Vec<FeaturedTrack>,
}

pub struct FeaturedCharts {
    http: Client,
    cache: Arc<TtlCache<FeaturedPlaylist>>,
}

impl FeaturedCharts {
    pub fn new(cache: Arc<TtlCache<FeaturedPlaylist>>) -> Self {
        Self {
            http: Client::new(),
            cache,
        }
    }

    /// One chart by region key; unknown keys fall back to the Portuguese
    /// chart.
    pub async fn by_id(&self, id: &str) -> Result<FeaturedPlaylist> {
        match id {
            TOP_BRASIL => self.brasil().await,
            TOP_SPANISH => self.spanish().await,
            TOP_FRENCH => self.french().await,
            _ => self.portuguese().await,
        }
    }

    /// All four regional charts, fetched concurrently. One failed scrape
    /// fails the whole batch.
    pub async fn all(&self) -> Result<Vec<FeaturedPlaylist>> {
        let (brasil, french, portuguese, spanish) = futures::try_join!(
            self.brasil(),
            self.french(),
            self.portuguese(),
            self.spanish()
        )?;

        Ok(vec![brasil, french, portuguese, spanish])
    }

    async fn brasil(&self) -> Result<FeaturedPlaylist> {
        if let Some(hit) = self.cache.get(TOP_BRASIL) {
            return Ok(hit);
        }

        let body = self
            .fetch("https://maistocadas.mus.br/musicas-mais-tocadas/")
            .await?
            .text()
            .await?;
        let playlist = parse_brasil(&body);

        self.cache.set(TOP_BRASIL, playlist.clone(), Some(ONE_DAY));
        Ok(playlist)
    }

    async fn portuguese(&self) -> Result<FeaturedPlaylist> {
        if let Some(hit) = self.cache.get(TOP_PORTUGUESE) {
            return Ok(hit);
        }

        // The page declares no charset and is ISO-8859-1.
        let body = self
            .fetch("https://radiocomercial.iol.pt/programas/tnt-todos-no-top")
            .await?
            .text_with_charset("iso-8859-1")
            .await?;
        let playlist = parse_portuguese(&body);

        self.cache
            .set(TOP_PORTUGUESE, playlist.clone(), Some(ONE_DAY));
        Ok(playlist)
    }

    async fn spanish(&self) -> Result<FeaturedPlaylist> {
        if let Some(hit) = self.cache.get(TOP_SPANISH) {
            return Ok(hit);
        }

        let body = self
            .fetch("https://www.hitfm.es/hit-30/")
            .await?
            .text()
            .await?;
        let playlist = parse_spanish(&body);

        self.cache.set(TOP_SPANISH, playlist.clone(), Some(ONE_DAY));
        Ok(playlist)
    }

    async fn french(&self) -> Result<FeaturedPlaylist> {
        if let Some(hit) = self.cache.get(TOP_FRENCH) {
            return Ok(hit);
        }

        let body = self
            .fetch("https://www.nrj.fr/playlists/vos-hits-nrj")
            .await?
            .text()
            .await?;
        let playlist = parse_french(&body)?;

        self.cache.set(TOP_FRENCH, playlist.clone(), Some(ONE_DAY));
        Ok(playlist)
    }

    async fn fetch(&self, url: &str) -> Result<reqwest::Response> {
        Ok(self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?)
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

fn element_text(element: scraper::ElementRef<'_>) -> String {
    element.text().collect::<String>().replace('\n', "").trim().to_string()
}

fn parse_brasil(body: &str) -> FeaturedPlaylist {
    let document = Html::parse_document(body);
    let songs_selector = selector(".musicas");
    let artists_selector = selector(".artista");
    let songs = document.select(&songs_selector).map(element_text);
    let artists = document.select(&artists_selector).map(element_text);

    FeaturedPlaylist {
        id: TOP_BRASIL.to_string(),
        name: "Top Brasil".to_string(),
        avatar: "https://upload.wikimedia.org/wikipedia/commons/thumb/0/05/Flag_of_Brazil.svg/275px-Flag_of_Brazil.svg.png".to_string(),
        songs: songs
            .zip(artists)
            .map(|(song_name, artist_name)| FeaturedTrack {
                song_name,
                artist_name,
            })
            .collect(),
    }
}

fn parse_portuguese(body: &str) -> FeaturedPlaylist {
    let document = Html::parse_document(body);
    let title = selector(".songTitle");
    let artist = selector(".songArtist");

    let songs = document
        .select(&selector(".inside"))
        .filter_map(|card| {
            let song_name = card.select(&title).next().map(element_text)?;
            let artist_name = card.select(&artist).next().map(element_text)?;
            Some(FeaturedTrack {
                song_name,
                artist_name,
            })
        })
        .collect();

    FeaturedPlaylist {
        id: TOP_PORTUGUESE.to_string(),
        name: "Top Portuguese".to_string(),
        avatar: "https://upload.wikimedia.org/wikipedia/commons/thumb/5/5c/Flag_of_Portugal.svg/260px-Flag_of_Portugal.svg.png".to_string(),
        songs,
    }
}

fn parse_spanish(body: &str) -> FeaturedPlaylist {
    let document = Html::parse_document(body);
    let title = selector(".entry-title");
    let content = selector(".entry-content h3");

    let songs = document
        .select(&selector(".cancion"))
        .filter_map(|card| {
            let song_name = card.select(&title).next().map(element_text)?;
            let artist_name = card.select(&content).next().map(element_text)?;
            Some(FeaturedTrack {
                song_name,
                artist_name,
            })
        })
        .collect();

    FeaturedPlaylist {
        id: TOP_SPANISH.to_string(),
        name: "Top Spanish".to_string(),
        avatar: "https://upload.wikimedia.org/wikipedia/commons/thumb/8/89/Bandera_de_Espa%C3%B1a.svg/200px-Bandera_de_Espa%C3%B1a.svg.png".to_string(),
        songs,
    }
}

fn parse_french(body: &str) -> Result<FeaturedPlaylist> {
    let document = Html::parse_document(body);
    let meta = document
        .select(&selector(r#"script[type="application/ld+json"]"#))
        .next()
        .ok_or_else(|| anyhow!("french chart metadata missing"))?;

    let payload: Value = serde_json::from_str(&meta.text().collect::<String>())?;
    let tracks = payload
        .pointer("/1/track")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("french chart track list missing"))?;

    let songs = tracks
        .iter()
        .filter_map(|track| {
            Some(FeaturedTrack {
                song_name: track.get("name")?.as_str()?.to_string(),
                artist_name: artist_name(track.get("byArtist")?)?,
            })
        })
        .collect();

    Ok(FeaturedPlaylist {
        id: TOP_FRENCH.to_string(),
        name: "Top French".to_string(),
        avatar: "https://upload.wikimedia.org/wikipedia/en/thumb/c/c3/Flag_of_France.svg/250px-Flag_of_France.svg.png".to_string(),
        songs,
    })
}

// `byArtist` is either a plain string or a nested schema.org Person.
fn artist_name(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => Some(name.clone()),
        Value::Object(_) => value.get("name")?.as_str().map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brasil_pairs_songs_with_artists() {
        let body = r#"
            <div><span class="musicas">Song One</span><span class="artista">Artist One</span></div>
            <div><span class="musicas">
            Song Two</span><span class="artista">Artist Two</span></div>
        "#;
        let playlist = parse_brasil(body);

        assert_eq!(playlist.id, TOP_BRASIL);
        assert_eq!(playlist.songs.len(), 2);
        assert_eq!(playlist.songs[0].song_name, "Song One");
        assert_eq!(playlist.songs[1].song_name, "Song Two");
        assert_eq!(playlist.songs[1].artist_name, "Artist Two");
    }

    #[test]
    fn portuguese_reads_cards() {
        let body = r#"
            <div class="inside">
                <div class="songTitle">Cancao</div>
                <div class="songArtist">Alguem</div>
            </div>
            <div class="inside"><div class="songTitle">Sem Artista</div></div>
        "#;
        let playlist = parse_portuguese(body);

        assert_eq!(playlist.songs.len(), 1);
        assert_eq!(playlist.songs[0].song_name, "Cancao");
        assert_eq!(playlist.songs[0].artist_name, "Alguem");
    }

    #[test]
    fn spanish_reads_cards() {
        let body = r#"
            <article class="cancion">
                <h2 class="entry-title">La Cancion</h2>
                <div class="entry-content"><h3>El Artista</h3></div>
            </article>
        "#;
        let playlist = parse_spanish(body);

        assert_eq!(playlist.songs.len(), 1);
        assert_eq!(playlist.songs[0].artist_name, "El Artista");
    }

    #[test]
    fn french_reads_ld_json() {
        let body = r#"
            <script type="application/ld+json">
            [{"@type":"RadioStation"},
             {"track":[{"name":"Chanson","byArtist":"Artiste"},
                       {"name":"Deux","byArtist":{"name":"Groupe"}}]}]
            </script>
        "#;
        let playlist = parse_french(body).unwrap();

        assert_eq!(playlist.songs.len(), 2);
        assert_eq!(playlist.songs[0].artist_name, "Artiste");
        assert_eq!(playlist.songs[1].artist_name, "Groupe");
    }

    #[test]
    fn french_without_metadata_errors() {
        assert!(parse_french("<html></html>").is_err());
    }
}
