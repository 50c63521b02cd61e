//! Catalog records, list categories and TMDB response envelopes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Base URL for poster images (w500 size).
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500/";

/// Base URL for public movie pages on the TMDB website.
pub const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie/";

/// Decodes `null` or a missing string as an empty string.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// --- Categories ---

/// Movie list category accepted by the `movie/{category}` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// `popular`
    #[default]
    Popular,
    /// `top_rated`
    TopRated,
    /// `now_playing`
    NowPlaying,
    /// `upcoming`
    Upcoming,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Self; 4] = [
        Self::Popular,
        Self::TopRated,
        Self::NowPlaying,
        Self::Upcoming,
    ];

    /// Provider identifier used in the endpoint path.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
            Self::NowPlaying => "now_playing",
            Self::Upcoming => "upcoming",
        }
    }

    /// Human-readable menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popular => "Popular",
            Self::TopRated => "Top Rated",
            Self::NowPlaying => "Now Playing",
            Self::Upcoming => "Upcoming",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}` (expected one of: popular, top_rated, now_playing, upcoming)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(String::from(s)))
    }
}

// --- Records ---

/// A movie as it appears in listings and search results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieSummary {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    /// Poster image path (e.g. `/abc.jpg`), empty when the movie has none.
    #[serde(default, deserialize_with = "nullable_string")]
    pub poster_path: String,
    /// Overview text.
    #[serde(default, deserialize_with = "nullable_string")]
    pub overview: String,
    /// Release date (YYYY-MM-DD), empty when unknown.
    #[serde(default, deserialize_with = "nullable_string")]
    pub release_date: String,
}

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Full record returned by the `movie/{movie_id}` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MovieDetails {
    /// Summary fields shared with listings.
    #[serde(flatten)]
    pub summary: MovieSummary,
    /// Runtime in minutes (0 when unknown).
    #[serde(default, deserialize_with = "nullable_runtime")]
    pub runtime: u32,
    /// Genres in provider order.
    #[serde(default)]
    pub genres: Vec<Genre>,
}

fn nullable_runtime<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}

/// Builds the poster image URL for a poster path.
///
/// Returns `None` when the movie has no poster.
#[must_use]
pub fn poster_url(poster_path: &str) -> Option<String> {
    let path = poster_path.trim_start_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(format!("{POSTER_BASE_URL}{path}"))
}

/// Builds the public TMDB page URL for a movie.
#[must_use]
pub fn movie_page_url(movie_id: u64) -> String {
    format!("{MOVIE_PAGE_BASE_URL}{movie_id}")
}

// --- Envelopes ---

/// Paginated envelope shared by the list and search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieListResponse {
    /// Current page number.
    pub page: u32,
    /// Movies on this page.
    pub results: Vec<MovieSummary>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results.
    pub total_results: u32,
}

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    #[allow(dead_code)]
    pub success: bool,
}
