//! Addressed view (`?movieId=...`).

/// Query parameter that addresses a single movie.
const MOVIE_ID_PARAM: &str = "movieId";

/// The addressed view. Only the movie id is recognized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// Addressed movie, if any.
    movie_id: Option<String>,
}

impl Location {
    /// The listing view (no movie addressed).
    #[must_use]
    pub const fn list() -> Self {
        Self { movie_id: None }
    }

    /// The detail view of one movie. An empty id addresses the listing.
    #[must_use]
    pub fn movie(movie_id: impl Into<String>) -> Self {
        let movie_id: String = movie_id.into();
        Self {
            movie_id: (!movie_id.is_empty()).then_some(movie_id),
        }
    }

    /// Parses a query string such as `?movieId=603`.
    ///
    /// The leading `?` is optional. Unknown parameters are ignored; the first
    /// `movieId` wins.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == MOVIE_ID_PARAM)
            .map_or_else(Self::list, |(_, value)| Self::movie(value.into_owned()))
    }

    /// Returns the addressed movie id.
    #[must_use]
    pub fn movie_id(&self) -> Option<&str> {
        self.movie_id.as_deref()
    }

    /// Formats the location back into a query string (empty for the listing).
    #[must_use]
    pub fn to_query(&self) -> String {
        self.movie_id.as_ref().map_or_else(String::new, |id| {
            let encoded: String = url::form_urlencoded::Serializer::new(String::new())
                .append_pair(MOVIE_ID_PARAM, id)
                .finish();
            format!("?{encoded}")
        })
    }
}
