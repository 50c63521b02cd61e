//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::FetchError;
use super::types::{Category, MovieDetails, MovieSummary};

/// Movie catalog operations.
///
/// Listing operations favour availability: any failure is logged and
/// turned into an empty page. Details have no sensible empty form, so a
/// failure is returned to the caller.
///
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Lists one page of a movie category. Empty on failure.
    async fn list_by_category(&self, category: Category, page: u32) -> Vec<MovieSummary>;

    /// Lists one page of popular movies. Empty on failure.
    async fn list_popular(&self, page: u32) -> Vec<MovieSummary>;

    /// Searches movies by title. Empty on failure.
    ///
    /// The query is sent URL-encoded as-is; an empty query is not rejected.
    async fn search(&self, query: &str, page: u32) -> Vec<MovieSummary>;

    /// Fetches the full record of one movie.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the request, the HTTP status or the JSON
    /// decoding fails, including when the provider does not know the id.
    async fn details(&self, movie_id: &str) -> Result<MovieDetails, FetchError>;
}
