//! TMDB movie catalog client.
//!
//! Handles HTTP requests to the TMDB v3 movie endpoints and normalizes
//! the results into [`MovieSummary`] pages and [`MovieDetails`] records.

mod api;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder, Credential};
pub use error::FetchError;
pub use reqwest::StatusCode;
pub use types::{
    Category, Genre, MovieDetails, MovieListResponse, MovieSummary, UnknownCategory,
    movie_page_url, poster_url,
};
