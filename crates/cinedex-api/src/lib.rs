//! Catalog client library for cinedex.
//!
//! Wraps the TMDB v3 movie endpoints used by the browser: category
//! listings, search and single-movie details.

/// TMDB movie catalog client.
pub mod catalog;
