//! ID3v1 specific items
//!
//! # ID3v1 notes
//!
//! ## Genres
//!
//! ID3v1 stores the genre in a single byte ranging from 0 to 79 (see [`GENRES`]).
//!
//! ## Text length
//!
//! Each field has a maximum length of 30 bytes (comments are limited to 28),
//! any text longer than that will be truncated when written.

pub(crate) mod constants;
mod read;
pub(crate) mod tag;
pub(crate) mod write;

// Exports

pub use constants::GENRES;
pub use tag::Id3v1Tag;
