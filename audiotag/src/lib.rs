//! Parse, convert, and write metadata in Ogg Vorbis, Ogg Speex, and True Audio files.
//!
//! # Supported Formats
//!
//! | File format | Extensions     | Metadata format(s)     |
//! |-------------|----------------|------------------------|
//! | Ogg Vorbis  | `ogg`, `oga`   | `Vorbis Comments`      |
//! | Ogg Speex   | `spx`          | `Vorbis Comments`      |
//! | True Audio  | `tta`          | `APE`, `ID3v1`         |
//!
//! # Examples
//!
//! ## Reading a generic file
//!
//! When the format isn't known ahead of time, or [using concrete file types](#using-concrete-file-types)
//! is inconvenient, [`TaggedFile`](file::TaggedFile) covers every supported format at once.
//!
//! ### Using a path
//!
//! ```rust,no_run
//! # fn main() -> audiotag::error::Result<()> {
//! use audiotag::probe::Probe;
//! use audiotag::read_from_path;
//!
//! // This will guess the format from the extension
//! // ("ogg" in this case), but we can guess from the content if we want to.
//! let path = "test.ogg";
//! let tagged_file = read_from_path(path)?;
//!
//! // Let's guess the format from the content just in case.
//! // This is not necessary in this case!
//! let tagged_file2 = Probe::open(path)?.guess_file_type()?.read()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Using an existing reader
//!
//! ```rust,no_run
//! # fn main() -> audiotag::error::Result<()> {
//! use audiotag::read_from;
//! use std::fs::File;
//!
//! // Let's read from an open file
//! let path = "test.ogg";
//! let mut file = File::open(path)?;
//!
//! // Here, we have to guess the file type prior to reading
//! let tagged_file = read_from(&mut file)?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Accessing tags
//!
//! ```rust,no_run
//! # fn main() -> audiotag::error::Result<()> {
//! use audiotag::file::TaggedFileExt;
//! use audiotag::read_from_path;
//!
//! let path = "test.ogg";
//! let tagged_file = read_from_path(path)?;
//!
//! // Get the primary tag (Vorbis Comments in this case)
//! let vorbis_comments = tagged_file.primary_tag();
//!
//! // If the primary tag doesn't exist, or the tag types
//! // don't matter, the first tag can be retrieved
//! let unknown_first_tag = tagged_file.first_tag();
//! # Ok(())
//! # }
//! ```
//!
//! ## Using concrete file types
//!
//! ```rust,no_run
//! # fn main() -> audiotag::error::Result<()> {
//! use audiotag::config::ParseOptions;
//! use audiotag::file::AudioFile;
//! use audiotag::tag::TagType;
//! use audiotag::tta::TrueAudioFile;
//! use std::fs::File;
//!
//! let mut file_content = File::open("song.tta")?;
//!
//! // We are expecting a True Audio file
//! let tta_file = TrueAudioFile::read_from(&mut file_content, ParseOptions::new())?;
//!
//! // Here we have a file with multiple tags
//! assert!(tta_file.contains_tag_type(TagType::Ape));
//! assert!(tta_file.contains_tag_type(TagType::Id3v1));
//! # Ok(())
//! # }
//! ```
//!
//! # Important format-specific notes
//!
//! All formats have their own quirks that may produce unexpected results between conversions.
//! Be sure to read the module documentation of each format to see important notes and warnings.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub mod file;
pub(crate) mod macros;
pub mod picture;
pub mod probe;
pub mod tag;
mod util;

pub mod ape;
pub mod id3;
pub mod ogg;
pub mod tta;

pub use crate::probe::{read_from, read_from_path};

pub use util::io;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use audiotag::prelude::*;
	//! ```

	pub use crate::file::{AudioFile, TaggedFileExt};
	pub use crate::tag::{Accessor, ItemKey, TagExt};
}
