use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagError};
use crate::tag::TagType;
use crate::util::io::{FileLike, Length, Truncate};

use std::fs::OpenOptions;
use std::io::{Read, Seek};
use std::path::Path;

/// Provides various methods for interaction with a file
pub trait AudioFile: Into<super::TaggedFile> {
	/// Read a file from a reader
	///
	/// # Errors
	///
	/// Errors depend on the file and tags inside the file itself
	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
		Self: Sized;

	/// Attempts to write all tags to a path
	///
	/// # Errors
	///
	/// * `path` does not exist
	/// * See [`AudioFile::save_to`]
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::config::WriteOptions;
	/// use audiotag::file::AudioFile;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// # let path = "song.ogg";
	/// let mut file = audiotag::read_from_path(path)?;
	///
	/// // Edit the tags...
	///
	/// file.save_to_path(path, WriteOptions::default())?;
	/// # Ok(()) }
	/// ```
	fn save_to_path<P>(&self, path: P, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
		Self: Sized,
	{
		let mut file = OpenOptions::new().read(true).write(true).open(path)?;
		self.save_to(&mut file, write_options)
	}

	/// Attempts to write all tags to a file
	///
	/// # Errors
	///
	/// See [`TagExt::save_to`](crate::tag::TagExt::save_to), however this is format-specific
	fn save_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>;

	/// Returns whether the file contains any tags
	fn contains_tag(&self) -> bool;

	/// Returns whether the file contains the given [`TagType`]
	fn contains_tag_type(&self, tag_type: TagType) -> bool;
}
