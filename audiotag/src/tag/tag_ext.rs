use crate::config::WriteOptions;
use crate::error::TagError;
use crate::io::{FileLike, Length, Truncate};
use crate::tag::{Accessor, Tag, TagType};

use std::path::Path;

/// Functionality shared by every tag format
///
/// Anything implementing this can be inspected, saved, and removed through the
/// same set of methods, no matter the underlying format.
pub trait TagExt: Accessor + Into<Tag> + Sized + private::Sealed {
	/// The error type IO operations on this tag produce
	type Err: From<std::io::Error> + From<TagError>;
	/// The key type the read-only lookups take
	type RefKey<'a>
	where
		Self: 'a;

	#[doc(hidden)]
	fn tag_type(&self) -> TagType;

	/// How many items the tag holds
	///
	/// Extras such as pictures count towards this total.
	///
	/// # Example
	///
	/// ```rust
	/// use audiotag::tag::{Accessor, ItemKey, Tag, TagExt};
	/// # let tag_type = audiotag::tag::TagType::VorbisComments;
	///
	/// let mut tag = Tag::new(tag_type);
	/// assert_eq!(tag.len(), 0);
	///
	/// tag.set_title(String::from("Some title"));
	/// assert_eq!(tag.len(), 1);
	/// ```
	fn len(&self) -> usize;

	/// Whether the tag contains an item with the key
	///
	/// # Example
	///
	/// ```rust
	/// use audiotag::tag::{Accessor, ItemKey, Tag, TagExt};
	/// # let tag_type = audiotag::tag::TagType::VorbisComments;
	///
	/// let mut tag = Tag::new(tag_type);
	/// assert!(tag.is_empty());
	///
	/// tag.set_artist(String::from("Some artist"));
	/// assert!(tag.contains(&ItemKey::TrackArtist));
	/// ```
	fn contains<'a>(&'a self, key: Self::RefKey<'a>) -> bool;

	/// Whether the tag has any items
	///
	/// # Example
	///
	/// ```rust
	/// use audiotag::tag::{Accessor, Tag, TagExt};
	/// # let tag_type = audiotag::tag::TagType::VorbisComments;
	///
	/// let mut tag = Tag::new(tag_type);
	/// assert!(tag.is_empty());
	///
	/// tag.set_artist(String::from("Some artist"));
	/// assert!(!tag.is_empty());
	/// ```
	fn is_empty(&self) -> bool;

	/// Write the tag to the file at `path`
	///
	/// # Errors
	///
	/// * `path` doesn't exist or isn't writable
	/// * See [`TagExt::save_to`]
	fn save_to_path<P: AsRef<Path>>(
		&self,
		path: P,
		write_options: WriteOptions,
	) -> std::result::Result<(), Self::Err> {
		let mut file = std::fs::OpenOptions::new()
			.read(true)
			.write(true)
			.open(path)?;

		self.save_to(&mut file, write_options)
	}

	/// Write the tag to a [`FileLike`]
	///
	/// # Errors
	///
	/// * The file format can't be determined
	/// * The format doesn't accept this tag type
	fn save_to<F>(
		&self,
		file: &mut F,
		write_options: WriteOptions,
	) -> std::result::Result<(), Self::Err>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>;

	#[allow(clippy::missing_errors_doc)]
	/// Dump the tag to a writer
	///
	/// Only the tag itself is written, the output is not a playable file.
	fn dump_to<W: std::io::Write>(
		&self,
		writer: &mut W,
		write_options: WriteOptions,
	) -> std::result::Result<(), Self::Err>;

	/// Strip this tag type from the file at `path`
	///
	/// # Errors
	///
	/// See [`TagExt::remove_from`]
	fn remove_from_path<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), Self::Err> {
		self.tag_type().remove_from_path(path).map_err(Into::into)
	}

	/// Strip this tag type from a [`FileLike`]
	///
	/// # Errors
	///
	/// * The file format can't be determined
	/// * The format doesn't accept this tag type
	/// * The file isn't writable
	fn remove_from<F>(&self, file: &mut F) -> std::result::Result<(), Self::Err>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		self.tag_type().remove_from(file).map_err(Into::into)
	}

	/// Drop every item from the tag
	///
	/// Format-specific extras, such as flags, are left in place.
	fn clear(&mut self);
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#c-sealed
mod private {
	use crate::ape::ApeTag;
	use crate::id3::v1::Id3v1Tag;
	use crate::ogg::VorbisComments;
	use crate::tag::Tag;

	pub trait Sealed {}

	impl Sealed for ApeTag {}
	impl Sealed for Id3v1Tag {}
	impl Sealed for Tag {}
	impl Sealed for VorbisComments {}
}
