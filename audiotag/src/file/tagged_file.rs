use super::audio_file::AudioFile;
use super::file_type::FileType;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagError};
use crate::tag::{Tag, TagExt, TagSupport, TagType};
use crate::util::io::{FileLike, Length, Truncate};

use std::io::{Read, Seek};

/// Provides a common interface for tag containers
pub trait TaggedFileExt {
	/// The [`FileType`] the file was read as
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::file::{FileType, TaggedFileExt};
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// let mut tagged_file = audiotag::read_from_path("song.ogg")?;
	///
	/// assert_eq!(tagged_file.file_type(), FileType::Vorbis);
	/// # Ok(()) }
	/// ```
	fn file_type(&self) -> FileType;

	/// Every tag found in the file
	fn tags(&self) -> &[Tag];

	/// The [`TagType`] the format treats as its primary tag
	///
	/// See [`FileType::primary_tag_type`]
	fn primary_tag_type(&self) -> TagType {
		self.file_type().primary_tag_type()
	}

	/// How well the format supports `tag_type`
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::file::TaggedFileExt;
	/// use audiotag::tag::TagType;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// let mut tagged_file = audiotag::read_from_path("song.ogg")?;
	///
	/// // OGG Vorbis supports both reading and writing Vorbis Comments
	/// assert!(
	/// 	tagged_file
	/// 		.tag_support(TagType::VorbisComments)
	/// 		.is_writable()
	/// );
	///
	/// // But doesn't support APE tags at all
	/// assert!(!tagged_file.tag_support(TagType::Ape).is_readable());
	/// # Ok(()) }
	/// ```
	fn tag_support(&self, tag_type: TagType) -> TagSupport {
		self.file_type().tag_support(tag_type)
	}

	/// The stored tag of the given [`TagType`], if present
	fn tag(&self, tag_type: TagType) -> Option<&Tag>;

	/// Mutable access to the stored tag of the given [`TagType`]
	fn tag_mut(&mut self, tag_type: TagType) -> Option<&mut Tag>;

	/// The stored tag matching the format's primary [`TagType`]
	///
	/// See [`FileType::primary_tag_type`]
	fn primary_tag(&self) -> Option<&Tag> {
		self.tag(self.primary_tag_type())
	}

	/// Mutable access to the tag matching the format's primary [`TagType`]
	///
	/// See [`FileType::primary_tag_type`]
	fn primary_tag_mut(&mut self) -> Option<&mut Tag> {
		self.tag_mut(self.primary_tag_type())
	}

	/// Any one of the stored tags
	///
	/// The tag order carries no meaning, so the returned type is not
	/// predictable.
	fn first_tag(&self) -> Option<&Tag> {
		self.tags().first()
	}

	/// Mutable access to any one of the stored tags
	fn first_tag_mut(&mut self) -> Option<&mut Tag>;

	/// Store a [`Tag`], returning whichever tag it displaced
	///
	/// Nothing happens when the [`FileType`] has no support for the
	/// [`TagType`], see [`FileType::tag_support()`].
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::file::{AudioFile, TaggedFileExt};
	/// use audiotag::tag::{Tag, TagType};
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// // Read a True Audio file without an APE tag
	/// let mut tagged_file = audiotag::read_from_path("song.tta")?;
	/// # let _ = tagged_file.remove(TagType::Ape); // sneaky
	///
	/// assert!(!tagged_file.contains_tag_type(TagType::Ape));
	///
	/// // Insert the APE tag
	/// let new_ape_tag = Tag::new(TagType::Ape);
	/// tagged_file.insert_tag(new_ape_tag);
	///
	/// assert!(tagged_file.contains_tag_type(TagType::Ape));
	/// # Ok(()) }
	/// ```
	fn insert_tag(&mut self, tag: Tag) -> Option<Tag>;

	/// Take the stored tag of the given [`TagType`] out of the file
	fn remove(&mut self, tag_type: TagType) -> Option<Tag>;

	/// Drop every stored tag
	fn clear(&mut self);
}

/// A file of any supported format, with its tags in generic form
///
/// This is what reading through [`Probe`](crate::probe::Probe) produces
/// when the concrete format isn't known in advance.
pub struct TaggedFile {
	pub(crate) ty: FileType,
	pub(crate) tags: Vec<Tag>,
}

impl TaggedFile {
	pub(crate) const fn new(ty: FileType, tags: Vec<Tag>) -> Self {
		Self { ty, tags }
	}

	/// Rebind the file to another [`FileType`]
	///
	/// Tags the new format has no support for are dropped, see
	/// [`FileType::tag_support()`].
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::file::{AudioFile, FileType, TaggedFileExt};
	/// use audiotag::tag::TagType;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// // Read an OGG Vorbis file containing a Vorbis Comments tag
	/// let mut tagged_file = audiotag::read_from_path("song.ogg")?;
	///
	/// assert!(tagged_file.contains_tag_type(TagType::VorbisComments));
	///
	/// // Remap our file to True Audio, which doesn't support Vorbis Comments
	/// tagged_file.change_file_type(FileType::TrueAudio);
	///
	/// assert!(!tagged_file.contains_tag_type(TagType::VorbisComments));
	/// # Ok(()) }
	/// ```
	pub fn change_file_type(&mut self, file_type: FileType) {
		self.ty = file_type;

		let new_type = self.ty;
		self.tags
			.retain(|t| new_type.tag_support(t.tag_type()).is_readable());
	}
}

impl TaggedFileExt for TaggedFile {
	fn file_type(&self) -> FileType {
		self.ty
	}

	fn tags(&self) -> &[Tag] {
		self.tags.as_slice()
	}

	fn tag(&self, tag_type: TagType) -> Option<&Tag> {
		self.tags.iter().find(|i| i.tag_type() == tag_type)
	}

	fn tag_mut(&mut self, tag_type: TagType) -> Option<&mut Tag> {
		self.tags.iter_mut().find(|i| i.tag_type() == tag_type)
	}

	fn first_tag_mut(&mut self) -> Option<&mut Tag> {
		self.tags.first_mut()
	}

	fn insert_tag(&mut self, tag: Tag) -> Option<Tag> {
		let tag_type = tag.tag_type();
		if !self.tag_support(tag_type).is_readable() {
			return None;
		}

		let replaced = self.remove(tag_type);
		self.tags.push(tag);

		replaced
	}

	fn remove(&mut self, tag_type: TagType) -> Option<Tag> {
		let pos = self.tags.iter().position(|t| t.tag_type() == tag_type)?;
		Some(self.tags.remove(pos))
	}

	fn clear(&mut self) {
		self.tags.clear();
	}
}

impl AudioFile for TaggedFile {
	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
		Self: Sized,
	{
		crate::probe::Probe::new(reader)
			.guess_file_type()?
			.options(parse_options)
			.read()
	}

	fn save_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		for tag in &self.tags {
			// It's likely that users of `TaggedFile` aren't going to be aware of any read-only tags
			// if they happen to read any, so just skip them rather than error.
			if !self.tag_support(tag.tag_type()).is_writable() {
				continue;
			}

			file.rewind()?;
			tag.save_to(file, write_options)?;
		}

		Ok(())
	}

	fn contains_tag(&self) -> bool {
		!self.tags.is_empty()
	}

	fn contains_tag_type(&self, tag_type: TagType) -> bool {
		self.tags.iter().any(|t| t.tag_type() == tag_type)
	}
}
