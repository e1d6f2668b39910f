use crate::config::WriteOptions;
use crate::error::{Result, TagError};
use crate::file::FileType;
use crate::id3::v1::constants::GENRES;
use crate::tag::{Accessor, ItemKey, ItemValue, Tag, TagExt, TagItem, TagType};
use crate::util::io::{FileLike, Length, Truncate};

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

macro_rules! impl_accessor {
	($($field:ident,)+) => {
		paste::paste! {
			$(
				fn $field(&self) -> Option<Cow<'_, str>> {
					self.$field.as_deref().map(Cow::Borrowed)
				}

				fn [<set_ $field>](&mut self, value: String) {
					self.$field = Some(value)
				}

				fn [<remove_ $field>](&mut self) {
					self.$field = None
				}
			)+
		}
	}
}

/// An ID3v1 tag
///
/// ID3v1 is a severely limited format, every field has a tiny fixed size.
/// The field docs below note each maximum along with any further
/// restrictions.
///
/// A field longer than its maximum does **not** error on write, it is
/// simply cut short.
///
/// ## Conversions
///
/// ### To `Tag`
///
/// Every field has a `TagItem` counterpart:
///
/// * `title` becomes [`ItemKey::TrackTitle`]
/// * `artist` becomes [`ItemKey::TrackArtist`]
/// * `album` becomes [`ItemKey::AlbumTitle`]
/// * `year` becomes [`ItemKey::Year`]
/// * `comment` becomes [`ItemKey::Comment`]
/// * `track_number` becomes [`ItemKey::TrackNumber`]
/// * `genre` becomes [`ItemKey::Genre`], provided the byte is a valid index
///   into [`GENRES`]. The item then holds the genre *string*, not the index.
///
/// ### From `Tag`
///
/// #### Items
///
/// Only the [`ItemKey`]s named above are looked at.
///
/// Values carry over as-is, with two exceptions:
///
/// * [`ItemKey::TrackNumber`] is taken only when the value parses as a `u8`
/// * [`ItemKey::Genre`] is taken only when the string appears in [`GENRES`],
///   or parses as a `u8` that is a valid index into [`GENRES`]
///
/// #### Pictures
///
/// Pictures are discarded, the format has nowhere to put them.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Id3v1Tag {
	/// Track title, 30 bytes max
	pub title: Option<String>,
	/// Track artist, 30 bytes max
	pub artist: Option<String>,
	/// Album title, 30 bytes max
	pub album: Option<String>,
	/// Release year (max 9999)
	pub year: Option<u16>,
	/// A short comment
	///
	/// The byte limit depends on the revision that was read: a V1 tag
	/// allows 30 bytes, a V1.1 tag only 28 since the trailing two bytes
	/// hold the track number marker.
	///
	/// Writing always produces a V1.1 tag.
	pub comment: Option<String>,
	/// The track number, a single byte
	///
	/// Caveats:
	///
	/// * A track number of 0 is indistinguishable from a plain V1 tag,
	///   since readers tell the revisions apart by the null byte closing
	///   the comment field.
	/// * Plain V1 tags carry no track number at all, so this stays `None`
	///   after reading one.
	pub track_number: Option<u8>,
	/// The genre, stored as an index into the predefined
	/// [`GENRES`](crate::id3::v1::GENRES) table
	pub genre: Option<u8>,
}

impl Id3v1Tag {
	pub(crate) const SUPPORTED_FORMATS: &'static [FileType] = &[FileType::TrueAudio];
	pub(crate) const READ_ONLY_FORMATS: &'static [FileType] = &[];

	/// An empty `ID3v1` tag
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::id3::v1::Id3v1Tag;
	/// use audiotag::tag::TagExt;
	///
	/// let id3v1_tag = Id3v1Tag::new();
	/// assert!(id3v1_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}
}

impl Accessor for Id3v1Tag {
	impl_accessor!(title, artist, album,);

	fn genre(&self) -> Option<Cow<'_, str>> {
		self.genre
			.and_then(|index| GENRES.get(usize::from(index)))
			.map(|genre| Cow::Borrowed(*genre))
	}

	fn set_genre(&mut self, genre: String) {
		let position = GENRES
			.iter()
			.position(|g| g.eq_ignore_ascii_case(genre.as_str()));

		if let Some(position) = position {
			self.genre = Some(position as u8);
		}
	}

	fn remove_genre(&mut self) {
		self.genre = None
	}

	fn track(&self) -> Option<u32> {
		self.track_number.map(u32::from)
	}

	fn set_track(&mut self, value: u32) {
		self.track_number = Some(value as u8);
	}

	fn remove_track(&mut self) {
		self.track_number = None;
	}

	fn comment(&self) -> Option<Cow<'_, str>> {
		self.comment.as_deref().map(Cow::Borrowed)
	}

	fn set_comment(&mut self, value: String) {
		// 28 bytes, the V1.1 limit, without splitting a character
		let mut resized = String::with_capacity(28);
		for c in value.chars() {
			if resized.len() + c.len_utf8() > 28 {
				break;
			}

			resized.push(c);
		}

		self.comment = Some(resized);
	}

	fn remove_comment(&mut self) {
		self.comment = None;
	}

	fn year(&self) -> Option<u32> {
		self.year.map(u32::from)
	}

	fn set_year(&mut self, value: u32) {
		self.year = Some(std::cmp::min(value, 9999) as u16);
	}

	fn remove_year(&mut self) {
		self.year = None;
	}
}

impl TagExt for Id3v1Tag {
	type Err = TagError;
	type RefKey<'a> = &'a ItemKey;

	#[inline]
	fn tag_type(&self) -> TagType {
		TagType::Id3v1
	}

	fn len(&self) -> usize {
		usize::from(self.title.is_some())
			+ usize::from(self.artist.is_some())
			+ usize::from(self.album.is_some())
			+ usize::from(self.year.is_some())
			+ usize::from(self.comment.is_some())
			+ usize::from(self.track_number.is_some())
			+ usize::from(self.genre.is_some())
	}

	fn contains<'a>(&'a self, key: Self::RefKey<'a>) -> bool {
		match key {
			ItemKey::TrackTitle => self.title.is_some(),
			ItemKey::AlbumTitle => self.album.is_some(),
			ItemKey::TrackArtist => self.artist.is_some(),
			ItemKey::TrackNumber => self.track_number.is_some(),
			ItemKey::Year => self.year.is_some(),
			ItemKey::Genre => self.genre.is_some(),
			ItemKey::Comment => self.comment.is_some(),
			_ => false,
		}
	}

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn save_to<F>(
		&self,
		file: &mut F,
		write_options: WriteOptions,
	) -> std::result::Result<(), Self::Err>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		Id3v1TagRef::from(self).write_to(file, write_options)
	}

	/// Serialize the tag into a bare writer
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	fn dump_to<W: Write>(
		&self,
		writer: &mut W,
		write_options: WriteOptions,
	) -> std::result::Result<(), Self::Err> {
		Id3v1TagRef::from(self).dump_to(writer, write_options)
	}

	fn remove_from_path<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), Self::Err> {
		TagType::Id3v1.remove_from_path(path)
	}

	fn remove_from<F>(&self, file: &mut F) -> std::result::Result<(), Self::Err>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		TagType::Id3v1.remove_from(file)
	}

	fn clear(&mut self) {
		*self = Self::default();
	}
}

impl From<Id3v1Tag> for Tag {
	fn from(input: Id3v1Tag) -> Self {
		let mut tag = Tag::new(TagType::Id3v1);

		let text_fields = [
			(ItemKey::TrackTitle, input.title),
			(ItemKey::TrackArtist, input.artist),
			(ItemKey::AlbumTitle, input.album),
			(ItemKey::Comment, input.comment),
		];

		for (key, field) in text_fields {
			if let Some(text) = field {
				tag.insert_text(key, text);
			}
		}

		if let Some(year) = input.year {
			tag.insert_text(ItemKey::Year, year.to_string());
		}

		if let Some(track_number) = input.track_number {
			tag.items.push(TagItem::new(
				ItemKey::TrackNumber,
				ItemValue::Text(track_number.to_string()),
			))
		}

		if let Some(genre) = input.genre.and_then(|i| GENRES.get(usize::from(i))) {
			tag.insert_text(ItemKey::Genre, (*genre).to_string());
		}

		tag
	}
}

impl From<Tag> for Id3v1Tag {
	fn from(mut input: Tag) -> Self {
		let title = input.take_strings(&ItemKey::TrackTitle).next();
		let artist = input.take_strings(&ItemKey::TrackArtist).next();
		let album = input.take_strings(&ItemKey::AlbumTitle).next();
		let year = year_from_tag(&input);
		let comment = input.take_strings(&ItemKey::Comment).next();

		Self {
			title,
			artist,
			album,
			year,
			comment,
			track_number: track_number_from_tag(&input),
			genre: genre_index_from_tag(&input),
		}
	}
}

fn year_from_tag(tag: &Tag) -> Option<u16> {
	if let Some(year) = tag.get_string(&ItemKey::Year) {
		return year.parse().ok();
	}

	// A full date may be stored, the year is the leading digits
	let date = tag.get_string(&ItemKey::RecordingDate)?;
	date.chars()
		.take_while(char::is_ascii_digit)
		.collect::<String>()
		.parse()
		.ok()
}

fn track_number_from_tag(tag: &Tag) -> Option<u8> {
	tag.get_string(&ItemKey::TrackNumber)
		.and_then(|t| t.parse::<u8>().ok())
}

fn genre_index_from_tag(tag: &Tag) -> Option<u8> {
	let genre = tag.get_string(&ItemKey::Genre)?;

	match GENRES.iter().position(|g| g == &genre) {
		Some(position) => Some(position as u8),
		// The tag may store the index itself
		None => genre.parse::<u8>().ok(),
	}
}

pub(crate) struct Id3v1TagRef<'a> {
	pub title: Option<&'a str>,
	pub artist: Option<&'a str>,
	pub album: Option<&'a str>,
	pub year: Option<u16>,
	pub comment: Option<&'a str>,
	pub track_number: Option<u8>,
	pub genre: Option<u8>,
}

impl<'a> From<&'a Id3v1Tag> for Id3v1TagRef<'a> {
	fn from(input: &'a Id3v1Tag) -> Self {
		Self {
			title: input.title.as_deref(),
			artist: input.artist.as_deref(),
			album: input.album.as_deref(),
			year: input.year,
			comment: input.comment.as_deref(),
			track_number: input.track_number,
			genre: input.genre,
		}
	}
}

impl<'a> From<&'a Tag> for Id3v1TagRef<'a> {
	fn from(input: &'a Tag) -> Self {
		Self {
			title: input.get_string(&ItemKey::TrackTitle),
			artist: input.get_string(&ItemKey::TrackArtist),
			album: input.get_string(&ItemKey::AlbumTitle),
			year: year_from_tag(input),
			comment: input.get_string(&ItemKey::Comment),
			track_number: track_number_from_tag(input),
			genre: genre_index_from_tag(input),
		}
	}
}

impl Id3v1TagRef<'_> {
	pub(super) fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.artist.is_none()
			&& self.album.is_none()
			&& self.year.is_none()
			&& self.comment.is_none()
			&& self.track_number.is_none()
			&& self.genre.is_none()
	}

	pub(crate) fn write_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		super::write::write_id3v1(file, self, write_options)
	}

	pub(crate) fn dump_to<W: Write>(
		&mut self,
		writer: &mut W,
		write_options: WriteOptions,
	) -> Result<()> {
		let tag = super::write::encode(self, write_options)?;
		writer.write_all(&tag)?;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use crate::id3::v1::Id3v1Tag;
	use crate::prelude::*;
	use crate::tag::{ItemKey, Tag, TagType};

	#[test_log::test]
	fn id3v1_to_tag() {
		let id3v1 = Id3v1Tag {
			title: Some(String::from("Foo title")),
			artist: Some(String::from("Bar artist")),
			album: Some(String::from("Baz album")),
			year: Some(1984),
			comment: Some(String::from("Qux comment")),
			track_number: Some(1),
			genre: Some(32),
		};

		let tag: Tag = id3v1.into();

		crate::tag::utils::test_utils::verify_tag(&tag, true, true);
		assert_eq!(tag.get_string(&ItemKey::Year), Some("1984"));
	}

	#[test_log::test]
	fn tag_to_id3v1() {
		let tag = crate::tag::utils::test_utils::create_tag(TagType::Id3v1);

		let id3v1_tag: Id3v1Tag = tag.into();

		assert_eq!(id3v1_tag.title.as_deref(), Some("Foo title"));
		assert_eq!(id3v1_tag.artist.as_deref(), Some("Bar artist"));
		assert_eq!(id3v1_tag.album.as_deref(), Some("Baz album"));
		assert_eq!(id3v1_tag.comment.as_deref(), Some("Qux comment"));
		assert_eq!(id3v1_tag.track_number, Some(1));
		assert_eq!(id3v1_tag.genre, Some(32));
	}

	#[test_log::test]
	fn year_from_date_string() {
		let mut tag = Tag::new(TagType::Id3v1);
		tag.insert_text(ItemKey::RecordingDate, String::from("1984-06-15"));

		let id3v1_tag: Id3v1Tag = tag.into();
		assert_eq!(id3v1_tag.year, Some(1984));
	}

	#[test_log::test]
	fn genre_lookup_is_case_insensitive() {
		let mut id3v1_tag = Id3v1Tag::new();
		id3v1_tag.set_genre(String::from("cLaSsIcAl"));

		assert_eq!(id3v1_tag.genre, Some(32));
		assert_eq!(id3v1_tag.genre().as_deref(), Some("Classical"));
	}
}
