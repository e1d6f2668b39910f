use crate::config::WriteOptions;
use crate::error::{Result, TagError};
use crate::file::FileType;
use crate::macros::err;
use crate::ogg::read::valid_vorbis_comments_key;
use crate::ogg::write::OGGFormat;
use crate::picture::{Picture, PictureInformation};
use crate::probe::Probe;
use crate::tag::{Accessor, ItemKey, ItemValue, Tag, TagExt, TagItem, TagType};
use crate::util::io::{FileLike, Length, Truncate};

use std::borrow::Cow;
use std::io::Write;

macro_rules! impl_accessor {
	($($method:ident => $field:literal;)+) => {
		paste::paste! {
			$(
				fn $method(&self) -> Option<Cow<'_, str>> {
					self.get($field).map(Cow::Borrowed)
				}

				fn [<set_ $method>](&mut self, value: String) {
					self.insert(String::from($field), value)
				}

				fn [<remove_ $method>](&mut self) {
					let _ = self.remove($field);
				}
			)+
		}
	}
}

/// Vorbis comments
///
/// ## Conversions
///
/// ### To `Tag`
///
/// Every field survives: those with a known mapping become their [`ItemKey`],
/// the rest ride along as [`ItemKey::Unknown`] with their casing untouched.
///
/// The vendor string does **not** convert. It describes the encoder rather
/// than the audio, and the write path keeps the file's own vendor string.
///
/// ### From `Tag`
///
/// A [`TagItem`] converts when:
///
/// * Its value is [`ItemValue::Text`] or [`ItemValue::Locator`]
/// * Its key maps to a valid field name
///
/// [`Picture`]s convert with a zeroed [`PictureInformation`].
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct VorbisComments {
	/// The encoding software's identifier
	pub(crate) vendor: String,
	/// Key/value pairs, in file order
	pub(crate) items: Vec<(String, String)>,
	/// Pictures, decoded from `METADATA_BLOCK_PICTURE` fields
	pub(crate) pictures: Vec<(Picture, PictureInformation)>,
}

impl VorbisComments {
	pub(crate) const SUPPORTED_FORMATS: &'static [FileType] =
		&[FileType::Speex, FileType::Vorbis];
	pub(crate) const READ_ONLY_FORMATS: &'static [FileType] = &[];

	/// Create a new empty `VorbisComments`
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ogg::VorbisComments;
	/// use audiotag::tag::TagExt;
	///
	/// let comments = VorbisComments::new();
	/// assert!(comments.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// The vendor string
	///
	/// ```rust
	/// use audiotag::ogg::VorbisComments;
	///
	/// let mut comments = VorbisComments::default();
	/// assert!(comments.vendor().is_empty());
	///
	/// comments.set_vendor(String::from("Lavf59.27.100"));
	/// assert_eq!(comments.vendor(), "Lavf59.27.100");
	/// ```
	pub fn vendor(&self) -> &str {
		&self.vendor
	}

	/// Replace the vendor string
	pub fn set_vendor(&mut self, vendor: String) {
		self.vendor = vendor
	}

	/// Iterate over the key/value pairs, in file order
	///
	/// ```rust
	/// use audiotag::ogg::VorbisComments;
	///
	/// let mut comments = VorbisComments::default();
	///
	/// comments.push(String::from("ARTIST"), String::from("Some artist"));
	/// comments.push(String::from("TITLE"), String::from("Some title"));
	///
	/// let mut items = comments.items();
	///
	/// assert_eq!(items.next(), Some(("ARTIST", "Some artist")));
	/// assert_eq!(items.next(), Some(("TITLE", "Some title")));
	/// ```
	pub fn items(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + Clone {
		self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Drain the key/value pairs, leaving the tag's fields empty
	///
	/// ```rust
	/// use audiotag::ogg::VorbisComments;
	/// use audiotag::tag::TagExt;
	///
	/// let mut comments = VorbisComments::default();
	///
	/// comments.push(String::from("ARTIST"), String::from("Artist A"));
	///
	/// let taken = comments.take_items().collect::<Vec<_>>();
	///
	/// assert_eq!(taken.len(), 1);
	/// assert!(comments.is_empty());
	/// ```
	pub fn take_items(&mut self) -> impl ExactSizeIterator<Item = (String, String)> + use<> {
		std::mem::take(&mut self.items).into_iter()
	}

	/// The stored [`Picture`]s, paired with their [`PictureInformation`]
	pub fn pictures(&self) -> &[(Picture, PictureInformation)] {
		&self.pictures
	}

	/// Store a [`Picture`]
	pub fn insert_picture(&mut self, picture: Picture, information: PictureInformation) {
		self.pictures.push((picture, information))
	}

	/// Drain all stored [`Picture`]s
	pub fn remove_pictures(&mut self) -> impl Iterator<Item = (Picture, PictureInformation)> + use<> {
		std::mem::take(&mut self.pictures).into_iter()
	}

	/// The first value stored under `key`, compared case-insensitively
	///
	/// A key may appear more than once, this returns whichever value comes
	/// first in file order.
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ogg::VorbisComments;
	///
	/// let mut comments = VorbisComments::default();
	///
	/// comments.push(String::from("ARTIST"), String::from("Artist A"));
	/// comments.push(String::from("ARTIST"), String::from("Artist B"));
	///
	/// assert_eq!(comments.get("ARTIST"), Some("Artist A"));
	/// ```
	pub fn get(&self, key: &str) -> Option<&str> {
		if !verify_key(key) {
			return None;
		}

		self.items
			.iter()
			.find(|(k, _)| k.eq_ignore_ascii_case(key))
			.map(|(_, v)| v.as_str())
	}

	/// All values stored under `key`, compared case-insensitively
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ogg::VorbisComments;
	///
	/// let mut comments = VorbisComments::default();
	///
	/// comments.push(String::from("ARTIST"), String::from("Artist A"));
	/// comments.push(String::from("ARTIST"), String::from("Artist B"));
	///
	/// let artists = comments.get_all("ARTIST").collect::<Vec<&str>>();
	/// assert_eq!(artists, vec!["Artist A", "Artist B"]);
	/// ```
	pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + Clone + 'a {
		self.items
			.iter()
			.filter_map(move |(k, v)| (k.eq_ignore_ascii_case(key)).then_some(v.as_str()))
	}

	/// Store an item, displacing any items already stored under `key`
	///
	/// An [invalid key] is silently discarded, use [`VorbisComments::push`]
	/// to keep existing values instead of replacing them.
	///
	/// [invalid key]: https://xiph.org/vorbis/doc/v-comment.html#vectorformat
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ogg::VorbisComments;
	///
	/// let mut comments = VorbisComments::default();
	/// comments.insert(String::from("TITLE"), String::from("Working title"));
	/// comments.insert(String::from("TITLE"), String::from("Final title"));
	///
	/// // Only the latest title remains
	/// let mut titles = comments.get_all("TITLE");
	/// assert_eq!(titles.next(), Some("Final title"));
	/// assert_eq!(titles.next(), None);
	/// ```
	pub fn insert(&mut self, key: String, value: String) {
		if !verify_key(&key) {
			return;
		}

		self.items.retain(|(k, _)| !k.eq_ignore_ascii_case(&key));
		self.items.push((key, value))
	}

	/// Append an item, keeping any items already stored under `key`
	///
	/// An [invalid key] is silently discarded.
	///
	/// [invalid key]: https://xiph.org/vorbis/doc/v-comment.html#vectorformat
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ogg::VorbisComments;
	///
	/// let mut comments = VorbisComments::default();
	/// comments.push(String::from("TITLE"), String::from("Working title"));
	/// comments.push(String::from("TITLE"), String::from("Final title"));
	///
	/// // Both titles remain
	/// assert_eq!(comments.get_all("TITLE").count(), 2);
	/// ```
	pub fn push(&mut self, key: String, value: String) {
		if !verify_key(&key) {
			return;
		}

		self.items.push((key, value))
	}

	/// Remove every item stored under `key`, returning their values
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ogg::VorbisComments;
	///
	/// let mut comments = VorbisComments::default();
	/// comments.push(String::from("TITLE"), String::from("Working title"));
	///
	/// let removed = comments.remove("TITLE").collect::<Vec<_>>();
	/// assert_eq!(removed, vec![String::from("Working title")]);
	/// ```
	pub fn remove<'a>(&'a mut self, key: &str) -> impl Iterator<Item = String> + use<'a> {
		// Partition matching items to the front, then drain them off
		let mut matched = 0_usize;

		for idx in 0..self.items.len() {
			if self.items[idx].0.eq_ignore_ascii_case(key) {
				self.items.swap(matched, idx);
				matched += 1;
			}
		}

		self.items.drain(..matched).map(|(_, v)| v)
	}
}

// Field names are 0x20 through 0x7D, '=' (0x3D) excluded, and are compared
// case-insensitively within A-Z/a-z
fn verify_key(key: &str) -> bool {
	!key.is_empty() && valid_vorbis_comments_key(key.as_bytes())
}

impl Accessor for VorbisComments {
	impl_accessor!(
		artist  => "ARTIST";
		title   => "TITLE";
		album   => "ALBUM";
		genre   => "GENRE";
		comment => "COMMENT";
	);

	fn track(&self) -> Option<u32> {
		self.get("TRACKNUMBER")
			.or_else(|| self.get("TRACKNUM"))
			.and_then(|v| v.parse::<u32>().ok())
	}

	fn set_track(&mut self, value: u32) {
		self.remove_track();
		self.insert(String::from("TRACKNUMBER"), value.to_string());
	}

	fn remove_track(&mut self) {
		let _ = self.remove("TRACKNUMBER");
		let _ = self.remove("TRACKNUM");
	}

	fn track_total(&self) -> Option<u32> {
		self.get("TRACKTOTAL")
			.or_else(|| self.get("TOTALTRACKS"))
			.and_then(|v| v.parse::<u32>().ok())
	}

	fn set_track_total(&mut self, value: u32) {
		self.insert(String::from("TRACKTOTAL"), value.to_string());
		let _ = self.remove("TOTALTRACKS");
	}

	fn remove_track_total(&mut self) {
		let _ = self.remove("TRACKTOTAL");
		let _ = self.remove("TOTALTRACKS");
	}

	fn disk(&self) -> Option<u32> {
		self.get("DISCNUMBER").and_then(|v| v.parse::<u32>().ok())
	}

	fn set_disk(&mut self, value: u32) {
		self.insert(String::from("DISCNUMBER"), value.to_string());
	}

	fn remove_disk(&mut self) {
		let _ = self.remove("DISCNUMBER");
	}

	fn disk_total(&self) -> Option<u32> {
		self.get("DISCTOTAL")
			.or_else(|| self.get("TOTALDISCS"))
			.and_then(|v| v.parse::<u32>().ok())
	}

	fn set_disk_total(&mut self, value: u32) {
		self.insert(String::from("DISCTOTAL"), value.to_string());
		let _ = self.remove("TOTALDISCS");
	}

	fn remove_disk_total(&mut self) {
		let _ = self.remove("DISCTOTAL");
		let _ = self.remove("TOTALDISCS");
	}

	fn year(&self) -> Option<u32> {
		if let Some(year) = self.get("YEAR") {
			return year.parse::<u32>().ok();
		}

		// "DATE" may hold a full timestamp, the year is its leading digits
		let date = self.get("DATE")?;
		let digits = date
			.chars()
			.take_while(char::is_ascii_digit)
			.collect::<String>();
		digits.parse::<u32>().ok()
	}

	fn set_year(&mut self, value: u32) {
		// "YEAR" shows up in the wild, but "DATE" is the standard key.
		// Normalize to the latter.
		self.insert(String::from("DATE"), value.to_string());
		let _ = self.remove("YEAR");
	}

	fn remove_year(&mut self) {
		let _ = self.remove("DATE");
		let _ = self.remove("YEAR");
	}
}

impl TagExt for VorbisComments {
	type Err = TagError;
	type RefKey<'a> = &'a str;

	#[inline]
	fn tag_type(&self) -> TagType {
		TagType::VorbisComments
	}

	fn len(&self) -> usize {
		self.items.len() + self.pictures.len()
	}

	fn contains<'a>(&'a self, key: Self::RefKey<'a>) -> bool {
		self.items.iter().any(|(k, _)| k.eq_ignore_ascii_case(key))
	}

	fn is_empty(&self) -> bool {
		self.items.is_empty() && self.pictures.is_empty()
	}

	/// Write the tag to a file
	///
	/// # Errors
	///
	/// * The file is not an Ogg Vorbis or Ogg Speex stream
	/// * The file's packets cannot be parsed
	/// * [`std::io::Error`]
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
		self.as_ref().write_to(file, write_options)
	}

	/// Write the bare comment block to a writer
	///
	/// No comment signature is produced, so the output is not itself a
	/// valid metadata packet.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	fn dump_to<W: Write>(
		&self,
		writer: &mut W,
		write_options: WriteOptions,
	) -> std::result::Result<(), Self::Err> {
		self.as_ref().dump_to(writer, write_options)
	}

	fn clear(&mut self) {
		self.items.clear();
		self.pictures.clear();
	}
}

impl VorbisComments {
	fn as_ref(
		&self,
	) -> VorbisCommentsRef<
		'_,
		impl Iterator<Item = (&str, &str)>,
		impl Iterator<Item = (&Picture, PictureInformation)>,
	> {
		VorbisCommentsRef {
			vendor: Cow::from(self.vendor.as_str()),
			items: self.items.iter().map(|(k, v)| (k.as_str(), v.as_str())),
			pictures: self.pictures.iter().map(|(p, i)| (p, *i)),
		}
	}
}

impl From<VorbisComments> for Tag {
	fn from(input: VorbisComments) -> Self {
		let mut tag = Tag::new(TagType::VorbisComments);

		for (key, value) in input.items {
			tag.items.push(TagItem::new(
				ItemKey::from_key(TagType::VorbisComments, &key),
				ItemValue::Text(value),
			));
		}

		for (picture, _information) in input.pictures {
			tag.push_picture(picture)
		}

		tag
	}
}

impl From<Tag> for VorbisComments {
	fn from(input: Tag) -> Self {
		let mut comments = VorbisComments::default();

		for item in input.items {
			// Binary values have no representation in Vorbis comments
			let (ItemValue::Text(value) | ItemValue::Locator(value)) = item.item_value else {
				continue;
			};

			let Some(key) = item.item_key.map_key(TagType::VorbisComments) else {
				continue;
			};

			comments.push(key.to_string(), value);
		}

		for picture in input.pictures {
			comments
				.pictures
				.push((picture, PictureInformation::default()))
		}

		comments
	}
}

pub(crate) struct VorbisCommentsRef<'a, II, IP>
where
	II: Iterator<Item = (&'a str, &'a str)>,
	IP: Iterator<Item = (&'a Picture, PictureInformation)>,
{
	pub vendor: Cow<'a, str>,
	pub items: II,
	pub pictures: IP,
}

impl<'a, II, IP> VorbisCommentsRef<'a, II, IP>
where
	II: Iterator<Item = (&'a str, &'a str)>,
	IP: Iterator<Item = (&'a Picture, PictureInformation)>,
{
	pub(crate) fn write_to<F>(&mut self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		let probe = Probe::new(file).guess_file_type()?;
		let file_type = match probe.file_type() {
			Some(ft) if VorbisComments::SUPPORTED_FORMATS.contains(&ft) => ft,
			_ => err!(UnsupportedTag),
		};

		let (format, header_packet_count) = OGGFormat::from_filetype(file_type);

		super::write::write(
			probe.into_inner(),
			self,
			format,
			header_packet_count,
			write_options,
		)
	}

	pub(crate) fn dump_to<W: Write>(
		&mut self,
		writer: &mut W,
		_write_options: WriteOptions,
	) -> Result<()> {
		let metadata_packet = super::write::create_metadata_packet(self, &[], false)?;
		writer.write_all(&metadata_packet)?;
		Ok(())
	}
}

pub(crate) fn create_vorbis_comments_ref(
	tag: &Tag,
) -> (
	&str,
	impl Iterator<Item = (&str, &str)>,
	impl Iterator<Item = (&Picture, PictureInformation)>,
) {
	// The vendor string belongs to the encoder, not the tag. The file's own
	// vendor string is retained by the write path.
	let vendor = "";

	let items = tag.items.iter().filter_map(|i| match i.value() {
		ItemValue::Text(value) | ItemValue::Locator(value) => i
			.key()
			.map_key(TagType::VorbisComments)
			.map(|key| (key, value.as_str())),
		_ => None,
	});

	let pictures = tag
		.pictures
		.iter()
		.map(|p| (p, PictureInformation::default()));
	(vendor, items, pictures)
}

#[cfg(test)]
mod tests {
	use crate::config::{ParseOptions, ParsingMode, WriteOptions};
	use crate::ogg::VorbisComments;
	use crate::prelude::*;
	use crate::tag::{ItemKey, Tag, TagType};

	use std::io::{Cursor, Write};

	use byteorder::{LittleEndian, WriteBytesExt};

	fn read_tag(tag: &[u8]) -> VorbisComments {
		let mut reader = Cursor::new(tag);

		crate::ogg::read::read_comments(
			&mut reader,
			tag.len() as u64,
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
		)
		.unwrap()
	}

	fn comment_block(vendor: &str, items: &[(&str, &str)]) -> Vec<u8> {
		let mut block = Vec::new();
		block
			.write_u32::<LittleEndian>(vendor.len() as u32)
			.unwrap();
		block.write_all(vendor.as_bytes()).unwrap();
		block.write_u32::<LittleEndian>(items.len() as u32).unwrap();

		for (k, v) in items {
			let comment = format!("{k}={v}");
			block
				.write_u32::<LittleEndian>(comment.len() as u32)
				.unwrap();
			block.write_all(comment.as_bytes()).unwrap();
		}

		block
	}

	#[test_log::test]
	fn parse_vorbis_comments() {
		let mut expected_tag = VorbisComments::default();

		expected_tag.set_vendor(String::from("Lavf59.27.100"));

		expected_tag.push(String::from("ALBUM"), String::from("Baz album"));
		expected_tag.push(String::from("ARTIST"), String::from("Bar artist"));
		expected_tag.push(String::from("COMMENT"), String::from("Qux comment"));
		expected_tag.push(String::from("DATE"), String::from("1984"));
		expected_tag.push(String::from("GENRE"), String::from("Classical"));
		expected_tag.push(String::from("TITLE"), String::from("Foo title"));
		expected_tag.push(String::from("TRACKNUMBER"), String::from("1"));

		let file_cont = comment_block(
			"Lavf59.27.100",
			&[
				("ALBUM", "Baz album"),
				("ARTIST", "Bar artist"),
				("COMMENT", "Qux comment"),
				("DATE", "1984"),
				("GENRE", "Classical"),
				("TITLE", "Foo title"),
				("TRACKNUMBER", "1"),
			],
		);
		let parsed_tag = read_tag(&file_cont);

		assert_eq!(expected_tag, parsed_tag);
	}

	#[test_log::test]
	fn vorbis_comments_re_read() {
		let file_cont = comment_block(
			"Lavf59.27.100",
			&[("TITLE", "Foo title"), ("ARTIST", "Bar artist")],
		);
		let mut parsed_tag = read_tag(&file_cont);

		// Create a zero-size vendor for comparison
		parsed_tag.vendor = String::new();

		let mut writer = Vec::new();
		parsed_tag
			.dump_to(&mut writer, WriteOptions::default())
			.unwrap();

		let temp_parsed_tag = read_tag(&writer);

		assert_eq!(parsed_tag, temp_parsed_tag);
	}

	#[test_log::test]
	fn vorbis_comments_to_tag() {
		let tag_bytes = comment_block(
			"",
			&[
				("TITLE", "Foo title"),
				("ARTIST", "Bar artist"),
				("ALBUM", "Baz album"),
				("COMMENT", "Qux comment"),
				("TRACKNUMBER", "1"),
				("GENRE", "Classical"),
			],
		);
		let comments = read_tag(&tag_bytes);

		let tag: Tag = comments.into();

		crate::tag::utils::test_utils::verify_tag(&tag, true, true);
	}

	#[test_log::test]
	fn tag_to_vorbis_comments() {
		let tag = crate::tag::utils::test_utils::create_tag(TagType::VorbisComments);

		let comments: VorbisComments = tag.into();

		assert_eq!(comments.get("TITLE"), Some("Foo title"));
		assert_eq!(comments.get("ARTIST"), Some("Bar artist"));
		assert_eq!(comments.get("ALBUM"), Some("Baz album"));
		assert_eq!(comments.get("COMMENT"), Some("Qux comment"));
		assert_eq!(comments.get("TRACKNUMBER"), Some("1"));
		assert_eq!(comments.get("GENRE"), Some("Classical"));
	}

	#[test_log::test]
	fn unknown_keys_survive_tag_roundtrip() {
		let file_cont = comment_block("", &[("CUSTOM_FIELD", "Some value")]);
		let parsed_tag = read_tag(&file_cont);

		let tag: Tag = parsed_tag.into();
		assert_eq!(
			tag.get_string(&ItemKey::Unknown(String::from("CUSTOM_FIELD"))),
			Some("Some value")
		);

		let comments: VorbisComments = tag.into();
		assert_eq!(comments.get("CUSTOM_FIELD"), Some("Some value"));
	}

	#[test_log::test]
	fn zero_sized_vorbis_comments() {
		let tag_bytes = comment_block("", &[]);
		let tag = read_tag(&tag_bytes);

		assert!(tag.is_empty());
	}

	#[test_log::test]
	fn oversized_comment_length_rejected() {
		let mut tag_bytes = comment_block("", &[("TITLE", "Foo title")]);

		// Claim the comment is larger than the remaining data
		let len_offset = 4 + 4;
		tag_bytes[len_offset..len_offset + 4].copy_from_slice(&u32::MAX.to_le_bytes());

		let mut reader = Cursor::new(&tag_bytes[..]);
		let res = crate::ogg::read::read_comments(
			&mut reader,
			tag_bytes.len() as u64,
			ParseOptions::new().parsing_mode(ParsingMode::Strict),
		);

		assert!(res.is_err());
	}

	#[test_log::test]
	fn skip_reading_cover_art() {
		let mut tag = VorbisComments::default();
		tag.set_artist(String::from("Foo artist"));
		tag.insert_picture(
			crate::picture::Picture::new_unchecked(
				crate::picture::PictureType::CoverFront,
				Some(crate::picture::MimeType::Jpeg),
				None,
				std::iter::repeat_n(0, 50).collect::<Vec<u8>>(),
			),
			crate::picture::PictureInformation::default(),
		);

		let mut writer = Vec::new();
		tag.dump_to(&mut writer, WriteOptions::new()).unwrap();

		let mut reader = Cursor::new(&writer);
		let tag = crate::ogg::read::read_comments(
			&mut reader,
			writer.len() as u64,
			ParseOptions::new()
				.parsing_mode(ParsingMode::Strict)
				.read_cover_art(false),
		)
		.unwrap();

		assert_eq!(tag.pictures().len(), 0); // Artist, no picture
		assert!(tag.artist().is_some());
	}
}
