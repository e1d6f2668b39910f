//! Utilities for generic tag handling

mod accessor;
pub(crate) mod item;
pub(crate) mod pairs;
mod tag_ext;
mod tag_type;
pub(crate) mod utils;

use crate::config::WriteOptions;
use crate::error::{Result, TagError};
use crate::macros::err;
use crate::picture::{Picture, PictureType};
use crate::probe::Probe;
use crate::util::io::{FileLike, Length, Truncate};

use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

// Exports
pub use accessor::Accessor;
pub use item::{ItemKey, ItemValue, TagItem};
pub use tag_ext::TagExt;
pub use tag_type::{TagSupport, TagType};

macro_rules! impl_accessor {
	($($item_key:ident => $method:tt),+) => {
		paste::paste! {
			$(
				fn $method(&self) -> Option<Cow<'_, str>> {
					self.get_string(&ItemKey::$item_key).map(Cow::Borrowed)
				}

				fn [<set_ $method>](&mut self, value: String) {
					self.insert(TagItem::new(ItemKey::$item_key, ItemValue::Text(value)));
				}

				fn [<remove_ $method>](&mut self) {
					self.retain(|i| i.item_key != ItemKey::$item_key)
				}
			)+
		}
	}
}

/// Represents a parsed tag
///
/// `Tag` is only loosely bound to its [`TagType`]. It is the common ground
/// between the concrete tag formats, serving as the conversion target and as
/// the return type of [`read_from`](crate::read_from).
///
/// Instead of format-specific keys, items are addressed by [`ItemKey`], which
/// gives a much higher-level view of the tag than the concrete formats do.
///
/// Items keep the order they appeared in the file, and the write path keeps
/// that order on disk.
///
/// [`Tag::re_map`] rebinds a tag to another [`TagType`]. Any such conversion
/// is lossy to a varying degree.
///
/// ## Usage
///
/// The common fields have dedicated accessors:
///
/// ```rust
/// use audiotag::tag::{Accessor, Tag, TagType};
///
/// let tag = Tag::new(TagType::VorbisComments);
///
/// let title = tag.title();
/// let artist = tag.artist();
/// let album = tag.album();
/// let genre = tag.genre();
/// ```
///
/// When the value type of an item is known up front, the typed getters
/// save matching on [`ItemValue`]:
///
/// ```rust
/// use audiotag::tag::{ItemKey, Tag, TagType};
///
/// let tag = Tag::new(TagType::VorbisComments);
///
/// tag.get_string(&ItemKey::TrackTitle);
/// tag.get_binary(&ItemKey::TrackTitle, false);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
	tag_type: TagType,
	pub(crate) pictures: Vec<Picture>,
	pub(crate) items: Vec<TagItem>,
}

impl Accessor for Tag {
	impl_accessor!(
		TrackArtist => artist,
		TrackTitle  => title,
		AlbumTitle  => album,
		Genre       => genre,
		Comment     => comment
	);

	fn track(&self) -> Option<u32> {
		self.get_u32_from_string(&ItemKey::TrackNumber)
	}

	fn set_track(&mut self, value: u32) {
		self.insert_text(ItemKey::TrackNumber, value.to_string());
	}

	fn remove_track(&mut self) {
		self.remove_key(&ItemKey::TrackNumber);
	}

	fn track_total(&self) -> Option<u32> {
		self.get_u32_from_string(&ItemKey::TrackTotal)
	}

	fn set_track_total(&mut self, value: u32) {
		self.insert_text(ItemKey::TrackTotal, value.to_string());
	}

	fn remove_track_total(&mut self) {
		self.remove_key(&ItemKey::TrackTotal);
	}

	fn disk(&self) -> Option<u32> {
		self.get_u32_from_string(&ItemKey::DiscNumber)
	}

	fn set_disk(&mut self, value: u32) {
		self.insert_text(ItemKey::DiscNumber, value.to_string());
	}

	fn remove_disk(&mut self) {
		self.remove_key(&ItemKey::DiscNumber);
	}

	fn disk_total(&self) -> Option<u32> {
		self.get_u32_from_string(&ItemKey::DiscTotal)
	}

	fn set_disk_total(&mut self, value: u32) {
		self.insert_text(ItemKey::DiscTotal, value.to_string());
	}

	fn remove_disk_total(&mut self) {
		self.remove_key(&ItemKey::DiscTotal);
	}

	fn year(&self) -> Option<u32> {
		if let Some(year) = self.get_u32_from_string(&ItemKey::Year) {
			return Some(year);
		}

		// Fall back to the year segment of a full date
		let date = self.get_string(&ItemKey::RecordingDate)?;
		date.chars()
			.take_while(char::is_ascii_digit)
			.collect::<String>()
			.parse::<u32>()
			.ok()
	}

	fn set_year(&mut self, value: u32) {
		self.remove_key(&ItemKey::RecordingDate);
		self.insert_text(ItemKey::Year, value.to_string());
	}

	fn remove_year(&mut self) {
		self.remove_key(&ItemKey::Year);
		self.remove_key(&ItemKey::RecordingDate);
	}
}

impl Tag {
	/// An empty tag of the given [`TagType`]
	#[must_use]
	pub const fn new(tag_type: TagType) -> Self {
		Self {
			tag_type,
			pictures: Vec::new(),
			items: Vec::new(),
		}
	}

	/// Change the [`TagType`], remapping all items
	///
	/// Items with no mapping in the new format are removed.
	pub fn re_map(&mut self, tag_type: TagType) {
		self.retain(|i| i.re_map(tag_type));
		self.tag_type = tag_type
	}

	/// The [`TagType`] this tag's items are mapped to
	pub fn tag_type(&self) -> TagType {
		self.tag_type
	}

	/// How many [`TagItem`]s are stored
	pub fn item_count(&self) -> u32 {
		self.items.len() as u32
	}

	/// How many [`Picture`]s are stored
	pub fn picture_count(&self) -> u32 {
		self.pictures.len() as u32
	}

	/// The stored [`TagItem`]s, in file order
	pub fn items(&self) -> impl ExactSizeIterator<Item = &TagItem> + Clone {
		self.items.iter()
	}

	/// The first [`TagItem`] stored under `item_key`
	pub fn get(&self, item_key: &ItemKey) -> Option<&TagItem> {
		self.items.iter().find(|i| &i.item_key == item_key)
	}

	/// The text value of the first item stored under `item_key`
	pub fn get_string(&self, item_key: &ItemKey) -> Option<&str> {
		self.get(item_key).and_then(|i| i.value().text())
	}

	fn get_u32_from_string(&self, key: &ItemKey) -> Option<u32> {
		self.get_string(key).and_then(|text| text.parse::<u32>().ok())
	}

	/// The binary value of the first item stored under `item_key`
	///
	/// With `convert` set, [`ItemValue::Text`] and [`ItemValue::Locator`] values
	/// are handed back as their UTF-8 bytes instead of being skipped.
	pub fn get_binary(&self, item_key: &ItemKey, convert: bool) -> Option<&[u8]> {
		match self.get(item_key).map(TagItem::value) {
			Some(ItemValue::Text(text) | ItemValue::Locator(text)) if convert => {
				Some(text.as_bytes())
			},
			Some(ItemValue::Binary(binary)) => Some(binary),
			_ => None,
		}
	}

	/// Insert a [`TagItem`], replacing any existing one of the same [`ItemKey`]
	///
	/// The item is first checked against the target [`TagType`], and only
	/// stored if its [`ItemKey`] has a mapping there.
	///
	/// Returns `true` if the item was stored.
	pub fn insert(&mut self, item: TagItem) -> bool {
		if !item.re_map(self.tag_type) {
			return false;
		}

		self.insert_unchecked(item);
		true
	}

	/// Insert a [`TagItem`] without checking its [`ItemKey`] mapping
	///
	/// Unlike [`Tag::insert`], the key is not validated against the target
	/// [`TagType`] here. Out-of-spec keys still won't make it to disk, every
	/// key is checked again at write time.
	pub fn insert_unchecked(&mut self, item: TagItem) {
		self.retain(|i| i.item_key != item.item_key);
		self.items.push(item);
	}

	/// Append a [`TagItem`] to the tag
	///
	/// Existing items of the same [`ItemKey`] are kept, unlike with
	/// [`Tag::insert`]. The key still has to map into the target [`TagType`].
	///
	/// Not every format accepts duplicate keys, formats that don't will
	/// keep the first matching item when written.
	///
	/// Returns `true` if the item was stored.
	pub fn push(&mut self, item: TagItem) -> bool {
		if !item.re_map(self.tag_type) {
			return false;
		}

		self.items.push(item);
		true
	}

	/// Append a [`TagItem`] without checking its [`ItemKey`] mapping
	///
	/// See [`Tag::push()`] and [`Tag::insert_unchecked()`].
	pub fn push_unchecked(&mut self, item: TagItem) {
		self.items.push(item);
	}

	/// Store a text value directly, without building a [`TagItem`] first
	///
	/// Any existing item under `item_key` is replaced, see [`Tag::insert`].
	pub fn insert_text(&mut self, item_key: ItemKey, text: String) -> bool {
		self.insert(TagItem::new(item_key, ItemValue::Text(text)))
	}

	/// Remove every item stored under `key`, yielding them to the caller
	pub fn take(&mut self, key: &ItemKey) -> impl Iterator<Item = TagItem> + use<'_> {
		// Partition matching items to the front, then drain them off
		let mut matched = 0_usize;

		for idx in 0..self.items.len() {
			if self.items[idx].key() == key {
				self.items.swap(matched, idx);
				matched += 1;
			}
		}

		self.items.drain(..matched)
	}

	/// Like [`Tag::take`], but keeps only items that pass [`ItemValue::into_string`]
	pub fn take_strings(&mut self, key: &ItemKey) -> impl Iterator<Item = String> + use<'_> {
		self.take(key).filter_map(|i| i.item_value.into_string())
	}

	/// Every [`TagItem`] stored under `key`, in file order
	pub fn get_items<'a>(&'a self, key: &'a ItemKey) -> impl Iterator<Item = &'a TagItem> + Clone {
		self.items.iter().filter(move |i| i.key() == key)
	}

	/// The [`ItemValue::Text`] contents of every item stored under `key`
	pub fn get_strings<'a>(&'a self, key: &'a ItemKey) -> impl Iterator<Item = &'a str> + Clone {
		self.get_items(key).filter_map(|i| i.value().text())
	}

	/// The [`ItemValue::Binary`] contents of every item stored under `key`
	pub fn get_bytes<'a>(&'a self, key: &'a ItemKey) -> impl Iterator<Item = &'a [u8]> + Clone {
		self.get_items(key).filter_map(|i| i.value().binary())
	}

	/// Drop every item stored under `key`, discarding the values
	pub fn remove_key(&mut self, key: &ItemKey) {
		self.items.retain(|i| i.key() != key)
	}

	/// Keep only the items for which `f` returns `true`
	pub fn retain<F>(&mut self, f: F)
	where
		F: FnMut(&TagItem) -> bool,
	{
		self.items.retain(f)
	}

	/// Drop every item whose value is empty
	pub fn remove_empty(&mut self) {
		self.items.retain(|item| !item.value().is_empty());
	}

	/// The stored [`Picture`]s
	pub fn pictures(&self) -> &[Picture] {
		&self.pictures
	}

	/// The first stored [`Picture`] of the given [`PictureType`]
	pub fn get_picture_type(&self, picture_type: PictureType) -> Option<&Picture> {
		self.pictures
			.iter()
			.find(|picture| picture.pic_type() == picture_type)
	}

	/// Append a [`Picture`]
	pub fn push_picture(&mut self, picture: Picture) {
		self.pictures.push(picture)
	}

	/// Drop every [`Picture`] of the given [`PictureType`]
	pub fn remove_picture_type(&mut self, picture_type: PictureType) {
		self.pictures.retain(|p| p.pic_type != picture_type)
	}

	/// Replace the picture at `index`
	///
	/// An out-of-bounds `index` appends the picture instead.
	pub fn set_picture(&mut self, index: usize, picture: Picture) {
		match self.pictures.get_mut(index) {
			Some(slot) => *slot = picture,
			None => self.push_picture(picture),
		}
	}

	/// Remove and return the picture at `index`
	///
	/// # Panics
	///
	/// Panics when `index` is out of bounds.
	pub fn remove_picture(&mut self, index: usize) -> Picture {
		self.pictures.remove(index)
	}
}

impl TagExt for Tag {
	type Err = TagError;
	type RefKey<'a> = &'a ItemKey;

	#[inline]
	fn tag_type(&self) -> TagType {
		self.tag_type
	}

	fn len(&self) -> usize {
		self.items.len() + self.pictures.len()
	}

	fn contains<'a>(&'a self, key: Self::RefKey<'a>) -> bool {
		self.items.iter().any(|item| item.key() == key)
	}

	fn is_empty(&self) -> bool {
		self.items.is_empty() && self.pictures.is_empty()
	}

	/// Write the `Tag` to a [`FileLike`]
	///
	/// # Errors
	///
	/// * The [`FileType`](crate::file::FileType) of the stream can't be guessed
	/// * The format doesn't accept this tag type, see [`FileType::tag_support()`](crate::file::FileType::tag_support)
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
		let probe = Probe::new(file).guess_file_type()?;

		let Some(file_type) = probe.file_type() else {
			err!(UnknownFormat);
		};

		match file_type.tag_support(self.tag_type) {
			TagSupport::ReadWrite => {},
			TagSupport::ReadOnly => err!(NotWritable),
			TagSupport::Unsupported => err!(UnsupportedTag),
		}

		utils::write_tag(self, probe.into_inner(), file_type, write_options)
	}

	fn dump_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		utils::dump_tag(self, writer, write_options)
	}

	/// Strip this tag type from the file at `path`
	///
	/// # Errors
	///
	/// See [`TagType::remove_from`]
	fn remove_from_path<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), Self::Err> {
		self.tag_type.remove_from_path(path)
	}

	/// Strip this tag type from a [`FileLike`]
	///
	/// # Errors
	///
	/// See [`TagType::remove_from`]
	fn remove_from<F>(&self, file: &mut F) -> std::result::Result<(), Self::Err>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		self.tag_type.remove_from(file)
	}

	fn clear(&mut self) {
		self.items.clear();
		self.pictures.clear();
	}
}

#[cfg(test)]
mod tests {
	use crate::prelude::*;
	use crate::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};

	#[test_log::test]
	fn should_preserve_empty_title() {
		let mut tag = Tag::new(TagType::VorbisComments);
		tag.set_title(String::from("Foo title"));

		assert_eq!(tag.title().as_deref(), Some("Foo title"));

		tag.set_title(String::new());
		assert_eq!(tag.title().as_deref(), Some(""));

		tag.remove_title();
		assert_eq!(tag.title(), None);
	}

	#[test_log::test]
	fn insertion_order_preserved() {
		let mut tag = Tag::new(TagType::VorbisComments);
		tag.push(TagItem::new(
			ItemKey::TrackTitle,
			ItemValue::Text(String::from("Title")),
		));
		tag.push(TagItem::new(
			ItemKey::Unknown(String::from("CUSTOM")),
			ItemValue::Text(String::from("custom value")),
		));
		tag.push(TagItem::new(
			ItemKey::TrackArtist,
			ItemValue::Text(String::from("Artist")),
		));

		let keys = tag.items().map(TagItem::key).collect::<Vec<_>>();
		assert_eq!(
			keys,
			vec![
				&ItemKey::TrackTitle,
				&ItemKey::Unknown(String::from("CUSTOM")),
				&ItemKey::TrackArtist
			]
		);
	}

	#[test_log::test]
	fn year_from_date() {
		let mut tag = Tag::new(TagType::VorbisComments);
		tag.insert_text(ItemKey::RecordingDate, String::from("2007-08-09"));

		assert_eq!(tag.year(), Some(2007));
	}
}
