pub(crate) mod item;
pub(crate) mod read;
mod write;

use crate::ape::APE_PICTURE_TYPES;
use crate::ape::tag::item::{ApeItem, ApeItemRef};
use crate::config::WriteOptions;
use crate::error::{Result, TagError};
use crate::file::FileType;
use crate::picture::Picture;
use crate::tag::item::ItemValueRef;
use crate::tag::pairs::{NUMBER_PAIR_KEYS, NUMBER_PAIR_SEPARATOR, format_number_pair, set_number};
use crate::tag::{Accessor, ItemKey, ItemValue, Tag, TagExt, TagItem, TagType};
use crate::util::flag_item;
use crate::util::io::{FileLike, Length, Truncate};

use std::borrow::Cow;
use std::io::Write;

macro_rules! impl_accessor {
	($($method:ident => $($key:literal)|+;)+) => {
		paste::paste! {
			$(
				fn $method(&self) -> Option<Cow<'_, str>> {
					$(
						if let Some(ItemValue::Text(text)) = self.get($key).map(ApeItem::value) {
							return Some(Cow::Borrowed(text));
						}
					)+

					None
				}

				fn [<set_ $method>](&mut self, value: String) {
					self.insert(ApeItem {
						read_only: false,
						key: String::from(crate::tag::item::first_key!($($key)|*)),
						value: ItemValue::Text(value)
					})
				}

				fn [<remove_ $method>](&mut self) {
					$(
						self.remove($key);
					)+
				}
			)+
		}
	}
}

/// An `APE` tag
///
/// ## Item storage
///
/// `APE` places almost no restrictions on its items. Only the item *key* is
/// validated; the value may be any [`ItemValue`](crate::tag::ItemValue) variant,
/// which most other formats cannot say.
///
/// Pictures live in ordinary [`ItemValue::Binary`](crate::tag::ItemValue::Binary) items
/// under one of the keys in [`APE_PICTURE_TYPES`], and decode through
/// [`Picture::from_ape_bytes()`].
///
/// ## Conversions
///
/// ### To `Tag`
///
/// "Track" and "Disc" items split into their number and total halves, and
/// binary items under a picture key become [`Picture`]s. Every other item
/// carries over 1:1, keys without a known mapping becoming [`ItemKey::Unknown`].
///
/// ### From `Tag`
///
/// A [`TagItem`] becomes an [`ApeItem`] whenever its [`ItemKey`] has an APE
/// mapping and that key passes validation.
///
/// Pictures whose [`PictureType`](crate::picture::PictureType) has no APE key
/// equivalent are discarded, as the key is the only way to tell pictures apart.
///
/// [`Picture::from_ape_bytes()`]: crate::picture::Picture::from_ape_bytes
/// [`APE_PICTURE_TYPES`]: crate::ape::APE_PICTURE_TYPES
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct ApeTag {
	/// Whether or not to mark the tag as read only
	pub read_only: bool,
	pub(super) items: Vec<ApeItem>,
}

impl ApeTag {
	pub(crate) const SUPPORTED_FORMATS: &'static [FileType] = &[FileType::TrueAudio];
	pub(crate) const READ_ONLY_FORMATS: &'static [FileType] = &[];

	/// An empty `APE` tag
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ape::ApeTag;
	/// use audiotag::tag::TagExt;
	///
	/// let ape_tag = ApeTag::new();
	/// assert!(ape_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Get an [`ApeItem`] by key
	///
	/// NOTE: `APE` keys are nominally case-sensitive, but almost no writer
	/// honors that, so the search here ignores case.
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ape::ApeTag;
	/// use audiotag::tag::Accessor;
	///
	/// let mut ape_tag = ApeTag::new();
	/// ape_tag.set_title(String::from("Foo title"));
	///
	/// // Get the title by its key
	/// let title = ape_tag.get("Title");
	/// assert!(title.is_some());
	/// ```
	pub fn get(&self, key: &str) -> Option<&ApeItem> {
		self.items
			.iter()
			.find(|i| i.key().eq_ignore_ascii_case(key))
	}

	/// Insert an [`ApeItem`]
	///
	/// Any existing item under the same key is removed first
	pub fn insert(&mut self, value: ApeItem) {
		self.remove(value.key());
		self.items.push(value);
	}

	/// Remove an [`ApeItem`] by key
	///
	/// NOTE: Like [`ApeTag::get`], this is not case-sensitive
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ape::ApeTag;
	/// use audiotag::tag::Accessor;
	///
	/// let mut ape_tag = ApeTag::new();
	/// ape_tag.set_title(String::from("Foo title"));
	/// assert!(ape_tag.get("Title").is_some());
	///
	/// ape_tag.remove("Title");
	/// assert!(ape_tag.get("Title").is_none());
	/// ```
	pub fn remove(&mut self, key: &str) {
		self.items.retain(|i| !i.key().eq_ignore_ascii_case(key));
	}

	fn insert_item(&mut self, item: TagItem) {
		match item.key() {
			ItemKey::TrackNumber => set_number(&item, |number| self.set_track(number)),
			ItemKey::TrackTotal => set_number(&item, |number| self.set_track_total(number)),
			ItemKey::DiscNumber => set_number(&item, |number| self.set_disk(number)),
			ItemKey::DiscTotal => set_number(&item, |number| self.set_disk_total(number)),

			// Normalize flag items
			ItemKey::FlagCompilation => {
				let Some(flag) = item.value().text().and_then(flag_item) else {
					return;
				};

				self.insert(ApeItem::text("Compilation", u8::from(flag).to_string()));
			},
			_ => {
				if let Ok(item) = item.try_into() {
					self.insert(item);
				}
			},
		}
	}

	fn split_num_pair(&self, key: &str) -> (Option<u32>, Option<u32>) {
		let Some(ItemValue::Text(text)) = self.get(key).map(ApeItem::value) else {
			return (None, None);
		};

		let mut halves = text
			.split(NUMBER_PAIR_SEPARATOR)
			.flat_map(str::parse::<u32>);
		(halves.next(), halves.next())
	}

	fn insert_number_pair(&mut self, key: &'static str, number: Option<u32>, total: Option<u32>) {
		match format_number_pair(number, total) {
			Some(value) => self.insert(ApeItem::text(key, value)),
			None => log::warn!("{key} is not set. number: {number:?}, total: {total:?}"),
		}
	}
}

impl IntoIterator for ApeTag {
	type Item = ApeItem;
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

impl<'a> IntoIterator for &'a ApeTag {
	type Item = &'a ApeItem;
	type IntoIter = std::slice::Iter<'a, ApeItem>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

impl Accessor for ApeTag {
	impl_accessor!(
		artist  => "Artist";
		title   => "Title";
		album   => "Album";
		genre   => "Genre";
		comment => "Comment";
	);

	fn track(&self) -> Option<u32> {
		self.split_num_pair("Track").0
	}

	fn set_track(&mut self, value: u32) {
		self.insert_number_pair("Track", Some(value), self.track_total());
	}

	fn remove_track(&mut self) {
		self.remove("Track");
	}

	fn track_total(&self) -> Option<u32> {
		self.split_num_pair("Track").1
	}

	fn set_track_total(&mut self, value: u32) {
		self.insert_number_pair("Track", self.track(), Some(value));
	}

	fn remove_track_total(&mut self) {
		let number = self.track();
		self.remove("Track");

		if let Some(number) = number {
			self.insert(ApeItem::text("Track", number.to_string()));
		}
	}

	fn disk(&self) -> Option<u32> {
		self.split_num_pair("Disc").0
	}

	fn set_disk(&mut self, value: u32) {
		self.insert_number_pair("Disc", Some(value), self.disk_total());
	}

	fn remove_disk(&mut self) {
		self.remove("Disc");
	}

	fn disk_total(&self) -> Option<u32> {
		self.split_num_pair("Disc").1
	}

	fn set_disk_total(&mut self, value: u32) {
		self.insert_number_pair("Disc", self.disk(), Some(value));
	}

	fn remove_disk_total(&mut self) {
		let number = self.disk();
		self.remove("Disc");

		if let Some(number) = number {
			self.insert(ApeItem::text("Disc", number.to_string()));
		}
	}

	// For some reason, the ecosystem agreed on the key "Year", even for full date strings.
	fn year(&self) -> Option<u32> {
		let Some(ItemValue::Text(text)) = self.get("Year").map(ApeItem::value) else {
			return None;
		};

		let digits = text
			.chars()
			.take_while(char::is_ascii_digit)
			.collect::<String>();
		digits.parse::<u32>().ok()
	}

	fn set_year(&mut self, value: u32) {
		self.insert(ApeItem::text("Year", value.to_string()));
	}

	fn remove_year(&mut self) {
		self.remove("Year");
	}
}

impl TagExt for ApeTag {
	type Err = TagError;
	type RefKey<'a> = &'a str;

	#[inline]
	fn tag_type(&self) -> TagType {
		TagType::Ape
	}

	fn len(&self) -> usize {
		self.items.len()
	}

	fn contains<'a>(&'a self, key: Self::RefKey<'a>) -> bool {
		self.items.iter().any(|i| i.key().eq_ignore_ascii_case(key))
	}

	fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Write the tag to a file
	///
	/// # Errors
	///
	/// * The target format doesn't accept `APE` tags
	/// * A tag already in the file declares an invalid size
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
		self.as_ref().dump_to(writer, write_options)
	}

	fn clear(&mut self) {
		self.items.clear();
	}
}

impl ApeTag {
	fn as_ref(&self) -> ApeTagRef<'_, impl Iterator<Item = ApeItemRef<'_>>> {
		ApeTagRef {
			read_only: self.read_only,
			items: self.items.iter().map(Into::into),
		}
	}
}

impl From<ApeTag> for Tag {
	fn from(input: ApeTag) -> Self {
		fn split_pair(
			content: &str,
			tag: &mut Tag,
			number_key: ItemKey,
			total_key: ItemKey,
		) -> Option<()> {
			let mut halves = content.splitn(2, NUMBER_PAIR_SEPARATOR);

			let number = halves.next()?.to_string();
			tag.items
				.push(TagItem::new(number_key, ItemValue::Text(number)));

			if let Some(total) = halves.next() {
				tag.items
					.push(TagItem::new(total_key, ItemValue::Text(total.to_string())))
			}

			Some(())
		}

		fn try_take_picture(item: &ApeItem, tag: &mut Tag) -> bool {
			let ItemValue::Binary(binary) = &item.value else {
				return false;
			};

			let under_picture_key = APE_PICTURE_TYPES
				.iter()
				.any(|key| key.eq_ignore_ascii_case(item.key()));
			if !under_picture_key {
				return false;
			}

			match Picture::from_ape_bytes(item.key(), binary) {
				Ok(picture) => {
					tag.push_picture(picture);
					true
				},
				Err(_) => false,
			}
		}

		let mut tag = Tag::new(TagType::Ape);

		for item in input.items {
			if try_take_picture(&item, &mut tag) {
				continue;
			}

			let item_key = ItemKey::from_key(TagType::Ape, item.key());

			// The text pairs need some special treatment
			if let ItemValue::Text(val) = &item.value {
				let split = match item_key {
					ItemKey::TrackNumber | ItemKey::TrackTotal => {
						split_pair(val, &mut tag, ItemKey::TrackNumber, ItemKey::TrackTotal)
					},
					ItemKey::DiscNumber | ItemKey::DiscTotal => {
						split_pair(val, &mut tag, ItemKey::DiscNumber, ItemKey::DiscTotal)
					},
					_ => None,
				};

				if split.is_some() {
					continue;
				}
			}

			tag.items.push(TagItem::new(item_key, item.value));
		}

		tag
	}
}

impl From<Tag> for ApeTag {
	fn from(input: Tag) -> Self {
		let mut ape_tag = ApeTag::default();

		for item in input.items {
			ape_tag.insert_item(item);
		}

		for picture in input.pictures {
			let pic_type = picture.pic_type();
			let Some(key) = pic_type.as_ape_key() else {
				continue;
			};

			if let Ok(item) =
				ApeItem::new(key.to_string(), ItemValue::Binary(picture.as_ape_bytes()))
			{
				ape_tag.insert(item)
			}
		}

		ape_tag
	}
}

pub(crate) struct ApeTagRef<'a, I>
where
	I: Iterator<Item = ApeItemRef<'a>>,
{
	pub(crate) read_only: bool,
	pub(crate) items: I,
}

impl<'a, I> ApeTagRef<'a, I>
where
	I: Iterator<Item = ApeItemRef<'a>>,
{
	pub(crate) fn write_to<F>(&mut self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		TagError: From<<F as Truncate>::Error>,
		TagError: From<<F as Length>::Error>,
	{
		write::write_to(file, self, write_options)
	}

	pub(crate) fn dump_to<W: Write>(
		&mut self,
		writer: &mut W,
		write_options: WriteOptions,
	) -> Result<()> {
		let image = write::create_ape_tag(self, std::iter::empty(), write_options)?;
		writer.write_all(&image)?;

		Ok(())
	}
}

pub(crate) fn tagitems_into_ape(tag: &Tag) -> impl Iterator<Item = ApeItemRef<'_>> {
	fn number_pair_ref<'a>(
		number: Option<&str>,
		total: Option<&str>,
		key: &'a str,
	) -> Option<ApeItemRef<'a>> {
		format_number_pair(number, total).map(|value| ApeItemRef {
			read_only: false,
			key,
			value: ItemValueRef::Text(Cow::Owned(value)),
		})
	}

	let mapped = tag
		.items()
		.filter(|item| !NUMBER_PAIR_KEYS.contains(item.key()))
		.filter_map(|i| {
			i.key().map_key(TagType::Ape).map(|key| ApeItemRef {
				read_only: false,
				key,
				value: i.value().into(),
			})
		});

	let track = number_pair_ref(
		tag.get_string(&ItemKey::TrackNumber),
		tag.get_string(&ItemKey::TrackTotal),
		"Track",
	);
	let disc = number_pair_ref(
		tag.get_string(&ItemKey::DiscNumber),
		tag.get_string(&ItemKey::DiscTotal),
		"Disc",
	);

	mapped.chain(track).chain(disc)
}

#[cfg(test)]
mod tests {
	use crate::ape::{ApeItem, ApeTag};
	use crate::config::{ParseOptions, WriteOptions};
	use crate::prelude::*;
	use crate::tag::{ItemValue, Tag, TagType};

	use std::io::Cursor;

	fn test_tag() -> ApeTag {
		let mut tag = ApeTag::default();

		for (key, value) in [
			("Title", "Foo title"),
			("Artist", "Bar artist"),
			("Album", "Baz album"),
			("Comment", "Qux comment"),
			("Year", "1984"),
			("Track", "1"),
			("Genre", "Classical"),
		] {
			tag.insert(
				ApeItem::new(String::from(key), ItemValue::Text(String::from(value))).unwrap(),
			);
		}

		tag
	}

	fn dump(tag: &ApeTag) -> Vec<u8> {
		let mut writer = Vec::new();
		tag.dump_to(&mut writer, WriteOptions::default()).unwrap();
		writer
	}

	#[test_log::test]
	fn ape_re_read() {
		let tag = test_tag();

		let mut reader = Cursor::new(dump(&tag));

		let (Some(parsed_tag), _) =
			crate::ape::tag::read::read_ape_tag(&mut reader, false, ParseOptions::new()).unwrap()
		else {
			unreachable!();
		};

		assert_eq!(tag, parsed_tag);
	}

	#[test_log::test]
	fn ape_to_tag() {
		let tag: Tag = test_tag().into();

		assert_eq!(tag.get_string(&ItemKey::TrackTitle), Some("Foo title"));
		assert_eq!(tag.get_string(&ItemKey::TrackArtist), Some("Bar artist"));
		assert_eq!(tag.get_string(&ItemKey::AlbumTitle), Some("Baz album"));
		assert_eq!(tag.get_string(&ItemKey::Comment), Some("Qux comment"));
		assert_eq!(tag.get_string(&ItemKey::TrackNumber), Some("1"));
		assert_eq!(tag.get_string(&ItemKey::Genre), Some("Classical"));
	}

	#[test_log::test]
	fn tag_to_ape() {
		let tag = crate::tag::utils::test_utils::create_tag(TagType::Ape);

		let ape_tag: ApeTag = tag.into();

		assert_eq!(ape_tag.title().as_deref(), Some("Foo title"));
		assert_eq!(ape_tag.artist().as_deref(), Some("Bar artist"));
		assert_eq!(ape_tag.album().as_deref(), Some("Baz album"));
		assert_eq!(ape_tag.comment().as_deref(), Some("Qux comment"));
		assert_eq!(ape_tag.track(), Some(1));
		assert_eq!(ape_tag.genre().as_deref(), Some("Classical"));
	}

	#[test_log::test]
	fn number_pairs_split_on_conversion() {
		let mut ape_tag = ApeTag::default();
		ape_tag.insert(ApeItem::text("Track", String::from("3/12")));
		ape_tag.insert(ApeItem::text("Disc", String::from("1/2")));

		let tag: Tag = ape_tag.into();

		assert_eq!(tag.get_string(&ItemKey::TrackNumber), Some("3"));
		assert_eq!(tag.get_string(&ItemKey::TrackTotal), Some("12"));
		assert_eq!(tag.get_string(&ItemKey::DiscNumber), Some("1"));
		assert_eq!(tag.get_string(&ItemKey::DiscTotal), Some("2"));
	}

	#[test_log::test]
	fn set_track_total_without_track() {
		let mut ape_tag = ApeTag::default();
		ape_tag.set_track_total(12);

		assert_eq!(ape_tag.track(), Some(0));
		assert_eq!(ape_tag.track_total(), Some(12));

		if let Some(item) = ape_tag.get("Track") {
			assert_eq!(item.value(), &ItemValue::Text(String::from("0/12")));
		} else {
			unreachable!();
		}
	}

	#[test_log::test]
	fn case_insensitive_lookup() {
		let tag = test_tag();

		assert!(tag.get("TITLE").is_some());
		assert!(tag.contains("artist"));
	}

	#[test_log::test]
	fn read_only_items_survive_re_read() {
		let mut tag = ApeTag::default();

		let mut item = ApeItem::new(
			String::from("Copyright"),
			ItemValue::Text(String::from("1984 Foo Records")),
		)
		.unwrap();
		item.read_only = true;

		tag.insert(item);

		let mut reader = Cursor::new(dump(&tag));

		let (Some(parsed_tag), _) =
			crate::ape::tag::read::read_ape_tag(&mut reader, false, ParseOptions::new()).unwrap()
		else {
			unreachable!();
		};

		assert!(parsed_tag.get("Copyright").is_some_and(|i| i.read_only));
	}
}
