use crate::tag::TagType;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

macro_rules! first_key {
	($key:tt $(| $remaining:expr)*) => {
		$key
	};
}

pub(crate) use first_key;

// Expands to one of the format key <-> ItemKey maps.
//
// The map name comes first, then `"format key" => Variant` pairs.
//
// `|` joins aliases on either side: several format keys may feed one
// variant, and one key may serve several variants. Order matters both
// ways. Standard keys go before non-standard aliases, and when one key
// covers multiple variants, the most applicable variant leads.
macro_rules! gen_map {
	(
		$NAME:ident;

		$(
			$($key:literal)|+ => $($variant:ident)|+
		),+ $(,)?
	) => {
		#[allow(non_camel_case_types)]
		struct $NAME;

		impl $NAME {
			pub(crate) fn get_item_key(&self, key: &str) -> Option<ItemKey> {
				// Keyed by the uppercased form, lookups ignore case
				static MAP: OnceLock<HashMap<String, ItemKey>> = OnceLock::new();
				let map = MAP.get_or_init(|| {
					let mut map = HashMap::new();
					$(
						let variants: &[ItemKey] = &[$(ItemKey::$variant),+];
						$(
							// Where one key applies to several variants, the
							// first registered wins
							map.entry($key.to_ascii_uppercase())
								.or_insert_with(|| variants[0].clone());
						)+
					)+
					map
				});

				map.get(&key.to_ascii_uppercase()).cloned()
			}

			pub(crate) fn get_key(&self, item_key: &ItemKey) -> Option<&'static str> {
				match item_key {
					$(
						$(ItemKey::$variant)|+ => Some(first_key!($($key)|*)),
					)+
					_ => None
				}
			}
		}
	}
}

gen_map!(
	APE_MAP;

	"Album"                          => AlbumTitle,
	"Title"                          => TrackTitle,
	"Subtitle"                       => TrackSubtitle,
	"Album Artist" | "ALBUMARTIST"   => AlbumArtist,
	"Artist"                         => TrackArtist,
	"Arranger"                       => Arranger,
	"Writer"                         => Writer,
	"Composer"                       => Composer,
	"Conductor"                      => Conductor,
	"Engineer"                       => Engineer,
	"Lyricist"                       => Lyricist,
	"Performer"                      => Performer,
	"Producer"                       => Producer,
	"Label"                          => Label,
	"MixArtist"                      => Remixer,
	"Disc"                           => DiscNumber,
	"Disc"                           => DiscTotal,
	"Track"                          => TrackNumber,
	"Track"                          => TrackTotal,
	// For some reason, the ecosystem agreed on the key "Year", even for full date strings.
	"Year"                           => RecordingDate | Year,
	"ISRC"                           => Isrc,
	"Barcode"                        => Barcode,
	"CatalogNumber"                  => CatalogNumber,
	"Compilation"                    => FlagCompilation,
	"Media"                          => OriginalMediaType,
	"EncodedBy"                      => EncodedBy,
	"REPLAYGAIN_ALBUM_GAIN"          => ReplayGainAlbumGain,
	"REPLAYGAIN_ALBUM_PEAK"          => ReplayGainAlbumPeak,
	"REPLAYGAIN_TRACK_GAIN"          => ReplayGainTrackGain,
	"REPLAYGAIN_TRACK_PEAK"          => ReplayGainTrackPeak,
	"Genre"                          => Genre,
	"Mood"                           => Mood,
	"Copyright"                      => CopyrightMessage,
	"Comment"                        => Comment,
	"language"                       => Language,
	"Lyrics"                         => Lyrics
);

gen_map!(
	VORBIS_MAP;

	"ALBUM"                                   => AlbumTitle,
	"TITLE"                                   => TrackTitle,
	"SUBTITLE"                                => TrackSubtitle,
	"ALBUMARTIST"  | "ALBUM ARTIST"           => AlbumArtist,
	"ARTIST"                                  => TrackArtist,
	"ARRANGER"                                => Arranger,
	"AUTHOR" | "WRITER"                       => Writer,
	"COMPOSER"                                => Composer,
	"CONDUCTOR"                               => Conductor,
	"ENGINEER"                                => Engineer,
	"LYRICIST"                                => Lyricist,
	"PERFORMER"                               => Performer,
	"PRODUCER"                                => Producer,
	"LABEL" | "ORGANIZATION"                  => Label,
	"REMIXER" | "MIXARTIST"                   => Remixer,
	"DISCNUMBER"                              => DiscNumber,
	"DISCTOTAL" | "TOTALDISCS"                => DiscTotal,
	"TRACKNUMBER"                             => TrackNumber,
	"TRACKTOTAL" | "TOTALTRACKS"              => TrackTotal,
	"DATE"                                    => RecordingDate,
	"YEAR"                                    => Year,
	"ISRC"                                    => Isrc,
	"BARCODE"                                 => Barcode,
	"CATALOGNUMBER"                           => CatalogNumber,
	"COMPILATION"                             => FlagCompilation,
	"MEDIA"                                   => OriginalMediaType,
	"ENCODEDBY" | "ENCODED-BY" | "ENCODED_BY" => EncodedBy,
	"REPLAYGAIN_ALBUM_GAIN"                   => ReplayGainAlbumGain,
	"REPLAYGAIN_ALBUM_PEAK"                   => ReplayGainAlbumPeak,
	"REPLAYGAIN_TRACK_GAIN"                   => ReplayGainTrackGain,
	"REPLAYGAIN_TRACK_PEAK"                   => ReplayGainTrackPeak,
	"GENRE"                                   => Genre,
	"MOOD"                                    => Mood,
	"COPYRIGHT"                               => CopyrightMessage,
	"COMMENT"                                 => Comment,
	"DESCRIPTION"                             => Description,
	"LANGUAGE"                                => Language,
	"LYRICS"                                  => Lyrics
);

/// A generic representation of a tag's key
///
/// Keys a format does not define a mapping for are preserved verbatim
/// in the [`ItemKey::Unknown`] variant, so a read/modify/write cycle will
/// never discard fields it does not recognize.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum ItemKey {
	// Titles
	AlbumTitle,
	TrackTitle,
	TrackSubtitle,

	// People and organizations
	AlbumArtist,
	TrackArtist,
	Arranger,
	Writer,
	Composer,
	Conductor,
	Engineer,
	Lyricist,
	Performer,
	Producer,
	Label,
	Remixer,

	// Counts and indexes
	DiscNumber,
	DiscTotal,
	TrackNumber,
	TrackTotal,

	// Dates
	/// Recording date
	///
	/// Most applications treat this as the *release* date, standard or not.
	RecordingDate,
	/// Release year
	///
	/// Rarely used, but it does turn up in the wild. A full date field like
	/// [`ItemKey::RecordingDate`] has far wider application support.
	Year,

	// Identifiers
	Isrc,
	Barcode,
	CatalogNumber,

	// Flags
	FlagCompilation,

	// Source media
	OriginalMediaType,

	// Encoder information
	EncodedBy,
	ReplayGainAlbumGain,
	ReplayGainAlbumPeak,
	ReplayGainTrackGain,
	ReplayGainTrackPeak,

	// Style
	Genre,
	Mood,

	// Legal
	CopyrightMessage,

	// Miscellaneous
	Comment,
	Description,
	Language,
	Lyrics,

	/// A format-specific key with no generic mapping
	///
	/// The string is the key exactly as it appeared in the file.
	Unknown(String),
}

impl ItemKey {
	/// Map a format specific key to an `ItemKey`
	///
	/// Keys with no mapping for `tag_type` are preserved as [`ItemKey::Unknown`].
	pub fn from_key(tag_type: TagType, key: &str) -> Self {
		let mapped = match tag_type {
			TagType::Ape => APE_MAP.get_item_key(key),
			TagType::VorbisComments => VORBIS_MAP.get_item_key(key),
			// ID3v1 has fixed fields rather than keys, its conversions are special-cased
			TagType::Id3v1 => None,
		};

		mapped.unwrap_or_else(|| Self::Unknown(key.to_owned()))
	}

	/// Maps the variant to a format-specific key
	///
	/// [`ItemKey::Unknown`] always maps to its stored string.
	pub fn map_key(&self, tag_type: TagType) -> Option<&str> {
		if let Self::Unknown(key) = self {
			return Some(key);
		}

		match tag_type {
			TagType::Ape => APE_MAP.get_key(self),
			TagType::VorbisComments => VORBIS_MAP.get_key(self),
			TagType::Id3v1 => None,
		}
	}
}

/// The payload of a tag item
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemValue {
	/// UTF-8 encoded text
	Text(String),
	/// A UTF-8 encoded link to external information
	///
	/// Only `APE` distinguishes locators on disk, everywhere else they
	/// are written as plain text.
	Locator(String),
	/// Raw bytes
	Binary(Vec<u8>),
}

impl ItemValue {
	/// The contained text, for a `Text` value
	pub fn text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}

	/// The contained locator, for a `Locator` value
	pub fn locator(&self) -> Option<&str> {
		match self {
			Self::Locator(locator) => Some(locator),
			_ => None,
		}
	}

	/// The contained bytes, for a `Binary` value
	pub fn binary(&self) -> Option<&[u8]> {
		match self {
			Self::Binary(bin) => Some(bin),
			_ => None,
		}
	}

	/// Unwrap a `Text` or `Locator` value into its `String`
	pub fn into_string(self) -> Option<String> {
		match self {
			Self::Text(s) | Self::Locator(s) => Some(s),
			_ => None,
		}
	}

	/// Unwrap a `Binary` value into its `Vec<u8>`
	pub fn into_binary(self) -> Option<Vec<u8>> {
		match self {
			Self::Binary(b) => Some(b),
			_ => None,
		}
	}

	/// Whether the payload holds zero bytes of content
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Binary(binary) => binary.is_empty(),
			Self::Locator(locator) => locator.is_empty(),
			Self::Text(text) => text.is_empty(),
		}
	}
}

pub(crate) enum ItemValueRef<'a> {
	Text(Cow<'a, str>),
	Locator(&'a str),
	Binary(&'a [u8]),
}

impl<'a> From<&'a ItemValue> for ItemValueRef<'a> {
	fn from(input: &'a ItemValue) -> Self {
		match input {
			ItemValue::Text(text) => ItemValueRef::Text(Cow::Borrowed(text)),
			ItemValue::Locator(locator) => ItemValueRef::Locator(locator),
			ItemValue::Binary(binary) => ItemValueRef::Binary(binary),
		}
	}
}

/// One key/value entry of a [`Tag`](crate::tag::Tag)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagItem {
	pub(crate) item_key: ItemKey,
	pub(crate) item_value: ItemValue,
}

impl TagItem {
	/// Build a [`TagItem`], verifying the key maps into `tag_type`
	///
	/// Returns `None` for an [`ItemKey`] with no equivalent in the target
	/// format. [`Tag::insert`](crate::tag::Tag::insert) performs the same
	/// check itself, so this is only needed when bypassing it.
	pub fn new_checked(
		tag_type: TagType,
		item_key: ItemKey,
		item_value: ItemValue,
	) -> Option<Self> {
		item_key
			.map_key(tag_type)
			.is_some()
			.then_some(Self::new(item_key, item_value))
	}

	/// Build a [`TagItem`] without any key checks
	#[must_use]
	pub const fn new(item_key: ItemKey, item_value: ItemValue) -> Self {
		Self {
			item_key,
			item_value,
		}
	}

	/// The item's [`ItemKey`]
	pub fn key(&self) -> &ItemKey {
		&self.item_key
	}

	/// The item's [`ItemValue`]
	pub fn value(&self) -> &ItemValue {
		&self.item_value
	}

	/// Unwrap the item into its [`ItemValue`]
	pub fn into_value(self) -> ItemValue {
		self.item_value
	}

	/// Unwrap the item into its [`ItemKey`] and [`ItemValue`]
	pub fn consume(self) -> (ItemKey, ItemValue) {
		(self.item_key, self.item_value)
	}

	pub(crate) fn re_map(&self, tag_type: TagType) -> bool {
		if tag_type == TagType::Id3v1 {
			use crate::id3::v1::constants::VALID_ITEMKEYS;

			return VALID_ITEMKEYS.contains(&self.item_key);
		}

		self.item_key.map_key(tag_type).is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn many_to_one() {
		assert_eq!(
			ItemKey::from_key(TagType::VorbisComments, "ALBUMARTIST"),
			ItemKey::AlbumArtist
		);
		assert_eq!(
			ItemKey::from_key(TagType::VorbisComments, "ALBUM ARTIST"),
			ItemKey::AlbumArtist
		);
	}

	#[test]
	fn one_to_many_takes_first() {
		assert_eq!(
			ItemKey::from_key(TagType::Ape, "Disc"),
			ItemKey::DiscNumber
		);
		assert_eq!(
			ItemKey::from_key(TagType::Ape, "Track"),
			ItemKey::TrackNumber
		);
	}

	#[test]
	fn unknown_keys_preserved() {
		let key = ItemKey::from_key(TagType::VorbisComments, "CUSTOM_FIELD");
		assert_eq!(key, ItemKey::Unknown(String::from("CUSTOM_FIELD")));
		assert_eq!(key.map_key(TagType::VorbisComments), Some("CUSTOM_FIELD"));
	}

	#[test]
	fn case_insensitive_lookup() {
		assert_eq!(
			ItemKey::from_key(TagType::VorbisComments, "title"),
			ItemKey::TrackTitle
		);
		assert_eq!(
			ItemKey::from_key(TagType::Ape, "ARTIST"),
			ItemKey::TrackArtist
		);
	}
}
