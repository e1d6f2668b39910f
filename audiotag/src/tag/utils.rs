use crate::config::WriteOptions;
use crate::error::{Result, TagError};
use crate::file::FileType;
use crate::tag::{Tag, TagType};
use crate::util::io::{FileLike, Length, Truncate};
use crate::{ape, tta};

use crate::ape::tag::ApeTagRef;
use crate::id3::v1::tag::Id3v1TagRef;
use crate::ogg::tag::{VorbisCommentsRef, create_vorbis_comments_ref};

use std::borrow::Cow;
use std::io::Write;

pub(crate) fn write_tag<F>(
	tag: &Tag,
	file: &mut F,
	file_type: FileType,
	write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	TagError: From<<F as Truncate>::Error>,
	TagError: From<<F as Length>::Error>,
{
	match file_type {
		FileType::Speex | FileType::Vorbis => {
			crate::ogg::write::write_to(file, tag, file_type, write_options)
		},
		FileType::TrueAudio => tta::write::write_to(file, tag, write_options),
	}
}

pub(crate) fn dump_tag<W: Write>(
	tag: &Tag,
	writer: &mut W,
	write_options: WriteOptions,
) -> Result<()> {
	match tag.tag_type() {
		TagType::Ape => {
			let mut ape_tag = ApeTagRef {
				read_only: false,
				items: ape::tag::tagitems_into_ape(tag),
			};

			ape_tag.dump_to(writer, write_options)
		},
		TagType::Id3v1 => Into::<Id3v1TagRef<'_>>::into(tag).dump_to(writer, write_options),
		TagType::VorbisComments => {
			let (vendor, items, pictures) = create_vorbis_comments_ref(tag);

			let mut comments = VorbisCommentsRef {
				vendor: Cow::from(vendor),
				items,
				pictures,
			};

			comments.dump_to(writer, write_options)
		},
	}
}

#[cfg(test)]
// Used for tag conversion tests
pub(crate) mod test_utils {
	use crate::tag::{ItemKey, Tag, TagType};

	pub(crate) fn create_tag(tag_type: TagType) -> Tag {
		let mut tag = Tag::new(tag_type);

		tag.insert_text(ItemKey::TrackTitle, String::from("Foo title"));
		tag.insert_text(ItemKey::TrackArtist, String::from("Bar artist"));
		tag.insert_text(ItemKey::AlbumTitle, String::from("Baz album"));
		tag.insert_text(ItemKey::Comment, String::from("Qux comment"));
		tag.insert_text(ItemKey::TrackNumber, String::from("1"));
		tag.insert_text(ItemKey::Genre, String::from("Classical"));

		tag
	}

	pub(crate) fn verify_tag(tag: &Tag, track_number: bool, genre: bool) {
		assert_eq!(tag.get_string(&ItemKey::TrackTitle), Some("Foo title"));
		assert_eq!(tag.get_string(&ItemKey::TrackArtist), Some("Bar artist"));
		assert_eq!(tag.get_string(&ItemKey::AlbumTitle), Some("Baz album"));
		assert_eq!(tag.get_string(&ItemKey::Comment), Some("Qux comment"));

		if track_number {
			assert_eq!(tag.get_string(&ItemKey::TrackNumber), Some("1"));
		}

		if genre {
			assert_eq!(tag.get_string(&ItemKey::Genre), Some("Classical"));
		}
	}
}
