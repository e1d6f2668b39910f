use crate::ape::tag::{ApeTagRef, tagitems_into_ape};
use crate::config::WriteOptions;
use crate::error::{Result, TagError};
use crate::id3::v1::tag::Id3v1TagRef;
use crate::macros::err;
use crate::tag::{Tag, TagType};
use crate::util::io::{FileLike, Length, Truncate};

pub(crate) fn write_to<F>(file: &mut F, tag: &Tag, write_options: WriteOptions) -> Result<()>
where
	F: FileLike,
	TagError: From<<F as Truncate>::Error>,
	TagError: From<<F as Length>::Error>,
{
	match tag.tag_type() {
		TagType::Ape => ApeTagRef {
			read_only: false,
			items: tagitems_into_ape(tag),
		}
		.write_to(file, write_options),
		TagType::Id3v1 => Into::<Id3v1TagRef<'_>>::into(tag).write_to(file, write_options),
		_ => err!(UnsupportedTag),
	}
}
