use super::verify_signature;
use crate::config::WriteOptions;
use crate::error::{Result, TagError};
use crate::file::FileType;
use crate::macros::{decode_err, err, try_vec};
use crate::ogg::constants::VORBIS_COMMENT_HEAD;
use crate::ogg::tag::{VorbisCommentsRef, create_vorbis_comments_ref};
use crate::picture::{Picture, PictureInformation};
use crate::tag::{Tag, TagType};
use crate::util::io::{FileLike, Length, Truncate};

use std::borrow::Cow;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use oggframe::{CONTAINS_FIRST_PAGE_OF_BITSTREAM, Packets, Page, PageHeader};

#[derive(PartialEq, Copy, Clone)]
pub(crate) enum OGGFormat {
	Vorbis,
	Speex,
}

impl OGGFormat {
	pub(crate) fn comment_signature(self) -> Option<&'static [u8]> {
		match self {
			OGGFormat::Vorbis => Some(VORBIS_COMMENT_HEAD),
			OGGFormat::Speex => None,
		}
	}

	pub(super) fn from_filetype(file_type: FileType) -> (Self, isize) {
		match file_type {
			FileType::Vorbis => (OGGFormat::Vorbis, 3),
			FileType::Speex => (OGGFormat::Speex, 2),
			FileType::TrueAudio => {
				unreachable!("You forgot to add support for FileType::{:?}!", file_type)
			},
		}
	}
}

pub(crate) fn write_to<F>(
	file: &mut F,
	tag: &Tag,
	file_type: FileType,
	write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	TagError: From<<F as Truncate>::Error>,
	TagError: From<<F as Length>::Error>,
{
	if tag.tag_type() != TagType::VorbisComments {
		err!(UnsupportedTag);
	}

	let (vendor, items, pictures) = create_vorbis_comments_ref(tag);

	let mut comments_ref = VorbisCommentsRef {
		vendor: Cow::from(vendor),
		items,
		pictures,
	};

	let (format, header_packet_count) = OGGFormat::from_filetype(file_type);

	write(
		file,
		&mut comments_ref,
		format,
		header_packet_count,
		write_options,
	)
}

// Pull the vendor string out of an existing metadata packet, so a rewrite
// keeps the encoder identification the file came with
fn existing_vendor<'a>(comment_packet: &[u8], comment_signature: &[u8]) -> Result<Cow<'a, str>> {
	let md_reader = &mut &comment_packet[comment_signature.len()..];

	let vendor_len = md_reader.read_u32::<LittleEndian>()?;
	let mut vendor = try_vec![0; vendor_len as usize];
	md_reader.read_exact(&mut vendor)?;

	match String::from_utf8(vendor) {
		Ok(s) => Ok(Cow::Owned(s)),
		Err(_) => {
			log::warn!("OGG vendor string is not valid UTF-8, not re-using");
			Ok(Cow::Borrowed(""))
		},
	}
}

pub(super) fn write<'a, F, II, IP>(
	file: &mut F,
	tag: &mut VorbisCommentsRef<'a, II, IP>,
	format: OGGFormat,
	header_packet_count: isize,
	_write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	TagError: From<<F as Truncate>::Error>,
	TagError: From<<F as Length>::Error>,
	II: Iterator<Item = (&'a str, &'a str)>,
	IP: Iterator<Item = (&'a Picture, PictureInformation)>,
{
	// The stream serial number comes from the first page header
	let start = file.stream_position()?;
	let first_page_header = PageHeader::read(file)?;
	let stream_serial = first_page_header.stream_serial;

	file.seek(SeekFrom::Start(start))?;
	let mut packets = Packets::read_count(file, header_packet_count, false)?;

	let mut remaining_file_content = Vec::new();
	file.read_to_end(&mut remaining_file_content)?;

	let comment_packet = packets
		.get(1)
		.ok_or_else(|| decode_err!("OGG: Expected metadata packet"))?;

	let comment_signature = format.comment_signature();
	if let Some(comment_signature) = comment_signature {
		verify_signature(comment_packet, comment_signature)?;
	}

	let comment_signature = comment_signature.unwrap_or_default();
	tag.vendor = existing_vendor(comment_packet, comment_signature)?;

	let add_framing_bit = format == OGGFormat::Vorbis;
	let new_metadata_packet = create_metadata_packet(tag, comment_signature, add_framing_bit)?;

	// Replace the old comment packet
	packets.set(1, new_metadata_packet);

	// Build the new file image in memory so a failure partway through never
	// leaves a torn stream behind
	let mut new_file_content = Cursor::new(Vec::new());

	let pages_written = packets.write_to(
		&mut new_file_content,
		stream_serial,
		0,
		CONTAINS_FIRST_PAGE_OF_BITSTREAM,
	)? as u32;

	// The pages following the headers keep their content, but their sequence
	// numbers must be made contiguous with the freshly written pages
	let mut pages_reader = Cursor::new(&remaining_file_content[..]);
	let mut idx = 0;
	while let Ok(mut page) = Page::read(&mut pages_reader) {
		let header = page.header_mut();
		header.sequence_number = pages_written + idx;
		page.gen_crc();
		new_file_content.write_all(&page.as_bytes())?;

		idx += 1;
	}

	file.rewind()?;
	file.truncate(0)?;
	file.write_all(&new_file_content.into_inner())?;

	Ok(())
}

pub(super) fn create_metadata_packet<'a, II, IP>(
	tag: &mut VorbisCommentsRef<'a, II, IP>,
	comment_signature: &[u8],
	add_framing_bit: bool,
) -> Result<Vec<u8>>
where
	II: Iterator<Item = (&'a str, &'a str)>,
	IP: Iterator<Item = (&'a Picture, PictureInformation)>,
{
	let mut packet = Cursor::new(Vec::new());

	let vendor_bytes = tag.vendor.as_bytes();
	packet.write_all(comment_signature)?;
	packet.write_u32::<LittleEndian>(vendor_bytes.len() as u32)?;
	packet.write_all(vendor_bytes)?;

	// The item count isn't known until the items are written, reserve its
	// spot and come back for it
	let item_count_pos = packet.stream_position()?;
	packet.write_u32::<LittleEndian>(0)?;

	let mut count = 0;
	create_comments(&mut packet, &mut count, &mut tag.items)?;
	create_pictures(&mut packet, &mut count, &mut tag.pictures)?;

	packet.seek(SeekFrom::Start(item_count_pos))?;
	packet.write_u32::<LittleEndian>(count)?;

	if add_framing_bit {
		// OGG Vorbis makes use of a "framing bit" to
		// separate the header packets
		//
		// https://xiph.org/vorbis/doc/Vorbis_I_spec.html#x1-590004
		packet.get_mut().push(1);
	}

	Ok(packet.into_inner())
}

pub(crate) fn create_comments(
	packet: &mut impl Write,
	count: &mut u32,
	items: &mut dyn Iterator<Item = (&str, &str)>,
) -> Result<()> {
	for (k, v) in items {
		if v.is_empty() {
			continue;
		}

		let comment = format!("{k}={v}");
		let comment_bytes = comment.as_bytes();

		let Ok(bytes_len) = u32::try_from(comment_bytes.len()) else {
			err!(TooMuchData);
		};

		*count += 1;

		packet.write_u32::<LittleEndian>(bytes_len)?;
		packet.write_all(comment_bytes)?;
	}

	Ok(())
}

fn create_pictures(
	packet: &mut impl Write,
	count: &mut u32,
	pictures: &mut dyn Iterator<Item = (&Picture, PictureInformation)>,
) -> Result<()> {
	const PICTURE_KEY: &str = "METADATA_BLOCK_PICTURE=";

	for (pic, info) in pictures {
		let picture = pic.as_flac_bytes(info, true);

		let Ok(bytes_len) = u32::try_from(picture.len() + PICTURE_KEY.len()) else {
			err!(TooMuchData);
		};

		*count += 1;

		packet.write_u32::<LittleEndian>(bytes_len)?;
		packet.write_all(PICTURE_KEY.as_bytes())?;
		packet.write_all(&picture)?;
	}

	Ok(())
}
