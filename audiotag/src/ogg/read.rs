use super::tag::VorbisComments;
use super::verify_signature;
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{ErrorKind, Result, TagError};
use crate::macros::{decode_err, err, parse_mode_choice, try_vec};
use crate::picture::{MimeType, Picture, PictureInformation, PictureType};
use crate::util::text::{latin1_decode, utf8_decode, utf8_decode_str};

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use data_encoding::BASE64;
use oggframe::{Packets, PageError, PageHeader};

pub type OGGTags = (Option<VorbisComments>, PageHeader, Packets);

fn read_vendor<R>(data: &mut R, remaining: &mut u64, parse_mode: ParsingMode) -> Result<String>
where
	R: Read,
{
	let vendor_len = data.read_u32::<LittleEndian>()?;
	if u64::from(vendor_len) > *remaining {
		err!(SizeMismatch);
	}

	let mut vendor_bytes = try_vec![0; vendor_len as usize];
	data.read_exact(&mut vendor_bytes)?;

	*remaining -= u64::from(vendor_len);

	match utf8_decode(vendor_bytes) {
		Ok(vendor) => Ok(vendor),
		// Nothing we do from here on out is spec-compliant, so we need
		// to short circuit if strict.
		Err(e) if parse_mode == ParsingMode::Strict => Err(e),
		Err(e) => {
			log::warn!("Possibly corrupt vendor string, attempting to recover");

			// Some vendor strings in the wild are not valid UTF-8. Falling back to
			// Latin-1 preserves the bytes, as opposed to using the replacement character.
			let TagError {
				kind: ErrorKind::StringFromUtf8(e),
			} = e
			else {
				return Err(e);
			};

			let vendor = latin1_decode(e.as_bytes());
			log::warn!("Vendor string recovered as: '{vendor}'");
			Ok(vendor)
		},
	}
}

// A `METADATA_BLOCK_PICTURE` field, base64ed FLAC picture block
fn read_picture_field(tag: &mut VorbisComments, value: &[u8], parse_mode: ParsingMode) -> Result<()> {
	match Picture::from_flac_bytes(value, true, parse_mode) {
		Ok(picture) => tag.pictures.push(picture),
		Err(e) => {
			if parse_mode == ParsingMode::Strict {
				return Err(e);
			}

			log::warn!("Failed to decode picture, discarding field");
		},
	}

	Ok(())
}

// `COVERART` is an old deprecated image storage format. We have to convert it
// to a `METADATA_BLOCK_PICTURE` for it to be useful.
//
// <https://wiki.xiph.org/VorbisComment#Conversion_to_METADATA_BLOCK_PICTURE>
fn read_coverart_field(
	tag: &mut VorbisComments,
	value: &[u8],
	parse_mode: ParsingMode,
) -> Result<()> {
	log::warn!(
		"Found deprecated `COVERART` field, attempting to convert to `METADATA_BLOCK_PICTURE`"
	);

	let Ok(picture_data) = BASE64.decode(value) else {
		if parse_mode == ParsingMode::Strict {
			return Err(TagError::new(ErrorKind::NotAPicture));
		}

		log::warn!("Failed to decode picture, discarding field");
		return Ok(());
	};

	let mime_type = Picture::mimetype_from_bin(&picture_data)
		.unwrap_or_else(|_| MimeType::Unknown(String::from("image/")));

	let picture = Picture {
		pic_type: PictureType::Other,
		mime_type: Some(mime_type),
		description: None,
		data: picture_data,
	};

	tag.pictures.push((picture, PictureInformation::default()));
	Ok(())
}

pub(crate) fn read_comments<R>(
	data: &mut R,
	mut len: u64,
	parse_options: ParseOptions,
) -> Result<VorbisComments>
where
	R: Read,
{
	let parse_mode = parse_options.parsing_mode;

	let vendor = read_vendor(data, &mut len, parse_mode)?;

	let number_of_items = data.read_u32::<LittleEndian>()?;
	if number_of_items > (len >> 2) as u32 {
		err!(SizeMismatch);
	}

	let mut tag = VorbisComments {
		vendor,
		items: Vec::with_capacity(number_of_items as usize),
		pictures: Vec::new(),
	};

	for _ in 0..number_of_items {
		let comment_len = data.read_u32::<LittleEndian>()?;
		if u64::from(comment_len) > len {
			err!(SizeMismatch);
		}

		let mut comment_bytes = try_vec![0; comment_len as usize];
		data.read_exact(&mut comment_bytes)?;

		len -= u64::from(comment_len);

		// KEY=VALUE
		let mut comment_split = comment_bytes.splitn(2, |b| *b == b'=');

		let Some(key) = comment_split.next() else {
			continue;
		};

		// Make sure there was a separator present, otherwise just move on
		let Some(value) = comment_split.next() else {
			log::warn!("No separator found in field, discarding");
			continue;
		};

		match key {
			k if k.eq_ignore_ascii_case(b"METADATA_BLOCK_PICTURE") => {
				if parse_options.read_cover_art {
					read_picture_field(&mut tag, value, parse_mode)?;
				}
			},
			k if k.eq_ignore_ascii_case(b"COVERART") => {
				if parse_options.read_cover_art {
					read_coverart_field(&mut tag, value, parse_mode)?;
				}
			},
			k if valid_vorbis_comments_key(k) => {
				// SAFETY: We just verified that all of the bytes fall within the subset of ASCII
				let key = unsafe { String::from_utf8_unchecked(k.to_vec()) };

				match utf8_decode_str(value) {
					Ok(value) => tag.items.push((key, value.to_owned())),
					Err(e) => {
						if parse_mode == ParsingMode::Strict {
							return Err(e);
						}

						log::warn!("Non UTF-8 value found, discarding field {key:?}");
					},
				}
			},
			_ => {
				parse_mode_choice!(
					parse_mode,
					STRICT: decode_err!(@BAIL "OGG: Vorbis comments contain an invalid key"),
					// Otherwise discard invalid keys
				)
			},
		}
	}

	Ok(tag)
}

pub(super) fn valid_vorbis_comments_key(key: &[u8]) -> bool {
	// The valid range is 0x20..=0x7D not including 0x3D
	key.iter().all(|c| (b' '..=b'}').contains(c) && *c != b'=')
}

pub(crate) fn read_from<T>(
	data: &mut T,
	header_sig: &[u8],
	comment_sig: &[u8],
	packets_to_read: isize,
	parse_options: ParseOptions,
) -> Result<OGGTags>
where
	T: Read + Seek,
{
	debug_assert!(packets_to_read >= 2);

	let parse_mode = parse_options.parsing_mode;

	let start = data.stream_position()?;
	let first_page_header = PageHeader::read(data)?;

	data.seek(SeekFrom::Start(start))?;

	// Read the header packets, verifying page checksums in strict mode
	let verify_crc = parse_mode == ParsingMode::Strict;
	let packets = match Packets::read_count(data, packets_to_read, verify_crc) {
		Ok(packets) => packets,
		// A truncated stream may still hold some intact header packets,
		// salvage whatever terminated before the cutoff
		Err(PageError::NotEnoughData) if parse_mode != ParsingMode::Strict => {
			log::warn!("OGG: Stream ends mid-packet, salvaging the intact packets");
			data.seek(SeekFrom::Start(start))?;
			Packets::read(data)?
		},
		Err(e) => return Err(e.into()),
	};

	let identification_packet = packets
		.get(0)
		.ok_or_else(|| decode_err!("OGG: Expected identification packet"))?;
	verify_signature(identification_packet, header_sig)?;

	if !parse_options.read_tags {
		return Ok((None, first_page_header, packets));
	}

	let Some(metadata_packet) = packets.get(1) else {
		if parse_mode != ParsingMode::Strict {
			log::warn!("OGG: Comment packet is cut off, returning an empty tag");
			return Ok((
				Some(VorbisComments::default()),
				first_page_header,
				packets,
			));
		}

		decode_err!(@BAIL "OGG: Expected comment packet");
	};
	verify_signature(metadata_packet, comment_sig)?;

	// Remove the signature from the packet
	let mut metadata_packet = &metadata_packet[comment_sig.len()..];

	let reader = &mut metadata_packet;
	let tag = read_comments(reader, reader.len() as u64, parse_options)?;

	Ok((Some(tag), first_page_header, packets))
}
