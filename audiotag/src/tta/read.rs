use super::TrueAudioFile;
use crate::ape::header::read_ape_header;
use crate::ape::tag::read::{read_ape_tag, read_ape_tag_with_header};
use crate::config::ParseOptions;
use crate::error::Result;
use crate::id3::v1::Id3v1Tag;
use crate::id3::{ID3FindResults, find_id3v1, find_id3v2};
use crate::macros::{decode_err, err};

use std::io::{Read, Seek, SeekFrom};

pub(crate) fn read_from<R>(data: &mut R, parse_options: ParseOptions) -> Result<TrueAudioFile>
where
	R: Read + Seek,
{
	let start = data.stream_position()?;
	let end = data.seek(SeekFrom::End(0))?;

	data.seek(SeekFrom::Start(start))?;

	let mut stream_len = end - start;

	let mut id3v1_tag: Option<Id3v1Tag> = None;
	let mut ape_tag = None;

	// ID3v2 tags are unsupported in True Audio files, but still possible
	if let ID3FindResults(Some(header), ()) = find_id3v2(data)? {
		log::warn!("Encountered an ID3v2 tag. This tag cannot be rewritten to the file!");

		// The tag's size field does not include the 10 byte header, or the
		// optional 10 byte footer
		let mut full_tag_size = u64::from(header.size) + 10;
		if header.footer {
			full_tag_size += 10;
		}

		let Some(new_stream_length) = stream_len.checked_sub(full_tag_size) else {
			err!(SizeMismatch);
		};

		stream_len = new_stream_length;
	}

	let mut found_stream = false;

	let mut header = [0; 4];
	data.read_exact(&mut header)?;

	while !found_stream {
		match &header {
			b"TTA1" => {
				found_stream = true;
			},
			// APE tags belong at the end of the file, but some writers put one up front.
			// Only APEv2 can be picked up here, since detection relies on the header.
			b"APET" => {
				log::warn!(
					"Encountered an APE tag at the beginning of the file, attempting to read"
				);

				// Get the remaining part of the ape tag
				let mut remaining = [0; 4];
				data.read_exact(&mut remaining).map_err(|_| {
					decode_err!("APE: Preamble is cut off by the end of the stream")
				})?;

				if &remaining[..4] != b"AGEX" {
					decode_err!(@BAIL "APE: Encountered an incomplete preamble");
				}

				let ape_header = read_ape_header(data, false)?;
				let Some(new_stream_length) = stream_len.checked_sub(u64::from(ape_header.size))
				else {
					err!(SizeMismatch);
				};
				stream_len = new_stream_length;

				if parse_options.read_tags {
					let ape = read_ape_tag_with_header(data, ape_header, parse_options)?;
					ape_tag = Some(ape);
				}

				data.read_exact(&mut header)?;
			},
			_ => {
				decode_err!(@BAIL TrueAudio, "Invalid data found while reading header, expected any of [\"TTA1\", \"APETAGEX\", \"ID3\"]")
			},
		}
	}

	// First see if there's a ID3v1 tag
	//
	// Starts with ['T', 'A', 'G']
	// Exactly 128 bytes long (including the identifier)
	let ID3FindResults(id3v1_header, id3v1) =
		find_id3v1(data, parse_options.read_tags, parse_options.parsing_mode)?;

	if id3v1_header.is_some() {
		id3v1_tag = id3v1;
		let Some(new_stream_length) = stream_len.checked_sub(128) else {
			err!(SizeMismatch);
		};

		stream_len = new_stream_length;
	}

	// Next, search for an APE tag footer
	//
	// Starts with ['A', 'P', 'E', 'T', 'A', 'G', 'E', 'X']
	// Exactly 32 bytes long
	// Strongly recommended to be at the end of the file
	//
	// The seek fails when the reader is too small to contain a footer
	if data.seek(SeekFrom::Current(-32)).is_ok() {
		if let (tag, Some(header)) = read_ape_tag(data, true, parse_options)? {
			if u64::from(header.size) > stream_len {
				err!(SizeMismatch);
			}

			ape_tag = tag;
		}
	}

	Ok(TrueAudioFile { id3v1_tag, ape_tag })
}
