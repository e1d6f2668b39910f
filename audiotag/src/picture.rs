//! Format-agnostic picture handling

use crate::config::ParsingMode;
use crate::error::{ErrorKind, Result, TagError};
use crate::macros::{err, try_vec};
use crate::util::text::utf8_decode_str;

use std::fmt::{Debug, Display, Formatter};
use std::io::{Cursor, Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt as _};
use data_encoding::BASE64;

/// The APE cover art item keys
///
/// Ordered to match the ID3v2 APIC picture type indices, so
/// `APE_PICTURE_TYPES[pic_type.as_u8()]` is the key for `pic_type`.
pub const APE_PICTURE_TYPES: [&str; 21] = [
	"Cover Art (Other)",
	"Cover Art (Png Icon)",
	"Cover Art (Icon)",
	"Cover Art (Front)",
	"Cover Art (Back)",
	"Cover Art (Leaflet)",
	"Cover Art (Media)",
	"Cover Art (Lead Artist)",
	"Cover Art (Artist)",
	"Cover Art (Conductor)",
	"Cover Art (Band)",
	"Cover Art (Composer)",
	"Cover Art (Lyricist)",
	"Cover Art (Recording Location)",
	"Cover Art (During Recording)",
	"Cover Art (During Performance)",
	"Cover Art (Video Capture)",
	"Cover Art (Fish)",
	"Cover Art (Illustration)",
	"Cover Art (Band Logotype)",
	"Cover Art (Publisher Logotype)",
];

/// The media type of an embedded picture
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum MimeType {
	/// A PNG image
	Png,
	/// A JPEG image
	Jpeg,
	/// A TIFF image
	Tiff,
	/// A BMP image
	Bmp,
	/// A GIF image
	Gif,
	/// Any other media type
	Unknown(String),
}

impl MimeType {
	/// Parse a `MimeType` from a string, case-insensitively
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::picture::MimeType;
	///
	/// assert_eq!(MimeType::from_str("image/jpeg"), MimeType::Jpeg);
	/// ```
	#[must_use]
	#[allow(clippy::should_implement_trait)] // Infallible in contrast to FromStr
	pub fn from_str(mime_type: &str) -> Self {
		match &*mime_type.to_lowercase() {
			"image/jpeg" | "image/jpg" => Self::Jpeg,
			"image/png" => Self::Png,
			"image/tiff" => Self::Tiff,
			"image/bmp" => Self::Bmp,
			"image/gif" => Self::Gif,
			_ => Self::Unknown(mime_type.to_owned()),
		}
	}

	/// The MIME type as a string
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::picture::MimeType;
	///
	/// assert_eq!(MimeType::Jpeg.as_str(), "image/jpeg")
	/// ```
	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			MimeType::Jpeg => "image/jpeg",
			MimeType::Png => "image/png",
			MimeType::Tiff => "image/tiff",
			MimeType::Bmp => "image/bmp",
			MimeType::Gif => "image/gif",
			MimeType::Unknown(unknown) => unknown,
		}
	}
}

impl Display for MimeType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A picture type, as defined by ID3v2 APIC
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum PictureType {
	Other,
	Icon,
	OtherIcon,
	CoverFront,
	CoverBack,
	Leaflet,
	Media,
	LeadArtist,
	Artist,
	Conductor,
	Band,
	Composer,
	Lyricist,
	RecordingLocation,
	DuringRecording,
	DuringPerformance,
	ScreenCapture,
	BrightFish,
	Illustration,
	BandLogo,
	PublisherLogo,
	Undefined(u8),
}

// Indexed by APIC picture type
const KNOWN_PICTURE_TYPES: [PictureType; 21] = [
	PictureType::Other,
	PictureType::Icon,
	PictureType::OtherIcon,
	PictureType::CoverFront,
	PictureType::CoverBack,
	PictureType::Leaflet,
	PictureType::Media,
	PictureType::LeadArtist,
	PictureType::Artist,
	PictureType::Conductor,
	PictureType::Band,
	PictureType::Composer,
	PictureType::Lyricist,
	PictureType::RecordingLocation,
	PictureType::DuringRecording,
	PictureType::DuringPerformance,
	PictureType::ScreenCapture,
	PictureType::BrightFish,
	PictureType::Illustration,
	PictureType::BandLogo,
	PictureType::PublisherLogo,
];

impl PictureType {
	/// The APIC index of this picture type
	pub fn as_u8(&self) -> u8 {
		if let Self::Undefined(b) = self {
			return *b;
		}

		KNOWN_PICTURE_TYPES
			.iter()
			.position(|ty| ty == self)
			.unwrap_or_default() as u8
	}

	/// The picture type at the given APIC index
	pub fn from_u8(byte: u8) -> Self {
		KNOWN_PICTURE_TYPES
			.get(usize::from(byte))
			.copied()
			.unwrap_or(Self::Undefined(byte))
	}

	/// The APE cover art item key for this picture type
	///
	/// Returns `None` for [`PictureType::Undefined`], which has no APE equivalent.
	pub fn as_ape_key(&self) -> Option<&str> {
		match self {
			Self::Undefined(_) => None,
			_ => APE_PICTURE_TYPES.get(usize::from(self.as_u8())).copied(),
		}
	}

	/// The picture type for an APE cover art item key
	///
	/// An unrecognized key maps to `Undefined(0)`.
	pub fn from_ape_key(key: &str) -> Self {
		APE_PICTURE_TYPES
			.iter()
			.position(|k| *k == key)
			.map_or(Self::Undefined(0), |idx| Self::from_u8(idx as u8))
	}
}

/// The dimensions and color information of a [`Picture`]
///
/// The `METADATA_BLOCK_PICTURE` layout used in Vorbis comments stores these
/// alongside the image data. See [`Picture::as_flac_bytes`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct PictureInformation {
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
	/// Color depth in bits per pixel
	pub color_depth: u32,
	/// Number of colors in an indexed image, 0 otherwise
	pub num_colors: u32,
}

/// An embedded picture
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Picture {
	pub(crate) pic_type: PictureType,
	pub(crate) mime_type: Option<MimeType>,
	pub(crate) description: Option<String>,
	pub(crate) data: Vec<u8>,
}

impl Debug for Picture {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Picture")
			.field("pic_type", &self.pic_type)
			.field("mime_type", &self.mime_type)
			.field("description", &self.description)
			.field("data", &format!("<{} bytes>", self.data.len()))
			.finish()
	}
}

impl Picture {
	/// Create a `Picture` without inspecting `data`
	///
	/// No signature check is performed, the caller is trusted to have
	/// verified the data beforehand.
	pub fn new_unchecked(
		pic_type: PictureType,
		mime_type: Option<MimeType>,
		description: Option<String>,
		data: Vec<u8>,
	) -> Self {
		Self {
			pic_type,
			mime_type,
			description,
			data,
		}
	}

	/// Create a [`Picture`] from a reader holding raw image data
	///
	/// The MIME type is sniffed from the image signature. The picture type
	/// starts out as [`PictureType::Other`], change it before writing.
	///
	/// # Errors
	///
	/// * `reader` holds fewer than 8 bytes
	/// * The signature matches none of the formats [`MimeType`] knows
	pub fn from_reader<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;

		if data.len() < 8 {
			err!(NotAPicture);
		}

		let mime_type = Self::mimetype_from_bin(&data[..8])?;

		Ok(Self {
			pic_type: PictureType::Other,
			mime_type: Some(mime_type),
			description: None,
			data,
		})
	}

	/// The assigned [`PictureType`]
	pub fn pic_type(&self) -> PictureType {
		self.pic_type
	}

	/// Replace the [`PictureType`]
	pub fn set_pic_type(&mut self, pic_type: PictureType) {
		self.pic_type = pic_type
	}

	/// The [`MimeType`] sniffed from the data, never settable by hand
	pub fn mime_type(&self) -> Option<&MimeType> {
		self.mime_type.as_ref()
	}

	pub(crate) fn mime_str(&self) -> &str {
		self.mime_type.as_ref().map_or("", MimeType::as_str)
	}

	/// The description, if one is set
	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	/// Replace the description
	pub fn set_description(&mut self, description: Option<String>) {
		self.description = description;
	}

	/// The raw image data
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Unwrap the picture into its raw image data
	pub fn into_data(self) -> Vec<u8> {
		self.data
	}

	/// Serialize the picture in the FLAC `METADATA_BLOCK_PICTURE` layout
	///
	/// With `encode`, the result is additionally base64 encoded
	/// ([RFC 4648 §4](http://www.faqs.org/rfcs/rfc4648.html)), which Vorbis
	/// comments require.
	///
	/// Neither a Vorbis comment key nor a FLAC `METADATA_BLOCK_HEADER` is
	/// included in the output.
	pub fn as_flac_bytes(&self, picture_information: PictureInformation, encode: bool) -> Vec<u8> {
		let mime = self.mime_str();

		let mut block = Vec::<u8>::new();
		block.extend(u32::from(self.pic_type.as_u8()).to_be_bytes());
		block.extend((mime.len() as u32).to_be_bytes());
		block.extend(mime.as_bytes());

		match &self.description {
			Some(desc) => {
				block.extend((desc.len() as u32).to_be_bytes());
				block.extend(desc.as_bytes());
			},
			None => block.extend([0; 4]),
		}

		block.extend(picture_information.width.to_be_bytes());
		block.extend(picture_information.height.to_be_bytes());
		block.extend(picture_information.color_depth.to_be_bytes());
		block.extend(picture_information.num_colors.to_be_bytes());

		block.extend((self.data.len() as u32).to_be_bytes());
		block.extend(self.data.iter());

		if encode {
			return BASE64.encode(&block).into_bytes();
		}

		block
	}

	/// Parse a [`Picture`] from FLAC `METADATA_BLOCK_PICTURE` bytes
	///
	/// `encoded` selects between the base64 form stored in Vorbis comments
	/// and the raw form of a FLAC block.
	///
	/// # Errors
	///
	/// [`ErrorKind::NotAPicture`] wherever the data stops making sense
	pub fn from_flac_bytes(
		bytes: &[u8],
		encoded: bool,
		parse_mode: ParsingMode,
	) -> Result<(Self, PictureInformation)> {
		if !encoded {
			return Self::from_flac_bytes_inner(bytes, parse_mode);
		}

		let decoded = BASE64
			.decode(bytes)
			.map_err(|_| TagError::new(ErrorKind::NotAPicture))?;
		Self::from_flac_bytes_inner(&decoded, parse_mode)
	}

	fn from_flac_bytes_inner(
		block: &[u8],
		parse_mode: ParsingMode,
	) -> Result<(Self, PictureInformation)> {
		// The picture type, four length fields, and the four information
		// fields alone take 32 bytes
		if block.len() < 32 {
			err!(NotAPicture);
		}

		let mut remaining = block.len();
		let mut reader = Cursor::new(block);

		let apic_index = reader.read_u32::<BigEndian>()?;
		remaining -= 4;

		// APIC holds the picture type in one byte, so larger values can
		// only come from something that isn't a picture block
		if apic_index > 255 && parse_mode == ParsingMode::Strict {
			err!(NotAPicture);
		}

		let mime_len = reader.read_u32::<BigEndian>()? as usize;
		remaining -= 4;

		if mime_len > remaining {
			err!(SizeMismatch);
		}

		let mime_str = utf8_decode_str(&block[8..8 + mime_len])?;
		remaining -= mime_len;
		reader.seek(SeekFrom::Current(mime_len as i64))?;

		let desc_len = reader.read_u32::<BigEndian>()? as usize;
		remaining -= 4;

		let mut description = None;
		if desc_len > 0 && desc_len < remaining {
			let desc_start = 12 + mime_len;
			if let Ok(desc) = utf8_decode_str(&block[desc_start..desc_start + desc_len]) {
				description = Some(desc.to_owned());
			}

			remaining -= desc_len;
			reader.seek(SeekFrom::Current(desc_len as i64))?;
		}

		let information = PictureInformation {
			width: reader.read_u32::<BigEndian>()?,
			height: reader.read_u32::<BigEndian>()?,
			color_depth: reader.read_u32::<BigEndian>()?,
			num_colors: reader.read_u32::<BigEndian>()?,
		};

		let data_len = reader.read_u32::<BigEndian>()? as usize;
		remaining -= 20;

		if data_len > remaining {
			err!(NotAPicture);
		}

		let mut data = try_vec![0; data_len];
		if reader.read_exact(&mut data).is_err() {
			err!(NotAPicture);
		}

		let mime_type = (!mime_str.is_empty()).then(|| MimeType::from_str(mime_str));

		Ok((
			Self {
				pic_type: PictureType::from_u8(apic_index as u8),
				mime_type,
				description,
				data,
			},
			information,
		))
	}

	/// Serialize the picture as an APE cover art item value
	///
	/// Only the description and image data are produced, the item key and
	/// its terminating null are the caller's job. See
	/// [`PictureType::as_ape_key`] for the key.
	pub fn as_ape_bytes(&self) -> Vec<u8> {
		let mut value: Vec<u8> = Vec::new();

		if let Some(desc) = &self.description {
			value.extend(desc.as_bytes());
		}

		value.push(0);
		value.extend(self.data.iter());

		value
	}

	/// Parse a [`Picture`] from an APE binary item value
	///
	/// `bytes` must be the item value alone, with the key already stripped.
	///
	/// # Errors
	///
	/// [`ErrorKind::NotAPicture`] when the value is empty or the image
	/// signature is unrecognized
	pub fn from_ape_bytes(key: &str, bytes: &[u8]) -> Result<Self> {
		if bytes.is_empty() {
			err!(NotAPicture);
		}

		// A null-terminated description comes first
		let mut reader = &*bytes;
		let mut data_start = 0;

		let mut description = String::new();
		while let Ok(b) = reader.read_u8() {
			data_start += 1;

			if b == b'\0' {
				break;
			}

			description.push(char::from(b));
		}

		let mime_type = {
			let mut signature = [0; 8];
			reader.read_exact(&mut signature)?;

			Self::mimetype_from_bin(&signature[..])?
		};

		Ok(Picture {
			pic_type: PictureType::from_ape_key(key),
			mime_type: Some(mime_type),
			description: (!description.is_empty()).then_some(description),
			data: bytes[data_start..].to_vec(),
		})
	}

	pub(crate) fn mimetype_from_bin(bytes: &[u8]) -> Result<MimeType> {
		match bytes[..8] {
			[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A] => Ok(MimeType::Png),
			[0xFF, 0xD8, ..] => Ok(MimeType::Jpeg),
			[b'G', b'I', b'F', 0x38, 0x37 | 0x39, b'a', ..] => Ok(MimeType::Gif),
			[b'B', b'M', ..] => Ok(MimeType::Bmp),
			[b'I', b'I', b'*', 0x00, ..] | [b'M', b'M', 0x00, b'*', ..] => Ok(MimeType::Tiff),
			_ => err!(NotAPicture),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{APE_PICTURE_TYPES, PictureType};

	#[test_log::test]
	fn ape_keys_track_apic_indices() {
		for (idx, key) in APE_PICTURE_TYPES.iter().enumerate() {
			let ty = PictureType::from_u8(idx as u8);
			assert_eq!(ty.as_u8(), idx as u8);
			assert_eq!(ty.as_ape_key(), Some(*key));
			assert_eq!(PictureType::from_ape_key(key), ty);
		}

		assert_eq!(PictureType::from_u8(42), PictureType::Undefined(42));
		assert_eq!(PictureType::Undefined(42).as_ape_key(), None);
		assert_eq!(
			PictureType::from_ape_key("Not a key"),
			PictureType::Undefined(0)
		);
	}
}
