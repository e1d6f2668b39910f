use crate::tag::{TagSupport, TagType};

use std::ffi::OsStr;
use std::path::Path;

/// Extensions commonly seen on supported files
///
/// Useful as a directory-scan filter, covering every extension a supported
/// [`FileType`] is typically stored under.
///
/// NOTE: An extension outside this list does not guarantee the file is
/// unreadable, it only means the file cannot be recognized by name alone.
///
/// # Examples
///
/// ```rust,no_run
/// use audiotag::file::EXTENSIONS;
/// use std::fs;
///
/// # fn main() -> audiotag::error::Result<()> {
/// for entry in fs::read_dir(".")? {
/// 	let path = entry?.path();
/// 	let Some(extension) = path.extension() else {
/// 		continue;
/// 	};
///
/// 	// Only look at files carrying a known audio extension
/// 	if !EXTENSIONS.iter().any(|e| *e == extension) {
/// 		continue;
/// 	}
///
/// 	// In all likelihood this is a supported file
/// 	let parsed = audiotag::read_from_path(path)?;
/// }
/// # Ok(()) }
/// ```
pub const EXTENSIONS: &[&str] = &[
	// Also update `FileType::from_ext()` below
	"ogg", "oga", "spx", "tta",
];

/// The audio formats files are recognized as
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum FileType {
	Speex,
	TrueAudio,
	Vorbis,
}

impl FileType {
	/// The [`TagType`] the format is conventionally tagged with
	///
	/// | [`FileType`]      | [`TagType`]      |
	/// |-------------------|------------------|
	/// | `TrueAudio`       | `Ape`            |
	/// | `Vorbis`, `Speex` | `VorbisComments` |
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::file::FileType;
	/// use audiotag::tag::TagType;
	///
	/// let file_type = FileType::TrueAudio;
	/// assert_eq!(file_type.primary_tag_type(), TagType::Ape);
	/// ```
	pub fn primary_tag_type(&self) -> TagType {
		match self {
			FileType::TrueAudio => TagType::Ape,
			FileType::Vorbis | FileType::Speex => TagType::VorbisComments,
		}
	}

	/// Describes how this `FileType` supports the given [`TagType`]
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::file::FileType;
	/// use audiotag::tag::TagType;
	///
	/// // `FileType::TrueAudio` supports both reading and writing APE tags
	/// assert!(FileType::TrueAudio.tag_support(TagType::Ape).is_writable());
	/// ```
	pub fn tag_support(&self, tag_type: TagType) -> TagSupport {
		macro_rules! tag_support {
			(
				$tag_type:ident,
				$(($variant:ident, $tag:path)),* $(,)?
			) => {
				match $tag_type {
					$(
						TagType::$variant => {
							if !<$tag>::SUPPORTED_FORMATS.contains(self) {
								return TagSupport::Unsupported;
							}

							if <$tag>::READ_ONLY_FORMATS.contains(self) {
								TagSupport::ReadOnly
							} else {
								TagSupport::ReadWrite
							}
						},
					)*
				}
			}
		}

		tag_support!(
			tag_type,
			(Ape, crate::ape::ApeTag),
			(Id3v1, crate::id3::v1::Id3v1Tag),
			(VorbisComments, crate::ogg::VorbisComments),
		)
	}

	/// Attempts to extract a [`FileType`] from an extension
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::file::FileType;
	///
	/// let extension = "tta";
	/// assert_eq!(FileType::from_ext(extension), Some(FileType::TrueAudio));
	/// ```
	pub fn from_ext<E>(ext: E) -> Option<Self>
	where
		E: AsRef<OsStr>,
	{
		let ext = ext.as_ref().to_str()?.to_ascii_lowercase();

		// Also update `EXTENSIONS` above
		match ext.as_str() {
			"ogg" | "oga" => Some(Self::Vorbis),
			"spx" => Some(Self::Speex),
			"tta" => Some(Self::TrueAudio),
			_ => None,
		}
	}

	/// Attempts to determine a [`FileType`] from a path
	///
	/// Only the extension is inspected, the file is never opened.
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::file::FileType;
	/// use std::path::Path;
	///
	/// let path = Path::new("path/to/my.tta");
	/// assert_eq!(FileType::from_path(path), Some(FileType::TrueAudio));
	/// ```
	pub fn from_path<P>(path: P) -> Option<Self>
	where
		P: AsRef<Path>,
	{
		path.as_ref().extension().and_then(Self::from_ext)
	}

	/// Attempts to extract a [`FileType`] from a buffer
	///
	/// NOTES:
	///
	/// * This is for use in [`Probe::guess_file_type`], it is recommended to use it that way
	/// * This **will not** search past tags at the start of the buffer.
	///   For this behavior, use [`Probe::guess_file_type`].
	///
	/// [`Probe::guess_file_type`]: crate::probe::Probe::guess_file_type
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::file::FileType;
	/// use std::fs::File;
	/// use std::io::Read;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// let mut file = File::open("song.ogg")?;
	///
	/// let mut buf = [0; 50]; // Search the first 50 bytes of the file
	/// file.read_exact(&mut buf)?;
	///
	/// assert_eq!(FileType::from_buffer(&buf), Some(FileType::Vorbis));
	/// # Ok(()) }
	/// ```
	pub fn from_buffer(buf: &[u8]) -> Option<Self> {
		// A fixed-size buffer cannot be searched past a leading ID3v2 tag or
		// junk, so only a definite signature match counts here. The other
		// guess results are handled in `Probe::guess_file_type`.
		match Self::from_buffer_inner(buf) {
			Some(FileTypeGuessResult::Determined(file_ty)) => Some(file_ty),
			_ => None,
		}
	}

	pub(crate) fn from_buffer_inner(buf: &[u8]) -> Option<FileTypeGuessResult> {
		use crate::id3::synchsafe::SynchsafeInteger;

		if buf.is_empty() {
			return None;
		}

		if let Some(f_ty) = Self::quick_type_guess(buf) {
			return Some(FileTypeGuessResult::Determined(f_ty));
		}

		// An ID3v2 tag may sit in front of the actual stream. Hand its size
		// back so `Probe::guess_file_type` can skip it. The bare minimum size
		// for an ID3v2 header is 10 bytes.
		if buf.len() >= 10 && &buf[..3] == b"ID3" {
			// This is infallible, but preferable to an unwrap
			let size_bytes: [u8; 4] = buf[6..10].try_into().ok()?;

			let id3v2_size = u32::from_be_bytes(size_bytes).unsynch();
			return Some(FileTypeGuessResult::MaybePrecededById3(id3v2_size));
		}

		Some(FileTypeGuessResult::MaybePrecededByJunk)
	}

	fn quick_type_guess(buf: &[u8]) -> Option<Self> {
		// Safe to index, since we return early on an empty buffer
		match buf[0] {
			b'O' if buf.len() >= 36 && &buf[..4] == b"OggS" => {
				if &buf[29..35] == b"vorbis" {
					Some(Self::Vorbis)
				} else if &buf[28..36] == b"Speex   " {
					Some(Self::Speex)
				} else {
					None
				}
			},
			b'T' if buf.len() >= 4 && &buf[..4] == b"TTA1" => Some(Self::TrueAudio),
			_ => None,
		}
	}
}

/// The result of a `FileType` guess
///
/// External callers of `FileType::from_buffer()` will only ever see `Determined` cases.
/// The remaining cases are used internally in `Probe::guess_file_type()`.
pub(crate) enum FileTypeGuessResult {
	/// The `FileType` was guessed
	Determined(FileType),
	/// The stream starts with an ID3v2 tag
	MaybePrecededById3(u32),
	/// The stream starts with potential junk data
	MaybePrecededByJunk,
}
