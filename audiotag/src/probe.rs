//! Format-agnostic file parsing tools

use crate::config::ParseOptions;
use crate::error::Result;
use crate::file::{AudioFile, FileType, FileTypeGuessResult, TaggedFile};
use crate::macros::err;
use crate::ogg::speex::SpeexFile;
use crate::ogg::vorbis::VorbisFile;
use crate::tta::TrueAudioFile;

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

// How many leading bytes the content sniff looks at. Enough for an Ogg page
// header plus the codec identifier, or a TTA stream header.
const SNIFF_LEN: usize = 36;

/// A reader that works out its own [`FileType`]
///
/// `Probe` is the entry point when the concrete format of a stream isn't
/// known up front.
///
/// ## Usage
///
/// Opening by path infers the [`FileType`] from the extension, the file
/// content is not consulted:
///
/// ```rust,no_run
/// # fn main() -> audiotag::error::Result<()> {
/// use audiotag::file::FileType;
/// use audiotag::probe::Probe;
///
/// let probe = Probe::open("song.tta")?;
///
/// // Inferred from the `tta` extension
/// assert_eq!(probe.file_type(), Some(FileType::TrueAudio));
/// # Ok(())
/// # }
/// ```
///
/// If there is no path, or the extension can't be trusted, the content
/// sniff makes the call instead:
///
/// ```rust,no_run
/// # fn main() -> audiotag::error::Result<()> {
/// use audiotag::file::FileType;
/// use audiotag::probe::Probe;
///
/// // Our same path probe with a guessed file type
/// let probe = Probe::open("song.tta")?.guess_file_type()?;
///
/// // Inferred from the file's content
/// assert_eq!(probe.file_type(), Some(FileType::TrueAudio));
/// # Ok(())
/// # }
/// ```
pub struct Probe<R: Read> {
	inner: R,
	options: Option<ParseOptions>,
	f_ty: Option<FileType>,
}

impl<R: Read> Probe<R> {
	/// Wrap a reader in a `Probe`
	///
	/// The probe reads in small chunks, so a [`BufReader`] around the inner
	/// reader pays off.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::probe::Probe;
	/// use std::fs::File;
	/// use std::io::BufReader;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// let file = File::open("song.ogg")?;
	/// let reader = BufReader::new(file);
	///
	/// let probe = Probe::new(reader);
	/// # Ok(()) }
	/// ```
	#[must_use]
	pub const fn new(reader: R) -> Self {
		Self {
			inner: reader,
			options: None,
			f_ty: None,
		}
	}

	/// Wrap a reader whose [`FileType`] is already known
	///
	/// As with [`Probe::new`], a [`BufReader`] around the inner reader
	/// pays off.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::file::FileType;
	/// use audiotag::probe::Probe;
	/// use std::fs::File;
	/// use std::io::BufReader;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// // We know the file is going to be an Ogg Vorbis file
	/// let file = File::open("song.ogg")?;
	/// let reader = BufReader::new(file);
	///
	/// let probe = Probe::with_file_type(reader, FileType::Vorbis);
	/// # Ok(()) }
	/// ```
	pub fn with_file_type(reader: R, file_type: FileType) -> Self {
		Self {
			inner: reader,
			options: None,
			f_ty: Some(file_type),
		}
	}

	/// The [`FileType`] the probe has settled on so far, if any
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::file::FileType;
	/// use audiotag::probe::Probe;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// # let reader = std::io::Cursor::new(&[]);
	/// let probe = Probe::new(reader);
	///
	/// let file_type = probe.file_type();
	/// # Ok(()) }
	/// ```
	pub fn file_type(&self) -> Option<FileType> {
		self.f_ty
	}

	/// Override the [`FileType`] the file will be read as
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::file::FileType;
	/// use audiotag::probe::Probe;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// # let reader = std::io::Cursor::new(&[]);
	/// let mut probe = Probe::new(reader);
	/// assert_eq!(probe.file_type(), None);
	///
	/// let probe = probe.set_file_type(FileType::Vorbis);
	///
	/// assert_eq!(probe.file_type(), Some(FileType::Vorbis));
	/// # Ok(()) }
	/// ```
	pub fn set_file_type(mut self, file_type: FileType) -> Self {
		self.f_ty = Some(file_type);
		self
	}

	/// Attach [`ParseOptions`] to use when reading
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::config::ParseOptions;
	/// use audiotag::probe::Probe;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// # let reader = std::io::Cursor::new(&[]);
	/// // By default, tags will be read.
	/// // In this example, we want to turn this off.
	/// let options = ParseOptions::new().read_tags(false);
	///
	/// let probe = Probe::new(reader).options(options);
	/// # Ok(()) }
	/// ```
	#[must_use]
	pub fn options(mut self, options: ParseOptions) -> Self {
		self.options = Some(options);
		self
	}

	/// Unwrap the probe, handing the reader back
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::probe::Probe;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// # let reader = std::io::Cursor::new(&[]);
	/// let probe = Probe::new(reader);
	///
	/// let reader = probe.into_inner();
	/// # Ok(()) }
	/// ```
	pub fn into_inner(self) -> R {
		self.inner
	}
}

impl Probe<BufReader<File>> {
	/// Open the file at `path` for reading
	///
	/// The initial [`FileType`] guess comes from the extension, a later
	/// [`Probe::guess_file_type`] or [`Probe::set_file_type`] can replace it.
	///
	/// # Errors
	///
	/// * `path` can't be opened
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::file::FileType;
	/// use audiotag::probe::Probe;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// let probe = Probe::open("song.spx")?;
	///
	/// // Guessed from the "spx" extension, see `FileType::from_ext`
	/// assert_eq!(probe.file_type(), Some(FileType::Speex));
	/// # Ok(()) }
	/// ```
	pub fn open<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		log::debug!("Probe: Opening `{}` for reading", path.display());

		let file_type = FileType::from_path(path);
		log::debug!("Probe: Guessed file type `{:?}` from extension", file_type);

		Ok(Self {
			inner: BufReader::new(File::open(path)?),
			options: None,
			f_ty: file_type,
		})
	}
}

impl<R: Read + Seek> Probe<R> {
	/// Sniff the reader's content for its [`FileType`]
	///
	/// A successful sniff replaces the current file type, an unsuccessful
	/// one leaves it alone.
	///
	/// The sniff honors the [`ParseOptions`] attached via [`Probe::options()`].
	/// Files with a lot of leading junk may need a larger junk allowance than
	/// [`ParseOptions::DEFAULT_MAX_JUNK_BYTES`] to be detected.
	///
	/// # Errors
	///
	/// Only [`std::io::Error`] comes out of here. After one, the reader is in
	/// an unknown state and the `Probe` should be discarded.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::file::FileType;
	/// use audiotag::probe::Probe;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// # let file = std::fs::File::open("song.ogg")?;
	/// # let reader = std::io::BufReader::new(file);
	/// let probe = Probe::new(reader).guess_file_type()?;
	///
	/// // Determined the file is Ogg Vorbis from the content
	/// assert_eq!(probe.file_type(), Some(FileType::Vorbis));
	/// # Ok(()) }
	/// ```
	pub fn guess_file_type(mut self) -> std::io::Result<Self> {
		let max_junk_bytes = self
			.options
			.map_or(ParseOptions::DEFAULT_MAX_JUNK_BYTES, |options| {
				options.max_junk_bytes
			});

		let f_ty = self.guess_inner(max_junk_bytes)?;
		self.f_ty = f_ty.or(self.f_ty);

		log::debug!("Probe: Guessed file type: {:?}", self.f_ty);

		Ok(self)
	}

	// Fill `buf` from the current position without consuming the reader,
	// returning how many bytes were available
	fn peek_sniff_buffer(&mut self, buf: &mut [u8; SNIFF_LEN]) -> std::io::Result<usize> {
		let position = self.inner.stream_position()?;

		let filled = std::io::copy(
			&mut self.inner.by_ref().take(buf.len() as u64),
			&mut Cursor::new(&mut buf[..]),
		)? as usize;

		self.inner.seek(SeekFrom::Start(position))?;
		Ok(filled)
	}

	fn guess_inner(&mut self, max_junk_bytes: usize) -> std::io::Result<Option<FileType>> {
		let starting_position = self.inner.stream_position()?;

		let mut buf = [0; SNIFF_LEN];
		let buf_len = self.peek_sniff_buffer(&mut buf)?;

		let Some(file_type_guess) = FileType::from_buffer_inner(&buf[..buf_len]) else {
			return Ok(None);
		};

		match file_type_guess {
			// We were able to determine a file type
			FileTypeGuessResult::Determined(file_ty) => Ok(Some(file_ty)),
			// The file starts with an ID3v2 tag; other data can follow (e.g. a TTA stream)
			FileTypeGuessResult::MaybePrecededById3(id3_len) => {
				// `id3_len` is the size of the tag, not including the header (10 bytes)
				log::debug!("Probe: ID3v2 tag detected, skipping {} bytes", 10 + id3_len);
				self.inner.seek(SeekFrom::Current(i64::from(10 + id3_len)))?;

				// Sniff again at the position following the ID3 block
				let mut buf = [0; SNIFF_LEN];
				let buf_len = self.peek_sniff_buffer(&mut buf)?;

				let guess = match FileType::from_buffer(&buf[..buf_len]) {
					ret @ Some(_) => Ok(ret),
					// The stream marker may be preceded by junk
					None => self.search_for_stream_marker(max_junk_bytes),
				};

				// before returning any result for a file type, seek back to the front
				self.inner.seek(SeekFrom::Start(starting_position))?;

				guess
			},
			FileTypeGuessResult::MaybePrecededByJunk => {
				log::debug!(
					"Probe: Possible junk bytes detected, searching up to {} bytes",
					max_junk_bytes
				);

				let ret = self.search_for_stream_marker(max_junk_bytes);

				// before returning any result for a file type, seek back to the front
				self.inner.seek(SeekFrom::Start(starting_position))?;

				ret
			},
		}
	}

	/// Scan forward for a stream marker (`OggS` or `TTA1`) buried behind junk bytes
	fn search_for_stream_marker(
		&mut self,
		max_junk_bytes: usize,
	) -> std::io::Result<Option<FileType>> {
		let search_window_start = self.inner.stream_position()?;

		// Past the marker itself, the sniff still needs its full window
		let mut search_window = Vec::with_capacity(max_junk_bytes + SNIFF_LEN);
		self.inner
			.by_ref()
			.take((max_junk_bytes + SNIFF_LEN) as u64)
			.read_to_end(&mut search_window)?;

		for (junk_len, window) in search_window.windows(4).take(max_junk_bytes).enumerate() {
			if window != b"OggS" && window != b"TTA1" {
				continue;
			}

			log::debug!(
				"Probe: Found possible stream marker at position {}",
				search_window_start + junk_len as u64
			);

			return Ok(FileType::from_buffer(&search_window[junk_len..]));
		}

		Ok(None)
	}

	/// Parse the reader into a [`TaggedFile`]
	///
	/// # Errors
	///
	/// * The file type is still unset. Readers that didn't come from a path
	///   need a [`Probe::guess_file_type`] or [`Probe::set_file_type`] first.
	/// * The reader holds invalid data
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::file::FileType;
	/// use audiotag::probe::Probe;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// # let file = std::fs::File::open("song.ogg")?;
	/// # let reader = std::io::BufReader::new(file);
	/// let probe = Probe::new(reader).guess_file_type()?;
	///
	/// let parsed_file = probe.read()?;
	/// # Ok(()) }
	/// ```
	pub fn read(mut self) -> Result<TaggedFile> {
		let reader = &mut self.inner;
		let options = self.options.unwrap_or_default();

		if !options.read_tags {
			log::warn!("Skipping tag reading, file will be empty");
		}

		let Some(f_type) = self.f_ty else {
			err!(UnknownFormat);
		};

		match f_type {
			FileType::Vorbis => Ok(VorbisFile::read_from(reader, options)?.into()),
			FileType::Speex => Ok(SpeexFile::read_from(reader, options)?.into()),
			FileType::TrueAudio => Ok(TrueAudioFile::read_from(reader, options)?.into()),
		}
	}
}

/// Read a [`TaggedFile`] from an open [File]
///
/// The format is sniffed from the file content.
///
/// # Errors
///
/// See [`Probe::guess_file_type`] and [`Probe::read`]
///
/// # Examples
///
/// ```rust,no_run
/// use audiotag::read_from;
/// use std::fs::File;
///
/// # fn main() -> audiotag::error::Result<()> {
/// let mut file = File::open("song.ogg")?;
///
/// let parsed_file = read_from(&mut file)?;
/// # Ok(()) }
/// ```
pub fn read_from(file: &mut File) -> Result<TaggedFile> {
	Probe::new(BufReader::new(file)).guess_file_type()?.read()
}

/// Read a [`TaggedFile`] from a path
///
/// The [`FileType`] comes from the extension alone.
///
/// # Errors
///
/// See [`Probe::open`] and [`Probe::read`]
///
/// # Examples
///
/// ```rust,no_run
/// use audiotag::read_from_path;
///
/// # fn main() -> audiotag::error::Result<()> {
/// let parsed_file = read_from_path("song.ogg")?;
/// # Ok(()) }
/// ```
pub fn read_from_path<P>(path: P) -> Result<TaggedFile>
where
	P: AsRef<Path>,
{
	Probe::open(path)?.read()
}

#[cfg(test)]
mod tests {
	use crate::file::FileType;
	use crate::probe::Probe;

	use std::io::{Cursor, Seek, SeekFrom};

	fn fake_ogg_page(codec_ident: &[u8]) -> Vec<u8> {
		// A bare Ogg page header followed by the codec identification bytes,
		// enough for the content sniff (the sniff only looks at the first 36 bytes)
		let mut page = Vec::new();
		page.extend_from_slice(b"OggS");
		page.extend_from_slice(&[0; 22]);
		page.push(1); // segment count
		page.push(codec_ident.len() as u8);
		page.extend_from_slice(codec_ident);
		// Pad out to the 36 bytes the sniff wants to see
		page.resize(36, 0);
		page
	}

	#[test_log::test]
	fn guess_vorbis_from_content() {
		let data = fake_ogg_page(&[1, b'v', b'o', b'r', b'b', b'i', b's']);

		let probe = Probe::new(Cursor::new(&data)).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), Some(FileType::Vorbis));
	}

	#[test_log::test]
	fn guess_speex_from_content() {
		let data = fake_ogg_page(b"Speex   ");

		let probe = Probe::new(Cursor::new(&data)).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), Some(FileType::Speex));
	}

	#[test_log::test]
	fn guess_tta_from_content() {
		let data = b"TTA1\x01\x00\x02\x00".to_vec();

		let probe = Probe::new(Cursor::new(&data)).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), Some(FileType::TrueAudio));
	}

	#[test_log::test]
	fn guess_tta_with_id3v2() {
		// An ID3v2.4 header with a 10 byte (unsynchronised) tag size, 10 bytes of
		// frame data, and then the TTA stream marker
		let data: [&[u8]; 3] = [
			&[0x49, 0x44, 0x33, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A],
			&[0; 10],
			b"TTA1\x01\x00\x02\x00",
		];
		let data: Vec<u8> = data.into_iter().flatten().copied().collect();

		let probe = Probe::new(Cursor::new(&data)).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), Some(FileType::TrueAudio));
	}

	#[test_log::test]
	fn guess_vorbis_with_leading_junk() {
		let mut data = vec![0x20; 20];
		data.extend(fake_ogg_page(&[1, b'v', b'o', b'r', b'b', b'i', b's']));

		let probe = Probe::new(Cursor::new(&data)).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), Some(FileType::Vorbis));
	}

	#[test_log::test]
	fn guess_restores_stream_position() {
		let data = fake_ogg_page(&[1, b'v', b'o', b'r', b'b', b'i', b's']);

		let mut cursor = Cursor::new(&data);
		cursor.seek(SeekFrom::Start(0)).unwrap();

		let probe = Probe::new(cursor).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), Some(FileType::Vorbis));

		let cursor = probe.into_inner();
		assert_eq!(cursor.position(), 0);
	}

	#[test_log::test]
	fn unknown_content_has_no_file_type() {
		let data = vec![0xFF; 64];

		let probe = Probe::new(Cursor::new(&data)).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), None);
	}
}
