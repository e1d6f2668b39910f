//! Error types
//!
//! All fallible operations in this crate return [`TagError`], whose
//! [`ErrorKind`] describes what actually went wrong.

use crate::file::FileType;

use std::collections::TryReserveError;
use std::convert::Infallible;
use std::fmt::{Debug, Display, Formatter};

use oggframe::PageError;

/// Alias for `Result<T, TagError>`
pub type Result<T> = std::result::Result<T, TagError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	/// No format could be guessed for the input
	UnknownFormat,
	/// A tag's layout does not match its format
	MalformedTag(MalformedTagError),
	/// A length field describes more data than can possibly be present
	TooMuchData,
	/// A size field disagrees with the data it describes
	///
	/// Raised when an item or tag declares one size, but the surrounding
	/// structure only leaves room for another.
	SizeMismatch,
	/// The given data is not a picture
	NotAPicture,
	/// The target format cannot hold the given tag type
	UnsupportedTag,
	/// The target format supports reading the tag type, but not writing it
	NotWritable,
	/// Text could not be decoded in the expected encoding
	TextDecode(&'static str),
	/// Text could not be represented in the target encoding
	TextEncode(&'static str),

	/// An error bubbled up from [`oggframe`]
	OggPage(PageError),
	/// A `Vec<u8>` could not be converted to a `String`
	StringFromUtf8(std::string::FromUtf8Error),
	/// A `&[u8]` could not be converted to a `&str`
	StrFromUtf8(std::str::Utf8Error),
	/// Any [`std::io::Error`]
	Io(std::io::Error),
	/// An allocation was refused
	Alloc(TryReserveError),
}

/// A tag whose on-disk layout disagrees with its format
pub struct MalformedTagError {
	format: Option<FileType>,
	description: &'static str,
}

impl MalformedTagError {
	/// Create a `MalformedTagError` tied to a [`FileType`]
	#[must_use]
	pub const fn new(format: FileType, description: &'static str) -> Self {
		Self {
			format: Some(format),
			description,
		}
	}

	/// Create a `MalformedTagError` with a description alone
	pub fn from_description(description: &'static str) -> Self {
		Self {
			format: None,
			description,
		}
	}

	/// The [`FileType`] being parsed when the error arose, if known
	pub fn format(&self) -> Option<FileType> {
		self.format
	}

	/// A human-readable description of the error
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for MalformedTagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.format {
			Some(format) => write!(f, "{:?}: {:?}", format, self.description),
			None => write!(f, "{:?}", self.description),
		}
	}
}

impl Display for MalformedTagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.format {
			Some(format) => write!(f, "{:?}: {}", format, self.description),
			None => f.write_str(self.description),
		}
	}
}

/// The error type used throughout this crate
pub struct TagError {
	pub(crate) kind: ErrorKind,
}

impl TagError {
	/// Create a `TagError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::error::{ErrorKind, TagError};
	///
	/// let error = TagError::new(ErrorKind::NotWritable);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// The [`ErrorKind`] backing this error
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::error::{ErrorKind, TagError};
	///
	/// let error = TagError::new(ErrorKind::NotWritable);
	/// assert!(matches!(error.kind(), ErrorKind::NotWritable));
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for TagError {}

impl Debug for TagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

macro_rules! impl_from {
	($($source:ty => $variant:ident),+ $(,)?) => {
		$(
			impl From<$source> for TagError {
				fn from(input: $source) -> Self {
					Self {
						kind: ErrorKind::$variant(input),
					}
				}
			}
		)+
	};
}

impl_from! {
	MalformedTagError => MalformedTag,
	PageError => OggPage,
	std::io::Error => Io,
	std::string::FromUtf8Error => StringFromUtf8,
	std::str::Utf8Error => StrFromUtf8,
	TryReserveError => Alloc,
}

// Satisfies the `Truncate`/`Length` bounds for targets that cannot fail,
// such as `Vec<u8>` and `Cursor`
impl From<Infallible> for TagError {
	fn from(input: Infallible) -> Self {
		match input {}
	}
}

impl Display for TagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			ErrorKind::OggPage(ref err) => Display::fmt(err, f),
			ErrorKind::StringFromUtf8(ref err) => Display::fmt(err, f),
			ErrorKind::StrFromUtf8(ref err) => Display::fmt(err, f),
			ErrorKind::Io(ref err) => Display::fmt(err, f),
			ErrorKind::Alloc(ref err) => Display::fmt(err, f),
			ErrorKind::MalformedTag(ref err) => Display::fmt(err, f),

			ErrorKind::UnknownFormat => {
				f.write_str("Unable to determine a format for the provided file")
			},
			ErrorKind::TooMuchData => {
				f.write_str("A length field describes an impossible amount of data")
			},
			ErrorKind::SizeMismatch => {
				f.write_str("A size field disagrees with its surrounding structure")
			},
			ErrorKind::NotAPicture => f.write_str("The provided data is not a picture"),
			ErrorKind::UnsupportedTag => {
				f.write_str("The file format cannot hold the given tag type")
			},
			ErrorKind::NotWritable => {
				f.write_str("The file format does not support writing the given tag type")
			},
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(message) => write!(f, "Text encoding: {message}"),
		}
	}
}
