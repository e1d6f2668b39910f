//! Traits that let tag writers target anything file-shaped

use crate::error::TagError;

use std::convert::Infallible;
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};

/// Provides a method to truncate an object to the specified length
///
/// This is one component of the [`FileLike`] trait, which grants access to the
/// saving methods such as [`AudioFile::save_to`](crate::file::AudioFile::save_to).
///
/// Take great care in implementing this for downstream types. The writers trust
/// that the container really has the new length afterwards, and a broken
/// implementation **will** corrupt files.
///
/// # Examples
///
/// ```rust
/// use audiotag::io::Truncate;
///
/// let mut data = vec![1, 2, 3, 4, 5];
/// data.truncate(3);
///
/// assert_eq!(data, vec![1, 2, 3]);
/// ```
pub trait Truncate {
	/// The error type of the truncation operation
	type Error: Into<TagError>;

	/// Truncate a storage object to the specified length
	///
	/// # Errors
	///
	/// Errors depend on the object being truncated, which may not always be fallible.
	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error>;
}

/// Provides a method to get the length of a storage object
///
/// This is one component of the [`FileLike`] trait, which grants access to the
/// saving methods such as [`AudioFile::save_to`](crate::file::AudioFile::save_to).
///
/// Take great care in implementing this for downstream types. The writers trust
/// the reported length, and a wrong one **may** corrupt files.
///
/// # Examples
///
/// ```rust
/// use audiotag::io::Length;
///
/// let data = vec![1, 2, 3, 4, 5];
/// assert_eq!(data.len(), 5);
/// ```
pub trait Length {
	/// The error type of the length operation
	type Error: Into<TagError>;

	/// Get the length of a storage object
	///
	/// # Errors
	///
	/// Errors depend on the object being read, which may not always be fallible.
	fn len(&self) -> std::result::Result<u64, Self::Error>;
}

impl Truncate for File {
	type Error = std::io::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.set_len(new_len)
	}
}

impl Length for File {
	type Error = std::io::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		self.metadata().map(|m| m.len())
	}
}

impl Truncate for Vec<u8> {
	type Error = Infallible;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.truncate(new_len as usize);
		Ok(())
	}
}

impl Length for Vec<u8> {
	type Error = Infallible;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Ok(self.len() as u64)
	}
}

impl<T> Truncate for Cursor<T>
where
	T: Truncate,
{
	type Error = <T as Truncate>::Error;

	fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
		self.get_mut().truncate(new_len)
	}
}

impl<T> Length for Cursor<T>
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(self.get_ref())
	}
}

// Smart pointers and references defer to their target
macro_rules! delegate_impls {
	($($ty:ty, [$($trait_name:ident),+]);+ $(;)?) => {
		$(
			delegate_impls!(@impl $ty, $($trait_name),+);
		)+
	};
	(@impl $ty:ty, Truncate $(, $($rest:ident),+)?) => {
		impl<T> Truncate for $ty
		where
			T: Truncate,
		{
			type Error = <T as Truncate>::Error;

			fn truncate(&mut self, new_len: u64) -> std::result::Result<(), Self::Error> {
				(**self).truncate(new_len)
			}
		}

		$(delegate_impls!(@impl $ty, $($rest),+);)?
	};
	(@impl $ty:ty, Length $(, $($rest:ident),+)?) => {
		impl<T> Length for $ty
		where
			T: Length,
		{
			type Error = <T as Length>::Error;

			fn len(&self) -> std::result::Result<u64, Self::Error> {
				Length::len(&**self)
			}
		}

		$(delegate_impls!(@impl $ty, $($rest),+);)?
	};
}

delegate_impls! {
	Box<T>, [Truncate, Length];
	&mut T, [Truncate, Length];
}

impl<T> Length for &T
where
	T: Length,
{
	type Error = <T as Length>::Error;

	fn len(&self) -> std::result::Result<u64, Self::Error> {
		Length::len(*self)
	}
}

/// Provides a set of methods to read and write to a file-like object
///
/// This is a combination of the [`Read`], [`Write`], [`Seek`], [`Truncate`], and [`Length`] traits.
/// It is what the saving methods such as
/// [`AudioFile::save_to`](crate::file::AudioFile::save_to) accept.
///
/// Take great care in implementing this for downstream types. The writers trust
/// these implementations, and incorrect ones **may** corrupt files.
pub trait FileLike: Read + Write + Seek + Truncate + Length
where
	<Self as Truncate>::Error: Into<TagError>,
	<Self as Length>::Error: Into<TagError>,
{
}

impl<T> FileLike for T
where
	T: Read + Write + Seek + Truncate + Length,
	<T as Truncate>::Error: Into<TagError>,
	<T as Length>::Error: Into<TagError>,
{
}
