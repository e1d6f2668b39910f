/// Options to control how tags are written to a file
///
/// This collects settings that individual formats interpret as applicable, so it
/// works well as an application-wide config that gets set once.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) remove_others: bool,
	pub(crate) respect_read_only: bool,
	pub(crate) lossy_text_encoding: bool,
}

impl WriteOptions {
	/// Fresh options with every field at its default
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			remove_others: false,
			respect_read_only: true,
			lossy_text_encoding: true,
		}
	}

	/// Whether writing one tag strips every other tag from the file
	///
	/// With this set, the written tag ends up as the only one in the file.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::config::WriteOptions;
	/// use audiotag::prelude::*;
	/// use audiotag::tag::{Tag, TagType};
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// let mut ape_tag = Tag::new(TagType::Ape);
	///
	/// // ...
	///
	/// // Keep only the APE tag in the file
	/// let options = WriteOptions::new().remove_others(true);
	/// ape_tag.save_to_path("test.tta", options)?;
	/// # Ok(()) }
	/// ```
	pub fn remove_others(mut self, remove_others: bool) -> Self {
		self.remove_others = remove_others;
		self
	}

	/// Whether items flagged read-only survive a rewrite
	///
	/// Some formats let an item be flagged read-only. With this set, such
	/// items win over freshly written ones.
	///
	/// An `APE` tag can additionally flag itself read-only as a whole, in
	/// which case its items are appended to the new tag.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use audiotag::config::WriteOptions;
	/// use audiotag::prelude::*;
	/// use audiotag::tag::{Tag, TagType};
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// let mut ape_tag = Tag::new(TagType::Ape);
	///
	/// // ...
	///
	/// // Overwrite read-only items with the new ones
	/// let options = WriteOptions::new().respect_read_only(false);
	/// ape_tag.save_to_path("test.tta", options)?;
	/// # Ok(()) }
	/// ```
	pub fn respect_read_only(mut self, respect_read_only: bool) -> Self {
		self.respect_read_only = respect_read_only;
		self
	}

	/// Whether text may be mangled to fit a narrow encoding
	///
	/// ID3v1 text fields are Latin-1. With this set, characters outside of
	/// Latin-1 are written as `'?'`. Without it, such text errors instead.
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::config::WriteOptions;
	///
	/// // Better to fail than to mangle the text
	/// let options = WriteOptions::new().lossy_text_encoding(false);
	/// ```
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}
}

impl Default for WriteOptions {
	/// The standard settings, equivalent to:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     remove_others: false,
	///     respect_read_only: true,
	///     lossy_text_encoding: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
