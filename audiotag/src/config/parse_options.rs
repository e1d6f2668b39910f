/// Knobs for how a file is parsed
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) read_tags: bool,
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) max_junk_bytes: usize,
	pub(crate) read_cover_art: bool,
}

impl Default for ParseOptions {
	/// The standard settings, equivalent to:
	///
	/// ```rust,ignore
	/// ParseOptions {
	///     read_tags: true,
	/// 	parsing_mode: ParsingMode::BestAttempt,
	///     max_junk_bytes: 1024,
	///     read_cover_art: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// The parsing mode used unless one is set
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// The junk byte allowance used unless one is set
	pub const DEFAULT_MAX_JUNK_BYTES: usize = 1024;

	/// Fresh options with every field at its default
	///
	/// See also: [`ParseOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			read_tags: true,
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			max_junk_bytes: Self::DEFAULT_MAX_JUNK_BYTES,
			read_cover_art: true,
		}
	}

	/// Whether or not to read the tags
	///
	/// Disable this when only stream information is of interest.
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::config::ParseOptions;
	///
	/// // Tags are read by default, skip them this time
	/// let parsing_options = ParseOptions::new().read_tags(false);
	/// ```
	pub fn read_tags(&mut self, read_tags: bool) -> Self {
		self.read_tags = read_tags;
		*self
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::config::{ParseOptions, ParsingMode};
	///
	/// // The default is `ParsingMode::BestAttempt`, ask for absolute correctness instead
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// How many junk bytes a search may skip over
	///
	/// Unrecognized bytes, such as tag padding remnants, may sit in front of
	/// the information being searched for. This sets how many of them are
	/// skipped over before the search is abandoned.
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::config::ParseOptions;
	///
	/// // These files are full of junk, double the search window
	/// let parsing_options = ParseOptions::new().max_junk_bytes(2048);
	/// ```
	pub fn max_junk_bytes(&mut self, max_junk_bytes: usize) -> Self {
		self.max_junk_bytes = max_junk_bytes;
		*self
	}

	/// Whether or not to read cover art
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::config::ParseOptions;
	///
	/// // Reading cover art is expensive and not always needed
	/// let parsing_options = ParseOptions::new().read_cover_art(false);
	/// ```
	pub fn read_cover_art(&mut self, read_cover_art: bool) -> Self {
		self.read_cover_art = read_cover_art;
		*self
	}
}

/// How forgiving the parsers are towards malformed input
///
/// Set with [`ParseOptions::parsing_mode`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Error out at the first non-conformant byte
	///
	/// Nothing is salvaged, any deviation from the format aborts the parse.
	Strict,
	/// Recover what can be recovered, the default
	///
	/// Holes in otherwise valid input are filled in where possible, only
	/// unrecoverable damage aborts the parse.
	#[default]
	BestAttempt,
	/// Keep going at almost any cost
	///
	/// Invalid fields are dropped outright and the parse continues. The
	/// output may be partial.
	Relaxed,
}
