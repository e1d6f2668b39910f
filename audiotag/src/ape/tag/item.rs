use crate::ape::constants::INVALID_KEYS;
use crate::error::{Result, TagError};
use crate::macros::decode_err;
use crate::tag::item::ItemValueRef;
use crate::tag::{ItemValue, TagItem, TagType};

use std::borrow::Cow;

/// Represents an `APE` tag item
///
/// The restrictions for `APE` lie in the key rather than the value,
/// so these are still able to use [`ItemValue`]s
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ApeItem {
	/// Whether or not to mark the item as read only
	pub read_only: bool,
	pub(crate) key: String,
	pub(crate) value: ItemValue,
}

impl ApeItem {
	pub(crate) const EMPTY: Self = Self {
		read_only: false,
		key: String::new(),
		value: ItemValue::Text(String::new()),
	};

	/// Create an `ApeItem`
	///
	/// # Errors
	///
	/// * `key` is illegal ("ID3", "TAG", "OGGS", "MP+")
	/// * `key` has an invalid length (must be 2 to 255 bytes)
	/// * `key` contains invalid characters (must be in the range 0x20 to 0x7E)
	///
	/// # Examples
	///
	/// ```rust
	/// use audiotag::ape::ApeItem;
	/// use audiotag::tag::ItemValue;
	///
	/// # fn main() -> audiotag::error::Result<()> {
	/// let ape_item = ApeItem::new(
	/// 	String::from("Title"),
	/// 	ItemValue::Text(String::from("Foo title")),
	/// )?;
	/// # Ok(()) }
	/// ```
	pub fn new(key: String, value: ItemValue) -> Result<Self> {
		if INVALID_KEYS.contains(&&*key.to_uppercase()) {
			decode_err!(@BAIL "APE: Item key is reserved");
		}

		if !(2..=255).contains(&key.len()) {
			decode_err!(@BAIL "APE: Item key must be 2 to 255 bytes");
		}

		if key.chars().any(|c| !(' '..='~').contains(&c)) {
			decode_err!(@BAIL "APE: Item key contains characters outside 0x20..=0x7E");
		}

		Ok(Self {
			read_only: false,
			key,
			value,
		})
	}

	pub(crate) fn text(key: &str, value: String) -> Self {
		Self {
			read_only: false,
			key: String::from(key),
			value: ItemValue::Text(value),
		}
	}

	/// Returns the item key
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the item value
	pub fn value(&self) -> &ItemValue {
		&self.value
	}

	/// Consumes the item, returning its value
	pub fn into_value(self) -> ItemValue {
		self.value
	}
}

impl TryFrom<TagItem> for ApeItem {
	type Error = TagError;

	fn try_from(value: TagItem) -> std::result::Result<Self, Self::Error> {
		let key = value
			.item_key
			.map_key(TagType::Ape)
			.ok_or_else(|| decode_err!("APE: No APE key exists for the given item key"))?
			.to_string();

		Self::new(key, value.item_value)
	}
}

pub(crate) struct ApeItemRef<'a> {
	pub read_only: bool,
	pub key: &'a str,
	pub value: ItemValueRef<'a>,
}

impl<'a> From<&'a ApeItem> for ApeItemRef<'a> {
	fn from(input: &'a ApeItem) -> Self {
		Self {
			read_only: input.read_only,
			key: input.key(),
			value: (&input.value).into(),
		}
	}
}

impl ApeItemRef<'_> {
	pub(crate) fn as_bytes(&self) -> &[u8] {
		match self.value {
			ItemValueRef::Text(ref text) => text.as_bytes(),
			ItemValueRef::Locator(locator) => locator.as_bytes(),
			ItemValueRef::Binary(binary) => binary,
		}
	}
}

impl<'a> From<Cow<'a, str>> for ItemValueRef<'a> {
	fn from(input: Cow<'a, str>) -> Self {
		ItemValueRef::Text(input)
	}
}
