use std::borrow::Cow;

#[cfg(doc)]
use crate::{ogg::VorbisComments, tag::Tag};

// Generates the `Accessor` trait, one getter/setter/remover triple per field.
//
// Usage:
//
// accessor_trait! {
//     [field name]<type>
// }
//
// Multi-word method names are written as space-separated segments inside the
// brackets, e.g. [track total] produces `track_total`/`set_track_total`/
// `remove_track_total`.
//
// The getter returns `Option<type>`. When the setter should take ownership of
// a different type, give it as a second parameter:
//
// accessor_trait! {
//     [field name]<type, owned_type>
// }
macro_rules! accessor_trait {
	($([$($name:tt)+] < $($ty:ty),+ >),+ $(,)?) => {
		/// Uniform accessors for the fields every tag format shares
		///
		/// The methods stick to items common across all formats, with only
		/// a few exceptions.
		///
		/// In formats that allow repeated values, the setters **overwrite**
		/// rather than append. Appending needs the format-specific methods,
		/// such as [`Tag::push()`] or [`VorbisComments::push()`].
		pub trait Accessor {
			$(
				accessor_trait! { @getter [$($name)+] $($ty),+ }

				accessor_trait! { @setter [$($name)+] $($ty),+ }

				accessor_trait! { @remover [$($name)+] $($ty),+ }
			)+
		}
	};
	(@getter [$($name:tt)+] $ty:ty $(, $_ty:tt)?) => {
		accessor_trait! { @get_method [$($name)+] Option<$ty> }
	};
	(@setter [$($name:tt)+] $_ty:ty, $owned_ty:tt) => {
		accessor_trait! { @set_method [$($name)+] $owned_ty }
	};
	(@setter [$($name:tt)+] $ty:ty) => {
		accessor_trait! { @set_method [$($name)+] $ty }
	};
	(@remover [$($name:tt)+] $_ty:ty, $owned_ty:tt) => {
		accessor_trait! { @remove_method [$($name)+], $owned_ty }
	};
	(@remover [$($name:tt)+] $ty:ty) => {
		accessor_trait! { @remove_method [$($name)+], $ty }
	};
	(@get_method [$name:tt $($other:tt)*] Option<$ret_ty:ty>) => {
		paste::paste! {
			#[doc = "The " $name $(" " $other)* ", if one is set."]
			///
			/// In formats that allow repeated values, only the first occurrence
			/// is returned.
			///
			/// # Example
			///
			/// ```rust
			/// use audiotag::tag::{Accessor, Tag};
			///
			/// # let tag_type = audiotag::tag::TagType::VorbisComments;
			/// let mut tag = Tag::new(tag_type);
			#[doc = "assert_eq!(tag." $name $(_ $other)* "(), None);"]
			/// ```
			fn [<
				$name $(_ $other)*
			>] (&self) -> Option<$ret_ty> { None }
		}
	};
	(@set_method [$name:tt $($other:tt)*] $owned_ty:ty) => {
		paste::paste! {
			#[doc = "Replace the " $name $(" " $other)* "."]
			///
			/// In formats that allow repeated values, **all** existing values
			/// make way for `value`.
			///
			/// # Example
			///
			/// ```rust,ignore
			/// use audiotag::tag::{Accessor, Tag};
			///
			/// let mut tag = Tag::new(tag_type);
			#[doc = "tag.set_" $name $(_ $other)* "(value);"]
			///
			#[doc = "assert_eq!(tag." $name $(_ $other)* "(), Some(value));"]
			/// ```
			fn [<
				set_ $name $(_ $other)*
			>] (&mut self , _value: $owned_ty) {}
		}
	};
	(@remove_method [$name:tt $($other:tt)*], $ty:ty) => {
		paste::paste! {
			#[doc = "Remove the " $name $(" " $other)*]
			/// # Example
			///
			/// ```rust,ignore
			/// use audiotag::tag::{Accessor, Tag};
			///
			/// let mut tag = Tag::new(tag_type);
			#[doc = "tag.set_" $name $(_ $other)* "(value);"]
			///
			#[doc = "assert_eq!(tag." $name $(_ $other)* "(), Some(value));"]
			///
			#[doc = "tag.remove_" $name $(_ $other)* "();"]
			///
			#[doc = "assert_eq!(tag." $name $(_ $other)* "(), None);"]
			/// ```
			fn [<
				remove_ $name $(_ $other)*
			>] (&mut self) {}
		}
	};
}

accessor_trait! {
	[artist]<Cow<'_, str>, String>, [title      ]<Cow<'_, str>, String>,
	[album ]<Cow<'_, str>, String>, [genre      ]<Cow<'_, str>, String>,
	[track ]<u32>,                  [track total]<u32>,
	[disk  ]<u32>,                  [disk total ]<u32>,
	[year  ]<u32>,                  [comment    ]<Cow<'_, str>, String>,
}
