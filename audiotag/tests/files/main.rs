#![allow(missing_docs)]

mod ogg;
mod tta;
pub(crate) mod util;
