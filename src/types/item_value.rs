use crate::picture::Picture;

/// The value half of a [`super::tag_item::TagItem`]
#[derive(Clone, Debug, PartialEq)]
pub enum ItemValue {
	/// A single UTF-8 string, or several joined by the format's native separator
	Text(String),
	/// A list of UTF-8 strings, for formats that store repeated keys natively (Vorbis-Comment)
	/// or keep an internal list (MP4's `trkn`/`disk` pairs are represented via [`ItemValue::UnsignedInt`] instead)
	Locator(String),
	/// An unsigned integer (MP4 `trkn`/track number, ID3v2 numeric-as-text frames once parsed)
	UnsignedInt(u32),
	/// A boolean flag (MP4's `cpil`/`pgap` atoms)
	Boolean(bool),
	/// Arbitrary binary data with no further structure
	Binary(Vec<u8>),
	/// A picture
	Picture(Picture),
}

impl ItemValue {
	/// Borrow as a string slice, when the value holds text
	pub fn text(&self) -> Option<&str> {
		match self {
			Self::Text(s) | Self::Locator(s) => Some(s.as_str()),
			_ => None,
		}
	}
}
