use crate::tag::{ItemKey, Tag};

/// Format-independent convenience getters, implemented in terms of [`ItemKey`] lookups.
///
/// Any concrete tag type that implements [`TagExt`]-style item access gets these for free by
/// delegating to its generic [`Tag`] view.
pub trait Accessor {
	/// The track title
	fn title(&self) -> Option<&str> {
		None
	}
	/// The track artist
	fn artist(&self) -> Option<&str> {
		None
	}
	/// The album title
	fn album(&self) -> Option<&str> {
		None
	}
	/// The genre
	fn genre(&self) -> Option<&str> {
		None
	}
	/// The track number
	fn track(&self) -> Option<u32> {
		None
	}
}

impl Accessor for Tag {
	fn title(&self) -> Option<&str> {
		self.get_string(&ItemKey::Title)
	}

	fn artist(&self) -> Option<&str> {
		self.get_string(&ItemKey::TrackArtist)
	}

	fn album(&self) -> Option<&str> {
		self.get_string(&ItemKey::AlbumTitle)
	}

	fn genre(&self) -> Option<&str> {
		self.get_string(&ItemKey::Genre)
	}

	fn track(&self) -> Option<u32> {
		self.get(&ItemKey::TrackNumber).and_then(|item| {
			if let crate::tag::ItemValue::UnsignedInt(n) = item.value() {
				Some(*n)
			} else {
				item.value().text().and_then(|s| s.parse().ok())
			}
		})
	}
}

/// Generic, tag-level operations shared by every concrete tag type.
pub trait TagExt {
	/// The error type returned by fallible operations
	type Err;

	/// Number of entries held by the tag
	fn len(&self) -> usize;

	/// Whether the tag holds no entries
	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl TagExt for Tag {
	type Err = crate::error::LoftyError;

	fn len(&self) -> usize {
		Tag::len(self)
	}

	fn is_empty(&self) -> bool {
		Tag::is_empty(self)
	}
}
