use super::item_key::ItemKey;
use super::item_value::ItemValue;
use super::tag_item::TagItem;
use crate::picture::Picture;

/// Which on-disk tag dialect a [`Tag`] was built from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TagType {
	/// An ID3v2.2/2.3/2.4 tag
	Id3v2,
	/// An ID3v1 tag
	Id3v1,
	/// A Vorbis-Comment block, as found in FLAC or Ogg Vorbis
	VorbisComments,
	/// The `ilst` atom of an MP4 file
	Mp4Ilst,
	/// An APEv2 tag
	Ape,
}

/// A format-independent view of a tag's contents: an ordered list of [`TagItem`]s, in the order
/// they appeared in the file, plus any pictures carried alongside them.
///
/// Each decoder builds its native tag representation first (frame map, key/value list, atom
/// list) and converts it into a `Tag` for uniform access; the native representation remains
/// reachable on the concrete file type for anything this generic view doesn't cover.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tag {
	tag_type: Option<TagType>,
	items: Vec<TagItem>,
	pictures: Vec<Picture>,
}

impl Tag {
	/// Create a new, empty `Tag` of the given type
	pub fn new(tag_type: TagType) -> Self {
		Self {
			tag_type: Some(tag_type),
			items: Vec::new(),
			pictures: Vec::new(),
		}
	}

	/// The dialect this tag was decoded from, if known
	pub fn tag_type(&self) -> Option<TagType> {
		self.tag_type
	}

	/// Append an item, preserving insertion order
	pub fn push(&mut self, item: TagItem) {
		self.items.push(item);
	}

	/// Append a picture
	pub fn push_picture(&mut self, picture: Picture) {
		self.pictures.push(picture);
	}

	/// Iterate over every item in file order
	pub fn items(&self) -> impl Iterator<Item = &TagItem> {
		self.items.iter()
	}

	/// Iterate over pictures attached to this tag
	pub fn pictures(&self) -> &[Picture] {
		&self.pictures
	}

	/// Find the first item matching `key`
	pub fn get(&self, key: &ItemKey) -> Option<&TagItem> {
		self.items.iter().find(|item| item.key() == key)
	}

	/// Find every item matching `key`, in file order
	pub fn get_all<'a>(&'a self, key: &'a ItemKey) -> impl Iterator<Item = &'a TagItem> {
		self.items.iter().filter(move |item| item.key() == key)
	}

	/// Borrow the first text value stored under `key`
	pub fn get_string(&self, key: &ItemKey) -> Option<&str> {
		self.get(key).and_then(|item| item.value().text())
	}

	/// Number of items (not counting pictures)
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether the tag has no items and no pictures
	pub fn is_empty(&self) -> bool {
		self.items.is_empty() && self.pictures.is_empty()
	}

	/// Insert a value under a mapped key, no-op if `key` has no native mapping would need to be
	/// resolved by the concrete tag type; this generic form always accepts the insert
	pub fn insert_text(&mut self, key: ItemKey, value: String) {
		self.push(TagItem::new(key, ItemValue::Text(value)));
	}
}
