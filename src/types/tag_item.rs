use super::item_key::ItemKey;
use super::item_value::ItemValue;

/// One entry of a [`super::tag::Tag`]: a format-independent key paired with its native key and
/// decoded value.
#[derive(Clone, Debug, PartialEq)]
pub struct TagItem {
	item_key: ItemKey,
	item_value: ItemValue,
}

impl TagItem {
	/// Create a new `TagItem`
	pub fn new(item_key: ItemKey, item_value: ItemValue) -> Self {
		Self {
			item_key,
			item_value,
		}
	}

	/// The format-independent key
	pub fn key(&self) -> &ItemKey {
		&self.item_key
	}

	/// The decoded value
	pub fn value(&self) -> &ItemValue {
		&self.item_value
	}

	/// Consume the item, returning its parts
	pub fn into_parts(self) -> (ItemKey, ItemValue) {
		(self.item_key, self.item_value)
	}
}
