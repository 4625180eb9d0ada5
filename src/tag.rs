//! The format-independent tag data model: [`Tag`] holds an ordered list of [`TagItem`]s, each a
//! [`ItemKey`]/[`ItemValue`] pair, plus any attached pictures.

pub use crate::types::item_key::ItemKey;
pub use crate::types::item_value::ItemValue;
pub use crate::types::tag::{Tag, TagType};
pub use crate::types::tag_item::TagItem;
