//! A minimal, read-only APEv2 tag decoder.
//!
//! APEv2 tags attach to MP3 (and, natively, APE) files as a footer preceding any ID3v1 trailer.
//! This crate only ever reads them as a fallback tag source on MP3.

use crate::error::Result;
use crate::tag::{ItemValue, Tag, TagItem, TagType};

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

const FOOTER_LEN: u64 = 32;
const SIGNATURE: &[u8; 8] = b"APETAGEX";

/// Look for an APEv2 footer at the end of the file, or immediately before a 128-byte ID3v1
/// trailer if one is present. Returns `Ok(None)` when no footer is found.
pub(crate) fn read<R: Read + Seek>(reader: &mut R) -> Result<Option<Tag>> {
	let start = reader.stream_position()?;
	let file_len = reader.seek(SeekFrom::End(0))?;

	for trailer_offset in [0u64, 128] {
		if file_len < FOOTER_LEN + trailer_offset {
			continue;
		}

		let footer_pos = file_len - FOOTER_LEN - trailer_offset;
		reader.seek(SeekFrom::Start(footer_pos))?;

		let mut signature = [0u8; 8];
		reader.read_exact(&mut signature)?;
		if &signature != SIGNATURE {
			continue;
		}

		let _version = reader.read_u32::<LittleEndian>()?;
		let tag_size = reader.read_u32::<LittleEndian>()? as u64;
		let item_count = reader.read_u32::<LittleEndian>()?;
		let _flags = reader.read_u32::<LittleEndian>()?;

		let items_start = footer_pos
			.checked_add(FOOTER_LEN)
			.and_then(|end| end.checked_sub(tag_size))
			.ok_or_else(|| {
				crate::error::FileDecodingError::from_description("APEv2 tag_size exceeds footer offset")
			})?;

		reader.seek(SeekFrom::Start(items_start))?;

		let mut tag = Tag::new(TagType::Ape);
		for _ in 0..item_count {
			if let Some(item) = read_item(reader)? {
				tag.push(item);
			}
		}

		reader.seek(SeekFrom::Start(start))?;
		return Ok(Some(tag));
	}

	reader.seek(SeekFrom::Start(start))?;
	Ok(None)
}

fn read_item<R: Read>(reader: &mut R) -> Result<Option<TagItem>> {
	let value_size = reader.read_u32::<LittleEndian>()? as usize;
	let flags = reader.read_u32::<LittleEndian>()?;

	let mut key_bytes = Vec::new();
	loop {
		let byte = reader.read_u8()?;
		if byte == 0 {
			break;
		}
		key_bytes.push(byte);
	}
	let key = String::from_utf8_lossy(&key_bytes).to_string();

	let mut value = vec![0u8; value_size];
	reader.read_exact(&mut value)?;

	// flags bits 1-2: 0 = UTF-8 text, 1 = binary, 2 = external locator (reads the same as binary
	// here since this crate never dereferences the reference)
	let item_value = match (flags >> 1) & 0x3 {
		0 => ItemValue::Text(String::from_utf8_lossy(&value).to_string()),
		_ => ItemValue::Binary(value),
	};

	Ok(Some(TagItem::new(
		crate::tag::ItemKey::Unknown(key),
		item_value,
	)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn build_item(key: &str, value: &str) -> Vec<u8> {
		let mut buf = Vec::new();
		buf.extend_from_slice(&(value.len() as u32).to_le_bytes());
		buf.extend_from_slice(&0u32.to_le_bytes()); // flags: UTF-8 text
		buf.extend_from_slice(key.as_bytes());
		buf.push(0);
		buf.extend_from_slice(value.as_bytes());
		buf
	}

	fn build_tag(items: &[Vec<u8>]) -> Vec<u8> {
		let items_bytes: Vec<u8> = items.iter().flatten().copied().collect();
		let tag_size = items_bytes.len() as u32 + FOOTER_LEN as u32;

		let mut footer = Vec::new();
		footer.extend_from_slice(SIGNATURE);
		footer.extend_from_slice(&2000u32.to_le_bytes()); // version
		footer.extend_from_slice(&tag_size.to_le_bytes());
		footer.extend_from_slice(&(items.len() as u32).to_le_bytes());
		footer.extend_from_slice(&0u32.to_le_bytes()); // flags
		footer.extend_from_slice(&[0u8; 8]); // reserved

		let mut full = items_bytes;
		full.extend_from_slice(&footer);
		full
	}

	#[test]
	fn reads_footer_at_eof() {
		let tag_bytes = build_tag(&[build_item("Artist", "Someone")]);
		let mut cursor = Cursor::new(tag_bytes);

		let tag = read(&mut cursor).unwrap().unwrap();
		assert_eq!(tag.len(), 1);
		let item = tag.items().next().unwrap();
		assert_eq!(item.value().text(), Some("Someone"));
	}

	#[test]
	fn reads_footer_before_id3v1_trailer() {
		let tag_bytes = build_tag(&[build_item("Album", "Test Album")]);
		let mut full = tag_bytes;
		full.extend_from_slice(&[0u8; 128]); // stand-in ID3v1 trailer

		let mut cursor = Cursor::new(full);
		let tag = read(&mut cursor).unwrap().unwrap();
		assert_eq!(tag.items().next().unwrap().value().text(), Some("Test Album"));
	}

	#[test]
	fn returns_none_without_signature() {
		let mut cursor = Cursor::new(vec![0u8; 64]);
		assert!(read(&mut cursor).unwrap().is_none());
	}
}
