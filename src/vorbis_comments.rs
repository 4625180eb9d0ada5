//! Vorbis-Comment parsing, shared by the FLAC `VORBIS_COMMENT` metadata block and the second
//! packet of an Ogg Vorbis logical stream.

use crate::error::{ParsingMode, Result};
use crate::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

/// Parse a Vorbis-Comment body: a vendor string followed by `count` `KEY=VALUE` entries. Keys
/// are matched case-insensitively but stored as written; the first occurrence of a key drives
/// its `ItemKey` mapping, any later ones are pushed as additional `Unknown` entries under their
/// literal key, so every file-order value remains reachable.
pub(crate) fn read<R: Read>(reader: &mut R, parsing_mode: ParsingMode) -> Result<(String, Tag)> {
	let vendor_len = reader.read_u32::<LittleEndian>()? as usize;
	let mut vendor_bytes = vec![0u8; vendor_len];
	reader.read_exact(&mut vendor_bytes)?;
	let vendor = String::from_utf8(vendor_bytes)?;

	let count = reader.read_u32::<LittleEndian>()?;
	let mut tag = Tag::new(TagType::VorbisComments);

	for _ in 0..count {
		let len = reader.read_u32::<LittleEndian>()? as usize;
		let mut buf = vec![0u8; len];
		reader.read_exact(&mut buf)?;

		let entry = match std::str::from_utf8(&buf) {
			Ok(entry) => entry,
			Err(err) => {
				if parsing_mode == ParsingMode::Strict {
					return Err(err.into());
				}
				log::warn!("skipping non-UTF-8 Vorbis comment entry");
				continue;
			},
		};

		let Some((key, value)) = entry.split_once('=') else {
			if parsing_mode == ParsingMode::Strict {
				return Err(crate::error::FileDecodingError::from_description(
					"Vorbis comment entry missing '='",
				)
				.into());
			}
			log::warn!("skipping malformed Vorbis comment entry {entry:?}");
			continue;
		};

		let upper_key = key.to_ascii_uppercase();
		let item_key = item_key_for(&upper_key).unwrap_or_else(|| ItemKey::Unknown(key.to_string()));

		tag.push(TagItem::new(item_key, ItemValue::Text(value.to_string())));
	}

	Ok((vendor, tag))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn build_comment_block(vendor: &str, entries: &[(&str, &str)]) -> Vec<u8> {
		let mut buf = Vec::new();
		buf.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
		buf.extend_from_slice(vendor.as_bytes());
		buf.extend_from_slice(&(entries.len() as u32).to_le_bytes());
		for (key, value) in entries {
			let entry = format!("{key}={value}");
			buf.extend_from_slice(&(entry.len() as u32).to_le_bytes());
			buf.extend_from_slice(entry.as_bytes());
		}
		buf
	}

	#[test]
	fn reads_vendor_and_known_keys() {
		let data = build_comment_block(
			"reference libVorbis",
			&[("TITLE", "A Song"), ("artist", "Someone"), ("TRACKNUMBER", "3")],
		);
		let mut cursor = Cursor::new(data);
		let (vendor, tag) = read(&mut cursor, ParsingMode::BestAttempt).unwrap();

		assert_eq!(vendor, "reference libVorbis");
		assert_eq!(tag.get_string(&ItemKey::Title), Some("A Song"));
		assert_eq!(tag.get_string(&ItemKey::TrackArtist), Some("Someone"));
		assert_eq!(tag.get_string(&ItemKey::TrackNumber), Some("3"));
	}

	#[test]
	fn unmapped_key_becomes_unknown() {
		let data = build_comment_block("enc", &[("CUSTOMFIELD", "value")]);
		let mut cursor = Cursor::new(data);
		let (_vendor, tag) = read(&mut cursor, ParsingMode::BestAttempt).unwrap();

		let item = tag.items().next().unwrap();
		assert_eq!(item.key(), &ItemKey::Unknown("CUSTOMFIELD".to_string()));
	}

	#[test]
	fn strict_mode_rejects_malformed_entry() {
		let mut data = Vec::new();
		data.extend_from_slice(&3u32.to_le_bytes());
		data.extend_from_slice(b"enc");
		data.extend_from_slice(&1u32.to_le_bytes());
		let malformed = b"NOEQUALSIGN";
		data.extend_from_slice(&(malformed.len() as u32).to_le_bytes());
		data.extend_from_slice(malformed);

		let mut cursor = Cursor::new(data.clone());
		assert!(read(&mut cursor, ParsingMode::Strict).is_err());

		let mut cursor = Cursor::new(data);
		let (_vendor, tag) = read(&mut cursor, ParsingMode::BestAttempt).unwrap();
		assert!(tag.is_empty());
	}
}

fn item_key_for(upper_key: &str) -> Option<ItemKey> {
	Some(match upper_key {
		"TITLE" => ItemKey::Title,
		"ARTIST" => ItemKey::TrackArtist,
		"ALBUM" => ItemKey::AlbumTitle,
		"ALBUMARTIST" => ItemKey::AlbumArtist,
		"TRACKNUMBER" => ItemKey::TrackNumber,
		"TRACKTOTAL" => ItemKey::TrackTotal,
		"DISCNUMBER" => ItemKey::DiscNumber,
		"DISCTOTAL" => ItemKey::DiscTotal,
		"GENRE" => ItemKey::Genre,
		"DATE" => ItemKey::RecordingDate,
		"COMMENT" => ItemKey::Comment,
		"COMPOSER" => ItemKey::Composer,
		"CONDUCTOR" => ItemKey::Conductor,
		"COPYRIGHT" => ItemKey::Copyright,
		"ISRC" => ItemKey::Isrc,
		"ENCODEDBY" => ItemKey::EncodedBy,
		"LANGUAGE" => ItemKey::Language,
		"LYRICS" => ItemKey::Lyrics,
		_ => return None,
	})
}
