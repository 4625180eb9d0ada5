use super::header::Id3v2Header;
use crate::error::{ParsingMode, Result};
use crate::id3::text::{decode_genre, decode_text, decode_text_multi, Encoding};
use crate::id3::util::synchsafe_decode;
use crate::picture::Picture;
use crate::tag::{ItemKey, ItemValue, Tag, TagItem};

use byteorder::{BigEndian, ReadBytesExt};
use std::io::Read;

/// v2.2 uses 3-character frame ids upgraded to their v2.3/2.4 equivalent on read, so the rest of
/// the codec only ever deals with 4-character ids.
fn upgrade_v2_2_id(id: &str) -> String {
	match id {
		"TT2" => "TIT2", "TP1" => "TPE1", "TP2" => "TPE2", "TAL" => "TALB",
		"TYE" => "TYER", "TRK" => "TRCK", "TPA" => "TPOS", "TCO" => "TCON",
		"TCM" => "TCOM", "TPB" => "TPUB", "TEN" => "TENC", "TBP" => "TBPM",
		"TCR" => "TCOP", "TLA" => "TLAN", "TXT" => "TEXT", "TSR" => "TSRC",
		"COM" => "COMM", "PIC" => "APIC", "ULT" => "USLT", "WAF" => "WOAF",
		"WAR" => "WOAR", "UFI" => "UFID", "TXX" => "TXXX",
		other => return other.to_string(),
	}
	.to_string()
}

fn read_frame_id<R: Read>(reader: &mut R, major_version: u8) -> Result<Option<(String, u32, u16)>> {
	let id_len = if major_version == 2 { 3 } else { 4 };
	let mut id_bytes = vec![0u8; id_len];
	if reader.read_exact(&mut id_bytes).is_err() {
		return Ok(None);
	}

	if id_bytes.iter().all(|&b| b == 0) {
		return Ok(None);
	}

	if !id_bytes.iter().all(|&b| b.is_ascii_alphanumeric()) {
		return Ok(None);
	}

	let id = String::from_utf8_lossy(&id_bytes).to_string();
	let id = if major_version == 2 {
		upgrade_v2_2_id(&id)
	} else {
		id
	};

	let size = if major_version == 2 {
		reader.read_uint::<BigEndian>(3)? as u32
	} else if major_version == 4 {
		let mut size_bytes = [0u8; 4];
		reader.read_exact(&mut size_bytes)?;
		synchsafe_decode(size_bytes)
	} else {
		reader.read_u32::<BigEndian>()?
	};

	let flags = if major_version == 2 {
		0
	} else {
		reader.read_u16::<BigEndian>()?
	};

	Ok(Some((id, size, flags)))
}

/// Parse every frame in `body` (the tag's bytes, already de-unsynchronised), appending decoded
/// items to `tag`.
pub(crate) fn read_frames(
	header: &Id3v2Header,
	body: &[u8],
	parsing_mode: ParsingMode,
	tag: &mut Tag,
) -> Result<()> {
	let mut cursor = std::io::Cursor::new(body);

	loop {
		let position = cursor.position() as usize;
		if position >= body.len() {
			break;
		}

		let parsed = read_frame_id(&mut cursor, header.major_version);
		let (id, size, flags) = match parsed {
			Ok(Some(parsed)) => parsed,
			Ok(None) => break,
			Err(err) => {
				if parsing_mode == ParsingMode::Strict {
					return Err(err);
				}
				break;
			},
		};

		let size = size as usize;
		let body_start = cursor.position() as usize;
		if body_start + size > body.len() {
			if parsing_mode == ParsingMode::Strict {
				return Err(crate::error::FileDecodingError::from_description(
					"ID3v2 frame size exceeds remaining tag body",
				)
				.into());
			}
			break;
		}

		let mut frame_body = body[body_start..body_start + size].to_vec();
		cursor.set_position((body_start + size) as u64);

		if header.major_version >= 3 {
			// Encryption (bit 6 of flag byte 2 for v2.3, bit 2 for v2.4) cannot be decoded here;
			// drop the frame rather than expose ciphertext.
			let encrypted = if header.major_version == 4 {
				flags & 0x0004 != 0
			} else {
				flags & 0x0040 != 0
			};
			if encrypted {
				log::warn!("dropping encrypted ID3v2 frame {id}");
				continue;
			}

			let grouping = if header.major_version == 4 {
				flags & 0x0040 != 0
			} else {
				flags & 0x0020 != 0
			};
			if grouping && !frame_body.is_empty() {
				frame_body.remove(0);
			}

			let data_length_indicator = header.major_version == 4 && flags & 0x0001 != 0;
			if data_length_indicator && frame_body.len() >= 4 {
				frame_body.drain(0..4);
			}

			let compressed = if header.major_version == 4 {
				flags & 0x0008 != 0
			} else {
				flags & 0x0080 != 0
			};
			if compressed {
				match decompress(&frame_body) {
					Ok(decompressed) => frame_body = decompressed,
					Err(_) => {
						log::warn!("dropping ID3v2 frame {id} with corrupt zlib payload");
						continue;
					},
				}
			}

			if header.major_version == 4 && flags & 0x0002 != 0 {
				frame_body = crate::id3::util::resynchronise(&frame_body);
			}
		}

		if let Err(err) = decode_frame(&id, &frame_body, tag) {
			log::warn!("failed to decode ID3v2 frame {id}: {err}");
			if parsing_mode == ParsingMode::Strict {
				return Err(err);
			}
		}
	}

	Ok(())
}

fn decompress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
	use flate2::read::ZlibDecoder;

	let mut decoder = ZlibDecoder::new(bytes);
	let mut out = Vec::new();
	decoder.read_to_end(&mut out)?;
	Ok(out)
}

fn decode_frame(id: &str, body: &[u8], tag: &mut Tag) -> Result<()> {
	if body.is_empty() {
		return Ok(());
	}

	if id == "APIC" {
		return decode_apic(body, tag);
	}

	if id.starts_with('T') && id != "TXXX" {
		let encoding = Encoding::from_byte(body[0])
			.ok_or_else(|| crate::error::FileDecodingError::from_description("unknown ID3v2 text encoding"))?;
		let mut values = decode_text_multi(&body[1..], encoding)?;
		if id == "TCON" {
			for value in &mut values {
				*value = decode_genre(value);
			}
		}
		let joined = values.join("/");

		if let Some(key) = item_key_for_text_frame(id) {
			tag.push(TagItem::new(key, ItemValue::Text(joined)));
		} else {
			tag.push(TagItem::new(ItemKey::Unknown(id.to_string()), ItemValue::Text(joined)));
		}

		return Ok(());
	}

	if id == "TXXX" && body.len() > 1 {
		let encoding = Encoding::from_byte(body[0])
			.ok_or_else(|| crate::error::FileDecodingError::from_description("unknown ID3v2 text encoding"))?;
		let parts = decode_text_multi(&body[1..], encoding)?;
		if let Some(description) = parts.first() {
			let value = parts.get(1).cloned().unwrap_or_default();
			tag.push(TagItem::new(
				ItemKey::Unknown(format!("TXXX:{description}")),
				ItemValue::Text(value),
			));
		}
		return Ok(());
	}

	if id == "COMM" || id == "USLT" {
		if body.len() < 5 {
			return Ok(());
		}
		let encoding = Encoding::from_byte(body[0])
			.ok_or_else(|| crate::error::FileDecodingError::from_description("unknown ID3v2 text encoding"))?;
		// body[1..4] is the ISO-639 language code, skipped
		let parts = decode_text_multi(&body[4..], encoding)?;
		let value = parts.last().cloned().unwrap_or_default();
		let key = if id == "COMM" { ItemKey::Comment } else { ItemKey::Lyrics };
		tag.push(TagItem::new(key, ItemValue::Text(value)));
		return Ok(());
	}

	// Unrecognized or binary frame: retain the raw bytes so the tag map can still surface it.
	tag.push(TagItem::new(ItemKey::Unknown(id.to_string()), ItemValue::Binary(body.to_vec())));
	Ok(())
}

fn decode_apic(body: &[u8], tag: &mut Tag) -> Result<()> {
	let encoding = Encoding::from_byte(body[0])
		.ok_or_else(|| crate::error::FileDecodingError::from_description("unknown ID3v2 text encoding"))?;

	let mut rest = &body[1..];
	let mime_end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
	let mime = decode_text(&rest[..mime_end], Encoding::Latin1)?;
	rest = &rest[(mime_end + 1).min(rest.len())..];

	if rest.is_empty() {
		return Ok(());
	}
	let pic_type = crate::picture::PictureType::from_u8(rest[0]);
	rest = &rest[1..];

	let (description, data) = split_text_field(rest, encoding)?;

	tag.push_picture(Picture::new(
		pic_type,
		crate::picture::MimeType::from(mime.as_str()),
		if description.is_empty() { None } else { Some(description) },
		data,
	));

	Ok(())
}

fn split_text_field(bytes: &[u8], encoding: Encoding) -> Result<(String, Vec<u8>)> {
	match encoding {
		Encoding::Latin1 | Encoding::Utf8 => {
			let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
			let description = decode_text(&bytes[..end], encoding)?;
			let data_start = (end + 1).min(bytes.len());
			Ok((description, bytes[data_start..].to_vec()))
		},
		Encoding::Utf16Bom | Encoding::Utf16Be => {
			let mut i = 0;
			while i + 1 < bytes.len() {
				if bytes[i] == 0 && bytes[i + 1] == 0 {
					break;
				}
				i += 2;
			}
			let description = decode_text(&bytes[..i], encoding)?;
			let data_start = (i + 2).min(bytes.len());
			Ok((description, bytes[data_start..].to_vec()))
		},
	}
}

fn item_key_for_text_frame(id: &str) -> Option<ItemKey> {
	Some(match id {
		"TIT2" => ItemKey::Title,
		"TPE1" => ItemKey::TrackArtist,
		"TPE2" => ItemKey::AlbumArtist,
		"TALB" => ItemKey::AlbumTitle,
		"TRCK" => ItemKey::TrackNumber,
		"TPOS" => ItemKey::DiscNumber,
		"TCON" => ItemKey::Genre,
		"TYER" => ItemKey::Year,
		"TDRC" => ItemKey::RecordingDate,
		"TCOM" => ItemKey::Composer,
		"TPE3" => ItemKey::Conductor,
		"TEXT" => ItemKey::Lyricist,
		"TENC" => ItemKey::EncodedBy,
		"TSSE" => ItemKey::Encoder,
		"TBPM" => ItemKey::Bpm,
		"TCOP" => ItemKey::Copyright,
		"TLAN" => ItemKey::Language,
		"TSRC" => ItemKey::Isrc,
		_ => return None,
	})
}
