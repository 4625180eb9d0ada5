use super::atom_info::{AtomIdent, AtomInfo};
use super::read::nested_atom;
use crate::error::{ParsingMode, Result};
use crate::picture::{MimeType, Picture, PictureType};
use crate::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// Parse `moov/udta/meta/ilst` (header already consumed, reader positioned at its content) into
/// a format-independent [`Tag`].
pub(crate) fn read<R>(reader: &mut R, ilst: &AtomInfo, parsing_mode: ParsingMode) -> Result<Tag>
where
	R: Read + Seek,
{
	let mut tag = Tag::new(TagType::Mp4Ilst);

	let mut read = 8;
	while read < ilst.len {
		let atom = AtomInfo::read(reader)?;
		read += atom.len;
		let atom_end = atom.start + u64::from(atom.len);

		let result = match atom.ident {
			AtomIdent::Fourcc(fourcc) if &fourcc == b"----" => read_freeform(reader, &atom, &mut tag),
			AtomIdent::Fourcc(fourcc) => read_standard(reader, &atom, fourcc, &mut tag),
			AtomIdent::Uuid(_) => Ok(()),
		};

		if let Err(err) = result {
			if parsing_mode == ParsingMode::Strict {
				return Err(err);
			}
			log::warn!("skipping malformed ilst atom: {err}");
		}

		reader.seek(SeekFrom::Start(atom_end))?;
	}

	Ok(tag)
}

/// Read the `type_code, locale, payload` triple out of a `data` atom, header already consumed.
fn read_data_triple<R: Read>(reader: &mut R, atom: &AtomInfo) -> Result<(u32, Vec<u8>)> {
	let type_code = reader.read_u32::<BigEndian>()?;
	let _locale = reader.read_u32::<BigEndian>()?;

	let payload_len = (atom.len as usize).saturating_sub(16);
	let mut payload = vec![0u8; payload_len];
	reader.read_exact(&mut payload)?;

	Ok((type_code, payload))
}

/// Read the payload of a `mean`/`name` atom: a full box with a 4-byte version/flags field (no
/// locale) before the payload, unlike `data`'s 8-byte `type_code, locale` header.
fn read_full_box_payload<R: Read>(reader: &mut R, atom: &AtomInfo) -> Result<Vec<u8>> {
	let _version_flags = reader.read_u32::<BigEndian>()?;

	let payload_len = (atom.len as usize).saturating_sub(12);
	let mut payload = vec![0u8; payload_len];
	reader.read_exact(&mut payload)?;

	Ok(payload)
}

fn read_standard<R>(reader: &mut R, atom: &AtomInfo, fourcc: [u8; 4], tag: &mut Tag) -> Result<()>
where
	R: Read + Seek,
{
	let Some(data_atom) = nested_atom(reader, atom.len, b"data")? else {
		return Ok(());
	};

	let (type_code, payload) = read_data_triple(reader, &data_atom)?;

	let key_string = atom_key_string(fourcc)?;
	let item_key = item_key_for(&key_string).unwrap_or(ItemKey::Unknown(key_string));

	if (&fourcc == b"trkn" || &fourcc == b"disk") && payload.len() >= 6 {
		let number = u16::from_be_bytes([payload[2], payload[3]]);
		let total = u16::from_be_bytes([payload[4], payload[5]]);

		let total_key = if &fourcc == b"trkn" {
			ItemKey::TrackTotal
		} else {
			ItemKey::DiscTotal
		};

		tag.push(TagItem::new(item_key, ItemValue::UnsignedInt(u32::from(number))));
		if total > 0 {
			tag.push(TagItem::new(total_key, ItemValue::UnsignedInt(u32::from(total))));
		}

		return Ok(());
	}

	match type_code {
		1 => tag.push(TagItem::new(item_key, ItemValue::Text(String::from_utf8(payload)?))),
		2 => tag.push(TagItem::new(item_key, ItemValue::Text(decode_utf16_be(&payload)))),
		13 => tag.push_picture(Picture::new(PictureType::CoverFront, MimeType::Jpeg, None, payload)),
		14 => tag.push_picture(Picture::new(PictureType::CoverFront, MimeType::Png, None, payload)),
		21 => {
			let value = payload.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
			tag.push(TagItem::new(item_key, ItemValue::UnsignedInt(value)));
		},
		_ => tag.push(TagItem::new(item_key, ItemValue::Binary(payload))),
	}

	Ok(())
}

/// `----` atoms carry `mean` (reverse-DNS namespace), `name` (key name), and `data` children;
/// the logical key is `"----:" + mean + ":" + name`.
fn read_freeform<R>(reader: &mut R, atom: &AtomInfo, tag: &mut Tag) -> Result<()>
where
	R: Read + Seek,
{
	let mut mean = None;
	let mut name = None;
	let mut data = None;

	let mut read = 8;
	while read < atom.len {
		let child = AtomInfo::read(reader)?;
		read += child.len;
		let child_end = child.start + u64::from(child.len);

		if let AtomIdent::Fourcc(fourcc) = child.ident {
			match &fourcc {
				b"mean" => mean = Some(read_full_box_payload(reader, &child)?),
				b"name" => name = Some(read_full_box_payload(reader, &child)?),
				b"data" => data = Some(read_data_triple(reader, &child)?.1),
				_ => {},
			}
		}

		reader.seek(SeekFrom::Start(child_end))?;
	}

	let (Some(mean), Some(name), Some(data)) = (mean, name, data) else {
		return Ok(());
	};

	let key = format!(
		"----:{}:{}",
		String::from_utf8_lossy(&mean),
		String::from_utf8_lossy(&name)
	);

	let value = match String::from_utf8(data.clone()) {
		Ok(text) => ItemValue::Text(text),
		Err(_) => ItemValue::Binary(data),
	};

	tag.push(TagItem::new(ItemKey::Unknown(key), value));

	Ok(())
}

/// MP4 atom codes beginning with the copyright symbol are written as a single `0xA9` byte
/// followed by 3 ASCII characters, not as UTF-8.
fn atom_key_string(fourcc: [u8; 4]) -> Result<String> {
	if fourcc[0] == 0xA9 {
		let rest = std::str::from_utf8(&fourcc[1..])?;
		return Ok(format!("\u{a9}{rest}"));
	}

	Ok(std::str::from_utf8(&fourcc)?.to_string())
}

fn item_key_for(key: &str) -> Option<ItemKey> {
	Some(match key {
		"\u{a9}nam" => ItemKey::Title,
		"\u{a9}ART" => ItemKey::TrackArtist,
		"\u{a9}alb" => ItemKey::AlbumTitle,
		"aART" => ItemKey::AlbumArtist,
		"\u{a9}gen" => ItemKey::Genre,
		"\u{a9}day" => ItemKey::RecordingDate,
		"\u{a9}cmt" => ItemKey::Comment,
		"\u{a9}wrt" => ItemKey::Composer,
		"\u{a9}too" => ItemKey::Encoder,
		"trkn" => ItemKey::TrackNumber,
		"disk" => ItemKey::DiscNumber,
		"covr" => ItemKey::CoverArtFront,
		"tmpo" => ItemKey::Bpm,
		"cprt" => ItemKey::Copyright,
		_ => return None,
	})
}

/// iTunes UTF-16 string atoms (`data` type code 2) are big-endian with no BOM
fn decode_utf16_be(bytes: &[u8]) -> String {
	let units: Vec<u16> = bytes
		.chunks_exact(2)
		.map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
		.collect();

	String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn atom(fourcc: &[u8; 4], body: &[u8]) -> Vec<u8> {
		let mut buf = Vec::new();
		buf.extend_from_slice(&(8 + body.len() as u32).to_be_bytes());
		buf.extend_from_slice(fourcc);
		buf.extend_from_slice(body);
		buf
	}

	fn data_atom(type_code: u32, payload: &[u8]) -> Vec<u8> {
		let mut body = Vec::new();
		body.extend_from_slice(&type_code.to_be_bytes());
		body.extend_from_slice(&0u32.to_be_bytes());
		body.extend_from_slice(payload);
		atom(b"data", &body)
	}

	/// `mean`/`name` are full boxes: 4-byte version/flags, then the payload directly (no locale
	/// field, unlike `data`).
	fn full_box_atom(fourcc: &[u8; 4], payload: &[u8]) -> Vec<u8> {
		let mut body = Vec::new();
		body.extend_from_slice(&0u32.to_be_bytes());
		body.extend_from_slice(payload);
		atom(fourcc, &body)
	}

	fn read_ilst(body: Vec<u8>) -> Tag {
		let full = atom(b"ilst", &body);
		let mut cursor = Cursor::new(full);
		let ilst_atom = AtomInfo::read(&mut cursor).unwrap();
		read(&mut cursor, &ilst_atom, crate::error::ParsingMode::BestAttempt).unwrap()
	}

	#[test]
	fn reads_title_text_atom() {
		let nam = atom(&[0xA9, b'n', b'a', b'm'], &data_atom(1, b"Hello"));
		let tag = read_ilst(nam);
		assert_eq!(tag.get_string(&ItemKey::Title), Some("Hello"));
	}

	#[test]
	fn reads_trkn_pair() {
		let trkn_payload = [0u8, 0, 0, 5, 0, 12, 0, 0];
		let trkn = atom(b"trkn", &data_atom(0, &trkn_payload));
		let tag = read_ilst(trkn);

		assert_eq!(
			tag.get(&ItemKey::TrackNumber).unwrap().value(),
			&ItemValue::UnsignedInt(5)
		);
		assert_eq!(
			tag.get(&ItemKey::TrackTotal).unwrap().value(),
			&ItemValue::UnsignedInt(12)
		);
	}

	#[test]
	fn reads_freeform_atom() {
		let mean = full_box_atom(b"mean", b"com.apple.iTunes");
		let name = full_box_atom(b"name", b"replaygain_track_gain");
		let data = atom(b"data", &{
			let mut body = Vec::new();
			body.extend_from_slice(&0u32.to_be_bytes());
			body.extend_from_slice(&0u32.to_be_bytes());
			body.extend_from_slice(b"-6.50 dB");
			body
		});

		let mut freeform_body = Vec::new();
		freeform_body.extend_from_slice(&mean);
		freeform_body.extend_from_slice(&name);
		freeform_body.extend_from_slice(&data);

		let freeform = atom(b"----", &freeform_body);
		let tag = read_ilst(freeform);

		let item = tag.items().next().unwrap();
		assert_eq!(
			item.key(),
			&ItemKey::Unknown("----:com.apple.iTunes:replaygain_track_gain".to_string())
		);
		assert_eq!(item.value().text(), Some("-6.50 dB"));
	}
}
