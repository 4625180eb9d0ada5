use super::text::ID3V1_GENRES;
use crate::error::Result;
use crate::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};

use std::io::{Read, Seek, SeekFrom};

const TRAILER_LEN: u64 = 128;

/// Read the 128-byte ID3v1 trailer, if present, seeking back to the file's original position
/// regardless of outcome.
pub(crate) fn read<R: Read + Seek>(reader: &mut R) -> Result<Option<Tag>> {
	let start = reader.stream_position()?;
	let len = reader.seek(SeekFrom::End(0))?;

	if len < TRAILER_LEN {
		reader.seek(SeekFrom::Start(start))?;
		return Ok(None);
	}

	reader.seek(SeekFrom::Start(len - TRAILER_LEN))?;
	let mut buf = [0u8; TRAILER_LEN as usize];
	reader.read_exact(&mut buf)?;
	reader.seek(SeekFrom::Start(start))?;

	if &buf[0..3] != b"TAG" {
		return Ok(None);
	}

	let title = latin1_field(&buf[3..33]);
	let artist = latin1_field(&buf[33..63]);
	let album = latin1_field(&buf[63..93]);
	let year = latin1_field(&buf[93..97]);
	let comment_field = &buf[97..127];
	let genre_byte = buf[127];

	// ID3v1.1: a zero byte at offset 125 (comment[28]) means offset 126 (comment[29]) holds a
	// track number instead of comment text.
	let (comment, track) = if comment_field[28] == 0 && comment_field[29] != 0 {
		(latin1_field(&comment_field[..28]), Some(comment_field[29] as u32))
	} else {
		(latin1_field(comment_field), None)
	};

	let mut tag = Tag::new(TagType::Id3v1);

	if !title.is_empty() {
		tag.push(TagItem::new(ItemKey::Title, ItemValue::Text(title)));
	}
	if !artist.is_empty() {
		tag.push(TagItem::new(ItemKey::TrackArtist, ItemValue::Text(artist)));
	}
	if !album.is_empty() {
		tag.push(TagItem::new(ItemKey::AlbumTitle, ItemValue::Text(album)));
	}
	if !year.is_empty() {
		tag.push(TagItem::new(ItemKey::Year, ItemValue::Text(year)));
	}
	if !comment.is_empty() {
		tag.push(TagItem::new(ItemKey::Comment, ItemValue::Text(comment)));
	}
	if let Some(track) = track {
		tag.push(TagItem::new(ItemKey::TrackNumber, ItemValue::UnsignedInt(track)));
	}
	if let Some(&genre) = ID3V1_GENRES.get(genre_byte as usize) {
		tag.push(TagItem::new(ItemKey::Genre, ItemValue::Text(genre.to_string())));
	}

	Ok(Some(tag))
}

fn latin1_field(bytes: &[u8]) -> String {
	let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
	bytes[..end].iter().map(|&b| b as char).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn build_trailer(track: Option<u8>, genre: u8) -> Vec<u8> {
		let mut buf = vec![0u8; 128];
		buf[0..3].copy_from_slice(b"TAG");
		buf[3..13].copy_from_slice(b"Some Title");
		buf[33..39].copy_from_slice(b"Artist");
		buf[93..97].copy_from_slice(b"1999");

		if let Some(track) = track {
			// ID3v1.1: comment[28] == 0, comment[29] == track number
			buf[97..97 + 6].copy_from_slice(b"A note");
			buf[125] = 0;
			buf[126] = track;
		} else {
			buf[97..97 + 6].copy_from_slice(b"A note");
		}

		buf[127] = genre;
		buf
	}

	#[test]
	fn reads_v1_1_trailer_with_track_number() {
		let mut data = vec![0u8; 100];
		data.extend(build_trailer(Some(5), 17)); // 17 = Rock
		let mut cursor = Cursor::new(data);

		let tag = read(&mut cursor).unwrap().unwrap();
		assert_eq!(tag.get_string(&ItemKey::Title), Some("Some Title"));
		assert_eq!(tag.get_string(&ItemKey::TrackArtist), Some("Artist"));
		assert_eq!(tag.get_string(&ItemKey::Year), Some("1999"));
		assert_eq!(tag.get_string(&ItemKey::Genre), Some("Rock"));
		assert_eq!(
			tag.get(&ItemKey::TrackNumber).unwrap().value(),
			&ItemValue::UnsignedInt(5)
		);
	}

	#[test]
	fn returns_none_without_tag_signature() {
		let data = vec![0u8; 200];
		let mut cursor = Cursor::new(data);
		assert!(read(&mut cursor).unwrap().is_none());
	}

	#[test]
	fn too_short_file_yields_none() {
		let mut cursor = Cursor::new(vec![0u8; 10]);
		assert!(read(&mut cursor).unwrap().is_none());
	}
}
