mod frame;
mod header;

use crate::error::{ParseOptions, Result};
use crate::id3::util::resynchronise;
use crate::tag::{Tag, TagType};
use header::Id3v2Header;

use std::io::{Read, Seek, SeekFrom};

/// Parse an ID3v2 tag located at the reader's current position, if any.
///
/// `Ok(None)` means no `"ID3"` signature was found at the current position (the container is
/// simply absent, not corrupt). Any other parse failure is a genuine error.
pub(crate) fn read_from<R: Read + Seek>(
	reader: &mut R,
	options: ParseOptions,
) -> Result<Option<Tag>> {
	let start = reader.stream_position()?;

	let header = match Id3v2Header::read(reader)? {
		Some(header) => header,
		None => {
			reader.seek(SeekFrom::Start(start))?;
			return Ok(None);
		},
	};

	let mut body = vec![0u8; header.size as usize];
	reader.read_exact(&mut body)?;

	if header.extended_header {
		let ext_size = if header.major_version == 4 {
			let mut size_bytes = [0u8; 4];
			size_bytes.copy_from_slice(&body[0..4]);
			crate::id3::util::synchsafe_decode(size_bytes) as usize
		} else {
			u32::from_be_bytes([body[0], body[1], body[2], body[3]]) as usize + 4
		};
		body.drain(0..ext_size.min(body.len()));
	}

	if header.unsynchronisation {
		body = resynchronise(&body);
	}

	let mut tag = Tag::new(TagType::Id3v2);
	frame::read_frames(&header, &body, options.parsing_mode, &mut tag)?;

	Ok(Some(tag))
}

/// Read just enough of an ID3v2 header to know the tag's total on-disk length (header + body +
/// optional footer), without consuming the full body. Leaves the reader's position unspecified;
/// callers that need to continue reading afterward should seek explicitly.
pub(crate) fn peek_tag_size<R: Read + Seek>(reader: &mut R) -> Result<u64> {
	let start = reader.stream_position()?;
	let header = Id3v2Header::read(reader)?;
	reader.seek(SeekFrom::Start(start))?;

	Ok(match header {
		Some(header) => 10 + u64::from(header.size) + if header.footer { 10 } else { 0 },
		None => 0,
	})
}
