use crate::error::Result;

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;

/// One physical Ogg page
pub(crate) struct Page {
	pub(crate) header_type: u8,
	pub(crate) granule_position: i64,
	pub(crate) serial: u32,
	pub(crate) sequence: u32,
	pub(crate) segments: Vec<u8>,
	pub(crate) body: Vec<u8>,
}

impl Page {
	pub(crate) fn continued(&self) -> bool {
		self.header_type & 0x1 != 0
	}

	/// The byte ranges of each packet segment-run within this page's body
	pub(crate) fn packet_spans(&self) -> Vec<(usize, usize, bool)> {
		let mut spans = Vec::new();
		let mut offset = 0;
		let mut run_start = 0;

		for &seg_len in &self.segments {
			offset += seg_len as usize;
			if seg_len < 255 {
				spans.push((run_start, offset, true));
				run_start = offset;
			}
		}

		if run_start < offset {
			spans.push((run_start, offset, false));
		}

		spans
	}
}

/// Read one Ogg page at the reader's current position. Returns `Ok(None)` on clean EOF (no bytes
/// read at all).
pub(crate) fn read_page<R: Read>(reader: &mut R) -> Result<Option<Page>> {
	let mut capture = [0u8; 4];
	match read_fully_or_eof(reader, &mut capture)? {
		0 => return Ok(None),
		n if n < 4 => {
			return Err(
				crate::error::FileDecodingError::new(crate::file::FileType::Vorbis, "truncated Ogg page capture pattern")
					.into(),
			)
		},
		_ => {},
	}

	if &capture != b"OggS" {
		return Err(crate::error::FileDecodingError::new(crate::file::FileType::Vorbis, "Ogg capture pattern not found").into());
	}

	let _version = reader.read_u8()?;
	let header_type = reader.read_u8()?;
	let granule_position = reader.read_i64::<LittleEndian>()?;
	let serial = reader.read_u32::<LittleEndian>()?;
	let sequence = reader.read_u32::<LittleEndian>()?;
	let _crc = reader.read_u32::<LittleEndian>()?;
	let segment_count = reader.read_u8()?;

	let mut segments = vec![0u8; segment_count as usize];
	reader.read_exact(&mut segments)?;

	let body_len: usize = segments.iter().map(|&b| b as usize).sum();
	let mut body = vec![0u8; body_len];
	reader.read_exact(&mut body)?;

	Ok(Some(Page {
		header_type,
		granule_position,
		serial,
		sequence,
		segments,
		body,
	}))
}

fn read_fully_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
	let mut total = 0;
	while total < buf.len() {
		match reader.read(&mut buf[total..]) {
			Ok(0) => break,
			Ok(n) => total += n,
			Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(e.into()),
		}
	}
	Ok(total)
}
