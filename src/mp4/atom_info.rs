use crate::error::Result;

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// The identifier of an atom, almost always a 4-byte ASCII fourcc
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum AtomIdent {
	Fourcc([u8; 4]),
	/// A 16-byte extended UUID, used by some vendor-specific atoms
	Uuid([u8; 16]),
}

/// The position and bounds of an atom, as read from its header
#[derive(Debug, Copy, Clone)]
pub(crate) struct AtomInfo {
	pub(crate) ident: AtomIdent,
	/// Byte offset of the atom's header (the `len` field itself)
	pub(crate) start: u64,
	/// Total length of the atom, header included
	pub(crate) len: u32,
	/// Whether the atom used the 64-bit extended size form
	pub(crate) extended: bool,
}

impl AtomInfo {
	/// Read an atom's header at the reader's current position, leaving the reader positioned
	/// just after the header (the fourcc, or the fourcc plus the 8-byte extended size, and a
	/// UUID's extra 16 bytes).
	pub(crate) fn read<R>(reader: &mut R) -> Result<Self>
	where
		R: Read + Seek,
	{
		let start = reader.stream_position()?;

		let size32 = reader.read_u32::<BigEndian>()?;

		let mut fourcc = [0; 4];
		reader.read_exact(&mut fourcc)?;

		let (len, extended) = if size32 == 1 {
			let size64 = reader.read_u64::<BigEndian>()?;
			(size64, true)
		} else if size32 == 0 {
			// Atom extends to EOF
			let end = reader.seek(SeekFrom::End(0))?;
			reader.seek(SeekFrom::Start(start + 8))?;
			(end - start, false)
		} else {
			(u64::from(size32), false)
		};

		let ident = if &fourcc == b"uuid" {
			let mut uuid = [0; 16];
			reader.read_exact(&mut uuid)?;
			AtomIdent::Uuid(uuid)
		} else {
			AtomIdent::Fourcc(fourcc)
		};

		Ok(Self {
			ident,
			start,
			len: len as u32,
			extended,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn reads_normal_sized_atom() {
		let mut data = Vec::new();
		data.extend_from_slice(&16u32.to_be_bytes());
		data.extend_from_slice(b"mdhd");
		data.extend_from_slice(&[0u8; 8]);

		let mut cursor = Cursor::new(data);
		let atom = AtomInfo::read(&mut cursor).unwrap();

		assert_eq!(atom.ident, AtomIdent::Fourcc(*b"mdhd"));
		assert_eq!(atom.len, 16);
		assert!(!atom.extended);
	}

	#[test]
	fn reads_extended_64_bit_size() {
		let mut data = Vec::new();
		data.extend_from_slice(&1u32.to_be_bytes());
		data.extend_from_slice(b"mdat");
		data.extend_from_slice(&24u64.to_be_bytes());
		data.extend_from_slice(&[0u8; 8]);

		let mut cursor = Cursor::new(data);
		let atom = AtomInfo::read(&mut cursor).unwrap();

		assert_eq!(atom.ident, AtomIdent::Fourcc(*b"mdat"));
		assert_eq!(atom.len, 24);
		assert!(atom.extended);
	}

	#[test]
	fn size_zero_extends_to_eof() {
		let mut data = Vec::new();
		data.extend_from_slice(&0u32.to_be_bytes());
		data.extend_from_slice(b"free");
		data.extend_from_slice(&[0u8; 12]);

		let mut cursor = Cursor::new(data);
		let atom = AtomInfo::read(&mut cursor).unwrap();

		assert_eq!(atom.len, 20);
	}
}
