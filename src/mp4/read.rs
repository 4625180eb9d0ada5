use super::atom_info::{AtomIdent, AtomInfo};
use crate::error::Result;

use std::io::{Read, Seek, SeekFrom};

/// Search the children of a container atom (whose header has already been consumed, reader
/// positioned at the start of its content) for one with a specific fourcc.
///
/// `parent_len` is the *full* length of the container, header included, as read into its
/// [`AtomInfo`]. On a match, the reader is left positioned at the start of the matched atom's
/// content; otherwise it ends up at the end of the container.
pub(crate) fn nested_atom<R>(reader: &mut R, parent_len: u32, target: &[u8; 4]) -> Result<Option<AtomInfo>>
where
	R: Read + Seek,
{
	let mut read = 8;

	while read < parent_len {
		let atom = AtomInfo::read(reader)?;

		if let AtomIdent::Fourcc(fourcc) = atom.ident {
			if &fourcc == target {
				return Ok(Some(atom));
			}
		}

		read += atom.len;
		skip_unneeded(reader, atom.extended, atom.len)?;
	}

	Ok(None)
}

/// Seek past whatever remains of an atom's content once its header has been consumed.
pub(crate) fn skip_unneeded<R>(reader: &mut R, extended: bool, len: u32) -> Result<()>
where
	R: Read + Seek,
{
	let header_size: i64 = if extended { 16 } else { 8 };
	let remaining = i64::from(len) - header_size;

	if remaining > 0 {
		reader.seek(SeekFrom::Current(remaining))?;
	}

	Ok(())
}
