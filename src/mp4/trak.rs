use super::atom_info::{AtomIdent, AtomInfo};
use super::read::skip_unneeded;
use crate::error::Result;

use std::io::{Read, Seek, SeekFrom};

/// The atoms pulled out of a single `moov.trak`, used later to find the audio track's properties
#[derive(Default)]
pub(crate) struct Trak {
	pub(crate) mdia: Option<AtomInfo>,
}

impl Trak {
	/// Parse a `trak` atom (header already consumed, reader positioned at its content) for the
	/// `mdia` child, skipping everything else
	pub(crate) fn read<R>(reader: &mut R, trak: &AtomInfo) -> Result<Self>
	where
		R: Read + Seek,
	{
		let mut this = Self::default();

		let mut read = 8;
		while read < trak.len {
			let atom = AtomInfo::read(reader)?;
			read += atom.len;

			if let AtomIdent::Fourcc(fourcc) = atom.ident {
				if &fourcc == b"mdia" {
					this.mdia = Some(atom);
					skip_unneeded(reader, atom.extended, atom.len)?;
					continue;
				}
			}

			skip_unneeded(reader, atom.extended, atom.len)?;
		}

		reader.seek(SeekFrom::Start(trak.start + u64::from(trak.len)))?;

		Ok(this)
	}
}
