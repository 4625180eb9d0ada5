use crate::error::Result;
use crate::id3::util::synchsafe_decode;

use byteorder::ReadBytesExt;
use std::io::Read;

/// The 10-byte ID3v2 tag header
#[derive(Copy, Clone, Debug)]
pub(crate) struct Id3v2Header {
	pub(crate) major_version: u8,
	pub(crate) revision: u8,
	pub(crate) unsynchronisation: bool,
	pub(crate) extended_header: bool,
	pub(crate) footer: bool,
	/// Size of the tag body, excluding this 10-byte header and any footer
	pub(crate) size: u32,
}

impl Id3v2Header {
	pub(crate) fn read<R: Read>(reader: &mut R) -> Result<Option<Self>> {
		let mut signature = [0u8; 3];
		reader.read_exact(&mut signature)?;

		if &signature != b"ID3" {
			return Ok(None);
		}

		let major_version = reader.read_u8()?;
		let revision = reader.read_u8()?;
		let flags = reader.read_u8()?;

		if major_version < 2 || major_version > 4 {
			return Err(crate::error::FileDecodingError::from_description(
				"ID3v2 tag has an unsupported major version",
			)
			.into());
		}

		let mut size_bytes = [0u8; 4];
		reader.read_exact(&mut size_bytes)?;
		let size = synchsafe_decode(size_bytes);

		Ok(Some(Self {
			major_version,
			revision,
			unsynchronisation: flags & 0x80 != 0,
			extended_header: flags & 0x40 != 0,
			footer: flags & 0x10 != 0,
			size,
		}))
	}
}
