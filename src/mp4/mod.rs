mod atom_info;
mod ilst;
mod properties;
mod read;
mod trak;

use atom_info::{AtomIdent, AtomInfo};
use read::{nested_atom, skip_unneeded};
use trak::Trak;

use crate::error::{LoftyError, ParseOptions, Result};
use crate::file::{AudioFile, FileType};
use crate::properties::FileProperties;
use crate::tag::Tag;

use std::io::{Read, Seek, SeekFrom};

pub(crate) use properties::{AudioObjectType, Mp4Codec, Mp4Properties};

/// A decoded MP4/M4A file
pub struct Mp4File {
	ilst_tag: Option<Tag>,
	properties: FileProperties,
}

impl Mp4File {
	/// The `moov/udta/meta/ilst` tag, if one was present
	pub fn ilst_tag(&self) -> Option<&Tag> {
		self.ilst_tag.as_ref()
	}
}

impl AudioFile for Mp4File {
	type Error = LoftyError;

	fn read_from<R>(reader: &mut R, options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		let file_length = reader.seek(SeekFrom::End(0))?;
		reader.seek(SeekFrom::Start(0))?;

		let mut moov = None;
		while reader.stream_position()? < file_length {
			let atom = AtomInfo::read(reader)?;

			if let AtomIdent::Fourcc(fourcc) = atom.ident {
				if &fourcc == b"moov" {
					moov = Some(atom);
					break;
				}
			}

			skip_unneeded(reader, atom.extended, atom.len)?;
		}

		let moov = moov.ok_or_else(|| {
			crate::error::FileDecodingError::new(FileType::MP4, "missing \"moov\" atom")
		})?;

		let mut traks = Vec::new();
		let mut ilst_tag = None;

		let mut read = 8;
		while read < moov.len {
			let atom = AtomInfo::read(reader)?;
			read += atom.len;
			let atom_end = atom.start + u64::from(atom.len);

			if let AtomIdent::Fourcc(fourcc) = atom.ident {
				match &fourcc {
					b"trak" => traks.push(Trak::read(reader, &atom)?),
					b"udta" => {
						if let Some(meta) = nested_atom(reader, atom.len, b"meta")? {
							// `meta` is a full box: 1-byte version, 3-byte flags, then children
							reader.seek(SeekFrom::Current(4))?;

							if let Some(ilst_atom) = nested_atom(reader, meta.len - 4, b"ilst")? {
								let tag = ilst::read(reader, &ilst_atom, options.parsing_mode)?;
								if !tag.is_empty() {
									ilst_tag = Some(tag);
								}
							}
						}
					},
					_ => {},
				}
			}

			reader.seek(SeekFrom::Start(atom_end))?;
		}

		let properties = if options.read_properties {
			properties::read_properties(reader, &traks, file_length)?.into()
		} else {
			FileProperties::default()
		};

		Ok(Self {
			ilst_tag,
			properties,
		})
	}

	fn properties(&self) -> &FileProperties {
		&self.properties
	}

	fn has_tag(&self) -> bool {
		self.ilst_tag.is_some()
	}
}
