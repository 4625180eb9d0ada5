mod page;

use crate::error::{LoftyError, ParseOptions, Result};
use crate::file::{AudioFile, FileType};
use crate::properties::FileProperties;
use crate::tag::Tag;
use crate::vorbis_comments;

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

const BACKWARD_SCAN_WINDOW: u64 = 64 * 1024;

/// Vorbis I audio properties, read from the identification packet
#[derive(Copy, Clone, Debug, Default)]
pub struct VorbisProperties {
	pub(crate) version: u32,
	pub(crate) bitrate_maximum: u32,
	pub(crate) bitrate_nominal: u32,
	pub(crate) bitrate_minimum: u32,
}

impl VorbisProperties {
	/// The Vorbis encoder version field (almost always 0)
	pub fn version(&self) -> u32 {
		self.version
	}

	/// Nominal bitrate in bps, as declared by the encoder (0 if not set)
	pub fn nominal_bitrate(&self) -> u32 {
		self.bitrate_nominal
	}
}

/// A decoded Ogg Vorbis file
pub struct VorbisFile {
	vorbis_tag: Option<Tag>,
	vorbis_properties: VorbisProperties,
	properties: FileProperties,
}

impl VorbisFile {
	/// The Vorbis-Comment tag, if one was present
	pub fn vorbis_tag(&self) -> Option<&Tag> {
		self.vorbis_tag.as_ref()
	}

	/// Vorbis-specific audio properties from the identification packet
	pub fn vorbis_properties(&self) -> &VorbisProperties {
		&self.vorbis_properties
	}
}

/// Pulls complete logical packets out of a sequence of same-serial Ogg pages, following the
/// continuation flag across page boundaries.
struct PacketReader<'r, R> {
	reader: &'r mut R,
	serial: Option<u32>,
	pending: Vec<u8>,
	last_granule: i64,
}

impl<'r, R: Read> PacketReader<'r, R> {
	fn new(reader: &'r mut R) -> Self {
		Self {
			reader,
			serial: None,
			pending: Vec::new(),
			last_granule: 0,
		}
	}

	/// Read and return the next complete packet for the latched logical stream, skipping pages
	/// belonging to any other serial.
	fn next_packet(&mut self) -> Result<Option<Vec<u8>>> {
		loop {
			let Some(page) = page::read_page(self.reader)? else {
				return Ok(if self.pending.is_empty() {
					None
				} else {
					Some(std::mem::take(&mut self.pending))
				});
			};

			match self.serial {
				None => self.serial = Some(page.serial),
				Some(serial) if serial != page.serial => continue,
				_ => {},
			}

			self.last_granule = page.granule_position;

			if !page.continued() {
				self.pending.clear();
			}

			// Each page's packet_spans are consumed left to right; we only need the first
			// complete packet per call, which is always the continuation (if any) of `pending`.
			// A page carrying more than one complete packet beyond that (setup header packed
			// alongside the comment packet) is re-split on the next call's fresh page read,
			// which loses any packet after the first in that rare layout.
			if let Some((start, end, terminated)) = page.packet_spans().first() {
				self.pending.extend_from_slice(&page.body[*start..*end]);
				if *terminated {
					return Ok(Some(std::mem::take(&mut self.pending)));
				}
			}
		}
	}
}

impl AudioFile for VorbisFile {
	type Error = LoftyError;

	fn read_from<R>(reader: &mut R, options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
	{
		let mut packet_reader = PacketReader::new(reader);

		let identification_packet = packet_reader
			.next_packet()?
			.ok_or_else(|| crate::error::FileDecodingError::new(FileType::Vorbis, "missing Vorbis identification packet"))?;

		if identification_packet.len() < 7 || &identification_packet[0..7] != b"\x01vorbis" {
			return Err(crate::error::FileDecodingError::new(FileType::Vorbis, "first packet is not a Vorbis identification packet").into());
		}

		let mut id_cursor = std::io::Cursor::new(&identification_packet[7..]);
		let version = id_cursor.read_u32::<byteorder::LittleEndian>()?;
		let channels = id_cursor.read_u8()?;
		let sample_rate = id_cursor.read_u32::<byteorder::LittleEndian>()?;
		let bitrate_maximum = id_cursor.read_u32::<byteorder::LittleEndian>()?;
		let bitrate_nominal = id_cursor.read_u32::<byteorder::LittleEndian>()?;
		let bitrate_minimum = id_cursor.read_u32::<byteorder::LittleEndian>()?;

		let comment_packet = packet_reader
			.next_packet()?
			.ok_or_else(|| crate::error::FileDecodingError::new(FileType::Vorbis, "missing Vorbis comment packet"))?;

		if comment_packet.len() < 7 || &comment_packet[0..7] != b"\x03vorbis" {
			return Err(crate::error::FileDecodingError::new(FileType::Vorbis, "second packet is not a Vorbis comment packet").into());
		}

		let mut comment_cursor = std::io::Cursor::new(&comment_packet[7..]);
		let (_vendor, tag) = vorbis_comments::read(&mut comment_cursor, options.parsing_mode)?;
		// The comment packet is mandatory in a valid Vorbis stream, so its tag is always present,
		// even if it holds no items.
		let vorbis_tag = Some(tag);

		let vorbis_properties = VorbisProperties {
			version,
			bitrate_maximum,
			bitrate_nominal,
			bitrate_minimum,
		};

		let properties = if options.read_properties {
			let duration = last_page_duration(reader, sample_rate)?;
			FileProperties::new(
				duration,
				(bitrate_nominal > 0).then_some(bitrate_nominal / 1000),
				(bitrate_nominal > 0).then_some(bitrate_nominal / 1000),
				Some(sample_rate),
				Some(channels),
			)
		} else {
			FileProperties::default()
		};

		Ok(Self {
			vorbis_tag,
			vorbis_properties,
			properties,
		})
	}

	fn properties(&self) -> &FileProperties {
		&self.properties
	}

	fn has_tag(&self) -> bool {
		self.vorbis_tag.is_some()
	}
}

/// Seek backward from EOF within a bounded window, looking for the last page's `"OggS"` capture
/// pattern, and derive duration from its granule position.
fn last_page_duration<R: Read + Seek>(reader: &mut R, sample_rate: u32) -> Result<Duration> {
	let file_len = reader.seek(SeekFrom::End(0))?;
	let scan_start = file_len.saturating_sub(BACKWARD_SCAN_WINDOW);

	reader.seek(SeekFrom::Start(scan_start))?;
	let mut buf = vec![0u8; (file_len - scan_start) as usize];
	reader.read_exact(&mut buf)?;

	let mut last_granule = None;
	let mut i = 0;
	while i + 27 <= buf.len() {
		if &buf[i..i + 4] == b"OggS" {
			let granule = i64::from_le_bytes(buf[i + 6..i + 14].try_into().unwrap());
			let segment_count = buf[i + 26] as usize;
			if i + 27 + segment_count <= buf.len() {
				last_granule = Some(granule);
			}
		}
		i += 1;
	}

	Ok(match last_granule {
		Some(granule) if granule > 0 && sample_rate > 0 => {
			Duration::from_secs_f64(granule as f64 / f64::from(sample_rate))
		},
		_ => Duration::ZERO,
	})
}
