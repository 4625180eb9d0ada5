use super::header::{ChannelMode, Header, MpegVersion};
use crate::error::Result;
use crate::properties::FileProperties;

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

/// A parsed Xing/Info VBR header (the two use the same layout; "Info" marks a CBR-encoder that
/// still wants its frame count known)
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct XingHeader {
	pub(crate) frames: Option<u32>,
	pub(crate) bytes: Option<u32>,
}

impl XingHeader {
	/// Offset, in bytes after the 4-byte frame header, where a Xing/Info header begins
	fn side_info_offset(version: MpegVersion, channel_mode: ChannelMode) -> usize {
		let mono = channel_mode == ChannelMode::SingleChannel;
		match (version, mono) {
			(MpegVersion::V1, false) => 32,
			(MpegVersion::V1, true) => 17,
			(_, false) => 17,
			(_, true) => 9,
		}
	}

	fn read<R: Read>(reader: &mut R) -> Result<Option<Self>> {
		let mut signature = [0u8; 4];
		reader.read_exact(&mut signature)?;

		if &signature != b"Xing" && &signature != b"Info" {
			return Ok(None);
		}

		let flags = reader.read_u32::<BigEndian>()?;

		let frames = if flags & 0x1 != 0 {
			Some(reader.read_u32::<BigEndian>()?)
		} else {
			None
		};

		let bytes = if flags & 0x2 != 0 {
			Some(reader.read_u32::<BigEndian>()?)
		} else {
			None
		};

		Ok(Some(Self { frames, bytes }))
	}
}

#[derive(Copy, Clone, Debug, Default)]
struct VbriHeader {
	frames: u32,
}

impl VbriHeader {
	fn read<R: Read>(reader: &mut R) -> Result<Option<Self>> {
		let mut signature = [0u8; 4];
		reader.read_exact(&mut signature)?;

		if &signature != b"VBRI" {
			return Ok(None);
		}

		let _version = reader.read_u16::<BigEndian>()?;
		let _delay = reader.read_u16::<BigEndian>()?;
		let _quality = reader.read_u16::<BigEndian>()?;
		let _bytes = reader.read_u32::<BigEndian>()?;
		let frames = reader.read_u32::<BigEndian>()?;

		Ok(Some(Self { frames }))
	}
}

/// Compute [`FileProperties`] for an MP3 file, given its first valid frame header and the
/// overall audio region bounds (start of the first frame through the start of any trailing tag).
pub(crate) fn read_properties<R: Read + Seek>(
	reader: &mut R,
	first_frame_pos: u64,
	first_header: &Header,
	audio_end: u64,
) -> Result<FileProperties> {
	reader.seek(SeekFrom::Start(first_frame_pos + 4))?;

	let side_info = XingHeader::side_info_offset(first_header.version, first_header.channel_mode);
	reader.seek(SeekFrom::Current(side_info as i64))?;

	let xing = XingHeader::read(reader).unwrap_or(None);
	reader.seek(SeekFrom::Start(first_frame_pos + 4 + 32))?;
	let vbri = VbriHeader::read(reader).unwrap_or(None);

	let sample_rate = first_header.sample_rate;
	let channels = first_header.channels();

	let (duration, overall_bitrate, audio_bitrate) = if let Some(frames) = xing.and_then(|x| x.frames) {
		let total_samples = u64::from(frames) * u64::from(first_header.samples_per_frame);
		let duration = Duration::from_secs_f64(total_samples as f64 / f64::from(sample_rate));
		let bitrate = xing
			.and_then(|x| x.bytes)
			.map(|bytes| (f64::from(bytes) * 8.0 / duration.as_secs_f64() / 1000.0) as u32)
			.unwrap_or(first_header.bitrate_kbps);
		(duration, bitrate, bitrate)
	} else if let Some(vbri) = vbri {
		let total_samples = u64::from(vbri.frames) * u64::from(first_header.samples_per_frame);
		let duration = Duration::from_secs_f64(total_samples as f64 / f64::from(sample_rate));
		(duration, first_header.bitrate_kbps, first_header.bitrate_kbps)
	} else {
		let audio_len = audio_end.saturating_sub(first_frame_pos);
		let duration = Duration::from_secs_f64(
			(audio_len as f64 * 8.0) / (f64::from(first_header.bitrate_kbps) * 1000.0),
		);
		(duration, first_header.bitrate_kbps, first_header.bitrate_kbps)
	};

	Ok(FileProperties::new(
		duration,
		Some(overall_bitrate),
		Some(audio_bitrate),
		Some(sample_rate),
		Some(channels),
	))
}
