use crate::error::Result;

use std::io::{Read, Seek, SeekFrom};

/// MPEG audio version, as encoded in header bits 19-20
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum MpegVersion {
	V1,
	V2,
	V2_5,
}

/// MPEG audio layer, as encoded in header bits 17-18
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Layer {
	Layer1 = 1,
	Layer2 = 2,
	Layer3 = 3,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ChannelMode {
	Stereo,
	JointStereo,
	DualChannel,
	SingleChannel,
}

/// A fully decoded, validated MPEG frame header
#[derive(Copy, Clone, Debug)]
pub(crate) struct Header {
	pub(crate) version: MpegVersion,
	pub(crate) layer: Layer,
	pub(crate) bitrate_kbps: u32,
	pub(crate) sample_rate: u32,
	pub(crate) channel_mode: ChannelMode,
	pub(crate) padding: bool,
	pub(crate) protected: bool,
	pub(crate) len: u32,
	pub(crate) samples_per_frame: u32,
}

// Indexed [version_is_v1][layer_index][bitrate_index], layer_index 0 = layer III, 1 = layer II, 2 = layer I
const BIT_RATES_V1: [[u32; 15]; 3] = [
	// Layer III
	[0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320],
	// Layer II
	[0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384],
	// Layer I
	[0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448],
];

const BIT_RATES_V2: [[u32; 15]; 2] = [
	// Layer II and III share a table in MPEG2/2.5
	[0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160],
	// Layer I
	[0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256],
];

const SAMPLE_RATES_V1: [u32; 3] = [44100, 48000, 32000];
const SAMPLE_RATES_V2: [u32; 3] = [22050, 24000, 16000];
const SAMPLE_RATES_V2_5: [u32; 3] = [11025, 12000, 8000];

impl Header {
	/// Decode and validate a 32-bit MPEG frame header. Returns `None` for any reserved field
	/// combination.
	pub(crate) fn read(header: u32) -> Option<Self> {
		if header & 0xFFE0_0000 != 0xFFE0_0000 {
			return None;
		}

		let version = match (header >> 19) & 0x3 {
			0b00 => MpegVersion::V2_5,
			0b10 => MpegVersion::V2,
			0b11 => MpegVersion::V1,
			_ => return None, // reserved
		};

		let layer = match (header >> 17) & 0x3 {
			0b01 => Layer::Layer3,
			0b10 => Layer::Layer2,
			0b11 => Layer::Layer1,
			_ => return None, // reserved
		};

		let protected = (header >> 16) & 0x1 == 0;

		let bitrate_index = ((header >> 12) & 0xF) as usize;
		if bitrate_index == 0 || bitrate_index == 15 {
			return None;
		}

		let bitrate_kbps = match version {
			MpegVersion::V1 => BIT_RATES_V1[2 - (layer as usize - 1)][bitrate_index],
			MpegVersion::V2 | MpegVersion::V2_5 => match layer {
				Layer::Layer1 => BIT_RATES_V2[1][bitrate_index],
				Layer::Layer2 | Layer::Layer3 => BIT_RATES_V2[0][bitrate_index],
			},
		};

		let sample_rate_index = ((header >> 10) & 0x3) as usize;
		if sample_rate_index == 3 {
			return None;
		}

		let sample_rate = match version {
			MpegVersion::V1 => SAMPLE_RATES_V1[sample_rate_index],
			MpegVersion::V2 => SAMPLE_RATES_V2[sample_rate_index],
			MpegVersion::V2_5 => SAMPLE_RATES_V2_5[sample_rate_index],
		};

		let padding = (header >> 9) & 0x1 != 0;

		let channel_mode = match (header >> 6) & 0x3 {
			0b00 => ChannelMode::Stereo,
			0b01 => ChannelMode::JointStereo,
			0b10 => ChannelMode::DualChannel,
			0b11 => ChannelMode::SingleChannel,
			_ => unreachable!(),
		};

		let samples_per_frame = match (version, layer) {
			(MpegVersion::V1, Layer::Layer1) => 384,
			(MpegVersion::V1, Layer::Layer2) => 1152,
			(MpegVersion::V1, Layer::Layer3) => 1152,
			(_, Layer::Layer1) => 384,
			(_, Layer::Layer2) => 1152,
			(_, Layer::Layer3) => 576,
		};

		let len = match layer {
			Layer::Layer1 => (12 * bitrate_kbps * 1000 / sample_rate + u32::from(padding)) * 4,
			_ => (samples_per_frame * bitrate_kbps * 1000) / (8 * sample_rate) + u32::from(padding),
		};

		Some(Self {
			version,
			layer,
			bitrate_kbps,
			sample_rate,
			channel_mode,
			padding,
			protected,
			len,
			samples_per_frame,
		})
	}

	pub(crate) fn channels(&self) -> u8 {
		match self.channel_mode {
			ChannelMode::SingleChannel => 1,
			_ => 2,
		}
	}
}

/// Scan forward for a valid, confirmable frame sync (two consecutive valid headers at the
/// distance the first implies). Returns the byte offset relative to the reader's starting
/// position, and the decoded first header.
pub(crate) fn search_for_frame_sync<R: Read + Seek>(reader: &mut R) -> Result<Option<(u64, Header)>> {
	search_for_frame_sync_bounded(reader, usize::MAX).map(|found| found.map(|(pos, header, _)| (pos, header)))
}

/// As [`search_for_frame_sync`], but gives up after scanning `max_bytes` bytes. Used by the
/// dispatcher, which only wants a cheap yes/no signal.
pub(crate) fn search_for_frame_sync_bounded<R: Read + Seek>(
	reader: &mut R,
	max_bytes: usize,
) -> Result<Option<(u64, Header)>> {
	search_for_frame_sync_bounded_impl(reader, max_bytes).map(|found| found.map(|(pos, header, _)| (pos, header)))
}

fn search_for_frame_sync_bounded_impl<R: Read + Seek>(
	reader: &mut R,
	max_bytes: usize,
) -> Result<Option<(u64, Header, u32)>> {
	let start = reader.stream_position()?;
	let mut window = [0u8; 4];
	let mut scanned = 0usize;

	loop {
		if scanned >= max_bytes {
			reader.seek(SeekFrom::Start(start))?;
			return Ok(None);
		}

		let pos = reader.stream_position()?;
		if reader.read_exact(&mut window).is_err() {
			reader.seek(SeekFrom::Start(start))?;
			return Ok(None);
		}

		let candidate = u32::from_be_bytes(window);
		if let Some(header) = Header::read(candidate) {
			// Confirm: a second valid header should exist exactly `header.len` bytes later.
			let next_pos = pos + u64::from(header.len);
			reader.seek(SeekFrom::Start(next_pos))?;

			let mut confirm = [0u8; 4];
			let confirmed = reader.read_exact(&mut confirm).is_ok()
				&& Header::read(u32::from_be_bytes(confirm)).is_some();

			reader.seek(SeekFrom::Start(pos))?;
			if confirmed {
				return Ok(Some((pos, header, candidate)));
			}
		}

		reader.seek(SeekFrom::Start(pos + 1))?;
		scanned += 1;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn encode_header(bitrate_index: u32, sample_rate_index: u32, padding: bool) -> u32 {
		0xFFE0_0000
			| (0b11 << 19) // MPEG1
			| (0b01 << 17) // Layer III
			| (1 << 16) // not protected
			| (bitrate_index << 12)
			| (sample_rate_index << 10)
			| ((padding as u32) << 9)
			| (0b00 << 6) // stereo
	}

	#[test]
	fn decodes_valid_header() {
		let raw = encode_header(9, 0, false);
		let header = Header::read(raw).unwrap();
		assert_eq!(header.version, MpegVersion::V1);
		assert_eq!(header.layer, Layer::Layer3);
		assert_eq!(header.bitrate_kbps, 128);
		assert_eq!(header.sample_rate, 44100);
		assert_eq!(header.channels(), 2);
	}

	#[test]
	fn rejects_reserved_bitrate() {
		let raw = encode_header(15, 0, false);
		assert!(Header::read(raw).is_none());
	}

	#[test]
	fn finds_sync_after_garbage() {
		let mut data = vec![0x00, 0x11, 0x22];
		let header_bytes = encode_header(9, 0, false).to_be_bytes();
		data.extend_from_slice(&header_bytes);
		let frame_len = Header::read(encode_header(9, 0, false)).unwrap().len as usize;
		data.resize(data.len().max(3 + frame_len + 4), 0);
		data[3 + frame_len..3 + frame_len + 4].copy_from_slice(&header_bytes);

		let mut cursor = std::io::Cursor::new(data);
		let (pos, header) = search_for_frame_sync(&mut cursor).unwrap().unwrap();
		assert_eq!(pos, 3);
		assert_eq!(header.bitrate_kbps, 128);
	}
}
