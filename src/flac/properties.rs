use crate::error::Result;
use crate::properties::FileProperties;

use byteorder::{BigEndian, ReadBytesExt};
use std::io::Read;
use std::time::Duration;

/// The decoded STREAMINFO metadata block (34 bytes on disk)
#[derive(Copy, Clone, Debug, Default)]
pub struct StreamInfo {
	pub(crate) min_block_size: u16,
	pub(crate) max_block_size: u16,
	pub(crate) min_frame_size: u32,
	pub(crate) max_frame_size: u32,
	pub(crate) sample_rate: u32,
	pub(crate) channels: u8,
	pub(crate) bits_per_sample: u8,
	pub(crate) total_samples: u64,
	pub(crate) md5_signature: [u8; 16],
	pub(crate) seektable_size: Option<u32>,
}

impl StreamInfo {
	/// Total samples in the stream, or `None` if the encoder didn't record it
	pub fn total_samples(&self) -> Option<u64> {
		(self.total_samples != 0).then_some(self.total_samples)
	}

	/// Bits per sample, 4-32
	pub fn bits_per_sample(&self) -> u8 {
		self.bits_per_sample
	}

	/// The 16-byte MD5 signature of the unencoded audio, all zero if the encoder didn't compute one
	pub fn md5_signature(&self) -> [u8; 16] {
		self.md5_signature
	}

	/// Size in bytes of the SEEKTABLE block, if present
	pub fn seektable_size(&self) -> Option<u32> {
		self.seektable_size
	}
}

/// Parse the 34-byte STREAMINFO body. Layout (big-endian, MSB-first bit packing):
/// `u16 min_block_size, u16 max_block_size, u24 min_frame_size, u24 max_frame_size`,
/// then a packed `sample_rate:20 | channels:3 | bits_per_sample:5 | total_samples:36` (64 bits =
/// 8 bytes), then a 16-byte MD5 signature.
pub(crate) fn read_streaminfo<R: Read>(reader: &mut R) -> Result<StreamInfo> {
	let min_block_size = reader.read_u16::<BigEndian>()?;
	let max_block_size = reader.read_u16::<BigEndian>()?;
	let min_frame_size = reader.read_uint::<BigEndian>(3)? as u32;
	let max_frame_size = reader.read_uint::<BigEndian>(3)? as u32;

	// 20 (sample rate) + 3 (channels - 1) + 5 (bits per sample - 1) + 36 (total samples) bits,
	// packed MSB-first into a single 64-bit big-endian integer (8 bytes).
	let packed = reader.read_u64::<BigEndian>()?;

	let sample_rate = (packed >> 44) as u32 & 0xF_FFFF;
	let channels = ((packed >> 41) & 0x7) as u8 + 1;
	let bits_per_sample = ((packed >> 36) & 0x1F) as u8 + 1;
	let total_samples = packed & 0xF_FFFF_FFFF;

	let mut md5_signature = [0u8; 16];
	reader.read_exact(&mut md5_signature)?;

	Ok(StreamInfo {
		min_block_size,
		max_block_size,
		min_frame_size,
		max_frame_size,
		sample_rate,
		channels,
		bits_per_sample,
		total_samples,
		md5_signature,
		seektable_size: None,
	})
}

pub(crate) fn to_file_properties(stream_info: &StreamInfo) -> FileProperties {
	let duration = if stream_info.total_samples != 0 && stream_info.sample_rate != 0 {
		Duration::from_secs_f64(stream_info.total_samples as f64 / f64::from(stream_info.sample_rate))
	} else {
		Duration::ZERO
	};

	let audio_bitrate = if duration.as_secs_f64() > 0.0 {
		Some(
			((stream_info.max_frame_size.max(stream_info.min_frame_size) as f64 * 8.0)
				/ 1000.0) as u32,
		)
	} else {
		None
	};

	FileProperties::new(
		duration,
		audio_bitrate,
		audio_bitrate,
		Some(stream_info.sample_rate),
		Some(stream_info.channels),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	/// A 34-byte STREAMINFO body: 44100 Hz, 2 channels, 16 bits per sample, 1_000_000 total
	/// samples (~22.68s), all-zero MD5.
	fn sample_streaminfo() -> Vec<u8> {
		let mut buf = Vec::with_capacity(34);
		buf.extend_from_slice(&4096u16.to_be_bytes()); // min_block_size
		buf.extend_from_slice(&4096u16.to_be_bytes()); // max_block_size
		buf.extend_from_slice(&[0, 0x10, 0x00]); // min_frame_size (24-bit)
		buf.extend_from_slice(&[0, 0x20, 0x00]); // max_frame_size (24-bit)

		let sample_rate: u64 = 44100;
		let channels_minus_one: u64 = 1; // 2 channels
		let bits_minus_one: u64 = 15; // 16 bits
		let total_samples: u64 = 1_000_000;

		let packed = (sample_rate << 44)
			| (channels_minus_one << 41)
			| (bits_minus_one << 36)
			| total_samples;
		buf.extend_from_slice(&packed.to_be_bytes());
		buf.extend_from_slice(&[0u8; 16]); // MD5

		buf
	}

	#[test]
	fn decodes_packed_bit_fields() {
		let buf = sample_streaminfo();
		let mut cursor = Cursor::new(buf);
		let info = read_streaminfo(&mut cursor).unwrap();

		assert_eq!(info.sample_rate, 44100);
		assert_eq!(info.channels, 2);
		assert_eq!(info.bits_per_sample(), 16);
		assert_eq!(info.total_samples(), Some(1_000_000));
	}

	#[test]
	fn duration_from_total_samples() {
		let buf = sample_streaminfo();
		let mut cursor = Cursor::new(buf);
		let info = read_streaminfo(&mut cursor).unwrap();
		let properties = to_file_properties(&info);

		let expected = 1_000_000.0 / 44100.0;
		assert!((properties.duration().as_secs_f64() - expected).abs() < 0.001);
	}
}
