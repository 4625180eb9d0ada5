//! Embedded picture handling, shared by FLAC `PICTURE` blocks, ID3v2 `APIC`/`PIC` frames, and
//! MP4 `covr` atoms.

pub use crate::types::picture::{MimeType, Picture, PictureType};
