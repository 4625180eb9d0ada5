//! Parse audio metadata from MP3, FLAC, Ogg Vorbis, and MP4/M4A files.
//!
//! # Supported formats
//!
//! | File Format | Extensions                        | Tag dialect(s)                      |
//! |-------------|------------------------------------|--------------------------------------|
//! | MP3         | `mp3`                              | `ID3v2`, `ID3v1`, `APEv2` (fallback)  |
//! | FLAC        | `flac`                              | `Vorbis Comments`, `PICTURE` blocks  |
//! | Ogg Vorbis  | `ogg`, `oga`                        | `Vorbis Comments`                    |
//! | MP4/M4A     | `mp4`, `m4a`, `m4b`, `m4p`, `m4r`   | `ilst` (iTunes atoms)                |
//!
//! This is a read-only core: it locates and decodes a file's tag and stream-property
//! structures into a uniform in-memory view. Writing tags back to disk is not implemented;
//! [`file::save_to`] exists only to give the write-side interface a concrete shape.
//!
//! # Examples
//!
//! ## Probing a file without knowing its format up front
//!
//! ```no_run
//! use lofty_core::Probe;
//!
//! let tagged_file = Probe::open("track.flac").unwrap().read(true).unwrap();
//!
//! println!("{:?}", tagged_file.file_type());
//! println!("{:?}", tagged_file.properties().duration());
//!
//! if let Some(tag) = tagged_file.primary_tag() {
//!     println!("{:?}", tag.get_string(&lofty_core::ItemKey::Title));
//! }
//! ```
//!
//! ## Working with a concrete file type
//!
//! ```no_run
//! use lofty_core::error::ParseOptions;
//! use lofty_core::file::AudioFile;
//! use lofty_core::mp3::Mp3File;
//! use std::fs::File;
//!
//! let mut file = File::open("track.mp3").unwrap();
//! let mp3 = Mp3File::read_from(&mut file, ParseOptions::new()).unwrap();
//!
//! assert!(mp3.properties().channels().is_some());
//! ```
//!
//! # Notes on ID3v2
//!
//! See [`id3`] for the frame-id upgrade table and the flags this decoder honors
//! (encryption/compression/grouping/per-frame unsynchronisation).

#![deny(clippy::pedantic, clippy::all, missing_docs)]
#![allow(
	clippy::too_many_lines,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::cast_possible_wrap,
	clippy::cast_possible_truncation,
	clippy::module_name_repetitions,
	clippy::must_use_candidate,
	clippy::doc_markdown,
	clippy::let_underscore_drop,
	clippy::match_wildcard_for_single_variants,
	clippy::semicolon_if_nothing_returned,
	clippy::used_underscore_binding,
	clippy::new_without_default,
	clippy::unused_self
)]

pub use crate::error::{LoftyError, Result};
pub use crate::file::{AudioFile, FileType, TaggedFile};
pub use crate::picture::{MimeType, Picture, PictureType};
pub use crate::probe::Probe;
pub use crate::properties::FileProperties;
pub use crate::tag::{ItemKey, ItemValue, Tag, TagItem, TagType};
pub use crate::traits::{Accessor, TagExt};

mod probe;
mod types;

pub mod error;
pub mod file;
pub mod picture;
pub mod properties;
pub mod tag;
pub mod traits;

/// A minimal, read-only APEv2 decoder, consulted as a fallback tag source on MP3
pub mod ape;

/// ID3v1 and ID3v2.2/2.3/2.4 tag decoding, shared by the MP3 decoder and by any container that
/// tolerates a leading ID3v2 tag (FLAC, in practice)
pub mod id3;

/// FLAC decoding: STREAMINFO, Vorbis Comments, and PICTURE metadata blocks
pub mod flac;

/// MPEG layer I/II/III decoding: frame header parsing, Xing/VBRI-based duration, and tags
pub mod mp3;

/// ISO Base Media File Format (MP4/M4A) decoding: atom tree walking, AAC/ALAC properties, `ilst`
pub mod mp4;

/// Ogg-encapsulated Vorbis I decoding
pub mod ogg;

/// Vorbis-Comment parsing, shared by the FLAC and Ogg Vorbis decoders
pub mod vorbis_comments;
