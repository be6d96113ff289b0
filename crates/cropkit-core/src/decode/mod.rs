//! Source image decoding.
//!
//! Hosts hand the editor either encoded bytes (a camera capture or an
//! uploaded file) or an already-decoded bitmap. Encoded bytes go through
//! [`decode_image`], which detects the format and applies the EXIF
//! orientation so that phone captures display upright. Decoded bitmaps are
//! wrapped with [`DecodedImage::new`] or [`DecodedImage::from_rgba`].
//!
//! The decoded image is immutable once loaded; the editor shares it behind
//! an `Arc` between the render and export paths.

mod source;
mod types;

pub use source::{decode_image, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
