//! Value and level encodings used inside data pages.
//!
//! Only two encodings are produced: PLAIN for values and the RLE/bit-packed
//! hybrid (RLE runs only) for definition and repetition levels.

mod plain;
mod rle;
mod uleb128;

pub use plain::encode_plain;
pub use rle::{bit_width, encode_levels};
