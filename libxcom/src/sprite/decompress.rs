use std::io::{Bytes, Read};

use tracing::trace;

use crate::Error;

/// Marks a run of transparent pixels; the next byte holds the run length
const TRANSPARENT_RUN: u8 = 0xFE;
/// Marks the end of a sprite
const END_OF_SPRITE: u8 = 0xFF;

/// A single sprite as read from the archive, before it is fitted to its cell
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct DecodedSprite {
    /// Palette indexes, starting with the skipped rows
    pub pixels: Vec<u8>,
    /// Number of archive bytes the sprite occupied, terminator included
    pub bytes_consumed: usize,
}

/// Decompresses the sprite starting at the current position of `stream`.
///
/// The first byte is the number of fully transparent rows at the top of the cell. After it,
/// `0xFE` is followed by the length of a transparent run, `0xFF` ends the sprite and any other
/// byte is a palette index. The sprite may end before filling its cell; the rest of the cell
/// is transparent.
///
/// # Errors
///
/// Returns [`Error::Truncated`] if the stream ends before the terminator
pub fn decompress_sprite(stream: &mut impl Read, width: u16) -> Result<DecodedSprite, Error> {
    let mut bytes = stream.bytes();
    let mut consumed = 0;

    let skip_rows = fgetpck(&mut bytes, &mut consumed)?;
    let mut pixels = vec![0; usize::from(skip_rows) * usize::from(width)];
    loop {
        match fgetpck(&mut bytes, &mut consumed)? {
            TRANSPARENT_RUN => {
                let run = fgetpck(&mut bytes, &mut consumed)?;
                pixels.resize(pixels.len() + usize::from(run), 0);
            }
            END_OF_SPRITE => break,
            index => pixels.push(index),
        }
    }
    trace!(
        "decompressed {} pixels from {consumed} bytes ({skip_rows} rows skipped)",
        pixels.len()
    );
    Ok(DecodedSprite {
        pixels,
        bytes_consumed: consumed,
    })
}

fn fgetpck<R: Read>(stream: &mut Bytes<R>, consumed: &mut usize) -> Result<u8, Error> {
    let b = stream.next().ok_or(Error::Truncated {
        what: "sprite",
        expected: *consumed + 1,
        found: *consumed,
    })??;
    *consumed += 1;
    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn skip_row_direct_index_and_transparent_run() {
        let mut stream = Cursor::new(vec![0x01, 0x05, 0xFE, 0x03, 0xFF]);
        let sprite = decompress_sprite(&mut stream, 8).unwrap();
        let mut expected = vec![0; 8];
        expected.push(5);
        expected.extend([0, 0, 0]);
        assert_eq!(sprite.pixels, expected);
        assert_eq!(sprite.bytes_consumed, 5);
        assert_eq!(stream.position(), 5);
    }

    #[test]
    fn stops_at_terminator() {
        let mut stream = Cursor::new(vec![0x00, 0x07, 0xFF, 0x00, 0x09, 0xFF]);
        let first = decompress_sprite(&mut stream, 4).unwrap();
        assert_eq!(first.pixels, vec![7]);
        assert_eq!(first.bytes_consumed, 3);
        let second = decompress_sprite(&mut stream, 4).unwrap();
        assert_eq!(second.pixels, vec![9]);
    }

    #[test]
    fn empty_sprite() {
        let mut stream = Cursor::new(vec![0x02, 0xFF]);
        let sprite = decompress_sprite(&mut stream, 3).unwrap();
        assert_eq!(sprite.pixels, vec![0; 6]);
        assert_eq!(sprite.bytes_consumed, 2);
    }

    #[test]
    fn missing_terminator_is_truncation() {
        let mut stream = Cursor::new(vec![0x00, 0x05, 0x06]);
        let err = decompress_sprite(&mut stream, 8).unwrap_err();
        assert!(matches!(err, Error::Truncated { found: 3, .. }));
    }

    #[test]
    fn dangling_run_length_is_truncation() {
        let mut stream = Cursor::new(vec![0x00, 0xFE]);
        assert!(decompress_sprite(&mut stream, 8).is_err());
    }
}
