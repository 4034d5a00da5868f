//! Helpers around the readers the decoders consume.
//!
//! Every decoder takes a plain [`Read`] (plus [`Seek`] when it needs the total size up
//! front). Files are opened per decode call and closed when the reader is dropped.

use std::{
    fs::File,
    io::{self, BufReader, Read, Seek, SeekFrom},
    path::Path,
};

use tracing::debug;

use crate::Error;

/// Opens `path` for buffered reading, mapping a missing file to [`Error::SourceNotFound`]
///
/// # Errors
///
/// Returns [`Error::SourceNotFound`] if the file does not exist and [`Error::Io`] for any other
/// failure
pub fn open(path: impl AsRef<Path>) -> Result<BufReader<File>, Error> {
    let path = path.as_ref();
    match File::open(path) {
        Ok(f) => {
            debug!("opened {}", path.display());
            Ok(BufReader::new(f))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::SourceNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(e.into()),
    }
}

/// Returns the number of bytes between the current position and the end of `r`,
/// leaving the cursor where it was
///
/// # Errors
///
/// Returns an error if seeking fails
pub fn len(r: &mut impl Seek) -> io::Result<u64> {
    let pos = r.stream_position()?;
    let end = r.seek(SeekFrom::End(0))?;
    if end != pos {
        r.seek(SeekFrom::Start(pos))?;
    }
    Ok(end.saturating_sub(pos))
}

/// Fills `buf` completely, turning a short read into [`Error::Truncated`]
///
/// # Errors
///
/// Returns [`Error::Truncated`] if the reader ends before `buf` is full
pub fn read_exact_or_truncated(
    r: &mut impl Read,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(Error::Truncated {
                    what,
                    expected: buf.len(),
                    found: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Reads a single byte, returning `None` at a clean end of stream
pub(crate) fn next_byte(r: &mut impl Read) -> io::Result<Option<u8>> {
    let mut b = [0];
    loop {
        match r.read(&mut b) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(b[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn len_keeps_position() {
        let mut c = Cursor::new(vec![0u8; 10]);
        c.set_position(4);
        assert_eq!(len(&mut c).unwrap(), 6);
        assert_eq!(c.position(), 4);
    }

    #[test]
    fn short_read_is_truncation() {
        let mut c = Cursor::new(vec![1u8, 2]);
        let mut buf = [0; 4];
        let err = read_exact_or_truncated(&mut c, &mut buf, "record").unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                expected: 4,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let err = open("/definitely/not/here/PALETTES.DAT").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::SourceNotFound);
    }
}
