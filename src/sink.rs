//! Position-tracking output sink.
//!
//! Every byte written to a Parquet file has to be accounted for: column chunk
//! offsets, the footer length and the decision whether the leading magic has
//! been written are all derived from the running byte count kept here.

use std::io::{self, Write};

/// A [`Write`] adapter that counts the bytes accepted by the wrapped writer.
#[derive(Debug)]
pub struct PositionWriter<W: Write> {
    inner: W,
    position: u64,
}

impl<W: Write> PositionWriter<W> {
    /// Wrap `inner`, starting the count at zero
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes accepted by the inner writer so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Borrow the inner writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap, returning the inner writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for PositionWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `limit` bytes per call
    struct ShortWriter {
        data: Vec<u8>,
        limit: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.limit);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_counts_written_bytes() {
        let mut sink = PositionWriter::new(Vec::new());
        assert_eq!(sink.position(), 0);

        sink.write_all(b"PAR1").unwrap();
        sink.write_all(&[0u8; 10]).unwrap();

        assert_eq!(sink.position(), 14);
        assert_eq!(sink.into_inner().len(), 14);
    }

    #[test]
    fn test_counts_only_accepted_bytes() {
        let mut sink = PositionWriter::new(ShortWriter {
            data: Vec::new(),
            limit: 3,
        });

        let n = sink.write(b"abcdef").unwrap();
        assert_eq!(n, 3);
        assert_eq!(sink.position(), 3);

        sink.write_all(b"ghij").unwrap();
        assert_eq!(sink.position(), 7);
        assert_eq!(sink.get_ref().data, b"abcghij");
    }
}
