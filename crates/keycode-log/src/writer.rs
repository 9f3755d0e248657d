//! Redacting writer for `tracing-subscriber`'s fmt layer.
//!
//! The fmt layer formats one event into a buffer and writes it to a fresh
//! writer per event. [`RedactingWriter`] holds those bytes until it is flushed
//! or dropped, masks the whole line, then forwards it.

use std::io::{self, Write};
use tracing_subscriber::fmt::MakeWriter;

use crate::masker::mask;

/// [`MakeWriter`] wrapper whose writers redact everything they forward.
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl RedactingMakeWriter<fn() -> io::Stderr> {
    /// Redacting writer over the process's stderr.
    pub fn stderr() -> Self {
        Self::new(io::stderr as fn() -> io::Stderr)
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new(self.inner.make_writer())
    }
}

/// Buffers bytes and forwards them masked on flush or drop.
#[derive(Debug)]
pub struct RedactingWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
}

impl<W: Write> RedactingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }

    fn forward(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&self.buf);
        let masked = mask(&text);
        self.buf.clear();
        self.inner.write_all(masked.as_bytes())?;
        self.inner.flush()
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.forward()
    }
}

impl<W: Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = self.forward();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_writer_masks_on_drop() {
        let mut out = Vec::new();
        {
            let mut writer = RedactingWriter::new(&mut out);
            writer.write_all(b"pushing with token=abcdef123456").unwrap();
            writer.write_all(b" done\n").unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "pushing with token=******** done\n");
    }

    #[test]
    fn test_writer_masks_on_flush() {
        let mut out = Vec::new();
        let mut writer = RedactingWriter::new(&mut out);
        writer.write_all(b"password=hunter22\n").unwrap();
        writer.flush().unwrap();
        drop(writer);
        assert_eq!(String::from_utf8(out).unwrap(), "password=********\n");
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_output_is_redacted() {
        let buf = SharedBuf::default();
        let make = {
            let buf = buf.clone();
            move || buf.clone()
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(RedactingMakeWriter::new(make))
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(header = "Bearer abc.def.ghi", "calling api_key=sk_live_zzzzzzzzzz");
        });

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("calling"));
        assert!(!output.contains("sk_live_zzzzzzzzzz"));
        assert!(!output.contains("abc.def.ghi"));
    }
}
