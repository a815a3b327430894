use crate::domain::model::RawRow;
use crate::utils::error::{Result, UploadError};
use csv::{ByteRecord, Reader, ReaderBuilder};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

fn is_line_break(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

/// Keeps the bytes the CSV parser has pulled but the line counter has not
/// looked at yet. The parser silently drops blank lines, so physical line
/// numbers are derived from these bytes instead of from the parser.
struct LineTracker<R> {
    inner: R,
    window: Vec<u8>,
    base: u64,
    newlines_before_base: u64,
}

impl<R: Read> Read for LineTracker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.window.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

impl<R> LineTracker<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            window: Vec::new(),
            base: 0,
            newlines_before_base: 0,
        }
    }

    fn slice(&self, from: u64, to: u64) -> &[u8] {
        let start = from.saturating_sub(self.base) as usize;
        let end = (to.saturating_sub(self.base) as usize).min(self.window.len());
        self.window.get(start..end).unwrap_or(&[])
    }

    /// Number of `\n` bytes strictly before `offset`.
    fn newlines_before(&self, offset: u64) -> u64 {
        let in_window = self.slice(self.base, offset).iter().filter(|b| **b == b'\n').count();
        self.newlines_before_base + in_window as u64
    }

    /// Offset of the first byte in `from..to` that is not a line break.
    fn skip_line_breaks(&self, from: u64, to: u64) -> u64 {
        from + self.slice(from, to).iter().take_while(|b| is_line_break(**b)).count() as u64
    }

    /// `to` with trailing line breaks of `from..to` removed.
    fn trim_line_breaks(&self, from: u64, to: u64) -> u64 {
        to - self.slice(from, to).iter().rev().take_while(|b| is_line_break(**b)).count() as u64
    }

    fn discard_before(&mut self, offset: u64) {
        let n = (offset.saturating_sub(self.base) as usize).min(self.window.len());
        let newlines = self.window[..n].iter().filter(|b| **b == b'\n').count();
        self.newlines_before_base += newlines as u64;
        self.window.drain(..n);
        self.base += n as u64;
    }
}

/// Single-pass stream of [`RawRow`]s from comma-separated text.
///
/// Every line is a data row (no header handling) and rows may have any
/// number of fields; the pipeline decides what a wrong field count means.
/// A blank line comes out as a row with one empty field. Line numbers are
/// physical lines, so a quoted field spanning lines advances them.
pub struct RecordReader<R: Read> {
    inner: Reader<LineTracker<R>>,
    record: ByteRecord,
    pending: VecDeque<RawRow>,
    // physical line holding the last byte of the previous record, 0 before the first
    last_line: u64,
    finished: bool,
}

impl RecordReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| UploadError::SourceUnreadable {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!("Opened CSV file: {}", path.display());
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let inner = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(LineTracker::new(reader));

        Self {
            inner,
            record: ByteRecord::new(),
            pending: VecDeque::new(),
            last_line: 0,
            finished: false,
        }
    }

    fn queue_blank_lines(&mut self, until: u64) {
        for line in self.last_line + 1..until {
            self.pending.push_back(RawRow::new(line, vec![String::new()]));
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(row) = self.pending.pop_front() {
            return Some(Ok(row));
        }
        if self.finished {
            return None;
        }

        let read_from = self.inner.position().byte();
        match self.inner.read_byte_record(&mut self.record) {
            Ok(true) => {
                let read_to = self.inner.position().byte();
                let tracker = self.inner.get_ref();
                let start = tracker.skip_line_breaks(read_from, read_to);
                let end = tracker.trim_line_breaks(start, read_to);
                let line = tracker.newlines_before(start) + 1;
                let last_line = tracker.newlines_before(end) + 1;
                self.inner.get_mut().discard_before(read_to);

                let fields = self
                    .record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect();

                self.queue_blank_lines(line);
                self.pending.push_back(RawRow::new(line, fields));
                self.last_line = last_line;
                self.pending.pop_front().map(Ok)
            }
            Ok(false) => {
                self.finished = true;
                // a final line break ends the last line rather than starting a blank one
                let end = self.inner.position().byte();
                let lines = self.inner.get_ref().newlines_before(end);
                self.queue_blank_lines(lines + 1);
                self.pending.pop_front().map(Ok)
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e.into()))
            }
        }
    }
}
