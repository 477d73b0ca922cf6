//! Block segmentation of the input stream.
//!
//! Bytes are decoded as UTF-8 into a fixed-size character buffer that is
//! refilled whenever it runs dry. Runs of delimiter characters split the
//! stream into blocks. Block offsets count code points consumed from the
//! stream, so they do not depend on where buffer refills happened.

use std::io::{self, Read};
use std::sync::Arc;

use ahash::AHashSet;

/// Size of the character buffer between the reader and the segmenter.
pub const BUFFER_SIZE: usize = 4096;

/// Set of block delimiter characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delimiters(Arc<AHashSet<char>>);

impl Delimiters {
    pub fn new(chars: &str) -> Self {
        Delimiters(Arc::new(chars.chars().collect()))
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters::new(super::config::DEFAULT_DELIMITERS)
    }
}

/// One delimiter free run of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Code points of the block
    pub text: Vec<char>,
    /// Code points consumed from the stream before the block's first one
    pub start_offset: usize,
}

impl Block {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text of `[start, end)`, block relative.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.text[start..end].iter().collect()
    }
}

/// Incremental UTF-8 decoder over a byte reader.
///
/// Each invalid or truncated sequence decodes to one U+FFFD.
struct CharReader<R> {
    reader: R,
    bytes: Vec<u8>,
    carry: usize,
    eof: bool,
}

impl<R: Read> CharReader<R> {
    fn new(reader: R, buffer_size: usize) -> Self {
        CharReader {
            reader,
            // Room for a partial sequence carried over from the last read.
            bytes: vec![0; buffer_size + 3],
            carry: 0,
            eof: false,
        }
    }

    /// Replace `out` with the next decoded characters. Returns false at end
    /// of input.
    fn read_into(&mut self, out: &mut Vec<char>) -> io::Result<bool> {
        out.clear();

        while !self.eof {
            let read = match self.reader.read(&mut self.bytes[self.carry..]) {
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if read == 0 {
                self.eof = true;
                if self.carry > 0 {
                    self.carry = 0;
                    out.push(char::REPLACEMENT_CHARACTER);
                }
                break;
            }

            let len = self.carry + read;
            let decoded = decode_utf8(&self.bytes[..len], out);
            self.bytes.copy_within(decoded..len, 0);
            self.carry = len - decoded;

            if !out.is_empty() {
                break;
            }
        }

        Ok(!out.is_empty())
    }
}

/// Decode as much of `bytes` as possible into `out`, leaving a trailing
/// incomplete sequence undecoded. Returns the number of bytes consumed.
fn decode_utf8(bytes: &[u8], out: &mut Vec<char>) -> usize {
    let mut pos = 0;

    while pos < bytes.len() {
        match std::str::from_utf8(&bytes[pos..]) {
            Ok(valid) => {
                out.extend(valid.chars());
                return bytes.len();
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                if let Ok(valid) = std::str::from_utf8(&bytes[pos..pos + valid_up_to]) {
                    out.extend(valid.chars());
                }
                pos += valid_up_to;

                match e.error_len() {
                    Some(invalid) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        pos += invalid;
                    }
                    None => return pos,
                }
            }
        }
    }

    pos
}

/// Splits a byte stream into delimiter separated [`Block`]s.
pub struct BlockSegmenter<R> {
    reader: CharReader<R>,
    delimiters: Delimiters,
    buffer_size: usize,
    buffer: Vec<char>,
    pos: usize,
    consumed: usize,
    exhausted: bool,
}

impl<R: Read> BlockSegmenter<R> {
    pub fn new(reader: R, delimiters: Delimiters) -> Self {
        Self::with_buffer_size(reader, delimiters, BUFFER_SIZE)
    }

    /// Create a segmenter with a custom buffer size (at least 1).
    pub fn with_buffer_size(reader: R, delimiters: Delimiters, buffer_size: usize) -> Self {
        let buffer_size = buffer_size.max(1);
        BlockSegmenter {
            reader: CharReader::new(reader, buffer_size),
            delimiters,
            buffer_size,
            buffer: Vec::with_capacity(buffer_size),
            pos: 0,
            consumed: 0,
            exhausted: false,
        }
    }

    /// Start over on a new stream.
    pub fn reset(&mut self, reader: R) {
        self.reader = CharReader::new(reader, self.buffer_size);
        self.buffer.clear();
        self.pos = 0;
        self.consumed = 0;
        self.exhausted = false;
    }

    /// Code points consumed from the stream so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Give back the underlying reader. Buffered input is lost.
    pub fn into_reader(self) -> R {
        self.reader.reader
    }

    /// The next block, or `None` once the stream is exhausted.
    pub fn next_block(&mut self) -> io::Result<Option<Block>> {
        let mut text = Vec::new();
        let mut start_offset = self.consumed;

        while let Some(c) = self.next_char()? {
            if !self.delimiters.contains(c) {
                if text.is_empty() {
                    start_offset = self.consumed - 1;
                }
                text.push(c);
            } else if !text.is_empty() {
                break;
            }
        }

        if text.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Block { text, start_offset }))
        }
    }

    fn next_char(&mut self) -> io::Result<Option<char>> {
        if self.pos >= self.buffer.len() {
            if self.exhausted || !self.reader.read_into(&mut self.buffer)? {
                self.exhausted = true;
                return Ok(None);
            }
            self.pos = 0;
        }

        let c = self.buffer[self.pos];
        self.pos += 1;
        self.consumed += 1;
        Ok(Some(c))
    }
}
