use std::fmt;

use base64::prelude::*;
use itertools::Itertools;

use crate::{PacketError, PacketResult};

/// Number of characters per line when attachment data is written as
/// base-64.
pub const BASE64_LINE_LEN: usize = 76;

/// Arbitrary file stored inside a packet tree, such as a PDF document.
///
/// An empty attachment and a missing attachment are the same thing.
#[derive(Debug, Default, Clone)]
pub struct Attachment {
    data: Vec<u8>,
    filename: String,
}

impl Attachment {
    /// Constructs an attachment from raw bytes.
    ///
    /// Any directory prefix is stripped from `filename`.
    pub fn new(data: Vec<u8>, filename: &str) -> Self {
        let filename = match filename.rsplit_once(['/', '\\']) {
            Some((_, name)) => name,
            None => filename,
        };
        Self {
            data,
            filename: filename.to_owned(),
        }
    }

    /// Decodes an attachment from base-64 text, ignoring whitespace and line
    /// breaks.
    pub fn from_base64(text: &str, filename: &str) -> PacketResult<Self> {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let data = BASE64_STANDARD
            .decode(compact)
            .map_err(|e| PacketError::invalid(format!("bad base-64 attachment data: {e}")))?;
        log::trace!("decoded {} bytes of attachment {filename:?}", data.len());
        Ok(Self::new(data, filename))
    }

    /// Encodes the data as base-64 text, broken into lines of
    /// [`BASE64_LINE_LEN`] characters each ending with a newline.
    pub fn to_base64(&self) -> String {
        let encoded = BASE64_STANDARD.encode(&self.data);
        let mut ret = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_LEN + 1);
        for line in &encoded.chars().chunks(BASE64_LINE_LEN) {
            ret.extend(line);
            ret.push('\n');
        }
        ret
    }

    /// Returns the stored bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
    /// Returns the number of stored bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
    /// Returns whether there is no data.
    pub fn is_null(&self) -> bool {
        self.data.is_empty()
    }
    /// Returns the filename stored with the data, without any directory.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the extension of the filename including its leading period,
    /// or the empty string if there is none.
    pub fn extension(&self) -> &str {
        match self.filename.rfind('.') {
            Some(0) | None => "",
            Some(i) => &self.filename[i..],
        }
    }

    /// Replaces the data and filename.
    pub fn reset(&mut self, data: Vec<u8>, filename: &str) {
        *self = Self::new(data, filename);
    }
}

/// Attachments compare by contents only.
impl PartialEq for Attachment {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
impl Eq for Attachment {}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "Empty attachment");
        }
        write!(f, "Attachment of {} byte(s)", self.size())?;
        if !self.filename.is_empty() {
            write!(f, ": {}", self.filename)?;
        }
        Ok(())
    }
}
