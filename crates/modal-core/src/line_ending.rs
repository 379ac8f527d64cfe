//! Line ending handling.
//!
//! The kernel stores text with LF (`'\n'`) newlines only. [`normalize_to_lf`]
//! rewrites a source document in a single scan, tallying which newline
//! convention its lines actually used, so that
//! [`snapshot_text`](crate::Editor::snapshot_text) can hand the file-I/O
//! collaborator a byte-faithful rendition of any uniform-ending document.

/// The newline convention of a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// The newline sequence this convention writes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }

    /// Re-join LF-normalized text with this convention, producing the
    /// exchange format for saving.
    pub fn restore(self, text: &str) -> String {
        if self == Self::Lf {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + text.len() / 8);
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push_str(self.as_str());
            }
            out.push_str(line);
        }
        out
    }
}

/// Collapse CRLF sequences to LF in one scan, reporting the convention the
/// majority of the document's line breaks followed (ties go to LF). Carriage
/// returns not followed by a line feed are ordinary text and pass through.
pub(crate) fn normalize_to_lf(text: &str) -> (String, LineEnding) {
    let mut out = String::with_capacity(text.len());
    let mut crlf_breaks = 0usize;
    let mut bare_breaks = 0usize;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            chars.next();
            out.push('\n');
            crlf_breaks += 1;
        } else {
            if c == '\n' {
                bare_breaks += 1;
            }
            out.push(c);
        }
    }

    let ending = if crlf_breaks > bare_breaks {
        LineEnding::Crlf
    } else {
        LineEnding::Lf
    };
    (out, ending)
}
