//! Column-aware soft line wrapping.

use std::fmt;

use crate::error::Result;

/// Wrap-point marker: renders as a space, or as a newline plus
/// continuation indent when the line would overflow the column limit.
pub(crate) const WRAPPING_SPACE: char = '♢';

/// Renders as a space that never wraps.
pub(crate) const NON_BREAKING_SPACE: char = '·';

/// Where wrapped output goes. `Null` is the sink for the import-collecting
/// pass, which wants resolution side effects but no text.
pub(crate) enum Sink<'a> {
    Extern(&'a mut dyn fmt::Write),
    Buffer(String),
    Null,
}

impl Sink<'_> {
    fn write_str(&mut self, s: &str) -> Result<()> {
        match self {
            Sink::Extern(out) => out.write_str(s).map_err(Into::into),
            Sink::Buffer(buffer) => {
                buffer.push_str(s);
                Ok(())
            }
            Sink::Null => Ok(()),
        }
    }
}

/// Implements soft line wrapping over a sink.
///
/// Text fed through [`append`](Self::append) is buffered as *segments*
/// separated by wrap-point markers; on flush, segments are joined with
/// single spaces while they fit the column limit, and a segment that
/// would overflow starts a new physical line at the recorded
/// continuation indent. Text fed through
/// [`append_non_wrapping`](Self::append_non_wrapping) joins the current
/// segment verbatim.
///
/// The wrapper buffers the current line, so it must be closed (or
/// dropped, which flushes as a last resort) for the final line to reach
/// the sink.
pub struct LineWrapper<'a> {
    out: Sink<'a>,
    indent: String,
    column_limit: usize,
    closed: bool,
    /// Segments of the current line, joined by spaces or wraps. Never
    /// empty; a lone empty string means nothing was emitted since the
    /// last newline.
    segments: Vec<String>,
    /// Continuation indent for wraps. `None` until a wrap point is seen
    /// on the current line.
    indent_level: Option<usize>,
    /// Optional prefix for wrapped lines (the kdoc ` * `).
    line_prefix: String,
}

impl<'a> LineWrapper<'a> {
    pub fn new(out: &'a mut dyn fmt::Write, indent: impl Into<String>, column_limit: usize) -> Self {
        Self::from_sink(Sink::Extern(out), indent, column_limit)
    }

    pub(crate) fn from_sink(out: Sink<'a>, indent: impl Into<String>, column_limit: usize) -> Self {
        Self {
            out,
            indent: indent.into(),
            column_limit,
            closed: false,
            segments: vec![String::new()],
            indent_level: None,
            line_prefix: String::new(),
        }
    }

    /// Whether the current line has any buffered content.
    pub fn has_pending_segments(&self) -> bool {
        self.segments.len() != 1 || !self.segments[0].is_empty()
    }

    /// Emits `s`, interpreting the wrap-point and non-breaking-space
    /// markers and hard newlines. `indent_level` and `line_prefix` are
    /// recorded at each wrap point and applied if that point wraps.
    pub fn append(&mut self, s: &str, indent_level: usize, line_prefix: &str) -> Result<()> {
        assert!(!self.closed, "closed");

        let mut pos = 0;
        while pos < s.len() {
            let c = s[pos..].chars().next().expect("pos is a char boundary");
            match c {
                WRAPPING_SPACE => {
                    // Each wrap point starts a new empty segment.
                    self.indent_level = Some(indent_level);
                    self.line_prefix = line_prefix.to_string();
                    self.segments.push(String::new());
                    pos += c.len_utf8();
                }
                '\n' => {
                    // Each newline flushes the buffered segments.
                    self.newline()?;
                    pos += 1;
                }
                ' ' | NON_BREAKING_SPACE => {
                    self.push_to_last_segment(" ");
                    pos += c.len_utf8();
                }
                _ => {
                    let next = s[pos..]
                        .find([' ', '\n', WRAPPING_SPACE, NON_BREAKING_SPACE])
                        .map_or(s.len(), |offset| pos + offset);
                    self.push_to_last_segment(&s[pos..next]);
                    pos = next;
                }
            }
        }
        Ok(())
    }

    /// Emits `s` verbatim into the current segment.
    ///
    /// # Panics
    ///
    /// Panics if `s` contains a newline; hard breaks must go through
    /// [`append`](Self::append) or [`newline`](Self::newline).
    pub fn append_non_wrapping(&mut self, s: &str) {
        assert!(!self.closed, "closed");
        assert!(!s.contains('\n'), "non-wrapping text must not contain newlines: {s:?}");
        self.push_to_last_segment(s);
    }

    /// Flushes the buffered segments and emits a hard line break.
    pub fn newline(&mut self) -> Result<()> {
        assert!(!self.closed, "closed");
        self.emit_current_line()?;
        self.out.write_str("\n")?;
        self.indent_level = None;
        Ok(())
    }

    /// Flushes any outstanding text and forbids further writes.
    pub fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.emit_current_line()?;
            self.closed = true;
        }
        Ok(())
    }

    /// Closes the wrapper and hands back the buffered output. Only valid
    /// for wrappers created over an internal buffer.
    pub(crate) fn into_buffer(mut self) -> Result<String> {
        self.close()?;
        match std::mem::replace(&mut self.out, Sink::Null) {
            Sink::Buffer(buffer) => Ok(buffer),
            _ => unreachable!("into_buffer on a non-buffered wrapper"),
        }
    }

    fn push_to_last_segment(&mut self, s: &str) {
        self.segments
            .last_mut()
            .expect("segments is never empty")
            .push_str(s);
    }

    fn emit_current_line(&mut self) -> Result<()> {
        let mut start = 0;
        let mut column_count = self.segments[0].chars().count();

        for i in 1..self.segments.len() {
            let segment_length = self.segments[i].chars().count();
            let new_column_count = column_count + 1 + segment_length;

            // This segment doesn't fit the current run: print the run and
            // start a new one. A segment landing exactly on the limit
            // stays on the line.
            if new_column_count > self.column_limit {
                self.emit_segment_range(start, i)?;
                start = i;
                column_count =
                    segment_length + self.indent.len() * self.indent_level.unwrap_or(0);
                continue;
            }

            column_count = new_column_count;
        }

        // Print the last run.
        self.emit_segment_range(start, self.segments.len())?;

        self.segments.clear();
        self.segments.push(String::new());
        Ok(())
    }

    fn emit_segment_range(&mut self, start: usize, end: usize) -> Result<()> {
        // A wrapped run needs a newline and the continuation indent.
        if start > 0 {
            self.out.write_str("\n")?;
            for _ in 0..self.indent_level.unwrap_or(0) {
                self.out.write_str(&self.indent)?;
            }
            self.out.write_str(&self.line_prefix)?;
        }

        self.out.write_str(&self.segments[start])?;
        for i in start + 1..end {
            self.out.write_str(" ")?;
            self.out.write_str(&self.segments[i])?;
        }
        Ok(())
    }
}

impl Drop for LineWrapper<'_> {
    fn drop(&mut self) {
        if !self.closed {
            // Last-resort flush; errors here have nowhere to go.
            let _ = self.emit_current_line();
            self.closed = true;
        }
    }
}
