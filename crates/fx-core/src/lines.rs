/// A single line of a text buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number within the buffer.
    pub number: u32,
    /// The line including its terminator, if it had one.
    pub raw: &'a str,
}

impl<'a> Line<'a> {
    /// The line without its `\n` or `\r\n` terminator.
    pub fn content(&self) -> &'a str {
        let text = self.raw.strip_suffix('\n').unwrap_or(self.raw);
        text.strip_suffix('\r').unwrap_or(text)
    }

    pub fn has_terminator(&self) -> bool {
        self.raw.ends_with('\n')
    }
}

/// Lazy iterator over the lines of a buffer. A trailing terminator does not
/// produce an extra empty line.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
    number: u32,
}

impl<'a> Lines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            rest: text,
            number: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .find('\n')
            .map(|idx| idx + 1)
            .unwrap_or(self.rest.len());
        let (raw, rest) = self.rest.split_at(end);
        self.rest = rest;
        self.number += 1;
        Some(Line {
            number: self.number,
            raw,
        })
    }
}

pub fn lines(text: &str) -> Lines<'_> {
    Lines::new(text)
}
