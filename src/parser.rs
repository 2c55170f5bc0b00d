use crate::{
    Span,
    arena::{Builder, Handle},
    error::{Error, ErrorKind},
    number::{self, is_keylike_byte},
    tree::{NodeKind, Tree},
};

// ---------------------------------------------------------------------------
// Lightweight internal error -- zero-sized, no drop glue.
// When a method returns Err(ParseError), the full error details have already
// been written into Parser::error_kind / Parser::error_span.
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug)]
struct ParseError;

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    bytes: &'a [u8],
    cursor: usize,

    // Error context -- populated just before returning ParseError
    error_span: Span,
    error_kind: Option<ErrorKind>,

    builder: Builder<'a>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Parser {
            bytes: input,
            cursor: 0,
            error_span: Span::new(0, 0),
            error_kind: None,
            builder: Builder::new(input),
        }
    }

    // -- error helpers ------------------------------------------------------

    #[cold]
    fn set_error(&mut self, start: usize, end: Option<usize>, kind: ErrorKind) -> ParseError {
        let end = end.unwrap_or(start + 1).min(self.bytes.len()).max(start);
        self.error_span = Span::new(start as u32, end as u32);
        self.error_kind = Some(kind);
        ParseError
    }

    fn take_error(&mut self) -> Error {
        let kind = self
            .error_kind
            .take()
            .expect("take_error called without error");
        let span = self.error_span;
        let line_info = Some(self.to_linecol(span.start as usize));
        Error {
            kind,
            span,
            line_info,
        }
    }

    fn to_linecol(&self, offset: usize) -> (usize, usize) {
        let mut line_start = 0;
        let mut line_num = 0;
        for (i, &b) in self.bytes.iter().enumerate() {
            if i >= offset {
                return (line_num, offset - line_start);
            }
            if b == b'\n' {
                line_num += 1;
                line_start = i + 1;
            }
        }
        (line_num, offset - line_start)
    }

    /// Error for a byte that cannot appear at `at`.
    #[cold]
    fn unexpected(&mut self, at: usize) -> ParseError {
        if at >= self.bytes.len() {
            return self.set_error(at, None, ErrorKind::UnexpectedEof);
        }
        let ch = self.char_at(at);
        self.set_error(at, Some(at + ch.len_utf8()), ErrorKind::UnexpectedCharacter(ch))
    }

    #[cold]
    fn separator_error(&mut self, expected: &'static str) -> ParseError {
        let start = self.cursor;
        let (found, end) = self.scan_token_desc_and_end();
        self.set_error(start, Some(end), ErrorKind::UnexpectedSeparator { expected, found })
    }

    #[cold]
    fn unterminated(&mut self, open: usize, delimiter: char) -> ParseError {
        self.set_error(
            open,
            Some(self.cursor),
            ErrorKind::UnterminatedContainer { delimiter },
        )
    }

    /// Decodes the character at `at`, tolerating input that is not UTF-8.
    fn char_at(&self, at: usize) -> char {
        let window = &self.bytes[at..(at + 4).min(self.bytes.len())];
        let valid = match std::str::from_utf8(window) {
            Ok(s) => s,
            Err(err) => std::str::from_utf8(&window[..err.valid_up_to()]).unwrap_or_default(),
        };
        valid.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// Scan forward from the current position to determine the description
    /// and end position of the token at the cursor, for error messages.
    fn scan_token_desc_and_end(&self) -> (&'static str, usize) {
        match self.peek_byte() {
            None => ("eof", self.bytes.len()),
            Some(b'\n' | b'\r') => ("a newline", self.cursor + 1),
            Some(b'=') => ("an equals", self.cursor + 1),
            Some(b'.') => ("a period", self.cursor + 1),
            Some(b',') => ("a comma", self.cursor + 1),
            Some(b'{') => ("a left brace", self.cursor + 1),
            Some(b'}') => ("a right brace", self.cursor + 1),
            Some(b'[') => ("a left bracket", self.cursor + 1),
            Some(b']') => ("a right bracket", self.cursor + 1),
            Some(b'\'' | b'"') => ("a string", self.cursor + 1),
            Some(b) if is_keylike_byte(b) => ("an identifier", self.keylike_end(self.cursor)),
            Some(_) => ("a character", self.cursor + 1),
        }
    }

    // -- cursor operations --------------------------------------------------

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.cursor + offset).copied()
    }

    #[inline]
    fn advance(&mut self) {
        self.cursor += 1;
    }

    #[inline]
    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_whitespace(&mut self) {
        while let Some(b' ' | b'\t') = self.peek_byte() {
            self.advance();
        }
    }

    fn eat_newline(&mut self) -> bool {
        match self.peek_byte() {
            Some(b'\n') => {
                self.advance();
                true
            }
            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                self.cursor += 2;
                true
            }
            _ => false,
        }
    }

    #[inline]
    fn at_newline(&self) -> bool {
        match self.peek_byte() {
            Some(b'\n') => true,
            Some(b'\r') => self.peek_byte_at(1) == Some(b'\n'),
            _ => false,
        }
    }

    /// Whitespace and line breaks between array elements.
    fn eat_intermediate(&mut self) {
        loop {
            self.eat_whitespace();
            if !self.eat_newline() {
                break;
            }
        }
    }

    fn keylike_end(&self, start: usize) -> usize {
        let mut end = start;
        while end < self.bytes.len() && is_keylike_byte(self.bytes[end]) {
            end += 1;
        }
        end
    }

    // -- node helpers -------------------------------------------------------

    #[inline]
    fn leaf(&mut self, kind: NodeKind, start: usize, end: usize) -> Handle {
        self.builder
            .push(kind, Span::new(start as u32, end as u32))
    }

    /// Appends `node` to the children of `parent`, after `last`.
    fn link(&mut self, parent: Handle, last: &mut Option<Handle>, node: Handle) {
        match *last {
            Some(prev) => self.builder.chain(prev, node),
            None => self.builder.attach_child(parent, node),
        }
        *last = Some(node);
    }

    // -- scalar parsing -----------------------------------------------------

    fn number(&mut self) -> Result<Handle, ParseError> {
        let start = self.cursor;
        match number::recognize_number(self.bytes, start) {
            Ok(lit) => {
                self.cursor = lit.end;
                Ok(self.leaf(lit.kind, start, lit.end))
            }
            Err(bad) => {
                let end = self.literal_run_end(start).max(bad.at + 1);
                Err(self.set_error(start, Some(end), ErrorKind::MalformedNumber(bad.fault)))
            }
        }
    }

    /// End of the run of bytes that plausibly belong to a number literal.
    fn literal_run_end(&self, start: usize) -> usize {
        let mut end = start;
        while let Some(&b) = self.bytes.get(end) {
            let sign = b == b'+' || b == b'-';
            if is_keylike_byte(b) || b == b'.' || (sign && end == start) {
                end += 1;
            } else if sign && matches!(self.bytes[end - 1], b'e' | b'E') {
                end += 1;
            } else {
                break;
            }
        }
        end
    }

    fn boolean(&mut self) -> Result<Handle, ParseError> {
        let start = self.cursor;
        match number::recognize_bool(self.bytes, start) {
            Some(lit) => {
                self.cursor = lit.end;
                Ok(self.leaf(NodeKind::Bool, start, lit.end))
            }
            None => {
                let end = self.keylike_end(start);
                Err(self.set_error(start, Some(end), ErrorKind::MalformedBoolean))
            }
        }
    }

    /// Scans a single-line string. The stored data is the raw text between
    /// the quotes; escapes are skipped over, not decoded.
    fn string(&mut self, delim: u8) -> Result<Handle, ParseError> {
        let start = self.cursor;
        self.advance();
        let content_start = self.cursor;
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => {
                    return Err(self.set_error(
                        start,
                        Some(self.cursor),
                        ErrorKind::UnterminatedString,
                    ));
                }
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                    return Err(self.set_error(
                        start,
                        Some(self.cursor),
                        ErrorKind::UnterminatedString,
                    ));
                }
                Some(b) if b == delim => {
                    let end = self.cursor;
                    self.advance();
                    return Ok(self.leaf(NodeKind::String, content_start, end));
                }
                Some(b'\\') if delim == b'"' => {
                    self.advance();
                    if let Some(b) = self.peek_byte()
                        && b != b'\n'
                        && b != b'\r'
                    {
                        self.advance();
                    }
                }
                Some(_) => self.advance(),
            }
        }
    }

    // -- value parsing ------------------------------------------------------

    fn value(&mut self) -> Result<Handle, ParseError> {
        let at = self.cursor;
        let Some(byte) = self.peek_byte() else {
            return Err(self.set_error(self.bytes.len(), None, ErrorKind::UnexpectedEof));
        };
        match byte {
            b'"' | b'\'' => self.string(byte),
            b'[' => self.array(),
            b'{' => self.inline_table(),
            b't' | b'f' => self.boolean(),
            b'0'..=b'9' | b'+' | b'-' => self.number(),
            b'i' | b'n' => {
                let rest = &self.bytes[at..];
                if rest.starts_with(b"inf") || rest.starts_with(b"nan") {
                    self.number()
                } else {
                    Err(self.unexpected(at))
                }
            }
            _ => Err(self.unexpected(at)),
        }
    }

    fn array(&mut self) -> Result<Handle, ParseError> {
        let open = self.cursor;
        self.advance();
        let array = self.builder.push(NodeKind::Array, Span::default());
        let mut last = None;
        loop {
            self.eat_intermediate();
            match self.peek_byte() {
                None => return Err(self.unterminated(open, ']')),
                Some(b']') => {
                    self.advance();
                    return Ok(array);
                }
                Some(b',') => return Err(self.separator_error("a value")),
                Some(_) => {}
            }

            let element = self.value()?;
            self.link(array, &mut last, element);

            self.eat_intermediate();
            match self.peek_byte() {
                Some(b',') => self.advance(),
                Some(b']') => {
                    self.advance();
                    return Ok(array);
                }
                None => return Err(self.unterminated(open, ']')),
                Some(_) => return Err(self.separator_error("a comma or `]`")),
            }
        }
    }

    fn inline_table(&mut self) -> Result<Handle, ParseError> {
        let open = self.cursor;
        self.advance();
        let table = self.builder.push(NodeKind::InlineTable, Span::default());
        self.eat_whitespace();
        if self.eat_byte(b'}') {
            return Ok(table);
        }
        let mut last = None;
        loop {
            self.eat_whitespace();
            if self.peek_byte().is_none() || self.at_newline() {
                return Err(self.unterminated(open, '}'));
            }
            if let Some(b',' | b'}') = self.peek_byte() {
                return Err(self.separator_error("a key"));
            }

            let entry = self.key_value()?;
            self.link(table, &mut last, entry);

            self.eat_whitespace();
            match self.peek_byte() {
                Some(b',') => self.advance(),
                Some(b'}') => {
                    self.advance();
                    return Ok(table);
                }
                None => return Err(self.unterminated(open, '}')),
                Some(_) if self.at_newline() => return Err(self.unterminated(open, '}')),
                Some(_) => return Err(self.separator_error("a comma or `}`")),
            }
        }
    }

    // -- statements ---------------------------------------------------------

    fn read_key(&mut self) -> Result<(usize, usize), ParseError> {
        let start = self.cursor;
        match self.peek_byte() {
            Some(b) if is_keylike_byte(b) => {
                self.cursor = self.keylike_end(start);
                Ok((start, self.cursor))
            }
            _ => Err(self.unexpected(start)),
        }
    }

    /// Parses `key = value`. The value is pushed first, then the key, then
    /// the `KeyValue` node that owns both.
    fn key_value(&mut self) -> Result<Handle, ParseError> {
        let (key_start, key_end) = self.read_key()?;
        self.eat_whitespace();
        if !self.eat_byte(b'=') {
            let at = self.cursor;
            let (_, end) = self.scan_token_desc_and_end();
            return Err(self.set_error(at, Some(end), ErrorKind::MissingAssignment));
        }
        self.eat_whitespace();

        let value = self.value()?;
        let key = self.leaf(NodeKind::Key, key_start, key_end);
        let entry = self.builder.push(NodeKind::KeyValue, Span::default());
        self.builder.attach_child(entry, value);
        self.builder.chain(value, key);
        Ok(entry)
    }

    fn parse_document(&mut self) -> Result<(), ParseError> {
        loop {
            self.eat_whitespace();
            if self.eat_newline() {
                continue;
            }
            if self.peek_byte().is_none() {
                return Ok(());
            }

            let entry = self.key_value()?;
            self.builder.append_root(entry);

            self.eat_whitespace();
            if self.peek_byte().is_none() {
                return Ok(());
            }
            if !self.eat_newline() {
                return Err(self.unexpected(self.cursor));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level parse entry points
// ---------------------------------------------------------------------------

/// Parses a document of `key = value` lines into a [`Tree`].
///
/// The tree borrows `input`: every leaf's data is the exact byte range of
/// the literal in the source, never decoded or normalized.
///
/// # Examples
///
/// ```
/// use toml_arena::NodeKind;
///
/// let tree = toml_arena::parse(b"A = 0xdead_beef")?;
/// let entry = tree.iter().next().unwrap();
/// let value = entry.value().unwrap();
/// assert_eq!(value.kind(), NodeKind::Integer);
/// assert_eq!(value.data(), b"0xdead_beef");
/// # Ok::<(), toml_arena::Error>(())
/// ```
pub fn parse(input: &[u8]) -> Result<Tree<'_>, Error> {
    // Spans store u32 offsets and u32::MAX marks absent links.
    if input.len() >= u32::MAX as usize {
        return Err(Error {
            kind: ErrorKind::FileTooLarge,
            span: Span::new(0, 0),
            line_info: None,
        });
    }

    let mut parser = Parser::new(input);
    match parser.parse_document() {
        Ok(()) => Ok(parser.builder.finish()),
        Err(ParseError) => Err(parser.take_error()),
    }
}

/// [`parse`] for string input.
pub fn parse_str(input: &str) -> Result<Tree<'_>, Error> {
    parse(input.as_bytes())
}

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;
