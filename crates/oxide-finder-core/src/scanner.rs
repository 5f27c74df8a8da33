//! Delimiter-aware scanning over raw SQL text.
//!
//! The scanner never tokenizes SQL. It only walks a cursor forward until a
//! terminal shows up at the top level, treating quoted strings, quoted and
//! bracketed identifiers, parenthesized expressions and comments as opaque
//! regions. At every cursor position the alternatives are tried in a fixed
//! order: backslash escape, region opener, terminal, single character.
//!
//! Unterminated regions run to the end of the input. Nothing here ever
//! fails; garbage in gives garbage out.

/// A token that ends a scan when found outside every nested region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal<'t> {
    /// A keyword, matched case-insensitively on word boundaries. A space
    /// inside the keyword (`GROUP BY`) matches any run of whitespace.
    Keyword(&'t str),
    /// Punctuation, matched exactly.
    Punct(&'t str),
    /// A run of whitespace.
    Whitespace,
}

/// A nested region and its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Bracket,
    Paren,
    Backtick,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
}

impl Region {
    /// Openers in matching priority.
    const ALL: [Self; 7] = [
        Self::Bracket,
        Self::Paren,
        Self::Backtick,
        Self::SingleQuote,
        Self::DoubleQuote,
        Self::LineComment,
        Self::BlockComment,
    ];

    const fn opener(self) -> &'static str {
        match self {
            Self::Bracket => "[",
            Self::Paren => "(",
            Self::Backtick => "`",
            Self::SingleQuote => "'",
            Self::DoubleQuote => "\"",
            Self::LineComment => "--",
            Self::BlockComment => "/*",
        }
    }

    const fn closer(self) -> &'static str {
        match self {
            Self::Bracket => "]",
            Self::Paren => ")",
            Self::Backtick => "`",
            Self::SingleQuote => "'",
            Self::DoubleQuote => "\"",
            Self::LineComment => "\n",
            Self::BlockComment => "*/",
        }
    }

    /// Only parentheses may contain further regions; everything else is
    /// literal up to its closer.
    const fn nests(self) -> bool {
        matches!(self, Self::Paren)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn whitespace_len(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// A forward-only cursor over raw SQL.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    unclosed: Option<Region>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            unclosed: None,
        }
    }

    /// Returns the current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the unconsumed input.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Returns true once the whole input has been consumed.
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Advances past leading whitespace.
    pub fn skip_whitespace(&mut self) {
        self.pos += whitespace_len(self.remaining());
    }

    /// Returns true if the unconsumed input starts with `keyword`, allowing
    /// leading whitespace. Does not move the cursor.
    #[must_use]
    pub fn at_keyword(&self, keyword: &str) -> bool {
        let mut lookahead = self.clone();
        lookahead.skip_whitespace();
        lookahead.match_terminal(Terminal::Keyword(keyword)).is_some()
    }

    /// Consumes `terminal` if it matches at the cursor.
    pub fn eat(&mut self, terminal: Terminal<'_>) -> bool {
        match self.match_terminal(terminal) {
            Some(len) => {
                self.pos += len;
                true
            }
            None => false,
        }
    }

    /// Consumes input up to, but not including, the first top-level
    /// terminal, and returns the consumed text.
    ///
    /// With no terminal found the scan runs to the end of the input.
    pub fn scan_until(&mut self, terminals: &[Terminal<'_>]) -> &'a str {
        let start = self.pos;
        while !self.is_at_end() {
            if self.eat_escape() {
                continue;
            }
            if let Some(region) = self.region_at_cursor() {
                self.pos += region.opener().len();
                self.unclosed = self.consume_region(region);
                continue;
            }
            if terminals
                .iter()
                .any(|terminal| self.match_terminal(*terminal).is_some())
            {
                break;
            }
            self.advance_char();
        }
        &self.input[start..self.pos]
    }

    /// Returns true if the last scan hit the end of the input inside a
    /// `--` comment.
    #[must_use]
    pub fn in_line_comment(&self) -> bool {
        self.unclosed == Some(Region::LineComment)
    }

    /// Consumes through the closer of `region`, whose opener has already
    /// been eaten. Parenthesized regions push nested regions on a stack so
    /// deep nesting never recurses.
    ///
    /// Returns the innermost region still open when the input ran out.
    fn consume_region(&mut self, region: Region) -> Option<Region> {
        let mut open = vec![region];
        while let Some(&innermost) = open.last() {
            if self.is_at_end() {
                return Some(innermost);
            }
            if self.eat_escape() {
                continue;
            }
            if self.remaining().starts_with(innermost.closer()) {
                self.pos += innermost.closer().len();
                open.pop();
                continue;
            }
            if innermost.nests() {
                if let Some(inner) = self.region_at_cursor() {
                    self.pos += inner.opener().len();
                    open.push(inner);
                    continue;
                }
            }
            self.advance_char();
        }
        None
    }

    /// A backslash always takes the following character with it.
    fn eat_escape(&mut self) -> bool {
        if !self.remaining().starts_with('\\') {
            return false;
        }
        self.pos += 1;
        self.advance_char();
        true
    }

    fn region_at_cursor(&self) -> Option<Region> {
        let rest = self.remaining();
        Region::ALL
            .into_iter()
            .find(|region| rest.starts_with(region.opener()))
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.remaining().chars().next() {
            self.pos += c.len_utf8();
        }
    }

    /// Returns the byte length of `terminal` if it matches at the cursor.
    fn match_terminal(&self, terminal: Terminal<'_>) -> Option<usize> {
        let rest = self.remaining();
        match terminal {
            Terminal::Punct(punct) => {
                (!punct.is_empty() && rest.starts_with(punct)).then_some(punct.len())
            }
            Terminal::Whitespace => {
                let len = whitespace_len(rest);
                (len > 0).then_some(len)
            }
            Terminal::Keyword(keyword) => self.match_keyword(keyword),
        }
    }

    fn match_keyword(&self, keyword: &str) -> Option<usize> {
        if self.input[..self.pos]
            .chars()
            .next_back()
            .is_some_and(is_word_char)
        {
            return None;
        }

        let rest = self.remaining();
        let mut len = 0;
        for (i, word) in keyword.split_whitespace().enumerate() {
            if i > 0 {
                let gap = whitespace_len(&rest[len..]);
                if gap == 0 {
                    return None;
                }
                len += gap;
            }
            let candidate = rest.get(len..len + word.len())?;
            if !candidate.eq_ignore_ascii_case(word) {
                return None;
            }
            len += word.len();
        }

        if len == 0 || rest[len..].chars().next().is_some_and(is_word_char) {
            return None;
        }
        Some(len)
    }
}

/// Returns true if `text` ends inside an unterminated `--` comment, so
/// anything appended to it would be commented out.
#[must_use]
pub fn ends_in_line_comment(text: &str) -> bool {
    let mut scanner = Scanner::new(text);
    scanner.scan_until(&[]);
    scanner.in_line_comment()
}

/// Splits `input` on every top-level occurrence of `separator`.
///
/// A trailing separator does not produce an empty last part; empty input
/// gives no parts.
#[must_use]
pub fn split_top_level<'a>(input: &'a str, separator: Terminal<'_>) -> Vec<&'a str> {
    let mut scanner = Scanner::new(input);
    let mut parts = Vec::new();
    while !scanner.is_at_end() {
        parts.push(scanner.scan_until(&[separator]));
        scanner.eat(separator);
    }
    parts
}
