//! Styler lexer -- single-pass tokenizer for the target language.
//!
//! The lexer consumes source text once and produces a flat token stream with
//! byte-accurate spans. Whitespace and comments are emitted as distinct
//! trivia tokens, so every input byte is accounted for by exactly one token.
//! String and character literals keep their escape sequences verbatim;
//! decoding happens later, at tree conversion time.
//!
//! The lexer never aborts: unknown characters and unterminated literals
//! produce `Error` tokens and lexing continues. After the `Eof` token has
//! been produced, further calls to [`Lexer::next_token`] keep returning
//! `Eof`.

mod cursor;

use cursor::Cursor;
use styler_common::token::{keyword_from_str, Token, TokenKind};

/// The Styler lexer. Converts source text into a stream of tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily or collect
/// them into a `Vec`. Restarting requires constructing a new lexer.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether the `Eof` token has been handed out via the iterator.
    emitted_eof: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Produce the next token, advancing the internal cursor.
    ///
    /// Once the end of input is reached this keeps returning `Eof` tokens
    /// with a zero-length span at the end of the source.
    pub fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Trivia ─────────────────────────────────────────────────
            c if is_whitespace(c) => {
                self.cursor.eat_while(is_whitespace);
                Token::new(TokenKind::Whitespace, start, self.cursor.pos())
            }

            // ── Identifiers and keywords ───────────────────────────────
            c if is_identifier_start(c) => self.lex_identifier_or_keyword(start),

            // ── Numbers ────────────────────────────────────────────────
            c if c.is_ascii_digit() => self.lex_number(start),

            // ── Literals with delimiters ───────────────────────────────
            '"' => self.lex_string(start),
            '\'' => self.lex_char(start),

            // ── Operators and separators ───────────────────────────────
            '(' => self.single(TokenKind::LParen, start),
            ')' => self.single(TokenKind::RParen, start),
            '{' => self.single(TokenKind::LBrace, start),
            '}' => self.single(TokenKind::RBrace, start),
            '[' => self.single(TokenKind::LBracket, start),
            ']' => self.single(TokenKind::RBracket, start),
            ';' => self.single(TokenKind::Semicolon, start),
            ',' => self.single(TokenKind::Comma, start),
            '@' => self.single(TokenKind::At, start),
            '~' => self.single(TokenKind::Tilde, start),
            '?' => self.single(TokenKind::Question, start),
            '.' => self.lex_dot(start),
            ':' => self.lex_colon(start),
            '=' => self.lex_eq(start),
            '!' => self.lex_bang(start),
            '<' => self.lex_lt(start),
            '>' => self.lex_gt(start),
            '&' => self.lex_amp(start),
            '|' => self.lex_pipe(start),
            '+' => self.lex_plus(start),
            '-' => self.lex_minus(start),
            '*' => self.lex_star(start),
            '/' => self.lex_slash(start),
            '^' => self.lex_caret(start),
            '%' => self.lex_percent(start),

            // ── Anything else ──────────────────────────────────────────
            _ => {
                self.cursor.advance();
                Token::new(TokenKind::Error, start, self.cursor.pos())
            }
        }
    }

    // ── Identifiers ────────────────────────────────────────────────────

    fn lex_identifier_or_keyword(&mut self, start: u32) -> Token {
        self.cursor.eat_while(is_identifier_continue);
        let text = self.cursor.text_since(start);

        // `non-sealed` is the one hyphenated keyword. Only commit to it when
        // the hyphenated run ends the identifier-shaped text.
        if text == "non"
            && self.cursor.matches_ahead("-sealed")
            && !self.cursor.peek_at(7).is_some_and(is_identifier_continue)
        {
            self.cursor.eat_literal("-sealed");
            return Token::new(TokenKind::NonSealed, start, self.cursor.pos());
        }

        let kind = keyword_from_str(text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, start, self.cursor.pos())
    }

    // ── Numbers ────────────────────────────────────────────────────────

    /// Lex a numeric literal starting with a digit.
    ///
    /// Underscore digit separators are accepted everywhere a digit may
    /// appear. Suffix handling only classifies the token kind; value parsing
    /// is delegated to the converter.
    fn lex_number(&mut self, start: u32) -> Token {
        // Hex and binary prefixes.
        if self.cursor.peek() == Some('0') {
            match self.cursor.peek_at(1) {
                Some('x' | 'X') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.eat_digits(16);
                    return self.finish_integer(start);
                }
                Some('b' | 'B') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.eat_digits(2);
                    return self.finish_integer(start);
                }
                _ => {}
            }
        }

        self.cursor.eat_digits(10);

        let mut is_floating = false;

        // Fractional part. A trailing `1.` with no following digit is still a
        // floating literal as long as no identifier follows the dot.
        if self.cursor.peek() == Some('.') {
            let after_dot = self.cursor.peek_at(1);
            let fraction = after_dot.is_some_and(|c| c.is_ascii_digit());
            let bare_dot = !after_dot.is_some_and(|c| is_identifier_start(c) || c == '.');
            if fraction || bare_dot {
                self.cursor.advance();
                self.cursor.eat_digits(10);
                is_floating = true;
            }
        }

        if self.eat_exponent() {
            is_floating = true;
        }

        self.finish_float_or_integer(start, is_floating)
    }

    /// Lex a numeric literal that started at a dot, e.g. `.5`.
    fn lex_number_from_dot(&mut self, start: u32) -> Token {
        self.cursor.advance(); // .
        self.cursor.eat_digits(10);
        self.eat_exponent();
        self.finish_float_or_integer(start, true)
    }

    /// Consume an exponent part (`e+10`, `E5`) if present.
    fn eat_exponent(&mut self) -> bool {
        if !matches!(self.cursor.peek(), Some('e' | 'E')) {
            return false;
        }
        let next = self.cursor.peek_at(1);
        let signed = matches!(next, Some('+' | '-'));
        if !signed && !next.is_some_and(|c| c.is_ascii_digit()) {
            return false;
        }
        self.cursor.advance(); // e/E
        if signed {
            self.cursor.advance();
        }
        self.cursor.eat_digits(10);
        true
    }

    fn finish_integer(&mut self, start: u32) -> Token {
        let kind = if matches!(self.cursor.peek(), Some('l' | 'L')) {
            self.cursor.advance();
            TokenKind::LongLiteral
        } else {
            TokenKind::IntLiteral
        };
        Token::new(kind, start, self.cursor.pos())
    }

    fn finish_float_or_integer(&mut self, start: u32, is_floating: bool) -> Token {
        let kind = match self.cursor.peek() {
            Some('f' | 'F') => {
                self.cursor.advance();
                TokenKind::FloatLiteral
            }
            Some('d' | 'D') => {
                self.cursor.advance();
                TokenKind::DoubleLiteral
            }
            Some('l' | 'L') if !is_floating => {
                self.cursor.advance();
                TokenKind::LongLiteral
            }
            _ if is_floating => TokenKind::DoubleLiteral,
            _ => TokenKind::IntLiteral,
        };
        Token::new(kind, start, self.cursor.pos())
    }

    // ── Strings and characters ─────────────────────────────────────────

    fn lex_string(&mut self, start: u32) -> Token {
        if self.cursor.matches_ahead("\"\"\"") {
            return self.lex_text_block(start);
        }

        self.cursor.advance(); // opening "
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    // Unterminated: the error token covers the open fragment.
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('"') => {
                    self.cursor.advance();
                    return Token::new(TokenKind::StringLiteral, start, self.cursor.pos());
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_text_block(&mut self, start: u32) -> Token {
        self.cursor.eat_literal("\"\"\"");
        loop {
            match self.cursor.peek() {
                None => return Token::new(TokenKind::Error, start, self.cursor.pos()),
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('"') if self.cursor.matches_ahead("\"\"\"") => {
                    self.cursor.eat_literal("\"\"\"");
                    return Token::new(TokenKind::TextBlock, start, self.cursor.pos());
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_char(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening '
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return Token::new(TokenKind::Error, start, self.cursor.pos());
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('\'') => {
                    self.cursor.advance();
                    return Token::new(TokenKind::CharLiteral, start, self.cursor.pos());
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // ── Operators ──────────────────────────────────────────────────────

    fn single(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// Consume `n` characters and produce a token of the given kind.
    fn multi(&mut self, kind: TokenKind, start: u32, n: u32) -> Token {
        for _ in 0..n {
            self.cursor.advance();
        }
        Token::new(kind, start, self.cursor.pos())
    }

    fn lex_dot(&mut self, start: u32) -> Token {
        if self.cursor.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            return self.lex_number_from_dot(start);
        }
        if self.cursor.matches_ahead("...") {
            return self.multi(TokenKind::Ellipsis, start, 3);
        }
        self.single(TokenKind::Dot, start)
    }

    fn lex_colon(&mut self, start: u32) -> Token {
        if self.cursor.peek_at(1) == Some(':') {
            self.multi(TokenKind::ColonColon, start, 2)
        } else {
            self.single(TokenKind::Colon, start)
        }
    }

    fn lex_eq(&mut self, start: u32) -> Token {
        if self.cursor.peek_at(1) == Some('=') {
            self.multi(TokenKind::EqEq, start, 2)
        } else {
            self.single(TokenKind::Assign, start)
        }
    }

    fn lex_bang(&mut self, start: u32) -> Token {
        if self.cursor.peek_at(1) == Some('=') {
            self.multi(TokenKind::NotEq, start, 2)
        } else {
            self.single(TokenKind::Bang, start)
        }
    }

    fn lex_lt(&mut self, start: u32) -> Token {
        if self.cursor.matches_ahead("<<=") {
            self.multi(TokenKind::ShlAssign, start, 3)
        } else if self.cursor.matches_ahead("<<") {
            self.multi(TokenKind::Shl, start, 2)
        } else if self.cursor.matches_ahead("<=") {
            self.multi(TokenKind::LtEq, start, 2)
        } else {
            self.single(TokenKind::Lt, start)
        }
    }

    /// Maximal munch on `>`: `>>>=` before `>>>` before `>>=` before `>>`
    /// before `>=` before `>`. The parser splits these back into single `>`
    /// tokens inside generic type arguments.
    fn lex_gt(&mut self, start: u32) -> Token {
        if self.cursor.matches_ahead(">>>=") {
            self.multi(TokenKind::UShrAssign, start, 4)
        } else if self.cursor.matches_ahead(">>>") {
            self.multi(TokenKind::UShr, start, 3)
        } else if self.cursor.matches_ahead(">>=") {
            self.multi(TokenKind::ShrAssign, start, 3)
        } else if self.cursor.matches_ahead(">>") {
            self.multi(TokenKind::Shr, start, 2)
        } else if self.cursor.matches_ahead(">=") {
            self.multi(TokenKind::GtEq, start, 2)
        } else {
            self.single(TokenKind::Gt, start)
        }
    }

    fn lex_amp(&mut self, start: u32) -> Token {
        match self.cursor.peek_at(1) {
            Some('&') => self.multi(TokenKind::AmpAmp, start, 2),
            Some('=') => self.multi(TokenKind::AmpAssign, start, 2),
            _ => self.single(TokenKind::Amp, start),
        }
    }

    fn lex_pipe(&mut self, start: u32) -> Token {
        match self.cursor.peek_at(1) {
            Some('|') => self.multi(TokenKind::PipePipe, start, 2),
            Some('=') => self.multi(TokenKind::PipeAssign, start, 2),
            _ => self.single(TokenKind::Pipe, start),
        }
    }

    fn lex_plus(&mut self, start: u32) -> Token {
        match self.cursor.peek_at(1) {
            Some('+') => self.multi(TokenKind::PlusPlus, start, 2),
            Some('=') => self.multi(TokenKind::PlusAssign, start, 2),
            _ => self.single(TokenKind::Plus, start),
        }
    }

    fn lex_minus(&mut self, start: u32) -> Token {
        match self.cursor.peek_at(1) {
            Some('-') => self.multi(TokenKind::MinusMinus, start, 2),
            Some('=') => self.multi(TokenKind::MinusAssign, start, 2),
            Some('>') => self.multi(TokenKind::Arrow, start, 2),
            _ => self.single(TokenKind::Minus, start),
        }
    }

    fn lex_star(&mut self, start: u32) -> Token {
        if self.cursor.peek_at(1) == Some('=') {
            self.multi(TokenKind::StarAssign, start, 2)
        } else {
            self.single(TokenKind::Star, start)
        }
    }

    fn lex_slash(&mut self, start: u32) -> Token {
        match self.cursor.peek_at(1) {
            Some('/') => self.lex_line_comment(start),
            Some('*') => self.lex_block_comment(start),
            Some('=') => self.multi(TokenKind::SlashAssign, start, 2),
            _ => self.single(TokenKind::Slash, start),
        }
    }

    fn lex_caret(&mut self, start: u32) -> Token {
        if self.cursor.peek_at(1) == Some('=') {
            self.multi(TokenKind::CaretAssign, start, 2)
        } else {
            self.single(TokenKind::Caret, start)
        }
    }

    fn lex_percent(&mut self, start: u32) -> Token {
        if self.cursor.peek_at(1) == Some('=') {
            self.multi(TokenKind::PercentAssign, start, 2)
        } else {
            self.single(TokenKind::Percent, start)
        }
    }

    // ── Comments ───────────────────────────────────────────────────────

    fn lex_line_comment(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c != '\n');
        Token::new(TokenKind::LineComment, start, self.cursor.pos())
    }

    /// Lex `/* ... */` or `/** ... */`. An unterminated comment produces an
    /// error token covering the rest of the input.
    fn lex_block_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // /
        self.cursor.advance(); // *

        // `/**` begins a doc comment unless it is the empty comment `/**/`.
        let is_doc = self.cursor.peek() == Some('*') && self.cursor.peek_at(1) != Some('/');

        loop {
            match self.cursor.peek() {
                None => return Token::new(TokenKind::Error, start, self.cursor.pos()),
                Some('*') if self.cursor.peek_at(1) == Some('/') => {
                    self.cursor.advance();
                    self.cursor.advance();
                    let kind = if is_doc {
                        TokenKind::DocComment
                    } else {
                        TokenKind::BlockComment
                    };
                    return Token::new(kind, start, self.cursor.pos());
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token once, ending with a single `Eof`.
    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{0C}' | '\r' | '\n')
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    /// Token kinds with trivia removed, for structure-only assertions.
    fn significant_kinds(source: &str) -> Vec<TokenKind> {
        kinds(source)
            .into_iter()
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn empty_source_yields_only_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn next_token_keeps_returning_eof() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn every_byte_is_covered() {
        let source = "class A { int x = 1; // note\n}";
        let tokens = Lexer::tokenize(source);
        let mut pos = 0u32;
        for token in &tokens {
            assert_eq!(token.span.start, pos, "gap before {:?}", token.kind);
            pos = token.span.end;
        }
        assert_eq!(pos, source.len() as u32);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            significant_kinds("class Foo extends Bar"),
            vec![
                TokenKind::Class,
                TokenKind::Identifier,
                TokenKind::Extends,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn contextual_keywords_get_keyword_kinds() {
        assert_eq!(
            significant_kinds("record sealed permits var yield"),
            vec![
                TokenKind::Record,
                TokenKind::Sealed,
                TokenKind::Permits,
                TokenKind::Var,
                TokenKind::Yield,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn non_sealed_is_one_token() {
        assert_eq!(
            significant_kinds("non-sealed class"),
            vec![TokenKind::NonSealed, TokenKind::Class, TokenKind::Eof]
        );
    }

    #[test]
    fn non_minus_sealed_identifier_run_is_not_the_keyword() {
        // `nonX-sealed` and `non-sealedX` must not produce NonSealed.
        assert_eq!(
            significant_kinds("non - sealed"),
            vec![
                TokenKind::Identifier,
                TokenKind::Minus,
                TokenKind::Sealed,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            significant_kinds("non-sealedx"),
            vec![
                TokenKind::Identifier,
                TokenKind::Minus,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn maximal_munch_gt_family() {
        assert_eq!(
            significant_kinds(">>>= >>> >>= >> >= >"),
            vec![
                TokenKind::UShrAssign,
                TokenKind::UShr,
                TokenKind::ShrAssign,
                TokenKind::Shr,
                TokenKind::GtEq,
                TokenKind::Gt,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn operator_families() {
        assert_eq!(
            significant_kinds("a += b << 2 ^ ~c % 3"),
            vec![
                TokenKind::Identifier,
                TokenKind::PlusAssign,
                TokenKind::Identifier,
                TokenKind::Shl,
                TokenKind::IntLiteral,
                TokenKind::Caret,
                TokenKind::Tilde,
                TokenKind::Identifier,
                TokenKind::Percent,
                TokenKind::IntLiteral,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn arrow_and_method_reference() {
        assert_eq!(
            significant_kinds("x -> X::new"),
            vec![
                TokenKind::Identifier,
                TokenKind::Arrow,
                TokenKind::Identifier,
                TokenKind::ColonColon,
                TokenKind::New,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn integer_literal_shapes() {
        assert_eq!(
            significant_kinds("42 0xFF 0b1010 1_000 9L"),
            vec![
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::IntLiteral,
                TokenKind::LongLiteral,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn floating_literal_shapes() {
        assert_eq!(
            significant_kinds("3.14 1e10 2.5f 2.5d .5 1."),
            vec![
                TokenKind::DoubleLiteral,
                TokenKind::DoubleLiteral,
                TokenKind::FloatLiteral,
                TokenKind::DoubleLiteral,
                TokenKind::DoubleLiteral,
                TokenKind::DoubleLiteral,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn member_access_is_not_a_float() {
        assert_eq!(
            significant_kinds("foo.bar"),
            vec![
                TokenKind::Identifier,
                TokenKind::Dot,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn string_literal_keeps_escapes_verbatim() {
        let source = r#""a\n\"b""#;
        let tokens = Lexer::tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].span.start, 0);
        assert_eq!(tokens[0].span.end, source.len() as u32);
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        let tokens = Lexer::tokenize("\"abc");
        assert_eq!(tokens[0].kind, TokenKind::Error);
    }

    #[test]
    fn char_literal() {
        assert_eq!(
            significant_kinds(r"'a' '\n' '\''"),
            vec![
                TokenKind::CharLiteral,
                TokenKind::CharLiteral,
                TokenKind::CharLiteral,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn text_block() {
        let source = "\"\"\"\nhello \"world\"\n\"\"\"";
        let tokens = Lexer::tokenize(source);
        assert_eq!(tokens[0].kind, TokenKind::TextBlock);
        assert_eq!(tokens[0].span.end, source.len() as u32);
    }

    #[test]
    fn comments() {
        assert_eq!(
            kinds("// line\n/* block */ /** doc */"),
            vec![
                TokenKind::LineComment,
                TokenKind::Whitespace,
                TokenKind::BlockComment,
                TokenKind::Whitespace,
                TokenKind::DocComment,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn empty_block_comment_is_not_a_doc_comment() {
        assert_eq!(kinds("/**/"), vec![TokenKind::BlockComment, TokenKind::Eof]);
    }

    #[test]
    fn unknown_character_yields_error_and_continues() {
        assert_eq!(
            significant_kinds("a ` b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Error,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn ellipsis_and_annotations() {
        assert_eq!(
            significant_kinds("@SafeVarargs void f(int... xs)"),
            vec![
                TokenKind::At,
                TokenKind::Identifier,
                TokenKind::Void,
                TokenKind::Identifier,
                TokenKind::LParen,
                TokenKind::Int,
                TokenKind::Ellipsis,
                TokenKind::Identifier,
                TokenKind::RParen,
                TokenKind::Eof
            ]
        );
    }
}
