//! Trivia attachment: comments and whitespace from the token stream,
//! assigned as leading or trailing lists keyed by byte offset.

use rustc_hash::FxHashMap;
use serde::Serialize;
use styler_arena::NodeKind;
use styler_common::span::Span;
use styler_common::token::{Token, TokenKind};

/// One piece of trivia with its text copied out of the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trivia {
    pub kind: NodeKind,
    pub span: Span,
    pub text: String,
}

impl Trivia {
    pub fn new(kind: NodeKind, span: Span, text: String) -> Self {
        Self { kind, span, text }
    }

    pub fn is_comment(&self) -> bool {
        !matches!(self.kind, NodeKind::WhitespaceTrivia)
    }
}

/// Pre-computed trivia attachment built from the lexer's token stream.
///
/// A trivia run between two significant tokens is split at its first line
/// terminator: the prefix (a same-line comment after code) trails the
/// earlier token, the remainder leads the later one. The converter looks
/// these up by the byte offsets of a node's first and last token.
#[derive(Debug, Default)]
pub struct TriviaMap {
    /// Keyed by the start offset of the following significant token.
    leading: FxHashMap<u32, Vec<Trivia>>,
    /// Keyed by the end offset of the preceding significant token.
    trailing: FxHashMap<u32, Vec<Trivia>>,
}

impl TriviaMap {
    pub fn build(source: &str, tokens: &[Token]) -> Self {
        let mut map = TriviaMap::default();
        let mut run: Vec<Trivia> = Vec::new();
        let mut previous_end: Option<u32> = None;

        for token in tokens {
            if token.kind.is_trivia() {
                run.push(Trivia::new(
                    trivia_kind(token.kind),
                    token.span,
                    source[token.span.start as usize..token.span.end as usize].to_string(),
                ));
                continue;
            }

            if !run.is_empty() {
                let taken = std::mem::take(&mut run);
                // Before the first significant token nothing can trail.
                let (trailing, leading) = match previous_end {
                    Some(_) => split_run(taken),
                    None => (Vec::new(), taken),
                };
                if let Some(end) = previous_end {
                    if !trailing.is_empty() {
                        map.trailing.insert(end, trailing);
                    }
                }
                if !leading.is_empty() {
                    map.leading.insert(token.span.start, leading);
                }
            }
            if token.kind != TokenKind::Eof {
                previous_end = Some(token.span.end);
            }
        }
        map
    }

    /// Trivia leading the token that starts at `offset`.
    pub fn leading_at(&self, offset: u32) -> Vec<Trivia> {
        self.leading.get(&offset).cloned().unwrap_or_default()
    }

    /// Same-line trivia trailing the token that ends at `offset`.
    pub fn trailing_at(&self, offset: u32) -> Vec<Trivia> {
        self.trailing.get(&offset).cloned().unwrap_or_default()
    }
}

/// Split a trivia run at its first line terminator: everything before it
/// trails the previous token, the rest leads the next one.
fn split_run(run: Vec<Trivia>) -> (Vec<Trivia>, Vec<Trivia>) {
    let split = run
        .iter()
        .position(|t| t.kind == NodeKind::WhitespaceTrivia && t.text.contains('\n'))
        .unwrap_or(run.len());
    let mut trailing = run;
    let leading = trailing.split_off(split);
    // A trailing list with no comment carries no information.
    if !trailing.iter().any(Trivia::is_comment) {
        let mut merged = trailing;
        merged.extend(leading);
        return (Vec::new(), merged);
    }
    (trailing, leading)
}

fn trivia_kind(kind: TokenKind) -> NodeKind {
    match kind {
        TokenKind::LineComment => NodeKind::LineCommentTrivia,
        TokenKind::BlockComment => NodeKind::BlockCommentTrivia,
        TokenKind::DocComment => NodeKind::DocCommentTrivia,
        _ => NodeKind::WhitespaceTrivia,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use styler_lexer::Lexer;

    fn map_for(source: &str) -> TriviaMap {
        TriviaMap::build(source, &Lexer::tokenize(source))
    }

    #[test]
    fn comment_before_declaration_is_leading() {
        let source = "// header\nclass T {}";
        let map = map_for(source);
        let leading = map.leading_at(10); // offset of `class`
        assert_eq!(leading.len(), 2); // comment + newline whitespace
        assert_eq!(leading[0].kind, NodeKind::LineCommentTrivia);
        assert_eq!(leading[0].text, "// header");
    }

    #[test]
    fn same_line_comment_is_trailing() {
        let source = "int x; // note\nint y;";
        let map = map_for(source);
        // `;` of the first declaration ends at offset 6.
        let trailing = map.trailing_at(6);
        assert!(trailing.iter().any(|t| t.text == "// note"));
        // The newline and indentation lead the second declaration.
        let leading = map.leading_at(15);
        assert!(leading.iter().all(|t| !t.is_comment()));
    }

    #[test]
    fn comment_on_own_line_is_not_trailing() {
        let source = "int x;\n// separate\nint y;";
        let map = map_for(source);
        assert!(map.trailing_at(6).is_empty());
        let leading = map.leading_at(source.find("int y").unwrap() as u32);
        assert!(leading.iter().any(|t| t.text == "// separate"));
    }

    #[test]
    fn doc_comment_kind_is_preserved() {
        let source = "/** api */\nclass T {}";
        let map = map_for(source);
        let leading = map.leading_at(11);
        assert_eq!(leading[0].kind, NodeKind::DocCommentTrivia);
    }
}
