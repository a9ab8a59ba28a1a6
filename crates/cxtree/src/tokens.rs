//! Lexical access to a unit's token buffer.
//!
//! Token queries work on source ranges only, so they see macro names,
//! preprocessor lines and comments exactly as written, whatever the tree
//! looks like.

use std::fmt;

use cxtree_tokenizer::{Token as RawToken, TokenKind as RawKind};
use text_size::TextRange;

use crate::Result;
use crate::liveness::{Liveness, LoadedUnit};
use crate::location::{SourceLocation, SourceRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Punctuation,
    Keyword,
    Identifier,
    Literal,
    Comment,
}

impl From<RawKind> for TokenKind {
    fn from(kind: RawKind) -> Self {
        match kind {
            RawKind::IDENT => Self::Identifier,
            RawKind::KEYWORD => Self::Keyword,
            RawKind::INT_NUMBER
            | RawKind::FLOAT_NUMBER
            | RawKind::CHAR_LITERAL
            | RawKind::STRING_LITERAL => Self::Literal,
            RawKind::LINE_COMMENT | RawKind::BLOCK_COMMENT => Self::Comment,
            RawKind::PUNCT
            | RawKind::UNKNOWN
            | RawKind::WHITESPACE
            | RawKind::NEWLINE
            | RawKind::EOF => Self::Punctuation,
        }
    }
}

/// One token of a loaded unit.
#[derive(Clone)]
pub struct Token {
    liveness: Liveness,
    index: u32,
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.liveness.key() == other.liveness.key()
    }
}

impl Eq for Token {}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("index", &self.index)
            .field("unit", &self.liveness.key())
            .finish()
    }
}

impl Token {
    fn with_raw<R>(&self, f: impl FnOnce(&LoadedUnit, RawToken) -> R) -> Result<R> {
        self.liveness.with_unit(|unit| f(unit, unit.storage.tokens()[self.index as usize]))
    }

    pub fn kind(&self) -> Result<TokenKind> {
        self.with_raw(|_, raw| raw.kind.into())
    }

    pub fn spelling(&self) -> Result<String> {
        self.with_raw(|unit, raw| unit.storage.text()[raw.range].to_owned())
    }

    pub fn range(&self) -> Result<TextRange> {
        self.with_raw(|_, raw| raw.range)
    }

    pub fn location(&self) -> Result<SourceLocation> {
        self.with_raw(|unit, raw| SourceLocation::new(&unit.lines, raw.range.start()))
    }

    pub fn extent(&self) -> Result<SourceRange> {
        self.with_raw(|unit, raw| SourceRange::new(&unit.lines, raw.range))
    }
}

/// Indices of the tokens intersecting `range`; an empty range selects the
/// token containing its offset.
fn token_indices(tokens: &[RawToken], range: TextRange) -> std::ops::Range<usize> {
    let first = tokens.partition_point(|token| token.range.end() <= range.start());
    if range.is_empty() {
        let hit = tokens.get(first).is_some_and(|token| token.range.contains(range.start()));
        return first..first + usize::from(hit);
    }
    let last = tokens.partition_point(|token| token.range.start() < range.end());
    first..last.max(first)
}

pub(crate) fn tokens_in(liveness: &Liveness, range: TextRange) -> Result<Vec<Token>> {
    let indices = liveness.with_unit(|unit| token_indices(unit.storage.tokens(), range))?;
    Ok(indices
        .map(|index| Token { liveness: liveness.clone(), index: index as u32 })
        .collect())
}

impl crate::Node {
    /// Tokens spanned by the node's extent.
    pub fn tokens(&self) -> Result<Vec<Token>> {
        tokens_in(self.liveness(), self.range()?)
    }
}

#[cfg(test)]
mod tests {
    use cxtree_tokenizer::tokenize;
    use text_size::{TextRange, TextSize};

    use super::token_indices;

    fn spell(text: &str, start: u32, end: u32) -> Vec<&str> {
        let tokens = tokenize(text);
        let range = TextRange::new(TextSize::new(start), TextSize::new(end));
        token_indices(&tokens, range).map(|i| &text[tokens[i].range]).collect()
    }

    #[test]
    fn partial_overlap_includes_the_token() {
        assert_eq!(spell("int value = 1;", 5, 9), ["value"]);
        assert_eq!(spell("int value = 1;", 2, 11), ["int", "value", "="]);
    }

    #[test]
    fn empty_range_selects_containing_token() {
        assert_eq!(spell("int value = 1;", 6, 6), ["value"]);
        assert!(spell("int value = 1;", 3, 3).is_empty());
    }

    #[test]
    fn comments_are_returned_whitespace_is_not() {
        assert_eq!(spell("a /* b */ c", 0, 11), ["a", "/* b */", "c"]);
        assert!(spell("a   c", 1, 4).is_empty());
    }
}
