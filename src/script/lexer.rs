//! Lexer for gesture scripts using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Pointer keywords
    #[token("press")]
    Press,
    #[token("pick")]
    Pick,
    #[token("grab")]
    Grab,
    #[token("move")]
    Move,
    #[token("release")]
    Release,

    // Shape commands
    #[token("rotate")]
    Rotate,
    #[token("mirror")]
    Mirror,

    // Board commands
    #[token("clear")]
    Clear,

    #[token(",")]
    Comma,

    // Literals - identifiers must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    String(String),

    #[regex(r"-?[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // Comments (skip)
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/", logos::skip)]
    BlockComment,

    /// Input the lexer could not match; left for the parser to report
    Error,
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Error), span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            tokens("press pick grab move rotate mirror release clear"),
            vec![
                Token::Press,
                Token::Pick,
                Token::Grab,
                Token::Move,
                Token::Rotate,
                Token::Mirror,
                Token::Release,
                Token::Clear
            ]
        );
    }

    #[test]
    fn test_signed_and_fractional_numbers() {
        assert_eq!(
            tokens("-12.5, 40"),
            vec![Token::Number(-12.5), Token::Comma, Token::Number(40.0)]
        );
    }

    #[test]
    fn test_strings_and_identifiers() {
        assert_eq!(
            tokens(r#"pick "l_block" rotatee"#),
            vec![
                Token::Pick,
                Token::String("l_block".to_string()),
                Token::Ident("rotatee".to_string())
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            tokens("rotate // turn it\n/* and flip\n it */ mirror"),
            vec![Token::Rotate, Token::Mirror]
        );
    }

    #[test]
    fn test_unknown_input_becomes_error_token() {
        let lexed: Vec<_> = lex("move @").collect();
        assert_eq!(lexed, vec![(Token::Move, 0..4), (Token::Error, 5..6)]);
    }
}
