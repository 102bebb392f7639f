//! Error types for gesture scripts

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::script::lexer::Token;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
    #[error("unknown part \"{name}\"")]
    UnknownPart {
        name: String,
        span: Span,
        suggestions: Vec<String>,
    },
}

impl ScriptError {
    pub fn span(&self) -> &Span {
        match self {
            ScriptError::Syntax { span, .. } | ScriptError::UnknownPart { span, .. } => span,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = self.span().clone();
        let report = Report::build(ReportKind::Error, filename, span.start);
        let report = match self {
            ScriptError::Syntax {
                message, expected, ..
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                report.with_message(message).with_label(
                    Label::new((filename, span))
                        .with_message(format!("{}{}", message, expected_str))
                        .with_color(Color::Red),
                )
            }
            ScriptError::UnknownPart {
                name, suggestions, ..
            } => {
                let report = report.with_message(self.to_string()).with_label(
                    Label::new((filename, span))
                        .with_message(format!("no part \"{}\" in the palette", name))
                        .with_color(Color::Red),
                );
                if suggestions.is_empty() {
                    report
                } else {
                    report.with_help(format!("did you mean: {}?", suggestions.join(", ")))
                }
            }
        };

        let mut buf = Vec::new();
        if let Err(err) = report
            .finish()
            .write((filename, Source::from(source)), &mut buf)
        {
            return format!("{}: {} ({})", filename, self, err);
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for ScriptError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ScriptError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::Comma => "','".to_string(),
        Token::Press => "keyword 'press'".to_string(),
        Token::Pick => "keyword 'pick'".to_string(),
        Token::Grab => "keyword 'grab'".to_string(),
        Token::Move => "keyword 'move'".to_string(),
        Token::Release => "keyword 'release'".to_string(),
        Token::Rotate => "keyword 'rotate'".to_string(),
        Token::Mirror => "keyword 'mirror'".to_string(),
        Token::Clear => "keyword 'clear'".to_string(),
        Token::Error => "unrecognized input".to_string(),
        _ => format!("{:?}", tok),
    }
}
