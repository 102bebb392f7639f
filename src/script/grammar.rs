//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::board::Point;
use crate::script::ast::*;
use crate::script::lexer::Token;

/// Parse a gesture script into commands
pub fn parse(input: &str) -> Result<Script, Vec<crate::ScriptError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::script::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    script_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn script_parser<'a, I>() -> impl Parser<'a, I, Script, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let number = select! {
        Token::Number(n) => n,
    }
    .labelled("number");

    // x, y
    let point = number
        .clone()
        .then_ignore(just(Token::Comma))
        .then(number.clone())
        .map(|(x, y)| Point::new(x, y));

    let part = select! {
        Token::String(s) => s,
    }
    .labelled("part name")
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    let command = choice((
        just(Token::Press).ignore_then(point.clone()).map(Command::Press),
        just(Token::Pick)
            .ignore_then(part)
            .then(just(Token::Grab).ignore_then(point.clone()).or_not())
            .map(|(part, grab)| Command::Pick { part, grab }),
        just(Token::Move).ignore_then(point).map(Command::Move),
        just(Token::Rotate).to(Command::Rotate),
        just(Token::Mirror).to(Command::Mirror),
        just(Token::Release).to(Command::Release),
        just(Token::Clear).to(Command::Clear),
    ))
    .map_with(|command, e| Spanned::new(command, span_range(&e.span())));

    command
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|commands| Script { commands })
}
