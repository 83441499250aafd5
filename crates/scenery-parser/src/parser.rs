//! Parser for scene description tokens.
//!
//! This module transforms the token stream from the [`lexer`](super::lexer)
//! into the section tree defined in [`parser_types`](super::parser_types).
//! The public entry point is [`build_file`].
//!
//! A file is a sequence of sections. Each section is a header
//! `[tag key=value ...]` followed by zero or more `key = value` lines.
//! Values may nest (arrays, dictionaries, constructor calls) and span lines.

use winnow::{
    Parser as _,
    combinator::{alt, peek, repeat, terminated},
    error::{AddContext, ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types as types,
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    StartOffset(usize),
}

type Input<'src> = SceneTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
type SceneTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// Run `f`, turning any failure into a cut error that remembers where the
/// committed construct started.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(e)) | Err(ErrMode::Cut(e)) => {
            let e = e.add_context(input, &input.checkpoint(), Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Cut error at the current position
fn cut_error_here<'src>(input: &Input<'src>) -> ErrMode<ContextError<Context>> {
    ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        Context::StartOffset(input.eof_offset()),
    ))
}

/// Parse whitespace, newlines and comments
fn ws_comment<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more whitespace/comments
fn ws_comments0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws_comment).parse_next(input)
}

/// Returns true when the next token satisfies `pred`, without consuming it.
fn next_is<'src>(input: &mut Input<'src>, pred: impl Fn(&Token<'_>) -> bool) -> bool {
    peek(any::<_, ErrMode<ContextError<Context>>>)
        .parse_next(input)
        .is_ok_and(|token: &PositionedToken<'_>| pred(&token.token))
}

/// Parse one punctuation token, returning its span
fn expect_token<'src>(
    input: &mut Input<'src>,
    expected: &Token<'_>,
    label: &'static str,
) -> IResult<Span> {
    any.verify(|token: &PositionedToken<'_>| token.token == *expected)
        .map(|token: &PositionedToken<'_>| token.span)
        .context(Context::Label(label))
        .parse_next(input)
}

/// Parse a key or bare word with its span
fn raw_identifier<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Identifier(name) => Some(Spanned::new(name, token.span)),
        _ => None,
    })
    .context(Context::Label("identifier"))
    .parse_next(input)
}

/// Parse quoted strings and numbers
fn scalar<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::Value<'src>>> {
    any.verify_map(|token: &PositionedToken<'src>| {
        let value = match &token.token {
            Token::StringLiteral(s) => types::Value::String(s.clone()),
            Token::StringName(s) => types::Value::StringName(s.clone()),
            Token::NodePath(s) => types::Value::NodePath(s.clone()),
            Token::Number(n) => types::Value::Number(*n),
            _ => return None,
        };
        Some(Spanned::new(value, token.span))
    })
    .parse_next(input)
}

/// Parse a bare word, or a constructor call when `(` or `[` follows directly
///
/// Examples:
/// - `true`, `null`
/// - `ExtResource("1_abc")`
/// - `Vector3(0, 0, 6.28319)`
/// - `Array[NodePath]([NodePath("A")])`, `Dictionary[String, int]({})`
/// - `Object(InputEventKey,"keycode":4194309)`
fn word_or_call<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::Value<'src>>> {
    let word = raw_identifier(input)?;

    if next_is(input, |t| matches!(t, Token::LeftBracket)) {
        expect_token(input, &Token::LeftBracket, "`[`")?;
        return cut_err(input, |input| {
            let (type_args, _) = list_items(input, &Token::RightBracket, "`]`", value)?;
            expect_token(input, &Token::LeftParen, "`(`")?;
            let (args, close) = list_items(input, &Token::RightParen, "`)`", value)?;
            Ok(Spanned::new(
                types::Value::Call {
                    name: *word.inner(),
                    type_args,
                    args,
                },
                word.span().union(close),
            ))
        });
    }

    if !next_is(input, |t| matches!(t, Token::LeftParen)) {
        let word_value = match *word.inner() {
            "true" => types::Value::Bool(true),
            "false" => types::Value::Bool(false),
            "null" => types::Value::Null,
            other => types::Value::Identifier(other),
        };
        return Ok(Spanned::new(word_value, word.span()));
    }

    expect_token(input, &Token::LeftParen, "`(`")?;
    if *word.inner() == "Object" {
        return cut_err(input, |input| object_body(input, word.span()));
    }
    cut_err(input, |input| {
        let (args, close) = list_items(input, &Token::RightParen, "`)`", value)?;
        Ok(Spanned::new(
            types::Value::Call {
                name: *word.inner(),
                type_args: Vec::new(),
                args,
            },
            word.span().union(close),
        ))
    })
}

/// Parse the rest of `Object(Class, "key": value, ...)` after the `(`
fn object_body<'src>(
    input: &mut Input<'src>,
    start: Span,
) -> IResult<Spanned<types::Value<'src>>> {
    ws_comments0(input)?;
    let class = raw_identifier(input)?;
    ws_comments0(input)?;

    let (properties, close) = if next_is(input, |t| matches!(t, Token::Comma)) {
        expect_token(input, &Token::Comma, "`,`")?;
        list_items(input, &Token::RightParen, "`)`", dictionary_entry)?
    } else {
        (Vec::new(), expect_token(input, &Token::RightParen, "`)`")?)
    };

    Ok(Spanned::new(
        types::Value::Object {
            class: *class.inner(),
            properties,
        },
        start.union(close),
    ))
}

/// Parse an array: `[value, ...]`
fn array<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::Value<'src>>> {
    let open = expect_token(input, &Token::LeftBracket, "`[`")?;
    cut_err(input, |input| {
        let (items, close) = list_items(input, &Token::RightBracket, "`]`", value)?;
        Ok(Spanned::new(types::Value::Array(items), open.union(close)))
    })
}

/// Parse one dictionary entry: `key: value`
fn dictionary_entry<'src>(
    input: &mut Input<'src>,
) -> IResult<(Spanned<types::Value<'src>>, Spanned<types::Value<'src>>)> {
    let key = value(input)?;
    ws_comments0(input)?;
    expect_token(input, &Token::Colon, "`:`")?;
    ws_comments0(input)?;
    let entry_value = value(input)?;
    Ok((key, entry_value))
}

/// Parse a dictionary: `{ key: value, ... }`
fn dictionary<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::Value<'src>>> {
    let open = expect_token(input, &Token::LeftBrace, "`{`")?;
    cut_err(input, |input| {
        let (entries, close) = list_items(input, &Token::RightBrace, "`}`", dictionary_entry)?;
        Ok(Spanned::new(types::Value::Dictionary(entries), open.union(close)))
    })
}

/// Parse comma-separated items up to and including `close`.
///
/// A trailing comma is accepted. Returns the items and the span of the
/// closing token.
fn list_items<'src, O>(
    input: &mut Input<'src>,
    close: &Token<'_>,
    close_label: &'static str,
    item: fn(&mut Input<'src>) -> IResult<O>,
) -> IResult<(Vec<O>, Span)> {
    let mut items = Vec::new();
    loop {
        ws_comments0(input)?;
        if next_is(input, |t| t == close) {
            let span = expect_token(input, close, close_label)?;
            return Ok((items, span));
        }

        items.push(item(input)?);
        ws_comments0(input)?;

        if next_is(input, |t| matches!(t, Token::Comma)) {
            expect_token(input, &Token::Comma, "`,`")?;
            continue;
        }

        let span = expect_token(input, close, close_label)?;
        return Ok((items, span));
    }
}

/// Parse any value
fn value<'src>(input: &mut Input<'src>) -> IResult<Spanned<types::Value<'src>>> {
    alt((scalar, word_or_call, array, dictionary))
        .context(Context::Label("value"))
        .parse_next(input)
}

/// Parse `key = value`
fn property<'src>(input: &mut Input<'src>) -> IResult<types::Property<'src>> {
    let key = raw_identifier(input)?;
    cut_err(input, |input| {
        ws_comments0(input)?;
        expect_token(input, &Token::Equals, "`=`")?;
        ws_comments0(input)?;
        let parsed = value(input)?;
        Ok(types::Property { key, value: parsed })
    })
}

/// Parse a section: header plus body properties
fn section<'src>(input: &mut Input<'src>) -> IResult<types::Section<'src>> {
    expect_token(input, &Token::LeftBracket, "section header")?;
    cut_err(input, |input| {
        ws_comments0(input)?;
        let tag = raw_identifier(input)?;

        let mut attributes = Vec::new();
        loop {
            ws_comments0(input)?;
            if next_is(input, |t| matches!(t, Token::RightBracket)) {
                expect_token(input, &Token::RightBracket, "`]`")?;
                break;
            }
            attributes.push(property(input)?);
        }

        let properties = repeat(0.., |input: &mut Input<'src>| {
            ws_comments0(input)?;
            property(input)
        })
        .parse_next(input)?;

        Ok(types::Section {
            tag,
            attributes,
            properties,
        })
    })
}

/// Parse a whole file
fn file<'src>(input: &mut Input<'src>) -> IResult<types::File<'src>> {
    ws_comments0(input)?;
    let sections = repeat(0.., terminated(section, ws_comments0)).parse_next(input)?;

    if input.eof_offset() > 0 {
        return Err(cut_error_here(input));
    }

    Ok(types::File { sections })
}

fn first_meaningful<'a>(tokens: &'a [PositionedToken<'a>]) -> Option<&'a PositionedToken<'a>> {
    tokens.iter().find(|t| !t.token.is_trivia())
}

fn last_meaningful<'a>(tokens: &'a [PositionedToken<'a>]) -> Option<&'a PositionedToken<'a>> {
    tokens.iter().rev().find(|t| !t.token.is_trivia())
}

/// Convert a winnow error into a diagnostic with a precise span.
///
/// Errors with nothing but trivia left after them are reported as
/// incomplete input (E101); everything else is an unexpected token (E100).
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    let context_error = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let end_offset = tokens.len() - current_remaining;
    let start_offset = context_error
        .context()
        .find_map(|ctx| match ctx {
            Context::StartOffset(n) => Some(tokens.len() - *n),
            _ => None,
        })
        .unwrap_or(end_offset);

    let expected: Vec<String> = context_error
        .context()
        .filter_map(|ctx| match ctx {
            Context::Label(label) => Some(format!("expected {label}")),
            _ => None,
        })
        .collect();
    let message = if expected.is_empty() {
        "unexpected token or end of input".to_string()
    } else {
        expected.join(" → ")
    };

    let construct_start = tokens
        .get(start_offset..)
        .and_then(first_meaningful)
        .map(|t| t.span);

    match tokens.get(end_offset..).and_then(first_meaningful) {
        Some(offending) => {
            let mut diag = Diagnostic::error(format!("unexpected token: {message}"))
                .with_code(ErrorCode::E100)
                .with_label(offending.span, "unexpected token")
                .with_help("check the section header and `key = value` syntax");
            if let Some(start) = construct_start.filter(|s| s.start() < offending.span.start()) {
                diag = diag.with_secondary_label(start, "while parsing this");
            }
            diag
        }
        None => {
            let end_span = last_meaningful(tokens)
                .map(|t| t.span)
                .unwrap_or_default();
            let span = construct_start.map_or(end_span, |start| start.union(end_span));

            Diagnostic::error(format!("incomplete input: {message}"))
                .with_code(ErrorCode::E101)
                .with_label(span, "incomplete")
                .with_help("close every section header, array and call before the end of the file")
        }
    }
}

/// Build the section tree from tokens
pub fn build_file<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<types::File<'src>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match file.parse_next(&mut token_slice) {
        Ok(file) => Ok(file),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
