use std::sync::{Arc, LazyLock};

use log::trace;
use regex::Regex;

use crate::{
    ast::{Argument, Arguments, Expression, Segment, Segments},
    error::{QueryError, Result},
    lexer::{self, Lexer, Token},
};

/// Nesting limit applied when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("valid integer pattern"));

static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?([0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("valid float pattern")
});

/// Segment names: Unicode identifiers, or ASCII digits for list indexes.
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\p{L}_][\p{L}\p{N}_]*|[0-9]+)$").expect("valid identifier pattern")
});

/// Turns query text into [`Expression`] trees.
///
/// Parsing is pure: it never touches data, so every syntax error in the part
/// being resolved surfaces before anything is evaluated.
///
/// # Examples
///
/// ```
/// use dotquery::{Argument, Parser};
///
/// let mut parser = Parser::new();
/// let args = parser.parse_arguments("1, 2, '3, 4'").unwrap();
/// assert_eq!(args.len(), 3);
/// assert_eq!(args.get(2), Some(&Argument::String("3, 4".to_string())));
/// ```
pub struct Parser {
    depth: usize,
    max_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Parser::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Parser {
            depth: 0,
            max_depth,
        }
    }

    /// Parser continuing at an existing nesting depth.
    pub(crate) fn at_depth(depth: usize, max_depth: usize) -> Self {
        Parser { depth, max_depth }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(QueryError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub fn parse_expression(&mut self, input: &str) -> Result<Expression> {
        self.nested(|p| p.expression(input.trim()))
    }

    pub fn parse_segments(&mut self, input: &str) -> Result<Segments> {
        self.nested(|p| p.segments(input.trim()))
    }

    pub fn parse_segment(&mut self, input: &str) -> Result<Segment> {
        self.nested(|p| p.segment(input.trim()))
    }

    pub fn parse_arguments(&mut self, input: &str) -> Result<Arguments> {
        self.nested(|p| p.arguments(input))
    }

    pub fn parse_argument(&mut self, input: &str) -> Result<Argument> {
        self.nested(|p| p.argument(input))
    }

    /// Parses `input` completely, including the ternary branches that
    /// resolution only parses once they are selected.
    pub fn validate(&mut self, input: &str) -> Result<()> {
        let expression = self.parse_expression(input)?;
        self.validate_expression(&expression)
    }

    fn expression(&mut self, input: &str) -> Result<Expression> {
        let tokens = Lexer::new(input).tokenize()?;
        let Some(q) = ternary_position(&tokens) else {
            return self.coalesce(input);
        };

        let condition = &input[..tokens[q].offset];
        let rest = tokens[q].offset + 1;
        let (truthy, falsy) = if tokens.get(q + 1).is_some_and(|t| t.ch == ':') {
            (None, &input[rest + 1..])
        } else {
            let colon = branch_separator(&tokens[q + 1..]).ok_or_else(|| {
                QueryError::MalformedArgument(format!("missing ':' in ternary \"{}\"", input))
            })?;
            let truthy = input[rest..colon].trim();
            ((!truthy.is_empty()).then_some(truthy), &input[colon + 1..])
        };

        let falsy = falsy.trim();
        if falsy.is_empty() {
            return Err(QueryError::MalformedArgument(format!(
                "missing falsy branch in \"{}\"",
                input
            )));
        }

        trace!(
            "ternary: condition={:?} truthy={:?} falsy={:?}",
            condition, truthy, falsy
        );
        Ok(Expression::Ternary {
            condition: Box::new(self.coalesce(condition.trim())?),
            truthy: truthy.map(str::to_string),
            falsy: falsy.to_string(),
        })
    }

    fn coalesce(&mut self, input: &str) -> Result<Expression> {
        let tokens = Lexer::new(input).tokenize()?;
        let mut operands = Vec::new();
        let mut start = 0;
        let mut i = 0;

        while i < tokens.len() {
            let t = tokens[i];
            if t.top_level && t.ch == '?' && tokens.get(i + 1).is_some_and(|n| n.ch == '?') {
                operands.push(self.operand(&input[start..t.offset])?);
                start = t.offset + 2;
                i += 2;
                continue;
            }
            i += 1;
        }

        if operands.is_empty() {
            return Ok(Expression::Operand(self.operand(input)?));
        }
        operands.push(self.operand(&input[start..])?);
        Ok(Expression::Coalesce(operands))
    }

    /// Expression operands are literal-first, chains otherwise.
    fn operand(&mut self, input: &str) -> Result<Argument> {
        let input = input.trim();
        if input.is_empty() {
            return Err(QueryError::InvalidSegment(String::new()));
        }
        match self.literal(input)? {
            Some(literal) => Ok(literal),
            None => Ok(Argument::Chain(self.segments(input)?)),
        }
    }

    fn segments(&mut self, input: &str) -> Result<Segments> {
        let pieces = lexer::split(input, '.')?;
        let mut segments = Vec::with_capacity(pieces.len());
        let mut nullsafe = false;

        for (i, piece) in pieces.iter().enumerate() {
            let mut piece = piece.trim();
            let next_nullsafe = i + 1 < pieces.len() && piece.ends_with('?');
            if next_nullsafe {
                piece = piece[..piece.len() - 1].trim_end();
            }
            if piece.is_empty() {
                return Err(QueryError::InvalidSegment(input.to_string()));
            }

            let mut segment = self.segment(piece)?;
            segment.nullsafe = nullsafe;
            segments.push(segment);
            nullsafe = next_nullsafe;
        }

        Ok(Segments(segments))
    }

    fn segment(&mut self, input: &str) -> Result<Segment> {
        let tokens = Lexer::new(input).tokenize()?;
        let open = tokens.iter().position(|t| t.top_level && t.ch == '(');

        let (name, arguments) = match open {
            None => (input, None),
            Some(i) => {
                // The group opened at `i` must close on the last character.
                let last = tokens.len() - 1;
                let close = tokens[i + 1..]
                    .iter()
                    .position(|t| t.top_level)
                    .map(|j| i + 1 + j);
                if close != Some(last) {
                    return Err(QueryError::InvalidSegment(input.to_string()));
                }
                let inner = &input[tokens[i].offset + 1..tokens[last].offset];
                let arguments = self.nested(|p| p.arguments(inner))?;
                (input[..tokens[i].offset].trim(), Some(arguments))
            }
        };

        if !IDENTIFIER.is_match(name) {
            return Err(QueryError::InvalidSegment(input.to_string()));
        }

        Ok(Segment {
            name: name.to_string(),
            arguments,
            nullsafe: false,
        })
    }

    fn arguments(&mut self, input: &str) -> Result<Arguments> {
        if input.trim().is_empty() {
            return Ok(Arguments::default());
        }
        lexer::split(input, ',')?
            .into_iter()
            .map(|piece| self.argument(piece))
            .collect::<Result<Vec<_>>>()
            .map(Arguments)
    }

    fn argument(&mut self, input: &str) -> Result<Argument> {
        let input = input.trim();
        if let Some(literal) = self.literal(input)? {
            return Ok(literal);
        }

        let tokens = Lexer::new(input).tokenize()?;
        let at_top = |ch: char| tokens.iter().any(|t| t.top_level && t.ch == ch);

        if at_top('?') {
            let expression = self.nested(|p| p.expression(input))?;
            return Ok(Argument::Expression(Box::new(expression)));
        }
        if at_top('(') || at_top('.') {
            return Ok(Argument::Chain(self.nested(|p| p.segments(input))?));
        }
        Ok(Argument::Reference(input.to_string()))
    }

    fn literal(&mut self, token: &str) -> Result<Option<Argument>> {
        if token.eq_ignore_ascii_case("true") {
            return Ok(Some(Argument::Boolean(true)));
        }
        if token.eq_ignore_ascii_case("false") {
            return Ok(Some(Argument::Boolean(false)));
        }
        if token.is_empty() || token.eq_ignore_ascii_case("null") {
            return Ok(Some(Argument::Null));
        }
        if INTEGER.is_match(token)
            && let Ok(n) = token.parse::<i64>()
        {
            return Ok(Some(Argument::Integer(n)));
        }
        if FLOAT.is_match(token)
            && let Ok(n) = token.parse::<f64>()
        {
            return Ok(Some(Argument::Float(n)));
        }
        if let Some(s) = quoted(token) {
            return Ok(Some(Argument::String(s.to_string())));
        }
        if let Some(inner) = enclosed(token, '[', ']')? {
            let items = self.nested(|p| p.arguments(inner))?;
            return Ok(Some(Argument::Array(items)));
        }
        self.closure(token)
    }

    /// `(a, b) => body`
    fn closure(&mut self, token: &str) -> Result<Option<Argument>> {
        if !token.starts_with('(') {
            return Ok(None);
        }
        let tokens = Lexer::new(token).tokenize()?;
        let Some(close) = tokens.iter().skip(1).find(|t| t.top_level) else {
            return Ok(None);
        };
        let Some(body) = token[close.offset + 1..].trim_start().strip_prefix("=>") else {
            return Ok(None);
        };

        let params = token[1..close.offset]
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                if IDENTIFIER.is_match(p) && !INTEGER.is_match(p) {
                    Ok(p.to_string())
                } else {
                    Err(QueryError::InvalidSegment(p.to_string()))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let body = self.nested(|p| p.expression(body.trim()))?;
        Ok(Some(Argument::Closure {
            params,
            body: Arc::new(body),
        }))
    }

    fn validate_expression(&mut self, expression: &Expression) -> Result<()> {
        match expression {
            Expression::Operand(argument) => self.validate_argument(argument),
            Expression::Coalesce(operands) => {
                operands.iter().try_for_each(|a| self.validate_argument(a))
            }
            Expression::Ternary {
                condition,
                truthy,
                falsy,
            } => {
                self.validate_expression(condition)?;
                if let Some(truthy) = truthy {
                    self.nested(|p| p.validate(truthy))?;
                }
                self.nested(|p| p.validate(falsy))
            }
        }
    }

    fn validate_argument(&mut self, argument: &Argument) -> Result<()> {
        match argument {
            Argument::Array(items) => items.iter().try_for_each(|a| self.validate_argument(a)),
            Argument::Closure { body, .. } => self.validate_expression(body),
            Argument::Chain(segments) => segments
                .iter()
                .filter_map(|s| s.arguments.as_ref())
                .flatten()
                .try_for_each(|a| self.validate_argument(a)),
            Argument::Expression(expression) => self.validate_expression(expression),
            _ => Ok(()),
        }
    }
}

/// Parses a full query expression with the default nesting limit.
pub fn parse(input: &str) -> Result<Expression> {
    Parser::new().parse_expression(input)
}

/// Index of the first top-level `?` that starts a ternary, skipping `??`
/// and `?.`.
fn ternary_position(tokens: &[Token]) -> Option<usize> {
    let mut i = 0;
    while i < tokens.len() {
        let t = tokens[i];
        if t.top_level && t.ch == '?' {
            match tokens.get(i + 1).map(|n| n.ch) {
                Some('?') => {
                    i += 2;
                    continue;
                }
                Some('.') => {}
                _ => return Some(i),
            }
        }
        i += 1;
    }
    None
}

/// Byte offset of the `:` closing the ternary whose `?` precedes `tokens`.
/// Nested ternaries in the truthy branch claim their own `:`.
fn branch_separator(tokens: &[Token]) -> Option<usize> {
    let mut pending = 0usize;
    let mut i = 0;
    while i < tokens.len() {
        let t = tokens[i];
        if t.top_level {
            match (t.ch, tokens.get(i + 1).map(|n| n.ch)) {
                ('?', Some('?' | ':')) => {
                    i += 2;
                    continue;
                }
                ('?', Some('.')) => {}
                ('?', _) => pending += 1,
                (':', _) if pending == 0 => return Some(t.offset),
                (':', _) => pending -= 1,
                _ => {}
            }
        }
        i += 1;
    }
    None
}

fn quoted(token: &str) -> Option<&str> {
    let quote = token.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let inner = token.strip_prefix(quote)?.strip_suffix(quote)?;
    (!inner.contains(quote)).then_some(inner)
}

/// Interior of `token` when it is a single `open`..`close` group.
fn enclosed(token: &str, open: char, close: char) -> Result<Option<&str>> {
    if !token.starts_with(open) || !token.ends_with(close) {
        return Ok(None);
    }
    let tokens = Lexer::new(token).tokenize()?;
    let first_close = tokens[1..].iter().position(|t| t.top_level);
    if first_close != Some(tokens.len() - 2) {
        return Ok(None);
    }
    Ok(Some(&token[open.len_utf8()..token.len() - close.len_utf8()]))
}
