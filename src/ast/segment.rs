use super::Arguments;
use crate::{
    error::Result,
    evaluator::{EvalContext, Evaluator},
    parser::Parser,
    value::Value,
};

/// One hop of a chain: `name` or `name(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,

    /// `None` for property/key access, `Some` (possibly empty) for a call
    pub arguments: Option<Arguments>,

    /// Written as `?.name`: a null running value ends the chain with null
    pub nullsafe: bool,
}

impl Segment {
    pub fn property(name: impl Into<String>) -> Self {
        Segment {
            name: name.into(),
            arguments: None,
            nullsafe: false,
        }
    }

    pub fn call(name: impl Into<String>, arguments: Arguments) -> Self {
        Segment {
            name: name.into(),
            arguments: Some(arguments),
            nullsafe: false,
        }
    }

    pub fn parse(text: &str) -> Result<Segment> {
        Parser::new().parse_segment(text)
    }

    pub fn is_call(&self) -> bool {
        self.arguments.is_some()
    }

    /// Resolves this hop against `current`; arguments resolve against `context`.
    pub fn resolve(&self, current: &Value, context: &Value) -> Result<Value> {
        Evaluator::new().eval_segment(self, current, &EvalContext::new(context))
    }
}

/// Dot-separated chain of segments, folded left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segments(pub Vec<Segment>);

impl Segments {
    pub fn parse(text: &str) -> Result<Segments> {
        Parser::new().parse_segments(text)
    }

    /// Folds the chain starting from `context`.
    pub fn resolve(&self, context: &Value) -> Result<Value> {
        Evaluator::new().eval_segments(self, &EvalContext::new(context))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.0.iter()
    }
}
