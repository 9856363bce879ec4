use std::sync::Arc;

use super::{Expression, Segments};
use crate::{
    error::Result,
    evaluator::{EvalContext, Evaluator},
    parser::Parser,
    value::Value,
};

/// One classified call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),

    /// Quoted string with the delimiters removed
    String(String),

    /// Bracketed list, e.g. `[1, 'a', foo(2)]`
    Array(Arguments),

    /// Arrow function `(a, b) => body`
    Closure {
        params: Vec<String>,
        body: Arc<Expression>,
    },

    /// Nested chain such as `bar(2)` or `page.title`, resolved against the root data
    Chain(Segments),

    /// Nested ternary or coalescing expression
    Expression(Box<Expression>),

    /// Bare word, looked up in the root data and kept as a string when missing
    Reference(String),
}

impl Argument {
    /// Classifies a single argument token.
    pub fn parse(token: &str) -> Result<Argument> {
        Parser::new().parse_argument(token)
    }

    /// Resolves the argument with `context` as the root data.
    pub fn resolve(&self, context: &Value) -> Result<Value> {
        Evaluator::new().eval_argument(self, &EvalContext::new(context))
    }
}

/// Ordered call-argument list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(pub Vec<Argument>);

impl Arguments {
    /// Splits a comma-separated list on its top-level commas.
    ///
    /// ```
    /// use dotquery::{Argument, Arguments};
    ///
    /// let args = Arguments::split("1, 2, [3, 4]").unwrap();
    /// assert_eq!(args.len(), 3);
    /// assert!(matches!(args.get(2), Some(Argument::Array(items)) if items.len() == 2));
    /// ```
    pub fn split(text: &str) -> Result<Arguments> {
        Parser::new().parse_arguments(text)
    }

    pub fn resolve(&self, context: &Value) -> Result<Vec<Value>> {
        Evaluator::new().eval_arguments(self, &EvalContext::new(context))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
