use super::Argument;
use crate::{error::Result, evaluator::Evaluator, parser::Parser, value::Value};

/// Top-level form of a query.
///
/// Ternary branches stay unparsed text until the condition has picked one,
/// so the untaken branch is never parsed or evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal or a chain
    Operand(Argument),

    /// `a ?? b ?? c`
    Coalesce(Vec<Argument>),

    /// `condition ? truthy : falsy`, or `condition ?: falsy` when `truthy` is `None`
    Ternary {
        condition: Box<Expression>,
        truthy: Option<String>,
        falsy: String,
    },
}

impl Expression {
    pub fn parse(text: &str) -> Result<Expression> {
        Parser::new().parse_expression(text)
    }

    pub fn resolve(&self, context: &Value) -> Result<Value> {
        Evaluator::new().eval_expression(self, context)
    }
}
