use std::sync::Arc;

use log::{debug, trace};

use crate::{
    ast::{Argument, Arguments, Expression, Segment, Segments},
    error::{QueryError, Result},
    parser::{DEFAULT_MAX_DEPTH, Parser},
    value::{Entity, Map, Value},
};

/// Evaluation context holding the root data and the nesting depth
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    /// The data the first segment of every chain resolves against. Nested
    /// chains in arguments start from here too.
    pub root: &'a Value,
    /// Shared handle on `root`, when the caller owns one
    shared: Option<&'a Arc<Value>>,
    /// Arrow-function parameters, consulted before `root`
    scope: Option<&'a Map>,
    depth: usize,
}

impl<'a> EvalContext<'a> {
    pub fn new(root: &'a Value) -> Self {
        EvalContext {
            root,
            shared: None,
            scope: None,
            depth: 0,
        }
    }

    /// Context over a shared root. Arrow functions created while evaluating
    /// keep a handle on it instead of copying the data.
    pub fn shared(root: &'a Arc<Value>) -> Self {
        EvalContext {
            shared: Some(root),
            ..EvalContext::new(root)
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Entry bound to `name` by an enclosing arrow function.
    fn parameter(&self, name: &str) -> Option<&'a Value> {
        self.scope.and_then(|scope| scope.get(name))
    }
}

/// Resolves parsed expressions against data.
///
/// The evaluator holds no state between calls; the same instance can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator {
    max_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Evaluator { max_depth }
    }

    fn descend<'a>(&self, ctx: &EvalContext<'a>) -> Result<EvalContext<'a>> {
        if ctx.depth >= self.max_depth {
            return Err(QueryError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(EvalContext {
            depth: ctx.depth + 1,
            ..*ctx
        })
    }

    /// Evaluates a parsed expression with `data` as the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use dotquery::{Evaluator, Parser, Value};
    ///
    /// let expr = Parser::new().parse_expression("false ? 'a' : 'b'").unwrap();
    /// let result = Evaluator::new().eval_expression(&expr, &Value::Null).unwrap();
    /// assert_eq!(result, Value::from("b"));
    /// ```
    pub fn eval_expression(&self, expression: &Expression, data: &Value) -> Result<Value> {
        self.eval_expr(expression, &EvalContext::new(data))
    }

    /// Like [`eval_expression`](Self::eval_expression), over shared data.
    pub fn eval_shared(&self, expression: &Expression, data: &Arc<Value>) -> Result<Value> {
        self.eval_expr(expression, &EvalContext::shared(data))
    }

    pub fn eval_expr(&self, expression: &Expression, ctx: &EvalContext) -> Result<Value> {
        match expression {
            Expression::Operand(operand) => self.eval_argument(operand, ctx),
            Expression::Coalesce(operands) => {
                for operand in operands {
                    let value = self.eval_argument(operand, ctx)?;
                    if !value.is_null() {
                        return Ok(value);
                    }
                }
                Ok(Value::Null)
            }
            Expression::Ternary {
                condition,
                truthy,
                falsy,
            } => {
                let condition = self.eval_expr(condition, ctx)?;
                let selected = condition.is_truthy();
                debug!("ternary condition is {}", if selected { "truthy" } else { "falsy" });

                match (selected, truthy) {
                    (true, None) => Ok(condition),
                    (true, Some(branch)) => self.eval_branch(branch, ctx),
                    (false, _) => self.eval_branch(falsy, ctx),
                }
            }
        }
    }

    /// Parses and evaluates a ternary branch once it has been selected.
    fn eval_branch(&self, text: &str, ctx: &EvalContext) -> Result<Value> {
        let ctx = self.descend(ctx)?;
        let expression = Parser::at_depth(ctx.depth, self.max_depth).parse_expression(text)?;
        self.eval_expr(&expression, &ctx)
    }

    /// Folds a chain left to right. The first segment resolves against the
    /// root, every later one against the previous result.
    pub fn eval_segments(&self, segments: &Segments, ctx: &EvalContext) -> Result<Value> {
        let mut hops = segments.iter();
        let Some(first) = hops.next() else {
            return Ok(ctx.root.clone());
        };

        let mut current = match ctx.parameter(&first.name) {
            Some(entry) => {
                let args = self.eval_call_arguments(first, ctx)?;
                resolve_entry(&first.name, Some(entry), args.as_deref(), "array")?.force()?
            }
            None => self.eval_segment(first, ctx.root, ctx)?,
        };
        for segment in hops {
            if segment.nullsafe && current.is_null() {
                trace!("null-safe hop \"{}\" ends the chain", segment.name);
                return Ok(Value::Null);
            }
            current = self.eval_segment(segment, &current, ctx)?;
        }
        Ok(current)
    }

    /// Resolves one hop against `current`.
    pub fn eval_segment(
        &self,
        segment: &Segment,
        current: &Value,
        ctx: &EvalContext,
    ) -> Result<Value> {
        let name = segment.name.as_str();

        match current {
            Value::Null
            | Value::Boolean(_)
            | Value::Integer(_)
            | Value::Float(_)
            | Value::String(_) => {
                return Err(QueryError::InvalidTarget {
                    name: name.to_string(),
                    target: current.type_name(),
                });
            }
            Value::Thunk(f) => {
                let ctx = self.descend(ctx)?;
                return self.eval_segment(segment, &f()?, &ctx);
            }
            _ => {}
        }

        let args = self.eval_call_arguments(segment, ctx)?;
        trace!(
            "segment \"{}\"{} on {}",
            name,
            if args.is_some() { "(..)" } else { "" },
            current.type_name()
        );

        let result = match current {
            Value::Map(map) => resolve_entry(name, map.get(name), args.as_deref(), "array"),
            Value::Array(items) => {
                let entry = name.parse::<usize>().ok().and_then(|i| items.get(i));
                resolve_entry(name, entry, args.as_deref(), "array")
            }
            Value::Entity(entity) => resolve_member(entity.as_ref(), name, args.as_deref()),
            _ => Err(QueryError::UnknownMember {
                name: name.to_string(),
                target: current.type_name(),
            }),
        }?;

        result.force()
    }

    fn eval_call_arguments(
        &self,
        segment: &Segment,
        ctx: &EvalContext,
    ) -> Result<Option<Vec<Value>>> {
        segment
            .arguments
            .as_ref()
            .map(|arguments| self.eval_arguments(arguments, ctx))
            .transpose()
    }

    pub fn eval_arguments(&self, arguments: &Arguments, ctx: &EvalContext) -> Result<Vec<Value>> {
        arguments
            .iter()
            .map(|argument| self.eval_argument(argument, ctx))
            .collect()
    }

    pub fn eval_argument(&self, argument: &Argument, ctx: &EvalContext) -> Result<Value> {
        match argument {
            Argument::Null => Ok(Value::Null),
            Argument::Boolean(b) => Ok(Value::Boolean(*b)),
            Argument::Integer(n) => Ok(Value::Integer(*n)),
            Argument::Float(n) => Ok(Value::Float(*n)),
            Argument::String(s) => Ok(Value::String(s.clone())),
            Argument::Array(items) => {
                let ctx = self.descend(ctx)?;
                Ok(Value::Array(self.eval_arguments(items, &ctx)?))
            }
            Argument::Closure { params, body } => Ok(self.closure(params, body, ctx)),
            Argument::Chain(segments) => {
                let ctx = self.descend(ctx)?;
                self.eval_segments(segments, &ctx)
            }
            Argument::Expression(expression) => {
                let ctx = self.descend(ctx)?;
                self.eval_expr(expression, &ctx)
            }
            Argument::Reference(name) => self.eval_reference(name, ctx),
        }
    }

    /// Bare words read a parameter or root entry and fall back to the word
    /// itself.
    fn eval_reference(&self, name: &str, ctx: &EvalContext) -> Result<Value> {
        if let Some(entry) = ctx.parameter(name) {
            return entry.clone().force();
        }
        let found = match ctx.root {
            Value::Map(map) => map.get(name).cloned(),
            Value::Entity(entity) => entity.property(name).or_else(|| entity.get(name)),
            _ => None,
        };
        match found {
            Some(value) => value.force(),
            None => {
                trace!("bare word \"{}\" kept as a string", name);
                Ok(Value::String(name.to_string()))
            }
        }
    }

    /// Arrow functions bind their parameters over the root: names the
    /// function binds (its own or an enclosing function's) shadow the root,
    /// everything else resolves against it.
    fn closure(&self, params: &[String], body: &Arc<Expression>, ctx: &EvalContext) -> Value {
        let evaluator = *self;
        let params = params.to_vec();
        let body = Arc::clone(body);
        let depth = ctx.depth;
        let root = match ctx.shared {
            Some(shared) => Arc::clone(shared),
            None => Arc::new(ctx.root.clone()),
        };
        let enclosing = ctx.scope.cloned().unwrap_or_default();

        Value::function(move |args| {
            let mut scope = enclosing.clone();
            for (i, param) in params.iter().enumerate() {
                scope.insert(param.clone(), args.get(i).cloned().unwrap_or_default());
            }
            let ctx = EvalContext {
                root: &root,
                shared: Some(&root),
                scope: Some(&scope),
                depth,
            };
            evaluator.eval_expr(&body, &evaluator.descend(&ctx)?)
        })
    }
}

/// Key lookup on a mapping or list.
fn resolve_entry(
    name: &str,
    entry: Option<&Value>,
    args: Option<&[Value]>,
    target: &'static str,
) -> Result<Value> {
    let name = name.to_string();
    match (entry, args) {
        (None, None) => Err(QueryError::UnknownProperty { name, target }),
        (None, Some(_)) => Err(QueryError::UnknownMethod { name, target }),
        (Some(value), None) => Ok(value.clone()),
        (Some(Value::Thunk(f)), Some(_)) => f(),
        (Some(Value::Function(f)), Some(args)) => f(args),
        (Some(_), Some(_)) => Err(QueryError::NotCallable { name, target }),
    }
}

/// Capability dispatch on an entity: method, dynamic call, then properties.
fn resolve_member(entity: &dyn Entity, name: &str, args: Option<&[Value]>) -> Result<Value> {
    let call_args = args.unwrap_or(&[]);
    if let Some(result) = entity.method(name, call_args) {
        return result;
    }
    if let Some(result) = entity.call(name, call_args) {
        return result;
    }
    if args.is_none()
        && let Some(value) = entity.property(name).or_else(|| entity.get(name))
    {
        return Ok(value);
    }
    Err(QueryError::UnknownMember {
        name: name.to_string(),
        target: "object",
    })
}
