use std::sync::Arc;

use log::{debug, trace};

use crate::{
    defaults::Defaults,
    error::Result,
    evaluator::Evaluator,
    parser::{DEFAULT_MAX_DEPTH, Parser},
    value::{Map, Value},
};

/// A query expression bound to its configuration.
///
/// # Examples
///
/// ```
/// use dotquery::{Map, Query, Value};
///
/// let mut user = Map::new();
/// user.insert("name".to_string(), Value::from("Ada"));
/// let mut data = Map::new();
/// data.insert("user".to_string(), Value::Map(user));
/// let data = Value::Map(data);
///
/// let name = Query::new("user.name").resolve(data.clone()).unwrap();
/// assert_eq!(name, Value::from("Ada"));
///
/// let label = Query::new("user.name ? 'named' : 'anonymous'").resolve(data.clone()).unwrap();
/// assert_eq!(label, Value::from("named"));
///
/// let unchanged = Query::new("   ").resolve(data.clone()).unwrap();
/// assert_eq!(unchanged, data);
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    expression: String,
    defaults: Defaults,
    max_depth: usize,
}

impl Default for Query {
    fn default() -> Self {
        Query::new("")
    }
}

impl Query {
    pub fn new(expression: impl AsRef<str>) -> Self {
        Query {
            expression: expression.as_ref().trim().to_string(),
            defaults: Defaults::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// The trimmed expression text.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }

    /// Resolves the query against `data`.
    ///
    /// An empty query returns `data` unchanged. Mapping data (and `Null`,
    /// which stands for an empty mapping) is layered over the defaults; when
    /// the whole expression is a key of the merged mapping, that entry is
    /// returned without parsing.
    pub fn resolve(&self, data: Value) -> Result<Value> {
        if self.expression.is_empty() {
            return Ok(data);
        }

        let data = match data {
            Value::Map(map) => Value::Map(self.defaults.merge_under(map)),
            Value::Null => Value::Map(self.defaults.merge_under(Map::new())),
            other => other,
        };

        if let Value::Map(map) = &data
            && let Some(entry) = map.get(&self.expression)
        {
            trace!("direct entry \"{}\"", self.expression);
            return entry.clone().force();
        }

        debug!("resolving \"{}\"", self.expression);
        let expression = Parser::with_max_depth(self.max_depth).parse_expression(&self.expression)?;
        Evaluator::with_max_depth(self.max_depth).eval_shared(&expression, &Arc::new(data))
    }

    /// Checks the syntax of the whole expression without resolving anything.
    pub fn validate(&self) -> Result<()> {
        if self.expression.is_empty() {
            return Ok(());
        }
        Parser::with_max_depth(self.max_depth).validate(&self.expression)
    }
}
