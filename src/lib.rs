pub mod ast;
pub mod cli;
pub mod defaults;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod query;
pub mod value;

pub use ast::{Argument, Arguments, Expression, Segment, Segments};
pub use defaults::Defaults;
pub use error::{ErrorKind, QueryError, Result};
pub use evaluator::{EvalContext, Evaluator};
pub use lexer::Lexer;
pub use parser::{DEFAULT_MAX_DEPTH, Parser, parse};
pub use query::Query;
pub use value::{Entity, Map, Value};
