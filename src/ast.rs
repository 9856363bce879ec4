//! # Query Expression - Parsed Structures
//!
//! A query is a short expression resolved against a data context:
//!
//! ```text
//! site.find('notes').title
//! user.isAdmin ? 'admin' : 'guest'
//! page.subtitle ?: page.title
//! config.theme ?? 'light'
//! ```
//!
//! ## Layers
//!
//! - **[expression]** - ternary, elvis (`?:`) and coalescing (`??`) forms
//! - **[segment]** - dotted chains of `name` / `name(args)` hops
//! - **[argument]** - literals, arrays, arrow functions and nested chains
//!
//! ## Arguments
//!
//! Call arguments are classified in order, first match wins:
//!
//! | Token                | Result                             |
//! |----------------------|------------------------------------|
//! | `true`, `FALSE`      | boolean (case-insensitive)         |
//! | `null`, empty        | null                               |
//! | `42`, `-7`           | integer                            |
//! | `1.5`, `2e3`         | float                              |
//! | `'a'`, `"a"`         | string, quotes removed             |
//! | `[1, 2]`             | array of arguments                 |
//! | `(x) => x.title`     | arrow function                     |
//! | `bar(2)`, `a.b`      | nested chain against the root data |
//! | `name`               | root entry, or the word itself     |
//!
//! Commas and dots only split at the top level: inside quotes, brackets and
//! parens they are plain characters.
pub mod argument;
pub mod expression;
pub mod segment;

pub use argument::{Argument, Arguments};
pub use expression::Expression;
pub use segment::{Segment, Segments};
