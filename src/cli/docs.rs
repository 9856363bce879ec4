//! Documentation content for the dotq CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Arguments,
    Conditionals,
    Errors,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "syntax" | "chains" => Some(Self::Syntax),
            "arguments" | "args" | "literals" => Some(Self::Arguments),
            "conditionals" | "ternary" | "coalesce" => Some(Self::Conditionals),
            "errors" | "error" => Some(Self::Errors),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"DOTQ DOCUMENTATION

dotq resolves short query expressions against JSON data. A query is a chain
of dotted hops, optionally wrapped in a ternary or a null-coalescing form.

DOCUMENTATION CATEGORIES

  syntax            Chains, keys, calls, list indexes and null-safe hops
  arguments         Literal and nested call arguments
  conditionals      Ternary, elvis (?:) and coalescing (??) forms
  errors            Error messages and what triggers them

QUICK REFERENCE

  user.name                 Key access
  items.0                   List index
  user.greet('hi')          Call
  user?.name                Null-safe hop
  a ? b : c                 Ternary
  a ?: b                    a when truthy, otherwise b
  a ?? b                    a unless null, otherwise b

Run 'dotq doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Arguments) => Ok(ARGUMENTS_DOC),
        Some(DocCategory::Conditionals) => Ok(CONDITIONALS_DOC),
        Some(DocCategory::Errors) => Ok(ERRORS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Chains

WHOLE KEYS
  name
    When the entire query is a key of the input object, that entry is
    returned directly, whatever characters the key contains.

    Example:
      Input:  {"user.name": "Alice"}
      Query:  user.name
      Output: "Alice"

CHAINS
  a.b.c
    Each hop reads a key from the result of the previous hop. The first hop
    reads from the input.

    Example:
      Input:  {"user": {"address": {"city": "Oslo"}}}
      Query:  user.address.city
      Output: "Oslo"

    Constraints:
      - Hop names are identifiers (letters, digits, underscores)
      - Dots inside quotes, brackets and parens do not split the chain

LIST INDEXES
  items.1
    Numeric hops index into lists, zero-based.

CALLS
  name(arg, ...)
    Calls a callable entry with the given arguments. Entries that hold
    plain data cannot be called.

NULL-SAFE HOPS
  user?.name
    If the value before ?. is null, the whole chain is null.
"#;

const ARGUMENTS_DOC: &str = r#"ARGUMENTS - Call Arguments

LITERALS
  true, false         Booleans (case-insensitive)
  null                Null; an empty argument is null too
  42, -7              Integers
  1.5, .5, 2e3        Floats
  'text', "text"      Strings, quotes removed, no escapes

ARRAYS
  [1, 'a', [2, 3]]
    Bracketed lists of arguments, nested freely.

NESTED CHAINS
  format(user.name, upper('x'))
    Arguments containing a call or a dot resolve as chains against the input.

BARE WORDS
  pick(title)
    A bare word reads that key from the input. If the key does not exist the
    word itself is passed as a string.

ARROW FUNCTIONS
  (item) => item.title
    Builds a callable. Parameters are bound by position over the input.
"#;

const CONDITIONALS_DOC: &str = r#"CONDITIONALS - Ternary and Coalescing

TERNARY
  condition ? truthy : falsy

    Example:
      Input:  {"admin": true}
      Query:  admin ? 'yes' : 'no'
      Output: "yes"

  Only the selected branch is parsed and resolved. Ternaries nest to the
  right: a ? b : c ? d : e

ELVIS
  condition ?: fallback
    Returns the condition itself when truthy.

COALESCING
  a ?? b ?? c
    Returns the first operand that is not null. Binds tighter than the
    ternary.

TRUTHINESS
  null, false, 0, 0.0, "", "0", [] and {} are falsy. Everything else is
  truthy.
"#;

const ERRORS_DOC: &str = r#"ERRORS - Messages

  Access to non-existing property "n" on array
    Key hop on an object or list without that entry.

  Access to non-existing method "n" on array
    Call on an object or list without that entry.

  Access to non-callable entry "n" on array
    Call on an entry holding plain data.

  Access to non-existing method/property "n" on object
    Hop on a host object that exposes nothing under that name.

  Access to method "n" on string
    Hop on a scalar (string, integer, float, boolean) or null.

  Malformed argument: ...
    Unbalanced quote, bracket or paren, or a ternary without ':'.

  Invalid segment "..."
    Empty hop (a..b) or a hop that is not an identifier.

  Maximum nesting depth of N exceeded
    Arguments or branches nested too deeply.
"#;
