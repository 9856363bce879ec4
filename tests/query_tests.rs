use dotquery::{Defaults, Entity, ErrorKind, Map, Query, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn map(pairs: Vec<(&str, Value)>) -> Value {
    pairs.into_iter().collect()
}

fn user_data() -> Value {
    map(vec![
        (
            "user",
            map(vec![
                ("name", Value::from("Ada")),
                ("admin", Value::Boolean(false)),
            ]),
        ),
        ("count", Value::Integer(3)),
    ])
}

#[derive(Debug)]
struct Page;

impl Entity for Page {
    fn property(&self, name: &str) -> Option<Value> {
        (name == "title").then(|| Value::from("home"))
    }
}

// ============================================================================
// Entry Points
// ============================================================================

#[test]
fn test_empty_query_returns_data() {
    let data = user_data();
    assert_eq!(Query::new("").resolve(data.clone()).unwrap(), data);
    assert_eq!(Query::new(" \t\n").resolve(data.clone()).unwrap(), data);
    assert!(Query::default().is_empty());
}

#[test]
fn test_empty_query_leaves_non_mapping_data_alone() {
    assert_eq!(Query::new("").resolve(Value::Integer(1)).unwrap(), Value::Integer(1));
    assert_eq!(Query::new("").resolve(Value::Null).unwrap(), Value::Null);
}

#[test]
fn test_expression_is_trimmed() {
    let query = Query::new("  user.name  ");
    assert_eq!(query.expression(), "user.name");
    assert_eq!(query.resolve(user_data()).unwrap(), Value::from("Ada"));
}

#[test]
fn test_literal_queries() {
    assert_eq!(Query::new("'hello'").resolve(Value::Null).unwrap(), Value::from("hello"));
    assert_eq!(Query::new("42").resolve(Value::Null).unwrap(), Value::Integer(42));
    assert_eq!(Query::new("null ?? 'fallback'").resolve(Value::Null).unwrap(), Value::from("fallback"));
}

#[test]
fn test_literal_conditions() {
    assert_eq!(Query::new("true ? 'a' : 'b'").resolve(Value::Null).unwrap(), Value::from("a"));
    assert_eq!(Query::new("false ? 'a' : 'b'").resolve(Value::Null).unwrap(), Value::from("b"));
}

#[test]
fn test_conditions_on_data() {
    let data = user_data();
    assert_eq!(
        Query::new("user.admin ? 'admin' : user.name").resolve(data.clone()).unwrap(),
        Value::from("Ada")
    );
    assert_eq!(
        Query::new("count ? count : 0").resolve(data.clone()).unwrap(),
        Value::Integer(3)
    );
    assert_eq!(
        Query::new("user.admin ? 'a' : count ? 'b' : 'c'").resolve(data).unwrap(),
        Value::from("b")
    );
}

#[test]
fn test_repeated_resolution_is_stable() {
    let query = Query::new("user.name");
    let data = user_data();
    let first = query.resolve(data.clone()).unwrap();
    let second = query.resolve(data).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Whole-Key Fast Path
// ============================================================================

#[test]
fn test_whole_expression_key_wins() {
    let data = map(vec![
        ("user.name", Value::from("flat")),
        ("user", map(vec![("name", Value::from("nested"))])),
    ]);
    assert_eq!(Query::new("user.name").resolve(data).unwrap(), Value::from("flat"));
}

#[test]
fn test_whole_expression_key_with_odd_characters() {
    let data = map(vec![("a ? b : c", Value::Integer(1))]);
    assert_eq!(Query::new("a ? b : c").resolve(data).unwrap(), Value::Integer(1));
}

#[test]
fn test_whole_expression_key_forces_thunk() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let data = map(vec![(
        "lazy",
        Value::thunk(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(Value::from("computed"))
        }),
    )]);

    let query = Query::new("lazy");
    assert_eq!(query.resolve(data.clone()).unwrap(), Value::from("computed"));
    assert_eq!(query.resolve(data).unwrap(), Value::from("computed"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_defaults_fill_missing_keys() {
    let defaults = Defaults::new().with("site", Value::from("example.com"));
    let query = Query::new("site").with_defaults(defaults);
    assert_eq!(query.resolve(user_data()).unwrap(), Value::from("example.com"));
    assert_eq!(query.resolve(Value::Null).unwrap(), Value::from("example.com"));
}

#[test]
fn test_data_overrides_defaults() {
    let defaults = Defaults::new().with("count", Value::Integer(0));
    let query = Query::new("count").with_defaults(defaults);
    assert_eq!(query.resolve(user_data()).unwrap(), Value::Integer(3));
}

#[test]
fn test_defaults_reachable_from_chains() {
    let mut helpers = Map::new();
    helpers.insert(
        "upper".to_string(),
        Value::function(|args| {
            let text = args.first().map(Value::as_string).unwrap_or_default();
            Ok(Value::from(text.to_uppercase()))
        }),
    );
    let defaults = Defaults::from_map(helpers);
    let query = Query::new("upper(user.name)").with_defaults(defaults);
    assert_eq!(query.resolve(user_data()).unwrap(), Value::from("ADA"));
}

#[test]
fn test_defaults_shared_between_queries() {
    let defaults = Defaults::new().with("a", Value::Integer(1)).with("b", Value::Integer(2));
    assert_eq!(defaults.len(), 2);
    assert_eq!(defaults.get("a"), Some(&Value::Integer(1)));

    let first = Query::new("a").with_defaults(defaults.clone());
    let second = Query::new("b").with_defaults(defaults);
    assert_eq!(first.resolve(Value::Null).unwrap(), Value::Integer(1));
    assert_eq!(second.resolve(Value::Null).unwrap(), Value::Integer(2));
}

#[test]
fn test_extending_defaults_leaves_clones_untouched() {
    let base = Defaults::new().with("a", Value::Integer(1));
    let extended = base.clone().with("b", Value::Integer(2));
    assert_eq!(base.len(), 1);
    assert_eq!(extended.len(), 2);
    assert!(Defaults::new().is_empty());
}

#[test]
fn test_defaults_not_applied_to_entities() {
    let defaults = Defaults::new().with("site", Value::from("example.com"));
    let query = Query::new("site").with_defaults(defaults.clone());
    let err = query.resolve(Value::entity(Page)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownMember);

    let title = Query::new("title").with_defaults(defaults);
    assert_eq!(title.resolve(Value::entity(Page)).unwrap(), Value::from("home"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validate_checks_every_branch() {
    assert!(Query::new("a ? b.c(1) : d ?? 'e'").validate().is_ok());
    assert!(Query::new("").validate().is_ok());

    let err = Query::new("a ? b : c..d").validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSegment);
    // resolution never parses the untaken branch
    let data = map(vec![("a", Value::Boolean(true)), ("b", Value::Integer(1))]);
    assert_eq!(Query::new("a ? b : c..d").resolve(data).unwrap(), Value::Integer(1));
}

#[test]
fn test_validate_respects_depth_limit() {
    let err = Query::new("f([[[[1]]]])").with_max_depth(3).validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DepthExceeded);
    assert!(Query::new("f([[[[1]]]])").validate().is_ok());
}

#[test]
fn test_malformed_query() {
    let err = Query::new("user.name(").resolve(user_data()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedArgument);
    assert!(err.to_string().starts_with("Malformed argument: "));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_resolution() {
    let defaults = Defaults::new().with("greeting", Value::from("hi"));
    let query = Query::new("greeting").with_defaults(defaults);
    let data = user_data();

    thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| query.resolve(data.clone())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), Value::from("hi"));
        }
    });
}
