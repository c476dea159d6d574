use std::collections::HashMap;

use crate::{env::MapEnv, parser::parse};

use super::{evaluate, substring, EvaluationError};

type AnyRes<T> = Result<T, Box<dyn std::error::Error>>;

macro_rules! vars {
    () => { MapEnv::default() };
    ($($k:literal: $v:literal),+ $(,)?) => {{
       let mut hm = HashMap::new();
       $(hm.insert($k.to_string(), $v.to_string());)+
       MapEnv::from(hm)
    }};
}

fn eval(input: &str, env: &MapEnv) -> AnyRes<String> {
    let expr = parse(input)?;
    Ok(evaluate(&expr, env)?)
}

fn assert_eval(input: &str, env: &MapEnv, expected: &str) -> AnyRes<()> {
    assert_eq!(expected, eval(input, env)?, "input: {:?}", input);
    Ok(())
}

#[test]
fn literal_text_is_unchanged() -> AnyRes<()> {
    let env = vars!("FOO": "foo");
    for s in ["", "foo", "FOO", "a {b} c", "100% #1 : ? - }", "🦀 🏖"] {
        assert_eval(s, &env, s)?;
    }
    Ok(())
}

#[test]
fn variables() -> AnyRes<()> {
    let env = vars!(
        "TEST1": "A test",
        "TEST2": "Another",
        "TEST3": "Llamas",
        "TEST4": "Only one level of $TEST3 interpolation",
    );
    assert_eval("$TEST1", &env, "A test")?;
    assert_eval("${TEST1}", &env, "A test")?;
    assert_eval("$TEST1, $TEST2, $TEST3", &env, "A test, Another, Llamas")?;
    assert_eval("$Test1, $Test2, $TeST3", &env, ", , ")?;
    assert_eval("my$TEST1", &env, "myA test")?;
    assert_eval("$TEST4", &env, "Only one level of $TEST3 interpolation")?;
    assert_eval("${TEST4}", &env, "Only one level of $TEST3 interpolation")
}

#[test]
fn defaults_distinguish_unset_from_empty() -> AnyRes<()> {
    let env = vars!("FOO": "");
    assert_eval("${FOO-x}", &env, "")?;
    assert_eval("${FOO:-x}", &env, "x")?;
    assert_eval("${BAR-x}", &env, "x")?;
    assert_eval("${BAR:-x}", &env, "x")
}

#[test]
fn nested_defaults() -> AnyRes<()> {
    let env = vars!("TEST1": "A test", "TEST2": "Another", "TEST3": "Llamas");
    assert_eval("${TEST5:-${TEST6:-$TEST1}}", &env, "A test")?;
    assert_eval("${TEST5:-${TEST2:-$TEST1}}", &env, "Another")?;
    assert_eval(
        "${TEST5:-Some text ${TEST2:-$TEST1} with $TEST3}",
        &env,
        "Some text Another with Llamas",
    )?;
    assert_eval("${EMPTY:-${LLAMAS-test}}", &env, "test")
}

#[test]
fn default_content_with_stray_braces() -> AnyRes<()> {
    let env = vars!("EMPTY_DAY": "");
    assert_eval("${EMPTY_DAY:--:{}}", &env, "-:{}")
}

#[test]
fn required_variables() -> AnyRes<()> {
    let cases = [
        ("${X?msg}", "$X: msg"),
        ("Hello ${REQUIRED_VAR?}", "$REQUIRED_VAR: not set"),
        (
            "Hello ${REQUIRED_VAR?y u no set me? :-{}",
            "$REQUIRED_VAR: y u no set me? :-{",
        ),
        ("Hello ${REQUIRED_VAR?{}}", "$REQUIRED_VAR: {"),
        ("${A?missing ${B:-b}}", "$A: missing b"),
    ];
    for (input, message) in cases {
        let expr = parse(input)?;
        let err = evaluate(&expr, &vars!()).expect_err("Should error.");
        assert_eq!(message, err.to_string(), "input: {:?}", input);
    }
    Ok(())
}

#[test]
fn required_variable_error_fields() -> AnyRes<()> {
    let expr = parse("${X?}")?;
    assert_eq!(
        Err(EvaluationError::RequiredVariable {
            name: "X".to_string(),
            message: "not set".to_string(),
        }),
        evaluate(&expr, &vars!())
    );
    Ok(())
}

#[test]
fn required_set_but_empty_is_fine() -> AnyRes<()> {
    assert_eval("[${X?}]", &vars!("X": ""), "[]")?;
    assert_eval("${X?}", &vars!("X": "x"), "x")
}

#[test]
fn substrings() -> AnyRes<()> {
    let env = vars!("BUILDKITE_COMMIT": "1adf998e39f647b4b25842f107c6ed9d30a3a7c7");
    let cases = [
        ("${BUILDKITE_COMMIT:0}", "1adf998e39f647b4b25842f107c6ed9d30a3a7c7"),
        ("${BUILDKITE_COMMIT:7}", "e39f647b4b25842f107c6ed9d30a3a7c7"),
        ("${BUILDKITE_COMMIT: -7}", "0a3a7c7"),
        ("${BUILDKITE_COMMIT: -128}", "1adf998e39f647b4b25842f107c6ed9d30a3a7c7"),
        ("${BUILDKITE_COMMIT:128}", ""),
        ("${BUILDKITE_COMMIT:0:7}", "1adf998"),
        ("${BUILDKITE_COMMIT:7:7}", "e39f647"),
        ("${BUILDKITE_COMMIT:7:-7}", "e39f647b4b25842f107c6ed9d3"),
        ("${BUILDKITE_COMMIT:0:0}", ""),
        ("${BUILDKITE_COMMIT:7:0}", ""),
        ("${BUILDKITE_COMMIT:0:128}", "1adf998e39f647b4b25842f107c6ed9d30a3a7c7"),
        ("${BUILDKITE_COMMIT:7:128}", "e39f647b4b25842f107c6ed9d30a3a7c7"),
        ("${BUILDKITE_COMMIT:0:-128}", ""),
        ("${BUILDKITE_COMMIT:7:-128}", ""),
    ];
    for (input, expected) in cases {
        assert_eval(input, &env, expected)?;
    }
    Ok(())
}

#[test]
fn substring_of_unset_is_empty() -> AnyRes<()> {
    for input in [
        "${BUILDKITE_COMMIT:0:7}",
        "${BUILDKITE_COMMIT:7}",
        "${BUILDKITE_COMMIT:7:14}",
        "${BUILDKITE_COMMIT: -3:-1}",
    ] {
        assert_eval(input, &vars!(), "")?;
    }
    Ok(())
}

#[test]
fn substring_counts_characters() {
    assert_eq!("🏖", substring("🦀🏖x", 1, Some(1)));
    assert_eq!("x", substring("🦀🏖x", -1, None));
    assert_eq!("🦀", substring("🦀🏖x", 0, Some(-2)));
}

#[test]
fn substring_bounds() {
    let value = "abcdef";
    let n = value.len() as i64;
    for offset in -10..10 {
        for length in -10..10 {
            let result = substring(value, offset, Some(length));
            assert!(result.len() <= value.len());
            assert!(value.contains(&result));
        }
        let result = substring(value, offset, None);
        if offset <= -n {
            assert_eq!(value, result);
        }
        if offset >= n {
            assert_eq!("", result);
        }
    }
    assert_eq!("", substring(value, i64::MAX, Some(i64::MAX)));
    assert_eq!(value, substring(value, i64::MIN, None));
    assert_eq!("", substring(value, 0, Some(i64::MIN)));
}

#[test]
fn trims() -> AnyRes<()> {
    let env = vars!("VERSION": "123.55.66");
    assert_eval("${VERSION}", &env, "123.55.66")?;
    assert_eval("${VERSION%.*}", &env, "123.55")?;
    assert_eval("${VERSION%%.*}", &env, "123")?;
    assert_eval("${VERSION#*.}", &env, "55.66")?;
    assert_eval("${VERSION##*.}", &env, "66")
}

#[test]
fn trims_without_match_or_with_bad_pattern() -> AnyRes<()> {
    let env = vars!("VERSION": "123.55.66");
    assert_eval("${VERSION%%nomatch*}", &env, "123.55.66")?;
    assert_eval("${VERSION#nomatch}", &env, "123.55.66")?;
    assert_eval("${VERSION#[1}", &env, "123.55.66")?;
    assert_eval("${VERSION%%[[:nope:]]}", &env, "123.55.66")?;
    assert_eval("${UNSET##*}", &env, "")
}

#[test]
fn trims_on_paths() -> AnyRes<()> {
    let env = vars!("FILE": "/usr/local/lib/libfoo.so.1");
    assert_eval("${FILE##*/}", &env, "libfoo.so.1")?;
    assert_eval("${FILE%/*}", &env, "/usr/local/lib")?;
    assert_eval("${FILE%.[0-9]}", &env, "/usr/local/lib/libfoo.so")?;
    assert_eval("${FILE#/usr/}", &env, "local/lib/libfoo.so.1")
}

#[test]
fn escapes() -> AnyRes<()> {
    let env = vars!("ESCAPE_PARTY": "nope", "SUCH_ESCAPE": "nope");
    assert_eval("Do this $$ESCAPE_PARTY", &env, "Do this $ESCAPE_PARTY")?;
    assert_eval(r"Do this \$ESCAPE_PARTY", &env, "Do this $ESCAPE_PARTY")?;
    assert_eval("Do this $${SUCH_ESCAPE}", &env, "Do this ${SUCH_ESCAPE}")?;
    assert_eval(r"Do this \${SUCH_ESCAPE}", &env, "Do this ${SUCH_ESCAPE}")?;
    assert_eval(r"\\$ESCAPE_PARTY", &env, r"\\nope")
}

#[test]
fn command_substitution_passes_through() -> AnyRes<()> {
    for s in ["$(echo hello world)", "testing $(echo hello world)", "$("] {
        assert_eval(s, &vars!(), s)?;
    }
    Ok(())
}

#[test]
fn expression_is_reusable_across_environments() -> AnyRes<()> {
    let expr = parse("${NAME:-anonymous}")?;
    assert_eq!("anonymous", expr.evaluate(&vars!())?);
    assert_eq!("ferris", expr.evaluate(&vars!("NAME": "ferris"))?);
    let closure = |name: &str| (name == "NAME").then(|| "crab".to_string());
    assert_eq!("crab", expr.evaluate(&closure)?);
    Ok(())
}
