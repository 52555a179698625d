//! Std library tests

use crate::frontend::lexer::tokenize;
use crate::frontend::parser::parse;
use crate::repl::engine::Context;
use crate::runtime::interpreter::{EvaluationError, Interpreter};
use crate::runtime::value::{json, Value};
use crate::std::{io, Globals, NATIVE_REGISTRY};

fn eval(source: &str) -> Result<Value, EvaluationError> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    let mut context = Context::new();
    let globals = Globals::new();
    let mut interpreter = Interpreter::new(&mut context, &globals);
    Ok(interpreter.run(&program)?)
}

/// Evaluate and render as JSON text
fn json_of(source: &str) -> String {
    let value = eval(source).unwrap();
    json::stringify(&value).unwrap().unwrap()
}

fn error_of(source: &str) -> String {
    eval(source).unwrap_err().to_string()
}

// ============================================================================
// registry
// ============================================================================

#[test]
fn test_registry_names() {
    let names: Vec<_> = NATIVE_REGISTRY.names().collect();
    for expected in ["Math", "JSON", "Object", "Array", "parseInt", "String", "console"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
}

#[test]
fn test_registry_lookup_by_path() {
    assert_eq!(NATIVE_REGISTRY.get("Math.max").unwrap().name, "max");
    assert_eq!(NATIVE_REGISTRY.get("parseFloat").unwrap().name, "parseFloat");
    assert!(NATIVE_REGISTRY.get("Math").is_none());
    assert!(NATIVE_REGISTRY.get("Math.nope").is_none());
    assert!(NATIVE_REGISTRY.get("parseInt.x").is_none());
}

#[test]
fn test_globals_are_values() {
    let globals = Globals::new();
    assert!(matches!(globals.get("Math"), Some(Value::Object(_))));
    assert!(matches!(globals.get("isNaN"), Some(Value::Function(_))));
    assert!(globals.contains("JSON"));
    assert!(!globals.contains("window"));
}

// ============================================================================
// Math
// ============================================================================

#[test]
fn test_math() {
    assert_eq!(json_of("Math.max(1, 5, 3)"), "5");
    assert_eq!(json_of("Math.min()"), "null");
    assert_eq!(json_of("Math.floor(-1.5)"), "-2");
    assert_eq!(json_of("Math.round(2.5)"), "3");
    assert_eq!(json_of("Math.round(-2.5)"), "-2");
    assert_eq!(json_of("Math.abs(-3)"), "3");
    assert_eq!(json_of("Math.pow(2, 10)"), "1024");
    assert_eq!(json_of("Math.sqrt(16)"), "4");
    assert_eq!(json_of("Math.trunc(-4.7)"), "-4");
    assert_eq!(json_of("Math.sign(-3)"), "-1");
    assert_eq!(json_of("Math.hypot(3, 4)"), "5");
}

#[test]
fn test_math_random_in_range() {
    let value = eval("Math.random()").unwrap().to_number();
    assert!((0.0..1.0).contains(&value));
}

#[test]
fn test_math_constants() {
    assert_eq!(eval("Math.PI").unwrap().to_number(), std::f64::consts::PI);
    assert_eq!(eval("Math.E").unwrap().to_number(), std::f64::consts::E);
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_stringify_and_parse() {
    assert_eq!(json_of("JSON.stringify({a: [1, 'x']})"), r#""{\"a\":[1,\"x\"]}""#);
    assert_eq!(json_of(r#"JSON.parse('{"b": [true, null]}')"#), r#"{"b":[true,null]}"#);
    assert_eq!(json_of("JSON.stringify([1], null, 2)"), r#""[\n  1\n]""#);
    assert!(matches!(eval("JSON.stringify(undefined)").unwrap(), Value::Undefined));
}

#[test]
fn test_json_errors() {
    assert!(error_of("JSON.parse('{')").starts_with("invalid JSON: "));
    assert_eq!(
        error_of("let a = []; a.push(a); JSON.stringify(a)"),
        "converting circular structure to JSON"
    );
}

// ============================================================================
// Object / Array namespaces
// ============================================================================

#[test]
fn test_object_functions() {
    assert_eq!(json_of("Object.keys({b: 1, a: 2})"), r#"["b","a"]"#);
    assert_eq!(json_of("Object.values({b: 1, a: 2})"), "[1,2]");
    assert_eq!(json_of("Object.entries({a: 1})"), r#"[["a",1]]"#);
    assert_eq!(json_of("Object.keys(['x', 'y'])"), r#"["0","1"]"#);
    assert_eq!(json_of("Object.assign({a: 1}, {b: 2}, {a: 3})"), r#"{"a":3,"b":2}"#);
    assert_eq!(json_of("Object.fromEntries([['k', 1]])"), r#"{"k":1}"#);
}

#[test]
fn test_array_functions() {
    assert_eq!(json_of("[Array.isArray([]), Array.isArray({})]"), "[true,false]");
    assert_eq!(json_of("Array.of(1, 2)"), "[1,2]");
    assert_eq!(json_of("Array.from('ab')"), r#"["a","b"]"#);
    assert_eq!(json_of("Array.from([1, 2], x => x * 2)"), "[2,4]");
}

// ============================================================================
// array methods
// ============================================================================

#[test]
fn test_array_mutators() {
    assert_eq!(json_of("let a = [1]; a.push(2, 3); a"), "[1,2,3]");
    assert_eq!(json_of("let a = [1, 2]; [a.pop(), a]"), "[2,[1]]");
    assert_eq!(json_of("let a = [1, 2]; [a.shift(), a]"), "[1,[2]]");
    assert_eq!(json_of("let a = [2]; a.unshift(0, 1); a"), "[0,1,2]");
    assert_eq!(json_of("[3, 1, 2].reverse()"), "[2,1,3]");
    assert_eq!(json_of("[1, 2, 3].fill(0, 1)"), "[1,0,0]");
}

#[test]
fn test_array_queries() {
    assert_eq!(json_of("[1, 2, 3, 4].slice(1, -1)"), "[2,3]");
    assert_eq!(json_of("[1].concat([2, 3], 4)"), "[1,2,3,4]");
    assert_eq!(json_of("[1, null, 'a'].join('-')"), r#""1--a""#);
    assert_eq!(json_of("[1, 2, 1].indexOf(1)"), "0");
    assert_eq!(json_of("[1, 2, 1].lastIndexOf(1)"), "2");
    assert_eq!(json_of("[NaN].includes(NaN)"), "true");
    assert_eq!(json_of("[NaN].indexOf(NaN)"), "-1");
    assert_eq!(json_of("[1, 2, 3].at(-1)"), "3");
    assert_eq!(json_of("[1, [2, [3]]].flat()"), "[1,2,[3]]");
    assert_eq!(json_of("[1, [2, [3]]].flat(Infinity)"), "[1,2,3]");
}

#[test]
fn test_flat_on_self_referencing_arrays_terminates() {
    assert_eq!(
        error_of("const a = [1]; a.push(a, a); a.flat(Infinity)"),
        "maximum call stack size exceeded"
    );
    // a bounded depth follows the cycle only that far
    assert_eq!(json_of("const a = [1]; a.push(a); a.flat(2).length"), "4");
    // shared but acyclic arrays still flatten fully
    assert_eq!(json_of("const s = [1]; [s, [s, s]].flat(Infinity)"), "[1,1,1]");
}

#[test]
fn test_flat_output_is_bounded() {
    let source = "let a = [1]; for (let i = 0; i < 30; i++) a = [a, a]; a.flat(Infinity).length";
    assert_eq!(error_of(source), "invalid array length");
}

#[test]
fn test_array_callbacks() {
    assert_eq!(json_of("[1, 2, 3].map((x, i) => x * i)"), "[0,2,6]");
    assert_eq!(json_of("[1, 2, 3, 4].filter(x => x % 2)"), "[1,3]");
    assert_eq!(json_of("[1, 2, 3].reduce((a, b) => a + b)"), "6");
    assert_eq!(json_of("[].reduce((a, b) => a + b, 10)"), "10");
    assert_eq!(json_of("[5, 8].find(x => x > 6)"), "8");
    assert_eq!(json_of("[5, 8].findIndex(x => x > 9)"), "-1");
    assert_eq!(json_of("[[1, 2].some(x => x > 1), [1, 2].every(x => x > 1)]"), "[true,false]");
    assert_eq!(json_of("let s = 0; [1, 2].forEach(x => { s += x }); s"), "3");
}

#[test]
fn test_array_sort() {
    assert_eq!(json_of("[10, 9, 1].sort()"), "[1,10,9]");
    assert_eq!(json_of("[10, 9, 1].sort((a, b) => a - b)"), "[1,9,10]");
    assert_eq!(json_of("[2, undefined, 1].sort()"), "[1,2,null]");
    assert_eq!(
        json_of("[{k: 1, v: 'a'}, {k: 0, v: 'b'}, {k: 1, v: 'c'}].sort((x, y) => x.k - y.k).map(x => x.v)"),
        r#"["b","a","c"]"#
    );
}

#[test]
fn test_array_method_errors() {
    assert_eq!(
        error_of("[].reduce((a, b) => a + b)"),
        "reduce of empty array with no initial value"
    );
    assert_eq!(error_of("[1].map(3)"), "3 is not a function");
    assert_eq!(error_of("[1, 2].sort((a, b) => { throw_it() })"), "throw_it is not defined");
}

// ============================================================================
// string methods
// ============================================================================

#[test]
fn test_string_methods() {
    assert_eq!(json_of("'Hello'.toUpperCase()"), r#""HELLO""#);
    assert_eq!(json_of("'  x '.trim()"), r#""x""#);
    assert_eq!(json_of("'a,b,c'.split(',')"), r#"["a","b","c"]"#);
    assert_eq!(json_of("'abc'.split('')"), r#"["a","b","c"]"#);
    assert_eq!(json_of("'a,b,c'.split(',', 2)"), r#"["a","b"]"#);
    assert_eq!(json_of("'hello'.slice(1, -1)"), r#""ell""#);
    assert_eq!(json_of("'hello'.substring(3, 1)"), r#""el""#);
    assert_eq!(json_of("'abc'.indexOf('c')"), "2");
    assert_eq!(json_of("'abc'.includes('bc')"), "true");
    assert_eq!(json_of("'ab'.repeat(3)"), r#""ababab""#);
    assert_eq!(json_of("'5'.padStart(3, '0')"), r#""005""#);
    assert_eq!(json_of("'5'.padEnd(3)"), r#""5  ""#);
    assert_eq!(json_of("'abc'.charAt(1)"), r#""b""#);
    assert_eq!(json_of("'A'.charCodeAt(0)"), "65");
    assert_eq!(json_of("'abc'.at(-1)"), r#""c""#);
    assert_eq!(json_of("'aXbX'.replace('X', '-')"), r#""a-bX""#);
    assert_eq!(json_of("'aXbX'.replaceAll('X', '-')"), r#""a-b-""#);
    assert_eq!(json_of("'ab'.replace('b', m => m.toUpperCase())"), r#""aB""#);
    assert_eq!(json_of("'héllo'.length"), "5");
}

#[test]
fn test_string_method_errors() {
    assert_eq!(error_of("'a'.repeat(-1)"), "invalid count value: -1");
    assert_eq!(error_of("'a'.nope()"), "\"a\".nope is not a function");
}

// ============================================================================
// conversions
// ============================================================================

#[test]
fn test_conversion_functions() {
    assert_eq!(json_of("String(12)"), r#""12""#);
    assert_eq!(json_of("String([1, [2, 3]])"), r#""1,2,3""#);
    assert_eq!(json_of("Number('  42 ')"), "42");
    assert_eq!(json_of("Number('0x10')"), "16");
    assert_eq!(json_of("Number('')"), "0");
    assert_eq!(json_of("Number('x')"), "null");
    assert_eq!(json_of("Boolean('')"), "false");
    assert_eq!(json_of("parseInt('42px')"), "42");
    assert_eq!(json_of("parseInt('ff', 16)"), "255");
    assert_eq!(json_of("parseInt('0x1A')"), "26");
    assert_eq!(json_of("parseInt('-7.9')"), "-7");
    assert_eq!(json_of("parseFloat('3.5e2x')"), "350");
    assert_eq!(json_of("parseFloat('.5')"), "0.5");
    assert_eq!(json_of("[isNaN('x'), isNaN('1'), isFinite(1 / 0)]"), "[true,false,false]");
}

#[test]
fn test_number_methods() {
    assert_eq!(json_of("(3.14159).toFixed(2)"), r#""3.14""#);
    assert_eq!(json_of("(255).toString(16)"), r#""ff""#);
    assert_eq!(json_of("(5).toString(2)"), r#""101""#);
    assert_eq!(json_of("(1.5).toString()"), r#""1.5""#);
    assert_eq!(json_of("true.toString()"), r#""true""#);
    assert_eq!(error_of("(1).toString(1)"), "toString() radix must be between 2 and 36");
    assert_eq!(error_of("(1).toFixed(101)"), "toFixed() digits argument must be between 0 and 100");
}

// ============================================================================
// console
// ============================================================================

#[test]
fn test_console_returns_undefined() {
    assert!(matches!(eval("console.log('hi', 1)").unwrap(), Value::Undefined));
    assert!(matches!(eval("console.error({a: 1})").unwrap(), Value::Undefined));
}

#[test]
fn test_console_formatting() {
    let args = [
        Value::from("text"),
        Value::from(1.5),
        Value::new_array(vec![Value::from(1.0), Value::Null]),
        Value::Undefined,
    ];
    assert_eq!(io::format_args(&args), "text 1.5 [1,null] undefined");
}
