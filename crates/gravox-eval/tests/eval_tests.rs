//! Integration tests for the Gravox interpreter.
//!
//! Covers:
//! - declarations and the declaration-time type check
//! - `show` output and interpolation
//! - scoping of blocks, loops and calls
//! - control flow and return propagation
//! - user functions, closures, defaults and aliases
//! - arrays, operators and `std:` capsules
//! - error reporting through `interpret`

use gravox_eval::{EvalError, Interpreter, InterpreterConfig, Value};
use gravox_parser::parse_source;
use gravox_types::ast::Program;
use gravox_types::SourceFile;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Parse Gravox source, panicking on lexical or syntax errors.
fn parse(source: &str) -> Program {
    let sf = SourceFile::new("test.gvx", source);
    let (program, lexed) = parse_source(&sf);
    assert!(
        !lexed.errors.has_errors(),
        "lex errors: {:?}",
        lexed.errors.errors
    );
    program.unwrap_or_else(|e| panic!("parse error: {e}"))
}

fn interpreter() -> Interpreter {
    Interpreter::capturing(InterpreterConfig {
        file_name: "test.gvx".into(),
        ..InterpreterConfig::default()
    })
}

/// Run through `interpret` and return the interpreter for inspection.
fn run(source: &str) -> Interpreter {
    let program = parse(source);
    let mut interp = interpreter();
    interp.interpret(&program);
    interp
}

/// Output lines of a program that must not fail.
fn output(source: &str) -> Vec<String> {
    let interp = run(source);
    assert!(
        !interp.has_errors(),
        "unexpected runtime error: {:?}",
        interp.diagnostics()
    );
    interp.output().to_vec()
}

/// The runtime error a program stops with.
fn runtime_error(source: &str) -> EvalError {
    let program = parse(source);
    match interpreter().run(&program) {
        Ok(()) => panic!("expected a runtime error"),
        Err(e) => e,
    }
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

// ══════════════════════════════════════════════════════════════════════════════
// Scenarios
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn show_declared_int() {
    assert_eq!(output("int x = 5; show(x);"), ["5"]);
}

#[test]
fn for_range_prints_each_value() {
    assert_eq!(
        output("for (i in range(0,3)) { show(i); }"),
        ["0", "1", "2"]
    );
}

#[test]
fn show_interpolates_names() {
    assert_eq!(output(r#"string n = "A"; show("Hi {{n}}");"#), ["Hi A"]);
}

#[test]
fn default_parameter_fills_missing_argument() {
    assert_eq!(
        output("action f(int a, int b = 10) { return a + b; } show(f(5));"),
        ["15"]
    );
}

#[test]
fn multiple_return_values_form_array() {
    let interp = run("action g() { return 1, 2; } int[] r = g();");
    assert!(!interp.has_errors());
    assert_eq!(
        interp.global("r"),
        Some(&Value::Array(vec![num(1.0), num(2.0)]))
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Declarations & type check
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn declaration_without_initializer_is_null() {
    assert_eq!(output("string s; show(s);"), ["null"]);
}

#[test]
fn declaration_type_mismatch() {
    assert_eq!(
        runtime_error(r#"int x = "five";"#),
        EvalError::TypeMismatch {
            name: "x".into(),
            expected: "int".into(),
            found: "string",
        }
    );
}

#[test]
fn array_declaration_checks_elements() {
    assert!(matches!(
        runtime_error(r#"int[] xs = [1, "two"];"#),
        EvalError::TypeMismatch { .. }
    ));
    assert_eq!(output("int[] xs = []; show(xs);"), ["[]"]);
    assert_eq!(output(r#"any[] xs = [1, "a", true]; show(xs);"#), ["[1, a, true]"]);
}

#[test]
fn float_accepts_integral_numbers() {
    assert_eq!(output("float f = 3; int i = 2.5; show(f, i);"), ["3 2.5"]);
}

#[test]
fn reassignment_is_not_type_checked() {
    assert_eq!(output(r#"int x = 1; x = "one"; show(x);"#), ["one"]);
}

#[test]
fn redeclaration_overwrites() {
    assert_eq!(output("int x = 1; int x = 2; show(x);"), ["2"]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Show & interpolation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn show_joins_arguments_with_space() {
    assert_eq!(
        output(r#"show(1, "two", true, [3, 4]);"#),
        ["1 two true [3, 4]"]
    );
}

#[test]
fn show_without_arguments_prints_empty_line() {
    assert_eq!(output("show();"), [""]);
}

#[test]
fn interpolation_leaves_unknown_names() {
    assert_eq!(
        output(r#"int a = 1; show("{{a}} {{ b }} {{a}}");"#),
        ["1 {{ b }} 1"]
    );
}

#[test]
fn interpolation_happens_at_show_time() {
    assert_eq!(
        output(r#"string t = "value={{v}}"; int v = 2; show(t); v = 3; show(t);"#),
        ["value=2", "value=3"]
    );
}

#[test]
fn interpolation_renders_values_naturally() {
    assert_eq!(
        output(r#"float f = 2.5; any xs = [1, 2]; bool b = false; show("{{f}} {{xs}} {{b}}");"#),
        ["2.5 [1, 2] false"]
    );
}

#[test]
fn interpolation_sees_local_scope() {
    assert_eq!(
        output(r#"action greet(string who) { show("hello {{who}}"); } greet("bob");"#),
        ["hello bob"]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Scoping
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn block_shadowing() {
    assert_eq!(
        output("int x = 1; { int x = 2; show(x); } show(x);"),
        ["2", "1"]
    );
}

#[test]
fn block_assigns_outer_binding() {
    assert_eq!(output("int x = 1; { x = 5; } show(x);"), ["5"]);
}

#[test]
fn block_locals_do_not_leak() {
    assert_eq!(
        runtime_error("{ int inner = 1; } show(inner);"),
        EvalError::UndefinedVariable("inner".into())
    );
}

#[test]
fn undefined_read_and_write() {
    assert_eq!(
        runtime_error("show(y);"),
        EvalError::UndefinedVariable("y".into())
    );
    assert_eq!(
        runtime_error("y = 1;"),
        EvalError::UndefinedVariable("y".into())
    );
}

#[test]
fn loop_variable_scoped_to_loop() {
    assert_eq!(
        runtime_error("for (i in range(0, 2)) show(i); show(i);"),
        EvalError::UndefinedVariable("i".into())
    );
}

#[test]
fn parameters_do_not_leak() {
    assert_eq!(
        runtime_error("action f(int a) { return a; } f(1); show(a);"),
        EvalError::UndefinedVariable("a".into())
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Control flow
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn if_else_branches() {
    assert_eq!(
        output(r#"int x = 4; if (x > 3) show("big"); else show("small"); if (x < 3) show("no");"#),
        ["big"]
    );
}

#[test]
fn conditions_use_truthiness() {
    assert_eq!(
        output(
            r#"
if (0) show("a"); else show("b");
if ("") show("c"); else show("d");
if ("x") show("e");
if ([]) show("f");
string s;
if (s) show("g"); else show("h");
"#
        ),
        ["b", "d", "e", "f", "h"]
    );
}

#[test]
fn while_counts() {
    assert_eq!(
        output("int i = 0; while (i < 3) { show(i); i = i + 1; }"),
        ["0", "1", "2"]
    );
}

#[test]
fn empty_and_reversed_ranges_do_not_iterate() {
    assert!(output("for (i in range(3, 3)) show(i); for (i in range(5, 1)) show(i);").is_empty());
}

#[test]
fn range_bounds_evaluated_once() {
    assert_eq!(
        output("int n = 2; for (i in range(0, n)) { n = n + 1; show(i); } show(n);"),
        ["0", "1", "4"]
    );
}

#[test]
fn fractional_range_steps_by_one() {
    assert_eq!(
        output("for (i in range(0.5, 3)) show(i);"),
        ["0.5", "1.5", "2.5"]
    );
}

#[test]
fn assigning_loop_variable_does_not_change_iteration() {
    assert_eq!(
        output("for (i in range(0, 3)) { show(i); i = 100; }"),
        ["0", "1", "2"]
    );
}

#[test]
fn range_requires_numbers() {
    assert!(matches!(
        runtime_error(r#"for (i in range("a", 3)) show(i);"#),
        EvalError::InvalidOperands(_)
    ));
}

#[test]
fn closures_share_the_loop_binding() {
    assert_eq!(
        output(
            r#"
any f;
for (i in range(0, 3)) {
  action g() { return i; }
  if (i == 0) f = g;
}
show(f());
"#
        ),
        ["2"]
    );
}

#[test]
fn return_unwinds_loops() {
    assert_eq!(
        output(
            r#"
action first_over(int limit) {
  for (i in range(0, 10)) {
    if (i > limit) { return i; }
  }
  return -1;
}
action spin() {
  int n = 0;
  while (true) { n = n + 1; if (n == 4) return n; }
}
show(first_over(2), first_over(20), spin());
"#
        ),
        ["3 -1 4"]
    );
}

#[test]
fn return_at_top_level_is_an_error() {
    assert_eq!(runtime_error("return 1;"), EvalError::ReturnOutsideFunction);
    assert_eq!(
        runtime_error("{ return; }"),
        EvalError::ReturnOutsideFunction
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn return_arity() {
    assert_eq!(
        output(
            r#"
action none() { return; }
action fall() { int x = 1; }
action one() { return "a"; }
action many() { return 1, "b", true; }
show(none(), fall(), one(), many());
"#
        ),
        ["null null a [1, b, true]"]
    );
}

#[test]
fn defaults_see_earlier_parameters() {
    assert_eq!(
        output("action f(int a, int b = a * 2) { return a + b; } show(f(3), f(3, 1));"),
        ["9 4"]
    );
}

#[test]
fn missing_argument() {
    assert_eq!(
        runtime_error("action f(int a, int b) { return a; } f(1);"),
        EvalError::MissingArgument {
            function: "f".into(),
            param: "b".into(),
        }
    );
}

#[test]
fn extra_arguments_are_ignored() {
    assert_eq!(
        output("action f(int a) { return a; } show(f(1, 2, 3));"),
        ["1"]
    );
}

#[test]
fn arguments_evaluate_in_caller_scope() {
    assert_eq!(
        output("int a = 10; action f(int a, int b) { return a - b; } show(f(1, a));"),
        ["-9"]
    );
}

#[test]
fn recursion() {
    assert_eq!(
        output(
            "action fib(int n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } show(fib(15));"
        ),
        ["610"]
    );
}

#[test]
fn typed_function_declaration() {
    assert_eq!(
        output("int square(int n) { return n * n; } string[] words() { return \"a\", \"b\"; } show(square(4), words());"),
        ["16 [a, b]"]
    );
}

#[test]
fn functions_resolve_globals_at_call_time() {
    assert_eq!(
        output("action f() { return x; } int x = 5; show(f()); x = 6; show(f());"),
        ["5", "6"]
    );
}

#[test]
fn closures_keep_their_frame() {
    assert_eq!(
        output(
            r#"
action counter() {
  int n = 0;
  action inc() { n = n + 1; return n; }
  return inc;
}
any c = counter();
any d = counter();
show(c(), c(), d(), c());
"#
        ),
        ["1 2 1 3"]
    );
}

#[test]
fn alias_binds_same_function() {
    assert_eq!(
        output("action add(int a, int b) { return a + b; } use add as plus; show(plus(2, 3), add == plus);"),
        ["5 true"]
    );
}

#[test]
fn alias_errors() {
    assert_eq!(
        runtime_error("use nothing as something;"),
        EvalError::UndefinedVariable("nothing".into())
    );
    assert_eq!(
        runtime_error("int x = 1; use x as y;"),
        EvalError::NotAFunction("x".into())
    );
}

#[test]
fn calling_a_non_function() {
    assert_eq!(
        runtime_error("int x = 1; x();"),
        EvalError::NotAFunction("x".into())
    );
    assert_eq!(
        runtime_error("nope();"),
        EvalError::NotAFunction("nope".into())
    );
}

#[test]
fn function_display() {
    assert_eq!(output("action f() {} show(f);"), ["<action f>"]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Arrays
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn array_indexing() {
    assert_eq!(
        output("int[] xs = [10, 20, 30]; show(xs[0], xs[2], xs[1.9]);"),
        ["10 30 20"]
    );
}

#[test]
fn index_out_of_bounds() {
    assert_eq!(
        runtime_error("int[] xs = [10, 20, 30]; show(xs[3]);"),
        EvalError::IndexOutOfBounds {
            name: "xs".into(),
            index: 3.0,
            len: 3,
        }
    );
    assert!(matches!(
        runtime_error("int[] xs = [1]; show(xs[-1]);"),
        EvalError::IndexOutOfBounds { .. }
    ));
    assert!(matches!(
        runtime_error("int[] xs = []; show(xs[0]);"),
        EvalError::IndexOutOfBounds { len: 0, .. }
    ));
}

#[test]
fn out_of_bounds_leaves_array_intact() {
    let interp = run("int[] xs = [1, 2]; show(xs[5]);");
    assert!(interp.has_errors());
    assert_eq!(
        interp.global("xs"),
        Some(&Value::Array(vec![num(1.0), num(2.0)]))
    );
}

#[test]
fn indexing_a_non_array() {
    assert_eq!(
        runtime_error("int x = 1; show(x[0]);"),
        EvalError::NotAnArray("x".into())
    );
    assert!(matches!(
        runtime_error(r#"int[] xs = [1]; show(xs["0"]);"#),
        EvalError::InvalidOperands(_)
    ));
}

#[test]
fn nested_arrays() {
    assert_eq!(
        output("any grid = [[1, 2], [3]]; any row = grid[0]; show(grid, row[1]);"),
        ["[[1, 2], [3]] 2"]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn arithmetic_precedence() {
    assert_eq!(
        output("show(1 + 2 * 3, (1 + 2) * 3, 10 - 4 - 3, 7 % 3, 7 / 2, -2 * 3, --4);"),
        ["7 9 3 1 3.5 -6 4"]
    );
}

#[test]
fn division_by_zero_yields_ieee_values() {
    assert_eq!(
        output("show(1 / 0, -1 / 0, 0 / 0, 5 % 0);"),
        ["Infinity -Infinity NaN NaN"]
    );
}

#[test]
fn string_concatenation() {
    assert_eq!(
        output(r#"string s = "ab" + "cd"; show(s, "n=" + 4, 1.5 + "x");"#),
        ["abcd n=4 1.5x"]
    );
}

#[test]
fn comparison_and_equality() {
    assert_eq!(
        output(r#"show(1 < 2, 2 > 3, "a" < "b", 1 == 1, "a" == "a", 1 == "1", [1] == [1]);"#),
        ["true false true true true false true"]
    );
}

#[test]
fn invalid_operands() {
    assert_eq!(
        runtime_error("show(true + 1);"),
        EvalError::InvalidOperands("Cannot apply '+' to bool and number.".into())
    );
    assert!(matches!(
        runtime_error(r#"show(-"x");"#),
        EvalError::InvalidOperands(_)
    ));
    assert!(matches!(
        runtime_error(r#"show(1 < "2");"#),
        EvalError::InvalidOperands(_)
    ));
}

#[test]
fn assignment_is_an_expression() {
    assert_eq!(
        output("int a; int b; a = b = 3; show(a, b, a = 4);"),
        ["3 3 4"]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Standard library
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn std_math_wildcard() {
    assert_eq!(
        output(r#"import "std:math"; show(sqrt(16), abs(-2), pow(2, 3), floor(2.5), ceil(2.1));"#),
        ["4 2 8 2 3"]
    );
}

#[test]
fn std_named_import_with_alias() {
    assert_eq!(
        output(r#"import { pow as power } from "std:math"; show(power(2, 5));"#),
        ["32"]
    );
    assert_eq!(
        runtime_error(r#"import { pow as power } from "std:math"; pow(1, 2);"#),
        EvalError::NotAFunction("pow".into())
    );
}

#[test]
fn std_missing_export() {
    assert_eq!(
        runtime_error(r#"import { tan } from "std:math";"#),
        EvalError::ExportNotFound {
            name: "tan".into(),
            module: "std:math".into(),
        }
    );
}

#[test]
fn unknown_std_module() {
    assert_eq!(
        runtime_error(r#"import "std:net";"#),
        EvalError::ImportNotFound("std:net".into())
    );
}

#[test]
fn native_argument_errors() {
    assert_eq!(
        runtime_error(r#"import "std:math"; sqrt();"#),
        EvalError::MissingArgument {
            function: "sqrt".into(),
            param: "n".into(),
        }
    );
    assert!(matches!(
        runtime_error(r#"import "std:math"; abs("x");"#),
        EvalError::Native { .. }
    ));
}

#[test]
fn std_time() {
    let interp = run(r#"import { now, date } from "std:time"; int t = now(); string d = date();"#);
    assert!(!interp.has_errors(), "{:?}", interp.diagnostics());
    let Some(Value::String(d)) = interp.global("d") else {
        panic!("date() should return a string");
    };
    assert_eq!(d.len(), 10);
    assert!(matches!(interp.global("t"), Some(Value::Number(_))));
}

#[test]
fn native_display_and_alias() {
    assert_eq!(
        output(r#"import { abs } from "std:math"; use abs as magnitude; show(abs, magnitude(-1));"#),
        ["<native abs> 1"]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Error reporting
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn runtime_error_stops_execution_and_keeps_output() {
    let interp = run("show(1); show(y); show(2);");
    assert_eq!(interp.output(), ["1"]);
    assert_eq!(interp.diagnostics().len(), 1);
    let diag = &interp.diagnostics()[0];
    assert_eq!(diag.span.start_line, 1);
    assert_eq!(diag.span.start_col, 15);
    assert_eq!(diag.message, "Undefined variable 'y'.");
    assert_eq!(
        interp.error_output(),
        ["test.gvx:1:15: runtime error: Undefined variable 'y'."]
    );
}

#[test]
fn runtime_error_points_inside_the_called_function() {
    let interp = run("action f() {\n  show(missing);\n}\nf();");
    let diag = &interp.diagnostics()[0];
    assert_eq!(diag.message, "Undefined variable 'missing'.");
    assert_eq!((diag.span.start_line, diag.span.start_col), (2, 8));
}

#[test]
fn runtime_error_location_resets_between_programs() {
    let mut interp = interpreter();
    interp.interpret(&parse("action f() {\n  show(missing);\n}\nf();"));
    interp.interpret(&parse("\n\nreturn;"));
    assert_eq!(interp.diagnostics().len(), 2);
    assert_eq!(interp.diagnostics()[1].span.start_line, 3);
}

#[test]
fn top_level_return_reported() {
    let interp = run("show(1);\nreturn;\nshow(2);");
    assert_eq!(interp.output(), ["1"]);
    assert_eq!(interp.diagnostics()[0].message, "Return outside of function.");
    assert_eq!(interp.diagnostics()[0].span.start_line, 2);
}

#[test]
fn lexical_errors_do_not_stop_execution() {
    let sf = SourceFile::new("test.gvx", "int x = 1 @; show(x);");
    let (program, lexed) = parse_source(&sf);
    assert_eq!(lexed.errors.total_errors, 1);
    let mut interp = interpreter();
    interp.report_lex_errors(&lexed.errors);
    interp.interpret(&program.unwrap());
    assert_eq!(interp.output(), ["1"]);
    assert_eq!(interp.error_output().len(), 1);
    assert!(interp.error_output()[0].contains("E100"));
}

#[test]
fn interpreter_state_persists_between_programs() {
    let mut interp = interpreter();
    interp.interpret(&parse("int x = 41;"));
    interp.interpret(&parse("x = x + 1; show(x);"));
    assert_eq!(interp.output(), ["42"]);
}

#[test]
fn empty_program() {
    assert!(output("").is_empty());
}

#[test]
fn determinism() {
    let source = r#"
action f(int n) { int acc = 0; for (i in range(0, n)) acc = acc + i * i; return acc; }
show(f(10), f(0), "done {{x}}");
"#;
    assert_eq!(output(source), output(source));
}

// ══════════════════════════════════════════════════════════════════════════════
// Frame reclamation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn nested_actions_do_not_grow_the_arena() {
    let interp = run(
        "action outer() { action inner() { } }\n\
         for (i in range(0, 10000)) { outer(); }",
    );
    assert!(!interp.has_errors(), "{:?}", interp.diagnostics());
    assert_eq!(interp.frame_count(), 1);
}

#[test]
fn escaping_closures_survive_collection() {
    let source = "action make(int n) { action get() { return n; } return get; }\n\
                  any keep = make(7);\n\
                  for (i in range(0, 1000)) { make(i); }\n\
                  show(keep());";
    let interp = run(source);
    assert!(!interp.has_errors(), "{:?}", interp.diagnostics());
    assert_eq!(interp.output(), ["7"]);
    assert_eq!(interp.frame_count(), 2);
}
