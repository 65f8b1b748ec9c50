//! Parsing whole modules through the public frontend API

use indoc::indoc;
use pretty_assertions::assert_eq;
use vmt_frontend::{ArithmeticOp, Frontend, Instruction, ParseError, Segment};

const FIBONACCI: &str = indoc! {"
    // Computes the n'th element of the Fibonacci series, recursively.
    function Main.fibonacci 0
    push argument 0
    push constant 2
    lt                     // checks if n<2
    if-goto IF_TRUE
    goto IF_FALSE
    label IF_TRUE          // if n<2, return n
    push argument 0
    return
    label IF_FALSE         // if n>=2, return fib(n-2)+fib(n-1)
    push argument 0
    push constant 2
    sub
    call Main.fibonacci 1
    push argument 0
    push constant 1
    sub
    call Main.fibonacci 1
    add
    return
"};

#[test]
fn test_parse_fibonacci_module() {
    let module = Frontend::parse_module("Main", FIBONACCI).unwrap();

    assert_eq!(module.name, "Main");
    assert_eq!(module.instructions.len(), 20);
    assert!(module.diagnostics.is_empty());
    assert!(module.defines_function("Main.fibonacci"));
    assert!(!module.defines_function("Sys.init"));

    let first = &module.instructions[0];
    assert_eq!(
        first.instruction,
        Instruction::Function { name: "Main.fibonacci".to_string(), n_locals: 0 }
    );
    assert_eq!(first.location.line, 2);

    assert_eq!(
        module.instructions[3].instruction,
        Instruction::Arithmetic { op: ArithmeticOp::Lt }
    );
    assert_eq!(
        module.instructions[7].instruction,
        Instruction::Push { segment: Segment::Argument, index: 0 }
    );
}

#[test]
fn test_display_round_trips_through_parser() {
    let module = Frontend::parse_module("Main", FIBONACCI).unwrap();
    let printed: String = module
        .instructions
        .iter()
        .map(|parsed| format!("{}\n", parsed.instruction))
        .collect();

    let reparsed = Frontend::parse_module("Main", &printed).unwrap();
    let original: Vec<_> = module.instructions.into_iter().map(|p| p.instruction).collect();
    let again: Vec<_> = reparsed.instructions.into_iter().map(|p| p.instruction).collect();
    assert_eq!(original, again);
}

#[test]
fn test_json_dump_shape() {
    let module = Frontend::parse_module("Main", "push static 3\nneg\nreturn").unwrap();
    let json = serde_json::to_value(&module).unwrap();

    assert_eq!(json["name"], "Main");
    assert_eq!(json["instructions"][0]["instruction"]["kind"], "push");
    assert_eq!(json["instructions"][0]["instruction"]["segment"], "static");
    assert_eq!(json["instructions"][0]["instruction"]["index"], 3);
    assert_eq!(json["instructions"][1]["instruction"]["op"], "neg");
    assert_eq!(json["instructions"][2]["instruction"]["kind"], "return");
    assert!(json.get("diagnostics").is_none());
}

#[test]
fn test_format_error_stops_the_module() {
    let err = Frontend::parse_module("Bad", "push constant 1\npop local one\nadd").unwrap_err();

    assert!(matches!(err, ParseError::InvalidInteger { .. }));
    assert_eq!(err.location().module, "Bad");
    assert_eq!(err.location().line, 2);
}
