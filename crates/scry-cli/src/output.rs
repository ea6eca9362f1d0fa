//! Operator-facing printing for chain results.

use scry_core::{ChainOutcome, EvalError, Inspector};

pub fn print_value(text: &str) {
    println!("\x1b[36m{}\x1b[0m", text);
}

pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m{}\x1b[0m", msg);
}

/// Print one evaluation's outcome, keeping "your input was bad" visibly
/// distinct from "the call itself failed".
pub fn report(inspector: &Inspector, result: Result<ChainOutcome, EvalError>) {
    match result {
        Ok(ChainOutcome::Success(value)) => print_value(&inspector.render(&value)),
        Ok(ChainOutcome::NullReference(reason)) => print_error(&reason),
        Ok(ChainOutcome::UnknownReference(reason)) => print_error(&reason),
        Err(EvalError::Input(err)) => {
            print_error(&format!("error deducing types from your input: {err}"));
        }
        Err(EvalError::Invocation(err)) => {
            print_error(&format!("invocation failed: {err}"));
        }
        Err(EvalError::Schema(err)) => {
            print_error(&format!("schema error: {err}"));
        }
    }
}
