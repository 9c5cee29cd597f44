//! `std:math`: numeric helpers.

use super::{number_arg, StdModule};
use crate::error::EvalResult;
use crate::evaluator::Interpreter;
use crate::value::{NativeFn, NativeParam, Value};

pub struct MathModule;

impl StdModule for MathModule {
    fn name(&self) -> &'static str {
        "math"
    }

    fn functions(&self) -> Vec<NativeFn> {
        vec![
            unary("abs", abs),
            unary("sqrt", sqrt),
            NativeFn {
                name: "pow",
                params: vec![
                    NativeParam::required("any", "base"),
                    NativeParam::required("any", "exp"),
                ],
                func: pow,
            },
            unary("floor", floor),
            unary("ceil", ceil),
        ]
    }
}

fn unary(name: &'static str, func: crate::value::NativeImpl) -> NativeFn {
    NativeFn {
        name,
        params: vec![NativeParam::required("any", "n")],
        func,
    }
}

fn abs(_: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Number(number_arg("abs", args, 0)?.abs()))
}

fn sqrt(_: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Number(number_arg("sqrt", args, 0)?.sqrt()))
}

fn pow(_: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let base = number_arg("pow", args, 0)?;
    let exp = number_arg("pow", args, 1)?;
    Ok(Value::Number(base.powf(exp)))
}

fn floor(_: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Number(number_arg("floor", args, 0)?.floor()))
}

fn ceil(_: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Number(number_arg("ceil", args, 0)?.ceil()))
}
