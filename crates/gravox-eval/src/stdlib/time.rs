//! `std:time`: wall clock and sleeping.

use super::{number_arg, StdModule};
use crate::error::EvalResult;
use crate::evaluator::Interpreter;
use crate::value::{NativeFn, NativeParam, Value};
use chrono::{Local, Utc};
use std::time::Duration;

pub struct TimeModule;

impl StdModule for TimeModule {
    fn name(&self) -> &'static str {
        "time"
    }

    fn functions(&self) -> Vec<NativeFn> {
        vec![
            NativeFn {
                name: "now",
                params: Vec::new(),
                func: now,
            },
            NativeFn {
                name: "date",
                params: Vec::new(),
                func: date,
            },
            NativeFn {
                name: "sleep",
                params: vec![NativeParam::required("int", "ms")],
                func: sleep,
            },
        ]
    }
}

/// Whole seconds since the Unix epoch.
fn now(_: &mut Interpreter, _: &[Value]) -> EvalResult<Value> {
    Ok(Value::Number(Utc::now().timestamp() as f64))
}

/// Today's local calendar date as `YYYY-MM-DD`.
fn date(_: &mut Interpreter, _: &[Value]) -> EvalResult<Value> {
    Ok(Value::String(Local::now().format("%Y-%m-%d").to_string()))
}

/// Block the calling thread for `ms` milliseconds.
fn sleep(_: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let ms = number_arg("sleep", args, 0)?;
    // negative and NaN durations do not sleep
    if let Ok(duration) = Duration::try_from_secs_f64(ms / 1000.0) {
        std::thread::sleep(duration);
    }
    Ok(Value::Null)
}
