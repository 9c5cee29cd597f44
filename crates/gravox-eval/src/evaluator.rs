//! Core statement and expression evaluator.

use crate::config::InterpreterConfig;
use crate::env::{Environment, FrameId};
use crate::error::{EvalError, EvalResult};
use crate::interpolate::interpolate;
use crate::module::ModuleCache;
use crate::sink::{RuntimeDiagnostic, Sink};
use crate::typecheck::check_type;
use crate::value::{Function, NativeFn, UserFunction, Value};
use gravox_types::ast::*;
use gravox_types::{CompileErrors, Span};
use std::path::PathBuf;
use std::rc::Rc;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    /// A `return` unwinding to the nearest call, carrying its values.
    Return(Vec<Value>),
}

/// The tree-walking interpreter.
pub struct Interpreter {
    pub(crate) env: Environment,
    /// Frame statements currently execute in.
    pub(crate) current: FrameId,
    pub(crate) config: InterpreterConfig,
    pub(crate) modules: ModuleCache,
    /// Module files currently executing, innermost last.
    pub(crate) module_paths: Vec<PathBuf>,
    /// File and span of the innermost node that raised the pending error.
    fault: Option<(String, Span)>,
    out: Sink,
    err: Sink,
    diagnostics: Vec<RuntimeDiagnostic>,
}

impl Interpreter {
    /// Interpreter writing to stdout and stderr.
    pub fn new(config: InterpreterConfig) -> Self {
        Self::with_sinks(config, Sink::Stdout, Sink::Stderr)
    }

    pub fn with_sinks(config: InterpreterConfig, out: Sink, err: Sink) -> Self {
        let env = Environment::new();
        let current = env.root();
        Self {
            env,
            current,
            config,
            modules: ModuleCache::default(),
            module_paths: Vec::new(),
            fault: None,
            out,
            err,
            diagnostics: Vec::new(),
        }
    }

    /// Interpreter capturing both channels in memory.
    pub fn capturing(config: InterpreterConfig) -> Self {
        Self::with_sinks(config, Sink::capture(), Sink::capture())
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run a program, reporting the first runtime error on the error sink.
    ///
    /// Output produced before the error is kept; the remaining top-level
    /// statements are skipped.
    ///
    /// The diagnostic points at the innermost statement or expression that
    /// failed, in the file it belongs to.
    pub fn interpret(&mut self, program: &Program) {
        self.fault = None;
        for stmt in &program.stmts {
            let outcome = match self.execute(stmt) {
                Ok(Flow::Normal) => continue,
                Ok(Flow::Return(_)) => EvalError::ReturnOutsideFunction,
                Err(e) => e,
            };
            let (file, span) = self
                .fault
                .take()
                .unwrap_or_else(|| (self.config.file_name.clone(), stmt.span()));
            let diagnostic = RuntimeDiagnostic {
                file,
                span,
                message: outcome.to_string(),
            };
            self.err.write_line(&diagnostic.to_string());
            self.diagnostics.push(diagnostic);
            break;
        }
        self.env.collect();
    }

    /// Run a program, returning the first runtime error instead of
    /// reporting it.
    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        self.fault = None;
        let result = self.exec_stmts(&program.stmts);
        self.env.collect();
        match result? {
            Flow::Normal => Ok(()),
            Flow::Return(_) => Err(EvalError::ReturnOutsideFunction),
        }
    }

    /// Runtime errors reported by [`interpret`](Self::interpret).
    pub fn diagnostics(&self) -> &[RuntimeDiagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Lines written by `show`, when the output sink captures.
    pub fn output(&self) -> &[String] {
        self.out.lines()
    }

    /// Lines written to the error sink, when it captures.
    pub fn error_output(&self) -> &[String] {
        self.err.lines()
    }

    /// Look up a binding visible from the current frame.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.env.lookup(self.current, name)
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Scope frames currently held by the environment arena.
    pub fn frame_count(&self) -> usize {
        self.env.len()
    }

    /// Print lexical diagnostics on the error sink.
    pub fn report_lex_errors(&mut self, errors: &CompileErrors) {
        for error in errors.iter() {
            self.err.write_line(&error.to_string());
        }
    }

    // ── Frames ────────────────────────────────────────────────────────────

    /// Run `body` in a fresh child frame of `parent`.
    ///
    /// The previous frame is restored and the new one released on every
    /// exit path.
    pub(crate) fn with_frame<T>(
        &mut self,
        parent: FrameId,
        body: impl FnOnce(&mut Self) -> EvalResult<T>,
    ) -> EvalResult<T> {
        let frame = self.env.push(parent);
        let saved = std::mem::replace(&mut self.current, frame);
        let result = body(self);
        self.current = saved;
        self.env.release(frame);
        result
    }

    /// Record `span` as the error location if `result` failed and no
    /// inner node has claimed it yet.
    fn locate<T>(&mut self, span: Span, result: EvalResult<T>) -> EvalResult<T> {
        if result.is_err() && self.fault.is_none() {
            let file = match self.module_paths.last() {
                Some(path) => path.display().to_string(),
                None => self.config.file_name.clone(),
            };
            self.fault = Some((file, span));
        }
        result
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            if let Flow::Return(values) = self.execute(stmt)? {
                return Ok(Flow::Return(values));
            }
        }
        Ok(Flow::Normal)
    }

    pub fn execute(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        let result = self.exec_stmt(stmt);
        self.locate(stmt.span(), result)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::VarDecl(decl) => self.exec_var_decl(decl),
            Stmt::Show(show) => self.exec_show(show),
            Stmt::Block(block) => {
                let parent = self.current;
                self.with_frame(parent, |interp| interp.exec_stmts(&block.stmts))
            }
            Stmt::If(if_stmt) => self.exec_if(if_stmt),
            Stmt::While(while_stmt) => self.exec_while(while_stmt),
            Stmt::For(for_stmt) => self.exec_for(for_stmt),
            Stmt::Expr(expr_stmt) => {
                self.eval_expr(&expr_stmt.expr)?;
                Ok(Flow::Normal)
            }
            Stmt::Action(decl) => {
                self.exec_action_decl(decl);
                Ok(Flow::Normal)
            }
            Stmt::Alias(alias) => self.exec_alias(alias),
            Stmt::Return(ret) => {
                let values = self.eval_all(&ret.values)?;
                Ok(Flow::Return(values))
            }
            Stmt::Import(import) => {
                self.exec_import(import)?;
                Ok(Flow::Normal)
            }
        }
    }

    fn exec_var_decl(&mut self, decl: &VarDecl) -> EvalResult<Flow> {
        let value = match &decl.initializer {
            Some(init) => {
                let value = self.eval_expr(init)?;
                if !check_type(&decl.type_ann.kind, &value) {
                    return Err(EvalError::TypeMismatch {
                        name: decl.name.name.clone(),
                        expected: decl.type_ann.kind.to_string(),
                        found: value.type_name(),
                    });
                }
                value
            }
            None => Value::Null,
        };
        self.env.define(self.current, &decl.name.name, value);
        Ok(Flow::Normal)
    }

    fn exec_show(&mut self, show: &ShowStmt) -> EvalResult<Flow> {
        let mut parts = Vec::with_capacity(show.args.len());
        for arg in &show.args {
            let part = match self.eval_expr(arg)? {
                Value::String(text) => interpolate(&text, |name| {
                    self.env.lookup(self.current, name).map(Value::to_string)
                }),
                other => other.to_string(),
            };
            parts.push(part);
        }
        self.out.write_line(&parts.join(" "));
        Ok(Flow::Normal)
    }

    fn exec_if(&mut self, stmt: &IfStmt) -> EvalResult<Flow> {
        if self.eval_expr(&stmt.condition)?.is_truthy() {
            self.execute(&stmt.then_branch)
        } else if let Some(else_branch) = &stmt.else_branch {
            self.execute(else_branch)
        } else {
            Ok(Flow::Normal)
        }
    }

    fn exec_while(&mut self, stmt: &WhileStmt) -> EvalResult<Flow> {
        while self.eval_expr(&stmt.condition)?.is_truthy() {
            if let Flow::Return(values) = self.execute(&stmt.body)? {
                return Ok(Flow::Return(values));
            }
        }
        Ok(Flow::Normal)
    }

    /// One frame for the whole loop; the variable is defined once and
    /// reassigned on every iteration.
    fn exec_for(&mut self, stmt: &ForStmt) -> EvalResult<Flow> {
        let start = self.eval_number(&stmt.start, "range start")?;
        let end = self.eval_number(&stmt.end, "range end")?;
        let name = stmt.variable.name.as_str();
        let parent = self.current;
        self.with_frame(parent, |interp| {
            interp.env.define(interp.current, name, Value::Number(start));
            let mut i = start;
            while i < end {
                interp.env.assign(interp.current, name, Value::Number(i))?;
                if let Flow::Return(values) = interp.execute(&stmt.body)? {
                    return Ok(Flow::Return(values));
                }
                i += 1.0;
            }
            Ok(Flow::Normal)
        })
    }

    fn exec_action_decl(&mut self, decl: &ActionDecl) {
        let func = Rc::new(UserFunction {
            name: decl.name.name.clone(),
            params: decl.params.clone(),
            body: decl.body.clone(),
            closure: self.current,
        });
        self.env.capture(self.current, &func);
        self.env
            .define(self.current, &decl.name.name, Value::Function(Function::User(func)));
    }

    fn exec_alias(&mut self, alias: &AliasStmt) -> EvalResult<Flow> {
        let value = self.env.get(self.current, &alias.original.name)?;
        if value.as_function().is_none() {
            return Err(EvalError::NotAFunction(alias.original.name.clone()));
        }
        self.env.define(self.current, &alias.alias.name, value);
        Ok(Flow::Normal)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        let result = self.eval_expr_kind(expr);
        self.locate(expr.span, result)
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(s) => Ok(Value::String(s.clone())),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::ArrayLit(elems) => Ok(Value::Array(self.eval_all(elems)?)),
            ExprKind::Variable(name) => self.env.get(self.current, name),
            ExprKind::Index { name, index } => self.eval_index(name, index),
            ExprKind::Call { callee, args } => self.eval_call(callee, args),
            ExprKind::Assign { name, value } => {
                let value = self.eval_expr(value)?;
                self.env.assign(self.current, &name.name, value.clone())?;
                Ok(value)
            }
            ExprKind::Binary { left, op, right } => {
                let lv = self.eval_expr(left)?;
                let rv = self.eval_expr(right)?;
                eval_binary(*op, lv, rv)
            }
            ExprKind::Unary { op, operand } => match (op, self.eval_expr(operand)?) {
                (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
                (UnaryOp::Neg, other) => Err(EvalError::InvalidOperands(format!(
                    "Cannot negate {}.",
                    other.type_name()
                ))),
            },
        }
    }

    /// Evaluate expressions left to right.
    fn eval_all(&mut self, exprs: &[Expr]) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            values.push(self.eval_expr(expr)?);
        }
        Ok(values)
    }

    fn eval_number(&mut self, expr: &Expr, what: &str) -> EvalResult<f64> {
        match self.eval_expr(expr)? {
            Value::Number(n) => Ok(n),
            other => Err(EvalError::InvalidOperands(format!(
                "Expected a number for {what}, got {}.",
                other.type_name()
            ))),
        }
    }

    fn eval_index(&mut self, name: &Ident, index: &Expr) -> EvalResult<Value> {
        let index = self.eval_number(index, "array index")?;
        let items = match self.env.lookup(self.current, &name.name) {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(EvalError::NotAnArray(name.name.clone())),
            None => return Err(EvalError::UndefinedVariable(name.name.clone())),
        };
        let slot = index.floor();
        if slot.is_nan() || slot < 0.0 || slot >= items.len() as f64 {
            return Err(EvalError::IndexOutOfBounds {
                name: name.name.clone(),
                index,
                len: items.len(),
            });
        }
        Ok(items[slot as usize].clone())
    }

    // ── Calls ─────────────────────────────────────────────────────────────

    fn eval_call(&mut self, callee: &Ident, args: &[Expr]) -> EvalResult<Value> {
        let func = match self.env.lookup(self.current, &callee.name) {
            Some(Value::Function(func)) => func.clone(),
            _ => return Err(EvalError::NotAFunction(callee.name.clone())),
        };
        let args = self.eval_all(args)?;
        self.call_function(&func, args)
    }

    /// Invoke a function value with already-evaluated arguments.
    pub fn call_function(&mut self, func: &Function, args: Vec<Value>) -> EvalResult<Value> {
        match func {
            Function::Native(native) => self.call_native(native, args),
            Function::User(user) => self.call_user(user, args),
        }
    }

    fn call_native(&mut self, native: &NativeFn, args: Vec<Value>) -> EvalResult<Value> {
        let mut args = args.into_iter();
        let mut bound = Vec::with_capacity(native.params.len());
        for param in &native.params {
            let value = match (args.next(), &param.default) {
                (Some(value), _) => value,
                (None, Some(default)) => default.clone(),
                (None, None) => {
                    return Err(EvalError::MissingArgument {
                        function: native.name.to_string(),
                        param: param.name.to_string(),
                    })
                }
            };
            bound.push(value);
        }
        (native.func)(self, &bound)
    }

    /// Bind parameters in a new frame under the function's closure, then run
    /// the body there.
    fn call_user(&mut self, func: &UserFunction, args: Vec<Value>) -> EvalResult<Value> {
        self.with_frame(func.closure, |interp| {
            let mut args = args.into_iter();
            for param in &func.params {
                let value = match (args.next(), &param.default) {
                    (Some(value), _) => value,
                    // defaults see the parameters bound before them
                    (None, Some(default)) => interp.eval_expr(default)?,
                    (None, None) => {
                        return Err(EvalError::MissingArgument {
                            function: func.name.clone(),
                            param: param.name.name.clone(),
                        })
                    }
                };
                interp.env.define(interp.current, &param.name.name, value);
            }
            match interp.exec_stmts(&func.body.stmts)? {
                Flow::Normal => Ok(Value::Null),
                Flow::Return(values) => Ok(collapse_return(values)),
            }
        })
    }
}

/// Zero values → null, one → itself, more → an array.
fn collapse_return(mut values: Vec<Value>) -> Value {
    match values.len() {
        0 => Value::Null,
        1 => values.pop().unwrap_or(Value::Null),
        _ => Value::Array(values),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

fn eval_binary(op: BinOp, lv: Value, rv: Value) -> EvalResult<Value> {
    match op {
        BinOp::Add => eval_add(lv, rv),
        BinOp::Sub => eval_arith(op, &lv, &rv, |a, b| a - b),
        BinOp::Mul => eval_arith(op, &lv, &rv, |a, b| a * b),
        BinOp::Div => eval_arith(op, &lv, &rv, |a, b| a / b),
        BinOp::Mod => eval_arith(op, &lv, &rv, |a, b| a % b),
        BinOp::Eq => Ok(Value::Bool(lv == rv)),
        BinOp::Less => eval_comparison(op, &lv, &rv),
        BinOp::Greater => eval_comparison(op, &lv, &rv),
    }
}

/// Numbers add; a string on either side concatenates display forms.
fn eval_add(lv: Value, rv: Value) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(mut a), rv) => {
            a.push_str(&rv.to_string());
            Ok(Value::String(a))
        }
        (lv, Value::String(b)) => Ok(Value::String(format!("{lv}{b}"))),
        (lv, rv) => Err(invalid_operands(BinOp::Add, &lv, &rv)),
    }
}

fn eval_arith(op: BinOp, lv: &Value, rv: &Value, apply: fn(f64, f64) -> f64) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(apply(*a, *b))),
        _ => Err(invalid_operands(op, lv, rv)),
    }
}

fn eval_comparison(op: BinOp, lv: &Value, rv: &Value) -> EvalResult<Value> {
    let ordering = match (lv, rv) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => return Err(invalid_operands(op, lv, rv)),
    };
    let wanted = match op {
        BinOp::Less => std::cmp::Ordering::Less,
        _ => std::cmp::Ordering::Greater,
    };
    Ok(Value::Bool(ordering == Some(wanted)))
}

fn invalid_operands(op: BinOp, lv: &Value, rv: &Value) -> EvalError {
    EvalError::InvalidOperands(format!(
        "Cannot apply '{}' to {} and {}.",
        op.symbol(),
        lv.type_name(),
        rv.type_name()
    ))
}
