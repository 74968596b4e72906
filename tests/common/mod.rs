// Builder helpers for relaymap integration tests
#![allow(dead_code)]

use relaymap::model::{
    Annotation, Argument, CompilationUnit, Expr, FunctionDecl, ParamDecl, SourceLocation, Stmt,
};
use relaymap::{analyze_units, AnalysisReport, RelaymapConfig};

pub const STATE: &str = "State<Int>";
pub const MUTABLE_STATE: &str = "MutableState<Int>";
pub const FLOW: &str = "Flow<Int>";

/// A `@Composable` function taking `params` as (name, type) pairs.
pub fn composable(name: &str, params: &[(&str, &str)], body: Vec<Stmt>) -> FunctionDecl {
    let params = params
        .iter()
        .map(|(param, ty)| ParamDecl::new(*param, *ty))
        .collect();
    FunctionDecl::new(name, params, body).with_annotation(Annotation::new("Composable"))
}

/// `Text(v.value)`
pub fn read(var: &str) -> Stmt {
    Stmt::expr(Expr::library_call(
        "Text",
        vec![Argument::positional(Expr::member(Expr::ident(var), "value"))],
    ))
}

/// `callee(var)`
pub fn pass(callee: &FunctionDecl, var: &str) -> Stmt {
    Stmt::expr(Expr::call_to(
        callee,
        vec![Argument::positional(Expr::ident(var))],
    ))
}

/// `callee(param = var)`
pub fn pass_named(callee: &FunctionDecl, param: &str, var: &str) -> Stmt {
    Stmt::expr(Expr::call_to(
        callee,
        vec![Argument::named(param, Expr::ident(var))],
    ))
}

/// `val name = remember { mutableStateOf(0) }`
pub fn remember_state(name: &str) -> Stmt {
    Stmt::local(
        name,
        Expr::library_call(
            "remember",
            vec![Argument::trailing(Expr::lambda(
                false,
                vec![Stmt::expr(Expr::library_call(
                    "mutableStateOf",
                    vec![Argument::positional(Expr::literal("0"))],
                ))],
            ))],
        ),
    )
}

/// `val name = stream.collectAsState()`
pub fn collect(name: &str, stream: &str) -> Stmt {
    Stmt::local(
        name,
        Expr::method_call(Expr::ident(stream), "collectAsState", vec![]),
    )
}

/// `Button(onClick = { body })`
pub fn on_click(body: Vec<Stmt>) -> Stmt {
    Stmt::expr(Expr::library_call(
        "Button",
        vec![Argument::named("onClick", Expr::lambda(false, body))],
    ))
}

/// A relay taking `v` of type `ty` and forwarding it untouched to `callee`.
pub fn relay(name: &str, ty: &str, callee: &FunctionDecl) -> FunctionDecl {
    composable(name, &[("v", ty)], vec![pass(callee, "v")])
}

/// A function that reads `v`.
pub fn reader(name: &str, ty: &str) -> FunctionDecl {
    composable(name, &[("v", ty)], vec![read("v")])
}

pub fn unit(functions: Vec<FunctionDecl>) -> Vec<CompilationUnit> {
    vec![CompilationUnit::new("Screen.kt", functions)]
}

pub fn analyze(functions: Vec<FunctionDecl>) -> AnalysisReport {
    analyze_units(&unit(functions), &RelaymapConfig::default())
}

pub fn located(decl: FunctionDecl, line: usize) -> FunctionDecl {
    decl.at(SourceLocation::new("Screen.kt", line, 1))
}

/// Names of the reported functions, in report order.
pub fn reported_functions(report: &AnalysisReport) -> Vec<String> {
    report.findings.iter().map(|f| f.function.clone()).collect()
}
