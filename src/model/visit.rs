//! Syntax-tree traversal over the program model, shaped after `syn::visit`.
//!
//! Each `visit_*` method defaults to the matching `walk_*` function, so an
//! implementor overrides only the nodes it cares about and calls `walk_*`
//! to keep descending.

use super::{Argument, Expr, FunctionDecl, Stmt};

pub trait Visit<'ast> {
    fn visit_function(&mut self, function: &'ast FunctionDecl) {
        walk_function(self, function);
    }

    fn visit_block(&mut self, stmts: &'ast [Stmt]) {
        walk_block(self, stmts);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_argument(&mut self, arg: &'ast Argument) {
        walk_argument(self, arg);
    }
}

pub fn walk_function<'ast, V>(v: &mut V, function: &'ast FunctionDecl)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_block(&function.body);
}

pub fn walk_block<'ast, V>(v: &mut V, stmts: &'ast [Stmt])
where
    V: Visit<'ast> + ?Sized,
{
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V>(v: &mut V, stmt: &'ast Stmt)
where
    V: Visit<'ast> + ?Sized,
{
    match stmt {
        Stmt::Local { initializer, .. } => {
            if let Some(init) = initializer {
                v.visit_expr(init);
            }
        }
        Stmt::Expr { expr } => v.visit_expr(expr),
        Stmt::LocalFunction { function } => v.visit_function(function),
        Stmt::Return { value } => {
            if let Some(value) = value {
                v.visit_expr(value);
            }
        }
    }
}

pub fn walk_expr<'ast, V>(v: &mut V, expr: &'ast Expr)
where
    V: Visit<'ast> + ?Sized,
{
    match expr {
        Expr::Ident { .. } | Expr::Literal { .. } => {}
        Expr::Call { receiver, args, .. } => {
            if let Some(receiver) = receiver {
                v.visit_expr(receiver);
            }
            for arg in args {
                v.visit_argument(arg);
            }
        }
        Expr::Member { receiver, .. } => v.visit_expr(receiver),
        Expr::Template { parts } => {
            for part in parts {
                v.visit_expr(part);
            }
        }
        Expr::Lambda { body, .. } => v.visit_block(body),
        Expr::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::If {
            condition,
            then_branch,
            else_branch,
        } => {
            v.visit_expr(condition);
            v.visit_block(then_branch);
            v.visit_block(else_branch);
        }
        Expr::Other { children } => {
            for child in children {
                v.visit_expr(child);
            }
        }
    }
}

pub fn walk_argument<'ast, V>(v: &mut V, arg: &'ast Argument)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_expr(&arg.value);
}
