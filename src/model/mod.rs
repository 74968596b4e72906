//! Read-only program model consumed by the analysis.
//!
//! The host's parser and type resolver produce these types (usually as a
//! JSON dump, see [`crate::io::input`]). Everything the pass-through
//! analysis needs is here: UI-building markers, resolved parameter types,
//! resolved call targets with their arguments, and source locations.
//!
//! Expression and statement trees are deliberately small. Anything the
//! analysis does not distinguish is folded into [`Expr::Other`], which only
//! exposes its children.

pub mod visit;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Placeholder used in signatures for parameters whose type did not resolve.
pub const UNRESOLVED_TYPE: &str = "?";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    #[serde(default)]
    pub file: PathBuf,
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// One parsed and resolved source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub path: PathBuf,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

impl CompilationUnit {
    pub fn new(path: impl Into<PathBuf>, functions: Vec<FunctionDecl>) -> Self {
        Self {
            path: path.into(),
            functions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(name: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Annotation name without package qualifier or leading `@`.
    pub fn simple_name(&self) -> &str {
        let name = self.name.trim_start_matches('@');
        name.rsplit('.').next().unwrap_or(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub location: SourceLocation,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, params: Vec<ParamDecl>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            params,
            body,
            location: SourceLocation::default(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn has_annotation(&self, marker: &str) -> bool {
        self.annotations.iter().any(|a| a.simple_name() == marker)
    }

    /// Ordered parameter-type signature used to tell overloads apart.
    pub fn signature(&self) -> Vec<String> {
        self.params.iter().map(ParamDecl::type_label).collect()
    }

    pub fn param(&self, name: &str) -> Option<&ParamDecl> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    /// `None` when the host could not resolve the declared type.
    #[serde(default)]
    pub ty: Option<TypeRef>,
    #[serde(default)]
    pub location: SourceLocation,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: Some(TypeRef::new(ty)),
            location: SourceLocation::default(),
        }
    }

    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            location: SourceLocation::default(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    pub fn type_label(&self) -> String {
        self.ty
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| UNRESOLVED_TYPE.to_string())
    }
}

/// A resolved type as written at the declaration, plus the supertypes the
/// resolver knows about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
        }
    }

    pub fn with_supertypes(name: impl Into<String>, supertypes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            supertypes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// `val name = initializer` or, when `delegated`, `val name by initializer`.
    Local {
        name: String,
        #[serde(default)]
        delegated: bool,
        #[serde(default)]
        initializer: Option<Expr>,
        #[serde(default)]
        location: SourceLocation,
    },
    Expr {
        expr: Expr,
    },
    LocalFunction {
        function: FunctionDecl,
    },
    Return {
        #[serde(default)]
        value: Option<Expr>,
    },
}

impl Stmt {
    pub fn local(name: impl Into<String>, initializer: Expr) -> Self {
        Stmt::Local {
            name: name.into(),
            delegated: false,
            initializer: Some(initializer),
            location: SourceLocation::default(),
        }
    }

    pub fn delegated(name: impl Into<String>, initializer: Expr) -> Self {
        Stmt::Local {
            name: name.into(),
            delegated: true,
            initializer: Some(initializer),
            location: SourceLocation::default(),
        }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr { expr }
    }
}

/// Call target as resolved by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallTargetRef {
    Resolved {
        name: String,
        #[serde(default)]
        signature: Vec<String>,
    },
    #[default]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Set for named arguments (`child(state = s)`).
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trailing_lambda: bool,
    pub value: Expr,
}

impl Argument {
    pub fn positional(value: Expr) -> Self {
        Self {
            name: None,
            trailing_lambda: false,
            value,
        }
    }

    pub fn named(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: Some(name.into()),
            trailing_lambda: false,
            value,
        }
    }

    pub fn trailing(value: Expr) -> Self {
        Self {
            name: None,
            trailing_lambda: true,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    Ident {
        name: String,
        #[serde(default)]
        location: SourceLocation,
    },
    Literal {
        #[serde(default)]
        value: String,
    },
    Call {
        callee: String,
        #[serde(default)]
        target: CallTargetRef,
        #[serde(default)]
        receiver: Option<Box<Expr>>,
        #[serde(default)]
        args: Vec<Argument>,
        #[serde(default)]
        location: SourceLocation,
    },
    /// Property or method-less member access, e.g. `state.value`.
    Member {
        receiver: Box<Expr>,
        name: String,
        #[serde(default)]
        location: SourceLocation,
    },
    /// String template; each part is an interpolated expression or literal.
    Template {
        #[serde(default)]
        parts: Vec<Expr>,
    },
    Lambda {
        /// True when the lambda is itself a UI-building (content) lambda.
        #[serde(default)]
        ui_building: bool,
        #[serde(default)]
        params: Vec<String>,
        #[serde(default)]
        body: Vec<Stmt>,
    },
    Binary {
        op: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        #[serde(default)]
        then_branch: Vec<Stmt>,
        #[serde(default)]
        else_branch: Vec<Stmt>,
    },
    Other {
        #[serde(default)]
        children: Vec<Expr>,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident {
            name: name.into(),
            location: SourceLocation::default(),
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Expr::Literal {
            value: value.into(),
        }
    }

    /// Call resolved to `callee`, carrying its signature.
    pub fn call_to(callee: &FunctionDecl, args: Vec<Argument>) -> Self {
        Expr::Call {
            callee: callee.name.clone(),
            target: CallTargetRef::Resolved {
                name: callee.name.clone(),
                signature: callee.signature(),
            },
            receiver: None,
            args,
            location: SourceLocation::default(),
        }
    }

    /// Call to a library function outside the analysed program.
    pub fn library_call(name: impl Into<String>, args: Vec<Argument>) -> Self {
        let name = name.into();
        Expr::Call {
            callee: name.clone(),
            target: CallTargetRef::Resolved {
                name,
                signature: Vec::new(),
            },
            receiver: None,
            args,
            location: SourceLocation::default(),
        }
    }

    pub fn method_call(receiver: Expr, name: impl Into<String>, args: Vec<Argument>) -> Self {
        let name = name.into();
        Expr::Call {
            callee: name.clone(),
            target: CallTargetRef::Resolved {
                name,
                signature: Vec::new(),
            },
            receiver: Some(Box::new(receiver)),
            args,
            location: SourceLocation::default(),
        }
    }

    pub fn unresolved_call(name: impl Into<String>, args: Vec<Argument>) -> Self {
        Expr::Call {
            callee: name.into(),
            target: CallTargetRef::Unknown,
            receiver: None,
            args,
            location: SourceLocation::default(),
        }
    }

    pub fn member(receiver: Expr, name: impl Into<String>) -> Self {
        Expr::Member {
            receiver: Box::new(receiver),
            name: name.into(),
            location: SourceLocation::default(),
        }
    }

    pub fn lambda(ui_building: bool, body: Vec<Stmt>) -> Self {
        Expr::Lambda {
            ui_building,
            params: Vec::new(),
            body,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Expr::Ident { location, .. }
            | Expr::Call { location, .. }
            | Expr::Member { location, .. } => Some(location),
            _ => None,
        }
    }
}
