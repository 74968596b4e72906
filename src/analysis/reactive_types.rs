//! Reactive container classification.
//!
//! Maps resolved parameter types onto the container taxonomy and recognises
//! the expressions that create a container: direct creation calls and
//! stream collection (`flow.collectAsState()`), optionally wrapped in a
//! memoisation call such as `remember { ... }`.

use crate::config::ReactiveTypesConfig;
use crate::model::{Expr, Stmt, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReactiveKind {
    #[default]
    None,
    ValueHolder,
    MutableValueHolder,
    Stream,
    HotStream,
    MutableHotStream,
}

impl ReactiveKind {
    pub fn is_reactive(self) -> bool {
        self != ReactiveKind::None
    }

    /// Whether a value of kind `self` may be passed where `target` is expected.
    ///
    /// `MutableValueHolder <: ValueHolder` and
    /// `MutableHotStream <: HotStream <: Stream`.
    pub fn is_assignable_to(self, target: ReactiveKind) -> bool {
        use ReactiveKind::*;
        match (self, target) {
            (None, _) | (_, None) => false,
            (a, b) if a == b => true,
            (MutableValueHolder, ValueHolder) => true,
            (MutableHotStream, HotStream) | (MutableHotStream, Stream) => true,
            (HotStream, Stream) => true,
            _ => false,
        }
    }

    /// Depth in the subtype hierarchy; deeper kinds are more specific.
    fn specificity(self) -> u8 {
        match self {
            ReactiveKind::None => 0,
            ReactiveKind::ValueHolder | ReactiveKind::Stream => 1,
            ReactiveKind::MutableValueHolder | ReactiveKind::HotStream => 2,
            ReactiveKind::MutableHotStream => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReactiveKind::None => "none",
            ReactiveKind::ValueHolder => "value-holder",
            ReactiveKind::MutableValueHolder => "mutable-value-holder",
            ReactiveKind::Stream => "stream",
            ReactiveKind::HotStream => "hot-stream",
            ReactiveKind::MutableHotStream => "mutable-hot-stream",
        }
    }
}

impl fmt::Display for ReactiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a reactive container came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreationKind {
    DirectCreation,
    CollectedFromStream,
}

impl CreationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CreationKind::DirectCreation => "direct-creation",
            CreationKind::CollectedFromStream => "collected-from-stream",
        }
    }
}

impl fmt::Display for CreationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ReactiveTypeClassifier {
    kinds: HashMap<String, ReactiveKind>,
    collection_operations: HashSet<String>,
    creation_functions: HashSet<String>,
    memo_wrappers: HashSet<String>,
}

impl ReactiveTypeClassifier {
    pub fn new(config: &ReactiveTypesConfig) -> Self {
        let mut kinds = HashMap::new();
        let groups = [
            (&config.value_holder, ReactiveKind::ValueHolder),
            (&config.mutable_value_holder, ReactiveKind::MutableValueHolder),
            (&config.stream, ReactiveKind::Stream),
            (&config.hot_stream, ReactiveKind::HotStream),
            (&config.mutable_hot_stream, ReactiveKind::MutableHotStream),
        ];
        for (names, kind) in groups {
            for name in names {
                kinds.insert(simple_type_name(name).to_string(), kind);
            }
        }

        Self {
            kinds,
            collection_operations: config.collection_operations.iter().cloned().collect(),
            creation_functions: config.creation_functions.iter().cloned().collect(),
            memo_wrappers: config.memo_wrappers.iter().cloned().collect(),
        }
    }

    /// Classify a declared type. Unresolved and unknown types are `None`.
    pub fn classify(&self, ty: Option<&TypeRef>) -> ReactiveKind {
        let Some(ty) = ty else {
            return ReactiveKind::None;
        };

        let own = self.classify_name(&ty.name);
        if own.is_reactive() {
            return own;
        }

        ty.supertypes
            .iter()
            .map(|name| self.classify_name(name))
            .max_by_key(|kind| kind.specificity())
            .unwrap_or(ReactiveKind::None)
    }

    pub fn classify_name(&self, raw: &str) -> ReactiveKind {
        self.kinds
            .get(simple_type_name(raw))
            .copied()
            .unwrap_or(ReactiveKind::None)
    }

    /// `stream.collectAsState()` and friends: a call on a receiver that turns
    /// a stream into a value holder.
    pub fn is_collection_operation(&self, expr: &Expr) -> bool {
        matches!(
            expr,
            Expr::Call { callee, receiver: Some(_), .. }
                if self.collection_operations.contains(callee.as_str())
        )
    }

    /// Creation kind of `expr` if it produces a fresh reactive container.
    pub fn creation_kind(&self, expr: &Expr) -> Option<CreationKind> {
        if self.is_collection_operation(expr) {
            return Some(CreationKind::CollectedFromStream);
        }

        let Expr::Call { callee, args, .. } = expr else {
            return None;
        };

        if self.creation_functions.contains(callee.as_str()) {
            return Some(CreationKind::DirectCreation);
        }

        if self.memo_wrappers.contains(callee.as_str()) {
            return args
                .iter()
                .rev()
                .find_map(|arg| match &arg.value {
                    Expr::Lambda { body, .. } => lambda_result(body),
                    _ => None,
                })
                .and_then(|result| self.creation_kind(result));
        }

        None
    }
}

impl Default for ReactiveTypeClassifier {
    fn default() -> Self {
        Self::new(&ReactiveTypesConfig::default())
    }
}

/// Value produced by a lambda body: its trailing expression.
fn lambda_result(body: &[Stmt]) -> Option<&Expr> {
    match body.last()? {
        Stmt::Expr { expr } => Some(expr),
        Stmt::Return { value } => value.as_ref(),
        _ => None,
    }
}

/// `kotlinx.coroutines.flow.StateFlow<List<Item>>?` -> `StateFlow`
pub fn simple_type_name(raw: &str) -> &str {
    let without_generics = raw.split('<').next().unwrap_or(raw);
    let trimmed = without_generics.trim().trim_end_matches('?');
    trimmed.rsplit('.').next().unwrap_or(trimmed)
}
