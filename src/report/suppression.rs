//! Function-level suppression via `@Suppress("ReactivePassThrough")`.

use crate::model::FunctionDecl;

const SUPPRESS_ANNOTATIONS: &[&str] = &["Suppress", "SuppressWarnings"];

/// Ids listed in the function's suppression annotations, unquoted.
pub fn suppressed_ids(decl: &FunctionDecl) -> impl Iterator<Item = &str> {
    decl.annotations
        .iter()
        .filter(|a| SUPPRESS_ANNOTATIONS.iter().any(|s| *s == a.simple_name()))
        .flat_map(|a| a.arguments.iter())
        .map(|arg| arg.trim().trim_matches('"'))
}

pub fn is_suppressed(decl: &FunctionDecl, ids: &[String]) -> bool {
    suppressed_ids(decl).any(|found| ids.iter().any(|id| id.eq_ignore_ascii_case(found)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Annotation;

    fn ids() -> Vec<String> {
        vec!["ReactivePassThrough".to_string()]
    }

    #[test]
    fn test_quoted_id_matches_case_insensitively() {
        let decl = FunctionDecl::new("Relay", vec![], vec![]).with_annotation(
            Annotation::with_arguments("Suppress", vec!["\"reactivepassthrough\"".into()]),
        );
        assert!(is_suppressed(&decl, &ids()));
    }

    #[test]
    fn test_other_ids_do_not_suppress() {
        let decl = FunctionDecl::new("Relay", vec![], vec![])
            .with_annotation(Annotation::with_arguments(
                "kotlin.Suppress",
                vec!["\"UNUSED_PARAMETER\"".into()],
            ))
            .with_annotation(Annotation::with_arguments(
                "Preview",
                vec!["ReactivePassThrough".into()],
            ));
        assert!(!is_suppressed(&decl, &ids()));
    }
}
