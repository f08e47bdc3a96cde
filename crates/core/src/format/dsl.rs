use super::{format_class_sig, format_const_sig, format_func_sig};
use crate::model::ProjectIndex;
use std::fmt::Write;

/// One line per file (`path > dep1,dep2,…`) followed by indented signature
/// lines for its functions, classes, and constants. A file with neither
/// dependencies nor declarations is omitted entirely.
pub fn format_dsl(index: &ProjectIndex) -> String {
    let mut out = String::new();

    for path in &index.nodes {
        let Some(info) = index.files.get(path) else { continue };
        let has_content = !info.dependencies.is_empty()
            || !info.functions.is_empty()
            || !info.classes.is_empty()
            || !info.constants.is_empty();
        if !has_content {
            continue;
        }

        if info.dependencies.is_empty() {
            let _ = writeln!(out, "{path} >");
        } else {
            let _ = writeln!(out, "{path} > {}", info.dependencies.join(","));
        }

        for func in &info.functions {
            let _ = writeln!(out, "  fn {}", format_func_sig(func));
        }
        for class in &info.classes {
            let _ = writeln!(out, "  cl {}", format_class_sig(class));
        }
        for constant in &info.constants {
            let _ = writeln!(out, "  cn {}", format_const_sig(constant));
        }
    }

    out
}
