//! Compact Formatters (component J) — deterministic, token-efficient
//! textual representations of a [`ProjectIndex`]. None of these mutate the
//! index; all operate on borrowed data and build a `String`.

mod dsl;
mod graph;
mod markdown;

pub use dsl::format_dsl;
pub use graph::format_graph;
pub use markdown::format_markdown;

use crate::model::ProjectIndex;

/// Files at or below this count render as [`format_dsl`]; above it, the
/// more terse [`format_graph`] is used. A single fixed threshold, per the
/// policy this crate implements.
pub const AUTO_DSL_THRESHOLD: usize = 2000;

/// Picks DSL for small-to-medium projects and Graph for large ones.
pub fn format_auto(index: &ProjectIndex) -> String {
    if index.nodes.len() <= AUTO_DSL_THRESHOLD {
        format_dsl(index)
    } else {
        format_graph(index)
    }
}

/// Size/compression comparison between the raw JSON index and a rendered
/// compact form.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionStats {
    pub original_size: usize,
    pub compressed_size: usize,
    #[serde(rename = "reductionPct")]
    pub reduction_pct: f64,
    pub estimated_tokens: u64,
}

/// Compares `len(compact_json(index))` against `len(formatted)`.
pub fn compression_stats(index: &ProjectIndex, formatted: &str) -> CompressionStats {
    let original_size = serde_json::to_string(index).map(|s| s.len()).unwrap_or(0);
    let compressed_size = formatted.len();
    let reduction_pct = if original_size == 0 {
        0.0
    } else {
        (1.0 - compressed_size as f64 / original_size as f64) * 100.0
    };
    let estimated_tokens = (compressed_size as f64 / 3.5).round() as u64;
    CompressionStats { original_size, compressed_size, reduction_pct, estimated_tokens }
}

/// Strips a leading `src/` segment and any supported source extension —
/// the path-shortening rule shared by the Graph formatter.
pub(crate) fn short_path(path: &str) -> String {
    let trimmed = path.strip_prefix("src/").unwrap_or(path);
    for ext in crate::discovery::SUPPORTED_EXTENSIONS {
        let suffix = format!(".{ext}");
        if let Some(stripped) = trimmed.strip_suffix(&suffix) {
            return stripped.to_string();
        }
    }
    trimmed.to_string()
}

/// `name:type` with `?` standing in for a missing type annotation.
pub(crate) fn format_param(param: &crate::model::Param) -> String {
    format!("{}:{}", param.name, param.type_.as_deref().unwrap_or("?"))
}

/// `name(p1:t1,p2:t2):returnType[ async]`.
pub(crate) fn format_func_sig(func: &crate::model::FuncSig) -> String {
    let params = func.params.iter().map(format_param).collect::<Vec<_>>().join(",");
    let ret = func.return_type.as_deref().unwrap_or("?");
    let suffix = if func.is_async { " async" } else { "" };
    format!("{}({params}):{ret}{suffix}", func.name)
}

/// `Name(<methods>m,<properties>p)[ extends Base]`.
pub(crate) fn format_class_sig(class: &crate::model::ClassInfo) -> String {
    let counts = format!("{}m,{}p", class.methods.len(), class.properties.len());
    match &class.extends {
        Some(base) => format!("{}({counts}) extends {base}", class.name),
        None => format!("{}({counts})", class.name),
    }
}

/// `NAME:type`.
pub(crate) fn format_const_sig(constant: &crate::model::ConstInfo) -> String {
    format!("{}:{}", constant.name, constant.type_.as_deref().unwrap_or("?"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_path_strips_src_prefix_and_extension() {
        assert_eq!(short_path("src/components/Button.tsx"), "components/Button");
        assert_eq!(short_path("docs/readme.ts"), "docs/readme");
        assert_eq!(short_path("lib/plain.txt"), "lib/plain.txt");
    }
}
