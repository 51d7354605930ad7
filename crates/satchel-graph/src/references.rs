//! Module reference extraction.
//!
//! References are found with pattern matching over the five declaration forms
//! that can pull in another file. No AST is built, so references inside
//! comments or strings that merely look like imports are picked up too.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Syntactic form a reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// `require('./x')`
    Require,
    /// `import a from './x'`, `import { a } from './x'`
    ImportFrom,
    /// `import './x'`
    SideEffectImport,
    /// `import('./x')`
    DynamicImport,
    /// `export * from './x'`, `export { a } from './x'`
    ReExport,
}

/// A textual path extracted from a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleReference {
    pub specifier: String,
    pub kind: ReferenceKind,
}

impl ModuleReference {
    pub fn new(specifier: impl Into<String>, kind: ReferenceKind) -> Self {
        Self {
            specifier: specifier.into(),
            kind,
        }
    }

    /// Relative (`./`, `../`) or absolute (`/`) references point at files.
    pub fn is_path(&self) -> bool {
        self.specifier.starts_with('.') || self.specifier.starts_with('/')
    }

    /// Package-style or host-provided reference, never resolved to a file.
    pub fn is_bare(&self) -> bool {
        !self.is_path()
    }
}

static PATTERNS: LazyLock<[(ReferenceKind, Regex); 5]> = LazyLock::new(|| {
    let compile = |pattern: &str| Regex::new(pattern).expect("reference pattern is valid");
    [
        (
            ReferenceKind::Require,
            compile(r#"\brequire\s*\(\s*['"`]([^'"`\n]+)['"`]\s*\)"#),
        ),
        (
            ReferenceKind::ImportFrom,
            compile(r#"\bimport\s+[\w$*{}\s,]+?\s*\bfrom\s*['"]([^'"\n]+)['"]"#),
        ),
        (
            ReferenceKind::SideEffectImport,
            compile(r#"\bimport\s*['"]([^'"\n]+)['"]"#),
        ),
        (
            ReferenceKind::DynamicImport,
            compile(r#"\bimport\s*\(\s*['"`]([^'"`\n]+)['"`]\s*\)"#),
        ),
        (
            ReferenceKind::ReExport,
            compile(r#"\bexport\s+(?:type\s+)?(?:\*(?:\s+as\s+[\w$]+)?|\{[^}]*\})\s*from\s*['"]([^'"\n]+)['"]"#),
        ),
    ]
});

/// Extract every module reference in `source`.
///
/// Results are grouped by pattern (require, import-from, bare import, dynamic
/// import, re-export) and in source order within a group. Duplicates are kept.
pub fn extract_references(source: &str) -> Vec<ModuleReference> {
    let mut references = Vec::new();
    for (kind, pattern) in PATTERNS.iter() {
        for captures in pattern.captures_iter(source) {
            if let Some(specifier) = captures.get(1) {
                references.push(ModuleReference::new(specifier.as_str(), *kind));
            }
        }
    }
    references
}
