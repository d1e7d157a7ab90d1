//! 改写：与扫描同一套判定，把命中的字面量换成符号引用，必要时补一条 `import <pkg>.R;`

use std::path::{Path, PathBuf};

use crate::backend::edit::EditBuffer;
use crate::error::ConflictingEditError;
use crate::frontend::ast::SourceUnit;
use crate::frontend::token::TokenKind;
use crate::middle::policy::AmbiguityPolicy;
use crate::middle::scan::classify;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteOptions {
    /// 至少替换一处时，在 package 声明后插入 `import <pkg>.R;`
    pub inject_import: bool,
    /// 引用写成 `<pkg>.R.id.x` 而不是 `R.id.x`
    pub qualify: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteResult {
    pub path: PathBuf,
    pub replacement_count: usize,
    pub text: String,
}

impl RewriteResult {
    #[inline]
    pub fn changed(&self) -> bool { self.replacement_count > 0 }
}

/// 改写一个文件。没有任何命中时输出与输入逐字节相同。
pub fn rewrite(
    path: &Path,
    unit: &SourceUnit,
    policy: &AmbiguityPolicy<'_>,
    options: RewriteOptions,
) -> Result<RewriteResult, ConflictingEditError> {
    let table = policy.table();
    let package = table.package();
    let qualifier = options.qualify.then_some(package);

    let mut buf = EditBuffer::new(&unit.tokens);
    let hits = classify(unit, policy);
    for hit in &hits {
        let tok = hit.literal.token;
        buf.replace(tok..tok + 1, hit.entry.reference(qualifier))?;
    }

    // 同包内 R 本来就可见
    let needs_import = options.inject_import
        && !hits.is_empty()
        && unit.package.as_ref().is_none_or(|decl| decl.name != package)
        && !unit.imports.iter().any(|imp| imp.covers_r_of(package));
    if needs_import {
        match &unit.package {
            Some(decl) => buf.insert_before(decl.end, format!("\n\nimport {}.R;", package))?,
            None => {
                // BOM 必须留在文件最前面
                let at = usize::from(!unit.tokens.is_empty() && unit.tokens.kind(0) == TokenKind::Bom);
                buf.insert_before(at, format!("import {}.R;\n\n", package))?
            }
        }
    }

    Ok(RewriteResult {
        path: path.to_path_buf(),
        replacement_count: hits.len(),
        text: buf.materialize(&unit.tokens),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::{parse_declaration, parse_source};
    use crate::frontend::span::FileId;
    use crate::middle::policy::HintTable;
    use crate::middle::scan::scan;
    use crate::middle::symbols::{build_symbol_table, SymbolTable};
    use pretty_assertions::assert_eq;

    const R_JAVA: &str = "package com.example.app;\n\
        public final class R {\n\
            public static final class id { public static final int button_send = 2131165184; }\n\
            public static final class layout { public static final int main = 0x7f0b0001; }\n\
            public static final class styleable {\n\
                public static final int[] Foo = { 0, 1 };\n\
                public static final int Foo_bar = 1;\n\
            }\n\
        }\n";

    fn table() -> SymbolTable {
        build_symbol_table(&parse_declaration(R_JAVA, FileId(0)).unwrap()).unwrap()
    }

    fn run(src: &str, options: RewriteOptions) -> RewriteResult {
        let t = table();
        let hints = HintTable::default();
        let policy = AmbiguityPolicy::new(&t, &hints);
        let unit = parse_source(src, FileId(1)).unwrap();
        rewrite(Path::new("A.java"), &unit, &policy, options).unwrap()
    }

    #[test]
    fn substitutes_scalar_ids() {
        let src = "package com.example.ui;\n\nclass A {\n    void f(View view) {\n        view.findViewById(2131165184);\n    }\n}\n";
        let out = run(src, RewriteOptions::default());
        assert_eq!(out.replacement_count, 1);
        assert_eq!(
            out.text,
            "package com.example.ui;\n\nclass A {\n    void f(View view) {\n        view.findViewById(R.id.button_send);\n    }\n}\n"
        );
        assert_eq!(out.path, PathBuf::from("A.java"));
    }

    #[test]
    fn untouched_files_are_byte_identical() {
        let src = "package x;\r\n// 0 1 2131165184\r\nclass A { int a = 0, b = 1; int[] c = {0, 1}; String s = \"2131165184\"; }\r\n";
        let out = run(src, RewriteOptions { inject_import: true, qualify: false });
        assert_eq!(out.replacement_count, 0);
        assert_eq!(out.text, src);
        assert!(!out.changed());
    }

    #[test]
    fn injects_import_once_after_package() {
        let src = "package com.example.ui;\n\nimport android.view.View;\n\nclass A { void f() { a(2131165184); b(0x7f0b0001); } }\n";
        let out = run(src, RewriteOptions { inject_import: true, qualify: false });
        assert_eq!(out.replacement_count, 2);
        assert_eq!(
            out.text,
            "package com.example.ui;\n\nimport com.example.app.R;\n\nimport android.view.View;\n\nclass A { void f() { a(R.id.button_send); b(R.layout.main); } }\n"
        );
        assert_eq!(out.text.matches("import com.example.app.R;").count(), 1);
    }

    #[test]
    fn injects_import_at_top_without_package() {
        let out = run("class A { int x = 2131165184; }", RewriteOptions { inject_import: true, qualify: false });
        assert_eq!(out.text, "import com.example.app.R;\n\nclass A { int x = R.id.button_send; }");
    }

    #[test]
    fn skips_import_when_already_visible() {
        let src = "package q;\nimport com.example.app.R;\nclass A { int x = 2131165184; }";
        let out = run(src, RewriteOptions { inject_import: true, qualify: false });
        assert_eq!(out.text, "package q;\nimport com.example.app.R;\nclass A { int x = R.id.button_send; }");

        let src = "package q;\nimport com.example.app.*;\nclass A { int x = 2131165184; }";
        let out = run(src, RewriteOptions { inject_import: true, qualify: false });
        assert!(!out.text.contains("import com.example.app.R;"));
    }

    #[test]
    fn same_package_needs_no_import() {
        let src = "package com.example.app;\n\nclass A { int x = 2131165184; }\n";
        let out = run(src, RewriteOptions { inject_import: true, qualify: false });
        assert_eq!(out.text, "package com.example.app;\n\nclass A { int x = R.id.button_send; }\n");
    }

    #[test]
    fn import_goes_after_a_leading_bom() {
        let opts = RewriteOptions { inject_import: true, qualify: false };
        let out = run("\u{FEFF}package com.example.ui;\n\nclass A { int x = 2131165184; }\n", opts);
        assert_eq!(
            out.text,
            "\u{FEFF}package com.example.ui;\n\nimport com.example.app.R;\n\nclass A { int x = R.id.button_send; }\n"
        );

        let out = run("\u{FEFF}class A { int x = 2131165184; }", opts);
        assert_eq!(out.text, "\u{FEFF}import com.example.app.R;\n\nclass A { int x = R.id.button_send; }");
    }

    #[test]
    fn negative_literal_after_cast_is_left_alone() {
        let src = "class A { int x = (int) -2131165184; }";
        let out = run(src, RewriteOptions::default());
        assert_eq!(out.replacement_count, 0);
        assert_eq!(out.text, src);
    }

    #[test]
    fn qualified_references_carry_the_package() {
        let out = run("class A { int x = 2131165184; }", RewriteOptions { inject_import: false, qualify: true });
        assert_eq!(out.text, "class A { int x = com.example.app.R.id.button_send; }");
    }

    #[test]
    fn styleable_indices_are_left_alone() {
        let src = "class A { void f(TypedArray a) { a.getString(0); a.getInt(1, 0); int[] x = {0, 1}; } }";
        let out = run(src, RewriteOptions::default());
        assert_eq!(out.replacement_count, 0);
        assert_eq!(out.text, src);
    }

    #[test]
    fn rewriting_twice_changes_nothing_more() {
        let t = table();
        let hints = HintTable::default();
        let policy = AmbiguityPolicy::new(&t, &hints);
        let opts = RewriteOptions { inject_import: true, qualify: false };
        let src = "package z;\nclass A { void f() { setContentView(0x7f0b0001); findViewById(2131165184); } }\n";

        let first = rewrite(Path::new("A.java"), &parse_source(src, FileId(1)).unwrap(), &policy, opts).unwrap();
        assert_eq!(first.replacement_count, 2);

        let again = parse_source(&first.text, FileId(2)).unwrap();
        assert_eq!(scan(&again, &policy).count, 0);
        let second = rewrite(Path::new("A.java"), &again, &policy, opts).unwrap();
        assert_eq!(second.replacement_count, 0);
        assert_eq!(second.text, first.text);
    }

    #[test]
    fn scan_and_rewrite_agree() {
        let t = table();
        let hints = HintTable::default();
        let policy = AmbiguityPolicy::new(&t, &hints);
        let src = "class A { int a = 2131165184; long b = 2131165184L; int c = -2131165184; int d = 0x7f0b0001; }";
        let unit = parse_source(src, FileId(1)).unwrap();
        let counted = scan(&unit, &policy).count;
        let rewritten = rewrite(Path::new("A.java"), &unit, &policy, RewriteOptions::default()).unwrap();
        assert_eq!(counted, 2);
        assert_eq!(rewritten.replacement_count, counted);
    }
}
