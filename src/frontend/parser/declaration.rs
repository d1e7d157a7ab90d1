/* ================================
 * R.java 入口
 * ================================ */

/// 解析资源常量声明文件（R.java）。
///
/// 这里只负责构树；字段类型、字面量是否合法由建表阶段检查。
pub fn parse_declaration(src: &str, file: FileId) -> Result<DeclarationFile, MalformedDeclarationError> {
    let mut pairs = JavaParser::parse(Rule::declaration_file, src).map_err(|e| {
        MalformedDeclarationError::Syntax {
            message: e.variant.message().to_string(),
            span: Some(pest_error_span(&e, file)),
        }
    })?;
    let root = pairs.next().ok_or_else(|| MalformedDeclarationError::Syntax {
        message: "empty declaration file".to_string(),
        span: None,
    })?;
    debug_assert_eq!(root.as_rule(), Rule::declaration_file);

    let mut package = None;
    let mut imports = Vec::new();
    let mut class = None;
    for it in root.into_inner() {
        match it.as_rule() {
            Rule::package_decl => package = Some(build_named(it, file)?),
            Rule::import_decl  => imports.push(build_named(it, file)?),
            Rule::class_decl   => class = Some(build_class(it, file)?),
            Rule::EOI => {}
            other => return Err(unexpected("declaration_file", other, &it, file)),
        }
    }

    let class = class.ok_or_else(|| MalformedDeclarationError::Syntax {
        message: "declaration file has no class".to_string(),
        span: None,
    })?;
    Ok(DeclarationFile { file, package, imports, class })
}

fn unexpected(ctx: &str, rule: Rule, p: &Pair<Rule>, file: FileId) -> MalformedDeclarationError {
    MalformedDeclarationError::Syntax {
        message: format!("{}: unexpected node {:?}", ctx, rule),
        span: Some(sp_of(p, file)),
    }
}

/// package / import：取其中的 qualified_name
fn build_named(p: Pair<Rule>, file: FileId) -> Result<Named, MalformedDeclarationError> {
    let span = sp_of(&p, file);
    let mut name: Option<String> = None;
    let mut wildcard = false;
    for child in p.clone().into_inner() {
        match child.as_rule() {
            Rule::qualified_name => name = Some(child.as_str().to_string()),
            Rule::annotation | Rule::kw_package | Rule::kw_import | Rule::kw_static => {}
            other => return Err(unexpected("package/import", other, &child, file)),
        }
    }
    if p.as_rule() == Rule::import_decl && p.as_str().trim_end_matches(';').trim_end().ends_with('*') {
        wildcard = true;
    }
    let mut name = name.ok_or_else(|| MalformedDeclarationError::Syntax {
        message: "declaration is missing a name".to_string(),
        span: Some(span),
    })?;
    if wildcard {
        name.push_str(".*");
    }
    Ok(Named { name, span })
}

fn build_class(p: Pair<Rule>, file: FileId) -> Result<TypeDecl, MalformedDeclarationError> {
    let span = sp_of(&p, file);
    let mut name: Option<String> = None;
    let mut fields = Vec::new();
    let mut nested = Vec::new();

    for child in p.into_inner() {
        match child.as_rule() {
            Rule::annotation | Rule::kw_modifier | Rule::kw_class => {}
            Rule::ident      => name = Some(child.as_str().to_string()),
            Rule::class_decl => nested.push(build_class(child, file)?),
            Rule::field_decl => fields.push(build_field(child, file)?),
            other => return Err(unexpected("class_decl", other, &child, file)),
        }
    }

    let name = name.ok_or_else(|| MalformedDeclarationError::Syntax {
        message: "class declaration is missing a name".to_string(),
        span: Some(span),
    })?;
    Ok(TypeDecl { name, fields, nested, span })
}

fn build_field(p: Pair<Rule>, file: FileId) -> Result<FieldDecl, MalformedDeclarationError> {
    let span = sp_of(&p, file);
    let mut ty: Option<String> = None;
    let mut is_array = false;
    let mut name: Option<String> = None;
    let mut init: Option<Initializer> = None;

    for child in p.into_inner() {
        match child.as_rule() {
            Rule::annotation | Rule::kw_modifier => {}
            Rule::field_type => {
                let mut base = String::new();
                for part in child.into_inner() {
                    match part.as_rule() {
                        Rule::ident      => base.push_str(part.as_str()),
                        Rule::array_dims => is_array = true,
                        _ => {}
                    }
                }
                ty = Some(base);
            }
            Rule::ident       => name = Some(child.as_str().to_string()),
            // C 风格：int NAME[] = {...}
            Rule::array_dims  => is_array = true,
            Rule::initializer => init = Some(build_initializer(child, file)?),
            other => return Err(unexpected("field_decl", other, &child, file)),
        }
    }

    let name = name.ok_or_else(|| MalformedDeclarationError::Syntax {
        message: "field declaration is missing a name".to_string(),
        span: Some(span),
    })?;
    let ty = ty.unwrap_or_default();
    let ty = if is_array { format!("{}[]", ty) } else { ty };
    let init = init.ok_or_else(|| MalformedDeclarationError::Syntax {
        message: format!("field `{}` has no initializer", name),
        span: Some(span),
    })?;
    Ok(FieldDecl { name, ty, is_array, init, span })
}

fn build_initializer(p: Pair<Rule>, file: FileId) -> Result<Initializer, MalformedDeclarationError> {
    let span = sp_of(&p, file);
    let inner = p.into_inner().next().ok_or_else(|| MalformedDeclarationError::Syntax {
        message: "empty initializer".to_string(),
        span: Some(span),
    })?;
    match inner.as_rule() {
        Rule::int_value => Ok(Initializer::Int(build_int_value(inner, file)?)),
        Rule::array_init => {
            let mut items = Vec::new();
            for child in inner.into_inner() {
                match child.as_rule() {
                    Rule::int_value => items.push(build_int_value(child, file)?),
                    // `new int[]` 前缀
                    Rule::kw_new | Rule::ident | Rule::array_dims => {}
                    other => return Err(unexpected("array_init", other, &child, file)),
                }
            }
            Ok(Initializer::Array(items))
        }
        Rule::raw_expr => Ok(Initializer::Other {
            text: inner.as_str().trim().to_string(),
            span: sp_of(&inner, file),
        }),
        other => Err(unexpected("initializer", other, &inner, file)),
    }
}

fn build_int_value(p: Pair<Rule>, file: FileId) -> Result<IntLit, MalformedDeclarationError> {
    let span = sp_of(&p, file);
    let mut negated = false;
    let mut text: Option<String> = None;
    for child in p.into_inner() {
        match child.as_rule() {
            Rule::minus   => negated = true,
            Rule::int_lit => text = Some(child.as_str().to_string()),
            other => return Err(unexpected("int_value", other, &child, file)),
        }
    }
    let text = text.ok_or_else(|| MalformedDeclarationError::Syntax {
        message: "missing integer literal".to_string(),
        span: Some(span),
    })?;
    Ok(IntLit { text, negated, span })
}

#[cfg(test)]
mod declaration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const R_JAVA: &str = r#"/* AUTO-GENERATED FILE.  DO NOT MODIFY. */

package com.example.app;

public final class R {
    public static final class id {
        public static final int button_send=0x7f080000;
        public static final int title = 2131230721;
    }
    public static final class styleable {
        public static final int[] Foo = {
            0x7f010000, 0x7f010001
        };
        public static final int Foo_bar = 0;
        public static final int Legacy[] = new int[] { 1, -2 };
    }
}
"#;

    #[test]
    fn builds_nested_categories() {
        let decl = parse_declaration(R_JAVA, FileId(0)).unwrap();
        assert_eq!(decl.package.as_ref().map(|p| p.name.as_str()), Some("com.example.app"));
        assert_eq!(decl.class.name, "R");
        let names: Vec<_> = decl.class.nested.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["id", "styleable"]);

        let id = &decl.class.nested[0];
        assert_eq!(id.fields[0].name, "button_send");
        assert_eq!(id.fields[0].ty, "int");
        assert_eq!(
            id.fields[0].init,
            Initializer::Int(IntLit { text: "0x7f080000".into(), negated: false, span: id.fields[0].init.span().unwrap() })
        );
    }

    #[test]
    fn reads_array_fields_in_both_styles() {
        let decl = parse_declaration(R_JAVA, FileId(0)).unwrap();
        let styleable = &decl.class.nested[1];

        let foo = &styleable.fields[0];
        assert!(foo.is_array);
        assert_eq!(foo.ty, "int[]");
        match &foo.init {
            Initializer::Array(items) => {
                let texts: Vec<_> = items.iter().map(|l| l.to_string()).collect();
                assert_eq!(texts, vec!["0x7f010000", "0x7f010001"]);
            }
            other => panic!("expected array, got {:?}", other),
        }

        let legacy = &styleable.fields[2];
        assert!(legacy.is_array);
        match &legacy.init {
            Initializer::Array(items) => {
                assert_eq!(items.len(), 2);
                assert!(items[1].negated);
            }
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn keeps_non_literal_initializers_for_reporting() {
        let src = "package a;\nclass R { static final class id { static final int x = OTHER + 1; } }";
        let decl = parse_declaration(src, FileId(0)).unwrap();
        match &decl.class.nested[0].fields[0].init {
            Initializer::Other { text, .. } => assert_eq!(text, "OTHER + 1"),
            other => panic!("expected raw initializer, got {:?}", other),
        }
    }

    #[test]
    fn package_is_optional_in_the_grammar() {
        let decl = parse_declaration("class R { }", FileId(0)).unwrap();
        assert!(decl.package.is_none());
    }

    #[test]
    fn garbage_is_a_syntax_error() {
        let err = parse_declaration("package a;\nthis is not java", FileId(0)).unwrap_err();
        assert!(matches!(err, MalformedDeclarationError::Syntax { .. }));
    }
}
