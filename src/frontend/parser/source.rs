/* ================================
 * 候选源文件入口
 * ================================ */

/// 括号栈帧：用于给整数字面量标注所处环境
#[derive(Debug)]
enum Frame {
    /// `name(`：方法调用 / 构造调用
    Call(Option<String>),
    /// 其它 `(`：分组、强转、if 条件……
    Paren,
    /// `{`；`array` 表示数组初始化器，`index` 为当前元素序号
    Brace { array: bool, index: usize },
    Bracket,
}

impl Frame {
    fn is_paren(&self) -> bool { matches!(self, Frame::Call(_) | Frame::Paren) }
    fn is_brace(&self) -> bool { matches!(self, Frame::Brace { .. }) }
    fn is_bracket(&self) -> bool { matches!(self, Frame::Bracket) }
}

/// 关闭最近一个满足条件的帧；找不到就忽略（不平衡的括号不影响回放）
fn close_frame(stack: &mut Vec<Frame>, is_match: fn(&Frame) -> bool) {
    if let Some(pos) = stack.iter().rposition(is_match) {
        stack.truncate(pos);
    }
}

/// 解析候选源文件：词法 + package/import + 每个整数字面量的环境。
pub fn parse_source(src: &str, file: FileId) -> Result<SourceUnit, ParseError> {
    let tokens = lex(src, file)?;
    let sig = tokens.significant();

    let mut cursor = 0usize;
    let package = parse_package_decl(&tokens, &sig, &mut cursor)?;
    let imports = parse_import_decls(&tokens, &sig, &mut cursor)?;
    let literals = collect_literals(&tokens, &sig);

    Ok(SourceUnit { file, tokens, package, imports, literals })
}

/// 读一个以 `;` 结尾的点分名字，返回 (名字, 是否以 `.*` 结尾, `;` 的 sig 位置)
fn read_dotted_name(
    tokens: &TokenStream,
    sig: &[usize],
    mut k: usize,
    what: &str,
) -> Result<(String, bool, usize), ParseError> {
    let start_span = sig.get(k).map(|&i| tokens.tokens()[i].span);
    let mut name = String::new();
    let mut wildcard = false;
    while let Some(&i) = sig.get(k) {
        let text = tokens.text(i);
        match tokens.kind(i) {
            TokenKind::Punct if text == ";" => {
                if name.is_empty() {
                    return Err(ParseError::new(format!("{} declaration has no name", what), start_span));
                }
                return Ok((name, wildcard, k));
            }
            TokenKind::Ident if !name.is_empty() && !name.ends_with('.') => {
                return Err(ParseError::new(
                    format!("{} declaration is missing `;`", what),
                    Some(tokens.tokens()[i].span),
                ))
            }
            TokenKind::Ident => name.push_str(text),
            TokenKind::Punct if text == "." => name.push('.'),
            TokenKind::Punct if text == "*" => wildcard = true,
            _ => {
                return Err(ParseError::new(
                    format!("unexpected `{}` in {} declaration", text, what),
                    Some(tokens.tokens()[i].span),
                ))
            }
        }
        k += 1;
    }
    Err(ParseError::new(format!("{} declaration is missing `;`", what), start_span))
}

fn parse_package_decl(
    tokens: &TokenStream,
    sig: &[usize],
    cursor: &mut usize,
) -> Result<Option<PackageDecl>, ParseError> {
    // package-info.java 里 package 前可以有注解；普通源文件里注解后面是类型声明
    let mut k = *cursor;
    while sig.get(k).is_some_and(|&i| tokens.text(i) == "@") {
        k = skip_annotation(tokens, sig, k);
    }
    let Some(&kw) = sig.get(k) else { return Ok(None) };
    if tokens.kind(kw) != TokenKind::Ident || tokens.text(kw) != "package" {
        return Ok(None);
    }

    let (raw, _, semi) = read_dotted_name(tokens, sig, k + 1, "package")?;
    let name = raw.trim_end_matches('.').to_string();
    *cursor = semi + 1;
    Ok(Some(PackageDecl { name, start: kw, end: sig[semi] + 1 }))
}

fn parse_import_decls(
    tokens: &TokenStream,
    sig: &[usize],
    cursor: &mut usize,
) -> Result<Vec<ImportDecl>, ParseError> {
    let mut imports = Vec::new();
    let mut k = *cursor;
    loop {
        // 允许多余的 `;`
        while sig.get(k).is_some_and(|&i| tokens.text(i) == ";") {
            k += 1;
        }
        let Some(&kw) = sig.get(k) else { break };
        if tokens.kind(kw) != TokenKind::Ident || tokens.text(kw) != "import" {
            break;
        }
        k += 1;
        let is_static = sig.get(k).is_some_and(|&i| tokens.text(i) == "static");
        if is_static {
            k += 1;
        }
        let (raw, wildcard, semi) = read_dotted_name(tokens, sig, k, "import")?;
        let path = if wildcard {
            raw.trim_end_matches('.').to_string()
        } else {
            raw
        };
        imports.push(ImportDecl { path, is_static, wildcard });
        k = semi + 1;
    }
    *cursor = k;
    Ok(imports)
}

/// 跳过 `@Name` 或 `@Name(...)`，返回之后的 sig 位置
fn skip_annotation(tokens: &TokenStream, sig: &[usize], mut k: usize) -> usize {
    k += 1; // '@'
    while let Some(&i) = sig.get(k) {
        match (tokens.kind(i), tokens.text(i)) {
            (TokenKind::Ident, _) | (TokenKind::Punct, ".") => k += 1,
            _ => break,
        }
    }
    if sig.get(k).is_some_and(|&i| tokens.text(i) == "(") {
        let mut depth = 0usize;
        while let Some(&i) = sig.get(k) {
            match tokens.text(i) {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        return k + 1;
                    }
                }
                _ => {}
            }
            k += 1;
        }
    }
    k
}

fn collect_literals(tokens: &TokenStream, sig: &[usize]) -> Vec<IntLiteral> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut literals = Vec::new();

    for (k, &i) in sig.iter().enumerate() {
        let prev = if k > 0 { Some(sig[k - 1]) } else { None };
        let kind = tokens.kind(i);
        let text = tokens.text(i);

        match (kind, text) {
            (TokenKind::Punct, "(") => {
                let callee = prev
                    .filter(|&p| tokens.kind(p) == TokenKind::Ident)
                    .map(|p| tokens.text(p))
                    .filter(|name| !NON_CALL_KEYWORDS.contains(name));
                match callee {
                    Some(name) => stack.push(Frame::Call(Some(name.to_string()))),
                    None => stack.push(Frame::Paren),
                }
            }
            (TokenKind::Punct, ")") => close_frame(&mut stack, Frame::is_paren),
            (TokenKind::Punct, "{") => {
                let prev_text = prev.map(|p| tokens.text(p));
                let in_array = matches!(stack.last(), Some(Frame::Brace { array: true, .. }));
                let array = matches!(prev_text, Some("]") | Some("="))
                    || (in_array && matches!(prev_text, Some(",") | Some("{")));
                stack.push(Frame::Brace { array, index: 0 });
            }
            (TokenKind::Punct, "}") => close_frame(&mut stack, Frame::is_brace),
            (TokenKind::Punct, "[") => stack.push(Frame::Bracket),
            (TokenKind::Punct, "]") => close_frame(&mut stack, Frame::is_bracket),
            (TokenKind::Punct, ",") => {
                if let Some(Frame::Brace { array: true, index }) = stack.last_mut() {
                    *index += 1;
                }
            }
            (TokenKind::Int, _) => {
                let negated = prev.is_some_and(|p| tokens.text(p) == "-")
                    && (k < 2
                        || !is_operand_end(tokens, sig[k - 2])
                        || closes_primitive_cast(tokens, sig, k - 2));
                let context = LiteralContext {
                    callee: enclosing_callee(&stack),
                    array_index: match stack.last() {
                        Some(Frame::Brace { array: true, index }) => Some(*index),
                        _ => None,
                    },
                    negated,
                };
                literals.push(IntLiteral {
                    token: i,
                    span: tokens.tokens()[i].span,
                    value: parse_int32(text, false).ok(),
                    context,
                });
            }
            _ => {}
        }
    }

    literals
}

/// 最近的方法调用名；中间隔着分组括号 `((x))` 时继续向外找，遇到其它帧停止
fn enclosing_callee(stack: &[Frame]) -> Option<String> {
    for frame in stack.iter().rev() {
        match frame {
            Frame::Call(name) => return name.clone(),
            Frame::Paren => continue,
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod source_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit(src: &str) -> SourceUnit {
        parse_source(src, FileId(1)).unwrap()
    }

    #[test]
    fn finds_package_and_imports() {
        let u = unit("// header\npackage com.example.ui;\n\nimport android.view.View;\nimport static java.lang.Math.*;\nimport com.example.*;\n\nclass A {}\n");
        let pkg = u.package.as_ref().unwrap();
        assert_eq!(pkg.name, "com.example.ui");
        assert_eq!(u.tokens.text_of(pkg.start, pkg.end), "package com.example.ui;");
        assert_eq!(
            u.imports,
            vec![
                ImportDecl { path: "android.view.View".into(), is_static: false, wildcard: false },
                ImportDecl { path: "java.lang.Math".into(), is_static: true, wildcard: true },
                ImportDecl { path: "com.example".into(), is_static: false, wildcard: true },
            ]
        );
    }

    #[test]
    fn default_package_has_no_decl() {
        let u = unit("class A { int x = 1; }");
        assert!(u.package.is_none());
        assert_eq!(u.literals.len(), 1);
    }

    #[test]
    fn package_without_semicolon_fails() {
        let err = parse_source("package a.b\nclass A {}", FileId(0)).unwrap_err();
        assert!(err.message.contains("package"), "{}", err.message);
    }

    #[test]
    fn records_enclosing_call() {
        let u = unit("class A { void f() { view.findViewById((2131165184)); setText(foo(1), 2); } }");
        let ctx: Vec<_> = u.literals.iter().map(|l| l.context.callee.clone()).collect();
        assert_eq!(
            ctx,
            vec![Some("findViewById".to_string()), Some("foo".to_string()), Some("setText".to_string())]
        );
        assert_eq!(u.literals[0].value, Some(2131165184));
    }

    #[test]
    fn control_keywords_are_not_calls() {
        let u = unit("class A { void f() { if (x == 5) {} } }");
        assert_eq!(u.literals[0].context.callee, None);
    }

    #[test]
    fn records_array_initializer_positions() {
        let u = unit("class A { int[] a = {7, 8, f(9)}; int[] b = new int[] { 1, 2 }; int c = g(new int[]{3}); }");
        let ctx: Vec<_> = u.literals.iter().map(|l| (l.value, l.context.array_index)).collect();
        assert_eq!(
            ctx,
            vec![
                (Some(7), Some(0)),
                (Some(8), Some(1)),
                (Some(9), None),
                (Some(1), Some(0)),
                (Some(2), Some(1)),
                (Some(3), Some(0)),
            ]
        );
    }

    #[test]
    fn method_bodies_are_not_array_initializers() {
        let u = unit("class A { void f() { int x = 4; } }");
        assert_eq!(u.literals[0].context.array_index, None);
    }

    #[test]
    fn detects_unary_minus() {
        let u = unit("class A { int a = -5; int b = c - 6; int d = f(-7); int e = x[1] - 8; }");
        let neg: Vec<_> = u.literals.iter().map(|l| l.context.negated).collect();
        assert_eq!(neg, vec![true, false, true, false, false]);
    }

    #[test]
    fn minus_after_primitive_cast_is_unary() {
        let u = unit("class A { int a = (int) -2131165184; long b = (long)-5; int c = (x) - 6; }");
        let neg: Vec<_> = u.literals.iter().map(|l| l.context.negated).collect();
        assert_eq!(neg, vec![true, true, false]);
    }

    #[test]
    fn bom_does_not_hide_the_package() {
        let u = unit("\u{FEFF}package com.example.ui;\nclass A {}\n");
        assert_eq!(u.package.as_ref().map(|p| p.name.as_str()), Some("com.example.ui"));
    }

    #[test]
    fn long_literals_have_no_int_value() {
        let u = unit("class A { long a = 2131165184L; }");
        assert_eq!(u.literals[0].value, None);
    }
}
