#[inline]
fn sp_of(rule: &Pair<Rule>, file: FileId) -> Span {
    Span::from_pest(rule.as_span(), file)
}

/// 这些关键字后面的 `(` 不是方法调用
const NON_CALL_KEYWORDS: &[&str] = &[
    "if", "while", "for", "switch", "catch", "synchronized", "return", "throw", "assert", "case", "try",
];

/// 这些关键字后面出现的 `-` 一定是一元负号
const PREFIX_KEYWORDS: &[&str] = &[
    "return", "case", "throw", "yield", "else", "do", "assert", "new",
];

/// token 是否可以作为表达式的结尾（用于区分一元负号和减号）
fn is_operand_end(tokens: &TokenStream, i: usize) -> bool {
    match tokens.kind(i) {
        TokenKind::Int | TokenKind::Float | TokenKind::Str | TokenKind::TextBlock | TokenKind::Char => true,
        TokenKind::Ident => !PREFIX_KEYWORDS.contains(&tokens.text(i)),
        TokenKind::Punct => matches!(tokens.text(i), ")" | "]" | "++" | "--"),
        _ => false,
    }
}

/// Java 里只有基本类型的强转后面能直接跟一元 `+`/`-`
const PRIMITIVE_TYPES: &[&str] = &["byte", "short", "char", "int", "long", "float", "double"];

/// `sig[j]` 是否是 `(int)` 这类基本类型强转的右括号
fn closes_primitive_cast(tokens: &TokenStream, sig: &[usize], j: usize) -> bool {
    j >= 2
        && tokens.text(sig[j]) == ")"
        && tokens.kind(sig[j - 1]) == TokenKind::Ident
        && PRIMITIVE_TYPES.contains(&tokens.text(sig[j - 1]))
        && tokens.text(sig[j - 2]) == "("
}

/// pest 报错时给出更可读的信息：未闭合的字符串 / 字符 / 注释
fn describe_lex_failure(src: &str, pos: usize) -> String {
    let rest = src.get(pos..).unwrap_or("");
    if rest.starts_with("\"\"\"") {
        "unterminated text block".to_string()
    } else if rest.starts_with('"') {
        "unterminated string literal".to_string()
    } else if rest.starts_with('\'') {
        "unterminated or empty character literal".to_string()
    } else if rest.starts_with("/*") {
        "unterminated block comment".to_string()
    } else {
        "unrecognized input".to_string()
    }
}
