/// 把源文本切成无损 token 流。
///
/// 只有未闭合的字符串、字符、文本块和块注释会失败，其余任何字符都能落到某个 token 里。
pub fn lex(src: &str, file: FileId) -> Result<TokenStream, ParseError> {
    let mut pairs = JavaParser::parse(Rule::token_stream, src).map_err(|e| {
        let span = pest_error_span(&e, file);
        ParseError::new(e.variant.message().to_string(), Some(span))
    })?;
    let root = pairs
        .next()
        .ok_or_else(|| ParseError::new("empty token stream", None))?;

    let mut tokens = Vec::new();
    for p in root.into_inner() {
        let kind = match p.as_rule() {
            Rule::bom           => TokenKind::Bom,
            Rule::ws            => TokenKind::Whitespace,
            Rule::line_comment  => TokenKind::LineComment,
            Rule::block_comment => TokenKind::BlockComment,
            Rule::string_lit    => TokenKind::Str,
            Rule::text_block    => TokenKind::TextBlock,
            Rule::char_lit      => TokenKind::Char,
            Rule::int_lit       => TokenKind::Int,
            Rule::float_lit     => TokenKind::Float,
            Rule::ident         => TokenKind::Ident,
            Rule::punct         => TokenKind::Punct,
            Rule::unknown       => TokenKind::Unknown,
            Rule::unterminated  => {
                let sp = sp_of(&p, file);
                return Err(ParseError::new(describe_lex_failure(src, sp.start), Some(sp)));
            }
            Rule::EOI           => continue,
            other => {
                return Err(ParseError::new(
                    format!("token stream: unexpected node {:?}", other),
                    Some(sp_of(&p, file)),
                ))
            }
        };
        tokens.push(Token { kind, span: sp_of(&p, file) });
    }

    Ok(TokenStream::new(src.to_string(), tokens))
}
