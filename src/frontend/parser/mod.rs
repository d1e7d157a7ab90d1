use crate::error::{pest_error_span, MalformedDeclarationError, ParseError};
use crate::frontend::ast::*;
use crate::frontend::literal::parse_int32;
use crate::frontend::span::{FileId, Span};
use crate::frontend::token::{Token, TokenKind, TokenStream};
use pest::iterators::Pair;
use pest::Parser;

include!("lexer.rs");
include!("declaration.rs");
include!("source.rs");
include!("util.rs");

#[derive(pest_derive::Parser)]
#[grammar = "grammar/java.pest"]
pub struct JavaParser;
