//! 符号表：资源整数值 -> 符号名的反向索引
//!
//! 同一个值可以对应多个声明（不同分类恰好打包成同一个 id，或者数组元素和标量重合），
//! 所以每个值挂的是按声明顺序排列的条目集合，而不是单个条目。

use crate::error::MalformedDeclarationError;
use crate::frontend::ast::{DeclarationFile, FieldDecl, Initializer, IntLit, TypeDecl};
use crate::frontend::literal::parse_int32;
use crate::utils::fast::{fast_set, int_map, IntMap, SmallVec2, SmallVec4};

/// 条目在 `SymbolTable::entries` 中的下标，也就是声明顺序
pub type EntryId = u32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceEntry {
    pub value: i32,
    /// `id.button_send` / `styleable.Foo[2]`
    pub qualified_name: String,
    /// 数组元素的下标；标量为 None
    pub array_index: Option<u32>,
}

impl ResourceEntry {
    #[inline]
    pub fn is_array_element(&self) -> bool { self.array_index.is_some() }

    /// 资源分类（`id`、`string`、`styleable`……）
    pub fn category(&self) -> &str {
        self.qualified_name
            .split_once('.')
            .map_or(self.qualified_name.as_str(), |(cat, _)| cat)
    }

    /// 替换进源码的表达式：`R.id.x`，或带包名的 `com.example.R.id.x`
    pub fn reference(&self, package: Option<&str>) -> String {
        match package {
            Some(pkg) => format!("{}.R.{}", pkg, self.qualified_name),
            None => format!("R.{}", self.qualified_name),
        }
    }
}

/// 标量条目实际占用的打包 id 空间（`0xPPTTEEEE`）。
///
/// 高字节为 0 的值（例如 styleable 的下标常量）不算打包 id，不参与范围统计。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdSpace {
    packages: SmallVec4<u8>,
    min: u32,
    max: u32,
}

impl IdSpace {
    #[inline]
    pub fn package_of(value: i32) -> u8 { ((value as u32) >> 24) as u8 }

    #[inline]
    pub fn is_packed(value: i32) -> bool { Self::package_of(value) != 0 }

    fn observe(&mut self, value: i32) {
        if !Self::is_packed(value) {
            return;
        }
        let v = value as u32;
        if self.packages.is_empty() {
            self.min = v;
            self.max = v;
        } else {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        let pkg = Self::package_of(value);
        if !self.packages.contains(&pkg) {
            self.packages.push(pkg);
        }
    }

    pub fn is_empty(&self) -> bool { self.packages.is_empty() }

    /// 值是否落在观测到的 id 空间内（包字节已出现过，且在 [min, max] 之间）
    pub fn contains(&self, value: i32) -> bool {
        let v = value as u32;
        !self.is_empty()
            && self.packages.contains(&Self::package_of(value))
            && self.min <= v
            && v <= self.max
    }

    pub fn packages(&self) -> &[u8] { &self.packages }
    pub fn bounds(&self) -> Option<(u32, u32)> {
        if self.is_empty() { None } else { Some((self.min, self.max)) }
    }
}

#[derive(Clone, Debug)]
pub struct SymbolTable {
    package: String,
    entries: Vec<ResourceEntry>,
    by_value: IntMap<i32, SmallVec2<EntryId>>,
    id_space: IdSpace,
}

impl SymbolTable {
    #[inline] pub fn package(&self) -> &str { &self.package }
    #[inline] pub fn len(&self) -> usize { self.entries.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    #[inline] pub fn entries(&self) -> &[ResourceEntry] { &self.entries }
    #[inline] pub fn id_space(&self) -> &IdSpace { &self.id_space }

    #[inline]
    pub fn entry(&self, id: EntryId) -> &ResourceEntry { &self.entries[id as usize] }

    /// 与 `value` 相等的全部条目，按声明顺序
    pub fn candidates(&self, value: i32) -> impl Iterator<Item = &ResourceEntry> + '_ {
        self.by_value
            .get(&value)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .map(move |&id| self.entry(id))
    }

    /// `0X7F0A0012 = id.button_send`，按声明顺序
    pub fn dump(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| format!("0X{:X} = {}", e.value as u32, e.qualified_name))
            .collect()
    }

    fn push(&mut self, value: i32, qualified_name: String, array_index: Option<u32>) {
        let id = self.entries.len() as EntryId;
        if array_index.is_none() {
            self.id_space.observe(value);
        }
        self.entries.push(ResourceEntry { value, qualified_name, array_index });
        self.by_value.entry(value).or_default().push(id);
    }
}

/// 从 R.java 的语法树构建符号表。
///
/// 外层类的每个内部类是一个资源分类；分类内只允许 `int` 和 `int[]` 字段，
/// 初始化器必须是整数字面量（或整数字面量数组），不做常量折叠。
pub fn build_symbol_table(decl: &DeclarationFile) -> Result<SymbolTable, MalformedDeclarationError> {
    let package = decl
        .package
        .as_ref()
        .map(|p| p.name.clone())
        .ok_or(MalformedDeclarationError::MissingPackage)?;

    let mut table = SymbolTable {
        package,
        entries: Vec::new(),
        by_value: int_map(),
        id_space: IdSpace::default(),
    };
    let mut seen = fast_set::<String>();

    for field in &decl.class.fields {
        tracing::warn!(field = %field.name, class = %decl.class.name, "ignoring field declared outside a resource category");
    }

    for category in &decl.class.nested {
        if let Some(inner) = category.nested.first() {
            return Err(MalformedDeclarationError::NestedCategory {
                category: category.name.clone(),
                nested: inner.name.clone(),
                span: inner.span,
            });
        }
        for field in &category.fields {
            let base = format!("{}.{}", category.name, field.name);
            if !seen.insert(base.clone()) {
                return Err(MalformedDeclarationError::Duplicate { name: base, span: field.span });
            }
            add_field(&mut table, category, field, base)?;
        }
    }

    tracing::debug!(
        package = %table.package,
        entries = table.entries.len(),
        distinct_values = table.by_value.len(),
        "built symbol table"
    );
    Ok(table)
}

fn add_field(
    table: &mut SymbolTable,
    category: &TypeDecl,
    field: &FieldDecl,
    base: String,
) -> Result<(), MalformedDeclarationError> {
    let expected = if field.is_array { "int[]" } else { "int" };
    if field.ty != expected {
        return Err(MalformedDeclarationError::UnsupportedType {
            category: category.name.clone(),
            field: field.name.clone(),
            ty: field.ty.clone(),
            span: field.span,
        });
    }

    let eval = |lit: &IntLit| {
        parse_int32(&lit.text, lit.negated).map_err(|source| MalformedDeclarationError::BadLiteral {
            category: category.name.clone(),
            field: field.name.clone(),
            source,
            span: lit.span,
        })
    };

    match (&field.init, field.is_array) {
        (Initializer::Int(lit), false) => {
            let value = eval(lit)?;
            table.push(value, base, None);
        }
        (Initializer::Array(items), true) => {
            for (i, lit) in items.iter().enumerate() {
                let value = eval(lit)?;
                table.push(value, format!("{}[{}]", base, i), Some(i as u32));
            }
        }
        (init, _) => {
            let found = match init {
                Initializer::Int(lit) => lit.to_string(),
                Initializer::Array(_) => "{ ... }".to_string(),
                Initializer::Other { text, .. } => text.clone(),
            };
            return Err(MalformedDeclarationError::NotLiteral {
                category: category.name.clone(),
                field: field.name.clone(),
                found,
                span: init.span().unwrap_or(field.span),
            });
        }
    }
    Ok(())
}
