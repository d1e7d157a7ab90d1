//! 歧义策略：一个整数字面量到底是不是资源 id，是的话是哪一个
//!
//! 规则按顺序：
//! 1. 数组元素不作为裸字面量的替换目标；只有字面量恰好是数组初始化器第 i 个元素、
//!    且没有任何标量候选时，才考虑下标同为 i 的数组元素
//! 2. 值必须落在标量条目实际使用的打包 id 空间里
//! 3. 多个候选时优先匹配调用点提示的分类，否则取最先声明的，并标记为歧义
//! 4. 没有候选则不动

use crate::frontend::ast::LiteralContext;
use crate::middle::symbols::{ResourceEntry, SymbolTable};
use crate::utils::fast::{fast_map, FastMap, SmallVec2};

/// 方法名 -> 资源分类。`findViewById(x)` 里的 x 更可能是 `id`。
#[derive(Clone, Debug)]
pub struct HintTable {
    map: FastMap<String, String>,
}

impl Default for HintTable {
    fn default() -> Self { Self::android_defaults() }
}

impl HintTable {
    pub fn empty() -> Self {
        Self { map: fast_map() }
    }

    /// 常用 Android API 的默认提示
    pub fn android_defaults() -> Self {
        const DEFAULTS: &[(&str, &str)] = &[
            ("findViewById", "id"),
            ("requireViewById", "id"),
            ("setId", "id"),
            ("setContentView", "layout"),
            ("inflate", "layout"),
            ("getLayout", "layout"),
            ("getString", "string"),
            ("getText", "string"),
            ("setText", "string"),
            ("setTitle", "string"),
            ("setHint", "string"),
            ("makeText", "string"),
            ("getQuantityString", "plurals"),
            ("getDrawable", "drawable"),
            ("setImageResource", "drawable"),
            ("setBackgroundResource", "drawable"),
            ("setIcon", "drawable"),
            ("getColor", "color"),
            ("getColorStateList", "color"),
            ("getDimension", "dimen"),
            ("getDimensionPixelSize", "dimen"),
            ("getDimensionPixelOffset", "dimen"),
            ("getInteger", "integer"),
            ("getBoolean", "bool"),
            ("getStringArray", "array"),
            ("getIntArray", "array"),
            ("obtainTypedArray", "array"),
            ("loadAnimation", "anim"),
            ("getXml", "xml"),
            ("openRawResource", "raw"),
            ("getFont", "font"),
            ("setTheme", "style"),
        ];
        let mut t = Self::empty();
        for (method, category) in DEFAULTS {
            t.insert(*method, *category);
        }
        t
    }

    pub fn insert<M: Into<String>, C: Into<String>>(&mut self, method: M, category: C) {
        self.map.insert(method.into(), category.into());
    }

    pub fn category_for(&self, method: &str) -> Option<&str> {
        self.map.get(method).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.map.len() }
    pub fn is_empty(&self) -> bool { self.map.is_empty() }
}

#[derive(Clone, Debug, Default)]
pub struct Resolution<'a> {
    /// Some = 替换成这个条目；None = 原样保留
    pub entry: Option<&'a ResourceEntry>,
    /// 多个候选，按提示或声明顺序选出了一个
    pub ambiguous: bool,
    /// 参与选择的全部候选（声明顺序）
    pub candidates: SmallVec2<&'a ResourceEntry>,
}

impl<'a> Resolution<'a> {
    #[inline]
    pub fn is_match(&self) -> bool { self.entry.is_some() }
}

/// 扫描与改写共用的唯一判定入口
#[derive(Clone, Copy, Debug)]
pub struct AmbiguityPolicy<'a> {
    table: &'a SymbolTable,
    hints: &'a HintTable,
}

impl<'a> AmbiguityPolicy<'a> {
    pub fn new(table: &'a SymbolTable, hints: &'a HintTable) -> Self {
        Self { table, hints }
    }

    #[inline] pub fn table(&self) -> &'a SymbolTable { self.table }

    /// `value` 为 None 表示 long 或越界字面量
    pub fn resolve(&self, value: Option<i32>, ctx: &LiteralContext) -> Resolution<'a> {
        let Some(value) = value else { return Resolution::default() };
        if ctx.negated || !self.table.id_space().contains(value) {
            return Resolution::default();
        }

        let mut pool: SmallVec2<&'a ResourceEntry> =
            self.table.candidates(value).filter(|e| !e.is_array_element()).collect();
        if pool.is_empty() {
            if let Some(i) = ctx.array_index {
                pool = self
                    .table
                    .candidates(value)
                    .filter(|e| e.array_index == Some(i as u32))
                    .collect();
            }
        }

        match pool.len() {
            0 => Resolution::default(),
            1 => Resolution { entry: Some(pool[0]), ambiguous: false, candidates: pool },
            _ => {
                let hinted = ctx
                    .callee
                    .as_deref()
                    .and_then(|callee| self.hints.category_for(callee))
                    .and_then(|cat| pool.iter().copied().find(|e| e.category() == cat));
                let chosen = hinted.unwrap_or(pool[0]);
                Resolution { entry: Some(chosen), ambiguous: true, candidates: pool }
            }
        }
    }
}
