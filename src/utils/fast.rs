// src/utils/fast.rs

//! “快表”工具集：默认用 `hashbrown + AHash`，整型键使用 `nohash-hasher` 零哈希。
//!
//! 符号表按资源 id 查找是热路径（每个整数字面量一次），所以值 -> 条目用 `IntMap`。

pub use ahash::RandomState as AHashBuilder;
pub use smallvec::SmallVec;

/// hashbrown + AHash
pub type FastMap<K, V> = hashbrown::HashMap<K, V, AHashBuilder>;
/// hashbrown + AHash
pub type FastSet<K>    = hashbrown::HashSet<K, AHashBuilder>;

/// 新建空 `FastMap`
#[inline]
pub fn fast_map<K, V>() -> FastMap<K, V> {
    FastMap::with_hasher(AHashBuilder::default())
}

/// 新建空 `FastSet`
#[inline]
pub fn fast_set<K>() -> FastSet<K> {
    FastSet::with_hasher(AHashBuilder::default())
}

/// `nohash-hasher` 的构建器（Key 自身即散列）
pub type IntBuild<K> = nohash_hasher::BuildNoHashHasher<K>;

/// 适用于 `i32/u32/usize` 等整型键
pub type IntMap<K, V> = hashbrown::HashMap<K, V, IntBuild<K>>;

/// 新建空 `IntMap`
#[inline]
pub fn int_map<K, V>() -> IntMap<K, V> {
    IntMap::with_hasher(IntBuild::<K>::default())
}

/// 常用模板：最多 2/4 个元素时不分配堆内存
pub type SmallVec2<T> = SmallVec<[T; 2]>;
pub type SmallVec4<T> = SmallVec<[T; 4]>;
