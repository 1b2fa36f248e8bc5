//! Closed enumerations used by class metadata.
//!
//! Directive values are uppercased before they are matched, so
//! `"read_only"`, `"READ_ONLY"` and `"Read_Only"` resolve to the same
//! variant. Anything else is rejected by the evaluator.

use serde::Serialize;
use std::fmt;

/// Classification of a mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Regular entity with its own table.
    #[default]
    Entity,
    /// Superclass whose mapping is inherited but never loaded on its own.
    MappedSuperclass,
    /// Value object embedded into the owning entity's table.
    Embeddable,
}

/// Second-level cache concurrency strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheUsage {
    #[default]
    ReadOnly,
    NonstrictReadWrite,
    ReadWrite,
}

impl CacheUsage {
    /// Resolve a directive value.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "READ_ONLY" => Some(Self::ReadOnly),
            "NONSTRICT_READ_WRITE" => Some(Self::NonstrictReadWrite),
            "READ_WRITE" => Some(Self::ReadWrite),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadOnly => "READ_ONLY",
            Self::NonstrictReadWrite => "NONSTRICT_READ_WRITE",
            Self::ReadWrite => "READ_WRITE",
        }
    }
}

/// Inheritance mapping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InheritanceType {
    #[default]
    None,
    SingleTable,
    Joined,
    TablePerClass,
}

impl InheritanceType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "NONE" => Some(Self::None),
            "SINGLE_TABLE" => Some(Self::SingleTable),
            "JOINED" => Some(Self::Joined),
            "TABLE_PER_CLASS" => Some(Self::TablePerClass),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::SingleTable => "SINGLE_TABLE",
            Self::Joined => "JOINED",
            Self::TablePerClass => "TABLE_PER_CLASS",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::None
    }
}

/// How changes to managed objects are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeTrackingPolicy {
    #[default]
    DeferredImplicit,
    DeferredExplicit,
    Notify,
}

impl ChangeTrackingPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "DEFERRED_IMPLICIT" => Some(Self::DeferredImplicit),
            "DEFERRED_EXPLICIT" => Some(Self::DeferredExplicit),
            "NOTIFY" => Some(Self::Notify),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeferredImplicit => "DEFERRED_IMPLICIT",
            Self::DeferredExplicit => "DEFERRED_EXPLICIT",
            Self::Notify => "NOTIFY",
        }
    }
}

/// Identifier generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneratorType {
    Auto,
    Identity,
    Sequence,
    Table,
    #[default]
    None,
    Custom,
    Uuid,
}

impl GeneratorType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "AUTO" => Some(Self::Auto),
            "IDENTITY" => Some(Self::Identity),
            "SEQUENCE" => Some(Self::Sequence),
            "TABLE" => Some(Self::Table),
            "NONE" => Some(Self::None),
            "CUSTOM" => Some(Self::Custom),
            "UUID" => Some(Self::Uuid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Identity => "IDENTITY",
            Self::Sequence => "SEQUENCE",
            Self::Table => "TABLE",
            Self::None => "NONE",
            Self::Custom => "CUSTOM",
            Self::Uuid => "UUID",
        }
    }
}

/// Association loading policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchMode {
    #[default]
    Lazy,
    Eager,
    ExtraLazy,
}

impl FetchMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "LAZY" => Some(Self::Lazy),
            "EAGER" => Some(Self::Eager),
            "EXTRA_LAZY" => Some(Self::ExtraLazy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lazy => "LAZY",
            Self::Eager => "EAGER",
            Self::ExtraLazy => "EXTRA_LAZY",
        }
    }
}

/// Sort direction for association ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )*
    };
}

impl_display_as_str!(
    CacheUsage,
    InheritanceType,
    ChangeTrackingPolicy,
    GeneratorType,
    FetchMode,
    OrderDirection
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_usage_is_case_insensitive() {
        for input in ["read_only", "READ_ONLY", "Read_Only"] {
            assert_eq!(CacheUsage::parse(input), Some(CacheUsage::ReadOnly));
        }
        assert_eq!(
            CacheUsage::parse("nonstrict_read_write"),
            Some(CacheUsage::NonstrictReadWrite)
        );
        assert_eq!(CacheUsage::parse("WRITE_ONLY"), None);
        assert_eq!(CacheUsage::parse(""), None);
    }

    #[test]
    fn test_inheritance_type() {
        assert_eq!(
            InheritanceType::parse("SINGLE_TABLE"),
            Some(InheritanceType::SingleTable)
        );
        assert_eq!(
            InheritanceType::parse("table_per_class"),
            Some(InheritanceType::TablePerClass)
        );
        assert!(InheritanceType::parse("none").unwrap().is_none());
        assert_eq!(InheritanceType::parse("CLASS_TABLE"), None);
    }

    #[test]
    fn test_generator_type_covers_all_strategies() {
        let all = [
            GeneratorType::Auto,
            GeneratorType::Identity,
            GeneratorType::Sequence,
            GeneratorType::Table,
            GeneratorType::None,
            GeneratorType::Custom,
            GeneratorType::Uuid,
        ];
        for strategy in all {
            assert_eq!(GeneratorType::parse(strategy.as_str()), Some(strategy));
        }
        assert_eq!(GeneratorType::default(), GeneratorType::None);
    }

    #[test]
    fn test_change_tracking_and_fetch() {
        assert_eq!(
            ChangeTrackingPolicy::parse("Notify"),
            Some(ChangeTrackingPolicy::Notify)
        );
        assert_eq!(FetchMode::parse("extra_lazy"), Some(FetchMode::ExtraLazy));
        assert_eq!(FetchMode::default(), FetchMode::Lazy);
        assert_eq!(OrderDirection::parse("desc"), Some(OrderDirection::Desc));
        assert_eq!(OrderDirection::parse("DOWN"), None);
    }

    #[test]
    fn test_display_and_serialize_agree() {
        assert_eq!(CacheUsage::NonstrictReadWrite.to_string(), "NONSTRICT_READ_WRITE");
        assert_eq!(
            serde_json::to_value(CacheUsage::NonstrictReadWrite).unwrap(),
            serde_json::json!("NONSTRICT_READ_WRITE")
        );
        assert_eq!(
            serde_json::to_value(EntityKind::MappedSuperclass).unwrap(),
            serde_json::json!("mapped_superclass")
        );
    }
}
