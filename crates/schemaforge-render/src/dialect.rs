//! Target syntaxes for rendered validator expressions.
//!
//! A [`Dialect`] only knows how to spell leaves and wrapping primitives; the
//! order in which they are applied lives in [`crate::renderer::render`].

use std::fmt::Write as _;

use schemaforge_core::{Configuration, DialectVariant, SemanticType};

use crate::renderer::RenderMode;

/// One refinement applied to a column expression in write mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Check {
    Trim,
    LowerCase,
    UpperCase,
    Normalize,
    NonNegative,
    MinLength(u32),
    MaxLength(u32),
    Minimum(f64),
    Maximum(f64),
}

/// Spelling primitives for one output syntax.
///
/// The default methods implement method chaining (`expr.array().nullable()`).
pub trait Dialect: Send + Sync {
    fn variant(&self) -> DialectVariant;

    /// Leaf used in write mode, where format types get their strict spelling.
    fn write_leaf(&self, semantic: SemanticType) -> &'static str;

    /// Leaf for a semantic type. Read leaves stay permissive in every dialect.
    fn leaf(&self, semantic: SemanticType, mode: RenderMode, config: &Configuration) -> String {
        match mode {
            RenderMode::Read => read_leaf(semantic, config).to_string(),
            RenderMode::Write => self.write_leaf(semantic).to_string(),
        }
    }

    fn enum_of(&self, constant: &str) -> String {
        format!("z.enum({constant})")
    }

    fn array_of(&self, expr: &str) -> String {
        format!("{expr}.array()")
    }

    fn nullable(&self, expr: &str) -> String {
        format!("{expr}.nullable()")
    }

    fn optional(&self, expr: &str) -> String {
        format!("{expr}.optional()")
    }

    fn checks(&self, expr: &str, checks: &[Check]) -> String {
        let mut out = expr.to_string();
        for check in checks {
            let _ = match check {
                Check::Trim => write!(out, ".trim()"),
                Check::LowerCase => write!(out, ".toLowerCase()"),
                Check::UpperCase => write!(out, ".toUpperCase()"),
                Check::Normalize => write!(out, ".normalize()"),
                Check::NonNegative => write!(out, ".nonnegative()"),
                Check::MinLength(value) => write!(out, ".min({value})"),
                Check::MaxLength(value) => write!(out, ".max({value})"),
                Check::Minimum(value) => write!(out, ".min({value})"),
                Check::Maximum(value) => write!(out, ".max({value})"),
            };
        }
        out
    }

    fn transform(&self, expr: &str, body: &str) -> String {
        format!("{expr}.transform({body})")
    }
}

fn read_leaf(semantic: SemanticType, config: &Configuration) -> &'static str {
    match semantic {
        SemanticType::String | SemanticType::Uuid | SemanticType::Email | SemanticType::Url => {
            "z.string()"
        }
        SemanticType::Int | SemanticType::Number => "z.number()",
        SemanticType::Boolean => "z.boolean()",
        SemanticType::Date if config.coerce_dates_on_read => "z.coerce.date()",
        SemanticType::Date => "z.date()",
        SemanticType::Json | SemanticType::Unknown => "z.unknown()",
        SemanticType::Any => "z.any()",
    }
}

/// Write leaves shared by the top-level-format dialects.
fn format_leaf(semantic: SemanticType) -> &'static str {
    match semantic {
        SemanticType::String => "z.string()",
        SemanticType::Int => "z.int()",
        SemanticType::Number => "z.number()",
        SemanticType::Boolean => "z.boolean()",
        SemanticType::Date => "z.date()",
        SemanticType::Uuid => "z.uuid()",
        SemanticType::Email => "z.email()",
        SemanticType::Url => "z.url()",
        SemanticType::Json => "z.json()",
        SemanticType::Unknown => "z.unknown()",
        SemanticType::Any => "z.any()",
    }
}

const JSON_VALUE_V1: &str = "z.union([z.string(), z.number(), z.boolean(), z.null(), \
z.record(z.string(), z.unknown()), z.array(z.unknown())])";

/// Chained syntax with refinement-style format leaves (`z.string().email()`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainedV1;

impl Dialect for ChainedV1 {
    fn variant(&self) -> DialectVariant {
        DialectVariant::V1
    }

    fn write_leaf(&self, semantic: SemanticType) -> &'static str {
        match semantic {
            SemanticType::Int => "z.number().int()",
            SemanticType::Uuid => "z.string().uuid()",
            SemanticType::Email => "z.string().email()",
            SemanticType::Url => "z.string().url()",
            SemanticType::Json => JSON_VALUE_V1,
            other => format_leaf(other),
        }
    }
}

/// Chained syntax with top-level format leaves (`z.email()`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainedV2;

impl Dialect for ChainedV2 {
    fn variant(&self) -> DialectVariant {
        DialectVariant::V2
    }

    fn write_leaf(&self, semantic: SemanticType) -> &'static str {
        format_leaf(semantic)
    }
}

/// Functional syntax: wrappers compose, checks are grouped, transforms pipe.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposedV2Lite;

impl Dialect for ComposedV2Lite {
    fn variant(&self) -> DialectVariant {
        DialectVariant::V2Lite
    }

    fn write_leaf(&self, semantic: SemanticType) -> &'static str {
        format_leaf(semantic)
    }

    fn array_of(&self, expr: &str) -> String {
        format!("z.array({expr})")
    }

    fn nullable(&self, expr: &str) -> String {
        format!("z.nullable({expr})")
    }

    fn optional(&self, expr: &str) -> String {
        format!("z.optional({expr})")
    }

    fn checks(&self, expr: &str, checks: &[Check]) -> String {
        if checks.is_empty() {
            return expr.to_string();
        }
        let grouped: Vec<String> = checks
            .iter()
            .map(|check| match check {
                Check::Trim => "z.trim()".to_string(),
                Check::LowerCase => "z.toLowerCase()".to_string(),
                Check::UpperCase => "z.toUpperCase()".to_string(),
                Check::Normalize => "z.normalize()".to_string(),
                Check::NonNegative => "z.nonnegative()".to_string(),
                Check::MinLength(value) => format!("z.minLength({value})"),
                Check::MaxLength(value) => format!("z.maxLength({value})"),
                Check::Minimum(value) => format!("z.minimum({value})"),
                Check::Maximum(value) => format!("z.maximum({value})"),
            })
            .collect();
        format!("{expr}.check({})", grouped.join(", "))
    }

    fn transform(&self, expr: &str, body: &str) -> String {
        format!("z.pipe({expr}, z.transform({body}))")
    }
}

static CHAINED_V1: ChainedV1 = ChainedV1;
static CHAINED_V2: ChainedV2 = ChainedV2;
static COMPOSED_V2_LITE: ComposedV2Lite = ComposedV2Lite;

/// Strategy for a configured variant.
pub fn dialect(variant: DialectVariant) -> &'static dyn Dialect {
    match variant {
        DialectVariant::V1 => &CHAINED_V1,
        DialectVariant::V2 => &CHAINED_V2,
        DialectVariant::V2Lite => &COMPOSED_V2_LITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_leaves_never_use_format_spellings() {
        let config = Configuration::default();
        for variant in [DialectVariant::V1, DialectVariant::V2, DialectVariant::V2Lite] {
            let dialect = dialect(variant);
            assert_eq!(dialect.variant(), variant);
            assert_eq!(dialect.leaf(SemanticType::Email, RenderMode::Read, &config), "z.string()");
            assert_eq!(dialect.leaf(SemanticType::Int, RenderMode::Read, &config), "z.number()");
            assert_eq!(dialect.leaf(SemanticType::Json, RenderMode::Read, &config), "z.unknown()");
        }
    }

    #[test]
    fn write_leaves_differ_per_variant() {
        assert_eq!(ChainedV1.write_leaf(SemanticType::Email), "z.string().email()");
        assert_eq!(ChainedV2.write_leaf(SemanticType::Email), "z.email()");
        assert_eq!(ComposedV2Lite.write_leaf(SemanticType::Int), "z.int()");
        assert!(ChainedV1.write_leaf(SemanticType::Json).starts_with("z.union(["));
    }

    #[test]
    fn date_read_leaf_follows_coercion_flag() {
        let mut config = Configuration::default();
        assert_eq!(ChainedV2.leaf(SemanticType::Date, RenderMode::Read, &config), "z.coerce.date()");
        config.coerce_dates_on_read = false;
        assert_eq!(ChainedV2.leaf(SemanticType::Date, RenderMode::Read, &config), "z.date()");
    }

    #[test]
    fn checks_chain_or_group() {
        let checks = [Check::Trim, Check::MaxLength(40)];
        assert_eq!(ChainedV2.checks("z.string()", &checks), "z.string().trim().max(40)");
        assert_eq!(
            ComposedV2Lite.checks("z.string()", &checks),
            "z.string().check(z.trim(), z.maxLength(40))"
        );
        assert_eq!(ComposedV2Lite.checks("z.string()", &[]), "z.string()");
    }
}
