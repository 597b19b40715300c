//! CLDR plural category resolution and variant selection.

use std::collections::HashMap;
use std::fmt;

use intl_pluralrules::{
    PluralRuleType,
    PluralRules,
};
use serde::{
    Deserialize,
    Serialize,
};
use unic_langid::LanguageIdentifier;

use crate::error::PluralError;

/// CLDR plural category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    /// Explicit zero form (e.g. Arabic).
    Zero,
    /// Singular form.
    One,
    /// Dual form (e.g. Arabic).
    Two,
    /// Paucal form (e.g. Russian 2..4).
    Few,
    /// Large-count form (e.g. Russian 5..20).
    Many,
    /// Required fallback form every locale has.
    Other,
}

impl PluralCategory {
    /// Every category, in CLDR order.
    pub const ALL: [Self; 6] =
        [Self::Zero, Self::One, Self::Two, Self::Few, Self::Many, Self::Other];

    /// The lowercase CLDR name, as used in suffixed translation keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<intl_pluralrules::PluralCategory> for PluralCategory {
    fn from(category: intl_pluralrules::PluralCategory) -> Self {
        match category {
            intl_pluralrules::PluralCategory::ZERO => Self::Zero,
            intl_pluralrules::PluralCategory::ONE => Self::One,
            intl_pluralrules::PluralCategory::TWO => Self::Two,
            intl_pluralrules::PluralCategory::FEW => Self::Few,
            intl_pluralrules::PluralCategory::MANY => Self::Many,
            intl_pluralrules::PluralCategory::OTHER => Self::Other,
        }
    }
}

/// Variant strings for one translatable message, keyed by plural category.
///
/// Missing and empty variants are equivalent: both fall back to `other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluralVariants {
    /// Variant for [`PluralCategory::Zero`].
    pub zero: Option<String>,
    /// Variant for [`PluralCategory::One`].
    pub one: Option<String>,
    /// Variant for [`PluralCategory::Two`].
    pub two: Option<String>,
    /// Variant for [`PluralCategory::Few`].
    pub few: Option<String>,
    /// Variant for [`PluralCategory::Many`].
    pub many: Option<String>,
    /// Variant for [`PluralCategory::Other`].
    pub other: Option<String>,
}

impl PluralVariants {
    /// The variant for one category. Empty strings count as missing.
    #[must_use]
    pub fn get(&self, category: PluralCategory) -> Option<&str> {
        let variant = match category {
            PluralCategory::Zero => self.zero.as_deref(),
            PluralCategory::One => self.one.as_deref(),
            PluralCategory::Two => self.two.as_deref(),
            PluralCategory::Few => self.few.as_deref(),
            PluralCategory::Many => self.many.as_deref(),
            PluralCategory::Other => self.other.as_deref(),
        };
        variant.filter(|value| !value.is_empty())
    }

    /// Whether no category holds a usable variant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        PluralCategory::ALL.into_iter().all(|category| self.get(category).is_none())
    }

    /// Collects cardinal variants from suffixed keys such as `apple_one`.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn from_suffixed_keys(base: &str, entries: &HashMap<String, String>) -> Self {
        Self::harvest(base, "", entries)
    }

    /// Collects ordinal variants from suffixed keys such as `place_ordinal_one`.
    #[must_use]
    #[allow(clippy::implicit_hasher)]
    pub fn from_ordinal_keys(base: &str, entries: &HashMap<String, String>) -> Self {
        Self::harvest(base, "_ordinal", entries)
    }

    /// Looks up `{base}{infix}_{category}` for every category.
    fn harvest(base: &str, infix: &str, entries: &HashMap<String, String>) -> Self {
        let mut variants = Self::default();
        for category in PluralCategory::ALL {
            let key = format!("{base}{infix}_{}", category.as_str());
            if let Some(value) = entries.get(&key) {
                variants.set(category, value.clone());
            }
        }
        variants
    }

    /// Stores one variant string.
    fn set(&mut self, category: PluralCategory, value: String) {
        let slot = match category {
            PluralCategory::Zero => &mut self.zero,
            PluralCategory::One => &mut self.one,
            PluralCategory::Two => &mut self.two,
            PluralCategory::Few => &mut self.few,
            PluralCategory::Many => &mut self.many,
            PluralCategory::Other => &mut self.other,
        };
        *slot = Some(value);
    }
}

/// A plural-suffixed translation key split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluralKeyRef<'a> {
    /// Key with the plural suffix removed.
    pub base: &'a str,
    /// Category named by the suffix.
    pub category: PluralCategory,
    /// Whether the suffix used the ordinal form.
    pub ordinal: bool,
}

/// Suffix table for [`split_plural_key`]. Ordinal suffixes come first so
/// `_one` cannot match inside `place_ordinal_one`.
const PLURAL_SUFFIXES: &[(&str, PluralCategory, bool)] = &[
    ("_ordinal_zero", PluralCategory::Zero, true),
    ("_ordinal_one", PluralCategory::One, true),
    ("_ordinal_two", PluralCategory::Two, true),
    ("_ordinal_few", PluralCategory::Few, true),
    ("_ordinal_many", PluralCategory::Many, true),
    ("_ordinal_other", PluralCategory::Other, true),
    ("_zero", PluralCategory::Zero, false),
    ("_one", PluralCategory::One, false),
    ("_two", PluralCategory::Two, false),
    ("_few", PluralCategory::Few, false),
    ("_many", PluralCategory::Many, false),
    ("_other", PluralCategory::Other, false),
];

/// Splits keys like `apple_one` or `place_ordinal_two` into base and
/// category, or `None` when the key carries no plural suffix.
#[must_use]
pub fn split_plural_key(key: &str) -> Option<PluralKeyRef<'_>> {
    for &(suffix, category, ordinal) in PLURAL_SUFFIXES {
        if let Some(base) = key.strip_suffix(suffix).filter(|base| !base.is_empty()) {
            return Some(PluralKeyRef { base, category, ordinal });
        }
    }
    None
}

/// Plural selector bound to one locale's CLDR rules.
///
/// Construction resolves and binds the rule set once; selection never
/// re-parses the locale. Region-qualified tags bind their language's rules
/// ("en-US" selects like "en"). Invalid or unsupported locales fail here,
/// not at selection time.
pub struct PluralSelector {
    /// Locale tag the selector was built for.
    locale: String,
    /// Bound CLDR rule set.
    rules: PluralRules,
}

impl PluralSelector {
    /// Binds the cardinal rules for `locale` (counting things).
    ///
    /// # Errors
    /// [`PluralError::InvalidLocale`] when the tag does not parse;
    /// [`PluralError::UnsupportedLocale`] when CLDR has no rules for it.
    pub fn cardinal(locale: &str) -> Result<Self, PluralError> {
        Self::with_rule_type(locale, PluralRuleType::CARDINAL)
    }

    /// Binds the ordinal rules for `locale` (ranking things).
    ///
    /// # Errors
    /// Same conditions as [`cardinal`](Self::cardinal).
    pub fn ordinal(locale: &str) -> Result<Self, PluralError> {
        Self::with_rule_type(locale, PluralRuleType::ORDINAL)
    }

    /// Parses the tag and binds one rule set.
    ///
    /// CLDR keys plural rules by language, so a qualified tag without an
    /// entry of its own falls back to its language subtag ("en-US" binds the
    /// "en" rules).
    fn with_rule_type(locale: &str, rule_type: PluralRuleType) -> Result<Self, PluralError> {
        let langid = locale.parse::<LanguageIdentifier>().map_err(|source| {
            PluralError::InvalidLocale { locale: locale.to_string(), source }
        })?;

        let language_only = LanguageIdentifier::from_parts(langid.language, None, None, &[]);
        let rules = PluralRules::create(langid, rule_type)
            .or_else(|_| PluralRules::create(language_only, rule_type))
            .map_err(|reason| PluralError::UnsupportedLocale {
                locale: locale.to_string(),
                reason,
            })?;

        tracing::debug!(locale = %locale, "Bound plural rules");
        Ok(Self { locale: locale.to_string(), rules })
    }

    /// The locale tag this selector was built for.
    #[must_use]
    pub const fn locale(&self) -> &str {
        self.locale.as_str()
    }

    /// The CLDR category for a count.
    ///
    /// Counts the rules cannot represent resolve to
    /// [`PluralCategory::Other`].
    #[must_use]
    pub fn category_for(&self, count: f64) -> PluralCategory {
        match self.rules.select(count) {
            Ok(category) => category.into(),
            Err(reason) => {
                tracing::debug!(
                    locale = %self.locale,
                    count = %count,
                    reason = %reason,
                    "Count is not representable, selecting the other category"
                );
                PluralCategory::Other
            }
        }
    }

    /// Picks the variant for a count.
    ///
    /// Returns the resolved category's variant when present and non-empty,
    /// then the `other` variant, then the empty string. The variants are
    /// never modified.
    #[must_use]
    pub fn select<'a>(&self, count: f64, variants: &'a PluralVariants) -> &'a str {
        let category = self.category_for(count);
        variants
            .get(category)
            .or_else(|| variants.get(PluralCategory::Other))
            .unwrap_or("")
    }
}

impl fmt::Debug for PluralSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluralSelector")
            .field("locale", &self.locale)
            .field("rules", &"<plural rules>")
            .finish()
    }
}
