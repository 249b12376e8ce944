//! Closed-vocabulary lookups used by the registry and the SEND view.
//!
//! Both lookups here are best effort: text outside the table comes back
//! unchanged (or as [`Flag::Unrecognized`]) rather than failing the load,
//! because new releases occasionally add categories before the tables here
//! catch up.

use std::borrow::Cow;

use crate::data::Flag;

/// A fixed string rewrite table with identity fallback.
///
/// An entry mapping to `None` turns the matched text into Missing.
#[derive(Debug, PartialEq, Eq)]
pub struct CategoryMap {
    name: &'static str,
    entries: &'static [(&'static str, Option<&'static str>)],
}

impl CategoryMap {
    pub const fn new(
        name: &'static str,
        entries: &'static [(&'static str, Option<&'static str>)],
    ) -> Self {
        Self { name, entries }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entries(&self) -> &'static [(&'static str, Option<&'static str>)] {
        self.entries
    }

    /// `Some(target)` when `raw` is a known category, `None` otherwise.
    pub fn lookup(&self, raw: &str) -> Option<Option<&'static str>> {
        self.entries
            .iter()
            .find(|(from, _)| *from == raw)
            .map(|(_, to)| *to)
    }

    /// Rewrites a known category, passes anything else through unchanged.
    pub fn apply<'a>(&self, raw: &'a str) -> Option<Cow<'a, str>> {
        match self.lookup(raw) {
            Some(Some(code)) => Some(Cow::Borrowed(code)),
            Some(None) => None,
            None => Some(Cow::Borrowed(raw)),
        }
    }
}

/// A fixed text → boolean table over one categorical column.
#[derive(Debug, PartialEq, Eq)]
pub struct FlagTable {
    entries: &'static [(&'static str, bool)],
}

impl FlagTable {
    pub const fn new(entries: &'static [(&'static str, bool)]) -> Self {
        Self { entries }
    }

    pub fn classify(&self, raw: &str) -> Flag {
        self.entries
            .iter()
            .find(|(from, _)| *from == raw)
            .map(|(_, value)| Flag::Known(*value))
            .unwrap_or_else(|| Flag::Unrecognized(raw.to_string()))
    }
}

pub const SEN_NOT_APPLICABLE: &str = "Not Applicable";

/// SEN provision type names as published in the `SENn (name)` columns.
pub static SEN_NEED_CATEGORIES: CategoryMap = CategoryMap::new(
    "sen_need",
    &[
        ("ASD - Autistic Spectrum Disorder", Some("ASD")),
        ("HI - Hearing Impairment", Some("HI")),
        ("MLD - Moderate Learning Difficulty", Some("MLD")),
        ("MSI - Multi-Sensory Impairment", Some("MSI")),
        ("OTH - Other Difficulty/Disability", Some("OTH")),
        ("PD - Physical Disability", Some("PD")),
        ("PMLD - Profound and Multiple Learning Difficulty", Some("PMLD")),
        ("SEMH - Social, Emotional and Mental Health", Some("SEMH")),
        ("SLCN - Speech, language and Communication", Some("SLCN")),
        ("SLD - Severe Learning Difficulty", Some("SLD")),
        ("SpLD - Specific Learning Difficulty", Some("SPLD")),
        ("VI - Visual Impairment", Some("VI")),
        (SEN_NOT_APPLICABLE, None),
    ],
);

/// Short upper-case code for a SEN provision type name.
///
/// "Not Applicable" (exact case) is Missing. Unknown text, including empty or
/// whitespace-only text, is returned unchanged.
pub fn normalize_sen_need(raw: &str) -> Option<Cow<'_, str>> {
    SEN_NEED_CATEGORIES.apply(raw)
}

pub static RESOURCED_PROVISION_FLAGS: FlagTable = FlagTable::new(&[
    ("Not applicable", false),
    ("Resourced provision", true),
    ("SEN unit", false),
    ("Resourced provision and SEN unit", true),
]);

pub static SEN_UNIT_FLAGS: FlagTable = FlagTable::new(&[
    ("Not applicable", false),
    ("Resourced provision", false),
    ("SEN unit", true),
    ("Resourced provision and SEN unit", true),
]);
