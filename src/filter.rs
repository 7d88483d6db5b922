//!
//! Selection of groups and cases.
//!
//! A [`Filter`] is a plain value. Constructors replace the mode outright; they
//! never merge with an existing filter. Narrowing a selection is the job of
//! [`crate::Subset::narrow`], which keeps every filter it was given and requires
//! all of them to match.

use crate::case::Ordinal;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Everything matches.
    #[default]
    None,
    ByGroup(String),
    ByGroupAndCaseName(String, String),
    ByGroupAndCaseOrdinal(String, Ordinal),
    /// Reserved `group:case` address form. Matches nothing.
    ByAddress(String),
}

impl Filter {
    pub fn none() -> Self {
        Filter::None
    }

    pub fn by_group(group: impl Into<String>) -> Self {
        Filter::ByGroup(group.into())
    }

    pub fn by_case_name(group: impl Into<String>, case: impl Into<String>) -> Self {
        Filter::ByGroupAndCaseName(group.into(), case.into())
    }

    pub fn by_case_ordinal(group: impl Into<String>, ordinal: Ordinal) -> Self {
        Filter::ByGroupAndCaseOrdinal(group.into(), ordinal)
    }

    pub fn by_address(address: impl Into<String>) -> Self {
        let address = address.into();
        tracing::warn!(%address, "address filters are reserved and match no cases");
        Filter::ByAddress(address)
    }

    /// Group-level check, applied before any case of the group is visited.
    pub fn matches_group(&self, group: &str) -> bool {
        match self {
            Filter::None => true,
            Filter::ByGroup(name)
            | Filter::ByGroupAndCaseName(name, _)
            | Filter::ByGroupAndCaseOrdinal(name, _) => name == group,
            Filter::ByAddress(_) => false,
        }
    }

    /// Case-level check that needs only the slot, not the announced name.
    pub fn matches_ordinal(&self, ordinal: Ordinal) -> bool {
        match self {
            Filter::ByGroupAndCaseOrdinal(_, wanted) => *wanted == ordinal,
            Filter::ByAddress(_) => false,
            _ => true,
        }
    }

    /// Whether [`Filter::matches_name`] can reject anything.
    pub fn constrains_name(&self) -> bool {
        matches!(self, Filter::ByGroupAndCaseName(..) | Filter::ByAddress(_))
    }

    /// Case-level check against the name a case announced.
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            Filter::ByGroupAndCaseName(_, wanted) => wanted == name,
            Filter::ByAddress(_) => false,
            _ => true,
        }
    }
}
