//! Family model
//!
//! A family is a contributing account. `active` is the default-participation
//! flag; `member_from`/`member_to` bound the membership interval.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::FamilyId;
use super::money::round_money;
use super::period::{deserialize_lenient_date, DateSpan};

/// A family taking part in shared goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,

    /// Display name (e.g. the child's name)
    #[serde(default)]
    pub name: String,

    /// Default participation flag; blank means active
    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(
        default,
        deserialize_with = "deserialize_lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub member_from: Option<NaiveDate>,

    #[serde(
        default,
        deserialize_with = "deserialize_lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub member_to: Option<NaiveDate>,
}

fn default_active() -> bool {
    true
}

impl Family {
    /// Create an active family with no membership bounds
    pub fn new(id: impl Into<FamilyId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            member_from: None,
            member_to: None,
        }
    }

    /// Builder: set the active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builder: set the membership interval
    pub fn with_membership(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.member_from = from;
        self.member_to = to;
        self
    }

    /// The membership interval
    pub fn membership(&self) -> DateSpan {
        DateSpan::new(self.member_from, self.member_to)
    }

    /// Check if the family has left (has an end of membership)
    pub fn has_left(&self) -> bool {
        self.member_to.is_some()
    }

    /// Whether the family was a member at some point during `period`
    ///
    /// Families without membership dates are always members. A goal period
    /// with no bounds imposes no restriction.
    pub fn is_member_in_period(&self, period: &DateSpan) -> bool {
        let membership = self.membership();
        if membership.is_unbounded() {
            return true;
        }
        membership.overlaps(period)
    }

    /// Whether the family is a member on a given date
    ///
    /// Without membership dates the `active` flag decides.
    pub fn is_member_on_date(&self, date: NaiveDate) -> bool {
        let membership = self.membership();
        if membership.is_unbounded() {
            return self.active;
        }
        membership.contains(date)
    }

    /// Number of calendar months of membership within `year`
    pub fn membership_months(&self, year: i32) -> u32 {
        let Some(year_span) = DateSpan::year(year) else {
            return 0;
        };
        self.membership()
            .intersect(&year_span)
            .map(|span| span.months_touched())
            .unwrap_or(0)
    }

    /// Share of `year` the family was a member, in twelfths (2 dp)
    pub fn membership_ratio(&self, year: i32) -> f64 {
        round_money(self.membership_months(year) as f64 / 12.0)
    }
}
