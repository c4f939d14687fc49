//! Diagnostic views
//!
//! Plain-text output for `explain`, `participants` and `member`.

use chrono::NaiveDate;

use crate::models::{format_amount, Family, GoalId, Snapshot};
use crate::services::{Explanation, Participants};

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Format the calculation trace of one (goal, family) pair
pub fn format_explanation(explanation: &Explanation, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Goal {} / Family {}\n",
        explanation.goal_id, explanation.family_id
    ));
    output.push_str(&format!(
        "  Mode:           {}{}\n",
        explanation.mode,
        if explanation.mode_known { "" } else { " (unknown, accrues nothing)" }
    ));
    output.push_str(&format!("  Status:         {}\n", explanation.status));
    output.push_str(&format!(
        "  Target:         {}\n",
        format_amount(explanation.target, symbol)
    ));
    if let Some(cap) = explanation.fixed_cap {
        output.push_str(&format!("  Fixed cap:      {}\n", format_amount(cap, symbol)));
    }
    output.push('\n');
    output.push_str(&format!(
        "  Participants:   {}{}\n",
        explanation.participant_count,
        if explanation.from_fallback { " (payers)" } else { "" }
    ));
    output.push_str(&format!("  Payers:         {}\n", explanation.payer_count));
    output.push_str(&format!("  Computed cap:   {}\n", explanation.cap));
    output.push('\n');

    if explanation.goal_payments.is_empty() {
        output.push_str("  Payments:       none\n");
    } else {
        output.push_str("  Payments:\n");
        for (family_id, paid) in &explanation.goal_payments {
            output.push_str(&format!("    {:<12} {}\n", family_id.as_str(), format_amount(*paid, symbol)));
        }
    }
    output.push('\n');

    output.push_str(&format!(
        "  Participant:    {}\n",
        yes_no(explanation.is_participant)
    ));
    output.push_str(&format!(
        "  Paid:           {}\n",
        format_amount(explanation.family_paid, symbol)
    ));
    output.push_str(&format!(
        "  Accrued:        {}\n",
        format_amount(explanation.family_accrued, symbol)
    ));

    output
}

/// Format the resolved participant set of a goal
pub fn format_participants(goal_id: &GoalId, participants: &Participants, snapshot: &Snapshot) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Goal {}: {} participant(s)\n",
        goal_id,
        participants.len()
    ));
    if participants.from_fallback {
        output.push_str("No declared participants; using families that paid.\n");
    }

    for family_id in participants.iter() {
        match snapshot.family(family_id) {
            Some(family) if !family.name.is_empty() => {
                output.push_str(&format!("  {} - {}\n", family_id, family.name));
            }
            Some(_) => output.push_str(&format!("  {}\n", family_id)),
            None => output.push_str(&format!("  {} (not in families)\n", family_id)),
        }
    }

    output
}

/// Format membership details of a family
pub fn format_member(
    family: &Family,
    date: NaiveDate,
    year: i32,
    exit_balance: f64,
    symbol: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Family: {}\n", family.id));
    if !family.name.is_empty() {
        output.push_str(&format!("  Name:           {}\n", family.name));
    }
    output.push_str(&format!("  Active:         {}\n", yes_no(family.active)));
    output.push_str(&format!(
        "  Member from:    {}\n",
        family.member_from.map(|d| d.to_string()).unwrap_or_default()
    ));
    output.push_str(&format!(
        "  Member to:      {}\n",
        family.member_to.map(|d| d.to_string()).unwrap_or_default()
    ));
    output.push('\n');
    output.push_str(&format!(
        "  Member on {}: {}\n",
        date,
        yes_no(family.is_member_on_date(date))
    ));
    output.push_str(&format!(
        "  Months in {}:  {} ({:.2})\n",
        year,
        family.membership_months(year),
        family.membership_ratio(year)
    ));
    output.push_str(&format!(
        "  Exit balance:   {}\n",
        format_amount(exit_balance, symbol)
    ));

    output
}
