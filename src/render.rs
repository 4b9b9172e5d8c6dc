//! Plain-text rendering of gym data for the terminal.

use chrono::{Datelike, NaiveDate};

use crate::dates::format_date;
use crate::manager::GymManager;
use crate::models::{Member, WorkoutPlan};

const NONE: &str = "N/A";

/// Render rows as a left-aligned table with a header and separator line.
///
/// Example output:
/// ```text
/// ID  Name   Age
/// --  -----  ---
/// M1  Alice  30
/// ```
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut output, &header, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut output, &separator, &widths);
    for row in rows {
        push_row(&mut output, row, &widths);
    }
    output
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let last = cells.len().saturating_sub(1);
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i == last {
            output.push_str(cell);
        } else {
            output.push_str(&format!("{:<width$}  ", cell, width = *width));
        }
    }
    output.push('\n');
}

pub fn members(manager: &GymManager) -> String {
    let rows: Vec<Vec<String>> = manager
        .members()
        .iter()
        .map(|m| {
            vec![
                m.member_id.clone(),
                m.name.clone(),
                m.age.to_string(),
                m.workout_plan_id.clone().unwrap_or_else(|| NONE.to_string()),
            ]
        })
        .collect();
    table(&["ID", "Name", "Age", "Plan"], &rows)
}

pub fn member_detail(member: &Member, plan: Option<&WorkoutPlan>) -> String {
    let mut output = format!(
        "{} ({})\n  Age: {}\n  Joined: {}\n",
        member.name,
        member.member_id,
        member.age,
        format_date(member.join_date)
    );
    match plan {
        Some(plan) => output.push_str(&format!("  Plan: {} - {}\n", plan.plan_id, plan)),
        None => output.push_str(&format!("  Plan: {}\n", NONE)),
    }
    output.push_str(&format!("  {}\n", latest_payment(member)));

    let attendance: Vec<String> = member
        .attendance_log
        .iter()
        .map(|d| format_date(*d))
        .collect();
    output.push_str(&format!(
        "  Attendance ({}): {}\n",
        attendance.len(),
        if attendance.is_empty() {
            "none".to_string()
        } else {
            attendance.join(", ")
        }
    ));
    output
}

pub fn plans(manager: &GymManager) -> String {
    let rows: Vec<Vec<String>> = manager
        .plan_assignments()
        .into_iter()
        .map(|(plan, assigned)| {
            vec![
                plan.plan_id.clone(),
                plan.name.clone(),
                plan.focus_area.clone(),
                plan.exercises.join(", "),
                assigned.to_string(),
            ]
        })
        .collect();
    table(&["ID", "Name", "Focus", "Exercises", "Assigned"], &rows)
}

pub fn latest_payment(member: &Member) -> String {
    match member.latest_payment() {
        Some(payment) => format!(
            "Last payment: {:.2} on {}",
            payment.amount,
            format_date(payment.date)
        ),
        None => "No payments made".to_string(),
    }
}

/// Every member's latest payment, marked `Paid` when it falls in the month
/// of `today` and `Overdue` otherwise.
pub fn payment_log(manager: &GymManager, today: NaiveDate) -> String {
    if manager.members().is_empty() {
        return "No members registered.\n".to_string();
    }
    let rows: Vec<Vec<String>> = manager
        .members()
        .iter()
        .map(|m| {
            let status = if m.paid_in_month(today.year(), today.month()) {
                "Paid"
            } else {
                "Overdue"
            };
            vec![
                m.member_id.clone(),
                m.name.clone(),
                latest_payment(m),
                status.to_string(),
            ]
        })
        .collect();
    table(&["ID", "Name", "Payment", "Status"], &rows)
}

pub fn unpaid(members: &[&Member], cutoff: NaiveDate) -> String {
    if members.is_empty() {
        return format!("All members are paid up as of {}.\n", format_date(cutoff));
    }
    let rows: Vec<Vec<String>> = members
        .iter()
        .map(|m| {
            let last = m
                .latest_payment()
                .map(|p| format_date(p.date))
                .unwrap_or_else(|| "never".to_string());
            vec![m.member_id.clone(), m.name.clone(), last]
        })
        .collect();
    format!(
        "Unpaid as of {}:\n{}",
        format_date(cutoff),
        table(&["ID", "Name", "Last Payment"], &rows)
    )
}

/// The dashboard cards: headline counts plus plan popularity and
/// payments for the current month.
pub fn dashboard(manager: &GymManager, today: NaiveDate) -> String {
    let summary = manager.summary(today);
    let popular = manager
        .most_popular_plan()
        .map(|p| p.plan_id.as_str())
        .unwrap_or(NONE);
    let paid_this_month = manager.paid_in_month(today.year(), today.month());

    let rows = vec![
        vec!["Members".to_string(), summary.total_members.to_string()],
        vec!["Plans".to_string(), manager.plan_count().to_string()],
        vec!["Popular Plan".to_string(), popular.to_string()],
        vec!["Attended Today".to_string(), summary.active_today.to_string()],
        vec!["Paid This Month".to_string(), paid_this_month.to_string()],
        vec!["Overdue".to_string(), summary.unpaid_members.to_string()],
    ];
    format!(
        "Summary for {}\n{}",
        format_date(today),
        table(&["Metric", "Value"], &rows)
    )
}

pub fn top_attendees(ranked: &[(&Member, usize)], days: u32) -> String {
    if ranked.is_empty() {
        return "Nobody to rank.\n".to_string();
    }
    let entries: Vec<String> = ranked
        .iter()
        .map(|(m, count)| format!("{} ({})", m.name, count))
        .collect();
    format!("Top over the last {} day(s): {}\n", days, entries.join(", "))
}
