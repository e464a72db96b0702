use crate::audit::AuditReport;

fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name).trim().to_string()
}

/// Generate markdown report
pub fn generate(report: &AuditReport) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    output.push_str("# Timesheet Violation Report\n\n");
    output.push_str(&format!("**Request:** {}\n", report.request_id));
    output.push_str(&format!(
        "**Rows:** {} received, {} ignored, {} analyzed\n",
        summary.rows_received, summary.rows_ignored, summary.rows_after_filter
    ));
    output.push_str(&format!("**Employees:** {}\n\n", summary.employees));

    if !report.warnings.is_empty() {
        output.push_str("## Warnings\n\n");
        for warning in &report.warnings {
            output.push_str(&format!("- {}\n", warning));
        }
        output.push('\n');
    }

    output.push_str("---\n\n");

    output.push_str(&format!(
        "## Excess Daily Hours ({})\n\n",
        summary.flags.excess_daily_hours
    ));
    if report.flagged_excess_hours.is_empty() {
        output.push_str("None.\n\n");
    } else {
        output.push_str("| Code | Name | Date | Hours |\n");
        output.push_str("|------|------|------|-------|\n");
        for e in &report.flagged_excess_hours {
            output.push_str(&format!(
                "| {} | {} | {} | {:.2} |\n",
                e.employee_code,
                full_name(&e.first_name, &e.last_name),
                e.date,
                e.hours_worked
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "## Low Rest Hours ({})\n\n",
        summary.flags.low_rest_hours
    ));
    if report.flagged_low_rest_hours.is_empty() {
        output.push_str("None.\n\n");
    } else {
        output.push_str("| Code | Name | Date | Rest | Previous Out | First In |\n");
        output.push_str("|------|------|------|------|--------------|----------|\n");
        for e in &report.flagged_low_rest_hours {
            output.push_str(&format!(
                "| {} | {} | {} | {:.2} | {} | {} |\n",
                e.employee_code,
                full_name(&e.first_name, &e.last_name),
                e.date,
                e.rest_hours,
                e.previous_last_out,
                e.current_first_in
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "## Weekly Excess Hours ({})\n\n",
        summary.flags.weekly_excess_hours
    ));
    if report.flagged_weekly_excess.is_empty() {
        output.push_str("None.\n\n");
    } else {
        output.push_str("| Code | Name | Week | Hours |\n");
        output.push_str("|------|------|------|-------|\n");
        for e in &report.flagged_weekly_excess {
            output.push_str(&format!(
                "| {} | {} | {} to {} | {:.2} |\n",
                e.employee_code,
                full_name(&e.first_name, &e.last_name),
                e.week_start,
                e.week_end,
                e.total_hours
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "## Excess Working Days ({})\n\n",
        summary.flags.excess_working_days
    ));
    if report.flagged_excess_days.is_empty() {
        output.push_str("None.\n\n");
    } else {
        output.push_str("| Code | Name | Week | Days |\n");
        output.push_str("|------|------|------|------|\n");
        for e in &report.flagged_excess_days {
            output.push_str(&format!(
                "| {} | {} | {} to {} | {} |\n",
                e.employee_code,
                full_name(&e.first_name, &e.last_name),
                e.week_start,
                e.week_end,
                e.days_worked
            ));
        }
        output.push('\n');
    }

    if let Some(ref path) = report.report_path {
        output.push_str(&format!("Report workbook: `{}`\n", path));
    }
    if let Some(ref path) = report.sheets_path {
        output.push_str(&format!("Report sheets: `{}`\n", path));
    }

    output
}
