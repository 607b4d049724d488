//! Formatted output helpers for CLI commands.
//!
//! Provides the field table and the package totals summary.

use std::fmt::Write as _;

use kubeapp_package::pricing::Totals;
use kubeapp_template::Field;

/// Renders fields as an aligned table of name, default, and title.
///
/// Hidden fields are marked with `*` after their name.
#[must_use]
pub fn field_table(fields: &[&Field]) -> String {
    if fields.is_empty() {
        return "No fields.\n".to_owned();
    }

    let rows: Vec<[String; 3]> = fields
        .iter()
        .map(|f| {
            let name = if f.hidden {
                format!("{}*", f.name)
            } else {
                f.name.clone()
            };
            [
                name,
                f.default_value.clone().unwrap_or_default(),
                f.title.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let name_width = column_width(&rows, 0, "NAME");
    let default_width = column_width(&rows, 1, "DEFAULT");

    let mut out = String::new();
    let _ = writeln!(out, "{:<name_width$}  {:<default_width$}  TITLE", "NAME", "DEFAULT");
    for [name, default, title] in &rows {
        let line = format!("{name:<name_width$}  {default:<default_width$}  {title}");
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn column_width(rows: &[[String; 3]], column: usize, header: &str) -> usize {
    rows.iter()
        .map(|row| row[column].chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or_default()
}

/// Renders the totals of one package as labelled lines.
#[must_use]
pub fn totals_summary(package: &str, totals: &Totals) -> String {
    let period = if totals.period.is_empty() {
        String::new()
    } else {
        format!(" / {}", totals.period)
    };

    let mut out = String::new();
    let _ = writeln!(out, "Package {package} (kube type {})", totals.kube_type);
    let _ = writeln!(out, "  Kubes:      {}", totals.total_kubes);
    let _ = writeln!(out, "  CPU:        {}", totals.formatted.cpu);
    let _ = writeln!(out, "  Memory:     {}", totals.formatted.memory);
    let _ = writeln!(out, "  Disk:       {}", totals.formatted.disk_space);
    let _ = writeln!(out, "  Persistent: {}", totals.formatted.total_pd);
    let _ = writeln!(
        out,
        "  Public IP:  {}",
        if totals.public_ip { "yes" } else { "no" }
    );
    let _ = writeln!(out, "  Price:      {}{period}", totals.formatted.price);
    out
}
