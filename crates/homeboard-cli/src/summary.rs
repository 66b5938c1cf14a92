use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use homeboard_model::Queryable;
use homeboard_query::{FilterState, Page};

/// Longest cell text before it is cut with an ellipsis.
const MAX_CELL_CHARS: usize = 48;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// One row per record, one column per field name.
pub fn record_table<T: Queryable>(rows: &[&T], columns: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(columns.iter().map(|column| header_cell(column)));
    apply_table_style(&mut table);
    for row in rows {
        table.add_row(columns.iter().map(|column| match row.text(column) {
            Some(value) => Cell::new(truncate(&value)),
            None => dim_cell("-"),
        }));
    }
    table
}

/// `articles: page 2 of 3, showing 7-12 of 14`
///
/// `requested` is the page the user asked for; a note is added when it was
/// out of range.
pub fn page_summary<T>(collection: &str, page: &Page<'_, T>, requested: usize) -> String {
    let Some((first, last)) = page.item_range() else {
        return format!("{collection}: no matching records");
    };
    let mut line = format!(
        "{collection}: page {} of {}, showing {first}-{last} of {}",
        page.page_number, page.total_pages, page.total_count
    );
    if requested != page.page_number {
        line.push_str(&format!(" (page {requested} is out of range)"));
    }
    line
}

/// Human description of the active filters, `None` when unfiltered.
pub fn describe_filter(filter: &FilterState) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(term) = filter.search_term() {
        parts.push(format!("search \"{term}\""));
    }
    for (field, value) in filter.active_categories() {
        parts.push(format!("{field} = {value}"));
    }
    if let Some(since) = filter.since_date() {
        parts.push(format!("since {since}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_CELL_CHARS {
        return value.to_string();
    }
    let cut: String = value.chars().take(MAX_CELL_CHARS - 1).collect();
    format!("{cut}…")
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_text() {
        let long = "x".repeat(60);
        let cut = truncate(&long);
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn unfiltered_has_no_description() {
        assert_eq!(describe_filter(&FilterState::new().with_category("status", "All")), None);
    }

    #[test]
    fn filter_description_lists_active_parts() {
        let filter = FilterState::new()
            .with_term(" Oak ")
            .with_category("status", "Published");
        assert_eq!(
            describe_filter(&filter).as_deref(),
            Some("search \"oak\", status = Published")
        );
    }
}
