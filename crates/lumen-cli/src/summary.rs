use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use lumen_cli::report::{CatalogRow, SummaryReport};
use lumen_engine::TargetStatus;
use lumen_model::Interval;

pub fn print_summary(report: &SummaryReport) {
    let summary = &report.summary;
    if !report.active_function.is_empty() {
        println!("Function: {}", report.active_function);
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Chain"),
        header_cell("Label"),
        header_cell("Source (lm)"),
        header_cell("Efficiency"),
        header_cell("Output (lm)"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    for chain in &summary.chains {
        table.add_row(vec![
            Cell::new(chain.chain_id.as_str()),
            Cell::new(&chain.label),
            Cell::new(format!("{:.1}", chain.source_lumens)),
            Cell::new(percent(chain.efficiency)),
            Cell::new(format!("{:.1}", chain.final_lumens)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell(format!("{} chains", summary.chains.len())),
        Cell::new(format!("{:.1}", summary.total_source_lumens)).add_attribute(Attribute::Bold),
        Cell::new(percent(summary.system_efficiency)).add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}", summary.total_lumens)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if let Some(status) = report.status() {
        let mut target = Table::new();
        apply_table_style(&mut target);
        target.add_row(vec![
            header_cell("Target (lm)"),
            Cell::new(format!("{:.1}", report.target_lumens)),
            status_cell(status),
        ]);
        println!("{target}");
    }
}

pub fn print_catalog(rows: &[CatalogRow]) {
    if rows.is_empty() {
        println!("Catalog is empty.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Label"),
        header_cell("Modifier"),
        header_cell("Input"),
        header_cell("Options"),
    ]);
    apply_table_style(&mut table);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.kind),
            Cell::new(&row.label),
            Cell::new(&row.modifier),
            dim_cell(row.input),
            Cell::new(&row.options),
        ]);
    }
    println!("{table}");
}

fn percent(range: Interval) -> String {
    format!("{:.1}% - {:.1}%", range.min * 100.0, range.max * 100.0)
}

fn status_cell(status: TargetStatus) -> Cell {
    let (text, color) = match status {
        TargetStatus::Below => ("below target", Color::Red),
        TargetStatus::Within => ("within range", Color::Yellow),
        TargetStatus::Above => ("meets target", Color::Green),
    };
    Cell::new(text).fg(color).add_attribute(Attribute::Bold)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
