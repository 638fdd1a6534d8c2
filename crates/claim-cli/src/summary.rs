use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use claim_cli::commands::RowsView;
use claim_cli::report::CheckReport;
use claim_model::ValidationResult;
use claim_validate::RuleSet;

pub fn print_check_summary(report: &CheckReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Claim"),
        header_cell("Groups"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for (file, record) in report.records() {
        let groups: Vec<&str> = record
            .groups
            .iter()
            .map(|group| group.group_type.as_str())
            .collect();
        table.add_row(vec![
            Cell::new(file),
            Cell::new(&record.id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(groups.join(" ")),
            count_cell(record.error_count(), Color::Red),
            count_cell(record.warning_count(), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} claims", report.record_count()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(report.error_count(), Color::Red).add_attribute(Attribute::Bold),
        count_cell(report.warning_count(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_result_table(report);

    let failed: Vec<_> = report.failed_files().collect();
    if !failed.is_empty() {
        eprintln!("Failed files:");
        for file in failed {
            eprintln!("- {}: {}", file.file, file.error.as_deref().unwrap_or_default());
        }
    }
}

fn print_result_table(report: &CheckReport) {
    let rows: Vec<(&str, &ValidationResult)> = report
        .records()
        .flat_map(|(_, record)| {
            record
                .validation_results
                .iter()
                .map(move |result| (record.id.as_str(), result))
        })
        .collect();
    if rows.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Claim"),
        header_cell("Rule"),
        header_cell("Group"),
        header_cell("Row"),
        header_cell("Severity"),
        header_cell("Message"),
    ]);
    apply_result_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for (claim, result) in rows {
        table.add_row(vec![
            Cell::new(claim),
            Cell::new(&result.rule_id),
            Cell::new(result.xml_type.as_str()),
            index_cell(result.index),
            severity_cell(result),
            Cell::new(&result.message),
        ]);
    }
    println!("{table}");
}

pub fn print_rules(rules: &RuleSet) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Active"),
        header_cell("Type"),
        header_cell("Group"),
        header_cell("Gate"),
        header_cell("Code"),
        header_cell("Name"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for compiled in rules.compiled() {
        let rule = compiled.rule();
        let gate = match rule.gate() {
            Some((field, values)) => Cell::new(format!("{field} in [{values}]")),
            None => dim_cell("-"),
        };
        let active = if rule.active {
            Cell::new("yes").fg(Color::Green)
        } else {
            dim_cell("no")
        };
        let code = match compiled.expression() {
            Ok(_) => Cell::new(&rule.code),
            Err(error) => Cell::new(format!("{} ({error})", rule.code)).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(&rule.id).add_attribute(Attribute::Bold),
            active,
            Cell::new(rule.rule_type.as_str()),
            Cell::new(rule.xml_type.as_str()),
            gate,
            code,
            Cell::new(&rule.name),
        ]);
    }
    println!("{table}");
    println!("{} of {} rules active", rules.active_count(), rules.len());
}

pub fn print_rows(view: &RowsView) {
    println!("Claim: {}", view.claim_id);
    println!("Group: {}", view.group_type);
    if view.rows.is_empty() {
        println!("No line items.");
        return;
    }
    let mut table = Table::new();
    let mut header = vec![header_cell("#")];
    header.extend(view.columns.iter().map(|column| header_cell(column)));
    header.push(header_cell("Results"));
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in &view.rows {
        let mut cells = vec![Cell::new(row.index)];
        cells.extend(row.cells.iter().map(Cell::new));
        let results: Vec<&str> = row
            .results
            .iter()
            .map(|result| result.message.as_str())
            .collect();
        cells.push(if results.is_empty() {
            dim_cell("-")
        } else if row.results.iter().any(|result| result.is_error) {
            Cell::new(results.join("; ")).fg(Color::Red)
        } else {
            Cell::new(results.join("; ")).fg(Color::Yellow)
        });
        table.add_row(cells);
    }
    println!("{table}");
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn index_cell(index: Option<usize>) -> Cell {
    match index {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn severity_cell(result: &ValidationResult) -> Cell {
    if result.is_error {
        Cell::new("ERROR").fg(Color::Red)
    } else {
        Cell::new("WARN").fg(Color::Yellow)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn apply_result_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
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
