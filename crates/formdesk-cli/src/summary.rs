use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell as TableCell, CellAlignment, Color, ContentArrangement, Table,
};

use formdesk_admin::{Cell, CellContent, Column, ListingRows, PostCounts, Row};
use formdesk_model::Form;

pub fn print_forms(forms: &[(Form, PostCounts)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Title"),
        header_cell("Fields"),
        header_cell("Published"),
        header_cell("Trashed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for (form, counts) in forms {
        table.add_row(vec![
            TableCell::new(form.id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            TableCell::new(form.title()),
            TableCell::new(form.processable_fields().count()),
            count_cell(counts.published),
            count_cell(counts.trashed),
        ]);
    }
    println!("{table}");
}

pub fn print_listing(rows: &ListingRows, visible: &[Column]) {
    let columns: Vec<&Column> = visible
        .iter()
        .filter(|column| column.slug != formdesk_admin::columns::CHECKBOX_COLUMN)
        .collect();

    let mut table = Table::new();
    table.set_header(
        columns
            .iter()
            .map(|column| header_cell(&column.label))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in &rows.rows {
        table.add_row(
            columns
                .iter()
                .map(|column| render_cell(row, &column.slug))
                .collect::<Vec<_>>(),
        );
    }
    println!("{table}");
    println!("{} of {} submissions", rows.rows.len(), rows.total);
}

fn render_cell(row: &Row, slug: &str) -> TableCell {
    let cell = row.cells.iter().find(|cell| cell.column == slug);
    match cell {
        Some(Cell { content, .. }) => match content {
            CellContent::Seq(seq) => TableCell::new(seq)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            CellContent::Date(date) => TableCell::new(format!("{} ({})", date.human, date.annotation)),
            CellContent::Text(text) => TableCell::new(text),
            CellContent::Items(items) => TableCell::new(items.join(", ")),
            CellContent::Empty => dim_cell("-"),
        },
        None => dim_cell("-"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize) -> TableCell {
    if count > 0 {
        TableCell::new(count)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> TableCell {
    TableCell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> TableCell {
    TableCell::new(value).fg(Color::DarkGrey)
}
