use airkeys_core::capture::SessionStats;
use airkeys_core::layout::KeyboardLayout;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

pub fn layout_table(layout: &KeyboardLayout) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("X"),
        Cell::new("Y"),
        Cell::new("W"),
        Cell::new("H"),
    ]);

    for i in 1..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for r in layout.regions() {
        let label = if r.label == layout.delete_label() {
            Cell::new(&r.label).fg(Color::Red)
        } else {
            Cell::new(&r.label)
        };
        table.add_row(vec![
            label.set_alignment(CellAlignment::Center),
            Cell::new(format!("{:.0}", r.x)),
            Cell::new(format!("{:.0}", r.y)),
            Cell::new(format!("{:.0}", r.w)),
            Cell::new(format!("{:.0}", r.h)),
        ]);
    }
    table
}

pub fn print_layout(layout: &KeyboardLayout) {
    let (w, h) = layout.extent();
    println!("\nKeyboard: {} keys, {:.0}x{:.0}", layout.len(), w, h);
    println!("{}", layout_table(layout));
}

pub fn summary_table(session_id: &str, stats: &SessionStats) -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new(format!("Session {}", session_id)).add_attribute(Attribute::Bold),
        Cell::new("Count"),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    let rows = [
        ("Cycles", stats.cycles, None),
        ("Rendered", stats.rendered, Some(Color::Green)),
        ("Degraded", stats.degraded, Some(Color::Red)),
        ("Accepted presses", stats.accepted, Some(Color::Cyan)),
        ("Debounced presses", stats.debounced, None),
    ];
    for (name, value, color) in rows {
        let cell = Cell::new(value);
        let cell = match color {
            Some(c) => cell.fg(c),
            None => cell,
        };
        table.add_row(vec![Cell::new(name), cell]);
    }
    table
}

pub fn print_session_summary(session_id: &str, stats: &SessionStats) {
    println!("\n{}", summary_table(session_id, stats));
}
