use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use enlighten::{Summary, System};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

pub fn build_systems_table(systems: &[System]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Status", "Timezone", "Location"]);
    for system in systems {
        let location = [&system.city, &system.state, &system.country]
            .into_iter()
            .filter_map(Option::as_deref)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(system.system_id).set_alignment(CellAlignment::Right),
            Cell::new(&system.system_name),
            status_cell(system.status.as_deref().unwrap_or_default()),
            Cell::new(system.timezone.as_deref().unwrap_or_default()).add_attribute(Attribute::Dim),
            Cell::new(location).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_summary_table(summary: &Summary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Date", "Status", "Power", "Today", "Lifetime", "Size", "Modules"]);
    table.add_row(vec![
        Cell::new(&summary.summary_date),
        status_cell(&summary.status),
        Cell::new(summary.current_power).set_alignment(CellAlignment::Right).fg(
            if summary.current_power.0 == 0 { Color::DarkYellow } else { Color::Green },
        ),
        Cell::new(summary.energy_today).set_alignment(CellAlignment::Right),
        Cell::new(summary.energy_lifetime)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
        Cell::new(summary.size).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
        Cell::new(summary.modules).set_alignment(CellAlignment::Right),
    ]);
    table
}

fn status_cell(status: &str) -> Cell {
    Cell::new(status).fg(if status == "normal" { Color::Green } else { Color::Red })
}
