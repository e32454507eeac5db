use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use prep_classifier::Class;

use crate::commands::Classification;

pub fn print_results(result: &Classification, top_k: Option<usize>) {
    if let Some(best) = result.classes.first() {
        eprintln!("label: {}, score: {:.4}", best.label_id, best.score);
    }

    println!("Image: {}", result.image_path.display());
    println!("Size: {}x{}", result.width, result.height);
    println!("Pipeline: {}", result.stages.join(" -> "));
    println!("{}", results_table(&result.classes, top_k));
}

fn results_table(classes: &[Class], top_k: Option<usize>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rank"),
        header_cell("Label"),
        header_cell("Name"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    let shown = top_k.unwrap_or(classes.len());
    for (rank, class) in classes.iter().take(shown).enumerate() {
        let name = match &class.name {
            Some(name) => Cell::new(name),
            None => Cell::new("-").fg(Color::DarkGrey),
        };
        let score = Cell::new(format!("{:.4}", class.score));
        let score = if rank == 0 {
            score.fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            score
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(class.label_id),
            name,
            score,
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn class(label_id: i32, score: f32, name: Option<&str>) -> Class {
        Class {
            label_id,
            score,
            name: name.map(str::to_string),
        }
    }

    #[test]
    fn table_is_limited_to_top_k() {
        let classes = [
            class(3, 0.7, Some("cat")),
            class(1, 0.2, None),
            class(0, 0.1, Some("dog")),
        ];
        assert_eq!(results_table(&classes, Some(2)).row_count(), 2);
        assert_eq!(results_table(&classes, None).row_count(), 3);
    }

    #[test]
    fn table_renders_names_and_scores() {
        let mut table = results_table(&[class(3, 0.75, Some("cat"))], None);
        table.force_no_tty();
        let rendered = table.to_string();
        assert!(rendered.contains("cat"));
        assert!(rendered.contains("0.7500"));
    }
}
