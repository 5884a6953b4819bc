use eframe::egui::{self, Align, Key, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use allotment_assistant::answer::EMPTY_QUERY;
use allotment_assistant::data::model::Table;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel: preview, question box, answer
// ---------------------------------------------------------------------------

/// Render the central panel.
pub fn central(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Medical College Allotment AI Assistant");
    ui.add_space(4.0);

    let Some(table) = state.table.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open an allotment table to start  (File → Open…)");
        });
        return;
    };

    egui::CollapsingHeader::new(RichText::new("Data Preview").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let n = state.config.preview_rows.min(table.len());
            let rows: Vec<usize> = (0..n).collect();
            ui.push_id("preview", |ui: &mut Ui| {
                record_table(ui, &table, &rows, Some(160.0));
            });
        });
    ui.separator();

    question_box(ui, state);
    ui.add_space(6.0);

    match &state.answer {
        None => {
            ui.label(EMPTY_QUERY);
        }
        Some(answer) if answer.is_empty() => {
            ui.label(answer.headline());
        }
        Some(answer) => {
            ui.label(answer.headline());
            ui.add_space(4.0);
            ui.strong(format!("Detailed Results ({} rows)", answer.matches.len()));
            ui.push_id("results", |ui: &mut Ui| {
                record_table(ui, &table, &answer.matches, None);
            });
        }
    }
}

/// Single-line question input; Enter or the Ask button submits.
fn question_box(ui: &mut Ui, state: &mut AppState) {
    ui.label("Ask a question based on the data above");
    ui.horizontal(|ui: &mut Ui| {
        let input = ui.add(
            egui::TextEdit::singleline(&mut state.query)
                .hint_text("What is the cutoff for SC category at Maulana Azad Medical College?")
                .desired_width(ui.available_width() - 60.0),
        );
        let entered = input.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
        if ui.button("Ask").clicked() || entered {
            state.submit();
        }
    });
}

// ---------------------------------------------------------------------------
// Record table
// ---------------------------------------------------------------------------

/// Render the given rows of `table` with all columns.
fn record_table(ui: &mut Ui, table: &Table, rows: &[usize], max_height: Option<f32>) {
    let headers = table.headers();

    ScrollArea::horizontal()
        .id_salt("hscroll")
        .show(ui, |ui: &mut Ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(Column::auto().at_least(60.0).clip(true), headers.len());
            if let Some(h) = max_height {
                builder = builder.max_scroll_height(h);
            }

            builder
                .header(20.0, |mut header| {
                    for h in &headers {
                        header.col(|ui: &mut Ui| {
                            ui.strong(h);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows.len(), |mut row| {
                        let rec = &table.records[rows[row.index()]];
                        for cell in table.row_cells(rec) {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}
