use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

/// Questions offered as one-click examples.
pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "What rank should I get for Vardhaman Mahavir Medical College?",
    "What is the cutoff for general category at Vardhaman Mahavir Medical College?",
    "What is the cutoff for SC category at Maulana Azad Medical College?",
    "Which rank is needed for MBBS in Kasturba Medical College?",
    "What rank is required for EWS category at King George's Medical University?",
    "My rank is 10000, what colleges can I expect and what courses can I expect?",
];

// ---------------------------------------------------------------------------
// Left side panel – how to ask
// ---------------------------------------------------------------------------

/// Render the left panel with phrasing tips and clickable examples.
pub fn tips_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("How to Ask Your Question");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label("Here are some tips on how to phrase your question:");
            ui.label("• Include the name of the college (e.g., 'Vardhaman Mahavir Medical College').");
            ui.label("• Optionally, include the course name (e.g., 'MBBS').");
            ui.label("• Specify the category if applicable (e.g., 'general', 'SC', 'ST', 'OBC', 'EWS').");
            ui.label("• Mention your rank to see what colleges and courses you can expect (e.g., 'My rank is 10000').");

            ui.add_space(8.0);
            ui.strong("Examples");
            for question in EXAMPLE_QUESTIONS {
                if ui.link(*question).clicked() {
                    state.ask_example(question);
                }
            }

            if let Some(table) = &state.table {
                ui.add_space(8.0);
                egui::CollapsingHeader::new(RichText::new("Known categories").strong())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for c in &table.categories {
                            ui.label(c);
                        }
                    });
                egui::CollapsingHeader::new(RichText::new("Known courses").strong())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        for c in &table.courses {
                            ui.label(c);
                        }
                    });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(path)) = (&state.table, &state.table_path) {
            ui.label(format!("{} allotments loaded from {}", table.len(), path.display()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open allotment table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_table(&path);
    }
}
