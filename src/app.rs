use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, results};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AllotmentApp {
    pub state: AppState,
}

impl AllotmentApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AllotmentApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: how to ask ----
        egui::SidePanel::left("tips_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::tips_panel(ui, &mut self.state);
            });

        // ---- Central panel: preview, question, answer ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results::central(ui, &mut self.state);
        });
    }
}
