use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Table;
use crate::pages::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – navigation
// ---------------------------------------------------------------------------

/// Render the sidebar page selector.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📊 Navigation");
    ui.separator();
    ui.label("Go to");

    let mut selected = state.page;
    for page in Page::ALL {
        ui.radio_value(&mut selected, page, page.title());
    }
    state.set_page(selected);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        let counts: Vec<String> = state
            .bundle
            .tables()
            .iter()
            .map(|t| format!("{}: {}", t.name, t.len()))
            .collect();
        ui.label(counts.join("  ·  "));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – page body
// ---------------------------------------------------------------------------

/// Render the selected page: heading, static text or debug info and charts.
pub fn page_body(ui: &mut Ui, state: &AppState) {
    ui.heading(state.page.heading());
    ui.add_space(8.0);

    match state.page {
        Page::Home => home(ui),
        Page::Recommendations => recommendations(ui),
        page => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    if let Some(table) = page.table(&state.bundle) {
                        debug_info(ui, table, state.cache.config().preview_rows);
                    }
                    ui.add_space(8.0);
                    super::plot::charts(ui, &state.charts);
                });
        }
    }
}

fn home(ui: &mut Ui) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Welcome to the");
        ui.label(RichText::new("interactive dashboard").strong());
        ui.label(".");
    });
    ui.label("Use the sidebar to navigate through different analysis sections.");
}

fn recommendations(ui: &mut Ui) {
    let items = [
        ("Invest in ", "digital-first cities", " with high readiness."),
        ("Diversify ", "ad revenue streams", " across categories."),
        ("Use ", "pilot results", " to expand into new cities."),
        ("Maintain ", "print strongholds", " while scaling digital."),
    ];
    for (before, strong, after) in items {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.label("•  ");
            ui.label(before);
            ui.label(RichText::new(strong).strong());
            ui.label(after);
        });
    }
}

/// Collapsible block with the normalized column names and the first rows.
fn debug_info(ui: &mut Ui, table: &Table, preview_rows: usize) {
    egui::CollapsingHeader::new(format!("🔍 Debug Info: {}", table.name))
        .id_salt(&table.name)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(format!("Source: {}", table.source.display()));
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.strong("Columns:");
                ui.label(format!("{:?}", table.column_names()));
            });
            ui.horizontal_wrapped(|ui: &mut Ui| {
                ui.strong("Original headers:");
                ui.label(format!("{:?}", table.original_column_names()));
            });

            let dups = table.duplicate_column_names();
            if !dups.is_empty() {
                ui.label(
                    RichText::new(format!("Duplicate column names: {dups:?}"))
                        .color(Color32::YELLOW),
                );
            }

            for col in &table.columns {
                if let Some(coercion) = &col.coercion {
                    ui.small(format!("{} ({}): {coercion}", col.name, col.kind()));
                }
            }

            ui.add_space(4.0);
            preview_table(ui, table, preview_rows);
        });
}

fn preview_table(ui: &mut Ui, table: &Table, rows: usize) {
    let head = table.head(rows);
    ScrollArea::horizontal()
        .id_salt(("preview", &table.name))
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(TableColumn::auto().at_least(60.0), table.columns.len())
                .header(20.0, |mut header| {
                    for name in table.column_names() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for row in &head {
                        body.row(18.0, |mut cells| {
                            for cell in row {
                                cells.col(|ui: &mut Ui| {
                                    ui.label(cell.to_string());
                                });
                            }
                        });
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open dataset folder")
        .set_directory(&state.cache.config().data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.set_data_dir(dir);
    }
}
