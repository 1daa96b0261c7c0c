/// egui rendering: sidebar and top bar in `panels`, charts in `plot`.
pub mod panels;
pub mod plot;
