use crate::app::HexViewerApp;
use crate::ui_popup::PopupType;
use eframe::egui;
use hexdatalib::Architecture;

const WIDTH_CHOICES: [usize; 4] = [8, 16, 32, 48];

impl HexViewerApp {
    /// Displays the top menu bar with File, Edit, View, and About buttons
    pub(crate) fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menubar").show(ctx, |ui| {
            ui.add_space(3.0);

            egui::MenuBar::new().ui(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_file_menu(ui);
                    self.show_edit_menu(ui);
                    self.show_view_menu(ui);

                    // ABOUT BUTTON
                    if ui.button("About").clicked() {
                        self.popup.open(PopupType::About);
                    }
                });
            });

            ui.add_space(2.0);
        });
    }

    fn show_file_menu(&mut self, ui: &mut egui::Ui) {
        let has_data = !self.session.hexdata.is_empty();

        ui.menu_button("File", |ui| {
            // OPEN BUTTON
            if ui.button("Open file...").clicked() {
                self.open_dialog();
            }

            // SAVE BUTTONS
            if ui
                .add_enabled(
                    has_data && self.session.hexdata.is_modified(),
                    egui::Button::new("Save"),
                )
                .clicked()
            {
                self.save();
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Save as..."))
                .clicked()
            {
                self.save_as();
            }

            ui.separator();

            // RELOAD BUTTON
            if ui
                .add_enabled(self.session.hexdata.has_file(), egui::Button::new("Reload"))
                .clicked()
            {
                self.reload();
            }

            // CLOSE BUTTON
            if ui
                .add_enabled(has_data, egui::Button::new("Close file"))
                .clicked()
            {
                self.close_file();
            }
        });
    }

    fn show_edit_menu(&mut self, ui: &mut egui::Ui) {
        let has_data = !self.session.hexdata.is_empty();

        ui.menu_button("Edit", |ui| {
            if ui
                .add_enabled(has_data, egui::Button::new("Select all"))
                .clicked()
            {
                self.session.select_all();
            }

            if ui
                .add_enabled(has_data, egui::Button::new("Go to offset..."))
                .clicked()
            {
                self.popup.open(PopupType::GoTo);
            }

            ui.separator();

            if ui
                .add_enabled(has_data, egui::Button::new("Find next"))
                .clicked()
            {
                self.find(false);
            }
            if ui
                .add_enabled(has_data, egui::Button::new("Find previous"))
                .clicked()
            {
                self.find(true);
            }

            ui.separator();

            // RESTORE BUTTON
            if ui
                .add_enabled(
                    self.session.hexdata.is_modified(),
                    egui::Button::new("Restore byte changes"),
                )
                .clicked()
            {
                self.session.restore();
            }
        });
    }

    fn show_view_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("View", |ui| {
            ui.label("Bytes per Row:");
            ui.add_space(3.0);

            // RadioButtons to select the width
            let mut width = self.session.hexdata.bytes_per_line();
            for choice in WIDTH_CHOICES {
                ui.radio_value(&mut width, choice, format!("{choice} bytes"));
                ui.add_space(1.0);
            }
            if width != self.session.hexdata.bytes_per_line() {
                self.session.set_bytes_per_line(width);
                self.options.default_bytes_per_line = width;
                self.save_options();
            }

            ui.separator();

            // Disassembly settings
            let has_decoder = self.session.hexdata.has_decoder();
            let mut changed = ui
                .add_enabled(
                    has_decoder,
                    egui::Checkbox::new(&mut self.options.disassembly, "Show disassembly"),
                )
                .on_disabled_hover_text("Built without an instruction decoder")
                .changed();

            ui.add_enabled_ui(has_decoder && self.options.disassembly, |ui| {
                for arch in [Architecture::X86_16, Architecture::X86_32, Architecture::X86_64] {
                    changed |= ui
                        .radio_value(&mut self.options.architecture, arch, arch.label())
                        .changed();
                }
            });

            ui.separator();

            changed |= ui
                .checkbox(&mut self.options.dark_mode, "Dark mode")
                .changed();
            changed |= ui
                .checkbox(&mut self.options.auto_reload, "Reload when changed on disk")
                .on_hover_text("Only applies if there are no unsaved changes")
                .changed();

            if changed {
                self.apply_options();
                self.save_options();
            }
        });
    }

    /// Open the file dialog and load the picked file
    pub(crate) fn open_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new().set_title("Open File").pick_file() {
            self.load_file(&path);
        }
    }

    /// Find the next (or previous) occurrence of the search pattern
    pub(crate) fn find(&mut self, backwards: bool) {
        let found = if backwards {
            self.session.find_prev()
        } else {
            self.session.find_next()
        };
        if found.is_none() && !self.session.search.pattern().is_empty() {
            log::info!("Pattern '{}' not found", self.session.search.pattern_text);
        }
    }
}
