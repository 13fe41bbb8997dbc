use crate::app::{ENTROPY_BLOCK_SIZE, HexViewerApp, colors};
use eframe::egui;
use hexdatalib::{ChecksumAlgorithm, SearchType, search_all};
use std::path::PathBuf;

#[allow(clippy::needless_pass_by_value)]
/// Format the number so that it has separators (for readability)
pub fn format_with_separators<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (idx, ch) in s.chars().rev().enumerate() {
        if idx != 0 && idx % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, ch);
    }
    result
}

/// Row label aligned to the left of a grid cell
fn grid_label(ui: &mut egui::Ui, text: &str) {
    ui.with_layout(egui::Layout::left_to_right(egui::Align::LEFT), |ui| {
        ui.label(text);
    });
}

impl HexViewerApp {
    /// Show the side panel with the file information, go to, search, checksum, compare
    /// and entropy tools.
    pub(crate) fn show_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("left_panel")
            .exact_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(3.0);

                    self.section(ui, "File Information", true, Self::show_file_info);
                    self.section(ui, "Go To Offset", true, Self::show_goto_contents);
                    self.section(ui, "Search", true, Self::show_search_contents);
                    self.section(ui, "Checksum", false, Self::show_checksum_contents);
                    self.section(ui, "Compare", false, Self::show_compare_contents);
                    self.section(ui, "Entropy", false, Self::show_entropy_contents);
                });
            });
    }

    fn section(
        &mut self,
        ui: &mut egui::Ui,
        title: &str,
        open: bool,
        contents: impl FnOnce(&mut Self, &mut egui::Ui),
    ) {
        egui::CollapsingHeader::new(title)
            .default_open(open)
            .show(ui, |ui| {
                ui.add_space(5.0);
                contents(self, ui);
                ui.add_space(5.0);
            });

        ui.add_space(3.0);
    }

    fn show_file_info(&mut self, ui: &mut egui::Ui) {
        let hexdata = &self.session.hexdata;
        let filepath = hexdata.filepath().to_string_lossy().into_owned();

        egui::Grid::new("file_info_grid")
            .num_columns(2) // two columns: label + value
            .spacing([30.0, 4.0]) // horizontal & vertical spacing
            .show(ui, |ui| {
                grid_label(ui, "File Name");
                // Wrap the name + show the filepath on hover
                let response = ui.add(
                    egui::Label::new(&self.name)
                        .wrap()
                        .sense(egui::Sense::hover()),
                );
                if !filepath.is_empty() {
                    response.on_hover_text(&filepath);
                }
                ui.end_row();

                grid_label(ui, "Size");
                ui.label(format!("{} bytes", format_with_separators(hexdata.file_size())));
                ui.end_row();

                grid_label(ui, "Modified");
                ui.label(if hexdata.is_modified() { "Yes" } else { "No" });
                ui.end_row();

                grid_label(ui, "Cursor");
                ui.label(
                    self.session
                        .cursor
                        .map_or_else(|| "-".to_string(), |c| format!("0x{c:08X}")),
                );
                ui.end_row();

                if let Some(range) = self.session.selection.ordered() {
                    grid_label(ui, "Selection");
                    ui.label(format!(
                        "0x{:X} - 0x{:X} ({} bytes)",
                        range.start(),
                        range.end(),
                        format_with_separators(range.end() - range.start() + 1)
                    ));
                    ui.end_row();
                }
            });

        // File on disk changed and was not reloaded automatically -> show warning
        if self.disk_changed {
            ui.add_space(3.0);
            ui.label(
                egui::RichText::new("File on disk has been modified!")
                    .color(colors::WARNING)
                    .size(12.0)
                    .strong(),
            )
            .on_hover_text(
                "This file has been modified on disk since it was opened.\n\
                Reloading discards the unsaved changes.",
            );
            if ui.button("Reload").clicked() {
                self.reload();
            }
        }
    }

    fn show_goto_contents(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("0x");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.goto_input)
                    .desired_width(ui.available_width() - 50.0),
            );
            if response.changed() {
                self.goto_input.retain(|c| c.is_ascii_hexdigit());
                self.goto_input.truncate(16);
            }

            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button("Go").clicked() || submitted)
                && let Ok(offset) = usize::from_str_radix(&self.goto_input, 16)
                && !self.session.go_to(offset)
            {
                self.report_error(format!("Offset 0x{offset:X} is outside of the data"));
            }
        });
    }

    fn show_search_contents(&mut self, ui: &mut egui::Ui) {
        ui.label("Hex pattern (e.g. DE AD BE EF):");
        ui.add_space(3.0);

        let mut text = self.session.search.pattern_text.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut text).desired_width(ui.available_width() - 30.0),
        );
        self.session.search.has_focus = response.has_focus();
        if response.changed() {
            self.session.search.set_pattern(&text.to_uppercase());
        }
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        ui.add_space(3.0);

        ui.horizontal(|ui| {
            if ui.button("Find").clicked() {
                self.session.search.run();
                self.find(false);
            }
            if ui.button("Next").clicked() || submitted {
                self.find(false);
            }
            if ui.button("Prev").clicked() {
                self.find(true);
            }
        });

        let pattern = self.session.search.pattern();
        if pattern.is_empty() {
            return;
        }

        ui.add_space(3.0);
        let hits = search_all(self.session.hexdata.data(), &SearchType::Hex(pattern)).len();
        match self.session.search.last_match {
            Some(offset) => ui.label(format!(
                "Match at 0x{offset:08X} ({} total)",
                format_with_separators(hits)
            )),
            None => ui.label(format!("{} match(es)", format_with_separators(hits))),
        };
    }

    fn show_checksum_contents(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            for algo in ChecksumAlgorithm::ALL {
                let mut checked = self.session.checksum.is_selected(algo);
                if ui.checkbox(&mut checked, algo.label()).changed() {
                    self.session.checksum.toggle(algo);
                }
            }
        });

        ui.horizontal(|ui| {
            ui.radio_value(&mut self.session.checksum.entire_file, true, "Entire file");
            ui.add_enabled_ui(!self.session.selection.is_empty(), |ui| {
                ui.radio_value(&mut self.session.checksum.entire_file, false, "Selection");
            });
        });

        ui.add_space(3.0);

        let has_data = !self.session.hexdata.is_empty();
        if ui
            .add_enabled(has_data, egui::Button::new("Compute"))
            .clicked()
        {
            self.session.compute_checksums();
        }

        let Some(results) = &self.session.checksum_results else {
            return;
        };

        ui.add_space(5.0);
        ui.label(format!("Over {} bytes", format_with_separators(results.size)));

        for (algo, digest) in &results.digests {
            ui.horizontal(|ui| {
                ui.label(algo.label());
                if ui
                    .add(egui::Label::new(egui::RichText::new(digest).monospace()).sense(egui::Sense::click()))
                    .on_hover_text("Click to copy")
                    .clicked()
                {
                    ui.ctx().copy_text(digest.clone());
                }
            });
        }

        ui.add_space(3.0);
        ui.label("Expected:");
        ui.add(
            egui::TextEdit::singleline(&mut self.session.checksum.expected)
                .desired_width(ui.available_width() - 30.0),
        );

        let expected = self.session.checksum.expected.trim();
        if !expected.is_empty() {
            match results.compare(expected) {
                Some(algo) => ui.label(
                    egui::RichText::new(format!("{} matches", algo.label())).color(colors::MATCH),
                ),
                None => ui.label(egui::RichText::new("No match").color(colors::WARNING)),
            };
        }
    }

    fn show_compare_contents(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.compare_path_input)
                    .hint_text("File to compare with")
                    .desired_width(ui.available_width() - 30.0),
            );
            if ui.button("...").clicked()
                && let Some(path) = rfd::FileDialog::new().set_title("Compare With").pick_file()
            {
                self.compare_path_input = path.to_string_lossy().into_owned();
            }
        });

        ui.add_space(3.0);

        let can_compare = !self.session.hexdata.is_empty() && !self.compare_path_input.is_empty();
        if ui
            .add_enabled(can_compare, egui::Button::new("Compare"))
            .clicked()
        {
            self.session
                .compare
                .set_file(PathBuf::from(self.compare_path_input.trim()));
            if let Err(err) = self.session.run_compare() {
                self.report_error(err.to_string());
            }
        }

        let Some(report) = &self.session.compare.report else {
            return;
        };

        ui.add_space(5.0);
        if report.is_identical() {
            ui.label(egui::RichText::new("Files are identical").color(colors::MATCH));
            return;
        }

        ui.label(format!(
            "{} differing bytes ({} vs {} bytes)",
            format_with_separators(report.differences),
            format_with_separators(report.left_size),
            format_with_separators(report.right_size)
        ));
        if report.truncated {
            ui.label(egui::RichText::new("Only the first ranges are listed").color(colors::WARNING));
        }

        // Clicking a range jumps to its first byte
        let mut target = None;
        egui::ScrollArea::vertical()
            .id_salt("compare_ranges")
            .max_height(150.0)
            .show(ui, |ui| {
                for range in &report.ranges {
                    let text = if range.start() == range.end() {
                        format!("0x{:08X}", range.start())
                    } else {
                        format!("0x{:08X} - 0x{:08X}", range.start(), range.end())
                    };
                    if ui.link(text).clicked() {
                        target = Some(*range.start());
                    }
                }
            });

        if let Some(offset) = target
            && !self.session.go_to(offset)
        {
            self.report_error(format!("Offset 0x{offset:X} is outside of the data"));
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn show_entropy_contents(&mut self, ui: &mut egui::Ui) {
        if ui
            .add_enabled(!self.session.hexdata.is_empty(), egui::Button::new("Compute"))
            .clicked()
        {
            self.session.compute_entropy(ENTROPY_BLOCK_SIZE);
        }

        let Some(report) = &self.session.entropy else {
            return;
        };

        ui.add_space(5.0);
        ui.label(format!("Overall: {:.4} bits/byte", report.overall));
        if let Some((block, value)) = report.max_block() {
            ui.label(format!(
                "Highest: {value:.4} at 0x{:08X}",
                block * report.block_size
            ));
        }

        if report.blocks.is_empty() {
            return;
        }

        // One bar per block, height proportional to the entropy (max 8 bits)
        let size = egui::vec2(ui.available_width(), 60.0);
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 2.0, ui.visuals().extreme_bg_color);

        let bar_width = rect.width() / report.blocks.len() as f32;
        for (i, value) in report.blocks.iter().enumerate() {
            let height = (*value as f32 / 8.0) * rect.height();
            let bar = egui::Rect::from_min_max(
                egui::pos2((i as f32).mul_add(bar_width, rect.left()), rect.bottom() - height),
                egui::pos2(((i + 1) as f32).mul_add(bar_width, rect.left()), rect.bottom()),
            );
            painter.rect_filled(bar, 0.0, colors::GRAY_160);
        }

        let block_size = report.block_size;
        if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            let block = ((pos.x - rect.left()) / bar_width).floor().max(0.0) as usize;
            self.session.go_to(block * block_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_separators() {
        assert_eq!(format_with_separators(0), "0");
        assert_eq!(format_with_separators(999), "999");
        assert_eq!(format_with_separators(1000), "1,000");
        assert_eq!(format_with_separators(1_048_576), "1,048,576");
    }
}
