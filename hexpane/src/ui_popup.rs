use crate::app::HexViewerApp;
use eframe::egui;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PopupType {
    Error,
    About,
    GoTo,
}

impl PopupType {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::About => "About",
            Self::GoTo => "Go To Offset",
        }
    }
}

#[derive(Default)]
pub struct Popup {
    /// Is there a pop-up
    pub(crate) active: bool,
    pub(crate) ptype: Option<PopupType>,
    /// Offset typed into the go-to pop-up
    offset_input: String,
}

impl Popup {
    pub(crate) const fn open(&mut self, ptype: PopupType) {
        self.active = true;
        self.ptype = Some(ptype);
    }

    pub const fn clear(&mut self) {
        self.active = false;
        self.ptype = None;
    }
}

impl HexViewerApp {
    fn display_about(ui: &mut egui::Ui) {
        ui.label("Cross-platform hex viewing and editing app");
        ui.add_space(3.0);
        ui.label(
            "Bytes are edited in place, nibble by nibble. The whole file is kept in memory, \
            large files need as much RAM as their size.",
        );
        ui.add_space(3.0);
        ui.separator();
        ui.label(format!("hexpane v{}", env!("CARGO_PKG_VERSION")));
    }

    fn display_goto(&mut self, ui: &mut egui::Ui) {
        ui.label(format!(
            "Offset (hex, 0 - {:X}):",
            self.session.hexdata.file_size().saturating_sub(1)
        ));

        let response = ui.add(
            egui::TextEdit::singleline(&mut self.popup.offset_input).desired_width(f32::INFINITY),
        );
        response.request_focus();
        if response.changed() {
            self.popup.offset_input.retain(|c| c.is_ascii_hexdigit());
            self.popup.offset_input.truncate(16);
        }
    }

    /// Show the active pop-up as a modal window. It closes on OK, Enter, Escape or a
    /// click outside of it.
    pub(crate) fn show_popup(&mut self, ctx: &egui::Context) {
        let Some(ptype) = self.popup.ptype else {
            self.popup.clear();
            return;
        };

        let mut confirmed = false;
        let response = egui::Modal::new(egui::Id::new("popup")).show(ctx, |ui| {
            ui.set_width(320.0);
            ui.heading(ptype.title());
            ui.add_space(5.0);

            match ptype {
                PopupType::Error => {
                    ui.label(self.error.borrow().as_deref().unwrap_or_default());
                }
                PopupType::About => Self::display_about(ui),
                PopupType::GoTo => self.display_goto(ui),
            }

            ui.add_space(8.0);
            confirmed = ui.button(" OK ").clicked() || self.events.enter_pressed;
        });

        if !confirmed && !response.should_close() {
            return;
        }

        *self.error.borrow_mut() = None;
        self.popup.clear();

        let input = std::mem::take(&mut self.popup.offset_input);
        if ptype == PopupType::GoTo
            && confirmed
            && let Ok(offset) = usize::from_str_radix(&input, 16)
            && !self.session.go_to(offset)
        {
            self.report_error(format!("Offset 0x{offset:X} is outside of the data"));
        }
    }
}
