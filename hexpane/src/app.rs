use crate::events::EventState;
use crate::ui_popup::Popup;
use hexdatalib::{AppOptions, DiskStatus, EditorSession};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

pub mod colors {
    use eframe::egui::Color32;

    pub const LIGHT_BLUE: Color32 = Color32::from_rgba_premultiplied(33, 81, 109, 60);
    pub const MUD: Color32 = Color32::from_rgba_premultiplied(54, 44, 19, 60);
    pub const GREEN: Color32 = Color32::from_rgba_premultiplied(35, 83, 38, 60);
    pub const GRAY_160: Color32 = Color32::from_gray(160);
    pub const GRAY_110: Color32 = Color32::from_gray(110);
    pub const CARET: Color32 = Color32::from_rgb(230, 120, 40);
    pub const ANNOTATION: Color32 = Color32::from_rgb(110, 160, 200);
    pub const WARNING: Color32 = Color32::from_rgb(220, 160, 40);
    pub const MATCH: Color32 = Color32::from_rgb(90, 170, 90);
}

/// How often the file on disk is checked for changes
const DISK_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Block size of the entropy graph
pub const ENTROPY_BLOCK_SIZE: usize = 256;

pub struct HexViewerApp {
    /// Name of the opened file
    pub name: String,
    /// Buffer, cursor, selection and tool state
    pub session: EditorSession,
    /// Persisted settings
    pub options: AppOptions,
    /// Where `options` are saved to
    pub options_path: PathBuf,
    /// Pop up handler
    pub popup: Popup,
    /// Per-frame state of user inputs
    pub events: EventState,
    /// Is the pointer dragging a selection in the hex view
    pub dragging: bool,
    /// The file on disk changed and the buffer was not reloaded
    pub disk_changed: bool,
    /// Time of the last on-disk change check
    pub last_disk_check: Instant,
    /// Text field contents of the side panel
    pub goto_input: String,
    pub compare_path_input: String,

    // -- Shared UI states
    /// Errors during loading, editing, or writing the file
    pub error: Rc<RefCell<Option<String>>>,
}

impl Default for HexViewerApp {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            session: EditorSession::default(),
            options: AppOptions::default(),
            options_path: PathBuf::from(hexdatalib::OPTIONS_FILE_NAME),
            popup: Popup::default(),
            events: EventState::default(),
            dragging: false,
            disk_changed: false,
            last_disk_check: Instant::now(),
            goto_input: String::new(),
            compare_path_input: String::new(),
            error: Rc::new(RefCell::new(None)),
        }
    }
}

impl HexViewerApp {
    /// Create the app with the given settings. The decoder and the width follow the options.
    pub fn new(options: AppOptions, options_path: PathBuf) -> Self {
        let mut app = Self {
            options_path,
            ..Self::default()
        };
        app.options = options;
        app.apply_options();
        app
    }

    /// Push the current options into the session
    pub(crate) fn apply_options(&mut self) {
        let hexdata = &mut self.session.hexdata;
        hexdata.set_architecture(self.options.architecture);
        hexdata.set_disassembly(self.options.disassembly && hexdata.has_decoder());
        if hexdata.is_empty() {
            hexdata.set_bytes_per_line(self.options.default_bytes_per_line);
        }
    }

    /// Persist the current options. Failures are logged, not shown.
    pub(crate) fn save_options(&self) {
        if let Err(err) = self.options.save(&self.options_path) {
            log::warn!("{err}");
        }
    }

    pub(crate) fn report_error(&self, msg: impl Into<String>) {
        self.error.borrow_mut().replace(msg.into());
    }

    /// Load a file from disk into the session, replacing the current one.
    pub(crate) fn load_file(&mut self, path: &Path) {
        if self.session.hexdata.is_modified() {
            log::warn!("Discarding unsaved changes of '{}'", self.name);
        }

        let res = self.session.load_file(path);

        self.name = path.file_name().map_or_else(
            || "Untitled".to_string(),
            |n| n.to_string_lossy().into_owned(),
        );
        self.disk_changed = false;
        self.session.compare.set_file(PathBuf::new());
        self.compare_path_input.clear();

        if let Err(err) = res {
            self.report_error(err.to_string());
        }
    }

    /// Load bytes from memory (e.g. stdin) into the session
    pub(crate) fn load_bytes(&mut self, name: &str, data: Vec<u8>) {
        // Keep the decoder and width settings of the current buffer
        self.session.hexdata.clear();
        self.session.hexdata.load_bytes(data);
        self.session = EditorSession::new(std::mem::take(&mut self.session.hexdata));
        self.name = name.to_string();
        self.disk_changed = false;
    }

    pub(crate) fn save(&mut self) {
        if !self.session.hexdata.has_file() {
            self.save_as();
            return;
        }
        match self.session.save() {
            Ok(()) => self.disk_changed = false,
            Err(err) => self.report_error(err.to_string()),
        }
    }

    pub(crate) fn save_as(&mut self) {
        if self.session.hexdata.is_empty() {
            return;
        }
        let Some(path) = rfd::FileDialog::new()
            .set_title("Save As")
            .set_file_name(self.name.clone())
            .save_file()
        else {
            return;
        };

        match self.session.save_file(&path) {
            Ok(()) => {
                self.name = path.file_name().map_or_else(
                    || "Untitled".to_string(),
                    |n| n.to_string_lossy().into_owned(),
                );
                self.disk_changed = false;
            }
            Err(err) => self.report_error(err.to_string()),
        }
    }

    pub(crate) fn close_file(&mut self) {
        self.session.close();
        self.name = "Untitled".to_string();
        self.disk_changed = false;
    }

    pub(crate) fn reload(&mut self) {
        match self.session.reload() {
            Ok(()) => self.disk_changed = false,
            Err(err) => self.report_error(err.to_string()),
        }
    }

    /// Check the file on disk for changes (throttled).
    pub(crate) fn check_disk(&mut self) {
        if self.last_disk_check.elapsed() < DISK_CHECK_INTERVAL || self.disk_changed {
            return;
        }
        self.last_disk_check = Instant::now();

        match self.session.sync_with_disk(self.options.auto_reload) {
            Ok(DiskStatus::Unchanged | DiskStatus::Reloaded) => {}
            Ok(DiskStatus::Changed) => {
                log::warn!("'{}' was modified on disk", self.name);
                self.disk_changed = true;
            }
            Err(err) => self.report_error(err.to_string()),
        }
    }

    /// Title of the main window
    pub(crate) fn title(&self) -> String {
        if self.session.hexdata.is_modified() {
            format!("Hexpane - {} *", self.name)
        } else {
            format!("Hexpane - {}", self.name)
        }
    }
}
