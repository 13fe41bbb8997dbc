use eframe::egui;
use hexdatalib::CursorMove;

#[derive(Default, Clone, Copy)]
pub struct EventState {
    /// Hex digit typed this frame
    pub(crate) hex_char: Option<char>,
    /// Cursor movement requested this frame
    pub(crate) cursor_move: Option<CursorMove>,
    pub(crate) escape_pressed: bool,
    pub(crate) enter_pressed: bool,
    /// F3 (`Some(false)`) or Shift+F3 (`Some(true)`)
    pub(crate) find_pressed: Option<bool>,
    pub(crate) save_pressed: bool,
    pub(crate) goto_pressed: bool,
    pub(crate) open_pressed: bool,
    pub(crate) select_all_pressed: bool,
    pub(crate) primary_pressed: bool,
    pub(crate) primary_down: bool,
    pub(crate) primary_released: bool,
    pub(crate) pointer: Option<egui::Pos2>,
    /// Scroll wheel movement this frame
    pub(crate) scroll_delta: f32,
}

#[allow(clippy::enum_glob_use)]
/// Helper for mapping keys to hex chars
const fn key_to_hex_char(key: egui::Key) -> Option<char> {
    use egui::Key::*;
    Some(match key {
        Num0 => '0',
        Num1 => '1',
        Num2 => '2',
        Num3 => '3',
        Num4 => '4',
        Num5 => '5',
        Num6 => '6',
        Num7 => '7',
        Num8 => '8',
        Num9 => '9',
        A => 'A',
        B => 'B',
        C => 'C',
        D => 'D',
        E => 'E',
        F => 'F',
        _ => return None,
    })
}

const fn key_to_cursor_move(key: egui::Key, command: bool) -> Option<CursorMove> {
    Some(match key {
        egui::Key::ArrowLeft => CursorMove::Left,
        egui::Key::ArrowRight => CursorMove::Right,
        egui::Key::ArrowUp => CursorMove::Up,
        egui::Key::ArrowDown => CursorMove::Down,
        egui::Key::PageUp => CursorMove::PageUp,
        egui::Key::PageDown => CursorMove::PageDown,
        egui::Key::Home if command => CursorMove::FileStart,
        egui::Key::End if command => CursorMove::FileEnd,
        egui::Key::Home => CursorMove::LineStart,
        egui::Key::End => CursorMove::LineEnd,
        _ => return None,
    })
}

/// Collect events once per frame and return an aggregated state.
/// Keys are ignored while a text field owns the keyboard.
pub fn collect_ui_events(ctx: &egui::Context) -> EventState {
    let text_focus = ctx.wants_keyboard_input();

    ctx.input(|i| {
        let mut state = EventState {
            primary_pressed: i.pointer.primary_pressed(),
            primary_down: i.pointer.primary_down(),
            primary_released: i.pointer.primary_released(),
            pointer: i.pointer.interact_pos(),
            scroll_delta: i.smooth_scroll_delta.y,
            escape_pressed: i.key_pressed(egui::Key::Escape),
            enter_pressed: i.key_pressed(egui::Key::Enter),
            ..Default::default()
        };

        // Shortcuts work regardless of focus
        for event in &i.events {
            if let egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } = event
            {
                match key {
                    egui::Key::F3 => state.find_pressed = Some(modifiers.shift),
                    egui::Key::S if modifiers.command => state.save_pressed = true,
                    egui::Key::G if modifiers.command => state.goto_pressed = true,
                    egui::Key::O if modifiers.command => state.open_pressed = true,
                    egui::Key::A if modifiers.command && !text_focus => {
                        state.select_all_pressed = true;
                    }
                    _ if modifiers.command || text_focus => {}
                    _ => {
                        if let Some(ch) = key_to_hex_char(*key) {
                            state.hex_char = Some(ch);
                        }
                        if let Some(mv) = key_to_cursor_move(*key, false) {
                            state.cursor_move = Some(mv);
                        }
                    }
                }

                if modifiers.command
                    && !text_focus
                    && matches!(key, egui::Key::Home | egui::Key::End)
                {
                    state.cursor_move = key_to_cursor_move(*key, true);
                }
            }
        }

        state
    })
}
