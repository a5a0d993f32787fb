use crate::domain::Stage;
use crate::session::messages::{Key, Modifiers, Msg, Named};
use crate::session::state::Session;

/// Map a key press to a session message
///
/// Stage shortcuts `1`-`5` select ROI through Review and are dropped while
/// the stage is still locked.
pub fn handle_key_event(session: &Session, key: &Key, modifiers: Modifiers) -> Option<Msg> {
    match key {
        // Held to pan, released in the key handler
        Key::Named(Named::Space) => Some(Msg::pan_key(true)),
        Key::Named(Named::Escape) => Some(Msg::cancel_gesture()),
        Key::Named(Named::Tab) if session.stage == Stage::Annotate => Some(Msg::next_joint()),
        // Ctrl combinations belong to the host
        Key::Character(_) if modifiers.control() => None,
        Key::Character(c) => match c.as_str() {
            "+" | "=" => Some(Msg::zoom_in()),
            "-" => Some(Msg::zoom_out()),
            "f" | "F" => session.roi.is_some().then(Msg::fit_to_roi),
            "1" | "2" | "3" | "4" | "5" => {
                let index = c.parse::<usize>().ok()?;
                let stage = *Stage::ALL.get(index)?;
                session.can_enter(stage).then(|| Msg::set_stage(stage))
            }
            _ => None,
        },
        _ => None,
    }
}
