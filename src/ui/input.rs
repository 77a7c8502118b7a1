use winit::event::{ElementState, MouseButton};
use winit::keyboard::{Key, NamedKey};

use crate::data::ItemId;
use crate::layout::Placement;

/// Mouse state tracking.
#[derive(Debug, Default)]
pub struct MouseState {
    pub x: f64,
    pub y: f64,
}

/// Hit-test: find which placement contains the given point.
pub fn hit_test(placements: &[Placement], x: f64, y: f64) -> Option<ItemId> {
    placements.iter().find(|p| p.contains(x, y)).map(|p| p.id)
}

/// Input action produced from raw input events.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Open the item editor
    EditItems,
    /// Remove the item under the cursor
    RemoveItem { id: ItemId },
    /// Restore the built-in data set
    ResetItems,
    /// No action
    None,
}

/// Process a mouse button event.
pub fn process_mouse_button(button: MouseButton, state: ElementState, hover: Option<ItemId>) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match (button, hover) {
        (MouseButton::Left, Some(_)) => InputAction::EditItems,
        (MouseButton::Middle, Some(id)) => InputAction::RemoveItem { id },
        _ => InputAction::None,
    }
}

/// Process a keyboard event.
pub fn process_key(key: Key, state: ElementState, hover: Option<ItemId>) -> InputAction {
    if state != ElementState::Pressed {
        return InputAction::None;
    }

    match key.as_ref() {
        Key::Named(NamedKey::F2) => InputAction::EditItems,
        Key::Named(NamedKey::Delete) | Key::Named(NamedKey::Backspace) => match hover {
            Some(id) => InputAction::RemoveItem { id },
            None => InputAction::None,
        },
        Key::Character("r") | Key::Character("R") => InputAction::ResetItems,
        _ => InputAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_items;
    use crate::layout::compute_layout;

    #[test]
    fn hit_test_finds_the_covering_placement() {
        let layout = compute_layout(&sample_items(), 1000.0, 800.0).unwrap();
        assert_eq!(hit_test(&layout.placements, 5.0, 5.0), Some(ItemId(0)));
        assert_eq!(hit_test(&layout.placements, 5.0, 790.0), Some(ItemId(1)));
        assert_eq!(hit_test(&layout.placements, 995.0, 795.0), Some(ItemId(5)));
        assert_eq!(hit_test(&layout.placements, 1000.5, 10.0), None);
        assert_eq!(hit_test(&layout.placements, -1.0, 10.0), None);
    }

    #[test]
    fn delete_needs_a_hovered_item() {
        let delete = Key::Named(NamedKey::Delete);
        assert_eq!(
            process_key(delete.clone(), ElementState::Pressed, Some(ItemId(3))),
            InputAction::RemoveItem { id: ItemId(3) }
        );
        assert_eq!(process_key(delete.clone(), ElementState::Pressed, None), InputAction::None);
        assert_eq!(process_key(delete, ElementState::Released, Some(ItemId(3))), InputAction::None);
    }

    #[test]
    fn f2_opens_the_editor() {
        assert_eq!(
            process_key(Key::Named(NamedKey::F2), ElementState::Pressed, None),
            InputAction::EditItems
        );
        assert_eq!(
            process_mouse_button(MouseButton::Left, ElementState::Pressed, Some(ItemId(0))),
            InputAction::EditItems
        );
        assert_eq!(
            process_mouse_button(MouseButton::Left, ElementState::Pressed, None),
            InputAction::None
        );
    }
}
