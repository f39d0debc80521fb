use egui::{Color32, RichText, Ui};

/// Dropdown over a fixed set of options. Returns true when the
/// selection changed.
pub fn enum_combo<T: Copy + PartialEq>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &mut T,
    options: &[T],
    fmt: impl Fn(&T) -> String,
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        if !label.is_empty() {
            ui.label(label);
        }
        egui::ComboBox::from_id_salt(id)
            .selected_text(fmt(current))
            .show_ui(ui, |ui| {
                for option in options {
                    if ui.selectable_value(current, *option, fmt(option)).changed() {
                        changed = true;
                    }
                }
            });
    });
    changed
}

/// Dropdown with an unset state shown as `placeholder`.
pub fn optional_combo<T: Copy + PartialEq>(
    ui: &mut Ui,
    id: &str,
    placeholder: &str,
    current: &mut Option<T>,
    options: &[T],
    fmt: impl Fn(&T) -> String,
) -> bool {
    let mut changed = false;
    let selected_text = match current {
        Some(v) => fmt(v),
        None => placeholder.to_string(),
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            if ui
                .selectable_value(current, None, placeholder)
                .changed()
            {
                changed = true;
            }
            for option in options {
                if ui
                    .selectable_value(current, Some(*option), fmt(option))
                    .changed()
                {
                    changed = true;
                }
            }
        });
    changed
}

/// Visibility checkbox with the series color on its label.
pub fn series_checkbox(ui: &mut Ui, checked: &mut bool, label: &str, color: Color32) -> bool {
    ui.checkbox(checked, RichText::new(label).color(color).strong())
        .changed()
}
