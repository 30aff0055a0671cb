//! Category pill color lookup.

/// Maps a category label to its pill color name.
///
/// Unknown labels (including case variants) fall back to `blue`.
pub fn category_color(category: &str) -> &'static str {
    match category {
        "Питание" | "Личное" => "blue",
        "Финансы" | "Конференция" => "green",
        "Семья" | "Футболки" => "red",
        "Проект" => "cyan",
        "Операционка" | "Презентация" => "violet",
        "Таргет" => "brown",
        "Встреча" => "teal",
        _ => "blue",
    }
}

#[cfg(test)]
mod tests {
    use super::category_color;

    #[test]
    fn known_categories_map_to_their_colors() {
        assert_eq!(category_color("Таргет"), "brown");
        assert_eq!(category_color("Встреча"), "teal");
        assert_eq!(category_color("Финансы"), "green");
    }

    #[test]
    fn unknown_and_case_variant_labels_fall_back_to_blue() {
        assert_eq!(category_color("встреча"), "blue");
        assert_eq!(category_color("Совсем новое"), "blue");
    }
}
