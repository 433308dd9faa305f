use itertools::Itertools;
use scryfall::{Card, Color, Face};

/// Joins items like an english enumeration, e.g. "a, b or c".
/// With more than `max_items` items only the first `max_items` are listed followed by "...".
pub fn listing<S: AsRef<str>>(
    items: &[S],
    sep: &str,
    final_sep: &str,
    max_items: Option<usize>,
) -> String {
    match items {
        [] => String::new(),
        [item] => item.as_ref().to_string(),
        [init @ .., last] => match max_items {
            Some(max) if items.len() > max => items[..max]
                .iter()
                .map(AsRef::as_ref)
                .chain(std::iter::once("..."))
                .join(sep),
            _ => format!(
                "{}{}{}",
                init.iter().map(AsRef::as_ref).join(sep),
                final_sep,
                last.as_ref()
            ),
        },
    }
}

pub fn format_print(name: &str, set: &str, collector_number: &str) -> String {
    format!("'{} ({}) {}'", name, set.to_uppercase(), collector_number)
}

pub fn format_card_print(card: &Card) -> String {
    format_print(&card.name, &card.set, &card.collector_number)
}

pub fn format_colors(colors: &[Color]) -> String {
    if colors.is_empty() {
        return "colorless".to_string();
    }
    let names: Vec<&str> = colors.iter().map(Color::name).collect();
    listing(&names, ", ", " and ", None)
}

fn format_token_face(face: &Face, colors: &[Color]) -> String {
    let mut s = String::new();
    if let Some(power) = face.power {
        s += &format!("{}/{} ", power, face.toughness.unwrap_or_default());
    }
    s += &format_colors(colors);
    s.push(' ');
    s += face.type_line.unwrap_or_default();
    match face.oracle_text {
        Some(text) if !text.is_empty() => s += &format!(" with '{}'", text),
        _ => {}
    }
    s
}

/// Describes a token by power/toughness, colors, type line and rules text,
/// e.g. "1/1 red Token Creature — Goblin with 'Haste'".
pub fn format_token(card: &Card) -> String {
    match (&card.colors, &card.card_faces) {
        // double faced tokens only have colors on their faces
        (None, Some(faces)) if faces.len() >= 2 => faces[..2]
            .iter()
            .map(|face| format_token_face(&Face::from(face), face.colors.as_deref().unwrap_or_default()))
            .join(" // "),
        (colors, _) => format_token_face(&Face::from(card), colors.as_deref().unwrap_or_default()),
    }
}

/// First letter upper case.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
