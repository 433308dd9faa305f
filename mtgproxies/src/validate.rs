use scryfall::{BorderColor, Card};

use crate::database::{CardDatabase, CardFilter};
use crate::error::{Error, Result};
use crate::format::{capitalize, format_card_print, format_print, format_token, listing};
use crate::recommend::{alternatives, is_promo, recommend_best};
use crate::warnings::{Message, Severity};

/// Quality issues of a print that make it look bad on paper.
pub fn print_warnings(card: &Card) -> Vec<String> {
    let mut warnings = Vec::new();
    if !card.highres_image || card.digital {
        warnings.push("low resolution scan".to_string());
    }
    if is_promo(card) {
        warnings.push("promo".to_string());
    }
    if card.lang != "en" {
        warnings.push("non-english print".to_string());
    }
    if card.border_color != BorderColor::Black {
        warnings.push(format!("{} border", card.border_color.as_str()));
    }
    warnings
}

fn best_by_name<'a>(database: &'a CardDatabase, name: &str) -> Result<&'a Card> {
    let prints = database.get_cards(&CardFilter::by_name(name));
    recommend_best(&prints, None).ok_or_else(|| Error::NotFound(format!("no print of {}", name)))
}

/// Picks the print for a valid card name, optionally a specific one.
pub fn validate_print<'a>(
    database: &'a CardDatabase,
    name: &str,
    set: Option<&str>,
    collector_number: Option<&str>,
) -> Result<(&'a Card, Vec<Message>)> {
    let mut messages = Vec::new();

    let card = match set {
        None => {
            let card = best_by_name(database, name)?;
            // tokens are not unique by name
            if card.is_token() {
                messages.push((
                    Severity::Warning,
                    format!(
                        "Tokens are not unique by name. Assuming '{}' is a '{}'.",
                        name,
                        format_token(card)
                    ),
                ));
            }
            card
        }
        Some(set) => match database.get_card(name, Some(set), collector_number) {
            Some(card) => card,
            None => {
                let card = best_by_name(database, name)?;
                messages.push((
                    Severity::Warning,
                    format!(
                        "Unable to find scan of {}. Using {} instead.",
                        format_print(name, set, collector_number.unwrap_or_default()),
                        format_card_print(card)
                    ),
                ));
                card
            }
        },
    };

    let quality = print_warnings(card);
    if !quality.is_empty() {
        let candidates = alternatives(database, card);
        let recommendation = recommend_best(&candidates, Some(card)).unwrap_or(card);
        let mut message = format!(
            "{} for {}.",
            capitalize(&listing(&quality, ", ", " and ", None)),
            format_card_print(card)
        );
        if recommendation.id != card.id {
            message += &format!(" Maybe you want {}?", format_card_print(recommendation));
        }
        messages.push((Severity::Cosmetic, message));
    }

    Ok((card, messages))
}
