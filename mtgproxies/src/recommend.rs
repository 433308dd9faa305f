use itertools::Itertools;
use scryfall::{BorderColor, Card, Frame, FrameEffect};

use crate::database::CardDatabase;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrintMode {
    /// the single print with the highest score
    Best,
    /// all prints, best first
    All,
    /// the best prints of every artwork
    Choices,
}

/// Criteria are weighted by powers of two, so a higher one outweighs all lower ones combined.
pub fn score(card: &Card, mode: PrintMode) -> u32 {
    let mut points = 0;
    if card.set != "mb1" && card.border_color != BorderColor::Gold {
        points += 1;
    }
    if card.frame == Frame::Year2015 {
        points += 2;
    }
    if !card.digital {
        points += 4;
    }
    if card.border_color == BorderColor::Black
        && (mode != PrintMode::Best || !card.has_frame_effect(FrameEffect::ExtendedArt))
    {
        points += 8;
    }
    if !is_promo(card) && card.nonfoil {
        points += 16;
    }
    if card.highres_image {
        points += 32;
    }
    if card.lang == "en" {
        points += 64;
    }
    points
}

/// Promo and secret lair prints carry a suffix on the collector number.
pub fn is_promo(card: &Card) -> bool {
    card.collector_number.ends_with(['p', 's'])
}

// not every card has an illustration id
fn artwork(card: &Card) -> &str {
    card.front_illustration_id().unwrap_or(&card.id)
}

fn bring_to_front<'a>(current: Option<&'a Card>, cards: Vec<&'a Card>) -> Vec<&'a Card> {
    match current {
        Some(current) => std::iter::once(current)
            .chain(cards.into_iter().filter(|c| c.id != current.id))
            .collect(),
        None => cards,
    }
}

/// Ranks `candidates`, ties are resolved by candidate order.
pub fn recommend<'a>(
    candidates: &[&'a Card],
    current: Option<&'a Card>,
    mode: PrintMode,
) -> Vec<&'a Card> {
    let scores: Vec<u32> = candidates.iter().map(|c| score(c, mode)).collect();
    match mode {
        PrintMode::Best => {
            let Some(&max) = scores.iter().max() else {
                return current.into_iter().collect();
            };
            if let Some(current) = current {
                if score(current, mode) == max {
                    return vec![current];
                }
            }
            // first print with the highest score
            candidates
                .iter()
                .zip(scores.iter())
                .find(|(_, s)| **s == max)
                .map(|(c, _)| vec![*c])
                .unwrap_or_default()
        }
        PrintMode::All => {
            let sorted: Vec<&Card> = candidates
                .iter()
                .zip(scores.iter())
                .sorted_by(|(_, a), (_, b)| b.cmp(a))
                .map(|(c, _)| *c)
                .collect();
            bring_to_front(current, sorted)
        }
        PrintMode::Choices => {
            let scored: Vec<(&str, &'a Card, u32)> = candidates
                .iter()
                .zip(scores)
                .map(|(&c, s)| (artwork(c), c, s))
                .collect();
            let mut choices = Vec::new();
            // artworks in order of their first appearance
            for artwork in scored.iter().map(|(a, _, _)| *a).unique() {
                let group = scored.iter().filter(|(a, _, _)| *a == artwork);
                let max = group.clone().map(|(_, _, s)| *s).max().unwrap_or_default();
                choices.extend(group.filter(|(_, _, s)| *s == max).map(|(_, c, _)| *c));
            }
            bring_to_front(current, choices)
        }
    }
}

/// Alternatives for a print: all prints sharing its oracle id.
pub fn alternatives<'a>(database: &'a CardDatabase, card: &'a Card) -> Vec<&'a Card> {
    match card.oracle_id() {
        Some(oracle_id) => database.prints_by_oracle_id(oracle_id),
        None => vec![card],
    }
}

/// The best print, keeping `current` if nothing scores higher.
pub fn recommend_best<'a>(candidates: &[&'a Card], current: Option<&'a Card>) -> Option<&'a Card> {
    recommend(candidates, current, PrintMode::Best).into_iter().next()
}
