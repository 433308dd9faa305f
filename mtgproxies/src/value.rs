use crate::database::{CardDatabase, Currency};
use crate::decklist::Decklist;
use crate::warnings::{Severity, Warning};

pub const DEFAULT_LUMP_THRESHOLD: f64 = 0.03;
pub const OTHER: &str = "other";

#[derive(Debug, PartialEq, Clone)]
pub struct DeckValue {
    /// (card name, count × price), descending, cheap cards lumped into "other"
    pub entries: Vec<(String, f64)>,
    pub total: f64,
    pub warnings: Vec<Warning>,
}

/// The value of a decklist decomposed by card, using the lowest price over all prints.
pub fn deck_value(
    database: &CardDatabase,
    decklist: &Decklist,
    currency: Currency,
    lump_threshold: f64,
) -> DeckValue {
    let mut card_prices = Vec::new();
    let mut warnings = Vec::new();
    for (i, entry) in decklist.entries.iter().enumerate() {
        let crate::decklist::DecklistEntry::Card(line) = entry else {
            continue;
        };
        let price = line
            .card
            .oracle_id()
            .and_then(|oracle_id| database.get_price(oracle_id, currency, None));
        match price {
            Some(price) => card_prices.push((line.card.name.clone(), line.count as f64 * price)),
            None => warnings.push(Warning::new(
                Severity::Warning,
                Some(i),
                format!("Unable to find price for {}", line.card.name),
            )),
        }
    }

    card_prices.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    let total: f64 = card_prices.iter().map(|(_, p)| p).sum();

    let (mut entries, lumped): (Vec<_>, Vec<_>) = card_prices
        .into_iter()
        .partition(|(_, price)| *price >= lump_threshold * total);
    if !lumped.is_empty() {
        entries.push((OTHER.to_string(), lumped.iter().map(|(_, p)| p).sum()));
    }

    DeckValue {
        entries,
        total,
        warnings,
    }
}
