use log::{debug, warn};
use scryfall::{Card, Component};
use std::collections::HashSet;

use crate::database::CardDatabase;
use crate::decklist::Decklist;
use crate::recommend::{alternatives, recommend_best};

/// The tokens created by the cards of a decklist, each as its best print.
pub fn get_tokens<'a>(database: &'a CardDatabase, decklist: &Decklist<'a>) -> Vec<&'a Card> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for line in decklist.cards() {
        if line.card.is_token() {
            continue;
        }
        // not every print lists its related cards
        for print in alternatives(database, line.card) {
            let parts = print.all_parts.iter().flatten();
            for part in parts.filter(|part| part.component == Component::Token) {
                let Some(token) = database.card_by_id(&part.id) else {
                    warn!("token {} ({}) of {} is not in the database", part.name, part.id, print.name);
                    continue;
                };
                if seen.insert(token.oracle_id().unwrap_or(&token.id)) {
                    debug!("{} creates {}", line.card.name, token.name);
                    tokens.push(token);
                }
            }
        }
    }

    tokens
        .into_iter()
        .map(|token| recommend_best(&alternatives(database, token), Some(token)).unwrap_or(token))
        .collect()
}
