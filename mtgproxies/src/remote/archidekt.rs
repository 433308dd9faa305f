use log::debug;
use serde::Deserialize;
use std::collections::HashSet;

use crate::CardData;
use crate::decklist::ParsedDecklist;
use crate::error::Result;
use crate::scryfall_client::ScryfallClient;

#[derive(Deserialize, Debug)]
pub struct Deck {
    pub name: String,
    pub categories: Vec<Category>,
    pub cards: Vec<Item>,
}

#[derive(Deserialize, Debug)]
pub struct Category {
    pub name: String,
    #[serde(rename = "includedInDeck")]
    pub included_in_deck: bool,
}

#[derive(Deserialize, Debug)]
pub struct Item {
    pub quantity: u32,
    pub categories: Option<Vec<String>>,
    pub card: ItemCard,
}

#[derive(Deserialize, Debug)]
pub struct ItemCard {
    #[serde(rename = "oracleCard")]
    pub oracle_card: OracleCard,
    pub edition: Edition,
    #[serde(rename = "collectorNumber")]
    pub collector_number: String,
}

#[derive(Deserialize, Debug)]
pub struct OracleCard {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct Edition {
    pub editioncode: String,
}

/// Cards whose first category is not part of the deck (e.g. "Maybeboard") are left out.
pub fn decklist_from_deck<'a>(card_data: &'a CardData, deck: &Deck) -> Result<ParsedDecklist<'a>> {
    let in_deck: HashSet<&str> = deck
        .categories
        .iter()
        .filter(|category| category.included_in_deck)
        .map(|category| category.name.as_str())
        .collect();

    let mut parsed = ParsedDecklist::new();
    for item in deck.cards.iter() {
        if let Some(first) = item.categories.as_ref().and_then(|c| c.first()) {
            if !in_deck.contains(first.as_str()) {
                debug!("skipping {} in category {}", item.card.oracle_card.name, first);
                continue;
            }
        }
        let name = &item.card.oracle_card.name;
        parsed.push_card(
            card_data,
            item.quantity,
            name,
            Some(&item.card.edition.editioncode),
            Some(&item.card.collector_number),
            name,
        )?;
    }
    parsed.decklist.name = Some(deck.name.clone());
    Ok(parsed)
}

pub fn fetch<'a>(
    client: &ScryfallClient,
    card_data: &'a CardData,
    archidekt_id: &str,
) -> Result<ParsedDecklist<'a>> {
    let deck: Deck = client.get_json(&format!("https://archidekt.com/api/decks/{}/", archidekt_id))?;
    decklist_from_deck(card_data, &deck)
}
