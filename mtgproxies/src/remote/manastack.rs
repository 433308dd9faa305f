use serde::Deserialize;
use std::collections::HashMap;

use crate::CardData;
use crate::decklist::ParsedDecklist;
use crate::error::Result;
use crate::format::capitalize;
use crate::scryfall_client::ScryfallClient;

pub const DEFAULT_ZONES: [&str; 2] = ["commander", "mainboard"];

#[derive(Deserialize, Debug)]
pub struct Deck {
    pub info: Info,
    /// zone name to cards, e.g. "mainboard", "sideboard"
    pub list: HashMap<String, Vec<Item>>,
}

#[derive(Deserialize, Debug)]
pub struct Info {
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct Item {
    pub count: u32,
    pub card: ItemCard,
}

#[derive(Deserialize, Debug)]
pub struct ItemCard {
    pub name: String,
    pub set: Set,
    pub num: String,
}

#[derive(Deserialize, Debug)]
pub struct Set {
    pub slug: String,
}

/// Every non-empty zone gets a header comment, zones are separated by an empty comment.
pub fn decklist_from_deck<'a, S: AsRef<str>>(
    card_data: &'a CardData,
    deck: &Deck,
    zones: &[S],
) -> Result<ParsedDecklist<'a>> {
    let mut parsed = ParsedDecklist::new();
    for (i, zone) in zones.iter().enumerate() {
        let zone = zone.as_ref();
        let items = match deck.list.get(zone) {
            Some(items) if !items.is_empty() => items,
            _ => continue,
        };
        parsed.decklist.append_comment(capitalize(zone));
        for item in items {
            parsed.push_card(
                card_data,
                item.count,
                &item.card.name,
                Some(&item.card.set.slug),
                Some(&item.card.num),
                &item.card.name,
            )?;
        }
        if i + 1 != zones.len() {
            parsed.decklist.append_comment("");
        }
    }
    parsed.decklist.name = Some(deck.info.name.clone());
    Ok(parsed)
}

pub fn fetch<'a, S: AsRef<str>>(
    client: &ScryfallClient,
    card_data: &'a CardData,
    manastack_id: &str,
    zones: &[S],
) -> Result<ParsedDecklist<'a>> {
    let deck: Deck = client.get_json(&format!(
        "https://manastack.com/api/decklist?format=json&id={}",
        manastack_id
    ))?;
    decklist_from_deck(card_data, &deck, zones)
}
