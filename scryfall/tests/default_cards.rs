use std::fs::File;
use std::path::Path;

use scryfall::{Card, Layout, List};

#[test]
fn test_default_cards() {
    let f = File::open(
        Path::new(env!("CARGO_MANIFEST_DIR")).join("test_input/default-cards_truncated.json"),
    )
    .expect("couldn't open input file with default cards");

    let cards: Vec<Card> = serde_json::from_reader(f).unwrap();
    println!(
        "there are {} cards in the default-cards bulk file",
        cards.len()
    );
    assert!(cards.iter().any(|c| c.layout == Layout::ReversibleCard));
}

#[test]
fn test_paginated_list() {
    let input = r#"{
        "object": "list",
        "total_cards": 1,
        "has_more": true,
        "next_page": "https://api.scryfall.com/cards/search?page=2&q=delver",
        "data": [{"id": "a", "name": "Delver of Secrets // Insectile Aberration"}]
    }"#;
    let list: List<serde_json::Value> = serde_json::from_str(input).unwrap();
    assert!(list.has_more);
    assert_eq!(list.data.len(), 1);
    assert_eq!(
        list.next_page.as_deref(),
        Some("https://api.scryfall.com/cards/search?page=2&q=delver")
    );
}
