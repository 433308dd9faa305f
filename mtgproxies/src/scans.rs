use log::info;
use scryfall::{Card, ImageFormat};
use std::path::PathBuf;

use crate::cache::FileCache;
use crate::decklist::{Decklist, DecklistEntry};
use crate::error::{Error, Result};
use crate::scryfall_client::ScryfallClient;
use crate::warnings::{Severity, Warning};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, clap::ValueEnum)]
pub enum FaceSelection {
    #[default]
    All,
    Front,
    /// every face but the first, nothing for single faced cards
    Back,
}

impl FaceSelection {
    fn includes(&self, face_index: usize) -> bool {
        match self {
            FaceSelection::All => true,
            FaceSelection::Front => face_index == 0,
            FaceSelection::Back => face_index > 0,
        }
    }
}

/// The png scans of the selected faces, front first.
pub fn card_image_uris(card: &Card, faces: FaceSelection) -> Result<Vec<&str>> {
    card.faces()?
        .into_vec()
        .iter()
        .enumerate()
        .filter(|(i, _)| faces.includes(*i))
        .map(|(_, face)| {
            face.image_uri(ImageFormat::Png)
                .ok_or_else(|| Error::NotFound(format!("png scan of {}", face.name)))
        })
        .collect()
}

/// Local files of all scans, every card repeated as often as it is in the decklist.
/// Cards whose scans can't be fetched are reported and left out.
pub fn fetch_scans(
    decklist: &Decklist,
    client: &ScryfallClient,
    cache: &FileCache,
    faces: FaceSelection,
) -> (Vec<PathBuf>, Vec<Warning>) {
    let mut scans = Vec::new();
    let mut warnings = Vec::new();
    for (entry, line) in decklist.entries.iter().enumerate() {
        let DecklistEntry::Card(line) = line else {
            continue;
        };
        let fetched: Result<Vec<PathBuf>> = card_image_uris(line.card, faces).and_then(|uris| {
            uris.into_iter()
                .map(|uri| cache.get_image(client, uri))
                .collect()
        });
        match fetched {
            Ok(paths) => {
                for path in paths {
                    scans.extend(std::iter::repeat_n(path, line.count as usize));
                }
            }
            Err(e) => warnings.push(Warning::new(
                Severity::Error,
                Some(entry),
                format!("Unable to fetch scan of {}: {}", line.card.name, e),
            )),
        }
    }
    info!("fetched {} scans", scans.len());
    (scans, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::image_file_name;
    use crate::decklist::parse_decklist_stream;
    use crate::tests::test_card_data;

    #[test]
    fn face_selection() {
        let card_data = test_card_data();
        let db = &card_data.database;
        let bolt = db.get_card("Lightning Bolt", Some("2xm"), Some("129")).unwrap();
        assert_eq!(card_image_uris(bolt, FaceSelection::All).unwrap().len(), 1);
        assert_eq!(card_image_uris(bolt, FaceSelection::Front).unwrap().len(), 1);
        assert!(card_image_uris(bolt, FaceSelection::Back).unwrap().is_empty());

        let delver = db.get_card("Delver of Secrets // Insectile Aberration", None, None).unwrap();
        let all = card_image_uris(delver, FaceSelection::All).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].contains("/front/"));
        assert_eq!(card_image_uris(delver, FaceSelection::Back).unwrap(), vec![all[1]]);
    }

    // scans already in the cache are never downloaded
    fn cache_with_scans<'a>(cards: impl IntoIterator<Item = &'a Card>) -> (tempfile::TempDir, FileCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();
        for card in cards {
            for uri in card_image_uris(card, FaceSelection::All).unwrap() {
                std::fs::write(cache.path(&image_file_name(uri)), b"png").unwrap();
            }
        }
        (dir, cache)
    }

    #[test]
    fn reversible_cards() {
        let card_data = test_card_data();
        let parsed =
            parse_decklist_stream(&card_data, ["1 Propaganda // Propaganda (SLD) 381"]).unwrap();
        assert!(parsed.ok);
        let card = parsed.decklist.cards().next().unwrap().card;
        assert_eq!(card.name, "Propaganda // Propaganda");

        let (_dir, cache) = cache_with_scans([card]);
        let client = ScryfallClient::new().unwrap();
        let (scans, warnings) = fetch_scans(&parsed.decklist, &client, &cache, FaceSelection::All);
        assert!(warnings.is_empty());
        assert_eq!(scans.len(), 2);
        assert_ne!(scans[0], scans[1]);
    }

    #[test]
    fn counts_repeat_scans() {
        let card_data = test_card_data();
        let parsed = parse_decklist_stream(
            &card_data,
            ["Deck", "4 Blood Crypt (RNA) 245", "2 Delver of Secrets (ISD) 51"],
        )
        .unwrap();
        let cards: Vec<&Card> = parsed.decklist.cards().map(|line| line.card).collect();
        let (_dir, cache) = cache_with_scans(cards);
        let client = ScryfallClient::new().unwrap();

        let (scans, _) = fetch_scans(&parsed.decklist, &client, &cache, FaceSelection::All);
        assert_eq!(scans.len(), 8);
        let (scans, _) = fetch_scans(&parsed.decklist, &client, &cache, FaceSelection::Front);
        assert_eq!(scans.len(), 6);
        let (scans, _) = fetch_scans(&parsed.decklist, &client, &cache, FaceSelection::Back);
        assert_eq!(scans, vec![scans[0].clone(); 2]);
    }

    #[test]
    fn failed_fetches_are_reported() {
        let card_data = test_card_data();
        let mut card = card_data.database.get_card("Crypt Ghast", None, None).unwrap().clone();
        card.image_uris = Some(
            [(ImageFormat::Png, "http://127.0.0.1:9/png/front/a/b/x.png".to_string())]
                .into_iter()
                .collect(),
        );
        let mut decklist = Decklist::new();
        decklist.append_comment("Deck");
        decklist.append_card(1, &card);
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();
        let client = ScryfallClient::new().unwrap();
        let (scans, warnings) = fetch_scans(&decklist, &client, &cache, FaceSelection::All);
        assert!(scans.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].entry, Some(1));
        assert_eq!(warnings[0].severity, Severity::Error);
    }
}
