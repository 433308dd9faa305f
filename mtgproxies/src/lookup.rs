use log::debug;
use std::collections::HashMap;

use crate::database::canonic_card_name;
use crate::format::listing;
use crate::warnings::{Message, Severity};

const MAX_SUGGESTIONS: usize = 6;

#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub enum NameMatchMode {
    Full,
    /// the front face of a name containing "//"
    Front,
    /// every word of the input is contained in the name
    Partial,
}

#[derive(Debug, PartialEq, Eq)]
pub struct NameLookupResult {
    pub name: String,
    pub hit: NameMatchMode,
}

/// Name index built once from all card names of the database.
#[derive(Debug, Default)]
pub struct CardNameLookup {
    // (canonical name, proper name) in database order
    names: Vec<(String, String)>,
    full: HashMap<String, usize>,
    front: HashMap<String, usize>,
}

impl CardNameLookup {
    pub fn from_card_names<S: AsRef<str>>(names: &[S]) -> CardNameLookup {
        let mut lookup = CardNameLookup::default();
        for name in names.iter() {
            lookup.insert(name.as_ref());
        }
        lookup
    }

    fn insert(&mut self, name: &str) {
        let canonic = canonic_card_name(name);
        if self.full.contains_key(&canonic) {
            return;
        }
        let index = self.names.len();
        self.full.insert(canonic.clone(), index);
        if let Some((front, _)) = canonic.split_once("//") {
            self.front.entry(front.trim().to_string()).or_insert(index);
        }
        self.names.push((canonic, name.to_string()));
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact, then front face, then word containment. Returns all candidates if the last is ambiguous.
    pub fn find(&self, raw_name: &str) -> Result<NameLookupResult, Vec<&str>> {
        let name = canonic_card_name(raw_name);
        if let Some(&i) = self.full.get(&name) {
            return Ok(self.result(i, NameMatchMode::Full));
        }
        if let Some(&i) = self.front.get(&name) {
            return Ok(self.result(i, NameMatchMode::Front));
        }

        let words: Vec<&str> = name.split_whitespace().collect();
        let candidates: Vec<usize> = self
            .names
            .iter()
            .enumerate()
            .filter(|(_, (canonic, _))| words.iter().all(|w| canonic.contains(w)))
            .map(|(i, _)| i)
            .collect();
        debug!("{} partial matches for {:?}", candidates.len(), raw_name);
        match candidates.as_slice() {
            [i] => Ok(self.result(*i, NameMatchMode::Partial)),
            _ => Err(candidates
                .iter()
                .map(|&i| self.names[i].1.as_str())
                .collect()),
        }
    }

    fn result(&self, index: usize, hit: NameMatchMode) -> NameLookupResult {
        NameLookupResult {
            name: self.names[index].1.clone(),
            hit,
        }
    }

    /// The proper card name, or `None` and an error explaining why there is none.
    pub fn resolve_name(&self, raw_name: &str) -> (Option<String>, Vec<Message>) {
        match self.find(raw_name) {
            Ok(NameLookupResult {
                name,
                hit: NameMatchMode::Full,
            }) => (Some(name), Vec::new()),
            Ok(NameLookupResult { name, .. }) => {
                let message = format!(
                    "Misspelled card name '{}'. Assuming you mean {}.",
                    raw_name, name
                );
                (Some(name), vec![(Severity::Warning, message)])
            }
            Err(candidates) if candidates.is_empty() => (
                None,
                vec![(
                    Severity::Error,
                    format!("Unable to find card '{}'.", raw_name),
                )],
            ),
            Err(candidates) => {
                let quoted: Vec<String> = candidates.iter().map(|c| format!("'{}'", c)).collect();
                let message = format!(
                    "Unable to find card '{}'. Did you mean {}?",
                    raw_name,
                    listing(&quoted, ", ", " or ", Some(MAX_SUGGESTIONS))
                );
                (None, vec![(Severity::Error, message)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::tests::test_database;

    fn test_lookup() -> CardNameLookup {
        CardNameLookup::from_card_names(&test_database().card_names())
    }

    #[test]
    fn name_search() {
        let card_names: Vec<String> = vec![
            "Okaun, Eye of Chaos".to_string(),
            "Cut // Ribbons".to_string(),
        ];
        let lookup = CardNameLookup::from_card_names(&card_names);
        assert_eq!(
            lookup.find("okaun, eye of chaos"),
            Ok(NameLookupResult {
                name: "Okaun, Eye of Chaos".to_string(),
                hit: NameMatchMode::Full
            })
        );
        assert_eq!(
            lookup.find("okaun"),
            Ok(NameLookupResult {
                name: "Okaun, Eye of Chaos".to_string(),
                hit: NameMatchMode::Partial
            })
        );
        assert_eq!(
            lookup.find("CUT // ribbons"),
            Ok(NameLookupResult {
                name: "Cut // Ribbons".to_string(),
                hit: NameMatchMode::Full
            })
        );
        assert_eq!(
            lookup.find("cut"),
            Ok(NameLookupResult {
                name: "Cut // Ribbons".to_string(),
                hit: NameMatchMode::Front
            })
        );
        assert_eq!(
            lookup.find("ribbon"),
            Ok(NameLookupResult {
                name: "Cut // Ribbons".to_string(),
                hit: NameMatchMode::Partial
            })
        );
    }

    #[test]
    fn exact_names_have_no_warnings() {
        let db = test_database();
        let lookup = CardNameLookup::from_card_names(&db.card_names());
        for name in db.card_names() {
            for input in [name.to_string(), name.to_uppercase(), name.to_lowercase()] {
                let (resolved, messages) = lookup.resolve_name(&input);
                assert_eq!(resolved.as_deref(), Some(name), "resolving {}", input);
                assert!(messages.is_empty(), "resolving {}: {:?}", input, messages);
            }
        }
    }

    #[test]
    fn special_characters() {
        let (resolved, messages) = test_lookup().resolve_name("Vedalken Aethermage");
        assert_eq!(resolved.as_deref(), Some("Vedalken Æthermage"));
        assert!(messages.is_empty());
    }

    #[test]
    fn front_face() {
        let (resolved, messages) = test_lookup().resolve_name("Delver of Secrets");
        assert_eq!(
            resolved.as_deref(),
            Some("Delver of Secrets // Insectile Aberration")
        );
        assert_eq!(
            messages,
            vec![(
                Severity::Warning,
                "Misspelled card name 'Delver of Secrets'. Assuming you mean Delver of Secrets // Insectile Aberration."
                    .to_string()
            )]
        );
    }

    #[test]
    fn misspelled() {
        let (resolved, messages) = test_lookup().resolve_name("lightnin bolt");
        assert_eq!(resolved.as_deref(), Some("Lightning Bolt"));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, Severity::Warning);
    }

    #[test]
    fn misspelled_with_other_whitespace() {
        for input in ["lightnin\tbolt", "lightnin  bolt"] {
            let (resolved, messages) = test_lookup().resolve_name(input);
            assert_eq!(resolved.as_deref(), Some("Lightning Bolt"), "resolving {:?}", input);
            assert_eq!(messages[0].0, Severity::Warning);
        }
    }

    #[test]
    fn not_found() {
        let (resolved, messages) = test_lookup().resolve_name("Black Lotus");
        assert_eq!(resolved, None);
        assert_eq!(
            messages,
            vec![(Severity::Error, "Unable to find card 'Black Lotus'.".to_string())]
        );
    }

    #[test]
    fn ambiguous() {
        let (resolved, messages) = test_lookup().resolve_name("crypt");
        assert_eq!(resolved, None);
        assert_eq!(
            messages,
            vec![(
                Severity::Error,
                "Unable to find card 'crypt'. Did you mean 'Blood Crypt' or 'Crypt Ghast'?"
                    .to_string()
            )]
        );
    }

    #[test]
    fn ambiguous_lists_at_most_six() {
        let names: Vec<String> = (0..8).map(|i| format!("Grizzly Bears {}", i)).collect();
        let lookup = CardNameLookup::from_card_names(&names);
        let (resolved, messages) = lookup.resolve_name("bears");
        assert_eq!(resolved, None);
        assert!(messages[0].1.ends_with("'Grizzly Bears 5', ...?"));
        assert!(!messages[0].1.contains("'Grizzly Bears 6'"));
    }
}
