use log::{debug, error, info};
use scryfall::{BulkData, Card, Layout};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::cache::FileCache;
use crate::error::{Error, Result};
use crate::scryfall_client::ScryfallClient;

const SCRYFALL_BULK_DATA: &str = "https://api.scryfall.com/bulk-data";
pub const DEFAULT_DATABASE: &str = "default_cards";

// conversion rate used when a card has no cardmarket price at all
const USD_TO_EUR: f64 = 0.83;

/// Canonical comparison key for card names.
pub fn canonic_card_name(name: &str) -> String {
    // "æ" is still used in some places, e.g. "Vedalken Æthermage"
    name.to_lowercase().replace('æ', "ae")
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, clap::ValueEnum)]
pub enum Currency {
    Usd,
    Eur,
    Tix,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Tix => "tix",
        }
    }
}

/// Case-insensitive exact match on a subset of card attributes, unset attributes are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct CardFilter<'a> {
    pub id: Option<&'a str>,
    pub oracle_id: Option<&'a str>,
    pub name: Option<&'a str>,
    pub set: Option<&'a str>,
    pub collector_number: Option<&'a str>,
    pub lang: Option<&'a str>,
}

impl<'a> CardFilter<'a> {
    pub fn by_name(name: &'a str) -> CardFilter<'a> {
        CardFilter {
            name: Some(name),
            ..Default::default()
        }
    }

    pub fn set(mut self, set: Option<&'a str>) -> CardFilter<'a> {
        self.set = set;
        self
    }

    pub fn collector_number(mut self, collector_number: Option<&'a str>) -> CardFilter<'a> {
        self.collector_number = collector_number;
        self
    }

    pub fn lang(mut self, lang: Option<&'a str>) -> CardFilter<'a> {
        self.lang = lang;
        self
    }

    fn matches(&self, card: &Card) -> bool {
        fn eq(wanted: Option<&str>, actual: Option<&str>) -> bool {
            match (wanted, actual) {
                (None, _) => true,
                (Some(w), Some(a)) => w.to_lowercase() == a.to_lowercase(),
                (Some(_), None) => false,
            }
        }
        eq(self.id, Some(&card.id))
            && eq(self.oracle_id, card.oracle_id())
            && self
                .name
                .is_none_or(|n| canonic_card_name(n) == canonic_card_name(&card.name))
            && eq(self.set, Some(&card.set))
            && eq(self.collector_number, Some(&card.collector_number))
            && eq(self.lang, Some(&card.lang))
    }
}

/// In-memory index over one scryfall bulk file, read-only once built.
#[derive(Debug, Default)]
pub struct CardDatabase {
    cards: Vec<Card>,
    by_id: HashMap<String, usize>,
    by_oracle_id: HashMap<String, Vec<usize>>,
    by_name: HashMap<String, Vec<usize>>,
}

impl CardDatabase {
    pub fn from_cards(cards: Vec<Card>) -> CardDatabase {
        let mut by_id = HashMap::new();
        let mut by_oracle_id: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, card) in cards.iter().enumerate() {
            by_id.insert(card.id.clone(), i);
            match card.oracle_id() {
                Some(oracle_id) => by_oracle_id.entry(oracle_id.to_string()).or_default().push(i),
                None => debug!("card {} ({}) has no oracle id", card.name, card.id),
            }
            by_name
                .entry(canonic_card_name(&card.name))
                .or_default()
                .push(i);
        }
        CardDatabase {
            cards,
            by_id,
            by_oracle_id,
            by_name,
        }
    }

    pub fn from_bulk_file(path: &Path) -> Result<CardDatabase> {
        info!("reading card database from {}", path.display());
        let reader = BufReader::new(File::open(path)?);
        // parse record by record so one odd object does not fail the whole file
        let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
        let mut cards = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<Card>(value) {
                Ok(card) => cards.push(card),
                Err(e) => error!("couldn't read a card in {}: {}", path.display(), e),
            }
        }
        info!("there are {} cards in the database", cards.len());
        Ok(CardDatabase::from_cards(cards))
    }

    /// Fetches the bulk data listing and downloads the named database unless cached.
    pub fn load(client: &ScryfallClient, cache: &FileCache, database_name: &str) -> Result<CardDatabase> {
        let databases: Vec<BulkData> = client.depaginate(SCRYFALL_BULK_DATA)?;
        let matching: Vec<&BulkData> = databases
            .iter()
            .filter(|database| database.bulk_type == database_name)
            .collect();
        let bulk_data = match matching.as_slice() {
            [bulk_data] => *bulk_data,
            _ => return Err(Error::UnknownDatabase(database_name.to_string())),
        };
        let file_name = bulk_data
            .download_uri
            .rsplit('/')
            .next()
            .unwrap_or(database_name);
        let path = cache.get_file(client, file_name, &bulk_data.download_uri)?;
        CardDatabase::from_bulk_file(&path)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get_cards(&self, filter: &CardFilter) -> Vec<&Card> {
        let candidates: Box<dyn Iterator<Item = &Card>> = match filter.name {
            Some(name) => match self.by_name.get(&canonic_card_name(name)) {
                Some(indices) => Box::new(indices.iter().map(|&i| &self.cards[i])),
                None => return Vec::new(),
            },
            None => Box::new(self.cards.iter()),
        };
        candidates.filter(|card| filter.matches(card)).collect()
    }

    /// The first card matching name and, if given, set and collector number.
    pub fn get_card(
        &self,
        name: &str,
        set: Option<&str>,
        collector_number: Option<&str>,
    ) -> Option<&Card> {
        self.get_cards(
            &CardFilter::by_name(name)
                .set(set)
                .collector_number(collector_number),
        )
        .into_iter()
        .next()
    }

    pub fn card_by_id(&self, id: &str) -> Option<&Card> {
        self.by_id.get(id).map(|&i| &self.cards[i])
    }

    pub fn prints_by_oracle_id(&self, oracle_id: &str) -> Vec<&Card> {
        self.by_oracle_id
            .get(oracle_id)
            .map(|indices| indices.iter().map(|&i| &self.cards[i]).collect())
            .unwrap_or_default()
    }

    /// Names of all cards in database order, without art series (whose names are double faced).
    pub fn card_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.cards
            .iter()
            .filter(|card| card.layout != Layout::ArtSeries)
            .map(|card| card.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// The lowest price over all prints of an oracle id.
    /// `foil` is `Some(false)` for non-foil only, `Some(true)` for foil only and `None` for any.
    pub fn get_price(&self, oracle_id: &str, currency: Currency, foil: Option<bool>) -> Option<f64> {
        let mut slots = Vec::new();
        if foil != Some(true) {
            slots.push(currency.as_str().to_string());
        }
        // there are no foil prices for tix
        if foil != Some(false) && currency != Currency::Tix {
            slots.push(format!("{}_foil", currency.as_str()));
        }

        let lowest = self
            .prints_by_oracle_id(oracle_id)
            .iter()
            .flat_map(|card| slots.iter().filter_map(|slot| card.price(slot)))
            .min_by(|a, b| a.total_cmp(b));

        match lowest {
            None if currency == Currency::Eur => self
                .get_price(oracle_id, Currency::Usd, None)
                .map(|usd| usd * USD_TO_EUR),
            _ => lowest,
        }
    }
}
