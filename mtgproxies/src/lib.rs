use log::info;
use scryfall::Card;

pub mod cache;
pub mod corners;
pub mod database;
pub mod decklist;
pub mod dimensions;
pub mod error;
pub mod format;
pub mod layout;
pub mod lookup;
pub mod recommend;
pub mod remote;
pub mod render;
pub mod scans;
pub mod scryfall_client;
pub mod source;
pub mod tokens;
pub mod validate;
pub mod value;
pub mod warnings;

pub use crate::cache::FileCache;
pub use crate::database::{CardDatabase, CardFilter, Currency, DEFAULT_DATABASE};
pub use crate::decklist::{
    CardLine, Decklist, DecklistEntry, DecklistFormat, MergeKey, ParsedDecklist, merge_duplicates,
    parse_decklist, parse_decklist_stream,
};
pub use crate::error::{Error, Result};
pub use crate::lookup::CardNameLookup;
pub use crate::scryfall_client::ScryfallClient;
pub use crate::warnings::{Message, Severity, Warning};

pub fn setup_logger(level: log::LevelFilter) -> std::result::Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

/// The card database together with the name index built from it.
pub struct CardData {
    pub database: CardDatabase,
    pub lookup: CardNameLookup,
}

impl CardData {
    pub fn from_database(database: CardDatabase) -> CardData {
        let lookup = CardNameLookup::from_card_names(&database.card_names());
        info!("there are {} different card names", lookup.len());
        CardData { database, lookup }
    }

    pub fn load(client: &ScryfallClient, cache: &FileCache) -> Result<CardData> {
        let database = CardDatabase::load(client, cache, DEFAULT_DATABASE)?;
        Ok(CardData::from_database(database))
    }

    /// Resolves a possibly misspelled name, then picks the print.
    /// Returns `None` if the name can't be resolved, the messages explain why.
    pub fn resolve_card(
        &self,
        name: &str,
        set: Option<&str>,
        collector_number: Option<&str>,
    ) -> Result<(Option<&Card>, Vec<Message>)> {
        let (resolved, mut messages) = self.lookup.resolve_name(name);
        let Some(resolved) = resolved else {
            return Ok((None, messages));
        };
        let (card, print_messages) =
            validate::validate_print(&self.database, &resolved, set, collector_number)?;
        messages.extend(print_messages);
        Ok((Some(card), messages))
    }
}
