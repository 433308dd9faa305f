use std::fmt;
use std::path::PathBuf;

use crate::CardData;
use crate::decklist::{ParsedDecklist, parse_decklist};
use crate::error::{Error, Result};
use crate::remote::{archidekt, manastack};
use crate::scryfall_client::ScryfallClient;

/// Where a decklist comes from, as given on the command line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DecklistSpec {
    File(PathBuf),
    Manastack(String),
    Archidekt(String),
}

fn remote_id<'s>(spec: &'s str, prefix: &str) -> Option<&'s str> {
    let head = spec.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let id = spec.rsplit(':').next()?;
    (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then_some(id)
}

impl DecklistSpec {
    /// An existing file takes precedence over `manastack:<id>` and `archidekt:<id>`.
    pub fn parse(spec: &str) -> Result<DecklistSpec> {
        let path = PathBuf::from(spec);
        if path.is_file() {
            return Ok(DecklistSpec::File(path));
        }
        if let Some(id) = remote_id(spec, "manastack:") {
            return Ok(DecklistSpec::Manastack(id.to_string()));
        }
        if let Some(id) = remote_id(spec, "archidekt:") {
            return Ok(DecklistSpec::Archidekt(id.to_string()));
        }
        Err(Error::NotFound(format!("Cant find decklist '{}'", spec)))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, DecklistSpec::File(_))
    }

    /// A file name for saving a remote decklist locally.
    pub fn file_name(&self) -> PathBuf {
        match self {
            DecklistSpec::File(path) => path.clone(),
            DecklistSpec::Manastack(id) | DecklistSpec::Archidekt(id) => {
                PathBuf::from(format!("{}.txt", id))
            }
        }
    }

    pub fn load<'a>(&self, client: &ScryfallClient, card_data: &'a CardData) -> Result<ParsedDecklist<'a>> {
        match self {
            DecklistSpec::File(path) => parse_decklist(card_data, path),
            DecklistSpec::Manastack(id) => {
                manastack::fetch(client, card_data, id, &manastack::DEFAULT_ZONES)
            }
            DecklistSpec::Archidekt(id) => archidekt::fetch(client, card_data, id),
        }
    }
}

impl fmt::Display for DecklistSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecklistSpec::File(path) => write!(f, "{}", path.display()),
            DecklistSpec::Manastack(id) => write!(f, "manastack:{}", id),
            DecklistSpec::Archidekt(id) => write!(f, "archidekt:{}", id),
        }
    }
}
