//! Decklists hosted by deckbuilding websites.

pub mod archidekt;
pub mod manastack;
