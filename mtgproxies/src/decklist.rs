use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use scryfall::Card;
use std::collections::HashMap;
use std::path::Path;

use crate::CardData;
use crate::error::Result;
use crate::warnings::Warning;

#[derive(Debug, PartialEq, Eq, Clone, Copy, clap::ValueEnum)]
pub enum DecklistFormat {
    /// `<count> <name> (<SET>) <collector number>`
    Arena,
    /// `<count> <name>`
    Text,
}

#[derive(Debug, PartialEq, Clone)]
pub struct CardLine<'a> {
    pub count: u32,
    pub card: &'a Card,
}

impl CardLine<'_> {
    pub fn format(&self, format: DecklistFormat) -> String {
        match format {
            DecklistFormat::Text => format!("{} {}", self.count, self.card.name),
            DecklistFormat::Arena => format!(
                "{} {} ({}) {}",
                self.count,
                self.card.name,
                self.card.set.to_uppercase(),
                self.card.collector_number
            ),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum DecklistEntry<'a> {
    Card(CardLine<'a>),
    Comment(String),
}

impl DecklistEntry<'_> {
    pub fn format(&self, format: DecklistFormat) -> String {
        match self {
            DecklistEntry::Card(line) => line.format(format),
            DecklistEntry::Comment(text) => text.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Decklist<'a> {
    pub entries: Vec<DecklistEntry<'a>>,
    pub name: Option<String>,
}

impl<'a> Decklist<'a> {
    pub fn new() -> Decklist<'a> {
        Decklist::default()
    }

    pub fn append_card(&mut self, count: u32, card: &'a Card) {
        self.entries.push(DecklistEntry::Card(CardLine { count, card }));
    }

    pub fn append_comment(&mut self, text: impl Into<String>) {
        self.entries.push(DecklistEntry::Comment(text.into()));
    }

    pub fn extend(&mut self, other: Decklist<'a>) {
        self.entries.extend(other.entries);
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardLine<'a>> {
        self.entries.iter().filter_map(|entry| match entry {
            DecklistEntry::Card(line) => Some(line),
            DecklistEntry::Comment(_) => None,
        })
    }

    pub fn total_count(&self) -> u32 {
        self.cards().fold(0, |total, line| total.saturating_add(line.count))
    }

    /// Card lines, different lines for the same card are counted separately.
    pub fn total_count_unique(&self) -> usize {
        self.cards().count()
    }

    pub fn without_comments(&self) -> Decklist<'a> {
        Decklist {
            entries: self
                .entries
                .iter()
                .filter(|entry| matches!(entry, DecklistEntry::Card(_)))
                .cloned()
                .collect(),
            name: self.name.clone(),
        }
    }

    pub fn format(&self, format: DecklistFormat) -> String {
        self.entries.iter().map(|entry| entry.format(format)).join("\n")
    }

    pub fn save(&self, path: &Path, format: DecklistFormat) -> Result<()> {
        std::fs::write(path, self.format(format) + "\n")?;
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, clap::ValueEnum)]
pub enum MergeKey {
    /// different prints of the same card
    Oracle,
    /// only identical prints
    Print,
}

/// Adds the counts of repeated cards to their first occurrence, keeping the order of the decklist.
pub fn merge_duplicates<'a>(decklist: &Decklist<'a>, key: MergeKey) -> Decklist<'a> {
    let mut first_occurrence: HashMap<&str, usize> = HashMap::new();
    let mut merged = Decklist {
        entries: Vec::with_capacity(decklist.entries.len()),
        name: decklist.name.clone(),
    };
    for entry in decklist.entries.iter() {
        let DecklistEntry::Card(line) = entry else {
            merged.entries.push(entry.clone());
            continue;
        };
        let id = match key {
            MergeKey::Oracle => line.card.oracle_id().unwrap_or(&line.card.id),
            MergeKey::Print => &line.card.id,
        };
        match first_occurrence.get(id) {
            Some(&i) => {
                if let DecklistEntry::Card(first) = &mut merged.entries[i] {
                    first.count = first.count.saturating_add(line.count);
                }
            }
            None => {
                first_occurrence.insert(id, merged.entries.len());
                merged.entries.push(entry.clone());
            }
        }
    }
    merged
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DecklistLine<'l> {
    pub count: u32,
    pub name: &'l str,
    pub set: Option<&'l str>,
    pub collector_number: Option<&'l str>,
}

pub fn parse_line(line: &str) -> Option<DecklistLine<'_>> {
    lazy_static! {
        static ref RECARD: Regex =
            Regex::new(r"^\s*([0-9]+)x?\s+(.+?)(?:\s+\((\S*)\)\s+(\S+))?\s*$").unwrap();
    }

    let captures = RECARD.captures(line)?;
    let count: u32 = captures.get(1)?.as_str().parse().ok()?;
    if count == 0 {
        return None;
    }
    Some(DecklistLine {
        count,
        name: captures.get(2)?.as_str(),
        set: captures.get(3).map(|m| m.as_str()),
        collector_number: captures.get(4).map(|m| m.as_str()),
    })
}

#[derive(Debug)]
pub struct ParsedDecklist<'a> {
    pub decklist: Decklist<'a>,
    /// false if any card could not be identified
    pub ok: bool,
    pub warnings: Vec<Warning>,
}

impl<'a> ParsedDecklist<'a> {
    pub fn new() -> ParsedDecklist<'a> {
        ParsedDecklist {
            decklist: Decklist::new(),
            ok: true,
            warnings: Vec::new(),
        }
    }

    /// Resolves one card and appends it, or keeps `original` as a comment if the name is unknown.
    pub fn push_card(
        &mut self,
        card_data: &'a CardData,
        count: u32,
        name: &str,
        set: Option<&str>,
        collector_number: Option<&str>,
        original: &str,
    ) -> Result<()> {
        let (card, messages) = card_data.resolve_card(name, set, collector_number)?;
        match card {
            Some(card) => self.decklist.append_card(count, card),
            None => {
                self.decklist.append_comment(original);
                self.ok = false;
            }
        }
        let entry = self.decklist.entries.len() - 1;
        self.warnings.extend(Warning::attach(entry, messages));
        Ok(())
    }

    /// Appends another parsed decklist, keeping warnings pointing at their entries.
    pub fn extend(&mut self, other: ParsedDecklist<'a>) {
        let offset = self.decklist.entries.len();
        self.decklist.extend(other.decklist);
        self.ok &= other.ok;
        self.warnings.extend(other.warnings.into_iter().map(|mut w| {
            w.entry = w.entry.map(|e| e + offset);
            w
        }));
    }
}

impl Default for ParsedDecklist<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a decklist in text or arena format (or a mix of both).
/// Lines that are not cards are kept as comments.
pub fn parse_decklist_stream<'a, I, S>(card_data: &'a CardData, lines: I) -> Result<ParsedDecklist<'a>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedDecklist::new();
    for line in lines {
        let line = line.as_ref();
        match parse_line(line) {
            Some(card) => parsed.push_card(
                card_data,
                card.count,
                card.name,
                card.set,
                card.collector_number,
                line.trim_end(),
            )?,
            None => parsed.decklist.append_comment(line.trim_end()),
        }
    }
    Ok(parsed)
}

/// Parses a decklist file, the decklist is named after the file.
pub fn parse_decklist<'a>(card_data: &'a CardData, path: &Path) -> Result<ParsedDecklist<'a>> {
    let content = std::fs::read_to_string(path)?;
    let mut parsed = parse_decklist_stream(card_data, content.lines())?;
    parsed.decklist.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_card_data;
    use crate::warnings::Severity;

    fn line(
        count: u32,
        name: &'static str,
        set: Option<&'static str>,
        collector_number: Option<&'static str>,
    ) -> DecklistLine<'static> {
        DecklistLine {
            count,
            name,
            set,
            collector_number,
        }
    }

    #[test]
    fn name() {
        assert_eq!(parse_line("plains"), None);
        assert_eq!(parse_line("1 plains").unwrap(), line(1, "plains", None, None));
    }

    #[test]
    fn number_name() {
        assert_eq!(parse_line("2\tplains").unwrap(), line(2, "plains", None, None));
        assert_eq!(parse_line("4x Opt").unwrap(), line(4, "Opt", None, None));
        assert_eq!(parse_line("  3 Opt  \r").unwrap(), line(3, "Opt", None, None));
    }

    #[test]
    fn arena_line() {
        assert_eq!(
            parse_line("1 Bedeck // Bedazzle (RNA) 221").unwrap(),
            line(1, "Bedeck // Bedazzle", Some("RNA"), Some("221"))
        );
        assert_eq!(
            parse_line("1 Lightning Bolt (PM10) 146p").unwrap(),
            line(1, "Lightning Bolt", Some("PM10"), Some("146p"))
        );
    }

    #[test]
    fn not_a_card() {
        let not_cards = [
            "Deck",
            "Sideboard",
            "",
            "   ",
            "// Creatures",
            "x4 Opt",
            "0 Opt",
            "4294967296 Opt",
        ];
        for s in not_cards {
            assert_eq!(parse_line(s), None, "{:?}", s);
        }
    }

    #[test]
    fn blood_crypt_and_alela() {
        let card_data = test_card_data();
        let parsed = parse_decklist_stream(
            &card_data,
            "4 Blood Crypt (RNA) 245\n1 Alela, Artful Provocateur\n".lines(),
        )
        .unwrap();
        assert!(parsed.ok);
        assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);
        let counts: Vec<u32> = parsed.decklist.cards().map(|c| c.count).collect();
        assert_eq!(counts, vec![4, 1]);
        assert_eq!(parsed.decklist.total_count(), 5);
        assert_eq!(parsed.decklist.total_count_unique(), 2);
    }

    #[test]
    fn comments_are_kept() {
        let card_data = test_card_data();
        let parsed = parse_decklist_stream(
            &card_data,
            ["Deck", "1 Lightning Bolt", "", "Sideboard  ", "2 Crypt Ghast"],
        )
        .unwrap();
        assert!(parsed.ok);
        assert_eq!(
            parsed.decklist.format(DecklistFormat::Text),
            "Deck\n1 Lightning Bolt\n\nSideboard\n2 Crypt Ghast"
        );
    }

    #[test]
    fn unknown_names_become_comments() {
        let card_data = test_card_data();
        let parsed = parse_decklist_stream(
            &card_data,
            ["4 Blood Crypt", "1 Black Lotus (LEA) 232  ", "1 crypt"],
        )
        .unwrap();
        assert!(!parsed.ok);
        assert_eq!(parsed.decklist.total_count_unique(), 1);
        assert_eq!(
            parsed.decklist.entries[1],
            DecklistEntry::Comment("1 Black Lotus (LEA) 232".to_string())
        );
        let errors: Vec<&Warning> = parsed
            .warnings
            .iter()
            .filter(|w| w.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].entry, Some(1));
        assert_eq!(errors[1].entry, Some(2));
    }

    #[test]
    fn warnings_point_at_entries() {
        let card_data = test_card_data();
        let parsed =
            parse_decklist_stream(&card_data, ["Deck", "1 Delver of Secrets", "1 Goblin"]).unwrap();
        assert!(parsed.ok);
        let entries: Vec<Option<usize>> = parsed.warnings.iter().map(|w| w.entry).collect();
        assert_eq!(entries, vec![Some(1), Some(2)]);
    }

    #[test]
    fn text_and_arena_format() {
        let card_data = test_card_data();
        let parsed =
            parse_decklist_stream(&card_data, ["Mainboard", "2 Blood Crypt (rna) 245"]).unwrap();
        assert_eq!(
            parsed.decklist.format(DecklistFormat::Arena),
            "Mainboard\n2 Blood Crypt (RNA) 245"
        );
        assert_eq!(
            parsed.decklist.without_comments().format(DecklistFormat::Text),
            "2 Blood Crypt"
        );
    }

    #[test]
    fn merge_keeps_first_position() {
        let card_data = test_card_data();
        let parsed = parse_decklist_stream(
            &card_data,
            [
                "2 Lightning Bolt (2XM) 129",
                "Sideboard",
                "1 Crypt Ghast",
                "1 Lightning Bolt (M10) 146",
            ],
        )
        .unwrap();
        let merged = merge_duplicates(&parsed.decklist, MergeKey::Oracle);
        assert_eq!(
            merged.format(DecklistFormat::Arena),
            "3 Lightning Bolt (2XM) 129\nSideboard\n1 Crypt Ghast (ARB) 42"
        );
        let by_print = merge_duplicates(&parsed.decklist, MergeKey::Print);
        assert_eq!(by_print, parsed.decklist);
    }

    #[test]
    fn merge_is_idempotent() {
        let card_data = test_card_data();
        let parsed = parse_decklist_stream(
            &card_data,
            ["1 Goblin Instigator", "2 Alela, Artful Provocateur", "3 Goblin Instigator", "", "1 Alela, Artful Provocateur"],
        )
        .unwrap();
        for key in [MergeKey::Oracle, MergeKey::Print] {
            let once = merge_duplicates(&parsed.decklist, key);
            let twice = merge_duplicates(&once, key);
            assert_eq!(once, twice);
            assert_eq!(once.total_count(), parsed.decklist.total_count());
            assert_eq!(once.format(DecklistFormat::Text), "4 Goblin Instigator\n3 Alela, Artful Provocateur\n");
        }
    }

    #[test]
    fn zero_count_stays_a_comment() {
        let card_data = test_card_data();
        let parsed = parse_decklist_stream(&card_data, ["0 Lightning Bolt", "1 Crypt Ghast"]).unwrap();
        assert!(parsed.ok);
        assert_eq!(
            parsed.decklist.entries[0],
            DecklistEntry::Comment("0 Lightning Bolt".to_string())
        );
        assert_eq!(parsed.decklist.total_count(), 1);
        assert_eq!(parsed.decklist.total_count_unique(), 1);
    }

    #[test]
    fn huge_counts_saturate() {
        let card_data = test_card_data();
        let parsed = parse_decklist_stream(
            &card_data,
            ["4294967295 Lightning Bolt", "1 Lightning Bolt"],
        )
        .unwrap();
        assert_eq!(parsed.decklist.total_count(), u32::MAX);
        let merged = merge_duplicates(&parsed.decklist, MergeKey::Oracle);
        let counts: Vec<u32> = merged.cards().map(|c| c.count).collect();
        assert_eq!(counts, vec![u32::MAX]);
    }

    #[test]
    fn file_name_is_decklist_name() {
        let card_data = test_card_data();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rakdos.txt");
        std::fs::write(&path, "4 Blood Crypt (RNA) 245\n").unwrap();
        let parsed = parse_decklist(&card_data, &path).unwrap();
        assert_eq!(parsed.decklist.name.as_deref(), Some("rakdos"));
    }
}
