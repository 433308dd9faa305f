use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    #[serde(rename = "W")]
    White,

    #[serde(rename = "U")]
    Blue,

    #[serde(rename = "B")]
    Black,

    #[serde(rename = "R")]
    Red,

    #[serde(rename = "G")]
    Green,
}

impl Color {
    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Blue => "blue",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Frame {
    #[serde(rename = "1993")]
    Year1993,

    #[serde(rename = "1997")]
    Year1997,

    #[serde(rename = "2003")]
    Year2003,

    #[serde(rename = "2015")]
    Year2015,

    #[serde(rename = "future")]
    Future,

    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Layout {
    #[serde(rename = "normal")]
    Normal,

    #[serde(rename = "flip")]
    Flip,

    #[serde(rename = "split")]
    Split,

    #[serde(rename = "transform")]
    Transform,

    #[serde(rename = "modal_dfc")]
    ModalDfc,

    #[serde(rename = "meld")]
    Meld,

    #[serde(rename = "leveler")]
    Leveler,

    #[serde(rename = "class")]
    Class,

    #[serde(rename = "saga")]
    Saga,

    #[serde(rename = "adventure")]
    Adventure,

    #[serde(rename = "planar")]
    Planar,

    #[serde(rename = "scheme")]
    Scheme,

    #[serde(rename = "vanguard")]
    Vanguard,

    #[serde(rename = "token")]
    Token,

    #[serde(rename = "double_faced_token")]
    DoubleFacedToken,

    #[serde(rename = "emblem")]
    Emblem,

    #[serde(rename = "augment")]
    Augment,

    #[serde(rename = "host")]
    Host,

    #[serde(rename = "art_series")]
    ArtSeries,

    #[serde(rename = "reversible_card")]
    ReversibleCard,

    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Component {
    #[serde(rename = "token")]
    Token,

    #[serde(rename = "meld_part")]
    MeldPart,

    #[serde(rename = "meld_result")]
    MeldResult,

    #[serde(rename = "combo_piece")]
    ComboPiece,

    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Hash, PartialEq, Eq, Debug, Clone, Copy)]
pub enum ImageFormat {
    #[serde(rename = "png")]
    Png,

    #[serde(rename = "border_crop")]
    BorderCrop,

    #[serde(rename = "art_crop")]
    ArtCrop,

    #[serde(rename = "large")]
    Large,

    #[serde(rename = "normal")]
    Normal,

    #[serde(rename = "small")]
    Small,

    #[serde(other)]
    Other,
}

pub type ImageUris = HashMap<ImageFormat, String>;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum BorderColor {
    #[serde(rename = "black")]
    Black,

    #[serde(rename = "white")]
    White,

    #[serde(rename = "borderless")]
    Borderless,

    #[serde(rename = "silver")]
    Silver,

    #[serde(rename = "gold")]
    Gold,

    #[serde(rename = "yellow")]
    Yellow,

    #[serde(other)]
    Unknown,
}

impl BorderColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderColor::Black => "black",
            BorderColor::White => "white",
            BorderColor::Borderless => "borderless",
            BorderColor::Silver => "silver",
            BorderColor::Gold => "gold",
            BorderColor::Yellow => "yellow",
            BorderColor::Unknown => "unknown",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum FrameEffect {
    #[serde(rename = "legendary")]
    Legendary,

    #[serde(rename = "miracle")]
    Miracle,

    #[serde(rename = "nyxtouched")]
    NyxTouched,

    #[serde(rename = "draft")]
    Draft,

    #[serde(rename = "devoid")]
    Devoid,

    #[serde(rename = "tombstone")]
    Tombstone,

    #[serde(rename = "colorshifted")]
    Colorshifted,

    #[serde(rename = "inverted")]
    Inverted,

    #[serde(rename = "sunmoondfc")]
    SunMoonDfc,

    #[serde(rename = "compasslanddfc")]
    CompassLandDfc,

    #[serde(rename = "originpwdfc")]
    OriginPwDfc,

    #[serde(rename = "mooneldrazidfc")]
    MoonEldraziDfc,

    #[serde(rename = "waxingandwaningmoondfc")]
    WaxingAndWaningMoonDfc,

    #[serde(rename = "showcase")]
    Showcase,

    #[serde(rename = "extendedart")]
    ExtendedArt,

    #[serde(rename = "companion")]
    Companion,

    #[serde(rename = "etched")]
    Etched,

    #[serde(rename = "snow")]
    Snow,

    #[serde(rename = "lesson")]
    Lesson,

    #[serde(rename = "fullart")]
    Fullart,

    #[serde(other)]
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardFace {
    pub name: String,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub oracle_id: Option<String>,
    pub colors: Option<Vec<Color>>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub loyalty: Option<String>,
    pub illustration_id: Option<String>,
    pub image_uris: Option<ImageUris>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RelatedCard {
    pub id: String,
    pub component: Component,
    pub name: String,
    pub type_line: Option<String>,
    pub uri: Option<String>,
}

/// A single print as it appears in the scryfall bulk data,
/// see https://scryfall.com/docs/api/cards for the fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Card {
    pub id: String,
    pub oracle_id: Option<String>,
    pub name: String,
    pub lang: String,
    pub layout: Layout,

    pub set: String,
    pub set_name: Option<String>,
    pub collector_number: String,
    pub released_at: Option<String>,

    pub border_color: BorderColor,
    pub frame: Frame,
    pub frame_effects: Option<Vec<FrameEffect>>,
    #[serde(default)]
    pub highres_image: bool,
    #[serde(default)]
    pub digital: bool,
    #[serde(default)]
    pub nonfoil: bool,
    #[serde(default)]
    pub foil: bool,
    #[serde(default)]
    pub prices: HashMap<String, Option<String>>,

    pub illustration_id: Option<String>,
    pub image_uris: Option<ImageUris>,
    pub card_faces: Option<Vec<CardFace>>,
    pub all_parts: Option<Vec<RelatedCard>>,

    pub colors: Option<Vec<Color>>,
    #[serde(default)]
    pub color_identity: Vec<Color>,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
}

/// One printed side of a card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face<'a> {
    pub name: &'a str,
    pub mana_cost: Option<&'a str>,
    pub type_line: Option<&'a str>,
    pub oracle_text: Option<&'a str>,
    pub power: Option<&'a str>,
    pub toughness: Option<&'a str>,
    pub colors: Option<&'a [Color]>,
    pub illustration_id: Option<&'a str>,
    pub image_uris: Option<&'a ImageUris>,
}

impl<'a> From<&'a Card> for Face<'a> {
    fn from(card: &'a Card) -> Face<'a> {
        Face {
            name: &card.name,
            mana_cost: card.mana_cost.as_deref(),
            type_line: card.type_line.as_deref(),
            oracle_text: card.oracle_text.as_deref(),
            power: card.power.as_deref(),
            toughness: card.toughness.as_deref(),
            colors: card.colors.as_deref(),
            illustration_id: card.illustration_id.as_deref(),
            image_uris: card.image_uris.as_ref(),
        }
    }
}

impl<'a> From<&'a CardFace> for Face<'a> {
    fn from(face: &'a CardFace) -> Face<'a> {
        Face {
            name: &face.name,
            mana_cost: face.mana_cost.as_deref(),
            type_line: face.type_line.as_deref(),
            oracle_text: face.oracle_text.as_deref(),
            power: face.power.as_deref(),
            toughness: face.toughness.as_deref(),
            colors: face.colors.as_deref(),
            illustration_id: face.illustration_id.as_deref(),
            image_uris: face.image_uris.as_ref(),
        }
    }
}

impl<'a> Face<'a> {
    pub fn image_uri(&self, format: ImageFormat) -> Option<&'a str> {
        self.image_uris?.get(&format).map(String::as_str)
    }
}

/// The physical faces of a card: either the card object itself carries the image,
/// or every entry of `card_faces` carries its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Faces<'a> {
    Single(Face<'a>),
    Multiple(Vec<Face<'a>>),
}

impl<'a> Faces<'a> {
    pub fn len(&self) -> usize {
        match self {
            Faces::Single(_) => 1,
            Faces::Multiple(faces) => faces.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn front(&self) -> Option<&Face<'a>> {
        match self {
            Faces::Single(face) => Some(face),
            Faces::Multiple(faces) => faces.first(),
        }
    }

    pub fn into_vec(self) -> Vec<Face<'a>> {
        match self {
            Faces::Single(face) => vec![face],
            Faces::Multiple(faces) => faces,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported card layout {layout:?} for '{name}': no image on the card or its faces")]
pub struct UnsupportedLayout {
    pub name: String,
    pub layout: Layout,
}

impl Card {
    pub fn faces(&self) -> Result<Faces<'_>, UnsupportedLayout> {
        if self.image_uris.is_some() {
            return Ok(Faces::Single(Face::from(self)));
        }
        match &self.card_faces {
            Some(card_faces)
                if card_faces
                    .first()
                    .is_some_and(|face| face.image_uris.is_some()) =>
            {
                Ok(Faces::Multiple(
                    card_faces.iter().map(Face::from).collect(),
                ))
            }
            _ => Err(UnsupportedLayout {
                name: self.name.clone(),
                layout: self.layout,
            }),
        }
    }

    /// Reversible cards carry their oracle id on the faces only.
    pub fn oracle_id(&self) -> Option<&str> {
        self.oracle_id.as_deref().or_else(|| {
            self.card_faces
                .as_ref()?
                .first()?
                .oracle_id
                .as_deref()
        })
    }

    pub fn is_token(&self) -> bool {
        matches!(self.layout, Layout::Token | Layout::DoubleFacedToken)
    }

    pub fn has_frame_effect(&self, effect: FrameEffect) -> bool {
        self.frame_effects
            .as_ref()
            .is_some_and(|effects| effects.contains(&effect))
    }

    /// The illustration of the front face, used to tell artworks apart.
    pub fn front_illustration_id(&self) -> Option<&str> {
        self.illustration_id.as_deref().or_else(|| {
            self.card_faces
                .as_ref()?
                .first()?
                .illustration_id
                .as_deref()
        })
    }

    pub fn price(&self, key: &str) -> Option<f64> {
        self.prices.get(key)?.as_deref()?.parse().ok()
    }
}

/// Paginated list object, see https://scryfall.com/docs/api/lists
#[derive(Serialize, Deserialize, Debug)]
pub struct List<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    pub next_page: Option<String>,
    pub total_cards: Option<u32>,
}

/// Entry of https://api.scryfall.com/bulk-data
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BulkData {
    pub id: String,
    #[serde(rename = "type")]
    pub bulk_type: String,
    pub updated_at: String,
    pub uri: String,
    pub name: String,
    pub description: String,
    pub size: u64,
    pub download_uri: String,
}

#[cfg(test)]
mod tests {
    use crate::{BorderColor, Card, Faces, Frame, FrameEffect, ImageFormat, Layout};

    fn cards() -> Vec<Card> {
        serde_json::from_str(include_str!("../test_input/default-cards_truncated.json"))
            .expect("couldn't parse test input file")
    }

    #[test]
    fn default_cards() {
        let cards = cards();
        assert_eq!(cards.len(), 4, "check we get the expected number of cards");
        assert_eq!(cards[0].border_color, BorderColor::Black);
        assert_eq!(cards[0].frame, Frame::Year2015);
        assert_eq!(cards[0].price("usd"), Some(9.87));
        assert_eq!(cards[0].price("usd_foil"), None);
    }

    #[test]
    fn unknown_values() {
        let cards = cards();
        let odd = &cards[3];
        assert_eq!(odd.layout, Layout::Unknown);
        assert_eq!(odd.frame, Frame::Unknown);
        assert_eq!(odd.border_color, BorderColor::Unknown);
        assert!(odd.has_frame_effect(FrameEffect::Other));
    }

    #[test]
    fn single_face() {
        let cards = cards();
        let faces = cards[0].faces().unwrap();
        assert!(matches!(faces, Faces::Single(_)));
        assert_eq!(
            faces.front().unwrap().image_uri(ImageFormat::Png),
            cards[0].image_uris.as_ref().unwrap().get(&ImageFormat::Png).map(String::as_str)
        );
    }

    #[test]
    fn transform_faces() {
        let cards = cards();
        let faces = cards[1].faces().unwrap();
        assert_eq!(faces.len(), 2);
        let faces = faces.into_vec();
        assert_eq!(faces[0].name, "Delver of Secrets");
        assert_eq!(faces[1].name, "Insectile Aberration");
        assert!(faces[1].image_uri(ImageFormat::Png).is_some());
    }

    #[test]
    fn reversible_oracle_id() {
        let cards = cards();
        let propaganda = &cards[2];
        assert_eq!(propaganda.layout, Layout::ReversibleCard);
        assert!(propaganda.oracle_id.is_none());
        assert_eq!(
            propaganda.oracle_id(),
            Some("7c1e6a17-1a96-4ae4-b3de-4b62a6ba3e38")
        );
        assert_eq!(propaganda.faces().unwrap().len(), 2);
    }

    #[test]
    fn no_image_is_unsupported() {
        let cards = cards();
        assert!(cards[3].faces().is_err());
    }
}
