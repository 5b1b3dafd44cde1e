//! Crop catalog models

use serde::{Deserialize, Serialize};

/// Crops the classifier was trained to recommend.
///
/// Discriminants are the class ids produced by the classifier and must match
/// the labels used when the model was fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crop {
    Rice = 1,
    Maize = 2,
    Jute = 3,
    Cotton = 4,
    Coconut = 5,
    Papaya = 6,
    Orange = 7,
    Apple = 8,
    Muskmelon = 9,
    Watermelon = 10,
    Grapes = 11,
    Mango = 12,
    Banana = 13,
    Pomegranate = 14,
    Lentil = 15,
    Blackgram = 16,
    Mungbean = 17,
    Mothbeans = 18,
    Pigeonpeas = 19,
    Kidneybeans = 20,
    Chickpea = 21,
    Coffee = 22,
}

impl Crop {
    /// The full catalog in class id order
    pub const ALL: [Crop; 22] = [
        Crop::Rice,
        Crop::Maize,
        Crop::Jute,
        Crop::Cotton,
        Crop::Coconut,
        Crop::Papaya,
        Crop::Orange,
        Crop::Apple,
        Crop::Muskmelon,
        Crop::Watermelon,
        Crop::Grapes,
        Crop::Mango,
        Crop::Banana,
        Crop::Pomegranate,
        Crop::Lentil,
        Crop::Blackgram,
        Crop::Mungbean,
        Crop::Mothbeans,
        Crop::Pigeonpeas,
        Crop::Kidneybeans,
        Crop::Chickpea,
        Crop::Coffee,
    ];

    /// Look up the crop for a classifier output
    pub fn from_class_id(class_id: i64) -> Option<Crop> {
        if (1..=Self::ALL.len() as i64).contains(&class_id) {
            Some(Self::ALL[(class_id - 1) as usize])
        } else {
            None
        }
    }

    pub fn class_id(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            Crop::Rice => "Rice",
            Crop::Maize => "Maize",
            Crop::Jute => "Jute",
            Crop::Cotton => "Cotton",
            Crop::Coconut => "Coconut",
            Crop::Papaya => "Papaya",
            Crop::Orange => "Orange",
            Crop::Apple => "Apple",
            Crop::Muskmelon => "Muskmelon",
            Crop::Watermelon => "Watermelon",
            Crop::Grapes => "Grapes",
            Crop::Mango => "Mango",
            Crop::Banana => "Banana",
            Crop::Pomegranate => "Pomegranate",
            Crop::Lentil => "Lentil",
            Crop::Blackgram => "Blackgram",
            Crop::Mungbean => "Mungbean",
            Crop::Mothbeans => "Mothbeans",
            Crop::Pigeonpeas => "Pigeonpeas",
            Crop::Kidneybeans => "Kidneybeans",
            Crop::Chickpea => "Chickpea",
            Crop::Coffee => "Coffee",
        }
    }
}

impl std::fmt::Display for Crop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Catalog entry as exposed to API clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropEntry {
    pub id: i64,
    pub name: String,
}

impl From<Crop> for CropEntry {
    fn from(crop: Crop) -> Self {
        CropEntry {
            id: crop.class_id(),
            name: crop.name().to_string(),
        }
    }
}

/// The whole catalog as API entries, ordered by id
pub fn crop_catalog() -> Vec<CropEntry> {
    Crop::ALL.iter().copied().map(CropEntry::from).collect()
}
