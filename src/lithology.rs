//! Lithology palette
//!
//! Maps a top name to the chronostratigraphic color used on the depth column.
//! Entries are checked in order and the first group with a keyword contained
//! in the lower-cased, trimmed name wins.

use serde::{Deserialize, Serialize};

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Components scaled to 0.0-1.0.
    pub fn normalized(self) -> (f64, f64, f64) {
        (
            f64::from(self.0) / 255.0,
            f64::from(self.1) / 255.0,
            f64::from(self.2) / 255.0,
        )
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Color for tops that match no keyword (0.8 grey).
pub const UNMATCHED_COLOR: Rgb = Rgb(204, 204, 204);

/// Ordered (color, keywords) table, Oligocene down to Oxfordian.
pub const LITHOLOGY_PALETTE: &[(Rgb, &[&str])] = &[
    (
        Rgb(253, 192, 122),
        &["OS", "OI", "Oligoceno Superior", "Oligoceno Inferior"],
    ),
    (
        Rgb(253, 180, 108),
        &["ES", "Eoceno Superior", "EM", "Eoceno Medio", "EI", "Eoceno Inferior"],
    ),
    (
        Rgb(253, 167, 95),
        &["PS", "PI", "Paleoceno Superior", "Paleoceno Inferior"],
    ),
    (
        Rgb(166, 216, 74),
        &[
            "KS",
            "KS Mendez",
            "Mendez",
            "KS San Felipe",
            "San Felipe",
            "KS Agua Nueva",
            "Agua Nueva",
        ],
    ),
    (
        Rgb(148, 210, 80),
        &["KM", "Tamabra", "El Abra", "Tamaulipas Superior"],
    ),
    (
        Rgb(145, 205, 87),
        &["KI", "KI Tamaulipas Inferior", "Tamaulipas Inferior", "Otates"],
    ),
    (Rgb(217, 241, 247), &["JST", "Titho", "Tithoniano"]),
    (Rgb(204, 236, 244), &["JSK", "Kimmer", "Kimmeridgiano"]),
    (Rgb(191, 231, 241), &["JSO", "Oxford", "Oxfordiano"]),
];

/// Look up the display color for a top name.
pub fn color_for(top_name: &str) -> Rgb {
    let name = top_name.trim().to_lowercase();
    LITHOLOGY_PALETTE
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|k| name.contains(k.to_lowercase().as_str()))
        })
        .map_or(UNMATCHED_COLOR, |(rgb, _)| *rgb)
}
