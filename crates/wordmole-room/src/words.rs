//! The built-in secret-word list.

/// Default pool a round's secret word is drawn from.
pub const WORDS: &[&str] = &[
    "Apfel", "Haus", "Ball", "Pferd", "Kaktus", "Banane", "Schule", "Wolke",
    "Garten", "Spiegel", "Brücke", "Fenster",
];

/// What the imposter is shown in place of the secret word.
pub const MASKED_WORD: &str = "???";
