//! English noun lemmatizer.
//!
//! Reduces inflected nouns to their dictionary base form using an
//! irregular-form table and the standard plural suffix rules
//! (`-ies` → `-y`, `-sses` → `-ss`, `-xes`/`-ches`/`-shes`/`-zzes` → drop `-es`,
//! otherwise drop `-s`). Words are treated as nouns, so verb inflections such
//! as `running` pass through unchanged.
//!
//! `lemmatize(lemmatize(w)) == lemmatize(w)` holds for every input.

use std::collections::{HashMap, HashSet};

const IRREGULAR: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("data", "datum"),
    ("media", "medium"),
    ("bacteria", "bacterium"),
    ("curricula", "curriculum"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("analyses", "analysis"),
    ("hypotheses", "hypothesis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("parentheses", "parenthesis"),
    ("syntheses", "synthesis"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("appendices", "appendix"),
    ("cacti", "cactus"),
    ("fungi", "fungus"),
    ("nuclei", "nucleus"),
    ("radii", "radius"),
    ("stimuli", "stimulus"),
    ("alumni", "alumnus"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("thieves", "thief"),
    ("loaves", "loaf"),
    ("calves", "calf"),
    ("heroes", "hero"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("echoes", "echo"),
    ("vetoes", "veto"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("calories", "calorie"),
    ("zombies", "zombie"),
    ("pies", "pie"),
    ("ties", "tie"),
    ("lies", "lie"),
];

/// Words ending in `s` that are already base forms.
const INVARIANT: &[&str] = &[
    "series", "species", "news", "means", "lens", "chaos", "bias", "atlas", "canvas", "alias",
    "ethos", "pathos", "kudos", "corps", "always", "perhaps", "whereas", "thus", "yes", "sometimes",
    "besides", "afterwards", "towards", "aids", "mathematics", "physics", "economics", "politics",
    "ethics", "statistics", "linguistics", "electronics",
];

/// Dictionary-free noun lemmatizer. Cheap to construct; immutable after.
pub struct Lemmatizer {
    irregular: HashMap<&'static str, &'static str>,
    invariant: HashSet<&'static str>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self {
            irregular: IRREGULAR.iter().copied().collect(),
            invariant: INVARIANT.iter().copied().collect(),
        }
    }

    /// Lemmatize a single lowercase token.
    ///
    /// Rules are reapplied until the word stops changing, so a suffix rule
    /// that exposes an irregular plural (`womens` → `women`) still reaches
    /// the base form. Every non-terminal step either maps to an irregular
    /// base, which is itself a fixed point, or shortens the word.
    pub fn lemmatize(&self, word: &str) -> String {
        let mut current = self.reduce(word);
        loop {
            let next = self.reduce(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn reduce(&self, word: &str) -> String {
        if let Some(base) = self.irregular.get(word) {
            return (*base).to_string();
        }
        if self.invariant.contains(word) || !word.is_ascii() || word.len() <= 3 {
            return word.to_string();
        }
        if ["ss", "us", "is", "ous"].iter().any(|s| word.ends_with(s)) {
            return word.to_string();
        }

        if let Some(stem) = word.strip_suffix("ies") {
            if stem.len() >= 2 {
                return format!("{}y", stem);
            }
            return word.to_string();
        }
        for suffix in ["sses", "xes", "ches", "shes", "zzes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }

        word.to_string()
    }
}
