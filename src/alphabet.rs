use std::collections::BTreeMap;

pub const DESCRIPTION_FALLBACK: &str = "No description available.";
pub const REFERENCE_FALLBACK: &str = "Information not available.";

const ASL_ALPHABET: [(&str, &str); 26] = [
    ("A", "Closed fist with thumb alongside."),
    ("B", "Flat hand, fingers together, thumb across palm."),
    ("C", "Curved hand in a C shape."),
    ("D", "Pointing up with index finger, others in fist."),
    ("E", "Fingers curled in, thumb across fingers."),
    ("F", "Index finger and thumb touch in a circle, other fingers up."),
    ("G", "Index finger and thumb point sideways, parallel."),
    ("H", "Index and middle fingers point sideways together."),
    ("I", "Little finger up, others in fist."),
    ("J", "Little finger up, tracing a J in the air."),
    ("K", "Index and middle fingers up in a V, thumb between them."),
    ("L", "Index finger up and thumb out, forming an L."),
    ("M", "Thumb tucked under the first three fingers."),
    ("N", "Thumb tucked under the first two fingers."),
    ("O", "All fingertips touch the thumb in an O shape."),
    ("P", "Like K, pointing down."),
    ("Q", "Like G, pointing down."),
    ("R", "Index and middle fingers crossed."),
    ("S", "Closed fist with thumb across the fingers."),
    ("T", "Thumb tucked between index and middle fingers."),
    ("U", "Index and middle fingers up together."),
    ("V", "Index and middle fingers up and apart."),
    ("W", "Index, middle and ring fingers up and apart."),
    ("X", "Index finger bent like a hook."),
    ("Y", "Thumb and little finger out, others in fist."),
    ("Z", "Index finger tracing a Z in the air."),
];

/// Read-only label to description table, built once and shared by the client.
#[derive(Debug, Clone)]
pub struct AlphabetReference {
    entries: BTreeMap<String, String>,
}

impl AlphabetReference {
    pub fn asl() -> Self {
        Self::from_entries(ASL_ALPHABET)
    }

    pub fn from_entries<I, L, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, D)>,
        L: Into<String>,
        D: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, description)| (label.into(), description.into()))
                .collect(),
        }
    }

    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn describe(&self, label: &str) -> &str {
        self.lookup(label).unwrap_or(DESCRIPTION_FALLBACK)
    }

    pub fn reference_text(&self, letter: char) -> String {
        let description = self
            .lookup(letter.encode_utf8(&mut [0; 4]))
            .unwrap_or(REFERENCE_FALLBACK);
        format!("ASL Letter {}:\n{}", letter, description)
    }

    /// Letters shown in the reference grid.
    pub fn grid_letters() -> impl Iterator<Item = char> {
        'A'..='Z'
    }

    #[cfg(test)]
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
