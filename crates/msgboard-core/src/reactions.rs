//! The fixed set of emoji reactions offered on every message.

/// Number of reactions shown per row.
pub const ROW_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reaction {
    pub emoji: &'static str,
    pub name: &'static str,
}

const fn reaction(emoji: &'static str, name: &'static str) -> Reaction {
    Reaction { emoji, name }
}

const DEFAULT_REACTIONS: [Reaction; 24] = [
    // Positive
    reaction("❤️", "heart"),
    reaction("😍", "heart_eyes"),
    reaction("🥰", "smiling_hearts"),
    reaction("😊", "blush"),
    reaction("🌸", "flower"),
    reaction("✨", "sparkles"),
    // Fun
    reaction("😄", "smile"),
    reaction("😆", "laugh"),
    reaction("🤣", "rofl"),
    reaction("👻", "ghost"),
    reaction("🎉", "party"),
    reaction("🎨", "art"),
    // Cute
    reaction("🐱", "cat"),
    reaction("🐰", "bunny"),
    reaction("🦋", "butterfly"),
    reaction("🌈", "rainbow"),
    reaction("☁️", "cloud"),
    reaction("🎀", "ribbon"),
    // Support
    reaction("👍", "thumbs_up"),
    reaction("💫", "dizzy"),
    reaction("💝", "gift_heart"),
    reaction("💭", "thought"),
    reaction("💫", "sparkle"),
    reaction("🌟", "star"),
];

/// Ordered reaction catalog, handed to whatever renders messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionCatalog {
    reactions: Vec<Reaction>,
}

impl Default for ReactionCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_REACTIONS.to_vec())
    }
}

impl ReactionCatalog {
    pub fn new(reactions: Vec<Reaction>) -> Self {
        Self { reactions }
    }

    pub fn all(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Reaction> {
        self.reactions.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.name == name)
    }

    /// The catalog split into display rows of [`ROW_LEN`].
    pub fn rows(&self) -> impl Iterator<Item = &[Reaction]> {
        self.reactions.chunks(ROW_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_two_rows_of_twelve() {
        let catalog = ReactionCatalog::default();
        assert_eq!(catalog.len(), 24);
        let rows: Vec<&[Reaction]> = catalog.rows().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == ROW_LEN));
        assert_eq!(rows[0][0].name, "heart");
        assert_eq!(rows[1][0].name, "cat");
    }

    #[test]
    fn test_names_are_unique() {
        let catalog = ReactionCatalog::default();
        let mut names: Vec<&str> = catalog.all().iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn test_find_by_name() {
        let catalog = ReactionCatalog::default();
        assert_eq!(catalog.find("party").map(|r| r.emoji), Some("🎉"));
        assert!(catalog.find("nope").is_none());
    }
}
