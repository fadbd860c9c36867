//! Names and identifiers for new documents.

use crate::domain::model::DocumentId;

/// Hands out `Untitled1`, `Untitled2`, … and unique document ids. One instance is shared by
/// every window of the process.
#[derive(Debug, Clone)]
pub struct UntitledNamer {
    next_untitled: u32,
    next_id: u64,
}

impl Default for UntitledNamer {
    fn default() -> Self {
        Self {
            next_untitled: 1,
            next_id: 1,
        }
    }
}

impl UntitledNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next placeholder name; the counter only moves forward.
    pub fn next_name(&mut self) -> String {
        let name = format!("Untitled{}", self.next_untitled);
        self.next_untitled += 1;
        name
    }

    pub fn next_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_increment_from_one() {
        let mut namer = UntitledNamer::new();
        assert_eq!(namer.next_name(), "Untitled1");
        assert_eq!(namer.next_name(), "Untitled2");
        assert_ne!(namer.next_id(), namer.next_id());
    }
}
