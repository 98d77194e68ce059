//! Allocation and validation of the human-readable slugs that identify
//! public webhook endpoints.

use rand::Rng;

const VERBS: &[&str] = &[
    "dancing", "jumping", "running", "flying", "swimming", "singing", "coding", "debugging",
    "testing", "deploying", "building", "designing", "thinking", "learning", "teaching", "writing",
    "reading", "exploring", "creating", "innovating", "optimizing", "scaling", "refactoring",
    "merging", "pushing", "pulling", "committing", "branching", "reviewing", "shipping", "driving",
    "walking", "hiking", "climbing", "surfing", "skating", "spinning", "rolling", "bouncing",
    "sliding", "gliding", "soaring",
];

const NOUNS: &[&str] = &[
    "orange", "apple", "banana", "monkey", "elephant", "giraffe", "penguin", "dolphin", "tiger",
    "lion", "panda", "koala", "robot", "rocket", "satellite", "server", "laptop", "keyboard",
    "mouse", "monitor", "processor", "compiler", "debugger", "terminal", "cloud", "database",
    "firewall", "algorithm", "function", "variable", "mountain", "ocean", "forest", "desert",
    "river", "lake", "sunset", "sunrise", "rainbow", "thunder", "lightning", "tornado", "pizza",
    "burger", "taco", "sushi", "pasta", "sandwich",
];

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 50;

/// Generates a `verb-noun-number` path, e.g. `dancing-penguin-42`. The space
/// is bounded (verbs × nouns × 0–999), so callers must handle collisions
/// against existing records.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    let verb = VERBS[rng.gen_range(0..VERBS.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let number: u16 = rng.gen_range(0..1000);
    format!("{verb}-{noun}-{number}")
}

/// Validates a user-chosen path against the slug pattern
/// `^[a-z0-9-]{3,50}$`: lowercase alphanumerics and hyphens, 3–50 characters.
pub fn is_valid(path: &str) -> bool {
    (MIN_LEN..=MAX_LEN).contains(&path.len())
        && path
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_paths_have_the_expected_shape_and_validate() {
        for _ in 0..100 {
            let path = generate();
            let parts: Vec<&str> = path.split('-').collect();

            assert_eq!(parts.len(), 3, "unexpected shape: {path}");
            assert!(VERBS.contains(&parts[0]));
            assert!(NOUNS.contains(&parts[1]));
            assert!(parts[2].parse::<u16>().unwrap() < 1000);
            assert!(is_valid(&path));
        }
    }

    #[test]
    fn two_characters_is_too_short() {
        assert!(!is_valid("ab"));
    }

    #[test]
    fn three_characters_is_the_minimum() {
        assert!(is_valid("abc"));
    }

    #[test]
    fn uppercase_is_rejected() {
        assert!(!is_valid("ABC-123"));
    }

    #[test]
    fn fifty_characters_is_the_maximum() {
        assert!(is_valid(&"a".repeat(50)));
        assert!(!is_valid(&"a".repeat(51)));
    }

    #[test]
    fn other_characters_are_rejected() {
        assert!(!is_valid("path_with_underscores"));
        assert!(!is_valid("path with spaces"));
        assert!(!is_valid("päth"));
    }

    #[test]
    fn digits_and_hyphens_are_allowed() {
        assert!(is_valid("my-hook-2024"));
        assert!(is_valid("000"));
    }
}
