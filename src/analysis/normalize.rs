/// Canonical key for team-name comparisons: trimmed and lower-cased.
///
/// Only used for equality. Display keeps the original spelling.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Team Liquid "), "team liquid");
        assert_eq!(normalize("ALPHA"), "alpha");
        assert_eq!(normalize(""), "");
    }
}
