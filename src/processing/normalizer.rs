//! Text normalization ahead of vectorization

use regex::Regex;

/// Canonicalizes raw resume text into lowercase ASCII words separated by single spaces
pub struct TextNormalizer {
    url_regex: Regex,
    mention_regex: Regex,
    non_letter_regex: Regex,
    whitespace_regex: Regex,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let url_regex = Regex::new(r"(?i)http\S+").expect("Invalid URL regex");
        let mention_regex = Regex::new(r"@\S+").expect("Invalid mention regex");
        let non_letter_regex = Regex::new(r"[^a-zA-Z ]").expect("Invalid letter regex");
        let whitespace_regex = Regex::new(r"\s+").expect("Invalid whitespace regex");

        Self {
            url_regex,
            mention_regex,
            non_letter_regex,
            whitespace_regex,
        }
    }

    /// Strip URLs and mentions, keep only letters, collapse whitespace, lowercase
    pub fn normalize(&self, text: &str) -> String {
        let cleaned = self.url_regex.replace_all(text, " ");
        let cleaned = self.mention_regex.replace_all(&cleaned, " ");
        let cleaned = self.non_letter_regex.replace_all(&cleaned, " ");
        let cleaned = self.whitespace_regex.replace_all(&cleaned, " ");

        cleaned.to_lowercase().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_canonical(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_lowercase() || c == ' ')
            && !text.contains("  ")
            && !text.starts_with(' ')
            && !text.ends_with(' ')
    }

    #[test]
    fn test_strips_urls_and_mentions() {
        let normalizer = TextNormalizer::new();
        let text = "Portfolio: https://github.com/jdoe ping @jdoe_dev for Java!";

        assert_eq!(normalizer.normalize(text), "portfolio ping for java");
    }

    #[test]
    fn test_url_prefix_is_case_insensitive() {
        let normalizer = TextNormalizer::new();
        let once = normalizer.normalize("See HTTPS://example.com for Java");

        assert_eq!(once, "see for java");
        assert_eq!(normalizer.normalize(&once), once);
        assert_eq!(normalizer.normalize("HTTP server"), "http server");
    }

    #[test]
    fn test_non_letters_become_spaces() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize("C#/.NET, 5+ yrs\tSQL\n"), "c net yrs sql");
        assert_eq!(normalizer.normalize("Café Résumé"), "caf r sum");
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let normalizer = TextNormalizer::new();

        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize(" \n\t 123 !! "), "");
    }

    #[test]
    fn test_idempotent_and_canonical() {
        let normalizer = TextNormalizer::new();
        let samples = [
            "Experienced Java Spring Boot developer with 4 years of experience",
            "  mixed\tCASE\nlines   https://x.io/a?b=c  @handle tail ",
            "ümlaut ß 日本語 emoji 🚀 done",
            "http@weird@http://nested",
            "See HTTPS://example.com for Java",
            "Links: Http://a.io hTTp://b.io",
            "",
        ];

        for sample in samples {
            let once = normalizer.normalize(sample);
            assert_eq!(normalizer.normalize(&once), once, "not idempotent for {:?}", sample);
            assert!(is_canonical(&once), "not canonical: {:?}", once);
        }
    }
}
