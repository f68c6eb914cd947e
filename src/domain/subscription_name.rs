use unicode_segmentation::UnicodeSegmentation;

/// The user-entered service name ("Netflix", "Gym membership", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionName(String);

impl SubscriptionName {
    /// Rejects empty or whitespace-only names, names longer than 256
    /// graphemes, and names containing characters that would leak markup
    /// into rendered reminder emails.
    pub fn parse(s: String) -> Result<SubscriptionName, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > 256;
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = s.chars().any(|c| forbidden_characters.contains(&c));

        if is_empty_or_whitespace || is_too_long || contains_forbidden_characters {
            Err(format!("{} is not a valid subscription name.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for SubscriptionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
