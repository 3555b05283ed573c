use regex::Regex;


/// Patterns used to normalize description text and to pick contact details out of it.
pub(crate) struct Regexes {
    whitespace: Regex,
    email: Regex,
    phone: Regex
}


impl Default for Regexes {
    fn default() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").unwrap(),
            email: Regex::new(r"\S+@\S+").unwrap(),
            phone: Regex::new(r"[\+\(]?[1-9][0-9 \-\(\)]{8,}[0-9]").unwrap()
        }
    }
}


impl Regexes {
    /// Replaces every run of whitespace with a single space. The ends are not trimmed.
    pub(crate) fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").into_owned()
    }

    /// The first token that looks like an email address.
    pub(crate) fn first_email(&self, text: &str) -> Option<String> {
        self.email
            .find(text.trim_matches('\n'))
            .map(|email| email.as_str().to_string())
    }

    /// The last token that looks like a phone number, without surrounding parentheses.
    pub(crate) fn last_phone(&self, text: &str) -> Option<String> {
        let text = text.trim_matches('\n').replace('\u{a0}', " ");
        self.phone
            .find_iter(&text)
            .map(|phone| {
                phone
                    .as_str()
                    .trim()
                    .trim_start_matches('(')
                    .trim_end_matches(')')
                    .to_string()
            })
            .filter(|phone| !phone.is_empty())
            .last()
    }
}
