use std::sync::OnceLock;

use regex::{Captures, Regex};

/// The regular expression which recognises one form of statement.
/// It is compiled the first time it is used.
pub(super) struct Pattern {
    form: &'static str,
    source: &'static str,
    once: OnceLock<Regex>,
}

impl Pattern {
    pub(super) const fn new(form: &'static str, source: &'static str) -> Pattern {
        Pattern {
            form,
            source,
            once: OnceLock::new(),
        }
    }

    fn regex(&self) -> &Regex {
        self.once.get_or_init(|| match Regex::new(self.source) {
            Ok(r) => r,
            Err(e) => {
                panic!(
                    "the pattern for {} statements ('{}') is not a valid regular expression: {e}",
                    self.form, self.source
                );
            }
        })
    }

    pub(super) fn captures<'t>(&self, line: &'t str) -> Option<Captures<'t>> {
        self.regex().captures(line)
    }

    pub(super) fn is_match(&self, line: &str) -> bool {
        self.regex().is_match(line)
    }
}
