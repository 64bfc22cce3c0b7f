//! Single-line token printer
//!
//! Joins words with single spaces and glues punctuation to its neighbours.

/// Printer state
pub struct Printer {
    output: String,
    glue_next: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            glue_next: true,
        }
    }

    /// Write a word, separated from the previous one by a space
    pub fn word(&mut self, text: &str) {
        if !self.glue_next {
            self.output.push(' ');
        }
        self.output.push_str(text);
        self.glue_next = false;
    }

    /// Write text directly after the previous word
    pub fn attach(&mut self, text: &str) {
        self.output.push_str(text);
        self.glue_next = false;
    }

    /// Write an opening token; the next word follows without a space
    pub fn open(&mut self, text: &str) {
        self.output.push_str(text);
        self.glue_next = true;
    }

    /// Write `, ` between list items
    pub fn comma(&mut self) {
        self.output.push(',');
        self.glue_next = false;
    }

    /// Get the output string
    pub fn finish(self) -> String {
        self.output
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_punctuation() {
        let mut p = Printer::new();
        p.word("CALL");
        p.word("a.b");
        p.open("(");
        p.word("1");
        p.comma();
        p.word("2");
        p.attach(")");
        assert_eq!(p.finish(), "CALL a.b(1, 2)");
    }
}
