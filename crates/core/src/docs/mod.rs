//! SPIKE Prime API reference used as the generator's knowledge base.
//!
//! The corpus is compiled into the binary and never changes at runtime. A new
//! revision of the reference ships as a new [`CORPUS_VERSION`].

/// Version identifier of the bundled reference text.
pub const CORPUS_VERSION: &str = "spike-prime-3.4";

/// Section titles the generation rules depend on.
///
/// A corpus missing any of these still works, but generated code is more
/// likely to reference things the hub does not provide.
pub const REQUIRED_SECTIONS: &[&str] = &[
    "API MODULES REFERENCE",
    "Motor Module",
    "Motor Pair Module",
    "Runloop Module",
    "Distance Sensor",
    "Color Sensor",
    "Force Sensor",
    "Hub Module",
];

/// The bundled SPIKE Prime Python reference.
pub static SPIKE_PRIME: DocumentationCorpus = DocumentationCorpus {
    version: CORPUS_VERSION,
    text: include_str!("spike_prime.txt"),
};

/// An immutable, versioned API reference document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentationCorpus {
    version: &'static str,
    text: &'static str,
}

/// A block of the corpus that starts at a heading line. The first line is its
/// title. Blank lines inside worked code examples stay in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub title: &'a str,
    pub body: &'a str,
}

impl DocumentationCorpus {
    pub const fn new(version: &'static str, text: &'static str) -> Self {
        Self { version, text }
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    /// The full reference text, verbatim.
    pub fn text(&self) -> &'static str {
        self.text
    }

    /// Iterate over sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = Section<'static>> {
        split_sections(self.text)
    }

    /// Find the first section whose title starts with `name`.
    pub fn section(&self, name: &str) -> Option<Section<'static>> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.sections().find(|s| s.title.starts_with(name))
    }

    /// Required section titles that have no matching section.
    pub fn missing_sections(&self) -> Vec<&'static str> {
        REQUIRED_SECTIONS
            .iter()
            .copied()
            .filter(|name| self.section(name).is_none())
            .collect()
    }
}

/// Line prefixes that mark Python source rather than a section heading.
const CODE_PREFIXES: &[&str] = &[
    "def ",
    "async def ",
    "import ",
    "from ",
    "await ",
    "runloop.",
    "while ",
    "if ",
    "for ",
    "return ",
    "print(",
    "#",
];

/// A heading is an unindented line that is not Python source.
fn is_heading(line: &str) -> bool {
    !line.starts_with([' ', '\t']) && !CODE_PREFIXES.iter().any(|p| line.starts_with(p))
}

fn split_sections(text: &str) -> impl Iterator<Item = Section<'_>> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;
    let mut after_blank = false;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim().is_empty() {
            after_blank = true;
            continue;
        }

        // Only a heading after a blank line opens a new section.
        if after_blank && is_heading(line) {
            if let Some(s) = start.take() {
                blocks.push(&text[s..end]);
            }
        }
        after_blank = false;

        if start.is_none() {
            start = Some(line_start);
        }
        end = line_start + line.trim_end_matches(['\r', '\n']).len();
    }

    if let Some(s) = start {
        blocks.push(&text[s..end]);
    }

    blocks.into_iter().map(|block| {
        let title = block.lines().next().unwrap_or_default().trim_end();
        Section { title, body: block }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_corpus_has_required_sections() {
        assert!(SPIKE_PRIME.missing_sections().is_empty());
        assert_eq!(SPIKE_PRIME.version(), CORPUS_VERSION);
    }

    #[test]
    fn test_section_lookup_by_title_prefix() {
        let section = SPIKE_PRIME.section("Motor Pair Module").unwrap();
        assert_eq!(section.title, "Motor Pair Module: import motor_pair");
        assert!(section.body.contains("move_for_degrees"));
        assert!(section.body.contains("PAIR_1"));

        let sensor = SPIKE_PRIME.section("Distance Sensor").unwrap();
        assert!(sensor.body.contains("distance(port) -> int (mm)"));
    }

    #[test]
    fn test_section_lookup_misses() {
        assert!(SPIKE_PRIME.section("Servo Module").is_none());
        assert!(SPIKE_PRIME.section("   ").is_none());
    }

    #[test]
    fn test_sections_split_on_blank_lines() {
        let corpus = DocumentationCorpus::new(
            "test",
            "\nFirst: a\nline two\n\n\nSecond\r\nbody\r\n\nThird",
        );
        let sections: Vec<_> = corpus.sections().collect();

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, "First: a");
        assert_eq!(sections[0].body, "First: a\nline two");
        assert_eq!(sections[1].title, "Second");
        assert_eq!(sections[1].body, "Second\r\nbody");
        assert_eq!(sections[2].body, "Third");
    }

    #[test]
    fn test_code_after_blank_line_stays_in_section() {
        let corpus = DocumentationCorpus::new(
            "test",
            "Example\nimport runloop\n\nasync def main():\n    pass\n\n    # indented\nrunloop.run(main())\n\nNext Topic\nbody",
        );
        let sections: Vec<_> = corpus.sections().collect();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Example");
        assert!(sections[0].body.ends_with("runloop.run(main())"));
        assert_eq!(sections[1].title, "Next Topic");
    }

    #[test]
    fn test_worked_example_keeps_its_code() {
        let section = SPIKE_PRIME.section("Multiple Conditions").unwrap();
        assert_eq!(section.title, "Multiple Conditions (Concurrent Coroutines)");
        assert!(section.body.contains("def red_detected():"));
        assert!(section
            .body
            .ends_with("runloop.run(check_color(), check_button())"));

        let titles: Vec<_> = SPIKE_PRIME.sections().map(|s| s.title).collect();
        assert!(!titles.iter().any(|t| t.starts_with("def ")
            || t.starts_with("async def ")
            || t.starts_with("runloop.")));
    }

    #[test]
    fn test_missing_sections_reported() {
        let corpus = DocumentationCorpus::new("test", "Motor Module: import motor\nrun(port)");
        let missing = corpus.missing_sections();

        assert!(!missing.contains(&"Motor Module"));
        assert!(missing.contains(&"Runloop Module"));
        assert_eq!(missing.len(), REQUIRED_SECTIONS.len() - 1);
    }
}
