use url::Url;

/// Locale segment every documentation path starts with
const LOCALE: &str = "en";

/// A top-level documentation area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Narrative guides under `/topics/`
    Topics,
    /// API reference under `/ref/`
    Reference,
}

impl Section {
    /// The path segment that introduces this section
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Topics => "topics",
            Self::Reference => "ref",
        }
    }
}

/// What a URL was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// `/en/{version}/topics/{page}/`
    Topic,
    /// `/en/{version}/topics/{page}/{sub}/`
    TopicSub,
    /// `/en/{version}/ref/{page}/`
    Reference,
    /// `/en/{version}/ref/{page}/{sub}/`
    ReferenceSub,
}

impl SectionKind {
    /// Returns true for the sub-page kinds
    pub fn is_sub_page(&self) -> bool {
        matches!(self, Self::TopicSub | Self::ReferenceSub)
    }
}

/// A depth-exact match rule for one section of one documentation version
///
/// The rule matches URLs whose path is `/en/{version}/{section}/` followed by
/// exactly `depth` non-empty segments and an optional trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPattern {
    kind: SectionKind,
    prefix: [String; 3],
    depth: usize,
}

impl SectionPattern {
    /// Creates a rule for `section` of `version` requiring `depth` segments
    pub fn new(kind: SectionKind, version: &str, section: Section, depth: usize) -> Self {
        Self {
            kind,
            prefix: [
                LOCALE.to_string(),
                version.to_string(),
                section.marker().to_string(),
            ],
            depth,
        }
    }

    /// The classification this rule assigns
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// Checks a raw URL string; URLs that fail to parse never match
    pub fn matches(&self, url: &str) -> bool {
        Url::parse(url)
            .map(|parsed| self.matches_url(&parsed))
            .unwrap_or(false)
    }

    /// Checks an already parsed URL
    pub fn matches_url(&self, url: &Url) -> bool {
        let Some(segments) = url.path_segments() else {
            return false;
        };
        let mut segments: Vec<&str> = segments.collect();

        // Optional trailing slash
        if segments.last().is_some_and(|last| last.is_empty()) {
            segments.pop();
        }

        if segments.iter().any(|segment| segment.is_empty()) {
            return false;
        }

        segments.len() == self.prefix.len() + self.depth
            && segments
                .iter()
                .zip(self.prefix.iter())
                .all(|(segment, expected)| *segment == expected.as_str())
    }
}

/// The four match rules for one documentation version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionPatterns {
    pub topic: SectionPattern,
    pub topic_sub: SectionPattern,
    pub reference: SectionPattern,
    pub reference_sub: SectionPattern,
}

impl SectionPatterns {
    /// Iterates the rules in topic, topic-sub, reference, reference-sub order
    pub fn iter(&self) -> impl Iterator<Item = &SectionPattern> {
        [
            &self.topic,
            &self.topic_sub,
            &self.reference,
            &self.reference_sub,
        ]
        .into_iter()
    }

    /// Returns the kind of the first rule matching `url`
    pub fn classify(&self, url: &str) -> Option<SectionKind> {
        let parsed = Url::parse(url).ok()?;
        self.iter()
            .find(|pattern| pattern.matches_url(&parsed))
            .map(SectionPattern::kind)
    }

    /// Returns true if any rule matches `url`
    pub fn is_in_scope(&self, url: &str) -> bool {
        self.classify(url).is_some()
    }
}

/// Builds the topic, topic-sub, reference and reference-sub rules for `version`
///
/// # Examples
///
/// ```
/// use docgraph::sections::patterns_for;
///
/// let patterns = patterns_for("6.0");
/// assert!(patterns.topic.matches("https://docs.example.com/en/6.0/topics/auth/"));
/// assert!(!patterns.topic_sub.matches("https://docs.example.com/en/6.0/topics/auth/"));
/// ```
pub fn patterns_for(version: &str) -> SectionPatterns {
    SectionPatterns {
        topic: SectionPattern::new(SectionKind::Topic, version, Section::Topics, 1),
        topic_sub: SectionPattern::new(SectionKind::TopicSub, version, Section::Topics, 2),
        reference: SectionPattern::new(SectionKind::Reference, version, Section::Reference, 1),
        reference_sub: SectionPattern::new(
            SectionKind::ReferenceSub,
            version,
            Section::Reference,
            2,
        ),
    }
}
