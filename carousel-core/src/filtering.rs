use crate::criteria::{FilterCriteria, StarRange};
use crate::models::Beatmap;
use crate::sorting::fold_for_matching;
use regex::Regex;
use std::sync::OnceLock;

/// Comparison operator in a `key<op>value` condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Operator {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "=" | ":" | "==" => Some(Operator::Equal),
            "<" => Some(Operator::Less),
            "<=" => Some(Operator::LessOrEqual),
            ">" => Some(Operator::Greater),
            ">=" => Some(Operator::GreaterOrEqual),
            _ => None,
        }
    }

    fn holds(self, actual: f64, expected: f64) -> bool {
        match self {
            // Displayed values are rounded, so equality is loose
            Operator::Equal => (actual - expected).abs() < 0.005,
            Operator::Less => actual < expected,
            Operator::LessOrEqual => actual <= expected,
            Operator::Greater => actual > expected,
            Operator::GreaterOrEqual => actual >= expected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Stars(Operator, f64),
    /// Seconds
    Length(Operator, f64),
    Bpm(Operator, f64),
    Artist(String),
    Creator(String),
    Title(String),
    DifficultyName(String),
}

/// Parsed search text: free-text terms plus keyed conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub terms: Vec<String>,
    pub conditions: Vec<Condition>,
}

impl SearchQuery {
    /// Parse search text like `camellia stars>5 length<180`.
    /// Tokens with an unknown key or an unparsable number stay free-text terms.
    pub fn parse(text: &str) -> Self {
        static CONDITION: OnceLock<Regex> = OnceLock::new();
        let re = CONDITION.get_or_init(|| {
            Regex::new(r"^([A-Za-z]+)(<=|>=|==|=|:|<|>)(.+)$").expect("condition pattern is valid")
        });

        let mut query = SearchQuery::default();

        for token in text.split_whitespace() {
            let condition = re.captures(token).and_then(|caps| {
                let op = Operator::parse(&caps[2])?;
                parse_condition(&caps[1].to_lowercase(), op, &caps[3])
            });

            match condition {
                Some(condition) => query.conditions.push(condition),
                None => query.terms.push(fold_for_matching(token)),
            }
        }

        query
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.conditions.is_empty()
    }

    /// AND logic: every term and every condition must hold
    pub fn matches(&self, beatmap: &Beatmap) -> bool {
        if !self.terms.is_empty() {
            let haystacks = searchable_fields(beatmap);
            let all_terms = self
                .terms
                .iter()
                .all(|term| haystacks.iter().any(|field| field.contains(term.as_str())));
            if !all_terms {
                return false;
            }
        }

        self.conditions.iter().all(|c| condition_holds(c, beatmap))
    }
}

fn parse_condition(key: &str, op: Operator, value: &str) -> Option<Condition> {
    let number = || value.parse::<f64>().ok();

    match key {
        "stars" | "star" | "sr" => number().map(|n| Condition::Stars(op, n)),
        "length" | "len" => number().map(|n| Condition::Length(op, n)),
        "bpm" => number().map(|n| Condition::Bpm(op, n)),
        "artist" if op == Operator::Equal => Some(Condition::Artist(fold_for_matching(value))),
        "creator" | "mapper" if op == Operator::Equal => {
            Some(Condition::Creator(fold_for_matching(value)))
        }
        "title" if op == Operator::Equal => Some(Condition::Title(fold_for_matching(value))),
        "diff" | "version" if op == Operator::Equal => {
            Some(Condition::DifficultyName(fold_for_matching(value)))
        }
        _ => None,
    }
}

fn condition_holds(condition: &Condition, beatmap: &Beatmap) -> bool {
    let metadata = &beatmap.metadata;
    match condition {
        Condition::Stars(op, n) => op.holds(beatmap.star_rating, *n),
        Condition::Length(op, n) => op.holds(beatmap.length_ms as f64 / 1000.0, *n),
        Condition::Bpm(op, n) => op.holds(beatmap.bpm, *n),
        Condition::Artist(s) => fold_for_matching(&metadata.artist).contains(s.as_str()),
        Condition::Creator(s) => fold_for_matching(&metadata.creator).contains(s.as_str()),
        Condition::Title(s) => fold_for_matching(&metadata.title).contains(s.as_str()),
        Condition::DifficultyName(s) => {
            fold_for_matching(&beatmap.difficulty_name).contains(s.as_str())
        }
    }
}

fn searchable_fields(beatmap: &Beatmap) -> Vec<String> {
    let metadata = &beatmap.metadata;
    let mut fields = vec![
        fold_for_matching(&metadata.title),
        fold_for_matching(&metadata.artist),
        fold_for_matching(&metadata.creator),
        fold_for_matching(&beatmap.difficulty_name),
    ];
    if let Some(source) = &metadata.source {
        fields.push(fold_for_matching(source));
    }
    fields.extend(metadata.tags.iter().map(|t| fold_for_matching(t)));
    fields
}

/// Compiled search predicate for one filter pass
#[derive(Debug, Clone)]
pub struct Matcher {
    query: SearchQuery,
    star_range: Option<StarRange>,
}

impl Matcher {
    pub fn new(criteria: &FilterCriteria) -> Self {
        Self {
            query: SearchQuery::parse(&criteria.search_text),
            star_range: criteria.star_range,
        }
    }

    /// Check if a beatmap passes both the search text and the star range
    pub fn matches(&self, beatmap: &Beatmap) -> bool {
        if let Some(range) = &self.star_range {
            if !range.contains(beatmap.star_rating) {
                return false;
            }
        }

        self.query.matches(beatmap)
    }
}

/// Check if the criteria filter anything out at all
pub fn has_filters(criteria: &FilterCriteria) -> bool {
    criteria.star_range.is_some() || !SearchQuery::parse(&criteria.search_text).is_empty()
}
