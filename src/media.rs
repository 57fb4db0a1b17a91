//! Media-query algebra (spec §4.6).

use codemap::Span;

use crate::error::{SassError, SassResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modifier {
    Only,
    Not,
}

/// One `(feature)` or `(feature: value)` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFeature {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    pub modifier: Option<Modifier>,
    pub media_type: Option<String>,
    pub features: Vec<MediaFeature>,
}

impl MediaQuery {
    pub fn condition_only(features: Vec<MediaFeature>) -> Self {
        MediaQuery {
            modifier: None,
            media_type: None,
            features,
        }
    }

    fn effective_type(&self) -> &str {
        self.media_type.as_deref().unwrap_or("all")
    }

    /// Merges two single queries per spec §4.6. `Ok(None)` means the
    /// pair has no overlap (drop silently); `Err` means the merge cannot
    /// be represented as a single query ("unrepresentable"), and the
    /// caller should fall back to leaving the inner query nested.
    fn merge(&self, other: &MediaQuery) -> Result<Option<MediaQuery>, Unrepresentable> {
        if self.modifier == Some(Modifier::Not) || other.modifier == Some(Modifier::Not) {
            // `not` combined with anything but an identical query is
            // unrepresentable as a single query.
            if self == other {
                return Ok(Some(self.clone()));
            }
            return Err(Unrepresentable);
        }

        if self.media_type.is_some()
            && other.media_type.is_some()
            && self.effective_type() != other.effective_type()
        {
            return Ok(None);
        }

        let media_type = self.media_type.clone().or_else(|| other.media_type.clone());
        let modifier = match (&self.modifier, &other.modifier) {
            (Some(Modifier::Only), _) | (_, Some(Modifier::Only)) => Some(Modifier::Only),
            _ => None,
        };

        let mut features = self.features.clone();
        features.extend(other.features.clone());

        Ok(Some(MediaQuery {
            modifier,
            media_type,
            features,
        }))
    }
}

struct Unrepresentable;

impl std::fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut wrote_prefix = false;
        if let Some(Modifier::Only) = self.modifier {
            write!(f, "only ")?;
            wrote_prefix = true;
        }
        if let Some(Modifier::Not) = self.modifier {
            write!(f, "not ")?;
            wrote_prefix = true;
        }
        if let Some(ty) = &self.media_type {
            write!(f, "{}", ty)?;
            wrote_prefix = true;
        }
        for (i, feature) in self.features.iter().enumerate() {
            if i > 0 || wrote_prefix {
                write!(f, " and ")?;
            }
            write!(f, "{}", feature.text)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaQueryList {
    pub queries: Vec<MediaQuery>,
}

impl MediaQueryList {
    pub fn single(query: MediaQuery) -> Self {
        MediaQueryList { queries: vec![query] }
    }

    /// Cartesian-product merge of two query lists (spec §4.6). Pairs
    /// that cannot be represented as a single query cause the whole
    /// merge to report "unrepresentable"; the caller should then keep
    /// the inner `@media` nested rather than flattened.
    pub fn merge(&self, other: &MediaQueryList) -> SassResult<Option<MediaQueryList>> {
        let mut merged = Vec::new();
        for a in &self.queries {
            for b in &other.queries {
                match a.merge(b) {
                    Ok(Some(q)) => merged.push(q),
                    Ok(None) => {}
                    Err(Unrepresentable) => {
                        return Err(SassError::script("unrepresentable media query merge"));
                    }
                }
            }
        }
        if merged.is_empty() {
            Ok(None)
        } else {
            Ok(Some(MediaQueryList { queries: merged }))
        }
    }

    /// Best-effort merge that falls back to "leave nested" instead of
    /// propagating an error, per spec §4.6's executor-level fallback
    /// rule: "the executor falls back to leaving the inner query as-is".
    pub fn merge_or_nest(&self, other: &MediaQueryList) -> MergeOutcome {
        match self.merge(other) {
            Ok(Some(merged)) => MergeOutcome::Merged(merged),
            Ok(None) => MergeOutcome::Empty,
            Err(_) => MergeOutcome::Unrepresentable,
        }
    }

    pub fn is_subset_of(&self, other: &MediaQueryList) -> bool {
        self.queries.iter().all(|q| other.queries.contains(q))
    }
}

pub enum MergeOutcome {
    Merged(MediaQueryList),
    /// Empty merge result: the media block emits no CSS (spec §4.6,
    /// "silently dropped").
    Empty,
    Unrepresentable,
}

impl std::fmt::Display for MediaQueryList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, q) in self.queries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", q)?;
        }
        Ok(())
    }
}

/// Minimal reparse for media-query text after interpolation (spec §7).
pub fn parse_media_query_list(source: &str, span: Span) -> SassResult<MediaQueryList> {
    let mut queries = Vec::new();
    for part in source.split(',') {
        queries.push(parse_single_query(part.trim(), span)?);
    }
    Ok(MediaQueryList { queries })
}

fn parse_single_query(source: &str, span: Span) -> SassResult<MediaQuery> {
    let mut words = source.split_whitespace().peekable();
    let mut modifier = None;
    let mut media_type = None;

    if let Some(&first) = words.peek() {
        match first.to_ascii_lowercase().as_str() {
            "only" => {
                modifier = Some(Modifier::Only);
                words.next();
            }
            "not" => {
                modifier = Some(Modifier::Not);
                words.next();
            }
            _ => {}
        }
    }

    if let Some(&next) = words.peek() {
        if !next.starts_with('(') {
            media_type = Some(next.to_owned());
            words.next();
            if let Some(&and) = words.peek() {
                if and.eq_ignore_ascii_case("and") {
                    words.next();
                }
            }
        }
    }

    let rest: String = words.collect::<Vec<_>>().join(" ");
    let mut features = Vec::new();
    if !rest.is_empty() {
        for feature in split_and_separated(&rest) {
            if !feature.starts_with('(') || !feature.ends_with(')') {
                return Err(SassError::parse(
                    format!("expected media feature, got \"{}\"", feature),
                    span,
                ));
            }
            features.push(MediaFeature { text: feature });
        }
    }

    Ok(MediaQuery {
        modifier,
        media_type,
        features,
    })
}

/// Splits `(a) and (b) and (c)` on top-level ` and ` occurrences.
fn split_and_separated(source: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    let words: Vec<&str> = source.split(' ').collect();
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        if word.eq_ignore_ascii_case("and") && depth == 0 && !current.is_empty() {
            parts.push(current.trim().to_owned());
            current.clear();
            i += 1;
            continue;
        }
        for c in word.chars() {
            if c == '(' {
                depth += 1;
            } else if c == ')' {
                depth -= 1;
            }
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        i += 1;
    }
    if !current.is_empty() {
        parts.push(current.trim().to_owned());
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        let mut map = codemap::CodeMap::new();
        let file = map.add_file("test".into(), "x".into());
        file.span
    }

    #[test]
    fn merges_nested_min_width_queries() {
        let outer = parse_media_query_list("(min-width: 10px)", span()).unwrap();
        let inner = parse_media_query_list("(min-width: 20px)", span()).unwrap();
        let merged = outer.merge(&inner).unwrap().unwrap();
        assert_eq!(merged.to_string(), "(min-width: 10px) and (min-width: 20px)");
    }

    #[test]
    fn conflicting_types_drop_the_pair() {
        let a = parse_media_query_list("screen", span()).unwrap();
        let b = parse_media_query_list("print", span()).unwrap();
        assert!(a.merge(&b).unwrap().is_none());
    }

    #[test]
    fn only_combined_with_not_is_unrepresentable() {
        let a = parse_media_query_list("only screen", span()).unwrap();
        let b = parse_media_query_list("not screen", span()).unwrap();
        assert!(matches!(a.merge_or_nest(&b), MergeOutcome::Unrepresentable));
    }
}
