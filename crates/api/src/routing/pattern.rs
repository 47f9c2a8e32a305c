//! Route paths in the router's `{param}` / `{*rest}` syntax, matched
//! segment by segment against raw request paths.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    /// `{name}`, possibly with literal text on either side.
    Param { prefix: String, suffix: String },
    /// `{*name}`; always the last segment.
    CatchAll,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw.starts_with("{*") && raw.ends_with('}') {
            return Segment::CatchAll;
        }
        match (raw.find('{'), raw.rfind('}')) {
            (Some(open), Some(close)) if open < close => Segment::Param {
                prefix: raw[..open].to_string(),
                suffix: raw[close + 1..].to_string(),
            },
            _ => Segment::Static(raw.to_string()),
        }
    }

    fn accepts(&self, part: &str) -> bool {
        match self {
            Segment::Static(text) => text == part,
            Segment::Param { prefix, suffix } => {
                part.len() > prefix.len() + suffix.len()
                    && part.starts_with(prefix.as_str())
                    && part.ends_with(suffix.as_str())
            }
            Segment::CatchAll => !part.is_empty(),
        }
    }

    /// Every request segment `other` accepts, `self` accepts too.
    fn covers(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Static(a), Segment::Static(b)) => a == b,
            (Segment::Param { .. }, Segment::Static(text)) => self.accepts(text),
            (
                Segment::Param { prefix, suffix },
                Segment::Param {
                    prefix: other_prefix,
                    suffix: other_suffix,
                },
            ) => other_prefix.starts_with(prefix.as_str()) && other_suffix.ends_with(suffix.as_str()),
            _ => false,
        }
    }
}

/// A parsed route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub(crate) fn parse(path: &str) -> Self {
        Self {
            raw: path.to_string(),
            segments: split(path).map(Segment::parse).collect(),
        }
    }

    /// Whether a request for `path` would be routed to this pattern.
    pub(crate) fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split(path).collect();

        for (i, segment) in self.segments.iter().enumerate() {
            if *segment == Segment::CatchAll {
                return parts.get(i..).is_some_and(|rest| !rest.join("/").is_empty());
            }
            match parts.get(i) {
                Some(part) if segment.accepts(part) => {}
                _ => return false,
            }
        }
        parts.len() == self.segments.len()
    }

    /// Whether every path `other` matches is also matched by `self`.
    ///
    /// Conservative: `false` when unsure.
    pub(crate) fn covers(&self, other: &RoutePattern) -> bool {
        for (i, segment) in self.segments.iter().enumerate() {
            if *segment == Segment::CatchAll {
                return other.never_empty_from(i);
            }
            match other.segments.get(i) {
                Some(theirs) if segment.covers(theirs) => {}
                _ => return false,
            }
        }
        self.segments.len() == other.segments.len()
    }

    fn never_empty_from(&self, i: usize) -> bool {
        match self.segments.get(i..) {
            Some([]) | None => false,
            Some([Segment::Static(text)]) => !text.is_empty(),
            Some(_) => true,
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(path: &str) -> RoutePattern {
        RoutePattern::parse(path)
    }

    #[test]
    fn static_paths_match_exactly() {
        assert!(p("/api").matches("/api"));
        assert!(!p("/api").matches("/api/"));
        assert!(p("/api/").matches("/api/"));
        assert!(p("/").matches("/"));
        assert!(!p("/").matches("/api"));
    }

    #[test]
    fn params_match_one_non_empty_segment() {
        let items = p("/items/{id}");
        assert!(items.matches("/items/7"));
        assert!(items.matches("/items/special"));
        assert!(!items.matches("/items/"));
        assert!(!items.matches("/items/7/edit"));

        let file = p("/files/{name}.txt");
        assert!(file.matches("/files/notes.txt"));
        assert!(!file.matches("/files/.txt"));
        assert!(!file.matches("/files/notes.md"));
    }

    #[test]
    fn catch_all_needs_a_remainder() {
        let assets = p("/assets/{*path}");
        assert!(assets.matches("/assets/css/site.css"));
        assert!(assets.matches("/assets/logo.png"));
        assert!(!assets.matches("/assets/"));
        assert!(!assets.matches("/assets"));
    }

    #[test]
    fn params_cover_literals_and_narrower_params() {
        assert!(p("/items/{id}").covers(&p("/items/special")));
        assert!(p("/items/{id}").covers(&p("/items/{name}")));
        assert!(p("/items/{id}").covers(&p("/items/{name}.json")));
        assert!(!p("/items/special").covers(&p("/items/{id}")));
        assert!(!p("/items/{id}").covers(&p("/items/{id}/edit")));
        assert!(p("/api").covers(&p("/api")));
    }

    #[test]
    fn catch_all_covers_deeper_paths() {
        assert!(p("/assets/{*path}").covers(&p("/assets/a/b")));
        assert!(p("/assets/{*path}").covers(&p("/assets/{id}")));
        assert!(!p("/assets/{*path}").covers(&p("/assets/")));
        assert!(!p("/assets/{id}").covers(&p("/assets/{*path}")));
    }
}
