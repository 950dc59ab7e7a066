use tracing::{debug, trace};

use cparrun_model::Segment;

use crate::template::ParseError;

/// Marker opening a list of alternatives.
pub const DEFAULT_START_TOKEN: &str = "%[";
/// Marker closing a list of alternatives.
pub const DEFAULT_END_TOKEN: &str = "]%";
/// Upper bound on alternative groups in one template.
pub const DEFAULT_MAX_GROUPS: usize = 9;

/// Parse `template` with the given markers and the default group limit.
///
/// See [`TemplateParser::parse`].
pub fn parse(template: &str, start_token: &str, end_token: &str) -> Result<Vec<Segment>, ParseError> {
    TemplateParser::new(start_token, end_token).parse(template)
}

/// Splits templated command strings into literal and alternatives segments.
#[derive(Debug, Clone)]
pub struct TemplateParser {
    start: String,
    end: String,
    max_groups: usize,
}

impl TemplateParser {
    pub fn new(start_token: impl Into<String>, end_token: impl Into<String>) -> Self {
        Self {
            start: start_token.into(),
            end: end_token.into(),
            max_groups: DEFAULT_MAX_GROUPS,
        }
    }

    /// Override the maximum number of alternative groups accepted.
    pub fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = max_groups;
        self
    }

    /// Parse a template into ordered segments.
    ///
    /// Text before each start marker becomes a literal (kept verbatim, skipped
    /// only when empty). A whitespace-only separator between two groups is kept
    /// so that joined alternatives stay apart. Text between the markers is split on `,` and each value
    /// is trimmed; duplicates and empty values are kept. A non-blank remainder
    /// after the last group becomes a trailing literal.
    ///
    /// Fails when a start marker is not followed by an end marker, when an end
    /// marker precedes the next start marker, or when the template holds more
    /// than `max_groups` groups.
    pub fn parse(&self, template: &str) -> Result<Vec<Segment>, ParseError> {
        if self.start.is_empty() || self.end.is_empty() {
            return Err(ParseError::EmptyToken);
        }

        let mut segments = Vec::new();
        let mut rest = template;
        let mut offset = 0;
        let mut groups = 0;

        loop {
            let Some(start_at) = rest.find(&self.start) else {
                if !rest.trim().is_empty() {
                    segments.push(Segment::literal(rest));
                }
                break;
            };
            if groups == self.max_groups {
                debug!(limit = self.max_groups, "template group limit reached");
                return Err(ParseError::TooManyGroups {
                    limit: self.max_groups,
                    parsed: segments,
                });
            }

            let body_at = start_at + self.start.len();
            let end_at = match rest.find(&self.end) {
                Some(end_at) if end_at >= body_at => end_at,
                found => {
                    let at = found.filter(|&e| e < start_at).unwrap_or(start_at);
                    return Err(ParseError::Unbalanced {
                        offset: offset + at,
                        parsed: segments,
                    });
                }
            };

            if start_at > 0 {
                segments.push(Segment::literal(&rest[..start_at]));
            }
            let values = rest[body_at..end_at]
                .split(',')
                .map(|v| v.trim().to_string())
                .collect();
            segments.push(Segment::Alternatives(values));
            groups += 1;

            let consumed = end_at + self.end.len();
            offset += consumed;
            rest = &rest[consumed..];
        }

        trace!(segments = segments.len(), groups, "template parsed");
        Ok(segments)
    }
}

impl Default for TemplateParser {
    fn default() -> Self {
        Self::new(DEFAULT_START_TOKEN, DEFAULT_END_TOKEN)
    }
}
