use serde_json::Value;
use tracing::trace;

use cparrun_model::{CommandForm, CommandSpec, Segment};

use crate::template::ExpandError;

/// One concrete command: a token per template segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Combination(Vec<String>);

impl Combination {
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.0
    }

    /// Concatenate tokens without separator; literals carry their own spacing.
    pub fn join(&self) -> String {
        self.0.concat()
    }

    pub fn into_command(self, form: CommandForm) -> CommandSpec {
        match form {
            CommandForm::Argv => CommandSpec::Argv(self.0),
            CommandForm::Line => CommandSpec::Line(self.join()),
        }
    }
}

/// Number of combinations `segments` expand to, `None` on overflow.
pub fn combination_count(segments: &[Segment]) -> Option<usize> {
    segments
        .iter()
        .try_fold(1usize, |acc, seg| acc.checked_mul(seg.width()))
}

/// Expand segments into their full cartesian product.
///
/// Literals are appended to every combination; each alternatives segment
/// multiplies the set. The first alternatives segment varies slowest:
/// `[[a, b], [1, 2]]` yields `a1, a2, b1, b2`.
pub fn expand(segments: &[Segment]) -> Vec<Combination> {
    let mut acc = vec![Vec::<String>::with_capacity(segments.len())];

    for segment in segments {
        match segment {
            Segment::Literal(value) => {
                for tokens in &mut acc {
                    tokens.push(value.clone());
                }
            }
            Segment::Alternatives(values) => {
                let mut next = Vec::with_capacity(acc.len() * values.len());
                for tokens in &acc {
                    for value in values {
                        let mut tokens = tokens.clone();
                        tokens.push(value.clone());
                        next.push(tokens);
                    }
                }
                acc = next;
            }
        }
    }

    trace!(segments = segments.len(), combinations = acc.len(), "segments expanded");
    acc.into_iter().map(Combination).collect()
}

/// Expand loosely-typed segments (JSON strings and string arrays).
///
/// The first value that is not a valid segment fails the whole expansion; no
/// partial combinations are returned.
pub fn expand_values(values: &[Value]) -> Result<Vec<Combination>, ExpandError> {
    let segments = values
        .iter()
        .enumerate()
        .map(|(index, value)| Segment::from_value(value).map_err(|e| ExpandError::at(index, e)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(expand(&segments))
}

/// Turn combinations into executable commands of the requested form.
pub fn collapse(combinations: Vec<Combination>, form: CommandForm) -> Vec<CommandSpec> {
    combinations
        .into_iter()
        .map(|c| c.into_command(form))
        .collect()
}
