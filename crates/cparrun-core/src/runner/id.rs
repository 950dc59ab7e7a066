use std::collections::HashSet;

use rand::{Rng, distributions::Alphanumeric};

/// Length of generated task identifiers.
pub const TASK_ID_LEN: usize = 6;

/// Random alphanumeric identifier (`[A-Za-z0-9]{6}`).
pub fn random_task_id() -> String {
    let mut rng = rand::thread_rng();
    std::iter::repeat_with(|| rng.sample(Alphanumeric))
        .map(char::from)
        .take(TASK_ID_LEN)
        .collect()
}

/// Issues task ids that are unique within one run.
///
/// Random ids are short, so collisions are possible; a colliding draw is simply
/// retried.
#[derive(Debug, Default)]
pub struct TaskIds {
    issued: HashSet<String>,
}

impl TaskIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        loop {
            let id = random_task_id();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Number of ids issued so far.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_short_alphanumeric() {
        let id = random_task_id();
        assert_eq!(id.len(), TASK_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn ids_are_unique_within_a_run() {
        let mut ids = TaskIds::new();
        let drawn: HashSet<String> = (0..2_000).map(|_| ids.next_id()).collect();
        assert_eq!(drawn.len(), 2_000);
        assert_eq!(ids.len(), 2_000);
    }
}
