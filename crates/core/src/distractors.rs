//! Multiple-choice option sets: one correct person plus distractors drawn
//! from a category-wide candidate pool.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::evaluation::{eq_ignore_case, AnswerOption};
use crate::metadata_bank::PersonInfo;

/// Options served per generated question when the pool is large enough.
pub const OPTION_COUNT: usize = 4;

/// Distractors needed alongside the correct option.
const DISTRACTOR_COUNT: usize = OPTION_COUNT - 1;

fn to_option(person: &PersonInfo) -> AnswerOption {
    AnswerOption {
        label: person.name.clone(),
        image_url: Some(person.image_url.clone()),
    }
}

/// Build a shuffled option set for `correct` from `pool`.
///
/// Returns [`OPTION_COUNT`] options with distinct (case-insensitive) labels,
/// exactly one of which is `correct`, whenever the pool holds at least three
/// other distinct names. Smaller pools yield fewer options; nothing is
/// invented to fill the gap.
pub fn select_options<R: Rng + ?Sized>(
    rng: &mut R,
    correct: &PersonInfo,
    pool: &[PersonInfo],
) -> Vec<AnswerOption> {
    // Unique by name, first occurrence wins.
    let mut distractors: Vec<&PersonInfo> = Vec::with_capacity(pool.len());
    for person in pool {
        if !distractors.iter().any(|p| eq_ignore_case(&p.name, &person.name)) {
            distractors.push(person);
        }
    }
    distractors.retain(|p| !eq_ignore_case(&p.name, &correct.name));
    distractors.shuffle(rng);

    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(to_option(correct));
    options.extend(distractors.into_iter().take(DISTRACTOR_COUNT).map(to_option));

    // Every distinct non-correct name is already a candidate, so a short
    // set means the pool has nothing else to offer.
    if options.len() < OPTION_COUNT {
        tracing::debug!(
            correct = %correct.name,
            available = options.len(),
            "Candidate pool too small for a full option set"
        );
    }

    options.shuffle(rng);
    options
}
