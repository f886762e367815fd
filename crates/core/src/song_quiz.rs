//! Song quiz: on-the-fly question generation and answer checking against
//! the session store.

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::difficulty::Difficulty;
use crate::distractors::select_options;
use crate::error::CoreError;
use crate::evaluation::{matches_expected, AnswerOption, OptionType};
use crate::metadata_bank::{GuessCategory, MetadataBank, SongMetadata};
use crate::scoring::{score, time_taken_secs, AnswerSubmission, QuizResult, ScoreResult};
use crate::session_store::{SessionContext, SessionStore};
use crate::types::{DbId, Timestamp};

/// Questions generated when the client does not ask for a count.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Upper bound on questions per generation request.
pub const MAX_QUESTION_COUNT: usize = 50;

/// A servable question that exists only in memory.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedQuestion {
    pub id: DbId,
    pub text: String,
    pub option_type: OptionType,
    pub options: Vec<AnswerOption>,
    pub served_at: Timestamp,
    pub audio_url: String,
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

/// Builds questions from the bank and registers them in the store.
pub struct QuestionGenerator<'a> {
    bank: &'a MetadataBank,
    store: &'a SessionStore,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(bank: &'a MetadataBank, store: &'a SessionStore) -> Self {
        Self { bank, store }
    }

    /// Generate `count` questions.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<GeneratedQuestion> {
        (0..count).map(|_| self.generate_one(rng)).collect()
    }

    /// Generate a single question for a random song and category.
    pub fn generate_one<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratedQuestion {
        let songs = self.bank.songs();
        let song = &songs[rng.random_range(0..songs.len())];
        let category = GuessCategory::ALL[rng.random_range(0..GuessCategory::ALL.len())];
        self.build(rng, song, category)
    }

    fn build<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        song: &SongMetadata,
        category: GuessCategory,
    ) -> GeneratedQuestion {
        let correct = category.person_of(song);
        let options = select_options(rng, correct, self.bank.pool(category));

        let id = self.store.next_id();
        let served_at = chrono::Utc::now();
        self.store.insert(
            id,
            SessionContext {
                correct_answer_name: correct.name.clone(),
                served_at,
            },
        );

        tracing::debug!(
            question_id = id,
            song = %song.title,
            ?category,
            options = options.len(),
            "Generated song question"
        );

        GeneratedQuestion {
            id,
            text: category.question_text(&song.title),
            option_type: OptionType::Image,
            options,
            served_at,
            audio_url: song.audio_url.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Song quiz operations shared by the HTTP handlers.
pub struct SongQuizService {
    bank: Arc<MetadataBank>,
    store: Arc<SessionStore>,
    rng: Mutex<StdRng>,
}

impl SongQuizService {
    /// Create the service. A `seed` makes generation reproducible; without
    /// one the generator is seeded from the operating system.
    pub fn new(bank: Arc<MetadataBank>, store: Arc<SessionStore>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            bank,
            store,
            rng: Mutex::new(rng),
        }
    }

    pub fn bank(&self) -> &MetadataBank {
        &self.bank
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Generate and register `count` questions (`1..=MAX_QUESTION_COUNT`).
    pub fn generate_questions(&self, count: usize) -> Result<Vec<GeneratedQuestion>, CoreError> {
        if count == 0 || count > MAX_QUESTION_COUNT {
            return Err(CoreError::Validation(format!(
                "count must be between 1 and {MAX_QUESTION_COUNT}, got {count}"
            )));
        }

        let generator = QuestionGenerator::new(&self.bank, &self.store);
        let mut rng = self.call_rng();
        Ok(generator.generate(&mut rng, count))
    }

    /// Derive an independent generator for one call. The master lock is
    /// held only for the draw, so concurrent calls contend on store shards
    /// alone; a seeded master still yields a reproducible sequence.
    fn call_rng(&self) -> StdRng {
        let seed: u64 = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .random();
        StdRng::seed_from_u64(seed)
    }

    /// Check one answer to a generated question.
    ///
    /// Fails with [`CoreError::NotFound`] when the id was never issued or
    /// its context has expired. `answered_at` defaults to now.
    pub fn check_answer(
        &self,
        question_id: DbId,
        difficulty: Difficulty,
        selected: Option<&str>,
        answered_at: Option<Timestamp>,
    ) -> Result<ScoreResult, CoreError> {
        let ctx = self.store.get(question_id).ok_or(CoreError::NotFound {
            entity: "Question",
            id: question_id,
        })?;

        let answered_at = answered_at.unwrap_or_else(chrono::Utc::now);
        let taken = time_taken_secs(ctx.served_at, answered_at);
        let correct = matches_expected(&ctx.correct_answer_name, selected);
        let score_earned = score(correct, taken, difficulty.time_budget_secs());

        Ok(ScoreResult {
            correct,
            correct_answer_label: ctx.correct_answer_name,
            time_taken_seconds: taken,
            score_earned,
        })
    }

    /// Score a batch of answers.
    ///
    /// Unlike [`Self::check_answer`], unknown or expired question ids are
    /// skipped and contribute nothing rather than failing the batch.
    pub fn submit_quiz(&self, answers: &[AnswerSubmission], difficulty: Difficulty) -> QuizResult {
        let budget = difficulty.time_budget_secs();
        let mut total_score = 0;

        for answer in answers {
            let Some(ctx) = self.store.get(answer.question_id) else {
                tracing::debug!(
                    question_id = answer.question_id,
                    "Skipping answer to unknown question"
                );
                continue;
            };
            let taken = time_taken_secs(ctx.served_at, answer.answered_at);
            let correct =
                matches_expected(&ctx.correct_answer_name, answer.selected_option.as_deref());
            total_score += score(correct, taken, budget);
        }

        QuizResult { total_score }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;
    use chrono::Duration;

    use super::*;
    use crate::distractors::OPTION_COUNT;
    use crate::evaluation::eq_ignore_case;
    use crate::session_store::QUESTION_ID_OFFSET;

    fn service(seed: u64) -> SongQuizService {
        SongQuizService::new(
            Arc::new(MetadataBank::bundled().unwrap()),
            Arc::new(SessionStore::default()),
            Some(seed),
        )
    }

    fn correct_name(svc: &SongQuizService, id: DbId) -> String {
        svc.store().get(id).unwrap().correct_answer_name
    }

    #[test]
    fn generated_questions_are_well_formed() {
        let svc = service(1);
        let questions = svc.generate_questions(20).unwrap();
        assert_eq!(questions.len(), 20);

        for q in &questions {
            assert!(q.id > QUESTION_ID_OFFSET);
            assert_eq!(q.option_type, OptionType::Image);
            assert_eq!(q.options.len(), OPTION_COUNT);
            assert!(q.audio_url.starts_with("https://"));

            let name = correct_name(&svc, q.id);
            let hits = q.options.iter().filter(|o| eq_ignore_case(&o.label, &name)).count();
            assert_eq!(hits, 1, "question {} options {:?}", q.id, q.options);

            let song = svc
                .bank()
                .songs()
                .iter()
                .find(|s| q.text.contains(&format!("\"{}\"", s.title)))
                .expect("question text names a bank song");
            assert_eq!(q.audio_url, song.audio_url);
        }
    }

    #[test]
    fn ids_never_repeat() {
        let svc = service(2);
        let mut seen = HashSet::new();
        for _ in 0..10 {
            for q in svc.generate_questions(MAX_QUESTION_COUNT).unwrap() {
                assert!(seen.insert(q.id));
            }
        }
    }

    #[test]
    fn count_is_validated() {
        let svc = service(3);
        assert_matches!(svc.generate_questions(0), Err(CoreError::Validation(_)));
        assert_matches!(
            svc.generate_questions(MAX_QUESTION_COUNT + 1),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn same_seed_same_questions() {
        let a = service(99).generate_questions(5).unwrap();
        let b = service(99).generate_questions(5).unwrap();
        for (qa, qb) in a.iter().zip(&b) {
            assert_eq!(qa.id, qb.id);
            assert_eq!(qa.text, qb.text);
            assert_eq!(qa.options, qb.options);
        }
    }

    #[test]
    fn master_rng_is_released_before_generation() {
        let svc = service(11);
        let _rng = svc.call_rng();
        assert!(svc.rng.try_lock().is_ok());
    }

    #[test]
    fn concurrent_generation_registers_every_question() {
        let svc = Arc::new(service(12));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let svc = Arc::clone(&svc);
                std::thread::spawn(move || svc.generate_questions(MAX_QUESTION_COUNT).unwrap())
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for q in handle.join().unwrap() {
                assert!(ids.insert(q.id));
                assert!(svc.store().get(q.id).is_some());
            }
        }
        assert_eq!(ids.len(), 8 * MAX_QUESTION_COUNT);
    }

    #[test]
    fn check_correct_name_any_case_and_whitespace() {
        let svc = service(4);
        let q = &svc.generate_questions(1).unwrap()[0];
        let name = correct_name(&svc, q.id);
        let sloppy = format!("  {}  ", name.to_uppercase());

        let result = svc
            .check_answer(q.id, Difficulty::Easy, Some(&sloppy), Some(q.served_at))
            .unwrap();
        assert!(result.correct);
        assert_eq!(result.correct_answer_label, name);
        assert_eq!(result.time_taken_seconds, 0);
        assert_eq!(result.score_earned, 10);
    }

    #[test]
    fn check_wrong_answer_scores_zero() {
        let svc = service(5);
        let q = &svc.generate_questions(1).unwrap()[0];
        let result = svc
            .check_answer(q.id, Difficulty::Hard, Some("definitely nobody"), None)
            .unwrap();
        assert!(!result.correct);
        assert_eq!(result.score_earned, 0);
    }

    #[test]
    fn check_unknown_id_is_not_found() {
        let svc = service(6);
        assert_matches!(
            svc.check_answer(1, Difficulty::Easy, Some("x"), None),
            Err(CoreError::NotFound { id: 1, .. })
        );
    }

    #[test]
    fn easy_scenario_time_bands() {
        let svc = service(7);
        let served = chrono::Utc::now();
        let id = svc.store().next_id();
        svc.store().insert(
            id,
            SessionContext {
                correct_answer_name: "Ram Charan".into(),
                served_at: served,
            },
        );

        let fast = svc
            .check_answer(id, Difficulty::Easy, Some("Ram Charan"), Some(served + Duration::seconds(5)))
            .unwrap();
        assert!(fast.correct);
        assert_eq!(fast.time_taken_seconds, 5);
        assert_eq!(fast.score_earned, 10);

        let slow = svc
            .check_answer(id, Difficulty::Easy, Some("Ram Charan"), Some(served + Duration::seconds(13)))
            .unwrap();
        assert_eq!(slow.score_earned, 5);
    }

    #[test]
    fn answer_before_serve_gets_full_score() {
        let svc = service(8);
        let q = &svc.generate_questions(1).unwrap()[0];
        let name = correct_name(&svc, q.id);
        let result = svc
            .check_answer(q.id, Difficulty::Hard, Some(&name), Some(q.served_at - Duration::seconds(30)))
            .unwrap();
        assert_eq!(result.time_taken_seconds, -30);
        assert_eq!(result.score_earned, 10);
    }

    #[test]
    fn submit_skips_unknown_ids() {
        let svc = service(9);
        let answers = vec![AnswerSubmission {
            question_id: 1,
            selected_option: Some("Ram Charan".into()),
            served_at: None,
            answered_at: chrono::Utc::now(),
        }];
        assert_eq!(svc.submit_quiz(&answers, Difficulty::Easy).total_score, 0);
    }

    #[test]
    fn submit_sums_known_answers() {
        let svc = service(10);
        let questions = svc.generate_questions(3).unwrap();

        let mut answers: Vec<AnswerSubmission> = questions
            .iter()
            .map(|q| AnswerSubmission {
                question_id: q.id,
                selected_option: Some(correct_name(&svc, q.id)),
                served_at: None,
                answered_at: q.served_at + Duration::seconds(1),
            })
            .collect();
        // A wrong answer and an unknown id add nothing.
        answers[2].selected_option = Some("wrong".into());
        answers.push(AnswerSubmission {
            question_id: 42,
            selected_option: None,
            served_at: None,
            answered_at: chrono::Utc::now(),
        });

        assert_eq!(svc.submit_quiz(&answers, Difficulty::Medium).total_score, 20);
    }
}
