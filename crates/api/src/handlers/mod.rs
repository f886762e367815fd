pub mod quizzes;
pub mod song_quiz;
