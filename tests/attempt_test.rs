mod common;

use common::{create_test_platform, platform_at, test_data_dir};
use quizdeck::attempt::Progress;
use quizdeck::error::Error;
use quizdeck::models::{QuestionDraft, QuizDraft, User};
use quizdeck::names;
use quizdeck::Platform;
use tokio::task::yield_now;
use tokio::time::{sleep, Duration};

fn sample_draft(question_count: usize) -> QuizDraft {
    QuizDraft {
        title: "Capitals".to_string(),
        description: "Capital cities of the world".to_string(),
        category: "Geography".to_string(),
        questions: (0..question_count)
            .map(|i| QuestionDraft {
                text: format!("Question {}", i + 1),
                options: vec![
                    "A".to_string(),
                    "B".to_string(),
                    "C".to_string(),
                    "D".to_string(),
                ],
                correct_option: 1,
            })
            .collect(),
    }
}

async fn approved_quiz(platform: &Platform, question_count: usize) -> quizdeck::models::Quiz {
    let admin = platform
        .auth
        .login(names::ADMIN_EMAIL, names::ADMIN_PASSWORD)
        .await
        .unwrap();
    platform
        .quizzes
        .create(sample_draft(question_count), &admin)
        .await
        .unwrap()
}

async fn player(platform: &Platform) -> User {
    platform
        .auth
        .register("Ana", "ana@example.com", "senha123")
        .await
        .unwrap()
}

// One right answer, then the clock runs out on the second question.
#[tokio::test(start_paused = true)]
async fn test_half_right_half_expired_attempt() {
    let platform = create_test_platform().await;
    let quiz = approved_quiz(&platform, 2).await;
    let ana = player(&platform).await;

    let runner = platform.start_attempt(&quiz.id, &ana).await.unwrap();
    runner.select_answer(1).await.unwrap();
    assert_eq!(runner.advance().await.unwrap(), Progress::Next(1));

    // Nobody touches question 2; its countdown expires and the timer
    // finishes the attempt on its own.
    let result = runner.outcome().await.unwrap();
    assert_eq!(result.score, 1);
    assert_eq!(result.total_questions, 2);
    assert_eq!(result.user_id, ana.id);
    assert_eq!(result.quiz_id, quiz.id);
    assert_eq!(result.elapsed_seconds, 60);

    // Asking again returns the same recorded result.
    let again = runner.outcome().await.unwrap();
    assert_eq!(again.id, result.id);

    let quiz = platform.quizzes.get(&quiz.id).await.unwrap();
    assert_eq!(quiz.play_count, 1);
    assert_eq!(quiz.mean_accuracy, 50.0);

    let stats = platform.ranking.platform_stats().await.unwrap();
    assert_eq!(stats.attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_expiry_moves_the_view_forward() {
    let platform = create_test_platform().await;
    let quiz = approved_quiz(&platform, 2).await;
    let ana = player(&platform).await;

    let runner = platform.start_attempt(&quiz.id, &ana).await.unwrap();

    let view = runner.view().await;
    assert_eq!(view.current_index, 0);
    assert_eq!(view.total_questions, 2);
    assert_eq!(view.remaining_seconds, 60);
    assert_eq!(view.selected, None);

    runner.select_answer(3).await.unwrap();
    assert_eq!(runner.view().await.selected, Some(3));

    // One second past the expiry of question 1's countdown.
    sleep(Duration::from_secs(61)).await;
    yield_now().await;

    let view = runner.view().await;
    assert_eq!(view.current_index, 1);
    assert_eq!(view.remaining_seconds, 59);
    assert_eq!(view.selected, None);
    assert!(!view.finished);
}

#[tokio::test(start_paused = true)]
async fn test_fully_expired_attempt_scores_zero() {
    let platform = create_test_platform().await;
    let quiz = approved_quiz(&platform, 2).await;
    let ana = player(&platform).await;

    let runner = platform.start_attempt(&quiz.id, &ana).await.unwrap();

    let result = runner.outcome().await.unwrap();
    assert_eq!(result.score, 0);
    assert_eq!(result.elapsed_seconds, 120);

    let quiz = platform.quizzes.get(&quiz.id).await.unwrap();
    assert_eq!(quiz.play_count, 1);
    assert_eq!(quiz.mean_accuracy, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_manual_finish_records_before_returning() {
    let platform = create_test_platform().await;
    let quiz = approved_quiz(&platform, 2).await;
    let ana = player(&platform).await;

    let runner = platform.start_attempt(&quiz.id, &ana).await.unwrap();
    runner.select_answer(1).await.unwrap();
    runner.advance().await.unwrap();
    runner.select_answer(1).await.unwrap();
    assert_eq!(runner.advance().await.unwrap(), Progress::Finished(2));

    // The result is already durable by the time advance returns.
    let quiz = platform.quizzes.get(&quiz.id).await.unwrap();
    assert_eq!(quiz.play_count, 1);
    assert_eq!(quiz.mean_accuracy, 100.0);

    let result = runner.outcome().await.unwrap();
    assert_eq!(result.score, 2);
    assert_eq!(result.elapsed_seconds, 0);
    assert!(runner.view().await.finished);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_attempt_records_nothing() {
    let platform = create_test_platform().await;
    let quiz = approved_quiz(&platform, 2).await;
    let ana = player(&platform).await;

    let runner = platform.start_attempt(&quiz.id, &ana).await.unwrap();
    runner.select_answer(1).await.unwrap();
    runner.abandon();

    // Long past every countdown in the quiz. The stopped ticker must not
    // come back to finish the attempt.
    sleep(Duration::from_secs(300)).await;
    yield_now().await;

    let quiz = platform.quizzes.get(&quiz.id).await.unwrap();
    assert_eq!(quiz.play_count, 0);
    assert_eq!(platform.ranking.platform_stats().await.unwrap().attempts, 0);
}

#[tokio::test(start_paused = true)]
async fn test_finished_attempt_is_never_recorded_twice() {
    let platform = create_test_platform().await;
    let quiz = approved_quiz(&platform, 1).await;
    let ana = player(&platform).await;

    let runner = platform.start_attempt(&quiz.id, &ana).await.unwrap();
    runner.select_answer(1).await.unwrap();
    assert_eq!(runner.advance().await.unwrap(), Progress::Finished(1));

    sleep(Duration::from_secs(300)).await;
    yield_now().await;

    let quiz = platform.quizzes.get(&quiz.id).await.unwrap();
    assert_eq!(quiz.play_count, 1);
    assert_eq!(platform.ranking.platform_stats().await.unwrap().attempts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_lost_result_write_surfaces_through_outcome() {
    let dir = test_data_dir();
    let platform = platform_at(dir.clone()).await;
    let quiz = approved_quiz(&platform, 1).await;
    let ana = player(&platform).await;

    let runner = platform.start_attempt(&quiz.id, &ana).await.unwrap();

    // Pull the data directory out from under the store before the countdown
    // finishes the attempt.
    std::fs::remove_dir_all(&dir).unwrap();

    let err = runner.outcome().await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));
}

#[tokio::test(start_paused = true)]
async fn test_select_answer_out_of_range_is_rejected() {
    let platform = create_test_platform().await;
    let quiz = approved_quiz(&platform, 1).await;
    let ana = player(&platform).await;

    let runner = platform.start_attempt(&quiz.id, &ana).await.unwrap();
    let err = runner.select_answer(9).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(runner.view().await.selected, None);
}

#[tokio::test]
async fn test_pending_quiz_cannot_be_started() {
    let platform = create_test_platform().await;
    let ana = player(&platform).await;

    let pending = platform
        .quizzes
        .create(sample_draft(1), &ana)
        .await
        .unwrap();

    let Err(err) = platform.start_attempt(&pending.id, &ana).await else {
        panic!("expected the pending quiz to be rejected");
    };
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_unknown_quiz_cannot_be_started() {
    let platform = create_test_platform().await;
    let ana = player(&platform).await;

    let Err(err) = platform.start_attempt("missing", &ana).await else {
        panic!("expected an unknown quiz to be rejected");
    };
    assert!(matches!(err, Error::QuizNotFound(_)));
}
