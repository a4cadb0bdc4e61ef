mod common;

use common::{create_test_pool, seed};
use quiz_cms::db::queries::{answers, categories, questions, quizzes};
use quiz_cms::transfer::{export_data, import_data, ANSWERS_FILE, CATEGORIES_FILE};

#[tokio::test]
async fn export_then_import_restores_content() {
    let source = create_test_pool().await;
    let seeded = seed(&source).await;
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("dump");

    export_data(&source, &dump).await.unwrap();
    assert!(dump.join(CATEGORIES_FILE).exists());
    assert!(dump.join(ANSWERS_FILE).exists());

    let target = create_test_pool().await;
    import_data(&target, &dump).await.unwrap();

    let category = categories::get_category(&target, seeded.category.id)
        .await
        .unwrap();
    assert_eq!(category.name, seeded.category.name);

    let quiz = quizzes::get_quiz(&target, seeded.quiz.id).await.unwrap();
    assert_eq!(quiz.title, seeded.quiz.title);
    assert_eq!(quiz.category_id, seeded.category.id);

    let question = questions::get_question(&target, seeded.question.id)
        .await
        .unwrap();
    assert_eq!(question.kind, seeded.question.kind);
    assert_eq!(question.difficulty, seeded.question.difficulty);

    let restored: Vec<(String, bool)> = answers::get_answers_for_question(&target, question.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| (a.text, a.is_correct))
        .collect();
    assert_eq!(
        restored,
        [("String".to_owned(), true), ("&str".to_owned(), false)]
    );
}

#[tokio::test]
async fn importing_twice_does_not_duplicate() {
    let source = create_test_pool().await;
    seed(&source).await;
    let dir = tempfile::tempdir().unwrap();

    export_data(&source, dir.path()).await.unwrap();
    import_data(&source, dir.path()).await.unwrap();

    assert_eq!(categories::get_all_categories(&source).await.unwrap().len(), 1);
    assert_eq!(answers::get_all_answers(&source).await.unwrap().len(), 2);
}

#[tokio::test]
async fn import_from_missing_directory_fails() {
    let pool = create_test_pool().await;
    let dir = tempfile::tempdir().unwrap();

    assert!(import_data(&pool, &dir.path().join("absent")).await.is_err());
}
