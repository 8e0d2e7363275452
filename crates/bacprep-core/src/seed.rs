//! Demo fixture loader.
//!
//! Populates a [`MemStore`] with one demo account, the four Bacalaureat
//! subjects with their lesson topics, sample practice tests and results,
//! badges, study streaks, a starter study plan, and an initial chat
//! transcript, so the app is explorable without going through registration.
//!
//! This writes into the maps directly instead of going through
//! [`StudyStore`](crate::store::StudyStore) operations: it is a fixture
//! loader, not production logic, and it deliberately skips uniqueness
//! checks. Loading twice duplicates every entity.

use chrono::{Duration, Utc};

use crate::model::{
    AnswerRecord, Badge, ChatHistory, ChatMessage, Difficulty, StudyPlanTask, StudyStreak,
    Subject, Test, TestQuestion, Topic, User, UserBadge, UserProgress, UserTestResult,
};
use crate::store::{take_id, MemStore};

pub(crate) fn load_demo_fixtures(store: &mut MemStore) {
    let user_id = insert_demo_user(store);

    let romanian = insert_subject(
        store,
        "Romanian",
        "Romanian Language and Literature",
        18,
        "ri-book-open-line",
    );
    let mathematics = insert_subject(
        store,
        "Mathematics",
        "Algebra, Geometry, and Calculus",
        14,
        "ri-calculator-line",
    );
    let english = insert_subject(
        store,
        "English",
        "Grammar, Vocabulary, and Comprehension",
        16,
        "ri-translate-2",
    );
    let biology = insert_subject(
        store,
        "Biology",
        "Cell Structure, Human Anatomy, and Ecology",
        17,
        "ri-microscope-line",
    );

    insert_topics(store, romanian, mathematics, english, biology);
    insert_progress(store, user_id, romanian, mathematics, english, biology);
    let test_ids = insert_tests(store, romanian, mathematics, english);
    insert_results(store, user_id, &test_ids);
    insert_badges(store, user_id);
    insert_streaks(store, user_id);
    insert_plan(store, user_id);
    insert_chat_history(store, user_id);

    tracing::info!(user_id, "demo fixtures loaded");
}

fn insert_demo_user(store: &mut MemStore) -> u32 {
    let id = take_id(&mut store.ids.user);
    store.users.insert(
        id,
        User {
            id,
            username: "andrei".into(),
            password: "password".into(),
            display_name: "Andrei Munteanu".into(),
            email: "andrei@example.com".into(),
            created_at: Utc::now(),
        },
    );
    id
}

fn insert_subject(
    store: &mut MemStore,
    name: &str,
    description: &str,
    total_topics: u32,
    icon: &str,
) -> u32 {
    let id = take_id(&mut store.ids.subject);
    store.subjects.insert(
        id,
        Subject {
            id,
            name: name.into(),
            description: description.into(),
            total_topics,
            icon: icon.into(),
        },
    );
    id
}

fn insert_topic(
    store: &mut MemStore,
    subject_id: u32,
    name: &str,
    description: &str,
    content: &str,
    order: u32,
    difficulty: Difficulty,
) {
    let id = take_id(&mut store.ids.topic);
    store.topics.insert(
        id,
        Topic {
            id,
            subject_id,
            name: name.into(),
            description: description.into(),
            content: content.into(),
            order,
            difficulty: Some(difficulty),
        },
    );
}

fn insert_topics(store: &mut MemStore, romanian: u32, mathematics: u32, english: u32, biology: u32) {
    insert_topic(
        store,
        romanian,
        "Introduction to Romanian Literature",
        "Overview of Romanian literary periods and major authors",
        "<p>Romanian literature spans the medieval chronicles, the Romantic poetry of Eminescu and Alecsandri, the interwar novels of Rebreanu and Sadoveanu, and the contemporary period.</p>",
        1,
        Difficulty::Easy,
    );
    insert_topic(
        store,
        romanian,
        "Romanian Grammar - Noun Cases",
        "Understanding the case system in Romanian language",
        "<p>Romanian uses five cases: Nominative, Accusative, Genitive, Dative, and Vocative. Nominative and Accusative forms coincide for most nouns, as do Genitive and Dative.</p>",
        2,
        Difficulty::Medium,
    );
    insert_topic(
        store,
        romanian,
        "Mihai Eminescu - Life and Works",
        "Study of Romania's national poet and his major works",
        "<p>Mihai Eminescu (1850-1889) is Romania's national poet. His masterpiece <i>Luceafărul</i> explores the impossible love between a mortal and a celestial being; other key works include <i>Scrisori</i> and <i>Floare albastră</i>.</p>",
        3,
        Difficulty::Medium,
    );
    insert_topic(
        store,
        romanian,
        "Ion Creangă - Childhood Memories",
        "Analysis of Creangă's autobiographical work",
        "<p><i>Amintiri din copilărie</i> depicts village life in 19th-century Moldavia through a dual narrative perspective: the child who lives the events and the adult who retells them with nostalgic humor.</p>",
        4,
        Difficulty::Hard,
    );
    insert_topic(
        store,
        romanian,
        "Essay Writing for Bacalaureat - Literary Analysis",
        "Techniques for structuring and writing literary analysis essays",
        "<p>A Bacalaureat literary essay follows introduction, body, and conclusion: contextualize the author, argue a thesis through themes, characters, and technique, and support every claim with quotations.</p>",
        5,
        Difficulty::Hard,
    );
    insert_topic(
        store,
        romanian,
        "Modern Romanian Novel - Liviu Rebreanu's 'Ion'",
        "Analysis of the first modern Romanian novel and its themes",
        "<p>Published in 1920, <i>Ion</i> opposes the voice of the land to the voice of love in a realist portrait of Transylvanian village life, framed by the novel's circular dance scenes.</p>",
        6,
        Difficulty::Medium,
    );

    insert_topic(
        store,
        mathematics,
        "Algebra Fundamentals",
        "Basic algebraic concepts and equations",
        "<p>Linear equations (ax + b = c), quadratic equations solved by factoring or the quadratic formula, functions with their domain and range, polynomials, and systems of equations.</p>",
        1,
        Difficulty::Easy,
    );
    insert_topic(
        store,
        mathematics,
        "Geometry - Triangles",
        "Properties and theorems related to triangles",
        "<p>Triangle classification by sides and angles, the angle-sum property, the Pythagorean theorem, congruence and similarity criteria, area formulas, and the special points of a triangle.</p>",
        2,
        Difficulty::Medium,
    );
    insert_topic(
        store,
        mathematics,
        "Calculus - Limits and Derivatives",
        "Introduction to calculus concepts",
        "<p>Limits and continuity, the definition of the derivative, the power, product, quotient, and chain rules, and applications to extrema and optimization problems.</p>",
        3,
        Difficulty::Hard,
    );
    insert_topic(
        store,
        mathematics,
        "Probability and Statistics",
        "Fundamentals of probability theory and statistical analysis",
        "<p>Classical probability, the addition and multiplication rules, conditional probability, permutations and combinations, common distributions, and measures of central tendency and dispersion.</p>",
        4,
        Difficulty::Medium,
    );
    insert_topic(
        store,
        mathematics,
        "Sequences and Series",
        "Understanding and working with mathematical sequences and series",
        "<p>Arithmetic sequences (a_n = a_1 + (n-1)d) and geometric sequences (a_n = a_1 · r^(n-1)), with the corresponding sum formulas for the first n terms.</p>",
        5,
        Difficulty::Hard,
    );

    insert_topic(
        store,
        english,
        "English Grammar - Tenses",
        "Mastering English verb tenses",
        "<p>The twelve English tenses, their forms and their typical time markers, with emphasis on the contrasts tested most often: present perfect vs. past simple, and the future forms.</p>",
        1,
        Difficulty::Medium,
    );
    insert_topic(
        store,
        english,
        "Essay Writing Skills",
        "Structuring and writing effective essays in English",
        "<p>Opinion, for-and-against, and problem-solution essays: paragraph structure, linking devices, register, and the time budget for planning, writing, and reviewing.</p>",
        2,
        Difficulty::Hard,
    );
    insert_topic(
        store,
        english,
        "Reading Comprehension Strategies",
        "Techniques for understanding and analyzing English texts",
        "<p>Skimming for gist, scanning for detail, inferring meaning from context, and recognizing the writer's purpose and attitude in exam reading passages.</p>",
        3,
        Difficulty::Medium,
    );

    insert_topic(
        store,
        biology,
        "Cell Structure and Function",
        "Understanding the building blocks of life",
        "<p>Prokaryotic and eukaryotic cells, the organelles and their roles, membrane transport, and the differences between plant and animal cells.</p>",
        1,
        Difficulty::Medium,
    );
    insert_topic(
        store,
        biology,
        "Human Circulatory System",
        "Structure and function of the heart and blood vessels",
        "<p>The chambers of the heart, the pulmonary and systemic circuits, the composition of blood, and the regulation of heart rate and blood pressure.</p>",
        2,
        Difficulty::Hard,
    );
    insert_topic(
        store,
        biology,
        "Genetics and Inheritance",
        "Principles of heredity and genetic variation",
        "<p>Mendel's laws, dominant and recessive alleles, Punnett squares, sex-linked inheritance, and common human genetic disorders.</p>",
        3,
        Difficulty::Hard,
    );
}

fn insert_progress(
    store: &mut MemStore,
    user_id: u32,
    romanian: u32,
    mathematics: u32,
    english: u32,
    biology: u32,
) {
    let now = Utc::now();
    let rows = [
        (romanian, 12, 74, now - Duration::days(1)),
        (mathematics, 8, 58, now - Duration::days(2)),
        (english, 14, 89, now),
        (biology, 6, 35, now - Duration::days(5)),
    ];
    for (subject_id, topics_completed, percent_complete, last_studied) in rows {
        let id = take_id(&mut store.ids.progress);
        store.progress.insert(
            id,
            UserProgress {
                id,
                user_id,
                subject_id,
                topics_completed,
                percent_complete,
                last_studied,
            },
        );
    }
}

fn question(question: &str, options: [&str; 4], correct_answer: u8, explanation: &str) -> TestQuestion {
    TestQuestion {
        question: question.into(),
        options: options.iter().map(|o| (*o).to_string()).collect(),
        correct_answer,
        explanation: explanation.into(),
    }
}

fn insert_tests(store: &mut MemStore, romanian: u32, mathematics: u32, english: u32) -> Vec<u32> {
    let tests = [
        Test {
            id: 0,
            name: "Romanian Literature Quiz".into(),
            subject_id: romanian,
            description: "Test your knowledge of Romanian literature classics".into(),
            questions: vec![
                question(
                    "Who wrote the novel 'Ion'?",
                    [
                        "Liviu Rebreanu",
                        "Mihail Sadoveanu",
                        "Camil Petrescu",
                        "George Călinescu",
                    ],
                    0,
                    "Liviu Rebreanu wrote 'Ion' in 1920, a novel that depicts rural life in Transylvania.",
                ),
                question(
                    "Which of the following is NOT a work by Mihai Eminescu?",
                    ["Luceafărul", "Floare Albastră", "Plumb", "Scrisoarea I"],
                    2,
                    "'Plumb' was written by George Bacovia, not Mihai Eminescu.",
                ),
            ],
            time_limit: 20,
            difficulty: Difficulty::Medium,
        },
        Test {
            id: 0,
            name: "Mathematics Practice Exam".into(),
            subject_id: mathematics,
            description: "Comprehensive practice exam covering algebra and geometry".into(),
            questions: vec![
                question(
                    "Solve for x: 2x + 5 = 13",
                    ["x = 3", "x = 4", "x = 5", "x = 6"],
                    1,
                    "2x + 5 = 13, 2x = 8, x = 4",
                ),
                question(
                    "What is the formula for the area of a circle?",
                    ["A = πr²", "A = 2πr", "A = πd", "A = 4πr²"],
                    0,
                    "The area of a circle is π multiplied by the square of the radius (πr²).",
                ),
            ],
            time_limit: 60,
            difficulty: Difficulty::Hard,
        },
        Test {
            id: 0,
            name: "English Grammar Test".into(),
            subject_id: english,
            description: "Test your knowledge of English grammar rules".into(),
            questions: vec![
                question(
                    "Which sentence uses the correct form of the verb?",
                    [
                        "She don't know the answer.",
                        "She doesn't knows the answer.",
                        "She doesn't know the answer.",
                        "She not know the answer.",
                    ],
                    2,
                    "For third-person singular in present simple negative, we use 'doesn't' + base form of the verb.",
                ),
                question(
                    "Choose the correct preposition: 'I'm afraid ___ spiders.'",
                    ["from", "of", "about", "for"],
                    1,
                    "The correct phrase is 'afraid of' something.",
                ),
            ],
            time_limit: 30,
            difficulty: Difficulty::Easy,
        },
    ];

    let mut ids = Vec::new();
    for mut test in tests {
        let id = take_id(&mut store.ids.test);
        test.id = id;
        store.tests.insert(id, test);
        ids.push(id);
    }
    ids
}

fn insert_results(store: &mut MemStore, user_id: u32, test_ids: &[u32]) {
    let now = Utc::now();
    let results = [
        (test_ids[0], 17, 85, vec![(0, 0, true), (1, 2, true)]),
        (test_ids[1], 68, 68, vec![(0, 1, true), (1, 2, false)]),
        (test_ids[2], 92, 92, vec![(0, 2, true), (1, 1, true)]),
    ];
    for (i, (test_id, score, percent_correct, answers)) in results.into_iter().enumerate() {
        let id = take_id(&mut store.ids.test_result);
        store.test_results.insert(
            id,
            UserTestResult {
                id,
                user_id,
                test_id,
                score,
                percent_correct,
                completed_at: now - Duration::days((i as i64 + 1) * 2),
                answers: answers
                    .into_iter()
                    .map(|(question_index, selected_option, correct)| AnswerRecord {
                        question_index,
                        selected_option,
                        correct,
                    })
                    .collect(),
            },
        );
    }
}

fn insert_badges(store: &mut MemStore, user_id: u32) {
    let now = Utc::now();
    let badges = [
        (
            "Math Wizard",
            "Achieved 90% or higher on 3 math quizzes",
            "ri-medal-line",
            "math_quiz_90",
        ),
        (
            "Literature Pro",
            "Completed all literature topics",
            "ri-book-mark-line",
            "literature_complete",
        ),
        (
            "Speed Demon",
            "Completed a test in half the allotted time",
            "ri-timer-line",
            "fast_test",
        ),
    ];
    for (i, (name, description, icon, criteria)) in badges.into_iter().enumerate() {
        let badge_id = take_id(&mut store.ids.badge);
        store.badges.insert(
            badge_id,
            Badge {
                id: badge_id,
                name: name.into(),
                description: description.into(),
                icon: icon.into(),
                criteria: criteria.into(),
            },
        );
        let award_id = take_id(&mut store.ids.user_badge);
        store.user_badges.insert(
            award_id,
            UserBadge {
                id: award_id,
                user_id,
                badge_id,
                earned_at: now - Duration::days((i as i64 + 1) * 5),
            },
        );
    }
}

fn insert_streaks(store: &mut MemStore, user_id: u32) {
    let now = Utc::now();
    for i in 0..3u32 {
        let id = take_id(&mut store.ids.streak);
        store.study_streaks.insert(
            id,
            StudyStreak {
                id,
                user_id,
                date: now - Duration::days(6 - i64::from(i)),
                minutes_studied: 45 + i * 15,
            },
        );
    }
}

fn insert_plan(store: &mut MemStore, user_id: u32) {
    let tomorrow = Utc::now() + Duration::days(1);
    let tasks = [
        (
            "Complete Mathematics lesson on Geometric Progressions",
            "25 min - Continue from where you left off",
            25,
            true,
            false,
        ),
        (
            "Practice Romanian Literary Analysis exercise",
            "40 min - Focus on character development in \"Ion\"",
            40,
            false,
            false,
        ),
        (
            "Review English vocabulary flashcards",
            "15 min - Focus on academic vocabulary",
            15,
            false,
            false,
        ),
        (
            "Try a short Biology quiz on Cell Structure",
            "20 min - This is your weakest topic",
            20,
            false,
            true,
        ),
    ];
    for (title, description, duration, priority, recommended) in tasks {
        let id = take_id(&mut store.ids.task);
        store.plan_tasks.insert(
            id,
            StudyPlanTask {
                id,
                user_id,
                title: title.into(),
                description: description.into(),
                duration,
                priority,
                recommended,
                completed: false,
                due_date: tomorrow,
            },
        );
    }
}

fn insert_chat_history(store: &mut MemStore, user_id: u32) {
    let now = Utc::now();
    let id = take_id(&mut store.ids.chat_history);
    store.chat_histories.insert(
        id,
        ChatHistory {
            id,
            user_id,
            messages: vec![
                ChatMessage {
                    content: "Hello! I'm your AI learning assistant. How can I help with your Bacalaureat preparation today?".into(),
                    is_user: false,
                },
                ChatMessage {
                    content: "Can you explain the formula for geometric progressions?".into(),
                    is_user: true,
                },
                ChatMessage {
                    content: "In a geometric progression with first term a and common ratio r, the nth term is given by: an = a1 × r^(n-1)\n\nThe sum of the first n terms is:\nSn = a1 × (1 - r^n) / (1 - r) when r ≠ 1\n\nWould you like to see an example or practice problems?".into(),
                    is_user: false,
                },
            ],
            created_at: now,
            updated_at: now,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StudyStore;

    #[test]
    fn fixtures_populate_every_entity() {
        let mut store = MemStore::new();
        store.initialize_demo_data();

        assert_eq!(store.all_subjects().len(), 4);
        assert_eq!(store.all_tests().len(), 3);

        let demo = store.get_user_by_username("andrei").unwrap();
        assert_eq!(store.user_progress(demo.id).len(), 4);
        assert_eq!(store.user_test_results(demo.id).len(), 3);
        assert_eq!(store.user_badges(demo.id).len(), 3);
        assert_eq!(store.user_study_streaks(demo.id).len(), 3);
        assert_eq!(store.user_study_plan(demo.id).len(), 4);
        assert_eq!(store.chat_history(demo.id).unwrap().messages.len(), 3);
    }

    #[test]
    fn demo_user_can_authenticate() {
        let mut store = MemStore::new();
        store.initialize_demo_data();
        assert!(store.authenticate_user("andrei", "password").is_some());
    }

    #[test]
    fn topics_come_back_in_lesson_order() {
        let mut store = MemStore::new();
        store.initialize_demo_data();

        let romanian = store
            .all_subjects()
            .into_iter()
            .find(|s| s.name == "Romanian")
            .unwrap();
        let topics = store.topics_by_subject(romanian.id);
        assert_eq!(topics.len(), 6);
        let orders: Vec<u32> = topics.iter().map(|t| t.order).collect();
        assert_eq!(orders, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn result_views_are_joined_with_names() {
        let mut store = MemStore::new();
        store.initialize_demo_data();

        let demo = store.get_user_by_username("andrei").unwrap();
        let results = store.user_test_results(demo.id);
        // Newest first: the Romanian quiz was completed most recently.
        assert_eq!(results[0].test_name, "Romanian Literature Quiz");
        assert_eq!(results[0].subject_name, "Romanian");
    }

    #[test]
    fn loading_twice_duplicates_the_seed_set() {
        let mut store = MemStore::new();
        store.initialize_demo_data();
        store.initialize_demo_data();

        assert_eq!(store.all_subjects().len(), 8);
        assert_eq!(store.all_tests().len(), 6);
        assert_eq!(store.users.len(), 2);
    }
}
