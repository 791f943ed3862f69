#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use futures::future::join_all;

    use crate::{
        quiz::{
            models::{Outcome, QuizEvent, QuizStatus},
            notifier::ToastStatus,
            store::{SessionError, SessionStore},
        },
        tests::{builtin_bank, setup_logging},
    };

    const WINDOW: Duration = Duration::from_millis(2500);
    const IDLE: Duration = Duration::from_secs(60);

    fn store() -> SessionStore {
        setup_logging();
        SessionStore::new(builtin_bank(), WINDOW, IDLE)
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_window_advances_after_delay() {
        let store = store();
        let id = store.create(None).unwrap().id;

        store.select_option(id, 1).unwrap();
        let response = store.commit(id).unwrap();
        assert_eq!(response.outcome, Outcome::Applied);
        assert!(response.session.explanation_visible);
        assert_eq!(response.notifications[0].status, ToastStatus::Success);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let snapshot = store.snapshot(id).unwrap();
        assert!(snapshot.explanation_visible);
        assert_eq!(snapshot.current_index, 0);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        let snapshot = store.snapshot(id).unwrap();
        assert!(!snapshot.explanation_visible);
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.selected_option, None);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_invalidates_pending_reveal() {
        let store = store();
        let id = store.create(None).unwrap().id;

        store.select_option(id, 1).unwrap();
        store.commit(id).unwrap();
        store.reset(id).unwrap();

        store.select_option(id, 0).unwrap();
        tokio::time::sleep(WINDOW * 2).await;

        let snapshot = store.snapshot(id).unwrap();
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.answered, 0);
        assert_eq!(snapshot.selected_option, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn category_change_invalidates_pending_reveal() {
        let store = store();
        let id = store.create(None).unwrap().id;

        store.select_option(id, 1).unwrap();
        store.commit(id).unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;

        let response = store.select_category(id, "Flood").unwrap();
        assert_eq!(response.session.total_questions, 2);

        store.select_option(id, 1).unwrap();
        store.commit(id).unwrap();

        // First timer fires here and must not move the Flood attempt.
        tokio::time::sleep(Duration::from_millis(1600)).await;
        let snapshot = store.snapshot(id).unwrap();
        assert!(snapshot.explanation_visible);
        assert_eq!(snapshot.current_index, 0);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let snapshot = store.snapshot(id).unwrap();
        assert!(!snapshot.explanation_visible);
        assert_eq!(snapshot.current_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn flood_quiz_completes_and_broadcasts() {
        let store = store();
        let mut events = store.subscribe();
        let id = store.create(Some("Flood")).unwrap().id;

        for _ in 0..2 {
            store.select_option(id, 1).unwrap();
            store.commit(id).unwrap();
            tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;
        }

        let snapshot = store.snapshot(id).unwrap();
        assert_eq!(snapshot.status, QuizStatus::Complete);
        assert_eq!(snapshot.score, 2);

        let results = store.results(id).unwrap();
        assert_eq!(results.badge.text, "Excellent!");
        assert_eq!(store.review(id).unwrap().len(), 2);

        let mut received = vec![];
        while let Ok(event) = events.try_recv() {
            assert_eq!(event.session_id, id);
            received.push(event.event);
        }

        assert_eq!(received.len(), 3);
        assert!(matches!(received[0], QuizEvent::AnsweredCorrectly { .. }));
        assert_eq!(received[2], QuizEvent::QuizCompleted { score: 2, total: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_operations_report_ignored() {
        let store = store();
        let id = store.create(None).unwrap().id;

        let response = store.commit(id).unwrap();
        assert_eq!(response.outcome, Outcome::Ignored);
        assert!(response.notifications.is_empty());

        let response = store.select_option(id, 9).unwrap();
        assert_eq!(response.outcome, Outcome::Ignored);
    }

    #[tokio::test(start_paused = true)]
    async fn removed_session_drops_pending_reveal() {
        let store = store();
        let id = store.create(None).unwrap().id;

        store.select_option(id, 1).unwrap();
        store.commit(id).unwrap();
        store.remove(id).unwrap();

        tokio::time::sleep(WINDOW * 2).await;
        assert!(matches!(store.snapshot(id), Err(SessionError::NotFound(_))));
        assert_eq!(store.active_sessions(), 0);
    }

    #[tokio::test]
    async fn unknown_ids_and_categories_are_errors() {
        let store = store();

        assert!(matches!(
            store.create(Some("Volcano")),
            Err(SessionError::UnknownCategory(_))
        ));
        assert_eq!(store.active_sessions(), 0);

        let id = store.create(None).unwrap().id;
        assert!(matches!(
            store.select_category(id, "Volcano"),
            Err(SessionError::UnknownCategory(_))
        ));
        assert!(matches!(
            store.reset(uuid::Uuid::new_v4()),
            Err(SessionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_sessions_are_independent() {
        let store = Arc::new(store());

        let handles = (0..50).map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let id = store.create(None).unwrap().id;
                store.select_option(id, i % 4).unwrap();
                (id, i % 4)
            })
        });

        let results = join_all(handles).await;

        assert_eq!(store.active_sessions(), 50);
        for result in results {
            let (id, picked) = result.unwrap();
            let snapshot = store.snapshot(id).unwrap();
            assert_eq!(snapshot.selected_option, Some(picked));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_are_evicted() {
        let store = store();
        store.spawn_cleanup();

        for _ in 0..1000 {
            store.create(None).unwrap();
        }
        assert_eq!(store.active_sessions(), 1000);

        tokio::time::sleep(Duration::from_secs(7 * 24 * 3600)).await;
        assert_eq!(store.active_sessions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn touched_sessions_stay_alive() {
        let store = store();
        let idle = store.create(None).unwrap().id;
        let active = store.create(None).unwrap().id;

        tokio::time::advance(Duration::from_secs(50)).await;
        store.snapshot(active).unwrap();

        tokio::time::advance(Duration::from_secs(20)).await;
        assert_eq!(store.evict_idle(), 1);

        assert!(matches!(store.snapshot(idle), Err(SessionError::NotFound(_))));
        assert!(store.snapshot(active).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_window_after_eviction_is_a_no_op() {
        let store = SessionStore::new(builtin_bank(), WINDOW, Duration::from_secs(1));
        let id = store.create(None).unwrap().id;

        store.select_option(id, 1).unwrap();
        store.commit(id).unwrap();

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(store.evict_idle(), 1);

        tokio::time::sleep(WINDOW * 2).await;
        assert_eq!(store.active_sessions(), 0);
    }
}
