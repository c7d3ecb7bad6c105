#[cfg(test)]
mod tests {
    use crop_widget::{
        CropCallbacks, CropProps, DragController, Orientation, PointerButton, Rect, Vec2,
        hit_test,
    };
    use shared::{CountingListeners, IdleQueue, LocalTaskScheduler};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_callbacks(log: &Rc<RefCell<Vec<Rect>>>) -> CropCallbacks {
        let log = log.clone();
        CropCallbacks::new().with_on_resize(move |rect| log.borrow_mut().push(rect))
    }

    #[test]
    fn test_pressing_a_hit_tested_corner_resizes_from_it() {
        let listeners = Rc::new(CountingListeners::new());
        let queue = Rc::new(IdleQueue::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);

        let mut controller = DragController::new(CropProps::new(rect), listeners.clone(), queue)
            .with_callbacks(recording_callbacks(&log));

        let press = Vec2::new(1.0, 2.0);
        let target = hit_test(rect, press, 12.0, true);
        assert_eq!(target.orientation(), Some(Orientation::NorthWest));

        controller.on_press_start(press, PointerButton::Primary, target.orientation());
        controller.on_pointer_move(Vec2::new(6.0, 7.0));
        controller.on_press_end(Vec2::new(6.0, 7.0));

        assert_eq!(*log.borrow(), vec![Rect::new(5.0, 5.0, 35.0, 35.0)]);
    }

    #[test]
    fn test_listener_pairs_balance_over_many_sessions() {
        let listeners = Rc::new(CountingListeners::new());
        let queue = Rc::new(IdleQueue::new());
        let mut props = CropProps::new(Rect::new(0.0, 0.0, 10.0, 10.0));

        let mut controller = DragController::new(props, listeners.clone(), queue.clone());

        for round in 0..5 {
            let start = Vec2::new(round as f32, 0.0);
            controller.on_press_start(start, PointerButton::Primary, Some(Orientation::South));
            controller.on_pointer_move(start + Vec2::new(0.0, 3.0));
            assert_eq!(listeners.active(), 1);

            if round % 2 == 0 {
                controller.on_press_end(start);
            } else {
                props = props.with_viewport_offset(Vec2::new(0.0, round as f32));
                controller.on_props_change(props);
                controller.teardown();
            }
            assert_eq!(listeners.active(), 0);
        }

        assert_eq!(listeners.subscribed(), 5);
        assert_eq!(listeners.unsubscribed(), 5);
        assert_eq!(queue.run_pending(), 0);
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_pan_notification_arrives_on_local_set() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let listeners = Rc::new(CountingListeners::new());
                let scheduler = Rc::new(LocalTaskScheduler::new());
                let log = Rc::new(RefCell::new(Vec::new()));
                let props = CropProps::new(Rect::new(0.0, 0.0, 40.0, 40.0));

                let mut controller = DragController::new(props, listeners, scheduler)
                    .with_callbacks(recording_callbacks(&log));

                controller.on_press_start(Vec2::ZERO, PointerButton::Primary, None);
                controller.on_props_change(props.with_viewport_offset(Vec2::new(-4.0, 6.0)));
                assert!(log.borrow().is_empty());

                settle().await;
                assert_eq!(*log.borrow(), vec![Rect::new(4.0, -6.0, 40.0, 40.0)]);
            })
            .await;
    }

    #[tokio::test]
    async fn test_teardown_aborts_pending_local_task() {
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let listeners = Rc::new(CountingListeners::new());
                let scheduler = Rc::new(LocalTaskScheduler::new());
                let log = Rc::new(RefCell::new(Vec::new()));
                let props = CropProps::new(Rect::new(0.0, 0.0, 40.0, 40.0));

                let mut controller =
                    DragController::new(props, listeners.clone(), scheduler)
                        .with_callbacks(recording_callbacks(&log));

                controller.on_press_start(Vec2::ZERO, PointerButton::Primary, None);
                controller.on_props_change(props.with_viewport_offset(Vec2::new(3.0, 3.0)));
                drop(controller);

                settle().await;
                assert!(log.borrow().is_empty());
                assert_eq!(listeners.active(), 0);
            })
            .await;
    }
}
