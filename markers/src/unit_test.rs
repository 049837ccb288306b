#![allow(clippy::float_cmp)]

use std::cell::{Cell, RefCell};

use super::*;
use crate::sim::{ElementId, SimEngine, SimEvent};

fn counter(hits: &Rc<Cell<usize>>) -> EngineHandler<SimEngine> {
    let hits = Rc::clone(hits);
    Rc::new(move |_: &EngineMarker<ElementId>, _: &SimEvent| hits.set(hits.get() + 1))
}

fn no_callbacks() -> MarkerCallbacks<SimEngine> {
    MarkerCallbacks::default()
}

fn only(kind: MarkerEventKind, handler: EngineHandler<SimEngine>) -> MarkerCallbacks<SimEngine> {
    let mut callbacks = no_callbacks();
    match kind {
        MarkerEventKind::Click => callbacks.on_click = Some(handler),
        MarkerEventKind::Drag => callbacks.on_drag = Some(handler),
        MarkerEventKind::Drop => callbacks.on_drop = Some(handler),
    }
    callbacks
}

fn mounted(engine: &Rc<SimEngine>, time: f64) -> MarkerUnit<SimEngine> {
    let mut unit = MarkerUnit::new();
    unit.render(Some(engine), &MarkerSpec::at(time), &no_callbacks()).unwrap();
    unit
}

fn element(unit: &MarkerUnit<SimEngine>) -> ElementId {
    unit.record().map(|r| r.element).unwrap()
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn mount_update_unmount_creates_and_removes_exactly_once() {
    let engine = Rc::new(SimEngine::new());
    let mut unit = MarkerUnit::new();
    let callbacks = no_callbacks();

    for _ in 0..4 {
        unit.render(Some(&engine), &MarkerSpec::at(1.0), &callbacks).unwrap();
    }
    for time in [2.0, 2.0, 3.5, 1.0] {
        unit.render(Some(&engine), &MarkerSpec::at(time), &callbacks).unwrap();
    }
    unit.unmount();
    unit.unmount();

    let stats = engine.stats();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.position_updates, 3);
    assert!(engine.is_empty());
}

#[test]
fn render_outcomes_follow_the_lifecycle() {
    let engine = Rc::new(SimEngine::new());
    let mut unit = MarkerUnit::new();
    let callbacks = no_callbacks();

    assert_eq!(unit.render(None, &MarkerSpec::at(1.0), &callbacks).unwrap(), RenderOutcome::Deferred);
    assert_eq!(unit.render(Some(&engine), &MarkerSpec::at(1.0), &callbacks).unwrap(), RenderOutcome::Created);
    assert_eq!(unit.render(Some(&engine), &MarkerSpec::at(1.0), &callbacks).unwrap(), RenderOutcome::Unchanged);
    assert_eq!(unit.render(Some(&engine), &MarkerSpec::at(2.0), &callbacks).unwrap(), RenderOutcome::Moved);
    unit.unmount();
    assert_eq!(unit.render(Some(&engine), &MarkerSpec::at(3.0), &callbacks).unwrap(), RenderOutcome::Unmounted);
    assert_eq!(engine.stats().created, 1);
}

#[test]
fn creation_waits_for_the_context() {
    let engine = Rc::new(SimEngine::new());
    let mut unit = MarkerUnit::new();
    let callbacks = no_callbacks();

    for _ in 0..3 {
        unit.render(None, &MarkerSpec::at(4.0), &callbacks).unwrap();
    }
    assert_eq!(engine.stats().created, 0);
    assert!(unit.record().is_none());

    unit.render(Some(&engine), &MarkerSpec::at(4.0), &callbacks).unwrap();
    assert_eq!(engine.stats().created, 1);
    unit.render(Some(&engine), &MarkerSpec::at(4.0), &callbacks).unwrap();
    assert_eq!(engine.stats().created, 1);
    assert_eq!(engine.time_of(&element(&unit)), Some(4.0));
}

#[test]
fn equal_time_renders_issue_no_mutation() {
    let engine = Rc::new(SimEngine::new());
    let mut unit = mounted(&engine, 2.5);
    for _ in 0..10 {
        unit.render(Some(&engine), &MarkerSpec::at(2.5), &no_callbacks()).unwrap();
    }
    assert_eq!(engine.stats().position_updates, 0);
}

#[test]
fn unmount_targets_the_current_element_after_neighbours_change() {
    let engine = Rc::new(SimEngine::new());
    let mut a = mounted(&engine, 1.0);
    let mut b = mounted(&engine, 2.0);
    let c = mounted(&engine, 3.0);
    let c_el = element(&c);

    b.unmount();
    a.unmount();

    assert_eq!(engine.elements(), vec![c_el]);
    assert_eq!(engine.stats().removed, 2);
}

#[test]
fn unmount_after_external_removal_is_noop() {
    let engine = Rc::new(SimEngine::new());
    let mut unit = mounted(&engine, 1.0);
    let other = mounted(&engine, 2.0);
    engine.remove_marker(0);

    unit.unmount();
    assert_eq!(engine.elements(), vec![element(&other)]);
    assert_eq!(engine.stats().removed, 1);
}

#[test]
fn unmount_without_context_never_touches_an_engine() {
    let mut unit: MarkerUnit<SimEngine> = MarkerUnit::new();
    unit.render(None, &MarkerSpec::at(1.0), &no_callbacks()).unwrap();
    unit.unmount();
    assert!(unit.is_unmounted());
    assert!(unit.record().is_none());
}

#[test]
fn dropping_a_unit_tears_it_down() {
    let engine = Rc::new(SimEngine::new());
    let hits = Rc::new(Cell::new(0));
    {
        let mut unit = MarkerUnit::new();
        let callbacks = only(MarkerEventKind::Click, counter(&hits));
        unit.render(Some(&engine), &MarkerSpec::at(1.0), &callbacks).unwrap();
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.listener_count(MarkerEventKind::Click), 1);
    }
    assert!(engine.is_empty());
    assert_eq!(engine.listener_count(MarkerEventKind::Click), 0);
}

#[test]
fn unmount_unsubscribes_before_removing() {
    let engine = Rc::new(SimEngine::new());
    let hits = Rc::new(Cell::new(0));
    let callbacks = only(MarkerEventKind::Drop, counter(&hits));
    let mut unit = MarkerUnit::new();
    unit.render(Some(&engine), &MarkerSpec::at(1.0), &callbacks).unwrap();

    unit.unmount();
    let stats = engine.stats();
    assert_eq!(stats.unsubscribed, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(engine.listener_count(MarkerEventKind::Drop), 0);
}

// =============================================================
// Events
// =============================================================

#[test]
fn each_unit_only_hears_its_own_marker() {
    let engine = Rc::new(SimEngine::new());
    let a_hits = Rc::new(Cell::new(0));
    let b_hits = Rc::new(Cell::new(0));
    let mut a = MarkerUnit::new();
    let mut b = MarkerUnit::new();
    let a_callbacks: MarkerCallbacks<SimEngine> = MarkerCallbacks {
        on_click: Some(counter(&a_hits)),
        on_drag: Some(counter(&a_hits)),
        on_drop: Some(counter(&a_hits)),
    };
    let b_callbacks: MarkerCallbacks<SimEngine> = MarkerCallbacks {
        on_click: Some(counter(&b_hits)),
        on_drag: Some(counter(&b_hits)),
        on_drop: Some(counter(&b_hits)),
    };
    a.render(Some(&engine), &MarkerSpec::at(1.0), &a_callbacks).unwrap();
    b.render(Some(&engine), &MarkerSpec::at(1.0), &b_callbacks).unwrap();

    for kind in MarkerEventKind::ALL {
        engine.emit(kind, &element(&a), &SimEvent { time: 1.0 });
    }
    assert_eq!(a_hits.get(), 3);
    assert_eq!(b_hits.get(), 0);
}

#[test]
fn changing_on_drag_twice_delivers_once() {
    let engine = Rc::new(SimEngine::new());
    let hits = Rc::new(Cell::new(0));
    let mut unit = MarkerUnit::new();
    let spec = MarkerSpec::at(1.0).with_draggable(true);

    for _ in 0..3 {
        let callbacks = only(MarkerEventKind::Drag, counter(&hits));
        unit.render(Some(&engine), &spec, &callbacks).unwrap();
    }

    assert_eq!(engine.listener_count(MarkerEventKind::Drag), 1);
    engine.emit(MarkerEventKind::Drag, &element(&unit), &SimEvent { time: 1.2 });
    assert_eq!(hits.get(), 1);
}

#[test]
fn subscriptions_follow_the_context() {
    let engine = Rc::new(SimEngine::new());
    let hits = Rc::new(Cell::new(0));
    let callbacks = only(MarkerEventKind::Click, counter(&hits));
    let mut unit = MarkerUnit::new();

    unit.render(None, &MarkerSpec::at(1.0), &callbacks).unwrap();
    assert!(!unit.is_subscribed(MarkerEventKind::Click));

    unit.render(Some(&engine), &MarkerSpec::at(1.0), &callbacks).unwrap();
    assert!(unit.is_subscribed(MarkerEventKind::Click));

    unit.render(None, &MarkerSpec::at(1.0), &callbacks).unwrap();
    assert!(!unit.is_subscribed(MarkerEventKind::Click));
    assert_eq!(engine.listener_count(MarkerEventKind::Click), 0);
    assert_eq!(engine.len(), 1);
}

#[test]
fn position_updates_pause_while_context_is_lost() {
    let engine = Rc::new(SimEngine::new());
    let mut unit = mounted(&engine, 1.0);

    unit.render(None, &MarkerSpec::at(5.0), &no_callbacks()).unwrap();
    assert_eq!(engine.stats().position_updates, 0);

    unit.render(Some(&engine), &MarkerSpec::at(5.0), &no_callbacks()).unwrap();
    assert_eq!(engine.time_of(&element(&unit)), Some(5.0));
}

#[test]
fn records_stay_with_the_engine_that_created_them() {
    let first = Rc::new(SimEngine::new());
    let second = Rc::new(SimEngine::new());
    let mut unit = mounted(&first, 1.0);

    unit.render(Some(&second), &MarkerSpec::at(2.0), &no_callbacks()).unwrap();
    assert!(second.is_empty());
    assert_eq!(first.stats().position_updates, 0);

    unit.unmount();
    assert!(first.is_empty());
}

#[test]
fn drop_callback_can_feed_the_next_render() {
    let engine = Rc::new(SimEngine::new());
    let dropped_at = Rc::new(RefCell::new(None::<f64>));
    let sink = Rc::clone(&dropped_at);
    let on_drop: EngineHandler<SimEngine> =
        Rc::new(move |_: &EngineMarker<ElementId>, e: &SimEvent| *sink.borrow_mut() = Some(e.time));
    let callbacks = only(MarkerEventKind::Drop, on_drop);
    let mut unit = MarkerUnit::new();
    let spec = MarkerSpec::at(1.0).with_draggable(true);
    unit.render(Some(&engine), &spec, &callbacks).unwrap();

    engine.emit(MarkerEventKind::Drop, &element(&unit), &SimEvent { time: 6.0 });
    let next_time = dropped_at.borrow().unwrap();
    let outcome = unit.render(Some(&engine), &MarkerSpec { time: next_time, ..spec }, &callbacks).unwrap();

    assert_eq!(outcome, RenderOutcome::Moved);
    assert_eq!(engine.time_of(&element(&unit)), Some(6.0));
}

#[test]
fn rendering_the_dragged_time_issues_no_mutation() {
    let engine = Rc::new(SimEngine::new());
    let mut unit = mounted(&engine, 5.0);
    engine.drag_to(&element(&unit), 8.0);

    let outcome = unit.render(Some(&engine), &MarkerSpec::at(8.0), &no_callbacks()).unwrap();
    assert_eq!(outcome, RenderOutcome::Unchanged);
    assert_eq!(engine.stats().position_updates, 0);
}

#[test]
fn rendering_the_old_time_after_a_drag_moves_the_marker_back() {
    let engine = Rc::new(SimEngine::new());
    let mut unit = mounted(&engine, 5.0);
    engine.drag_to(&element(&unit), 8.0);

    let outcome = unit.render(Some(&engine), &MarkerSpec::at(5.0), &no_callbacks()).unwrap();
    assert_eq!(outcome, RenderOutcome::Moved);
    assert_eq!(engine.time_of(&element(&unit)), Some(5.0));
}

// =============================================================
// Unsupported updates
// =============================================================

#[test]
fn write_once_changes_are_rejected_without_recreating() {
    let engine = Rc::new(SimEngine::new());
    let mut unit = MarkerUnit::new();
    let callbacks = no_callbacks();
    unit.render(Some(&engine), &MarkerSpec::at(1.0).with_label("intro"), &callbacks).unwrap();
    let original = element(&unit);

    let err = unit
        .render(Some(&engine), &MarkerSpec::at(1.0).with_label("outro"), &callbacks)
        .unwrap_err();
    assert!(matches!(err, MarkerError::UnsupportedUpdate { field: "label" }));
    assert_eq!(engine.elements(), vec![original]);
    assert_eq!(engine.stats().created, 1);
    assert_eq!(unit.record().unwrap().label.as_deref(), Some("intro"));
}
