use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use clickhist::case::commit_flat_index;
use clickhist::config::{AxisConfig, ClickHistConfig, ValueFormat};
use clickhist::data::GridDataset;
use clickhist::error::{ClickHistError, Result};
use clickhist::grid::Dimensions;
use clickhist::pick::{
    ActionDispatcher, AxisScale, AxisScales, CaseAction, ClickEvent, ClickPoint, ClickState,
    DispatchContext,
};
use clickhist::session::{ClickResponse, Session};

type Calls = Rc<RefCell<Vec<(usize, DispatchContext)>>>;

struct Recording(Calls);

impl CaseAction for Recording {
    fn perform(&mut self, flat_index: usize, context: &DispatchContext) -> Result<()> {
        self.0.borrow_mut().push((flat_index, context.clone()));
        Ok(())
    }
}

/// 4 lon x 3 lat x 2 time grid, one sample per bin so every sample is plotted
fn session(output: &std::path::Path) -> Session {
    let axis = |name: &str| AxisConfig {
        name: name.to_string(),
        units: "u".to_string(),
        edges: (0..=24).map(|i| i as f64 * 10.0).collect(),
        format: ValueFormat::default(),
        log_scale: false,
    };
    let mut config = ClickHistConfig::new(axis("x"), axis("y"));
    config.metadata = "x vs y".to_string();
    config.case.output_dir = output.to_path_buf();

    let dims = Dimensions::new(
        vec![0.0, 1.0, 2.0, 3.0],
        vec![10.0, 11.0, 12.0],
        vec![0.0, 3600.0],
        NaiveDate::from_ymd_opt(2005, 5, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    )
    .unwrap();
    let x: Vec<f64> = (0..24).map(|i| i as f64 * 10.0 + 5.0).collect();
    let y: Vec<f64> = (0..24).map(|i| 235.0 - i as f64 * 10.0).collect();
    Session::build(config, GridDataset::from_parts(dims, x, y).unwrap()).unwrap()
}

/// Click right on top of the sample at `flat`
fn click_on(session: &Session, flat: usize) -> ClickEvent {
    ClickEvent {
        position: ClickPoint::new(session.dataset().x()[flat], session.dataset().y()[flat]),
        scales: AxisScales {
            x: AxisScale::linear(2.0),
            y: AxisScale::linear(-2.0),
        },
    }
}

/// The event loop: advance the state, then dispatch any commit
fn drive(
    session: &Session,
    dispatcher: &mut ActionDispatcher,
    state: ClickState,
    event: &ClickEvent,
) -> ClickState {
    let (next, response) = session.click(event, state).unwrap();
    if let ClickResponse::Commit { instruction, .. } = response {
        dispatcher.dispatch(instruction).unwrap();
    }
    next
}

#[test]
fn test_same_point_twice_dispatches_once() {
    let dir = tempfile::tempdir().unwrap();
    let session = session(dir.path());
    let calls = Calls::default();
    let mut dispatcher = ActionDispatcher::with_action(Box::new(Recording(calls.clone())));

    let a = click_on(&session, 17);
    let state = drive(&session, &mut dispatcher, ClickState::default(), &a);
    assert!(calls.borrow().is_empty());
    let state = drive(&session, &mut dispatcher, state, &a);

    assert_eq!(state, ClickState::AwaitingFirstClick);
    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, 17);
    assert_eq!(calls[0].1.metadata, "x vs y");
    assert_eq!(calls[0].1.values, "x: 175.000 u, y: 65.000 u");
    assert_eq!(dispatcher.dispatched(), 1);
}

#[test]
fn test_a_b_a_dispatches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let session = session(dir.path());
    let calls = Calls::default();
    let mut dispatcher = ActionDispatcher::with_action(Box::new(Recording(calls.clone())));

    let a = click_on(&session, 3);
    let b = click_on(&session, 20);
    let mut state = ClickState::default();
    for event in [&a, &b, &a] {
        state = drive(&session, &mut dispatcher, state, event);
    }

    assert!(calls.borrow().is_empty());
    assert!(!state.is_first_click());

    // a fourth click on A now commits
    drive(&session, &mut dispatcher, state, &a);
    assert_eq!(calls.borrow().len(), 1);
    assert_eq!(calls.borrow()[0].0, 3);
}

#[test]
fn test_commit_then_click_starts_new_preview() {
    let dir = tempfile::tempdir().unwrap();
    let session = session(dir.path());
    let calls = Calls::default();
    let mut dispatcher = ActionDispatcher::with_action(Box::new(Recording(calls.clone())));

    let a = click_on(&session, 8);
    let mut state = ClickState::default();
    for _ in 0..3 {
        state = drive(&session, &mut dispatcher, state, &a);
    }
    // preview, commit, preview again
    assert_eq!(calls.borrow().len(), 1);
    assert!(!state.is_first_click());
}

#[test]
fn test_headless_commit_goes_through_dispatcher() {
    let dir = tempfile::tempdir().unwrap();
    let session = session(dir.path());
    let calls = Calls::default();
    let mut dispatcher = ActionDispatcher::with_action(Box::new(Recording(calls.clone())));

    let summary = commit_flat_index(&session, &mut dispatcher, 17).unwrap();
    assert_eq!(summary.location.index.lon, 1);
    assert_eq!(summary.location.index.lat, 1);
    assert_eq!(summary.location.index.time, 1);
    assert_eq!(calls.borrow()[0].0, 17);
    assert!(dir.path().join("Tmp").join("mostRecentCH.png").exists());

    assert!(matches!(
        commit_flat_index(&session, &mut dispatcher, 24),
        Err(ClickHistError::IndexOutOfRange { index: 24, len: 24 })
    ));
    assert!(matches!(
        commit_flat_index(&session, &mut dispatcher, -1),
        Err(ClickHistError::IndexOutOfRange { index: -1, .. })
    ));
    assert_eq!(calls.borrow().len(), 1);
}
